//! # n-export — Image export for n-palette
//!
//! Turns the on-screen palette into a PNG file, in three replaceable steps:
//!
//! ```text
//! PaletteRegion (simulated swatches, focus)
//!     │
//!     ▼
//! raster.rs:   Rasterizer → RgbaImage (400×400, transparent, no overlays)
//!     │
//!     ▼
//! datauri.rs:  PNG bytes → "data:image/png;base64,…"
//!     │
//!     ▼
//! download.rs: Download::save(uri, "color-palette.png") → PathBuf
//! ```
//!
//! The data URI in the middle is the hand-off format between the renderer
//! and whatever saves the file, so a download target never needs to know
//! how the image was produced.

pub mod datauri;
pub mod download;
pub mod error;
pub mod raster;

pub use datauri::{decode_data_uri, encode_png_data_uri};
pub use download::{DirectoryDownload, Download};
pub use error::ExportError;
pub use image::RgbaImage;
pub use raster::{GridRasterizer, PaletteRegion, RasterOptions, Rasterizer};

/// Default name of the saved image.
pub const PNG_FILENAME: &str = "color-palette.png";

/// Rasterize `region` and hand it to `download` as a PNG data URI.
///
/// Returns where the file was written.
///
/// # Errors
///
/// Any [`ExportError`] from encoding or saving.
pub fn export_png(
    rasterizer: &impl Rasterizer,
    region: &PaletteRegion,
    options: &RasterOptions,
    download: &mut dyn Download,
) -> Result<std::path::PathBuf, ExportError> {
    let image = rasterizer.rasterize(region, options);
    let uri = encode_png_data_uri(&image)?;
    let path = download.save(&uri, PNG_FILENAME)?;
    tracing::info!(path = %path.display(), swatches = region.swatches.len(), "palette image saved");
    Ok(path)
}
