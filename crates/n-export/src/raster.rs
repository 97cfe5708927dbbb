//! Palette rasterizer.
//!
//! Paints the swatch area into an RGBA bitmap the way it appears on
//! screen: a 2×2 grid, each cell filled with the swatch's displayed
//! (simulated) color. Cells without a swatch stay at the background, which
//! defaults to fully transparent.
//!
//! Overlays are the on-screen-only decorations (the focus marker). Export
//! hides them by default so the image contains colors only.

use image::{Rgba, RgbaImage};
use n_color::Color;

/// Grid shape of the swatch area.
pub const GRID_COLS: u32 = 2;
pub const GRID_ROWS: u32 = 2;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const MARKER: Rgba<u8> = Rgba([255, 255, 255, 255]);
const MARKER_OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// What to paint: displayed swatch colors in slot order, and the focus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaletteRegion {
    pub swatches: Vec<Color>,
    /// Focused swatch, drawn as an overlay marker.
    pub focused: Option<usize>,
}

impl PaletteRegion {
    #[must_use]
    pub const fn new(swatches: Vec<Color>) -> Self {
        Self {
            swatches,
            focused: None,
        }
    }

    #[must_use]
    pub fn with_focus(mut self, index: usize) -> Self {
        self.focused = Some(index);
        self
    }
}

/// Output parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    pub width: u32,
    pub height: u32,
    /// `None` is transparent.
    pub background: Option<Color>,
    pub hide_overlays: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            background: None,
            hide_overlays: true,
        }
    }
}

/// Turns a [`PaletteRegion`] into a bitmap.
pub trait Rasterizer {
    fn rasterize(&self, region: &PaletteRegion, options: &RasterOptions) -> RgbaImage;
}

/// The default rasterizer: solid cells on a 2×2 grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridRasterizer;

impl Rasterizer for GridRasterizer {
    fn rasterize(&self, region: &PaletteRegion, options: &RasterOptions) -> RgbaImage {
        let bg = options.background.map_or(TRANSPARENT, opaque);
        let mut img = RgbaImage::from_pixel(options.width, options.height, bg);

        let capacity = (GRID_COLS * GRID_ROWS) as usize;
        for (i, &color) in region.swatches.iter().take(capacity).enumerate() {
            let (x0, y0, x1, y1) = cell_bounds(i, options.width, options.height);
            fill(&mut img, (x0, y0, x1, y1), opaque(color));

            if !options.hide_overlays && region.focused == Some(i) {
                draw_marker(&mut img, x0, y0, x1, y1);
            }
        }
        img
    }
}

/// Pixel bounds `[x0, x1) × [y0, y1)` of grid cell `index`, row-major.
///
/// The last column and row absorb any remainder so the cells tile the
/// image exactly.
#[allow(clippy::cast_possible_truncation)]
fn cell_bounds(index: usize, width: u32, height: u32) -> (u32, u32, u32, u32) {
    let col = index as u32 % GRID_COLS;
    let row = index as u32 / GRID_COLS;
    let cw = width / GRID_COLS;
    let ch = height / GRID_ROWS;
    let x1 = if col + 1 == GRID_COLS { width } else { (col + 1) * cw };
    let y1 = if row + 1 == GRID_ROWS { height } else { (row + 1) * ch };
    (col * cw, row * ch, x1, y1)
}

fn fill(img: &mut RgbaImage, (x0, y0, x1, y1): (u32, u32, u32, u32), px: Rgba<u8>) {
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, px);
        }
    }
}

/// A small outlined square in the cell's top-right corner.
fn draw_marker(img: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) {
    let size = ((x1 - x0).min(y1 - y0) / 8).max(3);
    let pad = size / 2;
    let right = x1.saturating_sub(pad);
    let left = right.saturating_sub(size).max(x0);
    let top = y0 + pad;
    let bottom = (top + size).min(y1);
    fill(img, (left, top, right, bottom), MARKER_OUTLINE);
    if right - left > 2 && bottom - top > 2 {
        fill(img, (left + 1, top + 1, right - 1, bottom - 1), MARKER);
    }
}

fn opaque(c: Color) -> Rgba<u8> {
    let (r, g, b) = c.channels();
    Rgba([r, g, b, 255])
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use n_color::{Palette, SimulationMode, simulate};

    fn hex(s: &str) -> Color {
        Color::parse(s).unwrap()
    }

    fn px(c: Color) -> Rgba<u8> {
        opaque(c)
    }

    const CENTERS: [(u32, u32); 4] = [(100, 100), (300, 100), (100, 300), (300, 300)];

    // ── Layout ──────────────────────────────────────────────────

    #[test]
    fn default_options() {
        let o = RasterOptions::default();
        assert_eq!((o.width, o.height), (400, 400));
        assert_eq!(o.background, None);
        assert!(o.hide_overlays);
    }

    #[test]
    fn cells_tile_odd_sizes() {
        assert_eq!(cell_bounds(0, 401, 3), (0, 0, 200, 1));
        assert_eq!(cell_bounds(1, 401, 3), (200, 0, 401, 1));
        assert_eq!(cell_bounds(3, 401, 3), (200, 1, 401, 3));
    }

    // ── Painting ────────────────────────────────────────────────

    #[test]
    fn quadrant_centers_show_simulated_swatches() {
        let palette = Palette::from_hex("#3498db").unwrap();
        let shown: Vec<Color> = palette
            .iter()
            .map(|&c| simulate(c, SimulationMode::Deuteranopia))
            .collect();
        let img = GridRasterizer.rasterize(&PaletteRegion::new(shown.clone()), &RasterOptions::default());

        assert_eq!(img.dimensions(), (400, 400));
        for (&(x, y), &c) in CENTERS.iter().zip(&shown) {
            assert_eq!(*img.get_pixel(x, y), px(c));
        }
    }

    #[test]
    fn missing_swatches_stay_transparent() {
        let img = GridRasterizer.rasterize(&PaletteRegion::new(vec![hex("#ff0000")]), &RasterOptions::default());
        assert_eq!(*img.get_pixel(100, 100), Rgba([255, 0, 0, 255]));
        for &(x, y) in &CENTERS[1..] {
            assert_eq!(img.get_pixel(x, y)[3], 0);
        }
    }

    #[test]
    fn background_color_fills_gaps() {
        let opts = RasterOptions {
            background: Some(hex("#101010")),
            ..RasterOptions::default()
        };
        let img = GridRasterizer.rasterize(&PaletteRegion::default(), &opts);
        assert_eq!(*img.get_pixel(399, 399), Rgba([16, 16, 16, 255]));
    }

    #[test]
    fn extra_swatches_are_ignored() {
        let many = vec![hex("#000000"); 6];
        let img = GridRasterizer.rasterize(&PaletteRegion::new(many), &RasterOptions::default());
        assert_eq!(*img.get_pixel(399, 399), Rgba([0, 0, 0, 255]));
    }

    // ── Overlays ────────────────────────────────────────────────

    #[test]
    fn overlays_hidden_by_default() {
        let region = PaletteRegion::new(vec![hex("#3498db"); 4]).with_focus(0);
        let img = GridRasterizer.rasterize(&region, &RasterOptions::default());
        assert!(img.pixels().all(|p| *p == px(hex("#3498db"))));
    }

    #[test]
    fn overlay_marker_when_requested() {
        let region = PaletteRegion::new(vec![hex("#3498db"); 4]).with_focus(1);
        let opts = RasterOptions {
            hide_overlays: false,
            ..RasterOptions::default()
        };
        let img = GridRasterizer.rasterize(&region, &opts);
        assert!(img.pixels().any(|p| *p == MARKER));
        // Marker sits in the focused cell only.
        for y in 0..200 {
            for x in 0..200 {
                assert_ne!(*img.get_pixel(x, y), MARKER);
            }
        }
    }
}
