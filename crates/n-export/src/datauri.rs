//! PNG data URIs (`data:image/png;base64,…`).

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};

use crate::error::ExportError;

const PNG_PREFIX: &str = "data:image/png;base64,";

/// Encode `image` as PNG and wrap it in a data URI.
///
/// # Errors
///
/// [`ExportError::Encode`] if the PNG encoder fails.
pub fn encode_png_data_uri(image: &RgbaImage) -> Result<String, ExportError> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    let mut uri = String::with_capacity(PNG_PREFIX.len() + png.len() * 4 / 3 + 4);
    uri.push_str(PNG_PREFIX);
    STANDARD.encode_string(&png, &mut uri);
    Ok(uri)
}

/// Payload bytes of a base64 data URI of any media type.
///
/// # Errors
///
/// [`ExportError::MalformedDataUri`] without the `data:` scheme or the
/// `;base64,` marker, [`ExportError::Base64`] for a bad payload.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ExportError> {
    let rest = uri.strip_prefix("data:").ok_or(ExportError::MalformedDataUri)?;
    let (meta, payload) = rest.split_once(',').ok_or(ExportError::MalformedDataUri)?;
    if !meta.ends_with(";base64") {
        return Err(ExportError::MalformedDataUri);
    }
    Ok(STANDARD.decode(payload)?)
}
