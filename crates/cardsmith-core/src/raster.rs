//! Raster decoding for uploaded images.

use crate::error::{EditorError, EditorResult};
use crate::objects::ImageFormat;

/// A successfully decoded upload: the original encoded bytes plus what
/// decoding revealed about them.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRaster {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

fn looks_like_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(256)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Validate and decode raw image bytes.
///
/// The whole image is decoded, not just the header, so corrupt uploads are
/// rejected before any scene state is touched.
pub fn decode(bytes: Vec<u8>) -> EditorResult<DecodedRaster> {
    if looks_like_svg(&bytes) {
        return Err(EditorError::UnsupportedImage("svg".to_string()));
    }
    let format = ImageFormat::from_magic_bytes(&bytes)
        .ok_or_else(|| EditorError::UnsupportedImage("unrecognized file signature".to_string()))?;
    let decoded =
        image::load_from_memory(&bytes).map_err(|e| EditorError::ImageDecode(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(EditorError::ImageDecode("image has no pixels".to_string()));
    }
    log::debug!("Decoded {:?} image {}x{}", format, width, height);
    Ok(DecodedRaster {
        bytes,
        format,
        width,
        height,
    })
}

/// Encode a solid-color PNG. Used by tests and placeholder assets.
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let buffer = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    // Writing PNG into memory only fails on zero-sized images.
    if image::DynamicImage::ImageRgba8(buffer)
        .write_to(&mut out, image::ImageFormat::Png)
        .is_err()
    {
        return Vec::new();
    }
    out.into_inner()
}
