//! Image objects embedding raster data.

use super::{
    ObjectId, ObjectTrait, PropertyUpdate, default_opacity, default_true, set_if_changed,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Image format for stored image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// A raster image placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObject {
    pub(crate) id: ObjectId,
    /// Top-left corner position.
    pub position: Point,
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
    /// Original image width in pixels.
    pub source_width: u32,
    /// Original image height in pixels.
    pub source_height: u32,
    pub format: ImageFormat,
    /// Encoded image bytes, base64 so the scene stays plain JSON.
    pub data_base64: String,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub exclude_from_export: bool,
}

impl ImageObject {
    /// Create an image displayed at its natural size.
    pub fn new(
        position: Point,
        data: &[u8],
        source_width: u32,
        source_height: u32,
        format: ImageFormat,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: source_width as f64,
            height: source_height as f64,
            source_width,
            source_height,
            format,
            data_base64: STANDARD.encode(data),
            rotation: 0.0,
            opacity: 1.0,
            visible: true,
            exclude_from_export: false,
        }
    }

    /// Scale down to fit within max dimensions while preserving aspect ratio.
    /// Images already inside the box keep their size.
    pub fn fit_within(mut self, max_width: f64, max_height: f64) -> Self {
        if self.source_width == 0 || self.source_height == 0 {
            return self;
        }
        let scale = (max_width / self.source_width as f64)
            .min(max_height / self.source_height as f64)
            .min(1.0);
        self.width = self.source_width as f64 * scale;
        self.height = self.source_height as f64 * scale;
        self
    }

    /// Get the raw image data (decoded from base64).
    pub fn data(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.data_base64).ok()
    }

    pub(crate) fn apply_property(&mut self, update: &PropertyUpdate) -> bool {
        match update {
            PropertyUpdate::Opacity(opacity) => {
                set_if_changed(&mut self.opacity, opacity.clamp(0.0, 1.0))
            }
            _ => false,
        }
    }
}

impl ObjectTrait for ImageObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn frame(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn opacity(&self) -> f64 {
        self.opacity
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_exportable(&self) -> bool {
        !self.exclude_from_export
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"<svg"), None);
    }

    #[test]
    fn test_fit_within() {
        let img = ImageObject::new(Point::ZERO, &[0u8; 4], 1000, 500, ImageFormat::Png);
        let fitted = img.fit_within(400.0, 400.0);
        assert!((fitted.width - 400.0).abs() < 0.01);
        assert!((fitted.height - 200.0).abs() < 0.01);

        let small = ImageObject::new(Point::ZERO, &[0u8; 4], 50, 20, ImageFormat::Png);
        let kept = small.fit_within(400.0, 400.0);
        assert!((kept.width - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_data_roundtrip() {
        let bytes = [1u8, 2, 3, 250];
        let img = ImageObject::new(Point::ZERO, &bytes, 1, 1, ImageFormat::Png);
        assert_eq!(img.data().as_deref(), Some(&bytes[..]));
    }
}
