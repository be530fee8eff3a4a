//! Overlay surface that paints guides into a transparent RGBA layer.

use crate::pixels::PixelCanvas;
use crate::renderer::arrow_heads;
use cardsmith_core::overlay::{ARROW_HEAD_LENGTH, GUIDE_COLOR, GUIDE_STROKE_WIDTH};
use cardsmith_core::{DistanceIndicator, GuideLine, OverlaySurface, SerializableColor};
use image::RgbaImage;
use kurbo::{Affine, BezPath, Point, Rect, Size};

/// Pixel size of one cell of the label glyphs.
const GLYPH_SCALE: f64 = 2.0;
const GLYPH_WIDTH: f64 = 3.0;
const GLYPH_HEIGHT: f64 = 5.0;
const LABEL_PADDING: f64 = 3.0;

/// 3x5 bitmaps for the characters that appear in distance labels.
fn glyph(c: char) -> Option<[u8; 5]> {
    Some(match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        _ => return None,
    })
}

/// Paints guides in screen pixels. Geometry arrives in canvas coordinates
/// and is mapped through the viewport transform; line widths and labels
/// keep a constant pixel size at any zoom.
#[derive(Debug, Clone)]
pub struct RasterOverlay {
    canvas: PixelCanvas,
}

impl RasterOverlay {
    /// `transform` maps canvas coordinates to layer pixels, typically
    /// `Viewport::transform()`.
    pub fn new(width: u32, height: u32, transform: Affine) -> Self {
        Self {
            canvas: PixelCanvas::new(width, height, transform),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        self.canvas.image()
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas.into_image()
    }

    /// Whether any pixel has been painted.
    pub fn is_blank(&self) -> bool {
        self.canvas.image().pixels().all(|p| p.0[3] == 0)
    }

    fn zoom(&self) -> f64 {
        self.canvas.transform().as_coeffs()[0].abs().max(f64::EPSILON)
    }

    fn draw_label(&mut self, text: &str, center: Point) {
        let color = SerializableColor::from(GUIDE_COLOR);
        let glyphs: Vec<[u8; 5]> = text.chars().filter_map(glyph).collect();
        if glyphs.is_empty() {
            return;
        }
        let advance = (GLYPH_WIDTH + 1.0) * GLYPH_SCALE;
        let text_size = Size::new(
            glyphs.len() as f64 * advance - GLYPH_SCALE,
            GLYPH_HEIGHT * GLYPH_SCALE,
        );
        let device_center = self.canvas.transform() * center;
        let text_origin = device_center - text_size.to_vec2() / 2.0;
        let pill = Rect::from_origin_size(text_origin, text_size).inflate(LABEL_PADDING, LABEL_PADDING);
        self.canvas.fill_device_rect(pill, color, 1.0);

        let white = SerializableColor::white();
        for (i, rows) in glyphs.iter().enumerate() {
            let x = text_origin.x + i as f64 * advance;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..3 {
                    if bits & (0b100 >> col) == 0 {
                        continue;
                    }
                    let cell = Rect::from_origin_size(
                        Point::new(
                            x + col as f64 * GLYPH_SCALE,
                            text_origin.y + row as f64 * GLYPH_SCALE,
                        ),
                        Size::new(GLYPH_SCALE, GLYPH_SCALE),
                    );
                    self.canvas.fill_device_rect(cell, white, 1.0);
                }
            }
        }
    }
}

impl OverlaySurface for RasterOverlay {
    fn clear(&mut self) {
        self.canvas.clear();
    }

    fn draw_guide_line(&mut self, line: &GuideLine) {
        let mut path = BezPath::new();
        path.move_to(line.start);
        path.line_to(line.end);
        let width = GUIDE_STROKE_WIDTH / self.zoom();
        self.canvas
            .stroke_path(&path, width, SerializableColor::from(GUIDE_COLOR), 1.0);
    }

    fn draw_distance_indicator(&mut self, indicator: &DistanceIndicator) {
        let color = SerializableColor::from(GUIDE_COLOR);
        let zoom = self.zoom();
        let mut path = BezPath::new();
        path.move_to(indicator.start);
        path.line_to(indicator.end);
        self.canvas.stroke_path(&path, GUIDE_STROKE_WIDTH / zoom, color, 1.0);
        for head in arrow_heads(indicator, ARROW_HEAD_LENGTH / zoom) {
            self.canvas.fill_path(&head, color, 1.0);
        }
        self.draw_label(&indicator.label, indicator.label_position());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardsmith_core::objects::{ShapeKind, ShapeObject};
    use cardsmith_core::{GuideConfig, GuideFrame, SceneObject, compute_guides, paint_overlay};

    fn frame_with_gap() -> GuideFrame {
        let other = SceneObject::Shape(ShapeObject::new(
            ShapeKind::rectangle(),
            Point::new(190.0, 120.0),
            100.0,
            60.0,
        ));
        compute_guides(
            Rect::new(100.0, 100.0, 150.0, 200.0),
            &[],
            &[other],
            Rect::new(0.0, 0.0, 600.0, 840.0),
            &GuideConfig::default(),
        )
    }

    #[test]
    fn test_guides_paint_pixels_and_clear() {
        let mut overlay = RasterOverlay::new(300, 300, Affine::IDENTITY);
        paint_overlay(&frame_with_gap(), &mut overlay);
        assert!(!overlay.is_blank());
        // Label pill sits on the gap midpoint.
        assert_ne!(overlay.image().get_pixel(170, 150).0[3], 0);

        paint_overlay(&GuideFrame::default(), &mut overlay);
        assert!(overlay.is_blank());
    }

    #[test]
    fn test_vertical_guide_follows_viewport() {
        let frame = compute_guides(
            Rect::new(250.0, 10.0, 350.0, 50.0),
            &[],
            &[],
            Rect::new(0.0, 0.0, 600.0, 840.0),
            &GuideConfig::default(),
        );
        let mut overlay = RasterOverlay::new(200, 200, Affine::scale(0.25));
        paint_overlay(&frame, &mut overlay);
        // Canvas x = 300 lands on pixel column 75.
        assert_ne!(overlay.image().get_pixel(75, 100).0[3], 0);
        assert_eq!(overlay.image().get_pixel(80, 100).0[3], 0);
    }

    #[test]
    fn test_glyphs_cover_digits() {
        for c in "0123456789-".chars() {
            assert!(glyph(c).is_some());
        }
        assert!(glyph('x').is_none());
    }
}
