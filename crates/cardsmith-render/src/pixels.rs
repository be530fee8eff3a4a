//! Minimal software rasterizer over an RGBA buffer.

use cardsmith_core::SerializableColor;
use image::{Rgba, RgbaImage};
use kurbo::{Affine, BezPath, ParamCurveNearest, Point, Rect, Shape};

/// Accuracy for nearest-point queries on curved segments.
const NEAREST_ACCURACY: f64 = 1e-3;

/// An RGBA pixel buffer with a canvas → pixel transform.
///
/// Coverage is sampled once at each pixel center; there is no
/// anti-aliasing.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    image: RgbaImage,
    transform: Affine,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32, transform: Affine) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            transform,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Reset every pixel to fully transparent.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: SerializableColor) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([color.r, color.g, color.b, color.a]);
        }
    }

    /// Fill the interior of a closed path given in canvas coordinates.
    pub fn fill_path(&mut self, path: &BezPath, color: SerializableColor, opacity: f64) {
        let mut device = path.clone();
        device.apply_affine(self.transform);
        let Some((x0, y0, x1, y1)) = self.pixel_span(device.bounding_box()) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                if device.contains(pixel_center(x, y)) {
                    self.blend(x, y, color, opacity);
                }
            }
        }
    }

    /// Stroke a path given in canvas coordinates. `width` is in canvas units.
    pub fn stroke_path(&mut self, path: &BezPath, width: f64, color: SerializableColor, opacity: f64) {
        let mut device = path.clone();
        device.apply_affine(self.transform);
        let half = (width * self.transform.as_coeffs()[0].abs()).max(1.0) / 2.0;
        let Some((x0, y0, x1, y1)) = self.pixel_span(device.bounding_box().inflate(half, half))
        else {
            return;
        };
        let segments: Vec<_> = device.segments().collect();
        let limit = half * half;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = pixel_center(x, y);
                if segments
                    .iter()
                    .any(|seg| seg.nearest(p, NEAREST_ACCURACY).distance_sq <= limit)
                {
                    self.blend(x, y, color, opacity);
                }
            }
        }
    }

    /// Fill an axis-aligned rectangle given in canvas coordinates.
    pub fn fill_rect(&mut self, rect: Rect, color: SerializableColor, opacity: f64) {
        self.fill_path(&rect.to_path(0.1), color, opacity);
    }

    /// Fill a rectangle given directly in pixel coordinates.
    pub fn fill_device_rect(&mut self, rect: Rect, color: SerializableColor, opacity: f64) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                if rect.contains(pixel_center(x, y)) {
                    self.blend(x, y, color, opacity);
                }
            }
        }
    }

    /// Draw `source` stretched over `dest` (canvas coordinates), rotated by
    /// `rotation` degrees around the center of `dest`. Nearest-neighbour
    /// sampling.
    pub fn draw_image(&mut self, source: &RgbaImage, dest: Rect, rotation: f64, opacity: f64) {
        if source.width() == 0 || source.height() == 0 || dest.width() <= 0.0 || dest.height() <= 0.0
        {
            return;
        }
        let placement = self.transform * Affine::rotate_about(rotation.to_radians(), dest.center());
        let inverse = placement.inverse();
        let device_bounds = placement.transform_rect_bbox(dest);
        let Some((x0, y0, x1, y1)) = self.pixel_span(device_bounds) else {
            return;
        };
        let sx = source.width() as f64 / dest.width();
        let sy = source.height() as f64 / dest.height();
        for y in y0..y1 {
            for x in x0..x1 {
                let local = inverse * pixel_center(x, y);
                if !dest.contains(local) {
                    continue;
                }
                let u = (((local.x - dest.x0) * sx) as u32).min(source.width() - 1);
                let v = (((local.y - dest.y0) * sy) as u32).min(source.height() - 1);
                let Rgba([r, g, b, a]) = *source.get_pixel(u, v);
                self.blend(x, y, SerializableColor::new(r, g, b, a), opacity);
            }
        }
    }

    /// Source-over blend of `color` at `opacity` into one pixel.
    fn blend(&mut self, x: u32, y: u32, color: SerializableColor, opacity: f64) {
        let alpha = (color.a as f64 / 255.0) * opacity.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let Rgba(dst) = self.image.get_pixel_mut(x, y);
        let dst_alpha = dst[3] as f64 / 255.0;
        let out_alpha = alpha + dst_alpha * (1.0 - alpha);
        let mix = |src: u8, dst: u8| -> u8 {
            let value = (src as f64 * alpha + dst as f64 * dst_alpha * (1.0 - alpha)) / out_alpha;
            value.round().clamp(0.0, 255.0) as u8
        };
        *dst = [
            mix(color.r, dst[0]),
            mix(color.g, dst[1]),
            mix(color.b, dst[2]),
            (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
        ];
    }

    /// Pixel rows and columns touched by a device-space rectangle, clipped
    /// to the buffer.
    fn pixel_span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x0.floor().max(0.0);
        let y0 = rect.y0.floor().max(0.0);
        let x1 = rect.x1.ceil().min(self.image.width() as f64);
        let y1 = rect.y1.ceil().min(self.image.height() as f64);
        (x0 < x1 && y0 < y1).then(|| (x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

fn pixel_center(x: u32, y: u32) -> Point {
    Point::new(x as f64 + 0.5, y as f64 + 0.5)
}
