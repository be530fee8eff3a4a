//! Viewport transform for pan/zoom.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Maps canvas coordinates to screen coordinates.
///
/// Pointer events arrive in screen space; everything in the scene lives in
/// canvas space. The viewport is runtime state and is not serialized with
/// the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 8.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas → screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen → canvas transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let anchor = self.screen_to_canvas(screen_point);
        self.zoom = new_zoom;
        let moved = self.canvas_to_screen(anchor);
        self.offset += screen_point - moved;
    }

    /// Zoom and center so the whole canvas fits the view with padding.
    pub fn fit_canvas(&mut self, canvas: Size, view: Size, padding: f64) {
        if canvas.is_zero_area() {
            *self = Self::default();
            return;
        }
        let available = Size::new(
            (view.width - padding * 2.0).max(1.0),
            (view.height - padding * 2.0).max(1.0),
        );
        self.zoom = (available.width / canvas.width)
            .min(available.height / canvas.height)
            .clamp(self.min_zoom, self.max_zoom);
        let canvas_center = Rect::from_origin_size(Point::ZERO, canvas).center();
        self.offset = Vec2::new(
            view.width / 2.0 - canvas_center.x * self.zoom,
            view.height / 2.0 - canvas_center.y * self.zoom,
        );
    }
}
