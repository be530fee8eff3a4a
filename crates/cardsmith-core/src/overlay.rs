//! Overlay pass drawn above the scene.

use crate::guides::{DistanceIndicator, GuideFrame, GuideLine};
use peniko::Color;

/// Guide color (pink, semi-transparent).
pub const GUIDE_COLOR: Color = Color::from_rgba8(236, 72, 153, 200);
/// Guide stroke width in canvas units.
pub const GUIDE_STROKE_WIDTH: f64 = 1.0;
/// Arrow head length for distance indicators.
pub const ARROW_HEAD_LENGTH: f64 = 5.0;

/// A drawing target for transient guides.
///
/// The overlay is repainted from scratch every frame, so implementations
/// only need to support clearing and the two primitives.
pub trait OverlaySurface {
    fn clear(&mut self);
    fn draw_guide_line(&mut self, line: &GuideLine);
    fn draw_distance_indicator(&mut self, indicator: &DistanceIndicator);
}

/// Clear `surface` and draw every guide and indicator in `frame`.
pub fn paint_overlay<S: OverlaySurface + ?Sized>(frame: &GuideFrame, surface: &mut S) {
    surface.clear();
    for line in frame.lines() {
        surface.draw_guide_line(&line);
    }
    for indicator in &frame.indicators {
        surface.draw_distance_indicator(indicator);
    }
}
