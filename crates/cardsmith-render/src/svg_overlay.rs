//! Overlay surface that emits an SVG layer for stacking above the scene.

use crate::renderer::{default_arrow_heads, svg_paint};
use cardsmith_core::overlay::{GUIDE_COLOR, GUIDE_STROKE_WIDTH};
use cardsmith_core::{DistanceIndicator, GuideLine, OverlaySurface, SerializableColor};
use kurbo::Size;
use std::fmt::Write;

/// Label font size in canvas units.
const LABEL_FONT_SIZE: f64 = 11.0;

/// Collects guide primitives as SVG elements in canvas coordinates.
#[derive(Debug, Clone)]
pub struct SvgOverlay {
    size: Size,
    elements: Vec<String>,
}

impl SvgOverlay {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            elements: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of drawn elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// The overlay as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" pointer-events="none">"#,
            w = self.size.width,
            h = self.size.height
        );
        for element in &self.elements {
            out.push_str(element);
        }
        out.push_str("</svg>");
        out
    }
}

impl OverlaySurface for SvgOverlay {
    fn clear(&mut self) {
        self.elements.clear();
    }

    fn draw_guide_line(&mut self, line: &GuideLine) {
        let (stroke, opacity) = svg_paint(SerializableColor::from(GUIDE_COLOR));
        self.elements.push(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-opacity="{:.2}" stroke-width="{}"/>"#,
            line.start.x, line.start.y, line.end.x, line.end.y, stroke, opacity, GUIDE_STROKE_WIDTH
        ));
    }

    fn draw_distance_indicator(&mut self, indicator: &DistanceIndicator) {
        let (color, opacity) = svg_paint(SerializableColor::from(GUIDE_COLOR));
        let mut group = format!(r#"<g class="distance" fill="{color}" stroke="{color}">"#);
        let _ = write!(
            group,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke-opacity="{:.2}" stroke-width="{}"/>"#,
            indicator.start.x,
            indicator.start.y,
            indicator.end.x,
            indicator.end.y,
            opacity,
            GUIDE_STROKE_WIDTH
        );
        for head in default_arrow_heads(indicator) {
            let _ = write!(group, r#"<path d="{}" stroke="none"/>"#, head.to_svg());
        }
        let anchor = indicator.label_position();
        let _ = write!(
            group,
            r#"<text x="{}" y="{}" font-size="{}" text-anchor="middle" dominant-baseline="middle" stroke="none">{}</text>"#,
            anchor.x, anchor.y, LABEL_FONT_SIZE, indicator.label
        );
        group.push_str("</g>");
        self.elements.push(group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardsmith_core::{GuideConfig, SceneObject, compute_guides, paint_overlay};
    use cardsmith_core::objects::{ShapeKind, ShapeObject};
    use kurbo::{Point, Rect};

    fn neighbour_frame() -> cardsmith_core::GuideFrame {
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
    fn test_indicator_markup() {
        let mut overlay = SvgOverlay::new(Size::new(600.0, 840.0));
        paint_overlay(&neighbour_frame(), &mut overlay);
        assert_eq!(overlay.len(), 1);
        let svg = overlay.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">40</text>"));
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn test_repaint_replaces_previous_frame() {
        let mut overlay = SvgOverlay::new(Size::new(600.0, 840.0));
        paint_overlay(&neighbour_frame(), &mut overlay);
        paint_overlay(&cardsmith_core::GuideFrame::default(), &mut overlay);
        assert!(overlay.is_empty());
        assert!(!overlay.to_svg().contains("<line"));
    }
}
