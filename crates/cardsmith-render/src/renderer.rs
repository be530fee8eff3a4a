//! Shared render types.

use cardsmith_core::overlay::ARROW_HEAD_LENGTH;
use cardsmith_core::{DistanceIndicator, SerializableColor};
use kurbo::{BezPath, Point, Vec2};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid output size: {0}")]
    InvalidSize(String),
    #[error("Image decode failed: {0}")]
    Decode(String),
    #[error("Image encode failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Split a color into an opaque hex string and an opacity, for SVG attributes.
pub(crate) fn svg_paint(color: SerializableColor) -> (String, f64) {
    let opaque = SerializableColor::new(color.r, color.g, color.b, 255);
    (opaque.to_hex(), color.a as f64 / 255.0)
}

/// The two arrow heads of a distance indicator, as closed triangles,
/// sized in the same units as the indicator's points.
pub(crate) fn arrow_heads(indicator: &DistanceIndicator, head_length: f64) -> [BezPath; 2] {
    let axis = indicator.end - indicator.start;
    let length = axis.hypot();
    let dir = if length > 0.0 { axis / length } else { Vec2::new(1.0, 0.0) };
    let head = head_length.min(length / 2.0);
    [
        triangle(indicator.start, dir, head),
        triangle(indicator.end, -dir, head),
    ]
}

/// Default head size in canvas units.
pub(crate) fn default_arrow_heads(indicator: &DistanceIndicator) -> [BezPath; 2] {
    arrow_heads(indicator, ARROW_HEAD_LENGTH)
}

fn triangle(tip: Point, dir: Vec2, length: f64) -> BezPath {
    let normal = Vec2::new(-dir.y, dir.x) * (length / 2.0);
    let base = tip + dir * length;
    let mut path = BezPath::new();
    path.move_to(tip);
    path.line_to(base + normal);
    path.line_to(base - normal);
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardsmith_core::{Axis, ObjectId};
    use kurbo::Shape;

    #[test]
    fn test_arrow_heads_point_outwards() {
        let indicator = DistanceIndicator {
            axis: Axis::X,
            target: ObjectId::new_v4(),
            start: Point::new(0.0, 10.0),
            end: Point::new(40.0, 10.0),
            gap: 40.0,
            label: "40".to_string(),
        };
        let [left, right] = arrow_heads(&indicator, 5.0);
        let left_box = left.bounding_box();
        let right_box = right.bounding_box();
        assert!((left_box.x0 - 0.0).abs() < 1e-9 && (left_box.x1 - 5.0).abs() < 1e-9);
        assert!((right_box.x0 - 35.0).abs() < 1e-9 && (right_box.x1 - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_svg_paint_splits_alpha() {
        let (hex, opacity) = svg_paint(SerializableColor::new(236, 72, 153, 51));
        assert_eq!(hex, "#ec4899");
        assert!((opacity - 0.2).abs() < 1e-9);
    }
}
