//! Geometric shapes: rectangles, circles, triangles and lines.

use super::{
    ObjectId, ObjectTrait, PropertyUpdate, SerializableColor, default_opacity, default_true,
    set_if_changed,
};
use kurbo::{Affine, BezPath, Ellipse, Point, Rect, RoundedRect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The geometric primitive drawn by a [`ShapeObject`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ShapeKind {
    /// Rectangle with optional rounded corners.
    Rectangle {
        #[serde(default)]
        corner_radius: f64,
    },
    /// Circle (or ellipse when width and height differ).
    Circle,
    /// Isosceles triangle pointing up.
    Triangle,
    /// Horizontal line spanning the frame width.
    Line,
}

impl ShapeKind {
    /// A rectangle with sharp corners.
    pub fn rectangle() -> Self {
        ShapeKind::Rectangle { corner_radius: 0.0 }
    }

    /// Whether the primitive encloses an area that can be filled.
    pub fn is_fillable(&self) -> bool {
        !matches!(self, ShapeKind::Line)
    }
}

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color (None = no fill).
    pub fill: Option<SerializableColor>,
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width (0 = no stroke).
    pub stroke_width: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: Some(SerializableColor::new(0xd4, 0xa5, 0x74, 255)),
            stroke_color: SerializableColor::black(),
            stroke_width: 0.0,
            opacity: 1.0,
        }
    }
}

impl ShapeStyle {
    /// Style used for lines: no fill, visible stroke.
    pub fn line() -> Self {
        Self {
            fill: None,
            stroke_color: SerializableColor::new(0x33, 0x33, 0x33, 255),
            stroke_width: 2.0,
            opacity: 1.0,
        }
    }
}

/// A shape object on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeObject {
    pub(crate) id: ObjectId,
    pub kind: ShapeKind,
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation angle in degrees (around center).
    #[serde(default)]
    pub rotation: f64,
    pub style: ShapeStyle,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub exclude_from_export: bool,
}

impl ShapeObject {
    /// Create a new shape with the default style for its kind.
    pub fn new(kind: ShapeKind, position: Point, width: f64, height: f64) -> Self {
        let style = match kind {
            ShapeKind::Line => ShapeStyle::line(),
            _ => ShapeStyle::default(),
        };
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            width,
            height,
            rotation: 0.0,
            style,
            visible: true,
            exclude_from_export: false,
        }
    }

    /// Replace the style.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Corner radius, if this is a rectangle.
    pub fn corner_radius(&self) -> Option<f64> {
        match self.kind {
            ShapeKind::Rectangle { corner_radius } => Some(corner_radius),
            _ => None,
        }
    }

    /// Outline path in canvas coordinates (rotation applied).
    pub fn to_path(&self) -> BezPath {
        let frame = self.frame();
        let path = match self.kind {
            ShapeKind::Rectangle { corner_radius } if corner_radius > 0.0 => {
                let radius = corner_radius.min(frame.width() / 2.0).min(frame.height() / 2.0);
                RoundedRect::from_rect(frame, radius).to_path(0.1)
            }
            ShapeKind::Rectangle { .. } => frame.to_path(0.1),
            ShapeKind::Circle => Ellipse::from_rect(frame).to_path(0.1),
            ShapeKind::Triangle => {
                let mut path = BezPath::new();
                path.move_to(Point::new(frame.center().x, frame.y0));
                path.line_to(Point::new(frame.x1, frame.y1));
                path.line_to(Point::new(frame.x0, frame.y1));
                path.close_path();
                path
            }
            ShapeKind::Line => {
                let y = frame.center().y;
                let mut path = BezPath::new();
                path.move_to(Point::new(frame.x0, y));
                path.line_to(Point::new(frame.x1, y));
                path
            }
        };
        if self.rotation == 0.0 {
            path
        } else {
            Affine::rotate_about(self.rotation.to_radians(), frame.center()) * path
        }
    }

    pub(crate) fn apply_property(&mut self, update: &PropertyUpdate) -> bool {
        match update {
            PropertyUpdate::Fill(fill) if self.kind.is_fillable() => {
                set_if_changed(&mut self.style.fill, *fill)
            }
            PropertyUpdate::Stroke(color) => set_if_changed(&mut self.style.stroke_color, *color),
            PropertyUpdate::StrokeWidth(width) => {
                set_if_changed(&mut self.style.stroke_width, width.max(0.0))
            }
            PropertyUpdate::CornerRadius(radius) => match &mut self.kind {
                ShapeKind::Rectangle { corner_radius } => {
                    set_if_changed(corner_radius, radius.max(0.0))
                }
                _ => false,
            },
            PropertyUpdate::Opacity(opacity) => {
                set_if_changed(&mut self.style.opacity, opacity.clamp(0.0, 1.0))
            }
            PropertyUpdate::Fill(_)
            | PropertyUpdate::TextFill(_)
            | PropertyUpdate::FontFamily(_)
            | PropertyUpdate::FontSize(_)
            | PropertyUpdate::FontWeight(_)
            | PropertyUpdate::CharSpacing(_)
            | PropertyUpdate::LineHeight(_) => false,
        }
    }
}

impl ObjectTrait for ShapeObject {
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
        self.style.opacity
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
    fn test_frame_and_bounds() {
        let shape = ShapeObject::new(ShapeKind::rectangle(), Point::new(10.0, 20.0), 100.0, 50.0);
        let bounds = shape.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_rotated() {
        let mut shape = ShapeObject::new(ShapeKind::rectangle(), Point::new(0.0, 0.0), 100.0, 10.0);
        assert!(shape.hit_test(Point::new(90.0, 5.0), 0.0));
        shape.rotation = 90.0;
        // Long axis is now vertical through x = 50.
        assert!(!shape.hit_test(Point::new(90.0, 5.0), 0.0));
        assert!(shape.hit_test(Point::new(50.0, 45.0), 0.0));
    }

    #[test]
    fn test_corner_radius_only_on_rectangles() {
        let mut rect = ShapeObject::new(ShapeKind::rectangle(), Point::ZERO, 10.0, 10.0);
        let mut circle = ShapeObject::new(ShapeKind::Circle, Point::ZERO, 10.0, 10.0);
        assert!(rect.apply_property(&PropertyUpdate::CornerRadius(4.0)));
        assert_eq!(rect.corner_radius(), Some(4.0));
        assert!(!circle.apply_property(&PropertyUpdate::CornerRadius(4.0)));
        assert_eq!(circle.corner_radius(), None);
    }

    #[test]
    fn test_line_ignores_fill() {
        let mut line = ShapeObject::new(ShapeKind::Line, Point::ZERO, 100.0, 0.0);
        let red = SerializableColor::new(255, 0, 0, 255);
        assert!(!line.apply_property(&PropertyUpdate::Fill(Some(red))));
        assert!(line.apply_property(&PropertyUpdate::Stroke(red)));
        assert_eq!(line.style.stroke_color, red);
    }

    #[test]
    fn test_unchanged_value_reports_false() {
        let mut rect = ShapeObject::new(ShapeKind::rectangle(), Point::ZERO, 10.0, 10.0);
        assert!(!rect.apply_property(&PropertyUpdate::Opacity(1.0)));
        assert!(rect.apply_property(&PropertyUpdate::Opacity(0.5)));
    }

    #[test]
    fn test_triangle_path_contains_centroid() {
        let tri = ShapeObject::new(ShapeKind::Triangle, Point::ZERO, 90.0, 90.0);
        let path = tri.to_path();
        assert!(path.contains(Point::new(45.0, 60.0)));
        assert!(!path.contains(Point::new(2.0, 2.0)));
    }
}
