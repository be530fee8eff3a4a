//! Scene objects placed on the invitation canvas.

mod image;
mod shape;
mod text;

pub use image::{ImageFormat, ImageObject};
pub use shape::{ShapeKind, ShapeObject, ShapeStyle};
pub use text::{FontWeight, TextAlign, TextObject, TextPreset, TextStyle};

use kurbo::{Affine, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for scene objects.
pub type ObjectId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. Returns `None` on anything else.
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                channel(&hex[0..1])? * 17,
                channel(&hex[1..2])? * 17,
                channel(&hex[2..3])? * 17,
                255,
            )),
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Scale alpha by an opacity factor in `0.0..=1.0`.
    pub fn with_opacity(&self, opacity: f64) -> Self {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self::new(self.r, self.g, self.b, alpha)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// A single property change issued from the property panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyUpdate {
    /// Shape fill (`None` clears it).
    Fill(Option<SerializableColor>),
    /// Shape stroke color.
    Stroke(SerializableColor),
    /// Shape stroke width.
    StrokeWidth(f64),
    /// Rectangle corner radius.
    CornerRadius(f64),
    /// Opacity of any object.
    Opacity(f64),
    /// Text fill color.
    TextFill(SerializableColor),
    FontFamily(String),
    FontSize(f64),
    FontWeight(FontWeight),
    /// Character spacing in 1/1000 em.
    CharSpacing(f64),
    /// Line height multiplier.
    LineHeight(f64),
}

impl PropertyUpdate {
    /// Short label used for history entries.
    pub fn label(&self) -> &'static str {
        match self {
            PropertyUpdate::Fill(_) => "Change fill",
            PropertyUpdate::Stroke(_) => "Change stroke",
            PropertyUpdate::StrokeWidth(_) => "Change stroke width",
            PropertyUpdate::CornerRadius(_) => "Change corner radius",
            PropertyUpdate::Opacity(_) => "Change opacity",
            PropertyUpdate::TextFill(_) => "Change text color",
            PropertyUpdate::FontFamily(_) => "Change font",
            PropertyUpdate::FontSize(_) => "Change font size",
            PropertyUpdate::FontWeight(_) => "Change font weight",
            PropertyUpdate::CharSpacing(_) => "Change character spacing",
            PropertyUpdate::LineHeight(_) => "Change line height",
        }
    }

    /// False for NaN or infinite numeric values, which JSON cannot hold.
    pub fn is_finite(&self) -> bool {
        match self {
            PropertyUpdate::StrokeWidth(v)
            | PropertyUpdate::CornerRadius(v)
            | PropertyUpdate::Opacity(v)
            | PropertyUpdate::FontSize(v)
            | PropertyUpdate::CharSpacing(v)
            | PropertyUpdate::LineHeight(v) => v.is_finite(),
            PropertyUpdate::Fill(_)
            | PropertyUpdate::Stroke(_)
            | PropertyUpdate::TextFill(_)
            | PropertyUpdate::FontFamily(_)
            | PropertyUpdate::FontWeight(_) => true,
        }
    }
}

/// Common behaviour of every object variant.
pub trait ObjectTrait {
    /// Get the unique identifier.
    fn id(&self) -> ObjectId;

    /// Unrotated frame (position + size) in canvas coordinates.
    fn frame(&self) -> Rect;

    /// Rotation in degrees around the frame center.
    fn rotation(&self) -> f64;

    /// Overall opacity.
    fn opacity(&self) -> f64;

    /// Whether the object is drawn at all.
    fn is_visible(&self) -> bool;

    /// Whether the object ends up in exported artifacts.
    fn is_exportable(&self) -> bool;

    /// Move the object by a delta.
    fn translate(&mut self, delta: Vec2);

    /// Axis-aligned bounding box in canvas coordinates, accounting for rotation.
    fn bounds(&self) -> Rect {
        rotated_bounds(self.frame(), self.rotation())
    }

    /// Check if a point (in canvas coordinates) hits this object.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let frame = self.frame();
        let rotation = self.rotation();
        let local = if rotation == 0.0 {
            point
        } else {
            Affine::rotate_about(-rotation.to_radians(), frame.center()) * point
        };
        frame.inflate(tolerance, tolerance).contains(local)
    }
}

/// Bounding box of `rect` rotated by `degrees` around its center.
pub fn rotated_bounds(rect: Rect, degrees: f64) -> Rect {
    if degrees.rem_euclid(360.0) == 0.0 {
        return rect;
    }
    Affine::rotate_about(degrees.to_radians(), rect.center()).transform_rect_bbox(rect)
}

/// Discriminant of a [`SceneObject`], handy for toolbar state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Text,
    Shape,
    Image,
}

/// An editable primitive on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneObject {
    Text(TextObject),
    Shape(ShapeObject),
    Image(ImageObject),
}

impl SceneObject {
    pub fn id(&self) -> ObjectId {
        match self {
            SceneObject::Text(o) => o.id(),
            SceneObject::Shape(o) => o.id(),
            SceneObject::Image(o) => o.id(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            SceneObject::Text(_) => ObjectKind::Text,
            SceneObject::Shape(_) => ObjectKind::Shape,
            SceneObject::Image(_) => ObjectKind::Image,
        }
    }

    pub fn frame(&self) -> Rect {
        match self {
            SceneObject::Text(o) => o.frame(),
            SceneObject::Shape(o) => o.frame(),
            SceneObject::Image(o) => o.frame(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            SceneObject::Text(o) => o.bounds(),
            SceneObject::Shape(o) => o.bounds(),
            SceneObject::Image(o) => o.bounds(),
        }
    }

    pub fn rotation(&self) -> f64 {
        match self {
            SceneObject::Text(o) => o.rotation(),
            SceneObject::Shape(o) => o.rotation(),
            SceneObject::Image(o) => o.rotation(),
        }
    }

    pub fn opacity(&self) -> f64 {
        match self {
            SceneObject::Text(o) => o.opacity(),
            SceneObject::Shape(o) => o.opacity(),
            SceneObject::Image(o) => o.opacity(),
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            SceneObject::Text(o) => o.is_visible(),
            SceneObject::Shape(o) => o.is_visible(),
            SceneObject::Image(o) => o.is_visible(),
        }
    }

    pub fn is_exportable(&self) -> bool {
        match self {
            SceneObject::Text(o) => o.is_exportable(),
            SceneObject::Shape(o) => o.is_exportable(),
            SceneObject::Image(o) => o.is_exportable(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            SceneObject::Text(o) => o.hit_test(point, tolerance),
            SceneObject::Shape(o) => o.hit_test(point, tolerance),
            SceneObject::Image(o) => o.hit_test(point, tolerance),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            SceneObject::Text(o) => o.translate(delta),
            SceneObject::Shape(o) => o.translate(delta),
            SceneObject::Image(o) => o.translate(delta),
        }
    }

    /// Top-left corner of the unrotated frame.
    pub fn position(&self) -> Point {
        self.frame().origin()
    }

    /// Set the visibility flag.
    pub fn set_visible(&mut self, visible: bool) {
        match self {
            SceneObject::Text(o) => o.visible = visible,
            SceneObject::Shape(o) => o.visible = visible,
            SceneObject::Image(o) => o.visible = visible,
        }
    }

    /// Set the rotation in degrees. Non-finite angles are ignored.
    /// Returns whether the rotation changed.
    pub fn set_rotation(&mut self, degrees: f64) -> bool {
        if !degrees.is_finite() {
            return false;
        }
        let rotation = match self {
            SceneObject::Text(o) => &mut o.rotation,
            SceneObject::Shape(o) => &mut o.rotation,
            SceneObject::Image(o) => &mut o.rotation,
        };
        set_if_changed(rotation, degrees)
    }

    /// Apply a property update if this variant holds the property.
    /// Returns whether anything changed; non-finite values change nothing.
    pub fn apply_property(&mut self, update: &PropertyUpdate) -> bool {
        if !update.is_finite() {
            return false;
        }
        match self {
            SceneObject::Text(o) => o.apply_property(update),
            SceneObject::Shape(o) => o.apply_property(update),
            SceneObject::Image(o) => o.apply_property(update),
        }
    }

    /// Clone with a fresh identifier, offset by `delta`.
    pub fn duplicate(&self, delta: Vec2) -> Self {
        let mut clone = self.clone();
        let new_id = Uuid::new_v4();
        match &mut clone {
            SceneObject::Text(o) => o.id = new_id,
            SceneObject::Shape(o) => o.id = new_id,
            SceneObject::Image(o) => o.id = new_id,
        }
        clone.translate(delta);
        clone
    }

    pub fn as_text(&self) -> Option<&TextObject> {
        match self {
            SceneObject::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeObject> {
        match self {
            SceneObject::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageObject> {
        match self {
            SceneObject::Image(i) => Some(i),
            _ => None,
        }
    }
}

/// Replace `target` with `value`, reporting whether it differed.
pub(crate) fn set_if_changed<T: PartialEq>(target: &mut T, value: T) -> bool {
    if *target == value {
        false
    } else {
        *target = value;
        true
    }
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_opacity() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(SerializableColor::from_hex("#fff"), Some(SerializableColor::white()));
        assert_eq!(
            SerializableColor::from_hex("#1a2b3c"),
            Some(SerializableColor::new(0x1a, 0x2b, 0x3c, 255))
        );
        assert_eq!(
            SerializableColor::from_hex("#00000080"),
            Some(SerializableColor::new(0, 0, 0, 0x80))
        );
        assert_eq!(SerializableColor::from_hex("red"), None);
        assert_eq!(SerializableColor::from_hex("#12345"), None);
        assert_eq!(SerializableColor::from_hex("#zzz"), None);
    }

    #[test]
    fn test_hex_format() {
        assert_eq!(SerializableColor::new(255, 0, 16, 255).to_hex(), "#ff0010");
        assert_eq!(SerializableColor::new(0, 0, 0, 0).to_hex(), "#00000000");
    }

    #[test]
    fn test_rotated_bounds() {
        let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
        assert_eq!(rotated_bounds(rect, 0.0), rect);

        let quarter = rotated_bounds(rect, 90.0);
        assert!((quarter.width() - 20.0).abs() < 1e-9);
        assert!((quarter.height() - 100.0).abs() < 1e-9);
        assert!((quarter.center().x - 50.0).abs() < 1e-9);
        assert!((quarter.center().y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_gets_new_id() {
        let shape = SceneObject::Shape(ShapeObject::new(
            ShapeKind::rectangle(),
            Point::new(10.0, 10.0),
            50.0,
            50.0,
        ));
        let copy = shape.duplicate(Vec2::new(20.0, 20.0));
        assert_ne!(copy.id(), shape.id());
        assert_eq!(copy.position(), Point::new(30.0, 30.0));
    }

    #[test]
    fn test_non_finite_values_are_ignored() {
        let mut text = SceneObject::Text(TextObject::new(Point::ZERO, 200.0, "Hello"));
        let before = text.clone();
        assert!(!text.apply_property(&PropertyUpdate::CharSpacing(f64::NAN)));
        assert!(!text.apply_property(&PropertyUpdate::FontSize(f64::INFINITY)));
        assert!(!text.apply_property(&PropertyUpdate::LineHeight(f64::INFINITY)));
        assert!(!text.apply_property(&PropertyUpdate::Opacity(f64::NAN)));
        assert!(!text.set_rotation(f64::NAN));
        assert_eq!(text, before);
        assert!(text.set_rotation(15.0));
        assert!(!text.set_rotation(15.0));
    }

    #[test]
    fn test_tagged_serialization() {
        let shape = SceneObject::Shape(ShapeObject::new(
            ShapeKind::Circle,
            Point::ZERO,
            10.0,
            10.0,
        ));
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["type"], "shape");
        let back: SceneObject = serde_json::from_value(json).unwrap();
        assert_eq!(back, shape);
    }
}
