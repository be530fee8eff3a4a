//! Text objects.

use super::{
    ObjectId, ObjectTrait, PropertyUpdate, SerializableColor, default_opacity, default_true,
    set_if_changed,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    SemiBold,
    Bold,
}

impl FontWeight {
    /// Relative glyph width used by the layout estimate.
    fn width_factor(&self) -> f64 {
        match self {
            FontWeight::Light => 0.50,
            FontWeight::Regular => 0.53,
            FontWeight::SemiBold => 0.56,
            FontWeight::Bold => 0.58,
        }
    }
}

/// Horizontal alignment inside the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Toolbar text presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPreset {
    Heading,
    Subheading,
    Body,
}

impl TextPreset {
    /// Placeholder content for a freshly inserted text.
    pub fn placeholder(&self) -> &'static str {
        match self {
            TextPreset::Heading => "Add a heading",
            TextPreset::Subheading => "Add a subheading",
            TextPreset::Body => "Add a little bit of body text",
        }
    }

    /// Default style for the preset.
    pub fn style(&self) -> TextStyle {
        let (font_family, font_size, font_weight) = match self {
            TextPreset::Heading => ("Playfair Display", 48.0, FontWeight::Bold),
            TextPreset::Subheading => ("Montserrat", 28.0, FontWeight::SemiBold),
            TextPreset::Body => ("Lato", 18.0, FontWeight::Regular),
        };
        TextStyle {
            font_family: font_family.to_string(),
            font_size,
            font_weight,
            ..TextStyle::default()
        }
    }

    /// Default text box width.
    pub fn box_width(&self) -> f64 {
        match self {
            TextPreset::Heading => 420.0,
            TextPreset::Subheading => 360.0,
            TextPreset::Body => 320.0,
        }
    }
}

/// Typography and paint for a text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub fill: SerializableColor,
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Character spacing in 1/1000 em.
    #[serde(default)]
    pub char_spacing: f64,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_line_height() -> f64 {
    1.16
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            fill: SerializableColor::new(0x22, 0x22, 0x22, 255),
            font_family: "Lato".to_string(),
            font_size: 18.0,
            font_weight: FontWeight::default(),
            char_spacing: 0.0,
            line_height: default_line_height(),
            align: TextAlign::default(),
            opacity: 1.0,
        }
    }
}

/// A wrapped text box. Its height follows from the content and typography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObject {
    pub(crate) id: ObjectId,
    /// Top-left corner of the text box.
    pub position: Point,
    /// Wrap width of the text box.
    pub width: f64,
    pub content: String,
    pub style: TextStyle,
    /// Rotation angle in degrees (around center).
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub exclude_from_export: bool,
}

impl TextObject {
    pub fn new(position: Point, width: f64, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            content: content.into(),
            style: TextStyle::default(),
            rotation: 0.0,
            visible: true,
            exclude_from_export: false,
        }
    }

    /// Create a text from a toolbar preset.
    pub fn from_preset(preset: TextPreset, position: Point) -> Self {
        Self::new(position, preset.box_width(), preset.placeholder()).with_style(preset.style())
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Estimated advance of one glyph, including character spacing.
    fn glyph_advance(&self) -> f64 {
        let base = self.style.font_size * self.style.font_weight.width_factor();
        (base + self.style.char_spacing / 1000.0 * self.style.font_size).max(1.0)
    }

    /// Approximate number of rendered lines after wrapping.
    ///
    /// Actual metrics depend on the font; this estimate keeps geometry
    /// available without a shaping engine.
    pub fn line_count(&self) -> usize {
        let per_line = ((self.width / self.glyph_advance()).floor() as usize).max(1);
        self.content
            .split('\n')
            .map(|line| line.chars().count().div_ceil(per_line).max(1))
            .sum()
    }

    /// Height of the laid-out text box.
    pub fn height(&self) -> f64 {
        self.line_count() as f64 * self.style.font_size * self.style.line_height
    }

    pub(crate) fn apply_property(&mut self, update: &PropertyUpdate) -> bool {
        let style = &mut self.style;
        match update {
            PropertyUpdate::TextFill(color) => set_if_changed(&mut style.fill, *color),
            PropertyUpdate::FontFamily(family) => {
                if family.trim().is_empty() {
                    return false;
                }
                set_if_changed(&mut style.font_family, family.clone())
            }
            PropertyUpdate::FontSize(size) if *size > 0.0 => {
                set_if_changed(&mut style.font_size, *size)
            }
            PropertyUpdate::FontWeight(weight) => set_if_changed(&mut style.font_weight, *weight),
            PropertyUpdate::CharSpacing(spacing) => set_if_changed(&mut style.char_spacing, *spacing),
            PropertyUpdate::LineHeight(height) if *height > 0.0 => {
                set_if_changed(&mut style.line_height, *height)
            }
            PropertyUpdate::Opacity(opacity) => {
                set_if_changed(&mut style.opacity, opacity.clamp(0.0, 1.0))
            }
            PropertyUpdate::FontSize(_)
            | PropertyUpdate::LineHeight(_)
            | PropertyUpdate::Fill(_)
            | PropertyUpdate::Stroke(_)
            | PropertyUpdate::StrokeWidth(_)
            | PropertyUpdate::CornerRadius(_) => false,
        }
    }
}

impl ObjectTrait for TextObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn frame(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height()))
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
