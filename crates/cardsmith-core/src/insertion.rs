//! Toolbar insertion: text presets, shapes and images.

use crate::editor::Editor;
use crate::error::EditorResult;
use crate::objects::{
    ImageObject, ObjectId, SceneObject, ShapeKind, ShapeObject, ShapeStyle, TextObject, TextPreset,
};
use crate::raster;
use kurbo::{Point, Size};

impl ShapeKind {
    /// Size of a freshly inserted shape.
    pub fn default_size(&self) -> Size {
        match self {
            ShapeKind::Rectangle { .. } => Size::new(200.0, 120.0),
            ShapeKind::Circle | ShapeKind::Triangle => Size::new(120.0, 120.0),
            ShapeKind::Line => Size::new(200.0, 0.0),
        }
    }

    /// Style of a freshly inserted shape.
    pub fn default_style(&self) -> ShapeStyle {
        match self {
            ShapeKind::Line => ShapeStyle::line(),
            _ => ShapeStyle::default(),
        }
    }
}

impl Editor {
    /// Insert a text box styled by `preset`.
    pub fn insert_text(&mut self, preset: TextPreset) -> ObjectId {
        let text = TextObject::from_preset(preset, Point::ZERO);
        self.place(SceneObject::Text(text), "Add text")
    }

    /// Insert a shape with its default size and style.
    pub fn insert_shape(&mut self, kind: ShapeKind) -> ObjectId {
        let size = kind.default_size();
        let style = kind.default_style();
        let shape = ShapeObject::new(kind, Point::ZERO, size.width, size.height).with_style(style);
        self.place(SceneObject::Shape(shape), "Add shape")
    }

    /// Decode and insert an image, scaled down to fit the configured
    /// fraction of the canvas. On error nothing is inserted.
    pub fn insert_image(&mut self, bytes: Vec<u8>) -> EditorResult<ObjectId> {
        let decoded = raster::decode(bytes)?;
        let fraction = self.config().image_fit_fraction;
        let canvas = self.document.size();
        let image = ImageObject::new(
            Point::ZERO,
            &decoded.bytes,
            decoded.width,
            decoded.height,
            decoded.format,
        )
        .fit_within(canvas.width * fraction, canvas.height * fraction);
        Ok(self.place(SceneObject::Image(image), "Add image"))
    }

    /// Center `object` on the canvas, add it on top, select it alone and commit.
    fn place(&mut self, mut object: SceneObject, label: &str) -> ObjectId {
        let offset = self.document.center() - object.frame().center();
        object.translate(offset);
        let id = self.document.add_object(object);
        self.selection.select_only(id);
        self.save_history(label);
        id
    }
}
