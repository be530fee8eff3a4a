//! Thumbnail rasterization of a document.
//!
//! Only the document itself is drawn: background, then objects back to
//! front. Selection and guides never reach the thumbnail.

use crate::pixels::PixelCanvas;
use crate::renderer::{RenderError, RenderResult};
use cardsmith_core::objects::{ImageObject, ObjectTrait, ShapeObject, TextAlign, TextObject};
use cardsmith_core::{BackgroundPaint, CanvasDocument, SceneObject};
use image::RgbaImage;
use kurbo::{Affine, Point, Rect, Shape};

/// Fraction of a text line's height drawn as a placeholder bar.
const TEXT_BAR_FRACTION: f64 = 0.45;

/// Output bounds for [`render_thumbnail`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// Include objects marked as excluded from export.
    pub include_hidden_from_export: bool,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            max_width: 300,
            max_height: 420,
            include_hidden_from_export: false,
        }
    }
}

impl ThumbnailOptions {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            ..Self::default()
        }
    }
}

/// Rasterize `document` to fit within the option bounds, preserving its
/// aspect ratio.
pub fn render_thumbnail(document: &CanvasDocument, options: &ThumbnailOptions) -> RenderResult<RgbaImage> {
    if !(document.width > 0.0 && document.height > 0.0) {
        return Err(RenderError::InvalidSize(format!(
            "document is {}x{}",
            document.width, document.height
        )));
    }
    if options.max_width == 0 || options.max_height == 0 {
        return Err(RenderError::InvalidSize(format!(
            "thumbnail bounds are {}x{}",
            options.max_width, options.max_height
        )));
    }
    let scale = (options.max_width as f64 / document.width)
        .min(options.max_height as f64 / document.height);
    let width = ((document.width * scale).round() as u32).clamp(1, options.max_width);
    let height = ((document.height * scale).round() as u32).clamp(1, options.max_height);
    let mut canvas = PixelCanvas::new(width, height, Affine::scale(scale));

    paint_background(&mut canvas, document);
    for object in document.objects() {
        if !object.is_visible() {
            continue;
        }
        if !object.is_exportable() && !options.include_hidden_from_export {
            continue;
        }
        match object {
            SceneObject::Shape(shape) => paint_shape(&mut canvas, shape),
            SceneObject::Text(text) => paint_text(&mut canvas, text),
            SceneObject::Image(image) => paint_image(&mut canvas, image),
        }
    }
    log::debug!(
        "Rendered thumbnail {}x{} ({} objects)",
        width,
        height,
        document.len()
    );
    Ok(canvas.into_image())
}

/// Encode an RGBA buffer as PNG bytes.
pub fn encode_png(pixels: &RgbaImage) -> RenderResult<Vec<u8>> {
    let mut out = std::io::Cursor::new(Vec::new());
    pixels
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

fn paint_background(canvas: &mut PixelCanvas, document: &CanvasDocument) {
    canvas.fill(document.background.color);
    if let BackgroundPaint::Image(background) = document.background.paint() {
        match background.data().as_deref().map(decode_rgba) {
            Some(Ok(pixels)) => canvas.draw_image(&pixels, background.rendered_bounds(), 0.0, 1.0),
            Some(Err(e)) => log::warn!("Skipping background image: {}", e),
            None => log::warn!("Skipping background image: invalid base64"),
        }
    }
}

fn paint_shape(canvas: &mut PixelCanvas, shape: &ShapeObject) {
    let path = shape.to_path();
    let opacity = shape.style.opacity;
    if let Some(fill) = shape.style.fill.filter(|_| shape.kind.is_fillable()) {
        canvas.fill_path(&path, fill, opacity);
    }
    if shape.style.stroke_width > 0.0 {
        canvas.stroke_path(&path, shape.style.stroke_width, shape.style.stroke_color, opacity);
    }
}

/// Text is drawn as one placeholder bar per wrapped line; glyph shaping is
/// left to the interactive renderer.
fn paint_text(canvas: &mut PixelCanvas, text: &TextObject) {
    let style = &text.style;
    let line_height = style.font_size * style.line_height;
    let lines = text.line_count();
    let frame = Rect::from_origin_size(text.position, (text.width, text.height()));
    let rotate = Affine::rotate_about(text.rotation.to_radians(), frame.center());
    for i in 0..lines {
        // Last line of a block is shorter, as real paragraphs usually are.
        let width = if i + 1 == lines && lines > 1 {
            text.width * 0.6
        } else {
            text.width
        };
        let x0 = match style.align {
            TextAlign::Left => frame.x0,
            TextAlign::Center => frame.center().x - width / 2.0,
            TextAlign::Right => frame.x1 - width,
        };
        let bar_height = style.font_size * TEXT_BAR_FRACTION;
        let y0 = frame.y0 + i as f64 * line_height + (line_height - bar_height) / 2.0;
        let bar = Rect::from_origin_size(Point::new(x0, y0), (width, bar_height));
        canvas.fill_path(&(rotate * bar.to_path(0.1)), style.fill, style.opacity);
    }
}

fn paint_image(canvas: &mut PixelCanvas, image: &ImageObject) {
    let Some(bytes) = image.data() else {
        log::warn!("Skipping image {}: invalid base64", image.id());
        return;
    };
    match decode_rgba(&bytes) {
        Ok(pixels) => canvas.draw_image(
            &pixels,
            Rect::from_origin_size(image.position, (image.width, image.height)),
            image.rotation,
            image.opacity,
        ),
        Err(e) => log::warn!("Skipping image {}: {}", image.id(), e),
    }
}

fn decode_rgba(bytes: &[u8]) -> RenderResult<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|decoded| decoded.to_rgba8())
        .map_err(|e| RenderError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardsmith_core::raster::solid_png;
    use cardsmith_core::{Editor, EditorConfig};
    use cardsmith_core::objects::{ShapeKind, TextPreset};
    use image::Rgba;

    fn small_editor() -> Editor {
        Editor::new(EditorConfig {
            canvas_width: 200.0,
            canvas_height: 100.0,
            ..EditorConfig::default()
        })
    }

    #[test]
    fn test_thumbnail_preserves_aspect() {
        let editor = small_editor();
        let thumb = render_thumbnail(editor.document(), &ThumbnailOptions::new(100, 100)).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (100, 50));
        assert_eq!(thumb.get_pixel(10, 10), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_shapes_are_drawn() {
        let mut editor = small_editor();
        editor.insert_shape(ShapeKind::rectangle());
        let thumb = render_thumbnail(editor.document(), &ThumbnailOptions::new(200, 100)).unwrap();
        // Default rectangle fill at the canvas center.
        assert_eq!(thumb.get_pixel(100, 50), &Rgba([0xd4, 0xa5, 0x74, 255]));
    }

    #[test]
    fn test_excluded_objects_are_skipped() {
        let mut editor = small_editor();
        editor.insert_shape(ShapeKind::rectangle());
        let mut document = editor.document().clone();
        let json = document.to_json().unwrap().replace(
            r#""exclude_from_export":false"#,
            r#""exclude_from_export":true"#,
        );
        document = CanvasDocument::from_json(&json).unwrap();
        let thumb = render_thumbnail(&document, &ThumbnailOptions::new(200, 100)).unwrap();
        assert_eq!(thumb.get_pixel(100, 50), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_background_image_covers() {
        let mut editor = small_editor();
        editor
            .replace_background_image(solid_png(10, 10, [0, 128, 0, 255]))
            .unwrap();
        let thumb = render_thumbnail(editor.document(), &ThumbnailOptions::new(200, 100)).unwrap();
        assert_eq!(thumb.get_pixel(0, 0), &Rgba([0, 128, 0, 255]));
        assert_eq!(thumb.get_pixel(199, 99), &Rgba([0, 128, 0, 255]));
    }

    #[test]
    fn test_text_draws_bars() {
        let mut editor = small_editor();
        editor.insert_text(TextPreset::Body);
        let thumb = render_thumbnail(editor.document(), &ThumbnailOptions::new(200, 100)).unwrap();
        assert!(thumb.pixels().any(|p| p.0 != [255, 255, 255, 255]));
    }

    #[test]
    fn test_png_signature() {
        let editor = small_editor();
        let thumb = render_thumbnail(editor.document(), &ThumbnailOptions::default()).unwrap();
        let png = encode_png(&thumb).unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_zero_bounds_rejected() {
        let editor = small_editor();
        assert!(matches!(
            render_thumbnail(editor.document(), &ThumbnailOptions::new(0, 10)),
            Err(RenderError::InvalidSize(_))
        ));
    }
}
