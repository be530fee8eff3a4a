//! Canvas background: a solid color, optionally covered by an image.

use crate::error::{EditorError, EditorResult};
use crate::objects::{ImageFormat, SerializableColor};
use crate::raster::{self, DecodedRaster};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

/// The document background.
///
/// The solid color is always kept; while an image is set it is painted
/// instead, and removing the image reveals the color again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub color: SerializableColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<BackgroundImage>,
}

/// What actually gets painted behind the objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundPaint<'a> {
    Color(SerializableColor),
    Image(&'a BackgroundImage),
}

impl Background {
    pub fn solid(color: SerializableColor) -> Self {
        Self { color, image: None }
    }

    /// The active paint.
    pub fn paint(&self) -> BackgroundPaint<'_> {
        match &self.image {
            Some(image) => BackgroundPaint::Image(image),
            None => BackgroundPaint::Color(self.color),
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// A background image placed with cover-fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundImage {
    pub format: ImageFormat,
    pub source_width: u32,
    pub source_height: u32,
    /// Base64 of the original encoded bytes.
    pub data_base64: String,
    /// Uniform scale from source pixels to canvas units.
    pub scale: f64,
    /// Canvas x of the image's left edge (zero or negative).
    pub left: f64,
    /// Canvas y of the image's top edge (zero or negative).
    pub top: f64,
}

impl BackgroundImage {
    /// Scale the image uniformly so it covers the whole canvas, centered,
    /// with any overflow split evenly between opposite sides.
    pub fn cover(raster: &DecodedRaster, canvas: Size) -> Self {
        let source = Size::new(raster.width as f64, raster.height as f64);
        let scale = (canvas.width / source.width).max(canvas.height / source.height);
        let left = (canvas.width - source.width * scale) / 2.0;
        let top = (canvas.height - source.height * scale) / 2.0;
        Self {
            format: raster.format,
            source_width: raster.width,
            source_height: raster.height,
            data_base64: STANDARD.encode(&raster.bytes),
            scale,
            left,
            top,
        }
    }

    /// Where the scaled image lands in canvas coordinates.
    pub fn rendered_bounds(&self) -> Rect {
        Rect::from_origin_size(
            Point::new(self.left, self.top),
            Size::new(
                self.source_width as f64 * self.scale,
                self.source_height as f64 * self.scale,
            ),
        )
    }

    pub fn data(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.data_base64).ok()
    }
}

/// Result of one background decode started with
/// [`BackgroundLoader::spawn`].
#[derive(Debug)]
pub struct BackgroundLoad {
    pub ticket: u64,
    pub result: EditorResult<DecodedRaster>,
}

pub(crate) type Decoder = fn(Vec<u8>) -> EditorResult<DecodedRaster>;

/// Decodes background uploads off the calling thread.
///
/// Loads are never cancelled. Results are handed back in the order they
/// finish, so when two uploads overlap the one that resolves last wins.
#[derive(Debug)]
pub struct BackgroundLoader {
    sender: Sender<BackgroundLoad>,
    receiver: Receiver<BackgroundLoad>,
    next_ticket: u64,
    in_flight: usize,
}

impl Default for BackgroundLoader {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            next_ticket: 0,
            in_flight: 0,
        }
    }
}

impl BackgroundLoader {
    /// Start decoding `bytes` on a worker thread. Returns the load's ticket.
    pub fn spawn(&mut self, bytes: Vec<u8>) -> u64 {
        self.spawn_with(bytes, raster::decode)
    }

    /// Every worker sends exactly one result, even if `decode` panics;
    /// otherwise `wait_all` would block forever.
    pub(crate) fn spawn_with(&mut self, bytes: Vec<u8>, decode: Decoder) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight += 1;
        let sender = self.sender.clone();
        std::thread::spawn(move || {
            let result = std::panic::catch_unwind(move || decode(bytes)).unwrap_or_else(|_| {
                Err(EditorError::ImageDecode("decoder panicked".to_string()))
            });
            // The loader may have been dropped with the editor.
            let _ = sender.send(BackgroundLoad { ticket, result });
        });
        log::debug!("Background load {} started", ticket);
        ticket
    }

    /// Collect every load that has finished since the last call.
    pub fn drain(&mut self) -> Vec<BackgroundLoad> {
        let mut finished = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(load) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    finished.push(load);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        finished
    }

    /// Block until every started load has finished, then collect them.
    pub fn wait_all(&mut self) -> Vec<BackgroundLoad> {
        let mut finished = Vec::with_capacity(self.in_flight);
        while self.in_flight > 0 {
            match self.receiver.recv() {
                Ok(load) => {
                    self.in_flight -= 1;
                    finished.push(load);
                }
                Err(_) => break,
            }
        }
        finished
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::solid_png;

    fn raster(width: u32, height: u32) -> DecodedRaster {
        raster::decode(solid_png(width, height, [200, 180, 150, 255])).unwrap()
    }

    #[test]
    fn test_cover_square_on_wide_canvas() {
        let image = BackgroundImage::cover(&raster(100, 100), Size::new(800.0, 400.0));
        assert!((image.scale - 8.0).abs() < 1e-9);
        let bounds = image.rendered_bounds();
        assert!((bounds.width() - 800.0).abs() < 1e-9);
        assert!((bounds.height() - 800.0).abs() < 1e-9);
        assert!(image.left.abs() < 1e-9);
        assert!((image.top + 200.0).abs() < 1e-9);
        // Overflow is split evenly top and bottom.
        assert!((-bounds.y0 - (bounds.y1 - 400.0)).abs() < 1e-9);
    }

    #[test]
    fn test_cover_always_covers_canvas() {
        let canvas = Size::new(600.0, 840.0);
        for (w, h) in [(10, 10), (300, 100), (100, 300), (1200, 1680)] {
            let image = BackgroundImage::cover(&raster(w, h), canvas);
            let bounds = image.rendered_bounds();
            assert!(bounds.x0 <= 1e-9 && bounds.y0 <= 1e-9);
            assert!(bounds.x1 >= canvas.width - 1e-9 && bounds.y1 >= canvas.height - 1e-9);
            // Exactly one axis fits tightly.
            let tight_x = (bounds.width() - canvas.width).abs() < 1e-9;
            let tight_y = (bounds.height() - canvas.height).abs() < 1e-9;
            assert!(tight_x || tight_y);
        }
    }

    #[test]
    fn test_paint_falls_back_to_color() {
        let gold = SerializableColor::new(212, 175, 55, 255);
        let mut background = Background::solid(gold);
        assert_eq!(background.paint(), BackgroundPaint::Color(gold));
        background.image = Some(BackgroundImage::cover(&raster(4, 4), Size::new(8.0, 8.0)));
        assert!(matches!(background.paint(), BackgroundPaint::Image(_)));
        background.image = None;
        assert_eq!(background.paint(), BackgroundPaint::Color(gold));
    }

    #[test]
    fn test_loader_reports_every_load() {
        let mut loader = BackgroundLoader::default();
        let good = loader.spawn(solid_png(2, 2, [0, 0, 0, 255]));
        let bad = loader.spawn(b"not an image".to_vec());
        let mut results = loader.wait_all();
        results.sort_by_key(|load| load.ticket);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].ticket, good);
        assert!(results[0].result.is_ok());
        assert_eq!(results[1].ticket, bad);
        assert!(results[1].result.is_err());
        assert_eq!(loader.in_flight(), 0);
    }

    #[test]
    fn test_panicking_decode_still_reports() {
        fn explode(_: Vec<u8>) -> EditorResult<DecodedRaster> {
            panic!("corrupt stream");
        }
        let mut loader = BackgroundLoader::default();
        let ticket = loader.spawn_with(vec![0u8; 8], explode);
        let results = loader.wait_all();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].ticket, ticket);
        assert!(matches!(results[0].result, Err(EditorError::ImageDecode(_))));
        assert_eq!(loader.in_flight(), 0);
    }
}
