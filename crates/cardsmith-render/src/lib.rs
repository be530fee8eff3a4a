//! Cardsmith Render Library
//!
//! Overlay surfaces for alignment guides and a software rasterizer for
//! document thumbnails.

mod pixels;
mod raster_overlay;
mod renderer;
mod svg_overlay;
mod thumbnail;

pub use pixels::PixelCanvas;
pub use raster_overlay::RasterOverlay;
pub use renderer::{RenderError, RenderResult};
pub use svg_overlay::SvgOverlay;
pub use thumbnail::{ThumbnailOptions, encode_png, render_thumbnail};
