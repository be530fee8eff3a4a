//! Cardsmith Core Library
//!
//! Headless editing engine for the Cardsmith invitation designer: scene
//! model, history, selection operations and alignment guides.

pub mod background;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod fonts;
pub mod guides;
pub mod history;
mod insertion;
mod manipulation;
pub mod objects;
pub mod overlay;
pub mod raster;
pub mod selection;
pub mod viewport;

pub use background::{Background, BackgroundImage, BackgroundLoad, BackgroundPaint};
pub use config::{EditorConfig, GuideConfig};
pub use document::CanvasDocument;
pub use editor::{Editor, EditorMode, EditorSignals};
pub use error::{ConfigError, EditorError, EditorResult};
pub use fonts::{FONT_CATALOG, FontEntry, search_fonts};
pub use guides::{
    AlignmentEngine, Axis, DistanceIndicator, GuideCandidate, GuideFrame, GuideLine, GuideTarget,
    MatchKind, compute_guides,
};
pub use history::{History, HistoryEntry};
pub use objects::{ObjectId, ObjectKind, PropertyUpdate, SceneObject, SerializableColor};
pub use overlay::{OverlaySurface, paint_overlay};
pub use selection::{SavedPalette, Selection};
pub use viewport::Viewport;
