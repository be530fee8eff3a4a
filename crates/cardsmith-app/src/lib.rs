//! Cardsmith Application
//!
//! Command-line shell around the editor: loads configuration and
//! templates, runs editing commands and exports previews.

mod app;
mod shortcuts;

pub use app::{App, AppConfig, AppError};
pub use shortcuts::{Command, ShapeKindName, Shortcut, ShortcutRegistry};
