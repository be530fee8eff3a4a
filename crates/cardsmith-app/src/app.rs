//! Application shell: configuration, document files and preview export.

use crate::shortcuts::Command;
use cardsmith_core::{ConfigError, Editor, EditorConfig, EditorError};
use cardsmith_render::{RenderError, ThumbnailOptions, encode_png, render_thumbnail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub editor: EditorConfig,
    pub preview_width: u32,
    pub preview_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Cardsmith".to_string(),
            editor: EditorConfig::default(),
            preview_width: 600,
            preview_height: 840,
        }
    }
}

impl AppConfig {
    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents).map_err(ConfigError::from)?;
        config.editor.validate()?;
        Ok(config)
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    editor: Editor,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let editor = Editor::new(config.editor.clone());
        Self { config, editor }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Replace the scene with a template file.
    pub fn open_template(&mut self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        self.editor.import_template(&json)?;
        log::info!("Opened template {}", path.display());
        Ok(())
    }

    /// Decode an image file in the background and install it once ready.
    pub fn load_background(&mut self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let bytes = std::fs::read(path.as_ref())?;
        self.editor.replace_background_image_async(bytes);
        for load in self.editor.wait_background_loads() {
            load.result?;
        }
        Ok(())
    }

    /// Run a script command by name.
    pub fn run_command(&mut self, name: &str) -> Result<bool, AppError> {
        let command =
            Command::parse(name).ok_or_else(|| AppError::UnknownCommand(name.to_string()))?;
        Ok(command.execute(&mut self.editor))
    }

    /// Write the document JSON.
    pub fn save_document(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        std::fs::write(path.as_ref(), self.editor.to_json()?)?;
        log::info!("Saved document to {}", path.as_ref().display());
        Ok(())
    }

    /// Render the preview PNG bytes.
    pub fn preview_png(&self) -> Result<Vec<u8>, AppError> {
        let options = ThumbnailOptions::new(self.config.preview_width, self.config.preview_height);
        let image = render_thumbnail(self.editor.document(), &options)?;
        Ok(encode_png(&image)?)
    }

    /// Write the preview PNG and return where it went.
    pub fn export_preview(&self, path: impl Into<PathBuf>) -> Result<PathBuf, AppError> {
        let path = path.into();
        std::fs::write(&path, self.preview_png()?)?;
        log::info!("Exported preview to {}", path.display());
        Ok(path)
    }
}
