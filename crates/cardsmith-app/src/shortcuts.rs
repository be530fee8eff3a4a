//! Keyboard shortcuts and the editor commands they trigger.

use cardsmith_core::Editor;
use cardsmith_core::objects::{ShapeKind, TextPreset};

/// An editor action reachable from the keyboard or a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectAll,
    ClearSelection,
    Delete,
    Duplicate,
    Undo,
    Redo,
    BringForward,
    SendBackward,
    BringToFront,
    SendToBack,
    RemoveBackgroundImage,
    InsertText(TextPreset),
    InsertShape(ShapeKindName),
}

/// Shape kinds by name, so commands stay `Copy` and parseable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKindName {
    Rectangle,
    Circle,
    Triangle,
    Line,
}

impl ShapeKindName {
    pub fn kind(self) -> ShapeKind {
        match self {
            ShapeKindName::Rectangle => ShapeKind::rectangle(),
            ShapeKindName::Circle => ShapeKind::Circle,
            ShapeKindName::Triangle => ShapeKind::Triangle,
            ShapeKindName::Line => ShapeKind::Line,
        }
    }
}

impl Command {
    /// Parse a script command such as `duplicate` or `add-heading`.
    pub fn parse(name: &str) -> Option<Self> {
        let command = match name.trim().to_ascii_lowercase().as_str() {
            "select-all" => Command::SelectAll,
            "clear-selection" => Command::ClearSelection,
            "delete" => Command::Delete,
            "duplicate" => Command::Duplicate,
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            "bring-forward" => Command::BringForward,
            "send-backward" => Command::SendBackward,
            "bring-to-front" => Command::BringToFront,
            "send-to-back" => Command::SendToBack,
            "remove-background" => Command::RemoveBackgroundImage,
            "add-heading" => Command::InsertText(TextPreset::Heading),
            "add-subheading" => Command::InsertText(TextPreset::Subheading),
            "add-body" => Command::InsertText(TextPreset::Body),
            "add-rectangle" => Command::InsertShape(ShapeKindName::Rectangle),
            "add-circle" => Command::InsertShape(ShapeKindName::Circle),
            "add-triangle" => Command::InsertShape(ShapeKindName::Triangle),
            "add-line" => Command::InsertShape(ShapeKindName::Line),
            _ => return None,
        };
        Some(command)
    }

    /// Run the command. Returns whether the document changed.
    pub fn execute(self, editor: &mut Editor) -> bool {
        match self {
            Command::SelectAll => {
                editor.select_all();
                false
            }
            Command::ClearSelection => {
                editor.clear_selection();
                false
            }
            Command::Delete => editor.delete_selected() > 0,
            Command::Duplicate => !editor.duplicate_selected().is_empty(),
            Command::Undo => editor.undo(),
            Command::Redo => editor.redo(),
            Command::BringForward => editor.bring_forward(),
            Command::SendBackward => editor.send_backward(),
            Command::BringToFront => editor.bring_to_front(),
            Command::SendToBack => editor.send_to_back(),
            Command::RemoveBackgroundImage => editor.remove_background_image(),
            Command::InsertText(preset) => {
                editor.insert_text(preset);
                true
            }
            Command::InsertShape(name) => {
                editor.insert_shape(name.kind());
                true
            }
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: Command,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+D").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("A", true, false, Command::SelectAll, "Select all objects"),
            Shortcut::new("Escape", false, false, Command::ClearSelection, "Clear selection"),
            Shortcut::new("Z", true, false, Command::Undo, "Undo"),
            Shortcut::new("Z", true, true, Command::Redo, "Redo"),
            Shortcut::new("Y", true, false, Command::Redo, "Redo"),
            Shortcut::new("D", true, false, Command::Duplicate, "Duplicate selection"),
            Shortcut::new("Delete", false, false, Command::Delete, "Delete selection"),
            Shortcut::new("Backspace", false, false, Command::Delete, "Delete selection"),
            Shortcut::new("]", true, false, Command::BringForward, "Bring forward"),
            Shortcut::new("[", true, false, Command::SendBackward, "Send backward"),
            Shortcut::new("]", true, true, Command::BringToFront, "Bring to front"),
            Shortcut::new("[", true, true, Command::SendToBack, "Send to back"),
            Shortcut::new("T", false, false, Command::InsertText(TextPreset::Body), "Add text"),
            Shortcut::new(
                "R",
                false,
                false,
                Command::InsertShape(ShapeKindName::Rectangle),
                "Add rectangle",
            ),
            Shortcut::new(
                "L",
                false,
                false,
                Command::InsertShape(ShapeKindName::Line),
                "Add line",
            ),
        ]
    }

    /// Look up the command bound to a key combination.
    pub fn find(key: &str, ctrl: bool, shift: bool) -> Option<Command> {
        Self::all()
            .into_iter()
            .find(|s| s.key.eq_ignore_ascii_case(key) && s.ctrl == ctrl && s.shift == shift)
            .map(|s| s.command)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
