//! The editor context: document, selection, history and drag state.

use crate::background::BackgroundLoader;
use crate::config::EditorConfig;
use crate::document::CanvasDocument;
use crate::error::EditorResult;
use crate::guides::{AlignmentEngine, GuideFrame};
use crate::history::History;
use crate::objects::{ObjectId, ObjectKind, SceneObject, SerializableColor};
use crate::overlay::{OverlaySurface, paint_overlay};
use crate::selection::{SavedPalette, Selection};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};

/// Whether pointer input selects and moves objects or draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Select,
    Drawing,
}

/// Read-only state for toolbars and panels.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSignals {
    pub object_count: usize,
    pub selection_count: usize,
    /// Kind of the selected object when exactly one is selected.
    pub selected_kind: Option<ObjectKind>,
    /// Reordering only applies to single selections.
    pub can_reorder: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub is_dragging: bool,
    pub has_background_image: bool,
    pub pending_background_loads: usize,
}

/// An in-progress move gesture.
#[derive(Debug, Clone)]
struct DragSession {
    /// Each dragged object and where it started.
    origins: Vec<(ObjectId, Point)>,
    /// Pointer position in screen space, for pointer-driven drags.
    pointer_origin: Option<Point>,
    delta: Vec2,
}

/// Owns everything the editing services operate on.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    pub(crate) document: CanvasDocument,
    pub(crate) selection: Selection,
    palette: SavedPalette,
    mode: EditorMode,
    viewport: Viewport,
    history: History,
    guides: AlignmentEngine,
    drag: Option<DragSession>,
    pub(crate) loader: BackgroundLoader,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with an empty canvas. The initial state is the
    /// first history entry.
    pub fn new(config: EditorConfig) -> Self {
        let document = CanvasDocument::new(
            config.canvas_width,
            config.canvas_height,
            config.background,
        );
        // An unreadable first entry only means undo stops one step early.
        let initial = serialize(&document).unwrap_or_else(|| {
            log::error!("Starting history without an initial snapshot");
            String::new()
        });
        Self::from_parts(config, document, initial)
    }

    /// Create an editor around an existing document.
    pub fn with_document(config: EditorConfig, document: CanvasDocument) -> EditorResult<Self> {
        document.validate()?;
        let initial = document.to_json()?;
        Ok(Self::from_parts(config, document, initial))
    }

    fn from_parts(config: EditorConfig, document: CanvasDocument, initial: String) -> Self {
        Self {
            history: History::new(initial, config.max_history),
            guides: AlignmentEngine::new(config.guides),
            config,
            document,
            selection: Selection::new(),
            palette: SavedPalette::default(),
            mode: EditorMode::default(),
            viewport: Viewport::default(),
            drag: None,
            loader: BackgroundLoader::default(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected objects in z-order.
    pub fn selected_objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.document
            .objects()
            .iter()
            .filter(|o| self.selection.contains(o.id()))
    }

    pub fn palette(&self) -> &SavedPalette {
        &self.palette
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Switch mode. A drag in progress is finished first.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if self.mode != mode && self.drag.is_some() {
            self.end_drag();
        }
        self.mode = mode;
    }

    // --- Selection ---

    /// Make `id` the only selected object. Unknown ids are ignored.
    pub fn select(&mut self, id: ObjectId) {
        if self.document.contains(id) {
            self.selection.select_only(id);
        } else {
            log::debug!("select: unknown object {}", id);
        }
    }

    /// Add `id` to the selection. Unknown ids are ignored.
    pub fn add_to_selection(&mut self, id: ObjectId) {
        if self.document.contains(id) {
            self.selection.add(id);
        }
    }

    pub fn select_all(&mut self) {
        self.selection.set(self.document.z_order());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- Document-level state ---

    /// Set the solid background color. An active background image stays
    /// on top of it.
    pub fn set_background_color(&mut self, color: SerializableColor) {
        if self.document.background.color == color {
            return;
        }
        self.document.background.color = color;
        self.save_history("Change background color");
    }

    /// Save a color to the palette. Returns false if it was already there.
    pub fn add_saved_color(&mut self, color: SerializableColor) -> bool {
        self.palette.add(color)
    }

    /// Serialized document state.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(self.document.to_json()?)
    }

    pub fn signals(&self) -> EditorSignals {
        let single = self.selection.single().and_then(|id| self.document.get(id));
        EditorSignals {
            object_count: self.document.len(),
            selection_count: self.selection.len(),
            selected_kind: single.map(SceneObject::kind),
            can_reorder: single.is_some(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            is_dragging: self.drag.is_some(),
            has_background_image: self.document.background.has_image(),
            pending_background_loads: self.loader.in_flight(),
        }
    }

    // --- History ---

    /// Commit the current document as a new history entry.
    pub fn save_history(&mut self, label: &str) {
        match serialize(&self.document) {
            Some(snapshot) => {
                self.history.commit(label, snapshot);
                log::info!("{}", label);
            }
            None => log::warn!("Skipped history entry '{}'", label),
        }
    }

    /// Restore the previous snapshot. Returns false at the oldest state or
    /// when that snapshot cannot be read, in which case nothing moves.
    pub fn undo(&mut self) -> bool {
        let Some(document) = self.history.peek_undo().and_then(|e| parse_snapshot(e.snapshot()))
        else {
            return false;
        };
        self.history.undo();
        self.restore(document);
        true
    }

    /// Restore the next snapshot. Returns false at the newest state or
    /// when that snapshot cannot be read, in which case nothing moves.
    pub fn redo(&mut self) -> bool {
        let Some(document) = self.history.peek_redo().and_then(|e| parse_snapshot(e.snapshot()))
        else {
            return false;
        };
        self.history.redo();
        self.restore(document);
        true
    }

    fn restore(&mut self, document: CanvasDocument) {
        self.document = document;
        let document = &self.document;
        self.selection.retain(|id| document.contains(id));
        self.drag = None;
        self.guides.clear();
    }

    /// Replace the whole scene with a template. On error nothing changes.
    pub fn import_template(&mut self, json: &str) -> EditorResult<()> {
        let document = CanvasDocument::from_json(json)?;
        log::debug!(
            "Importing template '{}' with {} objects",
            document.name,
            document.len()
        );
        self.document = document;
        self.selection.clear();
        self.drag = None;
        self.guides.clear();
        self.save_history("Import template");
        Ok(())
    }

    // --- Dragging ---

    /// Start moving the current selection. Returns false in drawing mode
    /// or with nothing selected. A drag still in progress is ended first,
    /// so its move gets its own history entry.
    pub fn begin_drag(&mut self) -> bool {
        if self.drag.is_some() {
            self.end_drag();
        }
        if self.mode == EditorMode::Drawing || self.selection.is_empty() {
            return false;
        }
        let origins = self
            .selected_objects()
            .map(|o| (o.id(), o.position()))
            .collect();
        self.drag = Some(DragSession {
            origins,
            pointer_origin: None,
            delta: Vec2::ZERO,
        });
        self.guides.clear();
        true
    }

    /// Start a drag from a pointer press in screen coordinates. Pressing an
    /// unselected object selects it first; pressing empty canvas clears
    /// the selection and starts nothing.
    pub fn begin_drag_at(&mut self, screen_point: Point) -> bool {
        if self.mode == EditorMode::Drawing {
            return false;
        }
        let point = self.viewport.screen_to_canvas(screen_point);
        let Some(hit) = self.document.objects_at_point(point, 0.0).first().copied() else {
            self.selection.clear();
            return false;
        };
        if !self.selection.contains(hit) {
            self.selection.select_only(hit);
        }
        if !self.begin_drag() {
            return false;
        }
        if let Some(drag) = &mut self.drag {
            drag.pointer_origin = Some(screen_point);
        }
        true
    }

    /// Move the dragged objects to their start positions plus `delta`
    /// (canvas units) and recompute guides. A non-finite delta leaves
    /// everything where it is.
    pub fn drag_to(&mut self, delta: Vec2) -> Option<&GuideFrame> {
        if !delta.is_finite() {
            log::debug!("drag: ignoring non-finite delta {:?}", delta);
            return self.drag.as_ref().map(|_| self.guides.frame());
        }
        let drag = self.drag.as_mut()?;
        drag.delta = delta;
        let mut dragged: Option<Rect> = None;
        for &(id, origin) in &drag.origins {
            let Some(object) = self.document.get_mut(id) else {
                continue;
            };
            let target = origin + delta;
            object.translate(target - object.position());
            let bounds = object.bounds();
            dragged = Some(dragged.map_or(bounds, |r| r.union(bounds)));
        }
        let dragged = dragged?;
        let ids: Vec<ObjectId> = drag.origins.iter().map(|(id, _)| *id).collect();
        let canvas = self.document.canvas_rect();
        Some(
            self.guides
                .update(dragged, &ids, self.document.objects(), canvas),
        )
    }

    /// Pointer-driven variant of [`Editor::drag_to`]; the delta is measured
    /// in canvas space from the press position.
    pub fn drag_pointer_to(&mut self, screen_point: Point) -> Option<&GuideFrame> {
        let start = self.drag.as_ref()?.pointer_origin?;
        let delta = self.viewport.screen_to_canvas(screen_point)
            - self.viewport.screen_to_canvas(start);
        self.drag_to(delta)
    }

    /// Finish the gesture: drop guides and commit one "Move" entry if the
    /// objects ended up somewhere new. Returns whether a move was committed.
    pub fn end_drag(&mut self) -> bool {
        self.guides.clear();
        let Some(drag) = self.drag.take() else {
            return false;
        };
        if drag.delta == Vec2::ZERO {
            return false;
        }
        self.save_history("Move");
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Guides for the current drag frame (empty when idle).
    pub fn guide_frame(&self) -> &GuideFrame {
        self.guides.frame()
    }

    /// Repaint the overlay surface from the current guide state.
    pub fn paint_overlay<S: OverlaySurface + ?Sized>(&self, surface: &mut S) {
        paint_overlay(self.guides.frame(), surface);
    }
}

fn parse_snapshot(snapshot: &str) -> Option<CanvasDocument> {
    CanvasDocument::from_json(snapshot)
        .map_err(|e| log::warn!("Failed to restore snapshot: {}", e))
        .ok()
}

fn serialize(document: &CanvasDocument) -> Option<String> {
    document
        .to_json()
        .map_err(|e| log::error!("Failed to serialize document: {}", e))
        .ok()
}
