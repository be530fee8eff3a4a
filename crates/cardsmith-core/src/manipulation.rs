//! Editing operations on the current selection and the background.
//!
//! Every operation that changes the document commits exactly one history
//! entry. Operating on an empty selection does nothing.

use crate::background::{BackgroundImage, BackgroundLoad};
use crate::document::CanvasDocument;
use crate::editor::Editor;
use crate::error::EditorResult;
use crate::objects::{ObjectId, PropertyUpdate};
use crate::raster::{self, DecodedRaster};
use kurbo::Vec2;

impl Editor {
    /// Delete all selected objects. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            log::debug!("delete: nothing selected");
            return 0;
        }
        let ids: Vec<ObjectId> = self.selection.ids().to_vec();
        let removed = ids
            .into_iter()
            .filter(|&id| self.document.remove_object(id).is_some())
            .count();
        self.selection.clear();
        if removed > 0 {
            self.save_history("Delete");
        }
        removed
    }

    /// Clone every selected object with new ids, offset by the configured
    /// delta, and select the clones. Returns the new ids in z-order.
    pub fn duplicate_selected(&mut self) -> Vec<ObjectId> {
        let offset = self.config().duplicate_offset;
        let delta = Vec2::new(offset, offset);
        let clones: Vec<_> = self
            .selected_objects()
            .map(|object| object.duplicate(delta))
            .collect();
        if clones.is_empty() {
            log::debug!("duplicate: nothing selected");
            return Vec::new();
        }
        let ids: Vec<ObjectId> = clones
            .into_iter()
            .map(|clone| self.document.add_object(clone))
            .collect();
        self.selection.set(ids.iter().copied());
        self.save_history("Duplicate");
        ids
    }

    /// Move the single selected object above the nearest overlapping
    /// object in front of it (or one step if none overlaps).
    pub fn bring_forward(&mut self) -> bool {
        self.reorder("Bring forward", |document, id| document.bring_forward(id))
    }

    /// Move the single selected object below the nearest overlapping
    /// object behind it (or one step if none overlaps).
    pub fn send_backward(&mut self) -> bool {
        self.reorder("Send backward", |document, id| document.send_backward(id))
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.reorder("Bring to front", |document, id| document.bring_to_front(id))
    }

    pub fn send_to_back(&mut self) -> bool {
        self.reorder("Send to back", |document, id| document.send_to_back(id))
    }

    fn reorder(
        &mut self,
        label: &str,
        op: impl FnOnce(&mut CanvasDocument, ObjectId) -> bool,
    ) -> bool {
        let Some(id) = self.selection.single() else {
            log::debug!("{}: needs exactly one selected object", label);
            return false;
        };
        if !op(&mut self.document, id) {
            return false;
        }
        self.save_history(label);
        true
    }

    /// Apply a property to every selected object that has it. Returns how
    /// many objects changed.
    pub fn update_property(&mut self, update: PropertyUpdate) -> usize {
        if !update.is_finite() {
            log::debug!("{}: ignoring non-finite value", update.label());
            return 0;
        }
        let ids: Vec<ObjectId> = self.selection.ids().to_vec();
        let mut changed = 0;
        for id in ids {
            if let Some(object) = self.document.get_mut(id) {
                if object.apply_property(&update) {
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            self.save_history(update.label());
        }
        changed
    }

    /// Show or hide every selected object.
    pub fn set_selected_visible(&mut self, visible: bool) -> usize {
        let ids: Vec<ObjectId> = self.selection.ids().to_vec();
        let mut changed = 0;
        for id in ids {
            if let Some(object) = self.document.get_mut(id) {
                if object.is_visible() != visible {
                    object.set_visible(visible);
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            self.save_history(if visible { "Show" } else { "Hide" });
        }
        changed
    }

    /// Set the rotation of every selected object, in degrees. Non-finite
    /// angles are ignored.
    pub fn rotate_selected(&mut self, degrees: f64) -> usize {
        if !degrees.is_finite() {
            log::debug!("rotate: ignoring non-finite angle {}", degrees);
            return 0;
        }
        let ids: Vec<ObjectId> = self.selection.ids().to_vec();
        let mut changed = 0;
        for id in ids {
            if let Some(object) = self.document.get_mut(id) {
                if object.set_rotation(degrees) {
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            self.save_history("Rotate");
        }
        changed
    }

    // --- Background image ---

    /// Decode `bytes` and install them as the cover-fit background image.
    /// On error the background is left as it was.
    pub fn replace_background_image(&mut self, bytes: Vec<u8>) -> EditorResult<()> {
        let raster = raster::decode(bytes)?;
        self.install_background(&raster);
        Ok(())
    }

    /// Start decoding a background upload on a worker thread. Call
    /// [`Editor::poll_background_loads`] to apply it once it finishes.
    pub fn replace_background_image_async(&mut self, bytes: Vec<u8>) -> u64 {
        self.loader.spawn(bytes)
    }

    /// Apply every finished background load, in completion order.
    /// Failed loads are returned but leave the background alone.
    pub fn poll_background_loads(&mut self) -> Vec<BackgroundLoad> {
        let finished = self.loader.drain();
        self.apply_background_loads(&finished);
        finished
    }

    /// Block until all pending background loads finish, then apply them.
    pub fn wait_background_loads(&mut self) -> Vec<BackgroundLoad> {
        let finished = self.loader.wait_all();
        self.apply_background_loads(&finished);
        finished
    }

    fn apply_background_loads(&mut self, finished: &[BackgroundLoad]) {
        for load in finished {
            match &load.result {
                Ok(raster) => self.install_background(raster),
                Err(e) => log::warn!("Background load {} failed: {}", load.ticket, e),
            }
        }
    }

    fn install_background(&mut self, raster: &DecodedRaster) {
        let image = BackgroundImage::cover(raster, self.document.size());
        log::debug!(
            "Background {}x{} at scale {:.3}",
            raster.width,
            raster.height,
            image.scale
        );
        self.document.background.image = Some(image);
        self.save_history("Replace background image");
    }

    /// Drop the background image, revealing the solid color again.
    pub fn remove_background_image(&mut self) -> bool {
        if self.document.background.image.take().is_none() {
            return false;
        }
        self.save_history("Remove background image");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::BackgroundPaint;
    use crate::objects::{
        FontWeight, ObjectKind, SceneObject, SerializableColor, ShapeKind, ShapeObject, TextObject,
    };
    use crate::raster::solid_png;
    use kurbo::Point;
    use std::collections::HashSet;

    fn editor_with(objects: Vec<SceneObject>) -> (Editor, Vec<ObjectId>) {
        let mut editor = Editor::default();
        let ids = objects
            .into_iter()
            .map(|o| editor.document.add_object(o))
            .collect();
        editor.save_history("Setup");
        (editor, ids)
    }

    fn rect(x: f64, y: f64) -> SceneObject {
        SceneObject::Shape(ShapeObject::new(ShapeKind::rectangle(), Point::new(x, y), 100.0, 100.0))
    }

    fn text(x: f64, y: f64) -> SceneObject {
        SceneObject::Text(TextObject::new(Point::new(x, y), 200.0, "Save the date"))
    }

    fn assert_ids_unique(editor: &Editor) {
        let ids = editor.document().z_order();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_delete_removes_and_clears_selection() {
        let (mut editor, ids) = editor_with(vec![rect(0.0, 0.0), rect(200.0, 0.0), rect(400.0, 0.0)]);
        editor.select(ids[0]);
        editor.add_to_selection(ids[2]);
        assert_eq!(editor.delete_selected(), 2);
        assert_eq!(editor.document().z_order(), vec![ids[1]]);
        assert!(editor.selection().is_empty());
        assert_eq!(editor.history().current().label(), "Delete");
    }

    #[test]
    fn test_delete_twice_is_noop() {
        let (mut editor, ids) = editor_with(vec![rect(0.0, 0.0)]);
        editor.select(ids[0]);
        editor.delete_selected();
        let state = editor.to_json().unwrap();
        let entries = editor.history().len();
        assert_eq!(editor.delete_selected(), 0);
        assert_eq!(editor.to_json().unwrap(), state);
        assert_eq!(editor.history().len(), entries);
    }

    #[test]
    fn test_duplicate_offsets_clones_and_keeps_original() {
        let (mut editor, ids) = editor_with(vec![rect(10.0, 20.0), text(100.0, 300.0)]);
        editor.select_all();
        let original = editor.document().get(ids[0]).cloned().unwrap();

        let clones = editor.duplicate_selected();
        assert_eq!(clones.len(), 2);
        assert_eq!(editor.selection().ids(), clones.as_slice());
        assert_eq!(editor.document().get(ids[0]), Some(&original));

        let clone = editor.document().get(clones[0]).unwrap();
        assert_eq!(clone.position(), Point::new(30.0, 40.0));
        assert_eq!(clone.kind(), ObjectKind::Shape);
        assert_eq!(
            clone.as_shape().map(|s| &s.style),
            original.as_shape().map(|s| &s.style)
        );
        let text_clone = editor.document().get(clones[1]).unwrap();
        assert_eq!(text_clone.position(), Point::new(120.0, 320.0));
        assert_ids_unique(&editor);
    }

    #[test]
    fn test_ids_stay_unique_across_operations() {
        let (mut editor, ids) = editor_with(vec![rect(0.0, 0.0), rect(50.0, 50.0)]);
        editor.select_all();
        editor.duplicate_selected();
        editor.duplicate_selected();
        assert_eq!(editor.document().len(), 6);
        editor.select(ids[1]);
        editor.delete_selected();
        assert_eq!(editor.document().len(), 5);
        assert_ids_unique(&editor);
    }

    #[test]
    fn test_reorder_requires_single_selection() {
        let (mut editor, ids) = editor_with(vec![rect(0.0, 0.0), rect(50.0, 50.0)]);
        editor.select_all();
        assert!(!editor.bring_forward());
        editor.select(ids[0]);
        assert!(editor.bring_forward());
        assert_eq!(editor.document().z_order(), vec![ids[1], ids[0]]);
        assert!(!editor.bring_forward());
        assert_eq!(editor.history().current().label(), "Bring forward");
        assert!(editor.send_to_back());
        assert_eq!(editor.document().z_order(), vec![ids[0], ids[1]]);
    }

    #[test]
    fn test_update_property_touches_matching_variants_only() {
        let (mut editor, ids) = editor_with(vec![rect(0.0, 0.0), text(0.0, 200.0)]);
        editor.select_all();
        let entries = editor.history().len();

        assert_eq!(editor.update_property(PropertyUpdate::FontWeight(FontWeight::Bold)), 1);
        assert_eq!(editor.history().len(), entries + 1);
        let text = editor.document().get(ids[1]).and_then(SceneObject::as_text).unwrap();
        assert_eq!(text.style.font_weight, FontWeight::Bold);

        assert_eq!(editor.update_property(PropertyUpdate::Opacity(0.5)), 2);
        assert_eq!(editor.history().len(), entries + 2);

        // Same value again: nothing changes, nothing is committed.
        assert_eq!(editor.update_property(PropertyUpdate::Opacity(0.5)), 0);
        assert_eq!(editor.history().len(), entries + 2);
    }

    #[test]
    fn test_update_property_empty_selection() {
        let (mut editor, _) = editor_with(vec![rect(0.0, 0.0)]);
        let red = SerializableColor::new(255, 0, 0, 255);
        assert_eq!(editor.update_property(PropertyUpdate::Fill(Some(red))), 0);
    }

    #[test]
    fn test_hide_and_rotate() {
        let (mut editor, ids) = editor_with(vec![rect(0.0, 0.0)]);
        editor.select(ids[0]);
        assert_eq!(editor.set_selected_visible(false), 1);
        assert_eq!(editor.set_selected_visible(false), 0);
        assert_eq!(editor.rotate_selected(45.0), 1);
        let object = editor.document().get(ids[0]).unwrap();
        assert!(!object.is_visible());
        assert_eq!(object.rotation(), 45.0);
    }

    #[test]
    fn test_background_image_replace_and_remove() {
        let (mut editor, _) = editor_with(vec![]);
        let color = editor.document().background.color;
        let entries = editor.history().len();

        editor
            .replace_background_image(solid_png(60, 84, [10, 20, 30, 255]))
            .unwrap();
        assert!(matches!(editor.document().background.paint(), BackgroundPaint::Image(_)));
        assert_eq!(editor.history().len(), entries + 1);

        assert!(editor.remove_background_image());
        assert_eq!(editor.document().background.paint(), BackgroundPaint::Color(color));
        assert_eq!(editor.history().len(), entries + 2);
        assert!(!editor.remove_background_image());
    }

    #[test]
    fn test_bad_background_upload_changes_nothing() {
        let (mut editor, _) = editor_with(vec![]);
        let before = editor.to_json().unwrap();
        assert!(editor.replace_background_image(b"GIF89a".to_vec()).is_err());
        assert_eq!(editor.to_json().unwrap(), before);
    }

    #[test]
    fn test_async_background_applies_on_poll() {
        let (mut editor, _) = editor_with(vec![]);
        editor.replace_background_image_async(solid_png(30, 30, [0, 0, 0, 255]));
        assert_eq!(editor.signals().pending_background_loads, 1);
        // Nothing applied until the editor thread collects the result.
        assert!(!editor.document().background.has_image());

        let finished = editor.wait_background_loads();
        assert_eq!(finished.len(), 1);
        assert!(editor.document().background.has_image());
        assert_eq!(editor.signals().pending_background_loads, 0);
    }

    #[test]
    fn test_background_color_kept_under_image() {
        let (mut editor, _) = editor_with(vec![]);
        editor
            .replace_background_image(solid_png(10, 10, [0, 0, 0, 255]))
            .unwrap();
        let blush = SerializableColor::new(244, 194, 194, 255);
        editor.set_background_color(blush);
        assert!(editor.document().background.has_image());
        editor.remove_background_image();
        assert_eq!(editor.document().background.paint(), BackgroundPaint::Color(blush));
    }

    #[test]
    fn test_font_family_applies_to_every_selected_text() {
        let (mut editor, ids) = editor_with(vec![
            text(0.0, 0.0),
            rect(0.0, 100.0),
            text(0.0, 300.0),
            text(0.0, 500.0),
        ]);
        editor.select_all();
        let entries = editor.history().len();

        assert_eq!(editor.update_property(PropertyUpdate::FontFamily("Great Vibes".into())), 3);
        assert_eq!(editor.history().len(), entries + 1);
        assert_eq!(editor.history().current().label(), "Change font");
        for id in [ids[0], ids[2], ids[3]] {
            let text = editor.document().get(id).and_then(SceneObject::as_text).unwrap();
            assert_eq!(text.style.font_family, "Great Vibes");
        }
    }

    #[test]
    fn test_overlapping_background_uploads_last_to_finish_wins() {
        fn slow_decode(bytes: Vec<u8>) -> EditorResult<DecodedRaster> {
            std::thread::sleep(std::time::Duration::from_millis(300));
            raster::decode(bytes)
        }
        let (mut editor, _) = editor_with(vec![]);
        let entries = editor.history().len();

        // Issued first, resolves last.
        let slow = editor.loader.spawn_with(solid_png(40, 20, [200, 0, 0, 255]), slow_decode);
        let fast = editor.replace_background_image_async(solid_png(20, 40, [0, 0, 200, 255]));
        assert_eq!(editor.signals().pending_background_loads, 2);

        let finished = editor.wait_background_loads();
        let order: Vec<u64> = finished.iter().map(|load| load.ticket).collect();
        assert_eq!(order, vec![fast, slow]);

        let installed = editor.document().background.image.as_ref().unwrap();
        assert_eq!((installed.source_width, installed.source_height), (40, 20));
        assert_eq!(editor.history().len(), entries + 2);
        assert_eq!(editor.signals().pending_background_loads, 0);
    }
}
