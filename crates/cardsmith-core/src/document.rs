//! Canvas document: the serialized scene.

use crate::background::Background;
use crate::error::{EditorError, EditorResult};
use crate::objects::{ObjectId, SceneObject, SerializableColor};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// A canvas document containing all objects and the background.
///
/// `objects` is kept in z-order, back to front; an object's index is its
/// z-index, so the order has no gaps or duplicates by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub background: Background,
    #[serde(default)]
    objects: Vec<SceneObject>,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new(width: f64, height: f64, background: SerializableColor) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled invitation".to_string(),
            width,
            height,
            background: Background::solid(background),
            objects: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The canvas area in canvas coordinates.
    pub fn canvas_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size())
    }

    pub fn center(&self) -> Point {
        self.canvas_rect().center()
    }

    /// Add an object on top of the stack.
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id();
        debug_assert!(self.index_of(id).is_none(), "duplicate object id {id}");
        self.objects.push(object);
        id
    }

    /// Remove an object from the document.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.index_of(id)?;
        Some(self.objects.remove(index))
    }

    /// Remove all objects.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    /// Z-index of an object.
    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Objects in z-order (back to front).
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Object ids in z-order (back to front).
    pub fn z_order(&self) -> Vec<ObjectId> {
        self.objects.iter().map(SceneObject::id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Bring an object to the front (topmost).
    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if index + 1 == self.objects.len() {
            return false;
        }
        let object = self.objects.remove(index);
        self.objects.push(object);
        true
    }

    /// Send an object to the back (bottommost).
    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if index == 0 {
            return false;
        }
        let object = self.objects.remove(index);
        self.objects.insert(0, object);
        true
    }

    /// Move an object above the nearest higher sibling that overlaps it,
    /// or one slot up if none overlaps.
    /// Returns false if already at the front.
    pub fn bring_forward(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if index + 1 >= self.objects.len() {
            return false;
        }
        let bounds = self.objects[index].bounds();
        let target = (index + 1..self.objects.len())
            .find(|&i| overlaps(bounds, self.objects[i].bounds()))
            .unwrap_or(index + 1);
        let object = self.objects.remove(index);
        self.objects.insert(target, object);
        true
    }

    /// Move an object below the nearest lower sibling that overlaps it,
    /// or one slot down if none overlaps.
    /// Returns false if already at the back.
    pub fn send_backward(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if index == 0 {
            return false;
        }
        let bounds = self.objects[index].bounds();
        let target = (0..index)
            .rev()
            .find(|&i| overlaps(bounds, self.objects[i].bounds()))
            .unwrap_or(index - 1);
        let object = self.objects.remove(index);
        self.objects.insert(target, object);
        true
    }

    /// Find visible objects at a point, front to back.
    pub fn objects_at_point(&self, point: Point, tolerance: f64) -> Vec<ObjectId> {
        self.objects
            .iter()
            .rev()
            .filter(|o| o.is_visible() && o.hit_test(point, tolerance))
            .map(SceneObject::id)
            .collect()
    }

    /// Check structural invariants of a document built outside the editor.
    pub fn validate(&self) -> EditorResult<()> {
        let mut seen = HashSet::with_capacity(self.objects.len());
        for object in &self.objects {
            if !seen.insert(object.id()) {
                return Err(EditorError::DuplicateId(object.id()));
            }
        }
        Ok(())
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize and validate a document from JSON.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let document: Self = serde_json::from_str(json)?;
        document.validate()?;
        Ok(document)
    }
}

/// Positive-area intersection of two rectangles.
fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{ShapeKind, ShapeObject};

    fn rect_at(x: f64, y: f64) -> SceneObject {
        SceneObject::Shape(ShapeObject::new(ShapeKind::rectangle(), Point::new(x, y), 100.0, 100.0))
    }

    fn document() -> CanvasDocument {
        CanvasDocument::new(600.0, 800.0, SerializableColor::white())
    }

    #[test]
    fn test_add_and_remove() {
        let mut doc = document();
        let id = doc.add_object(rect_at(0.0, 0.0));
        assert_eq!(doc.len(), 1);
        assert!(doc.get(id).is_some());
        assert!(doc.remove_object(id).is_some());
        assert!(doc.is_empty());
        assert!(doc.remove_object(id).is_none());
    }

    #[test]
    fn test_front_and_back() {
        let mut doc = document();
        let a = doc.add_object(rect_at(0.0, 0.0));
        let b = doc.add_object(rect_at(50.0, 50.0));
        assert_eq!(doc.z_order(), vec![a, b]);

        assert!(doc.bring_to_front(a));
        assert_eq!(doc.z_order(), vec![b, a]);
        assert!(!doc.bring_to_front(a));

        assert!(doc.send_to_back(a));
        assert_eq!(doc.z_order(), vec![a, b]);
    }

    #[test]
    fn test_bring_forward_skips_non_overlapping() {
        let mut doc = document();
        let a = doc.add_object(rect_at(0.0, 0.0));
        let far = doc.add_object(rect_at(400.0, 400.0));
        let over = doc.add_object(rect_at(50.0, 50.0));
        let top = doc.add_object(rect_at(300.0, 0.0));

        assert!(doc.bring_forward(a));
        assert_eq!(doc.z_order(), vec![far, over, a, top]);
        // Nothing above overlaps any more: plain one-slot move.
        assert!(doc.bring_forward(a));
        assert_eq!(doc.z_order(), vec![far, over, top, a]);
        assert!(!doc.bring_forward(a));
    }

    #[test]
    fn test_send_backward_skips_non_overlapping() {
        let mut doc = document();
        let bottom = doc.add_object(rect_at(50.0, 50.0));
        let far = doc.add_object(rect_at(400.0, 400.0));
        let a = doc.add_object(rect_at(0.0, 0.0));

        assert!(doc.send_backward(a));
        assert_eq!(doc.z_order(), vec![a, bottom, far]);
        assert!(!doc.send_backward(a));
    }

    #[test]
    fn test_objects_at_point_front_first() {
        let mut doc = document();
        let a = doc.add_object(rect_at(0.0, 0.0));
        let b = doc.add_object(rect_at(50.0, 50.0));
        assert_eq!(doc.objects_at_point(Point::new(75.0, 75.0), 0.0), vec![b, a]);
        assert_eq!(doc.objects_at_point(Point::new(10.0, 10.0), 0.0), vec![a]);
    }

    #[test]
    fn test_json_roundtrip_preserves_order() {
        let mut doc = document();
        doc.add_object(rect_at(0.0, 0.0));
        doc.add_object(rect_at(10.0, 10.0));
        let json = doc.to_json().unwrap();
        let back = CanvasDocument::from_json(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut doc = document();
        let object = rect_at(0.0, 0.0);
        doc.objects.push(object.clone());
        doc.objects.push(object.clone());
        let json = serde_json::to_string(&doc).unwrap();
        assert!(matches!(
            CanvasDocument::from_json(&json),
            Err(EditorError::DuplicateId(id)) if id == object.id()
        ));
    }
}
