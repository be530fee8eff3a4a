//! Current selection and saved color palette.

use crate::objects::{ObjectId, SerializableColor};

/// The transient set of selected objects, in the order they were picked.
/// Never serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<ObjectId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single object.
    pub fn select_only(&mut self, id: ObjectId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Replace the selection with a group of objects.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }

    /// Add to selection (no-op if already selected).
    pub fn add(&mut self, id: ObjectId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    /// Keep only ids matching the predicate.
    pub fn retain(&mut self, mut keep: impl FnMut(ObjectId) -> bool) {
        self.ids.retain(|&id| keep(id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The selected object when exactly one is selected.
    pub fn single(&self) -> Option<ObjectId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }
}

/// User-saved colors, de-duplicated, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedPalette {
    colors: Vec<SerializableColor>,
}

impl SavedPalette {
    /// Add a color. Returns false if it was already saved.
    pub fn add(&mut self, color: SerializableColor) -> bool {
        if self.colors.contains(&color) {
            return false;
        }
        self.colors.push(color);
        true
    }

    pub fn colors(&self) -> &[SerializableColor] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
