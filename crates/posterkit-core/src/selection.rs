//! Selection set and click rules.

use crate::elements::ElementId;
use crate::input::Modifiers;
use serde::{Deserialize, Serialize};

/// Ordered set of selected element ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// More than one element selected.
    pub fn is_multi(&self) -> bool {
        self.ids.len() > 1
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// Replace the selection with one element, or clear it with `None`.
    pub fn select_one(&mut self, id: Option<ElementId>) {
        self.ids.clear();
        self.ids.extend(id);
    }

    /// Replace the selection, dropping duplicates while keeping order.
    pub fn select_many(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        self.extend(ids);
    }

    /// Add ids not already present, keeping order.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        for id in ids {
            self.add(id);
        }
    }

    pub fn add(&mut self, id: ElementId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: ElementId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&selected| selected != id);
        self.ids.len() != before
    }

    /// Flip membership of one element.
    pub fn toggle(&mut self, id: ElementId) {
        if !self.remove(id) {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Keep only ids for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(ElementId) -> bool) {
        self.ids.retain(|&id| keep(id));
    }

    /// Apply the click rule: background clears, a toggle modifier flips
    /// membership, a plain click selects only the target.
    pub fn apply_click(&mut self, target: Option<ElementId>, modifiers: Modifiers) {
        match target {
            None => self.clear(),
            Some(id) if modifiers.toggles_selection() => self.toggle(id),
            Some(id) => self.select_one(Some(id)),
        }
    }
}
