//! In-memory element clipboard.

use crate::elements::Element;
use crate::selection::Selection;
use crate::store::ElementStore;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Offset applied to pasted and duplicated elements.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Value copies of elements, independent of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clipboard {
    items: Vec<Element>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Element] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Replace the contents with copies of the selected elements, in
    /// selection order. An empty or stale selection leaves the clipboard as is.
    pub fn copy_selection(&mut self, store: &ElementStore, selection: &Selection) -> usize {
        let copies: Vec<Element> = selection
            .ids()
            .iter()
            .filter_map(|&id| store.get(id).cloned())
            .collect();
        if copies.is_empty() {
            return 0;
        }
        self.items = copies;
        self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Fresh copies of `sources` for paste or duplicate.
///
/// Each copy gets a new id, is shifted by `offset`, and is stacked above
/// `max_z` in source order.
pub fn offset_copies(sources: &[Element], max_z: i64, offset: Vec2) -> Vec<Element> {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let mut copy = source.clone();
            copy.regenerate_id();
            copy.translate(offset);
            copy.with_z_index(max_z + i as i64 + 1)
        })
        .collect()
}
