//! Synchronized group dragging.
//!
//! The dragged element's node sits at its geometric center. Every other
//! selected element follows by the node's net displacement measured from the
//! drag-start snapshot, never from the previous frame.

use crate::elements::{Element, ElementId, ElementPatch};
use crate::selection::Selection;
use crate::store::ElementStore;
use kurbo::{Point, Vec2};

/// State of one in-flight drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    primary: ElementId,
    /// Offset from stored position to node position of the primary element.
    center_offset: Vec2,
    start_node: Point,
    current_node: Point,
    /// Drag-start stored positions of the other selected, unlocked elements.
    followers: Vec<(ElementId, Point)>,
}

impl DragSession {
    /// Start dragging `primary` with its node at `node`.
    ///
    /// Returns `None` for unknown or locked elements. Followers are recorded
    /// only when the primary element is part of a multi-selection.
    pub fn begin(
        store: &ElementStore,
        selection: &Selection,
        primary: ElementId,
        node: Point,
    ) -> Option<Self> {
        let element = store.get(primary)?;
        if element.is_locked() {
            log::debug!("Element {primary} is locked; drag ignored");
            return None;
        }

        let followers = if selection.contains(primary) && selection.is_multi() {
            selection
                .ids()
                .iter()
                .filter(|&&id| id != primary)
                .filter_map(|&id| store.get(id))
                .filter(|e| !e.is_locked())
                .map(|e| (e.id(), e.position()))
                .collect()
        } else {
            Vec::new()
        };

        Some(Self {
            primary,
            center_offset: element.center_offset(),
            start_node: node,
            current_node: node,
            followers,
        })
    }

    pub fn primary(&self) -> ElementId {
        self.primary
    }

    pub fn follower_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.followers.iter().map(|(id, _)| *id)
    }

    /// Net node displacement since drag start.
    pub fn delta(&self) -> Vec2 {
        self.current_node - self.start_node
    }

    /// Stored position of the primary element for the current node position.
    pub fn primary_position(&self) -> Point {
        self.current_node - self.center_offset
    }

    /// Record a new node position and return the position patches for the
    /// primary element and every follower.
    pub fn update(&mut self, node: Point) -> Vec<(ElementId, ElementPatch)> {
        self.current_node = node;
        let delta = self.delta();
        let primary = self.primary_position();
        std::iter::once((self.primary, ElementPatch::position(primary.x, primary.y)))
            .chain(self.followers.iter().map(|(id, start)| {
                let p = *start + delta;
                (*id, ElementPatch::position(p.x, p.y))
            }))
            .collect()
    }

    /// Final patches at drag end. Consumes the session so the snapshot is gone.
    pub fn finish(mut self, node: Point) -> Vec<(ElementId, ElementPatch)> {
        self.update(node)
    }
}

/// Node position for an element at rest.
pub fn node_position(element: &Element) -> Point {
    element.center()
}
