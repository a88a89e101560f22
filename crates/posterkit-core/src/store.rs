//! Element store: the canonical element collection and its layering.
//!
//! Every mutation swaps in a new collection, so a snapshot taken before a
//! change stays valid and observers can detect change with [`Arc::ptr_eq`].

use crate::elements::{Element, ElementId, ElementPatch};
use std::sync::Arc;

/// Owns the elements of one document in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Arc<Vec<Element>>,
}

impl ElementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from existing elements, dropping duplicate ids.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let mut store = Self::new();
        store.add_many(elements);
        store
    }

    /// Cheap, immutable view of the current collection.
    pub fn snapshot(&self) -> Arc<Vec<Element>> {
        Arc::clone(&self.elements)
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Get an element by ID.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    fn replace(&mut self, elements: Vec<Element>) {
        self.elements = Arc::new(elements);
    }

    /// Append an element. Rejected if its id is already present.
    pub fn add(&mut self, element: Element) -> bool {
        if self.contains(element.id()) {
            log::warn!("Ignoring element with duplicate id {}", element.id());
            return false;
        }
        let mut elements = self.elements.to_vec();
        elements.push(element);
        self.replace(elements);
        true
    }

    /// Append several elements in one replacement. Returns how many were added.
    pub fn add_many(&mut self, new_elements: impl IntoIterator<Item = Element>) -> usize {
        let mut elements = self.elements.to_vec();
        let before = elements.len();
        for element in new_elements {
            if elements.iter().any(|e| e.id() == element.id()) {
                log::warn!("Ignoring element with duplicate id {}", element.id());
                continue;
            }
            elements.push(element);
        }
        let added = elements.len() - before;
        if added > 0 {
            self.replace(elements);
        }
        added
    }

    /// Merge a patch into an element.
    ///
    /// Unknown ids, mismatched kinds and invalid geometry leave the store untouched.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let mut updated = self.elements[index].clone();
        if let Err(err) = updated.apply_patch(patch) {
            log::debug!("Rejected update for {id}: {err}");
            return false;
        }
        if updated == self.elements[index] {
            return false;
        }
        let mut elements = self.elements.to_vec();
        elements[index] = updated;
        self.replace(elements);
        true
    }

    /// Apply several patches in one replacement. Returns how many elements changed.
    pub fn update_many<'a>(
        &mut self,
        patches: impl IntoIterator<Item = (ElementId, &'a ElementPatch)>,
    ) -> usize {
        let mut elements = self.elements.to_vec();
        let mut changed = 0;
        for (id, patch) in patches {
            let Some(element) = elements.iter_mut().find(|e| e.id() == id) else {
                continue;
            };
            let mut updated = element.clone();
            match updated.apply_patch(patch) {
                Ok(()) if updated != *element => {
                    *element = updated;
                    changed += 1;
                }
                Ok(()) => {}
                Err(err) => log::debug!("Rejected update for {id}: {err}"),
            }
        }
        if changed > 0 {
            self.replace(elements);
        }
        changed
    }

    /// Remove an element by ID.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        let mut elements = self.elements.to_vec();
        let removed = elements.remove(index);
        self.replace(elements);
        Some(removed)
    }

    /// Remove every listed element in one replacement.
    pub fn remove_many(&mut self, ids: &[ElementId]) -> Vec<Element> {
        if !self.elements.iter().any(|e| ids.contains(&e.id())) {
            return Vec::new();
        }
        let (removed, kept): (Vec<Element>, Vec<Element>) = self
            .elements
            .iter()
            .cloned()
            .partition(|e| ids.contains(&e.id()));
        self.replace(kept);
        removed
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.replace(Vec::new());
        }
    }

    pub fn max_z_index(&self) -> Option<i64> {
        self.elements.iter().map(Element::z_index).max()
    }

    pub fn min_z_index(&self) -> Option<i64> {
        self.elements.iter().map(Element::z_index).min()
    }

    /// zIndex for a newly created element (max + 1, or 0 when empty).
    pub fn next_z_index(&self) -> i64 {
        self.max_z_index().map_or(0, |z| z + 1)
    }

    fn set_z_indices(&mut self, changes: &[(usize, i64)]) {
        let mut elements = self.elements.to_vec();
        for &(index, z_index) in changes {
            elements[index].base_mut().z_index = z_index;
        }
        self.replace(elements);
    }

    /// Move an element above everything else.
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let z = self.elements[index].z_index();
        let others_max = self
            .elements
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, e)| e.z_index())
            .max();
        match others_max {
            Some(max) if max >= z => {
                self.set_z_indices(&[(index, max + 1)]);
                true
            }
            _ => false,
        }
    }

    /// Move an element below everything else.
    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let z = self.elements[index].z_index();
        let others_min = self
            .elements
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, e)| e.z_index())
            .min();
        match others_min {
            Some(min) if min <= z => {
                self.set_z_indices(&[(index, min - 1)]);
                true
            }
            _ => false,
        }
    }

    /// Swap zIndex with the nearest element above.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let z = self.elements[index].z_index();
        let neighbor = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.z_index() > z)
            .min_by_key(|(_, e)| e.z_index());
        match neighbor {
            Some((other, e)) => {
                let other_z = e.z_index();
                self.set_z_indices(&[(index, other_z), (other, z)]);
                true
            }
            None => false,
        }
    }

    /// Swap zIndex with the nearest element below.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let z = self.elements[index].z_index();
        let neighbor = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.z_index() < z)
            .max_by_key(|(i, e)| (e.z_index(), std::cmp::Reverse(*i)));
        match neighbor {
            Some((other, e)) => {
                let other_z = e.z_index();
                self.set_z_indices(&[(index, other_z), (other, z)]);
                true
            }
            None => false,
        }
    }

    /// Flip the locked flag of an element.
    pub fn toggle_lock(&mut self, id: ElementId) -> bool {
        let Some(locked) = self.get(id).map(Element::is_locked) else {
            return false;
        };
        self.update(id, &ElementPatch::default().with_locked(!locked))
    }

    /// Elements sorted back to front; ties keep collection order.
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.z_index());
        ordered
    }

    /// Serialize the collection to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.elements.as_slice())
    }

    /// Deserialize a collection from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let elements: Vec<Element> = serde_json::from_str(json)?;
        Ok(Self::from_elements(elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{CircleElement, CommonPatch, RectElement, RectPatch, TransformStyle};
    use kurbo::Point;

    fn rect(z: i64) -> Element {
        Element::from(RectElement::new(Point::ZERO, 100.0, 100.0)).with_z_index(z)
    }

    #[test]
    fn test_add_and_get() {
        let mut store = ElementStore::new();
        let element = rect(0);
        let id = element.id();
        assert!(store.add(element));
        assert_eq!(store.len(), 1);
        assert!(store.get(id).is_some());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = ElementStore::new();
        let element = rect(0);
        assert!(store.add(element.clone()));
        assert!(!store.add(element));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_mutation_replaces_collection() {
        let mut store = ElementStore::new();
        let element = rect(0);
        let id = element.id();
        store.add(element);

        let before = store.snapshot();
        assert!(store.update(id, &ElementPatch::position(5.0, 5.0)));
        assert!(!Arc::ptr_eq(&before, &store.snapshot()));
        // The old snapshot still shows the old value.
        assert!((before[0].base().x - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut store = ElementStore::new();
        store.add(rect(0));
        let before = store.snapshot();
        let ghost = uuid::Uuid::new_v4();
        assert!(!store.update(ghost, &ElementPatch::position(1.0, 1.0)));
        assert!(store.remove(ghost).is_none());
        assert!(!store.bring_to_front(ghost));
        assert!(!store.send_backward(ghost));
        assert!(!store.toggle_lock(ghost));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_rejected_patch_keeps_identity() {
        let mut store = ElementStore::new();
        let element = rect(0);
        let id = element.id();
        store.add(element);
        let before = store.snapshot();
        let patch = ElementPatch::rect(RectPatch {
            width: Some(-5.0),
            ..Default::default()
        });
        assert!(!store.update(id, &patch));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    fn scale_patch(scale_x: f64, scale_y: f64) -> ElementPatch {
        ElementPatch::common(CommonPatch {
            transform: Some(TransformStyle {
                scale_x,
                scale_y,
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    #[test]
    fn test_transform_scale_respects_minimum_size() {
        let mut store = ElementStore::new();
        let element = rect(0);
        let id = element.id();
        store.add(element);
        let before = store.snapshot();

        assert!(!store.update(id, &scale_patch(0.0, 1.0)));
        assert!(!store.update(id, &scale_patch(1.0, f64::NAN)));
        assert!(!store.update(id, &scale_patch(0.005, 1.0)));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));

        // 100 * 0.01 lands exactly on the minimum; negative scale counts by magnitude.
        assert!(store.update(id, &scale_patch(0.01, -2.0)));
        let transform = store.get(id).map(|e| e.base().transform);
        assert_eq!(transform.map(|t| t.scale_y), Some(-2.0));
    }

    #[test]
    fn test_transform_scale_respects_circle_minimum() {
        let mut store = ElementStore::new();
        let circle: Element = CircleElement::new(Point::ZERO, 40.0).into();
        let id = circle.id();
        store.add(circle);

        assert!(!store.update(id, &scale_patch(0.2, 1.0)));
        assert!(store.update(id, &scale_patch(0.25, 3.0)));
    }

    #[test]
    fn test_invalid_skew_rejected() {
        let mut store = ElementStore::new();
        let element = rect(0);
        let id = element.id();
        store.add(element);

        for skew_x in [90.0, -120.0, f64::INFINITY] {
            let patch = ElementPatch::common(CommonPatch {
                transform: Some(TransformStyle {
                    skew_x,
                    ..Default::default()
                }),
                ..Default::default()
            });
            assert!(!store.update(id, &patch));
        }
        assert!(store.get(id).is_some_and(|e| e.base().transform.is_identity()));
    }

    #[test]
    fn test_bring_to_front_and_send_to_back() {
        let mut store = ElementStore::new();
        let a = rect(3);
        let b = rect(7);
        let (a_id, b_id) = (a.id(), b.id());
        store.add(a);
        store.add(b);

        assert!(store.bring_to_front(a_id));
        assert_eq!(store.get(a_id).map(Element::z_index), Some(8));
        // Already the unique maximum.
        assert!(!store.bring_to_front(a_id));

        assert!(store.send_to_back(a_id));
        assert_eq!(store.get(a_id).map(Element::z_index), Some(6));
        assert!(!store.send_to_back(a_id));
        assert_eq!(store.get(b_id).map(Element::z_index), Some(7));
    }

    #[test]
    fn test_bring_to_front_breaks_tie() {
        let mut store = ElementStore::new();
        let a = rect(1);
        let b = rect(1);
        let a_id = a.id();
        store.add(a);
        store.add(b);
        assert!(store.bring_to_front(a_id));
        assert_eq!(store.get(a_id).map(Element::z_index), Some(2));
    }

    #[test]
    fn test_bring_forward_swaps_with_nearest() {
        let mut store = ElementStore::new();
        let a = rect(1);
        let b = rect(10);
        let c = rect(4);
        let (a_id, b_id, c_id) = (a.id(), b.id(), c.id());
        store.add_many([a, b, c]);

        assert!(store.bring_forward(a_id));
        assert_eq!(store.get(a_id).map(Element::z_index), Some(4));
        assert_eq!(store.get(c_id).map(Element::z_index), Some(1));
        assert_eq!(store.get(b_id).map(Element::z_index), Some(10));

        assert!(!store.bring_forward(b_id));
        assert!(!store.send_backward(c_id));
    }

    #[test]
    fn test_forward_then_backward_restores_order() {
        let mut store = ElementStore::new();
        let elements: Vec<Element> = [0, 2, 5, 9].into_iter().map(rect).collect();
        let target = elements[1].id();
        store.add_many(elements);
        let order_before: Vec<ElementId> = store.paint_order().iter().map(|e| e.id()).collect();

        assert!(store.bring_forward(target));
        assert!(store.send_backward(target));

        let order_after: Vec<ElementId> = store.paint_order().iter().map(|e| e.id()).collect();
        assert_eq!(order_before, order_after);
        assert_eq!(store.get(target).map(Element::z_index), Some(2));
    }

    #[test]
    fn test_next_z_index() {
        let mut store = ElementStore::new();
        assert_eq!(store.next_z_index(), 0);
        store.add(rect(4));
        store.add(rect(-2));
        assert_eq!(store.next_z_index(), 5);
    }

    #[test]
    fn test_paint_order_ties_keep_collection_order() {
        let mut store = ElementStore::new();
        let first = rect(1);
        let second = Element::from(CircleElement::new(Point::ZERO, 20.0)).with_z_index(1);
        let back = rect(0);
        let ids = [back.id(), first.id(), second.id()];
        store.add_many([first, second, back]);
        let order: Vec<ElementId> = store.paint_order().iter().map(|e| e.id()).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_toggle_lock() {
        let mut store = ElementStore::new();
        let element = rect(0);
        let id = element.id();
        store.add(element);
        assert!(store.toggle_lock(id));
        assert_eq!(store.get(id).map(Element::is_locked), Some(true));
        assert!(store.toggle_lock(id));
        assert_eq!(store.get(id).map(Element::is_locked), Some(false));
    }

    #[test]
    fn test_remove_many() {
        let mut store = ElementStore::new();
        let a = rect(0);
        let b = rect(1);
        let c = rect(2);
        let (a_id, c_id) = (a.id(), c.id());
        store.add_many([a, b, c]);
        let removed = store.remove_many(&[a_id, c_id]);
        assert_eq!(removed.len(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut store = ElementStore::new();
        store.add(rect(3));
        store.add(CircleElement::new(Point::new(10.0, 10.0), 15.0).into());
        let json = store.to_json().expect("serialize");
        let restored = ElementStore::from_json(&json).expect("deserialize");
        assert_eq!(restored.elements(), store.elements());
    }
}
