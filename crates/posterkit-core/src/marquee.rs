//! Marquee (rubber-band) selection state machine.

use crate::elements::{Element, ElementId};
use crate::geometry::{elements_in_marquee, normalize_rect};
use kurbo::{Point, Rect, Vec2};

/// Default drag distance, in logical units, before a marquee selects anything.
pub const MARQUEE_THRESHOLD: f64 = 5.0;

/// State of a marquee interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MarqueeState {
    #[default]
    Idle,
    Dragging {
        /// Press position in logical units.
        start: Point,
        current: Point,
        /// Extend modifier was held at press time.
        additive: bool,
        /// Selection before the drag started.
        base: Vec<ElementId>,
    },
}

/// Tracks one marquee gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Marquee {
    state: MarqueeState,
    threshold: f64,
}

impl Default for Marquee {
    fn default() -> Self {
        Self::new(MARQUEE_THRESHOLD)
    }
}

impl Marquee {
    pub fn new(threshold: f64) -> Self {
        Self {
            state: MarqueeState::Idle,
            threshold,
        }
    }

    pub fn state(&self) -> &MarqueeState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, MarqueeState::Dragging { .. })
    }

    /// Enter the dragging state.
    pub fn begin(&mut self, start: Point, additive: bool, base: &[ElementId]) {
        self.state = MarqueeState::Dragging {
            start,
            current: start,
            additive,
            base: base.to_vec(),
        };
    }

    pub fn update(&mut self, point: Point) {
        if let MarqueeState::Dragging { current, .. } = &mut self.state {
            *current = point;
        }
    }

    /// Signed extent from the press point; may be negative on either axis.
    pub fn extent(&self) -> Option<Vec2> {
        match &self.state {
            MarqueeState::Dragging { start, current, .. } => Some(*current - *start),
            MarqueeState::Idle => None,
        }
    }

    /// Normalized rectangle for drawing the rubber band.
    pub fn rect(&self) -> Option<Rect> {
        match &self.state {
            MarqueeState::Dragging { start, current, .. } => {
                Some(normalize_rect(*start, *current - *start))
            }
            MarqueeState::Idle => None,
        }
    }

    /// Release the marquee and return the new selection, if it changes.
    ///
    /// Below the threshold on both axes nothing changes. Otherwise the hits
    /// replace the selection, or extend the pre-drag one when the gesture
    /// started with the extend modifier.
    pub fn finish(&mut self, elements: &[Element]) -> Option<Vec<ElementId>> {
        let MarqueeState::Dragging {
            start,
            current,
            additive,
            base,
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };

        let extent = current - start;
        if extent.x.abs() <= self.threshold && extent.y.abs() <= self.threshold {
            return None;
        }

        let hits = elements_in_marquee(elements, normalize_rect(start, extent));
        if !additive {
            return Some(hits);
        }
        let mut union = base;
        for id in hits {
            if !union.contains(&id) {
                union.push(id);
            }
        }
        Some(union)
    }

    /// Abort without changing the selection.
    pub fn cancel(&mut self) {
        self.state = MarqueeState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{CircleElement, RectElement};

    #[test]
    fn test_reverse_drag_selects_circle() {
        let circle: Element = CircleElement::centered(Point::new(100.0, 100.0), 60.0).into();
        let id = circle.id();
        let elements = vec![circle];

        let mut marquee = Marquee::default();
        marquee.begin(Point::new(300.0, 300.0), false, &[]);
        marquee.update(Point::new(50.0, 50.0));
        assert_eq!(marquee.rect(), Some(Rect::new(50.0, 50.0, 300.0, 300.0)));
        assert_eq!(marquee.finish(&elements), Some(vec![id]));
        assert!(!marquee.is_active());
    }

    #[test]
    fn test_below_threshold_changes_nothing() {
        let rect: Element = RectElement::new(Point::ZERO, 100.0, 100.0).into();
        let mut marquee = Marquee::default();
        marquee.begin(Point::new(10.0, 10.0), false, &[]);
        marquee.update(Point::new(15.0, 5.0));
        assert_eq!(marquee.finish(&[rect]), None);
    }

    #[test]
    fn test_threshold_on_one_axis_is_enough() {
        let rect: Element = RectElement::new(Point::ZERO, 100.0, 100.0).into();
        let id = rect.id();
        let mut marquee = Marquee::default();
        marquee.begin(Point::new(10.0, 10.0), false, &[]);
        marquee.update(Point::new(16.0, 10.0));
        assert_eq!(marquee.finish(&[rect]), Some(vec![id]));
    }

    #[test]
    fn test_additive_unions_with_base() {
        let a: Element = RectElement::new(Point::ZERO, 50.0, 50.0).into();
        let b: Element = RectElement::new(Point::new(200.0, 200.0), 50.0, 50.0).into();
        let (a_id, b_id) = (a.id(), b.id());
        let elements = vec![a, b];

        let mut marquee = Marquee::default();
        marquee.begin(Point::new(150.0, 150.0), true, &[a_id]);
        marquee.update(Point::new(300.0, 300.0));
        assert_eq!(marquee.finish(&elements), Some(vec![a_id, b_id]));
    }

    #[test]
    fn test_empty_hit_replaces_with_nothing() {
        let a: Element = RectElement::new(Point::ZERO, 50.0, 50.0).into();
        let a_id = a.id();
        let mut marquee = Marquee::default();
        marquee.begin(Point::new(500.0, 500.0), false, &[a_id]);
        marquee.update(Point::new(600.0, 600.0));
        assert_eq!(marquee.finish(&[a]), Some(Vec::new()));
    }

    #[test]
    fn test_cancel_resets() {
        let mut marquee = Marquee::default();
        marquee.begin(Point::ZERO, false, &[]);
        marquee.update(Point::new(100.0, 100.0));
        marquee.cancel();
        assert_eq!(marquee.state(), &MarqueeState::Idle);
        assert_eq!(marquee.finish(&[]), None);
    }
}
