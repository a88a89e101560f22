//! Pointer and keyboard input types.
//!
//! Positions are in screen pixels relative to the stage origin; the editor
//! converts them to logical canvas units through the viewport.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// Click with this modifier toggles membership instead of replacing.
    pub fn toggles_selection(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Marquee started with this modifier adds to the existing selection.
    pub fn extends_marquee(&self) -> bool {
        self.shift
    }
}

/// Pointer event on the stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    /// Pointer left the stage.
    Leave,
}

impl PointerEvent {
    /// Primary-button press without modifiers.
    pub fn down(position: Point) -> Self {
        PointerEvent::Down {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn down_with(position: Point, modifiers: Modifiers) -> Self {
        PointerEvent::Down {
            position,
            button: MouseButton::Left,
            modifiers,
        }
    }

    pub fn moved(position: Point) -> Self {
        PointerEvent::Move { position }
    }

    pub fn up(position: Point) -> Self {
        PointerEvent::Up {
            position,
            button: MouseButton::Left,
        }
    }
}

/// A key press as reported by the host (`key` follows DOM `KeyboardEvent.key`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_roles() {
        assert!(Modifiers::CTRL.toggles_selection());
        assert!(Modifiers::META.toggles_selection());
        assert!(!Modifiers::SHIFT.toggles_selection());
        assert!(Modifiers::SHIFT.extends_marquee());
        assert!(!Modifiers::NONE.extends_marquee());
    }

    #[test]
    fn test_constructors() {
        let event = PointerEvent::down(Point::new(1.0, 2.0));
        assert!(matches!(
            event,
            PointerEvent::Down {
                button: MouseButton::Left,
                modifiers: Modifiers::NONE,
                ..
            }
        ));
        assert_eq!(KeyPress::plain("a").modifiers, Modifiers::NONE);
    }
}
