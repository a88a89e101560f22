//! Keyboard shortcut table and matching.

use crate::input::{KeyPress, Modifiers};
use crate::tools::ToolKind;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShortcutError {
    #[error("Empty shortcut")]
    Empty,
    #[error("Shortcut '{0}' has no key")]
    MissingKey(String),
    #[error("Unknown modifier '{modifier}' in '{combo}'")]
    UnknownModifier { combo: String, modifier: String },
}

pub type ShortcutResult<T> = Result<T, ShortcutError>;

/// Host platform, which decides how Ctrl and Meta are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    MacOs,
    #[default]
    Other,
}

impl Platform {
    /// Platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }
}

/// A parsed combo such as `ctrl+shift+]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    /// Lowercased key name (DOM `key` values: "a", "arrowup", "]").
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl FromStr for KeyCombo {
    type Err = ShortcutError;

    fn from_str(combo: &str) -> ShortcutResult<Self> {
        let lower = combo.trim().to_lowercase();
        if lower.is_empty() {
            return Err(ShortcutError::Empty);
        }
        let mut parts: Vec<&str> = lower.split('+').collect();
        let key = parts.pop().unwrap_or_default();
        if key.is_empty() {
            return Err(ShortcutError::MissingKey(combo.to_string()));
        }

        let mut parsed = KeyCombo {
            key: key.to_string(),
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
        };
        for part in parts {
            match part {
                "ctrl" => parsed.ctrl = true,
                "shift" => parsed.shift = true,
                "alt" => parsed.alt = true,
                "cmd" | "meta" => parsed.meta = true,
                other => {
                    return Err(ShortcutError::UnknownModifier {
                        combo: combo.to_string(),
                        modifier: other.to_string(),
                    });
                }
            }
        }
        Ok(parsed)
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "ctrl+")?;
        }
        if self.meta {
            write!(f, "cmd+")?;
        }
        if self.alt {
            write!(f, "alt+")?;
        }
        if self.shift {
            write!(f, "shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Base key for a shifted symbol on a US layout.
fn unshifted(key: &str) -> Option<&'static str> {
    Some(match key {
        "}" => "]",
        "{" => "[",
        "|" => "\\",
        ":" => ";",
        "\"" => "'",
        "<" => ",",
        ">" => ".",
        "?" => "/",
        "~" => "`",
        "!" => "1",
        "@" => "2",
        "#" => "3",
        "$" => "4",
        "%" => "5",
        "^" => "6",
        "&" => "7",
        "*" => "8",
        "(" => "9",
        ")" => "0",
        "_" => "-",
        "+" => "=",
        _ => return None,
    })
}

/// Key name used for matching: shifted symbols map back to their base key.
pub fn normalize_key(key: &str, shift: bool) -> String {
    match unshifted(key) {
        Some(base) if shift => base.to_string(),
        _ => key.to_lowercase(),
    }
}

impl KeyCombo {
    pub fn matches(&self, press: &KeyPress, platform: Platform) -> bool {
        let Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        } = press.modifiers;
        let wants_command = self.ctrl || self.meta;
        let command_matches = match platform {
            Platform::MacOs => wants_command == (ctrl || meta),
            Platform::Other => wants_command == ctrl,
        };
        command_matches
            && self.shift == shift
            && self.alt == alt
            && normalize_key(&press.key, shift) == self.key
    }
}

/// Editor commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    DeleteSelected,
    Copy,
    Cut,
    Paste,
    Duplicate,
    /// Clear the selection and return to the select tool.
    Escape,
    SelectAll,
    Nudge { dx: f64, dy: f64 },
    BringForward,
    SendBackward,
    BringToFront,
    SendToBack,
    ToggleLock,
    SetTool(ToolKind),
}

/// Ordered (combo, command) pairs; the first match wins.
#[derive(Debug, Clone)]
pub struct ShortcutTable {
    platform: Platform,
    bindings: Vec<(KeyCombo, Command)>,
}

impl ShortcutTable {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            bindings: Vec::new(),
        }
    }

    pub fn bind(&mut self, combo: &str, command: Command) -> ShortcutResult<()> {
        let combo = combo.parse()?;
        self.bindings.push((combo, command));
        Ok(())
    }

    pub fn bindings(&self) -> &[(KeyCombo, Command)] {
        &self.bindings
    }

    /// The built-in bindings with the given nudge distances.
    pub fn default_table(platform: Platform, nudge: f64, nudge_fast: f64) -> Self {
        let mut table = Self::new(platform);
        let defaults: [(&str, Command); 23] = [
            ("delete", Command::DeleteSelected),
            ("backspace", Command::DeleteSelected),
            ("ctrl+c", Command::Copy),
            ("ctrl+x", Command::Cut),
            ("ctrl+v", Command::Paste),
            ("ctrl+d", Command::Duplicate),
            ("escape", Command::Escape),
            ("ctrl+a", Command::SelectAll),
            ("arrowup", Command::Nudge { dx: 0.0, dy: -nudge }),
            ("arrowdown", Command::Nudge { dx: 0.0, dy: nudge }),
            ("arrowleft", Command::Nudge { dx: -nudge, dy: 0.0 }),
            ("arrowright", Command::Nudge { dx: nudge, dy: 0.0 }),
            ("shift+arrowup", Command::Nudge { dx: 0.0, dy: -nudge_fast }),
            ("shift+arrowdown", Command::Nudge { dx: 0.0, dy: nudge_fast }),
            ("shift+arrowleft", Command::Nudge { dx: -nudge_fast, dy: 0.0 }),
            ("shift+arrowright", Command::Nudge { dx: nudge_fast, dy: 0.0 }),
            ("ctrl+]", Command::BringForward),
            ("ctrl+[", Command::SendBackward),
            ("ctrl+shift+]", Command::BringToFront),
            ("ctrl+shift+[", Command::SendToBack),
            ("v", Command::SetTool(ToolKind::Select)),
            ("b", Command::SetTool(ToolKind::Brush)),
            ("ctrl+l", Command::ToggleLock),
        ];
        for (combo, command) in defaults {
            if let Err(err) = table.bind(combo, command) {
                log::error!("Invalid built-in shortcut '{combo}': {err}");
            }
        }
        table
    }

    /// Command for a key press. Nothing fires while a text input has focus.
    pub fn lookup(&self, press: &KeyPress, text_input_focused: bool) -> Option<Command> {
        if text_input_focused {
            return None;
        }
        self.bindings
            .iter()
            .find(|(combo, _)| combo.matches(press, self.platform))
            .map(|(_, command)| *command)
    }
}
