//! Keyboard bindings for mode and tool selection.

use super::{DrawObject, Mode};

/// What a key press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    SetMode(Mode),
    /// Switch to draw mode with the given object.
    Draw(DrawObject),
}

/// A keyboard binding definition.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: &'static str,
    pub action: KeyAction,
    pub description: &'static str,
}

impl KeyBinding {
    /// A binding of `key` to `action`.
    pub const fn new(key: &'static str, action: KeyAction, description: &'static str) -> Self {
        Self {
            key,
            action,
            description,
        }
    }

    /// All bindings. Drag mode has no key.
    pub fn all() -> &'static [KeyBinding] {
        BINDINGS
    }

    /// Action bound to `key`, if any.
    pub fn lookup(key: &str) -> Option<KeyAction> {
        BINDINGS
            .iter()
            .find(|binding| binding.key == key)
            .map(|binding| binding.action)
    }

    /// Format for display, e.g. "2  Draw wall line".
    pub fn format(&self) -> String {
        format!("{:<3}{}", self.key, self.description)
    }
}

const BINDINGS: &[KeyBinding] = &[
    KeyBinding::new("0", KeyAction::SetMode(Mode::Erase), "Erase"),
    KeyBinding::new("1", KeyAction::SetMode(Mode::Select), "Select"),
    KeyBinding::new("2", KeyAction::Draw(DrawObject::Line), "Draw wall line"),
    KeyBinding::new("3", KeyAction::Draw(DrawObject::Rectangle), "Draw wall rectangle"),
    KeyBinding::new("4", KeyAction::Draw(DrawObject::Circle), "Draw wall circle"),
    KeyBinding::new("5", KeyAction::Draw(DrawObject::Ruler), "Draw ruler"),
];
