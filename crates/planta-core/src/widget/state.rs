//! Widget state definitions.

/// The UI state of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    #[default]
    Normal,
    /// Pointer is over the object.
    Hovered,
    /// Picked in select mode.
    Selected,
}

impl WidgetState {
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected)
    }
}
