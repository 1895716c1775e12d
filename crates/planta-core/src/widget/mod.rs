//! Hover and selection state of scene objects.
//!
//! Shapes remain pure data. Widgets track how the user is interacting with them.

mod manager;
mod state;

pub use manager::WidgetManager;
pub use state::WidgetState;
