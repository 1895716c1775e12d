//! Widget manager for tracking hover and selection of scene objects.

use super::state::WidgetState;
use crate::shapes::ShapeId;
use std::collections::{HashMap, HashSet};

/// UI state for scene objects, kept apart from the shape data.
#[derive(Debug, Clone, Default)]
pub struct WidgetManager {
    states: HashMap<ShapeId, WidgetState>,
    selected: HashSet<ShapeId>,
    hovered: Option<ShapeId>,
}

impl WidgetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interaction state of `id`.
    pub fn state(&self, id: ShapeId) -> WidgetState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    fn set_state(&mut self, id: ShapeId, state: WidgetState) {
        if state.is_selected() {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
        if state == WidgetState::Normal {
            self.states.remove(&id);
        } else {
            self.states.insert(id, state);
        }
    }

    /// Whether `id` is selected.
    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selected.contains(&id)
    }

    /// All selected objects.
    pub fn selected(&self) -> &HashSet<ShapeId> {
        &self.selected
    }

    /// Object under the pointer.
    pub fn hovered(&self) -> Option<ShapeId> {
        self.hovered
    }

    /// Move the hover to `id`. Returns the previously hovered object when the
    /// hover actually changed, so callers can undo its hover effect.
    pub fn set_hovered(&mut self, id: Option<ShapeId>) -> Option<Option<ShapeId>> {
        if self.hovered == id {
            return None;
        }
        let previous = self.hovered;
        if let Some(old_id) = previous {
            if self.state(old_id) == WidgetState::Hovered {
                self.set_state(old_id, WidgetState::Normal);
            }
        }
        if let Some(new_id) = id {
            if self.state(new_id) == WidgetState::Normal {
                self.set_state(new_id, WidgetState::Hovered);
            }
        }
        self.hovered = id;
        Some(previous)
    }

    /// Select a single object, clearing the rest.
    pub fn select(&mut self, id: ShapeId) {
        self.clear_selection();
        self.add_to_selection(id);
    }

    /// Add `id` to the selection.
    pub fn add_to_selection(&mut self, id: ShapeId) {
        self.set_state(id, WidgetState::Selected);
    }

    /// Remove `id` from the selection.
    pub fn deselect(&mut self, id: ShapeId) {
        if self.selected.contains(&id) {
            let state = if self.hovered == Some(id) {
                WidgetState::Hovered
            } else {
                WidgetState::Normal
            };
            self.set_state(id, state);
        }
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        let selected: Vec<_> = self.selected.iter().copied().collect();
        for id in selected {
            self.deselect(id);
        }
    }

    /// Forget a deleted object.
    pub fn remove(&mut self, id: ShapeId) {
        self.states.remove(&id);
        self.selected.remove(&id);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_hover_transitions() {
        let mut widgets = WidgetManager::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert_eq!(widgets.set_hovered(Some(a)), Some(None));
        assert_eq!(widgets.state(a), WidgetState::Hovered);
        assert_eq!(widgets.set_hovered(Some(a)), None);
        assert_eq!(widgets.set_hovered(Some(b)), Some(Some(a)));
        assert_eq!(widgets.state(a), WidgetState::Normal);
        assert_eq!(widgets.set_hovered(None), Some(Some(b)));
        assert_eq!(widgets.hovered(), None);
    }

    #[test]
    fn test_selection() {
        let mut widgets = WidgetManager::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        widgets.select(a);
        widgets.add_to_selection(b);
        assert_eq!(widgets.selected().len(), 2);

        widgets.select(b);
        assert!(!widgets.is_selected(a));
        assert!(widgets.is_selected(b));

        widgets.remove(b);
        assert!(widgets.selected().is_empty());
    }

    #[test]
    fn test_hovered_selection_keeps_selected_state() {
        let mut widgets = WidgetManager::new();
        let a = Uuid::new_v4();
        widgets.select(a);
        widgets.set_hovered(Some(a));
        assert_eq!(widgets.state(a), WidgetState::Selected);
        widgets.clear_selection();
        assert_eq!(widgets.state(a), WidgetState::Hovered);
    }
}
