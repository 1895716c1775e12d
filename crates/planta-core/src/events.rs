//! Change notifications for code observing the editor (menus, toolbars, 3D view).

use crate::projector::ViewMode;
use crate::tools::{DrawObject, Mode};
use crate::units::Scale;
use std::fmt;
use uuid::Uuid;

/// Something observable changed.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ModeChanged(Mode),
    DrawObjectChanged(Option<DrawObject>),
    ScaleChanged(Scale),
    ZoomChanged(f64),
    /// Committed scene content changed (commit, erase, restyle).
    SceneChanged { drawings: usize },
    ViewModeChanged(ViewMode),
    GridVisibilityChanged(bool),
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

type Handler = Box<dyn FnMut(&EditorEvent)>;

/// Synchronous observer list. Handlers run on the emitting thread, in
/// subscription order.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<(SubscriptionId, Handler)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every future event.
    pub fn subscribe(&mut self, handler: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.handlers.push((id, Box::new(handler)));
        log::debug!("Subscription {} added", id);
        id
    }

    /// Returns true if the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        let removed = self.handlers.len() != before;
        if removed {
            log::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Deliver `event` to every subscriber in subscription order.
    pub fn emit(&mut self, event: EditorEvent) {
        for (_, handler) in &mut self.handlers {
            handler(&event);
        }
    }

    /// Number of registered handlers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}
