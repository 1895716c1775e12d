//! Registration of canvas event listeners.
//!
//! Each mode installs its pointer listener through the registry and keeps the
//! returned handle. Releasing the handle is the only way to remove a listener,
//! so switching modes or unmounting always tears down exactly what was set up.

/// Event listeners the canvas can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Click and marquee selection.
    Select,
    /// Drag-to-pan.
    Pan,
    /// Draw session handling.
    Draw,
    /// Hover highlight and click-to-delete.
    Erase,
    /// Zoom and scroll; installed for the canvas lifetime.
    Wheel,
}

/// Proof of a registered listener. Not `Clone`: whoever holds it owns the
/// registration.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping the handle leaves the listener registered"]
pub struct ListenerHandle {
    id: u64,
    kind: ListenerKind,
}

impl ListenerHandle {
    /// Kind of listener this handle owns.
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }
}

/// Active listeners, in registration order.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    active: Vec<(u64, ListenerKind)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a listener of `kind` and hand back its handle.
    pub fn register(&mut self, kind: ListenerKind) -> ListenerHandle {
        self.next_id += 1;
        let id = self.next_id;
        self.active.push((id, kind));
        log::debug!("listener {:?} registered (#{})", kind, id);
        ListenerHandle { id, kind }
    }

    /// Remove the listener behind `handle`. Returns false if it was already gone.
    pub fn release(&mut self, handle: ListenerHandle) -> bool {
        let before = self.active.len();
        self.active.retain(|(id, _)| *id != handle.id);
        let removed = self.active.len() != before;
        if removed {
            log::debug!("listener {:?} released (#{})", handle.kind, handle.id);
        }
        removed
    }

    /// Whether at least one listener of `kind` is installed.
    pub fn is_active(&self, kind: ListenerKind) -> bool {
        self.active.iter().any(|(_, active)| *active == kind)
    }

    /// Kinds currently registered, in registration order.
    pub fn active_kinds(&self) -> Vec<ListenerKind> {
        self.active.iter().map(|(_, kind)| *kind).collect()
    }

    /// Number of installed listeners.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
