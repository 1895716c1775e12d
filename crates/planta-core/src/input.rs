//! Pointer, wheel and keyboard events delivered by the host.
//!
//! Hosts differ in what they report: mouse events carry client coordinates,
//! touch events carry a touch list that may be empty, and some synthetic
//! events carry neither. Every accessor here returns `Option` so handlers can
//! treat missing data as "nothing happened".

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Shift held alone.
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    /// Ctrl held alone.
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS. Trackpad pinch also arrives as Ctrl + wheel.
    pub fn precision_zoom(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Secondary wheel modifier: horizontal pan.
    pub fn horizontal_pan(&self) -> bool {
        self.shift
    }

    /// Constrain proportions (circle instead of ellipse).
    pub fn constrain(&self) -> bool {
        self.shift
    }
}

/// Where a pointer event came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerSource {
    /// Mouse or pen, with client coordinates when the host provided them.
    Mouse { client: Option<Point> },
    /// Touch input; only the first touch point is used.
    Touch { touches: Vec<Point> },
}

/// A pointer event in device (viewport) coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub source: PointerSource,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Mouse event at a device position.
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            source: PointerSource::Mouse {
                client: Some(Point::new(x, y)),
            },
            modifiers: Modifiers::NONE,
        }
    }

    /// Single-finger touch event at a device position.
    pub fn touch(x: f64, y: f64) -> Self {
        Self {
            source: PointerSource::Touch {
                touches: vec![Point::new(x, y)],
            },
            modifiers: Modifiers::NONE,
        }
    }

    /// An event that carries no coordinates (e.g. released outside the canvas).
    pub fn detached() -> Self {
        Self {
            source: PointerSource::Mouse { client: None },
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach modifier state.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Device position of the event, if any.
    pub fn position(&self) -> Option<Point> {
        let point = match &self.source {
            PointerSource::Mouse { client } => *client,
            PointerSource::Touch { touches } => touches.first().copied(),
        }?;
        (point.x.is_finite() && point.y.is_finite()).then_some(point)
    }
}

/// Mouse wheel or trackpad scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    /// Pointer position in device coordinates, if known.
    pub position: Option<Point>,
    pub delta_y: f64,
    pub modifiers: Modifiers,
}

impl WheelEvent {
    /// A wheel event at a device position.
    pub fn new(x: f64, y: f64, delta_y: f64) -> Self {
        Self {
            position: Some(Point::new(x, y)),
            delta_y,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach modifier state.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// What the host should do with an event after the editor handled it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventDisposition {
    /// Suppress the host's default action (page scroll, browser zoom).
    pub prevent_default: bool,
    /// Keep the event from reaching enclosing elements.
    pub stop_propagation: bool,
}

impl EventDisposition {
    pub const IGNORED: EventDisposition = EventDisposition {
        prevent_default: false,
        stop_propagation: false,
    };

    pub const CONSUMED: EventDisposition = EventDisposition {
        prevent_default: true,
        stop_propagation: true,
    };
}
