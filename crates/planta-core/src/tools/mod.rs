//! Editor modes and the transient state of in-progress gestures.

mod listeners;
mod shortcuts;

pub use listeners::{ListenerHandle, ListenerKind, ListenerRegistry};
pub use shortcuts::{KeyAction, KeyBinding};

use crate::shapes::{
    label_position, Label, PreviewGeometry, PreviewShape, RulerFactory, ShapeColor, WallKind,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Canvas-wide interaction mode. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Select,
    Draw,
    Drag,
    Erase,
}

impl Mode {
    /// Pointer listener serving this mode.
    pub fn listener(self) -> ListenerKind {
        match self {
            Mode::Select => ListenerKind::Select,
            Mode::Draw => ListenerKind::Draw,
            Mode::Drag => ListenerKind::Pan,
            Mode::Erase => ListenerKind::Erase,
        }
    }

    /// Cursor for the mode, given whether the pointer is over an object and
    /// whether a pan is in progress.
    pub fn cursor(self, hovering: bool, panning: bool) -> Cursor {
        match self {
            Mode::Select if hovering => Cursor::Move,
            Mode::Drag if panning => Cursor::Grabbing,
            Mode::Drag => Cursor::Grab,
            Mode::Draw | Mode::Erase if hovering => Cursor::Crosshair,
            _ => Cursor::Default,
        }
    }
}

/// What draw mode produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawObject {
    Line,
    Rectangle,
    Circle,
    Ruler,
}

impl DrawObject {
    /// Wall kind committed for this object, `None` for rulers.
    /// `constrain` turns the circle tool's ellipse into a true circle.
    pub fn wall_kind(self, constrain: bool) -> Option<WallKind> {
        match self {
            DrawObject::Line => Some(WallKind::Line),
            DrawObject::Rectangle => Some(WallKind::Rectangle),
            DrawObject::Circle if constrain => Some(WallKind::Circle),
            DrawObject::Circle => Some(WallKind::Ellipse),
            DrawObject::Ruler => None,
        }
    }
}

/// Pointer cursor requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Move,
    Grab,
    Grabbing,
    Crosshair,
}

/// A measurement shown next to the preview, before formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// Pixel length.
    Length(f64),
    /// Pixel area.
    Area(f64),
}

/// State of a shape being drawn, from pointer-down to pointer-up.
///
/// The preview and its label belong to the session and never enter the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawSession {
    pub object: DrawObject,
    pub start: Point,
    pub preview: PreviewShape,
    pub label: Label,
}

impl DrawSession {
    /// Open a session with degenerate previews at `start`.
    pub fn begin(object: DrawObject, start: Point, color: ShapeColor) -> Self {
        let factory = RulerFactory::new(start, color);
        let preview = match object {
            DrawObject::Line | DrawObject::Ruler => factory.line(),
            DrawObject::Rectangle => factory.rect(),
            DrawObject::Circle => factory.ellipse(),
        };
        Self {
            object,
            start,
            preview,
            label: factory.text(),
        }
    }

    /// Reshape the preview to end at `end`.
    pub fn update(&mut self, end: Point, constrain: bool) {
        let start = self.start;
        self.preview.geometry = match self.object {
            DrawObject::Line | DrawObject::Ruler => PreviewGeometry::Line(kurbo::Line::new(start, end)),
            DrawObject::Rectangle => PreviewGeometry::Rect(Rect::from_points(start, end)),
            DrawObject::Circle if constrain => {
                let radius = (end - start).hypot();
                PreviewGeometry::Ellipse {
                    center: start,
                    radii: Vec2::new(radius, radius),
                }
            }
            DrawObject::Circle => {
                let rect = Rect::from_points(start, end);
                PreviewGeometry::Ellipse {
                    center: rect.center(),
                    radii: Vec2::new(rect.width() / 2.0, rect.height() / 2.0),
                }
            }
        };
    }

    /// Measurement for the current preview: length for segments, area for
    /// boxes and ellipses. A flat rectangle measures `width + height`.
    pub fn measurement(&self) -> Measurement {
        match self.preview.geometry {
            PreviewGeometry::Line(line) => Measurement::Length((line.p1 - line.p0).hypot()),
            PreviewGeometry::Rect(rect) => {
                let area = rect.width() * rect.height();
                if area > 0.0 {
                    Measurement::Area(area)
                } else {
                    Measurement::Length(rect.width() + rect.height())
                }
            }
            PreviewGeometry::Ellipse { radii, .. } => Measurement::Area(PI * radii.x * radii.y),
        }
    }

    /// Show `text` next to the preview, ending at `end`.
    pub fn set_label(&mut self, text: String, end: Point) {
        let position = label_position(self.start, end, self.preview.is_segment());
        self.label.show(text, position);
    }
}

/// Pan gesture state: last pointer position in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub last: Point,
}

impl DragSession {
    /// Advance to `position`, returning the device-space delta.
    pub fn advance(&mut self, position: Point) -> Vec2 {
        let delta = position - self.last;
        self.last = position;
        delta
    }
}

/// Move gesture on the selection, in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveSession {
    pub origin: Point,
    pub last: Point,
}

impl MoveSession {
    /// Start moving from `origin`.
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            last: origin,
        }
    }

    /// Advance to `position`, returning the scene-space delta.
    pub fn advance(&mut self, position: Point) -> Vec2 {
        let delta = position - self.last;
        self.last = position;
        delta
    }

    /// Total displacement since the gesture started.
    pub fn offset(&self) -> Vec2 {
        self.last - self.origin
    }
}

/// Rubber-band selection in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub start: Point,
    pub current: Point,
    /// Add to the existing selection instead of replacing it.
    pub additive: bool,
}

impl Marquee {
    /// Normalized rectangle between the two corners.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: ShapeColor = ShapeColor::rgb(122, 122, 122);

    #[test]
    fn test_cursor_per_mode() {
        assert_eq!(Mode::Select.cursor(false, false), Cursor::Default);
        assert_eq!(Mode::Select.cursor(true, false), Cursor::Move);
        assert_eq!(Mode::Drag.cursor(true, false), Cursor::Grab);
        assert_eq!(Mode::Drag.cursor(false, true), Cursor::Grabbing);
        assert_eq!(Mode::Draw.cursor(true, false), Cursor::Crosshair);
        assert_eq!(Mode::Erase.cursor(false, false), Cursor::Default);
    }

    #[test]
    fn test_circle_tool_kind() {
        assert_eq!(DrawObject::Circle.wall_kind(true), Some(WallKind::Circle));
        assert_eq!(DrawObject::Circle.wall_kind(false), Some(WallKind::Ellipse));
        assert_eq!(DrawObject::Ruler.wall_kind(true), None);
    }

    #[test]
    fn test_line_session_measures_length() {
        let mut session = DrawSession::begin(DrawObject::Line, Point::ZERO, GRAY);
        assert_eq!(session.measurement(), Measurement::Length(0.0));
        session.update(Point::new(30.0, 40.0), false);
        assert_eq!(session.measurement(), Measurement::Length(50.0));
    }

    #[test]
    fn test_flat_rectangle_measures_length() {
        let mut session = DrawSession::begin(DrawObject::Rectangle, Point::ZERO, GRAY);
        session.update(Point::new(80.0, 0.0), false);
        assert_eq!(session.measurement(), Measurement::Length(80.0));
        session.update(Point::new(80.0, -10.0), false);
        assert_eq!(session.measurement(), Measurement::Area(800.0));
    }

    #[test]
    fn test_circle_session_constrained() {
        let mut session = DrawSession::begin(DrawObject::Circle, Point::new(10.0, 10.0), GRAY);
        session.update(Point::new(13.0, 14.0), true);
        assert_eq!(
            session.preview.geometry,
            PreviewGeometry::Ellipse {
                center: Point::new(10.0, 10.0),
                radii: Vec2::new(5.0, 5.0)
            }
        );
        match session.measurement() {
            Measurement::Area(area) => assert!((area - PI * 25.0).abs() < 1e-9),
            other => panic!("expected area, got {other:?}"),
        }

        session.update(Point::new(20.0, 30.0), false);
        assert_eq!(
            session.preview.geometry,
            PreviewGeometry::Ellipse {
                center: Point::new(15.0, 20.0),
                radii: Vec2::new(5.0, 10.0)
            }
        );
    }

    #[test]
    fn test_label_follows_preview() {
        let mut session = DrawSession::begin(DrawObject::Ruler, Point::ZERO, GRAY);
        assert!(!session.label.visible);
        session.update(Point::new(100.0, 0.0), false);
        session.set_label("2,65 m".to_string(), Point::new(100.0, 0.0));
        assert!(session.label.visible);
        assert_eq!(session.label.position, Point::new(50.0, -15.0));
    }

    #[test]
    fn test_drag_session_delta() {
        let mut drag = DragSession {
            last: Point::new(10.0, 10.0),
        };
        assert_eq!(drag.advance(Point::new(15.0, 7.0)), Vec2::new(5.0, -3.0));
        assert_eq!(drag.last, Point::new(15.0, 7.0));
    }

    #[test]
    fn test_move_session_accumulates() {
        let mut session = MoveSession::new(Point::new(50.0, 0.0));
        assert_eq!(session.advance(Point::new(50.0, 40.0)), Vec2::new(0.0, 40.0));
        assert_eq!(session.advance(Point::new(60.0, 100.0)), Vec2::new(10.0, 60.0));
        assert_eq!(session.offset(), Vec2::new(10.0, 100.0));
    }
}
