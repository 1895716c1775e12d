//! Scene objects of the floor plan.
//!
//! Every object drawn on the 2D canvas is a [`Shape`]: a structural [`Wall`],
//! a measurement [`Ruler`], or the background [`GridGroup`]. Code that needs
//! kind-specific behavior matches on the variant instead of probing tags.

mod factory;
mod label;
mod ruler;
mod wall;

pub use factory::{
    PreviewGeometry, PreviewShape, RulerFactory, WallFactory, label_position, RULER_DASH,
    RULER_FONT_SIZE, RULER_LABEL_OFFSET, RULER_STROKE_WIDTH,
};
pub use label::Label;
pub use ruler::Ruler;
pub use wall::{Wall, WallGeometry, WallKind, WallMeta};

use crate::grid::GridGroup;
use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for scene objects.
pub type ShapeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ShapeColor {
    /// Erase-preview highlight.
    pub const RED: ShapeColor = ShapeColor::new(255, 0, 0, 255);
    pub const TRANSPARENT: ShapeColor = ShapeColor::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Whether the alpha channel is zero.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl From<Color> for ShapeColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<ShapeColor> for Color {
    fn from(color: ShapeColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Rendered style of a shape. May differ from the recorded color while an
/// erase preview is showing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub stroke_color: Option<ShapeColor>,
    pub stroke_width: f64,
    pub fill_color: Option<ShapeColor>,
    /// Dash pattern (on, off) in scene units; `None` is solid.
    pub dash: Option<[f64; 2]>,
}

impl ShapeStyle {
    /// Stroke-only style.
    pub fn stroked(color: ShapeColor, width: f64) -> Self {
        Self {
            stroke_color: Some(color),
            stroke_width: width,
            fill_color: None,
            dash: None,
        }
    }

    /// Add a dash pattern.
    pub fn dashed(mut self, dash: [f64; 2]) -> Self {
        self.dash = Some(dash);
        self
    }

    /// Stroke color for the renderer.
    pub fn stroke(&self) -> Option<Color> {
        self.stroke_color.map(Into::into)
    }

    /// Fill color for the renderer.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(Into::into)
    }

    /// Replace the stroke, and the fill when one is visible.
    pub fn paint(&mut self, color: ShapeColor) {
        if self.stroke_color.is_some() {
            self.stroke_color = Some(color);
        }
        if self.fill_color.is_some_and(|fill| !fill.is_transparent()) {
            self.fill_color = Some(color);
        }
    }
}

/// Interaction flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectFlags {
    /// Can be picked by click or marquee in select mode.
    pub selectable: bool,
    /// Takes part in hit testing (hover, erase).
    pub evented: bool,
    pub visible: bool,
}

impl ObjectFlags {
    /// Committed structural objects: hit-testable, not selectable until select mode.
    pub const COMMITTED: ObjectFlags = ObjectFlags {
        selectable: false,
        evented: true,
        visible: true,
    };

    /// Previews and background: never interactive.
    pub const INERT: ObjectFlags = ObjectFlags {
        selectable: false,
        evented: false,
        visible: true,
    };
}

/// Kind tag of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Wall(WallKind),
    Ruler,
    Grid,
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    (pv - seg * t).hypot()
}

/// Approximate distance from a point to the outline of an axis-aligned ellipse.
pub fn point_to_ellipse_outline_dist(point: Point, center: Point, radii: Vec2) -> f64 {
    let (rx, ry) = (radii.x.abs(), radii.y.abs());
    if rx < f64::EPSILON || ry < f64::EPSILON {
        // Degenerate: the ellipse collapses to a segment.
        let half = Vec2::new(rx, ry);
        return point_to_segment_dist(point, center - half, center + half);
    }
    let d = point - center;
    let normalized = ((d.x / rx).powi(2) + (d.y / ry).powi(2)).sqrt();
    (normalized - 1.0).abs() * rx.min(ry)
}

/// Common behavior of scene objects.
pub trait ShapeTrait {
    fn id(&self) -> ShapeId;

    /// Bounding box in scene coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a scene point hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Outline for rendering.
    fn to_path(&self) -> BezPath;

    fn style(&self) -> &ShapeStyle;

    fn style_mut(&mut self) -> &mut ShapeStyle;

    fn flags(&self) -> ObjectFlags;

    fn flags_mut(&mut self) -> &mut ObjectFlags;
}

/// A scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Wall(Wall),
    Ruler(Ruler),
    Grid(GridGroup),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Shape::Wall($s) => $body,
            Shape::Ruler($s) => $body,
            Shape::Grid($s) => $body,
        }
    };
}

impl Shape {
    /// Unique identifier.
    pub fn id(&self) -> ShapeId {
        dispatch!(self, s => s.id())
    }

    /// Kind tag, used by tooling and tests.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Wall(wall) => ShapeKind::Wall(wall.kind()),
            Shape::Ruler(_) => ShapeKind::Ruler,
            Shape::Grid(_) => ShapeKind::Grid,
        }
    }

    /// Bounds including the stroke.
    pub fn bounds(&self) -> Rect {
        dispatch!(self, s => s.bounds())
    }

    /// Whether `point` lies within `tolerance` of the shape.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        dispatch!(self, s => s.hit_test(point, tolerance))
    }

    /// Outline path for rendering.
    pub fn to_path(&self) -> BezPath {
        dispatch!(self, s => s.to_path())
    }

    /// Rendered style.
    pub fn style(&self) -> &ShapeStyle {
        dispatch!(self, s => s.style())
    }

    /// Interaction flags.
    pub fn flags(&self) -> ObjectFlags {
        dispatch!(self, s => s.flags())
    }

    /// Mutable interaction flags.
    pub fn flags_mut(&mut self) -> &mut ObjectFlags {
        dispatch!(self, s => s.flags_mut())
    }

    /// Whether this is the background grid.
    pub fn is_grid(&self) -> bool {
        matches!(self, Shape::Grid(_))
    }

    /// The wall, if this is one.
    pub fn as_wall(&self) -> Option<&Wall> {
        match self {
            Shape::Wall(wall) => Some(wall),
            _ => None,
        }
    }

    /// Whether hovering/clicking can reach this object.
    pub fn is_interactive(&self) -> bool {
        let flags = self.flags();
        !self.is_grid() && flags.evented && flags.visible
    }

    /// Intersects a marquee rectangle.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        match self {
            Shape::Wall(wall) => wall.intersects_rect(rect),
            _ => rect.intersect(self.bounds()).area() > 0.0 || rect.contains(self.bounds().center()),
        }
    }

    /// Paint every member with `color` (stroke, and fill when visible).
    /// Recorded colors are left untouched.
    pub fn highlight(&mut self, color: ShapeColor) {
        match self {
            Shape::Wall(wall) => wall.style.paint(color),
            Shape::Ruler(ruler) => ruler.paint(color),
            Shape::Grid(_) => {}
        }
    }

    /// Restore the rendered colors from the recorded metadata color.
    pub fn restore_color(&mut self) {
        match self {
            Shape::Wall(wall) => {
                let color = wall.meta.color;
                wall.style.paint(color);
            }
            Shape::Ruler(ruler) => {
                let color = ruler.color;
                ruler.paint(color);
            }
            Shape::Grid(_) => {}
        }
    }

    /// Move a drawing by `delta` in scene space. The grid never moves.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Wall(wall) => wall.geometry.translate(delta),
            Shape::Ruler(ruler) => ruler.translate(delta),
            Shape::Grid(_) => {}
        }
    }

    /// Change both the recorded and the rendered color.
    pub fn restyle(&mut self, color: ShapeColor) {
        match self {
            Shape::Wall(wall) => {
                wall.meta.color = color;
                wall.style.paint(color);
            }
            Shape::Ruler(ruler) => {
                ruler.color = color;
                ruler.paint(color);
            }
            Shape::Grid(grid) => grid.set_color(color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(ShapeColor::from_hex("#1B1B1F"), Some(ShapeColor::rgb(0x1b, 0x1b, 0x1f)));
        assert_eq!(ShapeColor::from_hex("ff000080"), Some(ShapeColor::new(255, 0, 0, 128)));
        assert_eq!(ShapeColor::from_hex("#12"), None);
        assert_eq!(ShapeColor::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_color_peniko_conversion() {
        let color = ShapeColor::rgb(10, 20, 30);
        let peniko: Color = color.into();
        assert_eq!(ShapeColor::from(peniko), color);
    }

    #[test]
    fn test_paint_skips_transparent_fill() {
        let mut style = ShapeStyle::stroked(ShapeColor::rgb(1, 2, 3), 2.0);
        style.fill_color = Some(ShapeColor::TRANSPARENT);
        style.paint(ShapeColor::RED);
        assert_eq!(style.stroke_color, Some(ShapeColor::RED));
        assert_eq!(style.fill_color, Some(ShapeColor::TRANSPARENT));

        style.fill_color = Some(ShapeColor::rgb(9, 9, 9));
        style.paint(ShapeColor::RED);
        assert_eq!(style.fill_color, Some(ShapeColor::RED));
    }

    #[test]
    fn test_point_to_segment_dist() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < f64::EPSILON);
        assert!((point_to_segment_dist(Point::new(13.0, 4.0), a, b) - 5.0).abs() < f64::EPSILON);
        assert!((point_to_segment_dist(Point::new(3.0, 4.0), a, a) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_point_to_ellipse_outline_dist() {
        let center = Point::new(0.0, 0.0);
        let radii = Vec2::new(10.0, 10.0);
        assert!(point_to_ellipse_outline_dist(Point::new(10.0, 0.0), center, radii) < 1e-12);
        assert!((point_to_ellipse_outline_dist(center, center, radii) - 10.0).abs() < 1e-12);
    }
}
