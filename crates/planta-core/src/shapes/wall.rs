//! Structural walls.

use super::{
    point_to_ellipse_outline_dist, point_to_segment_dist, ObjectFlags, ShapeColor, ShapeId,
    ShapeStyle, ShapeTrait,
};
use crate::units::WallThickness;
use kurbo::{BezPath, Ellipse, Line, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tolerance used when flattening curved outlines.
const PATH_TOLERANCE: f64 = 0.1;

/// Kind of wall geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallKind {
    Line,
    Rectangle,
    Circle,
    Ellipse,
}

impl WallKind {
    /// Stable string tag.
    pub fn tag(self) -> &'static str {
        match self {
            WallKind::Line => "line",
            WallKind::Rectangle => "rectangle",
            WallKind::Circle => "circle",
            WallKind::Ellipse => "ellipse",
        }
    }
}

/// Geometry of a wall, one case per kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WallGeometry {
    Line { start: Point, end: Point },
    Rectangle { rect: Rect },
    Circle { center: Point, radius: f64 },
    Ellipse { center: Point, radii: Vec2 },
}

impl WallGeometry {
    /// Kind of this geometry.
    pub fn kind(&self) -> WallKind {
        match self {
            WallGeometry::Line { .. } => WallKind::Line,
            WallGeometry::Rectangle { .. } => WallKind::Rectangle,
            WallGeometry::Circle { .. } => WallKind::Circle,
            WallGeometry::Ellipse { .. } => WallKind::Ellipse,
        }
    }

    /// Points other walls snap to: endpoints, corners, or the center.
    pub fn anchors(&self) -> Vec<Point> {
        match *self {
            WallGeometry::Line { start, end } => vec![start, end],
            WallGeometry::Rectangle { rect } => vec![
                Point::new(rect.x0, rect.y0),
                Point::new(rect.x1, rect.y0),
                Point::new(rect.x0, rect.y1),
                Point::new(rect.x1, rect.y1),
            ],
            WallGeometry::Circle { center, .. } | WallGeometry::Ellipse { center, .. } => {
                vec![center]
            }
        }
    }

    /// Geometric center.
    pub fn center(&self) -> Point {
        match *self {
            WallGeometry::Line { start, end } => start.midpoint(end),
            WallGeometry::Rectangle { rect } => rect.center(),
            WallGeometry::Circle { center, .. } | WallGeometry::Ellipse { center, .. } => center,
        }
    }

    /// Bounds of the centerline geometry (stroke not included).
    pub fn bounds(&self) -> Rect {
        match *self {
            WallGeometry::Line { start, end } => Rect::from_points(start, end),
            WallGeometry::Rectangle { rect } => rect,
            WallGeometry::Circle { center, radius } => {
                Rect::from_center_size(center, (radius * 2.0, radius * 2.0))
            }
            WallGeometry::Ellipse { center, radii } => {
                Rect::from_center_size(center, (radii.x * 2.0, radii.y * 2.0))
            }
        }
    }

    /// Distance from a point to the wall's centerline or outline.
    pub fn distance(&self, point: Point) -> f64 {
        match *self {
            WallGeometry::Line { start, end } => point_to_segment_dist(point, start, end),
            WallGeometry::Rectangle { rect } => {
                let tl = Point::new(rect.x0, rect.y0);
                let tr = Point::new(rect.x1, rect.y0);
                let br = Point::new(rect.x1, rect.y1);
                let bl = Point::new(rect.x0, rect.y1);
                [(tl, tr), (tr, br), (br, bl), (bl, tl)]
                    .into_iter()
                    .map(|(a, b)| point_to_segment_dist(point, a, b))
                    .fold(f64::INFINITY, f64::min)
            }
            WallGeometry::Circle { center, radius } => ((point - center).hypot() - radius).abs(),
            WallGeometry::Ellipse { center, radii } => {
                point_to_ellipse_outline_dist(point, center, radii)
            }
        }
    }

    /// Move the geometry by `delta` in scene space.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            WallGeometry::Line { start, end } => {
                *start += delta;
                *end += delta;
            }
            WallGeometry::Rectangle { rect } => *rect = *rect + delta,
            WallGeometry::Circle { center, .. } | WallGeometry::Ellipse { center, .. } => {
                *center += delta;
            }
        }
    }

    /// Outline path for rendering.
    pub fn to_path(&self) -> BezPath {
        match *self {
            WallGeometry::Line { start, end } => Line::new(start, end).to_path(PATH_TOLERANCE),
            WallGeometry::Rectangle { rect } => rect.to_path(PATH_TOLERANCE),
            WallGeometry::Circle { center, radius } => {
                Ellipse::new(center, (radius, radius), 0.0).to_path(PATH_TOLERANCE)
            }
            WallGeometry::Ellipse { center, radii } => {
                Ellipse::new(center, radii, 0.0).to_path(PATH_TOLERANCE)
            }
        }
    }
}

/// Wall metadata kept for restyling, erasing and 3D projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallMeta {
    /// Color to restore after an erase preview.
    pub color: ShapeColor,
    pub thickness: WallThickness,
    pub kind: WallKind,
}

/// A structural wall on the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub(crate) id: ShapeId,
    pub geometry: WallGeometry,
    pub style: ShapeStyle,
    pub flags: ObjectFlags,
    pub meta: WallMeta,
}

impl Wall {
    /// Create a committed wall stroked with `color`.
    pub fn new(
        geometry: WallGeometry,
        color: ShapeColor,
        thickness: WallThickness,
        stroke_width: f64,
    ) -> Self {
        let mut style = ShapeStyle::stroked(color, stroke_width);
        if !matches!(geometry, WallGeometry::Line { .. }) {
            style.fill_color = Some(ShapeColor::TRANSPARENT);
        }
        Self {
            id: Uuid::new_v4(),
            geometry,
            style,
            flags: ObjectFlags::COMMITTED,
            meta: WallMeta {
                color,
                thickness,
                kind: geometry.kind(),
            },
        }
    }

    /// Kind of this wall.
    pub fn kind(&self) -> WallKind {
        self.geometry.kind()
    }

    /// Snap anchors of the wall.
    pub fn anchors(&self) -> Vec<Point> {
        self.geometry.anchors()
    }

    /// Whether any part of the outline lies inside `rect`.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        match self.geometry {
            WallGeometry::Line { start, end } => {
                if rect.contains(start) || rect.contains(end) {
                    return true;
                }
                let corners = [
                    Point::new(rect.x0, rect.y0),
                    Point::new(rect.x1, rect.y0),
                    Point::new(rect.x1, rect.y1),
                    Point::new(rect.x0, rect.y1),
                ];
                (0..4).any(|i| segments_intersect(start, end, corners[i], corners[(i + 1) % 4]))
            }
            _ => rect.intersect(self.bounds()).area() > 0.0,
        }
    }
}

fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = p2 - p1;
    let d2 = q2 - q1;
    let denom = d1.cross(d2);
    if denom.abs() < f64::EPSILON {
        return false;
    }
    let t = (q1 - p1).cross(d2) / denom;
    let u = (q1 - p1).cross(d1) / denom;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

impl ShapeTrait for Wall {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let half = self.style.stroke_width / 2.0;
        self.geometry.bounds().inflate(half, half)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.geometry.distance(point) <= tolerance + self.style.stroke_width / 2.0
    }

    fn to_path(&self) -> BezPath {
        self.geometry.to_path()
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn flags(&self) -> ObjectFlags {
        self.flags
    }

    fn flags_mut(&mut self) -> &mut ObjectFlags {
        &mut self.flags
    }
}
