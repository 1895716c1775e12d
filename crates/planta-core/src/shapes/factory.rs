//! Builders for previews, rulers and walls.
//!
//! Factories are plain values: everything they produce is determined by the
//! parameters given at construction.

use super::{
    Label, ObjectFlags, Ruler, ShapeColor, ShapeStyle, Wall, WallGeometry, WallKind,
};
use crate::units::WallThickness;
use kurbo::{BezPath, Ellipse, Line, Point, Rect, Shape as KurboShape, Vec2};

pub const RULER_FONT_SIZE: f64 = 14.0;
pub const RULER_STROKE_WIDTH: f64 = 1.0;
pub const RULER_DASH: [f64; 2] = [5.0, 5.0];
/// Distance between a segment and its measurement label.
pub const RULER_LABEL_OFFSET: f64 = 15.0;

/// Geometry of an in-progress preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviewGeometry {
    Line(Line),
    Rect(Rect),
    Ellipse { center: Point, radii: Vec2 },
}

/// Dashed, non-interactive shape shown while drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewShape {
    pub geometry: PreviewGeometry,
    pub style: ShapeStyle,
    pub flags: ObjectFlags,
}

impl PreviewShape {
    /// Whether the preview is a straight segment.
    pub fn is_segment(&self) -> bool {
        matches!(self.geometry, PreviewGeometry::Line(_))
    }

    /// Outline path for rendering.
    pub fn to_path(&self) -> BezPath {
        match self.geometry {
            PreviewGeometry::Line(line) => line.to_path(0.1),
            PreviewGeometry::Rect(rect) => rect.to_path(0.1),
            PreviewGeometry::Ellipse { center, radii } => {
                Ellipse::new(center, radii, 0.0).to_path(0.1)
            }
        }
    }
}

/// Where a measurement label goes for a drag from `start` to `end`.
///
/// Labels sit at the midpoint. For segments the label is pushed off the line:
/// above it when the segment is mostly horizontal, to its right otherwise.
pub fn label_position(start: Point, end: Point, is_segment: bool) -> Point {
    let mid = start.midpoint(end);
    if !is_segment {
        return mid;
    }
    let delta = end - start;
    if delta.x.abs() >= delta.y.abs() {
        Point::new(mid.x, mid.y - RULER_LABEL_OFFSET)
    } else {
        Point::new(mid.x + RULER_LABEL_OFFSET * 2.0, mid.y)
    }
}

/// Builds ruler previews and committed rulers starting at a fixed point.
#[derive(Debug, Clone, Copy)]
pub struct RulerFactory {
    start: Point,
    font_size: f64,
    color: ShapeColor,
    stroke_width: f64,
}

impl RulerFactory {
    /// A factory anchored at `start`.
    pub fn new(start: Point, color: ShapeColor) -> Self {
        Self {
            start,
            font_size: RULER_FONT_SIZE,
            color,
            stroke_width: RULER_STROKE_WIDTH,
        }
    }

    fn preview(&self, geometry: PreviewGeometry) -> PreviewShape {
        PreviewShape {
            geometry,
            style: ShapeStyle::stroked(self.color, self.stroke_width).dashed(RULER_DASH),
            flags: ObjectFlags::INERT,
        }
    }

    /// Zero-length dashed segment at the start point.
    pub fn line(&self) -> PreviewShape {
        self.preview(PreviewGeometry::Line(Line::new(self.start, self.start)))
    }

    /// Zero-size dashed rectangle at the start point.
    pub fn rect(&self) -> PreviewShape {
        self.preview(PreviewGeometry::Rect(Rect::from_points(self.start, self.start)))
    }

    /// Zero-radius dashed ellipse at the start point.
    pub fn ellipse(&self) -> PreviewShape {
        self.preview(PreviewGeometry::Ellipse {
            center: self.start,
            radii: Vec2::ZERO,
        })
    }

    /// Hidden label at the start point.
    pub fn text(&self) -> Label {
        Label::hidden(self.start, self.font_size, self.color)
    }

    /// Committed ruler from the start point to `end`, labelled with `text`.
    pub fn build(&self, end: Point, text: impl Into<String>) -> Ruler {
        let mut label = self.text();
        label.show(text, label_position(self.start, end, true));
        let style = ShapeStyle::stroked(self.color, self.stroke_width).dashed(RULER_DASH);
        Ruler::new(Line::new(self.start, end), label, style, self.color)
    }
}

/// Builds committed walls between two points.
#[derive(Debug, Clone, Copy)]
pub struct WallFactory {
    start: Point,
    end: Point,
    color: ShapeColor,
    thickness: WallThickness,
    stroke_width: f64,
}

impl WallFactory {
    /// A factory for walls between `start` and `end`.
    pub fn new(
        start: Point,
        end: Point,
        color: ShapeColor,
        thickness: WallThickness,
        stroke_width: f64,
    ) -> Self {
        Self {
            start,
            end,
            color,
            thickness,
            stroke_width,
        }
    }

    fn wall(&self, geometry: WallGeometry) -> Wall {
        Wall::new(geometry, self.color, self.thickness, self.stroke_width)
    }

    /// Segment between the two points.
    pub fn line(&self) -> Wall {
        self.wall(WallGeometry::Line {
            start: self.start,
            end: self.end,
        })
    }

    /// Axis-aligned box spanned by the two points.
    pub fn rectangle(&self) -> Wall {
        self.wall(WallGeometry::Rectangle {
            rect: Rect::from_points(self.start, self.end),
        })
    }

    /// Circle centered on the start point through the end point.
    pub fn circle(&self) -> Wall {
        self.wall(WallGeometry::Circle {
            center: self.start,
            radius: (self.end - self.start).hypot(),
        })
    }

    /// Ellipse inscribed in the box spanned by the two points.
    pub fn ellipse(&self) -> Wall {
        let rect = Rect::from_points(self.start, self.end);
        self.wall(WallGeometry::Ellipse {
            center: rect.center(),
            radii: Vec2::new(rect.width() / 2.0, rect.height() / 2.0),
        })
    }

    /// Build the wall of the requested kind.
    pub fn build(&self, kind: WallKind) -> Wall {
        match kind {
            WallKind::Line => self.line(),
            WallKind::Rectangle => self.rectangle(),
            WallKind::Circle => self.circle(),
            WallKind::Ellipse => self.ellipse(),
        }
    }
}
