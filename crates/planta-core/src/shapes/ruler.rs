//! Measurement rulers: a dashed line grouped with its length label.

use super::{Label, ObjectFlags, ShapeColor, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Line, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A committed ruler. The line and label behave as one unit: the group is
/// hit-testable but never individually selectable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruler {
    pub(crate) id: ShapeId,
    pub line: Line,
    pub label: Label,
    /// Line style.
    pub style: ShapeStyle,
    pub flags: ObjectFlags,
    /// Color to restore after an erase preview.
    pub color: ShapeColor,
}

impl Ruler {
    /// A committed ruler from its parts.
    pub fn new(line: Line, label: Label, style: ShapeStyle, color: ShapeColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            line,
            label,
            style,
            flags: ObjectFlags::COMMITTED,
            color,
        }
    }

    /// Measured length in scene units.
    pub fn length(&self) -> f64 {
        self.line.length()
    }

    /// Move the line and its label together.
    pub fn translate(&mut self, delta: Vec2) {
        self.line = Line::new(self.line.p0 + delta, self.line.p1 + delta);
        self.label.position += delta;
    }

    /// Paint every member: line stroke and label fill.
    pub(crate) fn paint(&mut self, color: ShapeColor) {
        self.style.paint(color);
        if !self.label.fill_color.is_transparent() {
            self.label.fill_color = color;
        }
    }
}

impl ShapeTrait for Ruler {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let line_bounds = Rect::from_points(self.line.p0, self.line.p1);
        if self.label.visible {
            line_bounds.union(self.label.bounds())
        } else {
            line_bounds
        }
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let on_line = super::point_to_segment_dist(point, self.line.p0, self.line.p1)
            <= tolerance + self.style.stroke_width / 2.0;
        on_line || (self.label.visible && self.label.bounds().inflate(tolerance, tolerance).contains(point))
    }

    fn to_path(&self) -> BezPath {
        self.line.to_path(0.1)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn ruler() -> Ruler {
        let color = ShapeColor::rgb(120, 120, 120);
        let mut label = Label::hidden(Point::ZERO, 14.0, color);
        label.show("2,65 m", Point::new(50.0, -15.0));
        Ruler::new(
            Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)),
            label,
            ShapeStyle::stroked(color, 1.0).dashed([5.0, 5.0]),
            color,
        )
    }

    #[test]
    fn test_group_hit_test_covers_label() {
        let ruler = ruler();
        assert!(ruler.hit_test(Point::new(30.0, 0.0), 2.0));
        assert!(ruler.hit_test(Point::new(50.0, -20.0), 0.0));
        assert!(!ruler.hit_test(Point::new(50.0, 40.0), 2.0));
    }

    #[test]
    fn test_flags_committed() {
        let ruler = ruler();
        assert!(!ruler.flags().selectable);
        assert!(ruler.flags().evented);
        assert!((ruler.length() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_paint_members() {
        let mut ruler = ruler();
        ruler.paint(ShapeColor::RED);
        assert_eq!(ruler.style.stroke_color, Some(ShapeColor::RED));
        assert_eq!(ruler.label.fill_color, ShapeColor::RED);
        assert_eq!(ruler.color, ShapeColor::rgb(120, 120, 120));
    }

    #[test]
    fn test_translate_moves_label_with_line() {
        let mut ruler = ruler();
        ruler.translate(Vec2::new(0.0, 40.0));
        assert_eq!(ruler.line.p0, Point::new(0.0, 40.0));
        assert_eq!(ruler.line.p1, Point::new(100.0, 40.0));
        assert_eq!(ruler.label.position, Point::new(50.0, 25.0));
        assert!((ruler.length() - 100.0).abs() < f64::EPSILON);
    }
}
