//! Background reference grid.
//!
//! The grid is one composite scene object rebuilt from scratch whenever the
//! view changes. Spacing is constant on screen, so in scene units it shrinks
//! as the user zooms in.

use crate::camera::Camera;
use crate::scene::Scene;
use crate::shapes::{ObjectFlags, Shape, ShapeColor, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Line, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grid cell size in device pixels.
pub const GRID_CELL_SCREEN_SIZE: f64 = 20.0;

/// Inputs of a grid rebuild.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridParams {
    pub viewport: Size,
    pub world: Size,
    pub color: ShapeColor,
    pub cell_screen_size: f64,
    pub visible: bool,
}

/// The grid composite: line segments clipped to the world bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridGroup {
    id: ShapeId,
    lines: Vec<Line>,
    clip: Rect,
    spacing: f64,
    style: ShapeStyle,
    flags: ObjectFlags,
}

impl GridGroup {
    /// Build the grid for the current view.
    pub fn build(camera: &Camera, params: &GridParams) -> Self {
        let zoom = camera.zoom();
        let spacing = params.cell_screen_size / zoom;
        let clip = Rect::from_origin_size(Point::ZERO, params.world);
        let area = camera.visible_rect(params.viewport).intersect(clip);

        let mut lines = Vec::new();
        if spacing.is_finite() && spacing > 0.0 && area.width() > 0.0 && area.height() > 0.0 {
            let mut x = (area.x0 / spacing).ceil() * spacing;
            while x <= area.x1 {
                lines.push(Line::new((x, area.y0), (x, area.y1)));
                x += spacing;
            }
            let mut y = (area.y0 / spacing).ceil() * spacing;
            while y <= area.y1 {
                lines.push(Line::new((area.x0, y), (area.x1, y)));
                y += spacing;
            }
        }

        let mut flags = ObjectFlags::INERT;
        flags.visible = params.visible;
        Self {
            id: Uuid::new_v4(),
            lines,
            clip,
            spacing,
            style: ShapeStyle::stroked(params.color, 1.0 / zoom),
            flags,
        }
    }

    /// Grid lines in scene coordinates.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// World bounds the grid is clipped to.
    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// Distance between lines in scene units.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Whether the grid is drawn.
    pub fn is_visible(&self) -> bool {
        self.flags.visible
    }

    /// Show or hide the grid without rebuilding it.
    pub fn set_visible(&mut self, visible: bool) {
        self.flags.visible = visible;
    }

    /// Change the line color.
    pub fn set_color(&mut self, color: ShapeColor) {
        self.style.stroke_color = Some(color);
    }
}

impl ShapeTrait for GridGroup {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.clip
    }

    /// The grid is never a hit target.
    fn hit_test(&self, _point: Point, _tolerance: f64) -> bool {
        false
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for line in &self.lines {
            path.move_to(line.p0);
            path.line_to(line.p1);
        }
        path
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

/// Replace any existing grid in `scene` with a fresh one at the back.
pub fn render_grid(scene: &mut Scene, camera: &Camera, params: &GridParams) -> ShapeId {
    let removed = scene.remove_where(Shape::is_grid);
    let grid = GridGroup::build(camera, params);
    let id = grid.id();
    log::debug!(
        "grid rebuilt: {} lines, spacing {:.2}, replaced {}",
        grid.lines().len(),
        grid.spacing(),
        removed.len()
    );
    scene.insert_at_back(Shape::Grid(grid));
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    fn params() -> GridParams {
        GridParams {
            viewport: Size::new(200.0, 100.0),
            world: Size::new(1920.0, 1080.0),
            color: ShapeColor::rgb(221, 221, 221),
            cell_screen_size: GRID_CELL_SCREEN_SIZE,
            visible: true,
        }
    }

    #[test]
    fn test_spacing_scales_with_zoom() {
        let mut camera = Camera::new();
        let grid = GridGroup::build(&camera, &params());
        assert!((grid.spacing() - 20.0).abs() < f64::EPSILON);
        // 0..=200 step 20 and 0..=100 step 20.
        assert_eq!(grid.lines().len(), 11 + 6);
        assert!((grid.style().stroke_width - 1.0).abs() < f64::EPSILON);

        camera.zoom_to_point(Point::ZERO, 2.0, crate::camera::ZoomLimits::CONTROLS);
        let zoomed = GridGroup::build(&camera, &params());
        assert!((zoomed.spacing() - 10.0).abs() < f64::EPSILON);
        assert!((zoomed.style().stroke_width - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clipped_to_world() {
        let mut camera = Camera::new();
        // View starts 50 units left of the world.
        camera.pan(Vec2::new(50.0, 0.0));
        let grid = GridGroup::build(&camera, &params());
        assert!(grid.lines().iter().all(|l| l.p0.x >= 0.0 && l.p1.x >= 0.0));
        assert_eq!(grid.clip(), Rect::new(0.0, 0.0, 1920.0, 1080.0));

        // View entirely outside the world: nothing to draw.
        camera.pan(Vec2::new(5000.0, 0.0));
        assert!(GridGroup::build(&camera, &params()).lines().is_empty());
    }

    #[test]
    fn test_render_is_idempotent() {
        let camera = Camera::new();
        let mut scene = Scene::new();
        render_grid(&mut scene, &camera, &params());
        let first: Vec<Line> = scene.grid().map(|g| g.lines().to_vec()).unwrap_or_default();
        render_grid(&mut scene, &camera, &params());
        let grids = scene.shapes_ordered().filter(|s| s.is_grid()).count();
        assert_eq!(grids, 1);
        assert_eq!(scene.grid().map(|g| g.lines().to_vec()).unwrap_or_default(), first);
    }

    #[test]
    fn test_grid_is_inert() {
        let grid = GridGroup::build(&Camera::new(), &params());
        assert!(!grid.flags().selectable);
        assert!(!grid.flags().evented);
        assert!(!grid.hit_test(Point::new(20.0, 20.0), 5.0));
    }

    #[test]
    fn test_hidden_param() {
        let mut p = params();
        p.visible = false;
        assert!(!GridGroup::build(&Camera::new(), &p).is_visible());
    }
}
