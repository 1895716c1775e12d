//! The 2D scene: committed objects in z-order.

use crate::grid::GridGroup;
use crate::shapes::{Shape, ShapeId, Wall};
use kurbo::{Point, Rect, Vec2};
use std::collections::HashMap;

/// All scene objects, keyed by ID, plus their z-order (back to front).
///
/// Two revision counters let observers skip work: `revision` changes on every
/// mutation, `wall_revision` only when walls are added, removed, moved or restyled.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: HashMap<ShapeId, Shape>,
    z_order: Vec<ShapeId>,
    revision: u64,
    wall_revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&mut self, walls_changed: bool) {
        self.revision += 1;
        if walls_changed {
            self.wall_revision += 1;
        }
    }

    /// Bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Bumped when walls are added, removed, moved or restyled.
    pub fn wall_revision(&self) -> u64 {
        self.wall_revision
    }

    /// Add a shape on top.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        let is_wall = shape.as_wall().is_some();
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        self.bump(is_wall);
        id
    }

    /// Add a shape below everything else.
    pub fn insert_at_back(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        let is_wall = shape.as_wall().is_some();
        self.z_order.insert(0, id);
        self.shapes.insert(id, shape);
        self.bump(is_wall);
        id
    }

    /// Remove a shape, returning it if it was present.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let shape = self.shapes.remove(&id)?;
        self.z_order.retain(|&shape_id| shape_id != id);
        self.bump(shape.as_wall().is_some());
        Some(shape)
    }

    /// Remove every shape matching `predicate`, returning them back to front.
    pub fn remove_where(&mut self, predicate: impl Fn(&Shape) -> bool) -> Vec<Shape> {
        let ids: Vec<ShapeId> = self
            .shapes_ordered()
            .filter(|shape| predicate(shape))
            .map(Shape::id)
            .collect();
        ids.into_iter().filter_map(|id| self.remove_shape(id)).collect()
    }

    /// Look up a shape by ID.
    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Mutable access. Revisions are not bumped; use [`Scene::translate_shapes`]
    /// or [`Scene::update_all`] for changes the projector must see.
    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    /// Apply `f` to every shape, recording the change.
    pub fn update_all(&mut self, mut f: impl FnMut(&mut Shape)) {
        for shape in self.shapes.values_mut() {
            f(shape);
        }
        self.bump(true);
    }

    /// Set the `selectable` flag of every drawing. The grid is never selectable.
    pub fn set_selectable(&mut self, selectable: bool) {
        for shape in self.shapes.values_mut().filter(|shape| !shape.is_grid()) {
            shape.flags_mut().selectable = selectable;
        }
        self.bump(false);
    }

    /// Move the given shapes by `delta`. Returns how many were moved.
    pub fn translate_shapes(&mut self, ids: &[ShapeId], delta: Vec2) -> usize {
        let mut moved = 0;
        let mut walls_moved = false;
        for id in ids {
            if let Some(shape) = self.shapes.get_mut(id).filter(|shape| !shape.is_grid()) {
                shape.translate(delta);
                walls_moved |= shape.as_wall().is_some();
                moved += 1;
            }
        }
        if moved > 0 {
            self.bump(walls_moved);
        }
        moved
    }

    /// Shapes back to front.
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Walls back to front.
    pub fn walls(&self) -> impl Iterator<Item = &Wall> {
        self.shapes_ordered().filter_map(Shape::as_wall)
    }

    /// The background grid, if one has been rendered.
    pub fn grid(&self) -> Option<&GridGroup> {
        self.shapes_ordered().find_map(|shape| match shape {
            Shape::Grid(grid) => Some(grid),
            _ => None,
        })
    }

    /// Mutable access to the background grid.
    pub fn grid_mut(&mut self) -> Option<&mut GridGroup> {
        self.shapes.values_mut().find_map(|shape| match shape {
            Shape::Grid(grid) => Some(grid),
            _ => None,
        })
    }

    /// Interactive shapes under a point, top-most first.
    pub fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|id| self.shapes.get(id))
            .filter(|shape| shape.is_interactive() && shape.hit_test(point, tolerance))
            .map(Shape::id)
            .collect()
    }

    /// Top-most interactive shape under a point.
    pub fn top_shape_at(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.shapes_at_point(point, tolerance).into_iter().next()
    }

    /// Selectable shapes touching a marquee rectangle, back to front.
    pub fn selectable_in_rect(&self, rect: Rect) -> Vec<ShapeId> {
        self.shapes_ordered()
            .filter(|shape| {
                let flags = shape.flags();
                flags.selectable && flags.visible && shape.intersects_rect(rect)
            })
            .map(Shape::id)
            .collect()
    }

    /// Number of shapes, grid included.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of committed drawings (walls and rulers).
    pub fn drawing_count(&self) -> usize {
        self.shapes.values().filter(|shape| !shape.is_grid()).count()
    }
}
