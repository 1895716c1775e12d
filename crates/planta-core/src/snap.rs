//! Snapping pointer positions to wall vertices, orthogonal axes and the grid.
//!
//! Priority is fixed and the first rule that matches wins:
//!
//! 1. wall vertex (line endpoints, rectangle corners, circle/ellipse centers)
//! 2. orthogonal intent, only while drawing from a start point
//! 3. grid intersection
//!
//! `None` means "use the raw pointer".

use crate::shapes::{Wall, WallGeometry};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Base snap distance in scene units.
pub const SNAP_THRESHOLD: f64 = 20.0;
/// Below this offset from the start point on one axis, the axis is locked.
pub const ORTHO_INTENT_THRESHOLD: f64 = 15.0;
/// Tighter grid snap applied to the free axis of an orthogonal snap.
pub const LOW_GRID_SNAP_THRESHOLD: f64 = 5.0;

/// How the vertex snap distance relates to [`SnapConfig::threshold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VertexThreshold {
    /// Always twice the base threshold.
    Doubled,
    /// Twice the base threshold only when there is no start point.
    #[default]
    DoubledWithoutStart,
    /// Always the base threshold.
    Single,
}

/// Snap thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub threshold: f64,
    pub ortho_intent_threshold: f64,
    pub low_grid_threshold: f64,
    pub vertex_threshold: VertexThreshold,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            threshold: SNAP_THRESHOLD,
            ortho_intent_threshold: ORTHO_INTENT_THRESHOLD,
            low_grid_threshold: LOW_GRID_SNAP_THRESHOLD,
            vertex_threshold: VertexThreshold::default(),
        }
    }
}

impl SnapConfig {
    /// Vertex snap distance for the current drawing context.
    pub fn vertex_distance(&self, has_start: bool) -> f64 {
        match self.vertex_threshold {
            VertexThreshold::Doubled => self.threshold * 2.0,
            VertexThreshold::DoubledWithoutStart if !has_start => self.threshold * 2.0,
            VertexThreshold::DoubledWithoutStart | VertexThreshold::Single => self.threshold,
        }
    }
}

/// Type of wall vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTargetKind {
    /// End of a line wall.
    Endpoint,
    /// Corner of a rectangle wall.
    Corner,
    /// Center of a circle or ellipse wall.
    Center,
}

/// A wall vertex that can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub point: Point,
    pub kind: SnapTargetKind,
}

/// Which rule produced a snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    Vertex(SnapTargetKind),
    Orthogonal,
    Grid,
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub point: Point,
    pub kind: SnapKind,
}

/// Snap targets of a wall.
pub fn wall_snap_targets(wall: &Wall) -> Vec<SnapTarget> {
    let kind = match wall.geometry {
        WallGeometry::Line { .. } => SnapTargetKind::Endpoint,
        WallGeometry::Rectangle { .. } => SnapTargetKind::Corner,
        WallGeometry::Circle { .. } | WallGeometry::Ellipse { .. } => SnapTargetKind::Center,
    };
    wall.anchors()
        .into_iter()
        .map(|point| SnapTarget { point, kind })
        .collect()
}

/// Closest target strictly within `threshold` of `point`.
pub fn closest_target(point: Point, targets: &[SnapTarget], threshold: f64) -> Option<SnapTarget> {
    targets
        .iter()
        .map(|target| (target, (point - target.point).hypot()))
        .filter(|(_, dist)| *dist < threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(target, _)| *target)
}

/// Round a single coordinate to the grid.
pub fn snap_coordinate(value: f64, grid_size: f64) -> f64 {
    (value / grid_size).round() * grid_size
}

/// Nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(
        snap_coordinate(point.x, grid_size),
        snap_coordinate(point.y, grid_size),
    )
}

/// Resolve the snapped position for `pointer`.
///
/// `walls` are visited in scene order; the first wall with a vertex in range
/// wins, and within that wall the closest vertex wins.
pub fn resolve_snap<'a>(
    pointer: Point,
    walls: impl IntoIterator<Item = &'a Wall>,
    start: Option<Point>,
    grid_size: f64,
    config: &SnapConfig,
) -> Option<SnapResult> {
    let vertex_distance = config.vertex_distance(start.is_some());
    for wall in walls {
        if let Some(target) = closest_target(pointer, &wall_snap_targets(wall), vertex_distance) {
            return Some(SnapResult {
                point: target.point,
                kind: SnapKind::Vertex(target.kind),
            });
        }
    }

    let grid_valid = grid_size.is_finite() && grid_size > 0.0;

    if let Some(start) = start {
        let dx = (pointer.x - start.x).abs();
        let dy = (pointer.y - start.y).abs();
        let low_grid = |value: f64| {
            if !grid_valid {
                return value;
            }
            let snapped = snap_coordinate(value, grid_size);
            if (value - snapped).abs() < config.low_grid_threshold {
                snapped
            } else {
                value
            }
        };

        if dx < config.ortho_intent_threshold {
            return Some(SnapResult {
                point: Point::new(start.x, low_grid(pointer.y)),
                kind: SnapKind::Orthogonal,
            });
        } else if dy < config.ortho_intent_threshold {
            return Some(SnapResult {
                point: Point::new(low_grid(pointer.x), start.y),
                kind: SnapKind::Orthogonal,
            });
        }
    }

    if !grid_valid {
        return None;
    }
    let grid_point = snap_to_grid(pointer, grid_size);
    ((pointer - grid_point).hypot() < config.threshold).then_some(SnapResult {
        point: grid_point,
        kind: SnapKind::Grid,
    })
}
