//! Extrusion of 2D walls into 3D volumes.
//!
//! 3D space is in meters with Y up. The 2D x axis maps to 3D x and the 2D y
//! axis (downwards on screen) maps to 3D z, so the floor plan lies on the
//! ground plane. The world-size midpoint maps to the origin.

use crate::shapes::{ShapeColor, ShapeId, Wall, WallGeometry, WallKind};
use glam::DVec3;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use thiserror::Error;

/// Angles this close to a cardinal direction are snapped onto it.
pub const ANGLE_SNAP_TOLERANCE: f64 = 0.01;
/// Side of the square ground plane, in meters.
pub const FLOOR_SIZE: f64 = 200.0;

const CARDINAL_ANGLES: [f64; 5] = [0.0, FRAC_PI_2, -FRAC_PI_2, PI, -PI];

/// Projection errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("No 3D extrusion for {0:?} walls")]
    UnsupportedKind(WallKind),
}

/// Result type for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Which surface the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    TwoD,
    ThreeD,
}

/// The two always-mounted drawing surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Plan,
    Model,
}

/// How the host should present a surface. Inactive surfaces stay mounted
/// but are hidden and ignore input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfacePresentation {
    pub z_index: i32,
    pub visible: bool,
    pub pointer_events: bool,
}

impl SurfacePresentation {
    const ACTIVE: SurfacePresentation = SurfacePresentation {
        z_index: 1,
        visible: true,
        pointer_events: true,
    };

    const INACTIVE: SurfacePresentation = SurfacePresentation {
        z_index: 0,
        visible: false,
        pointer_events: false,
    };

    /// Presentation of `surface` while `mode` is active.
    pub fn for_surface(surface: Surface, mode: ViewMode) -> Self {
        match (surface, mode) {
            (Surface::Plan, ViewMode::TwoD) | (Surface::Model, ViewMode::ThreeD) => Self::ACTIVE,
            _ => Self::INACTIVE,
        }
    }
}

/// An extruded wall box.
#[derive(Debug, Clone, PartialEq)]
pub struct WallVolume {
    /// The 2D wall this volume was built from.
    pub source: ShapeId,
    /// Box center.
    pub position: DVec3,
    /// Euler rotation in radians; only `y` is used.
    pub rotation: DVec3,
    /// Length (local x), height (local y), thickness (local z).
    pub size: DVec3,
    pub color: ShapeColor,
}

/// Fixed inputs of a projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    pub world: Size,
    pub meters_per_pixel: f64,
    pub wall_height: f64,
}

impl ProjectionParams {
    /// Map a 2D scene point onto the ground plane.
    pub fn ground_point(&self, point: Point) -> DVec3 {
        DVec3::new(
            (point.x - self.world.width / 2.0) * self.meters_per_pixel,
            0.0,
            (point.y - self.world.height / 2.0) * self.meters_per_pixel,
        )
    }
}

/// Snap `angle` onto 0, ±90° or 180° when within [`ANGLE_SNAP_TOLERANCE`].
pub fn snap_angle(angle: f64) -> f64 {
    CARDINAL_ANGLES
        .into_iter()
        .find(|cardinal| (angle - cardinal).abs() < ANGLE_SNAP_TOLERANCE)
        .unwrap_or(angle)
}

/// Build the 3D volume of one wall.
pub fn project_wall(wall: &Wall, params: &ProjectionParams) -> ProjectionResult<WallVolume> {
    let WallGeometry::Line { start, end } = wall.geometry else {
        return Err(ProjectionError::UnsupportedKind(wall.kind()));
    };
    let delta = end - start;
    let angle = snap_angle(delta.y.atan2(delta.x));
    let mut position = params.ground_point(start.midpoint(end));
    position.y = params.wall_height / 2.0;

    Ok(WallVolume {
        source: wall.id,
        position,
        rotation: DVec3::new(0.0, -angle, 0.0),
        size: DVec3::new(
            delta.hypot() * params.meters_per_pixel,
            params.wall_height,
            wall.meta.thickness.meters(),
        ),
        color: wall.meta.color,
    })
}

/// Orbit camera placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRig {
    pub camera: DVec3,
    pub target: DVec3,
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self {
            camera: DVec3::new(0.0, 3.0, -10.0),
            target: DVec3::new(0.0, 0.75, 0.0),
        }
    }
}

impl OrbitRig {
    /// Move the target over `point` on the ground, keeping its height, and
    /// carry the camera along so the viewing angle is unchanged.
    pub fn follow(&mut self, point: DVec3) {
        let target = DVec3::new(point.x, self.target.y, point.z);
        self.camera += target - self.target;
        self.target = target;
    }
}

/// Light setup of the 3D scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient_intensity: f64,
    pub directional_intensity: f64,
    pub directional_position: DVec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient_intensity: 2.4,
            directional_intensity: 1.8,
            directional_position: DVec3::new(5.0, 5.0, 5.0),
        }
    }
}

/// Outcome of one frame of the 3D view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Volumes were regenerated this frame.
    pub rebuilt: bool,
    /// Number of volumes in the 3D scene.
    pub projected: usize,
    /// Kinds of walls that produced no volume during the rebuild.
    pub skipped: Vec<WallKind>,
    /// The 3D surface should be redrawn (it is redrawn continuously while active).
    pub needs_redraw: bool,
}

/// Keeps the 3D wall set in step with the 2D scene.
#[derive(Debug, Clone, Default)]
pub struct Projector {
    volumes: Vec<WallVolume>,
    rig: OrbitRig,
    lighting: Lighting,
    built_for: Option<(u64, ViewMode)>,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Volumes from the last rebuild.
    pub fn volumes(&self) -> &[WallVolume] {
        &self.volumes
    }

    /// Orbit camera placement.
    pub fn rig(&self) -> &OrbitRig {
        &self.rig
    }

    /// Scene lighting parameters.
    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    /// Discard all volumes and, in 3D, rebuild them from `walls`. Returns the
    /// kinds that could not be extruded.
    pub fn rebuild<'a>(
        &mut self,
        walls: impl IntoIterator<Item = &'a Wall>,
        view_mode: ViewMode,
        params: &ProjectionParams,
    ) -> Vec<WallKind> {
        self.volumes.clear();
        if view_mode != ViewMode::ThreeD {
            return Vec::new();
        }

        let mut skipped = Vec::new();
        let mut centroid = DVec3::ZERO;
        let mut count = 0usize;
        for wall in walls {
            centroid += params.ground_point(wall.geometry.center());
            count += 1;
            match project_wall(wall, params) {
                Ok(volume) => self.volumes.push(volume),
                Err(err) => {
                    log::debug!("wall {} not projected: {}", wall.id, err);
                    skipped.push(wall.kind());
                }
            }
        }
        if count > 0 {
            self.rig.follow(centroid / count as f64);
        }
        skipped
    }

    /// Rebuild if the wall revision or the view mode changed since the last
    /// build.
    pub fn sync<'a>(
        &mut self,
        walls: impl IntoIterator<Item = &'a Wall>,
        wall_revision: u64,
        view_mode: ViewMode,
        params: &ProjectionParams,
    ) -> FrameReport {
        let key = (wall_revision, view_mode);
        let mut report = FrameReport {
            needs_redraw: view_mode == ViewMode::ThreeD,
            ..FrameReport::default()
        };
        if self.built_for != Some(key) {
            report.skipped = self.rebuild(walls, view_mode, params);
            report.rebuilt = true;
            self.built_for = Some(key);
        }
        report.projected = self.volumes.len();
        report
    }
}
