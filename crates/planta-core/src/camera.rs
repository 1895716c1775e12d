//! View transform: pan offset and zoom between device and scene coordinates.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom step used by the zoom buttons.
pub const ZOOM_STEP: f64 = 0.1;

/// Inclusive zoom bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl ZoomLimits {
    /// Bounds for the zoom buttons.
    pub const CONTROLS: ZoomLimits = ZoomLimits { min: 0.1, max: 2.0 };
    /// Bounds for modifier + wheel zoom.
    pub const WHEEL: ZoomLimits = ZoomLimits { min: 0.1, max: 20.0 };

    /// Clamp `zoom` into these limits.
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

/// Camera manages the view transform for the 2D canvas.
///
/// Scene coordinates are what shapes, snapping and projection use; device
/// coordinates are what pointer events report. The transform is applied only
/// when crossing that boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in device pixels.
    pub offset: Vec2,
    /// Current zoom level.
    zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Create a camera at zoom 1 with no pan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Scene to device transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Device to scene transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a device point to scene coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a scene point to device coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan by a delta in device pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Set an absolute zoom (clamped to `limits`), keeping `screen_point` fixed.
    ///
    /// Returns the zoom actually applied.
    pub fn zoom_to_point(&mut self, screen_point: Point, zoom: f64, limits: ZoomLimits) -> f64 {
        let new_zoom = limits.clamp(zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return self.zoom;
        }

        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;
        let new_screen = self.world_to_screen(world_point);
        self.offset += screen_point - new_screen;
        self.zoom
    }

    /// Multiply the zoom by `factor`, keeping `screen_point` fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64, limits: ZoomLimits) -> f64 {
        self.zoom_to_point(screen_point, self.zoom * factor, limits)
    }

    /// Scene-space rectangle visible in a viewport of the given size.
    pub fn visible_rect(&self, viewport: Size) -> Rect {
        let top_left = self.screen_to_world(Point::ZERO);
        let bottom_right = self.screen_to_world(Point::new(viewport.width, viewport.height));
        Rect::from_points(top_left, bottom_right)
    }

    /// Fit the world width to the viewport and center the world in it.
    pub fn fit_world(&mut self, world: Size, viewport: Size) {
        let zoom = if world.width > 0.0 {
            viewport.width / world.width
        } else {
            1.0
        };
        self.zoom = ZoomLimits::CONTROLS.clamp(zoom);
        let world_center = Point::new(world.width / 2.0, world.height / 2.0);
        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        self.offset = Vec2::new(
            viewport_center.x - world_center.x * self.zoom,
            viewport_center.y - world_center.y * self.zoom,
        );
    }
}
