//! Planta Core Library
//!
//! Platform-agnostic interaction and geometry engine for the Planta floor-plan
//! editor: walls and rulers on a scaled 2D plan, snapping, measurement labels,
//! and the wall projection used by the 3D view.

pub mod camera;
pub mod config;
pub mod editor;
pub mod events;
pub mod grid;
pub mod input;
pub mod projector;
pub mod scene;
pub mod shapes;
pub mod snap;
pub mod theme;
pub mod tools;
pub mod units;
pub mod widget;

pub use camera::{Camera, ZoomLimits};
pub use config::{ConfigError, EditorConfig};
pub use editor::Editor;
pub use events::{EditorEvent, SubscriptionId};
pub use grid::{GridGroup, render_grid};
pub use input::{EventDisposition, Modifiers, PointerEvent, WheelEvent};
pub use projector::{FrameReport, Projector, Surface, ViewMode, WallVolume};
pub use scene::Scene;
pub use shapes::{Ruler, Shape, ShapeColor, ShapeId, Wall, WallKind};
pub use snap::{SnapConfig, SnapKind, SnapResult, resolve_snap, snap_to_grid};
pub use theme::{Palette, ThemeMode};
pub use tools::{Cursor, DrawObject, Mode};
pub use units::{NumberLocale, Scale, UnitConverter, WallThickness};
pub use widget::{WidgetManager, WidgetState};
