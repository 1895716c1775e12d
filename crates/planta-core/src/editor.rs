//! The floor-plan editor: mode state machine driving the 2D scene.
//!
//! The host forwards raw pointer, wheel and keyboard events in device
//! coordinates. The editor converts them to scene coordinates, routes them to
//! the listener registered for the current mode, and keeps the grid and the
//! 3D projection in step with the scene.

use crate::camera::{Camera, ZoomLimits, ZOOM_STEP};
use crate::config::EditorConfig;
use crate::events::{EditorEvent, EventBus, SubscriptionId};
use crate::grid::{render_grid, GridParams};
use crate::input::{EventDisposition, PointerEvent, WheelEvent};
use crate::projector::{FrameReport, ProjectionParams, Projector, Surface, SurfacePresentation, ViewMode};
use crate::scene::Scene;
use crate::shapes::{Label, PreviewShape, RulerFactory, Shape, ShapeColor, ShapeId, WallFactory};
use crate::snap::resolve_snap;
use crate::theme::{Palette, ThemeMode};
use crate::tools::{
    Cursor, DragSession, DrawObject, DrawSession, KeyAction, KeyBinding, ListenerHandle,
    ListenerKind, ListenerRegistry, Marquee, Measurement, Mode, MoveSession,
};
use crate::units::{Scale, UnitConverter, WallThickness};
use crate::widget::WidgetManager;
use kurbo::{Point, Size, Vec2};
use std::collections::HashSet;

/// Logical drawing bounds on landscape screens.
pub const DESKTOP_WORLD: Size = Size::new(1920.0, 1080.0);
/// Logical drawing bounds on portrait screens.
pub const MOBILE_WORLD: Size = Size::new(1080.0, 1920.0);
/// Hit-test tolerance in device pixels.
pub const HIT_TOLERANCE: f64 = 4.0;
/// Base of the exponential wheel zoom.
const WHEEL_ZOOM_BASE: f64 = 0.999;

/// World size for a viewport: portrait viewports get the mobile layout.
pub fn world_size_for(viewport: Size) -> Size {
    if viewport.height > viewport.width {
        MOBILE_WORLD
    } else {
        DESKTOP_WORLD
    }
}

/// Interactive floor-plan editor.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    scene: Scene,
    camera: Camera,
    mode: Mode,
    draw_object: Option<DrawObject>,
    draw: Option<DrawSession>,
    drag: Option<DragSession>,
    moving: Option<MoveSession>,
    marquee: Option<Marquee>,
    widgets: WidgetManager,
    scale: Scale,
    wall_thickness: WallThickness,
    units: UnitConverter,
    palette: Palette,
    grid_visible: bool,
    world: Size,
    /// `None` until mounted.
    viewport: Option<Size>,
    focused: bool,
    view_mode: ViewMode,
    projector: Projector,
    listeners: ListenerRegistry,
    mode_listener: Option<ListenerHandle>,
    wheel_listener: Option<ListenerHandle>,
    events: EventBus,
}

impl Editor {
    /// Create an unmounted editor from `config`.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            scene: Scene::new(),
            camera: Camera::new(),
            mode: Mode::default(),
            draw_object: None,
            draw: None,
            drag: None,
            moving: None,
            marquee: None,
            widgets: WidgetManager::new(),
            scale: config.scale,
            wall_thickness: config.wall_thickness,
            units: UnitConverter::new(config.device_pixel_ratio, config.locale),
            palette: Palette::for_mode(config.theme),
            grid_visible: config.grid_visible,
            world: DESKTOP_WORLD,
            viewport: None,
            focused: false,
            view_mode: ViewMode::default(),
            projector: Projector::new(),
            listeners: ListenerRegistry::new(),
            mode_listener: None,
            wheel_listener: None,
            events: EventBus::new(),
            config,
        }
    }

    // --- Lifecycle ---

    /// Attach to a canvas of the given size: pick the world size, center the
    /// view, install listeners and draw the grid.
    pub fn mount(&mut self, viewport: Size) {
        if self.viewport.is_some() {
            self.resize(viewport);
            return;
        }
        self.viewport = Some(viewport);
        self.world = world_size_for(viewport);
        self.camera.fit_world(self.world, viewport);
        self.wheel_listener = Some(self.listeners.register(ListenerKind::Wheel));
        self.mode_listener = Some(self.listeners.register(self.mode.listener()));
        self.refresh_grid();
        log::info!(
            "mounted {}x{} viewport, world {}x{}, zoom {:.3}",
            viewport.width,
            viewport.height,
            self.world.width,
            self.world.height,
            self.camera.zoom()
        );
    }

    /// Detach from the canvas. Listeners are released and gestures dropped;
    /// the scene is kept.
    pub fn unmount(&mut self) {
        self.end_gestures();
        self.clear_hover();
        for handle in [self.mode_listener.take(), self.wheel_listener.take()]
            .into_iter()
            .flatten()
        {
            self.listeners.release(handle);
        }
        self.viewport = None;
        log::info!("unmounted");
    }

    /// Whether the editor is attached to a canvas.
    pub fn is_mounted(&self) -> bool {
        self.viewport.is_some()
    }

    /// The canvas changed size. The world size chosen at mount is kept.
    pub fn resize(&mut self, viewport: Size) {
        if self.viewport.is_none() {
            log::debug!("resize skipped: canvas not mounted");
            return;
        }
        self.viewport = Some(viewport);
        self.refresh_grid();
    }

    /// Keyboard bindings only fire while the canvas has focus.
    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    // --- Mode and tool selection ---

    /// Current interaction mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch mode. Any gesture in progress is dropped, the erase preview is
    /// undone, the selection cleared, and the pointer listener replaced.
    pub fn set_mode(&mut self, mode: Mode) {
        self.end_gestures();
        self.clear_hover();
        self.widgets.clear_selection();
        self.scene.set_selectable(mode == Mode::Select);

        if let Some(handle) = self.mode_listener.take() {
            self.listeners.release(handle);
        }
        if self.is_mounted() {
            self.mode_listener = Some(self.listeners.register(mode.listener()));
        }

        if self.mode != mode {
            log::info!("mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        self.events.emit(EditorEvent::ModeChanged(mode));
    }

    /// What draw mode produces, if anything.
    pub fn draw_object(&self) -> Option<DrawObject> {
        self.draw_object
    }

    /// Choose what draw mode produces. Drops any draw session in progress.
    pub fn set_draw_object(&mut self, object: Option<DrawObject>) {
        self.draw = None;
        self.draw_object = object;
        self.events.emit(EditorEvent::DrawObjectChanged(object));
    }

    /// Handle a key press. Returns true when the key was bound.
    pub fn key_pressed(&mut self, key: &str) -> bool {
        if !self.focused {
            return false;
        }
        match KeyBinding::lookup(key) {
            Some(KeyAction::SetMode(mode)) => self.set_mode(mode),
            Some(KeyAction::Draw(object)) => {
                self.set_mode(Mode::Draw);
                self.set_draw_object(Some(object));
            }
            None => return false,
        }
        true
    }

    // --- Scale and units ---

    /// Current drawing scale.
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Change the drawing scale. Existing drawings keep their geometry and
    /// stroke; only later labels and walls use the new scale.
    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
        self.events.emit(EditorEvent::ScaleChanged(scale));
    }

    /// Thickness preset for walls drawn from now on.
    pub fn wall_thickness(&self) -> WallThickness {
        self.wall_thickness
    }

    /// Set the thickness preset for new walls.
    pub fn set_wall_thickness(&mut self, thickness: WallThickness) {
        self.wall_thickness = thickness;
    }

    /// Unit converter for the current device.
    pub fn units(&self) -> &UnitConverter {
        &self.units
    }

    /// Update the device pixel ratio reported by the host.
    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        self.units.set_device_pixel_ratio(ratio);
    }

    /// Stroke width of walls drawn from now on.
    pub fn wall_stroke_width(&self) -> f64 {
        self.units.wall_stroke_width(self.wall_thickness, self.scale)
    }

    // --- Pointer input ---

    /// Pointer pressed on the canvas, in device coordinates.
    pub fn pointer_down(&mut self, event: &PointerEvent) {
        match self.pointer_listener() {
            Some(ListenerKind::Select) => self.select_down(event),
            Some(ListenerKind::Pan) => self.pan_down(event),
            Some(ListenerKind::Draw) => self.draw_down(event),
            Some(ListenerKind::Erase) => self.erase_down(event),
            _ => {}
        }
    }

    /// Pointer moved over the canvas. Updates hover, then the active gesture.
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        let Some(listener) = self.pointer_listener() else {
            return;
        };
        if let Some(position) = event.position() {
            let world = self.camera.screen_to_world(position);
            self.update_hover(world);
        }
        match listener {
            ListenerKind::Select => self.select_move(event),
            ListenerKind::Pan => self.pan_move(event),
            ListenerKind::Draw => self.draw_move(event),
            _ => {}
        }
    }

    /// Pointer released. Commits or ends the active gesture.
    pub fn pointer_up(&mut self, event: &PointerEvent) {
        match self.pointer_listener() {
            Some(ListenerKind::Select) => self.select_up(event),
            Some(ListenerKind::Pan) => self.drag = None,
            Some(ListenerKind::Draw) => self.draw_up(event),
            _ => {}
        }
    }

    /// The pointer left the canvas.
    pub fn pointer_leave(&mut self) {
        self.clear_hover();
    }

    /// Listener that receives pointer events right now, if any.
    fn pointer_listener(&self) -> Option<ListenerKind> {
        if self.view_mode != ViewMode::TwoD {
            return None;
        }
        let kind = self.mode_listener.as_ref().map(ListenerHandle::kind);
        if kind.is_none() {
            log::debug!("pointer event skipped: canvas not mounted");
        }
        kind
    }

    fn hit_tolerance(&self) -> f64 {
        HIT_TOLERANCE / self.camera.zoom()
    }

    fn scene_position(&self, event: &PointerEvent) -> Option<Point> {
        event.position().map(|p| self.camera.screen_to_world(p))
    }

    // Select

    fn select_down(&mut self, event: &PointerEvent) {
        let Some(world) = self.scene_position(event) else {
            return;
        };
        let additive = event.modifiers.shift;
        let hit = self
            .scene
            .shapes_at_point(world, self.hit_tolerance())
            .into_iter()
            .find(|id| self.scene.get_shape(*id).is_some_and(|s| s.flags().selectable));

        match hit {
            Some(id) => {
                if additive {
                    self.widgets.add_to_selection(id);
                } else if !self.widgets.is_selected(id) {
                    self.widgets.select(id);
                }
                self.moving = Some(MoveSession::new(world));
            }
            None => {
                if !additive {
                    self.widgets.clear_selection();
                }
                self.marquee = Some(Marquee {
                    start: world,
                    current: world,
                    additive,
                });
            }
        }
    }

    fn select_move(&mut self, event: &PointerEvent) {
        let Some(world) = self.scene_position(event) else {
            return;
        };
        if let Some(session) = &mut self.moving {
            let delta = session.advance(world);
            let ids: Vec<ShapeId> = self.widgets.selected().iter().copied().collect();
            self.scene.translate_shapes(&ids, delta);
        } else if let Some(marquee) = &mut self.marquee {
            marquee.current = world;
        }
    }

    fn select_up(&mut self, event: &PointerEvent) {
        if let Some(session) = self.moving.take() {
            let offset = session.offset();
            if offset != Vec2::ZERO {
                log::debug!(
                    "moved {} objects by ({:.1}, {:.1})",
                    self.widgets.selected().len(),
                    offset.x,
                    offset.y
                );
                self.emit_scene_changed();
            }
            return;
        }
        let Some(mut marquee) = self.marquee.take() else {
            return;
        };
        if let Some(world) = self.scene_position(event) {
            marquee.current = world;
        }
        let rect = marquee.rect();
        if rect.width() > 0.0 || rect.height() > 0.0 {
            for id in self.scene.selectable_in_rect(rect) {
                self.widgets.add_to_selection(id);
            }
        }
    }

    // Pan

    fn pan_down(&mut self, event: &PointerEvent) {
        if let Some(position) = event.position() {
            self.drag = Some(DragSession { last: position });
        }
    }

    fn pan_move(&mut self, event: &PointerEvent) {
        let (Some(drag), Some(position)) = (&mut self.drag, event.position()) else {
            return;
        };
        let delta = drag.advance(position);
        self.camera.pan(delta);
        self.refresh_grid();
    }

    // Draw

    fn snap(&self, world: Point, start: Option<Point>) -> Point {
        resolve_snap(
            world,
            self.scene.walls(),
            start,
            self.units.grid_size(),
            &self.config.snap,
        )
        .map_or(world, |snap| snap.point)
    }

    fn preview_color(&self, object: DrawObject) -> ShapeColor {
        match object {
            DrawObject::Ruler => self.palette.ruler,
            _ => self.palette.wall,
        }
    }

    fn measurement_label(&self, measurement: Measurement) -> String {
        match measurement {
            Measurement::Length(px) => self.units.length_label(px, self.scale),
            Measurement::Area(px) => self.units.area_label(px, self.scale),
        }
    }

    fn draw_down(&mut self, event: &PointerEvent) {
        let (Some(object), Some(world)) = (self.draw_object, self.scene_position(event)) else {
            return;
        };
        let start = self.snap(world, None);
        self.draw = Some(DrawSession::begin(object, start, self.preview_color(object)));
    }

    fn draw_move(&mut self, event: &PointerEvent) {
        let (Some(start), Some(world)) = (
            self.draw.as_ref().map(|session| session.start),
            self.scene_position(event),
        ) else {
            return;
        };
        let end = self.snap(world, Some(start));
        let constrain = event.modifiers.constrain();
        let Some(session) = &mut self.draw else {
            return;
        };
        session.update(end, constrain);
        let measurement = session.measurement();
        let text = self.measurement_label(measurement);
        if let Some(session) = &mut self.draw {
            session.set_label(text, end);
        }
    }

    fn draw_up(&mut self, event: &PointerEvent) {
        let Some(session) = self.draw.take() else {
            return;
        };
        let Some(world) = self.scene_position(event) else {
            log::debug!("draw aborted: pointer-up without coordinates");
            return;
        };
        let start = session.start;
        let end = self.snap(world, Some(start));
        let length = (end - start).hypot();
        if length <= 0.0 {
            log::debug!("draw discarded: zero length");
            return;
        }

        let shape = match session.object.wall_kind(event.modifiers.constrain()) {
            None => {
                let text = self.units.length_label(length, self.scale);
                Shape::Ruler(RulerFactory::new(start, self.palette.ruler).build(end, text))
            }
            Some(kind) => Shape::Wall(
                WallFactory::new(
                    start,
                    end,
                    self.palette.wall,
                    self.wall_thickness,
                    self.wall_stroke_width(),
                )
                .build(kind),
            ),
        };
        let id = self.scene.add_shape(shape);
        log::debug!("committed {:?} {} from {:?} to {:?}", session.object, id, start, end);
        self.emit_scene_changed();
    }

    // Erase

    fn erase_down(&mut self, event: &PointerEvent) {
        let Some(world) = self.scene_position(event) else {
            return;
        };
        let Some(id) = self.scene.top_shape_at(world, self.hit_tolerance()) else {
            return;
        };
        if self.scene.remove_shape(id).is_some() {
            self.widgets.remove(id);
            log::debug!("erased {}", id);
            self.emit_scene_changed();
        }
    }

    // Hover

    fn update_hover(&mut self, world: Point) {
        let hit = self.scene.top_shape_at(world, self.hit_tolerance());
        self.set_hover(hit);
    }

    fn clear_hover(&mut self) {
        self.set_hover(None);
    }

    /// Move the hover. In erase mode the hovered object is painted with the
    /// highlight color and the previous one gets its recorded color back.
    fn set_hover(&mut self, hit: Option<ShapeId>) {
        let Some(previous) = self.widgets.set_hovered(hit) else {
            return;
        };
        if let Some(shape) = previous.and_then(|id| self.scene.get_shape_mut(id)) {
            shape.restore_color();
        }
        if self.mode == Mode::Erase {
            let highlight = self.palette.highlight;
            if let Some(shape) = hit.and_then(|id| self.scene.get_shape_mut(id)) {
                shape.highlight(highlight);
            }
        }
    }

    fn end_gestures(&mut self) {
        self.draw = None;
        self.drag = None;
        self.moving = None;
        self.marquee = None;
    }

    // --- Wheel and zoom ---

    /// Wheel input: modifier zoom around the pointer, Shift pans
    /// horizontally, plain wheel pans vertically.
    pub fn wheel(&mut self, event: &WheelEvent) -> EventDisposition {
        if self.wheel_listener.is_none() {
            log::debug!("wheel skipped: canvas not mounted");
            return EventDisposition::IGNORED;
        }
        if self.view_mode != ViewMode::TwoD {
            return EventDisposition::IGNORED;
        }
        if !event.delta_y.is_finite() {
            log::debug!("wheel skipped: non-finite delta {}", event.delta_y);
            return EventDisposition::CONSUMED;
        }
        if event.modifiers.precision_zoom() {
            let Some(position) = event.position else {
                return EventDisposition::CONSUMED;
            };
            let factor = WHEEL_ZOOM_BASE.powf(event.delta_y);
            let zoom = self.camera.zoom_at(position, factor, ZoomLimits::WHEEL);
            self.events.emit(EditorEvent::ZoomChanged(zoom));
        } else if event.modifiers.horizontal_pan() {
            self.camera.pan(Vec2::new(-event.delta_y, 0.0));
        } else {
            self.camera.pan(Vec2::new(0.0, -event.delta_y));
        }
        self.refresh_grid();
        EventDisposition::CONSUMED
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.camera.zoom()
    }

    /// Step the zoom up around the viewport center.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.camera.zoom() + ZOOM_STEP);
    }

    /// Step the zoom down around the viewport center.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.camera.zoom() - ZOOM_STEP);
    }

    /// Back to 100% around the viewport center.
    pub fn reset_zoom(&mut self) {
        self.set_zoom(1.0);
    }

    /// Zoom around the viewport center within the button limits.
    fn set_zoom(&mut self, zoom: f64) {
        let Some(viewport) = self.viewport else {
            log::debug!("zoom skipped: canvas not mounted");
            return;
        };
        let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        let zoom = self.camera.zoom_to_point(center, zoom, ZoomLimits::CONTROLS);
        self.refresh_grid();
        self.events.emit(EditorEvent::ZoomChanged(zoom));
    }

    // --- Grid and theme ---

    fn refresh_grid(&mut self) {
        let Some(viewport) = self.viewport else {
            log::debug!("grid skipped: canvas not mounted");
            return;
        };
        let params = GridParams {
            viewport,
            world: self.world,
            color: self.palette.grid,
            cell_screen_size: self.config.grid_cell_size,
            visible: self.grid_visible,
        };
        render_grid(&mut self.scene, &self.camera, &params);
    }

    /// Whether the grid is shown.
    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    /// Show or hide the grid. A hidden grid is kept, just not drawn.
    pub fn set_grid_visible(&mut self, visible: bool) {
        self.grid_visible = visible;
        if let Some(grid) = self.scene.grid_mut() {
            grid.set_visible(visible);
        }
        self.events.emit(EditorEvent::GridVisibilityChanged(visible));
    }

    /// Palette used for drawings and the grid.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Restyle every drawing and the grid, and use `palette` for new shapes.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.scene.update_all(|shape| {
            let color = match shape {
                Shape::Wall(_) => palette.wall,
                Shape::Ruler(_) => palette.ruler,
                Shape::Grid(_) => palette.grid,
            };
            shape.restyle(color);
        });
        if self.mode == Mode::Erase {
            if let Some(shape) = self.widgets.hovered().and_then(|id| self.scene.get_shape_mut(id)) {
                shape.highlight(palette.highlight);
            }
        }
        self.emit_scene_changed();
    }

    /// Switch to the palette of `theme`.
    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.set_palette(Palette::for_mode(theme));
    }

    // --- 2D / 3D ---

    /// Active view: 2D plan or 3D model.
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switch between the 2D and 3D surfaces. Leaving 2D drops gestures and hover.
    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        if view_mode != ViewMode::TwoD {
            self.end_gestures();
            self.clear_hover();
        }
        self.view_mode = view_mode;
        log::info!("view mode {:?}", view_mode);
        self.events.emit(EditorEvent::ViewModeChanged(view_mode));
    }

    /// Stacking, visibility and pointer routing for `surface`.
    pub fn surface_presentation(&self, surface: Surface) -> SurfacePresentation {
        SurfacePresentation::for_surface(surface, self.view_mode)
    }

    /// 3D wall volumes built from the scene.
    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Per-frame update: rebuild the 3D walls if the walls or the view mode
    /// changed since the last frame.
    pub fn tick(&mut self) -> FrameReport {
        if !self.is_mounted() {
            log::debug!("frame skipped: canvas not mounted");
            return FrameReport::default();
        }
        let params = ProjectionParams {
            world: self.world,
            meters_per_pixel: self.units.meters_per_pixel(),
            wall_height: self.config.wall_height,
        };
        self.projector.sync(
            self.scene.walls(),
            self.scene.wall_revision(),
            self.view_mode,
            &params,
        )
    }

    // --- Observers ---

    /// Register an observer for editor events.
    pub fn subscribe(&mut self, handler: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(handler)
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn emit_scene_changed(&mut self) {
        let drawings = self.scene.drawing_count();
        self.events.emit(EditorEvent::SceneChanged { drawings });
    }

    // --- State queries ---

    /// Committed scene objects, grid included.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// View transform.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Logical drawing bounds chosen at mount.
    pub fn world_size(&self) -> Size {
        self.world
    }

    /// Canvas size, or `None` while unmounted.
    pub fn viewport(&self) -> Option<Size> {
        self.viewport
    }

    /// Listeners installed on the canvas.
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// The draw session in progress, if any.
    pub fn draw_session(&self) -> Option<&DrawSession> {
        self.draw.as_ref()
    }

    /// Live preview geometry of the draw session.
    pub fn preview(&self) -> Option<&PreviewShape> {
        self.draw.as_ref().map(|session| &session.preview)
    }

    /// Live measurement label of the draw session.
    pub fn preview_label(&self) -> Option<&Label> {
        self.draw.as_ref().map(|session| &session.label)
    }

    /// Number of preview objects on screen: a geometry and a label per session.
    pub fn preview_count(&self) -> usize {
        if self.draw.is_some() { 2 } else { 0 }
    }

    /// Rubber band of an in-progress marquee selection.
    pub fn marquee(&self) -> Option<&Marquee> {
        self.marquee.as_ref()
    }

    /// Whether a pan gesture is in progress.
    pub fn is_panning(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the selection is being dragged.
    pub fn is_moving(&self) -> bool {
        self.moving.is_some()
    }

    /// Selected objects.
    pub fn selection(&self) -> &HashSet<ShapeId> {
        self.widgets.selected()
    }

    /// Object under the pointer.
    pub fn hovered(&self) -> Option<ShapeId> {
        self.widgets.hovered()
    }

    /// Cursor the host should show.
    pub fn cursor(&self) -> Cursor {
        self.mode.cursor(self.widgets.hovered().is_some(), self.drag.is_some())
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::shapes::{ShapeKind, WallGeometry, WallKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Mounted on a desktop viewport: zoom 1, no offset, so device == scene.
    fn editor() -> Editor {
        init_logger();
        let mut editor = Editor::default();
        editor.mount(Size::new(1920.0, 1080.0));
        editor
    }

    fn draw(editor: &mut Editor, object: DrawObject, from: (f64, f64), to: (f64, f64)) {
        editor.set_mode(Mode::Draw);
        editor.set_draw_object(Some(object));
        editor.pointer_down(&PointerEvent::mouse(from.0, from.1));
        editor.pointer_move(&PointerEvent::mouse(to.0, to.1));
        editor.pointer_up(&PointerEvent::mouse(to.0, to.1));
    }

    fn drawings(editor: &Editor) -> Vec<&Shape> {
        editor.scene().shapes_ordered().filter(|s| !s.is_grid()).collect()
    }

    fn grid_shape(editor: &Editor) -> Option<&Shape> {
        editor.scene().shapes_ordered().find(|s| s.is_grid())
    }

    #[test]
    fn test_mount_centers_world() {
        let editor = editor();
        assert_eq!(editor.world_size(), DESKTOP_WORLD);
        assert!((editor.zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(editor.camera().offset, Vec2::ZERO);
        assert!(editor.scene().grid().is_some());
        assert_eq!(
            editor.listeners().active_kinds(),
            vec![ListenerKind::Wheel, ListenerKind::Select]
        );
    }

    #[test]
    fn test_portrait_viewport_uses_mobile_world() {
        init_logger();
        let mut editor = Editor::default();
        editor.mount(Size::new(540.0, 960.0));
        assert_eq!(editor.world_size(), MOBILE_WORLD);
        assert!((editor.zoom() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_line_commit() {
        let mut editor = editor();
        draw(&mut editor, DrawObject::Line, (0.0, 0.0), (100.0, 0.0));

        let shapes = drawings(&editor);
        assert_eq!(shapes.len(), 1);
        let Shape::Wall(wall) = shapes[0] else {
            panic!("expected a wall");
        };
        assert_eq!(wall.kind(), WallKind::Line);
        assert_eq!(
            wall.geometry,
            WallGeometry::Line {
                start: Point::new(0.0, 0.0),
                end: Point::new(100.0, 0.0)
            }
        );
        assert_eq!(wall.meta.thickness, WallThickness::Medium);
        let expected = editor.units().wall_stroke_width(WallThickness::Medium, Scale::default());
        assert!((wall.style.stroke_width - expected).abs() < 1e-12);
        assert_eq!(editor.preview_count(), 0);
        assert!(editor.draw_session().is_none());
    }

    #[test]
    fn test_previews_stay_out_of_scene() {
        let mut editor = editor();
        editor.set_mode(Mode::Draw);
        editor.set_draw_object(Some(DrawObject::Line));
        let before = editor.scene().len();

        editor.pointer_down(&PointerEvent::mouse(0.0, 0.0));
        editor.pointer_move(&PointerEvent::mouse(100.0, 0.0));
        assert_eq!(editor.preview_count(), 2);
        assert_eq!(editor.scene().len(), before);
        let label = editor.preview_label().expect("label during session");
        assert!(label.visible);
        assert!(label.text.ends_with(" m") || label.text.ends_with(" cm"));
    }

    #[test]
    fn test_zero_length_and_detached_up_commit_nothing() {
        let mut editor = editor();
        draw(&mut editor, DrawObject::Line, (0.0, 0.0), (0.0, 0.0));
        assert!(drawings(&editor).is_empty());

        editor.pointer_down(&PointerEvent::mouse(0.0, 0.0));
        editor.pointer_move(&PointerEvent::mouse(100.0, 0.0));
        editor.pointer_up(&PointerEvent::detached());
        assert!(drawings(&editor).is_empty());
        assert_eq!(editor.preview_count(), 0);
    }

    #[test]
    fn test_ruler_commit_labels_length() {
        let mut editor = editor();
        // Snaps onto x = 0 and the grid line at 8 cm.
        draw(&mut editor, DrawObject::Ruler, (0.0, 0.0), (3.0, 300.0));
        let shapes = drawings(&editor);
        assert_eq!(shapes.len(), 1);
        let Shape::Ruler(ruler) = shapes[0] else {
            panic!("expected a ruler");
        };
        assert_eq!(ruler.line.p1.x, 0.0);
        assert_eq!(ruler.label.text, "8,00 m");
        assert_eq!(ruler.style.stroke_color, Some(Palette::LIGHT.ruler));
        assert!(!ruler.flags.selectable);
    }

    #[test]
    fn test_circle_tool_respects_shift() {
        let mut editor = editor();
        editor.set_mode(Mode::Draw);
        editor.set_draw_object(Some(DrawObject::Circle));
        editor.pointer_down(&PointerEvent::mouse(0.0, 0.0));
        editor.pointer_up(&PointerEvent::mouse(300.0, 200.0).with_modifiers(Modifiers::shift()));
        editor.pointer_down(&PointerEvent::mouse(600.0, 600.0));
        editor.pointer_up(&PointerEvent::mouse(900.0, 800.0));

        let kinds: Vec<ShapeKind> = drawings(&editor).iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![ShapeKind::Wall(WallKind::Circle), ShapeKind::Wall(WallKind::Ellipse)]
        );
    }

    #[test]
    fn test_scale_change_keeps_existing_walls() {
        let mut editor = editor();
        draw(&mut editor, DrawObject::Line, (0.0, 0.0), (100.0, 0.0));
        let before = drawings(&editor)[0].style().stroke_width;

        editor.set_scale(Scale::new(50).expect("supported scale"));
        draw(&mut editor, DrawObject::Line, (0.0, 400.0), (300.0, 400.0));

        let shapes = drawings(&editor);
        assert!((shapes[0].style().stroke_width - before).abs() < f64::EPSILON);
        assert!((shapes[1].style().stroke_width - before * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_erase_hover_restores_color() {
        let mut editor = editor();
        draw(&mut editor, DrawObject::Line, (0.0, 0.0), (100.0, 0.0));
        editor.set_mode(Mode::Erase);
        let original = drawings(&editor)[0].style().stroke_color;

        editor.pointer_move(&PointerEvent::mouse(50.0, 1.0));
        assert_eq!(drawings(&editor)[0].style().stroke_color, Some(ShapeColor::RED));
        assert_eq!(editor.cursor(), Cursor::Crosshair);

        editor.pointer_move(&PointerEvent::mouse(50.0, 300.0));
        assert_eq!(drawings(&editor)[0].style().stroke_color, original);

        editor.pointer_move(&PointerEvent::mouse(50.0, 1.0));
        editor.pointer_leave();
        assert_eq!(drawings(&editor)[0].style().stroke_color, original);
    }

    #[test]
    fn test_erase_ruler_group() {
        let mut editor = editor();
        draw(&mut editor, DrawObject::Ruler, (0.0, 0.0), (3.0, 300.0));
        editor.set_mode(Mode::Erase);

        editor.pointer_move(&PointerEvent::mouse(0.0, 150.0));
        let Shape::Ruler(ruler) = drawings(&editor)[0] else {
            panic!("expected a ruler");
        };
        assert_eq!(ruler.style.stroke_color, Some(ShapeColor::RED));
        assert_eq!(ruler.label.fill_color, ShapeColor::RED);

        editor.pointer_down(&PointerEvent::mouse(0.0, 150.0));
        assert!(drawings(&editor).is_empty());
        assert_eq!(editor.hovered(), None);
    }

    #[test]
    fn test_erase_click_removes_wall() {
        let mut editor = editor();
        draw(&mut editor, DrawObject::Line, (0.0, 0.0), (100.0, 0.0));
        editor.set_mode(Mode::Erase);
        editor.pointer_down(&PointerEvent::mouse(500.0, 500.0));
        assert_eq!(drawings(&editor).len(), 1);
        editor.pointer_down(&PointerEvent::touch(60.0, 0.0));
        assert!(drawings(&editor).is_empty());
    }

    #[test]
    fn test_leaving_erase_mode_restores_color() {
        let mut editor = editor();
        draw(&mut editor, DrawObject::Line, (0.0, 0.0), (100.0, 0.0));
        editor.set_mode(Mode::Erase);
        editor.pointer_move(&PointerEvent::mouse(50.0, 0.0));
        editor.set_mode(Mode::Select);
        assert_eq!(
            drawings(&editor)[0].style().stroke_color,
            Some(Palette::LIGHT.wall)
        );
    }

    #[test]
    fn test_pan_with_mouse_and_touch() {
        let mut editor = editor();
        editor.set_mode(Mode::Drag);
        assert_eq!(editor.cursor(), Cursor::Grab);

        editor.pointer_down(&PointerEvent::mouse(10.0, 10.0));
        assert_eq!(editor.cursor(), Cursor::Grabbing);
        editor.pointer_move(&PointerEvent::mouse(30.0, 5.0));
        assert_eq!(editor.camera().offset, Vec2::new(20.0, -5.0));
        editor.pointer_up(&PointerEvent::mouse(30.0, 5.0));
        assert!(!editor.is_panning());

        editor.pointer_down(&PointerEvent::touch(0.0, 0.0));
        editor.pointer_move(&PointerEvent::detached());
        editor.pointer_move(&PointerEvent::touch(-20.0, 5.0));
        assert_eq!(editor.camera().offset, Vec2::ZERO);
    }

    #[test]
    fn test_mode_switch_mid_drag_stops_panning() {
        let mut editor = editor();
        editor.set_mode(Mode::Drag);
        editor.pointer_down(&PointerEvent::mouse(10.0, 10.0));
        editor.pointer_move(&PointerEvent::mouse(20.0, 20.0));
        let offset = editor.camera().offset;

        editor.set_mode(Mode::Draw);
        editor.set_draw_object(Some(DrawObject::Line));
        assert!(!editor.is_panning());
        editor.pointer_down(&PointerEvent::mouse(100.0, 100.0));
        assert!(editor.draw_session().is_some());
        editor.pointer_move(&PointerEvent::mouse(200.0, 150.0));
        assert_eq!(editor.camera().offset, offset);
        assert_eq!(
            editor.listeners().active_kinds(),
            vec![ListenerKind::Wheel, ListenerKind::Draw]
        );
    }

    #[test]
    fn test_mode_controls_selectable() {
        let mut editor = editor();
        draw(&mut editor, DrawObject::Line, (0.0, 0.0), (100.0, 0.0));
        assert!(!drawings(&editor)[0].flags().selectable);

        editor.set_mode(Mode::Select);
        assert!(drawings(&editor)[0].flags().selectable);
        assert!(grid_shape(&editor).is_some_and(|g| !g.flags().selectable));

        editor.set_mode(Mode::Erase);
        assert!(!drawings(&editor)[0].flags().selectable);
    }

    #[test]
    fn test_click_and_marquee_selection() {
        let mut editor = editor();
        draw(&mut editor, DrawObject::Line, (0.0, 0.0), (100.0, 0.0));
        draw(&mut editor, DrawObject::Line, (0.0, 400.0), (300.0, 400.0));
        editor.set_mode(Mode::Select);
        let ids: Vec<ShapeId> = drawings(&editor).iter().map(|s| s.id()).collect();

        editor.pointer_move(&PointerEvent::mouse(50.0, 0.0));
        assert_eq!(editor.cursor(), Cursor::Move);
        editor.pointer_down(&PointerEvent::mouse(50.0, 0.0));
        editor.pointer_up(&PointerEvent::mouse(50.0, 0.0));
        assert!(editor.selection().contains(&ids[0]));
        assert_eq!(editor.selection().len(), 1);

        editor.pointer_down(&PointerEvent::mouse(500.0, 500.0));
        assert!(editor.selection().is_empty());
        editor.pointer_move(&PointerEvent::mouse(-10.0, 350.0));
        editor.pointer_up(&PointerEvent::mouse(-10.0, 350.0));
        assert_eq!(editor.selection().len(), 1);
        assert!(editor.selection().contains(&ids[1]));

        editor.pointer_down(&PointerEvent::mouse(50.0, 0.0).with_modifiers(Modifiers::shift()));
        assert_eq!(editor.selection().len(), 2);
    }

    #[test]
    fn test_wheel_zoom_and_pan() {
        let mut editor = editor();
        let anchor = Point::new(400.0, 300.0);
        let world_before = editor.camera().screen_to_world(anchor);

        let event = WheelEvent::new(anchor.x, anchor.y, -100.0).with_modifiers(Modifiers::ctrl());
        assert_eq!(editor.wheel(&event), EventDisposition::CONSUMED);
        assert!((editor.zoom() - 0.999f64.powf(-100.0)).abs() < 1e-12);
        let world_after = editor.camera().screen_to_world(anchor);
        assert!((world_after - world_before).hypot() < 1e-9);

        let zoom = editor.zoom();
        editor.wheel(&WheelEvent::new(0.0, 0.0, 50.0));
        let expected_y = world_offset_y(zoom, anchor) - 50.0;
        assert!((editor.camera().offset.y - expected_y).abs() < 1e-9);
        let offset = editor.camera().offset;
        editor.wheel(&WheelEvent::new(0.0, 0.0, 30.0).with_modifiers(Modifiers::shift()));
        assert_eq!(editor.camera().offset, Vec2::new(offset.x - 30.0, offset.y));
    }

    /// Offset y after zooming from identity by `zoom` around `anchor`.
    fn world_offset_y(zoom: f64, anchor: Point) -> f64 {
        anchor.y - anchor.y * zoom
    }

    #[test]
    fn test_wheel_zoom_clamped() {
        let mut editor = editor();
        let event = WheelEvent::new(0.0, 0.0, -100_000.0).with_modifiers(Modifiers::ctrl());
        editor.wheel(&event);
        assert!((editor.zoom() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_controls() {
        let mut editor = editor();
        editor.zoom_in();
        assert!((editor.zoom() - 1.1).abs() < 1e-12);
        editor.reset_zoom();
        assert!((editor.zoom() - 1.0).abs() < f64::EPSILON);
        for _ in 0..20 {
            editor.zoom_out();
        }
        assert!((editor.zoom() - 0.1).abs() < 1e-12);
        for _ in 0..30 {
            editor.zoom_in();
        }
        assert!((editor.zoom() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_keyboard_requires_focus() {
        let mut editor = editor();
        assert!(!editor.key_pressed("2"));
        assert_eq!(editor.mode(), Mode::Select);

        editor.set_focus(true);
        assert!(editor.key_pressed("2"));
        assert_eq!(editor.mode(), Mode::Draw);
        assert_eq!(editor.draw_object(), Some(DrawObject::Line));
        assert!(editor.key_pressed("0"));
        assert_eq!(editor.mode(), Mode::Erase);
        assert!(!editor.key_pressed("9"));
    }

    #[test]
    fn test_unmounted_editor_ignores_input() {
        init_logger();
        let mut editor = Editor::default();
        assert_eq!(editor.wheel(&WheelEvent::new(0.0, 0.0, 10.0)), EventDisposition::IGNORED);
        editor.set_mode(Mode::Drag);
        editor.pointer_down(&PointerEvent::mouse(0.0, 0.0));
        assert!(!editor.is_panning());
        assert_eq!(editor.tick(), FrameReport::default());

        editor.mount(Size::new(1920.0, 1080.0));
        editor.unmount();
        assert!(editor.listeners().is_empty());
        assert!(!editor.is_mounted());
    }

    #[test]
    fn test_grid_visibility_survives_regeneration() {
        let mut editor = editor();
        editor.set_grid_visible(false);
        editor.wheel(&WheelEvent::new(0.0, 0.0, 40.0));
        assert!(editor.scene().grid().is_some_and(|g| !g.is_visible()));
        assert_eq!(editor.scene().shapes_ordered().filter(|s| s.is_grid()).count(), 1);
        assert!(editor.scene().shapes_ordered().next().is_some_and(Shape::is_grid));
    }

    #[test]
    fn test_palette_restyles_scene() {
        let mut editor = editor();
        draw(&mut editor, DrawObject::Line, (0.0, 0.0), (100.0, 0.0));
        editor.set_theme(ThemeMode::Dark);

        let Shape::Wall(wall) = drawings(&editor)[0] else {
            panic!("expected a wall");
        };
        assert_eq!(wall.style.stroke_color, Some(Palette::DARK.wall));
        assert_eq!(wall.meta.color, Palette::DARK.wall);
        assert_eq!(
            grid_shape(&editor).and_then(|g| g.style().stroke_color),
            Some(Palette::DARK.grid)
        );
    }

    #[test]
    fn test_events_reach_subscribers() {
        let mut editor = editor();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = editor.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        draw(&mut editor, DrawObject::Line, (0.0, 0.0), (100.0, 0.0));
        assert!(editor.unsubscribe(id));
        editor.set_mode(Mode::Erase);

        let seen = seen.borrow();
        assert_eq!(seen[0], EditorEvent::ModeChanged(Mode::Draw));
        assert_eq!(seen[1], EditorEvent::DrawObjectChanged(Some(DrawObject::Line)));
        assert_eq!(seen[2], EditorEvent::SceneChanged { drawings: 1 });
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_tick_projects_walls_in_3d() {
        let mut editor = editor();
        draw(&mut editor, DrawObject::Line, (0.0, 0.0), (100.0, 0.0));
        draw(&mut editor, DrawObject::Rectangle, (0.0, 400.0), (300.0, 600.0));

        let flat = editor.tick();
        assert!(flat.rebuilt);
        assert_eq!(flat.projected, 0);
        assert!(!flat.needs_redraw);

        editor.set_view_mode(ViewMode::ThreeD);
        assert!(!editor.surface_presentation(Surface::Plan).visible);
        let frame = editor.tick();
        assert!(frame.rebuilt);
        assert_eq!(frame.projected, 1);
        assert_eq!(frame.skipped, vec![WallKind::Rectangle]);
        assert!(frame.needs_redraw);

        let volume = &editor.projector().volumes()[0];
        let mpp = editor.units().meters_per_pixel();
        assert!((volume.size.x - 100.0 * mpp).abs() < 1e-12);
        assert_eq!(volume.rotation.y, 0.0);

        let idle = editor.tick();
        assert!(!idle.rebuilt);
        assert!(idle.needs_redraw);
    }

    #[test]
    fn test_pointer_ignored_in_3d() {
        let mut editor = editor();
        editor.set_mode(Mode::Drag);
        editor.set_view_mode(ViewMode::ThreeD);
        editor.pointer_down(&PointerEvent::mouse(0.0, 0.0));
        assert!(!editor.is_panning());
    }

    #[test]
    fn test_wheel_ignored_in_3d() {
        let mut editor = editor();
        editor.set_view_mode(ViewMode::ThreeD);
        let offset = editor.camera().offset;

        assert_eq!(editor.wheel(&WheelEvent::new(0.0, 0.0, 120.0)), EventDisposition::IGNORED);
        let zoom = WheelEvent::new(400.0, 300.0, -300.0).with_modifiers(Modifiers::ctrl());
        assert_eq!(editor.wheel(&zoom), EventDisposition::IGNORED);
        assert_eq!(editor.camera().offset, offset);
        assert!((editor.zoom() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_finite_wheel_delta_is_noop() {
        let mut editor = editor();
        let offset = editor.camera().offset;

        let zoom = WheelEvent::new(400.0, 300.0, f64::NAN).with_modifiers(Modifiers::ctrl());
        assert_eq!(editor.wheel(&zoom), EventDisposition::CONSUMED);
        assert!((editor.zoom() - 1.0).abs() < f64::EPSILON);

        assert_eq!(
            editor.wheel(&WheelEvent::new(0.0, 0.0, f64::INFINITY)),
            EventDisposition::CONSUMED
        );
        assert_eq!(editor.camera().offset, offset);
    }

    #[test]
    fn test_zoom_controls_skipped_before_mount() {
        init_logger();
        let mut editor = Editor::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        editor.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        editor.zoom_in();
        editor.zoom_out();
        editor.reset_zoom();
        assert!((editor.zoom() - 1.0).abs() < f64::EPSILON);
        assert!(!seen.borrow().iter().any(|e| matches!(e, EditorEvent::ZoomChanged(_))));
    }

    #[test]
    fn test_move_selected_wall_reprojects() {
        let mut editor = editor();
        draw(&mut editor, DrawObject::Line, (0.0, 0.0), (100.0, 0.0));
        editor.set_view_mode(ViewMode::ThreeD);
        assert!(editor.tick().rebuilt);
        let before = editor.projector().volumes()[0].position;

        editor.set_view_mode(ViewMode::TwoD);
        editor.set_mode(Mode::Select);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        editor.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        editor.pointer_down(&PointerEvent::mouse(50.0, 0.0));
        assert!(editor.is_moving());
        editor.pointer_move(&PointerEvent::mouse(50.0, 100.0));
        editor.pointer_up(&PointerEvent::mouse(50.0, 100.0));
        assert!(!editor.is_moving());
        assert_eq!(editor.selection().len(), 1);

        let Shape::Wall(wall) = drawings(&editor)[0] else {
            panic!("expected a wall");
        };
        assert_eq!(
            wall.geometry,
            WallGeometry::Line {
                start: Point::new(0.0, 100.0),
                end: Point::new(100.0, 100.0),
            }
        );
        assert!(seen.borrow().contains(&EditorEvent::SceneChanged { drawings: 1 }));

        editor.set_view_mode(ViewMode::ThreeD);
        assert!(editor.tick().rebuilt);
        let after = editor.projector().volumes()[0].position;
        let mpp = editor.units().meters_per_pixel();
        assert!((after.z - before.z - 100.0 * mpp).abs() < 1e-9);
        assert!((after.x - before.x).abs() < 1e-12);
    }
}
