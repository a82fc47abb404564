use crate::assembly_editor::state::EditorState;
use crate::assembly_editor::view::{LayoutCamera, hit_test, layout_bounds, pixel_to_world, world_to_pixel};
use bevy::camera::Viewport;
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, Window};
use tracing::debug;

const FIT_MARGIN: f32 = 1.25;

#[derive(Resource)]
pub struct ViewCameraState {
    pub center: Vec2,
    /// Orthographic scale: world units per logical pixel.
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for ViewCameraState {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.05,
            max_zoom: 20.0,
        }
    }
}

#[derive(Resource, Default)]
pub struct UiInteractionState {
    pub wants_pointer_input: bool,
    pub wants_keyboard_input: bool,
    pub side_panel_width: f32,
}

/// Center and zoom that frame `(min, max)` pixel-space bounds in a viewport of
/// `viewport_size` logical pixels.
pub fn fit_view(
    bounds: Option<((f64, f64), (f64, f64))>,
    viewport_size: Vec2,
    min_zoom: f32,
    max_zoom: f32,
) -> (Vec2, f32) {
    let Some(((min_x, min_y), (max_x, max_y))) = bounds else {
        return (Vec2::ZERO, 1.0);
    };
    if viewport_size.x <= 0.0 || viewport_size.y <= 0.0 {
        return (Vec2::ZERO, 1.0);
    }

    let center = pixel_to_world((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
    let extent = Vec2::new((max_x - min_x) as f32, (max_y - min_y) as f32);
    let zoom = (extent.x / viewport_size.x).max(extent.y / viewport_size.y) * FIT_MARGIN;
    (center, zoom.clamp(min_zoom, max_zoom))
}

pub fn update_camera_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    mut camera_query: Query<&mut Camera, With<LayoutCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let physical_width = window.physical_width();
    let physical_height = window.physical_height().max(1);
    if physical_width == 0 {
        return;
    }

    // Controls live in a right-hand panel.
    let panel_px = (ui_state.side_panel_width.max(0.0) * window.scale_factor() as f32) as u32;
    let viewport_width = physical_width.saturating_sub(panel_px).max(1);

    let viewport = Some(Viewport {
        physical_position: UVec2::ZERO,
        physical_size: UVec2::new(viewport_width, physical_height),
        depth: 0.0..1.0,
    });

    for mut camera in &mut camera_query {
        camera.viewport = viewport.clone();
    }
}

pub fn view_camera_system(
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    mut view: ResMut<ViewCameraState>,
    mut state: ResMut<EditorState>,
    mut camera_query: Query<(&Camera, &mut Transform, &mut Projection), With<LayoutCamera>>,
) {
    if state.request_fit_view {
        let viewport_size = camera_query
            .iter()
            .next()
            .and_then(|(camera, _, _)| camera.logical_viewport_size());
        if let Some(viewport_size) = viewport_size {
            let bounds = layout_bounds(state.store.cameras(), state.store.units());
            let (center, zoom) = fit_view(bounds, viewport_size, view.min_zoom, view.max_zoom);
            view.center = center;
            view.zoom = zoom;
            state.request_fit_view = false;
            debug!(?center, zoom, "view fitted to layout");
        }
    }

    let pointer_in_window = windows
        .single()
        .ok()
        .and_then(|w| w.cursor_position())
        .is_some();

    if pointer_in_window && !ui_state.wants_pointer_input {
        let delta = mouse_motion.delta;
        if mouse_buttons.pressed(MouseButton::Middle) && delta.length_squared() > 0.0 {
            let zoom = view.zoom;
            view.center += Vec2::new(-delta.x, delta.y) * zoom;
        }

        let scroll = mouse_scroll.delta.y;
        if scroll.abs() > f32::EPSILON {
            let factor = (1.0 - scroll * 0.10).clamp(0.2, 5.0);
            view.zoom = (view.zoom * factor).clamp(view.min_zoom, view.max_zoom);
        }
    }

    for (_, mut transform, mut projection) in &mut camera_query {
        transform.translation = view.center.extend(transform.translation.z);
        if let Projection::Orthographic(ortho) = projection.as_mut() {
            ortho.scale = view.zoom;
        }
    }
}

/// Cursor position in layout pixel space, if it is over the layout view.
fn cursor_pixel(
    windows: &Query<&Window, With<PrimaryWindow>>,
    camera_query: &Query<(&Camera, &GlobalTransform), With<LayoutCamera>>,
) -> Option<(f64, f64)> {
    let cursor = windows.single().ok()?.cursor_position()?;
    let (camera, camera_transform) = camera_query.single().ok()?;
    let world = camera.viewport_to_world_2d(camera_transform, cursor).ok()?;
    Some(world_to_pixel(world))
}

/// Layout clicks are ignored while egui owns the pointer or the export window is open.
pub fn layout_accepts_pointer(ui_state: &UiInteractionState, state: &EditorState) -> bool {
    !ui_state.wants_pointer_input && !state.show_export
}

pub fn select_camera_on_click(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    camera_query: Query<(&Camera, &GlobalTransform), With<LayoutCamera>>,
    mut state: ResMut<EditorState>,
) {
    if !mouse_buttons.just_pressed(MouseButton::Left) || !layout_accepts_pointer(&ui_state, &state) {
        return;
    }
    let Some((px, py)) = cursor_pixel(&windows, &camera_query) else {
        return;
    };

    let hit = hit_test(state.store.cameras(), state.store.units(), px, py);
    if let Some(id) = hit {
        if state.store.select(id) {
            state.status = format!("Camera {id} selected");
        }
    }
}

pub fn hover_camera_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    camera_query: Query<(&Camera, &GlobalTransform), With<LayoutCamera>>,
    mut state: ResMut<EditorState>,
) {
    let hovered = if layout_accepts_pointer(&ui_state, &state) {
        cursor_pixel(&windows, &camera_query)
            .and_then(|(px, py)| hit_test(state.store.cameras(), state.store.units(), px, py))
    } else {
        None
    };
    if state.hovered != hovered {
        state.hovered = hovered;
    }
}
