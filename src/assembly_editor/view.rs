use crate::assembly_editor::model::CameraModel;
use crate::assembly_editor::state::{Camera as AssemblyCamera, EditorState};
use crate::assembly_editor::units::UnitConverter;
use crate::assembly_editor::{GRID_EXTENT_MM, GRID_MAJOR_EVERY, GRID_STEP_MM};
use bevy::camera::ClearColorConfig;
use bevy::camera::visibility::RenderLayers;
use bevy::math::{Isometry2d, Rot2};
use bevy::prelude::*;
use bevy_egui::PrimaryEguiContext;

#[derive(Component)]
pub struct LayoutCamera;

/// Pixel space has `y` pointing down; the 2D world has it pointing up.
pub fn pixel_to_world(x: f64, y: f64) -> Vec2 {
    Vec2::new(x as f32, -y as f32)
}

pub fn world_to_pixel(world: Vec2) -> (f64, f64) {
    (world.x as f64, -world.y as f64)
}

pub fn footprint_px(model: &CameraModel, units: UnitConverter) -> (f64, f64) {
    (units.to_pixels(model.width_mm), units.to_pixels(model.height_mm))
}

/// Whether pixel-space point `(px, py)` falls inside the camera's rotated footprint.
pub fn contains_point(camera: &AssemblyCamera, units: UnitConverter, px: f64, py: f64) -> bool {
    let (width, height) = footprint_px(camera.model, units);
    let dx = px - camera.x;
    let dy = py - camera.y;
    // Undo the clockwise on-screen rotation.
    let (sin, cos) = camera.rotation.to_radians().sin_cos();
    let local_x = dx * cos + dy * sin;
    let local_y = -dx * sin + dy * cos;
    local_x.abs() <= width / 2.0 && local_y.abs() <= height / 2.0
}

/// Later cameras draw on top, so they win overlapping clicks.
pub fn hit_test(cameras: &[AssemblyCamera], units: UnitConverter, px: f64, py: f64) -> Option<u32> {
    cameras
        .iter()
        .rev()
        .find(|camera| contains_point(camera, units, px, py))
        .map(|camera| camera.id)
}

/// Pixel-space bounding box `(min, max)` around every footprint, ignoring rotation.
pub fn layout_bounds(cameras: &[AssemblyCamera], units: UnitConverter) -> Option<((f64, f64), (f64, f64))> {
    cameras.iter().fold(None, |bounds, camera| {
        let (width, height) = footprint_px(camera.model, units);
        let radius = width.hypot(height) / 2.0;
        let lo = (camera.x - radius, camera.y - radius);
        let hi = (camera.x + radius, camera.y + radius);
        Some(match bounds {
            None => (lo, hi),
            Some((min, max)) => (
                (f64::min(min.0, lo.0), f64::min(min.1, lo.1)),
                (f64::max(max.0, hi.0), f64::max(max.1, hi.1)),
            ),
        })
    })
}

/// Sensor marks as fractions of the half footprint, pixel-space orientation.
fn sensor_marks(model: &CameraModel) -> &'static [(f64, f64)] {
    match model.name {
        "MD15342X1" => &[(0.0, -0.92), (-0.92, 0.12), (0.92, 0.6)],
        "WLF01" => &[(-0.92, -0.55), (0.55, 0.92)],
        _ => &[(0.0, -0.9)],
    }
}

fn rotate_local(x: f64, y: f64, rotation_deg: f64) -> (f64, f64) {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}

pub fn setup_layout_scene(mut commands: Commands) {
    commands.spawn((Camera2d, LayoutCamera));
    commands.spawn((
        Camera2d,
        Camera {
            order: 1,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        RenderLayers::layer(31),
        PrimaryEguiContext,
    ));
}

pub fn draw_grid_system(mut gizmos: Gizmos, state: Res<EditorState>) {
    if !state.show_grid {
        return;
    }

    let units = state.store.units();
    let steps = (GRID_EXTENT_MM / GRID_STEP_MM) as i32;
    let extent = units.to_pixels(GRID_EXTENT_MM) as f32;

    for i in -steps..=steps {
        let offset = units.to_pixels(i as f64 * GRID_STEP_MM) as f32;
        let color = if i % GRID_MAJOR_EVERY == 0 {
            Color::srgba(0.45, 0.45, 0.45, 0.45)
        } else {
            Color::srgba(0.25, 0.25, 0.25, 0.30)
        };

        gizmos.line_2d(Vec2::new(-extent, offset), Vec2::new(extent, offset), color);
        gizmos.line_2d(Vec2::new(offset, -extent), Vec2::new(offset, extent), color);
    }

    gizmos.line_2d(
        Vec2::new(-extent, 0.0),
        Vec2::new(extent, 0.0),
        Color::srgb(0.85, 0.25, 0.25),
    );
    gizmos.line_2d(
        Vec2::new(0.0, -extent),
        Vec2::new(0.0, extent),
        Color::srgb(0.25, 0.85, 0.25),
    );
}

pub fn draw_cameras_system(mut gizmos: Gizmos, state: Res<EditorState>) {
    let units = state.store.units();
    let selected = state.store.selected_id();

    for camera in state.store.cameras() {
        let (width, height) = footprint_px(camera.model, units);
        let center = pixel_to_world(camera.x, camera.y);
        let isometry = Isometry2d::new(center, Rot2::degrees(-camera.rotation as f32));
        let size = Vec2::new(width as f32, height as f32);
        let is_selected = selected == Some(camera.id);

        let body = if is_selected {
            Color::srgb(0.2, 0.85, 0.95)
        } else {
            Color::srgb(0.78, 0.82, 0.8)
        };
        gizmos.rect_2d(isometry, size, body);
        if is_selected {
            gizmos.rect_2d(isometry, size * 1.12, Color::srgba(0.2, 0.85, 0.95, 0.5));
        }

        let mark_radius = (width.min(height) * 0.06).max(1.0) as f32;
        for &(fx, fy) in sensor_marks(camera.model) {
            let (ox, oy) = rotate_local(fx * width / 2.0, fy * height / 2.0, camera.rotation);
            let mark = pixel_to_world(camera.x + ox, camera.y + oy);
            gizmos.circle_2d(Isometry2d::from_translation(mark), mark_radius, Color::srgb(0.95, 0.3, 0.25));
        }

        // Facing indicator: local "up" in pixel space.
        let (tx, ty) = rotate_local(0.0, -height / 2.0, camera.rotation);
        gizmos.line_2d(center, pixel_to_world(camera.x + tx, camera.y + ty), body);
    }
}

pub fn hover_label(camera: &AssemblyCamera) -> String {
    format!("ID: {} ({})", camera.id, camera.model.name)
}

pub fn grid_info_text(units: UnitConverter) -> String {
    format!(
        "Grid: {} mm per cell, major line every {} mm, range ±{} mm ({} px/mm).",
        GRID_STEP_MM,
        GRID_STEP_MM * GRID_MAJOR_EVERY as f64,
        GRID_EXTENT_MM,
        units.pixels_per_mm()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly_editor::model::{CAMERA_MODELS, default_model};
    use approx::assert_relative_eq;

    fn camera(id: u32, x: f64, y: f64, rotation: f64, model: &'static CameraModel) -> AssemblyCamera {
        AssemblyCamera {
            id,
            x,
            y,
            rotation,
            model,
        }
    }

    #[test]
    fn world_and_pixel_space_flip_y() {
        let world = pixel_to_world(12.0, 30.0);
        assert_eq!(world, Vec2::new(12.0, -30.0));
        let (x, y) = world_to_pixel(world);
        assert_relative_eq!(x, 12.0);
        assert_relative_eq!(y, 30.0);
    }

    #[test]
    fn hit_test_respects_rotation() {
        let units = UnitConverter::default();
        // MD15342X1 is 148.1 x 122.1 px at 10 px/mm.
        let upright = camera(1, 0.0, 0.0, 0.0, default_model());
        assert!(contains_point(&upright, units, 70.0, 0.0));
        assert!(!contains_point(&upright, units, 0.0, 70.0));

        let turned = camera(1, 0.0, 0.0, 90.0, default_model());
        assert!(!contains_point(&turned, units, 70.0, 0.0));
        assert!(contains_point(&turned, units, 0.0, 70.0));
    }

    #[test]
    fn topmost_camera_wins() {
        let units = UnitConverter::default();
        let cameras = vec![
            camera(1, 0.0, 0.0, 0.0, default_model()),
            camera(2, 20.0, 0.0, 0.0, &CAMERA_MODELS[1]),
        ];
        assert_eq!(hit_test(&cameras, units, 10.0, 0.0), Some(2));
        assert_eq!(hit_test(&cameras, units, -60.0, 0.0), Some(1));
        assert_eq!(hit_test(&cameras, units, 500.0, 500.0), None);
    }

    #[test]
    fn bounds_cover_all_footprints() {
        let units = UnitConverter::default();
        assert!(layout_bounds(&[], units).is_none());

        let cameras = vec![
            camera(1, -100.0, -50.0, 0.0, &CAMERA_MODELS[1]),
            camera(2, 100.0, 50.0, 0.0, &CAMERA_MODELS[1]),
        ];
        let ((min_x, min_y), (max_x, max_y)) = layout_bounds(&cameras, units).unwrap();
        let radius = 109.6f64.hypot(109.6) / 2.0;
        assert_relative_eq!(min_x, -100.0 - radius, epsilon = 1e-9);
        assert_relative_eq!(min_y, -50.0 - radius, epsilon = 1e-9);
        assert_relative_eq!(max_x, 100.0 + radius, epsilon = 1e-9);
        assert_relative_eq!(max_y, 50.0 + radius, epsilon = 1e-9);
    }

    #[test]
    fn hover_label_names_id_and_model() {
        assert_eq!(hover_label(&camera(3, 0.0, 0.0, 0.0, &CAMERA_MODELS[1])), "ID: 3 (WLF01)");
    }

    #[test]
    fn sensor_marks_stay_inside_footprint() {
        for model in &CAMERA_MODELS {
            for &(fx, fy) in sensor_marks(model) {
                assert!(fx.abs() <= 1.0 && fy.abs() <= 1.0, "{}", model.name);
            }
        }
    }
}
