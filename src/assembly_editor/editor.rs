use crate::assembly_editor::CONFIG_PATH;
use crate::assembly_editor::camera::{
    UiInteractionState, ViewCameraState, hover_camera_system, select_camera_on_click,
    update_camera_viewport, view_camera_system,
};
use crate::assembly_editor::config::load_startup_config;
use crate::assembly_editor::state::EditorState;
use crate::assembly_editor::ui::{keyboard_shortcuts_system, ui_system};
use crate::assembly_editor::view::{draw_cameras_system, draw_grid_system, setup_layout_scene};
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};
use tracing::{info, warn};

#[derive(Resource, Default)]
struct StartupReport {
    config_error: Option<String>,
}

pub fn run() {
    let (config, config_error) = load_startup_config();
    let resolution = (config.window_width, config.window_height);

    let mut state = EditorState::new(config);
    if let Some(err) = &config_error {
        state.status = format!("Using built-in config ({err})");
    }

    App::new()
        .insert_resource(state)
        .insert_resource(StartupReport {
            config_error: config_error.map(|err| err.to_string()),
        })
        .insert_resource(ViewCameraState::default())
        .insert_resource(UiInteractionState::default())
        .insert_resource(ClearColor(Color::srgb(0.04, 0.04, 0.05)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Assembly Configurator".to_string(),
                resolution: resolution.into(),
                present_mode: PresentMode::AutoVsync,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_systems(Startup, (report_startup, setup_layout_scene))
        .add_systems(Update, update_camera_viewport)
        .add_systems(Update, view_camera_system)
        .add_systems(Update, select_camera_on_click)
        .add_systems(Update, hover_camera_system)
        .add_systems(Update, keyboard_shortcuts_system)
        .add_systems(Update, draw_grid_system)
        .add_systems(Update, draw_cameras_system)
        .add_systems(EguiPrimaryContextPass, ui_system)
        .run();
}

fn report_startup(report: Res<StartupReport>, state: Res<EditorState>) {
    match &report.config_error {
        Some(err) => warn!("Falling back to built-in editor config: {err}"),
        None => info!(path = CONFIG_PATH, "editor config loaded"),
    }
    info!(
        pixels_per_mm = state.store.units().pixels_per_mm(),
        cameras = state.store.cameras().len(),
        spacing_x_mm = state.spacing_x_mm,
        spacing_y_mm = state.spacing_y_mm,
        "assembly configurator ready"
    );
}
