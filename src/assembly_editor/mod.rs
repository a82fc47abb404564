pub mod camera;
pub mod config;
pub mod editor;
pub mod export;
pub mod layout;
pub mod model;
pub mod state;
pub mod ui;
pub mod units;
pub mod view;

pub const CONFIG_PATH: &str = "config/assembly_configurator.ron";
pub const DEFAULT_EXPORT_PATH: &str = "exports/camera_config.json";
pub const DEFAULT_PIXELS_PER_MM: f64 = 10.0;
pub const COPY_FEEDBACK_SECS: f64 = 2.0;
pub const GRID_STEP_MM: f64 = 5.0;
pub const GRID_MAJOR_EVERY: i32 = 4;
pub const GRID_EXTENT_MM: f64 = 300.0;
