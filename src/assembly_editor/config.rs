use crate::assembly_editor::layout::CameraCount;
use crate::assembly_editor::units::UnitConverter;
use crate::assembly_editor::{CONFIG_PATH, DEFAULT_EXPORT_PATH, DEFAULT_PIXELS_PER_MM};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("pixels_per_mm must be a positive finite number, got {0}")]
    InvalidScale(f64),
    #[error("slider range {name} is empty ({min}..={max})")]
    EmptyRange { name: &'static str, min: f64, max: f64 },
    #[error("slider range {name} needs a positive finite step, got {step}")]
    InvalidStep { name: &'static str, step: f64 },
}

/// Inclusive slider bounds, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite() && self.min <= self.max) {
            return Err(ConfigError::EmptyRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ConfigError::InvalidStep { name, step: self.step });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub pixels_per_mm: f64,
    pub initial_camera_count: CameraCount,
    pub initial_spacing_x_mm: f64,
    pub initial_spacing_y_mm: f64,
    pub spacing_slider: SliderRange,
    pub position_slider: SliderRange,
    pub export_path: String,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pixels_per_mm: DEFAULT_PIXELS_PER_MM,
            initial_camera_count: CameraCount::Two,
            initial_spacing_x_mm: 20.0,
            initial_spacing_y_mm: 20.0,
            spacing_slider: SliderRange {
                min: 25.0,
                max: 200.0,
                step: 5.0,
            },
            position_slider: SliderRange {
                min: -250.0,
                max: 250.0,
                step: 0.5,
            },
            export_path: DEFAULT_EXPORT_PATH.to_string(),
            window_width: 1400,
            window_height: 900,
        }
    }
}

impl EditorConfig {
    pub fn units(&self) -> Result<UnitConverter, ConfigError> {
        UnitConverter::new(self.pixels_per_mm).ok_or(ConfigError::InvalidScale(self.pixels_per_mm))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.units()?;
        self.spacing_slider.validate("spacing_slider")?;
        self.position_slider.validate("position_slider")
    }
}

pub fn parse_config(text: &str, path: &Path) -> Result<EditorConfig, ConfigError> {
    let config = ron::de::from_str::<EditorConfig>(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// A missing file is not an error; the built-in defaults apply.
pub fn load_config(path: &Path) -> Result<EditorConfig, ConfigError> {
    if !path.exists() {
        return Ok(EditorConfig::default());
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text, path)
}

/// Runs before the log subscriber exists, so the error is handed back for
/// reporting once the app is up.
pub fn load_startup_config() -> (EditorConfig, Option<ConfigError>) {
    match load_config(Path::new(CONFIG_PATH)) {
        Ok(config) => (config, None),
        Err(err) => (EditorConfig::default(), Some(err)),
    }
}
