use crate::assembly_editor::COPY_FEEDBACK_SECS;
use crate::assembly_editor::state::Camera;
use crate::assembly_editor::units::UnitConverter;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to create export dir {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One camera as the simulation tool consumes it: millimeters, two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub id: u32,
    pub model: String,
    pub component_file: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

/// Rounds half away from zero. Negative zero collapses to zero.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

pub fn to_export_records(cameras: &[Camera], units: UnitConverter) -> Vec<ExportRecord> {
    cameras
        .iter()
        .map(|camera| ExportRecord {
            id: camera.id,
            model: camera.model.name.to_string(),
            component_file: camera.model.component_file.to_string(),
            x: round2(units.to_physical(camera.x)),
            y: round2(units.to_physical(camera.y)),
            rotation: round2(camera.rotation),
        })
        .collect()
}

/// Pretty JSON array, two-space indent.
pub fn to_json(records: &[ExportRecord]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn save_export(records: &[ExportRecord], path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut text = to_json(records)?;
    text.push('\n');
    fs::write(path, text).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), cameras = records.len(), "export written");
    Ok(())
}

/// Transient "Copied!" acknowledgement that reverts on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CopyFeedback {
    copied_at: Option<f64>,
}

impl CopyFeedback {
    pub fn mark_copied(&mut self, now_secs: f64) {
        self.copied_at = Some(now_secs);
    }

    pub fn tick(&mut self, now_secs: f64) {
        if self
            .copied_at
            .is_some_and(|at| now_secs - at >= COPY_FEEDBACK_SECS)
        {
            self.copied_at = None;
        }
    }

    pub fn is_copied(&self) -> bool {
        self.copied_at.is_some()
    }

    pub fn label(&self) -> &'static str {
        if self.is_copied() { "Copied!" } else { "Copy JSON" }
    }
}
