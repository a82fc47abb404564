use crate::assembly_editor::config::EditorConfig;
use crate::assembly_editor::export::{
    CopyFeedback, ExportError, ExportRecord, save_export, to_export_records, to_json,
};
use crate::assembly_editor::layout::{CameraCount, compute_positions};
use crate::assembly_editor::model::{CameraModel, default_model, find_model};
use crate::assembly_editor::units::UnitConverter;
use bevy::prelude::Resource;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub id: u32,
    /// Pixel space, center-relative.
    pub x: f64,
    pub y: f64,
    /// Degrees in `[0, 360)`.
    pub rotation: f64,
    pub model: &'static CameraModel,
}

/// Partial update for one camera. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rotation: Option<f64>,
    pub model_name: Option<String>,
}

impl CameraUpdate {
    pub fn x(x: f64) -> Self {
        Self {
            x: Some(x),
            ..Self::default()
        }
    }

    pub fn y(y: f64) -> Self {
        Self {
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn rotation(rotation: f64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    pub fn model(name: impl Into<String>) -> Self {
        Self {
            model_name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

pub const ROTATION_STEP_DEG: f64 = 90.0;

pub fn normalize_rotation(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

pub fn rotated(rotation: f64, direction: RotationDirection) -> f64 {
    match direction {
        RotationDirection::Clockwise => normalize_rotation(rotation + ROTATION_STEP_DEG),
        RotationDirection::CounterClockwise => normalize_rotation(rotation - ROTATION_STEP_DEG),
    }
}

/// Ordered camera collection plus the single selection.
#[derive(Debug, Clone)]
pub struct CameraStore {
    units: UnitConverter,
    cameras: Vec<Camera>,
    selected: Option<u32>,
}

impl CameraStore {
    pub fn new(units: UnitConverter) -> Self {
        Self {
            units,
            cameras: Vec::new(),
            selected: None,
        }
    }

    pub fn units(&self) -> UnitConverter {
        self.units
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn camera(&self, id: u32) -> Option<&Camera> {
        self.cameras.iter().find(|camera| camera.id == id)
    }

    pub fn selected_id(&self) -> Option<u32> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Camera> {
        self.selected.and_then(|id| self.camera(id))
    }

    /// Rebuilds the collection for a new count or spacing. Rotation and model
    /// carry over for every id that exists before and after.
    pub fn reconcile(&mut self, count: CameraCount, spacing_x_mm: f64, spacing_y_mm: f64) -> &[Camera] {
        let positions = compute_positions(
            count,
            self.units.to_pixels(spacing_x_mm),
            self.units.to_pixels(spacing_y_mm),
        );

        let previous: HashMap<u32, &Camera> = self.cameras.iter().map(|c| (c.id, c)).collect();
        let cameras: Vec<Camera> = positions
            .iter()
            .enumerate()
            .map(|(idx, pos)| {
                let id = idx as u32 + 1;
                let existing = previous.get(&id);
                Camera {
                    id,
                    x: pos.x,
                    y: pos.y,
                    rotation: existing.map_or(0.0, |c| c.rotation),
                    model: existing.map_or_else(default_model, |c| c.model),
                }
            })
            .collect();
        self.cameras = cameras;

        if self.selected.is_none_or(|id| self.camera(id).is_none()) {
            self.selected = self.cameras.first().map(|camera| camera.id);
        }

        debug!(
            count = count.get(),
            spacing_x_mm,
            spacing_y_mm,
            selected = ?self.selected,
            "cameras reconciled"
        );
        &self.cameras
    }

    /// Returns whether a camera with `id` existed.
    pub fn update(&mut self, id: u32, update: CameraUpdate) -> bool {
        let Some(camera) = self.cameras.iter_mut().find(|camera| camera.id == id) else {
            trace!(id, "update for unknown camera ignored");
            return false;
        };

        if let Some(x) = update.x {
            camera.x = x;
        }
        if let Some(y) = update.y {
            camera.y = y;
        }
        if let Some(rotation) = update.rotation {
            camera.rotation = normalize_rotation(rotation);
        }
        if let Some(name) = update.model_name.as_deref() {
            match find_model(name) {
                Some(model) => camera.model = model,
                None => trace!(id, model = name, "unknown camera model ignored"),
            }
        }
        true
    }

    /// Selecting an id that is not present leaves the selection unchanged.
    pub fn select(&mut self, id: u32) -> bool {
        if self.camera(id).is_some() {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn rotate(&mut self, id: u32, direction: RotationDirection) -> bool {
        let Some(current) = self.camera(id).map(|camera| camera.rotation) else {
            return false;
        };
        self.update(id, CameraUpdate::rotation(rotated(current, direction)))
    }

    pub fn rotate_selected(&mut self, direction: RotationDirection) -> bool {
        match self.selected {
            Some(id) => self.rotate(id, direction),
            None => false,
        }
    }
}

#[derive(Resource)]
pub struct EditorState {
    pub config: EditorConfig,
    pub store: CameraStore,
    pub camera_count: CameraCount,
    pub spacing_x_mm: f64,
    pub spacing_y_mm: f64,
    pub show_grid: bool,
    pub request_fit_view: bool,
    pub show_export: bool,
    /// Records behind `export_text`; Save JSON writes these, not the live cameras.
    export_records: Vec<ExportRecord>,
    pub export_text: String,
    pub hovered: Option<u32>,
    pub export_path: String,
    pub copy_feedback: CopyFeedback,
    pub status: String,
}

impl EditorState {
    pub fn new(config: EditorConfig) -> Self {
        let units = config.units().unwrap_or_else(|err| {
            warn!("{err}; using default scale");
            UnitConverter::default()
        });
        let mut state = Self {
            store: CameraStore::new(units),
            camera_count: config.initial_camera_count,
            spacing_x_mm: config.initial_spacing_x_mm,
            spacing_y_mm: config.initial_spacing_y_mm,
            show_grid: true,
            request_fit_view: true,
            show_export: false,
            export_records: Vec::new(),
            export_text: String::new(),
            hovered: None,
            export_path: config.export_path.clone(),
            copy_feedback: CopyFeedback::default(),
            status: "Ready".to_string(),
            config,
        };
        state.reconcile();
        state
    }

    fn reconcile(&mut self) {
        self.store
            .reconcile(self.camera_count, self.spacing_x_mm, self.spacing_y_mm);
    }

    pub fn set_camera_count(&mut self, count: CameraCount) {
        if count != self.camera_count {
            self.camera_count = count;
            self.reconcile();
            self.request_fit_view = true;
        }
    }

    pub fn set_spacing_x(&mut self, spacing_x_mm: f64) {
        self.set_spacing(spacing_x_mm, self.spacing_y_mm);
    }

    pub fn set_spacing_y(&mut self, spacing_y_mm: f64) {
        self.set_spacing(self.spacing_x_mm, spacing_y_mm);
    }

    pub fn set_spacing(&mut self, spacing_x_mm: f64, spacing_y_mm: f64) {
        if spacing_x_mm != self.spacing_x_mm || spacing_y_mm != self.spacing_y_mm {
            self.spacing_x_mm = spacing_x_mm;
            self.spacing_y_mm = spacing_y_mm;
            self.reconcile();
        }
    }

    /// Snapshot of the export payload at the moment the dialog opens.
    pub fn open_export(&mut self) {
        let records = to_export_records(self.store.cameras(), self.store.units());
        match to_json(&records) {
            Ok(text) => {
                self.export_records = records;
                self.export_text = text;
                self.show_export = true;
                self.copy_feedback = CopyFeedback::default();
            }
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    pub fn close_export(&mut self) {
        self.show_export = false;
    }

    pub fn save_export(&mut self) -> Result<PathBuf, ExportError> {
        let path = PathBuf::from(&self.export_path);
        save_export(&self.export_records, &path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly_editor::model::CAMERA_MODELS;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn store_with(count: CameraCount) -> CameraStore {
        let mut store = CameraStore::new(UnitConverter::default());
        store.reconcile(count, 20.0, 20.0);
        store
    }

    fn ids(store: &CameraStore) -> Vec<u32> {
        store.cameras().iter().map(|c| c.id).collect()
    }

    #[test]
    fn reconcile_assigns_contiguous_ids_and_defaults() {
        let store = store_with(CameraCount::Three);
        assert_eq!(ids(&store), vec![1, 2, 3]);
        for camera in store.cameras() {
            assert_relative_eq!(camera.rotation, 0.0);
            assert!(std::ptr::eq(camera.model, &CAMERA_MODELS[0]));
        }
        assert_relative_eq!(store.cameras()[2].x, -100.0);
        assert_relative_eq!(store.cameras()[2].y, 100.0);
        assert_eq!(store.selected_id(), Some(1));
    }

    #[test]
    fn spacing_change_preserves_per_camera_choices() {
        let mut store = store_with(CameraCount::Four);
        assert!(store.update(3, CameraUpdate::model("WLF01")));
        assert!(store.update(3, CameraUpdate::rotation(90.0)));

        store.reconcile(CameraCount::Four, 55.0, 80.0);

        let camera = store.camera(3).unwrap();
        assert_eq!(camera.model.name, "WLF01");
        assert_relative_eq!(camera.rotation, 90.0);
        assert_relative_eq!(camera.x, -275.0);
        assert_relative_eq!(camera.y, 400.0);
    }

    #[test]
    fn reducing_count_drops_trailing_ids_only() {
        let mut store = store_with(CameraCount::Four);
        store.update(1, CameraUpdate::rotation(270.0));
        store.update(2, CameraUpdate::model("WLF01"));
        store.update(4, CameraUpdate::model("WLF01"));

        store.reconcile(CameraCount::Two, 20.0, 20.0);

        assert_eq!(ids(&store), vec![1, 2]);
        assert_relative_eq!(store.camera(1).unwrap().rotation, 270.0);
        assert_eq!(store.camera(2).unwrap().model.name, "WLF01");

        store.reconcile(CameraCount::Four, 20.0, 20.0);
        assert_eq!(store.camera(4).unwrap().model.name, "MD15342X1");
    }

    #[test]
    fn selection_falls_back_when_selected_camera_disappears() {
        let mut store = store_with(CameraCount::Four);
        assert!(store.select(4));
        store.reconcile(CameraCount::Two, 20.0, 20.0);
        assert_eq!(store.selected_id(), Some(1));

        assert!(store.select(2));
        store.reconcile(CameraCount::Three, 20.0, 20.0);
        assert_eq!(store.selected_id(), Some(2));
    }

    #[test]
    fn selecting_unknown_id_keeps_selection() {
        let mut store = store_with(CameraCount::Two);
        assert!(store.select(2));
        assert!(!store.select(7));
        assert_eq!(store.selected_id(), Some(2));
        assert_eq!(store.selected().unwrap().id, 2);
    }

    #[test]
    fn update_of_missing_id_is_a_no_op() {
        let mut store = store_with(CameraCount::One);
        let before = store.cameras().to_vec();
        assert!(!store.update(2, CameraUpdate::x(5.0)));
        assert_eq!(store.cameras(), before.as_slice());
    }

    #[test]
    fn unknown_model_name_keeps_previous_model() {
        let mut store = store_with(CameraCount::One);
        store.update(1, CameraUpdate::model("WLF01"));
        store.update(1, CameraUpdate::model("Generic-Wide"));
        assert_eq!(store.camera(1).unwrap().model.name, "WLF01");
    }

    #[test]
    fn position_overwrites_without_validation() {
        let mut store = store_with(CameraCount::One);
        store.update(1, CameraUpdate::x(-9000.0));
        store.update(1, CameraUpdate::y(123.25));
        let camera = store.camera(1).unwrap();
        assert_relative_eq!(camera.x, -9000.0);
        assert_relative_eq!(camera.y, 123.25);
    }

    #[test]
    fn rotation_wraps_in_both_directions() {
        let mut store = store_with(CameraCount::One);
        for expected in [90.0, 180.0, 270.0, 0.0] {
            store.rotate_selected(RotationDirection::Clockwise);
            assert_relative_eq!(store.camera(1).unwrap().rotation, expected);
        }
        store.rotate_selected(RotationDirection::CounterClockwise);
        assert_relative_eq!(store.camera(1).unwrap().rotation, 270.0);
    }

    #[test]
    fn rotation_updates_are_reduced_modulo_360() {
        let mut store = store_with(CameraCount::One);
        store.update(1, CameraUpdate::rotation(450.0));
        assert_relative_eq!(store.camera(1).unwrap().rotation, 90.0);
        store.update(1, CameraUpdate::rotation(-90.0));
        assert_relative_eq!(store.camera(1).unwrap().rotation, 270.0);
        assert_relative_eq!(normalize_rotation(-1e-20), 0.0);
    }

    #[test]
    fn editor_state_reconciles_only_on_change() {
        let mut state = EditorState::new(EditorConfig::default());
        assert_eq!(state.store.cameras().len(), 2);
        state.store.update(2, CameraUpdate::x(1.0));

        state.set_spacing(20.0, 20.0);
        assert_relative_eq!(state.store.camera(2).unwrap().x, 1.0);

        state.set_spacing(30.0, 20.0);
        assert_relative_eq!(state.store.camera(2).unwrap().x, 150.0);

        state.set_camera_count(CameraCount::Four);
        assert_eq!(state.store.cameras().len(), 4);
    }

    #[test]
    fn opening_export_renders_current_cameras() {
        let mut state = EditorState::new(EditorConfig::default());
        state.open_export();
        assert!(state.show_export);
        assert!(state.export_text.contains("\"componentFile\": \"MD15342X1.a3dcomp\""));
        state.close_export();
        assert!(!state.show_export);
    }

    #[test]
    fn spacing_setters_leave_the_other_axis_alone() {
        let mut state = EditorState::new(EditorConfig {
            initial_camera_count: CameraCount::Four,
            ..EditorConfig::default()
        });
        state.set_spacing_x(60.0);
        assert_relative_eq!(state.spacing_y_mm, 20.0);
        assert_relative_eq!(state.store.camera(4).unwrap().y, 100.0);
        assert_relative_eq!(state.store.camera(4).unwrap().x, 300.0);

        state.set_spacing_y(40.0);
        assert_relative_eq!(state.spacing_x_mm, 60.0);
        assert_relative_eq!(state.store.camera(4).unwrap().y, 200.0);
    }

    #[test]
    fn saved_export_matches_the_shown_snapshot() {
        let dir = std::env::temp_dir().join(format!("assembly-snapshot-{}", std::process::id()));
        let path = dir.join("cameras.json");
        let mut state = EditorState::new(EditorConfig::default());
        state.export_path = path.display().to_string();

        state.open_export();
        state.set_camera_count(CameraCount::Four);
        state.store.rotate_selected(RotationDirection::Clockwise);
        assert_eq!(state.save_export().unwrap(), path);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.trim_end(), state.export_text);
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
