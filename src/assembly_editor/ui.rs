use crate::assembly_editor::camera::UiInteractionState;
use crate::assembly_editor::config::SliderRange;
use crate::assembly_editor::layout::CameraCount;
use crate::assembly_editor::model::catalog;
use crate::assembly_editor::state::{CameraUpdate, EditorState, RotationDirection};
use crate::assembly_editor::view::{grid_info_text, hover_label};
use bevy::prelude::{ButtonInput, KeyCode, Res, ResMut};
use bevy_egui::{EguiContexts, egui};
use tracing::{info, warn};

pub fn ui_system(
    mut contexts: EguiContexts,
    mut state: ResMut<EditorState>,
    mut ui_state: ResMut<UiInteractionState>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let now = ctx.input(|input| input.time);
    state.copy_feedback.tick(now);

    egui::TopBottomPanel::top("assembly_configurator_top_bar").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            ui.heading("Assembly Configurator");
            ui.separator();
            ui.label(format!("Status: {}", state.status));
            ui.separator();
            ui.small("LMB select camera, MMB pan, wheel zoom, 1-4 count, R rotate.");
        });
    });

    let side_panel_response = egui::SidePanel::right("assembly_configurator_controls")
        .resizable(true)
        .default_width(340.0)
        .show(ctx, |ui| {
            // The export window is modal: the payload it shows must not drift.
            let editable = !state.show_export;
            ui.add_enabled_ui(editable, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    draw_assembly_settings(ui, &mut state);
                    ui.separator();
                    draw_selected_camera(ui, &mut state);
                    ui.separator();
                    if ui
                        .add_sized(
                            [ui.available_width(), 32.0],
                            egui::Button::new("Generate Configuration"),
                        )
                        .clicked()
                    {
                        state.open_export();
                    }
                });
            });
        });

    if state.show_export {
        draw_export_window(ctx, &mut state, now);
    } else if let Some(text) = state
        .hovered
        .and_then(|id| state.store.camera(id))
        .map(hover_label)
    {
        draw_hover_label(ctx, text);
    }

    ui_state.wants_pointer_input = ctx.wants_pointer_input();
    ui_state.wants_keyboard_input = ctx.wants_keyboard_input();
    ui_state.side_panel_width = side_panel_response.response.rect.width();
}

fn draw_assembly_settings(ui: &mut egui::Ui, state: &mut EditorState) {
    ui.heading("Assembly Settings");

    ui.label("Number of Cameras");
    ui.horizontal(|ui| {
        for count in CameraCount::ALL {
            if ui
                .selectable_label(state.camera_count == count, count.get().to_string())
                .clicked()
            {
                state.set_camera_count(count);
                state.status = format!("{} camera(s)", count.get());
            }
        }
    });

    let range = state.config.spacing_slider;
    let mut spacing_x = state.spacing_x_mm;
    let mut spacing_y = state.spacing_y_mm;
    // A value below the slider minimum comes back clamped but unchanged; only
    // the axis the user moved is written.
    if mm_slider(ui, "Grid Spacing X", &mut spacing_x, range) {
        state.set_spacing_x(spacing_x);
    }
    if mm_slider(ui, "Grid Spacing Y", &mut spacing_y, range) {
        state.set_spacing_y(spacing_y);
    }

    ui.horizontal(|ui| {
        if ui.button("Fit View").clicked() {
            state.request_fit_view = true;
        }
        ui.checkbox(&mut state.show_grid, "Show grid");
    });
    ui.small(grid_info_text(state.store.units()));
}

fn draw_selected_camera(ui: &mut egui::Ui, state: &mut EditorState) {
    let Some(camera) = state.store.selected().cloned() else {
        ui.heading("Selected Camera (ID: None)");
        ui.label("Click a camera in the view to select it.");
        return;
    };
    ui.heading(format!("Selected Camera (ID: {})", camera.id));

    let mut picked_model = None;
    egui::ComboBox::from_label("Camera Model")
        .selected_text(camera.model.name)
        .show_ui(ui, |ui| {
            for model in catalog() {
                if ui
                    .selectable_label(model.name == camera.model.name, model.name)
                    .on_hover_text(format!(
                        "{} ({} x {} mm)",
                        model.component_file, model.width_mm, model.height_mm
                    ))
                    .clicked()
                {
                    picked_model = Some(model.name);
                }
            }
        });
    if let Some(name) = picked_model {
        state.store.update(camera.id, CameraUpdate::model(name));
    }

    let units = state.store.units();
    let range = state.config.position_slider;
    let mut x_mm = units.to_physical(camera.x);
    let mut y_mm = units.to_physical(camera.y);
    if mm_slider(ui, "Position X", &mut x_mm, range) {
        state.store.update(camera.id, CameraUpdate::x(units.to_pixels(x_mm)));
    }
    if mm_slider(ui, "Position Y", &mut y_mm, range) {
        state.store.update(camera.id, CameraUpdate::y(units.to_pixels(y_mm)));
    }

    ui.horizontal(|ui| {
        ui.label("Rotation");
        ui.monospace(format!("{}°", camera.rotation));
    });
    ui.horizontal(|ui| {
        if ui.button("-90° (CCW)").clicked() {
            state.store.rotate(camera.id, RotationDirection::CounterClockwise);
        }
        if ui.button("+90° (CW)").clicked() {
            state.store.rotate(camera.id, RotationDirection::Clockwise);
        }
    });
}

fn mm_slider(ui: &mut egui::Ui, label: &str, value: &mut f64, range: SliderRange) -> bool {
    ui.add(
        egui::Slider::new(value, range.min..=range.max)
            .text(label)
            .step_by(range.step)
            .suffix(" mm")
            .fixed_decimals(1),
    )
    .changed()
}

fn draw_hover_label(ctx: &egui::Context, text: String) {
    let Some(pointer) = ctx.pointer_hover_pos() else {
        return;
    };
    egui::Area::new(egui::Id::new("assembly_camera_hover"))
        .order(egui::Order::Tooltip)
        .interactable(false)
        .fixed_pos(pointer + egui::vec2(14.0, 14.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(text);
            });
        });
}

fn draw_export_window(ctx: &egui::Context, state: &mut EditorState, now: f64) {
    let mut open = true;
    let mut close_requested = false;

    egui::Window::new("Generated Configuration")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(560.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .max_height(420.0)
                .show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut state.export_text.as_str())
                            .code_editor()
                            .desired_width(f32::INFINITY),
                    );
                });

            ui.separator();
            ui.horizontal(|ui| {
                ui.label("Save to");
                ui.text_edit_singleline(&mut state.export_path);
            });

            ui.horizontal(|ui| {
                if ui.button(state.copy_feedback.label()).clicked() {
                    ui.ctx().copy_text(state.export_text.clone());
                    state.copy_feedback.mark_copied(now);
                }
                if ui.button("Save JSON").clicked() {
                    match state.save_export() {
                        Ok(path) => {
                            info!(path = %path.display(), "configuration saved");
                            state.status = format!("Configuration saved to {}", path.display());
                        }
                        Err(err) => {
                            warn!("{err}");
                            state.status = format!("Save failed: {err}");
                        }
                    }
                }
                if ui.button("Close").clicked() {
                    close_requested = true;
                }
            });
        });

    if !open || close_requested {
        state.close_export();
    }
}

fn shortcuts_enabled(ui_state: &UiInteractionState, state: &EditorState) -> bool {
    !ui_state.wants_keyboard_input && !state.show_export
}

/// Digits 1-4 pick the camera count, R / Shift+R rotate the selection.
pub fn keyboard_shortcuts_system(
    keys: Res<ButtonInput<KeyCode>>,
    ui_state: Res<UiInteractionState>,
    mut state: ResMut<EditorState>,
) {
    if !shortcuts_enabled(&ui_state, &state) {
        return;
    }

    let digits = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4];
    if let Some(idx) = digits.iter().position(|key| keys.just_pressed(*key)) {
        let count = CameraCount::clamped(idx as i64 + 1);
        state.set_camera_count(count);
        state.status = format!("{} camera(s)", count.get());
    }

    if keys.just_pressed(KeyCode::KeyR) {
        let direction = if keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight) {
            RotationDirection::CounterClockwise
        } else {
            RotationDirection::Clockwise
        };
        state.store.rotate_selected(direction);
    }
}
