use eframe::egui::{self, Color32, DragValue, Grid, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – parameters and result record
// ---------------------------------------------------------------------------

/// Render the parameter editor and the result record.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Parameters");
    ui.separator();

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            Grid::new("ef_parameters")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    let o = &mut state.options;

                    ui.label("Band (cm⁻¹)");
                    ui.horizontal(|ui: &mut Ui| {
                        let mut auto = o.band.is_none();
                        if ui.checkbox(&mut auto, "auto").changed() {
                            o.band = if auto {
                                None
                            } else {
                                state.result.as_ref().map(|r| r.closest_band)
                            };
                            changed = true;
                        }
                        if let Some(band) = o.band.as_mut() {
                            changed |= ui.add(DragValue::new(band).speed(1.0)).changed();
                        }
                    });
                    ui.end_row();

                    changed |= param_row(ui, "λ (nm)", &mut o.lambda_nm, 1.0);
                    changed |= param_row(ui, "NA", &mut o.numerical_aperture, 0.01);
                    changed |= param_row(ui, "ρ (g/cm³)", &mut o.density, 0.01);
                    changed |= param_row(ui, "M (g/mol)", &mut o.mol_weight, 0.1);
                    changed |= param_row(ui, "σ (nm²)", &mut o.surf_area, 0.1);
                });

            ui.add_space(8.0);
            ui.heading("Result");
            ui.separator();

            match &state.result {
                Some(r) => {
                    Grid::new("ef_result")
                        .num_columns(2)
                        .striped(true)
                        .show(ui, |ui: &mut Ui| {
                            let rows = [
                                ("EF", format!("{:.4e}", r.ef)),
                                ("Band", format!("{:.2} cm⁻¹", r.closest_band)),
                                ("Requested", format!("{:.2} cm⁻¹", r.requested_band)),
                                ("Index", r.closest_index.to_string()),
                                ("Mode", format!("{:?}", r.localization)),
                                ("I normal", format!("{:.4}", r.i_normal)),
                                ("I SERS", format!("{:.4}", r.i_sers)),
                                ("Focal radius", format!("{:.4e} m", r.volume.focal_radius_m)),
                                ("Depth of focus", format!("{:.4e} m", r.volume.depth_of_focus_m)),
                                ("Volume", format!("{:.4e} m³", r.volume.volume_m3)),
                                ("N normal", format!("{:.4e}", r.n_normal)),
                                ("N SERS", format!("{:.4e}", r.n_sers)),
                            ];
                            for (label, value) in rows {
                                ui.label(label);
                                ui.label(RichText::new(value).monospace());
                                ui.end_row();
                            }
                        });
                }
                None => {
                    ui.label("No result.");
                }
            }
        });

    if changed {
        state.recompute();
    }
}

fn param_row(ui: &mut Ui, label: &str, value: &mut f64, speed: f64) -> bool {
    ui.label(label);
    let changed = ui.add(DragValue::new(value).speed(speed)).changed();
    ui.end_row();
    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(pair) = &state.pair {
            ui.label(format!("{} samples", pair.len()));
        }

        ui.separator();

        if ui
            .selectable_label(state.minmax_scaling, "Min-Max Scaling")
            .clicked()
        {
            state.minmax_scaling = !state.minmax_scaling;
        }

        if ui
            .selectable_label(state.peak_aware, "Snap to Peaks")
            .clicked()
        {
            state.peak_aware = !state.peak_aware;
            state.recompute();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open Raman / SERS spectra")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match sers_ef::data::loader::load_file(&path) {
            Ok(pair) => state.set_pair(pair),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
