use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

/// Instrument data root the folder picker opens at.
const DATA_ROOT: &str = "/data/nmr";

// ---------------------------------------------------------------------------
// Left side panel – window controls and the filtered peak table
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Plot window");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        ui.label("start");
        ui.add(egui::TextEdit::singleline(&mut state.start_input).desired_width(70.0));
        ui.label("stop");
        ui.add(egui::TextEdit::singleline(&mut state.stop_input).desired_width(70.0));
    });
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Apply").clicked() {
            state.apply_window();
        }
        if ui.button("Reset").clicked() {
            state.reset_window();
        }
    });
    ui.label(
        RichText::new("Bounds must lie exactly on axis points (ppm).")
            .small()
            .weak(),
    );

    ui.add_space(8.0);
    ui.heading("Peaks");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.label(format!(
        "{} peaks above the {:.0}th percentile",
        dataset.peaks.len(),
        crate::data::peaks::DEFAULT_THRESHOLD * 100.0
    ));
    ui.add_space(4.0);

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder())
        .header(18.0, |mut header| {
            header.col(|ui| {
                ui.strong("ppm");
            });
            header.col(|ui| {
                ui.strong("intensity");
            });
        })
        .body(|mut body| {
            for peak in &dataset.peaks.peaks {
                body.row(16.0, |mut row| {
                    row.col(|ui| {
                        ui.monospace(format!("{:.4}", peak.ppm));
                    });
                    row.col(|ui| {
                        ui.monospace(format!("{:.1}", peak.intensity));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open pdata folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(dataset) = &state.dataset {
            ui.label(format!(
                "{} – {} points, {} peaks",
                dataset.source.display(),
                dataset.spectrum.len(),
                dataset.peaks.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Find the pdata folder")
        .set_directory(DATA_ROOT)
        .pick_folder();

    let Some(path) = folder else {
        return; // cancelled
    };

    match crate::data::loader::load_dataset(&path) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} ({} points, {} peaks above threshold)",
                dataset.source.display(),
                dataset.spectrum.len(),
                dataset.peaks.len()
            );
            // The filtered peak table goes to stdout.
            print!("{}", dataset.peaks);
            state.set_dataset(dataset);
        }
        Err(e) => {
            log::error!("Failed to load dataset: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
