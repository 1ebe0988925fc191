use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Spectrum plot (central panel)
// ---------------------------------------------------------------------------

/// Render the 1D spectrum in the central panel.
///
/// Chemical-shift convention puts high ppm on the left. egui_plot has no
/// inverted axes, so the line is plotted against negated ppm and the axis
/// and cursor labels are mapped back to true ppm.
pub fn spectrum_plot(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a pdata folder to view the spectrum  (File → Open…)");
        });
        return;
    };

    let spectrum = &dataset.spectrum;
    let range = state.window.clone().unwrap_or(0..spectrum.len());

    let points: PlotPoints = spectrum.shifts[range.clone()]
        .iter()
        .zip(spectrum.intensities[range].iter())
        .map(|(&ppm, &y)| [-ppm, y])
        .collect();

    let line = Line::new(points)
        .name("1D spectrum")
        .color(Color32::LIGHT_BLUE)
        .width(1.5);

    Plot::new("spectrum_plot")
        .legend(Legend::default())
        .x_axis_label("ppm")
        .y_axis_label("Intensity")
        .x_axis_formatter(|mark, _range| {
            let ppm = if mark.value == 0.0 { 0.0 } else { -mark.value };
            format!("{ppm:.2}")
        })
        .label_formatter(|name, value| {
            let ppm = -value.x;
            if name.is_empty() {
                format!("{ppm:.4} ppm\n{:.1}", value.y)
            } else {
                format!("{name}\n{ppm:.4} ppm\n{:.1}", value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(line);
        });
}
