mod app;
mod data;
mod state;
mod ui;

use app::RustyNmrApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 500.0])
            .with_min_inner_size([600.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty NMR – 1D Spectrum Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(RustyNmrApp::default()))),
    )
}
