mod app;
mod color;
mod config;
mod data;
mod report;
mod state;
mod ui;

use app::AdultsApp;
use config::DashboardConfig;
use data::loader::load_datasets;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load()?;
    let datasets = load_datasets(&config, &config.data_dir)
        .inspect_err(|e| log::error!("Failed to load datasets: {e:#}"))?;
    let state = AppState::new(config, datasets);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Adults Dashboard",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the logo and banner.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(AdultsApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
