use std::path::PathBuf;

use anyhow::Context;
use eframe::egui;
use energy_panel::app::EnergyPanelApp;
use energy_panel::config::DashboardConfig;
use energy_panel::state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut config = DashboardConfig::resolve()?;
    // An optional positional argument overrides the configured data file.
    if let Some(path) = std::env::args_os().nth(1) {
        config.data_path = PathBuf::from(path);
    }

    // Without a dataset there is nothing to show: fail before opening a window.
    let data_path = config.data_path.clone();
    let state = AppState::open(config)
        .with_context(|| format!("loading dataset {}", data_path.display()))?;
    log::info!(
        "Dashboard ready: {} rows, years {:?}",
        state.dataset.len(),
        state.dataset.year_bounds()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Energy Dashboard (Ireland + Europe)",
        options,
        Box::new(|_cc| Ok(Box::new(EnergyPanelApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
