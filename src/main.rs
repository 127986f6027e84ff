mod app;
mod cli;
mod color;
mod config;
mod data;
mod headless;
mod state;
mod ui;

use anyhow::Context;
use app::LngDashboardApp;
use clap::Parser;
use cli::CliArgs;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let config = DashboardConfig::discover(args.config.as_deref(), args.data_dir.as_deref())?;
    let mut state = AppState::new(config);

    if args.headless {
        return headless::run_headless(&mut state, &args);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let title = format!("{} – {}", state.config.title, state.config.subtitle);
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(LngDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the dashboard window")
}
