mod app;
mod auth;
mod color;
mod config;
mod data;
mod decor;
mod state;
mod ui;
mod views;

use app::DashboardApp;
use auth::AccessGate;
use config::{AppConfig, SecretResolver};
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();
    let gate = AccessGate::from_resolver(&SecretResolver::from_environment());
    let title = config.window_title.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(AppState::new(config, gate))))),
    )
}
