//! Todo UI Entry Point

mod app;
mod components;
mod config;
mod context;
mod controller;
mod db;
mod models;
mod store;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    // Only fails if a logger is already installed, which keeps working
    let _ = ring_logger::init(config.level_filter(), config.log_capacity);
    if let Some(e) = config_error {
        log::warn!("[App] Ignoring TODO_UI_CONFIG: {}", e);
    }

    mount_to_body(move || view! { <App config=config /> });
}
