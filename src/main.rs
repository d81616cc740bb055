//! Climate Dash - Historical Temperature Analysis Dashboard
//!
//! Loads the land temperature datasets once, aggregates them, and presents the
//! results as a set of interactive chart pages.

mod charts;
mod config;
mod data;
mod gui;
mod views;

use anyhow::{anyhow, Context, Result};
use config::AppConfig;
use data::LoadCache;
use eframe::egui;
use gui::ClimateApp;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use views::{Measurement, Page};

fn main() -> Result<()> {
    let config_path = AppConfig::location();
    let config = AppConfig::load_or_default(&config_path)
        .with_context(|| format!("failed to read configuration {}", config_path.display()))?;

    // RUST_LOG wins over the configured level
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!(config = %config_path.display(), "startup");

    let cache = Arc::new(LoadCache::new());
    let data = cache.get_or_load(&config.data).map_err(|e| {
        error!("startup load failed: {}", e);
        anyhow!(e).context("cannot start without the climate datasets")
    })?;

    let start_page = Page::from_name_or_home(&config.views.start_page);
    let measurement = Measurement::from_name_or_default(&config.views.measurement);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Climate Dash"),
        ..Default::default()
    };

    eframe::run_native(
        "Climate Dash",
        options,
        Box::new(move |cc| {
            Ok(Box::new(ClimateApp::new(
                cc,
                config,
                cache,
                data,
                start_page,
                measurement,
            )))
        }),
    )
    .map_err(|e| anyhow!("{}", e))
}
