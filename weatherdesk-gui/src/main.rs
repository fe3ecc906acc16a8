//! Binary crate for the WeatherDesk desktop app.
//!
//! This crate focuses on:
//! - Window layout and asset loading
//! - Dispatching lookups off the UI thread
//! - Rendering snapshots and error states

use anyhow::Context;
use iced::{Font, Task};
use tracing_subscriber::EnvFilter;
use weatherdesk_core::{Config, ForecastResolver};

mod app;
mod icons;

use app::WeatherDesk;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().context("Could not load configuration")?;
    let resolver = ForecastResolver::new(config)?;

    let mut application = iced::application("Weather App", WeatherDesk::update, WeatherDesk::view)
        .window(iced::window::Settings {
            size: iced::Size::new(500.0, 800.0),
            resizable: false,
            ..Default::default()
        });

    // A missing font file falls back silently to the default font.
    match icons::load_ui_font() {
        Some(bytes) => {
            application = application
                .font(bytes)
                .default_font(Font::with_name("Poppins"));
        }
        None => tracing::debug!("UI font not found, using the default font"),
    }

    application
        .run_with(move || (WeatherDesk::new(resolver), Task::none()))
        .map_err(|e| anyhow::anyhow!("GUI event loop failed: {e}"))?;

    Ok(())
}
