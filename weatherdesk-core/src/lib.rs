//! Core library for the WeatherDesk desktop app.
//!
//! This crate defines:
//! - Configuration handling (API key, endpoints, timeout)
//! - The forecast resolver (geocode -> forecast -> snapshot)
//! - Shared domain models and the failure taxonomy
//!
//! It is used by `weatherdesk-gui`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod resolver;

pub use config::Config;
pub use error::ResolveError;
pub use model::{Coordinates, ForecastEntry, WeatherSnapshot};
pub use resolver::ForecastResolver;
