use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{env, fs, path::PathBuf, time::Duration};

const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const DEFAULT_FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Environment variable that supplies (or overrides) the forecast API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Explicit configuration handed to the resolver at construction.
///
/// Endpoints and timeout are overridable so tests can point the resolver at
/// mock servers; nothing here is a compiled-in constant.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// # geocoding_url = "https://geocoding-api.open-meteo.com/v1/search"
/// # forecast_url = "https://api.openweathermap.org/data/2.5/forecast"
/// # timeout_secs = 5
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// API key for the forecast provider.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Connect/read timeout applied to both outbound requests.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_geocoding_url() -> String {
    DEFAULT_GEOCODING_URL.to_string()
}

fn default_forecast_url() -> String {
    DEFAULT_FORECAST_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load config from disk if a file exists, otherwise start from defaults.
    /// The `OPENWEATHER_API_KEY` environment variable always wins for the key.
    /// The config file is never written by the application.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(key) = env::var(API_KEY_ENV) {
            cfg.api_key = key;
        }

        if cfg.api_key.is_empty() {
            return Err(anyhow!(
                "No API key configured.\n\
                 Hint: set {API_KEY_ENV} or add `api_key = \"...\"` to {}.",
                path.display()
            ));
        }

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherdesk", "weatherdesk")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
