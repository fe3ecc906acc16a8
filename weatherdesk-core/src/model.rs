use serde::Deserialize;

/// Geographic coordinates produced by geocoding. Consumed immediately by the
/// forecast fetch, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One timestamped slot from the provider's 3-hourly forecast list.
///
/// The nested sections are optional at the serde level so that a structurally
/// incomplete entry surfaces as `MalformedForecast` at extraction time instead
/// of failing the parse of the whole response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    /// Timestamp string, "YYYY-MM-DD HH:00:00".
    #[serde(default)]
    pub dt_txt: String,
    pub main: Option<EntryMain>,
    #[serde(default)]
    pub weather: Vec<EntryCondition>,
    pub wind: Option<EntryWind>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryMain {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryCondition {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryWind {
    pub speed: f64,
}

/// The reduced weather record rendered to the user.
///
/// Either all four fields are populated or the lookup failed; there is no
/// partial snapshot. The km/h label on a metric-units wind speed matches the
/// display convention of the original app.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub condition: String,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
}
