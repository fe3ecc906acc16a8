use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::Config,
    error::ResolveError,
    model::{Coordinates, ForecastEntry, WeatherSnapshot},
};

/// Resolves a free-text location name to a weather snapshot.
///
/// Two sequential lookups per call: geocoding (name -> coordinates), then the
/// 3-hourly forecast for those coordinates. Stateless between calls; cheap to
/// clone (the HTTP client is internally reference-counted).
#[derive(Debug, Clone)]
pub struct ForecastResolver {
    http: Client,
    config: Config,
}

impl ForecastResolver {
    pub fn new(config: Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, config })
    }

    /// Resolve `location_name` to a snapshot, or a single terminal failure.
    ///
    /// The caller is expected to have rejected empty input already; an empty
    /// query sent here simply comes back as `LocationNotFound`.
    pub async fn resolve(&self, location_name: &str) -> Result<WeatherSnapshot, ResolveError> {
        let query = normalize_query(location_name);
        let coords = self.geocode(&query).await?;

        tracing::debug!(
            %query,
            latitude = coords.latitude,
            longitude = coords.longitude,
            "geocoded location"
        );

        let list = self.fetch_forecast(coords).await?;

        let index = closest_slot(&list, &hour_key(Local::now()));
        snapshot_from_entry(&list[index])
    }

    /// Lookup #1: location name to coordinates, first candidate wins.
    async fn geocode(&self, query: &str) -> Result<Coordinates, ResolveError> {
        let res = self
            .http
            .get(&self.config.geocoding_url)
            .query(&[
                ("name", query),
                ("count", "10"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(ResolveError::from_transport)?;

        let status = res.status();
        let body = res.text().await.map_err(ResolveError::from_transport)?;

        if !status.is_success() {
            tracing::warn!(%status, "geocoding request failed");
            return Err(ResolveError::LocationNotFound(query.to_string()));
        }

        let parsed: GeocodeResponse = serde_json::from_str(&body)
            .map_err(|_| ResolveError::LocationNotFound(query.to_string()))?;

        parsed
            .results
            .into_iter()
            .next()
            .map(|candidate| Coordinates {
                latitude: candidate.latitude,
                longitude: candidate.longitude,
            })
            .ok_or_else(|| ResolveError::LocationNotFound(query.to_string()))
    }

    /// Lookup #2: coordinates to the ordered forecast list, metric units.
    async fn fetch_forecast(
        &self,
        coords: Coordinates,
    ) -> Result<Vec<ForecastEntry>, ResolveError> {
        let res = self
            .http
            .get(&self.config.forecast_url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("appid", self.config.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(ResolveError::from_transport)?;

        let status = res.status();
        let body = res.text().await.map_err(ResolveError::from_transport)?;

        if !status.is_success() {
            tracing::warn!(%status, "forecast request failed");
            return Err(ResolveError::ForecastUnavailable(format!(
                "status {status}"
            )));
        }

        let parsed: ForecastResponse = serde_json::from_str(&body)
            .map_err(|e| ResolveError::ForecastUnavailable(format!("unparseable body: {e}")))?;

        if parsed.list.is_empty() {
            return Err(ResolveError::ForecastUnavailable(
                "response contained no forecast entries".to_string(),
            ));
        }

        Ok(parsed.list)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
}

/// Trim and collapse internal whitespace to single spaces.
fn normalize_query(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Current local time truncated to the hour, in the provider's `dt_txt` format.
fn hour_key(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:00:00").to_string()
}

/// Index of the first entry whose timestamp matches `target` exactly
/// (case-insensitive). The forecast slots are 3 hours apart, so most of the
/// time nothing matches; index 0 is the deliberate fallback then, not an
/// error, so the display always has something plausible to show.
fn closest_slot(entries: &[ForecastEntry], target: &str) -> usize {
    entries
        .iter()
        .position(|e| e.dt_txt.eq_ignore_ascii_case(target))
        .unwrap_or(0)
}

/// Atomic field extraction: all four display fields or `MalformedForecast`.
fn snapshot_from_entry(entry: &ForecastEntry) -> Result<WeatherSnapshot, ResolveError> {
    let main = entry.main.as_ref().ok_or(ResolveError::MalformedForecast)?;
    let wind = entry.wind.as_ref().ok_or(ResolveError::MalformedForecast)?;
    let condition = entry
        .weather
        .first()
        .map(|w| w.description.clone())
        .ok_or(ResolveError::MalformedForecast)?;

    Ok(WeatherSnapshot {
        temperature_c: main.temp,
        condition,
        humidity_pct: main.humidity,
        wind_speed_kmh: wind.speed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryCondition, EntryMain, EntryWind};
    use chrono::TimeZone;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn entry(dt_txt: &str, temp: f64) -> ForecastEntry {
        ForecastEntry {
            dt_txt: dt_txt.to_string(),
            main: Some(EntryMain {
                temp,
                humidity: 81,
            }),
            weather: vec![EntryCondition {
                description: "light rain".to_string(),
            }],
            wind: Some(EntryWind { speed: 4.2 }),
        }
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_query("  New   York  "), "New York");
        assert_eq!(normalize_query("London"), "London");
    }

    #[test]
    fn hour_key_zeroes_minutes_and_seconds() {
        let now = Local.with_ymd_and_hms(2024, 1, 1, 12, 34, 56).unwrap();
        assert_eq!(hour_key(now), "2024-01-01 12:00:00");
    }

    #[test]
    fn closest_slot_picks_exact_match() {
        let list = vec![
            entry("2024-01-01 09:00:00", 3.0),
            entry("2024-01-01 12:00:00", 5.0),
        ];
        assert_eq!(closest_slot(&list, "2024-01-01 12:00:00"), 1);
    }

    #[test]
    fn closest_slot_is_case_insensitive() {
        // dt_txt never actually carries letters, but matching is specified
        // case-insensitive and stays that way.
        let mut list = vec![entry("2024-01-01 09:00:00", 3.0)];
        list[0].dt_txt = "2024-01-01 12:00:00 UTC".to_string();
        assert_eq!(closest_slot(&list, "2024-01-01 12:00:00 utc"), 0);
    }

    #[test]
    fn closest_slot_falls_back_to_first_entry() {
        let list = vec![
            entry("2024-01-01 09:00:00", 3.0),
            entry("2024-01-01 12:00:00", 5.0),
        ];
        assert_eq!(closest_slot(&list, "2024-01-01 15:00:00"), 0);
    }

    #[test]
    fn extraction_yields_all_four_fields() {
        let snapshot = snapshot_from_entry(&entry("2024-01-01 09:00:00", 3.5)).unwrap();

        assert_eq!(snapshot.temperature_c, 3.5);
        assert_eq!(snapshot.condition, "light rain");
        assert_eq!(snapshot.humidity_pct, 81);
        assert_eq!(snapshot.wind_speed_kmh, 4.2);
    }

    #[test]
    fn extraction_fails_when_wind_is_missing() {
        let mut e = entry("2024-01-01 09:00:00", 3.5);
        e.wind = None;
        assert_eq!(
            snapshot_from_entry(&e),
            Err(ResolveError::MalformedForecast)
        );
    }

    #[test]
    fn extraction_fails_when_condition_list_is_empty() {
        let mut e = entry("2024-01-01 09:00:00", 3.5);
        e.weather.clear();
        assert_eq!(
            snapshot_from_entry(&e),
            Err(ResolveError::MalformedForecast)
        );
    }

    #[test]
    fn extraction_fails_when_main_is_missing() {
        let mut e = entry("2024-01-01 09:00:00", 3.5);
        e.main = None;
        assert_eq!(
            snapshot_from_entry(&e),
            Err(ResolveError::MalformedForecast)
        );
    }

    fn test_config(geocoding: &MockServer, forecast: &MockServer) -> Config {
        Config {
            api_key: "TESTKEY".to_string(),
            geocoding_url: format!("{}/v1/search", geocoding.uri()),
            forecast_url: format!("{}/data/2.5/forecast", forecast.uri()),
            timeout_secs: 1,
        }
    }

    fn geocode_hit() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_string(
            r#"{"results": [{"latitude": 51.5, "longitude": -0.125, "name": "London"}]}"#,
        )
    }

    fn forecast_body() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_string(
            r#"{"list": [
                {"dt_txt": "2020-01-01 09:00:00",
                 "main": {"temp": 7.1, "humidity": 93},
                 "weather": [{"description": "overcast clouds"}, {"description": "mist"}],
                 "wind": {"speed": 3.6}},
                {"dt_txt": "2020-01-01 12:00:00",
                 "main": {"temp": 9.4, "humidity": 88},
                 "weather": [{"description": "light rain"}],
                 "wind": {"speed": 5.1}}
            ]}"#,
        )
    }

    #[tokio::test]
    async fn happy_path_returns_full_snapshot() {
        let geocoding = MockServer::start().await;
        let forecast = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("name", "New York"))
            .and(query_param("count", "10"))
            .and(query_param("language", "en"))
            .and(query_param("format", "json"))
            .respond_with(geocode_hit())
            .expect(1)
            .mount(&geocoding)
            .await;

        Mock::given(method("GET"))
            .and(query_param("lat", "51.5"))
            .and(query_param("lon", "-0.125"))
            .and(query_param("appid", "TESTKEY"))
            .and(query_param("units", "metric"))
            .respond_with(forecast_body())
            .expect(1)
            .mount(&forecast)
            .await;

        let resolver = ForecastResolver::new(test_config(&geocoding, &forecast)).unwrap();
        let snapshot = resolver.resolve("  New   York  ").await.unwrap();

        // The mocked timestamps are long past, so slot selection falls back
        // to the earliest entry.
        assert_eq!(snapshot.temperature_c, 7.1);
        assert_eq!(snapshot.condition, "overcast clouds");
        assert_eq!(snapshot.humidity_pct, 93);
        assert_eq!(snapshot.wind_speed_kmh, 3.6);
    }

    #[tokio::test]
    async fn empty_geocode_results_skip_the_forecast_call() {
        let geocoding = MockServer::start().await;
        let forecast = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"results": []}"#))
            .mount(&geocoding)
            .await;

        // Verified on drop: the forecast endpoint must never be hit.
        Mock::given(method("GET"))
            .respond_with(forecast_body())
            .expect(0)
            .mount(&forecast)
            .await;

        let resolver = ForecastResolver::new(test_config(&geocoding, &forecast)).unwrap();
        let err = resolver.resolve("Atlantis").await.unwrap_err();

        assert_eq!(err, ResolveError::LocationNotFound("Atlantis".to_string()));
    }

    #[tokio::test]
    async fn geocode_error_status_is_location_not_found() {
        let geocoding = MockServer::start().await;
        let forecast = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&geocoding)
            .await;

        let resolver = ForecastResolver::new(test_config(&geocoding, &forecast)).unwrap();
        let err = resolver.resolve("London").await.unwrap_err();

        assert!(matches!(err, ResolveError::LocationNotFound(_)));
    }

    #[tokio::test]
    async fn forecast_error_status_is_forecast_unavailable() {
        let geocoding = MockServer::start().await;
        let forecast = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(geocode_hit())
            .mount(&geocoding)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&forecast)
            .await;

        let resolver = ForecastResolver::new(test_config(&geocoding, &forecast)).unwrap();
        let err = resolver.resolve("London").await.unwrap_err();

        assert!(matches!(err, ResolveError::ForecastUnavailable(_)));
    }

    #[tokio::test]
    async fn unparseable_forecast_body_is_forecast_unavailable() {
        let geocoding = MockServer::start().await;
        let forecast = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(geocode_hit())
            .mount(&geocoding)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&forecast)
            .await;

        let resolver = ForecastResolver::new(test_config(&geocoding, &forecast)).unwrap();
        let err = resolver.resolve("London").await.unwrap_err();

        assert!(matches!(err, ResolveError::ForecastUnavailable(_)));
    }

    #[tokio::test]
    async fn empty_forecast_list_is_forecast_unavailable() {
        let geocoding = MockServer::start().await;
        let forecast = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(geocode_hit())
            .mount(&geocoding)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"list": []}"#))
            .mount(&forecast)
            .await;

        let resolver = ForecastResolver::new(test_config(&geocoding, &forecast)).unwrap();
        let err = resolver.resolve("London").await.unwrap_err();

        assert!(matches!(err, ResolveError::ForecastUnavailable(_)));
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let geocoding = MockServer::start().await;
        let forecast = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(geocode_hit().set_delay(std::time::Duration::from_secs(3)))
            .mount(&geocoding)
            .await;

        let resolver = ForecastResolver::new(test_config(&geocoding, &forecast)).unwrap();
        let err = resolver.resolve("London").await.unwrap_err();

        assert_eq!(err, ResolveError::NetworkTimeout);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let forecast = MockServer::start().await;

        let config = Config {
            api_key: "TESTKEY".to_string(),
            // Discard port: nothing listens there.
            geocoding_url: "http://127.0.0.1:9/v1/search".to_string(),
            forecast_url: format!("{}/data/2.5/forecast", forecast.uri()),
            timeout_secs: 1,
        };

        let resolver = ForecastResolver::new(config).unwrap();
        let err = resolver.resolve("London").await.unwrap_err();

        assert!(matches!(
            err,
            ResolveError::NetworkError(_) | ResolveError::NetworkTimeout
        ));
    }
}
