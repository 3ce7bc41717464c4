//! Open-Meteo current-weather client.
//!
//! Open-Meteo needs no API key. We ask for the current temperature,
//! precipitation, wind and WMO weather code, and derive the precipitation
//! and outdoor-suitability flags from those.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::domain::{Coordinate, WeatherSnapshot};

use super::error::ProviderError;
use super::WeatherProvider;

/// Default Open-Meteo API base.
const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1";

/// Current-conditions fields requested from Open-Meteo.
const CURRENT_FIELDS: &str = "temperature_2m,precipitation,wind_speed_10m,weather_code";

/// When walking and cycling count as reasonable.
#[derive(Debug, Clone, PartialEq)]
pub struct SuitabilityThresholds {
    /// Colder than this is unsuitable (°C)
    pub min_temperature_c: f64,
    /// Hotter than this is unsuitable (°C)
    pub max_temperature_c: f64,
    /// Windier than this is unsuitable (m/s)
    pub max_wind_speed_ms: f64,
}

impl Default for SuitabilityThresholds {
    fn default() -> Self {
        Self {
            min_temperature_c: -5.0,
            max_temperature_c: 35.0,
            max_wind_speed_ms: 12.0,
        }
    }
}

impl SuitabilityThresholds {
    /// Whether outdoor travel is reasonable in these conditions.
    pub fn is_suitable(&self, temperature_c: f64, wind_speed_ms: f64, precipitation: bool) -> bool {
        !precipitation
            && temperature_c >= self.min_temperature_c
            && temperature_c <= self.max_temperature_c
            && wind_speed_ms <= self.max_wind_speed_ms
    }
}

/// Configuration for the Open-Meteo client.
#[derive(Debug, Clone)]
pub struct OpenMeteoConfig {
    /// API base URL (without `/forecast`)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub thresholds: SuitabilityThresholds,
}

impl OpenMeteoConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_thresholds(mut self, thresholds: SuitabilityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            thresholds: SuitabilityThresholds::default(),
        }
    }
}

/// Open-Meteo weather client.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: reqwest::Client,
    base_url: String,
    thresholds: SuitabilityThresholds,
}

impl OpenMeteoClient {
    pub fn new(config: OpenMeteoConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            thresholds: config.thresholds,
        })
    }
}

impl WeatherProvider for OpenMeteoClient {
    async fn fetch_weather(&self, location: Coordinate) -> Result<WeatherSnapshot, ProviderError> {
        let url = format!("{}/forecast", self.base_url);
        let latitude = location.latitude().to_string();
        let longitude = location.longitude().to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
                ("wind_speed_unit", "ms"),
                ("timezone", "GMT"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        let current = parsed.current.ok_or_else(|| ProviderError::ApiError {
            status: status.as_u16(),
            message: "response has no current conditions".to_string(),
        })?;

        to_snapshot(&current, &self.thresholds)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentData>,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    /// ISO 8601 local time without offset, e.g. `2026-10-19T08:15`
    time: String,
    #[serde(rename = "temperature_2m")]
    temperature: f64,
    #[serde(default)]
    precipitation: f64,
    #[serde(rename = "wind_speed_10m", default)]
    wind_speed: f64,
    #[serde(default)]
    weather_code: u8,
}

/// Whether a WMO weather code means rain, snow, showers or thunder.
fn is_wet_code(code: u8) -> bool {
    matches!(code, 51..=67 | 71..=77 | 80..=86 | 95..=99)
}

fn parse_time(time: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}

fn to_snapshot(
    current: &CurrentData,
    thresholds: &SuitabilityThresholds,
) -> Result<WeatherSnapshot, ProviderError> {
    let precipitation = current.precipitation > 0.0 || is_wet_code(current.weather_code);
    let suitable = thresholds.is_suitable(current.temperature, current.wind_speed, precipitation);
    let captured_at = parse_time(&current.time).unwrap_or_else(Utc::now);

    WeatherSnapshot::new(current.temperature, precipitation, suitable, captured_at).map_err(|e| {
        ProviderError::Json {
            message: e.to_string(),
            body: None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn current(json: &str) -> CurrentData {
        let response: ForecastResponse = serde_json::from_str(json).unwrap();
        response.current.unwrap()
    }

    #[test]
    fn fair_weather_is_suitable() {
        let data = current(
            r#"{"latitude": 39.9, "longitude": 116.4, "current": {
                "time": "2026-10-19T08:15", "interval": 900,
                "temperature_2m": 18.4, "precipitation": 0.0,
                "wind_speed_10m": 3.2, "weather_code": 1}}"#,
        );
        let snapshot = to_snapshot(&data, &SuitabilityThresholds::default()).unwrap();

        assert_eq!(snapshot.temperature_c(), 18.4);
        assert!(!snapshot.precipitation());
        assert!(snapshot.outdoor_suitable());
        assert_eq!(snapshot.captured_at().year(), 2026);
        assert_eq!(snapshot.captured_at().hour(), 8);
        assert_eq!(snapshot.captured_at().minute(), 15);
    }

    #[test]
    fn rain_is_unsuitable() {
        let data = current(
            r#"{"current": {"time": "2026-10-19T08:15", "temperature_2m": 12.0,
                "precipitation": 1.4, "wind_speed_10m": 2.0, "weather_code": 63}}"#,
        );
        let snapshot = to_snapshot(&data, &SuitabilityThresholds::default()).unwrap();
        assert!(snapshot.precipitation());
        assert!(!snapshot.outdoor_suitable());
    }

    #[test]
    fn weather_code_alone_flags_precipitation() {
        let data = current(
            r#"{"current": {"time": "2026-10-19T08:15", "temperature_2m": 20.0,
                "precipitation": 0.0, "wind_speed_10m": 1.0, "weather_code": 95}}"#,
        );
        let snapshot = to_snapshot(&data, &SuitabilityThresholds::default()).unwrap();
        assert!(snapshot.precipitation());
    }

    #[test]
    fn wind_and_temperature_thresholds() {
        let t = SuitabilityThresholds::default();
        assert!(t.is_suitable(20.0, 5.0, false));
        assert!(!t.is_suitable(20.0, 15.0, false));
        assert!(!t.is_suitable(-10.0, 1.0, false));
        assert!(!t.is_suitable(38.0, 1.0, false));
        assert!(!t.is_suitable(20.0, 1.0, true));
    }

    #[test]
    fn wet_codes() {
        assert!(!is_wet_code(0));
        assert!(!is_wet_code(3));
        assert!(!is_wet_code(45));
        assert!(is_wet_code(61));
        assert!(is_wet_code(73));
        assert!(is_wet_code(81));
        assert!(is_wet_code(99));
    }

    #[test]
    fn unparseable_time_falls_back_to_now() {
        assert!(parse_time("not a time").is_none());
        assert!(parse_time("2026-10-19T08:15").is_some());
    }
}
