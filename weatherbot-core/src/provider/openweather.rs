use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::{
    model::{Lookup, WeatherReport},
    truncate_body,
};

use super::{WeatherError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeather offsets run from UTC-12 to UTC+14.
const TIMEZONE_RANGE_SECS: std::ops::RangeInclusive<i64> = -43_200..=50_400;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// Build a provider against a custom endpoint root (a proxy, or a mock server in tests).
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn fetch_current(&self, location: &str) -> Result<Lookup, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location),
                ("units", "metric"),
                ("APPID", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(%status, body = %body, "OpenWeather response");

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            WeatherError::Decode(format!("invalid JSON ({e}): {}", truncate_body(&body)))
        })?;

        // Error replies are `{"cod":"404","message":"city not found"}`.
        if is_error_shape(&value) {
            tracing::info!(location, %status, "OpenWeather does not know this location");
            return Ok(Lookup::NotFound { city: location.to_string() });
        }

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_value(value)
            .map_err(|e| WeatherError::Decode(format!("missing or mistyped field: {e}")))?;

        parsed.into_report().map(Lookup::Found)
    }
}

fn is_error_shape(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| obj.len() == 2)
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    timezone: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_report(self) -> Result<WeatherReport, WeatherError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.main)
            .ok_or_else(|| WeatherError::Decode("empty `weather` array".to_string()))?;

        if !TIMEZONE_RANGE_SECS.contains(&self.timezone) {
            return Err(WeatherError::Decode(format!(
                "timezone offset out of range: {}",
                self.timezone
            )));
        }

        Ok(WeatherReport {
            city: self.name,
            condition,
            temperature_c: self.main.temp,
            temp_min_c: self.main.temp_min,
            temp_max_c: self.main.temp_max,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            timezone_offset_secs: self.timezone,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, location: &str) -> Result<Lookup, WeatherError> {
        self.fetch_current(location).await
    }
}
