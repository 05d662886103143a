use crate::{Config, model::Lookup, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;

pub mod openweather;

/// Hard failures of a weather query. A location the provider does not know is
/// not an error; see [`Lookup::NotFound`].
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a free-text location such as `"Paris"` or `"Paris, FR"`.
    async fn current_weather(&self, location: &str) -> Result<Lookup, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    if config.openweather.api_key.trim().is_empty() {
        return Err(anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
             Hint: run `weatherbot configure` or set WEATHERBOT_OPENWEATHER_KEY."
        ));
    }

    let provider = OpenWeatherProvider::with_base_url(
        config.openweather.api_key.clone(),
        config.openweather.base_url.clone(),
        Duration::from_secs(config.http.timeout_secs),
    )?;

    Ok(Box::new(provider))
}
