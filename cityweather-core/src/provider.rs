use crate::{
    Config, Query, Settings, WeatherReport, error::WeatherError,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

/// Source of current conditions plus forecast for one query.
///
/// A single call covers both endpoints so implementations can decide how to
/// issue them; the widget only sees the combined outcome.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, query: &Query, settings: &Settings) -> Result<WeatherReport, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `cityweather configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    OpenWeatherProvider::with_base_url(
        api_key,
        &config.base_url,
        Duration::from_secs(config.request_timeout_secs),
    )
}
