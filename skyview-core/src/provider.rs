use crate::{
    Config,
    payload::{AirPollutionPayload, Coord, CurrentPayload, ForecastPayload},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Why a single endpoint call produced no payload.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider answered 404.
    #[error("location not found")]
    NotFound,

    /// Any other non-success status.
    #[error("weather service returned HTTP {0}")]
    Status(u16),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// A response arrived but its body could not be decoded.
    #[error("could not decode response: {0}")]
    Decode(String),
}

/// The three read-only endpoints a search needs.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(&self, location: &str) -> Result<CurrentPayload, FetchError>;

    async fn forecast(&self, location: &str) -> Result<ForecastPayload, FetchError>;

    async fn air_quality(&self, coord: Coord) -> Result<AirPollutionPayload, FetchError>;
}

/// Construct the OpenWeather source from config (API key, endpoints, timeout).
pub fn source_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key()?;
    OpenWeatherProvider::new(
        api_key,
        config.base_url.clone(),
        std::time::Duration::from_secs(config.timeout_secs),
    )
}
