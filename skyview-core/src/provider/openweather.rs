use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::payload::{AirPollutionPayload, Coord, CurrentPayload, ForecastPayload};

use super::{FetchError, WeatherSource};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `GET {base_url}/{endpoint}` with the key attached and decodes the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, ?params, "Requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = res.status();
        debug!(%status, endpoint, "OpenWeather responded");

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            // Body is for the log only.
            if let Ok(body) = res.text().await {
                debug!(body = %truncate_body(&body), "OpenWeather error body");
            }
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = res.text().await.map_err(FetchError::Transport)?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn current(&self, location: &str) -> Result<CurrentPayload, FetchError> {
        self.get_json(
            "weather",
            &[("q", location.to_string()), ("units", "metric".to_string())],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn forecast(&self, location: &str) -> Result<ForecastPayload, FetchError> {
        self.get_json(
            "forecast",
            &[("q", location.to_string()), ("units", "metric".to_string())],
        )
        .await
    }

    #[instrument(skip(self), fields(lat = %coord.lat, lon = %coord.lon))]
    async fn air_quality(&self, coord: Coord) -> Result<AirPollutionPayload, FetchError> {
        self.get_json(
            "air_pollution",
            &[("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())],
        )
        .await
    }
}

/// Clips long error bodies for logging, on a char boundary.
fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
