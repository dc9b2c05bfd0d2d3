//! Core library for the `skyview` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the [`WeatherSource`] trait
//! - Normalization of raw payloads into the domain model
//! - Search orchestration and the dashboard's view state
//! - A pure renderer from view state to a [`render::Screen`]
//!
//! It is used by `skyview-cli`, but can also be reused by other front ends.

pub mod config;
pub mod model;
pub mod normalize;
pub mod payload;
pub mod provider;
pub mod render;
pub mod search;

pub use config::Config;
pub use model::{
    AirQualityLevel, BackgroundTheme, ConditionCategory, HourlyChart, HourlyForecastPoint,
    WeatherReport, WeatherSnapshot,
};
pub use provider::{FetchError, WeatherSource, openweather::OpenWeatherProvider, source_from_config};
pub use render::{Renderer, Screen};
pub use search::{Dashboard, LocationQuery, SearchError, ViewState};
