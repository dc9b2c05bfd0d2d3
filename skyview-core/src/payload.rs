//! Wire shapes of the OpenWeather 2.5 responses.
//!
//! Everything the provider may omit is an `Option` (or defaults to empty);
//! defaults are applied once, in [`crate::normalize`].

use serde::Deserialize;

/// `GET /weather`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentPayload {
    #[serde(default)]
    pub name: String,
    pub sys: Option<OwSys>,
    pub coord: Option<Coord>,
    pub main: Option<OwMain>,
    #[serde(default)]
    pub weather: Vec<OwCondition>,
    pub rain: Option<OwRain>,
    pub wind: Option<OwWind>,
    pub clouds: Option<OwClouds>,
    /// Metres.
    pub visibility: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwSys {
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwMain {
    pub temp: f64,
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwCondition {
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwRain {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwWind {
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwClouds {
    pub all: Option<u8>,
}

/// `GET /forecast`, 3-hour steps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastPayload {
    pub list: Option<Vec<ForecastEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    /// Unix seconds.
    pub dt: i64,
    pub main: ForecastMain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
}

/// `GET /air_pollution`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirPollutionPayload {
    #[serde(default)]
    pub list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirPollutionEntry {
    pub main: AirPollutionMain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirPollutionMain {
    pub aqi: i64,
}
