//! Pure conversion from provider payloads to the domain model.

use chrono::{DateTime, TimeZone, Timelike};

use crate::{
    model::{
        AirQualityLevel, ConditionCategory, HourlyChart, HourlyForecastPoint, WeatherReport,
        WeatherSnapshot,
    },
    payload::{AirPollutionPayload, CurrentPayload, ForecastPayload},
};

/// Rounds half toward positive infinity, so `-2.5` becomes `-2`.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// One decimal place, ties toward positive infinity, so `2.25` becomes `2.3`.
pub fn round_half_up_tenths(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Fails only when the payload lacks a condition entry or the `main` block.
pub fn snapshot(current: &CurrentPayload) -> Option<WeatherSnapshot> {
    let condition = current.weather.first()?;
    let main = current.main.as_ref()?;

    Some(WeatherSnapshot {
        place: current.name.clone(),
        country: current.sys.as_ref().and_then(|s| s.country.clone()),
        temperature_c: round_half_up(main.temp),
        condition: ConditionCategory::from(condition.main.as_str()),
        description: condition.description.clone(),
        icon: condition.icon.clone(),
        precipitation_mm: round_half_up_tenths(precipitation(current)),
        humidity_pct: main.humidity.filter(|h| *h > 0),
        wind_speed_mps: current
            .wind
            .as_ref()
            .and_then(|w| w.speed)
            .map_or(0.0, round_half_up_tenths),
        cloud_cover_pct: current.clouds.as_ref().and_then(|c| c.all),
        visibility_km: current
            .visibility
            .filter(|m| *m > 0.0)
            .map(|m| round_half_up_tenths(m / 1000.0)),
    })
}

/// 3-hour volume first, then 1-hour, then zero.
fn precipitation(current: &CurrentPayload) -> f64 {
    let Some(rain) = current.rain.as_ref() else {
        return 0.0;
    };

    [rain.three_hours, rain.one_hour]
        .into_iter()
        .flatten()
        .find(|v| *v > 0.0)
        .unwrap_or(0.0)
}

/// Level from the first entry; an absent or out-of-range index yields `None`.
pub fn air_quality(payload: &AirPollutionPayload) -> Option<AirQualityLevel> {
    payload
        .list
        .first()
        .and_then(|entry| AirQualityLevel::from_index(entry.main.aqi))
}

/// The first eight forecast steps, labelled in `tz`.
pub fn hourly_chart<Tz: TimeZone>(forecast: &ForecastPayload, tz: &Tz) -> Option<HourlyChart> {
    let list = forecast.list.as_ref()?;

    let points = list
        .iter()
        .take(HourlyChart::MAX_POINTS)
        .map(|entry| HourlyForecastPoint {
            hour_label: hour_label(entry.dt, tz),
            temperature_c: round_half_up(entry.main.temp),
        })
        .collect();

    HourlyChart::new(points)
}

fn hour_label<Tz: TimeZone>(unix_secs: i64, tz: &Tz) -> String {
    match DateTime::from_timestamp(unix_secs, 0) {
        Some(utc) => format!("{:02}:00", utc.with_timezone(tz).hour()),
        None => "--:00".to_string(),
    }
}

/// Combines the three payloads; `None` means the primary one was unusable.
pub fn report<Tz: TimeZone>(
    current: &CurrentPayload,
    forecast: Option<&ForecastPayload>,
    air: Option<&AirPollutionPayload>,
    tz: &Tz,
) -> Option<WeatherReport> {
    Some(WeatherReport {
        snapshot: snapshot(current)?,
        air_quality: air.and_then(air_quality),
        hourly: forecast.and_then(|f| hourly_chart(f, tz)),
    })
}
