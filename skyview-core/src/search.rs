//! Query orchestration: validates input, runs the three lookups and tracks
//! the dashboard's view state.

use chrono::{Local, TimeZone};
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    model::WeatherReport,
    normalize,
    payload::{AirPollutionPayload, CurrentPayload, ForecastPayload},
    provider::{FetchError, WeatherSource},
};

/// A trimmed, non-empty location string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    pub fn parse(input: &str) -> Result<Self, SearchError> {
        match input.trim() {
            "" => Err(SearchError::EmptyQuery),
            trimmed => Ok(Self(trimmed.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terminal failures of a search. Each carries the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Please enter a location.")]
    EmptyQuery,

    #[error("Location not found. Try a different name.")]
    LocationNotFound,

    #[error("Weather service error. Try again later.")]
    Service,

    #[error("Network error. Check your connection.")]
    Network,

    #[error("Unexpected response from API")]
    UnexpectedResponse,
}

impl From<FetchError> for SearchError {
    /// Classifies a failed primary lookup.
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound => SearchError::LocationNotFound,
            FetchError::Status(_) => SearchError::Service,
            FetchError::Transport(_) => SearchError::Network,
            FetchError::Decode(_) => SearchError::UnexpectedResponse,
        }
    }
}

/// Raw outcome of one search; the secondary lookups may be missing.
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub current: CurrentPayload,
    pub forecast: Option<ForecastPayload>,
    pub air_quality: Option<AirPollutionPayload>,
}

/// Runs the primary lookup, then forecast and air quality side by side.
///
/// Only the primary lookup can fail the search; the other two degrade to
/// `None` and are logged.
#[instrument(skip(source, query), fields(query = %query))]
pub async fn fetch<S>(source: &S, query: &LocationQuery) -> Result<SearchResults, SearchError>
where
    S: WeatherSource + ?Sized,
{
    let current = source.current(query.as_str()).await.map_err(|e| {
        warn!(error = %e, "Current weather lookup failed");
        SearchError::from(e)
    })?;

    let forecast = async {
        source
            .forecast(query.as_str())
            .await
            .map_err(|e| warn!(error = %e, "Forecast unavailable"))
            .ok()
    };

    let air_quality = async {
        match current.coord {
            Some(coord) => source
                .air_quality(coord)
                .await
                .map_err(|e| warn!(error = %e, "Air quality unavailable"))
                .ok(),
            None => {
                warn!("No coordinates in current weather; skipping air quality");
                None
            }
        }
    };

    let (forecast, air_quality) = tokio::join!(forecast, air_quality);

    Ok(SearchResults {
        current,
        forecast,
        air_quality,
    })
}

/// What the dashboard is showing right now.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading {
        query: String,
    },
    Ready(Box<WeatherReport>),
    Failed(SearchError),
}

impl ViewState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }
}

/// Owns the weather source and the current view state.
#[derive(Debug)]
pub struct Dashboard<S, Tz: TimeZone = Local> {
    source: S,
    tz: Tz,
    state: ViewState,
}

impl<S: WeatherSource> Dashboard<S, Local> {
    pub fn new(source: S) -> Self {
        Self::with_timezone(source, Local)
    }
}

impl<S: WeatherSource, Tz: TimeZone> Dashboard<S, Tz> {
    /// Hour labels in the chart are rendered in `tz`.
    pub fn with_timezone(source: S, tz: Tz) -> Self {
        Self {
            source,
            tz,
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs one search, reporting each state transition to `observe`.
    ///
    /// An empty query fails without entering `Loading`. Every other path
    /// passes through `Loading` and ends in `Ready` or `Failed`.
    pub async fn submit<F>(&mut self, input: &str, mut observe: F) -> &ViewState
    where
        F: FnMut(&ViewState),
    {
        let query = match LocationQuery::parse(input) {
            Ok(query) => query,
            Err(err) => {
                self.state = ViewState::Failed(err);
                observe(&self.state);
                return &self.state;
            }
        };

        self.state = ViewState::Loading {
            query: query.to_string(),
        };
        observe(&self.state);

        self.state = match fetch(&self.source, &query).await {
            Ok(results) => match normalize::report(
                &results.current,
                results.forecast.as_ref(),
                results.air_quality.as_ref(),
                &self.tz,
            ) {
                Some(report) => {
                    info!(
                        place = %report.snapshot.place_label(),
                        condition = %report.snapshot.condition,
                        "Search complete"
                    );
                    ViewState::Ready(Box::new(report))
                }
                None => {
                    warn!("Current weather payload lacked condition or main block");
                    ViewState::Failed(SearchError::UnexpectedResponse)
                }
            },
            Err(err) => ViewState::Failed(err),
        };
        observe(&self.state);

        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Coord;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug, Clone, Copy)]
    enum Primary {
        Ok,
        NotFound,
        Status(u16),
        Decode,
    }

    #[derive(Debug, Clone, Copy)]
    enum Secondary {
        Ok,
        Status(u16),
        Transport,
        Decode,
    }

    impl Secondary {
        /// The scripted failure, or `None` when the call should succeed.
        async fn failure(self) -> Option<FetchError> {
            match self {
                Secondary::Ok => None,
                Secondary::Status(code) => Some(FetchError::Status(code)),
                Secondary::Decode => Some(FetchError::Decode("truncated".into())),
                Secondary::Transport => {
                    // A URL reqwest cannot parse fails before any I/O.
                    let err = reqwest::Client::new()
                        .get("not a url")
                        .send()
                        .await
                        .unwrap_err();
                    Some(FetchError::Transport(err))
                }
            }
        }
    }

    /// Scripted source that counts every call.
    #[derive(Debug)]
    struct FakeSource {
        primary: Primary,
        forecast: Secondary,
        air: Secondary,
        with_coord: bool,
        calls: AtomicUsize,
        air_coords: Mutex<Vec<Coord>>,
    }

    impl FakeSource {
        fn new(primary: Primary) -> Self {
            Self {
                primary,
                forecast: Secondary::Ok,
                air: Secondary::Ok,
                with_coord: true,
                calls: AtomicUsize::new(0),
                air_coords: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherSource for FakeSource {
        async fn current(&self, location: &str) -> Result<CurrentPayload, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.primary {
                Primary::Ok => {
                    let mut body = json!({
                        "name": location,
                        "sys": { "country": "FR" },
                        "main": { "temp": 21.5, "humidity": 40 },
                        "weather": [{ "main": "Drizzle", "description": "light drizzle", "icon": "09d" }]
                    });
                    if self.with_coord {
                        body["coord"] = json!({ "lat": 48.85, "lon": 2.35 });
                    }
                    Ok(serde_json::from_value(body).unwrap())
                }
                Primary::NotFound => Err(FetchError::NotFound),
                Primary::Status(code) => Err(FetchError::Status(code)),
                Primary::Decode => Err(FetchError::Decode("bad json".into())),
            }
        }

        async fn forecast(&self, _location: &str) -> Result<ForecastPayload, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.forecast.failure().await {
                return Err(err);
            }
            Ok(serde_json::from_value(json!({
                "list": [{ "dt": 0, "main": { "temp": 20.0 } }, { "dt": 10800, "main": { "temp": 18.0 } }]
            }))
            .unwrap())
        }

        async fn air_quality(&self, coord: Coord) -> Result<AirPollutionPayload, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.air_coords.lock().unwrap().push(coord);
            if let Some(err) = self.air.failure().await {
                return Err(err);
            }
            Ok(serde_json::from_value(json!({ "list": [{ "main": { "aqi": 2 } }] })).unwrap())
        }
    }

    async fn run(source: FakeSource, input: &str) -> (Vec<ViewState>, Dashboard<FakeSource, Utc>) {
        let mut dashboard = Dashboard::with_timezone(source, Utc);
        let mut seen = Vec::new();
        dashboard.submit(input, |s| seen.push(s.clone())).await;
        (seen, dashboard)
    }

    #[test]
    fn query_is_trimmed() {
        let query = LocationQuery::parse("  Paris \t").unwrap();
        assert_eq!(query.as_str(), "Paris");
    }

    #[tokio::test]
    async fn blank_input_makes_no_calls() {
        for input in ["", "   ", "\t\n"] {
            let (seen, dashboard) = run(FakeSource::new(Primary::Ok), input).await;

            assert_eq!(dashboard.source().calls(), 0);
            assert_eq!(seen, vec![ViewState::Failed(SearchError::EmptyQuery)]);
            assert_eq!(SearchError::EmptyQuery.to_string(), "Please enter a location.");
        }
    }

    #[tokio::test]
    async fn primary_failures_are_mutually_exclusive() {
        let cases = [
            (Primary::NotFound, SearchError::LocationNotFound),
            (Primary::Status(500), SearchError::Service),
            (Primary::Status(401), SearchError::Service),
            (Primary::Decode, SearchError::UnexpectedResponse),
        ];

        for (primary, expected) in cases {
            let (seen, dashboard) = run(FakeSource::new(primary), "Paris").await;

            assert_eq!(dashboard.source().calls(), 1, "{primary:?}");
            assert_eq!(seen.len(), 2);
            assert!(seen[0].is_busy());
            assert_eq!(seen[1], ViewState::Failed(expected));
            assert!(!dashboard.state().is_busy());
        }
    }

    #[tokio::test]
    async fn success_passes_through_loading() {
        let (seen, dashboard) = run(FakeSource::new(Primary::Ok), " Paris ").await;

        assert_eq!(seen[0], ViewState::Loading { query: "Paris".into() });
        let ViewState::Ready(report) = dashboard.state() else {
            panic!("expected ready state, got {:?}", dashboard.state());
        };
        assert_eq!(report.snapshot.place_label(), "Paris, FR");
        assert_eq!(report.snapshot.temperature_c, 22);
        assert_eq!(report.air_quality.map(|l| l.label()), Some("Fair"));
        assert_eq!(report.hourly.as_ref().unwrap().points.len(), 2);
        assert_eq!(dashboard.source().calls(), 3);
        assert_eq!(
            dashboard.source().air_coords.lock().unwrap().as_slice(),
            &[Coord { lat: 48.85, lon: 2.35 }]
        );
    }

    #[tokio::test]
    async fn secondary_failures_do_not_block_each_other() {
        let mut source = FakeSource::new(Primary::Ok);
        source.forecast = Secondary::Status(500);
        let (_, dashboard) = run(source, "Paris").await;

        let ViewState::Ready(report) = dashboard.state() else {
            panic!("forecast failure must not abort the search");
        };
        assert!(report.hourly.is_none());
        assert!(report.air_quality.is_some());
        assert_eq!(dashboard.source().calls(), 3);

        let mut source = FakeSource::new(Primary::Ok);
        source.air = Secondary::Status(502);
        let (_, dashboard) = run(source, "Paris").await;

        let ViewState::Ready(report) = dashboard.state() else {
            panic!("air quality failure must not abort the search");
        };
        assert!(report.hourly.is_some());
        assert!(report.air_quality.is_none());
    }

    #[tokio::test]
    async fn unreachable_secondaries_still_finish_ready() {
        let cases = [
            (Secondary::Transport, Secondary::Ok),
            (Secondary::Ok, Secondary::Transport),
            (Secondary::Transport, Secondary::Transport),
            (Secondary::Decode, Secondary::Transport),
        ];

        for (forecast, air) in cases {
            let mut source = FakeSource::new(Primary::Ok);
            source.forecast = forecast;
            source.air = air;
            let (seen, dashboard) = run(source, "Paris").await;

            assert_eq!(seen.len(), 2, "{forecast:?}/{air:?}");
            let ViewState::Ready(report) = dashboard.state() else {
                panic!("{forecast:?}/{air:?} must not fail the search");
            };
            assert_eq!(report.hourly.is_some(), matches!(forecast, Secondary::Ok));
            assert_eq!(report.air_quality.is_some(), matches!(air, Secondary::Ok));
            assert_eq!(report.snapshot.place, "Paris");
            assert_eq!(dashboard.source().calls(), 3);
        }
    }

    #[tokio::test]
    async fn missing_coordinates_skip_air_quality() {
        let mut source = FakeSource::new(Primary::Ok);
        source.with_coord = false;
        let (_, dashboard) = run(source, "Paris").await;

        assert!(matches!(dashboard.state(), ViewState::Ready(_)));
        assert_eq!(dashboard.source().calls(), 2);
        assert!(dashboard.source().air_coords.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn next_search_replaces_previous_state() {
        let mut dashboard = Dashboard::with_timezone(FakeSource::new(Primary::Ok), Utc);
        dashboard.submit("Paris", |_| {}).await;
        assert!(matches!(dashboard.state(), ViewState::Ready(_)));

        dashboard.submit(" ", |_| {}).await;
        assert_eq!(dashboard.state(), &ViewState::Failed(SearchError::EmptyQuery));
    }
}
