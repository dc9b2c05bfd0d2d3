//! Pure mapping from [`ViewState`] to a [`Screen`] description.
//!
//! Nothing here touches the terminal; painting lives in the binary.

use std::time::Duration;

use crate::{
    config::Config,
    model::{BackgroundTheme, HourlyChart, WeatherReport, WeatherSnapshot},
    search::ViewState,
};

/// Shown wherever source data is missing.
pub const PLACEHOLDER: &str = "--";

pub const FORECAST_UNAVAILABLE: &str = "24-hour forecast data not available";

const IDLE_LABEL: &str = "Get Weather";
const BUSY_LABEL: &str = "Loading...";

/// Delay between consecutive chart bars appearing.
pub const BAR_STAGGER: Duration = Duration::from_millis(100);

/// Full visible state of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub search: SearchControl,
    pub status: Option<String>,
    pub card: Option<Card>,
    pub params: Option<ParamsPanel>,
    pub background: Option<Background>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchControl {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub place: String,
    pub temperature: String,
    pub description: String,
    pub icon_url: String,
    pub icon_alt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamsPanel {
    pub params: Vec<Param>,
    pub chart: Chart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Unavailable(&'static str),
    Bars(Vec<ChartBar>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub hour_label: String,
    pub temp_label: String,
    pub tooltip: String,
    pub height_percent: f64,
    pub reveal_delay: Duration,
}

/// Condition-themed decoration, rebuilt from scratch on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    pub theme: BackgroundTheme,
    pub nodes: Vec<DecorNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorNode {
    pub kind: DecorKind,
    /// Horizontal offset as a percentage of the background width.
    pub left_percent: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorKind {
    Sun,
    Cloud { variant: u8 },
    Drop { index: u8 },
    Flake { index: u8 },
    Flash,
}

impl Background {
    pub fn for_theme(theme: BackgroundTheme) -> Self {
        let nodes = match theme {
            BackgroundTheme::Clear => vec![DecorNode {
                kind: DecorKind::Sun,
                left_percent: 80,
            }],
            BackgroundTheme::Clouds => vec![
                DecorNode {
                    kind: DecorKind::Cloud { variant: 1 },
                    left_percent: 10,
                },
                DecorNode {
                    kind: DecorKind::Cloud { variant: 2 },
                    left_percent: 55,
                },
            ],
            BackgroundTheme::Rain => (1..=5)
                .map(|i| DecorNode {
                    kind: DecorKind::Drop { index: i },
                    left_percent: 10 + (i - 1) * 20,
                })
                .collect(),
            BackgroundTheme::Snow => (1..=6)
                .map(|i| DecorNode {
                    kind: DecorKind::Flake { index: i },
                    left_percent: 10 * i,
                })
                .collect(),
            BackgroundTheme::Thunderstorm => vec![DecorNode {
                kind: DecorKind::Flash,
                left_percent: 0,
            }],
            BackgroundTheme::Fog => Vec::new(),
        };

        Self { theme, nodes }
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    icon_base_url: String,
}

impl Renderer {
    pub fn new(icon_base_url: impl Into<String>) -> Self {
        Self {
            icon_base_url: icon_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.icon_base_url.clone())
    }

    pub fn render(&self, state: &ViewState) -> Screen {
        let search = if state.is_busy() {
            SearchControl {
                label: BUSY_LABEL,
                enabled: false,
            }
        } else {
            SearchControl {
                label: IDLE_LABEL,
                enabled: true,
            }
        };

        match state {
            ViewState::Idle | ViewState::Loading { .. } => Screen {
                search,
                status: None,
                card: None,
                params: None,
                background: None,
            },
            ViewState::Failed(err) => Screen {
                search,
                status: Some(err.to_string()),
                card: None,
                params: None,
                background: None,
            },
            ViewState::Ready(report) => Screen {
                search,
                status: None,
                card: Some(self.card(&report.snapshot)),
                params: Some(params_panel(report)),
                background: Some(Background::for_theme(report.snapshot.theme())),
            },
        }
    }

    pub fn icon_url(&self, icon: &str) -> String {
        format!("{}/{}@2x.png", self.icon_base_url, icon)
    }

    fn card(&self, snapshot: &WeatherSnapshot) -> Card {
        Card {
            place: snapshot.place_label(),
            temperature: format!("{}°C", snapshot.temperature_c),
            description: snapshot.description.clone(),
            icon_url: self.icon_url(&snapshot.icon),
            icon_alt: snapshot.description.clone(),
        }
    }
}

fn or_placeholder<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

fn params_panel(report: &WeatherReport) -> ParamsPanel {
    let s = &report.snapshot;

    let params = vec![
        Param {
            label: "Precipitation",
            value: format!("{:.1}", s.precipitation_mm),
            unit: "mm",
        },
        Param {
            label: "Humidity",
            value: or_placeholder(s.humidity_pct),
            unit: "%",
        },
        Param {
            label: "Wind",
            value: format!("{:.1}", s.wind_speed_mps),
            unit: "m/s",
        },
        Param {
            label: "Air Quality",
            value: or_placeholder(report.air_quality.map(|l| l.label())),
            unit: "",
        },
        Param {
            label: "Cloud Cover",
            value: or_placeholder(s.cloud_cover_pct),
            unit: "%",
        },
        Param {
            label: "Visibility",
            value: or_placeholder(s.visibility_km.map(|km| format!("{km:.1}"))),
            unit: "km",
        },
    ];

    let chart = match &report.hourly {
        Some(hourly) => Chart::Bars(chart_bars(hourly)),
        None => Chart::Unavailable(FORECAST_UNAVAILABLE),
    };

    ParamsPanel { params, chart }
}

fn chart_bars(chart: &HourlyChart) -> Vec<ChartBar> {
    chart
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| ChartBar {
            hour_label: p.hour_label.clone(),
            temp_label: format!("{}°", p.temperature_c),
            tooltip: format!("{}: {}°C", p.hour_label, p.temperature_c),
            height_percent: chart.height_percent(p.temperature_c),
            reveal_delay: BAR_STAGGER * i as u32,
        })
        .collect()
}
