use std::fmt;

/// Coarse weather classification reported by the provider (`weather[0].main`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConditionCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Smoke,
    Haze,
    Dust,
    Fog,
    Sand,
    Ash,
    Squall,
    Tornado,
    Other(String),
}

impl ConditionCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionCategory::Clear => "Clear",
            ConditionCategory::Clouds => "Clouds",
            ConditionCategory::Rain => "Rain",
            ConditionCategory::Drizzle => "Drizzle",
            ConditionCategory::Thunderstorm => "Thunderstorm",
            ConditionCategory::Snow => "Snow",
            ConditionCategory::Mist => "Mist",
            ConditionCategory::Smoke => "Smoke",
            ConditionCategory::Haze => "Haze",
            ConditionCategory::Dust => "Dust",
            ConditionCategory::Fog => "Fog",
            ConditionCategory::Sand => "Sand",
            ConditionCategory::Ash => "Ash",
            ConditionCategory::Squall => "Squall",
            ConditionCategory::Tornado => "Tornado",
            ConditionCategory::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for ConditionCategory {
    /// Matching is exact; the provider capitalizes these consistently.
    fn from(value: &str) -> Self {
        match value {
            "Clear" => ConditionCategory::Clear,
            "Clouds" => ConditionCategory::Clouds,
            "Rain" => ConditionCategory::Rain,
            "Drizzle" => ConditionCategory::Drizzle,
            "Thunderstorm" => ConditionCategory::Thunderstorm,
            "Snow" => ConditionCategory::Snow,
            "Mist" => ConditionCategory::Mist,
            "Smoke" => ConditionCategory::Smoke,
            "Haze" => ConditionCategory::Haze,
            "Dust" => ConditionCategory::Dust,
            "Fog" => ConditionCategory::Fog,
            "Sand" => ConditionCategory::Sand,
            "Ash" => ConditionCategory::Ash,
            "Squall" => ConditionCategory::Squall,
            "Tornado" => ConditionCategory::Tornado,
            other => ConditionCategory::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decorative background family selected from the condition category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundTheme {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Fog,
}

impl BackgroundTheme {
    /// Unknown categories fall back to `Clouds`.
    pub fn for_condition(category: &ConditionCategory) -> Self {
        match category {
            ConditionCategory::Clear => BackgroundTheme::Clear,
            ConditionCategory::Clouds => BackgroundTheme::Clouds,
            ConditionCategory::Rain | ConditionCategory::Drizzle => BackgroundTheme::Rain,
            ConditionCategory::Thunderstorm => BackgroundTheme::Thunderstorm,
            ConditionCategory::Snow => BackgroundTheme::Snow,
            ConditionCategory::Mist
            | ConditionCategory::Smoke
            | ConditionCategory::Haze
            | ConditionCategory::Dust
            | ConditionCategory::Fog
            | ConditionCategory::Sand
            | ConditionCategory::Ash
            | ConditionCategory::Squall
            | ConditionCategory::Tornado => BackgroundTheme::Fog,
            ConditionCategory::Other(_) => BackgroundTheme::Clouds,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundTheme::Clear => "clear",
            BackgroundTheme::Clouds => "clouds",
            BackgroundTheme::Rain => "rain",
            BackgroundTheme::Snow => "snow",
            BackgroundTheme::Thunderstorm => "thunderstorm",
            BackgroundTheme::Fog => "fog",
        }
    }
}

impl fmt::Display for BackgroundTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Air quality band from the provider's 1..=5 index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirQualityLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AirQualityLevel {
    /// Returns `None` for anything outside 1..=5.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            1 => Some(AirQualityLevel::Good),
            2 => Some(AirQualityLevel::Fair),
            3 => Some(AirQualityLevel::Moderate),
            4 => Some(AirQualityLevel::Poor),
            5 => Some(AirQualityLevel::VeryPoor),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AirQualityLevel::Good => "Good",
            AirQualityLevel::Fair => "Fair",
            AirQualityLevel::Moderate => "Moderate",
            AirQualityLevel::Poor => "Poor",
            AirQualityLevel::VeryPoor => "Very Poor",
        }
    }
}

impl fmt::Display for AirQualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized current conditions for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub place: String,
    pub country: Option<String>,
    pub temperature_c: i64,
    pub condition: ConditionCategory,
    pub description: String,
    pub icon: String,
    pub precipitation_mm: f64,
    pub humidity_pct: Option<u8>,
    pub wind_speed_mps: f64,
    pub cloud_cover_pct: Option<u8>,
    /// Already rounded to one decimal.
    pub visibility_km: Option<f64>,
}

impl WeatherSnapshot {
    /// `"Name, CC"`, or just the name when no country code was reported.
    pub fn place_label(&self) -> String {
        match &self.country {
            Some(cc) if !cc.is_empty() => format!("{}, {}", self.place, cc),
            _ => self.place.clone(),
        }
    }

    pub fn theme(&self) -> BackgroundTheme {
        BackgroundTheme::for_condition(&self.condition)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyForecastPoint {
    /// Zero-padded local hour, e.g. `"09:00"`.
    pub hour_label: String,
    pub temperature_c: i64,
}

/// Up to eight forecast points plus the range used to scale them.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyChart {
    pub points: Vec<HourlyForecastPoint>,
    pub min_c: i64,
    pub max_c: i64,
}

impl HourlyChart {
    pub const MAX_POINTS: usize = 8;

    /// Returns `None` for an empty window.
    pub fn new(points: Vec<HourlyForecastPoint>) -> Option<Self> {
        let min_c = points.iter().map(|p| p.temperature_c).min()?;
        let max_c = points.iter().map(|p| p.temperature_c).max()?;

        Some(Self {
            points,
            min_c,
            max_c,
        })
    }

    /// Maps a temperature onto 20..=100 percent of the chart height.
    pub fn height_percent(&self, temperature_c: i64) -> f64 {
        let range = match self.max_c - self.min_c {
            0 => 1,
            r => r,
        };

        (temperature_c - self.min_c) as f64 / range as f64 * 80.0 + 20.0
    }
}

/// Everything one successful search produced.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub snapshot: WeatherSnapshot,
    pub air_quality: Option<AirQualityLevel>,
    pub hourly: Option<HourlyChart>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(temp: i64) -> HourlyForecastPoint {
        HourlyForecastPoint {
            hour_label: "00:00".into(),
            temperature_c: temp,
        }
    }

    #[test]
    fn drizzle_selects_rain_theme() {
        let category = ConditionCategory::from("Drizzle");
        assert_eq!(BackgroundTheme::for_condition(&category), BackgroundTheme::Rain);
    }

    #[test]
    fn unknown_category_defaults_to_clouds() {
        let category = ConditionCategory::from("Volcano");
        assert_eq!(category, ConditionCategory::Other("Volcano".into()));
        assert_eq!(BackgroundTheme::for_condition(&category), BackgroundTheme::Clouds);
    }

    #[test]
    fn obscured_conditions_select_fog() {
        for name in ["Mist", "Smoke", "Haze", "Dust", "Fog", "Sand", "Ash", "Squall", "Tornado"] {
            let category = ConditionCategory::from(name);
            assert_eq!(category.as_str(), name);
            assert_eq!(BackgroundTheme::for_condition(&category), BackgroundTheme::Fog, "{name}");
        }
    }

    #[test]
    fn air_quality_index_maps_to_labels() {
        assert_eq!(AirQualityLevel::from_index(3).map(|l| l.label()), Some("Moderate"));
        assert_eq!(AirQualityLevel::from_index(5).map(|l| l.label()), Some("Very Poor"));
        assert_eq!(AirQualityLevel::from_index(0), None);
        assert_eq!(AirQualityLevel::from_index(6), None);
    }

    #[test]
    fn chart_scales_min_and_max_to_bounds() {
        let temps = [10, 12, 15, 11, 9, 14, 13, 12];
        let chart = HourlyChart::new(temps.iter().copied().map(point).collect()).unwrap();

        assert_eq!(chart.min_c, 9);
        assert_eq!(chart.max_c, 15);
        assert!((chart.height_percent(9) - 20.0).abs() < f64::EPSILON);
        assert!((chart.height_percent(15) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn flat_chart_does_not_divide_by_zero() {
        let chart = HourlyChart::new(vec![point(7), point(7)]).unwrap();
        assert!((chart.height_percent(7) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_chart_is_none() {
        assert!(HourlyChart::new(Vec::new()).is_none());
    }

    #[test]
    fn place_label_includes_country_when_present() {
        let mut snapshot = WeatherSnapshot {
            place: "Oslo".into(),
            country: Some("NO".into()),
            temperature_c: 3,
            condition: ConditionCategory::Snow,
            description: "light snow".into(),
            icon: "13d".into(),
            precipitation_mm: 0.0,
            humidity_pct: None,
            wind_speed_mps: 0.0,
            cloud_cover_pct: None,
            visibility_km: None,
        };
        assert_eq!(snapshot.place_label(), "Oslo, NO");

        snapshot.country = None;
        assert_eq!(snapshot.place_label(), "Oslo");
        assert_eq!(snapshot.theme(), BackgroundTheme::Snow);
    }
}
