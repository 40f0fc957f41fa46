//! Text shown on the page: values with units, the summary sentence and the status line

use crate::models::{DisplayUnits, LocationResult, WeatherSnapshot};

/// Shown in place of any value that is missing or not a number
pub const PLACEHOLDER: &str = "--";
pub const LOADING: &str = "Loading...";
pub const WEATHER_UNAVAILABLE: &str = "Weather unavailable";
pub const LOCATING: &str = "Locating...";
pub const USE_MY_LOCATION: &str = "Use my location";

/// `value` with `decimals` places followed by `unit`, or the placeholder
#[must_use]
pub fn format_value(value: f64, unit: &str, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}{unit}")
    } else {
        PLACEHOLDER.to_string()
    }
}

/// Signed temperature difference; positive values get an explicit `+`
#[must_use]
pub fn format_delta(delta: f64, unit: &str) -> String {
    if !delta.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let sign = if delta > 0.0 { "+" } else { "" };
    format!("{sign}{delta:.1}{unit}")
}

#[must_use]
pub fn temperature_word(temp: f64) -> &'static str {
    if temp <= 0.0 {
        "Icy"
    } else if temp < 8.0 {
        "Chilly"
    } else if temp < 16.0 {
        "Mild"
    } else if temp < 24.0 {
        "Warm"
    } else {
        "Toasty"
    }
}

#[must_use]
pub fn rain_word(probability: f64) -> &'static str {
    if probability >= 60.0 {
        "rainy"
    } else if probability <= 20.0 {
        "dry"
    } else {
        "a bit damp"
    }
}

#[must_use]
pub fn wind_word(speed: f64) -> &'static str {
    if speed >= 25.0 {
        "breezy"
    } else if speed >= 12.0 {
        "light breeze"
    } else {
        "calm air"
    }
}

/// One-line description such as `Mild, a bit damp, light breeze.`
///
/// Any missing reading gives the placeholder, matching the value fields.
#[must_use]
pub fn create_summary(temp: f64, rain: f64, wind: f64) -> String {
    if !(temp.is_finite() && rain.is_finite() && wind.is_finite()) {
        return PLACEHOLDER.to_string();
    }
    format!(
        "{}, {}, {}.",
        temperature_word(temp),
        rain_word(rain),
        wind_word(wind)
    )
}

/// Rendered text for every weather field of a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLines {
    pub temp_now: String,
    pub temp_yesterday: String,
    pub temp_delta: String,
    pub wind_now: String,
    pub rain_now: String,
    pub summary: String,
}

impl ReceiptLines {
    #[must_use]
    pub fn render(snapshot: &WeatherSnapshot, units: &DisplayUnits) -> Self {
        let wind_unit = format!(" {}", units.wind_speed);
        Self {
            temp_now: format_value(snapshot.temp_now, &units.temperature, 1),
            temp_yesterday: format_value(snapshot.temp_yesterday, &units.temperature, 1),
            temp_delta: format_delta(snapshot.temp_delta, &units.temperature),
            wind_now: format_value(snapshot.wind_now, &wind_unit, 1),
            rain_now: format_value(snapshot.rain_prob_now, &units.precipitation_probability, 0),
            summary: create_summary(snapshot.temp_now, snapshot.rain_prob_now, snapshot.wind_now),
        }
    }
}

/// Status line under the location button
#[must_use]
pub fn status_line(locating: bool, location: Option<&LocationResult>) -> String {
    if locating {
        return LOCATING.to_string();
    }

    let Some(location) = location else {
        return "Using: lat --, lon -- (not set)".to_string();
    };

    let suffix = location
        .error_reason
        .as_deref()
        .map(|reason| format!(" — {reason}"))
        .unwrap_or_default();

    format!(
        "Using: lat {:.4}, lon {:.4} ({}){}",
        location.latitude(),
        location.longitude(),
        location.source,
        suffix
    )
}
