//! Hourly series and the snapshot derived from two of them

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const TEMPERATURE_FIELD: &str = "temperature_2m";
pub const WIND_SPEED_FIELD: &str = "windspeed_10m";
pub const PRECIPITATION_PROBABILITY_FIELD: &str = "precipitation_probability";

/// One parsed `hourly` block. Read-only after parse.
///
/// Values reported as `null` are stored as NaN so they render as the placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    pub timestamps: Vec<String>,
    pub temperature: Vec<f64>,
    pub wind_speed: Vec<f64>,
    pub precipitation_probability: Vec<f64>,
    /// Field name to unit string, e.g. `temperature_2m` -> `°C`
    pub units: HashMap<String, String>,
}

impl HourlySeries {
    /// Index of the first timestamp starting with `stamp`
    #[must_use]
    pub fn find_hour_index(&self, stamp: &str) -> Option<usize> {
        self.timestamps.iter().position(|time| time.starts_with(stamp))
    }

    #[must_use]
    pub fn temperature_at(&self, index: usize) -> f64 {
        value_at(&self.temperature, index)
    }

    #[must_use]
    pub fn wind_speed_at(&self, index: usize) -> f64 {
        value_at(&self.wind_speed, index)
    }

    #[must_use]
    pub fn precipitation_probability_at(&self, index: usize) -> f64 {
        value_at(&self.precipitation_probability, index)
    }

    #[must_use]
    pub fn unit(&self, field: &str) -> Option<&str> {
        self.units.get(field).map(String::as_str)
    }
}

fn value_at(values: &[f64], index: usize) -> f64 {
    values.get(index).copied().unwrap_or(f64::NAN)
}

/// Values aligned from the forecast (now) and archive (24 hours ago) series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temp_now: f64,
    pub temp_yesterday: f64,
    pub temp_delta: f64,
    pub wind_now: f64,
    pub rain_prob_now: f64,
}

impl WeatherSnapshot {
    /// Align both series at their hour-stamps.
    ///
    /// Returns `None` unless both stamps are present; there is no partial snapshot.
    #[must_use]
    pub fn align(
        forecast: &HourlySeries,
        now_stamp: &str,
        archive: &HourlySeries,
        yesterday_stamp: &str,
    ) -> Option<Self> {
        let now_index = forecast.find_hour_index(now_stamp)?;
        let yesterday_index = archive.find_hour_index(yesterday_stamp)?;

        let temp_now = forecast.temperature_at(now_index);
        let temp_yesterday = archive.temperature_at(yesterday_index);

        Some(Self {
            temp_now,
            temp_yesterday,
            temp_delta: temp_now - temp_yesterday,
            wind_now: forecast.wind_speed_at(now_index),
            rain_prob_now: forecast.precipitation_probability_at(now_index),
        })
    }
}

/// Units shown next to the snapshot values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayUnits {
    pub temperature: String,
    pub wind_speed: String,
    pub precipitation_probability: String,
}

impl Default for DisplayUnits {
    fn default() -> Self {
        Self {
            temperature: "°C".to_string(),
            wind_speed: "km/h".to_string(),
            precipitation_probability: "%".to_string(),
        }
    }
}

impl DisplayUnits {
    /// Units from a series, falling back per field to the defaults
    #[must_use]
    pub fn from_series(series: &HourlySeries) -> Self {
        let defaults = Self::default();
        Self {
            temperature: series
                .unit(TEMPERATURE_FIELD)
                .map_or(defaults.temperature, str::to_string),
            wind_speed: series
                .unit(WIND_SPEED_FIELD)
                .map_or(defaults.wind_speed, str::to_string),
            precipitation_probability: series
                .unit(PRECIPITATION_PROBABILITY_FIELD)
                .map_or(defaults.precipitation_probability, str::to_string),
        }
    }
}

/// A snapshot together with the units it was reported in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub snapshot: WeatherSnapshot,
    pub units: DisplayUnits,
}
