//! `OpenMeteo` forecast and archive endpoints
//!
//! Both endpoints answer with the same `hourly` / `hourly_units` layout, so one
//! response type covers them.

use crate::Result;
use crate::config::WeatherConfig;
use crate::error::WidgetError;
use crate::models::Coordinates;
use crate::models::weather::{
    HourlySeries, PRECIPITATION_PROBABILITY_FIELD, TEMPERATURE_FIELD, WIND_SPEED_FIELD,
};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Hourly fields requested from both endpoints
pub const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability,windspeed_10m";

/// Hourly response from either `OpenMeteo` endpoint
#[derive(Debug, Deserialize)]
pub struct HourlyResponse {
    pub hourly: HourlyData,
    #[serde(default)]
    pub hourly_units: HashMap<String, String>,
}

/// Parallel arrays keyed by `time`
#[derive(Debug, Deserialize)]
pub struct HourlyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m", default)]
    pub temperature: Vec<Option<f64>>,
    #[serde(rename = "windspeed_10m", default)]
    pub wind_speed: Vec<Option<f64>>,
    #[serde(rename = "precipitation_probability", default)]
    pub precipitation_probability: Vec<Option<f64>>,
}

fn nan_for_null(values: Vec<Option<f64>>) -> Vec<f64> {
    values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}

impl From<HourlyResponse> for HourlySeries {
    fn from(response: HourlyResponse) -> Self {
        let units = response
            .hourly_units
            .into_iter()
            .filter(|(field, _)| {
                matches!(
                    field.as_str(),
                    TEMPERATURE_FIELD | WIND_SPEED_FIELD | PRECIPITATION_PROBABILITY_FIELD
                )
            })
            .collect();

        Self {
            timestamps: response.hourly.time,
            temperature: nan_for_null(response.hourly.temperature),
            wind_speed: nan_for_null(response.hourly.wind_speed),
            precipitation_probability: nan_for_null(response.hourly.precipitation_probability),
            units,
        }
    }
}

/// HTTP client for the two `OpenMeteo` queries
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    forecast_url: Url,
    archive_url: Url,
    time_zone: String,
}

impl OpenMeteoClient {
    /// Create a new client from the weather settings
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("weather-icebreaker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let forecast_url = Url::parse(&config.forecast_url).map_err(|e| {
            WidgetError::config(format!("Invalid forecast URL '{}': {e}", config.forecast_url))
        })?;
        let archive_url = Url::parse(&config.archive_url).map_err(|e| {
            WidgetError::config(format!("Invalid archive URL '{}': {e}", config.archive_url))
        })?;

        Ok(Self {
            client,
            forecast_url,
            archive_url,
            time_zone: config.time_zone.clone(),
        })
    }

    /// Forecast query for the current hour
    #[must_use]
    pub fn forecast_url(&self, coordinates: Coordinates) -> Url {
        let mut url = self.forecast_url.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &coordinates.latitude.to_string())
            .append_pair("longitude", &coordinates.longitude.to_string())
            .append_pair("hourly", HOURLY_FIELDS)
            .append_pair("timezone", &self.time_zone);
        url
    }

    /// Archive query restricted to the single day `date` (`YYYY-MM-DD`)
    #[must_use]
    pub fn archive_url(&self, coordinates: Coordinates, date: &str) -> Url {
        let mut url = self.archive_url.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &coordinates.latitude.to_string())
            .append_pair("longitude", &coordinates.longitude.to_string())
            .append_pair("start_date", date)
            .append_pair("end_date", date)
            .append_pair("hourly", HOURLY_FIELDS)
            .append_pair("timezone", &self.time_zone);
        url
    }

    /// Issue both queries concurrently and wait for both.
    ///
    /// Fails as a whole if either side fails; nothing is consumed partially.
    #[instrument(skip(self), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    pub async fn fetch_pair(
        &self,
        coordinates: Coordinates,
        archive_date: &str,
    ) -> Result<(HourlySeries, HourlySeries)> {
        let forecast_url = self.forecast_url(coordinates);
        let archive_url = self.archive_url(coordinates, archive_date);
        debug!("OpenMeteo forecast URL: {}", forecast_url);
        debug!("OpenMeteo archive URL: {}", archive_url);

        let start_time = Instant::now();
        let (forecast, archive) = futures::future::join(
            self.client.get(forecast_url).send(),
            self.client.get(archive_url).send(),
        )
        .await;
        let forecast = forecast?;
        let archive = archive?;

        for response in [&forecast, &archive] {
            let status = response.status();
            if !status.is_success() {
                warn!("Weather request to {} failed with {}", response.url(), status);
                return Err(WidgetError::WeatherRequestFailed {
                    status: status.as_u16(),
                });
            }
        }

        let forecast = Self::parse_hourly(forecast.text().await?, "forecast")?;
        let archive = Self::parse_hourly(archive.text().await?, "archive")?;

        info!(
            "Retrieved {} forecast and {} archive hours in {:.3}s",
            forecast.timestamps.len(),
            archive.timestamps.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok((forecast, archive))
    }

    fn parse_hourly(body: String, endpoint: &str) -> Result<HourlySeries> {
        let response: HourlyResponse = serde_json::from_str(&body)
            .map_err(|e| WidgetError::parse(format!("{endpoint}: {e}")))?;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenMeteoClient {
        OpenMeteoClient::new(&WeatherConfig::default()).unwrap()
    }

    #[test]
    fn test_forecast_url_parameters() {
        let url = client().forecast_url(Coordinates::new(59.3293, 18.0686));
        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("api.open-meteo.com"));
        assert_eq!(pairs["latitude"], "59.3293");
        assert_eq!(pairs["longitude"], "18.0686");
        assert_eq!(pairs["hourly"], HOURLY_FIELDS);
        assert_eq!(pairs["timezone"], "Europe/Stockholm");
        assert!(!pairs.contains_key("start_date"));
    }

    #[test]
    fn test_archive_url_single_day_window() {
        let url = client().archive_url(Coordinates::new(59.3293, 18.0686), "2024-03-01");
        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("archive-api.open-meteo.com"));
        assert_eq!(pairs["start_date"], "2024-03-01");
        assert_eq!(pairs["end_date"], "2024-03-01");
        assert_eq!(pairs["hourly"], HOURLY_FIELDS);
    }

    #[test]
    fn test_parse_hourly_with_nulls_and_units() {
        let body = r#"{
            "latitude": 59.33,
            "hourly_units": {"time": "iso8601", "temperature_2m": "°C", "windspeed_10m": "km/h"},
            "hourly": {
                "time": ["2024-03-01T00:00", "2024-03-01T01:00"],
                "temperature_2m": [1.5, null],
                "windspeed_10m": [10.0, 11.0],
                "precipitation_probability": [null, null]
            }
        }"#;

        let series = OpenMeteoClient::parse_hourly(body.to_string(), "archive").unwrap();
        assert_eq!(series.timestamps.len(), 2);
        assert_eq!(series.temperature[0], 1.5);
        assert!(series.temperature[1].is_nan());
        assert!(series.precipitation_probability[0].is_nan());
        assert_eq!(series.unit(TEMPERATURE_FIELD), Some("°C"));
        assert_eq!(series.unit("time"), None);
    }

    #[test]
    fn test_null_readings_render_as_placeholders() {
        use crate::format::{PLACEHOLDER, ReceiptLines};
        use crate::models::{DisplayUnits, WeatherSnapshot};

        let body = r#"{
            "hourly": {
                "time": ["2024-03-02T10:00"],
                "temperature_2m": [null],
                "windspeed_10m": [null],
                "precipitation_probability": [null]
            }
        }"#;
        let series = OpenMeteoClient::parse_hourly(body.to_string(), "forecast").unwrap();
        let snapshot =
            WeatherSnapshot::align(&series, "2024-03-02T10", &series, "2024-03-02T10").unwrap();

        let lines = ReceiptLines::render(&snapshot, &DisplayUnits::from_series(&series));
        assert_eq!(lines.temp_now, PLACEHOLDER);
        assert_eq!(lines.temp_delta, PLACEHOLDER);
        assert_eq!(lines.wind_now, PLACEHOLDER);
        assert_eq!(lines.rain_now, PLACEHOLDER);
        assert_eq!(lines.summary, PLACEHOLDER);
    }

    #[test]
    fn test_parse_hourly_rejects_missing_block() {
        let err = OpenMeteoClient::parse_hourly("{\"error\": true}".to_string(), "forecast")
            .unwrap_err();
        assert!(matches!(err, WidgetError::Parse { .. }));
    }
}
