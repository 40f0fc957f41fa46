//! Weather fetch: two hourly series in, one aligned reading out.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, instrument};

use crate::Result;
use crate::config::WeatherConfig;
use crate::error::WidgetError;
use crate::models::{Coordinates, DisplayUnits, WeatherReading, WeatherSnapshot};

pub mod open_meteo;
pub mod stamps;

pub use open_meteo::OpenMeteoClient;
pub use stamps::{FetchStamps, ZonedParts};

/// Anything that can produce a reading for a coordinate pair at a given instant
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self, coordinates: Coordinates, now: DateTime<Utc>) -> Result<WeatherReading>;
}

/// Parse an IANA zone name such as `Europe/Stockholm`
pub fn parse_time_zone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| WidgetError::config(format!("Unknown time zone '{name}': {e}")))
}

/// Forecast "now" against the archive "24 hours ago", both in one fixed zone
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    client: OpenMeteoClient,
    time_zone: Tz,
}

impl WeatherFetcher {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        Ok(Self {
            client: OpenMeteoClient::new(config)?,
            time_zone: parse_time_zone(&config.time_zone)?,
        })
    }
}

#[async_trait]
impl WeatherSource for WeatherFetcher {
    #[instrument(skip(self), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    async fn fetch(&self, coordinates: Coordinates, now: DateTime<Utc>) -> Result<WeatherReading> {
        let stamps = FetchStamps::compute(now, self.time_zone);
        debug!(
            "Aligning forecast at {} with archive at {}",
            stamps.now_hour, stamps.yesterday_hour
        );

        let (forecast, archive) = self
            .client
            .fetch_pair(coordinates, &stamps.yesterday_date)
            .await?;

        let snapshot = WeatherSnapshot::align(
            &forecast,
            &stamps.now_hour,
            &archive,
            &stamps.yesterday_hour,
        )
        .ok_or_else(|| {
            let stamp = if forecast.find_hour_index(&stamps.now_hour).is_none() {
                stamps.now_hour.clone()
            } else {
                stamps.yesterday_hour.clone()
            };
            WidgetError::HourNotFound { stamp }
        })?;

        Ok(WeatherReading {
            snapshot,
            units: DisplayUnits::from_series(&forecast),
        })
    }
}
