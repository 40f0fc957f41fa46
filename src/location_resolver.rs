//! Location Resolution Module
//!
//! Turns the page link, a device position request, or nothing at all into
//! exactly one [`LocationResult`]. Failures never escape: they become the
//! fallback coordinates with a lowercase reason attached.

use crate::error::GeolocationError;
use crate::models::{Coordinates, LocationResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Settings passed with every position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    /// The request reports [`GeolocationError::Timeout`] after this long
    pub timeout: Duration,
    /// Zero: cached positions are never accepted
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_millis(8000),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Single-shot device position source
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<Coordinates, GeolocationError>;
}

/// Reads `lat` and `lon` from a page URL's query string.
///
/// Both must be present and parse as finite numbers.
#[must_use]
pub fn read_url_location(page_url: &str) -> Option<Coordinates> {
    let url = Url::parse(page_url).ok()?;
    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.trim().parse::<f64>().ok())
    };

    let coordinates = Coordinates::new(param("lat")?, param("lon")?);
    coordinates.is_finite().then_some(coordinates)
}

/// Service for resolving where the user is
#[derive(Debug, Clone, Default)]
pub struct LocationResolver {
    options: PositionOptions,
}

impl LocationResolver {
    #[must_use]
    pub fn new(options: PositionOptions) -> Self {
        Self { options }
    }

    /// Location carried by a shared link, if any. Skips the device entirely.
    #[must_use]
    pub fn from_link(page_url: &str) -> Option<LocationResult> {
        let coordinates = read_url_location(page_url)?;
        debug!("Using link coordinates {}", coordinates.format_coordinates());
        Some(LocationResult::link(coordinates))
    }

    /// Ask the device once; fall back on any failure. Never retries.
    #[instrument(skip(self, provider))]
    pub async fn locate(&self, provider: Option<&dyn GeolocationProvider>) -> LocationResult {
        let Some(provider) = provider else {
            return Self::fallback(GeolocationError::NotSupported);
        };

        let request = provider.current_position(self.options);
        match tokio::time::timeout(self.options.timeout, request).await {
            Ok(Ok(coordinates)) if coordinates.is_finite() => {
                info!("Device position {}", coordinates.format_coordinates());
                LocationResult::gps(coordinates)
            }
            Ok(Ok(_)) => Self::fallback(GeolocationError::PositionUnavailable(
                "position unavailable".to_string(),
            )),
            Ok(Err(error)) => Self::fallback(error),
            Err(_) => Self::fallback(GeolocationError::Timeout),
        }
    }

    fn fallback(error: GeolocationError) -> LocationResult {
        let reason = error.reason();
        warn!("Falling back to fixed coordinates: {}", reason);
        LocationResult::fallback(reason)
    }
}

#[derive(Debug, Deserialize)]
struct IpLocationResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    reason: Option<String>,
}

/// Position from an IP geolocation endpoint, standing in for device GPS on desktop hosts
#[derive(Debug, Clone)]
pub struct IpGeolocation {
    client: Client,
    url: String,
}

impl IpGeolocation {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("weather-icebreaker/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl GeolocationProvider for IpGeolocation {
    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<Coordinates, GeolocationError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeolocationError::Timeout
                } else {
                    GeolocationError::PositionUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(GeolocationError::PermissionDenied(format!(
                "position request denied ({status})"
            )));
        }
        if !status.is_success() {
            return Err(GeolocationError::PositionUnavailable(format!(
                "position unavailable ({status})"
            )));
        }

        let body: IpLocationResponse = response
            .json()
            .await
            .map_err(|e| GeolocationError::PositionUnavailable(e.to_string()))?;

        match (body.latitude, body.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates::new(latitude, longitude)),
            _ => Err(GeolocationError::PositionUnavailable(
                body.reason
                    .unwrap_or_else(|| "position unavailable".to_string()),
            )),
        }
    }
}
