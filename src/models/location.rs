//! Location model: coordinates and where they came from

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinates used when nothing better is available (Stockholm)
pub const FALLBACK_COORDINATES: Coordinates = Coordinates {
    latitude: 59.3293,
    longitude: 18.0686,
};

/// Location coordinates
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite numbers
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Where a resolved location came from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Gps,
    Fallback,
    Link,
}

impl LocationSource {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            LocationSource::Gps => "GPS",
            LocationSource::Fallback => "fallback",
            LocationSource::Link => "link",
        }
    }
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one resolution attempt. Immutable once produced.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationResult {
    pub coordinates: Coordinates,
    pub source: LocationSource,
    /// Lowercase description of why the fallback was used
    pub error_reason: Option<String>,
}

impl LocationResult {
    #[must_use]
    pub fn gps(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            source: LocationSource::Gps,
            error_reason: None,
        }
    }

    #[must_use]
    pub fn link(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            source: LocationSource::Link,
            error_reason: None,
        }
    }

    /// Fallback coordinates annotated with the reason a better source failed
    #[must_use]
    pub fn fallback<S: Into<String>>(reason: S) -> Self {
        Self {
            coordinates: FALLBACK_COORDINATES,
            source: LocationSource::Fallback,
            error_reason: Some(reason.into()),
        }
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.coordinates.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.coordinates.longitude
    }
}
