//! Data models for the weather icebreaker widget
//!
//! This module contains the core domain models organized by concern:
//! - Location: coordinates and the source they were resolved from
//! - Weather: hourly series and the snapshot aligned from them

pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinates, FALLBACK_COORDINATES, LocationResult, LocationSource};
pub use weather::{DisplayUnits, HourlySeries, WeatherReading, WeatherSnapshot};
