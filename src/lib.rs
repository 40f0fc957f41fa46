//! Weather icebreaker
//!
//! Finds out where the user is, compares the weather right now with the same
//! hour yesterday, and turns it into a short summary plus a few lines of small
//! talk. Hosts plug in their own display, geolocation and clipboard.

pub mod config;
pub mod display;
pub mod error;
pub mod format;
pub mod icebreaker;
pub mod location_resolver;
pub mod models;
pub mod share;
pub mod weather;
pub mod widget;

// Re-export core types for public API
pub use config::IcebreakerConfig;
pub use display::{Control, DisplaySink, Field, MemoryDisplay, VisualState};
pub use error::{GeolocationError, WidgetError};
pub use icebreaker::Icebreaker;
pub use location_resolver::{GeolocationProvider, IpGeolocation, LocationResolver, PositionOptions};
pub use models::{Coordinates, LocationResult, LocationSource, WeatherReading, WeatherSnapshot};
pub use share::Clipboard;
pub use weather::{WeatherFetcher, WeatherSource};
pub use widget::{Widget, WidgetState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WidgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
