//! Error types and handling for the weather icebreaker widget

use thiserror::Error;

/// Main error type for the widget
#[derive(Error, Debug)]
pub enum WidgetError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// One of the two weather requests answered with a non-success status
    #[error("weather request failed")]
    WeatherRequestFailed { status: u16 },

    /// The zoned hour-stamp is missing from an hourly series
    #[error("hour not found")]
    HourNotFound { stamp: String },

    /// Transport-level failure talking to a remote endpoint
    #[error("network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// A response body that could not be decoded
    #[error("invalid weather response: {message}")]
    Parse { message: String },

    /// Writing the share link to the clipboard failed
    #[error("copy failed")]
    Clipboard { message: String },
}

impl WidgetError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new clipboard error
    pub fn clipboard<S: Into<String>>(message: S) -> Self {
        Self::Clipboard {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WidgetError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            WidgetError::WeatherRequestFailed { .. } | WidgetError::Network { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            WidgetError::HourNotFound { .. } | WidgetError::Parse { .. } => {
                "The weather service sent data we could not use.".to_string()
            }
            WidgetError::Clipboard { .. } => "Could not copy the link.".to_string(),
        }
    }
}

/// Failures of a device position request.
///
/// These never escape the resolver: each one turns into a fallback location
/// annotated with [`GeolocationError::reason`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("geolocation not supported")]
    NotSupported,

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    PositionUnavailable(String),

    #[error("timeout expired")]
    Timeout,
}

impl GeolocationError {
    /// Lowercase reason shown next to the fallback coordinates
    #[must_use]
    pub fn reason(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "location denied".to_string()
        } else {
            message.to_lowercase()
        }
    }
}
