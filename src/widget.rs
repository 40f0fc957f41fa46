//! The widget: owns the state record and drives resolver, fetcher and display.
//!
//! Every weather fetch carries a request token. Only the completion matching the
//! most recent token is applied, so a slow response for an old location can never
//! overwrite a newer one.

use crate::Result;
use crate::display::{Control, DisplaySink, Field, VisualState};
use crate::format::{self, ReceiptLines};
use crate::icebreaker::Icebreaker;
use crate::location_resolver::{GeolocationProvider, LocationResolver};
use crate::models::{Coordinates, LocationResult, WeatherReading, WeatherSnapshot};
use crate::share::{self, Clipboard};
use crate::weather::WeatherSource;
use chrono::{DateTime, Utc};
use rand::RngExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long a pressed button keeps its pressed style
pub const PRESS_DURATION: Duration = Duration::from_millis(150);

/// Everything the widget knows at a given moment
#[derive(Debug, Clone, Default)]
pub struct WidgetState {
    pub location: Option<LocationResult>,
    /// A device position request is in flight
    pub locating: bool,
    pub weather_loading: bool,
    /// Message of the last failed fetch or copy
    pub weather_error: Option<String>,
    pub last_weather: Option<WeatherSnapshot>,
    latest_token: u64,
}

impl WidgetState {
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.location.as_ref().map(|location| location.coordinates)
    }
}

/// A fetch that has been started but not yet applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchTicket {
    pub token: u64,
    pub coordinates: Coordinates,
    pub now: DateTime<Utc>,
}

pub struct Widget<D, R> {
    state: WidgetState,
    display: D,
    rng: R,
    weather: Arc<dyn WeatherSource>,
    resolver: LocationResolver,
    page_url: String,
    clock: fn() -> DateTime<Utc>,
}

impl<D: DisplaySink, R: RngExt> Widget<D, R> {
    pub fn new(
        display: D,
        rng: R,
        weather: Arc<dyn WeatherSource>,
        resolver: LocationResolver,
        page_url: impl Into<String>,
    ) -> Self {
        let mut widget = Self {
            state: WidgetState::default(),
            display,
            rng,
            weather,
            resolver,
            page_url: page_url.into(),
            clock: Utc::now,
        };
        widget.set_locating(false);
        widget.render_status();
        widget
    }

    /// Replace the source of "now" used for hour alignment
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    #[must_use]
    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_display(self) -> D {
        self.display
    }

    /// Page load: a link carrying `lat`/`lon` is used straight away.
    ///
    /// Returns whether a location was applied.
    pub async fn start(&mut self) -> bool {
        match LocationResolver::from_link(&self.page_url) {
            Some(result) => {
                self.set_location(result).await;
                true
            }
            None => false,
        }
    }

    /// The "use my location" trigger. Ignored while a request is already in flight.
    pub async fn use_my_location(&mut self, provider: Option<&dyn GeolocationProvider>) {
        if self.state.locating {
            debug!("Location request already in flight");
            return;
        }

        self.set_locating(true);
        self.render_status();

        let result = self.resolver.locate(provider).await;

        self.set_locating(false);
        self.set_location(result).await;
    }

    /// Record a resolved location and fetch weather for it
    pub async fn set_location(&mut self, result: LocationResult) {
        info!(
            "Location set to {} ({})",
            result.coordinates.format_coordinates(),
            result.source
        );
        self.state.location = Some(result);
        self.render_status();
        self.refresh_weather().await;
    }

    /// Fetch and apply weather for the current location, if there is one
    pub async fn refresh_weather(&mut self) {
        let Some(ticket) = self.begin_fetch() else {
            return;
        };
        let result = self.weather.fetch(ticket.coordinates, ticket.now).await;
        self.complete_fetch(ticket, result);
    }

    /// Start a fetch: issue a fresh token and show the loading state
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let coordinates = self.state.coordinates()?;

        self.state.latest_token += 1;
        self.state.weather_error = None;
        self.set_weather_loading(true);

        Some(FetchTicket {
            token: self.state.latest_token,
            coordinates,
            now: (self.clock)(),
        })
    }

    /// Apply a finished fetch. Returns `false` when the ticket is stale and was discarded.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<WeatherReading>) -> bool {
        if ticket.token != self.state.latest_token {
            debug!(
                "Discarding weather for token {} (latest is {})",
                ticket.token, self.state.latest_token
            );
            return false;
        }

        match result {
            Ok(reading) => self.update_receipt(&reading),
            Err(error) => {
                warn!("Weather fetch failed: {}", error);
                self.set_weather_error(error.to_string());
            }
        }
        self.set_weather_loading(false);
        true
    }

    /// New icebreaker lines for the latest snapshot. No-op until one exists.
    pub fn regenerate_icebreakers(&mut self) -> bool {
        if self.state.last_weather.is_none() {
            return false;
        }
        self.update_icebreakers();
        true
    }

    /// The page URL with the current coordinates embedded
    pub fn share_link(&self) -> Result<String> {
        share::share_url(&self.page_url, self.state.coordinates())
    }

    /// Copy the share link. Success shows the toast; failure shows the weather error.
    pub async fn copy_share_link(&mut self, clipboard: &dyn Clipboard) -> bool {
        let copied = match self.share_link() {
            Ok(link) => clipboard.write_text(&link).await,
            Err(error) => Err(error),
        };

        match copied {
            Ok(()) => {
                self.display.set_state(VisualState::Toast, true);
                true
            }
            Err(error) => {
                warn!("Copy failed: {}", error);
                self.set_weather_error("copy failed".to_string());
                false
            }
        }
    }

    pub fn hide_toast(&mut self) {
        self.display.set_state(VisualState::Toast, false);
    }

    /// Short pressed flash on a control
    pub async fn press(&mut self, control: Control) {
        self.display.set_state(VisualState::Pressed(control), true);
        tokio::time::sleep(PRESS_DURATION).await;
        self.display.set_state(VisualState::Pressed(control), false);
    }

    fn set_locating(&mut self, locating: bool) {
        self.state.locating = locating;
        self.display.set_state(VisualState::Locating, locating);
        self.display.set_state(VisualState::LocationDisabled, locating);
        let label = if locating {
            format::LOCATING
        } else {
            format::USE_MY_LOCATION
        };
        self.display.set_text(Field::LocationButton, label);
    }

    fn render_status(&mut self) {
        let has_error = self
            .state
            .location
            .as_ref()
            .is_some_and(|location| location.error_reason.is_some());
        self.display
            .set_state(VisualState::LocationError, has_error && !self.state.locating);
        let line = format::status_line(self.state.locating, self.state.location.as_ref());
        self.display.set_text(Field::LocationStatus, &line);
    }

    fn set_weather_loading(&mut self, loading: bool) {
        self.state.weather_loading = loading;
        self.display.set_state(VisualState::WeatherLoading, loading);
        if loading {
            for field in Field::WEATHER {
                self.display.set_text(field, format::LOADING);
            }
        }
    }

    fn set_weather_error(&mut self, message: String) {
        self.state.weather_error = Some(message);
        self.display.set_state(VisualState::WeatherError, true);
        for field in Field::WEATHER {
            self.display.set_text(field, format::PLACEHOLDER);
        }
        self.display.set_text(Field::Summary, format::WEATHER_UNAVAILABLE);
    }

    fn update_receipt(&mut self, reading: &WeatherReading) {
        let lines = ReceiptLines::render(&reading.snapshot, &reading.units);
        self.display.set_state(VisualState::WeatherError, false);
        self.display.set_text(Field::TempNow, &lines.temp_now);
        self.display.set_text(Field::TempYesterday, &lines.temp_yesterday);
        self.display.set_text(Field::TempDelta, &lines.temp_delta);
        self.display.set_text(Field::WindNow, &lines.wind_now);
        self.display.set_text(Field::RainNow, &lines.rain_now);
        self.display.set_text(Field::Summary, &lines.summary);

        self.state.last_weather = Some(reading.snapshot);
        self.update_icebreakers();
    }

    fn update_icebreakers(&mut self) {
        let icebreaker = Icebreaker::pick(&mut self.rng);
        self.display.set_text(Field::Say, icebreaker.say);
        self.display.set_text(Field::Ask, icebreaker.ask);
        self.display.set_text(Field::Twist, icebreaker.twist);
        self.display.set_text(Field::SaySub, "");
        self.display.set_text(Field::AskSub, "");
        self.display.set_text(Field::TwistSub, "");
    }
}
