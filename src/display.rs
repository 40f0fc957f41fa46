//! Display surface the widget renders into.
//!
//! The widget only ever sets the text of a named field or flips a named
//! visual state; hosts decide what that looks like.

use std::collections::{HashMap, HashSet};

/// Text slots on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    TempNow,
    TempYesterday,
    TempDelta,
    WindNow,
    RainNow,
    Summary,
    Say,
    Ask,
    Twist,
    SaySub,
    AskSub,
    TwistSub,
    /// Status line under the location button
    LocationStatus,
    /// Label of the location button
    LocationButton,
}

impl Field {
    /// Fields that show weather values, in page order
    pub const WEATHER: [Field; 6] = [
        Field::TempNow,
        Field::TempYesterday,
        Field::TempDelta,
        Field::WindNow,
        Field::RainNow,
        Field::Summary,
    ];
}

/// Buttons that get a short "pressed" flash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    UseLocation,
    Regenerate,
    CopyShare,
}

/// Toggleable visual states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualState {
    /// Location button shows its busy style
    Locating,
    /// Location button does not accept clicks
    LocationDisabled,
    /// Status line shows a fallback reason
    LocationError,
    WeatherLoading,
    WeatherError,
    /// "Link copied" toast is visible
    Toast,
    Pressed(Control),
}

/// Sink for everything the widget shows
pub trait DisplaySink {
    fn set_text(&mut self, field: Field, text: &str);
    fn set_state(&mut self, state: VisualState, on: bool);
}

/// In-memory surface; used by the terminal host and by tests
#[derive(Debug, Default, Clone)]
pub struct MemoryDisplay {
    texts: HashMap<Field, String>,
    states: HashSet<VisualState>,
}

impl MemoryDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(&self, field: Field) -> Option<&str> {
        self.texts.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_on(&self, state: VisualState) -> bool {
        self.states.contains(&state)
    }
}

impl DisplaySink for MemoryDisplay {
    fn set_text(&mut self, field: Field, text: &str) {
        self.texts.insert(field, text.to_string());
    }

    fn set_state(&mut self, state: VisualState, on: bool) {
        if on {
            self.states.insert(state);
        } else {
            self.states.remove(&state);
        }
    }
}
