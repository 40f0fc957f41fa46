//! Zoned hour-stamps used to line up the forecast and archive series

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use chrono_tz::Tz;

/// Calendar parts of an instant as seen in a fixed time zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl ZonedParts {
    /// Project `instant` into `tz` (24-hour clock)
    #[must_use]
    pub fn at(instant: DateTime<Utc>, tz: Tz) -> Self {
        let local = instant.with_timezone(&tz);
        Self {
            year: local.year(),
            month: local.month(),
            day: local.day(),
            hour: local.hour(),
        }
    }

    /// `YYYY-MM-DD`
    #[must_use]
    pub fn date_stamp(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// `YYYY-MM-DDTHH:00`
    #[must_use]
    pub fn hour_stamp(&self) -> String {
        format!("{}T{:02}:00", self.date_stamp(), self.hour)
    }
}

/// Stamps for one fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchStamps {
    pub now_hour: String,
    pub yesterday_hour: String,
    /// Single-day window for the archive query
    pub yesterday_date: String,
}

impl FetchStamps {
    /// "Yesterday" is the instant 24 hours before `now`, projected into `tz`.
    ///
    /// Across a DST change this can land one wall-clock hour away from today's hour.
    #[must_use]
    pub fn compute(now: DateTime<Utc>, tz: Tz) -> Self {
        let today = ZonedParts::at(now, tz);
        let yesterday = ZonedParts::at(now - Duration::hours(24), tz);

        Self {
            now_hour: today.hour_stamp(),
            yesterday_hour: yesterday.hour_stamp(),
            yesterday_date: yesterday.date_stamp(),
        }
    }
}
