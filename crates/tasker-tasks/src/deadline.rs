//! Deadlines and the time-until-due derivation.
//!
//! A [`Deadline`] is a local wall-clock date-time with no zone attached. It
//! remembers whether the user gave a time or only a date so it can be written
//! back in the same form (`2024-06-01` vs `2024-06-01T09:00`). Date-only
//! deadlines order as midnight of that day.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::TaskError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const SECOND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const FRACTION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_TIME_FORMATS: &[&str] = &[
    MINUTE_FORMAT,
    SECOND_FORMAT,
    FRACTION_FORMAT,
    "%Y-%m-%d %H:%M",
];
const DISPLAY_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

const MS_PER_MINUTE: u64 = 60 * 1000;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// A task deadline in local wall-clock time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline {
    at: NaiveDateTime,
    has_time: bool,
}

impl Deadline {
    /// A deadline at a specific date and time.
    pub fn with_time(at: NaiveDateTime) -> Self {
        Self { at, has_time: true }
    }

    /// A deadline with only a date; it falls due at midnight.
    pub fn date_only(date: NaiveDate) -> Self {
        Self {
            at: date.and_time(chrono::NaiveTime::MIN),
            has_time: false,
        }
    }

    /// The instant this deadline falls due.
    pub fn datetime(&self) -> NaiveDateTime {
        self.at
    }

    /// Whether a time of day was given.
    pub fn has_time(&self) -> bool {
        self.has_time
    }

    /// Advance by whole calendar days, keeping the time of day.
    ///
    /// Month and year boundaries roll over by calendar rules, so
    /// `2024-01-31` plus one day is `2024-02-01`. `None` on overflow.
    pub fn checked_add_days(self, days: u64) -> Option<Self> {
        let at = self.at.checked_add_days(Days::new(days))?;
        Some(Self { at, ..self })
    }
}

impl FromStr for Deadline {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
            return Ok(Self::date_only(date));
        }
        for format in DATE_TIME_FORMATS {
            if let Ok(at) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self::with_time(at));
            }
        }
        // Zoned timestamps are pinned to this machine's wall clock.
        if let Ok(zoned) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::with_time(zoned.with_timezone(&Local).naive_local()));
        }
        Err(TaskError::InvalidDeadline(s.to_string()))
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = if !self.has_time {
            DATE_FORMAT
        } else if self.at.nanosecond() != 0 {
            FRACTION_FORMAT
        } else if self.at.second() == 0 {
            MINUTE_FORMAT
        } else {
            SECOND_FORMAT
        };
        write!(f, "{}", self.at.format(format))
    }
}

impl Serialize for Deadline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Deadline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Due distance
// ─────────────────────────────────────────────────────────────────────────────

/// Unit the magnitude of a [`DueDistance`] is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DueUnit {
    /// Under an hour.
    Minute,
    /// Under a day.
    Hour,
    /// A day or more.
    Day,
}

impl DueUnit {
    fn label(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
        }
    }
}

/// Signed distance from "now" to a deadline.
///
/// `delta` is `deadline - now`: positive while the deadline is ahead,
/// negative once it has passed. `amount` is the floored magnitude in `unit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DueDistance {
    /// Exact signed difference.
    pub delta: TimeDelta,
    /// Floored magnitude.
    pub amount: u64,
    /// Unit of `amount`.
    pub unit: DueUnit,
}

impl DueDistance {
    /// Distance from `now` to `deadline`.
    pub fn between(deadline: &Deadline, now: NaiveDateTime) -> Self {
        Self::from_delta(deadline.datetime().signed_duration_since(now))
    }

    /// Bucket a signed difference into minutes, hours, or days.
    pub fn from_delta(delta: TimeDelta) -> Self {
        let abs_ms = delta.num_milliseconds().unsigned_abs();
        let (amount, unit) = if abs_ms / MS_PER_MINUTE < 60 {
            (abs_ms / MS_PER_MINUTE, DueUnit::Minute)
        } else if abs_ms / MS_PER_HOUR < 24 {
            (abs_ms / MS_PER_HOUR, DueUnit::Hour)
        } else {
            (abs_ms / MS_PER_DAY, DueUnit::Day)
        };
        Self { delta, amount, unit }
    }

    /// The deadline is still ahead of now.
    pub fn is_ahead(&self) -> bool {
        self.delta > TimeDelta::zero()
    }

    /// The deadline has passed.
    pub fn is_behind(&self) -> bool {
        self.delta < TimeDelta::zero()
    }
}

impl fmt::Display for DueDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.amount == 1 { "" } else { "s" };
        write!(f, "{} {}{plural}", self.amount, self.unit.label())
    }
}

/// Human-readable deadline line for a task, e.g.
/// `Jan 31, 2024, 9:00 AM (due in 3 hours)`.
pub fn describe_deadline(deadline: Option<&Deadline>, done: bool, now: NaiveDateTime) -> String {
    let Some(deadline) = deadline else {
        return "No deadline".to_string();
    };
    let distance = DueDistance::between(deadline, now);
    let when = deadline.datetime().format(DISPLAY_FORMAT);

    let phrase = match (done, distance.is_ahead(), distance.is_behind()) {
        (false, true, _) => format!("due in {distance}"),
        (false, false, _) => format!("{distance} overdue"),
        (true, _, true) => format!("was due {distance} ago"),
        (true, _, false) => format!("was due in {distance}"),
    };
    format!("{when} ({phrase})")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
