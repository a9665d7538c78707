//! # Civil time handling
//!
//! The engine works in a single fixed civil timezone, Europe/Riga, regardless
//! of the host timezone. Wall-clock times cross the system boundary as
//! "HH:MM" (or "HH:MM:SS") strings and are carried internally as
//! [`TimeOfDay`], a minute-precision offset from midnight. Parsing happens at
//! write time; slot computation never touches strings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use chrono_tz::Europe::Riga;
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::errors::{EngineError, EngineResult};

/// Number of minutes in a civil day; `TimeOfDay` values are strictly below it.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time with minute precision, stored as minutes since midnight.
///
/// Formatting is zero-padded "HH:MM", so lexicographically sorted output is
/// also chronologically sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Builds a time from a minutes-since-midnight count.
    pub fn from_minutes(minutes: u16) -> EngineResult<Self> {
        if minutes >= MINUTES_PER_DAY {
            return Err(EngineError::Validation(format!(
                "minute-of-day out of range: {minutes}"
            )));
        }
        Ok(TimeOfDay(minutes))
    }

    /// Parses "HH:MM" or "HH:MM:SS"; seconds are validated and truncated.
    pub fn parse(value: &str) -> EngineResult<Self> {
        let mut parts = value.split(':');
        let (hour, minute, seconds) = match (parts.next(), parts.next(), parts.next(), parts.next())
        {
            (Some(h), Some(m), s, None) => (h, m, s),
            _ => return Err(invalid_time(value)),
        };

        let hour: u16 = hour.parse().map_err(|_| invalid_time(value))?;
        let minute: u16 = minute.parse().map_err(|_| invalid_time(value))?;
        if hour > 23 || minute > 59 {
            return Err(invalid_time(value));
        }
        if let Some(seconds) = seconds {
            let seconds: u16 = seconds.parse().map_err(|_| invalid_time(value))?;
            if seconds > 59 {
                return Err(invalid_time(value));
            }
        }

        Ok(TimeOfDay(hour * 60 + minute))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Adds a duration, returning `None` when the result would leave the day.
    pub fn add_minutes(self, minutes: u16) -> Option<TimeOfDay> {
        let total = self.0.checked_add(minutes)?;
        if total >= MINUTES_PER_DAY {
            return None;
        }
        Some(TimeOfDay(total))
    }
}

fn invalid_time(value: &str) -> EngineError {
    EngineError::Validation(format!("invalid time of day: {value:?}"))
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TimeOfDay::parse(value)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        TimeOfDay::parse(&value).map_err(de::Error::custom)
    }
}

/// The current instant on the Riga civil clock.
pub fn riga_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&Riga)
}

/// Truncates an instant to its minute of day.
pub fn civil_minute<T: Timelike>(instant: &T) -> TimeOfDay {
    TimeOfDay((instant.hour() * 60 + instant.minute()) as u16)
}

/// Weekday index in the 0 = Sunday .. 6 = Saturday convention used by the
/// weekly schedule rows.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}
