//! `LocalTime` — a wall-clock time of day with minute resolution.
//!
//! A `LocalTime` carries no date and no timezone; it is a template such as
//! "20:01" that becomes an absolute instant only once it is anchored to a
//! [`Date`](crate::Date) and resolved through an exchange timezone.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use tc_core::errors::{Error, Result};

/// Hour and minute of a wall-clock time.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalTime {
    hour: u8,
    minute: u8,
}

impl LocalTime {
    /// Create a time, validating `hour < 24` and `minute < 60`.
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidArgument(format!(
                "invalid local time {hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Const constructor for literal configuration data.
    ///
    /// # Panics
    /// Panics (at compile time in const contexts) if the time is invalid.
    pub const fn hm(hour: u8, minute: u8) -> Self {
        assert!(hour < 24 && minute < 60, "invalid local time");
        Self { hour, minute }
    }

    /// Hour of the day (0–23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute of the hour (0–59).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }

    /// Convert to a `chrono::NaiveTime`.
    pub fn to_naive(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl std::fmt::Display for LocalTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl std::fmt::Debug for LocalTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocalTime({self})")
    }
}

impl FromStr for LocalTime {
    type Err = Error;

    /// Parse `HH:MM`.
    fn from_str(s: &str) -> Result<Self> {
        let (h, m) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| Error::InvalidArgument(format!("expected HH:MM, got {s:?}")))?;
        let hour = h
            .parse::<u8>()
            .map_err(|_| Error::InvalidArgument(format!("bad hour in {s:?}")))?;
        let minute = m
            .parse::<u8>()
            .map_err(|_| Error::InvalidArgument(format!("bad minute in {s:?}")))?;
        Self::new(hour, minute)
    }
}

impl Serialize for LocalTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocalTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
