//! `DateWindow` — a half-open `[start, end)` range of dates with optional
//! bounds, used to scope time-of-day schedules and special-session rules.

use crate::date::Date;
use serde::{Deserialize, Serialize};
use tc_core::errors::{Error, Result};

/// A half-open validity window `[start, end)`.
///
/// A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    /// First date inside the window, if bounded below.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Date>,
    /// First date *after* the window, if bounded above.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Date>,
}

impl DateWindow {
    /// A window covering every date.
    pub const ALL: DateWindow = DateWindow {
        start: None,
        end: None,
    };

    /// `[start, end)`. Fails if `start >= end`.
    pub fn between(start: Date, end: Date) -> Result<Self> {
        if start >= end {
            return Err(Error::InvalidArgument(format!(
                "empty window [{start}, {end})"
            )));
        }
        Ok(Self {
            start: Some(start),
            end: Some(end),
        })
    }

    /// `[start, ∞)`.
    pub fn from(start: Date) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// `(-∞, end)`.
    pub fn until(end: Date) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// Return `true` if `date` lies inside the window.
    pub fn contains(&self, date: Date) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date < e)
    }

    /// Return `true` if the window is bounded on neither side.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.start, self.end) {
            (Some(s), Some(e)) => write!(f, "[{s}, {e})"),
            (Some(s), None) => write!(f, "[{s}, ..)"),
            (None, Some(e)) => write!(f, "(.., {e})"),
            (None, None) => write!(f, "(..)"),
        }
    }
}
