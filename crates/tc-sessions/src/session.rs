//! `Session` — the generated unit of a trading calendar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tc_time::Date;

/// One trading session.
///
/// `session_date` is the nominal trading date. For exchanges whose session
/// opens the evening before, `open_utc` falls on the preceding calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Session {
    /// The nominal trading date.
    pub session_date: Date,
    /// Absolute open instant.
    pub open_utc: DateTime<Utc>,
    /// Absolute close instant; always after `open_utc`.
    pub close_utc: DateTime<Utc>,
}

impl Session {
    /// Return `true` if `instant` lies in `[open_utc, close_utc)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.open_utc && instant < self.close_utc
    }

    /// Session length in whole minutes.
    pub fn minutes(&self) -> i64 {
        (self.close_utc - self.open_utc).num_minutes()
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{} – {})",
            self.session_date,
            self.open_utc.format("%Y-%m-%d %H:%M UTC"),
            self.close_utc.format("%Y-%m-%d %H:%M UTC")
        )
    }
}
