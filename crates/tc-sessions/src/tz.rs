//! Resolution of local wall-clock instants to UTC.
//!
//! Two DST edge cases are resolved deterministically:
//!
//! * **Non-existent** local times (inside a spring-forward gap) move forward
//!   to the transition that ends the gap. 02:30 on the US spring-forward
//!   Sunday becomes 03:00 daylight time.
//! * **Ambiguous** local times (inside a fall-back overlap) resolve to the
//!   earlier of the two instants.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use tc_core::errors::{Error, Result};
use tc_core::fail;
use tc_time::{Date, LocalTime};

/// Half-width, in seconds, of the UTC interval searched for the end of a
/// gap. Exceeds any UTC offset plus any skipped span.
const GAP_SEARCH_SECONDS: i64 = 26 * 3600;

/// Parse an IANA timezone name.
pub fn timezone_from_name(name: &str) -> Result<Tz> {
    Tz::from_str(name).map_err(|_| Error::UnknownTimezone(name.to_string()))
}

/// The civil day `days` after `date`. Not limited to the `Date` range, so a
/// session at the edge of that range can anchor its open or close on a day
/// just outside it.
pub fn anchor_day(date: Date, days: i32) -> Result<NaiveDate> {
    date.to_naive()
        .checked_add_signed(Duration::days(days.into()))
        .ok_or_else(|| Error::Date(format!("{date} {days:+} days is not representable")))
}

/// Convert `time` on `day`, read as wall-clock time in `tz`, to UTC.
pub fn resolve_local(tz: &Tz, day: NaiveDate, time: LocalTime) -> Result<DateTime<Utc>> {
    let local = day.and_time(time.to_naive());
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(a, b) => Ok(a.with_timezone(&Utc).min(b.with_timezone(&Utc))),
        LocalResult::None => gap_end(tz, local),
    }
}

/// First instant whose wall-clock reading in `tz` is at or after `local`.
/// For a `local` inside a gap this is the transition itself, to the second.
fn gap_end(tz: &Tz, local: NaiveDateTime) -> Result<DateTime<Utc>> {
    let target = local.and_utc().timestamp();
    // wall(lo) < local <= wall(hi)
    let (mut lo, mut hi) = (target - GAP_SEARCH_SECONDS, target + GAP_SEARCH_SECONDS);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if wall_clock(tz, mid)? >= local {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    instant(hi)
}

fn wall_clock(tz: &Tz, secs: i64) -> Result<NaiveDateTime> {
    Ok(instant(secs)?.with_timezone(tz).naive_local())
}

fn instant(secs: i64) -> Result<DateTime<Utc>> {
    match DateTime::from_timestamp(secs, 0) {
        Some(dt) => Ok(dt),
        None => fail!("timestamp {secs} is outside the representable range"),
    }
}
