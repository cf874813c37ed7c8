//! # tc-exchanges
//!
//! Concrete exchange calendar configurations. Every exchange is plain data
//! (an [`ExchangeCalendarSpec`]) consumed by the generic engine in
//! `tc-sessions`; nothing here contains session logic.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// ICE Futures US.
pub mod iepa;

/// US federal holidays and national days of mourning.
pub mod us_holidays;

/// New York Stock Exchange.
pub mod xnys;

use tc_core::errors::Result;
use tc_sessions::{CalendarRegistry, ExchangeCalendarSpec};
use tc_time::Date;

/// Names of the bundled calendars.
pub const NAMES: [&str; 2] = [iepa::NAME, xnys::NAME];

/// The configuration of the bundled calendar called `name`, if any.
pub fn spec_for(name: &str) -> Option<Result<ExchangeCalendarSpec>> {
    match name {
        iepa::NAME => Some(iepa::spec()),
        xnys::NAME => Some(xnys::spec()),
        _ => None,
    }
}

/// Build every bundled calendar over `[start, end]` into `registry`.
pub fn register_all(registry: &mut CalendarRegistry, start: Date, end: Date) -> Result<()> {
    for spec in [iepa::spec()?, xnys::spec()?] {
        registry.register(spec, start, end)?;
    }
    Ok(())
}
