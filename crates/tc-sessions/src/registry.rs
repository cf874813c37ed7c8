//! `CalendarRegistry` — a name → calendar lookup table owned by the caller.
//!
//! There is no process-wide registry: applications create one, register the
//! calendars they need, and pass it to whatever needs lookups.

use crate::calendar::ExchangeCalendar;
use crate::spec::ExchangeCalendarSpec;
use std::collections::HashMap;
use std::sync::Arc;
use tc_core::errors::{Error, Result};
use tc_time::Date;

/// Calendars keyed by name.
#[derive(Debug, Clone, Default)]
pub struct CalendarRegistry {
    calendars: HashMap<String, Arc<ExchangeCalendar>>,
}

impl CalendarRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a calendar for `spec` over `[start, end]` and register it under
    /// the configuration's name.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if the name is taken; any build error.
    pub fn register(
        &mut self,
        spec: ExchangeCalendarSpec,
        start: Date,
        end: Date,
    ) -> Result<Arc<ExchangeCalendar>> {
        if self.contains(&spec.name) {
            return Err(Error::InvalidArgument(format!(
                "calendar {} is already registered",
                spec.name
            )));
        }
        let calendar = ExchangeCalendar::new(spec, start, end)?;
        Ok(self.insert(calendar))
    }

    /// Register an already built calendar, replacing any calendar with the
    /// same name. Returns the registered handle.
    pub fn insert(&mut self, calendar: ExchangeCalendar) -> Arc<ExchangeCalendar> {
        let calendar = Arc::new(calendar);
        self.calendars
            .insert(calendar.name().to_string(), Arc::clone(&calendar));
        calendar
    }

    /// Look up a calendar by name.
    pub fn get(&self, name: &str) -> Option<Arc<ExchangeCalendar>> {
        self.calendars.get(name).cloned()
    }

    /// Return `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.calendars.contains_key(name)
    }

    /// Remove a calendar, returning it if it was registered.
    pub fn remove(&mut self, name: &str) -> Option<Arc<ExchangeCalendar>> {
        self.calendars.remove(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.calendars.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered calendars.
    pub fn len(&self) -> usize {
        self.calendars.len()
    }

    /// Return `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.calendars.is_empty()
    }
}
