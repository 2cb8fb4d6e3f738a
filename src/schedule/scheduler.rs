//! # Scheduler: picks the next solar event(s) to dispatch.
//!
//! Given the current wall-clock time, [`Scheduler`] asks the [`SolarCalendar`]
//! for today's daylight (calendar date taken in the scheduler's timezone) and
//! decides what happens next. It is pure: no sleeping, no I/O beyond the
//! calendar call, no memory of previous answers.
//!
//! ## Policies
//! ```text
//! single (next_event):
//!   today.sunrise > now  ─► (sunrise, today)
//!   today.sunset  > now  ─► (sunset, today)
//!   otherwise            ─► recompute for now + 24h ─► (sunrise, tomorrow)
//!
//! pair (next_pair):
//!   now <= today.sunrise ─► (today.sunrise, today.sunset)
//!   otherwise            ─► recompute for now + 24h ─► (tomorrow.sunrise, tomorrow.sunset)
//! ```
//!
//! Days without a sunrise/sunset (polar day or night) are skipped. After
//! `lookahead_days` calendar days without an answer the scheduler gives up
//! with [`ScheduleError::NoEvent`] and the dispatcher retries later.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local, Offset, TimeDelta, TimeZone, Utc};

use super::event::{Location, SolarEvent};
use super::solar::{Daylight, SolarCalendar};
use crate::error::ScheduleError;

/// Default number of calendar days searched (today and `now + 24h`).
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 2;

/// Which events a dispatch cycle covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ScheduleMode {
    /// Wake at every sunrise and every sunset, one point per wake-up.
    #[default]
    Single,
    /// Wake at sunrise and write both that day's sunrise and sunset points.
    Pair,
}

/// What the dispatcher should do next: wake at `wake_at`, then write `events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub wake_at: DateTime<Utc>,
    pub events: Vec<SolarEvent>,
}

impl Plan {
    fn single(event: SolarEvent) -> Self {
        Self {
            wake_at: event.at,
            events: vec![event],
        }
    }

    fn pair(sunrise: SolarEvent, sunset: SolarEvent) -> Self {
        Self {
            wake_at: sunrise.at,
            events: vec![sunrise, sunset],
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ev) in self.events.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            f.write_str(ev.kind.label())?;
        }
        Ok(())
    }
}

/// Computes upcoming sunrise/sunset instants for one fixed location.
pub struct Scheduler<Tz: TimeZone = Local> {
    location: Location,
    calendar: Arc<dyn SolarCalendar>,
    tz: Tz,
    lookahead_days: u32,
}

impl<Tz: TimeZone> Scheduler<Tz> {
    /// Creates a scheduler that reads calendar dates in `tz`.
    pub fn new(location: Location, calendar: Arc<dyn SolarCalendar>, tz: Tz) -> Self {
        Self {
            location,
            calendar,
            tz,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }

    /// Sets how many calendar days are searched before giving up (min 1).
    #[must_use]
    pub fn with_lookahead(mut self, days: u32) -> Self {
        self.lookahead_days = days.max(1);
        self
    }

    #[inline]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Returns the earliest sunrise or sunset strictly after `now`.
    pub fn next_event(&self, now: DateTime<Utc>) -> Result<SolarEvent, ScheduleError> {
        for offset in 0..self.lookahead_days {
            let Some(events) = self.daylight_after(now, offset)?.events() else {
                continue;
            };
            let next = events
                .into_iter()
                .filter(|ev| ev.at > now)
                .min_by_key(|ev| ev.at);
            if let Some(ev) = next {
                return Ok(ev);
            }
        }
        Err(ScheduleError::NoEvent {
            days: self.lookahead_days,
        })
    }

    /// Returns the next `(sunrise, sunset)` pair whose sunrise is not before `now`.
    ///
    /// The sunset may lie before `now` only if the calendar reports it before
    /// the sunrise; callers fire immediately on any instant that has passed.
    pub fn next_pair(
        &self,
        now: DateTime<Utc>,
    ) -> Result<(SolarEvent, SolarEvent), ScheduleError> {
        for offset in 0..self.lookahead_days {
            let Some([sunrise, sunset]) = self.daylight_after(now, offset)?.events() else {
                continue;
            };
            if now <= sunrise.at {
                return Ok((sunrise, sunset));
            }
        }
        Err(ScheduleError::NoEvent {
            days: self.lookahead_days,
        })
    }

    /// Builds the next [`Plan`] according to `mode`.
    pub fn plan(&self, mode: ScheduleMode, now: DateTime<Utc>) -> Result<Plan, ScheduleError> {
        match mode {
            ScheduleMode::Single => self.next_event(now).map(Plan::single),
            ScheduleMode::Pair => self
                .next_pair(now)
                .map(|(sunrise, sunset)| Plan::pair(sunrise, sunset)),
        }
    }

    /// Daylight for the local calendar date of `now + offset_days * 24h`.
    fn daylight_after(
        &self,
        now: DateTime<Utc>,
        offset_days: u32,
    ) -> Result<Daylight, ScheduleError> {
        let shifted = now + TimeDelta::hours(24 * i64::from(offset_days));
        let local = shifted.with_timezone(&self.tz);
        self.calendar
            .daylight(local.date_naive(), local.offset().fix(), self.location)
    }
}
