//! Deterministic calendar for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{FixedOffset, NaiveDate, NaiveTime};

use super::event::Location;
use super::solar::{Daylight, SolarCalendar};
use crate::error::ScheduleError;

/// Sunrise at 06:00Z and sunset at 18:00Z on every date, unless overridden.
#[derive(Default)]
pub(crate) struct FixedCalendar {
    overrides: HashMap<NaiveDate, Daylight>,
    requested: Mutex<Vec<(NaiveDate, FixedOffset)>>,
}

impl FixedCalendar {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn polar_day(mut self, date: NaiveDate) -> Self {
        self.overrides.insert(date, Daylight::PolarDay);
        self
    }

    pub(crate) fn polar_night(mut self, date: NaiveDate) -> Self {
        self.overrides.insert(date, Daylight::PolarNight);
        self
    }

    /// Dates (with the caller's offset) asked for so far, in call order.
    pub(crate) fn requested(&self) -> Vec<(NaiveDate, FixedOffset)> {
        self.requested.lock().unwrap().clone()
    }
}

impl SolarCalendar for FixedCalendar {
    fn daylight(
        &self,
        date: NaiveDate,
        offset: FixedOffset,
        _location: Location,
    ) -> Result<Daylight, ScheduleError> {
        self.requested.lock().unwrap().push((date, offset));
        if let Some(day) = self.overrides.get(&date) {
            return Ok(*day);
        }
        let hm = |h| date.and_time(NaiveTime::from_hms_opt(h, 0, 0).unwrap()).and_utc();
        Ok(Daylight::Regular {
            sunrise: hm(6),
            sunset: hm(18),
        })
    }
}
