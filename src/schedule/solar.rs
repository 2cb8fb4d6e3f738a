//! # Astronomical collaborator.
//!
//! [`SolarCalendar`] turns a local calendar date and a [`Location`] into that
//! day's [`Daylight`]. The scheduler never does astronomy itself; it only asks
//! for whole days and compares the answers with the clock.
//!
//! [`SpaCalendar`] is the production implementation backed by the NREL Solar
//! Position Algorithm from the `solar-positioning` crate, using the standard
//! sunrise/sunset horizon (-0.833°) and an estimated ΔT for the date.
//!
//! ## Local days
//! The algorithm works in UT days: whatever zone the input carries, it answers
//! with the sunrise and sunset that fall inside the UTC date of that instant.
//! Far from Greenwich those two belong to different local days (Tokyo's UTC
//! day holds one evening's sunset and the next morning's sunrise). A local day
//! is therefore assembled from the one or two UTC days it overlaps:
//!
//! ```text
//! local date D at offset +09:00
//!   window = [D 00:00+09, D+1 00:00+09) = [D-1 15:00Z, D 15:00Z)
//!   UTC D-1 ─► sunrise 20:57Z ✓ (in window)   sunset 08:44Z ✗
//!   UTC D   ─► sunrise 20:56Z ✗               sunset 08:45Z ✓ (in window)
//! ```

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};
use solar_positioning::{Horizon, SunriseResult, spa, time::DeltaT};

use super::event::{Location, SolarEvent};
use crate::error::ScheduleError;

/// Sun behaviour over one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Daylight {
    /// Sun crosses the horizon twice.
    Regular {
        sunrise: DateTime<Utc>,
        sunset: DateTime<Utc>,
    },
    /// Sun stays above the horizon all day.
    PolarDay,
    /// Sun stays below the horizon all day.
    PolarNight,
}

impl Daylight {
    /// Returns `[sunrise, sunset]` for a regular day, `None` for polar days and nights.
    pub fn events(&self) -> Option<[SolarEvent; 2]> {
        match *self {
            Daylight::Regular { sunrise, sunset } => {
                Some([SolarEvent::sunrise(sunrise), SolarEvent::sunset(sunset)])
            }
            Daylight::PolarDay | Daylight::PolarNight => None,
        }
    }
}

/// Source of sunrise/sunset instants.
///
/// Implementations must be pure: the same `(date, offset, location)` always
/// yields the same answer.
pub trait SolarCalendar: Send + Sync + 'static {
    /// Computes sunrise and sunset of the local calendar `date`, where local
    /// time is UTC shifted by `offset`.
    fn daylight(
        &self,
        date: NaiveDate,
        offset: FixedOffset,
        location: Location,
    ) -> Result<Daylight, ScheduleError>;
}

/// NREL SPA backed calendar.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpaCalendar;

impl SpaCalendar {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Sunrise/sunset of one UTC date.
    fn utc_day(
        &self,
        date: NaiveDate,
        location: Location,
    ) -> Result<SunriseResult<DateTime<Utc>>, ScheduleError> {
        let delta_t = DeltaT::estimate_from_date_like(date).map_err(calendar_error)?;
        spa::sunrise_sunset_for_horizon(
            date.and_time(NaiveTime::MIN).and_utc(),
            location.latitude(),
            location.longitude(),
            delta_t,
            Horizon::SunriseSunset,
        )
        .map_err(calendar_error)
    }
}

impl SolarCalendar for SpaCalendar {
    fn daylight(
        &self,
        date: NaiveDate,
        offset: FixedOffset,
        location: Location,
    ) -> Result<Daylight, ScheduleError> {
        let (start, end) = local_day_window(date, offset);

        let mut sunrise = None;
        let mut sunset = None;
        let mut polar = None;

        let last = (end - TimeDelta::seconds(1)).date_naive();
        let mut day = start.date_naive();
        while day <= last {
            match self.utc_day(day, location)? {
                SunriseResult::RegularDay {
                    sunrise: rise,
                    sunset: set,
                    ..
                } => {
                    if sunrise.is_none() && start <= rise && rise < end {
                        sunrise = Some(rise);
                    }
                    if sunset.is_none() && start <= set && set < end {
                        sunset = Some(set);
                    }
                }
                SunriseResult::AllDay { .. } => {
                    polar.get_or_insert(Daylight::PolarDay);
                }
                SunriseResult::AllNight { .. } => {
                    polar.get_or_insert(Daylight::PolarNight);
                }
            }
            let Some(next) = day.succ_opt() else { break };
            day = next;
        }

        Ok(match (sunrise, sunset, polar) {
            (Some(sunrise), Some(sunset), _) => Daylight::Regular { sunrise, sunset },
            (_, _, Some(polar)) => polar,
            // The sun rises but does not set within this local day.
            (Some(_), None, None) => Daylight::PolarDay,
            (None, _, None) => Daylight::PolarNight,
        })
    }
}

/// `[local midnight, next local midnight)` of `date`, as UTC instants.
fn local_day_window(date: NaiveDate, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = (date.and_time(NaiveTime::MIN)
        - TimeDelta::seconds(i64::from(offset.local_minus_utc())))
    .and_utc();
    (start, start + TimeDelta::days(1))
}

fn calendar_error(e: solar_positioning::Error) -> ScheduleError {
    ScheduleError::Calendar {
        reason: e.to_string(),
    }
}
