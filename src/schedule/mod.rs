//! Solar scheduling: locations, events, the astronomical calendar and the scheduler.
//!
//! ## Contents
//! - [`Location`], [`SolarEvent`], [`SolarEventKind`] data model
//! - [`SolarCalendar`] astronomical collaborator, [`SpaCalendar`] default implementation
//! - [`Scheduler`] next-event policies, producing a [`Plan`] per loop iteration

mod event;
mod scheduler;
mod solar;

#[cfg(test)]
pub(crate) mod testing;

pub use event::{Location, SolarEvent, SolarEventKind};
pub use scheduler::{DEFAULT_LOOKAHEAD_DAYS, Plan, ScheduleMode, Scheduler};
pub use solar::{Daylight, SolarCalendar, SpaCalendar};
