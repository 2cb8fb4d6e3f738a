//! # influx-daylight
//!
//! **influx-daylight** records the daily sunrise and sunset of a fixed location
//! into a time-series or dashboard backend.
//!
//! It computes the next solar event for the configured coordinates, sleeps
//! until it happens, and writes one marker per event: either an annotation
//! (`POST /api/annotations`) or a `daylight value=1|0` point
//! (`POST /write?db=..&precision=s`). The loop runs until SIGINT or SIGTERM.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    Config    │   │ SolarCalendar│   │     Sink     │
//!     │ (flags, env) │   │ (SPA or fake)│   │ (annotation/ │
//!     └──────┬───────┘   └──────┬───────┘   │   points)    │
//!            ▼                  ▼           └──────┬───────┘
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Service (runtime owner)                                          │
//! │  - Bus (broadcast events)                                         │
//! │  - SubscriberSet (fans out to user subscribers)                   │
//! │  - signal watcher (SIGINT/SIGTERM → cancel)                       │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        ▼
//!     ┌────────────────────────────────────────────┐
//!     │  Dispatcher (state machine)                │
//!     │  Idle → Waiting → Firing → CoolingDown     │
//!     │     ↘ Deferred (nothing schedulable)       │
//!     └┬───────────────────────────────────────────┘
//!      │ Publishes: PlanScheduled, Inserting,
//!      │ WriteSucceeded, WriteFailed, CooldownStarted, ...
//!      ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                   (capacity: Config::bus_capacity)                │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │
//!                       │      (in Service)      │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                            (per-sub queues)
//!                         ┌─────────┼─────────┐
//!                         ▼         ▼         ▼
//!                     LogWriter  worker2   workerN
//! ```
//!
//! ### One cycle
//! ```text
//! now = clock.now()
//! plan = scheduler.plan(mode, now)
//!   ├─ Single: first sunrise/sunset strictly after now
//!   └─ Pair:   next (sunrise, sunset) with now <= sunrise; wake at sunrise
//! sleep until plan.wake_at (cancellable)
//! sink.write(Batch::for_events(db, plan.events))
//!   ├─ Ok  ─► WriteSucceeded
//!   └─ Err ─► WriteFailed (logged, loop continues)
//! pair mode: cooldown (cancellable), then next cycle
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                          |
//! |-------------------|----------------------------------------------------------|---------------------------------------------|
//! | **Scheduling**    | Next sunrise/sunset from coordinates and a date.         | [`Scheduler`], [`SolarCalendar`], [`Plan`]  |
//! | **Sinks**         | Annotation or line-protocol writes over HTTP.            | [`Sink`], [`AnnotationSink`], [`LineProtocolSink`] |
//! | **Runtime**       | Signal-aware dispatch loop.                              | [`Service`], [`Dispatcher`]                 |
//! | **Subscriber API**| Hook into runtime events (logging, custom subscribers).  | [`Subscribe`], [`LogWriter`]                |
//! | **Errors**        | Typed errors for configuration, sinks and scheduling.    | [`ConfigError`], [`SinkError`]              |
//! | **Configuration** | Centralize runtime settings.                             | [`Config`], [`SinkSettings`]                |
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use influx_daylight::{Config, LogWriter, ScheduleMode, Service, SinkKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.latitude = 48.137;
//!     cfg.longitude = 11.575;
//!     cfg.mode = ScheduleMode::Pair;
//!     cfg.sink.kind = SinkKind::Points;
//!
//!     Service::builder(cfg)
//!         .with_subscribers(vec![Arc::new(LogWriter::new())])
//!         .build()?
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod schedule;
mod sink;
mod subscribers;

// ---- Public re-exports ----

pub use config::{Config, DEFAULT_ADDR, DEFAULT_DATABASE, SinkKind, SinkSettings};
pub use core::{
    Clock, Dispatcher, DispatcherParams, Service, ServiceBuilder, ShutdownSignal, State,
    SystemClock,
};
pub use error::{ConfigError, RuntimeError, ScheduleError, SinkError};
pub use events::{Bus, Event, EventKind};
pub use schedule::{
    DEFAULT_LOOKAHEAD_DAYS, Daylight, Location, Plan, ScheduleMode, Scheduler, SolarCalendar,
    SolarEvent, SolarEventKind, SpaCalendar,
};
pub use sink::{
    ANNOTATIONS_PATH, Annotation, AnnotationSink, Batch, HttpTarget, LineProtocolSink, Point,
    Sink, SinkRef, USER_AGENT, WRITE_PATH,
};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
