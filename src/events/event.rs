//! # Runtime events emitted by the dispatcher and the service.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Cycle events**: one dispatch cycle (scheduled, inserting, written, failed, cooldown)
//! - **Shutdown events**: signal observed, dispatcher stopped
//! - **Subscriber events**: overflow and panics inside subscriber workers
//!
//! The [`Event`] struct carries the optional metadata (labels, instants,
//! delays, reasons) that subscribers render.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use influx_daylight::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::WriteFailed)
//!     .with_label("sunrise")
//!     .with_sink("annotations")
//!     .with_reason("sink returned status 500");
//!
//! assert_eq!(ev.kind, EventKind::WriteFailed);
//! assert_eq!(ev.label.as_deref(), Some("sunrise"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `sink`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `sink`: subscriber name
    /// - `reason`: "full" or "closed"
    SubscriberOverflow,

    // === Shutdown events ===
    /// Termination signal observed.
    ShutdownRequested,

    /// Dispatcher loop returned; no further writes will happen.
    DispatcherStopped,

    // === Cycle events ===
    /// Next plan computed; the dispatcher is now waiting for it.
    ///
    /// Sets:
    /// - `label`: "sunrise", "sunset" or "sunrise+sunset"
    /// - `instant`: wake-up time
    /// - `delay_ms`: time left until wake-up
    PlanScheduled,

    /// Nothing could be scheduled; waiting before recomputing.
    ///
    /// Sets:
    /// - `reason`: scheduler error
    /// - `delay_ms`: retry interval
    NothingScheduled,

    /// Timer fired, batch is being submitted.
    ///
    /// Sets:
    /// - `label`, `instant`, `points`, `sink`
    Inserting,

    /// Sink accepted the batch.
    ///
    /// Sets:
    /// - `label`, `sink`
    WriteSucceeded,

    /// Sink write failed; the loop carries on with the next cycle.
    ///
    /// Sets:
    /// - `label`, `sink`, `reason`
    WriteFailed,

    /// Post-dispatch cooldown started.
    ///
    /// Sets:
    /// - `delay_ms`: cooldown length
    CooldownStarted,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Solar event label(s) of the current plan.
    pub label: Option<Arc<str>>,
    /// Instant the current plan refers to.
    pub instant: Option<DateTime<Utc>>,
    /// Wait duration in milliseconds.
    pub delay_ms: Option<u64>,
    /// Number of points in the batch.
    pub points: Option<u32>,
    /// Sink (or subscriber) name.
    pub sink: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            label: None,
            instant: None,
            delay_ms: None,
            points: None,
            sink: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[inline]
    pub fn with_instant(mut self, instant: DateTime<Utc>) -> Self {
        self.instant = Some(instant);
        self
    }

    /// Attaches a wait duration (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    #[inline]
    pub fn with_points(mut self, n: usize) -> Self {
        self.points = Some(n.min(u32::MAX as usize) as u32);
        self
    }

    #[inline]
    pub fn with_sink(mut self, sink: impl Into<Arc<str>>) -> Self {
        self.sink = Some(sink.into());
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Wait duration, if one was attached.
    #[inline]
    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(Duration::from_millis)
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_sink(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_sink(subscriber)
            .with_reason(info)
    }
}
