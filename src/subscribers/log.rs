//! # LogWriter — renders runtime events through `tracing`
//!
//! ## Example output
//! ```text
//! INFO waiting for sunrise at=2024-06-21T03:43:12Z wait=43m12s
//! INFO inserting sunrise sink=annotations points=1
//! INFO sunrise written sink=annotations
//! WARN write failed, continuing with next event event=sunset error="sink returned status 500: "
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let label = e.label.as_deref().unwrap_or("-");
        let sink = e.sink.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("unknown");
        let at = e.instant.map(|t| t.to_rfc3339()).unwrap_or_default();

        match e.kind {
            EventKind::PlanScheduled => {
                info!(at = %at, wait = ?e.delay(), "waiting for {label}");
            }
            EventKind::NothingScheduled => {
                warn!(error = %reason, retry_in = ?e.delay(), "nothing to schedule");
            }
            EventKind::Inserting => {
                info!(at = %at, sink, points = e.points.unwrap_or(0), "inserting {label}");
            }
            EventKind::WriteSucceeded => {
                info!(sink, "{label} written");
            }
            EventKind::WriteFailed => {
                warn!(event = label, sink, error = %reason, "write failed, continuing with next event");
            }
            EventKind::CooldownStarted => {
                debug!(cooldown = ?e.delay(), "cooling down");
            }
            EventKind::ShutdownRequested => {
                info!("shutdown requested");
            }
            EventKind::DispatcherStopped => {
                info!("dispatcher stopped");
            }
            EventKind::SubscriberOverflow => {
                warn!(subscriber = sink, reason, "subscriber dropped event");
            }
            EventKind::SubscriberPanicked => {
                error!(subscriber = sink, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
