//! # Service: wires the dispatcher, event delivery and signal handling.
//!
//! The [`Service`] owns the event bus, the [`Dispatcher`] and the subscriber
//! list. It is constructed through [`ServiceBuilder`](super::ServiceBuilder).
//!
//! ## High-level architecture
//! ```text
//! run():
//!   ShutdownSignal::install()        (failure → RuntimeError, nothing started)
//!   signal watcher task:
//!     SIGINT/SIGTERM ─► Bus.publish(ShutdownRequested) ─► token.cancel()
//!   run_until(token)
//!
//! run_until(token):
//!   listener task:   Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!                    (ends after DispatcherStopped, then drains subscriber queues)
//!   Dispatcher::run(token)
//!     └─► Bus.publish(DispatcherStopped) on exit
//! ```
//!
//! ## Rules
//! - The listener subscribes before the dispatcher starts, so no event is missed
//! - `run_until` returns only after every subscriber has seen `DispatcherStopped`
//! - A lagging listener skips the dropped events and keeps going
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use influx_daylight::{Config, LogWriter, Service};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut cfg = Config::default();
//!     cfg.latitude = 52.52;
//!     cfg.longitude = 13.40;
//!
//!     Service::builder(cfg)
//!         .with_subscribers(vec![Arc::new(LogWriter::new())])
//!         .build()?
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use chrono::{Local, TimeZone};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use super::{builder::ServiceBuilder, dispatcher::Dispatcher, shutdown::ShutdownSignal};
use crate::{
    config::Config,
    error::RuntimeError,
    events::{Bus, Event, EventKind},
    subscribers::{Subscribe, SubscriberSet},
};

/// Runs the daylight dispatcher until a termination signal or cancellation.
pub struct Service<Tz: TimeZone = Local> {
    bus: Bus,
    dispatcher: Dispatcher<Tz>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl Service<Local> {
    /// Starts building a service from `cfg`.
    pub fn builder(cfg: Config) -> ServiceBuilder<Local> {
        ServiceBuilder::new(cfg)
    }
}

impl<Tz> Service<Tz>
where
    Tz: TimeZone + Send + Sync + 'static,
{
    pub(crate) fn new_internal(
        bus: Bus,
        dispatcher: Dispatcher<Tz>,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        Self {
            bus,
            dispatcher,
            subscribers,
        }
    }

    /// Returns the event bus (for extra receivers attached before `run`).
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Runs until SIGINT or SIGTERM.
    ///
    /// Returns `Ok(())` after a signal-driven shutdown. Fails only if the signal
    /// handlers cannot be registered.
    pub async fn run(self) -> Result<(), RuntimeError> {
        let mut signals = ShutdownSignal::install()?;
        let token = CancellationToken::new();

        let watcher = {
            let bus = self.bus.clone();
            let token = token.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = signals.recv() => {
                        bus.publish(Event::new(EventKind::ShutdownRequested));
                        token.cancel();
                    }
                    _ = token.cancelled() => {}
                }
            })
        };

        self.run_until(token.clone()).await;
        token.cancel();
        let _ = watcher.await;
        Ok(())
    }

    /// Runs until `token` is cancelled.
    pub async fn run_until(self, token: CancellationToken) {
        let listener = self.subscriber_listener();
        self.dispatcher.run(token).await;
        let _ = listener.await;
    }

    /// Subscribes to the bus and forwards events to the subscriber set until the
    /// dispatcher reports it has stopped.
    fn subscriber_listener(&self) -> tokio::task::JoinHandle<()> {
        let mut rx = self.bus.subscribe();
        let set = SubscriberSet::new(self.subscribers.clone(), self.bus.clone());
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        set.emit(&ev);
                        if ev.kind == EventKind::DispatcherStopped {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        })
    }
}
