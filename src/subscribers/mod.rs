//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Dispatcher ── publish(Event) ──► Bus ──► service listener ──► SubscriberSet
//!                                                                   │
//!                                                         ┌─────────┴─────────┐
//!                                                         ▼                   ▼
//!                                                     LogWriter            Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use influx_daylight::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::WriteFailed {
//!             // increment a counter
//!         }
//!     }
//! }
//! ```

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
