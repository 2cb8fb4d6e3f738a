//! # Sink abstraction.
//!
//! [`Sink`] is the seam between the dispatcher and the outside world: one
//! call per [`Batch`], awaited to completion before the loop moves on. The
//! dispatcher never issues concurrent writes and never cancels a write in
//! flight.

use std::sync::Arc;

use async_trait::async_trait;

use super::point::Batch;
use crate::error::SinkError;

/// # Destination for daylight batches.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use influx_daylight::{Batch, Sink, SinkError};
///
/// struct Discard;
///
/// #[async_trait]
/// impl Sink for Discard {
///     fn name(&self) -> &str { "discard" }
///
///     async fn write(&self, _batch: &Batch) -> Result<(), SinkError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Sink: Send + Sync + 'static {
    /// Stable name for logs.
    fn name(&self) -> &str;

    /// Submits the batch. Errors are reported, never retried by the caller.
    async fn write(&self, batch: &Batch) -> Result<(), SinkError>;
}

/// Shared handle to a sink.
pub type SinkRef = Arc<dyn Sink>;
