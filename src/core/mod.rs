//! Runtime core: the dispatch loop and its lifecycle.
//!
//! The public API from this module is [`Service`] (built through
//! [`ServiceBuilder`]), plus the [`Dispatcher`] state machine and the
//! [`Clock`] seam it reads wall time through.
//!
//! Internal modules:
//! - [`dispatcher`]: one loop of plan → wait → write → cool down, with event publishing;
//! - [`service`]: wires the dispatcher, subscribers and signal handling;
//! - [`builder`]: assembles a service from configuration;
//! - [`shutdown`]: cross-platform termination signal handling;
//! - [`clock`]: wall-clock source.

mod builder;
mod clock;
mod dispatcher;
mod service;
mod shutdown;

#[cfg(test)]
mod testing;

pub use builder::ServiceBuilder;
pub use clock::{Clock, SystemClock};
pub use dispatcher::{Dispatcher, DispatcherParams, State};
pub use service::Service;
pub use shutdown::ShutdownSignal;
