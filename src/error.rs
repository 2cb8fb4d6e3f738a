//! Error types used by the daylight runtime, scheduler and sinks.
//!
//! [`ConfigError`] and [`RuntimeError`] stop the process before the loop starts.
//! [`SinkError`] and [`ScheduleError`] are reported per cycle and never fatal.
//!
//! All types provide `as_label` for logs.

use thiserror::Error;

/// # Errors produced by the service runtime itself.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// OS signal handlers could not be registered.
    #[error("failed to install signal handlers: {0}")]
    Signals(#[from] std::io::Error),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Signals(_) => "runtime_signals",
        }
    }
}

/// # Errors produced while building the runtime from configuration.
///
/// Any of these aborts the process with a non-zero status before the
/// dispatcher loop is entered.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Latitude outside [-90, 90] or not a finite number.
    #[error("invalid latitude {value}: must be within [-90, 90]")]
    InvalidLatitude {
        /// The rejected value.
        value: f64,
    },

    /// Longitude outside [-180, 180] or not a finite number.
    #[error("invalid longitude {value}: must be within [-180, 180]")]
    InvalidLongitude {
        /// The rejected value.
        value: f64,
    },

    /// Sink base address could not be parsed or uses an unsupported scheme.
    #[error("invalid sink address {addr:?}: {reason}")]
    InvalidAddress {
        /// The address as configured.
        addr: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Point-batch sink selected without a target database.
    #[error("point-batch sink requires a database name")]
    MissingDatabase,

    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use influx_daylight::ConfigError;
    ///
    /// let err = ConfigError::InvalidLatitude { value: 91.0 };
    /// assert_eq!(err.as_label(), "config_invalid_latitude");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidLatitude { .. } => "config_invalid_latitude",
            ConfigError::InvalidLongitude { .. } => "config_invalid_longitude",
            ConfigError::InvalidAddress { .. } => "config_invalid_address",
            ConfigError::MissingDatabase => "config_missing_database",
            ConfigError::Client(_) => "config_client",
        }
    }
}

/// # Errors produced by a single sink write.
///
/// The dispatcher logs these and moves on to the next cycle; a failed write
/// is never retried within the same cycle.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SinkError {
    /// Connection, TLS or timeout failure while sending or receiving.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The sink answered with a non-success status code.
    #[error("sink returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Drained response body (possibly truncated).
        body: String,
    },

    /// The batch could not be turned into a request body.
    #[error("failed to encode batch: {reason}")]
    Encode {
        /// Underlying encoder message.
        reason: String,
    },
}

impl SinkError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use influx_daylight::SinkError;
    ///
    /// let err = SinkError::Status { status: 500, body: String::new() };
    /// assert_eq!(err.as_label(), "sink_status");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SinkError::Transport(_) => "sink_transport",
            SinkError::Status { .. } => "sink_status",
            SinkError::Encode { .. } => "sink_encode",
        }
    }
}

/// # Errors produced while looking for the next solar event.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// No sunrise or sunset in the searched window (polar day or night).
    #[error("no sunrise or sunset within {days} day(s)")]
    NoEvent {
        /// Number of calendar days that were searched.
        days: u32,
    },

    /// The astronomical calculation rejected its input.
    #[error("solar calculation failed: {reason}")]
    Calendar {
        /// Message from the calculation backend.
        reason: String,
    },
}

impl ScheduleError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ScheduleError::NoEvent { .. } => "schedule_no_event",
            ScheduleError::Calendar { .. } => "schedule_calendar",
        }
    }
}
