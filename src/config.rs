//! # Runtime configuration.
//!
//! Provides [`Config`], the centralized settings for the daylight service, and
//! [`SinkSettings`] for the HTTP sink. The binary fills these from flags and
//! environment variables; library users can start from [`Config::default`].
//!
//! ## Sentinel values
//! - `cooldown = 0s` → no cooldown even in pair mode
//! - `username`/`password` empty → no Basic credentials are sent

use std::time::Duration;

use crate::error::ConfigError;
use crate::schedule::{DEFAULT_LOOKAHEAD_DAYS, Location, ScheduleMode};

/// Default sink base address.
pub const DEFAULT_ADDR: &str = "http://localhost:8086";

/// Default target database for point-batch writes.
pub const DEFAULT_DATABASE: &str = "daylight";

/// Wire shape used for writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SinkKind {
    /// `POST /api/annotations` with a JSON body per event.
    #[default]
    Annotation,
    /// `POST /write?db=..&precision=s` with a line-protocol batch.
    Points,
}

/// Connection settings for the sink.
#[derive(Clone, Debug)]
pub struct SinkSettings {
    /// Which wire shape to use.
    pub kind: SinkKind,
    /// Base address, e.g. `http://localhost:8086`.
    pub addr: String,
    /// Optional Basic-auth username (used only together with `password`).
    pub username: Option<String>,
    /// Optional Basic-auth password (used only together with `username`).
    pub password: Option<String>,
    /// Target database for point batches.
    pub database: String,
    /// Upper bound for one request round-trip.
    pub timeout: Duration,
}

impl SinkSettings {
    /// Returns the credential pair if both parts are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            kind: SinkKind::default(),
            addr: DEFAULT_ADDR.to_string(),
            username: None,
            password: None,
            database: DEFAULT_DATABASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Global configuration for the daylight service.
///
/// ## Field semantics
/// - `latitude`/`longitude`: observer position in degrees, validated by [`Config::location`]
/// - `mode`: single event per wake-up or sunrise+sunset pair
/// - `cooldown`: pause after each pair-mode dispatch
/// - `retry_interval`: wait before recomputing when no event could be scheduled
/// - `lookahead_days`: calendar days searched for the next event
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    pub latitude: f64,
    pub longitude: f64,
    pub mode: ScheduleMode,
    pub sink: SinkSettings,
    pub cooldown: Duration,
    pub retry_interval: Duration,
    pub lookahead_days: u32,
    pub bus_capacity: usize,
}

impl Config {
    /// Validates the coordinates and returns them as a [`Location`].
    pub fn location(&self) -> Result<Location, ConfigError> {
        Location::new(self.latitude, self.longitude)
    }

    /// Checks everything that can be checked without building a client.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.location()?;
        if self.sink.kind == SinkKind::Points && self.sink.database.trim().is_empty() {
            return Err(ConfigError::MissingDatabase);
        }
        Ok(())
    }

    /// Returns the cooldown applied after a dispatch, if any.
    ///
    /// Only pair mode cools down; `0s` disables it.
    #[inline]
    pub fn effective_cooldown(&self) -> Option<Duration> {
        match self.mode {
            ScheduleMode::Pair if !self.cooldown.is_zero() => Some(self.cooldown),
            _ => None,
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `mode = Single`, annotation sink at [`DEFAULT_ADDR`]
    /// - `cooldown = 30s`, `retry_interval = 1h`
    /// - `lookahead_days = 2` (today and tomorrow)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            mode: ScheduleMode::default(),
            sink: SinkSettings::default(),
            cooldown: Duration::from_secs(30),
            retry_interval: Duration::from_secs(60 * 60),
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_both_parts() {
        let mut s = SinkSettings::default();
        assert_eq!(s.credentials(), None);

        s.username = Some("admin".into());
        assert_eq!(s.credentials(), None);

        s.password = Some(String::new());
        assert_eq!(s.credentials(), None);

        s.password = Some("secret".into());
        assert_eq!(s.credentials(), Some(("admin", "secret")));
    }

    #[test]
    fn test_cooldown_only_in_pair_mode() {
        let mut cfg = Config::default();
        assert_eq!(cfg.effective_cooldown(), None);

        cfg.mode = ScheduleMode::Pair;
        assert_eq!(cfg.effective_cooldown(), Some(Duration::from_secs(30)));

        cfg.cooldown = Duration::ZERO;
        assert_eq!(cfg.effective_cooldown(), None);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let mut cfg = Config {
            latitude: 123.0,
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidLatitude { .. })
        ));

        cfg.latitude = 51.5;
        cfg.sink.kind = SinkKind::Points;
        cfg.sink.database = "  ".into();
        assert!(matches!(cfg.validate(), Err(ConfigError::MissingDatabase)));

        cfg.sink.database = "home".into();
        assert!(cfg.validate().is_ok());
    }
}
