//! # Solar events and the observer location.
//!
//! A [`SolarEvent`] is produced fresh by the scheduler on every loop iteration,
//! consumed once by the dispatcher and then dropped. There is never more than
//! one pending plan at a time.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::ConfigError;

/// Observer position in decimal degrees. Immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Validates and creates a location.
    ///
    /// Latitude must lie in `[-90, 90]`, longitude in `[-180, 180]`; non-finite values are rejected.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ConfigError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ConfigError::InvalidLatitude { value: latitude });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ConfigError::InvalidLongitude { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Which horizon crossing an event marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolarEventKind {
    Sunrise,
    Sunset,
}

impl SolarEventKind {
    /// Text written to the sink ("sunrise" / "sunset").
    pub fn label(&self) -> &'static str {
        match self {
            SolarEventKind::Sunrise => "sunrise",
            SolarEventKind::Sunset => "sunset",
        }
    }

    /// Daylight value: `1` from sunrise on, `0` from sunset on.
    pub fn value(&self) -> i64 {
        match self {
            SolarEventKind::Sunrise => 1,
            SolarEventKind::Sunset => 0,
        }
    }
}

impl fmt::Display for SolarEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single sunrise or sunset instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarEvent {
    pub kind: SolarEventKind,
    pub at: DateTime<Utc>,
}

impl SolarEvent {
    #[inline]
    pub fn sunrise(at: DateTime<Utc>) -> Self {
        Self {
            kind: SolarEventKind::Sunrise,
            at,
        }
    }

    #[inline]
    pub fn sunset(at: DateTime<Utc>) -> Self {
        Self {
            kind: SolarEventKind::Sunset,
            at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_bounds() {
        assert!(Location::new(90.0, 180.0).is_ok());
        assert!(Location::new(-90.0, -180.0).is_ok());
        assert!(matches!(
            Location::new(90.5, 0.0),
            Err(ConfigError::InvalidLatitude { .. })
        ));
        assert!(matches!(
            Location::new(0.0, -180.1),
            Err(ConfigError::InvalidLongitude { .. })
        ));
        assert!(matches!(
            Location::new(f64::NAN, 0.0),
            Err(ConfigError::InvalidLatitude { .. })
        ));
    }

    #[test]
    fn test_kind_label_and_value() {
        assert_eq!(SolarEventKind::Sunrise.label(), "sunrise");
        assert_eq!(SolarEventKind::Sunset.label(), "sunset");
        assert_eq!(SolarEventKind::Sunrise.value(), 1);
        assert_eq!(SolarEventKind::Sunset.value(), 0);
    }
}
