//! # Points, annotations and batches.
//!
//! A [`Batch`] is built fresh for every dispatch and carries one [`Point`]
//! per solar event. Sinks decide how points travel on the wire:
//!
//! ```text
//! SolarEvent { Sunrise, 2024-06-21T03:43:12Z }
//!     ├─► Point       daylight value=1i 1718941392
//!     └─► Annotation  {"time":1718941392,"isRegion":false,"text":"sunrise"}
//! ```
//!
//! Timestamps are always truncated to whole seconds.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::schedule::{SolarEvent, SolarEventKind};

/// Measurement name of every point.
pub const MEASUREMENT: &str = "daylight";

/// Field carrying the daylight value.
pub const FIELD: &str = "value";

/// Timestamp precision sent with point batches.
pub const PRECISION: &str = "s";

/// One timestamped daylight measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    pub measurement: &'static str,
    pub value: i64,
    pub time: DateTime<Utc>,
    pub kind: SolarEventKind,
}

impl Point {
    /// `1` at sunrise, `0` at sunset, stamped with the event instant.
    pub fn for_event(ev: &SolarEvent) -> Self {
        Self {
            measurement: MEASUREMENT,
            value: ev.kind.value(),
            time: ev.at,
            kind: ev.kind,
        }
    }

    /// Unix timestamp in seconds.
    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.time.timestamp()
    }

    /// Line-protocol rendering with an integer field and second precision.
    pub fn to_line(&self) -> String {
        format!(
            "{} {}={}i {}",
            self.measurement,
            FIELD,
            self.value,
            self.timestamp()
        )
    }

    /// Annotation-style rendering of the same event.
    pub fn annotation(&self) -> Annotation {
        Annotation {
            time: self.timestamp(),
            is_region: false,
            text: self.kind.label(),
        }
    }
}

/// JSON body for the annotations endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub time: i64,
    #[serde(rename = "isRegion")]
    pub is_region: bool,
    pub text: &'static str,
}

/// Points destined for a single write, all in the same database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    database: String,
    points: Vec<Point>,
}

impl Batch {
    /// One point per event, in the given order.
    pub fn for_events(database: impl Into<String>, events: &[SolarEvent]) -> Self {
        Self {
            database: database.into(),
            points: events.iter().map(Point::for_event).collect(),
        }
    }

    #[inline]
    pub fn database(&self) -> &str {
        &self.database
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Newline-separated line protocol for the whole batch.
    pub fn to_line_protocol(&self) -> String {
        self.points
            .iter()
            .map(Point::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sunrise_batch_has_single_point_with_value_one() {
        let t = Utc.with_ymd_and_hms(2024, 6, 21, 3, 43, 12).unwrap();
        let batch = Batch::for_events("home", &[SolarEvent::sunrise(t)]);

        assert_eq!(batch.database(), "home");
        assert_eq!(batch.len(), 1);
        let p = &batch.points()[0];
        assert_eq!(p.measurement, "daylight");
        assert_eq!(p.value, 1);
        assert_eq!(p.timestamp(), t.timestamp());
    }

    #[test]
    fn test_sunset_point_has_value_zero() {
        let t = Utc.with_ymd_and_hms(2024, 6, 21, 20, 21, 0).unwrap();
        let batch = Batch::for_events("home", &[SolarEvent::sunset(t)]);
        assert_eq!(batch.points()[0].value, 0);
    }

    #[test]
    fn test_timestamp_truncates_subseconds() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 5).unwrap()
            + chrono::TimeDelta::milliseconds(999);
        let p = Point::for_event(&SolarEvent::sunrise(t));
        assert_eq!(p.to_line(), "daylight value=1i 1704067205");
    }

    #[test]
    fn test_pair_line_protocol() {
        let rise = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let set = Utc.with_ymd_and_hms(2024, 1, 1, 16, 0, 0).unwrap();
        let batch = Batch::for_events(
            "home",
            &[SolarEvent::sunrise(rise), SolarEvent::sunset(set)],
        );
        assert_eq!(
            batch.to_line_protocol(),
            format!(
                "daylight value=1i {}\ndaylight value=0i {}",
                rise.timestamp(),
                set.timestamp()
            )
        );
    }

    #[test]
    fn test_annotation_json_shape() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 16, 0, 0).unwrap();
        let json =
            serde_json::to_value(Point::for_event(&SolarEvent::sunset(t)).annotation()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "time": t.timestamp(), "isRegion": false, "text": "sunset" })
        );
    }
}
