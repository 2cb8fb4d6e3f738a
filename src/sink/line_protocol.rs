//! # Point-batch sink (InfluxDB line protocol).
//!
//! The whole batch travels in one `POST <base>/write?db=<database>&precision=s`,
//! one line per point:
//!
//! ```text
//! daylight value=1i 1718941392
//! daylight value=0i 1718999999
//! ```

use async_trait::async_trait;

use super::http::HttpTarget;
use super::point::{Batch, PRECISION};
use super::sink::Sink;
use crate::error::SinkError;

/// Path of the write endpoint, relative to the base address.
pub const WRITE_PATH: &str = "/write";

/// Writes batches as line protocol in a single request.
#[derive(Debug, Clone)]
pub struct LineProtocolSink {
    target: HttpTarget,
}

impl LineProtocolSink {
    pub fn new(target: HttpTarget) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Sink for LineProtocolSink {
    fn name(&self) -> &str {
        "points"
    }

    async fn write(&self, batch: &Batch) -> Result<(), SinkError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut url = self.target.endpoint(WRITE_PATH);
        url.query_pairs_mut()
            .append_pair("db", batch.database())
            .append_pair("precision", PRECISION);

        let req = self
            .target
            .post(url, "text/plain; charset=utf-8")
            .body(batch.to_line_protocol());
        self.target.send(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SinkSettings;
    use crate::schedule::SolarEvent;
    use crate::sink::testing::capture_server;
    use axum::http::StatusCode;
    use chrono::{TimeZone, Utc};

    fn sink(addr: String) -> LineProtocolSink {
        let settings = SinkSettings {
            addr,
            ..SinkSettings::default()
        };
        LineProtocolSink::new(HttpTarget::new(&settings).unwrap())
    }

    #[tokio::test]
    async fn test_pair_goes_out_in_one_request() {
        let (addr, requests) = capture_server(StatusCode::NO_CONTENT).await;
        let rise = Utc.with_ymd_and_hms(2024, 6, 21, 3, 43, 0).unwrap();
        let set = Utc.with_ymd_and_hms(2024, 6, 21, 20, 21, 0).unwrap();
        let batch = Batch::for_events(
            "home",
            &[SolarEvent::sunrise(rise), SolarEvent::sunset(set)],
        );

        sink(addr).write(&batch).await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.path, "/write");
        assert_eq!(req.query.as_deref(), Some("db=home&precision=s"));
        assert_eq!(req.headers["user-agent"], "Influx Daylight");
        assert_eq!(
            req.body,
            format!(
                "daylight value=1i {}\ndaylight value=0i {}",
                rise.timestamp(),
                set.timestamp()
            )
        );
    }

    #[tokio::test]
    async fn test_empty_batch_sends_nothing() {
        let (addr, requests) = capture_server(StatusCode::NO_CONTENT).await;
        sink(addr)
            .write(&Batch::for_events("home", &[]))
            .await
            .unwrap();
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_write_is_status_error() {
        let (addr, _requests) = capture_server(StatusCode::UNAUTHORIZED).await;
        let t = Utc.with_ymd_and_hms(2024, 6, 21, 3, 43, 0).unwrap();
        let err = sink(addr)
            .write(&Batch::for_events("home", &[SolarEvent::sunrise(t)]))
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "sink_status");
    }
}
