//! # Annotation-style sink.
//!
//! Each point becomes one `POST <base>/api/annotations` with the JSON body
//! `{"time": <unix seconds>, "isRegion": false, "text": "sunrise"|"sunset"}`.
//! Points of a batch are posted in order; the first failure ends the write.

use async_trait::async_trait;

use super::http::HttpTarget;
use super::point::Batch;
use super::sink::Sink;
use crate::error::SinkError;

/// Path of the annotations endpoint, relative to the base address.
pub const ANNOTATIONS_PATH: &str = "/api/annotations";

/// Posts one annotation per event.
#[derive(Debug, Clone)]
pub struct AnnotationSink {
    target: HttpTarget,
}

impl AnnotationSink {
    pub fn new(target: HttpTarget) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Sink for AnnotationSink {
    fn name(&self) -> &str {
        "annotations"
    }

    async fn write(&self, batch: &Batch) -> Result<(), SinkError> {
        for point in batch.points() {
            let body =
                serde_json::to_vec(&point.annotation()).map_err(|e| SinkError::Encode {
                    reason: e.to_string(),
                })?;
            let req = self
                .target
                .post(self.target.endpoint(ANNOTATIONS_PATH), "application/json")
                .body(body);
            self.target.send(req).await?;
        }
        Ok(())
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

    fn sink(addr: String, username: Option<&str>, password: Option<&str>) -> AnnotationSink {
        let settings = SinkSettings {
            addr,
            username: username.map(str::to_string),
            password: password.map(str::to_string),
            ..SinkSettings::default()
        };
        AnnotationSink::new(HttpTarget::new(&settings).unwrap())
    }

    #[tokio::test]
    async fn test_posts_annotation_json() {
        let (addr, requests) = capture_server(StatusCode::OK).await;
        let t = Utc.with_ymd_and_hms(2024, 6, 21, 3, 43, 0).unwrap();

        sink(addr, None, None)
            .write(&Batch::for_events("ignored", &[SolarEvent::sunrise(t)]))
            .await
            .unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.path, "/api/annotations");
        assert_eq!(req.headers["content-type"], "application/json");
        assert_eq!(req.headers["user-agent"], "Influx Daylight");
        assert!(req.headers.get("authorization").is_none());

        let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "time": t.timestamp(), "isRegion": false, "text": "sunrise" })
        );
    }

    #[tokio::test]
    async fn test_basic_auth_only_with_both_credentials() {
        let (addr, requests) = capture_server(StatusCode::OK).await;
        let t = Utc.with_ymd_and_hms(2024, 6, 21, 20, 21, 0).unwrap();
        let batch = Batch::for_events("ignored", &[SolarEvent::sunset(t)]);

        sink(addr.clone(), Some("admin"), None)
            .write(&batch)
            .await
            .unwrap();
        sink(addr, Some("admin"), Some("secret"))
            .write(&batch)
            .await
            .unwrap();

        let requests = requests.lock().unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
        // base64("admin:secret")
        assert_eq!(
            requests[1].headers["authorization"],
            "Basic YWRtaW46c2VjcmV0"
        );
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let (addr, requests) = capture_server(StatusCode::INTERNAL_SERVER_ERROR).await;
        let t = Utc.with_ymd_and_hms(2024, 6, 21, 3, 43, 0).unwrap();
        let batch = Batch::for_events(
            "ignored",
            &[SolarEvent::sunrise(t), SolarEvent::sunset(t)],
        );

        let err = sink(addr, None, None).write(&batch).await.unwrap_err();
        assert!(matches!(err, SinkError::Status { status: 500, .. }));
        // Stops at the first failed post.
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let t = Utc.with_ymd_and_hms(2024, 6, 21, 3, 43, 0).unwrap();
        let err = sink(addr, None, None)
            .write(&Batch::for_events("ignored", &[SolarEvent::sunrise(t)]))
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::Transport(_)));
        assert_eq!(err.as_label(), "sink_transport");
    }
}
