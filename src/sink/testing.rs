//! In-process HTTP endpoint that records every request it receives.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};

#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Clone)]
struct Capture {
    requests: Arc<Mutex<Vec<Recorded>>>,
    status: StatusCode,
}

async fn record(State(cap): State<Capture>, uri: Uri, headers: HeaderMap, body: String) -> StatusCode {
    cap.requests.lock().unwrap().push(Recorded {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });
    cap.status
}

/// Starts a server answering every request with `status`.
///
/// Returns the base address and the shared request log.
pub(crate) async fn capture_server(status: StatusCode) -> (String, Arc<Mutex<Vec<Recorded>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(record).with_state(Capture {
        requests: requests.clone(),
        status,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    (format!("http://{addr}"), requests)
}
