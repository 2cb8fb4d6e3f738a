//! # Shared HTTP plumbing for the InfluxDB sinks.
//!
//! [`HttpTarget`] is built once at startup: the base address is parsed and
//! checked, the `reqwest` client (and its connection pool) is created with a
//! fixed `User-Agent` and request timeout. Every write reuses it.

use reqwest::{RequestBuilder, header};
use url::Url;

use crate::config::SinkSettings;
use crate::error::{ConfigError, SinkError};

/// Client identifier sent with every request.
pub const USER_AGENT: &str = "Influx Daylight";

/// Longest response body kept in a [`SinkError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Base address, credentials and pooled client.
#[derive(Debug, Clone)]
pub struct HttpTarget {
    client: reqwest::Client,
    base: Url,
    credentials: Option<(String, String)>,
}

impl HttpTarget {
    /// Parses the address and builds the client.
    ///
    /// Fails with [`ConfigError::InvalidAddress`] for unparsable or non-http(s)
    /// addresses and [`ConfigError::Client`] if the TLS backend cannot start.
    pub fn new(settings: &SinkSettings) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidAddress {
            addr: settings.addr.clone(),
            reason,
        };

        let base = Url::parse(&settings.addr).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", base.scheme())));
        }
        if base.cannot_be_a_base() || base.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(ConfigError::Client)?;

        let credentials = settings
            .credentials()
            .map(|(user, pass)| (user.to_string(), pass.to_string()));

        Ok(Self {
            client,
            base,
            credentials,
        })
    }

    /// Resolves `path` below the base address, keeping any base path prefix.
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let joined = format!(
            "{}/{}",
            self.base.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_query(None);
        url
    }

    /// Starts a POST with credentials attached when configured.
    pub fn post(&self, url: Url, content_type: &'static str) -> RequestBuilder {
        let req = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, content_type);
        match &self.credentials {
            Some((user, pass)) => req.basic_auth(user, Some(pass)),
            None => req,
        }
    }

    /// Sends the request and drains the response.
    ///
    /// Any transport failure or non-2xx status is an error.
    pub async fn send(&self, req: RequestBuilder) -> Result<(), SinkError> {
        let response = req.send().await?;
        let status = response.status();
        // Reading the body hands the connection back to the pool.
        let mut body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            truncate_utf8(&mut body, MAX_ERROR_BODY);
            tracing::debug!(%status, body = %body, "sink rejected write");
            return Err(SinkError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

fn truncate_utf8(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}
