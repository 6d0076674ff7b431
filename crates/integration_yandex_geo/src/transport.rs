//! HTTP transport seam
//!
//! The geocode client only needs "GET this URL, give me the status and the
//! buffered body". [`ReqwestTransport`] is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url, redirect};
use thiserror::Error;
use tracing::debug;

use crate::config::GeocoderConfig;
use crate::error::GeocoderError;

const MAX_REDIRECTS: usize = 10;

/// Buffered HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

impl RawResponse {
    /// Create a response from a status code and body
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failure reported by the transport before any response was read
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    /// Transport-level message (connection refused, DNS failure, ...)
    pub message: String,
    /// Whether the request timed out
    pub timed_out: bool,
}

impl TransportError {
    /// Create a transport error from a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }
}

/// Perform a single HTTP GET
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url`, following redirects, and buffer the body
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportError>;
}

/// Options for [`ReqwestTransport`]
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Follow HTTP redirects
    pub follow_redirects: bool,
    /// User-Agent header
    pub user_agent: String,
    /// Additional headers sent with every request
    pub headers: Vec<(String, String)>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self::from(&GeocoderConfig::default())
    }
}

impl From<&GeocoderConfig> for TransportOptions {
    fn from(config: &GeocoderConfig) -> Self {
        Self {
            timeout_secs: config.timeout_secs,
            follow_redirects: config.follow_redirects,
            user_agent: config.user_agent.clone(),
            headers: Vec::new(),
        }
    }
}

impl TransportOptions {
    /// Add a header sent with every request
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// `reqwest`-based transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given options
    ///
    /// # Errors
    ///
    /// Returns an error if a header is invalid or the HTTP client cannot be
    /// initialized.
    pub fn new(options: &TransportOptions) -> Result<Self, GeocoderError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| GeocoderError::Configuration(format!("header '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| GeocoderError::Configuration(format!("header '{name}': {e}")))?;
            headers.insert(name, value);
        }

        let policy = if options.follow_redirects {
            redirect::Policy::limited(MAX_REDIRECTS)
        } else {
            redirect::Policy::none()
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .user_agent(options.user_agent.as_str())
            .default_headers(headers)
            .redirect(policy)
            .build()
            .map_err(|e| GeocoderError::Transport(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(status, bytes = body.len(), "Geocoder response received");

        Ok(RawResponse { status, body })
    }
}
