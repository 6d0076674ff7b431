//! Yandex Geocoder client
//!
//! Renders a [`QueryBuilder`] onto the configured endpoint, performs a single
//! GET through a [`Transport`] and classifies the outcome. Failures are
//! returned to the caller as-is; nothing is retried here.

use std::sync::Arc;

use reqwest::Url;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::GeocoderConfig;
use crate::error::GeocoderError;
use crate::query::{QueryBuilder, redact};
use crate::response::ResponseEnvelope;
use crate::transport::{RawResponse, ReqwestTransport, Transport, TransportOptions};

/// Status codes treated as an outage of the service edge
const SERVER_FAILURE_STATUSES: [u16; 2] = [500, 502];

/// Geocoder client
#[derive(Clone)]
pub struct GeocodeClient {
    transport: Arc<dyn Transport>,
    config: GeocoderConfig,
}

impl std::fmt::Debug for GeocodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeocodeClient {
    /// Create a client backed by [`ReqwestTransport`]
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocoderError> {
        let transport = ReqwestTransport::new(&TransportOptions::from(config))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, GeocoderError> {
        Self::new(&GeocoderConfig::default())
    }

    /// Create a client over a caller-supplied transport
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_transport(
        config: &GeocoderConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, GeocoderError> {
        config.validate()?;
        Ok(Self {
            transport,
            config: config.clone(),
        })
    }

    /// Client configuration
    #[must_use]
    pub const fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// A new query seeded with the configured language, limit and API key
    #[must_use]
    pub fn query(&self) -> QueryBuilder {
        let mut query = QueryBuilder::new();
        query
            .set_lang(self.config.lang.as_str())
            .set_limit(self.config.results);
        if let Some(api_key) = self.config.api_key() {
            query.set_token(api_key);
        }
        query
    }

    /// Request URL for `query` on the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns [`GeocoderError::Configuration`] if the base URL is invalid.
    pub fn url(&self, query: &QueryBuilder) -> Result<Url, GeocoderError> {
        query.render(&self.config.base_url, &self.config.version)
    }

    /// Perform the request described by `query`
    ///
    /// Reads a snapshot of the builder's filters; the builder is not kept.
    ///
    /// # Errors
    ///
    /// - [`GeocoderError::Transport`] if the transport could not complete the request
    /// - [`GeocoderError::RemoteServer`] on HTTP 500/502
    /// - [`GeocoderError::MalformedPayload`] if the body is empty or not JSON
    /// - [`GeocoderError::Service`] if the body carries an `error`
    #[instrument(skip(self, query), fields(geocode = query.filter("geocode").unwrap_or_default()))]
    pub async fn execute(&self, query: &QueryBuilder) -> Result<ResponseEnvelope, GeocoderError> {
        let url = self.url(query)?;
        let display_url = redact(&url);
        debug!(url = %display_url, "Requesting geocoder");

        let response = self.transport.get(&url).await.map_err(|e| {
            warn!(url = %display_url, error = %e, timed_out = e.timed_out, "Geocoder transport failure");
            GeocoderError::Transport(e.message)
        })?;

        classify(&display_url, &response).inspect_err(|e| {
            warn!(url = %display_url, status = response.status, error = %e, "Geocoder request failed");
        })
    }
}

/// Classify a transport response into an envelope or a failure
///
/// `url` is only used for diagnostics.
///
/// # Errors
///
/// See [`GeocodeClient::execute`].
pub fn classify(url: &str, response: &RawResponse) -> Result<ResponseEnvelope, GeocoderError> {
    if SERVER_FAILURE_STATUSES.contains(&response.status) {
        let body = String::from_utf8_lossy(&response.body);
        return Err(GeocoderError::RemoteServer {
            status: response.status,
            message: strip_tags(&body).trim().to_string(),
        });
    }

    let data = match serde_json::from_slice::<Value>(&response.body) {
        Ok(data) if !is_empty(&data) => data,
        Ok(_) | Err(_) => {
            return Err(GeocoderError::MalformedPayload {
                url: url.to_string(),
            });
        },
    };

    if let Some(fault) = ServiceFault::from_body(&data) {
        return Err(fault.into());
    }

    Ok(ResponseEnvelope::new(data))
}

/// Shape of an application-level `error` in a response body
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceFault {
    /// `error` is a structured value carrying `message` and `code`
    Structured {
        /// Message sub-field
        message: String,
        /// Code sub-field (0 if absent)
        code: i64,
    },
    /// `error` is a scalar accompanied by top-level `message`/`statusCode`
    Described {
        /// Top-level message
        message: String,
        /// Top-level status code (0 if absent)
        status_code: i64,
    },
    /// Only the raw `error` value is available
    Bare(String),
}

impl ServiceFault {
    /// Resolve the fault carried by a response body, if any
    #[must_use]
    pub fn from_body(body: &Value) -> Option<Self> {
        let error = body.get("error").filter(|e| !is_empty(e))?;

        if error.is_object() || error.is_array() {
            return Some(Self::Structured {
                message: error.get("message").map(text_of).unwrap_or_default(),
                code: error.get("code").map_or(0, integer_of),
            });
        }

        if let Some(message) = body.get("message").filter(|m| !is_empty(m)) {
            return Some(Self::Described {
                message: text_of(message),
                status_code: body
                    .get("statusCode")
                    .filter(|c| !is_empty(c))
                    .map_or(0, integer_of),
            });
        }

        Some(Self::Bare(text_of(error)))
    }

    /// Error code (0 if unspecified)
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Structured { code, .. } => *code,
            Self::Described { status_code, .. } => *status_code,
            Self::Bare(_) => 0,
        }
    }

    /// Error message
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Structured { message, .. } | Self::Described { message, .. } => message,
            Self::Bare(message) => message,
        }
    }
}

impl From<ServiceFault> for GeocoderError {
    fn from(fault: ServiceFault) -> Self {
        let code = fault.code();
        let message = match fault {
            ServiceFault::Structured { message, .. }
            | ServiceFault::Described { message, .. }
            | ServiceFault::Bare(message) => message,
        };
        Self::Service { code, message }
    }
}

/// JSON counterpart of an "empty" value: null, false, 0, "", "0", [] or {}
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn integer_of(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Remove markup tags from an HTML error page
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {},
        }
    }
    out
}
