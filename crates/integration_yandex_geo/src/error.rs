//! Geocoder error types

use thiserror::Error;

/// Errors that can occur while querying the geocoder or parsing its objects
#[derive(Debug, Error)]
pub enum GeocoderError {
    /// The transport could not complete the request (connection, DNS, timeout)
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The service edge answered with HTTP 500 or 502
    #[error("Remote server failure (HTTP {status}): {message}")]
    RemoteServer {
        /// HTTP status code
        status: u16,
        /// Response body with markup stripped
        message: String,
    },

    /// Well-formed response carrying an application-level `error`
    #[error("Geocoder service error {code}: {message}")]
    Service {
        /// Error code reported by the service (0 if unspecified)
        code: i64,
        /// Error message reported by the service
        message: String,
    },

    /// Response body was empty or not usable JSON
    #[error("Can't load data by url: {url}")]
    MalformedPayload {
        /// The requested URL (API key redacted)
        url: String,
    },

    /// A geo-object fragment lacks mandatory fields
    #[error("Invalid geo object: {0}")]
    DataShape(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl GeocoderError {
    /// Returns true if the failure originated on the service side
    #[must_use]
    pub const fn is_server_side(&self) -> bool {
        matches!(self, Self::RemoteServer { .. })
    }

    /// Returns true if re-issuing the same request may succeed
    ///
    /// Advisory only: the client never retries on its own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::RemoteServer { .. })
    }

    /// Service error code, if this is a service error
    #[must_use]
    pub const fn service_code(&self) -> Option<i64> {
        match self {
            Self::Service { code, .. } => Some(*code),
            _ => None,
        }
    }
}
