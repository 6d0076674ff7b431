//! Geocoder client configuration

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::GeocoderError;
use crate::query::{DEFAULT_BASE_URL, DEFAULT_LIMIT, DEFAULT_VERSION};

/// Configuration for the Yandex Geocoder client
#[derive(Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Geocoder base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API version path segment (default: 1.x)
    #[serde(default = "default_version")]
    pub version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Follow HTTP redirects
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Response language preseeded into new queries
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Result limit preseeded into new queries
    #[serde(default = "default_results")]
    pub results: u32,

    /// Yandex Maps API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
}

impl fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("timeout_secs", &self.timeout_secs)
            .field("follow_redirects", &self.follow_redirects)
            .field("user_agent", &self.user_agent)
            .field("lang", &self.lang)
            .field("results", &self.results)
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_follow_redirects() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("yandex-geo/{}", env!("CARGO_PKG_VERSION"))
}

fn default_lang() -> String {
    crate::models::Lang::default().as_str().to_string()
}

const fn default_results() -> u32 {
    DEFAULT_LIMIT
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: default_version(),
            timeout_secs: default_timeout_secs(),
            follow_redirects: default_follow_redirects(),
            user_agent: default_user_agent(),
            lang: default_lang(),
            results: default_results(),
            api_key: None,
        }
    }
}

impl GeocoderConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Point the configuration at another base URL (e.g. a mock server)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Exposed API key, if configured
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), GeocoderError> {
        if self.base_url.is_empty() {
            return Err(GeocoderError::Configuration(
                "base_url must not be empty".to_string(),
            ));
        }

        if self.version.trim_matches('/').is_empty() {
            return Err(GeocoderError::Configuration(
                "version must not be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(GeocoderError::Configuration(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from an optional `yandex-geo` file and environment
    ///
    /// Environment variables use the `YANDEX_GEO_` prefix, e.g.
    /// `YANDEX_GEO_API_KEY` or `YANDEX_GEO_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocoderError::Configuration`] if a source cannot be read or
    /// deserialized, or the result fails validation.
    pub fn load() -> Result<Self, GeocoderError> {
        Self::load_from("yandex-geo")
    }

    /// Like [`Self::load`] with an explicit file name (extension optional)
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_from(file: &str) -> Result<Self, GeocoderError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(config::Environment::with_prefix("YANDEX_GEO").try_parsing(true))
            .build()
            .and_then(|built| built.try_deserialize())
            .map_err(|e| GeocoderError::Configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }
}
