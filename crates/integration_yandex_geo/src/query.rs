//! Geocoder query builder
//!
//! Accumulates request filters and renders them onto a versioned endpoint.
//! A builder describes one logical request; it is not synchronized and must
//! not be shared between concurrent requests.

use reqwest::Url;

use crate::error::GeocoderError;
use crate::models::Lang;

/// Production geocoder endpoint
pub const DEFAULT_BASE_URL: &str = "https://geocode-maps.yandex.ru";

/// Geocoder API version used when none is configured
pub const DEFAULT_VERSION: &str = "1.x";

/// Default number of returned objects
pub const DEFAULT_LIMIT: u32 = 10;

const FORMAT: &str = "format";
const LANG: &str = "lang";
const SKIP: &str = "skip";
const RESULTS: &str = "results";
const GEOCODE: &str = "geocode";
const SPAN: &str = "spn";
const CENTER: &str = "ll";
const RESTRICT_TO_AREA: &str = "rspn";
const KIND: &str = "kind";
const API_KEY: &str = "apikey";

/// Builder for geocoder request filters
///
/// Filters keep their first insertion position; writing an existing filter
/// replaces its value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    filters: Vec<(&'static str, String)>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder {
    /// Create a builder holding only the default filters
    #[must_use]
    pub fn new() -> Self {
        let mut builder = Self {
            filters: Vec::with_capacity(10),
        };
        builder.clear();
        builder
    }

    /// Reset every filter to the defaults
    pub fn clear(&mut self) -> &mut Self {
        self.filters.clear();
        self.set(FORMAT, "json".to_string());
        self.set_lang(Lang::default())
            .set_offset(0)
            .set_limit(DEFAULT_LIMIT)
    }

    /// Geocode a coordinate pair (shares the slot with [`Self::set_query`])
    pub fn set_point(&mut self, longitude: f64, latitude: f64) -> &mut Self {
        self.set(GEOCODE, format!("{longitude:.6},{latitude:.6}"))
    }

    /// Geocode a free-text query (shares the slot with [`Self::set_point`])
    pub fn set_query(&mut self, query: impl Into<String>) -> &mut Self {
        self.set(GEOCODE, query.into())
    }

    /// Search area given by its span and optional center
    ///
    /// The center is only written when both coordinates are present and
    /// non-zero; a zero coordinate counts as absent.
    pub fn set_area(
        &mut self,
        span_longitude: f64,
        span_latitude: f64,
        center_longitude: Option<f64>,
        center_latitude: Option<f64>,
    ) -> &mut Self {
        self.set(SPAN, format!("{span_longitude:.6},{span_latitude:.6}"));

        if let (Some(longitude), Some(latitude)) = (
            center_longitude.filter(|v| *v != 0.0),
            center_latitude.filter(|v| *v != 0.0),
        ) {
            self.set(CENTER, format!("{longitude:.6},{latitude:.6}"));
        }

        self
    }

    /// Restrict results to the area set with [`Self::set_area`]
    pub fn use_area_limit(&mut self, area_limit: bool) -> &mut Self {
        self.set(RESTRICT_TO_AREA, if area_limit { "1" } else { "0" }.to_string())
    }

    /// Toponym kind, see [`crate::Kind`]
    pub fn set_kind(&mut self, kind: impl Into<String>) -> &mut Self {
        self.set(KIND, kind.into())
    }

    /// Maximum number of returned objects
    pub fn set_limit(&mut self, limit: u32) -> &mut Self {
        self.set(RESULTS, limit.to_string())
    }

    /// Number of leading objects to skip
    pub fn set_offset(&mut self, offset: u32) -> &mut Self {
        self.set(SKIP, offset.to_string())
    }

    /// Response language, see [`Lang`]
    pub fn set_lang(&mut self, lang: impl Into<String>) -> &mut Self {
        self.set(LANG, lang.into())
    }

    /// API key
    pub fn set_token(&mut self, token: impl Into<String>) -> &mut Self {
        self.set(API_KEY, token.into())
    }

    /// Current value of a filter
    #[must_use]
    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    /// All filters in insertion order
    pub fn filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
    }

    /// Render the request URL `{base_url}/{version}/?{filters}`
    ///
    /// # Errors
    ///
    /// Returns [`GeocoderError::Configuration`] if `base_url` is not a valid URL.
    pub fn render(&self, base_url: &str, version: &str) -> Result<Url, GeocoderError> {
        let endpoint = format!(
            "{}/{}/",
            base_url.trim_end_matches('/'),
            version.trim_matches('/')
        );
        let mut url = Url::parse(&endpoint).map_err(|e| {
            GeocoderError::Configuration(format!("invalid base URL '{base_url}': {e}"))
        })?;

        url.query_pairs_mut().extend_pairs(self.filters());

        Ok(url)
    }

    fn set(&mut self, key: &'static str, value: String) -> &mut Self {
        match self.filters.iter_mut().find(|(name, _)| *name == key) {
            Some(slot) => slot.1 = value,
            None => self.filters.push((key, value)),
        }
        self
    }
}

/// Render a URL for logs and diagnostics with the API key masked
#[must_use]
pub fn redact(url: &Url) -> String {
    if !url.query_pairs().any(|(key, _)| key == API_KEY) {
        return url.to_string();
    }

    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == API_KEY {
                "[REDACTED]".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
