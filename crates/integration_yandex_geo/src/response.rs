//! Geocoder response envelope

use serde_json::Value;
use tracing::warn;

use crate::error::GeocoderError;
use crate::geo_object::GeoObject;

const FEATURE_MEMBERS: &str = "/response/GeoObjectCollection/featureMember";
const RESPONSE_META: &str = "/response/GeoObjectCollection/metaDataProperty/GeocoderResponseMetaData";

/// Decoded top-level body of a successful geocoder response
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    data: Value,
}

impl ResponseEnvelope {
    /// Wrap a decoded response body
    #[must_use]
    pub const fn new(data: Value) -> Self {
        Self { data }
    }

    /// The decoded body
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.data
    }

    /// Take ownership of the decoded body
    #[must_use]
    pub fn into_raw(self) -> Value {
        self.data
    }

    /// Parse every `featureMember` into a [`GeoObject`]
    ///
    /// Each member is parsed independently, so a malformed object only
    /// fails its own slot.
    #[must_use]
    pub fn geo_objects(&self) -> Vec<Result<GeoObject, GeocoderError>> {
        self.feature_members()
            .map(|member| {
                member.get("GeoObject").cloned().map_or_else(
                    || {
                        Err(GeocoderError::DataShape(
                            "featureMember without GeoObject".to_string(),
                        ))
                    },
                    GeoObject::from_raw,
                )
            })
            .collect()
    }

    /// Successfully parsed objects; malformed ones are logged and skipped
    #[must_use]
    pub fn parsed_objects(&self) -> Vec<GeoObject> {
        self.geo_objects()
            .into_iter()
            .enumerate()
            .filter_map(|(index, object)| {
                object
                    .inspect_err(|e| warn!(index, error = %e, "Skipping malformed geo object"))
                    .ok()
            })
            .collect()
    }

    /// First successfully parsed object
    #[must_use]
    pub fn first(&self) -> Option<GeoObject> {
        self.geo_objects().into_iter().find_map(Result::ok)
    }

    /// Number of `featureMember` entries in this page
    #[must_use]
    pub fn len(&self) -> usize {
        self.feature_members().count()
    }

    /// True if the response holds no objects
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Request text as echoed by the service
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.response_meta("request").and_then(Value::as_str)
    }

    /// Total number of objects found (all pages)
    #[must_use]
    pub fn found_count(&self) -> Option<u64> {
        match self.response_meta("found")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Latitude of the requested point, for coordinate requests
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.request_point().map(|(_, latitude)| latitude)
    }

    /// Longitude of the requested point, for coordinate requests
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.request_point().map(|(longitude, _)| longitude)
    }

    fn feature_members(&self) -> impl Iterator<Item = &Value> {
        self.data
            .pointer(FEATURE_MEMBERS)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
    }

    fn response_meta(&self, key: &str) -> Option<&Value> {
        self.data.pointer(RESPONSE_META)?.get(key)
    }

    fn request_point(&self) -> Option<(f64, f64)> {
        let pos = self
            .response_meta("Point")?
            .get("pos")?
            .as_str()?;
        let mut parts = pos.split_whitespace();
        let longitude = parts.next()?.parse().ok()?;
        let latitude = parts.next()?.parse().ok()?;
        Some((longitude, latitude))
    }
}

impl From<ResponseEnvelope> for Value {
    fn from(envelope: ResponseEnvelope) -> Self {
        envelope.into_raw()
    }
}
