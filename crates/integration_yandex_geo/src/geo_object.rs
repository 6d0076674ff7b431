//! Geocoded object view
//!
//! Flattens one `GeoObject` of a geocoder response into named address fields
//! and an ordered list of address parts.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::GeocoderError;
use crate::hierarchy::{self, scalar_text};

/// Named address fields collected from anywhere in the object
pub const ADDRESS_FIELDS: [&str; 8] = [
    "CountryName",
    "CountryNameCode",
    "AdministrativeAreaName",
    "SubAdministrativeAreaName",
    "LocalityName",
    "DependentLocalityName",
    "ThoroughfareName",
    "PremiseNumber",
];

/// Parsed, immutable view of one geocoded object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoObject {
    #[serde(flatten)]
    data: Map<String, Value>,
    full_address_parts: Vec<String>,
    #[serde(skip)]
    raw: Value,
}

impl GeoObject {
    /// Parse a raw `GeoObject` JSON fragment
    ///
    /// # Errors
    ///
    /// Returns [`GeocoderError::DataShape`] if
    /// `metaDataProperty.GeocoderMetaData.text` or `.kind` is missing.
    pub fn from_raw(raw: Value) -> Result<Self, GeocoderError> {
        let meta = raw
            .pointer("/metaDataProperty/GeocoderMetaData")
            .ok_or_else(|| {
                GeocoderError::DataShape("missing metaDataProperty.GeocoderMetaData".to_string())
            })?;
        let address = required_text(meta, "text")?;
        let kind = required_text(meta, "kind")?;

        let mut data = Map::new();
        data.insert("Address".to_string(), Value::String(address));
        data.insert("Kind".to_string(), Value::String(kind));
        collect_address_fields(&raw, &mut data);

        if let Some((longitude, latitude)) = raw
            .pointer("/Point/pos")
            .and_then(Value::as_str)
            .and_then(parse_pos)
        {
            data.insert("Longitude".to_string(), Value::from(longitude));
            data.insert("Latitude".to_string(), Value::from(latitude));
        }

        let full_address_parts = meta
            .get("AddressDetails")
            .map(hierarchy::full_address_parts)
            .unwrap_or_default();

        Ok(Self {
            data,
            full_address_parts,
            raw,
        })
    }

    /// Full address as formatted by the service
    #[must_use]
    pub fn address(&self) -> &str {
        self.text("Address").unwrap_or_default()
    }

    /// Toponym kind (`house`, `street`, `metro`, ...)
    #[must_use]
    pub fn kind(&self) -> &str {
        self.text("Kind").unwrap_or_default()
    }

    /// Latitude in degrees
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.data.get("Latitude").and_then(Value::as_f64)
    }

    /// Longitude in degrees
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.data.get("Longitude").and_then(Value::as_f64)
    }

    /// Country name
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.text("CountryName")
    }

    /// ISO country code
    #[must_use]
    pub fn country_code(&self) -> Option<&str> {
        self.text("CountryNameCode")
    }

    /// Administrative area (region, federal district)
    #[must_use]
    pub fn administrative_area(&self) -> Option<&str> {
        self.text("AdministrativeAreaName")
    }

    /// Sub-administrative area
    #[must_use]
    pub fn sub_administrative_area(&self) -> Option<&str> {
        self.text("SubAdministrativeAreaName")
    }

    /// Locality (settlement)
    #[must_use]
    pub fn locality(&self) -> Option<&str> {
        self.text("LocalityName")
    }

    #[must_use]
    pub fn dependent_locality(&self) -> Option<&str> {
        self.text("DependentLocalityName")
    }

    /// Street
    #[must_use]
    pub fn thoroughfare(&self) -> Option<&str> {
        self.text("ThoroughfareName")
    }

    /// House number
    #[must_use]
    pub fn premise_number(&self) -> Option<&str> {
        self.text("PremiseNumber")
    }

    /// Address parts from country down to premise, without duplicates
    #[must_use]
    pub fn full_address_parts(&self) -> &[String] {
        &self.full_address_parts
    }

    /// Flattened data: `Address`, `Kind`, address fields and coordinates
    #[must_use]
    pub const fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// The JSON fragment this object was parsed from
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

impl TryFrom<Value> for GeoObject {
    type Error = GeocoderError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

impl fmt::Display for GeoObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.address())
    }
}

fn required_text(meta: &Value, key: &str) -> Result<String, GeocoderError> {
    meta.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            GeocoderError::DataShape(format!("missing metaDataProperty.GeocoderMetaData.{key}"))
        })
}

/// Collect address fields from every scalar leaf; a later leaf overwrites an earlier one
fn collect_address_fields(value: &Value, data: &mut Map<String, Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if child.is_object() || child.is_array() {
                    collect_address_fields(child, data);
                } else if ADDRESS_FIELDS.contains(&key.as_str()) {
                    if let Some(text) = scalar_text(child) {
                        data.insert(key.clone(), Value::String(text));
                    }
                }
            }
        },
        Value::Array(items) => {
            for item in items {
                collect_address_fields(item, data);
            }
        },
        _ => {},
    }
}

/// Parse `"<lon> <lat>"`
fn parse_pos(pos: &str) -> Option<(f64, f64)> {
    let mut parts = pos.split_whitespace();
    let longitude = parts.next()?.parse().ok()?;
    let latitude = parts.next()?.parse().ok()?;
    Some((longitude, latitude))
}
