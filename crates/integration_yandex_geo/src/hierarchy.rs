//! Administrative address hierarchy
//!
//! `AddressDetails` nests levels as `Country → AdministrativeArea → ... →
//! Premise`, but any intermediate level may be missing depending on locale
//! and how specific the match is. The schema below lists which children each
//! level may carry; the walk visits them depth-first, parent before child,
//! children in schema order.

use serde_json::Value;

/// One rank in the administrative address tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressLevel {
    /// Country
    Country,
    /// Administrative area (region, state)
    AdministrativeArea,
    /// Sub-administrative area (district of a region)
    SubAdministrativeArea,
    /// Locality (settlement)
    Locality,
    /// Dependent locality (city district); may nest
    DependentLocality,
    /// Thoroughfare (street)
    Thoroughfare,
    /// Premise (house)
    Premise,
}

impl AddressLevel {
    /// Key of this level's node in `AddressDetails`
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::AdministrativeArea => "AdministrativeArea",
            Self::SubAdministrativeArea => "SubAdministrativeArea",
            Self::Locality => "Locality",
            Self::DependentLocality => "DependentLocality",
            Self::Thoroughfare => "Thoroughfare",
            Self::Premise => "Premise",
        }
    }

    /// Key of the field holding this level's display value
    #[must_use]
    pub const fn name_field(self) -> &'static str {
        match self {
            Self::Country => "CountryName",
            Self::AdministrativeArea => "AdministrativeAreaName",
            Self::SubAdministrativeArea => "SubAdministrativeAreaName",
            Self::Locality => "LocalityName",
            Self::DependentLocality => "DependentLocalityName",
            Self::Thoroughfare => "ThoroughfareName",
            Self::Premise => "PremiseNumber",
        }
    }

    /// Levels that may appear directly under this one
    #[must_use]
    pub const fn children(self) -> &'static [Self] {
        match self {
            Self::Country => &[Self::AdministrativeArea],
            Self::AdministrativeArea => &[Self::SubAdministrativeArea, Self::Locality],
            Self::SubAdministrativeArea => &[Self::Locality],
            Self::Locality | Self::DependentLocality => {
                &[Self::DependentLocality, Self::Thoroughfare]
            },
            Self::Thoroughfare => &[Self::Premise],
            Self::Premise => &[],
        }
    }
}

/// Values found along the hierarchy below `node`, in walk order
///
/// Duplicates are kept; see [`full_address_parts`].
#[must_use]
pub fn walk(node: &Value, level: AddressLevel) -> Vec<String> {
    let mut parts: Vec<String> = node
        .get(level.name_field())
        .and_then(scalar_text)
        .into_iter()
        .collect();

    for child in level.children() {
        if let Some(child_node) = node.get(child.key()) {
            parts.extend(walk(child_node, *child));
        }
    }

    parts
}

/// Ordered, de-duplicated address parts of an `AddressDetails` node
///
/// Starts at its `Country`; a missing country yields no parts. The first
/// occurrence of a repeated value wins.
#[must_use]
pub fn full_address_parts(address_details: &Value) -> Vec<String> {
    let Some(country) = address_details.get(AddressLevel::Country.key()) else {
        return Vec::new();
    };

    let mut parts = walk(country, AddressLevel::Country);
    let mut seen = std::collections::HashSet::with_capacity(parts.len());
    parts.retain(|part| seen.insert(part.clone()));
    parts
}

/// Text of a scalar JSON value; objects, arrays and null have none
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
