//! Geocoder request constants
//!
//! Toponym kinds and response languages understood by the Yandex Geocoder.
//! Both convert into plain strings for the query builder, which passes any
//! value through unchecked.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Toponym kind (reverse geocoding only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// House
    House,
    /// Street
    Street,
    /// Metro station
    Metro,
    /// City district
    District,
    /// Regional district
    Area,
    /// Settlement (city, town, village)
    Locality,
}

impl Kind {
    /// All kinds, in declaration order
    pub const ALL: [Self; 6] = [
        Self::House,
        Self::Street,
        Self::Metro,
        Self::District,
        Self::Area,
        Self::Locality,
    ];

    /// Wire value of this kind
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Street => "street",
            Self::Metro => "metro",
            Self::District => "district",
            Self::Area => "area",
            Self::Locality => "locality",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown kind: {s}"))
    }
}

impl From<Kind> for String {
    fn from(kind: Kind) -> Self {
        kind.as_str().to_string()
    }
}

/// Preferred response language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Lang {
    /// Russian
    #[default]
    #[serde(rename = "ru-RU")]
    Russian,
    /// Ukrainian
    #[serde(rename = "uk-UA")]
    Ukrainian,
    /// Belarusian
    #[serde(rename = "be-BY")]
    Belarusian,
    /// American English
    #[serde(rename = "en-US")]
    AmericanEnglish,
    /// British English
    #[serde(rename = "en-BR")]
    BritishEnglish,
    /// Turkish (map of Turkey only)
    #[serde(rename = "tr-TR")]
    Turkish,
}

impl Lang {
    /// All languages, in declaration order
    pub const ALL: [Self; 6] = [
        Self::Russian,
        Self::Ukrainian,
        Self::Belarusian,
        Self::AmericanEnglish,
        Self::BritishEnglish,
        Self::Turkish,
    ];

    /// Wire value of this language
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Russian => "ru-RU",
            Self::Ukrainian => "uk-UA",
            Self::Belarusian => "be-BY",
            Self::AmericanEnglish => "en-US",
            Self::BritishEnglish => "en-BR",
            Self::Turkish => "tr-TR",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown language: {s}"))
    }
}

impl From<Lang> for String {
    fn from(lang: Lang) -> Self {
        lang.as_str().to_string()
    }
}
