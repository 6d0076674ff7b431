//! Yandex Geocoder integration
//!
//! Client for the [Yandex Geocoder](https://yandex.ru/dev/geocode/) HTTP API.
//!
//! # Architecture
//!
//! [`QueryBuilder`] accumulates request filters and renders the request URL.
//! [`GeocodeClient`] sends it through a [`Transport`] (by default
//! [`ReqwestTransport`]) and classifies the outcome into a
//! [`ResponseEnvelope`] or a [`GeocoderError`]. Each returned object is
//! flattened by [`GeoObject`], which walks the administrative address
//! hierarchy (country → ... → premise) into an ordered list of parts.
//!
//! The client never retries or caches; every failure is returned to the
//! caller exactly once.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_yandex_geo::{GeocodeClient, GeocoderConfig, Lang};
//!
//! let client = GeocodeClient::new(&GeocoderConfig::default().with_api_key("..."))?;
//!
//! let mut query = client.query();
//! query.set_query("Москва, Тверская 7").set_lang(Lang::AmericanEnglish).set_limit(1);
//!
//! let response = client.execute(&query).await?;
//! if let Some(object) = response.first() {
//!     println!("{} ({:?}, {:?})", object.address(), object.latitude(), object.longitude());
//! }
//! ```

mod client;
mod config;
mod error;
mod geo_object;
mod hierarchy;
mod models;
mod query;
mod response;
mod transport;

pub use client::{GeocodeClient, ServiceFault, classify};
pub use config::GeocoderConfig;
pub use error::GeocoderError;
pub use geo_object::{ADDRESS_FIELDS, GeoObject};
pub use hierarchy::{AddressLevel, full_address_parts};
pub use models::{Kind, Lang};
pub use query::{DEFAULT_BASE_URL, DEFAULT_LIMIT, DEFAULT_VERSION, QueryBuilder, redact};
pub use response::ResponseEnvelope;
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError, TransportOptions};

pub use reqwest::Url;
