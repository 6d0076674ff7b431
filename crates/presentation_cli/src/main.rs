//! Yandex Geocoder CLI
//!
//! Command-line front end for forward and reverse geocoding.

#![allow(clippy::print_stdout)]

use std::fmt::Write as _;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use integration_yandex_geo::{GeoObject, GeocodeClient, GeocoderConfig, Kind, Lang, QueryBuilder};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Yandex Geocoder CLI
#[derive(Parser)]
#[command(name = "yandex-geo-cli")]
#[command(author, version, about = "Yandex Geocoder command-line client", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    options: QueryOptions,

    /// Print the raw response body as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Geocode a free-text address
    ///
    /// Example: yandex-geo-cli search "Москва, Тверская 7"
    Search {
        /// Address or place name
        text: String,
    },

    /// Find the objects at a coordinate pair
    ///
    /// Example: yandex-geo-cli reverse 37.611347 55.760241 --kind house
    Reverse {
        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
    },
}

#[derive(Args, Default)]
struct QueryOptions {
    /// Response language (ru-RU, uk-UA, be-BY, en-US, en-BR, tr-TR)
    #[arg(long, global = true)]
    lang: Option<Lang>,

    /// Maximum number of returned objects
    #[arg(long, global = true)]
    limit: Option<u32>,

    /// Number of leading objects to skip
    #[arg(long, global = true)]
    offset: Option<u32>,

    /// Toponym kind (house, street, metro, district, area, locality)
    #[arg(long, global = true)]
    kind: Option<Kind>,

    /// Search area span as "lon,lat"
    #[arg(long, global = true, value_parser = parse_pair)]
    span: Option<(f64, f64)>,

    /// Search area center as "lon,lat"
    #[arg(long, global = true, value_parser = parse_pair, requires = "span")]
    center: Option<(f64, f64)>,

    /// Only return objects inside the search area
    #[arg(long, global = true, requires = "span")]
    area_limit: bool,

    /// Geocoder API key
    #[arg(long, global = true, env = "YANDEX_GEO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Parse a "lon,lat" pair
fn parse_pair(value: &str) -> Result<(f64, f64), String> {
    let (longitude, latitude) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"lon,lat\", got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{}': {e}", part.trim()))
    };
    Ok((parse(longitude)?, parse(latitude)?))
}

/// Apply command-line options and the subcommand target to a query
fn apply_options(query: &mut QueryBuilder, options: &QueryOptions, command: &Commands) {
    match command {
        Commands::Search { text } => query.set_query(text.as_str()),
        Commands::Reverse {
            longitude,
            latitude,
        } => query.set_point(*longitude, *latitude),
    };

    if let Some(lang) = options.lang {
        query.set_lang(lang);
    }
    if let Some(limit) = options.limit {
        query.set_limit(limit);
    }
    if let Some(offset) = options.offset {
        query.set_offset(offset);
    }
    if let Some(kind) = options.kind {
        query.set_kind(kind);
    }
    if let Some((span_longitude, span_latitude)) = options.span {
        let center = options.center;
        query.set_area(
            span_longitude,
            span_latitude,
            center.map(|(longitude, _)| longitude),
            center.map(|(_, latitude)| latitude),
        );
        if options.area_limit {
            query.use_area_limit(true);
        }
    }
}

/// Render one object for terminal output
fn format_object(index: usize, object: &GeoObject) -> String {
    let mut out = format!("{}. {} [{}]\n", index + 1, object.address(), object.kind());

    if let (Some(latitude), Some(longitude)) = (object.latitude(), object.longitude()) {
        let _ = writeln!(out, "   📍 {latitude:.6}, {longitude:.6}");
    }
    if !object.full_address_parts().is_empty() {
        let _ = writeln!(out, "   🗺️  {}", object.full_address_parts().join(" → "));
    }

    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = GeocoderConfig::load().context("failed to load geocoder configuration")?;
    if let Some(api_key) = cli.options.api_key.clone() {
        config = config.with_api_key(api_key);
    }
    info!(base_url = %config.base_url, version = %config.version, "Geocoder configured");

    let client = GeocodeClient::new(&config)?;
    let mut query = client.query();
    apply_options(&mut query, &cli.options, &cli.command);

    let response = client.execute(&query).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(response.raw())?);
        return Ok(());
    }

    let objects = response.parsed_objects();
    if objects.is_empty() {
        println!("🔍 Nothing found");
        return Ok(());
    }

    if let Some(found) = response.found_count() {
        println!("🔍 Found {found} object(s), showing {}:", objects.len());
    }
    for (index, object) in objects.iter().enumerate() {
        print!("{}", format_object(index, object));
    }

    Ok(())
}
