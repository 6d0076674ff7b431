//! Integration tests for CLI
//!
//! Run the built binary against a mock geocoder configured through the
//! environment.

#![allow(clippy::panic)] // Allow panic! in tests for clear failure messages

use std::process::Output;

use tokio::process::Command;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BIN: &str = env!("CARGO_BIN_EXE_yandex-geo-cli");

fn sample_response() -> serde_json::Value {
    serde_json::json!({
        "response": {
            "GeoObjectCollection": {
                "metaDataProperty": {
                    "GeocoderResponseMetaData": { "request": "Springfield", "found": "1" }
                },
                "featureMember": [{
                    "GeoObject": {
                        "metaDataProperty": {
                            "GeocoderMetaData": {
                                "kind": "locality",
                                "text": "USA, Springfield",
                                "AddressDetails": {
                                    "Country": {
                                        "CountryName": "USA",
                                        "AdministrativeArea": {
                                            "AdministrativeAreaName": "Illinois",
                                            "Locality": { "LocalityName": "Springfield" }
                                        }
                                    }
                                }
                            }
                        },
                        "Point": { "pos": "-89.650148 39.781721" }
                    }
                }]
            }
        }
    })
}

async fn run(server: &MockServer, args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .env("YANDEX_GEO_BASE_URL", server.uri())
        .env("YANDEX_GEO_API_KEY", "cli-key")
        .output()
        .await
        .unwrap()
}

#[tokio::test]
async fn cli_search_prints_objects() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .and(query_param("geocode", "Springfield"))
        .and(query_param("apikey", "cli-key"))
        .and(query_param("results", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(&server, &["search", "Springfield", "--limit", "2"]).await;
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("USA, Springfield [locality]"));
    assert!(stdout.contains("USA → Illinois → Springfield"));
}

#[tokio::test]
async fn cli_reverse_json_prints_raw_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .and(query_param("geocode", "-89.650148,39.781721"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .mount(&server)
        .await;

    let output = run(&server, &["reverse", "-89.650148", "39.781721", "--json"]).await;
    assert!(output.status.success(), "{output:?}");

    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, sample_response());
}

#[tokio::test]
async fn cli_reports_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"error":{"message":"Invalid key","code":27}}"#),
        )
        .mount(&server)
        .await;

    let output = run(&server, &["search", "Springfield"]).await;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid key"));
}

#[tokio::test]
async fn cli_rejects_missing_subcommand() {
    let server = MockServer::start().await;

    let output = run(&server, &[]).await;
    assert!(!output.status.success());
}
