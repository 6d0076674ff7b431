//! Integration tests for the geocode client (wiremock-based)
//!
//! Exercise the real reqwest transport against a mock geocoder endpoint.

use std::time::Duration;

use integration_yandex_geo::{GeocodeClient, GeocoderConfig, GeocoderError, Kind, Lang};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for_mock(base_url: &str) -> GeocoderConfig {
    GeocoderConfig::for_testing()
        .with_base_url(base_url)
        .with_api_key("test-key")
}

fn sample_response() -> serde_json::Value {
    serde_json::json!({
        "response": {
            "GeoObjectCollection": {
                "metaDataProperty": {
                    "GeocoderResponseMetaData": {
                        "request": "Москва, Тверская 7",
                        "results": "10",
                        "found": "1"
                    }
                },
                "featureMember": [{
                    "GeoObject": {
                        "metaDataProperty": {
                            "GeocoderMetaData": {
                                "kind": "house",
                                "text": "Россия, Москва, Тверская улица, 7",
                                "precision": "exact",
                                "AddressDetails": {
                                    "Country": {
                                        "AddressLine": "Москва, Тверская улица, 7",
                                        "CountryNameCode": "RU",
                                        "CountryName": "Россия",
                                        "AdministrativeArea": {
                                            "AdministrativeAreaName": "Москва",
                                            "Locality": {
                                                "LocalityName": "Москва",
                                                "Thoroughfare": {
                                                    "ThoroughfareName": "Тверская улица",
                                                    "Premise": { "PremiseNumber": "7" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        },
                        "name": "Тверская улица, 7",
                        "description": "Москва, Россия",
                        "Point": { "pos": "37.611347 55.760241" }
                    }
                }]
            }
        }
    })
}

#[tokio::test]
async fn test_geocode_query_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .and(query_param("format", "json"))
        .and(query_param("geocode", "Москва, Тверская 7"))
        .and(query_param("lang", "en-US"))
        .and(query_param("results", "1"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeocodeClient::new(&config_for_mock(&server.uri())).unwrap();
    let mut query = client.query();
    query
        .set_query("Москва, Тверская 7")
        .set_lang(Lang::AmericanEnglish)
        .set_limit(1);

    let response = client.execute(&query).await.unwrap();
    assert_eq!(response.query(), Some("Москва, Тверская 7"));
    assert_eq!(response.found_count(), Some(1));

    let object = response.first().unwrap();
    assert_eq!(object.kind(), "house");
    assert_eq!(object.premise_number(), Some("7"));
    assert_eq!(object.latitude(), Some(55.760_241));
    assert_eq!(
        object.full_address_parts(),
        ["Россия", "Москва", "Тверская улица", "7"]
    );
}

#[tokio::test]
async fn test_reverse_geocode_with_area() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .and(query_param("geocode", "37.611347,55.760241"))
        .and(query_param("kind", "house"))
        .and(query_param("spn", "0.100000,0.200000"))
        .and(query_param("rspn", "1"))
        .and(query_param_is_missing("ll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeocodeClient::new(&config_for_mock(&server.uri())).unwrap();
    let mut query = client.query();
    query
        .set_point(37.611_347, 55.760_241)
        .set_kind(Kind::House)
        .set_area(0.1, 0.2, Some(0.0), Some(0.0))
        .use_area_limit(true);

    let response = client.execute(&query).await.unwrap();
    assert_eq!(response.parsed_objects().len(), 1);
}

#[tokio::test]
async fn test_bad_gateway() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeocodeClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.execute(&client.query()).await.unwrap_err();

    match err {
        GeocoderError::RemoteServer { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_internal_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("  Internal error  "))
        .mount(&server)
        .await;

    let client = GeocodeClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.execute(&client.query()).await.unwrap_err();

    assert!(matches!(
        err,
        GeocoderError::RemoteServer { status: 500, ref message } if message == "Internal error"
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"error":{"message":"Invalid key","code":27}}"#),
        )
        .mount(&server)
        .await;

    let client = GeocodeClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.execute(&client.query()).await.unwrap_err();

    assert_eq!(err.service_code(), Some(27));
    assert!(err.to_string().contains("Invalid key"));
}

#[tokio::test]
async fn test_forbidden_with_status_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "statusCode": 403,
            "error": "Forbidden",
            "message": "Invalid api key"
        })))
        .mount(&server)
        .await;

    let client = GeocodeClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.execute(&client.query()).await.unwrap_err();

    assert!(matches!(
        err,
        GeocoderError::Service { code: 403, ref message } if message == "Invalid api key"
    ));
}

#[tokio::test]
async fn test_empty_body_is_malformed_and_redacted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = GeocodeClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.execute(&client.query()).await.unwrap_err();

    match err {
        GeocoderError::MalformedPayload { url } => {
            assert!(url.starts_with(&server.uri()));
            assert!(!url.contains("test-key"));
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_follows_redirects() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/legacy/1.x/"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/1.x/?format=json", server.uri()).as_str()),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .mount(&server)
        .await;

    let config = config_for_mock(&format!("{}/legacy", server.uri()));
    let client = GeocodeClient::new(&config).unwrap();

    let response = client.execute(&client.query()).await.unwrap();
    assert_eq!(response.len(), 1);
}

#[tokio::test]
async fn test_connection_refused_is_transport_failure() {
    // Nothing listens on port 1
    let client = GeocodeClient::new(&config_for_mock("http://127.0.0.1:1")).unwrap();
    let err = client.execute(&client.query()).await.unwrap_err();

    assert!(matches!(err, GeocoderError::Transport(_)));
}

#[tokio::test]
async fn test_timeout_is_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_response())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = GeocoderConfig {
        timeout_secs: 1,
        ..config_for_mock(&server.uri())
    };
    let client = GeocodeClient::new(&config).unwrap();
    let err = client.execute(&client.query()).await.unwrap_err();

    assert!(matches!(err, GeocoderError::Transport(_)));
}
