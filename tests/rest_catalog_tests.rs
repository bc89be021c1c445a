// Tests for the hosted backend catalog client against a mock server

use mockito::Matcher;
use serde_json::json;
use std::time::Duration;
use venue_match::services::{CatalogError, RestCatalogClient, RestError, VenueCatalog};

fn client(base_url: String) -> RestCatalogClient {
    RestCatalogClient::new(
        base_url,
        "anon-key".to_string(),
        "locations".to_string(),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_venues_for_group_pushes_capacity_filter() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/locations".to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("capacity_min".into(), "lte.20".into()),
            Matcher::UrlEncoded("capacity_max".into(), "gte.20".into()),
        ]))
        .match_header("apikey", "anon-key")
        .match_header("authorization", "Bearer anon-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {
                    "id": "a1",
                    "name": "Harbour Cruise",
                    "city": "Hamburg",
                    "price_per_person": 65,
                    "capacity_min": 10,
                    "capacity_max": 60
                },
                {
                    "id": 17,
                    "name": "Go-Kart Arena",
                    "price_per_person": 55.5,
                    "capacity_min": 6,
                    "capacity_max": 40
                },
                { "id": "broken", "name": "Missing price" }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let venues = client(server.url()).venues_for_group(20).await.unwrap();

    mock.assert_async().await;
    assert_eq!(venues.len(), 2);
    assert_eq!(venues[0].id, "a1");
    assert_eq!(venues[0].name(), Some("Harbour Cruise"));
    assert_eq!(venues[0].attributes.get("city"), Some(&json!("Hamburg")));
    assert_eq!(venues[1].id, "17");
    assert_eq!(venues[1].price_per_person, 55.5);
}

#[tokio::test]
async fn test_unauthorized() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", Matcher::Regex(r"^/rest/v1/locations".to_string()))
        .with_status(401)
        .create_async()
        .await;

    let result = client(server.url()).venues_for_group(20).await;
    assert!(matches!(result, Err(RestError::Unauthorized)));
}

#[tokio::test]
async fn test_server_error_surfaces_through_catalog() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", Matcher::Regex(r"^/rest/v1/locations".to_string()))
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let catalog = VenueCatalog::Rest(client(server.url()));
    let result = catalog.venues_for_group(20).await;

    assert!(matches!(result, Err(CatalogError::Rest(RestError::ApiError(_)))));
    assert!(!catalog.health_check().await);
}

#[tokio::test]
async fn test_non_array_body_rejected() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", Matcher::Regex(r"^/rest/v1/locations".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "not rows"}"#)
        .create_async()
        .await;

    let result = client(server.url()).venues_for_group(20).await;
    assert!(matches!(result, Err(RestError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_health_check_hits_table() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/locations".to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "id".into()),
            Matcher::UrlEncoded("limit".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let catalog = VenueCatalog::Rest(client(server.url()));
    assert!(catalog.health_check().await);
    mock.assert_async().await;
}
