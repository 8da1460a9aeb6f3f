//! Integration tests for the webhook commands against a mock Admin API.

use mockito::Matcher;
use serde_json::json;
use shopnado_cli::CliError;
use shopnado_cli::commands::webhook::{self, WebhookChanges};
use shopnado_cli::shopify::ShopifyError;
use shopnado_core::{ApiVersion, WebhookFormat, WebhookId};
use shopnado_integration_tests::{TEST_AUTHORIZATION, mock_client};

fn webhook_json(id: i64, topic: &str, address: &str) -> serde_json::Value {
    json!({
        "id": id,
        "address": address,
        "topic": topic,
        "created_at": "2024-01-02T11:04:28-05:00",
        "updated_at": "2024-01-02T11:04:28-05:00",
        "format": "json",
        "fields": [],
        "metafield_namespaces": [],
        "api_version": "2024-01"
    })
}

// =============================================================================
// List / Read
// =============================================================================

#[tokio::test]
async fn test_list_webhooks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/admin/webhooks.json")
        .match_header("authorization", TEST_AUTHORIZATION)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "webhooks": [
                    webhook_json(1, "orders/create", "https://example.com/a"),
                    webhook_json(2, "carts/update", "https://example.com/b"),
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = mock_client(&server.url());
    let webhooks = webhook::list(&client).await.expect("list");

    mock.assert_async().await;
    assert_eq!(webhooks.len(), 2);
    assert_eq!(webhooks[1].id, Some(WebhookId::new(2)));
    assert_eq!(webhooks[1].topic, "carts/update");
}

#[tokio::test]
async fn test_list_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/admin/webhooks.json")
        .with_status(200)
        .with_body(r#"{"webhooks":[]}"#)
        .create_async()
        .await;

    let webhooks = webhook::list(&mock_client(&server.url()))
        .await
        .expect("list");
    assert!(webhooks.is_empty());
}

#[tokio::test]
async fn test_read_webhook() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/admin/webhooks/42.json")
        .with_status(200)
        .with_body(json!({ "webhook": webhook_json(42, "app/uninstalled", "https://example.com") }).to_string())
        .create_async()
        .await;

    let webhook = webhook::read(&mock_client(&server.url()), WebhookId::new(42))
        .await
        .expect("read");
    assert_eq!(webhook.topic, "app/uninstalled");
    assert_eq!(webhook.address, "https://example.com");
}

#[tokio::test]
async fn test_read_missing_webhook_surfaces_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/admin/webhooks/7.json")
        .with_status(404)
        .with_body(r#"{"errors":"Not Found"}"#)
        .create_async()
        .await;

    let err = webhook::read(&mock_client(&server.url()), WebhookId::new(7))
        .await
        .expect_err("404");

    let CliError::Shopify(shopify) = err else {
        panic!("expected a Shopify error, got {err}");
    };
    assert!(shopify.is_not_found());
    assert_eq!(shopify.to_string(), "Not Found (404)");
}

#[tokio::test]
async fn test_unauthorized_is_verbatim() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/admin/webhooks.json")
        .with_status(401)
        .with_body(r#"{"errors":"[API] Invalid API key or access token (unrecognized login or wrong password)"}"#)
        .create_async()
        .await;

    let err = webhook::list(&mock_client(&server.url()))
        .await
        .expect_err("401");
    assert_eq!(
        err.to_string(),
        "[API] Invalid API key or access token (unrecognized login or wrong password) (401)"
    );
}

#[tokio::test]
async fn test_rate_limited() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/admin/webhooks.json")
        .with_status(429)
        .with_header("Retry-After", "2.0")
        .with_body(r#"{"errors":"Exceeded 2 calls per second for api client. Reduce request rates to resume uninterrupted service."}"#)
        .create_async()
        .await;

    let err = webhook::list(&mock_client(&server.url()))
        .await
        .expect_err("429");
    assert!(matches!(err, CliError::Shopify(ShopifyError::RateLimited(2))));
}

// =============================================================================
// Create / Update
// =============================================================================

#[tokio::test]
async fn test_create_webhook() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/admin/webhooks.json")
        .match_header("authorization", TEST_AUTHORIZATION)
        .match_body(Matcher::Json(json!({
            "webhook": {
                "address": "https://example.com/hooks",
                "topic": "orders/create",
                "format": "json"
            }
        })))
        .with_status(201)
        .with_body(json!({ "webhook": webhook_json(99, "orders/create", "https://example.com/hooks") }).to_string())
        .create_async()
        .await;

    let created = webhook::create(
        &mock_client(&server.url()),
        Some("https://example.com/hooks".to_owned()),
        Some("orders/create".to_owned()),
        WebhookFormat::Json,
    )
    .await
    .expect("create");

    mock.assert_async().await;
    assert_eq!(created.id, Some(WebhookId::new(99)));
}

#[tokio::test]
async fn test_create_requires_address_and_topic() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/admin/webhooks.json")
        .expect(0)
        .create_async()
        .await;
    let client = mock_client(&server.url());

    let err = webhook::create(&client, None, Some("orders/create".to_owned()), WebhookFormat::Json)
        .await
        .expect_err("missing address");
    assert_eq!(
        err.to_string(),
        "address, topic and format are all required to make a webhook"
    );

    let err = webhook::create(
        &client,
        Some("https://example.com".to_owned()),
        Some(String::new()),
        WebhookFormat::Json,
    )
    .await
    .expect_err("empty topic");
    assert!(matches!(err, CliError::InvalidInput(_)));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_validation_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/admin/webhooks.json")
        .with_status(422)
        .with_body(r#"{"errors":{"address":["for this topic has already been taken"]}}"#)
        .create_async()
        .await;

    let err = webhook::create(
        &mock_client(&server.url()),
        Some("https://example.com".to_owned()),
        Some("orders/create".to_owned()),
        WebhookFormat::Json,
    )
    .await
    .expect_err("422");

    assert_eq!(
        err.to_string(),
        "address: for this topic has already been taken (422)"
    );
}

#[tokio::test]
async fn test_update_keeps_unchanged_fields() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/admin/webhooks/5.json")
        .with_status(200)
        .with_body(json!({ "webhook": webhook_json(5, "orders/create", "https://old.example.com") }).to_string())
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/admin/webhooks/5.json")
        .match_body(Matcher::PartialJson(json!({
            "webhook": {
                "id": 5,
                "address": "https://new.example.com",
                "topic": "orders/create",
                "format": "xml"
            }
        })))
        .with_status(200)
        .with_body(
            json!({
                "webhook": {
                    "id": 5,
                    "address": "https://new.example.com",
                    "topic": "orders/create",
                    "format": "xml"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let updated = webhook::update(
        &mock_client(&server.url()),
        WebhookId::new(5),
        WebhookChanges {
            address: Some("https://new.example.com".to_owned()),
            topic: None,
            format: Some(WebhookFormat::Xml),
        },
    )
    .await
    .expect("update");

    put.assert_async().await;
    assert_eq!(updated.address, "https://new.example.com");
    assert_eq!(updated.format, WebhookFormat::Xml);
}

#[tokio::test]
async fn test_update_without_changes() {
    let server = mockito::Server::new_async().await;
    let err = webhook::update(
        &mock_client(&server.url()),
        WebhookId::new(5),
        WebhookChanges::default(),
    )
    .await
    .expect_err("no changes");
    assert!(matches!(err, CliError::InvalidInput(_)));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_webhook() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/admin/webhooks/8.json")
        .match_header("authorization", TEST_AUTHORIZATION)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    webhook::delete(&mock_client(&server.url()), WebhookId::new(8))
        .await
        .expect("delete");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_all_continues_after_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/admin/webhooks.json")
        .with_status(200)
        .with_body(
            json!({
                "webhooks": [
                    webhook_json(1, "orders/create", "https://example.com"),
                    webhook_json(2, "orders/paid", "https://example.com"),
                    webhook_json(3, "orders/updated", "https://example.com"),
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let first = server
        .mock("DELETE", "/admin/webhooks/1.json")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let failing = server
        .mock("DELETE", "/admin/webhooks/2.json")
        .with_status(500)
        .with_body(r#"{"errors":"Internal Server Error"}"#)
        .create_async()
        .await;
    let last = server
        .mock("DELETE", "/admin/webhooks/3.json")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let report = webhook::delete_all(&mock_client(&server.url()))
        .await
        .expect("bulk delete succeeds despite one failure");

    first.assert_async().await;
    failing.assert_async().await;
    last.assert_async().await;
    assert_eq!(report.deleted, vec![WebhookId::new(1), WebhookId::new(3)]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, WebhookId::new(2));
}

#[tokio::test]
async fn test_delete_all_fails_when_listing_fails() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/admin/webhooks.json")
        .with_status(401)
        .with_body(r#"{"errors":"Unauthorized"}"#)
        .create_async()
        .await;

    assert!(webhook::delete_all(&mock_client(&server.url())).await.is_err());
}

// =============================================================================
// Topics
// =============================================================================

const TOPIC_ERROR: &str = r#"{"errors":{"topic":["Invalid topic specified. Topics allowed: orders/create, app/uninstalled, carts/update"]}}"#;

#[tokio::test]
async fn test_topics_stable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/admin/webhooks.json")
        .match_body(Matcher::PartialJson(json!({ "webhook": { "topic": "asdf/asdf" } })))
        .with_status(422)
        .with_body(TOPIC_ERROR)
        .create_async()
        .await;

    let versions = webhook::topic_versions(None, false).expect("versions");
    let results = webhook::list_topics(&mock_client(&server.url()), &versions)
        .await
        .expect("topics");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].api_version, ApiVersion::Stable);
    assert_eq!(
        results[0].topics,
        vec!["app/uninstalled", "carts/update", "orders/create"]
    );
}

#[tokio::test]
async fn test_topics_pinned_version_path() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/admin/api/2020-04/webhooks.json")
        .with_status(422)
        .with_body(TOPIC_ERROR)
        .create_async()
        .await;

    let versions = webhook::topic_versions(Some("2020-04"), false).expect("versions");
    let results = webhook::list_topics(&mock_client(&server.url()), &versions)
        .await
        .expect("topics");

    mock.assert_async().await;
    assert_eq!(results[0].topics.len(), 3);
}

#[tokio::test]
async fn test_topics_auth_failure_is_not_scraped() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/admin/webhooks.json")
        .with_status(401)
        .with_body(r#"{"errors":"[API] Invalid API key or access token (unrecognized login or wrong password)"}"#)
        .create_async()
        .await;

    let err = webhook::list_topics(&mock_client(&server.url()), &[ApiVersion::Stable])
        .await
        .expect_err("401");
    assert!(matches!(
        err,
        CliError::Shopify(ShopifyError::Api { status: 401, .. })
    ));
}

#[tokio::test]
async fn test_topics_accepted_probe_is_cleaned_up() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/admin/webhooks.json")
        .with_status(201)
        .with_body(json!({ "webhook": webhook_json(77, "asdf/asdf", "https://asdf.com") }).to_string())
        .create_async()
        .await;
    let cleanup = server
        .mock("DELETE", "/admin/webhooks/77.json")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let err = webhook::list_topics(&mock_client(&server.url()), &[ApiVersion::Stable])
        .await
        .expect_err("accepted probe");

    cleanup.assert_async().await;
    assert!(matches!(
        err,
        CliError::Shopify(ShopifyError::TopicDiscovery(_))
    ));
}
