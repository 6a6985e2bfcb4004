//! Tavily client tests against a wiremock server.

use company_research::search::SearchClient;
use company_research::search::tavily::TavilyClient;
use company_research::types::AppError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============= Helper Functions =============

fn client(server: &MockServer) -> TavilyClient {
    TavilyClient::new(
        server.uri(),
        Some("tvly-test".to_string()),
        "advanced",
        Duration::from_secs(5),
    )
    .unwrap()
}

fn hits(count: usize) -> serde_json::Value {
    let results: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "title": format!("Result {}", i),
                "url": format!("https://acme.example/{}", i),
                "content": format!("Content {}", i),
                "score": 0.9
            })
        })
        .collect();

    json!({"query": "Acme Inc", "results": results})
}

// ============= Tests =============

#[tokio::test]
async fn test_search_sends_query_and_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("authorization", "Bearer tvly-test"))
        .and(body_partial_json(json!({
            "query": "\"Acme Inc\" latest news developments",
            "max_results": 3,
            "search_depth": "advanced"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(3)))
        .expect(1)
        .mount(&server)
        .await;

    let results = client(&server)
        .search("\"Acme Inc\" latest news developments", 3)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].title, "Result 0");
    assert_eq!(results[0].url, "https://acme.example/0");
    assert_eq!(results[0].snippet, "Content 0");
    assert_eq!(results[0].score, Some(0.9));
}

#[tokio::test]
async fn test_results_capped_at_max() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(8)))
        .mount(&server)
        .await;

    let results = client(&server).search("Acme Inc", 5).await.unwrap();
    assert_eq!(results.len(), 5);
}

#[tokio::test]
async fn test_empty_results_are_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let results = client(&server).search("Unknown Co", 5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_unauthorized_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": {"error": "Invalid API key"}})),
        )
        .mount(&server)
        .await;

    let result = client(&server).search("Acme Inc", 5).await;
    match result {
        Err(AppError::SearchUnavailable(msg)) => assert!(msg.contains("401")),
        other => panic!("expected SearchUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client(&server).search("Acme Inc", 5).await;
    assert!(matches!(result, Err(AppError::SearchUnavailable(_))));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(hits(1))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = TavilyClient::new(
        server.uri(),
        Some("tvly-test".to_string()),
        "basic",
        Duration::from_millis(200),
    )
    .unwrap();

    let result = client.search("Acme Inc", 5).await;
    assert!(matches!(result, Err(AppError::SearchUnavailable(_))));
}

#[tokio::test]
async fn test_hits_without_url_are_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"title": "No URL", "content": "x"},
                {"title": "Acme", "url": "https://acme.example", "content": "y"}
            ]
        })))
        .mount(&server)
        .await;

    let results = client(&server).search("Acme Inc", 5).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Acme");
    assert_eq!(results[0].score, None);
}
