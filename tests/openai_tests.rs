//! OpenAI client tests against a wiremock server.

#![cfg(feature = "openai")]

use company_research::llm::LLMClient;
use company_research::llm::openai::OpenAIClient;
use company_research::types::AppError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

fn client(server: &MockServer) -> OpenAIClient {
    OpenAIClient::new(
        "sk-test".to_string(),
        server.uri(),
        "gpt-4o".to_string(),
        0.3,
    )
}

#[tokio::test]
async fn test_generate_with_system_sends_both_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": "Describe Acme Inc."}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(json!("## Narrative\nAcme [1]."))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server)
        .generate_with_system("Be brief.", "Describe Acme Inc.")
        .await
        .unwrap();

    assert_eq!(text, "## Narrative\nAcme [1].");
}

#[tokio::test]
async fn test_unauthorized_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        })))
        .mount(&server)
        .await;

    let result = client(&server).generate("Describe Acme Inc.").await;
    assert!(matches!(result, Err(AppError::SummarizationUnavailable(_))));
}

#[tokio::test]
async fn test_missing_content_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!(null))))
        .mount(&server)
        .await;

    let result = client(&server).generate("Describe Acme Inc.").await;
    assert!(matches!(result, Err(AppError::SummarizationMalformed(_))));
}
