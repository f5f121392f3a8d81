//! Mock HTTP server tests for `OpenAiCompatProvider`.
//!
//! Uses [`wiremock`] to stand up a local server that emulates the
//! OpenAI-compatible chat completion and embedding endpoints.

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voibot_core::error::ProviderError;
use voibot_core::message::Message;
use voibot_core::provider::{EmbeddingRequest, Provider, ProviderRequest};
use voibot_providers::OpenAiCompatProvider;

fn provider(server: &MockServer) -> OpenAiCompatProvider {
    OpenAiCompatProvider::new("mock", server.uri(), "sk-mock-key")
}

fn request(temperature: f32) -> ProviderRequest {
    ProviderRequest::new("test-model", vec![Message::user("Hello")], temperature)
}

// ── Completions ────────────────────────────────────────────────────────

#[tokio::test]
async fn complete_returns_first_choice() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "id": "chatcmpl-test-001",
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "greeting" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 1, "total_tokens": 11 }
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-mock-key"))
        .and(body_partial_json(serde_json::json!({ "temperature": 0.5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server).complete(request(0.5)).await.unwrap();
    assert_eq!(response.message.content, "greeting");
    assert_eq!(response.model, "test-model");
    assert_eq!(response.usage.unwrap().total_tokens, 11);
}

#[tokio::test]
async fn complete_401_is_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = provider(&server).complete(request(0.9)).await.unwrap_err();
    assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn complete_429_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = provider(&server).complete(request(0.9)).await.unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited { .. }));
}

#[tokio::test]
async fn complete_500_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(request(0.9)).await.unwrap_err();
    match err {
        ProviderError::ApiError { status_code, message } => {
            assert_eq!(status_code, 500);
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn complete_empty_choices_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "model": "test-model", "choices": [] })),
        )
        .mount(&server)
        .await;

    let err = provider(&server).complete(request(0.9)).await.unwrap_err();
    assert!(err.to_string().contains("No choices"));
}

#[tokio::test]
async fn complete_malformed_json_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(request(0.9)).await.unwrap_err();
    assert!(err.to_string().contains("Failed to parse response"));
}

// ── Embeddings ─────────────────────────────────────────────────────────

#[tokio::test]
async fn embed_returns_vectors_in_input_order() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "object": "list",
        "data": [
            { "object": "embedding", "embedding": [0.0, 1.0], "index": 1 },
            { "object": "embedding", "embedding": [1.0, 0.0], "index": 0 }
        ],
        "model": "text-embedding-3-small",
        "usage": { "prompt_tokens": 4, "total_tokens": 4 }
    });

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_partial_json(serde_json::json!({ "input": ["first", "second"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server)
        .embed(EmbeddingRequest {
            model: "text-embedding-3-small".into(),
            inputs: vec!["first".into(), "second".into()],
        })
        .await
        .unwrap();

    assert_eq!(response.embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[tokio::test]
async fn health_check_hits_models() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .mount(&server)
        .await;

    assert!(provider(&server).health_check().await.unwrap());
}
