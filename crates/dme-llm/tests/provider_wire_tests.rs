//! Wire-format tests for the HTTP providers against an in-process server

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use dme_llm::{CompletionRequest, LlmError, OllamaProvider, OpenAiProvider, TextCompletion};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

type Captured = Arc<Mutex<Option<Value>>>;

/// Spawn a server on an ephemeral port and return its base URL
async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn schema_request() -> CompletionRequest {
    CompletionRequest::new("Extract the order.", "Patient needs a CPAP. Ordered by Dr. Cameron.")
        .with_schema("normalized_order", json!({"type": "object"}))
}

#[tokio::test]
async fn test_ollama_sends_schema_and_returns_response() {
    async fn generate(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
        *captured.lock().unwrap() = Some(body);
        Json(json!({"response": "{\"device\": \"CPAP\"}", "done": true}))
    }

    let captured: Captured = Arc::new(Mutex::new(None));
    let app = Router::new()
        .route("/api/generate", post(generate))
        .with_state(captured.clone());
    let base = spawn(app).await;

    let provider = OllamaProvider::new(base, "llama3.1", 5).unwrap();
    let text = provider.complete(&schema_request()).await.unwrap();
    assert_eq!(text, "{\"device\": \"CPAP\"}");

    let body = captured.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "llama3.1");
    assert_eq!(body["system"], "Extract the order.");
    assert_eq!(body["prompt"], "Patient needs a CPAP. Ordered by Dr. Cameron.");
    assert_eq!(body["format"]["type"], "object");
    assert_eq!(body["stream"], false);
}

#[tokio::test]
async fn test_ollama_missing_model() {
    async fn not_found() -> impl IntoResponse {
        (StatusCode::NOT_FOUND, "model not found")
    }

    let base = spawn(Router::new().route("/api/generate", post(not_found))).await;
    let provider = OllamaProvider::new(base, "nope", 5).unwrap();

    let result = provider.complete(&schema_request()).await;
    assert_eq!(result.unwrap_err(), LlmError::ModelNotAvailable("nope".to_string()));
}

#[tokio::test]
async fn test_ollama_server_error_status() {
    async fn failing() -> impl IntoResponse {
        (StatusCode::INTERNAL_SERVER_ERROR, "boom")
    }

    let base = spawn(Router::new().route("/api/generate", post(failing))).await;
    let provider = OllamaProvider::new(base, "llama3.1", 5).unwrap();

    match provider.complete(&schema_request()).await {
        Err(LlmError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ollama_malformed_envelope() {
    async fn garbage() -> &'static str {
        "not json at all"
    }

    let base = spawn(Router::new().route("/api/generate", post(garbage))).await;
    let provider = OllamaProvider::new(base, "llama3.1", 5).unwrap();

    let result = provider.complete(&schema_request()).await;
    assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_ollama_timeout_maps_to_timeout_error() {
    async fn slow() -> Json<Value> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Json(json!({"response": "{}", "done": true}))
    }

    let base = spawn(Router::new().route("/api/generate", post(slow))).await;
    let provider = OllamaProvider::new(base, "llama3.1", 1).unwrap();

    let result = provider.complete(&schema_request()).await;
    assert_eq!(result.unwrap_err(), LlmError::Timeout(1));
}

#[tokio::test]
async fn test_openai_sends_bearer_and_schema() {
    async fn chat(
        State(captured): State<Captured>,
        headers: axum::http::HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        *captured.lock().unwrap() = Some(json!({"auth": auth, "body": body}));
        Json(json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"device\": \"Wheelchair\"}"}}]
        }))
    }

    let captured: Captured = Arc::new(Mutex::new(None));
    let app = Router::new()
        .route("/v1/chat/completions", post(chat))
        .with_state(captured.clone());
    let base = spawn(app).await;

    let provider = OpenAiProvider::new(base, "gpt-4o-mini", "sk-test", 5).unwrap();
    let text = provider.complete(&schema_request()).await.unwrap();
    assert_eq!(text, "{\"device\": \"Wheelchair\"}");

    let seen = captured.lock().unwrap().clone().unwrap();
    assert_eq!(seen["auth"], "Bearer sk-test");
    assert_eq!(seen["body"]["response_format"]["json_schema"]["strict"], true);
}

#[tokio::test]
async fn test_openai_empty_choices_is_invalid_response() {
    async fn empty() -> Json<Value> {
        Json(json!({"choices": []}))
    }

    let base = spawn(Router::new().route("/v1/chat/completions", post(empty))).await;
    let provider = OpenAiProvider::new(base, "gpt-4o-mini", "sk-test", 5).unwrap();

    let result = provider.complete(&schema_request()).await;
    assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
}
