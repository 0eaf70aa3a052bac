// Web API tests: drive the axum router in-process with tower::ServiceExt.
//
// Requires the `web` feature. Run with:
//   cargo test --features web --test web_api

#![cfg(feature = "web")]

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use medchat::gate::{ContentGate, RestrictedTermSet};
use medchat::generation::{GenerationConfig, GenerationService, NoopGenerator};
use medchat::orchestrator::{Responder, REFUSAL_MESSAGE};
use medchat::prompt::PromptTemplate;
use medchat::web::{build_router, AppState};

struct FixedGenerator(&'static str);

#[async_trait]
impl GenerationService for FixedGenerator {
    async fn generate(&self, _prompt: &str, _config: &GenerationConfig) -> Result<String> {
        Ok(self.0.to_string())
    }
}

fn app(generator: Arc<dyn GenerationService>) -> axum::Router {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let terms = RestrictedTermSet::load(&root.join("config/restricted_terms.txt")).unwrap();
    let template = PromptTemplate::load(&root.join("config/prompt_template.txt")).unwrap();
    let responder = Responder::new(
        Arc::new(ContentGate::new(&terms).unwrap()),
        Arc::new(template),
        generator,
        GenerationConfig::default(),
    )
    .with_max_query_chars(200);

    build_router(AppState {
        responder: Arc::new(responder),
    })
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let response = app(Arc::new(NoopGenerator))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn chat_answers_allowed_question() {
    let response = app(Arc::new(FixedGenerator("prompt ### Response: Insulin therapy.")))
        .oneshot(chat_request(r#"{"question": "How is diabetes treated?"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["answer"], "Insulin therapy.");
}

#[tokio::test]
async fn chat_refuses_blocked_question_with_ok_status() {
    let response = app(Arc::new(NoopGenerator))
        .oneshot(chat_request(r#"{"question": "Tell me a joke about cake"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["answer"], REFUSAL_MESSAGE);
}

#[tokio::test]
async fn chat_rejects_missing_and_null_question() {
    for body in ["{}", r#"{"question": null}"#] {
        let response = app(Arc::new(NoopGenerator))
            .oneshot(chat_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
}

#[tokio::test]
async fn chat_rejects_overlong_question() {
    let body = serde_json::json!({ "question": "a".repeat(201) }).to_string();
    let response = app(Arc::new(NoopGenerator))
        .oneshot(chat_request(&body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_rejects_bodies_that_are_not_a_question_object() {
    for body in [r#"{"question": "#, r#"{"question": 5}"#, "not json at all"] {
        let response = app(Arc::new(NoopGenerator))
            .oneshot(chat_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let error = json_body(response).await["error"].as_str().unwrap().to_string();
        assert!(!error.contains("not json"), "error: {error}");
    }
}

#[tokio::test]
async fn chat_rejects_non_json_content_type_with_json_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"question": "How is asthma managed?"}"#))
        .unwrap();
    let response = app(Arc::new(NoopGenerator)).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].as_str().is_some());
}

#[tokio::test]
async fn chat_reports_backend_failure_as_bad_gateway() {
    let response = app(Arc::new(NoopGenerator))
        .oneshot(chat_request(r#"{"question": "How is asthma managed?"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert!(body["error"].as_str().is_some());
    assert_ne!(body["error"], REFUSAL_MESSAGE);
}

#[tokio::test]
async fn root_serves_chat_page() {
    let response = app(Arc::new(NoopGenerator))
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
}

#[tokio::test]
async fn index_path_serves_chat_page() {
    let response = app(Arc::new(NoopGenerator))
        .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
}
