use super::*;
use crate::config::{Prompts, Settings};
use crate::transcript::{CaptionError, CaptionFragment, CaptionSource};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request};
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-test:generateContent";
const FALLBACK: &str =
    "No source material provided. Please generate the outline based on the topic alone.";

/// Serves "validURL" and fails "urlThatFails" as disabled captions.
#[derive(Default)]
struct MockCaptions {
    calls: AtomicUsize,
}

#[async_trait]
impl CaptionSource for MockCaptions {
    async fn fetch_captions(
        &self,
        reference: &str,
    ) -> std::result::Result<Vec<CaptionFragment>, CaptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match reference {
            "validURL" => Ok(vec![
                CaptionFragment::new("pricing starts"),
                CaptionFragment::new("with margins"),
            ]),
            "legacyURL" => Ok(vec![CaptionFragment::new("legacy slot")]),
            "missingVideo" => Err(CaptionError::NotFound),
            _ => Err(CaptionError::Disabled),
        }
    }
}

struct TestApp {
    server: MockServer,
    captions: Arc<MockCaptions>,
    router: Router,
}

async fn test_app(gemini_key: Option<&str>) -> TestApp {
    let server = MockServer::start().await;

    let mut settings = Settings::default();
    settings.generation.base_url = server.uri();
    settings.generation.model = "gemini-test".to_string();
    settings.generation.api_key = gemini_key.map(|k| k.to_string());
    settings.search.base_url = server.uri();
    settings.search.api_key = Some("yt-key".to_string());

    let captions = Arc::new(MockCaptions::default());
    let orchestrator =
        Orchestrator::with_components(settings, Prompts::default(), captions.clone()).unwrap();

    TestApp {
        server,
        captions,
        router: router(AppState::new(orchestrator)),
    }
}

async fn send(router: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn mount_generation_ok(server: &MockServer) -> Value {
    let payload = json!({"candidates": [{"content": {"parts": [{"text": "<h2>Hook</h2>"}]}}]});
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "gemini-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .expect(1)
        .mount(server)
        .await;
    payload
}

/// The JSON body of the single generation request the server received.
async fn sent_prompt(server: &MockServer) -> (String, String) {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    (
        sent["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .to_string(),
        sent["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .to_string(),
    )
}

#[tokio::test]
async fn test_health() {
    let app = test_app(None).await;
    let (status, body) = send(app.router, Method::GET, "/health", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_missing_topic_is_rejected_without_outbound_calls() {
    let app = test_app(Some("gemini-key")).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server)
        .await;

    let (status, body) = send(
        app.router,
        Method::POST,
        "/api/generate",
        r#"{"urls": ["validURL"]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Video Topic is required"}));
    assert_eq!(app.captions.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_api_key_fails_before_generation() {
    let app = test_app(None).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server)
        .await;

    let (status, body) = send(
        app.router,
        Method::POST,
        "/api/generate",
        r#"{"topic": "Pricing", "urls": ["validURL"]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "API key not configured"}));
    assert_eq!(app.captions.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_reference_cap_is_checked_before_api_key() {
    let app = test_app(None).await;
    let urls: Vec<String> = (0..11).map(|i| format!("video{}", i)).collect();
    let body = json!({"topic": "Pricing", "urls": urls}).to_string();

    let (status, body) = send(app.router, Method::POST, "/api/generate", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Too many video URLs: 11 provided, at most 10 allowed"})
    );
    assert_eq!(app.captions.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_topic_only_request_uses_default_persona_and_fallback() {
    let app = test_app(Some("gemini-key")).await;
    let payload = mount_generation_ok(&app.server).await;

    let (status, body) = send(
        app.router,
        Method::POST,
        "/api/generate",
        r#"{"topic": "How to price products", "persona": "unknown-value", "urls": []}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, payload);

    let (system, user) = sent_prompt(&app.server).await;
    assert!(system.contains("Generate a trust intro here"));
    assert_eq!(
        user,
        format!(
            "Video Topic: How to price products\n\nSource Material / Transcripts:\n{}",
            FALLBACK
        )
    );
    assert_eq!(app.captions.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_partial_transcript_failure_is_annotated_in_order() {
    let app = test_app(Some("gemini-key")).await;
    mount_generation_ok(&app.server).await;

    let (status, _) = send(
        app.router,
        Method::POST,
        "/api/generate",
        r#"{"topic": "Pricing", "persona": "michael-korona",
            "urls": ["validURL", "urlThatFails"], "url1": "legacyURL", "url2": ""}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.captions.calls.load(Ordering::SeqCst), 3);

    let (system, user) = sent_prompt(&app.server).await;
    assert!(system.contains("CMO at KORONA POS"));
    assert!(user.ends_with(
        "pricing starts with margins\n\n---\n\n\
         [Transcript unavailable for urlThatFails: Transcripts are disabled for this video.]\n\n---\n\n\
         legacy slot"
    ));
}

#[tokio::test]
async fn test_all_references_failing_still_generates() {
    let app = test_app(Some("gemini-key")).await;
    mount_generation_ok(&app.server).await;

    let (status, _) = send(
        app.router,
        Method::POST,
        "/api/generate",
        r#"{"topic": "Pricing", "urls": ["urlThatFails", "missingVideo"]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let (_, user) = sent_prompt(&app.server).await;
    assert!(user.ends_with(FALLBACK));
}

#[tokio::test]
async fn test_malformed_json() {
    let app = test_app(Some("gemini-key")).await;
    let (status, body) = send(app.router, Method::POST, "/api/generate", r#"{"topic": "#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid JSON body"}));
}

#[tokio::test]
async fn test_wrong_field_type() {
    let app = test_app(Some("gemini-key")).await;
    let (status, body) = send(app.router, Method::POST, "/api/generate", r#"{"topic": 5}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Invalid request body:"));
    assert!(!message.contains("GenerateBody"));
}

#[tokio::test]
async fn test_non_object_body_is_rejected_without_type_names() {
    let app = test_app(Some("gemini-key")).await;

    for raw in ["null", "[1, 2]", "\"topic\""] {
        let (status, body) = send(app.router.clone(), Method::POST, "/api/generate", raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "Invalid request body: expected a JSON object"})
        );
    }
}

#[tokio::test]
async fn test_upstream_quota_error_passes_through() {
    let app = test_app(Some("gemini-key")).await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({"error": {"code": 429, "message": "quota exceeded"}})),
        )
        .mount(&app.server)
        .await;

    let (status, body) = send(
        app.router,
        Method::POST,
        "/api/generate",
        r#"{"topic": "Pricing"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body, json!({"error": "Generation API error: quota exceeded"}));
}

#[tokio::test]
async fn test_wrong_method_and_unknown_route() {
    let app = test_app(None).await;

    let (status, body) = send(app.router.clone(), Method::GET, "/api/generate", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": "Method Not Allowed"}));

    let (status, body) = send(app.router, Method::POST, "/api/unknown", "{}").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn test_search_wraps_videos() {
    let app = test_app(None).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "pos systems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": {"videoId": "abcdefghijk"},
                "snippet": {
                    "title": "POS basics",
                    "channelTitle": "Retail",
                    "thumbnails": {"default": {"url": "https://i.ytimg.com/t.jpg"}}
                }
            }]
        })))
        .mount(&app.server)
        .await;

    let (status, body) = send(
        app.router,
        Method::POST,
        "/api/search",
        r#"{"query": "pos systems"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["videos"][0]["videoId"], "abcdefghijk");
    assert_eq!(body["videos"][0]["url"], "https://www.youtube.com/watch?v=abcdefghijk");
}

#[tokio::test]
async fn test_search_requires_query() {
    let app = test_app(None).await;
    let (status, body) = send(app.router, Method::POST, "/api/search", "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Search query is required"}));
}

#[tokio::test]
async fn test_transcript_endpoint() {
    let app = test_app(None).await;

    let (status, body) = send(
        app.router.clone(),
        Method::POST,
        "/api/transcript",
        r#"{"url": "validURL"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"transcript": "pricing starts with margins"}));

    let (status, body) = send(
        app.router.clone(),
        Method::POST,
        "/api/transcript",
        r#"{"url": "urlThatFails"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Transcripts are disabled for this video."}));

    let (status, body) = send(app.router, Method::POST, "/api/transcript", r#"{"url": " "}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "URL is required"}));
}

#[tokio::test]
async fn test_panics_become_json_errors() {
    async fn panics_with_str() -> &'static str {
        panic!("boom")
    }

    async fn panics_with_other() -> &'static str {
        std::panic::panic_any(42_u8)
    }

    let routes = Router::new()
        .route("/str", get(panics_with_str))
        .route("/other", get(panics_with_other));
    let app = with_layers(routes);

    let (status, body) = send(app.clone(), Method::GET, "/str", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "boom"}));

    let (status, body) = send(app, Method::GET, "/other", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "An unknown error occurred"}));
}

#[test]
fn test_panic_message_formats() {
    let owned: Box<dyn Any + Send> = Box::new(String::from("owned message"));
    assert_eq!(panic_message(owned.as_ref()), "owned message");

    let other: Box<dyn Any + Send> = Box::new(1.5_f64);
    assert_eq!(panic_message(other.as_ref()), "An unknown error occurred");
}
