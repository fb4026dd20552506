//! Gemini client against a mock HTTP server.
//!
//! Run with: cargo test -p bizfin-ai --test gemini_client

use bizfin_ai::config::GeminiSettings;
use bizfin_ai::{AiConfig, AiError, FinanceAssistant, GeminiClient, GenerationRequest, GenerativeModel};
use bizfin_core::Direction;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";

fn settings_for(server: &MockServer) -> GeminiSettings {
    GeminiSettings {
        api_key: Some("test-key".to_string()),
        base_url: format!("{}/v1beta", server.uri()),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn text_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3, "totalTokenCount": 15}
    })
}

#[tokio::test]
async fn sends_key_header_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({"generationConfig": {"temperature": 0.5}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Xin chào")))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&settings_for(&server)).unwrap();
    let text = client
        .generate(&GenerationRequest::new("Chào").with_temperature(0.5))
        .await
        .unwrap();

    assert_eq!(text, "Xin chào");
}

#[tokio::test]
async fn maps_429_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&settings_for(&server)).unwrap();
    let result = client.generate(&GenerationRequest::new("Chào")).await;

    assert!(matches!(result, Err(AiError::RateLimited)));
}

#[tokio::test]
async fn maps_error_status_with_google_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&settings_for(&server)).unwrap();
    match client.generate(&GenerationRequest::new("Chào")).await {
        Err(AiError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn safety_block_is_content_filtered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"candidates": [{"finishReason": "SAFETY"}]})),
        )
        .mount(&server)
        .await;

    let client = GeminiClient::new(&settings_for(&server)).unwrap();
    let result = client.generate(&GenerationRequest::new("Chào")).await;

    assert!(matches!(result, Err(AiError::ContentFiltered)));
}

#[tokio::test]
async fn extraction_end_to_end() {
    let server = MockServer::start().await;
    let answer = json!({
        "customerName": "Công ty Global Tech",
        "date": "2023-10-15",
        "description": "Dự án outsource tháng 10",
        "taxRate": 0,
        "type": "OUTPUT",
        "category": "Cung cấp dịch vụ",
        "items": [{"name": "Phát triển module React", "unit": "Giờ", "quantity": 200, "price": 600000}]
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&answer)))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = AiConfig::default();
    config.gemini = settings_for(&server);
    let assistant = FinanceAssistant::from_config(&config).unwrap();
    assert!(assistant.is_configured());

    let today = NaiveDate::from_ymd_opt(2023, 10, 16).unwrap();
    let draft = assistant
        .extract_from_text_on("thu 120 triệu phí outsource của Global Tech", Direction::Purchase, today)
        .await
        .unwrap();

    assert_eq!(draft.direction, Direction::Sale);
    assert!(draft.vat_amount().is_zero());

    let invoice = draft.build().unwrap();
    assert_eq!(invoice.amount().dong(), 120_000_000);
    assert_eq!(invoice.description(), "Dự án outsource tháng 10");
}
