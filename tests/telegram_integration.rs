//! Integration tests for the Telegram notification transport

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use signal_bridge::config::types::TelegramConfig;
use signal_bridge::{ClientError, NotificationMessage, NotificationTransport, TelegramTransport};

const TOKEN: &str = "123456:TEST";

async fn create_transport() -> (MockServer, TelegramTransport) {
    let server = MockServer::start().await;
    let transport = TelegramTransport::new(&TelegramConfig {
        bot_token: TOKEN.to_string(),
        chat_id: "-1001234".to_string(),
        api_url: server.uri(),
    })
    .expect("Failed to create transport");
    (server, transport)
}

#[tokio::test]
async fn test_deliver_posts_html_message() {
    let (server, transport) = create_transport().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", TOKEN)))
        .and(body_json(json!({
            "chat_id": "-1001234",
            "text": "<b>ORDER</b>",
            "parse_mode": "HTML"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "message_id": 42 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = transport
        .deliver(&NotificationMessage::new("<b>ORDER</b>"))
        .await;

    assert!(result.is_ok(), "delivery failed: {:?}", result);
}

#[tokio::test]
async fn test_flood_control_is_rate_limit() {
    let (server, transport) = create_transport().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 7",
            "parameters": { "retry_after": 7 }
        })))
        .mount(&server)
        .await;

    match transport.deliver(&NotificationMessage::new("hi")).await {
        Err(ClientError::RateLimit {
            retry_after_seconds,
            ..
        }) => assert_eq!(retry_after_seconds, Some(7)),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_bad_request_keeps_description() {
    let (server, transport) = create_transport().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    match transport.deliver(&NotificationMessage::new("hi")).await {
        Err(ClientError::Venue { code, message }) => {
            assert_eq!(code, 400);
            assert_eq!(message, "Bad Request: chat not found");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let (server, transport) = create_transport().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let result = transport.deliver(&NotificationMessage::new("hi")).await;

    assert!(matches!(result, Err(ClientError::InvalidResponse(_))));
}
