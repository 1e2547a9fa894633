/// End-to-end tests through the HTTP router: bot commands, submissions and
/// webhook registration, with the Bot API mocked
use arc_swap::ArcSwap;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use httpmock::prelude::*;
use lead_relay::{
    bot::{goodbye_text, welcome_text},
    config::Config,
    handlers::AppState,
    server::create_router,
    store::SubscriberStore,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const TOKEN: &str = "2000:hook-token";
const ADMIN: &str = "615369157";

fn test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut cfg = Config::default();
    cfg.telegram.bot_token = TOKEN.to_string();
    cfg.telegram.api_base_url = server.base_url();
    cfg.telegram.admin_chat_ids = vec![ADMIN.to_string()];
    cfg.storage.subscribers_file = dir.path().join("subscribers.json");
    cfg
}

fn app(config: &Config) -> Router {
    let state = AppState::new(
        Arc::new(ArcSwap::from_pointee(config.clone())),
        reqwest::Client::new(),
    );
    create_router(config, state, None)
}

fn update(chat_id: i64, text: &str) -> Value {
    json!({
        "update_id": 1,
        "message": {
            "message_id": 7,
            "from": {"id": chat_id, "is_bot": false, "first_name": "Анна", "username": "anna"},
            "chat": {"id": chat_id, "type": "private"},
            "date": 1760000000,
            "text": text
        }
    })
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn send_path() -> String {
    format!("/bot{}/sendMessage", TOKEN)
}

#[tokio::test]
async fn test_start_then_stop_round_trip() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir);
    let app = app(&config);
    let store = SubscriberStore::new(config.storage.subscribers_file.clone());

    let welcome = server
        .mock_async(|when, then| {
            when.method(POST).path(send_path()).json_body(json!({
                "chat_id": "77",
                "text": welcome_text("Культура Метров"),
                "parse_mode": "HTML"
            }));
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;
    let goodbye = server
        .mock_async(|when, then| {
            when.method(POST).path(send_path()).json_body(json!({
                "chat_id": "77",
                "text": goodbye_text("Культура Метров"),
                "parse_mode": "HTML"
            }));
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;
    let not_subscribed = server
        .mock_async(|when, then| {
            when.method(POST).path(send_path()).json_body(json!({
                "chat_id": "77",
                "text": "❌ Вы не были подписаны на уведомления.",
                "parse_mode": "HTML"
            }));
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;

    let (status, body) = post_json(&app, "/telegram/webhook", update(77, "/start")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    // A second /start keeps a single entry
    post_json(&app, "/telegram/webhook", update(77, "/start")).await;

    let subscribers = store.load().await.unwrap();
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].chat_id, "77");
    assert_eq!(subscribers[0].username.as_deref(), Some("anna"));
    welcome.assert_hits_async(2).await;

    post_json(&app, "/telegram/webhook", update(77, "/stop")).await;
    assert!(store.load().await.unwrap().is_empty());
    goodbye.assert_async().await;

    post_json(&app, "/telegram/webhook", update(77, "/stop")).await;
    not_subscribed.assert_async().await;
}

#[tokio::test]
async fn test_stats_only_for_admins() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir);
    let app = app(&config);

    let sends = server
        .mock_async(|when, then| {
            when.method(POST).path(send_path());
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;

    let (status, _) = post_json(&app, "/telegram/webhook", update(99, "/stats")).await;
    assert_eq!(status, StatusCode::OK);
    sends.assert_hits_async(0).await;

    post_json(
        &app,
        "/telegram/webhook",
        update(ADMIN.parse().unwrap(), "/stats"),
    )
    .await;
    sends.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_plain_text_is_ignored() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir);
    let app = app(&config);

    let any_send = server
        .mock_async(|when, then| {
            when.method(POST).path(send_path());
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;

    let (status, body) = post_json(&app, "/telegram/webhook", update(5, "hello")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    any_send.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_submission_endpoint_reports_delivery() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&server, &dir);
    config.telegram.recipient_chat_ids = vec![ADMIN.to_string(), "-1003806704116".to_string()];
    let app = app(&config);

    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(send_path());
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;

    let (status, body) = post_json(
        &app,
        "/api/submissions",
        json!({
            "formType": "engineer",
            "name": "Олег",
            "phone": "+7 912 000-11-22",
            "comment": "После 18:00"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["recipients"], 2);
    assert_eq!(body["delivered"], 2);
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_submission_without_recipients_is_bad_gateway() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir);
    let app = app(&config);

    let (status, body) = post_json(
        &app,
        "/api/submissions",
        json!({"formType": "contact", "name": "Анна", "phone": "1"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["recipients"], 0);
}

#[tokio::test]
async fn test_set_and_delete_webhook_endpoints() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir);
    let app = app(&config);

    let set_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/bot{}/setWebhook", TOKEN))
                .json_body(json!({
                    "url": "https://example.com/telegram/webhook",
                    "allowed_updates": ["message"]
                }));
            then.status(200).json_body(json!({"ok": true, "result": true}));
        })
        .await;
    let delete_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/bot{}/deleteWebhook", TOKEN));
            then.status(200).json_body(json!({"ok": true, "result": true}));
        })
        .await;

    let (status, body) = post_json(
        &app,
        "/webhook/set",
        json!({"url": "https://example.com/telegram/webhook"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["url"], "https://example.com/telegram/webhook");

    let (status, body) = post_json(&app, "/webhook/delete", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    set_mock.assert_async().await;
    delete_mock.assert_async().await;
}

#[tokio::test]
async fn test_set_webhook_rejected_by_api() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir);
    let app = app(&config);

    server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/bot{}/setWebhook", TOKEN));
            then.status(400).json_body(json!({
                "ok": false,
                "description": "Bad Request: bad webhook: HTTPS url must be provided for webhook"
            }));
        })
        .await;

    let (status, body) = post_json(
        &app,
        "/webhook/set",
        json!({"url": "http://insecure.example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["url"], "http://insecure.example.com");
}

#[tokio::test]
async fn test_delete_webhook_upstream_failure() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir);
    let app = app(&config);

    server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/bot{}/deleteWebhook", TOKEN));
            then.status(401)
                .json_body(json!({"ok": false, "description": "Unauthorized"}));
        })
        .await;

    let (status, body) = post_json(&app, "/webhook/delete", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_set_webhook_unreachable_api() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.telegram.bot_token = TOKEN.to_string();
    config.telegram.api_base_url = "http://127.0.0.1:9".to_string();
    config.storage.subscribers_file = dir.path().join("subscribers.json");
    let app = app(&config);

    let (status, body) = post_json(
        &app,
        "/webhook/set",
        json!({"url": "https://example.com/telegram/webhook"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["url"], "https://example.com/telegram/webhook");
}
