/// Integration tests for the notification fan-out against a mock Bot API
use chrono::{FixedOffset, Utc};
use httpmock::prelude::*;
use lead_relay::{
    config::TelegramConfig,
    form::{CalculatorSnapshot, FormKind, FormSubmission},
    notifier::Notifier,
    store::{NewSubscriber, SubscriberStore},
    telegram::TelegramClient,
};
use serde_json::json;
use tempfile::TempDir;

const TOKEN: &str = "1000:test-token";

fn notifier_for(server: &MockServer, dir: &TempDir) -> (Notifier, SubscriberStore) {
    let config = TelegramConfig {
        bot_token: TOKEN.to_string(),
        api_base_url: server.base_url(),
        ..TelegramConfig::default()
    };
    let store = SubscriberStore::new(dir.path().join("subscribers.json"));
    let telegram = TelegramClient::new(reqwest::Client::new(), &config);
    (Notifier::new(telegram, store.clone()), store)
}

fn send_path() -> String {
    format!("/bot{}/sendMessage", TOKEN)
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn moscow() -> FixedOffset {
    FixedOffset::east_opt(3 * 3600).unwrap()
}

#[tokio::test]
async fn test_broadcast_tolerates_individual_failures() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let (notifier, _) = notifier_for(&server, &dir);

    let mut mocks = Vec::new();
    for (chat_id, status) in [("1", 200), ("2", 400), ("3", 200)] {
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path(send_path()).json_body(json!({
                    "chat_id": chat_id,
                    "text": "hello",
                    "parse_mode": "HTML"
                }));
                then.status(status)
                    .json_body(json!({"ok": status == 200, "description": "chat not found"}));
            })
            .await;
        mocks.push(mock);
    }

    let report = notifier.broadcast("hello", &ids(&["1", "2", "3"])).await;

    assert_eq!(report.recipients, 3);
    assert_eq!(report.delivered, 2);
    assert_eq!(report.failed, 1);
    assert!(report.is_success());
    for mock in &mocks {
        mock.assert_hits_async(1).await;
    }
}

#[tokio::test]
async fn test_broadcast_fails_when_nobody_receives() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let (notifier, _) = notifier_for(&server, &dir);

    server
        .mock_async(|when, then| {
            when.method(POST).path(send_path());
            then.status(401)
                .json_body(json!({"ok": false, "description": "Unauthorized"}));
        })
        .await;

    let report = notifier.broadcast("hello", &ids(&["1", "2"])).await;
    assert_eq!(report.delivered, 0);
    assert_eq!(report.failed, 2);
    assert!(!report.is_success());
}

#[tokio::test]
async fn test_broadcast_with_no_recipients_is_failure() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let (notifier, _) = notifier_for(&server, &dir);

    let report = notifier.broadcast("hello", &[]).await;
    assert_eq!(report.recipients, 0);
    assert!(!report.is_success());
}

#[tokio::test]
async fn test_notify_sends_to_union_of_subscribers_and_static_ids() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let (notifier, store) = notifier_for(&server, &dir);

    store.add(NewSubscriber::new("10")).await.unwrap();
    store.add(NewSubscriber::new("30")).await.unwrap();

    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(send_path());
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;

    let form = FormSubmission {
        kind: FormKind::Calculator {
            calculator_data: Some(CalculatorSnapshot {
                area: 45,
                is_new_build: true,
                has_design_project: false,
                needs_demolition: false,
                total_work: 810_000,
                total_materials: 540_000,
                total_design: 0,
                total: 1_350_000,
            }),
        },
        name: "Игорь".to_string(),
        phone: "89001112233".to_string(),
        comment: None,
    };

    let report = notifier
        .notify(&form, &ids(&["10", "20"]), moscow())
        .await;

    assert_eq!(report.recipients, 3);
    assert_eq!(report.delivered, 3);
    mock.assert_hits_async(3).await;
}

#[tokio::test]
async fn test_notify_falls_back_to_static_ids_on_store_error() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let (notifier, store) = notifier_for(&server, &dir);
    std::fs::write(store.path(), "{broken").unwrap();

    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(send_path());
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;

    let report = notifier
        .notify(
            &FormSubmission::contact("Анна", "+7 900 000-00-00"),
            &ids(&["615369157"]),
            moscow(),
        )
        .await;

    assert_eq!(report.recipients, 1);
    assert!(report.is_success());
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_notified_text_contains_name_and_phone() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();
    let (notifier, _) = notifier_for(&server, &dir);

    let form = FormSubmission::contact("Мария", "+7 (999) 123-45-67");
    let text = lead_relay::format::format_submission(&form, Utc::now().with_timezone(&moscow()));

    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(send_path()).json_body(json!({
                "chat_id": "5",
                "text": text,
                "parse_mode": "HTML"
            }));
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;

    let report = notifier.broadcast(&text, &ids(&["5"])).await;
    assert!(report.is_success());
    assert!(text.contains("Мария"));
    assert!(text.contains("+7 (999) 123-45-67"));
    mock.assert_async().await;
}
