use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::time::Duration;

use crate::{
    config::TelegramConfig,
    error::AppError,
    logging::{redact_token, SensitiveToken},
};

/// Bot API client
///
/// Cheap to clone; the underlying `reqwest::Client` is shared.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    base_url: String,
    token: String,
    timeout: Duration,
    parse_mode: String,
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .field("token", &SensitiveToken::new(&self.token).to_string())
            .field("timeout", &self.timeout)
            .field("parse_mode", &self.parse_mode)
            .finish()
    }
}

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

impl TelegramClient {
    pub fn new(http: Client, config: &TelegramConfig) -> Self {
        Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.bot_token.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
            parse_mode: config.parse_mode.clone(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// POST a JSON body to a Bot API method, failing on non-2xx statuses
    async fn call(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, AppError> {
        let response = self
            .http
            .post(self.method_url(method))
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::UpstreamError {
                status,
                message: redact_token(&error_text, &self.token),
            });
        }

        Ok(response)
    }

    /// Send one text message to one chat
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), AppError> {
        let body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": self.parse_mode,
        });

        self.call("sendMessage", &body).await?;
        Ok(())
    }

    /// Register the webhook URL; returns the platform's `ok` flag
    pub async fn set_webhook(&self, url: &str) -> Result<bool, AppError> {
        let body = json!({
            "url": url,
            "allowed_updates": ["message"],
        });

        let response: ApiResponse = self.call("setWebhook", &body).await?.json().await?;
        tracing::info!(
            url = %url,
            ok = response.ok,
            description = response.description.as_deref().unwrap_or(""),
            "setWebhook answered"
        );
        Ok(response.ok)
    }

    /// Remove the webhook; returns the platform's `ok` flag
    pub async fn delete_webhook(&self) -> Result<bool, AppError> {
        let response: ApiResponse = self
            .call("deleteWebhook", &json!({}))
            .await?
            .json()
            .await?;
        tracing::info!(
            ok = response.ok,
            description = response.description.as_deref().unwrap_or(""),
            "deleteWebhook answered"
        );
        Ok(response.ok)
    }
}

/// Inbound update delivered to the webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    pub date: i64,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}
