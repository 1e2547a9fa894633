use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, handlers::AppState, telegram::Update};

/// Handle /telegram/webhook
///
/// Command handling never fails the request; only an update that does not
/// parse is rejected.
pub async fn handle_update(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting malformed webhook update");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "ok": false, "error": e.to_string() })),
            );
        }
    };

    tracing::debug!(update_id = update.update_id, "Received webhook update");

    let config = state.config.load();
    state.bot.handle_update(&update, &config).await;

    (StatusCode::OK, Json(json!({ "ok": true })))
}

#[derive(Debug, Default, Deserialize)]
pub struct SetWebhookRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Handle /webhook/set
///
/// Only a missing URL is an error; a rejected registration answers
/// `success: false` with the URL echoed back.
pub async fn set_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request: SetWebhookRequest = serde_json::from_slice(&body).unwrap_or_default();
    let url = request
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("URL is required".to_string()))?;

    let success = match state.telegram.set_webhook(&url).await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Failed to register webhook");
            false
        }
    };
    Ok(Json(json!({ "success": success, "url": url })))
}

/// Handle /webhook/delete
///
/// Bot API failures are reported as `success: false`, not as an HTTP error.
pub async fn delete_webhook(State(state): State<AppState>) -> impl IntoResponse {
    let success = match state.telegram.delete_webhook().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to delete webhook");
            false
        }
    };
    Json(json!({ "success": success }))
}
