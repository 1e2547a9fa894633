use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{form::FormSubmission, handlers::AppState};

/// Handle /api/submissions
///
/// Relays a landing-page form to every recipient. Answers 502 when no
/// recipient could be reached; per-recipient failures are only logged.
pub async fn handle_submission(
    State(state): State<AppState>,
    Json(form): Json<FormSubmission>,
) -> impl IntoResponse {
    let config = state.config.load();

    let report = state
        .notifier
        .notify(
            &form,
            &config.telegram.recipient_chat_ids,
            config.messages.utc_offset(),
        )
        .await;

    let status = if report.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    (
        status,
        Json(json!({
            "success": report.is_success(),
            "recipients": report.recipients,
            "delivered": report.delivered,
            "failed": report.failed,
        })),
    )
}
