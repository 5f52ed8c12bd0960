//! Manual re-send of the two notification emails.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use cardintake_core::types::DbId;
use cardintake_events::NotificationDispatcher;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// Request body for both notification endpoints.
///
/// The id is kept as raw JSON so a wrongly typed value is reported like any
/// other invalid id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub submission_id: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub success: bool,
    pub email_id: String,
}

fn parse_submission_id(input: &NotificationRequest) -> AppResult<DbId> {
    let raw = match &input.submission_id {
        None | Some(serde_json::Value::Null) => "",
        Some(serde_json::Value::String(s)) => s.trim(),
        Some(other) => {
            return Err(AppError::BadRequest(format!("Invalid submission ID '{other}'")));
        }
    };
    if raw.is_empty() {
        return Err(AppError::BadRequest("Submission ID is required".into()));
    }

    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid submission ID '{raw}'")))
}

fn dispatcher(state: &AppState) -> AppResult<&Arc<NotificationDispatcher>> {
    state
        .dispatcher
        .as_ref()
        .ok_or_else(|| AppError::Delivery("Email delivery is not configured".into()))
}

/// POST /api/send-notification
///
/// Send the admin alert for an existing submission.
pub async fn send_notification(
    State(state): State<AppState>,
    AppJson(input): AppJson<NotificationRequest>,
) -> AppResult<Json<NotificationResponse>> {
    let id = parse_submission_id(&input)?;
    let email_id = dispatcher(&state)?.send_admin_alert(id).await?;

    Ok(Json(NotificationResponse {
        success: true,
        email_id,
    }))
}

/// POST /api/send-confirmation
///
/// Send the submitter confirmation for an existing submission.
pub async fn send_confirmation(
    State(state): State<AppState>,
    AppJson(input): AppJson<NotificationRequest>,
) -> AppResult<Json<NotificationResponse>> {
    let id = parse_submission_id(&input)?;
    let email_id = dispatcher(&state)?.send_confirmation(id).await?;

    Ok(Json(NotificationResponse {
        success: true,
        email_id,
    }))
}
