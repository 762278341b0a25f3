//! Admin message route handlers.
//!
//! Replies are stored as new rows in the flat messages table, tagged
//! `"type":"reply"` in the content JSON and threaded to the original
//! purely by embedded id.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use bloomery_core::MessageId;

use crate::db::{MessageRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::ReplyEnvelope;
use crate::state::AppState;

/// Reply request body.
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub content: String,
}

/// The admin inbox: received messages plus sent replies, newest first.
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let messages = MessageRepository::new(state.pool())
        .list_for_admin(admin.id)
        .await?;

    Ok(Json(messages))
}

/// Reply to a contact message. The reply goes back to the original
/// sender; anonymous submissions have nobody to address it to.
pub async fn reply(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<ReplyRequest>,
) -> Result<impl IntoResponse> {
    if body.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Message content is required.".to_string(),
        ));
    }

    let id = MessageId::new(id);
    let messages = MessageRepository::new(state.pool());
    let original = messages
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Original message not found.".to_string()))?;

    let Some(original_sender) = original.sender else {
        return Err(AppError::Conflict(
            "Cannot reply to an anonymous message.".to_string(),
        ));
    };

    // The session only carries id/email; the envelope wants the display name
    let admin_user = UserRepository::new(state.pool())
        .get_by_id(admin.id)
        .await?
        .ok_or_else(|| AppError::Internal("session user no longer exists".to_string()))?;

    let envelope = ReplyEnvelope {
        original_message_id: id,
        admin_name: admin_user.name,
        admin_email: admin_user.email,
        message: body.content.trim().to_string(),
    };
    let content = serde_json::to_string(&envelope)
        .map_err(|e| AppError::Internal(format!("failed to encode reply: {e}")))?;

    let message = messages
        .create(Some(admin.id), original_sender.id, &content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Reply sent successfully.",
            "data": message,
        })),
    ))
}

/// Delete a message.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    MessageRepository::new(state.pool())
        .delete(MessageId::new(id))
        .await?;

    Ok(Json(json!({ "message": "Message deleted successfully." })))
}
