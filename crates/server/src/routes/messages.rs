//! Message route handlers.
//!
//! The contact form accepts anonymous submissions; they land in the first
//! admin's inbox as a JSON envelope stored in the content column.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use bloomery_core::Email;

use crate::db::{MessageRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::ContactEnvelope;
use crate::state::AppState;

/// Contact-form request body.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

/// Submit a contact-form message. Works logged out; a logged-in caller is
/// recorded as the sender.
pub async fn create(
    OptionalAuth(current): OptionalAuth,
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> Result<impl IntoResponse> {
    if body.name.trim().is_empty()
        || body.subject.trim().is_empty()
        || body.message.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "Name, email, subject, and message are required.".to_string(),
        ));
    }

    let email = Email::parse(&body.email)
        .map_err(|_| AppError::BadRequest("A valid email address is required.".to_string()))?;

    // Contact messages land in the first admin's inbox
    let admin = UserRepository::new(state.pool())
        .first_admin()
        .await?
        .ok_or_else(|| AppError::Internal("no admin account configured".to_string()))?;

    let envelope = ContactEnvelope {
        name: body.name.trim().to_string(),
        email,
        phone: body.phone,
        subject: body.subject.trim().to_string(),
        message: body.message.trim().to_string(),
    };
    let content = serde_json::to_string(&envelope)
        .map_err(|e| AppError::Internal(format!("failed to encode message: {e}")))?;

    let message = MessageRepository::new(state.pool())
        .create(current.map(|u| u.id), admin.id, &content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Your message has been sent.",
            "data": message,
        })),
    ))
}

/// Every message the caller sent or received, newest first.
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let messages = MessageRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(messages))
}
