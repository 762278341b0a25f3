//! Profile route handlers.
//!
//! Account details plus the phone/address contact record, flattened into
//! one payload the way the shop front-end expects it.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Profile update request body.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// The caller's account and contact details.
pub async fn show(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let repo = UserRepository::new(state.pool());
    let user = repo
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;
    let profile = repo.get_profile(current.id).await?.unwrap_or_default();

    Ok(Json(json!({
        "name": user.name,
        "email": user.email,
        "role": user.role,
        "phone": profile.phone.unwrap_or_default(),
        "address": profile.address.unwrap_or_default(),
    })))
}

/// Update the caller's display name and contact details.
pub async fn update(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<ProfileUpdate>,
) -> Result<impl IntoResponse> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required.".to_string()));
    }

    let repo = UserRepository::new(state.pool());
    let user = repo.update_name(current.id, body.name.trim()).await?;
    repo.upsert_profile(current.id, body.phone.as_deref(), body.address.as_deref())
        .await?;

    Ok(Json(json!({
        "name": user.name,
        "email": user.email,
        "role": user.role,
        "phone": body.phone.unwrap_or_default(),
        "address": body.address.unwrap_or_default(),
    })))
}
