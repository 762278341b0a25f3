//! Admin user management route handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use bloomery_core::{Role, UserId};

use crate::db::{OrderRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Role change request body. Parsed explicitly so unknown values produce
/// 400 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

/// All users with their order counts.
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool())
        .list_with_order_counts()
        .await?;

    Ok(Json(users))
}

/// One user with their order history.
pub async fn show(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let id = UserId::new(id);
    let user = UserRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    let orders = OrderRepository::new(state.pool()).list_for_user(id).await?;

    Ok(Json(json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
        "created_at": user.created_at,
        "orders": orders,
    })))
}

/// Change a user's role. Admins cannot change their own role.
pub async fn update_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<RoleRequest>,
) -> Result<impl IntoResponse> {
    let target = UserId::new(id);

    if admin.id == target {
        return Err(AppError::BadRequest(
            "You cannot change your own role.".to_string(),
        ));
    }

    let role = body
        .role
        .parse::<Role>()
        .map_err(|_| AppError::BadRequest("Invalid role.".to_string()))?;

    let user = UserRepository::new(state.pool())
        .update_role(target, role)
        .await?;

    tracing::info!(target = %target, new_role = %role, by = %admin.id, "role updated");

    Ok(Json(json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
    })))
}

/// Delete a user. Admins cannot delete themselves or other admins.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let target = UserId::new(id);

    if admin.id == target {
        return Err(AppError::BadRequest(
            "You cannot delete your own account.".to_string(),
        ));
    }

    let repo = UserRepository::new(state.pool());
    let user = repo
        .get_by_id(target)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    if user.role.is_admin() {
        return Err(AppError::BadRequest(
            "Cannot delete admin users.".to_string(),
        ));
    }

    repo.delete(target).await?;

    tracing::info!(target = %target, by = %admin.id, "user deleted");

    Ok(Json(json!({ "message": "User deleted successfully." })))
}
