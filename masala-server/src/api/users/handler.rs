//! User API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use validator::Validate;

use shared::permission::Section;
use shared::user::User;

use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::models::UserCreate;
use crate::db::repository::{RoleRepository, UserRepository};
use crate::utils::{AppError, AppResult};

pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<User>>> {
    user.require_section(Section::Users)?;
    let repo = UserRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    user.require_section(Section::Users)?;
    payload.validate()?;

    // 角色必须存在
    if RoleRepository::new(state.db.clone())
        .find_by_name(&payload.role)
        .await?
        .is_none()
    {
        return Err(AppError::validation(format!(
            "Unknown role '{}'",
            payload.role
        )));
    }

    let password_hash = password::hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let repo = UserRepository::new(state.db.clone());
    let created = repo.create(payload, password_hash).await?;
    tracing::info!(username = %created.username, "User created");
    Ok(Json(created))
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    user.require_section(Section::Users)?;
    if user.id == id {
        return Err(AppError::validation("Cannot delete your own account"));
    }
    let repo = UserRepository::new(state.db.clone());
    Ok(Json(repo.delete(&id).await?))
}
