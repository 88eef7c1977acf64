//! Authentication Handlers
//!
//! Handles login, logout, and session introspection

use axum::{Extension, Json, extract::State};
use http::HeaderMap;
use serde::{Deserialize, Serialize};

use shared::permission::SectionAccess;
use shared::user::User;

use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::{RoleRepository, SessionRepository, UserRepository};
use crate::utils::{AppError, AppResult};

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with the opaque session token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: User,
    pub access: SectionAccess,
}

/// Login handler
///
/// Verifies credentials against the user table and opens a session.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let users = UserRepository::new(state.db.clone());

    // 统一错误信息，避免账号枚举
    let user = users
        .find_by_username(&req.username)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let password_valid = password::verify_password(&req.password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !password_valid {
        tracing::warn!(target: "security", username = %req.username, "Failed login attempt");
        return Err(AppError::invalid_credentials());
    }

    let access = RoleRepository::new(state.db.clone())
        .find_by_name(&user.role)
        .await?
        .map(|r| r.access)
        .unwrap_or_default();

    let session = SessionRepository::new(state.db.clone())
        .create(&user.id, state.config.session_ttl_hours)
        .await?;

    tracing::info!(username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: user.into(),
        access,
    }))
}

/// Logout handler - drops the presented session
pub async fn logout(State(state): State<ServerState>, headers: HeaderMap) -> AppResult<Json<bool>> {
    let token = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AppError::Unauthorized)?;

    SessionRepository::new(state.db.clone()).delete(token).await?;
    Ok(Json(true))
}

/// Session introspection response
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    pub access: SectionAccess,
}

/// GET /api/auth/me - resolve the current session
pub async fn me(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<MeResponse>> {
    let user = UserRepository::new(state.db.clone())
        .find_by_id(&current.id)
        .await?
        .ok_or(AppError::SessionExpired)?;

    Ok(Json(MeResponse {
        user,
        access: current.access,
    }))
}
