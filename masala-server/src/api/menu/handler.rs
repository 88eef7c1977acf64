//! Menu API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use shared::menu::{MenuItem, MenuItemRequirement};
use shared::permission::Section;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{MenuItemCreate, MenuItemUpdate};
use crate::db::repository::MenuRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    /// `?all=true` includes unavailable items (admin view)
    #[serde(default)]
    pub all: bool,
}

/// List menu items. Public route: customers see available items only.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuRepository::new(state.db.clone());
    let items = repo.find_all(!query.all).await?;
    Ok(Json(items))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuRepository::new(state.db.clone());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {} not found", id)))?;
    Ok(Json(item))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    user.require_section(Section::Menu)?;
    payload.validate()?;
    let repo = MenuRepository::new(state.db.clone());
    let item = repo.create(payload).await?;
    Ok(Json(item))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    user.require_section(Section::Menu)?;
    payload.validate()?;
    let repo = MenuRepository::new(state.db.clone());
    let item = repo.update(&id, payload).await?;
    Ok(Json(item))
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    user.require_section(Section::Menu)?;
    let repo = MenuRepository::new(state.db.clone());
    Ok(Json(repo.delete(&id).await?))
}

/// GET /api/menu/{id}/inventory - requirement mapping
pub async fn get_requirements(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<MenuItemRequirement>>> {
    user.require_section(Section::Menu)?;
    let repo = MenuRepository::new(state.db.clone());
    Ok(Json(repo.get_requirements(&id).await?))
}

/// PUT /api/menu/{id}/inventory - replace requirement mapping
pub async fn set_requirements(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<Vec<MenuItemRequirement>>,
) -> AppResult<Json<Vec<MenuItemRequirement>>> {
    user.require_section(Section::Menu)?;
    let repo = MenuRepository::new(state.db.clone());
    Ok(Json(repo.set_requirements(&id, payload).await?))
}
