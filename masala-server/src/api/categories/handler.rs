//! Category API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use validator::Validate;

use shared::menu::Category;
use shared::permission::Section;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::CategoryCreate;
use crate::db::repository::CategoryRepository;
use crate::utils::AppResult;

/// List categories. Public route (customer menu grouping).
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    user.require_section(Section::Menu)?;
    payload.validate()?;
    let repo = CategoryRepository::new(state.db.clone());
    Ok(Json(repo.create(payload).await?))
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    user.require_section(Section::Menu)?;
    let repo = CategoryRepository::new(state.db.clone());
    Ok(Json(repo.delete(&id).await?))
}
