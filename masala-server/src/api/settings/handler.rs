//! Restaurant Settings Handlers

use axum::{Extension, Json, extract::State};

use shared::permission::Section;
use shared::settings::RestaurantSettings;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::SettingsRepository;
use crate::utils::AppResult;

/// GET /api/restaurant-settings. Public route (branding for the
/// customer-facing menu).
pub async fn get_settings(State(state): State<ServerState>) -> AppResult<Json<RestaurantSettings>> {
    let repo = SettingsRepository::new(state.db.clone());
    let settings = repo.get().await?.unwrap_or_default();
    Ok(Json(settings))
}

/// PUT /api/restaurant-settings
pub async fn put_settings(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<RestaurantSettings>,
) -> AppResult<Json<RestaurantSettings>> {
    user.require_section(Section::Settings)?;
    let repo = SettingsRepository::new(state.db.clone());
    let settings = repo.put(payload).await?;
    tracing::info!(name = %settings.name, "Restaurant settings updated");
    Ok(Json(settings))
}
