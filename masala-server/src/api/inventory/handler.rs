//! Inventory API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::inventory::{Deduction, InventoryItem, StockStatus};
use shared::permission::Section;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{InventoryItemCreate, InventoryItemUpdate};
use crate::db::repository::InventoryRepository;
use crate::inventory::deduct_for_order;
use crate::utils::AppResult;

/// Inventory row with its derived status
#[derive(Debug, Serialize)]
pub struct InventoryItemView {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub status: StockStatus,
}

impl From<InventoryItem> for InventoryItemView {
    fn from(item: InventoryItem) -> Self {
        Self {
            status: item.stock_status(),
            item,
        }
    }
}

/// GET /api/inventory - all rows with derived stock status
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<InventoryItemView>>> {
    user.require_section(Section::Inventory)?;
    let repo = InventoryRepository::new(state.db.clone());
    let items = repo.find_all().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<InventoryItemCreate>,
) -> AppResult<Json<InventoryItemView>> {
    user.require_section(Section::Inventory)?;
    payload.validate()?;
    let repo = InventoryRepository::new(state.db.clone());
    Ok(Json(repo.create(payload).await?.into()))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<InventoryItemUpdate>,
) -> AppResult<Json<InventoryItemView>> {
    user.require_section(Section::Inventory)?;
    payload.validate()?;
    let repo = InventoryRepository::new(state.db.clone());
    Ok(Json(repo.update(&id, payload).await?.into()))
}

/// Restock request
#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub quantity: f64,
}

/// POST /api/inventory/{id}/restock
pub async fn restock(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<RestockRequest>,
) -> AppResult<Json<InventoryItemView>> {
    user.require_section(Section::Inventory)?;
    let repo = InventoryRepository::new(state.db.clone());
    let item = repo.restock(&id, payload.quantity).await?;
    tracing::info!(item = %item.name, quantity = payload.quantity, "Inventory restocked");
    Ok(Json(item.into()))
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    user.require_section(Section::Inventory)?;
    let repo = InventoryRepository::new(state.db.clone());
    Ok(Json(repo.delete(&id).await?))
}

/// Deduction request
#[derive(Debug, Deserialize)]
pub struct DeductRequest {
    #[serde(rename = "orderId")]
    pub order_id: String,
}

/// Deduction response
#[derive(Debug, Serialize)]
pub struct DeductResponse {
    pub success: bool,
    pub deductions: Vec<Deduction>,
}

/// POST /api/inventory/deduct - deduct stock for a fulfilled order
///
/// All-or-nothing: insufficient stock returns 400 with the complete
/// shortfall list and deducts nothing.
pub async fn deduct(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<DeductRequest>,
) -> AppResult<Json<DeductResponse>> {
    user.require_section(Section::Inventory)?;
    let deductions = deduct_for_order(state.db.clone(), &payload.order_id).await?;
    tracing::info!(
        order_id = %payload.order_id,
        items = deductions.len(),
        "Inventory deducted for order"
    );
    Ok(Json(DeductResponse {
        success: true,
        deductions,
    }))
}
