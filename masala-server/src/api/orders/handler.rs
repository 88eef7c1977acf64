//! Order API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use shared::cart::CheckoutRequest;
use shared::order::{ItemStatus, Order, OrderStatus, PaymentStatus};
use shared::permission::Section;
use shared::relay::ChangeAction;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};

/// Checkout payload validation wrapper
#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutPayload {
    #[validate(length(min = 1, max = 120))]
    pub customer_name: String,
    #[validate(length(max = 32))]
    pub customer_phone: Option<String>,
    #[validate(length(min = 1, message = "cart must not be empty"))]
    pub items: Vec<shared::cart::CartItem>,
}

impl From<CheckoutPayload> for CheckoutRequest {
    fn from(p: CheckoutPayload) -> Self {
        CheckoutRequest {
            customer_name: p.customer_name,
            customer_phone: p.customer_phone,
            items: p.items,
        }
    }
}

/// List all orders, newest first (staff)
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Order>>> {
    user.require_section(Section::Orders)?;
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all().await?;
    Ok(Json(orders))
}

/// Get order by id (staff)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    user.require_section(Section::Orders)?;
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

/// Customer checkout (public route)
///
/// Creates the order with status=pending, payment=pending,
/// `total_amount = Σ price × quantity`.
pub async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutPayload>,
) -> AppResult<Json<Order>> {
    payload.validate()?;
    let request: CheckoutRequest = payload.into();

    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .create_from_cart(request.customer_name, request.customer_phone, &request.items)
        .await?;

    tracing::info!(order_id = %order.id, total = order.total_amount, "Order placed");
    state.broadcast_order_change(ChangeAction::Insert, &order.id);

    Ok(Json(order))
}

/// Status update request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// PATCH /api/orders/{id}/status - staff status update
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Order>> {
    user.require_section(Section::Orders)?;
    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update_status(&id, payload.status).await?;

    state.broadcast_order_change(ChangeAction::Update, &order.id);
    Ok(Json(order))
}

/// Payment status update request
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    pub payment_status: PaymentStatus,
}

/// PATCH /api/orders/{id}/payment
pub async fn update_payment(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePaymentRequest>,
) -> AppResult<Json<Order>> {
    user.require_section(Section::Orders)?;
    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update_payment_status(&id, payload.payment_status).await?;

    state.broadcast_order_change(ChangeAction::Update, &order.id);
    Ok(Json(order))
}

/// Cancellation request
#[derive(Debug, Deserialize, Default)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

/// POST /api/orders/{id}/cancel
///
/// Stamps reason + timestamp; no inventory or payment rollback.
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<CancelRequest>,
) -> AppResult<Json<Order>> {
    user.require_section(Section::Orders)?;
    let reason = payload.reason;

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.cancel(&id, reason).await?;

    tracing::info!(order_id = %order.id, "Order cancelled");
    state.broadcast_order_change(ChangeAction::Update, &order.id);
    Ok(Json(order))
}

/// Item status update request
#[derive(Debug, Deserialize)]
pub struct UpdateItemStatusRequest {
    pub item_status: ItemStatus,
}

/// PATCH /api/orders/{id}/items/{item_id}/status - kitchen update
///
/// May auto-advance the order to `ready` when every item is done.
pub async fn update_item_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, item_id)): Path<(String, String)>,
    Json(payload): Json<UpdateItemStatusRequest>,
) -> AppResult<Json<Order>> {
    user.require_section(Section::Orders)?;
    let repo = OrderRepository::new(state.db.clone());
    let (order, advanced) = repo
        .update_item_status(&id, &item_id, payload.item_status)
        .await?;

    state.broadcast_item_change(ChangeAction::Update, &order.id, &item_id);
    if advanced {
        tracing::info!(order_id = %order.id, "All items done, order advanced to ready");
        state.broadcast_order_change(ChangeAction::Update, &order.id);
    }
    Ok(Json(order))
}

/// POST /api/orders/{id}/items/{item_id}/complete-one
///
/// Increments `completed_quantity` by exactly one.
pub async fn complete_one(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, item_id)): Path<(String, String)>,
) -> AppResult<Json<Order>> {
    user.require_section(Section::Orders)?;
    let repo = OrderRepository::new(state.db.clone());
    let (order, advanced) = repo.complete_item_unit(&id, &item_id).await?;

    state.broadcast_item_change(ChangeAction::Update, &order.id, &item_id);
    if advanced {
        state.broadcast_order_change(ChangeAction::Update, &order.id);
    }
    Ok(Json(order))
}

/// DELETE /api/orders/{id} - debug tooling only, not part of normal flow
pub async fn remove(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    user.require_section(Section::Orders)?;
    let repo = OrderRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await?;

    state.broadcast_order_change(ChangeAction::Delete, &id);
    Ok(Json(deleted))
}
