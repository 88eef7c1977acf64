//! Inventory API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Inventory router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // 订单出库扣减
        .route("/deduct", post(handler::deduct))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::remove),
        )
        .route("/{id}/restock", post(handler::restock))
}
