//! Restaurant Settings API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Settings router
pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/restaurant-settings",
        get(handler::get_settings).put(handler::put_settings),
    )
}
