//! Analytics API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Analytics router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/analytics", get(handler::get_analytics))
}
