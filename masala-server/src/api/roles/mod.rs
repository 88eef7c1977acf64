//! Role API Module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

/// Role router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/roles", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // 整表读写
        .route("/", get(handler::list).put(handler::put_matrix))
        // 单个角色
        .route("/{name}", put(handler::put_role))
}
