//! Menu API Module

mod handler;

use axum::{
    Router,
    routing::get,
};

use crate::core::ServerState;

/// Menu router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // 顾客菜单（GET 为公共路由）
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::remove),
        )
        // 菜品 → 库存映射
        .route(
            "/{id}/inventory",
            get(handler::get_requirements).put(handler::set_requirements),
        )
}
