//! Order API Module
//!
//! 顾客下单 + 员工订单管理 + 实时流。

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;
use crate::realtime;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // 顾客下单（公共路由）+ 员工列表
        .route("/", get(handler::list).post(handler::checkout))
        // 实时流（公共路由）
        .route("/realtime", get(realtime::order_stream))
        // 单个订单
        .route("/{id}", get(handler::get_by_id).delete(handler::remove))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/payment", patch(handler::update_payment))
        .route("/{id}/cancel", post(handler::cancel))
        // 行项
        .route(
            "/{id}/items/{item_id}/status",
            patch(handler::update_item_status),
        )
        .route(
            "/{id}/items/{item_id}/complete-one",
            post(handler::complete_one),
        )
}
