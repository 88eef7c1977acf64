//! 库存模块 - 订单出库扣减

pub mod deduct;

pub use deduct::{aggregate_requirements, deduct_for_order, find_shortfalls};
