//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`orders`] - 订单接口 (含实时流)
//! - [`menu`] - 菜单管理接口
//! - [`categories`] - 分类管理接口
//! - [`inventory`] - 库存管理接口 (含出库扣减)
//! - [`analytics`] - 报表接口
//! - [`settings`] - 餐厅设置接口
//! - [`roles`] - 角色权限接口
//! - [`users`] - 用户管理接口

pub mod auth;
pub mod health;

// Data models API
pub mod analytics;
pub mod categories;
pub mod inventory;
pub mod menu;
pub mod orders;
pub mod roles;
pub mod settings;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
