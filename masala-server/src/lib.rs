//! Masala Server - 餐厅点单与后台管理服务
//!
//! # 架构概述
//!
//! 本模块是 Masala 服务端的主入口，提供以下核心功能：
//!
//! - **实时中继** (`realtime`): 行级变更 → SSE 事件流
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): 会话令牌 + Argon2 口令
//! - **HTTP API** (`api`): 订单 / 菜单 / 库存 / 报表 / 设置 / 角色
//!
//! # 模块结构
//!
//! ```text
//! masala-server/src/
//! ├── core/       # 配置、状态、服务器
//! ├── auth/       # 会话、口令、中间件
//! ├── api/        # HTTP 路由和处理器
//! ├── analytics/  # 报表聚合（纯函数）
//! ├── inventory/  # 订单出库扣减
//! ├── realtime/   # 变更总线 + SSE 中继
//! ├── db/         # 数据库层
//! └── utils/      # 工具函数
//! ```

pub mod analytics;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod inventory;
pub mod realtime;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use realtime::ChangeFeed;
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   __  ___                __
  /  |/  /___ __________ _/ /___ _
 / /|_/ / __ `/ ___/ __ `/ / __ `/
/ /  / / /_/ (__  ) /_/ / / /_/ /
/_/  /_/\__,_/____/\__,_/_/\__,_/
    "#
    );
}
