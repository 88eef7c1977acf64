//! Repository Module
//!
//! Per-table data access over the embedded SurrealDB handle.

// Auth
pub mod role;
pub mod session;
pub mod user;

// Catalog
pub mod category;
pub mod menu;

// Inventory
pub mod inventory;

// Orders
pub mod order;

// System
pub mod settings;

// Re-exports
pub use category::CategoryRepository;
pub use inventory::InventoryRepository;
pub use menu::MenuRepository;
pub use order::OrderRepository;
pub use role::RoleRepository;
pub use session::SessionRepository;
pub use settings::SettingsRepository;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "order:abc".parse()?;
//   - 读路径一律投影 <string>id，wire 类型里只有字符串

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Parse a `table:key` id string, mapping failures to Validation
    pub fn parse_id(&self, id: &str) -> RepoResult<surrealdb::RecordId> {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))
    }
}
