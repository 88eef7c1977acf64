//! 认证模块 - 会话令牌 + Argon2 口令
//!
//! # 模块结构
//!
//! - [`password`] - Argon2 哈希与校验
//! - [`middleware`] - Bearer 会话校验中间件
//! - [`CurrentUser`] - 注入请求扩展的登录上下文

pub mod middleware;
pub mod password;

pub use middleware::require_auth;

use shared::permission::{Section, SectionAccess};

use crate::utils::AppError;

/// 已登录用户上下文
///
/// 中间件验证会话后注入 `req.extensions_mut()`，处理器通过
/// `Extension<CurrentUser>` 取用。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub role: String,
    pub access: SectionAccess,
}

impl CurrentUser {
    /// Gate a handler on a back-office section
    pub fn require_section(&self, section: Section) -> Result<(), AppError> {
        if self.access.allows(section) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Role '{}' has no access to {}",
                self.role, section
            )))
        }
    }
}
