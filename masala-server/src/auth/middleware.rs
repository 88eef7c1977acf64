//! 认证中间件
//!
//! 为会话令牌认证提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RoleRepository, SessionRepository, UserRepository};
use crate::utils::AppError;

use shared::permission::SectionAccess;

/// 认证中间件 - 要求员工登录
///
/// 从 `Authorization: Bearer <token>` 头提取不透明令牌，对会话表校验
/// （存在且未过期）。验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径 (顾客端 + 公共接口)
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `POST /api/auth/login` (登录接口)
/// - `GET /api/menu`, `GET /api/categories` (顾客菜单)
/// - `POST /api/orders` (顾客下单)
/// - `GET /api/orders/realtime` (实时流)
/// - `GET /api/restaurant-settings` (品牌信息)
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 Unauthorized |
/// | 令牌未知或过期 | 401 SessionExpired |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if method == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_route(&method, &path) {
        return Ok(next.run(req).await);
    }

    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer);

    let Some(token) = token else {
        tracing::warn!(target: "security", %path, "Missing authorization header");
        return Err(AppError::Unauthorized);
    };

    let session = SessionRepository::new(state.db.clone())
        .find_valid(token)
        .await?
        .ok_or(AppError::SessionExpired)?;

    let user = UserRepository::new(state.db.clone())
        .find_by_id(&session.user_id)
        .await?
        .ok_or(AppError::SessionExpired)?;

    // 角色缺失按无权限处理，不拦截登录本身
    let access = RoleRepository::new(state.db.clone())
        .find_by_name(&user.role)
        .await?
        .map(|r| r.access)
        .unwrap_or_else(SectionAccess::default);

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
        role: user.role,
        access,
    });

    Ok(next.run(req).await)
}

/// Customer-facing and bootstrap routes that skip authentication
fn is_public_route(method: &http::Method, path: &str) -> bool {
    if *method == http::Method::POST {
        return path == "/api/auth/login" || path == "/api/orders";
    }
    if *method == http::Method::GET {
        return path == "/api/menu"
            || path == "/api/categories"
            || path == "/api/orders/realtime"
            || path == "/api/restaurant-settings";
    }
    false
}

/// Extract the token from a `Bearer <token>` header value
fn extract_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer("Basic abc123"), None);
    }

    #[test]
    fn public_routes() {
        assert!(is_public_route(&http::Method::POST, "/api/auth/login"));
        assert!(is_public_route(&http::Method::POST, "/api/orders"));
        assert!(is_public_route(&http::Method::GET, "/api/orders/realtime"));
        assert!(!is_public_route(&http::Method::GET, "/api/orders"));
        assert!(!is_public_route(&http::Method::PUT, "/api/restaurant-settings"));
        assert!(!is_public_route(&http::Method::DELETE, "/api/orders"));
    }
}
