//! Role API Handlers
//!
//! 角色 → 板块访问矩阵。板块键是类型化枚举，未知键在反序列化时即被
//! 拒绝，不存在字符串查表。

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use shared::permission::{Role, SectionAccess, Section};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::RoleRepository;
use crate::utils::AppResult;

/// GET /api/roles - full role/access matrix
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Role>>> {
    user.require_section(Section::Users)?;
    let repo = RoleRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// PUT /api/roles - replace the whole matrix (role name → access)
///
/// System roles cannot appear in the payload.
pub async fn put_matrix(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(matrix): Json<std::collections::BTreeMap<String, SectionAccess>>,
) -> AppResult<Json<Vec<Role>>> {
    user.require_section(Section::Users)?;
    let repo = RoleRepository::new(state.db.clone());
    for (name, access) in &matrix {
        repo.upsert(name, *access).await?;
    }
    tracing::info!(roles = matrix.len(), "Role matrix replaced");
    Ok(Json(repo.find_all().await?))
}

/// PUT /api/roles/{name} - replace one role's access matrix
pub async fn put_role(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(name): Path<String>,
    Json(access): Json<SectionAccess>,
) -> AppResult<Json<Role>> {
    user.require_section(Section::Users)?;
    let repo = RoleRepository::new(state.db.clone());
    let role = repo.upsert(&name, access).await?;
    tracing::info!(role = %role.name, "Role access updated");
    Ok(Json(role))
}
