//! Role Repository
//!
//! 角色 → 板块访问矩阵。admin 受 is_system 保护，不可改写。

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::permission::{Role, SectionAccess};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::RoleRecord;

const TABLE: &str = "role";

#[derive(Clone)]
pub struct RoleRepository {
    base: BaseRepository,
}

impl RoleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Role>> {
        let roles: Vec<Role> = self
            .base
            .db()
            .query("SELECT name, access, is_system FROM role ORDER BY name")
            .await?
            .take(0)?;
        Ok(roles)
    }

    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Role>> {
        let roles: Vec<Role> = self
            .base
            .db()
            .query("SELECT name, access, is_system FROM role WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?
            .take(0)?;
        Ok(roles.into_iter().next())
    }

    /// Create or replace a role's access matrix.
    ///
    /// System roles reject edits; unknown roles are created non-system.
    pub async fn upsert(&self, name: &str, access: SectionAccess) -> RepoResult<Role> {
        if let Some(existing) = self.find_by_name(name).await?
            && existing.is_system
        {
            return Err(RepoError::Validation(format!(
                "Role '{}' is a system role and cannot be modified",
                name
            )));
        }

        self.base
            .db()
            .query("DELETE role WHERE name = $name")
            .bind(("name", name.to_string()))
            .await?
            .check()?;

        let record = RoleRecord {
            name: name.to_string(),
            access,
            is_system: false,
        };
        let _created: Option<serde_json::Value> =
            self.base.db().create(TABLE).content(record).await?;

        self.find_by_name(name)
            .await?
            .ok_or_else(|| RepoError::Database("Role not found after upsert".to_string()))
    }

    /// Seed-only insert, allows system roles
    pub async fn insert_raw(&self, record: RoleRecord) -> RepoResult<()> {
        let _created: Option<serde_json::Value> =
            self.base.db().create(TABLE).content(record).await?;
        Ok(())
    }
}
