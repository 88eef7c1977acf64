//! User Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::user::User;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{UserCreate, UserRecord};
use crate::utils::time::now_millis;

const TABLE: &str = "user";

const USER_PROJECTION: &str = r#"
    SELECT
        <string>id AS id,
        username,
        full_name,
        role,
        created_at
    FROM user
"#;

/// User row including credential material (never serialized outward)
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UserWithCredentials {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub role: String,
    pub password_hash: String,
    pub created_at: i64,
}

impl From<UserWithCredentials> for User {
    fn from(u: UserWithCredentials) -> Self {
        User {
            id: u.id,
            username: u.username,
            full_name: u.full_name,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let query = format!("{} ORDER BY username", USER_PROJECTION);
        let users: Vec<User> = self.base.db().query(query).await?.take(0)?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = self.base.parse_id(id)?;
        let query = format!("{} WHERE id = $id", USER_PROJECTION);
        let users: Vec<User> = self
            .base
            .db()
            .query(query)
            .bind(("id", thing))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Lookup with password hash, for the login path only
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserWithCredentials>> {
        let users: Vec<UserWithCredentials> = self
            .base
            .db()
            .query(
                "SELECT <string>id AS id, username, full_name, role, password_hash, created_at \
                 FROM user WHERE username = $username LIMIT 1",
            )
            .bind(("username", username.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn create(&self, data: UserCreate, password_hash: String) -> RepoResult<User> {
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User '{}' already exists",
                data.username
            )));
        }

        #[derive(serde::Deserialize)]
        struct Created {
            id: surrealdb::RecordId,
        }

        let record = UserRecord {
            username: data.username,
            password_hash,
            full_name: data.full_name,
            role: data.role,
            created_at: now_millis(),
        };
        let created: Option<Created> = self.base.db().create(TABLE).content(record).await?;
        let created =
            created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))?;
        self.find_by_id(&created.id.to_string())
            .await?
            .ok_or_else(|| RepoError::Database("User not found after create".to_string()))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        // Sessions die with the account
        self.base
            .db()
            .query("DELETE session WHERE user = $id; DELETE $id;")
            .bind(("id", thing))
            .await?
            .check()?;
        Ok(true)
    }
}
