//! Session Repository
//!
//! 不透明令牌会话：token (UUID) + 过期时间，存表校验。

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::SessionRecord;
use crate::utils::time::now_millis;

const TABLE: &str = "session";

/// A validated session: token plus the owning user's id
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ActiveSession {
    pub token: String,
    pub user_id: String,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct SessionRepository {
    base: BaseRepository,
}

impl SessionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a session for the user; returns the opaque token
    pub async fn create(&self, user_id: &str, ttl_hours: i64) -> RepoResult<ActiveSession> {
        let user = self.base.parse_id(user_id)?;
        let token = Uuid::new_v4().to_string();
        let expires_at = now_millis() + ttl_hours * 3_600_000;

        let record = SessionRecord {
            token: token.clone(),
            user,
            expires_at,
        };
        let _created: Option<serde_json::Value> =
            self.base.db().create(TABLE).content(record).await?;

        Ok(ActiveSession {
            token,
            user_id: user_id.to_string(),
            expires_at,
        })
    }

    /// Resolve a token; `None` for unknown or expired sessions
    pub async fn find_valid(&self, token: &str) -> RepoResult<Option<ActiveSession>> {
        let sessions: Vec<ActiveSession> = self
            .base
            .db()
            .query(
                "SELECT token, <string>user AS user_id, expires_at FROM session \
                 WHERE token = $token AND expires_at > $now LIMIT 1",
            )
            .bind(("token", token.to_string()))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        Ok(sessions.into_iter().next())
    }

    /// Logout: drop the session row
    pub async fn delete(&self, token: &str) -> RepoResult<bool> {
        self.base
            .db()
            .query("DELETE session WHERE token = $token")
            .bind(("token", token.to_string()))
            .await?
            .check()?;
        Ok(true)
    }

    /// Housekeeping: remove expired rows
    pub async fn purge_expired(&self) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE session WHERE expires_at <= $now")
            .bind(("now", now_millis()))
            .await?
            .check()?;
        Ok(())
    }
}
