//! Restaurant Settings Repository
//!
//! Singleton record at a fixed id.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::settings::RestaurantSettings;

use super::{BaseRepository, RepoError, RepoResult};

fn settings_id() -> RecordId {
    RecordId::from_table_key("restaurant_settings", "main")
}

#[derive(Clone)]
pub struct SettingsRepository {
    base: BaseRepository,
}

impl SettingsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn get(&self) -> RepoResult<Option<RestaurantSettings>> {
        let settings: Vec<RestaurantSettings> = self
            .base
            .db()
            .query(
                "SELECT name, tagline, phone, address, currency, opening_hours \
                 FROM restaurant_settings WHERE id = $id",
            )
            .bind(("id", settings_id()))
            .await?
            .take(0)?;
        Ok(settings.into_iter().next())
    }

    /// Replace the singleton record (UPSERT keeps the fixed id)
    pub async fn put(&self, settings: RestaurantSettings) -> RepoResult<RestaurantSettings> {
        self.base
            .db()
            .query("UPSERT $id CONTENT $settings")
            .bind(("id", settings_id()))
            .bind(("settings", settings))
            .await?
            .check()?;
        self.get()
            .await?
            .ok_or_else(|| RepoError::Database("Settings not found after put".to_string()))
    }
}
