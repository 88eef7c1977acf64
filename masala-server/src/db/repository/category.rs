//! Category Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::menu::Category;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{CategoryCreate, CategoryRecord};

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query(
                "SELECT <string>id AS id, name, display_order FROM category \
                 ORDER BY display_order, name",
            )
            .await?
            .take(0)?;
        Ok(categories)
    }

    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        // Duplicate names make the menu ambiguous
        let existing: Vec<Category> = self
            .base
            .db()
            .query("SELECT <string>id AS id, name, display_order FROM category WHERE name = $name")
            .bind(("name", data.name.clone()))
            .await?
            .take(0)?;
        if !existing.is_empty() {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                data.name
            )));
        }

        #[derive(serde::Deserialize)]
        struct Created {
            id: surrealdb::RecordId,
        }

        let record = CategoryRecord {
            name: data.name,
            display_order: data.display_order,
        };
        let created: Option<Created> = self.base.db().create(TABLE).content(record).await?;
        let created =
            created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))?;

        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT <string>id AS id, name, display_order FROM category WHERE id = $id")
            .bind(("id", created.id))
            .await?
            .take(0)?;
        categories
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Category not found after create".to_string()))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        // Detach menu items first so they do not point at a dead record
        self.base
            .db()
            .query("UPDATE menu_item SET category = NONE WHERE category = $id; DELETE $id;")
            .bind(("id", thing))
            .await?
            .check()?;
        Ok(true)
    }
}
