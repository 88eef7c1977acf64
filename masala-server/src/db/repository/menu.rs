//! Menu Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::menu::{MenuItem, MenuItemRequirement};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuItemCreate, MenuItemRecord, MenuItemUpdate, RequirementRecord};

const TABLE: &str = "menu_item";

const MENU_PROJECTION: &str = r#"
    SELECT
        <string>id AS id,
        name,
        description,
        price,
        IF category != NONE THEN <string>category ELSE NONE END AS category_id,
        image_url,
        is_available
    FROM menu_item
"#;

#[derive(Clone)]
pub struct MenuRepository {
    base: BaseRepository,
}

impl MenuRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all menu items; `available_only` filters the customer menu
    pub async fn find_all(&self, available_only: bool) -> RepoResult<Vec<MenuItem>> {
        let query = if available_only {
            format!("{} WHERE is_available = true ORDER BY name", MENU_PROJECTION)
        } else {
            format!("{} ORDER BY name", MENU_PROJECTION)
        };
        let items: Vec<MenuItem> = self.base.db().query(query).await?.take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let thing = self.base.parse_id(id)?;
        let query = format!("{} WHERE id = $id", MENU_PROJECTION);
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query(query)
            .bind(("id", thing))
            .await?
            .take(0)?;
        Ok(items.into_iter().next())
    }

    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let category = match &data.category_id {
            Some(id) => Some(self.base.parse_id(id)?),
            None => None,
        };

        let record = MenuItemRecord {
            name: data.name,
            description: data.description,
            price: data.price,
            category,
            image_url: data.image_url,
            is_available: data.is_available,
        };

        #[derive(serde::Deserialize)]
        struct Created {
            id: surrealdb::RecordId,
        }

        let created: Option<Created> = self.base.db().create(TABLE).content(record).await?;
        let created =
            created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))?;
        self.find_by_id(&created.id.to_string())
            .await?
            .ok_or_else(|| RepoError::Database("Menu item not found after create".to_string()))
    }

    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        let category_id = match data.category_id.or(existing.category_id) {
            Some(cid) => Some(self.base.parse_id(&cid)?),
            None => None,
        };

        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query(
                "UPDATE $id SET name = $name, description = $description, price = $price, \
                 category = $category, image_url = $image_url, is_available = $is_available",
            )
            .bind(("id", thing))
            .bind(("name", data.name.unwrap_or(existing.name)))
            .bind(("description", data.description.or(existing.description)))
            .bind(("price", data.price.unwrap_or(existing.price)))
            .bind(("category", category_id))
            .bind(("image_url", data.image_url.or(existing.image_url)))
            .bind(("is_available", data.is_available.unwrap_or(existing.is_available)))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Hard delete a menu item and its inventory mapping rows
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("DELETE menu_item_inventory WHERE menu_item = $id; DELETE $id;")
            .bind(("id", thing))
            .await?
            .check()?;
        Ok(true)
    }

    // =========================================================================
    // Inventory requirement mapping (menu_item_inventory)
    // =========================================================================

    /// Requirements for a single menu item
    pub async fn get_requirements(&self, menu_item_id: &str) -> RepoResult<Vec<MenuItemRequirement>> {
        let thing = self.base.parse_id(menu_item_id)?;
        let rows: Vec<MenuItemRequirement> = self
            .base
            .db()
            .query(
                "SELECT <string>inventory_item AS inventory_item_id, quantity_required \
                 FROM menu_item_inventory WHERE menu_item = $id",
            )
            .bind(("id", thing))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Replace the requirement mapping for a menu item
    pub async fn set_requirements(
        &self,
        menu_item_id: &str,
        requirements: Vec<MenuItemRequirement>,
    ) -> RepoResult<Vec<MenuItemRequirement>> {
        let menu_item = self.base.parse_id(menu_item_id)?;
        for req in &requirements {
            if req.quantity_required <= 0.0 {
                return Err(RepoError::Validation(format!(
                    "quantity_required must be positive for {}",
                    req.inventory_item_id
                )));
            }
        }

        // 先清空旧映射，再整体写入
        self.base
            .db()
            .query("DELETE menu_item_inventory WHERE menu_item = $id")
            .bind(("id", menu_item.clone()))
            .await?
            .check()?;

        for req in &requirements {
            let inventory_item = self.base.parse_id(&req.inventory_item_id)?;
            let record = RequirementRecord {
                menu_item: menu_item.clone(),
                inventory_item,
                quantity_required: req.quantity_required,
            };
            let _created: Option<serde_json::Value> = self
                .base
                .db()
                .create("menu_item_inventory")
                .content(record)
                .await?;
        }

        self.get_requirements(menu_item_id).await
    }

    /// Bulk requirement lookup for a set of menu items (deduction path)
    pub async fn requirements_for(
        &self,
        menu_item_ids: &[String],
    ) -> RepoResult<Vec<(String, MenuItemRequirement)>> {
        let mut things = Vec::with_capacity(menu_item_ids.len());
        for id in menu_item_ids {
            things.push(self.base.parse_id(id)?);
        }

        #[derive(serde::Deserialize)]
        struct Row {
            menu_item_id: String,
            inventory_item_id: String,
            quantity_required: f64,
        }

        let rows: Vec<Row> = self
            .base
            .db()
            .query(
                "SELECT <string>menu_item AS menu_item_id, \
                        <string>inventory_item AS inventory_item_id, \
                        quantity_required \
                 FROM menu_item_inventory WHERE menu_item IN $ids",
            )
            .bind(("ids", things))
            .await?
            .take(0)?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.menu_item_id,
                    MenuItemRequirement {
                        inventory_item_id: r.inventory_item_id,
                        quantity_required: r.quantity_required,
                    },
                )
            })
            .collect())
    }
}
