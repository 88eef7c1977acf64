//! Inventory Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::inventory::InventoryItem;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{InventoryItemCreate, InventoryItemRecord, InventoryItemUpdate};

const TABLE: &str = "inventory_item";

const INVENTORY_PROJECTION: &str = r#"
    SELECT
        <string>id AS id,
        name,
        unit,
        current_stock,
        minimum_stock,
        cost_per_unit
    FROM inventory_item
"#;

#[derive(Clone)]
pub struct InventoryRepository {
    base: BaseRepository,
}

impl InventoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<InventoryItem>> {
        let query = format!("{} ORDER BY name", INVENTORY_PROJECTION);
        let items: Vec<InventoryItem> = self.base.db().query(query).await?.take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<InventoryItem>> {
        let thing = self.base.parse_id(id)?;
        let query = format!("{} WHERE id = $id", INVENTORY_PROJECTION);
        let items: Vec<InventoryItem> = self
            .base
            .db()
            .query(query)
            .bind(("id", thing))
            .await?
            .take(0)?;
        Ok(items.into_iter().next())
    }

    /// Stock rows for a set of ids (deduction path)
    pub async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<InventoryItem>> {
        let mut things = Vec::with_capacity(ids.len());
        for id in ids {
            things.push(self.base.parse_id(id)?);
        }
        let query = format!("{} WHERE id IN $ids", INVENTORY_PROJECTION);
        let items: Vec<InventoryItem> = self
            .base
            .db()
            .query(query)
            .bind(("ids", things))
            .await?
            .take(0)?;
        Ok(items)
    }

    pub async fn create(&self, data: InventoryItemCreate) -> RepoResult<InventoryItem> {
        #[derive(serde::Deserialize)]
        struct Created {
            id: surrealdb::RecordId,
        }

        let record = InventoryItemRecord {
            name: data.name,
            unit: data.unit,
            current_stock: data.current_stock,
            minimum_stock: data.minimum_stock,
            cost_per_unit: data.cost_per_unit,
        };
        let created: Option<Created> = self.base.db().create(TABLE).content(record).await?;
        let created = created
            .ok_or_else(|| RepoError::Database("Failed to create inventory item".to_string()))?;
        self.find_by_id(&created.id.to_string())
            .await?
            .ok_or_else(|| RepoError::Database("Inventory item not found after create".to_string()))
    }

    pub async fn update(&self, id: &str, data: InventoryItemUpdate) -> RepoResult<InventoryItem> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Inventory item {} not found", id)))?;

        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query(
                "UPDATE $id SET name = $name, unit = $unit, current_stock = $current_stock, \
                 minimum_stock = $minimum_stock, cost_per_unit = $cost_per_unit",
            )
            .bind(("id", thing))
            .bind(("name", data.name.unwrap_or(existing.name)))
            .bind(("unit", data.unit.unwrap_or(existing.unit)))
            .bind(("current_stock", data.current_stock.unwrap_or(existing.current_stock)))
            .bind(("minimum_stock", data.minimum_stock.unwrap_or(existing.minimum_stock)))
            .bind(("cost_per_unit", data.cost_per_unit.unwrap_or(existing.cost_per_unit)))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Inventory item {} not found", id)))
    }

    /// Manual restock: adds `quantity` to current stock
    pub async fn restock(&self, id: &str, quantity: f64) -> RepoResult<InventoryItem> {
        if quantity <= 0.0 {
            return Err(RepoError::Validation(
                "Restock quantity must be positive".to_string(),
            ));
        }
        let thing = self.base.parse_id(id)?;
        let updated: Option<serde_json::Value> = self
            .base
            .db()
            .query("UPDATE $id SET current_stock += $quantity")
            .bind(("id", thing))
            .bind(("quantity", quantity))
            .await?
            .take(0)?;
        if updated.is_none() {
            return Err(RepoError::NotFound(format!(
                "Inventory item {} not found",
                id
            )));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Inventory item {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("DELETE menu_item_inventory WHERE inventory_item = $id; DELETE $id;")
            .bind(("id", thing))
            .await?
            .check()?;
        Ok(true)
    }

    /// Apply a set of validated deductions atomically.
    ///
    /// One transaction for all rows: each statement re-checks stock and
    /// THROWs on shortfall, so a mid-sequence failure rolls everything
    /// back instead of leaving a partial deduction.
    pub async fn apply_deductions(&self, deductions: &[(String, f64)]) -> RepoResult<()> {
        if deductions.is_empty() {
            return Ok(());
        }

        let mut query = String::from("BEGIN TRANSACTION;");
        for (idx, _) in deductions.iter().enumerate() {
            query.push_str(&format!(
                "LET $cur{idx} = (SELECT VALUE current_stock FROM ONLY $id{idx}); \
                 IF $cur{idx} < $qty{idx} {{ THROW 'insufficient stock' }}; \
                 UPDATE $id{idx} SET current_stock -= $qty{idx};"
            ));
        }
        query.push_str("COMMIT TRANSACTION;");

        let mut request = self.base.db().query(query);
        for (idx, (id, qty)) in deductions.iter().enumerate() {
            let thing = self.base.parse_id(id)?;
            request = request
                .bind((format!("id{idx}"), thing))
                .bind((format!("qty{idx}"), *qty));
        }
        request.await?.check()?;
        Ok(())
    }
}
