//! Database record types
//!
//! Create/update payloads written to SurrealDB. Reads project to the
//! wire types in `shared` with `<string>id` fields, so RecordId only
//! appears on the write path.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use shared::Timestamp;
use shared::order::{ItemStatus, OrderStatus, PaymentStatus};
use shared::permission::SectionAccess;

// =============================================================================
// Orders
// =============================================================================

/// Order row (write path)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: f64,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Order item row (write path, linked via `has_item` edge)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRecord {
    pub menu_item: RecordId,
    pub name: String,
    pub quantity: i32,
    pub completed_quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
    pub item_status: ItemStatus,
    pub created_at: Timestamp,
}

/// Item fields needed by the partial-completion path
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemCounters {
    pub id: String,
    pub quantity: i32,
    pub completed_quantity: i32,
    pub item_status: ItemStatus,
}

// =============================================================================
// Menu
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemRecord {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<RecordId>,
    pub image_url: Option<String>,
    pub is_available: bool,
}

/// Menu item create payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MenuItemCreate {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub category_id: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

/// Menu item update payload (partial)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MenuItemUpdate {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub category_id: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub name: String,
    pub display_order: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[serde(default)]
    pub display_order: i32,
}

/// Menu-item → inventory mapping row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementRecord {
    pub menu_item: RecordId,
    pub inventory_item: RecordId,
    pub quantity_required: f64,
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemRecord {
    pub name: String,
    pub unit: String,
    pub current_stock: f64,
    pub minimum_stock: f64,
    pub cost_per_unit: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InventoryItemCreate {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 16))]
    pub unit: String,
    #[serde(default)]
    pub current_stock: f64,
    #[serde(default)]
    pub minimum_stock: f64,
    #[serde(default)]
    pub cost_per_unit: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InventoryItemUpdate {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 16))]
    pub unit: Option<String>,
    pub current_stock: Option<f64>,
    pub minimum_stock: Option<f64>,
    pub cost_per_unit: Option<f64>,
}

// =============================================================================
// Users, Roles, Sessions
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    /// Role name, resolved against the `role` table
    pub role: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 2, max = 64))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRecord {
    pub name: String,
    pub access: SectionAccess,
    pub is_system: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    pub user: RecordId,
    pub expires_at: Timestamp,
}

fn default_true() -> bool {
    true
}
