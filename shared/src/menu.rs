//! Menu catalog types

use serde::{Deserialize, Serialize};

/// Menu category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_order: i32,
}

/// Menu item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Menu-item → inventory requirement (per unit ordered)
///
/// 出餐一份该菜品需要扣减的库存数量，用于订单出库计算。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemRequirement {
    pub inventory_item_id: String,
    pub quantity_required: f64,
}
