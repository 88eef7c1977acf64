//! Inventory types and stock classification

use serde::{Deserialize, Serialize};

/// Derived stock level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

/// Inventory item with derived status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    /// Unit of measure (kg, l, pcs, ...)
    pub unit: String,
    pub current_stock: f64,
    pub minimum_stock: f64,
    pub cost_per_unit: f64,
}

impl InventoryItem {
    /// out-of-stock: `current_stock <= 0`
    /// low-stock: `current_stock <= minimum_stock`
    pub fn stock_status(&self) -> StockStatus {
        if self.current_stock <= 0.0 {
            StockStatus::OutOfStock
        } else if self.current_stock <= self.minimum_stock {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

/// One applied deduction (success response line)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deduction {
    pub inventory_item_id: String,
    pub name: String,
    pub deducted: f64,
    pub remaining: f64,
}

/// One insufficient-stock detail (rejection response line)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shortfall {
    pub inventory_item_id: String,
    pub name: String,
    pub required: f64,
    pub available: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(current: f64, minimum: f64) -> InventoryItem {
        InventoryItem {
            id: "inventory_item:rice".to_string(),
            name: "Basmati Rice".to_string(),
            unit: "kg".to_string(),
            current_stock: current,
            minimum_stock: minimum,
            cost_per_unit: 90.0,
        }
    }

    #[test]
    fn classification_thresholds() {
        assert_eq!(item(5.0, 10.0).stock_status(), StockStatus::LowStock);
        assert_eq!(item(0.0, 10.0).stock_status(), StockStatus::OutOfStock);
        assert_eq!(item(-1.0, 10.0).stock_status(), StockStatus::OutOfStock);
        // Boundary: exactly at minimum is still low
        assert_eq!(item(10.0, 10.0).stock_status(), StockStatus::LowStock);
        assert_eq!(item(10.0, 5.0).stock_status(), StockStatus::InStock);
    }

    #[test]
    fn status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&StockStatus::OutOfStock).unwrap(),
            "\"out-of-stock\""
        );
        assert_eq!(
            serde_json::to_string(&StockStatus::LowStock).unwrap(),
            "\"low-stock\""
        );
    }
}
