//! 订单出库扣减
//!
//! 按 菜品→库存 映射乘以下单数量汇总需求，整单校验库存，全部满足才
//! 扣减。扣减在单个数据库事务内执行：要么全部生效，要么整体回滚并
//! 返回完整的缺口清单 —— 不存在部分扣减。

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::inventory::{Deduction, InventoryItem, Shortfall};
use shared::menu::MenuItemRequirement;
use shared::money;
use shared::order::OrderItem;

use crate::db::repository::{InventoryRepository, MenuRepository, OrderRepository};
use crate::utils::{AppError, AppResult};

/// Sum required stock per inventory item across all line items.
///
/// Multiple lines may map onto the same inventory item; overlapping
/// requirements accumulate. Quantities go through Decimal so repeated
/// fractional requirements do not drift.
pub fn aggregate_requirements(
    items: &[OrderItem],
    requirements: &[(String, MenuItemRequirement)],
) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for item in items {
        for (menu_item_id, req) in requirements {
            if *menu_item_id == item.menu_item_id {
                let amount =
                    money::to_decimal(req.quantity_required) * Decimal::from(item.quantity);
                *totals.entry(req.inventory_item_id.clone()).or_default() += amount;
            }
        }
    }
    totals
        .into_iter()
        .map(|(id, qty)| (id, money::to_f64(qty)))
        .collect()
}

/// Compare aggregated requirements against current stock.
///
/// Every under-stocked item is listed - never a partial report. A
/// requirement without a stock row counts as available 0.
pub fn find_shortfalls(
    required: &BTreeMap<String, f64>,
    stock: &[InventoryItem],
) -> Vec<Shortfall> {
    required
        .iter()
        .filter_map(|(id, need)| {
            let row = stock.iter().find(|s| s.id == *id);
            let available = row.map(|s| s.current_stock).unwrap_or(0.0);
            if available < *need {
                Some(Shortfall {
                    inventory_item_id: id.clone(),
                    name: row.map(|s| s.name.clone()).unwrap_or_else(|| id.clone()),
                    required: *need,
                    available,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Deduct inventory for an order.
///
/// Returns the applied deductions, or [`AppError::InsufficientStock`]
/// with the full shortfall list (HTTP 400) when any requirement cannot
/// be met. Nothing is deducted in the rejection case.
pub async fn deduct_for_order(db: Surreal<Db>, order_id: &str) -> AppResult<Vec<Deduction>> {
    let orders = OrderRepository::new(db.clone());
    let menu = MenuRepository::new(db.clone());
    let inventory = InventoryRepository::new(db);

    let order = orders
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))?;

    let mut menu_item_ids: Vec<String> =
        order.items.iter().map(|i| i.menu_item_id.clone()).collect();
    menu_item_ids.sort();
    menu_item_ids.dedup();

    let requirements = menu.requirements_for(&menu_item_ids).await?;
    let required = aggregate_requirements(&order.items, &requirements);
    if required.is_empty() {
        // 没有映射的菜品不产生扣减
        return Ok(Vec::new());
    }

    let inventory_ids: Vec<String> = required.keys().cloned().collect();
    let stock = inventory.find_by_ids(&inventory_ids).await?;

    let shortfalls = find_shortfalls(&required, &stock);
    if !shortfalls.is_empty() {
        return Err(AppError::InsufficientStock(shortfalls));
    }

    let deductions: Vec<(String, f64)> = required
        .iter()
        .map(|(id, qty)| (id.clone(), *qty))
        .collect();
    inventory.apply_deductions(&deductions).await?;

    // Report remaining stock as of after the transaction
    let after = inventory.find_by_ids(&inventory_ids).await?;
    let applied = required
        .iter()
        .map(|(id, qty)| {
            let row = after.iter().find(|s| s.id == *id);
            Deduction {
                inventory_item_id: id.clone(),
                name: row.map(|s| s.name.clone()).unwrap_or_else(|| id.clone()),
                deducted: *qty,
                remaining: row.map(|s| s.current_stock).unwrap_or(0.0),
            }
        })
        .collect();

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::ItemStatus;

    fn line(menu_item_id: &str, quantity: i32) -> OrderItem {
        OrderItem {
            id: format!("order_item:{}", menu_item_id),
            menu_item_id: format!("menu_item:{}", menu_item_id),
            name: menu_item_id.to_string(),
            quantity,
            completed_quantity: 0,
            unit_price: 100.0,
            total_price: 100.0 * quantity as f64,
            item_status: ItemStatus::Pending,
        }
    }

    fn req(menu_item: &str, inventory_item: &str, quantity: f64) -> (String, MenuItemRequirement) {
        (
            format!("menu_item:{}", menu_item),
            MenuItemRequirement {
                inventory_item_id: format!("inventory_item:{}", inventory_item),
                quantity_required: quantity,
            },
        )
    }

    fn stock_row(id: &str, current: f64) -> InventoryItem {
        InventoryItem {
            id: format!("inventory_item:{}", id),
            name: id.to_string(),
            unit: "kg".to_string(),
            current_stock: current,
            minimum_stock: 0.0,
            cost_per_unit: 1.0,
        }
    }

    #[test]
    fn overlapping_requirements_accumulate() {
        // Two dishes both needing rice: 2×0.2 + 3×0.1 = 0.7
        let items = vec![line("biryani", 2), line("pulao", 3)];
        let requirements = vec![
            req("biryani", "rice", 0.2),
            req("biryani", "chicken", 0.25),
            req("pulao", "rice", 0.1),
        ];
        let totals = aggregate_requirements(&items, &requirements);
        assert_eq!(totals["inventory_item:rice"], 0.7);
        assert_eq!(totals["inventory_item:chicken"], 0.5);
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn shortfall_lists_every_under_stocked_item() {
        let mut required = BTreeMap::new();
        required.insert("inventory_item:rice".to_string(), 1.0);
        required.insert("inventory_item:chicken".to_string(), 2.0);
        required.insert("inventory_item:ghee".to_string(), 0.5);

        let stock = vec![
            stock_row("rice", 0.4),
            stock_row("chicken", 5.0),
            stock_row("ghee", 0.1),
        ];

        let shortfalls = find_shortfalls(&required, &stock);
        assert_eq!(shortfalls.len(), 2);
        assert!(shortfalls.iter().any(|s| s.name == "rice" && s.available == 0.4));
        assert!(shortfalls.iter().any(|s| s.name == "ghee" && s.available == 0.1));
    }

    #[test]
    fn missing_stock_row_counts_as_zero() {
        let mut required = BTreeMap::new();
        required.insert("inventory_item:saffron".to_string(), 0.01);
        let shortfalls = find_shortfalls(&required, &[]);
        assert_eq!(shortfalls.len(), 1);
        assert_eq!(shortfalls[0].available, 0.0);
    }

    #[test]
    fn exact_stock_is_sufficient() {
        let mut required = BTreeMap::new();
        required.insert("inventory_item:rice".to_string(), 2.0);
        let stock = vec![stock_row("rice", 2.0)];
        assert!(find_shortfalls(&required, &stock).is_empty());
    }
}
