//! Shopping cart types
//!
//! The cart lives client-side (persisted as a JSON array); the server
//! only ever sees it as part of a checkout request.

use serde::{Deserialize, Serialize};

use crate::money;

/// One cart line, as persisted client-side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Menu item id
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub category: Option<String>,
}

impl CartItem {
    /// Line total (price × quantity), 2-dp
    pub fn line_total(&self) -> f64 {
        money::to_f64(money::to_decimal(self.price) * rust_decimal::Decimal::from(self.quantity))
    }
}

/// Checkout request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub items: Vec<CartItem>,
}

/// Cart grand total, accumulated in Decimal
pub fn cart_total(items: &[CartItem]) -> f64 {
    let total = items
        .iter()
        .map(|i| money::to_decimal(i.price) * rust_decimal::Decimal::from(i.quantity))
        .sum();
    money::to_f64(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> Vec<CartItem> {
        vec![
            CartItem {
                id: "menu_item:a".to_string(),
                name: "Butter Chicken".to_string(),
                price: 150.0,
                quantity: 2,
                category: Some("Mains".to_string()),
            },
            CartItem {
                id: "menu_item:b".to_string(),
                name: "Garlic Naan".to_string(),
                price: 80.0,
                quantity: 1,
                category: Some("Breads".to_string()),
            },
        ]
    }

    #[test]
    fn totals_match_checkout_example() {
        let items = cart();
        assert_eq!(items[0].line_total(), 300.0);
        assert_eq!(items[1].line_total(), 80.0);
        assert_eq!(cart_total(&items), 380.0);
    }

    #[test]
    fn empty_cart_totals_zero() {
        assert_eq!(cart_total(&[]), 0.0);
    }
}
