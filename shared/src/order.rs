//! 订单领域类型
//!
//! 订单状态沿 pending → confirmed → preparing → ready → completed 单调
//! 前进，cancelled 可从任意非终态到达。状态格由
//! [`OrderStatus::can_transition_to`] 编码，调用方统一用它做守卫。

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// 终态：completed / cancelled
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Position on the forward lattice (cancelled is off-lattice)
    fn rank(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Preparing => Some(2),
            OrderStatus::Ready => Some(3),
            OrderStatus::Completed => Some(4),
            OrderStatus::Cancelled => None,
        }
    }

    /// Whether `next` is a legal transition from this status.
    ///
    /// Forward moves must be monotonic (skipping steps is allowed);
    /// `cancelled` is reachable from any non-terminal state.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next {
            return false;
        }
        match (self.rank(), next.rank()) {
            (Some(cur), Some(nxt)) => nxt > cur,
            // -> cancelled: only from non-terminal states
            (Some(_), None) => !self.is_terminal(),
            // Out of cancelled there is no way back
            (None, _) => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// Per-line-item kitchen status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
}

impl ItemStatus {
    /// ready 或 completed，即厨房侧已出餐
    pub fn is_done(&self) -> bool {
        matches!(self, ItemStatus::Ready | ItemStatus::Completed)
    }
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub menu_item_id: String,
    pub name: String,
    pub quantity: i32,
    /// Partial fulfillment counter, never exceeds `quantity`
    #[serde(default)]
    pub completed_quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
    pub item_status: ItemStatus,
}

/// Denormalized order as served over the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: f64,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Derive the order-level status implied by its line items.
///
/// Returns `Some(Ready)` when every item is ready or completed; the
/// caller applies the advance only while the order is `preparing`.
/// Every item mutation routes through this one function, so the
/// advance fires exactly once.
pub fn derive_order_status(items: &[OrderItem]) -> Option<OrderStatus> {
    if !items.is_empty() && items.iter().all(|i| i.item_status.is_done()) {
        Some(OrderStatus::Ready)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: ItemStatus) -> OrderItem {
        OrderItem {
            id: "order_item:a".to_string(),
            menu_item_id: "menu_item:a".to_string(),
            name: "Paneer Tikka".to_string(),
            quantity: 2,
            completed_quantity: 0,
            unit_price: 150.0,
            total_price: 300.0,
            item_status: status,
        }
    }

    #[test]
    fn forward_transitions_are_monotonic() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn cancel_only_from_non_terminal() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn derive_requires_all_items_done() {
        let items = vec![item(ItemStatus::Ready), item(ItemStatus::Preparing)];
        assert_eq!(derive_order_status(&items), None);

        let items = vec![item(ItemStatus::Ready), item(ItemStatus::Completed)];
        assert_eq!(derive_order_status(&items), Some(OrderStatus::Ready));
    }

    #[test]
    fn derive_on_empty_items_is_none() {
        assert_eq!(derive_order_status(&[]), None);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"preparing\"");
        let back: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(back, OrderStatus::Cancelled);
    }
}
