//! 实时中继协议类型
//!
//! 服务器把行级变更汇聚成一条对外的 SSE 事件流；这里定义两侧共享的
//! 信封类型：
//!
//! - [`RowChange`] — 服务器内部变更通知（表 + 动作 + 行 id）
//! - [`RelayEvent`] — 对外 JSON 帧
//!   `{type, event?, order?, order_id?, item_id?, message?, timestamp}`
//!
//! 事件携带的是重新拉取后的完整订单快照，不是增量：消费端永远以
//! fetch 时刻的快照为准，乱序投递由幂等替换自愈。

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::Timestamp;
use crate::order::Order;

/// Row change kind, as reported by the change feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Insert,
    Update,
    Delete,
}

/// Tables covered by the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTable {
    Orders,
    OrderItems,
}

/// Internal change-feed record (table, action, row id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowChange {
    pub table: ChangeTable,
    pub action: ChangeAction,
    /// Row id; for order-item changes this is the *parent order* id so
    /// subscribers can re-fetch without a join
    pub id: String,
    /// Item row id, set for order-item changes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
}

/// Outward SSE event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayEventKind {
    Connected,
    OrderUpdate,
    OrderItemUpdate,
    OrderDelete,
    Heartbeat,
}

/// Outward SSE frame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayEvent {
    #[serde(rename = "type")]
    pub kind: RelayEventKind,
    /// Original row-change kind (INSERT/UPDATE), present on order updates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<ChangeAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: Timestamp,
}

impl RelayEvent {
    fn base(kind: RelayEventKind) -> Self {
        Self {
            kind,
            event: None,
            order: None,
            order_id: None,
            item_id: None,
            message: None,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn connected() -> Self {
        Self {
            message: Some("realtime channel established".to_string()),
            ..Self::base(RelayEventKind::Connected)
        }
    }

    pub fn heartbeat() -> Self {
        Self::base(RelayEventKind::Heartbeat)
    }

    /// Full-order snapshot after an order row change
    pub fn order_update(action: ChangeAction, order: Order) -> Self {
        Self {
            event: Some(action),
            order_id: Some(order.id.clone()),
            order: Some(order),
            ..Self::base(RelayEventKind::OrderUpdate)
        }
    }

    /// Full-order snapshot after an order-item row change
    pub fn order_item_update(order: Order, item_id: Option<String>) -> Self {
        Self {
            order_id: Some(order.id.clone()),
            order: Some(order),
            item_id,
            ..Self::base(RelayEventKind::OrderItemUpdate)
        }
    }

    pub fn order_delete(order_id: String) -> Self {
        Self {
            order_id: Some(order_id),
            ..Self::base(RelayEventKind::OrderDelete)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_shape_matches_protocol() {
        let event = RelayEvent::order_delete("order:x1".to_string());
        let value: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "order_delete");
        assert_eq!(value["orderId"], "order:x1");
        // Absent fields are omitted, not null
        assert!(value.get("order").is_none());
        assert!(value.get("event").is_none());
        assert!(value["timestamp"].is_i64());
    }

    #[test]
    fn change_action_is_uppercase() {
        assert_eq!(
            serde_json::to_string(&ChangeAction::Insert).unwrap(),
            "\"INSERT\""
        );
    }
}
