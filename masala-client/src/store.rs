//! Order store reducer
//!
//! 订单 UI 状态的唯一事实源：按插入序保存订单（id 去重），由三路输入
//! 维持同步 —— 初始全量拉取、中继事件、轮询兜底。事件携带的是完整
//! 快照，应用方式是幂等替换，乱序投递与重复拉取自愈。

use chrono::Utc;

use shared::order::{Order, OrderStatus};
use shared::relay::{ChangeAction, RelayEvent, RelayEventKind};

/// Alert cues derived while reducing an event.
///
/// Both cues are independent; one event can raise both in the same
/// tick (a brand-new order that arrives already confirmed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    /// pending → confirmed: kitchen display alert
    KitchenConfirmed { order_id: String },
    /// Brand-new order: front-of-house alert
    NewOrder { order_id: String },
}

/// How long the transient new-order notice stays up
const NOTICE_TTL_MS: i64 = 5_000;

/// Insertion-ordered order collection keyed by id
#[derive(Debug, Default)]
pub struct OrderStore {
    /// Newest first; relay inserts prepend, bulk fetches replace
    orders: Vec<Order>,
    /// Transient new-order notice (message, raised_at millis)
    notice: Option<(String, i64)>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Bulk fetch / poll result: wholesale replacement.
    ///
    /// The fetched snapshot is authoritative; server returns newest
    /// first, which matches the relay's prepend order.
    pub fn replace_all(&mut self, orders: Vec<Order>) {
        self.orders = orders;
    }

    /// Reduce one relay event into the store
    pub fn apply(&mut self, event: &RelayEvent) -> Vec<Cue> {
        self.apply_at(event, Utc::now().timestamp_millis())
    }

    /// Reduce with an explicit clock (deterministic in tests)
    pub fn apply_at(&mut self, event: &RelayEvent, now_ms: i64) -> Vec<Cue> {
        match event.kind {
            RelayEventKind::Connected | RelayEventKind::Heartbeat => Vec::new(),
            RelayEventKind::OrderUpdate => match &event.order {
                Some(order) => self.upsert(event.event, order.clone(), now_ms),
                None => Vec::new(),
            },
            // 行项事件携带完整的所属订单，整体替换
            RelayEventKind::OrderItemUpdate => match &event.order {
                Some(order) => self.upsert(None, order.clone(), now_ms),
                None => Vec::new(),
            },
            RelayEventKind::OrderDelete => {
                if let Some(id) = &event.order_id {
                    self.orders.retain(|o| o.id != *id);
                }
                Vec::new()
            }
        }
    }

    /// The transient notice, if it has not yet expired
    pub fn current_notice(&self, now_ms: i64) -> Option<&str> {
        match &self.notice {
            Some((message, raised_at)) if now_ms - raised_at < NOTICE_TTL_MS => {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    fn upsert(&mut self, action: Option<ChangeAction>, order: Order, now_ms: i64) -> Vec<Cue> {
        let mut cues = Vec::new();

        if let Some(existing) = self.orders.iter_mut().find(|o| o.id == order.id) {
            // Replace in place, preserving collection order
            if existing.status == OrderStatus::Pending && order.status == OrderStatus::Confirmed {
                cues.push(Cue::KitchenConfirmed {
                    order_id: order.id.clone(),
                });
            }
            *existing = order;
            return cues;
        }

        if action == Some(ChangeAction::Insert) {
            cues.push(Cue::NewOrder {
                order_id: order.id.clone(),
            });
            // 新单直接进厨房的情况两个提示同拍触发
            if order.status == OrderStatus::Confirmed {
                cues.push(Cue::KitchenConfirmed {
                    order_id: order.id.clone(),
                });
            }
            self.notice = Some((format!("New order from {}", order.customer_name), now_ms));
            self.orders.insert(0, order);
        } else {
            // Unknown id on a non-insert: adopt the snapshot silently
            // (we may simply have missed the insert)
            self.orders.insert(0, order);
        }

        cues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{ItemStatus, OrderItem, PaymentStatus};

    fn order(id: &str, status: OrderStatus, total: f64) -> Order {
        Order {
            id: format!("order:{}", id),
            customer_name: "Meera".to_string(),
            customer_phone: None,
            status,
            payment_status: PaymentStatus::Pending,
            total_amount: total,
            cancellation_reason: None,
            cancelled_at: None,
            created_at: 0,
            items: Vec::new(),
        }
    }

    fn update(o: Order) -> RelayEvent {
        RelayEvent::order_update(ChangeAction::Update, o)
    }

    fn insert(o: Order) -> RelayEvent {
        RelayEvent::order_update(ChangeAction::Insert, o)
    }

    #[test]
    fn last_update_per_id_wins_regardless_of_interleaving() {
        let mut store = OrderStore::new();
        store.replace_all(vec![
            order("a", OrderStatus::Pending, 100.0),
            order("b", OrderStatus::Pending, 200.0),
        ]);

        // Interleaved updates for a and b in scrambled write order
        store.apply_at(&update(order("a", OrderStatus::Preparing, 100.0)), 0);
        store.apply_at(&update(order("b", OrderStatus::Confirmed, 200.0)), 0);
        store.apply_at(&update(order("a", OrderStatus::Confirmed, 100.0)), 0);
        store.apply_at(&update(order("b", OrderStatus::Ready, 200.0)), 0);

        assert_eq!(store.get("order:a").unwrap().status, OrderStatus::Confirmed);
        assert_eq!(store.get("order:b").unwrap().status, OrderStatus::Ready);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn replace_preserves_collection_order() {
        let mut store = OrderStore::new();
        store.replace_all(vec![
            order("a", OrderStatus::Pending, 1.0),
            order("b", OrderStatus::Pending, 2.0),
            order("c", OrderStatus::Pending, 3.0),
        ]);

        store.apply_at(&update(order("b", OrderStatus::Ready, 2.0)), 0);

        let ids: Vec<&str> = store.orders().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["order:a", "order:b", "order:c"]);
    }

    #[test]
    fn insert_prepends_and_raises_notice() {
        let mut store = OrderStore::new();
        store.replace_all(vec![order("a", OrderStatus::Pending, 1.0)]);

        let cues = store.apply_at(&insert(order("n", OrderStatus::Pending, 9.0)), 1_000);
        assert_eq!(
            cues,
            vec![Cue::NewOrder {
                order_id: "order:n".to_string()
            }]
        );
        assert_eq!(store.orders()[0].id, "order:n");

        // Notice self-clears after the fixed delay
        assert!(store.current_notice(2_000).is_some());
        assert!(store.current_notice(1_000 + 5_000).is_none());
    }

    #[test]
    fn pending_to_confirmed_raises_kitchen_cue() {
        let mut store = OrderStore::new();
        store.replace_all(vec![order("a", OrderStatus::Pending, 1.0)]);

        let cues = store.apply_at(&update(order("a", OrderStatus::Confirmed, 1.0)), 0);
        assert_eq!(
            cues,
            vec![Cue::KitchenConfirmed {
                order_id: "order:a".to_string()
            }]
        );

        // Re-applying the same snapshot raises nothing (idempotent)
        let cues = store.apply_at(&update(order("a", OrderStatus::Confirmed, 1.0)), 0);
        assert!(cues.is_empty());
    }

    #[test]
    fn both_cues_can_fire_in_one_tick() {
        let mut store = OrderStore::new();
        let cues = store.apply_at(&insert(order("n", OrderStatus::Confirmed, 5.0)), 0);
        assert_eq!(cues.len(), 2);
        assert!(matches!(cues[0], Cue::NewOrder { .. }));
        assert!(matches!(cues[1], Cue::KitchenConfirmed { .. }));
    }

    #[test]
    fn item_update_replaces_order_wholesale() {
        let mut store = OrderStore::new();
        let mut original = order("a", OrderStatus::Preparing, 10.0);
        original.items = vec![OrderItem {
            id: "order_item:i1".to_string(),
            menu_item_id: "menu_item:m1".to_string(),
            name: "Samosa".to_string(),
            quantity: 2,
            completed_quantity: 0,
            unit_price: 5.0,
            total_price: 10.0,
            item_status: ItemStatus::Preparing,
        }];
        store.replace_all(vec![original.clone()]);

        let mut relayed = original;
        relayed.items[0].item_status = ItemStatus::Ready;
        relayed.status = OrderStatus::Ready;
        let event = RelayEvent::order_item_update(relayed, Some("order_item:i1".to_string()));

        store.apply_at(&event, 0);
        let stored = store.get("order:a").unwrap();
        assert_eq!(stored.status, OrderStatus::Ready);
        assert_eq!(stored.items[0].item_status, ItemStatus::Ready);
    }

    #[test]
    fn delete_removes_by_id() {
        let mut store = OrderStore::new();
        store.replace_all(vec![
            order("a", OrderStatus::Pending, 1.0),
            order("b", OrderStatus::Pending, 2.0),
        ]);
        store.apply_at(&RelayEvent::order_delete("order:a".to_string()), 0);
        assert_eq!(store.len(), 1);
        assert!(store.get("order:a").is_none());
    }

    #[test]
    fn heartbeat_and_connected_are_no_ops() {
        let mut store = OrderStore::new();
        assert!(store.apply_at(&RelayEvent::heartbeat(), 0).is_empty());
        assert!(store.apply_at(&RelayEvent::connected(), 0).is_empty());
        assert!(store.is_empty());
    }
}
