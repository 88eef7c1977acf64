//! 变更总线
//!
//! 行级变更通知的进程内广播通道。替代托管平台的 CDC 回调：所有
//! 订单/行项写入方在成功落库后 publish，一个或多个 SSE 中继订阅。

use tokio::sync::broadcast;

use shared::relay::{ChangeAction, ChangeTable, RowChange};

/// Default capacity of the broadcast channel
const DEFAULT_CAPACITY: usize = 1024;

/// 变更总线 - 负责行级变更通知的扇出
///
/// # 职责
///
/// - 发布 (publish): 写路径在落库后调用
/// - 订阅 (subscribe): 每个 SSE 连接一个接收端
///
/// 滞后的订阅端会丢通知；由于每条通知都触发全量重取，丢失自愈。
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<RowChange>,
}

impl ChangeFeed {
    /// 创建默认容量的变更总线
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// 创建指定容量的变更总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 发布一条变更通知
    ///
    /// 没有订阅端时发送失败是正常情况，静默忽略。
    pub fn publish(&self, change: RowChange) {
        tracing::debug!(?change, "Publishing row change");
        let _ = self.tx.send(change);
    }

    /// Shorthand: order row change (id = order id)
    pub fn publish_order(&self, action: ChangeAction, order_id: &str) {
        self.publish(RowChange {
            table: ChangeTable::Orders,
            action,
            id: order_id.to_string(),
            item_id: None,
        });
    }

    /// Shorthand: order-item row change (id = parent order id)
    pub fn publish_order_item(&self, action: ChangeAction, order_id: &str, item_id: &str) {
        self.publish(RowChange {
            table: ChangeTable::OrderItems,
            action,
            id: order_id.to_string(),
            item_id: Some(item_id.to_string()),
        });
    }

    /// 订阅变更通知 (每个 SSE 连接调用一次)
    pub fn subscribe(&self) -> broadcast::Receiver<RowChange> {
        self.tx.subscribe()
    }

    /// 当前订阅端数量
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_reaches_all_subscribers() {
        let feed = ChangeFeed::with_capacity(8);
        let mut a = feed.subscribe();
        let mut b = feed.subscribe();

        feed.publish_order(ChangeAction::Insert, "order:x1");

        let got_a = a.recv().await.unwrap();
        let got_b = b.recv().await.unwrap();
        assert_eq!(got_a, got_b);
        assert_eq!(got_a.id, "order:x1");
        assert_eq!(got_a.table, ChangeTable::Orders);
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let feed = ChangeFeed::new();
        // Must not panic or error
        feed.publish_order(ChangeAction::Delete, "order:x2");
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn item_changes_carry_parent_order_id() {
        let feed = ChangeFeed::new();
        let mut rx = feed.subscribe();
        feed.publish_order_item(ChangeAction::Update, "order:x3", "order_item:i9");
        let change = rx.recv().await.unwrap();
        assert_eq!(change.table, ChangeTable::OrderItems);
        assert_eq!(change.id, "order:x3");
        assert_eq!(change.item_id.as_deref(), Some("order_item:i9"));
    }
}
