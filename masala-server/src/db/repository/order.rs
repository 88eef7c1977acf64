//! Order Repository
//!
//! 订单主表 + `has_item` 图边连接行项。读路径统一投影为
//! `shared::Order`（字符串 id、内嵌行项），写路径使用预生成的
//! RecordId，避免解析事务返回值。

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

use shared::cart::{CartItem, cart_total};
use shared::order::{
    ItemStatus, Order, OrderStatus, PaymentStatus, derive_order_status,
};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{OrderItemCounters, OrderItemRecord, OrderRecord};
use crate::utils::time::now_millis;

/// Denormalized order projection (items via graph traversal)
const ORDER_PROJECTION: &str = r#"
    SELECT
        <string>id AS id,
        customer_name,
        customer_phone,
        status,
        payment_status,
        total_amount,
        cancellation_reason,
        cancelled_at,
        created_at,
        (
            SELECT
                <string>id AS id,
                <string>menu_item AS menu_item_id,
                name,
                quantity,
                completed_quantity,
                unit_price,
                total_price,
                item_status
            FROM ->has_item->order_item
            ORDER BY created_at
        ) AS items
    FROM order
"#;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List all orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let query = format!("{} ORDER BY created_at DESC", ORDER_PROJECTION);
        let orders: Vec<Order> = self.base.db().query(query).await?.take(0)?;
        Ok(orders)
    }

    /// Orders created inside `[start, end)` (Unix millis), oldest first
    pub async fn find_in_window(&self, start: i64, end: i64) -> RepoResult<Vec<Order>> {
        let query = format!(
            "{} WHERE created_at >= $start AND created_at < $end ORDER BY created_at",
            ORDER_PROJECTION
        );
        let orders: Vec<Order> = self
            .base
            .db()
            .query(query)
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find a single denormalized order
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = self.base.parse_id(id)?;
        let query = format!("{} WHERE id = $id", ORDER_PROJECTION);
        let orders: Vec<Order> = self
            .base
            .db()
            .query(query)
            .bind(("id", thing))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Checkout: create an order with one item row per cart line.
    ///
    /// `total_amount = Σ price × quantity`; every row starts `pending`.
    /// Order and items are written in one transaction.
    pub async fn create_from_cart(
        &self,
        customer_name: String,
        customer_phone: Option<String>,
        items: &[CartItem],
    ) -> RepoResult<Order> {
        if items.is_empty() {
            return Err(RepoError::Validation("Cart is empty".to_string()));
        }
        for line in items {
            if line.quantity <= 0 {
                return Err(RepoError::Validation(format!(
                    "Invalid quantity for '{}'",
                    line.name
                )));
            }
        }

        let now = now_millis();
        let order_id = RecordId::from_table_key("order", Uuid::new_v4().simple().to_string());
        let order = OrderRecord {
            customer_name,
            customer_phone,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            total_amount: cart_total(items),
            cancellation_reason: None,
            cancelled_at: None,
            created_at: now,
        };

        // 预生成行项 id，事务内创建并挂边
        let mut query = String::from("BEGIN TRANSACTION; CREATE ONLY $oid CONTENT $order;");
        let mut records = Vec::with_capacity(items.len());
        for (idx, line) in items.iter().enumerate() {
            let menu_item = self.base.parse_id(&line.id)?;
            let item_id =
                RecordId::from_table_key("order_item", Uuid::new_v4().simple().to_string());
            records.push((
                item_id,
                OrderItemRecord {
                    menu_item,
                    name: line.name.clone(),
                    quantity: line.quantity,
                    completed_quantity: 0,
                    unit_price: line.price,
                    total_price: line.line_total(),
                    item_status: ItemStatus::Pending,
                    // 行项按创建顺序排序，毫秒内多行用序号错开
                    created_at: now + idx as i64,
                },
            ));
            query.push_str(&format!(
                "CREATE ONLY $iid{idx} CONTENT $item{idx}; RELATE $oid->has_item->$iid{idx};"
            ));
        }
        query.push_str("COMMIT TRANSACTION;");

        let mut request = self
            .base
            .db()
            .query(query)
            .bind(("oid", order_id.clone()))
            .bind(("order", order));
        for (idx, (item_id, record)) in records.into_iter().enumerate() {
            request = request
                .bind((format!("iid{idx}"), item_id))
                .bind((format!("item{idx}"), record));
        }
        request.await?.check()?;

        self.find_by_id(&order_id.to_string())
            .await?
            .ok_or_else(|| RepoError::Database("Order not found after create".to_string()))
    }

    /// Staff status update, gated by the monotonic lattice
    pub async fn update_status(&self, id: &str, next: OrderStatus) -> RepoResult<Order> {
        let order = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        if !order.status.can_transition_to(next) {
            return Err(RepoError::Validation(format!(
                "Illegal status transition {} -> {}",
                order.status, next
            )));
        }

        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("UPDATE $id SET status = $status")
            .bind(("id", thing))
            .bind(("status", next))
            .await?
            .check()?;

        self.require(id).await
    }

    /// Payment status update (no lattice; last write wins)
    pub async fn update_payment_status(
        &self,
        id: &str,
        payment_status: PaymentStatus,
    ) -> RepoResult<Order> {
        let thing = self.base.parse_id(id)?;
        let updated: Option<serde_json::Value> = self
            .base
            .db()
            .query("UPDATE $id SET payment_status = $payment_status")
            .bind(("id", thing))
            .bind(("payment_status", payment_status))
            .await?
            .take(0)?;
        if updated.is_none() {
            return Err(RepoError::NotFound(format!("Order {} not found", id)));
        }
        self.require(id).await
    }

    /// Cancel: stamps reason + timestamp. No inventory or payment rollback.
    pub async fn cancel(&self, id: &str, reason: Option<String>) -> RepoResult<Order> {
        let order = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        if order.status.is_terminal() {
            return Err(RepoError::Validation(format!(
                "Order is already {}",
                order.status
            )));
        }

        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query(
                "UPDATE $id SET status = $status, cancellation_reason = $reason, cancelled_at = $at",
            )
            .bind(("id", thing))
            .bind(("status", OrderStatus::Cancelled))
            .bind(("reason", reason))
            .bind(("at", now_millis()))
            .await?
            .check()?;

        self.require(id).await
    }

    /// Kitchen item-status update.
    ///
    /// Returns the refreshed order and whether the status-advance rule
    /// promoted it to `ready`.
    pub async fn update_item_status(
        &self,
        order_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> RepoResult<(Order, bool)> {
        let order = self
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))?;
        if !order.items.iter().any(|i| i.id == item_id) {
            return Err(RepoError::NotFound(format!(
                "Item {} not found in order {}",
                item_id, order_id
            )));
        }

        let item = self.base.parse_id(item_id)?;
        self.base
            .db()
            .query("UPDATE $item SET item_status = $status")
            .bind(("item", item))
            .bind(("status", status))
            .await?
            .check()?;

        self.auto_advance(order_id).await
    }

    /// Partial-unit completion: one unit at a time.
    ///
    /// `completed_quantity` never exceeds `quantity`; reaching it
    /// promotes the item to `completed`.
    pub async fn complete_item_unit(
        &self,
        order_id: &str,
        item_id: &str,
    ) -> RepoResult<(Order, bool)> {
        let order = self
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))?;
        if !order.items.iter().any(|i| i.id == item_id) {
            return Err(RepoError::NotFound(format!(
                "Item {} not found in order {}",
                item_id, order_id
            )));
        }

        let item = self.base.parse_id(item_id)?;
        let counters: Vec<OrderItemCounters> = self
            .base
            .db()
            .query(
                "SELECT <string>id AS id, quantity, completed_quantity, item_status FROM $item",
            )
            .bind(("item", item.clone()))
            .await?
            .take(0)?;
        let counters = counters
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Item {} not found", item_id)))?;

        if counters.completed_quantity >= counters.quantity {
            return Err(RepoError::Validation(format!(
                "Item {} is already fully completed",
                item_id
            )));
        }

        let completed = counters.completed_quantity + 1;
        let status = if completed >= counters.quantity {
            ItemStatus::Completed
        } else {
            counters.item_status
        };

        self.base
            .db()
            .query("UPDATE $item SET completed_quantity = $completed, item_status = $status")
            .bind(("item", item))
            .bind(("completed", completed))
            .bind(("status", status))
            .await?
            .check()?;

        self.auto_advance(order_id).await
    }

    /// Debug-only hard delete (items, edges, then the order row)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query(
                "LET $items = (SELECT VALUE out FROM has_item WHERE in = $id); \
                 DELETE $items; \
                 DELETE has_item WHERE in = $id; \
                 DELETE $id;",
            )
            .bind(("id", thing))
            .await?
            .check()?;
        Ok(true)
    }

    /// Re-fetch, then apply the derived-status rule exactly once:
    /// all items ready/completed while the order is `preparing` ⇒ `ready`.
    async fn auto_advance(&self, order_id: &str) -> RepoResult<(Order, bool)> {
        let mut order = self.require(order_id).await?;

        if order.status == OrderStatus::Preparing
            && let Some(derived) = derive_order_status(&order.items)
            && order.status.can_transition_to(derived)
        {
            let thing = self.base.parse_id(order_id)?;
            self.base
                .db()
                .query("UPDATE $id SET status = $status")
                .bind(("id", thing))
                .bind(("status", derived))
                .await?
                .check()?;
            order.status = derived;
            return Ok((order, true));
        }

        Ok((order, false))
    }

    async fn require(&self, id: &str) -> RepoResult<Order> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}
