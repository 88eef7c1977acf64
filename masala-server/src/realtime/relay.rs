//! 订单变更中继 (SSE)
//!
//! `GET /api/orders/realtime` - 把变更总线上的行级通知转换成一条对外的
//! `text/event-stream`：
//!
//! - 连接建立先发 `connected` 帧，然后订阅两张表的变更
//! - 订单行变更 → 重新拉取完整订单 → `order_update` / `order_delete`
//! - 行项变更 → 重新拉取所属订单 → `order_item_update`
//! - 固定间隔 `heartbeat` 帧，防止中间代理断开长连接
//! - 客户端断开时流被 drop，订阅与心跳定时器随之释放
//!
//! 失败策略：变更处理内的重取失败只记日志并丢弃该事件，流保持打开。

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures::stream::{self, Stream};
use tokio::sync::broadcast;
use tokio::time::{Interval, MissedTickBehavior, interval};

use shared::relay::{ChangeAction, ChangeTable, RelayEvent, RowChange};

use crate::core::ServerState;
use crate::db::repository::OrderRepository;

/// Serialize a relay event into an SSE frame.
///
/// Serialization of our own types does not fail in practice; if it ever
/// does the frame is dropped with a log line, never the stream.
fn frame(event: &RelayEvent) -> Option<Event> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Event::default().data(json)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize relay event");
            None
        }
    }
}

struct RelayCtx {
    changes: broadcast::Receiver<RowChange>,
    heartbeat: Interval,
    repo: OrderRepository,
}

impl RelayCtx {
    /// Convert a row change into an outward frame.
    ///
    /// Returns `None` when the event is dropped (failed or empty
    /// re-fetch) - the connection itself stays up.
    async fn relay(&self, change: RowChange) -> Option<Event> {
        let event = match (change.table, change.action) {
            (ChangeTable::Orders, ChangeAction::Delete) => RelayEvent::order_delete(change.id),
            (ChangeTable::Orders, action) => match self.repo.find_by_id(&change.id).await {
                Ok(Some(order)) => RelayEvent::order_update(action, order),
                Ok(None) => {
                    tracing::debug!(order_id = %change.id, "Changed order vanished, dropping event");
                    return None;
                }
                Err(e) => {
                    tracing::error!(order_id = %change.id, error = %e, "Order re-fetch failed, dropping event");
                    return None;
                }
            },
            (ChangeTable::OrderItems, _) => match self.repo.find_by_id(&change.id).await {
                Ok(Some(order)) => RelayEvent::order_item_update(order, change.item_id),
                Ok(None) => {
                    tracing::debug!(order_id = %change.id, "Parent order vanished, dropping event");
                    return None;
                }
                Err(e) => {
                    tracing::error!(order_id = %change.id, error = %e, "Parent re-fetch failed, dropping event");
                    return None;
                }
            },
        };
        frame(&event)
    }
}

/// GET /api/orders/realtime - long-lived order change stream
pub async fn order_stream(
    State(state): State<ServerState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut heartbeat = interval(Duration::from_secs(state.config.heartbeat_secs));
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval 的首个 tick 立即触发，跳过它，让第一个心跳落在一个周期后
    heartbeat.reset();

    let ctx = RelayCtx {
        changes: state.change_feed.subscribe(),
        heartbeat,
        repo: OrderRepository::new(state.db.clone()),
    };

    tracing::info!(
        subscribers = state.change_feed.subscriber_count(),
        "Realtime order stream opened"
    );

    let connected = frame(&RelayEvent::connected()).map(Ok);
    let stream = stream::iter(connected).chain(stream::unfold(ctx, |mut ctx| async move {
        loop {
            tokio::select! {
                _ = ctx.heartbeat.tick() => {
                    if let Some(event) = frame(&RelayEvent::heartbeat()) {
                        return Some((Ok(event), ctx));
                    }
                }
                change = ctx.changes.recv() => match change {
                    Ok(row_change) => {
                        if let Some(event) = ctx.relay(row_change).await {
                            return Some((Ok(event), ctx));
                        }
                        // dropped event: keep waiting
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // 通知即触发重取，漏掉的由后续事件/轮询补上
                        tracing::warn!(skipped, "Relay subscriber lagged behind change feed");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                },
            }
        }
    }));

    Sse::new(stream)
}
