//! Polling fallback
//!
//! 实时通道不在 Connected 状态时，按固定间隔重跑全量拉取并整体替换
//! 本地订单集。与实时通道只用连接状态布尔值协调：两路偶尔贴近触发
//! 也无妨 —— 归约是幂等的整体替换。

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::connection::ConnectionState;
use crate::store::OrderStore;

pub struct Poller {
    token: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl Poller {
    /// Spawn the fallback loop
    pub fn spawn(
        api: ApiClient,
        store: Arc<RwLock<OrderStore>>,
        state: watch::Receiver<ConnectionState>,
        interval: Duration,
    ) -> Self {
        let token = CancellationToken::new();
        let task = tokio::spawn(run(api, store, state, interval, token.clone()));
        Self { token, task }
    }

    /// Stop the loop and clear its timer
    pub fn stop(self) {
        self.token.cancel();
        self.task.abort();
    }
}

async fn run(
    api: ApiClient,
    store: Arc<RwLock<OrderStore>>,
    state: watch::Receiver<ConnectionState>,
    interval: Duration,
    token: CancellationToken,
) {
    let mut tick = tokio::time::interval(interval);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tick.tick() => {}
        }

        // 实时通道健康时不轮询
        if *state.borrow() == ConnectionState::Connected {
            continue;
        }

        match api.list_orders().await {
            Ok(orders) => {
                tracing::debug!(count = orders.len(), "Polling fallback refreshed orders");
                store.write().replace_all(orders);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Polling fallback fetch failed");
            }
        }
    }
}
