//! Realtime connection with reconnect state machine
//!
//! # 状态机
//!
//! ```text
//! Disconnected ──▶ Connecting ──▶ Connected
//!       ▲              │              │ stream error / EOF
//!       │   (backoff)  │ connect err  ▼
//!       └──────────────┴──────── Disconnected ──▶ GaveUp (终态)
//!                                       超过 max_retries
//! ```
//!
//! - 连接成功后重试计数清零
//! - 重连延迟按 [`ReconnectPolicy`] 倍增、封顶，跨次不减
//! - 每条 data 帧按 JSON 解析为 [`RelayEvent`]；坏帧记日志丢弃，
//!   不影响连接
//! - 调用方 `disconnect()` 立即关闭连接并清掉挂起的重连定时器

use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use shared::relay::RelayEvent;

use crate::config::ClientConfig;
use crate::sse::SseParser;

/// Connection lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Terminal: retry ceiling reached, no further attempts
    GaveUp,
}

/// Capacity of the parsed-event channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A live (or reconnecting) realtime subscription.
///
/// Events are surfaced through an async [`next_event`](Self::next_event)
/// so the state machine is testable without any UI runtime.
pub struct RealtimeConnection {
    events: mpsc::Receiver<RelayEvent>,
    state: watch::Receiver<ConnectionState>,
    shutdown: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl RealtimeConnection {
    /// Open the stream and start the reconnect loop in the background
    pub fn connect(config: ClientConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(run(config, event_tx, state_tx, shutdown.clone()));

        Self {
            events: event_rx,
            state: state_rx,
            shutdown,
            task,
        }
    }

    /// Next parsed relay event; `None` once the connection is torn down
    pub async fn next_event(&mut self) -> Option<RelayEvent> {
        self.events.recv().await
    }

    /// Current state snapshot
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Watch channel for reacting to state changes (polling fallback)
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Terminal error flag: retries exhausted
    pub fn gave_up(&self) -> bool {
        self.state() == ConnectionState::GaveUp
    }

    /// Caller-initiated teardown: closes the stream and clears any
    /// pending reconnect timer. No dangling timers remain.
    pub fn disconnect(self) {
        self.shutdown.cancel();
        self.task.abort();
    }
}

/// Connect-read-reconnect loop
async fn run(
    config: ClientConfig,
    events: mpsc::Sender<RelayEvent>,
    state: watch::Sender<ConnectionState>,
    shutdown: CancellationToken,
) {
    let client = reqwest::Client::new();
    let mut attempts = 0u32;

    loop {
        if shutdown.is_cancelled() {
            let _ = state.send(ConnectionState::Disconnected);
            return;
        }

        let _ = state.send(ConnectionState::Connecting);

        match open_stream(&client, &config).await {
            Ok(response) => {
                let _ = state.send(ConnectionState::Connected);
                attempts = 0;
                tracing::info!(url = %config.realtime_url(), "Realtime stream connected");

                read_stream(response, &events, &shutdown).await;

                if shutdown.is_cancelled() {
                    let _ = state.send(ConnectionState::Disconnected);
                    return;
                }
                tracing::warn!("Realtime stream closed, scheduling reconnect");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Realtime connect failed");
            }
        }

        let _ = state.send(ConnectionState::Disconnected);
        if attempts >= config.reconnect.max_retries {
            tracing::error!(
                attempts,
                "Realtime reconnect ceiling reached, giving up"
            );
            let _ = state.send(ConnectionState::GaveUp);
            return;
        }

        let delay = config.reconnect.delay_for(attempts);
        attempts += 1;
        tracing::debug!(?delay, attempt = attempts, "Backing off before reconnect");

        tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = state.send(ConnectionState::Disconnected);
                return;
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

/// Open the SSE response (status checked, body streamed)
async fn open_stream(
    client: &reqwest::Client,
    config: &ClientConfig,
) -> Result<reqwest::Response, reqwest::Error> {
    let mut request = client
        .get(config.realtime_url())
        .header(http::header::ACCEPT, "text/event-stream");
    if let Some(token) = &config.token {
        request = request.bearer_auth(token);
    }
    let response = request.send().await?;
    response.error_for_status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReconnectPolicy;
    use std::time::Duration;

    #[tokio::test]
    async fn gives_up_after_retry_ceiling() {
        // Nothing listens on this port: every connect fails fast
        let config = ClientConfig::new("http://127.0.0.1:9").with_reconnect(ReconnectPolicy {
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            max_retries: 3,
        });

        let connection = RealtimeConnection::connect(config);
        let mut state = connection.watch_state();

        let gave_up = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                if *state.borrow() == ConnectionState::GaveUp {
                    return true;
                }
                if state.changed().await.is_err() {
                    return false;
                }
            }
        })
        .await
        .unwrap_or(false);

        assert!(gave_up, "connection must park in GaveUp after the ceiling");
        assert!(connection.gave_up());
        connection.disconnect();
    }

    #[tokio::test]
    async fn disconnect_clears_pending_reconnect() {
        let config = ClientConfig::new("http://127.0.0.1:9").with_reconnect(ReconnectPolicy {
            base_delay: Duration::from_secs(3600),
            max_delay: Duration::from_secs(3600),
            max_retries: 10,
        });

        let mut connection = RealtimeConnection::connect(config);
        // Give the task a moment to fail its first connect and park in backoff
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!connection.is_connected());

        {
            let received = connection.next_event();
            tokio::pin!(received);
            // No events are buffered before teardown
            assert!(
                tokio::time::timeout(Duration::from_millis(50), &mut received)
                    .await
                    .is_err()
            );
        }

        connection.disconnect();
    }
}

/// Pump frames until the stream ends, errors, or teardown
async fn read_stream(
    response: reqwest::Response,
    events: &mpsc::Sender<RelayEvent>,
    shutdown: &CancellationToken,
) {
    let mut stream = response.bytes_stream();
    let mut parser = SseParser::new();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            chunk = stream.next() => match chunk {
                Some(Ok(bytes)) => {
                    for payload in parser.push(&bytes) {
                        match serde_json::from_str::<RelayEvent>(&payload) {
                            Ok(event) => {
                                if events.send(event).await.is_err() {
                                    // Receiver dropped: nothing left to feed
                                    return;
                                }
                            }
                            Err(e) => {
                                // 坏帧只记日志，连接保持
                                tracing::warn!(error = %e, "Malformed relay payload, dropping");
                            }
                        }
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Realtime stream error");
                    return;
                }
                None => return,
            },
        }
    }
}
