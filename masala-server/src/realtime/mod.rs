//! 实时模块 - 变更总线 + SSE 中继
//!
//! # 架构
//!
//! ```text
//! mutation handler ──▶ ChangeFeed.publish(RowChange)
//!                            │ (tokio broadcast)
//!              ┌─────────────┴─────────────┐
//!              ▼                           ▼
//!        SSE 连接 A                   SSE 连接 B
//!     (变更 → 重新拉取订单 → RelayEvent 帧)
//! ```
//!
//! 每个变更触发一次独立的全量重取，事件即快照；订阅端丢帧不致错乱，
//! 由下一个事件或轮询自愈。

pub mod feed;
pub mod relay;

pub use feed::ChangeFeed;
pub use relay::order_stream;
