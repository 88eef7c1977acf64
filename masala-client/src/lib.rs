//! Masala back-office client runtime
//!
//! Keeps an in-memory order store in sync with the server through three
//! channels:
//!
//! 1. an initial bulk fetch ([`ApiClient::list_orders`]),
//! 2. the realtime SSE stream ([`RealtimeConnection`]) reduced into the
//!    store ([`OrderStore::apply`]),
//! 3. a polling fallback ([`Poller`]) that re-runs the bulk fetch while
//!    the realtime channel is down.
//!
//! The store treats every inbound order as an authoritative snapshot
//! (idempotent replace), so out-of-order delivery and overlapping
//! fetches self-heal.

pub mod api;
pub mod config;
pub mod connection;
pub mod error;
pub mod poller;
pub mod sse;
pub mod store;

pub use api::ApiClient;
pub use config::{ClientConfig, ReconnectPolicy};
pub use connection::{ConnectionState, RealtimeConnection};
pub use error::ClientError;
pub use poller::Poller;
pub use store::{Cue, OrderStore};
