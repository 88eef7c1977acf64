//! Shared types for the Masala platform
//!
//! Domain and wire types used by both the server and the back-office
//! client: orders, menu catalog, inventory, roles, settings, cart and
//! the realtime relay protocol.

pub mod cart;
pub mod inventory;
pub mod menu;
pub mod money;
pub mod order;
pub mod permission;
pub mod relay;
pub mod settings;
pub mod user;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use cart::{CartItem, CheckoutRequest, cart_total};
pub use inventory::{InventoryItem, StockStatus};
pub use menu::{Category, MenuItem, MenuItemRequirement};
pub use order::{ItemStatus, Order, OrderItem, OrderStatus, PaymentStatus, derive_order_status};
pub use permission::{Section, SectionAccess};
pub use relay::{ChangeAction, ChangeTable, RelayEvent, RelayEventKind, RowChange};
pub use settings::RestaurantSettings;
pub use user::User;

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;
