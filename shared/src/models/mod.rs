//! Data models
//!
//! Shared between menu-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`;
//! `MenuItem` is mapped by hand because prices are stored as integer cents.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod category;
pub mod menu_item;
pub mod site_settings;

// Re-exports
pub use category::*;
pub use menu_item::*;
pub use site_settings::*;
