//! Shared types for the restaurant menu service
//!
//! Data models, the unified error system, and small utilities used by
//! `menu-server` and by anything that talks to its admin API.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
