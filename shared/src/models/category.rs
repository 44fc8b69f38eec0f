//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
///
/// Default ordering is `sort_order` then `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub sort_order: u32,
    pub is_active: bool,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub sort_order: Option<u32>,
    pub is_active: Option<bool>,
}

/// Update category payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub sort_order: Option<u32>,
    pub is_active: Option<bool>,
}

/// One row of an admin list-edit (the editable columns only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListEdit {
    pub id: i64,
    pub sort_order: Option<u32>,
    pub is_active: Option<bool>,
}
