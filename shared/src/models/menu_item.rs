//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Logical prefix for uploaded item images (relative to the media root)
pub const MENU_IMAGE_PREFIX: &str = "menu/";

/// Menu item entity
///
/// Always belongs to an existing category; removed together with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    /// Two fractional digits, never negative
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    /// Relative path under the media root, e.g. `menu/ab12….jpg`
    pub image: Option<String>,
    pub is_active: bool,
    pub sort_order: u32,
}

impl MenuItem {
    /// Public URL of the image under the given media URL prefix (e.g. `/media/`)
    pub fn image_url(&self, media_url: &str) -> Option<String> {
        self.image.as_ref().map(|path| {
            format!(
                "{}/{}",
                media_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        })
    }
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub category_id: i64,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<u32>,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MenuItemUpdate {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<u32>,
}

/// One row of an admin list-edit (the editable columns only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemListEdit {
    pub id: i64,
    pub price: Option<Decimal>,
    pub sort_order: Option<u32>,
    pub is_active: Option<bool>,
}

/// Admin list filters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MenuItemFilter {
    pub category_id: Option<i64>,
    pub is_active: Option<bool>,
    /// Case-insensitive substring match on name
    pub q: Option<String>,
}
