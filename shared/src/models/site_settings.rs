//! Site Settings Model (Singleton)
//!
//! 站点信息，全局只有一条记录 (id = 1)

use serde::{Deserialize, Serialize};

/// Fixed identity of the only settings row
pub const SITE_SETTINGS_ID: i64 = 1;

pub const DEFAULT_NAME: &str = "Restaurant Name";
pub const DEFAULT_WHATSAPP: &str = "994500000000";
pub const DEFAULT_ADDRESS: &str = "Address";
pub const DEFAULT_WORKING_HOURS: &str = "11:00 – 23:00";
pub const DEFAULT_MAP_URL: &str = "https://maps.google.com/?q=0,0";

/// Site-wide display settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SiteSettings {
    pub id: i64,
    pub name: String,
    /// Phone-like string used to build the WhatsApp link
    pub whatsapp: String,
    pub address: String,
    pub working_hours: String,
    /// Map link, may be blank
    pub map_url: String,
    pub updated_at: i64,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            id: SITE_SETTINGS_ID,
            name: DEFAULT_NAME.to_string(),
            whatsapp: DEFAULT_WHATSAPP.to_string(),
            address: DEFAULT_ADDRESS.to_string(),
            working_hours: DEFAULT_WORKING_HOURS.to_string(),
            map_url: DEFAULT_MAP_URL.to_string(),
            updated_at: 0,
        }
    }
}

impl SiteSettings {
    /// `https://wa.me/<digits>` link, or `None` when the number has no digits
    pub fn whatsapp_link(&self) -> Option<String> {
        let digits: String = self.whatsapp.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            None
        } else {
            Some(format!("https://wa.me/{digits}"))
        }
    }
}

/// Create site settings payload (only accepted while no row exists)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteSettingsCreate {
    pub name: Option<String>,
    pub whatsapp: Option<String>,
    pub address: Option<String>,
    pub working_hours: Option<String>,
    pub map_url: Option<String>,
}

/// Update site settings payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteSettingsUpdate {
    pub name: Option<String>,
    pub whatsapp: Option<String>,
    pub address: Option<String>,
    pub working_hours: Option<String>,
    pub map_url: Option<String>,
}
