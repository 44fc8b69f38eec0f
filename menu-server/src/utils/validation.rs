//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits live here.

use rust_decimal::Decimal;
use shared::models::{
    CategoryCreate, CategoryUpdate, MenuItemCreate, MenuItemUpdate, SiteSettingsCreate,
    SiteSettingsUpdate,
};

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Restaurant name
pub const MAX_SITE_NAME_LEN: usize = 120;

/// WhatsApp number (phone-like)
pub const MAX_WHATSAPP_LEN: usize = 20;

pub const MAX_ADDRESS_LEN: usize = 255;

/// Free text such as "11:00 – 23:00"
pub const MAX_WORKING_HOURS_LEN: usize = 100;

/// URLs
pub const MAX_URL_LEN: usize = 2048;

pub const MAX_CATEGORY_NAME_LEN: usize = 100;

pub const MAX_ITEM_NAME_LEN: usize = 150;

pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Largest accepted price (9999.99)
pub fn max_price() -> Decimal {
    Decimal::new(999_999, 2)
}

// ── Generic helpers ─────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        let len = v.chars().count();
        if len > max_len {
            return Err(AppError::validation(format!(
                "{field} is too long ({len} chars, max {max_len})"
            )));
        }
    }
    Ok(())
}

/// Like [`validate_required_text`], but only when the field is being changed
pub fn validate_optional_required_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_required_text(v, field, max_len),
        None => Ok(()),
    }
}

/// Absolute http(s) URL, or blank
pub fn validate_url_or_blank(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    if value.len() > MAX_URL_LEN {
        return Err(AppError::validation(format!(
            "{field} is too long (max {MAX_URL_LEN})"
        )));
    }
    match reqwest::Url::parse(value.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(AppError::validation(format!("{field} must be a valid URL"))),
    }
}

/// Two fractional digits at most, within `0..=9999.99`
pub fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price.normalize().scale() > 2 {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            "price must have at most 2 decimal places",
        ));
    }
    let max = max_price();
    if price < Decimal::ZERO || price > max {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("price must be between 0 and {max}"),
        ));
    }
    Ok(())
}

// ── Payload validation ──────────────────────────────────────────────

pub fn validate_settings_create(data: &SiteSettingsCreate) -> Result<(), AppError> {
    validate_optional_required_text(&data.name, "name", MAX_SITE_NAME_LEN)?;
    validate_optional_text(&data.whatsapp, "whatsapp", MAX_WHATSAPP_LEN)?;
    validate_optional_text(&data.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&data.working_hours, "working_hours", MAX_WORKING_HOURS_LEN)?;
    if let Some(url) = &data.map_url {
        validate_url_or_blank(url, "map_url")?;
    }
    Ok(())
}

pub fn validate_settings_update(data: &SiteSettingsUpdate) -> Result<(), AppError> {
    validate_optional_required_text(&data.name, "name", MAX_SITE_NAME_LEN)?;
    validate_optional_text(&data.whatsapp, "whatsapp", MAX_WHATSAPP_LEN)?;
    validate_optional_text(&data.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&data.working_hours, "working_hours", MAX_WORKING_HOURS_LEN)?;
    if let Some(url) = &data.map_url {
        validate_url_or_blank(url, "map_url")?;
    }
    Ok(())
}

pub fn validate_category_create(data: &CategoryCreate) -> Result<(), AppError> {
    validate_required_text(&data.name, "name", MAX_CATEGORY_NAME_LEN)
}

pub fn validate_category_update(data: &CategoryUpdate) -> Result<(), AppError> {
    validate_optional_required_text(&data.name, "name", MAX_CATEGORY_NAME_LEN)
}

pub fn validate_item_create(data: &MenuItemCreate) -> Result<(), AppError> {
    validate_required_text(&data.name, "name", MAX_ITEM_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_price(data.price)
}

pub fn validate_item_update(data: &MenuItemUpdate) -> Result<(), AppError> {
    validate_optional_required_text(&data.name, "name", MAX_ITEM_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    if let Some(price) = data.price {
        validate_price(price)?;
    }
    Ok(())
}
