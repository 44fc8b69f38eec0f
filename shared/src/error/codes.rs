//! Unified error codes for the menu service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 6xxx: Menu errors (settings, categories, items)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the admin front-end can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Host header not in the allowed list
    HostNotAllowed = 2006,
    /// Cross-origin write from an untrusted origin
    OriginNotTrusted = 2007,

    // ==================== 6xxx: Menu ====================
    /// Category not found
    CategoryNotFound = 6001,
    /// Menu item not found
    MenuItemNotFound = 6002,
    /// Site settings row already exists
    SettingsAlreadyExist = 6003,
    /// Site settings can never be deleted
    SettingsNotDeletable = 6004,
    /// Price is negative, too large, or has more than two decimals
    InvalidPrice = 6005,
    /// Uploaded image rejected
    InvalidImage = 6006,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Template rendering error
    RenderError = 9005,
    /// Storage (filesystem) error
    StorageError = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::HostNotAllowed => "Host is not allowed",
            ErrorCode::OriginNotTrusted => "Origin is not trusted",

            // Menu
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::SettingsAlreadyExist => "Site settings already exist",
            ErrorCode::SettingsNotDeletable => "Site settings cannot be deleted",
            ErrorCode::InvalidPrice => "Invalid price",
            ErrorCode::InvalidImage => "Invalid image",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::RenderError => "Page rendering failed",
            ErrorCode::StorageError => "Storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            2006 => Ok(ErrorCode::HostNotAllowed),
            2007 => Ok(ErrorCode::OriginNotTrusted),

            6001 => Ok(ErrorCode::CategoryNotFound),
            6002 => Ok(ErrorCode::MenuItemNotFound),
            6003 => Ok(ErrorCode::SettingsAlreadyExist),
            6004 => Ok(ErrorCode::SettingsNotDeletable),
            6005 => Ok(ErrorCode::InvalidPrice),
            6006 => Ok(ErrorCode::InvalidImage),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::RenderError),
            9006 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
