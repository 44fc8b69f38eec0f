//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::CategoryNotFound | Self::MenuItemNotFound => {
                StatusCode::NOT_FOUND
            }

            // 409 Conflict
            Self::AlreadyExists | Self::SettingsAlreadyExist => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::OriginNotTrusted | Self::SettingsNotDeletable => StatusCode::FORBIDDEN,

            // 400 Bad Request (unknown Host header)
            Self::HostNotAllowed => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::RenderError
            | Self::StorageError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            Self::ValidationFailed
            | Self::InvalidPrice
            | Self::InvalidImage => StatusCode::BAD_REQUEST,
        }
    }
}
