//! Menu Item Image Upload API 模块

mod handler;

use axum::{Router, extract::DefaultBodyLimit, routing::post};

use crate::core::ServerState;
use crate::media::MAX_FILE_SIZE;

/// Room for multipart framing around the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/items/{id}/image",
            post(handler::upload).delete(handler::remove),
        )
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + MULTIPART_OVERHEAD))
}
