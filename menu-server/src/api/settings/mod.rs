//! Site Settings API 模块 (单例)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/settings",
        get(handler::get)
            .post(handler::create)
            .put(handler::update)
            .delete(handler::delete),
    )
}
