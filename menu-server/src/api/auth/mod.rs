//! Admin Auth API 模块
//!
//! 登录 / 登出不需要令牌，但仍受 Origin 校验

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/logout", post(handler::logout))
}
