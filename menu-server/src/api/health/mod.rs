//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /healthz | GET | 存活探针，固定返回 `ok` | 无 |
//!
//! 不访问数据库，也不经过 Host / HTTPS 策略。

use axum::{Router, http::header, response::IntoResponse, routing::get};

use crate::core::ServerState;
use crate::middleware::security::HEALTH_PATH;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route(HEALTH_PATH, get(healthz))
}

async fn healthz() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "ok")
}
