//! 请求日志中间件
//!
//! 记录所有进入的 HTTP 请求，包含请求 ID、路径、状态码和延迟

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use shared::error::ErrorContext;
use std::time::Instant;
use tracing::{info, warn};

use crate::auth::AdminUser;

/// 请求日志中间件
///
/// - 请求 ID (x-request-id, 由 SetRequestIdLayer 生成)
/// - HTTP 方法和路由模板
/// - 管理员 (如果已认证)
/// - 响应状态码和延迟 (毫秒)
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;

    let latency = start.elapsed();
    let status = response.status();
    let admin = response
        .extensions()
        .get::<AdminUser>()
        .map(|u| u.username.clone());

    if status.is_server_error() {
        let error = response
            .extensions()
            .get::<ErrorContext>()
            .map(|ctx| ctx.message.clone());
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status.as_u16(),
            latency_ms = %latency.as_millis(),
            error = ?error,
            "Request completed with server error"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status.as_u16(),
            latency_ms = %latency.as_millis(),
            admin = ?admin,
            "Request completed"
        );
    }

    response
}
