//! HTTP API
//!
//! | 前缀 | 说明 | 认证 |
//! |------|------|------|
//! | `/`, `/api/menu` | 公共菜单 | 无 |
//! | `/healthz` | 存活探针 | 无 |
//! | `/admin/login`, `/admin/logout` | 管理员会话 | 无 |
//! | `/admin/api/*` | 管理接口 | 管理员令牌 |
//! | `/static/*`, `/media/*` | 静态文件 / 上传图片 | 无 |

pub mod auth;
pub mod categories;
pub mod health;
pub mod items;
pub mod menu;
pub mod settings;
pub mod upload;

use axum::{Router, middleware};
use http::{HeaderName, HeaderValue};
use tower::util::option_layer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::services::ServeDir;
use uuid::Uuid;

use crate::auth::require_admin;
use crate::core::ServerState;
use crate::middleware::{
    host_policy_middleware, logging_middleware, origin_check_middleware, security_header_layers,
};
use crate::reporting::error_reporting_middleware;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// 管理路由: 登录/登出 + 需要认证的 `/api/*`
fn admin_router(state: &ServerState) -> Router<ServerState> {
    let api = Router::new()
        .merge(settings::router())
        .merge(categories::router())
        .merge(items::router())
        .merge(upload::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(auth::router())
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            origin_check_middleware,
        ))
}

/// Build a router with all routes registered (no global middleware, no state)
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(menu::router())
        .nest("/admin", admin_router(state))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .nest_service("/media", ServeDir::new(&state.config.media_dir))
}

/// Build the fully configured application
pub fn build_app(state: ServerState) -> Router {
    let (nosniff, referrer_policy, frame_options, hsts) =
        security_header_layers(state.config.hsts_seconds);

    build_router(&state)
        // ========== Application Middleware (inner → outer) ==========
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error_reporting_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            host_policy_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        // ========== Tower HTTP Middleware ==========
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .layer(nosniff)
        .layer(referrer_policy)
        .layer(frame_options)
        .layer(option_layer(hsts))
        .with_state(state)
}
