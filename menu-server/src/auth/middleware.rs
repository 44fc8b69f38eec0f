//! 认证中间件
//!
//! `/admin/api/*` 需要有效的管理员会话令牌

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::header;

use crate::auth::{JwtError, JwtService, SESSION_COOKIE};
use crate::core::ServerState;
use crate::utils::AppError;

/// 当前管理员 (由认证中间件注入请求扩展)
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub username: String,
}

/// 认证中间件 - 要求管理员登录
///
/// 令牌来源 (按顺序):
/// - `Authorization: Bearer <token>`
/// - 会话 Cookie
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无令牌 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
pub async fn require_admin(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req)
        .or_else(|| cookie_value(&req, SESSION_COOKIE))
        .ok_or_else(|| {
            tracing::warn!(uri = %req.uri(), "Admin request without session token");
            AppError::not_authenticated()
        })?;

    match state.jwt.validate_token(&token) {
        Ok(claims) => {
            let admin = AdminUser {
                username: claims.sub,
            };
            req.extensions_mut().insert(admin.clone());
            let mut response = next.run(req).await;
            // 供外层日志中间件读取
            response.extensions_mut().insert(admin);
            Ok(response)
        }
        Err(e) => {
            tracing::warn!(error = %e, uri = %req.uri(), "Admin token rejected");
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .map(str::to_string)
}

/// Value of a named cookie from the `Cookie` header(s)
pub fn cookie_value(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
