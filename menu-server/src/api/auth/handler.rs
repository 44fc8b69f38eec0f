//! Admin Auth Handlers

use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::auth::{clear_session_cookie, session_cookie};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use crate::utils::validation::validate_required_text;

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    /// 令牌有效期 (秒)
    pub expires_in: i64,
}

/// POST /admin/login - 管理员登录
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Response> {
    validate_required_text(&payload.username, "username", 150)?;
    validate_required_text(&payload.password, "password", 128)?;

    let admin = state.admin.clone();
    let LoginRequest { username, password } = payload;
    // argon2 校验较慢，放到阻塞线程池
    let verified = tokio::task::spawn_blocking({
        let username = username.clone();
        move || admin.verify(&username, &password)
    })
    .await
    .map_err(|e| AppError::internal(format!("Login task failed: {e}")))?;

    if !verified {
        tracing::warn!(username = %username, "Admin login failed");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt
        .generate_token(&username)
        .map_err(|e| AppError::internal(e.to_string()))?;
    let expires_in = state.jwt.ttl_seconds();
    let cookie = session_cookie(&token, expires_in, state.config.session_cookie_secure);

    tracing::info!(username = %username, "Admin logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            token,
            username,
            expires_in,
        }),
    )
        .into_response())
}

/// POST /admin/logout - 清除会话 Cookie
pub async fn logout(State(state): State<ServerState>) -> Response {
    let cookie = clear_session_cookie(state.config.session_cookie_secure);
    ([(header::SET_COOKIE, cookie)], Json(true)).into_response()
}
