//! 认证模块
//!
//! - [`JwtService`] - 会话令牌
//! - [`AdminCredentials`] - 管理员账号 (argon2)
//! - [`require_admin`] - 管理接口认证中间件

pub mod credentials;
pub mod jwt;
pub mod middleware;

pub use credentials::AdminCredentials;
pub use jwt::{Claims, JwtError, JwtService};
pub use middleware::{AdminUser, require_admin};

/// Admin session cookie name
pub const SESSION_COOKIE: &str = "menu_session";

/// `Set-Cookie` value carrying a fresh session token
pub fn session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/admin; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
