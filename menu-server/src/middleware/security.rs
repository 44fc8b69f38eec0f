//! 请求安全策略
//!
//! - Host 白名单
//! - 反向代理后的 HTTPS 跳转 (`X-Forwarded-Proto`)
//! - 管理写操作的 Origin 校验
//! - 通用安全响应头

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use http::{HeaderName, HeaderValue, Method, header};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};

/// Liveness probe path, exempt from host and TLS policy
pub const HEALTH_PATH: &str = "/healthz";

/// Strip the port from a `Host` value (`[::1]:8000` → `[::1]`)
fn host_without_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Whether `host` (may carry a port) matches one of the allowed patterns.
///
/// `*` matches everything, `.example.com` matches `example.com` and any
/// subdomain of it; anything else must match exactly.
pub fn host_allowed(host: &str, allowed: &[String]) -> bool {
    let host = host_without_port(host.trim()).trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() {
        return false;
    }
    allowed.iter().any(|pattern| {
        if pattern == "*" {
            true
        } else if let Some(domain) = pattern.strip_prefix('.') {
            host == domain || host.ends_with(pattern.as_str())
        } else {
            host == *pattern
        }
    })
}

/// Whether a request `Origin` may perform unsafe admin methods.
///
/// Same-origin (origin authority equals `Host`) is always allowed; otherwise
/// the origin must match a trusted entry (`https://*.example.com` wildcards).
pub fn origin_trusted(origin: &str, host: Option<&str>, trusted: &[String]) -> bool {
    let Ok(url) = reqwest::Url::parse(origin.trim()) else {
        return false;
    };
    let Some(origin_host) = url.host_str().map(str::to_ascii_lowercase) else {
        return false;
    };
    let authority = match url.port() {
        Some(port) => format!("{origin_host}:{port}"),
        None => origin_host.clone(),
    };

    if let Some(host) = host
        && host.trim().eq_ignore_ascii_case(&authority)
    {
        return true;
    }

    let scheme = url.scheme();
    trusted.iter().any(|entry| match entry.split_once("://*.") {
        Some((entry_scheme, domain)) => {
            entry_scheme == scheme
                && (origin_host == domain || origin_host.ends_with(&format!(".{domain}")))
        }
        None => entry.eq_ignore_ascii_case(&format!("{scheme}://{authority}")),
    })
}

fn is_unsafe(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE)
}

fn header_str<'a>(req: &'a Request, name: &HeaderName) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Host 白名单 + HTTPS 跳转
pub async fn host_policy_middleware(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.uri().path() == HEALTH_PATH {
        return Ok(next.run(req).await);
    }

    let host = header_str(&req, &header::HOST)
        .map(str::to_string)
        .or_else(|| req.uri().authority().map(|a| a.to_string()))
        .unwrap_or_default();

    if !host_allowed(&host, &state.config.allowed_hosts) {
        tracing::warn!(host = %host, "Rejected request for disallowed host");
        return Err(AppError::with_message(
            ErrorCode::HostNotAllowed,
            format!("Invalid host header: {host}"),
        ));
    }

    if state.config.secure_ssl_redirect {
        let forwarded_http = header_str(&req, &HeaderName::from_static("x-forwarded-proto"))
            .map(|proto| proto.split(',').next().unwrap_or("").trim().eq_ignore_ascii_case("http"))
            .unwrap_or(false);
        if forwarded_http {
            let path = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            return Ok(Redirect::permanent(&format!("https://{host}{path}")).into_response());
        }
    }

    Ok(next.run(req).await)
}

/// 管理写操作的 Origin 校验 (没有 Origin 头时放行，交给 SameSite Cookie)
pub async fn origin_check_middleware(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_unsafe(req.method())
        && let Some(origin) = header_str(&req, &header::ORIGIN)
    {
        let host = header_str(&req, &header::HOST);
        if !origin_trusted(origin, host, &state.config.csrf_trusted_origins) {
            tracing::warn!(origin = %origin, uri = %req.uri(), "Rejected cross-origin admin write");
            return Err(AppError::with_message(
                ErrorCode::OriginNotTrusted,
                "Origin checking failed",
            ));
        }
    }
    Ok(next.run(req).await)
}

/// Security response headers; HSTS only when `hsts_seconds > 0`
pub fn security_header_layers(
    hsts_seconds: u64,
) -> (
    SetResponseHeaderLayer<HeaderValue>,
    SetResponseHeaderLayer<HeaderValue>,
    SetResponseHeaderLayer<HeaderValue>,
    Option<SetResponseHeaderLayer<HeaderValue>>,
) {
    let hsts = (hsts_seconds > 0)
        .then(|| HeaderValue::from_str(&format!("max-age={hsts_seconds}")).ok())
        .flatten()
        .map(|value| SetResponseHeaderLayer::if_not_present(header::STRICT_TRANSPORT_SECURITY, value));

    (
        SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ),
        SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("same-origin"),
        ),
        SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ),
        hsts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_host_allowed() {
        let allowed = list(&["localhost", "127.0.0.1", ".example.com", "menu.test"]);
        assert!(host_allowed("localhost:8000", &allowed));
        assert!(host_allowed("127.0.0.1", &allowed));
        assert!(host_allowed("example.com", &allowed));
        assert!(host_allowed("menu.example.com", &allowed));
        assert!(host_allowed("MENU.test", &allowed));
        assert!(!host_allowed("evil-example.com", &allowed));
        assert!(!host_allowed("menu.test.evil.org", &allowed));
        assert!(!host_allowed("", &allowed));

        assert!(host_allowed("[::1]:8000", &list(&["[::1]"])));
        assert!(host_allowed("anything.org", &list(&["*"])));
    }

    #[test]
    fn test_origin_same_host() {
        assert!(origin_trusted("http://localhost:8000", Some("localhost:8000"), &[]));
        assert!(!origin_trusted("http://localhost:9000", Some("localhost:8000"), &[]));
        assert!(!origin_trusted("null", Some("localhost:8000"), &[]));
    }

    #[test]
    fn test_origin_trusted_list() {
        let trusted = list(&["https://admin.example.org", "https://*.example.com"]);
        assert!(origin_trusted("https://admin.example.org", None, &trusted));
        assert!(origin_trusted("https://menu.example.com", None, &trusted));
        assert!(origin_trusted("https://example.com", None, &trusted));
        assert!(!origin_trusted("http://menu.example.com", None, &trusted));
        assert!(!origin_trusted("https://example.com.evil.org", None, &trusted));
    }
}
