//! External error reporting
//!
//! 5xx 响应以 JSON 事件异步上报到 `ERROR_REPORT_URL`，上报失败只记录日志

use std::time::Duration;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use shared::error::ErrorContext;

use crate::core::{Config, ServerState};

const REPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// One reported failure
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEvent {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub message: String,
    pub environment: String,
    pub release: String,
    /// Unix millis
    pub timestamp: i64,
}

#[derive(Debug, Clone)]
pub struct ErrorReporter {
    client: reqwest::Client,
    endpoint: String,
    environment: String,
    release: String,
}

impl ErrorReporter {
    /// `None` in debug mode or when no endpoint is configured
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.error_reporting_enabled() {
            return None;
        }
        let endpoint = config.error_report_url.clone()?;
        Some(Self::new(endpoint, config.environment.clone()))
    }

    pub fn new(endpoint: impl Into<String>, environment: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REPORT_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Error reporter client fell back to defaults");
                reqwest::Client::new()
            });
        Self {
            client,
            endpoint: endpoint.into(),
            environment: environment.into(),
            release: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn event(&self, method: &str, path: &str, status: u16, message: &str) -> ErrorEvent {
        ErrorEvent {
            method: method.to_string(),
            path: path.to_string(),
            status,
            message: message.to_string(),
            environment: self.environment.clone(),
            release: self.release.clone(),
            timestamp: shared::util::now_millis(),
        }
    }

    /// Fire-and-forget delivery on a background task
    pub fn report(&self, event: ErrorEvent) {
        let reporter = self.clone();
        tokio::spawn(async move {
            if let Err(e) = reporter.send(&event).await {
                tracing::warn!(error = %e, path = %event.path, "Failed to report error event");
            }
        });
    }

    pub async fn send(&self, event: &ErrorEvent) -> Result<(), reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .json(event)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// 错误上报中间件 - 只处理服务端错误 (5xx)
pub async fn error_reporting_middleware(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Response {
    let Some(reporter) = state.reporter.clone() else {
        return next.run(req).await;
    };

    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;

    let status = response.status();
    if status.is_server_error() {
        let message = response
            .extensions()
            .get::<ErrorContext>()
            .map(|ctx| ctx.message.clone())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Server error").to_string());
        reporter.report(reporter.event(&method, &path, status.as_u16(), &message));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, routing::post};
    use tokio::sync::mpsc;

    async fn collector() -> (String, mpsc::UnboundedReceiver<serde_json::Value>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Router::new().route(
            "/events",
            post(move |Json(body): Json<serde_json::Value>| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(body);
                    "ok"
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/events"), rx)
    }

    #[tokio::test]
    async fn test_send_posts_json_event() {
        let (endpoint, mut rx) = collector().await;
        let reporter = ErrorReporter::new(endpoint, "production");

        let event = reporter.event("GET", "/", 500, "database is locked");
        reporter.send(&event).await.unwrap();

        let body = rx.recv().await.unwrap();
        assert_eq!(body["method"], "GET");
        assert_eq!(body["path"], "/");
        assert_eq!(body["status"], 500);
        assert_eq!(body["message"], "database is locked");
        assert_eq!(body["environment"], "production");
        assert_eq!(body["release"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_send_failure_is_an_error_not_a_panic() {
        let reporter = ErrorReporter::new("http://127.0.0.1:9/unreachable", "production");
        let event = reporter.event("GET", "/", 500, "boom");
        assert!(reporter.send(&event).await.is_err());
    }

    #[test]
    fn test_disabled_in_debug_mode() {
        let mut config = Config::from_lookup(|key| match key {
            "ERROR_REPORT_URL" => Some("https://errors.example.com".into()),
            _ => None,
        })
        .unwrap();
        assert!(ErrorReporter::from_config(&config).is_some());

        config.debug = true;
        assert!(ErrorReporter::from_config(&config).is_none());
    }
}
