//! Server configuration
//!
//! 所有配置均来自环境变量 (启动时先加载 `.env`)

use std::path::PathBuf;

use crate::auth::jwt::generate_secure_printable_jwt_secret;
use crate::core::{Result, ServerError};

const DEV_ADMIN_USERNAME: &str = "admin";
const DEV_ADMIN_PASSWORD: &str = "admin123";
const MIN_JWT_SECRET_LEN: usize = 32;
/// 会话有效期上限 (30 天)
const MAX_SESSION_TTL_MINUTES: i64 = 30 * 24 * 60;

/// Hosts that are always accepted, whatever `ALLOWED_HOSTS` says
pub const DEFAULT_ALLOWED_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Menu server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// Debug mode; disables external error reporting
    pub debug: bool,
    pub http_host: String,
    pub http_port: u16,
    /// Base directory for the embedded database, media and logs
    pub work_dir: PathBuf,
    /// SQLite connection string
    pub database_url: String,
    pub db_max_connections: u32,
    /// Uploaded images root
    pub media_dir: PathBuf,
    /// Static assets (css/js)
    pub static_dir: PathBuf,
    /// Accepted `Host` values; `.example.com` matches subdomains, `*` matches all
    pub allowed_hosts: Vec<String>,
    /// Origins trusted for admin writes; `https://*.example.com` wildcards allowed
    pub csrf_trusted_origins: Vec<String>,
    /// Redirect plain HTTP (per `X-Forwarded-Proto`) to https
    pub secure_ssl_redirect: bool,
    /// `Secure` flag on the admin session cookie
    pub session_cookie_secure: bool,
    /// `Strict-Transport-Security` max-age, 0 disables the header
    pub hsts_seconds: u64,
    pub admin_username: String,
    pub admin_password: String,
    /// Session token signing key
    pub jwt_secret: String,
    /// `JWT_SECRET` was unset and a temporary key was generated
    pub jwt_secret_generated: bool,
    /// 管理员会话有效期 (分钟)
    pub session_ttl_minutes: i64,
    pub log_level: String,
    /// Daily rolling log files are written here when set
    pub log_dir: Option<String>,
    pub log_json: bool,
    /// External error-reporting endpoint (ignored in debug mode)
    pub error_report_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let flag = |key: &str, default: bool| var(key).map(|v| parse_bool(&v)).unwrap_or(default);

        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".into());
        let is_dev = environment == "development";

        let work_dir = PathBuf::from(var("WORK_DIR").unwrap_or_else(|| "./data".into()));

        let database_url = var("DATABASE_URL")
            .unwrap_or_else(|| format!("sqlite:{}", work_dir.join("menu.db").display()));
        if !database_url.starts_with("sqlite:") {
            return Err(ServerError::Config(format!(
                "DATABASE_URL must be a sqlite connection string, got {database_url}"
            )));
        }

        let media_dir = var("MEDIA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| work_dir.join("media"));

        let mut allowed_hosts: Vec<String> = DEFAULT_ALLOWED_HOSTS.iter().map(|h| h.to_string()).collect();
        for host in split_list(var("ALLOWED_HOSTS")) {
            let host = host.to_ascii_lowercase();
            if !allowed_hosts.contains(&host) {
                allowed_hosts.push(host);
            }
        }

        let admin_username = var("ADMIN_USERNAME").unwrap_or_else(|| DEV_ADMIN_USERNAME.into());
        let admin_password = require_secret(var("ADMIN_PASSWORD"), "ADMIN_PASSWORD", &environment)?
            .unwrap_or_else(|| DEV_ADMIN_PASSWORD.into());

        let (jwt_secret, jwt_secret_generated) =
            match require_secret(var("JWT_SECRET"), "JWT_SECRET", &environment)? {
                Some(secret) if secret.len() < MIN_JWT_SECRET_LEN && !is_dev => {
                    return Err(ServerError::Config(format!(
                        "JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters long"
                    )));
                }
                Some(secret) => (secret, false),
                None => (generate_secure_printable_jwt_secret(), true),
            };

        Ok(Self {
            debug: flag("DEBUG", false),
            http_host: var("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            http_port: var("HTTP_PORT").and_then(|p| p.parse().ok()).unwrap_or(8000),
            database_url,
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(5),
            media_dir,
            static_dir: PathBuf::from(var("STATIC_DIR").unwrap_or_else(|| "static".into())),
            allowed_hosts,
            csrf_trusted_origins: split_list(var("CSRF_TRUSTED_ORIGINS"))
                .into_iter()
                .map(|o| o.trim_end_matches('/').to_ascii_lowercase())
                .collect(),
            secure_ssl_redirect: flag("SECURE_SSL_REDIRECT", true),
            session_cookie_secure: flag("SESSION_COOKIE_SECURE", true),
            hsts_seconds: var("HSTS_SECONDS").and_then(|s| s.parse().ok()).unwrap_or(0),
            admin_username,
            admin_password,
            jwt_secret,
            jwt_secret_generated,
            session_ttl_minutes: var("SESSION_TTL_MINUTES")
                .and_then(|m| m.parse().ok())
                .filter(|m| *m > 0)
                .unwrap_or(720)
                .min(MAX_SESSION_TTL_MINUTES),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: var("LOG_DIR"),
            log_json: flag("LOG_JSON", false),
            error_report_url: var("ERROR_REPORT_URL"),
            work_dir,
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Error reporting is active only outside debug mode and with an endpoint
    pub fn error_reporting_enabled(&self) -> bool {
        !self.debug && self.error_report_url.is_some()
    }
}

/// Secrets must be set in non-development environments.
///
/// Returns `None` in development when unset, letting the caller pick a fallback.
fn require_secret(value: Option<String>, name: &str, environment: &str) -> Result<Option<String>> {
    match value {
        Some(v) => Ok(Some(v)),
        None if environment == "development" => Ok(None),
        None => Err(ServerError::Config(format!(
            "{name} must be set in {environment} environment"
        ))),
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_development_defaults() {
        let config = load(&[]).unwrap();
        assert!(config.is_development());
        assert!(!config.debug);
        assert_eq!(config.http_port, 8000);
        assert_eq!(config.admin_username, "admin");
        assert_eq!(config.admin_password, "admin123");
        assert_eq!(config.jwt_secret.len(), 64);
        assert!(config.jwt_secret_generated);
        assert!(config.database_url.starts_with("sqlite:"));
        assert!(config.database_url.ends_with("menu.db"));
        assert_eq!(config.media_dir, PathBuf::from("./data").join("media"));
        assert_eq!(config.allowed_hosts, vec!["localhost", "127.0.0.1"]);
        assert!(config.secure_ssl_redirect);
        assert!(config.session_cookie_secure);
        assert_eq!(config.session_ttl_minutes, 720);
    }

    #[test]
    fn test_production_requires_secrets() {
        let err = load(&[("ENVIRONMENT", "production")]).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));

        let err = load(&[
            ("ENVIRONMENT", "production"),
            ("ADMIN_PASSWORD", "s3cret"),
            ("JWT_SECRET", "too-short"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        let config = load(&[
            ("ENVIRONMENT", "production"),
            ("ADMIN_PASSWORD", "s3cret"),
            ("JWT_SECRET", &"k".repeat(40)),
        ])
        .unwrap();
        assert_eq!(config.admin_password, "s3cret");
        assert!(!config.jwt_secret_generated);
    }

    #[test]
    fn test_session_ttl_is_clamped() {
        let config = load(&[("SESSION_TTL_MINUTES", &i64::MAX.to_string())]).unwrap();
        assert_eq!(config.session_ttl_minutes, MAX_SESSION_TTL_MINUTES);

        let jwt = crate::auth::JwtService::new(&config.jwt_secret, config.session_ttl_minutes);
        assert_eq!(jwt.ttl_seconds(), MAX_SESSION_TTL_MINUTES * 60);
        let token = jwt.generate_token("admin").unwrap();
        assert_eq!(jwt.validate_token(&token).unwrap().sub, "admin");

        let config = load(&[("SESSION_TTL_MINUTES", "0")]).unwrap();
        assert_eq!(config.session_ttl_minutes, 720);
    }

    #[test]
    fn test_lists_and_flags() {
        let config = load(&[
            ("ALLOWED_HOSTS", "menu.example.com, .example.org,localhost"),
            ("CSRF_TRUSTED_ORIGINS", "https://menu.example.com/"),
            ("SECURE_SSL_REDIRECT", "False"),
            ("DEBUG", "1"),
            ("ERROR_REPORT_URL", "https://errors.example.com/api"),
        ])
        .unwrap();
        assert_eq!(
            config.allowed_hosts,
            vec!["localhost", "127.0.0.1", "menu.example.com", ".example.org"]
        );
        assert_eq!(config.csrf_trusted_origins, vec!["https://menu.example.com"]);
        assert!(!config.secure_ssl_redirect);
        assert!(config.debug);
        assert!(!config.error_reporting_enabled());
    }

    #[test]
    fn test_non_sqlite_database_url_rejected() {
        let err = load(&[("DATABASE_URL", "postgres://localhost/menu")]).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
