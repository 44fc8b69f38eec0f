use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{AdminCredentials, JwtService};
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::media::MediaStore;
use crate::menu::MenuRenderer;
use crate::reporting::ErrorReporter;

/// Public URL prefix of uploaded media
pub const MEDIA_URL: &str = "/media/";

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆一份。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Arc<Config> | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | media | MediaStore | 上传图片存储 |
/// | renderer | Arc<MenuRenderer> | 菜单页面模板 |
/// | jwt | Arc<JwtService> | 会话令牌 |
/// | admin | Arc<AdminCredentials> | 管理员账号 |
/// | reporter | Option<ErrorReporter> | 错误上报 (debug 模式下为 None) |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    pub media: MediaStore,
    pub renderer: Arc<MenuRenderer>,
    pub jwt: Arc<JwtService>,
    pub admin: Arc<AdminCredentials>,
    pub reporter: Option<ErrorReporter>,
}

impl ServerState {
    /// Open the database, prepare directories and build all services
    pub async fn initialize(config: &Config) -> Result<Self> {
        tokio::fs::create_dir_all(&config.work_dir).await?;
        tokio::fs::create_dir_all(&config.media_dir).await?;

        let db = DbService::new(&config.database_url, config.db_max_connections).await?;
        Self::with_db(config, db)
    }

    /// Build the state around an already opened database
    pub fn with_db(config: &Config, db: DbService) -> Result<Self> {
        let renderer = MenuRenderer::new(MEDIA_URL)?;
        let jwt = JwtService::new(&config.jwt_secret, config.session_ttl_minutes);
        let admin = AdminCredentials::new(&config.admin_username, &config.admin_password)?;
        let reporter = ErrorReporter::from_config(config);
        tracing::info!(username = %admin.username(), "Admin account configured");

        if reporter.is_some() {
            tracing::info!("External error reporting enabled");
        }

        Ok(Self {
            config: Arc::new(config.clone()),
            db,
            media: MediaStore::new(&config.media_dir),
            renderer: Arc::new(renderer),
            jwt: Arc::new(jwt),
            admin: Arc::new(admin),
            reporter,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}
