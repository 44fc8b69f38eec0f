//! Menu Server - 餐厅数字菜单
//!
//! # 架构概述
//!
//! - **菜单** (`menu`): 公共菜单视图聚合与页面渲染
//! - **数据库** (`db`): SQLite 存储 (站点信息、分类、菜品)
//! - **认证** (`auth`): JWT + Argon2 管理员会话
//! - **HTTP API** (`api`): 公共页面、JSON 接口、管理接口
//!
//! # 模块结构
//!
//! ```text
//! menu-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、管理员账号
//! ├── api/           # HTTP 路由和处理器
//! ├── menu/          # 菜单视图、模板渲染
//! ├── middleware/    # 日志、安全策略
//! ├── reporting/     # 外部错误上报
//! ├── utils/         # 日志初始化、输入校验
//! ├── db/            # 数据库层
//! └── media.rs       # 上传图片存储
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod media;
pub mod menu;
pub mod middleware;
pub mod reporting;
pub mod utils;

// Re-export 公共类型
pub use auth::{AdminUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use menu::{MenuView, build_menu_view};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;
