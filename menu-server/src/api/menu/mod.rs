//! Public menu API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | / | GET | 菜单页面 (HTML) |
//! | /api/menu | GET | 菜单读模型 (JSON) |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::page))
        .route("/api/menu", get(handler::menu_json))
}
