//! Public Menu Handlers

use axum::{Json, extract::State, response::Html};

use crate::core::ServerState;
use crate::menu::{MenuView, build_menu_view};
use crate::utils::AppResult;

/// GET / - 菜单页面
pub async fn page(State(state): State<ServerState>) -> AppResult<Html<String>> {
    let view = build_menu_view(state.pool()).await?;
    tracing::debug!(
        categories = view.categories.len(),
        items = view.item_count(),
        "Menu view built"
    );
    let body = state.renderer.render(&view)?;
    Ok(Html(body))
}

/// GET /api/menu - 菜单读模型
pub async fn menu_json(State(state): State<ServerState>) -> AppResult<Json<MenuView>> {
    let view = build_menu_view(state.pool()).await?;
    Ok(Json(view))
}
