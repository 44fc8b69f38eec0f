//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{MenuItem, MenuItemCreate, MenuItemFilter, MenuItemListEdit, MenuItemUpdate};

use crate::core::ServerState;
use crate::db::repository::{RepoError, menu_item};
use crate::utils::validation::{validate_item_create, validate_item_update, validate_price};
use crate::utils::{AppError, AppResult, ErrorCode};

fn item_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {id} not found"))
}

fn map_not_found(id: i64) -> impl FnOnce(RepoError) -> AppError {
    move |e| match e {
        RepoError::NotFound(_) => item_not_found(id),
        other => other.into(),
    }
}

/// GET /admin/api/items - 获取菜品列表 (?category_id=&is_active=&q=)
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<MenuItemFilter>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let items = menu_item::find_all(state.pool(), &filter).await?;
    Ok(Json(items))
}

/// GET /admin/api/items/{id} - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let item = menu_item::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| item_not_found(id))?;
    Ok(Json(item))
}

/// POST /admin/api/items - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    validate_item_create(&payload)?;

    let item = menu_item::create(state.pool(), payload).await?;
    tracing::info!(id = item.id, name = %item.name, category_id = item.category_id, "Menu item created");
    Ok(Json(item))
}

/// PUT /admin/api/items/{id} - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    validate_item_update(&payload)?;

    let item = menu_item::update(state.pool(), id, payload)
        .await
        .map_err(map_not_found(id))?;
    tracing::info!(id, "Menu item updated");
    Ok(Json(item))
}

/// DELETE /admin/api/items/{id} - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let image = menu_item::delete(state.pool(), id)
        .await
        .map_err(map_not_found(id))?;
    tracing::info!(id, "Menu item deleted");

    if let Some(image) = image {
        state.media.remove_if_unreferenced(state.pool(), &image).await;
    }
    Ok(Json(true))
}

/// PATCH /admin/api/items - 批量编辑 price / sort_order / is_active
pub async fn bulk_edit(
    State(state): State<ServerState>,
    Json(payload): Json<Vec<MenuItemListEdit>>,
) -> AppResult<Json<Vec<MenuItem>>> {
    if payload.is_empty() {
        return Err(AppError::validation("No changes provided"));
    }
    for edit in &payload {
        if let Some(price) = edit.price {
            validate_price(price)?;
        }
    }
    let count = payload.len();
    let items = menu_item::bulk_edit(state.pool(), payload).await?;
    tracing::info!(count, "Menu items list-edited");
    Ok(Json(items))
}
