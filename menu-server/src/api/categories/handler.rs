//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Category, CategoryCreate, CategoryListEdit, CategoryUpdate, MenuItemFilter};

use crate::core::ServerState;
use crate::db::repository::{RepoError, category, menu_item};
use crate::utils::validation::{validate_category_create, validate_category_update};
use crate::utils::{AppError, AppResult, ErrorCode};

fn category_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
}

fn map_not_found(id: i64) -> impl FnOnce(RepoError) -> AppError {
    move |e| match e {
        RepoError::NotFound(_) => category_not_found(id),
        other => other.into(),
    }
}

/// GET /admin/api/categories - 获取所有分类 (按 sort_order, name 排序)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(state.pool()).await?;
    Ok(Json(categories))
}

/// GET /admin/api/categories/{id} - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = category::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| category_not_found(id))?;
    Ok(Json(category))
}

/// POST /admin/api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_category_create(&payload)?;

    let category = category::create(state.pool(), payload).await?;
    tracing::info!(id = category.id, name = %category.name, "Category created");
    Ok(Json(category))
}

/// PUT /admin/api/categories/{id} - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    validate_category_update(&payload)?;

    let category = category::update(state.pool(), id, payload)
        .await
        .map_err(map_not_found(id))?;
    tracing::info!(id, "Category updated");
    Ok(Json(category))
}

/// DELETE /admin/api/categories/{id} - 删除分类 (菜品级联删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let pool = state.pool();

    // 级联删除前记录图片，删除后清理不再引用的文件
    let images: Vec<String> = menu_item::find_all(
        pool,
        &MenuItemFilter {
            category_id: Some(id),
            ..Default::default()
        },
    )
    .await?
    .into_iter()
    .filter_map(|item| item.image)
    .collect();

    category::delete(pool, id).await.map_err(map_not_found(id))?;
    tracing::info!(id, removed_images = images.len(), "Category deleted");

    for image in &images {
        state.media.remove_if_unreferenced(pool, image).await;
    }

    Ok(Json(true))
}

/// PATCH /admin/api/categories - 批量编辑 sort_order / is_active
pub async fn bulk_edit(
    State(state): State<ServerState>,
    Json(payload): Json<Vec<CategoryListEdit>>,
) -> AppResult<Json<Vec<Category>>> {
    if payload.is_empty() {
        return Err(AppError::validation("No changes provided"));
    }
    let count = payload.len();
    let categories = category::bulk_edit(state.pool(), payload).await?;
    tracing::info!(count, "Categories list-edited");
    Ok(Json(categories))
}
