//! Image Upload Handler
//!
//! Accepts PNG, JPEG and WebP up to 5MB in the multipart field `file`.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde::Serialize;
use shared::models::MenuItem;

use crate::core::{MEDIA_URL, ServerState};
use crate::db::repository::menu_item;
use crate::media::validate_image;
use crate::utils::{AppError, AppResult};

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub item: MenuItem,
    pub url: String,
    pub size: usize,
}

fn item_not_found(id: i64) -> AppError {
    AppError::with_message(
        shared::error::ErrorCode::MenuItemNotFound,
        format!("Menu item {id} not found"),
    )
}

/// POST /admin/api/items/{id}/image - 上传菜品图片
pub async fn upload(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    // 先确认菜品存在，避免写入无主文件
    if menu_item::find_by_id(state.pool(), id).await?.is_none() {
        return Err(item_not_found(id));
    }

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| AppError::validation("No filename provided in file field"))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
            file = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, data) = file.ok_or_else(|| {
        AppError::validation("No 'file' field found. Field name must be 'file'")
    })?;

    let ext = validate_image(&data, &filename)?;
    let (relative, previous) = {
        // 保存与登记引用之间不允许清理同一文件
        let _guard = state.media.lock().await;
        let relative = state.media.save(&data, ext).await?;
        let previous = menu_item::set_image(state.pool(), id, Some(&relative))
            .await
            .map_err(|e| match e {
                crate::db::repository::RepoError::NotFound(_) => item_not_found(id),
                other => other.into(),
            })?;
        (relative, previous)
    };
    if let Some(previous) = previous
        && previous != relative
    {
        state.media.remove_if_unreferenced(state.pool(), &previous).await;
    }

    let item = menu_item::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| item_not_found(id))?;
    let url = item.image_url(MEDIA_URL).unwrap_or_default();

    tracing::info!(id, path = %relative, original_name = %filename, "Menu item image uploaded");

    Ok(Json(UploadResponse {
        item,
        url,
        size: data.len(),
    }))
}

/// DELETE /admin/api/items/{id}/image - 移除菜品图片
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let previous = menu_item::set_image(state.pool(), id, None)
        .await
        .map_err(|e| match e {
            crate::db::repository::RepoError::NotFound(_) => item_not_found(id),
            other => other.into(),
        })?;

    if let Some(previous) = previous {
        state.media.remove_if_unreferenced(state.pool(), &previous).await;
    }

    let item = menu_item::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| item_not_found(id))?;
    tracing::info!(id, "Menu item image removed");
    Ok(Json(item))
}
