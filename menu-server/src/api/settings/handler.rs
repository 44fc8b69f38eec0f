//! Site Settings Handlers

use axum::{Json, extract::State};
use shared::models::{SiteSettings, SiteSettingsCreate, SiteSettingsUpdate};

use crate::core::ServerState;
use crate::db::repository::{RepoError, site_settings};
use crate::utils::validation::{validate_settings_create, validate_settings_update};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /admin/api/settings - 获取站点设置 (不存在时以默认值创建)
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<SiteSettings>> {
    let settings = site_settings::get_or_create(state.pool()).await?;
    Ok(Json(settings))
}

/// POST /admin/api/settings - 创建站点设置 (已存在则 409)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SiteSettingsCreate>,
) -> AppResult<Json<SiteSettings>> {
    validate_settings_create(&payload)?;

    let settings = site_settings::create(state.pool(), payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::SettingsAlreadyExist),
            other => other.into(),
        })?;

    tracing::info!("Site settings created");
    Ok(Json(settings))
}

/// PUT /admin/api/settings - 更新站点设置
pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<SiteSettingsUpdate>,
) -> AppResult<Json<SiteSettings>> {
    validate_settings_update(&payload)?;

    let settings = site_settings::update(state.pool(), payload).await?;
    tracing::info!(name = %settings.name, "Site settings updated");
    Ok(Json(settings))
}

/// DELETE /admin/api/settings - 不允许删除
pub async fn delete() -> AppResult<Json<bool>> {
    Err(AppError::new(ErrorCode::SettingsNotDeletable))
}
