//! Site Settings Repository (Singleton)
//!
//! The row identity is always [`SITE_SETTINGS_ID`]; the table's
//! `CHECK (id = 1)` makes a second row impossible.

use super::{RepoError, RepoResult};
use shared::models::{SITE_SETTINGS_ID, SiteSettings, SiteSettingsCreate, SiteSettingsUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, whatsapp, address, working_hours, map_url, updated_at";

pub async fn get(pool: &SqlitePool) -> RepoResult<Option<SiteSettings>> {
    let row = sqlx::query_as::<_, SiteSettings>(&format!(
        "SELECT {COLUMNS} FROM site_settings WHERE id = ?"
    ))
    .bind(SITE_SETTINGS_ID)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Get the singleton, inserting the defaults first if it is missing.
///
/// Reads first; the insert only runs while the row is absent. Concurrent
/// first calls race on the primary key, the loser's insert is ignored and
/// both read the same row.
pub async fn get_or_create(pool: &SqlitePool) -> RepoResult<SiteSettings> {
    if let Some(settings) = get(pool).await? {
        return Ok(settings);
    }

    let inserted = sqlx::query(
        "INSERT INTO site_settings (id, updated_at) VALUES (?1, ?2) ON CONFLICT(id) DO NOTHING",
    )
    .bind(SITE_SETTINGS_ID)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;

    if inserted.rows_affected() > 0 {
        tracing::info!("Site settings created with defaults");
    }

    get(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create site settings".into()))
}

/// Explicit admin create. Fails with `Duplicate` once the row exists.
pub async fn create(pool: &SqlitePool, data: SiteSettingsCreate) -> RepoResult<SiteSettings> {
    let defaults = SiteSettings::default();
    let now = shared::util::now_millis();
    let result = sqlx::query(
        "INSERT INTO site_settings (id, name, whatsapp, address, working_hours, map_url, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO NOTHING",
    )
    .bind(SITE_SETTINGS_ID)
    .bind(data.name.unwrap_or(defaults.name))
    .bind(data.whatsapp.unwrap_or(defaults.whatsapp))
    .bind(data.address.unwrap_or(defaults.address))
    .bind(data.working_hours.unwrap_or(defaults.working_hours))
    .bind(data.map_url.unwrap_or(defaults.map_url))
    .bind(now)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::Duplicate("Site settings already exist".into()));
    }

    get(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create site settings".into()))
}

/// Update fields of the singleton. Writes always target the fixed identity.
pub async fn update(pool: &SqlitePool, data: SiteSettingsUpdate) -> RepoResult<SiteSettings> {
    get_or_create(pool).await?;

    sqlx::query(
        "UPDATE site_settings SET
            name = COALESCE(?1, name),
            whatsapp = COALESCE(?2, whatsapp),
            address = COALESCE(?3, address),
            working_hours = COALESCE(?4, working_hours),
            map_url = COALESCE(?5, map_url),
            updated_at = ?6
         WHERE id = ?7",
    )
    .bind(data.name)
    .bind(data.whatsapp)
    .bind(data.address)
    .bind(data.working_hours)
    .bind(data.map_url)
    .bind(shared::util::now_millis())
    .bind(SITE_SETTINGS_ID)
    .execute(pool)
    .await?;

    get(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to update site settings".into()))
}
