//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryCreate, CategoryListEdit, CategoryUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, sort_order, is_active";

/// All categories, ordered by `sort_order` then `name`
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category ORDER BY sort_order, name, id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Active categories in display order
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category WHERE is_active = 1 ORDER BY sort_order, name, id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn exists(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM category WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO category (name, sort_order, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let rows = sqlx::query(
        "UPDATE category SET
            name = COALESCE(?1, name),
            sort_order = COALESCE(?2, sort_order),
            is_active = COALESCE(?3, is_active),
            updated_at = ?4
         WHERE id = ?5",
    )
    .bind(data.name)
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Delete a category; its items go with it (ON DELETE CASCADE)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    Ok(())
}

/// Apply an admin list-edit in one transaction. Any unknown id aborts the batch.
pub async fn bulk_edit(pool: &SqlitePool, edits: Vec<CategoryListEdit>) -> RepoResult<Vec<Category>> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    for edit in &edits {
        let rows = sqlx::query(
            "UPDATE category SET
                sort_order = COALESCE(?1, sort_order),
                is_active = COALESCE(?2, is_active),
                updated_at = ?3
             WHERE id = ?4",
        )
        .bind(edit.sort_order)
        .bind(edit.is_active)
        .bind(now)
        .bind(edit.id)
        .execute(&mut *tx)
        .await?;

        if rows.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepoError::NotFound(format!("Category {} not found", edit.id)));
        }
    }

    tx.commit().await?;
    find_all(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn new_category(name: &str, sort_order: u32, is_active: bool) -> CategoryCreate {
        CategoryCreate {
            name: name.to_string(),
            sort_order: Some(sort_order),
            is_active: Some(is_active),
        }
    }

    #[tokio::test]
    async fn test_create_with_defaults() {
        let db = DbService::open_in_memory().await.unwrap();
        let created = create(
            &db.pool,
            CategoryCreate {
                name: "Soups".into(),
                sort_order: None,
                is_active: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(created.name, "Soups");
        assert_eq!(created.sort_order, 0);
        assert!(created.is_active);
    }

    #[tokio::test]
    async fn test_find_all_orders_by_sort_order_then_name() {
        let db = DbService::open_in_memory().await.unwrap();
        create(&db.pool, new_category("Drinks", 2, true)).await.unwrap();
        create(&db.pool, new_category("Soups", 1, true)).await.unwrap();
        create(&db.pool, new_category("Salads", 1, false)).await.unwrap();

        let names: Vec<String> = find_all(&db.pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Salads", "Soups", "Drinks"]);

        let active: Vec<String> = find_active(&db.pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(active, vec!["Soups", "Drinks"]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = DbService::open_in_memory().await.unwrap();
        let created = create(&db.pool, new_category("Soups", 0, true)).await.unwrap();

        let updated = update(
            &db.pool,
            created.id,
            CategoryUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.name, "Soups");

        delete(&db.pool, created.id).await.unwrap();
        assert!(find_by_id(&db.pool, created.id).await.unwrap().is_none());
        assert!(matches!(
            delete(&db.pool, created.id).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = DbService::open_in_memory().await.unwrap();
        let result = update(&db.pool, 42, CategoryUpdate::default()).await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_bulk_edit_is_all_or_nothing() {
        let db = DbService::open_in_memory().await.unwrap();
        let a = create(&db.pool, new_category("A", 0, true)).await.unwrap();
        let b = create(&db.pool, new_category("B", 1, true)).await.unwrap();

        let result = bulk_edit(
            &db.pool,
            vec![
                CategoryListEdit {
                    id: a.id,
                    sort_order: Some(5),
                    is_active: None,
                },
                CategoryListEdit {
                    id: 999,
                    sort_order: Some(1),
                    is_active: None,
                },
            ],
        )
        .await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));
        assert_eq!(find_by_id(&db.pool, a.id).await.unwrap().unwrap().sort_order, 0);

        let edited = bulk_edit(
            &db.pool,
            vec![
                CategoryListEdit {
                    id: a.id,
                    sort_order: Some(5),
                    is_active: None,
                },
                CategoryListEdit {
                    id: b.id,
                    sort_order: None,
                    is_active: Some(false),
                },
            ],
        )
        .await
        .unwrap();
        assert_eq!(edited[0].name, "B");
        assert!(!edited[0].is_active);
        assert_eq!(edited[1].sort_order, 5);
    }
}
