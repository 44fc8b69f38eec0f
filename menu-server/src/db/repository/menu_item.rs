//! Menu Item Repository
//!
//! Prices are stored as integer cents (`price_cents`) and surfaced as
//! two-digit [`Decimal`] values.

use super::{RepoError, RepoResult};
use rust_decimal::Decimal;
use shared::models::{MenuItem, MenuItemCreate, MenuItemFilter, MenuItemListEdit, MenuItemUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str =
    "i.id, i.category_id, i.name, i.price_cents, i.description, i.image, i.is_active, i.sort_order";

/// Largest accepted price in cents (9999.99)
pub const MAX_PRICE_CENTS: i64 = 999_999;

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: i64,
    category_id: i64,
    name: String,
    price_cents: i64,
    description: String,
    image: Option<String>,
    is_active: bool,
    sort_order: u32,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            price: cents_to_price(row.price_cents),
            description: row.description,
            image: row.image,
            is_active: row.is_active,
            sort_order: row.sort_order,
        }
    }
}

pub fn cents_to_price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Convert a price to cents, rejecting more than two fractional digits,
/// negative values and anything above 9999.99.
pub fn price_to_cents(price: Decimal) -> RepoResult<i64> {
    let normalized = price.normalize();
    if normalized.scale() > 2 {
        return Err(RepoError::Validation(format!(
            "Price {price} has more than 2 decimal places"
        )));
    }
    if normalized.is_sign_negative() && !normalized.is_zero() {
        return Err(RepoError::Validation(format!("Price {price} is negative")));
    }

    let mut scaled = normalized;
    scaled.rescale(2);
    let cents = i64::try_from(scaled.mantissa())
        .map_err(|_| RepoError::Validation(format!("Price {price} is out of range")))?;
    if cents > MAX_PRICE_CENTS {
        return Err(RepoError::Validation(format!("Price {price} is out of range")));
    }
    Ok(cents)
}

async fn ensure_category(pool: &SqlitePool, category_id: i64) -> RepoResult<()> {
    if !super::category::exists(pool, category_id).await? {
        return Err(RepoError::Validation(format!(
            "Category {category_id} does not exist"
        )));
    }
    Ok(())
}

/// Admin listing: ordered by `sort_order` then `name`, optionally filtered
pub async fn find_all(pool: &SqlitePool, filter: &MenuItemFilter) -> RepoResult<Vec<MenuItem>> {
    let pattern = filter
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{q}%"));

    let sql = format!(
        "SELECT {COLUMNS} FROM menu_item i
         WHERE (?1 IS NULL OR i.category_id = ?1)
           AND (?2 IS NULL OR i.is_active = ?2)
           AND (?3 IS NULL OR i.name LIKE ?3)
         ORDER BY i.sort_order, i.name, i.id"
    );
    let rows = sqlx::query_as::<_, MenuItemRow>(&sql)
        .bind(filter.category_id)
        .bind(filter.is_active)
        .bind(pattern)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(MenuItem::from).collect())
}

/// Items visible on the public menu: the item and its category are both active.
///
/// Ordered by item `sort_order` then `name`; one joined query, no per-item lookups.
pub async fn find_displayable(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM menu_item i
         JOIN category c ON c.id = i.category_id
         WHERE i.is_active = 1 AND c.is_active = 1
         ORDER BY i.sort_order, i.name, i.id"
    );
    let rows = sqlx::query_as::<_, MenuItemRow>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(MenuItem::from).collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let sql = format!("SELECT {COLUMNS} FROM menu_item i WHERE i.id = ?");
    let row = sqlx::query_as::<_, MenuItemRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(MenuItem::from))
}

pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItem> {
    let price_cents = price_to_cents(data.price)?;
    ensure_category(pool, data.category_id).await?;

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO menu_item (category_id, name, price_cents, description, is_active, sort_order, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(data.category_id)
    .bind(&data.name)
    .bind(price_cents)
    .bind(data.description.unwrap_or_default())
    .bind(data.is_active.unwrap_or(true))
    .bind(data.sort_order.unwrap_or(0))
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
    let price_cents = data.price.map(price_to_cents).transpose()?;
    if let Some(category_id) = data.category_id {
        ensure_category(pool, category_id).await?;
    }

    let rows = sqlx::query(
        "UPDATE menu_item SET
            category_id = COALESCE(?1, category_id),
            name = COALESCE(?2, name),
            price_cents = COALESCE(?3, price_cents),
            description = COALESCE(?4, description),
            is_active = COALESCE(?5, is_active),
            sort_order = COALESCE(?6, sort_order),
            updated_at = ?7
         WHERE id = ?8",
    )
    .bind(data.category_id)
    .bind(data.name)
    .bind(price_cents)
    .bind(data.description)
    .bind(data.is_active)
    .bind(data.sort_order)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

/// Point the item at a stored image (or clear it). Returns the previous path.
pub async fn set_image(
    pool: &SqlitePool,
    id: i64,
    image: Option<&str>,
) -> RepoResult<Option<String>> {
    let previous = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))?
        .image;

    sqlx::query("UPDATE menu_item SET image = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(image)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(previous)
}

/// Number of items still referencing an image path
pub async fn count_image_refs(pool: &SqlitePool, image: &str) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_item WHERE image = ?")
        .bind(image)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<Option<String>> {
    let image: Option<Option<String>> =
        sqlx::query_scalar("DELETE FROM menu_item WHERE id = ? RETURNING image")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    image.ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

/// Apply an admin list-edit (price / sort_order / is_active) in one transaction
pub async fn bulk_edit(pool: &SqlitePool, edits: Vec<MenuItemListEdit>) -> RepoResult<Vec<MenuItem>> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    for edit in &edits {
        let price_cents = match edit.price.map(price_to_cents).transpose() {
            Ok(cents) => cents,
            Err(e) => {
                tx.rollback().await?;
                return Err(e);
            }
        };

        let rows = sqlx::query(
            "UPDATE menu_item SET
                price_cents = COALESCE(?1, price_cents),
                sort_order = COALESCE(?2, sort_order),
                is_active = COALESCE(?3, is_active),
                updated_at = ?4
             WHERE id = ?5",
        )
        .bind(price_cents)
        .bind(edit.sort_order)
        .bind(edit.is_active)
        .bind(now)
        .bind(edit.id)
        .execute(&mut *tx)
        .await?;

        if rows.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepoError::NotFound(format!("Menu item {} not found", edit.id)));
        }
    }

    tx.commit().await?;
    find_all(pool, &MenuItemFilter::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::category;
    use shared::models::CategoryCreate;

    async fn setup() -> (DbService, i64) {
        let db = DbService::open_in_memory().await.unwrap();
        let cat = category::create(
            &db.pool,
            CategoryCreate {
                name: "Mains".into(),
                sort_order: None,
                is_active: None,
            },
        )
        .await
        .unwrap();
        (db, cat.id)
    }

    fn new_item(category_id: i64, name: &str, price: Decimal, sort_order: u32) -> MenuItemCreate {
        MenuItemCreate {
            category_id,
            name: name.to_string(),
            price,
            description: None,
            is_active: None,
            sort_order: Some(sort_order),
        }
    }

    #[test]
    fn test_price_to_cents() {
        assert_eq!(price_to_cents(Decimal::new(1250, 2)).unwrap(), 1250);
        assert_eq!(price_to_cents(Decimal::new(125, 1)).unwrap(), 1250);
        assert_eq!(price_to_cents(Decimal::new(12, 0)).unwrap(), 1200);
        assert_eq!(price_to_cents(Decimal::new(12500, 3)).unwrap(), 1250);
        assert_eq!(price_to_cents(Decimal::ZERO).unwrap(), 0);
        assert_eq!(price_to_cents(Decimal::new(999_999, 2)).unwrap(), MAX_PRICE_CENTS);

        assert!(price_to_cents(Decimal::new(12345, 3)).is_err());
        assert!(price_to_cents(Decimal::new(-1, 2)).is_err());
        assert!(price_to_cents(Decimal::new(1_000_000, 2)).is_err());
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let (db, cat_id) = setup().await;
        let item = create(&db.pool, new_item(cat_id, "Burger", Decimal::new(1250, 2), 0))
            .await
            .unwrap();

        assert_eq!(item.price, Decimal::new(1250, 2));
        assert_eq!(item.price.to_string(), "12.50");
        assert_eq!(item.description, "");
        assert!(item.is_active);
        assert!(item.image.is_none());
    }

    #[tokio::test]
    async fn test_create_requires_existing_category() {
        let (db, _) = setup().await;
        let result = create(&db.pool, new_item(999, "Ghost", Decimal::ONE, 0)).await;
        assert!(matches!(result, Err(RepoError::Validation(_))));
    }

    #[tokio::test]
    async fn test_find_all_filters() {
        let (db, cat_id) = setup().await;
        let other = category::create(
            &db.pool,
            CategoryCreate {
                name: "Drinks".into(),
                sort_order: Some(1),
                is_active: None,
            },
        )
        .await
        .unwrap();

        create(&db.pool, new_item(cat_id, "Burger", Decimal::TEN, 2)).await.unwrap();
        create(&db.pool, new_item(cat_id, "Fries", Decimal::ONE, 1)).await.unwrap();
        let soda = create(&db.pool, new_item(other.id, "Soda", Decimal::ONE, 0))
            .await
            .unwrap();
        update(
            &db.pool,
            soda.id,
            MenuItemUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let all = find_all(&db.pool, &MenuItemFilter::default()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Soda", "Fries", "Burger"]);

        let in_mains = find_all(
            &db.pool,
            &MenuItemFilter {
                category_id: Some(cat_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(in_mains.len(), 2);

        let inactive = find_all(
            &db.pool,
            &MenuItemFilter {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].name, "Soda");

        let searched = find_all(
            &db.pool,
            &MenuItemFilter {
                q: Some("bur".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].name, "Burger");
    }

    #[tokio::test]
    async fn test_deleting_category_removes_items() {
        let (db, cat_id) = setup().await;
        let item = create(&db.pool, new_item(cat_id, "Burger", Decimal::TEN, 0))
            .await
            .unwrap();

        category::delete(&db.pool, cat_id).await.unwrap();

        assert!(find_by_id(&db.pool, item.id).await.unwrap().is_none());
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_item")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_set_image_and_delete_return_previous_path() {
        let (db, cat_id) = setup().await;
        let item = create(&db.pool, new_item(cat_id, "Burger", Decimal::TEN, 0))
            .await
            .unwrap();

        let previous = set_image(&db.pool, item.id, Some("menu/a.jpg")).await.unwrap();
        assert!(previous.is_none());
        assert_eq!(count_image_refs(&db.pool, "menu/a.jpg").await.unwrap(), 1);

        let previous = set_image(&db.pool, item.id, Some("menu/b.jpg")).await.unwrap();
        assert_eq!(previous.as_deref(), Some("menu/a.jpg"));

        let removed = delete(&db.pool, item.id).await.unwrap();
        assert_eq!(removed.as_deref(), Some("menu/b.jpg"));
        assert!(matches!(delete(&db.pool, item.id).await, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_bulk_edit_rejects_bad_price_without_partial_writes() {
        let (db, cat_id) = setup().await;
        let a = create(&db.pool, new_item(cat_id, "A", Decimal::ONE, 0)).await.unwrap();
        let b = create(&db.pool, new_item(cat_id, "B", Decimal::ONE, 1)).await.unwrap();

        let result = bulk_edit(
            &db.pool,
            vec![
                MenuItemListEdit {
                    id: a.id,
                    price: Some(Decimal::new(500, 2)),
                    sort_order: None,
                    is_active: None,
                },
                MenuItemListEdit {
                    id: b.id,
                    price: Some(Decimal::new(-5, 0)),
                    sort_order: None,
                    is_active: None,
                },
            ],
        )
        .await;
        assert!(matches!(result, Err(RepoError::Validation(_))));
        assert_eq!(
            find_by_id(&db.pool, a.id).await.unwrap().unwrap().price,
            Decimal::ONE
        );

        let edited = bulk_edit(
            &db.pool,
            vec![MenuItemListEdit {
                id: b.id,
                price: Some(Decimal::new(750, 2)),
                sort_order: Some(0),
                is_active: Some(false),
            }],
        )
        .await
        .unwrap();
        let b = edited.iter().find(|i| i.id == b.id).unwrap();
        assert_eq!(b.price.to_string(), "7.50");
        assert!(!b.is_active);
    }
}
