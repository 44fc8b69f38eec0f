//! Menu Aggregator
//!
//! 公共菜单读模型：站点设置 + 启用的分类 + 按分类分组的启用菜品

use std::collections::BTreeMap;

use serde::Serialize;
use shared::models::{Category, MenuItem, SiteSettings};
use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, category, menu_item, site_settings};

/// Display-ready menu
///
/// Every active category has an entry in `grouped`, possibly empty.
/// Inactive categories and their items never appear.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuView {
    pub settings: SiteSettings,
    pub categories: Vec<Category>,
    pub grouped: BTreeMap<i64, Vec<MenuItem>>,
}

/// One rendered category block
#[derive(Debug, Clone, Serialize)]
pub struct MenuSection<'a> {
    pub category: &'a Category,
    pub items: &'a [MenuItem],
}

impl MenuView {
    /// Categories paired with their items, in category display order
    pub fn sections(&self) -> Vec<MenuSection<'_>> {
        self.categories
            .iter()
            .map(|category| MenuSection {
                category,
                items: self
                    .grouped
                    .get(&category.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]),
            })
            .collect()
    }

    pub fn item_count(&self) -> usize {
        self.grouped.values().map(Vec::len).sum()
    }
}

/// Build the public menu from the current store contents.
///
/// Creates the settings row with defaults on first use.
pub async fn build_menu_view(pool: &SqlitePool) -> RepoResult<MenuView> {
    let settings = site_settings::get_or_create(pool).await?;
    let categories = category::find_active(pool).await?;
    let items = menu_item::find_displayable(pool).await?;

    Ok(assemble(settings, categories, items))
}

/// Group items under their categories.
///
/// Items whose category is not in `categories` are dropped.
pub fn assemble(
    settings: SiteSettings,
    categories: Vec<Category>,
    items: Vec<MenuItem>,
) -> MenuView {
    let mut grouped: BTreeMap<i64, Vec<MenuItem>> =
        categories.iter().map(|c| (c.id, Vec::new())).collect();

    for item in items {
        if let Some(bucket) = grouped.get_mut(&item.category_id) {
            bucket.push(item);
        }
    }

    MenuView {
        settings,
        categories,
        grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use rust_decimal::Decimal;
    use shared::models::{CategoryCreate, CategoryUpdate, MenuItemCreate, MenuItemUpdate};

    async fn add_category(pool: &SqlitePool, name: &str, order: u32, active: bool) -> Category {
        category::create(
            pool,
            CategoryCreate {
                name: name.to_string(),
                sort_order: Some(order),
                is_active: Some(active),
            },
        )
        .await
        .unwrap()
    }

    async fn add_item(
        pool: &SqlitePool,
        category_id: i64,
        name: &str,
        order: u32,
        active: bool,
    ) -> MenuItem {
        menu_item::create(
            pool,
            MenuItemCreate {
                category_id,
                name: name.to_string(),
                price: Decimal::new(500, 2),
                description: None,
                is_active: Some(active),
                sort_order: Some(order),
            },
        )
        .await
        .unwrap()
    }

    fn names(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_inactive_category_hides_its_items() {
        let db = DbService::open_in_memory().await.unwrap();
        let a = add_category(&db.pool, "A", 1, true).await;
        let b = add_category(&db.pool, "B", 0, false).await;
        add_item(&db.pool, a.id, "Burger", 2, true).await;
        add_item(&db.pool, a.id, "Fries", 1, true).await;
        add_item(&db.pool, b.id, "Soda", 0, true).await;

        let view = build_menu_view(&db.pool).await.unwrap();

        assert_eq!(view.categories, vec![a.clone()]);
        assert_eq!(view.grouped.len(), 1);
        assert_eq!(names(&view.grouped[&a.id]), vec!["Fries", "Burger"]);
        assert!(!view.grouped.contains_key(&b.id));
        assert_eq!(view.item_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_store_uses_default_settings() {
        let db = DbService::open_in_memory().await.unwrap();

        let view = build_menu_view(&db.pool).await.unwrap();
        let again = build_menu_view(&db.pool).await.unwrap();
        assert_eq!(again, view);

        assert!(view.categories.is_empty());
        assert!(view.grouped.is_empty());
        assert_eq!(view.settings.name, "Restaurant Name");
        assert_eq!(view.settings.whatsapp, "994500000000");

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM site_settings")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
        let stored = site_settings::get(&db.pool).await.unwrap().unwrap();
        assert_eq!(stored, view.settings);
    }

    #[tokio::test]
    async fn test_active_category_without_items_has_empty_group() {
        let db = DbService::open_in_memory().await.unwrap();
        let empty = add_category(&db.pool, "Desserts", 0, true).await;
        let only_hidden = add_category(&db.pool, "Specials", 1, true).await;
        add_item(&db.pool, only_hidden.id, "Off menu", 0, false).await;

        let view = build_menu_view(&db.pool).await.unwrap();

        assert_eq!(view.grouped.get(&empty.id), Some(&Vec::new()));
        assert_eq!(view.grouped.get(&only_hidden.id), Some(&Vec::new()));
        assert_eq!(view.sections().len(), 2);
    }

    #[tokio::test]
    async fn test_item_hidden_when_either_flag_is_off() {
        let db = DbService::open_in_memory().await.unwrap();
        let on = add_category(&db.pool, "On", 0, true).await;
        let off = add_category(&db.pool, "Off", 1, false).await;

        add_item(&db.pool, on.id, "both active", 0, true).await;
        add_item(&db.pool, on.id, "item inactive", 1, false).await;
        add_item(&db.pool, off.id, "category inactive", 2, true).await;
        add_item(&db.pool, off.id, "both inactive", 3, false).await;

        let view = build_menu_view(&db.pool).await.unwrap();
        let visible: Vec<&str> = view.grouped.values().flat_map(|v| names(v)).collect();
        assert_eq!(visible, vec!["both active"]);

        // Re-activating the category only brings back the active item
        category::update(
            &db.pool,
            off.id,
            CategoryUpdate {
                is_active: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let view = build_menu_view(&db.pool).await.unwrap();
        assert_eq!(names(&view.grouped[&off.id]), vec!["category inactive"]);
        assert_eq!(names(&view.grouped[&on.id]), vec!["both active"]);
    }

    #[tokio::test]
    async fn test_ordering_breaks_ties_by_name() {
        let db = DbService::open_in_memory().await.unwrap();
        let drinks = add_category(&db.pool, "Drinks", 1, true).await;
        let beer = add_category(&db.pool, "Beer", 1, true).await;
        let soups = add_category(&db.pool, "Soups", 0, true).await;
        add_item(&db.pool, drinks.id, "Tea", 0, true).await;
        add_item(&db.pool, drinks.id, "Coffee", 0, true).await;
        add_item(&db.pool, drinks.id, "Ayran", 1, true).await;

        let view = build_menu_view(&db.pool).await.unwrap();

        let order: Vec<i64> = view.categories.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![soups.id, beer.id, drinks.id]);
        assert_eq!(names(&view.grouped[&drinks.id]), vec!["Coffee", "Tea", "Ayran"]);

        let sections = view.sections();
        assert_eq!(sections[0].category.name, "Soups");
        assert!(sections[0].items.is_empty());
        assert_eq!(sections[2].items.len(), 3);
    }

    #[tokio::test]
    async fn test_deleted_category_takes_items_out_of_view() {
        let db = DbService::open_in_memory().await.unwrap();
        let a = add_category(&db.pool, "A", 0, true).await;
        let b = add_category(&db.pool, "B", 1, true).await;
        add_item(&db.pool, a.id, "Kebab", 0, true).await;
        let moved = add_item(&db.pool, b.id, "Dolma", 0, true).await;

        category::delete(&db.pool, a.id).await.unwrap();
        let view = build_menu_view(&db.pool).await.unwrap();

        assert_eq!(view.categories.len(), 1);
        assert_eq!(view.item_count(), 1);
        assert_eq!(view.grouped[&b.id][0].id, moved.id);
    }

    #[tokio::test]
    async fn test_view_is_deterministic() {
        let db = DbService::open_in_memory().await.unwrap();
        let a = add_category(&db.pool, "A", 0, true).await;
        let item = add_item(&db.pool, a.id, "Plov", 0, true).await;
        menu_item::update(
            &db.pool,
            item.id,
            MenuItemUpdate {
                description: Some("Saffron rice".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let first = build_menu_view(&db.pool).await.unwrap();
        let second = build_menu_view(&db.pool).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_assemble_drops_items_of_unknown_categories() {
        let cat = Category {
            id: 1,
            name: "A".into(),
            sort_order: 0,
            is_active: true,
        };
        let stray = MenuItem {
            id: 9,
            category_id: 2,
            name: "Stray".into(),
            price: Decimal::ONE,
            description: String::new(),
            image: None,
            is_active: true,
            sort_order: 0,
        };

        let view = assemble(SiteSettings::default(), vec![cat], vec![stray]);
        assert_eq!(view.grouped.len(), 1);
        assert!(view.grouped[&1].is_empty());
    }
}
