//! # Menu Item Repository
//!
//! The catalog store: the single authoritative source of item names and
//! prices.
//!
//! ## Item Lifecycle
//! ```text
//! create() ──► Active ◄──── toggle_availability() ────► Unavailable
//!                │                                          │
//!                └──────────── soft_delete() ───────────────┤
//!                                                           ▼
//!                                                        Deleted
//!                                      (row kept, hidden from list())
//! ```
//!
//! Deleted rows are never removed so that historical lookups by id still
//! resolve to a name.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tabletop_core::{ItemStatus, MenuItem, MenuItemPatch, NewMenuItem};

const MENU_ITEM_COLUMNS: &str = "id, name, price, category, status, created_at, updated_at";

/// Repository for menu item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.menu_items();
///
/// let mains = repo.list(Some("Main Course")).await?;
/// let item = repo.toggle_availability(&mains[0].id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MenuItemRepository {
    pool: SqlitePool,
}

impl MenuItemRepository {
    /// Creates a new MenuItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuItemRepository { pool }
    }

    /// Lists every non-deleted item in insertion order, optionally filtered
    /// to one category (exact match).
    pub async fn list(&self, category: Option<&str>) -> DbResult<Vec<MenuItem>> {
        debug!(category = ?category, "Listing menu items");

        let items = match category {
            Some(category) => {
                sqlx::query_as::<_, MenuItem>(&format!(
                    "SELECT {} FROM menu_items \
                     WHERE status != 'deleted' AND category = ?1 \
                     ORDER BY rowid",
                    MENU_ITEM_COLUMNS
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MenuItem>(&format!(
                    "SELECT {} FROM menu_items WHERE status != 'deleted' ORDER BY rowid",
                    MENU_ITEM_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(items)
    }

    /// Distinct categories of non-deleted items, sorted.
    pub async fn categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT category FROM menu_items \
             WHERE status != 'deleted' ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets an item by ID, soft-deleted items included.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {} FROM menu_items WHERE id = ?1",
            MENU_ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Inserts a new item. Fields must already be validated.
    pub async fn create(&self, new_item: &NewMenuItem) -> DbResult<MenuItem> {
        let now = Utc::now();
        let item = MenuItem {
            id: Uuid::new_v4().to_string(),
            name: new_item.name.clone(),
            price: new_item.price,
            category: new_item.category.clone(),
            status: ItemStatus::from_availability(new_item.is_available),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %item.id, name = %item.name, "Inserting menu item");

        sqlx::query(
            "INSERT INTO menu_items (id, name, price, category, status, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.category)
        .bind(item.status)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Applies a partial update to a live item.
    ///
    /// ## Errors
    /// `NotFound` if the id is absent or soft-deleted.
    pub async fn update(&self, id: &str, patch: &MenuItemPatch) -> DbResult<MenuItem> {
        if patch.is_empty() {
            return self.get_live(id).await;
        }

        debug!(id = %id, "Updating menu item");

        let status = patch.is_available.map(ItemStatus::from_availability);

        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "UPDATE menu_items SET \
                 name = COALESCE(?2, name), \
                 price = COALESCE(?3, price), \
                 category = COALESCE(?4, category), \
                 status = COALESCE(?5, status), \
                 updated_at = ?6 \
             WHERE id = ?1 AND status != 'deleted' \
             RETURNING {}",
            MENU_ITEM_COLUMNS
        ))
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.price)
        .bind(patch.category.as_deref())
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        item.ok_or_else(|| DbError::not_found("MenuItem", id))
    }

    /// Flips Active ↔ Unavailable.
    ///
    /// ## Errors
    /// `NotFound` if the id is absent or soft-deleted.
    pub async fn toggle_availability(&self, id: &str) -> DbResult<MenuItem> {
        debug!(id = %id, "Toggling menu item availability");

        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "UPDATE menu_items SET \
                 status = CASE status WHEN 'active' THEN 'unavailable' ELSE 'active' END, \
                 updated_at = ?2 \
             WHERE id = ?1 AND status != 'deleted' \
             RETURNING {}",
            MENU_ITEM_COLUMNS
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        item.ok_or_else(|| DbError::not_found("MenuItem", id))
    }

    /// Marks an item deleted. Idempotent; the row is kept.
    ///
    /// ## Errors
    /// `NotFound` only if the id never existed.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting menu item");

        let result = sqlx::query(
            "UPDATE menu_items SET \
                 updated_at = CASE status WHEN 'deleted' THEN updated_at ELSE ?2 END, \
                 status = 'deleted' \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        Ok(())
    }

    /// Number of non-deleted items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM menu_items WHERE status != 'deleted'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn get_live(&self, id: &str) -> DbResult<MenuItem> {
        match self.get_by_id(id).await? {
            Some(item) if !item.is_deleted() => Ok(item),
            _ => Err(DbError::not_found("MenuItem", id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use tabletop_core::Money;

    use super::*;

    async fn setup() -> MenuItemRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.menu_items()
    }

    fn new_item(name: &str, price: i64, category: &str) -> NewMenuItem {
        NewMenuItem {
            name: name.to_string(),
            price: Money::from_minor(price),
            category: category.to_string(),
            is_available: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = setup().await;
        let created = repo
            .create(&new_item("Butter Chicken", 350, "Main Course"))
            .await
            .unwrap();

        assert_eq!(created.status, ItemStatus::Active);

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Butter Chicken");
        assert_eq!(fetched.price.minor(), 350);
        assert_eq!(fetched.category, "Main Course");
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_unavailable() {
        let repo = setup().await;
        let mut item = new_item("Lassi", 60, "Beverages");
        item.is_available = false;
        let created = repo.create(&item).await.unwrap();
        assert_eq!(created.status, ItemStatus::Unavailable);
        assert_eq!(repo.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_category_and_deleted() {
        let repo = setup().await;
        let chicken = repo
            .create(&new_item("Butter Chicken", 350, "Main Course"))
            .await
            .unwrap();
        repo.create(&new_item("Dal Makhani", 220, "Main Course"))
            .await
            .unwrap();
        repo.create(&new_item("Naan", 40, "Bread")).await.unwrap();

        let all = repo.list(None).await.unwrap();
        let names: Vec<_> = all.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Butter Chicken", "Dal Makhani", "Naan"]);

        assert_eq!(repo.list(Some("Main Course")).await.unwrap().len(), 2);
        assert!(repo.list(Some("Dessert")).await.unwrap().is_empty());

        repo.soft_delete(&chicken.id).await.unwrap();
        let mains = repo.list(Some("Main Course")).await.unwrap();
        assert_eq!(mains.len(), 1);
        assert_eq!(mains[0].name, "Dal Makhani");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_categories() {
        let repo = setup().await;
        repo.create(&new_item("Naan", 40, "Bread")).await.unwrap();
        repo.create(&new_item("Gulab Jamun", 80, "Dessert")).await.unwrap();
        repo.create(&new_item("Roti", 30, "Bread")).await.unwrap();
        let cold = repo
            .create(&new_item("Cold Drink", 45, "Beverages"))
            .await
            .unwrap();
        repo.soft_delete(&cold.id).await.unwrap();

        assert_eq!(repo.categories().await.unwrap(), vec!["Bread", "Dessert"]);
    }

    #[tokio::test]
    async fn test_update_partial() {
        let repo = setup().await;
        let item = repo
            .create(&new_item("Paneer Tikka", 280, "Starters"))
            .await
            .unwrap();

        let patch = MenuItemPatch {
            price: Some(Money::from_minor(300)),
            ..Default::default()
        };
        let updated = repo.update(&item.id, &patch).await.unwrap();
        assert_eq!(updated.price.minor(), 300);
        assert_eq!(updated.name, "Paneer Tikka");
        assert_eq!(updated.status, ItemStatus::Active);

        let patch = MenuItemPatch {
            is_available: Some(false),
            ..Default::default()
        };
        let updated = repo.update(&item.id, &patch).await.unwrap();
        assert_eq!(updated.status, ItemStatus::Unavailable);

        let unchanged = repo
            .update(&item.id, &MenuItemPatch::default())
            .await
            .unwrap();
        assert_eq!(unchanged.price.minor(), 300);
    }

    #[tokio::test]
    async fn test_update_missing_or_deleted_is_not_found() {
        let repo = setup().await;
        let patch = MenuItemPatch {
            name: Some("X".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            repo.update("missing", &patch).await,
            Err(DbError::NotFound { .. })
        ));

        let item = repo.create(&new_item("Naan", 40, "Bread")).await.unwrap();
        repo.soft_delete(&item.id).await.unwrap();
        assert!(matches!(
            repo.update(&item.id, &patch).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            repo.update(&item.id, &MenuItemPatch::default()).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_toggle_availability() {
        let repo = setup().await;
        let item = repo
            .create(&new_item("Jeera Rice", 150, "Rice"))
            .await
            .unwrap();

        let toggled = repo.toggle_availability(&item.id).await.unwrap();
        assert_eq!(toggled.status, ItemStatus::Unavailable);

        let toggled = repo.toggle_availability(&item.id).await.unwrap();
        assert_eq!(toggled.status, ItemStatus::Active);

        repo.soft_delete(&item.id).await.unwrap();
        assert!(matches!(
            repo.toggle_availability(&item.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            repo.toggle_availability("missing").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_soft_delete_idempotent() {
        let repo = setup().await;
        let item = repo
            .create(&new_item("Gulab Jamun", 80, "Dessert"))
            .await
            .unwrap();

        repo.soft_delete(&item.id).await.unwrap();
        let first = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(first.status, ItemStatus::Deleted);

        repo.soft_delete(&item.id).await.unwrap();
        let second = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(second.status, ItemStatus::Deleted);
        assert_eq!(first.updated_at, second.updated_at);

        assert!(matches!(
            repo.soft_delete("missing").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
