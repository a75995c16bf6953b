//! Menu catalog service.
//!
//! Validates input before it reaches the catalog store and turns missing
//! rows into `NOT_FOUND`.

use tracing::info;

use crate::error::ApiError;
use tabletop_core::validation::normalize_category_filter;
use tabletop_core::{MenuItem, MenuItemPatch, NewMenuItem};
use tabletop_db::Database;

/// Menu management for staff screens.
#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    /// Non-deleted items, optionally limited to one category.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<MenuItem>, ApiError> {
        let category = normalize_category_filter(category)?;
        Ok(self.db.menu_items().list(category.as_deref()).await?)
    }

    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        Ok(self.db.menu_items().categories().await?)
    }

    /// Any item by id, soft-deleted included.
    pub async fn get(&self, id: &str) -> Result<MenuItem, ApiError> {
        self.db
            .menu_items()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("MenuItem", id))
    }

    pub async fn create(&self, new_item: NewMenuItem) -> Result<MenuItem, ApiError> {
        let new_item = new_item.validated()?;
        let item = self.db.menu_items().create(&new_item).await?;

        info!(id = %item.id, name = %item.name, price = %item.price, "Menu item created");
        Ok(item)
    }

    pub async fn update(&self, id: &str, patch: MenuItemPatch) -> Result<MenuItem, ApiError> {
        let patch = patch.validated()?;
        let item = self.db.menu_items().update(id, &patch).await?;

        info!(id = %item.id, "Menu item updated");
        Ok(item)
    }

    pub async fn toggle_availability(&self, id: &str) -> Result<MenuItem, ApiError> {
        let item = self.db.menu_items().toggle_availability(id).await?;

        info!(id = %item.id, available = item.is_available(), "Menu item availability toggled");
        Ok(item)
    }

    pub async fn soft_delete(&self, id: &str) -> Result<(), ApiError> {
        self.db.menu_items().soft_delete(id).await?;

        info!(id = %id, "Menu item soft-deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tabletop_core::Money;
    use tabletop_db::DbConfig;

    async fn setup() -> CatalogService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CatalogService::new(db)
    }

    fn naan() -> NewMenuItem {
        NewMenuItem {
            name: " Naan ".to_string(),
            price: Money::from_minor(40),
            category: "Bread".to_string(),
            is_available: true,
        }
    }

    #[tokio::test]
    async fn test_create_trims_and_validates() {
        let service = setup().await;
        let item = service.create(naan()).await.unwrap();
        assert_eq!(item.name, "Naan");

        let mut bad = naan();
        bad.category = "  ".to_string();
        let err = service.create(bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut bad = naan();
        bad.price = Money::from_minor(-5);
        let err = service.create(bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_get_includes_deleted() {
        let service = setup().await;
        let item = service.create(naan()).await.unwrap();
        service.soft_delete(&item.id).await.unwrap();

        let fetched = service.get(&item.id).await.unwrap();
        assert!(fetched.is_deleted());
        assert!(service.list(None).await.unwrap().is_empty());

        let err = service.get("missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_update_validates_fields() {
        let service = setup().await;
        let item = service.create(naan()).await.unwrap();

        let patch = MenuItemPatch {
            name: Some("".to_string()),
            ..Default::default()
        };
        let err = service.update(&item.id, patch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let patch = MenuItemPatch {
            name: Some("Garlic Naan".to_string()),
            price: Some(Money::from_minor(60)),
            ..Default::default()
        };
        let updated = service.update(&item.id, patch).await.unwrap();
        assert_eq!(updated.name, "Garlic Naan");
        assert_eq!(updated.price.minor(), 60);
    }

    #[tokio::test]
    async fn test_blank_category_filter_lists_all() {
        let service = setup().await;
        service.create(naan()).await.unwrap();
        assert_eq!(service.list(Some("  ")).await.unwrap().len(), 1);
        assert!(service.list(Some("Dessert")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_and_delete_missing() {
        let service = setup().await;
        let err = service.toggle_availability("missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        let err = service.soft_delete("missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
