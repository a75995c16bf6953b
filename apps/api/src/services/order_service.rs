//! # Order Finalization
//!
//! Turns a client cart into a persisted, numbered bill.
//!
//! ## Flow
//! ```text
//! FinalizeOrderRequest { items: [{ id, quantity }], discount, paymentMode }
//!      │
//!      ├── 1. shape checks (empty cart, line count, quantities, discount)
//!      ├── 2. catalog lookup per line ── missing / unavailable / deleted
//!      │                                   └──► ITEM_UNAVAILABLE, nothing written
//!      ├── 3. OrderLine snapshots (catalog name + price, never the client's)
//!      ├── 4. price_order (tax at configured rate, discount, grand total)
//!      └── 5. create_with_next_bill_number
//!                └── UniqueViolation ──► resync counter, retry (max 3)
//! ```

use tracing::{debug, info, warn};

use crate::error::ApiError;
use tabletop_core::pricing::price_order;
use tabletop_core::validation::{
    validate_cart_size, validate_discount, validate_list_limit, validate_quantity,
};
use tabletop_core::{BillNumber, CoreError, FinalizeOrderRequest, Order, OrderLine, TaxRate};
use tabletop_db::Database;

/// Attempts at persisting one bill before a conflict is surfaced.
const MAX_PERSIST_ATTEMPTS: u32 = 3;

/// Page size for the order history when the client gives none.
pub const DEFAULT_RECENT_LIMIT: i64 = 50;

/// Finalizes carts into bills and serves bill lookups.
#[derive(Debug, Clone)]
pub struct OrderFinalizer {
    db: Database,
    tax_rate: TaxRate,
}

impl OrderFinalizer {
    pub fn new(db: Database, tax_rate: TaxRate) -> Self {
        OrderFinalizer { db, tax_rate }
    }

    /// Validates, prices and persists a cart.
    ///
    /// Either the whole bill is written under a fresh bill number or
    /// nothing is.
    pub async fn finalize(&self, request: FinalizeOrderRequest) -> Result<Order, ApiError> {
        if request.items.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        validate_cart_size(request.items.len())?;
        for line in &request.items {
            validate_quantity(line.quantity)?;
        }
        validate_discount(request.discount)?;

        let menu = self.db.menu_items();
        let mut lines = Vec::with_capacity(request.items.len());
        for cart_line in &request.items {
            let item = match menu.get_by_id(&cart_line.id).await? {
                Some(item) if item.is_available() => item,
                Some(item) => {
                    return Err(CoreError::ItemUnavailable {
                        item_id: item.id,
                        item: item.name,
                    }
                    .into())
                }
                None => {
                    return Err(CoreError::ItemUnavailable {
                        item_id: cart_line.id.clone(),
                        item: cart_line.id.clone(),
                    }
                    .into())
                }
            };
            lines.push(OrderLine::from_menu_item(&item, cart_line.quantity)?);
        }

        let draft = price_order(lines, request.discount, request.payment_mode, self.tax_rate)?;
        debug!(
            lines = draft.lines.len(),
            subtotal = %draft.subtotal,
            tax = %draft.tax,
            grand_total = %draft.grand_total,
            "Order priced"
        );

        let orders = self.db.orders();
        let mut attempt = 1;
        loop {
            match orders.create_with_next_bill_number(draft.clone()).await {
                Ok(order) => {
                    info!(
                        bill_number = %order.bill_number,
                        grand_total = %order.grand_total,
                        payment_mode = %order.payment_mode,
                        "Order finalized"
                    );
                    return Ok(order);
                }
                Err(e) if e.is_unique_violation() && attempt < MAX_PERSIST_ATTEMPTS => {
                    warn!(attempt, error = %e, "Bill number collision, retrying");
                    orders.resync_bill_counter().await?;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub async fn get_order(&self, id: &str) -> Result<Order, ApiError> {
        self.db
            .orders()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", id))
    }

    pub async fn get_by_bill_number(&self, bill_number: &str) -> Result<Order, ApiError> {
        let parsed: BillNumber = bill_number.parse()?;
        self.db
            .orders()
            .get_by_bill_number(&parsed)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", bill_number))
    }

    /// Newest bills first.
    pub async fn list_recent(&self, limit: Option<i64>) -> Result<Vec<Order>, ApiError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        validate_list_limit(limit)?;
        Ok(self.db.orders().list_recent(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::error::ErrorCode;
    use tabletop_core::{CartLine, Money, NewMenuItem, PaymentMode};
    use tabletop_db::DbConfig;

    struct Fixture {
        db: Database,
        finalizer: OrderFinalizer,
    }

    async fn setup_with(db: Database) -> Fixture {
        let finalizer = OrderFinalizer::new(db.clone(), TaxRate::from_bps(500));
        Fixture { db, finalizer }
    }

    async fn setup() -> Fixture {
        setup_with(Database::new(DbConfig::in_memory()).await.unwrap()).await
    }

    async fn add_item(db: &Database, name: &str, price: i64, available: bool) -> String {
        db.menu_items()
            .create(&NewMenuItem {
                name: name.to_string(),
                price: Money::from_minor(price),
                category: "Main Course".to_string(),
                is_available: available,
            })
            .await
            .unwrap()
            .id
    }

    fn request(items: Vec<(&str, i64)>, discount: i64) -> FinalizeOrderRequest {
        FinalizeOrderRequest {
            items: items
                .into_iter()
                .map(|(id, quantity)| CartLine {
                    id: id.to_string(),
                    quantity,
                })
                .collect(),
            discount: Money::from_minor(discount),
            payment_mode: PaymentMode::Cash,
        }
    }

    #[tokio::test]
    async fn test_butter_chicken_bill() {
        let fx = setup().await;
        let id = add_item(&fx.db, "Butter Chicken", 350, true).await;

        let order = fx.finalizer.finalize(request(vec![(id.as_str(), 2)], 0)).await.unwrap();
        assert_eq!(order.bill_number.as_str(), "BILL-00001");
        assert_eq!(order.subtotal.minor(), 700);
        assert_eq!(order.tax.minor(), 35);
        assert_eq!(order.grand_total.minor(), 735);
        assert_eq!(order.lines[0].name, "Butter Chicken");

        let order = fx.finalizer.finalize(request(vec![(id.as_str(), 2)], 50)).await.unwrap();
        assert_eq!(order.bill_number.as_str(), "BILL-00002");
        assert_eq!(order.grand_total.minor(), 685);
    }

    #[tokio::test]
    async fn test_unavailable_item_writes_nothing() {
        let fx = setup().await;
        let naan = add_item(&fx.db, "Naan", 40, true).await;
        let tikka = add_item(&fx.db, "Paneer Tikka", 280, false).await;

        let err = fx
            .finalizer
            .finalize(request(vec![(naan.as_str(), 1), (tikka.as_str(), 1)], 0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemUnavailable);
        assert_eq!(err.message, "Item Paneer Tikka is not available");
        assert_eq!(fx.db.orders().count_existing().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deleted_and_missing_items_rejected() {
        let fx = setup().await;
        let naan = add_item(&fx.db, "Naan", 40, true).await;
        fx.db.menu_items().soft_delete(&naan).await.unwrap();

        let err = fx.finalizer.finalize(request(vec![(naan.as_str(), 1)], 0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemUnavailable);
        assert!(err.message.contains("Naan"));

        let err = fx
            .finalizer
            .finalize(request(vec![("no-such-item", 1)], 0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemUnavailable);
        assert_eq!(err.message, "Item no-such-item is not available");
    }

    #[tokio::test]
    async fn test_request_shape_rejected() {
        let fx = setup().await;
        let naan = add_item(&fx.db, "Naan", 40, true).await;

        let err = fx.finalizer.finalize(request(vec![], 0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "cart must contain at least one line");

        for qty in [0, -1, 1000] {
            let err = fx
                .finalizer
                .finalize(request(vec![(naan.as_str(), qty)], 0))
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }

        let err = fx
            .finalizer
            .finalize(request(vec![(naan.as_str(), 1)], -10))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // 40 + 2 tax = 42
        let err = fx
            .finalizer
            .finalize(request(vec![(naan.as_str(), 1)], 43))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        let order = fx.finalizer.finalize(request(vec![(naan.as_str(), 1)], 42)).await.unwrap();
        assert_eq!(order.grand_total.minor(), 0);
    }

    #[test]
    fn test_client_price_not_accepted() {
        let body = serde_json::json!({
            "items": [{ "id": "x", "quantity": 1, "price": 1 }],
            "discount": 0,
            "paymentMode": "Cash"
        });
        assert!(serde_json::from_value::<FinalizeOrderRequest>(body).is_err());
    }

    #[tokio::test]
    async fn test_catalog_price_used_after_update() {
        let fx = setup().await;
        let id = add_item(&fx.db, "Dal Makhani", 250, true).await;
        let first = fx.finalizer.finalize(request(vec![(id.as_str(), 1)], 0)).await.unwrap();

        fx.db
            .menu_items()
            .update(
                &id,
                &tabletop_core::MenuItemPatch {
                    price: Some(Money::from_minor(300)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let second = fx.finalizer.finalize(request(vec![(id.as_str(), 1)], 0)).await.unwrap();

        assert_eq!(second.lines[0].unit_price.minor(), 300);
        let stored = fx.finalizer.get_order(&first.id).await.unwrap();
        assert_eq!(stored.lines[0].unit_price.minor(), 250);

        fx.db.menu_items().soft_delete(&id).await.unwrap();
        let stored = fx.finalizer.get_order(&first.id).await.unwrap();
        assert_eq!(stored.lines[0].name, "Dal Makhani");
    }

    #[tokio::test]
    async fn test_retry_after_foreign_bill_number() {
        let fx = setup().await;
        let naan = add_item(&fx.db, "Naan", 40, true).await;

        insert_foreign_bill(&fx.db, "BILL-00001").await;

        let order = fx.finalizer.finalize(request(vec![(naan.as_str(), 1)], 0)).await.unwrap();
        assert_eq!(order.bill_number.as_str(), "BILL-00002");
        assert_eq!(fx.db.orders().count_existing().await.unwrap(), 2);
    }

    /// Writes an order row without going through the counter.
    async fn insert_foreign_bill(db: &Database, bill_number: &str) {
        sqlx::query(
            "INSERT INTO orders (id, bill_number, subtotal, tax, tax_rate_bps, \
                                 discount, grand_total, payment_mode, created_at) \
             VALUES (?1, ?2, 40, 2, 500, 0, 42, 'Cash', '2026-01-01T00:00:00Z')",
        )
        .bind(format!("foreign-{}", bill_number))
        .bind(bill_number)
        .execute(db.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_store_failure_reaches_caller() {
        let fx = setup().await;
        let naan = add_item(&fx.db, "Naan", 40, true).await;
        sqlx::query("DROP TABLE order_lines")
            .execute(fx.db.pool())
            .await
            .unwrap();

        let err = fx
            .finalizer
            .finalize(request(vec![(naan.as_str(), 1)], 0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Query failed: no such table: order_lines");
        assert_eq!(fx.db.orders().count_existing().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_lookup_by_bill_number() {
        let fx = setup().await;
        let naan = add_item(&fx.db, "Naan", 40, true).await;
        let order = fx.finalizer.finalize(request(vec![(naan.as_str(), 3)], 0)).await.unwrap();

        let found = fx.finalizer.get_by_bill_number("BILL-00001").await.unwrap();
        assert_eq!(found.id, order.id);

        let err = fx.finalizer.get_by_bill_number("BILL-00009").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = fx.finalizer.get_by_bill_number("INV-1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = fx.finalizer.get_order("missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_list_recent_limits() {
        let fx = setup().await;
        let naan = add_item(&fx.db, "Naan", 40, true).await;
        for _ in 0..3 {
            fx.finalizer.finalize(request(vec![(naan.as_str(), 1)], 0)).await.unwrap();
        }

        assert_eq!(fx.finalizer.list_recent(None).await.unwrap().len(), 3);
        let recent = fx.finalizer.list_recent(Some(1)).await.unwrap();
        assert_eq!(recent[0].bill_number.as_str(), "BILL-00003");

        let err = fx.finalizer.list_recent(Some(0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_concurrent_finalizations_distinct_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("pos.db")).max_connections(5))
            .await
            .unwrap();
        let fx = setup_with(db).await;
        let id = add_item(&fx.db, "Butter Chicken", 350, true).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let finalizer = fx.finalizer.clone();
            let req = request(vec![(id.as_str(), 1)], 0);
            handles.push(tokio::spawn(async move { finalizer.finalize(req).await }));
        }

        let mut numbers = HashSet::new();
        for handle in handles {
            let order = handle.await.unwrap().unwrap();
            numbers.insert(order.bill_number.to_string());
        }
        assert_eq!(numbers.len(), 8);
        assert_eq!(fx.db.orders().count_existing().await.unwrap(), 8);
    }
}
