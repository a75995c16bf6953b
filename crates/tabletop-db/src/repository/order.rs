//! # Order Repository
//!
//! The order store: finalized bills and the bill-number counter.
//!
//! ## Minting a Bill Number
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ONE WRITE TRANSACTION                                                  │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    UPDATE bill_counter SET value = value + 1 ... RETURNING value       │
//! │      └── first statement takes the SQLite write lock; a concurrent     │
//! │          finalization waits here (busy_timeout) until we commit        │
//! │    INSERT INTO orders      (bill_number = BILL-{value:05})             │
//! │    INSERT INTO order_lines (frozen name / price / quantity)            │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Rollback on any failure returns the counter to its old value, so a    │
//! │  failed insert never burns a number.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The UNIQUE index on `orders.bill_number` is the backstop: a duplicate
//! surfaces as `DbError::UniqueViolation`.
//!
//! Orders are immutable. This repository has no update or delete.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tabletop_core::{
    BillNumber, Money, Order, OrderDraft, OrderLine, PaymentMode, TaxRate, BILL_NUMBER_PREFIX,
};

const BILL_COUNTER: &str = "bill";

const ORDER_COLUMNS: &str =
    "id, bill_number, subtotal, tax, tax_rate_bps, discount, grand_total, payment_mode, created_at";

const LINE_COLUMNS: &str = "order_id, menu_item_id, name, unit_price, quantity, line_total";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    bill_number: BillNumber,
    subtotal: Money,
    tax: Money,
    tax_rate_bps: TaxRate,
    discount: Money,
    grand_total: Money,
    payment_mode: PaymentMode,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> Order {
        Order {
            id: self.id,
            bill_number: self.bill_number,
            lines,
            subtotal: self.subtotal,
            tax: self.tax,
            tax_rate: self.tax_rate_bps,
            discount: self.discount,
            grand_total: self.grand_total,
            payment_mode: self.payment_mode,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    order_id: String,
    #[sqlx(flatten)]
    line: OrderLine,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Number of persisted orders.
    pub async fn count_existing(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    /// Persists a fully-formed order under its own bill number.
    ///
    /// The counter is raised to at least this bill's sequence so later
    /// minted numbers don't collide with it.
    ///
    /// ## Errors
    /// `UniqueViolation` if the bill number (or id) already exists.
    pub async fn create(&self, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, bill_number = %order.bill_number, "Inserting order");

        let mut tx = self.pool.begin().await?;

        if let Some(sequence) = order.bill_number.sequence() {
            sqlx::query("UPDATE bill_counter SET value = MAX(value, ?1) WHERE name = ?2")
                .bind(sequence as i64)
                .bind(BILL_COUNTER)
                .execute(&mut *tx)
                .await?;
        }

        insert_order(&mut *tx, order).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Mints the next bill number and persists the draft as one atomic step.
    pub async fn create_with_next_bill_number(&self, draft: OrderDraft) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;

        let next: i64 = sqlx::query_scalar(
            "UPDATE bill_counter SET value = value + 1 WHERE name = ?1 RETURNING value",
        )
        .bind(BILL_COUNTER)
        .fetch_one(&mut *tx)
        .await?;

        let bill_number = BillNumber::from_sequence(next as u64);
        let order = draft.into_order(Uuid::new_v4().to_string(), bill_number, Utc::now());

        insert_order(&mut *tx, &order).await?;
        tx.commit().await?;

        info!(
            id = %order.id,
            bill_number = %order.bill_number,
            grand_total = %order.grand_total,
            "Order persisted"
        );

        Ok(order)
    }

    /// Raises the counter past the highest stored bill number.
    ///
    /// Needed after a `UniqueViolation` from a row written without the
    /// counter; a rolled-back mint would otherwise hand out the same number
    /// again.
    pub async fn resync_bill_counter(&self) -> DbResult<i64> {
        let value: i64 = sqlx::query_scalar(
            "UPDATE bill_counter SET value = MAX(value, ( \
                 SELECT COALESCE(MAX(CAST(SUBSTR(bill_number, ?2) AS INTEGER)), 0) \
                 FROM orders WHERE bill_number LIKE ?3 \
             )) \
             WHERE name = ?1 RETURNING value",
        )
        .bind(BILL_COUNTER)
        .bind((BILL_NUMBER_PREFIX.len() + 1) as i64)
        .bind(format!("{}%", BILL_NUMBER_PREFIX))
        .fetch_one(&self.pool)
        .await?;

        debug!(value, "Bill counter resynchronized");
        Ok(value)
    }

    /// Gets an order with its lines by internal ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE id = ?1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.attach_lines(row).await
    }

    /// Gets an order with its lines by bill number.
    pub async fn get_by_bill_number(&self, bill_number: &BillNumber) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE bill_number = ?1",
            ORDER_COLUMNS
        ))
        .bind(bill_number)
        .fetch_optional(&self.pool)
        .await?;

        self.attach_lines(row).await
    }

    /// Most recent orders first.
    ///
    /// Both reads run in one transaction so the line query sees the same
    /// set of orders as the header query.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Order>> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders ORDER BY rowid DESC LIMIT ?1",
            ORDER_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&mut *tx)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let line_rows = sqlx::query_as::<_, LineRow>(&format!(
            "SELECT {} FROM order_lines \
             WHERE order_id IN (SELECT id FROM orders ORDER BY rowid DESC LIMIT ?1) \
             ORDER BY order_id, line_no",
            LINE_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        let mut lines_by_order: HashMap<String, Vec<OrderLine>> = HashMap::new();
        for row in line_rows {
            lines_by_order.entry(row.order_id).or_default().push(row.line);
        }

        let orders = rows
            .into_iter()
            .map(|row| {
                let lines = lines_by_order.remove(&row.id).unwrap_or_default();
                row.into_order(lines)
            })
            .collect();

        Ok(orders)
    }

    async fn attach_lines(&self, row: Option<OrderRow>) -> DbResult<Option<Order>> {
        let Some(row) = row else {
            return Ok(None);
        };

        let lines: Vec<OrderLine> = sqlx::query_as::<_, LineRow>(&format!(
            "SELECT {} FROM order_lines WHERE order_id = ?1 ORDER BY line_no",
            LINE_COLUMNS
        ))
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|r| r.line)
        .collect();

        if lines.is_empty() {
            return Err(DbError::Corrupt(format!("order {} has no lines", row.id)));
        }

        Ok(Some(row.into_order(lines)))
    }
}

/// Writes the order row and its lines on an open transaction.
async fn insert_order(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
    sqlx::query(
        "INSERT INTO orders (\
             id, bill_number, subtotal, tax, tax_rate_bps, \
             discount, grand_total, payment_mode, created_at\
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(&order.id)
    .bind(&order.bill_number)
    .bind(order.subtotal)
    .bind(order.tax)
    .bind(order.tax_rate)
    .bind(order.discount)
    .bind(order.grand_total)
    .bind(order.payment_mode)
    .bind(order.created_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| match DbError::from(e) {
        DbError::UniqueViolation { field, .. } if field.contains("bill_number") => {
            DbError::duplicate(field, order.bill_number.to_string())
        }
        other => other,
    })?;

    for (line_no, line) in order.lines.iter().enumerate() {
        sqlx::query(
            "INSERT INTO order_lines (\
                 order_id, line_no, menu_item_id, name, unit_price, quantity, line_total\
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&order.id)
        .bind(line_no as i64)
        .bind(&line.menu_item_id)
        .bind(&line.name)
        .bind(line.unit_price)
        .bind(line.quantity)
        .bind(line.line_total)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}
