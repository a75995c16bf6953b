//! # Domain Types
//!
//! Core domain types used throughout Tabletop POS.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │    CartLine     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │──►│  id             │   │  id (UUID)      │       │
//! │  │  name, category │   │  quantity       │   │  bill_number    │       │
//! │  │  price          │   │  (untrusted)    │   │  lines (frozen) │       │
//! │  │  status         │   └─────────────────┘   │  totals         │       │
//! │  └─────────────────┘            │            └─────────────────┘       │
//! │                                 ▼                     ▲                 │
//! │                        ┌─────────────────┐            │                 │
//! │                        │   OrderLine     │────────────┘                 │
//! │                        │  name, price    │  snapshot of MenuItem        │
//! │                        │  copied by value│  at finalization time        │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Orders carry two identifiers:
//! - `id`: UUID v4, immutable, used for lookups and relations
//! - `bill_number`: `BILL-00042`, human-facing, sequential

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::{BILL_NUMBER_PREFIX, BILL_NUMBER_WIDTH};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 500 bps = 5% GST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::DEFAULT_TAX_RATE_BPS)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Item Status
// =============================================================================

/// Lifecycle state of a menu item.
///
/// Replaces a pair of `is_available` / `is_deleted` flags so that
/// "deleted but available" cannot be represented.
///
/// ```text
///            toggle               soft_delete
///   Active ◄────────► Unavailable ───────────► Deleted
///     │                                          ▲
///     └──────────────── soft_delete ─────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Listed and orderable.
    Active,
    /// Listed but temporarily off the menu (sold out, kitchen closed).
    Unavailable,
    /// Hidden from listings; retained for historical integrity.
    Deleted,
}

impl ItemStatus {
    /// Builds a live status from an availability flag.
    #[inline]
    pub const fn from_availability(is_available: bool) -> Self {
        if is_available {
            ItemStatus::Active
        } else {
            ItemStatus::Unavailable
        }
    }

    /// Whether the item can be put on a bill.
    #[inline]
    pub const fn is_available(&self) -> bool {
        matches!(self, ItemStatus::Active)
    }

    /// Whether the item has been soft-deleted.
    #[inline]
    pub const fn is_deleted(&self) -> bool {
        matches!(self, ItemStatus::Deleted)
    }
}

impl Default for ItemStatus {
    fn default() -> Self {
        ItemStatus::Active
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A dish or drink on the restaurant menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MenuItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the menu and the bill.
    pub name: String,

    /// Price per unit.
    pub price: Money,

    /// Menu section, e.g. "Main Course", "Beverages".
    pub category: String,

    /// Lifecycle state.
    pub status: ItemStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    /// Whether the item may be put on a bill right now.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.status.is_available()
    }

    /// Whether the item has been soft-deleted.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.status.is_deleted()
    }
}

/// Fields for a new menu item, validated before insert.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewMenuItem {
    pub name: String,
    pub price: Money,
    pub category: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

impl NewMenuItem {
    /// Validates and normalizes (trims) the fields.
    pub fn validated(self) -> Result<NewMenuItem, ValidationError> {
        crate::validation::validate_item_name(&self.name)?;
        crate::validation::validate_category(&self.category)?;
        crate::validation::validate_price(self.price)?;

        Ok(NewMenuItem {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            ..self
        })
    }
}

/// Partial update of a menu item. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
}

impl MenuItemPatch {
    /// Validates the supplied fields and normalizes strings.
    pub fn validated(self) -> Result<MenuItemPatch, ValidationError> {
        if let Some(name) = &self.name {
            crate::validation::validate_item_name(name)?;
        }
        if let Some(category) = &self.category {
            crate::validation::validate_category(category)?;
        }
        if let Some(price) = self.price {
            crate::validation::validate_price(price)?;
        }

        Ok(MenuItemPatch {
            name: self.name.map(|n| n.trim().to_string()),
            category: self.category.map(|c| c.trim().to_string()),
            ..self
        })
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.is_available.is_none()
    }
}

// =============================================================================
// Payment Mode
// =============================================================================

/// How the guest settled the bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum PaymentMode {
    Cash,
    #[serde(rename = "UPI")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "UPI"))]
    Upi,
    Card,
}

impl PaymentMode {
    /// Wire name, identical to the serialized form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Upi => "UPI",
            PaymentMode::Card => "Card",
        }
    }
}

impl Default for PaymentMode {
    fn default() -> Self {
        PaymentMode::Cash
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One line of a client-proposed cart.
///
/// Only an item reference and a quantity cross the trust boundary. Any
/// other field (a name, a price) is rejected at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct CartLine {
    /// Menu item id.
    pub id: String,
    /// Requested quantity.
    pub quantity: i64,
}

/// The "finalize order" request body.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct FinalizeOrderRequest {
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub discount: Money,
    #[serde(default)]
    pub payment_mode: PaymentMode,
}

// =============================================================================
// Order Line
// =============================================================================

/// A priced line on a bill.
/// Uses snapshot pattern to freeze menu data at time of finalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    /// Menu item this line was priced from (audit only).
    pub menu_item_id: String,
    /// Item name at time of sale (frozen).
    pub name: String,
    /// Unit price at time of sale (frozen).
    pub unit_price: Money,
    pub quantity: i64,
    /// unit_price × quantity.
    pub line_total: Money,
}

impl OrderLine {
    /// Snapshots a catalog item into a bill line.
    pub fn from_menu_item(item: &MenuItem, quantity: i64) -> CoreResult<OrderLine> {
        let line_total = item
            .price
            .checked_mul_quantity(quantity)
            .ok_or(CoreError::AmountOverflow("line total"))?;

        Ok(OrderLine {
            menu_item_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity,
            line_total,
        })
    }
}

// =============================================================================
// Bill Number
// =============================================================================

/// Human-facing sequential bill identifier, e.g. `BILL-00042`.
///
/// The numeric part is zero-padded to five digits and simply grows wider
/// past 99999.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
#[ts(export)]
pub struct BillNumber(String);

impl BillNumber {
    /// Formats the bill number for a sequence value (1-based).
    pub fn from_sequence(sequence: u64) -> Self {
        BillNumber(format!(
            "{}{:0width$}",
            BILL_NUMBER_PREFIX,
            sequence,
            width = BILL_NUMBER_WIDTH
        ))
    }

    /// Returns the numeric part.
    pub fn sequence(&self) -> Option<u64> {
        self.0
            .strip_prefix(BILL_NUMBER_PREFIX)
            .and_then(|digits| digits.parse().ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BillNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(BILL_NUMBER_PREFIX)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "billNumber".to_string(),
                reason: format!("must start with {}", BILL_NUMBER_PREFIX),
            })?;

        if digits.len() < BILL_NUMBER_WIDTH || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidFormat {
                field: "billNumber".to_string(),
                reason: format!("must end with at least {} digits", BILL_NUMBER_WIDTH),
            });
        }

        Ok(BillNumber(s.to_string()))
    }
}

impl fmt::Display for BillNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A priced order that has not yet been numbered or persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub lines: Vec<OrderLine>,
    pub subtotal: Money,
    pub tax: Money,
    pub tax_rate: TaxRate,
    pub discount: Money,
    pub grand_total: Money,
    pub payment_mode: PaymentMode,
}

impl OrderDraft {
    /// Seals the draft into an order with its identity and timestamp.
    pub fn into_order(self, id: String, bill_number: BillNumber, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            bill_number,
            lines: self.lines,
            subtotal: self.subtotal,
            tax: self.tax,
            tax_rate: self.tax_rate,
            discount: self.discount,
            grand_total: self.grand_total,
            payment_mode: self.payment_mode,
            created_at,
        }
    }
}

/// A finalized bill. Immutable once persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub bill_number: BillNumber,
    pub lines: Vec<OrderLine>,
    pub subtotal: Money,
    pub tax: Money,
    pub tax_rate: TaxRate,
    pub discount: Money,
    pub grand_total: Money,
    pub payment_mode: PaymentMode,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
