//! # tabletop-core: Pure Billing Logic for Tabletop POS
//!
//! This crate holds the restaurant billing rules as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Tabletop POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Menu / Billing UI (external)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  apps/api (axum routes, services)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ tabletop-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │ MenuItem  │  │   Money   │  │ BillTotals│  │   rules   │  │   │
//! │  │   │  Order    │  │  TaxRate  │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tabletop-db (Catalog + Order stores)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, Order, CartLine, etc.)
//! - [`money`] - Money type with integer arithmetic
//! - [`pricing`] - Bill totals from verified lines
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use tabletop_core::money::Money;
//! use tabletop_core::pricing::compute_totals;
//! use tabletop_core::types::TaxRate;
//!
//! let lines = [(Money::from_minor(350), 2)];
//! let totals = compute_totals(&lines, Money::zero(), TaxRate::from_bps(500)).unwrap();
//!
//! assert_eq!(totals.subtotal.minor(), 700);
//! assert_eq!(totals.tax.minor(), 35);
//! assert_eq!(totals.grand_total.minor(), 735);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{compute_totals, BillTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Catches typing 1000 instead of 10 at the counter.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Tax rate applied when the deployment doesn't configure one (5%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 500;

/// Prefix of every human-facing bill number.
pub const BILL_NUMBER_PREFIX: &str = "BILL-";

/// Zero-padded width of the numeric part of a bill number.
pub const BILL_NUMBER_WIDTH: usize = 5;
