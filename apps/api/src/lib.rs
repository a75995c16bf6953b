//! # Tabletop API
//!
//! HTTP JSON service for restaurant billing: menu management, cart
//! finalization and bill lookup.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Billing UI ── HTTP JSON ──► routes (axum) ──► services ──► tabletop-db │
//! │                                   │                │                    │
//! │                                   │                └── tabletop-core    │
//! │                                   │                    (pricing, rules) │
//! │                                   └── ApiError ──► { code, message }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use routes::build_router;
pub use state::AppState;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tabletop=trace` - Show trace for tabletop crates only
/// - Default: `info,tabletop=debug,sqlx=warn`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tabletop=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
