//! # Repository Module
//!
//! ## Repository Pattern
//! ```text
//! HTTP handler / service
//!      │
//!      │  db.menu_items().list(Some("Starters"))
//!      ▼
//! MenuItemRepository            OrderRepository
//! ├── list / categories         ├── create_with_next_bill_number
//! ├── get_by_id                 ├── create
//! ├── create / update           ├── get_by_id / get_by_bill_number
//! ├── toggle_availability       ├── list_recent
//! └── soft_delete               └── count_existing
//!      │                             │
//!      ▼                             ▼
//!                 SQLite Database
//! ```
//!
//! ## Available Repositories
//!
//! - [`menu::MenuItemRepository`] - The catalog store
//! - [`order::OrderRepository`] - The order store and bill counter

pub mod menu;
pub mod order;
