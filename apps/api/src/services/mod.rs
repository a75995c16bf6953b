//! Service layer between the HTTP routes and the stores.

pub mod catalog_service;
pub mod order_service;

pub use catalog_service::CatalogService;
pub use order_service::OrderFinalizer;
