//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::services::{CatalogService, OrderFinalizer};
use tabletop_db::Database;

/// Cheap to clone: the pool and config are reference-counted.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub catalog: CatalogService,
    pub finalizer: OrderFinalizer,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            catalog: CatalogService::new(db.clone()),
            finalizer: OrderFinalizer::new(db.clone(), config.tax_rate),
            db,
            config: Arc::new(config),
        }
    }
}
