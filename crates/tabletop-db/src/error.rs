//! # Store Errors
//!
//! ```text
//! sqlx::Error ──► DbError ──► ApiError (apps/api)
//!
//!   Database { kind: UniqueViolation } ──► UniqueViolation { field }
//!   Database { kind: CheckViolation }  ──► CheckViolation(message)
//!   Database { .. }                    ──► QueryFailed(message)
//!   PoolTimedOut                       ──► PoolExhausted
//!   PoolClosed                         ──► ConnectionFailed
//!   anything else                      ──► Internal(display text)
//! ```
//!
//! Messages carry SQLite's own wording so callers see what the store said.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Failures raised by the catalog and order stores.
#[derive(Debug, Error)]
pub enum DbError {
    /// No live row for the id (absent, or soft-deleted where that matters).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the write; for orders this is a bill number.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A CHECK constraint (price, quantity, status, payment mode) rejected the row.
    #[error("Constraint failed: {0}")]
    CheckViolation(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Any other error reported by SQLite for a statement.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// An order row was found without its lines.
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }
}

/// `<table>.<column>` from "UNIQUE constraint failed: orders.bill_number".
fn unique_field(message: &str) -> String {
    message
        .rsplit_once(": ")
        .map(|(_, field)| field.to_string())
        .unwrap_or_else(|| message.to_string())
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation {
                        field: unique_field(&message),
                        value: String::new(),
                    },
                    ErrorKind::CheckViolation => DbError::CheckViolation(message),
                    _ => DbError::QueryFailed(message),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
