//! # hrdesk - Employee Lifecycle Store
//!
//! SQLite-backed records for the employee lifecycle: onboarding,
//! offboarding, assets, trainings, projects and resignations.
//!
//! hrdesk provides:
//! - A fixed relational schema with one-shot demo seeding
//! - A query layer for dashboard aggregates, table listings and bulk uploads
//! - CSV/JSON upload parsing
//! - An expiring session store and a JSON HTTP API

pub mod model;
pub mod storage;
pub mod query;
pub mod upload;
pub mod auth;
pub mod server;
pub mod output;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use model::{Employee, EmployeeType, EmploymentStatus, NewEmployee, WorkflowTask};
pub use storage::HrStore;
pub use query::{DashboardCounts, DateWindow, QueryEngine};
pub use upload::{RowSet, UploadFormat};

/// Result type alias for hrdesk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for hrdesk operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Schema mismatch for table '{table}': expected columns {expected:?}, got {actual:?}")]
    SchemaMismatch {
        table: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Referential violation on '{table}': {detail}")]
    ReferentialViolation { table: String, detail: String },

    #[error("Constraint violation on '{table}': {detail}")]
    ConstraintViolation { table: String, detail: String },

    #[error("Invalid upload: {0}")]
    Upload(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

impl Error {
    /// Whether the caller can correct the input and retry.
    ///
    /// Storage and IO failures are terminal for the current operation.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Error::StorageUnavailable(_) | Error::Storage(_) | Error::Io(_)
        )
    }

    /// Columns present in `expected` but absent from the upload
    pub fn missing_columns(&self) -> Vec<String> {
        match self {
            Error::SchemaMismatch { expected, actual, .. } => expected
                .iter()
                .filter(|c| !actual.contains(c))
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Columns present in the upload but not declared by the table
    pub fn unexpected_columns(&self) -> Vec<String> {
        match self {
            Error::SchemaMismatch { expected, actual, .. } => actual
                .iter()
                .filter(|c| !expected.contains(c))
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }
}
