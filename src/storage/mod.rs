//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with:
//! - reference tables (departments, roles, assets, trainings, ...)
//! - employees plus the employee-owned lifecycle tables
//! - metadata(key, value) holding the `initialized` marker

pub mod schema;
pub mod sqlite;
pub mod seed;

pub use seed::SeedSummary;
pub use sqlite::{HrStore, SchemaState, TableData};
