//! Query Layer
//!
//! Read and write operations the presentation surfaces call into.

pub mod dashboard;
pub mod engine;

pub use dashboard::{DashboardCounts, DashboardView, DateWindow, TableCount, TypeBreakdown};
pub use engine::QueryEngine;
