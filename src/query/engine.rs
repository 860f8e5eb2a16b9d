//! Query engine implementation
//!
//! Provides the operations behind each page:
//! - Dashboard aggregates over a date window
//! - Table listings and bounded row scans
//! - Validated, all-or-nothing bulk uploads
//! - Filtered employee and workflow scans

use std::path::Path;
use crate::Result;
use crate::model::{Employee, EmploymentStatus, WorkflowTask};
use crate::storage::sqlite::LifecycleDate;
use crate::storage::{HrStore, TableData};
use crate::upload::{self, RowSet};
use super::dashboard::{DashboardCounts, DashboardView, DateWindow, TableCount, TypeBreakdown};

/// Query engine over an open store
pub struct QueryEngine<'a> {
    store: &'a HrStore,
}

impl<'a> QueryEngine<'a> {
    /// Create a new query engine
    pub fn new(store: &'a HrStore) -> Self {
        Self { store }
    }

    /// Joiners and leavers in `[window_start, window_end]` by type, plus row
    /// counts for every user table
    pub fn dashboard_counts(
        &self,
        window_start: chrono::NaiveDate,
        window_end: chrono::NaiveDate,
    ) -> Result<DashboardCounts> {
        let window = DateWindow::new(window_start, window_end)?;
        let onboarding = TypeBreakdown::from_counts(&self.store.count_by_type(
            LifecycleDate::Joining,
            window.start,
            window.end,
        )?);
        let offboarding = TypeBreakdown::from_counts(&self.store.count_by_type(
            LifecycleDate::LastWorking,
            window.start,
            window.end,
        )?);
        let table_counts = self
            .store
            .table_counts()?
            .into_iter()
            .map(|(table, rows)| TableCount { table, rows })
            .collect();

        Ok(DashboardCounts {
            window,
            onboarding,
            offboarding,
            table_counts,
        })
    }

    /// Dashboard counts with the joiner and leaver lists
    pub fn dashboard(&self, window: DateWindow) -> Result<DashboardView> {
        Ok(DashboardView {
            counts: self.dashboard_counts(window.start, window.end)?,
            joiners: self.joiners(window)?,
            leavers: self.leavers(window)?,
        })
    }

    /// Employees joining inside the window
    pub fn joiners(&self, window: DateWindow) -> Result<Vec<Employee>> {
        self.store
            .employees_in_window(LifecycleDate::Joining, window.start, window.end)
    }

    /// Employees whose last working day is inside the window
    pub fn leavers(&self, window: DateWindow) -> Result<Vec<Employee>> {
        self.store
            .employees_in_window(LifecycleDate::LastWorking, window.start, window.end)
    }

    pub fn employees_by_status(&self, status: EmploymentStatus) -> Result<Vec<Employee>> {
        self.store.employees_by_status(status)
    }

    pub fn list_tables(&self) -> Result<Vec<String>> {
        self.store.list_tables()
    }

    /// Columns an upload into `table` must carry
    pub fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        self.store.table_columns(table)
    }

    pub fn table_rows(&self, table: &str, limit: usize) -> Result<TableData> {
        self.store.table_rows(table, limit)
    }

    /// Insert `rows` after checking their header against `expected_columns`
    pub fn bulk_insert(&self, table: &str, rows: &RowSet, expected_columns: &[String]) -> Result<usize> {
        self.store.bulk_insert(table, rows, expected_columns)
    }

    /// Insert `rows` into `table`, expecting exactly the table's declared columns
    pub fn upload(&self, table: &str, rows: &RowSet) -> Result<usize> {
        let expected = self.store.table_columns(table)?;
        self.store.bulk_insert(table, rows, &expected)
    }

    /// Parse a CSV/JSON file and upload it into `table`
    pub fn upload_file(&self, table: &str, path: &Path) -> Result<usize> {
        // Fail on an unknown table before reading the file
        let expected = self.store.table_columns(table)?;
        let rows = upload::read_file(path)?;
        self.store.bulk_insert(table, &rows, &expected)
    }

    /// Workflow page listing
    pub fn workflow_tasks(&self, status: Option<&str>) -> Result<Vec<WorkflowTask>> {
        self.store.workflow_tasks(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use chrono::{Duration, NaiveDate};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn seeded_store(seed: u64) -> HrStore {
        let store = HrStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        store.seed_demo_data(today(), &mut rng).unwrap();
        store
    }

    #[test]
    fn test_offboarding_count_matches_seeded_leavers() {
        for seed in 0..10 {
            let store = seeded_store(seed);
            let engine = QueryEngine::new(&store);
            let counts = engine
                .dashboard_counts(today(), today() + Duration::days(7))
                .unwrap();
            assert_eq!(counts.offboarding.total, 3);
            assert_eq!(
                counts.offboarding.freshers + counts.offboarding.experienced,
                3
            );
            assert_eq!(
                counts.onboarding.total,
                counts.onboarding.freshers + counts.onboarding.experienced
            );
            assert_eq!(counts.rows_in("employees"), Some(10));
            assert_eq!(counts.table_counts.len(), store.list_tables().unwrap().len());
        }
    }

    #[test]
    fn test_onboarding_covers_all_joiners() {
        let store = seeded_store(11);
        let engine = QueryEngine::new(&store);
        let window = DateWindow::starting(today(), 10).unwrap();
        let view = engine.dashboard(window).unwrap();
        assert_eq!(view.counts.onboarding.total, 10);
        assert_eq!(view.joiners.len(), 10);
        assert_eq!(view.leavers.len(), 3);
        assert!(view.leavers.iter().all(|e| e.employment_status == EmploymentStatus::Resigned));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let store = seeded_store(0);
        let engine = QueryEngine::new(&store);
        let err = engine
            .dashboard_counts(today(), today() - Duration::days(1))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
    }

    #[test]
    fn test_partial_asset_upload_rejected() {
        let store = seeded_store(2);
        let engine = QueryEngine::new(&store);
        let before = store.count_rows("employee_assets").unwrap();

        let mut rows = RowSet::new(vec![
            "employee_id".into(),
            "asset_id".into(),
            "assigned_date".into(),
        ]);
        rows.push_row(vec![
            "emp_id_1".to_string().into(),
            "asset_1".to_string().into(),
            "2026-10-19".to_string().into(),
        ])
        .unwrap();

        let err = engine.upload("employee_assets", &rows).unwrap_err();
        match &err {
            Error::SchemaMismatch { table, expected, actual } => {
                assert_eq!(table, "employee_assets");
                assert_eq!(expected.len(), 6);
                assert_eq!(actual.len(), 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.is_recoverable());
        assert_eq!(store.count_rows("employee_assets").unwrap(), before);
    }

    #[test]
    fn test_upload_file_round() {
        let store = seeded_store(4);
        let engine = QueryEngine::new(&store);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        std::fs::write(
            &path,
            r#"[{"project_id":"proj_9","project_name":"Payroll Migration","objective":"Move payroll","start_date":"2026-11-01"}]"#,
        )
        .unwrap();

        assert_eq!(engine.upload_file("projects", &path).unwrap(), 1);
        let data = engine.table_rows("projects", 100).unwrap();
        assert_eq!(data.len(), 6);
        assert!(matches!(
            engine.upload_file("nope", &path),
            Err(Error::UnknownTable(_))
        ));
    }

    #[test]
    fn test_datetime_joining_date_rejected_dashboard_intact() {
        let store = seeded_store(9);
        let engine = QueryEngine::new(&store);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("employees.csv");
        let header = engine.table_columns("employees").unwrap().join(",");
        std::fs::write(
            &path,
            format!(
                "{}\nemp_new,Asha,Rao,asha@company.com,,FRESHER,PREJOIN,dep_id_1,,HR_USER,2026-10-20 09:00:00,,,,\n",
                header
            ),
        )
        .unwrap();

        assert!(matches!(
            engine.upload_file("employees", &path),
            Err(Error::ConstraintViolation { .. })
        ));
        let window = DateWindow::starting(today(), 10).unwrap();
        let view = engine.dashboard(window).unwrap();
        assert_eq!(view.counts.onboarding.total, 10);
        assert_eq!(view.joiners.len(), 10);
    }

    #[test]
    fn test_employees_by_status() {
        let store = seeded_store(6);
        let engine = QueryEngine::new(&store);
        let resigned = engine.employees_by_status(EmploymentStatus::Resigned).unwrap();
        assert_eq!(resigned.len(), 3);
        let others = engine.employees_by_status(EmploymentStatus::Active).unwrap().len()
            + engine.employees_by_status(EmploymentStatus::Prejoin).unwrap().len();
        assert_eq!(others, 7);
    }
}
