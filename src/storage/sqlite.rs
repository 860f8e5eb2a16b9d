//! SQLite storage implementation

use std::path::Path;
use chrono::NaiveDate;
use rand::Rng;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{ffi, params, params_from_iter, Connection, ErrorCode, OptionalExtension};
use serde::Serialize;
use crate::model::{Employee, EmployeeType, EmploymentStatus, NewEmployee, WorkflowTask};
use crate::upload::RowSet;
use crate::{Error, Result};
use super::schema::{self, quote_ident, INITIALIZED_KEY, METADATA_TABLE};
use super::seed::{self, SeedSummary};

const EMPLOYEE_COLUMNS: &str = "employee_id, first_name, last_name, email, phone, employee_type, \
     employment_status, department_id, manager_id, hr_id, joining_date, actual_joining_date, \
     last_working_date, created_at, updated_at";

/// Outcome of [`HrStore::ensure_schema`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    /// Tables were created (or confirmed present) on this call
    Created,
    /// The `initialized` marker was already set; nothing was touched
    AlreadyInitialized,
}

/// Employee date column a window filter applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleDate {
    Joining,
    LastWorking,
}

impl LifecycleDate {
    fn column(&self) -> &'static str {
        match self {
            LifecycleDate::Joining => "joining_date",
            LifecycleDate::LastWorking => "last_working_date",
        }
    }
}

/// Rows read back from a user table
#[derive(Debug, Clone, Serialize)]
pub struct TableData {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl TableData {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// SQLite-backed storage for employee lifecycle records
pub struct HrStore {
    conn: Connection,
}

impl HrStore {
    /// Open a database file (creates if doesn't exist)
    ///
    /// Does not create the schema; call [`HrStore::ensure_schema`] on startup.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| Error::StorageUnavailable(format!("{}: {}", path.display(), e)))?;
        Self::configure(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::StorageUnavailable(format!(":memory:: {}", e)))?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| Error::StorageUnavailable(format!("enable foreign keys: {}", e)))?;
        Ok(Self { conn })
    }

    // ========== Schema Operations ==========

    /// Create all tables and indexes if absent.
    ///
    /// No-op once the `initialized` marker is set. Any failure here is fatal.
    pub fn ensure_schema(&self) -> Result<SchemaState> {
        if self.is_initialized()? {
            tracing::debug!("schema already initialized");
            return Ok(SchemaState::AlreadyInitialized);
        }

        let tx = self.conn.unchecked_transaction()?;
        for stmt in schema::all_schema_statements() {
            tx.execute(stmt, [])
                .map_err(|e| Error::StorageUnavailable(format!("schema setup failed: {}", e)))?;
        }
        tx.commit()?;
        tracing::info!("schema ready ({} tables)", schema::USER_TABLES.len());
        Ok(SchemaState::Created)
    }

    /// Whether the `initialized` marker row is present
    pub fn is_initialized(&self) -> Result<bool> {
        if !self.table_exists(METADATA_TABLE)? {
            return Ok(false);
        }
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM metadata WHERE key = ?1",
                [INITIALIZED_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.is_some())
    }

    /// Set the `initialized` marker without seeding
    pub fn mark_initialized(&self) -> Result<()> {
        write_marker(&self.conn)
    }

    /// Populate every table with demo rows, exactly once.
    ///
    /// Guarded by the `initialized` marker, which is written in the same
    /// transaction. Returns `None` when the store was already initialized.
    pub fn seed_demo_data<R: Rng + ?Sized>(
        &self,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<Option<SeedSummary>> {
        if self.is_initialized()? {
            tracing::info!("store already initialized, skipping demo data");
            return Ok(None);
        }

        let tx = self.conn.unchecked_transaction()?;
        let summary = seed::insert_demo_data(&tx, today, rng)?;
        write_marker(&tx)?;
        tx.commit()?;
        tracing::info!(
            "seeded {} employees ({} leaving soon)",
            summary.employees,
            summary.leavers
        );
        Ok(Some(summary))
    }

    /// Drop every user table and clear the marker
    pub fn reset_schema(&self) -> Result<()> {
        let tables = self.list_tables()?;
        self.conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
        let result = (|| -> Result<()> {
            for table in &tables {
                self.conn
                    .execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)), [])?;
            }
            if self.table_exists(METADATA_TABLE)? {
                self.conn
                    .execute("DELETE FROM metadata WHERE key = ?1", [INITIALIZED_KEY])?;
            }
            Ok(())
        })();
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        result?;
        tracing::warn!("dropped {} tables", tables.len());
        Ok(())
    }

    fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ========== Table Operations ==========

    /// Names of all user tables, excluding SQLite catalog tables and `metadata`
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND substr(name, 1, 7) != 'sqlite_' AND name != ?1
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([METADATA_TABLE], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Reject anything that is not a listed user table
    fn require_table(&self, table: &str) -> Result<()> {
        if self.list_tables()?.iter().any(|t| t == table) {
            Ok(())
        } else {
            Err(Error::UnknownTable(table.to_string()))
        }
    }

    /// Declared column names of a user table, in declaration order
    pub fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        self.require_table(table)?;
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let columns = stmt
            .query_map([table], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(columns)
    }

    /// Up to `limit` rows of a user table, in insertion order
    pub fn table_rows(&self, table: &str, limit: usize) -> Result<TableData> {
        let columns = self.table_columns(table)?;
        let select_list = columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid LIMIT ?1",
            select_list,
            quote_ident(table)
        );

        let width = columns.len();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([sql_limit(limit)], |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(value_to_json))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(TableData {
            table: table.to_string(),
            columns,
            rows,
        })
    }

    /// Count rows in a user table
    pub fn count_rows(&self, table: &str) -> Result<usize> {
        self.require_table(table)?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Row count for every user table
    pub fn table_counts(&self) -> Result<Vec<(String, usize)>> {
        let mut counts = Vec::new();
        for table in self.list_tables()? {
            let count: i64 = self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", quote_ident(&table)),
                [],
                |row| row.get(0),
            )?;
            counts.push((table, count as usize));
        }
        Ok(counts)
    }

    // ========== Bulk Operations ==========

    /// Append every row of `rows` to `table` in one transaction.
    ///
    /// The upload header must equal `expected_columns` as a set. On mismatch
    /// nothing is written; on any row failure the whole batch rolls back.
    pub fn bulk_insert(&self, table: &str, rows: &RowSet, expected_columns: &[String]) -> Result<usize> {
        let declared = self.table_columns(table)?;
        if let Some(stray) = expected_columns.iter().find(|c| !declared.contains(c)) {
            return Err(Error::InvalidValue(format!(
                "column '{}' is not declared on table '{}'",
                stray, table
            )));
        }
        check_columns(table, &rows.columns, expected_columns)?;

        // Identifiers come from the catalog; the upload only decides value positions.
        let mut targets = Vec::with_capacity(expected_columns.len());
        let mut positions = Vec::with_capacity(expected_columns.len());
        for column in declared.iter().filter(|c| expected_columns.contains(c)) {
            if let Some(pos) = rows.column_index(column) {
                targets.push(quote_ident(column));
                positions.push(pos);
            }
        }
        let placeholders = (1..=targets.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            targets.join(", "),
            placeholders
        );

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for (i, row) in rows.rows.iter().enumerate() {
                if row.len() != rows.columns.len() {
                    return Err(Error::Upload(format!(
                        "row {} has {} values, header has {}",
                        i + 1,
                        row.len(),
                        rows.columns.len()
                    )));
                }
                stmt.execute(params_from_iter(positions.iter().map(|&p| &row[p])))
                    .map_err(|e| write_error(table, e, Some(i + 1)))?;
            }
        }
        tx.commit()?;

        tracing::info!("inserted {} rows into {}", rows.rows.len(), table);
        Ok(rows.rows.len())
    }

    // ========== Employee Operations ==========

    /// Insert a single employee
    pub fn insert_employee(&self, employee: &NewEmployee) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .execute(
                &format!(
                    "INSERT INTO employees ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                    EMPLOYEE_COLUMNS
                ),
                params![
                    employee.employee_id,
                    employee.first_name,
                    employee.last_name,
                    employee.email,
                    employee.phone,
                    employee.employee_type.as_str(),
                    employee.employment_status.as_str(),
                    employee.department_id,
                    employee.manager_id,
                    employee.hr_id,
                    employee.joining_date.to_string(),
                    employee.actual_joining_date.map(|d| d.to_string()),
                    employee.last_working_date.map(|d| d.to_string()),
                    now,
                    now,
                ],
            )
            .map_err(|e| write_error("employees", e, None))?;
        Ok(())
    }

    /// Get an employee by id
    pub fn get_employee(&self, employee_id: &str) -> Result<Option<Employee>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM employees WHERE employee_id = ?1", EMPLOYEE_COLUMNS),
                [employee_id],
                row_to_employee,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Employees whose lifecycle date falls in `[start, end]`
    pub fn employees_in_window(&self, date: LifecycleDate, start: NaiveDate, end: NaiveDate) -> Result<Vec<Employee>> {
        let sql = format!(
            "SELECT {cols} FROM employees WHERE {col} BETWEEN ?1 AND ?2 ORDER BY {col}, employee_id",
            cols = EMPLOYEE_COLUMNS,
            col = date.column()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let employees = stmt
            .query_map([start.to_string(), end.to_string()], row_to_employee)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(employees)
    }

    /// Count employees per type whose lifecycle date falls in `[start, end]`
    pub fn count_by_type(&self, date: LifecycleDate, start: NaiveDate, end: NaiveDate) -> Result<Vec<(String, usize)>> {
        let sql = format!(
            "SELECT employee_type, COUNT(*) FROM employees WHERE {col} BETWEEN ?1 AND ?2 GROUP BY employee_type",
            col = date.column()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let counts = stmt
            .query_map([start.to_string(), end.to_string()], |row| {
                let count: i64 = row.get(1)?;
                Ok((row.get(0)?, count as usize))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(counts)
    }

    /// Employees currently in the given lifecycle state
    pub fn employees_by_status(&self, status: EmploymentStatus) -> Result<Vec<Employee>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM employees WHERE employment_status = ?1 ORDER BY employee_id",
            EMPLOYEE_COLUMNS
        ))?;
        let employees = stmt
            .query_map([status.as_str()], row_to_employee)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(employees)
    }

    // ========== Workflow Operations ==========

    /// Workflow tasks ordered by due date, optionally filtered by status
    pub fn workflow_tasks(&self, status: Option<&str>) -> Result<Vec<WorkflowTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT task_id, employee_id, task_type, assigned_to, due_date, status, metadata, created_at
             FROM workflow_tasks
             WHERE ?1 IS NULL OR status = ?1
             ORDER BY due_date, task_id",
        )?;
        let tasks = stmt
            .query_map([status], |row| {
                Ok(WorkflowTask {
                    task_id: row.get(0)?,
                    employee_id: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    task_type: row.get(2)?,
                    assigned_to: row.get(3)?,
                    due_date: parse_date(4, row.get(4)?)?,
                    status: row.get(5)?,
                    metadata: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }
}

fn write_marker(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, 'true')",
        [INITIALIZED_KEY],
    )?;
    Ok(())
}

/// Compare an upload header against the expected columns as sets
fn check_columns(table: &str, actual: &[String], expected: &[String]) -> Result<()> {
    let mut seen: Vec<&String> = Vec::with_capacity(actual.len());
    let mut duplicate = false;
    for column in actual {
        if seen.contains(&column) {
            duplicate = true;
        }
        seen.push(column);
    }

    let same_set = actual.len() == expected.len()
        && actual.iter().all(|c| expected.contains(c))
        && expected.iter().all(|c| actual.contains(c));

    if duplicate || !same_set {
        return Err(Error::SchemaMismatch {
            table: table.to_string(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

/// Map a failed write to the caller-facing error kind
fn write_error(table: &str, err: rusqlite::Error, row: Option<usize>) -> Error {
    if let rusqlite::Error::SqliteFailure(code, msg) = &err {
        if code.code == ErrorCode::ConstraintViolation {
            let message = msg.clone().unwrap_or_else(|| code.to_string());
            let detail = match row {
                Some(n) => format!("row {}: {}", n, message),
                None => message,
            };
            return if code.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
                Error::ReferentialViolation { table: table.to_string(), detail }
            } else {
                Error::ConstraintViolation { table: table.to_string(), detail }
            };
        }
    }
    Error::Storage(err)
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn value_to_json(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(t) => serde_json::Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => serde_json::Value::String(format!("<{} bytes>", b.len())),
    }
}

/// Convert an owned SQLite value to JSON (used by row set previews)
pub fn owned_value_to_json(value: &Value) -> serde_json::Value {
    value_to_json(ValueRef::from(value))
}

fn parse_date(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Some).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        }),
    }
}

/// Helper to convert a row to an Employee
fn row_to_employee(row: &rusqlite::Row) -> rusqlite::Result<Employee> {
    let type_str: String = row.get(5)?;
    let status_str: String = row.get(6)?;

    let employee_type: EmployeeType = type_str.parse().map_err(|e: Error| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let employment_status: EmploymentStatus = status_str.parse().map_err(|e: Error| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Employee {
        employee_id: row.get(0)?,
        first_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        last_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        email: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        phone: row.get(4)?,
        employee_type,
        employment_status,
        department_id: row.get(7)?,
        manager_id: row.get(8)?,
        hr_id: row.get(9)?,
        joining_date: parse_date(10, row.get(10)?)?,
        actual_joining_date: parse_date(11, row.get(11)?)?,
        last_working_date: parse_date(12, row.get(12)?)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn seeded_store() -> HrStore {
        let store = HrStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        store.seed_demo_data(today(), &mut rng).unwrap();
        store
    }

    fn text_rows(columns: &[&str], rows: &[&[&str]]) -> RowSet {
        let mut set = RowSet::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            set.push_row(
                row.iter()
                    .map(|v| if v.is_empty() { Value::Null } else { Value::Text(v.to_string()) })
                    .collect(),
            )
            .unwrap();
        }
        set
    }

    fn strings(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_ensure_schema_idempotent() {
        let store = HrStore::open_in_memory().unwrap();
        assert_eq!(store.ensure_schema().unwrap(), SchemaState::Created);
        let first = store.list_tables().unwrap();
        assert_eq!(store.ensure_schema().unwrap(), SchemaState::Created);
        assert_eq!(store.list_tables().unwrap(), first);

        store.mark_initialized().unwrap();
        assert_eq!(store.ensure_schema().unwrap(), SchemaState::AlreadyInitialized);
        assert_eq!(store.list_tables().unwrap(), first);
    }

    #[test]
    fn test_list_tables_excludes_metadata() {
        let store = seeded_store();
        let tables = store.list_tables().unwrap();
        assert_eq!(tables.len(), schema::USER_TABLES.len());
        assert!(!tables.iter().any(|t| t == METADATA_TABLE));
        assert!(tables.iter().any(|t| t == "employees"));
    }

    #[test]
    fn test_seed_runs_once() {
        let store = seeded_store();
        assert!(store.is_initialized().unwrap());
        assert_eq!(store.count_rows("employees").unwrap(), 10);

        let mut rng = StdRng::seed_from_u64(99);
        assert!(store.seed_demo_data(today(), &mut rng).unwrap().is_none());
        assert_eq!(store.ensure_schema().unwrap(), SchemaState::AlreadyInitialized);
        assert_eq!(store.count_rows("employees").unwrap(), 10);
        assert_eq!(store.count_rows("offers").unwrap(), 10);
    }

    #[test]
    fn test_table_rows_respects_limit() {
        let store = seeded_store();
        for table in store.list_tables().unwrap() {
            let data = store.table_rows(&table, 3).unwrap();
            assert!(data.len() <= 3, "{} returned {} rows", table, data.len());
            assert_eq!(data.columns, store.table_columns(&table).unwrap());
            assert!(data.rows.iter().all(|r| r.len() == data.columns.len()));
        }
        assert_eq!(store.table_rows("employees", 0).unwrap().len(), 0);
    }

    #[test]
    fn test_unknown_table_rejected() {
        let store = seeded_store();
        for name in ["nope", "metadata", "sqlite_master", "employees; DROP TABLE employees"] {
            assert!(matches!(store.table_rows(name, 5), Err(Error::UnknownTable(_))));
        }
        assert_eq!(store.count_rows("employees").unwrap(), 10);
    }

    #[test]
    fn test_bulk_insert_order_independent() {
        let store = seeded_store();
        let expected = store.table_columns("departments").unwrap();
        let rows = text_rows(
            &["department_name", "department_id"],
            &[&["Payroll", "dep_x"], &["Facilities", "dep_y"]],
        );
        assert_eq!(store.bulk_insert("departments", &rows, &expected).unwrap(), 2);
        assert_eq!(store.count_rows("departments").unwrap(), 12);
    }

    #[test]
    fn test_bulk_insert_subset_and_superset_rejected() {
        let store = seeded_store();
        let expected = store.table_columns("employee_assets").unwrap();
        let before = store.count_rows("employee_assets").unwrap();

        let subset = text_rows(
            &["employee_id", "asset_id", "assigned_date"],
            &[&["emp_id_1", "asset_1", "2026-10-19"]],
        );
        let err = store.bulk_insert("employee_assets", &subset, &expected).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
        assert_eq!(
            err.missing_columns(),
            strings(&["employee_asset_id", "returned_date", "asset_status"])
        );

        let mut wide = expected.clone();
        wide.push("extra".to_string());
        let wide_refs: Vec<&str> = wide.iter().map(String::as_str).collect();
        let superset = text_rows(
            &wide_refs,
            &[&["ea_new", "emp_id_1", "asset_1", "2026-10-19", "", "Assigned", "x"]],
        );
        let err = store.bulk_insert("employee_assets", &superset, &expected).unwrap_err();
        assert_eq!(err.unexpected_columns(), strings(&["extra"]));

        assert_eq!(store.count_rows("employee_assets").unwrap(), before);
    }

    #[test]
    fn test_bulk_insert_duplicate_header_rejected() {
        let store = seeded_store();
        let expected = strings(&["department_id", "department_name"]);
        let rows = text_rows(&["department_id", "department_id", "department_name"], &[]);
        assert!(matches!(
            store.bulk_insert("departments", &rows, &expected),
            Err(Error::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_bulk_insert_is_atomic() {
        let store = seeded_store();
        let expected = store.table_columns("employee_assets").unwrap();
        let before = store.count_rows("employee_assets").unwrap();
        let rows = text_rows(
            &["employee_asset_id", "employee_id", "asset_id", "assigned_date", "returned_date", "asset_status"],
            &[
                &["ea_a", "emp_id_1", "asset_2", "2026-10-19", "", "Assigned"],
                &["ea_b", "emp_id_2", "asset_3", "2026-10-19", "", "Assigned"],
                &["ea_c", "emp_missing", "asset_4", "2026-10-19", "", "Assigned"],
            ],
        );
        let err = store.bulk_insert("employee_assets", &rows, &expected).unwrap_err();
        match err {
            Error::ReferentialViolation { table, detail } => {
                assert_eq!(table, "employee_assets");
                assert!(detail.starts_with("row 3"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.count_rows("employee_assets").unwrap(), before);
    }

    #[test]
    fn test_bulk_insert_blank_key_rejected() {
        let store = seeded_store();
        let expected = store.table_columns("departments").unwrap();
        let rows = text_rows(
            &["department_id", "department_name"],
            &[&["", "HR"], &["", "Eng"]],
        );
        let err = store.bulk_insert("departments", &rows, &expected).unwrap_err();
        match err {
            Error::ConstraintViolation { table, detail } => {
                assert_eq!(table, "departments");
                assert!(detail.starts_with("row 1"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.count_rows("departments").unwrap(), 10);
    }

    #[test]
    fn test_employee_dates_must_be_plain_dates() {
        let store = seeded_store();
        let expected = store.table_columns("employees").unwrap();
        let columns: Vec<&str> = expected.iter().map(String::as_str).collect();

        for bad in ["2026-10-20 09:00:00", "20/10/2026", "soon"] {
            let rows = text_rows(
                &columns,
                &[&[
                    "emp_new", "Asha", "Rao", "asha@company.com", "", "FRESHER", "PREJOIN",
                    "dep_id_1", "", "HR_USER", bad, "", "", "", "",
                ]],
            );
            assert!(
                matches!(
                    store.bulk_insert("employees", &rows, &expected),
                    Err(Error::ConstraintViolation { .. })
                ),
                "accepted joining date {:?}",
                bad
            );
        }
        assert_eq!(store.count_rows("employees").unwrap(), 10);

        let rows = text_rows(
            &columns,
            &[&[
                "emp_new", "Asha", "Rao", "asha@company.com", "", "FRESHER", "PREJOIN",
                "dep_id_1", "", "HR_USER", "2026-10-20", "", "", "", "",
            ]],
        );
        assert_eq!(store.bulk_insert("employees", &rows, &expected).unwrap(), 1);
        let stored = store.get_employee("emp_new").unwrap().unwrap();
        assert_eq!(stored.joining_date, NaiveDate::from_ymd_opt(2026, 10, 20));
    }

    #[test]
    fn test_bulk_insert_rejects_undeclared_expected_column() {
        let store = seeded_store();
        let expected = strings(&["department_id", "bogus"]);
        let rows = text_rows(&["department_id", "bogus"], &[&["d", "b"]]);
        assert!(matches!(
            store.bulk_insert("departments", &rows, &expected),
            Err(Error::InvalidValue(_))
        ));
    }

    #[test]
    fn test_insert_employee_unknown_department() {
        let store = seeded_store();
        let employee = NewEmployee::new("emp_new", "Asha", "Rao", "asha@company.com", "dep_missing", today());
        let err = store.insert_employee(&employee).unwrap_err();
        assert!(matches!(err, Error::ReferentialViolation { .. }));
        assert!(store.get_employee("emp_new").unwrap().is_none());
    }

    #[test]
    fn test_insert_employee_unknown_manager() {
        let store = seeded_store();
        let employee = NewEmployee::new("emp_new", "Asha", "Rao", "asha@company.com", "dep_id_1", today())
            .with_manager("emp_ghost");
        assert!(matches!(
            store.insert_employee(&employee),
            Err(Error::ReferentialViolation { .. })
        ));
    }

    #[test]
    fn test_last_working_date_requires_resigned() {
        let store = seeded_store();
        let active_leaver = NewEmployee::new("emp_new", "Asha", "Rao", "asha@company.com", "dep_id_1", today())
            .with_status(EmploymentStatus::Active)
            .leaving_on(today());
        assert!(matches!(
            store.insert_employee(&active_leaver),
            Err(Error::ConstraintViolation { .. })
        ));

        let resigned = active_leaver.with_status(EmploymentStatus::Resigned);
        store.insert_employee(&resigned).unwrap();
        let stored = store.get_employee("emp_new").unwrap().unwrap();
        assert_eq!(stored.employment_status, EmploymentStatus::Resigned);
        assert_eq!(stored.last_working_date, Some(today()));
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let store = seeded_store();
        let existing = store.get_employee("emp_id_1").unwrap().unwrap();
        let clash = NewEmployee::new("emp_new", "Other", "Person", existing.email, "dep_id_1", today());
        assert!(matches!(
            store.insert_employee(&clash),
            Err(Error::ConstraintViolation { .. })
        ));
    }

    #[test]
    fn test_count_by_type_and_window() {
        let store = HrStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        let rows = text_rows(&["department_id", "department_name"], &[&["d1", "HR"]]);
        store.bulk_insert("departments", &rows, &strings(&["department_id", "department_name"])).unwrap();

        let d = |days: i64| today() + chrono::Duration::days(days);
        store.insert_employee(&NewEmployee::new("e1", "A", "A", "a@x", "d1", d(1))).unwrap();
        store
            .insert_employee(&NewEmployee::new("e2", "B", "B", "b@x", "d1", d(2)).with_type(EmployeeType::Experienced))
            .unwrap();
        store.insert_employee(&NewEmployee::new("e3", "C", "C", "c@x", "d1", d(30))).unwrap();

        let mut counts = store.count_by_type(LifecycleDate::Joining, today(), d(7)).unwrap();
        counts.sort();
        assert_eq!(counts, vec![("EXPERIENCED".to_string(), 1), ("FRESHER".to_string(), 1)]);

        let joiners = store.employees_in_window(LifecycleDate::Joining, today(), d(7)).unwrap();
        assert_eq!(joiners.iter().map(|e| e.employee_id.as_str()).collect::<Vec<_>>(), vec!["e1", "e2"]);
        assert!(store.employees_in_window(LifecycleDate::LastWorking, today(), d(7)).unwrap().is_empty());
    }

    #[test]
    fn test_workflow_filter() {
        let store = seeded_store();
        let all = store.workflow_tasks(None).unwrap();
        assert_eq!(all.len(), 10);
        let pending = store.workflow_tasks(Some("Pending")).unwrap();
        assert!(pending.iter().all(|t| t.status.as_deref() == Some("Pending")));
        assert!(all.windows(2).all(|w| w[0].due_date <= w[1].due_date));
    }

    #[test]
    fn test_reset_schema() {
        let store = seeded_store();
        store.reset_schema().unwrap();
        assert!(store.list_tables().unwrap().is_empty());
        assert!(!store.is_initialized().unwrap());
        assert_eq!(store.ensure_schema().unwrap(), SchemaState::Created);
        assert_eq!(store.count_rows("employees").unwrap(), 0);
    }

    #[test]
    fn test_open_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("hr.db");
        let err = HrStore::open(&path).err().unwrap();
        assert!(matches!(err, Error::StorageUnavailable(_)));
        assert!(!err.is_recoverable());
    }
}
