//! Database schema definitions

/// Name of the marker table; never listed as a user table
pub const METADATA_TABLE: &str = "metadata";

/// Marker key written once the schema has been created (and optionally seeded)
pub const INITIALIZED_KEY: &str = "initialized";

/// SQL to create the metadata marker table
pub const CREATE_METADATA_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT
)
"#;

pub const CREATE_DEPARTMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS departments (
    department_id TEXT PRIMARY KEY NOT NULL,
    department_name TEXT
)
"#;

pub const CREATE_ROLES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS roles (
    role_id TEXT PRIMARY KEY NOT NULL,
    role_name TEXT,
    description TEXT
)
"#;

/// SQL to create the employees table
///
/// A last working date is only valid on a resigned employee. Lifecycle
/// dates are plain `YYYY-MM-DD`.
pub const CREATE_EMPLOYEES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    employee_id TEXT PRIMARY KEY NOT NULL,
    first_name TEXT,
    last_name TEXT,
    email TEXT UNIQUE,
    phone TEXT,
    employee_type TEXT NOT NULL CHECK (employee_type IN ('FRESHER', 'EXPERIENCED')),
    employment_status TEXT NOT NULL CHECK (employment_status IN ('PREJOIN', 'ACTIVE', 'RESIGNED')),
    department_id TEXT REFERENCES departments(department_id),
    manager_id TEXT REFERENCES employees(employee_id),
    hr_id TEXT,
    joining_date TEXT,
    actual_joining_date TEXT,
    last_working_date TEXT,
    created_at TEXT,
    updated_at TEXT,
    CHECK (last_working_date IS NULL OR employment_status = 'RESIGNED'),
    CHECK (joining_date IS NULL OR date(joining_date) IS joining_date),
    CHECK (actual_joining_date IS NULL OR date(actual_joining_date) IS actual_joining_date),
    CHECK (last_working_date IS NULL OR date(last_working_date) IS last_working_date)
)
"#;

pub const CREATE_OFFERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS offers (
    offer_id TEXT PRIMARY KEY NOT NULL,
    employee_id TEXT REFERENCES employees(employee_id) ON DELETE CASCADE,
    offer_status TEXT,
    joining_date_offered TEXT,
    joining_venue TEXT,
    confirmation_status TEXT,
    change_requested INTEGER,
    remarks TEXT
)
"#;

pub const CREATE_DOCUMENT_TYPES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS document_types (
    document_type_id TEXT PRIMARY KEY NOT NULL,
    name TEXT,
    mandatory_for TEXT,
    required_stage TEXT
)
"#;

pub const CREATE_EMPLOYEE_DOCUMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS employee_documents (
    emp_doc_id TEXT PRIMARY KEY NOT NULL,
    employee_id TEXT REFERENCES employees(employee_id) ON DELETE CASCADE,
    document_type_id TEXT REFERENCES document_types(document_type_id),
    file_path TEXT,
    verification_status TEXT,
    uploaded_at TEXT,
    verified_by TEXT
)
"#;

pub const CREATE_EMPLOYEE_ROLES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS employee_roles (
    employee_role_id TEXT PRIMARY KEY NOT NULL,
    employee_id TEXT REFERENCES employees(employee_id) ON DELETE CASCADE,
    role_id TEXT REFERENCES roles(role_id),
    assigned_at TEXT
)
"#;

pub const CREATE_ASSETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS assets (
    asset_id TEXT PRIMARY KEY NOT NULL,
    asset_type TEXT,
    asset_number TEXT,
    status TEXT
)
"#;

pub const CREATE_EMPLOYEE_ASSETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS employee_assets (
    employee_asset_id TEXT PRIMARY KEY NOT NULL,
    employee_id TEXT REFERENCES employees(employee_id) ON DELETE CASCADE,
    asset_id TEXT REFERENCES assets(asset_id),
    assigned_date TEXT,
    returned_date TEXT,
    asset_status TEXT
)
"#;

pub const CREATE_ACCESS_TYPES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS access_types (
    access_type_id TEXT PRIMARY KEY NOT NULL,
    access_name TEXT,
    role_based INTEGER
)
"#;

pub const CREATE_EMPLOYEE_ACCESS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS employee_access (
    emp_access_id TEXT PRIMARY KEY NOT NULL,
    employee_id TEXT REFERENCES employees(employee_id) ON DELETE CASCADE,
    access_type_id TEXT REFERENCES access_types(access_type_id),
    granted_date TEXT,
    revoked_date TEXT,
    status TEXT
)
"#;

pub const CREATE_TRAININGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS trainings (
    training_id TEXT PRIMARY KEY NOT NULL,
    training_name TEXT,
    training_type TEXT,
    created_by TEXT,
    link TEXT,
    description TEXT
)
"#;

pub const CREATE_EMPLOYEE_TRAININGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS employee_trainings (
    emp_training_id TEXT PRIMARY KEY NOT NULL,
    employee_id TEXT REFERENCES employees(employee_id) ON DELETE CASCADE,
    training_id TEXT REFERENCES trainings(training_id),
    assigned_by TEXT,
    status TEXT,
    completion_date TEXT
)
"#;

pub const CREATE_PROJECTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    project_id TEXT PRIMARY KEY NOT NULL,
    project_name TEXT,
    objective TEXT,
    start_date TEXT
)
"#;

pub const CREATE_EMPLOYEE_PROJECTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS employee_projects (
    emp_project_id TEXT PRIMARY KEY NOT NULL,
    employee_id TEXT REFERENCES employees(employee_id) ON DELETE CASCADE,
    project_id TEXT REFERENCES projects(project_id),
    onboarding_date TEXT,
    kt_link TEXT,
    kt_status TEXT
)
"#;

pub const CREATE_RESIGNATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS resignations (
    resignation_id TEXT PRIMARY KEY NOT NULL,
    employee_id TEXT REFERENCES employees(employee_id) ON DELETE CASCADE,
    resignation_date TEXT,
    reason TEXT,
    manager_comments TEXT,
    hr_comments TEXT,
    last_working_date TEXT,
    status TEXT
)
"#;

pub const CREATE_EXIT_INTERVIEWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS exit_interviews (
    exit_id TEXT PRIMARY KEY NOT NULL,
    employee_id TEXT REFERENCES employees(employee_id) ON DELETE CASCADE,
    interview_date TEXT,
    feedback TEXT,
    full_and_final_date TEXT,
    experience_letter_sent INTEGER
)
"#;

pub const CREATE_CLEARANCE_CHECKLIST_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS clearance_checklist (
    clearance_id TEXT PRIMARY KEY NOT NULL,
    employee_id TEXT REFERENCES employees(employee_id) ON DELETE CASCADE,
    asset_cleared INTEGER,
    access_revoked INTEGER,
    id_card_returned INTEGER,
    laptop_returned INTEGER,
    nda_signed INTEGER,
    manager_approved INTEGER,
    hr_approved INTEGER,
    completed_at TEXT
)
"#;

pub const CREATE_WORKFLOW_TASKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS workflow_tasks (
    task_id TEXT PRIMARY KEY NOT NULL,
    employee_id TEXT REFERENCES employees(employee_id) ON DELETE CASCADE,
    task_type TEXT,
    assigned_to TEXT,
    due_date TEXT,
    status TEXT,
    metadata TEXT,
    created_at TEXT,
    CHECK (due_date IS NULL OR date(due_date) IS due_date)
)
"#;

/// User tables in creation order (referenced tables first)
pub const USER_TABLES: &[(&str, &str)] = &[
    ("departments", CREATE_DEPARTMENTS_TABLE),
    ("roles", CREATE_ROLES_TABLE),
    ("employees", CREATE_EMPLOYEES_TABLE),
    ("offers", CREATE_OFFERS_TABLE),
    ("document_types", CREATE_DOCUMENT_TYPES_TABLE),
    ("employee_documents", CREATE_EMPLOYEE_DOCUMENTS_TABLE),
    ("employee_roles", CREATE_EMPLOYEE_ROLES_TABLE),
    ("assets", CREATE_ASSETS_TABLE),
    ("employee_assets", CREATE_EMPLOYEE_ASSETS_TABLE),
    ("access_types", CREATE_ACCESS_TYPES_TABLE),
    ("employee_access", CREATE_EMPLOYEE_ACCESS_TABLE),
    ("trainings", CREATE_TRAININGS_TABLE),
    ("employee_trainings", CREATE_EMPLOYEE_TRAININGS_TABLE),
    ("projects", CREATE_PROJECTS_TABLE),
    ("employee_projects", CREATE_EMPLOYEE_PROJECTS_TABLE),
    ("resignations", CREATE_RESIGNATIONS_TABLE),
    ("exit_interviews", CREATE_EXIT_INTERVIEWS_TABLE),
    ("clearance_checklist", CREATE_CLEARANCE_CHECKLIST_TABLE),
    ("workflow_tasks", CREATE_WORKFLOW_TASKS_TABLE),
];

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_employees_joining ON employees(joining_date)",
    "CREATE INDEX IF NOT EXISTS idx_employees_leaving ON employees(last_working_date)",
    "CREATE INDEX IF NOT EXISTS idx_employees_status ON employees(employment_status)",
    "CREATE INDEX IF NOT EXISTS idx_employees_department ON employees(department_id)",
    "CREATE INDEX IF NOT EXISTS idx_offers_employee ON offers(employee_id)",
    "CREATE INDEX IF NOT EXISTS idx_resignations_employee ON resignations(employee_id)",
    "CREATE INDEX IF NOT EXISTS idx_workflow_tasks_employee ON workflow_tasks(employee_id)",
    "CREATE INDEX IF NOT EXISTS idx_workflow_tasks_status ON workflow_tasks(status)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_METADATA_TABLE];
    stmts.extend(USER_TABLES.iter().map(|(_, ddl)| *ddl));
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

/// Quote an identifier for inclusion in SQL text.
///
/// Only ever applied to names that came out of the schema catalog.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
