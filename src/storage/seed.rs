//! Demo data for a fresh store
//!
//! Ten employees with plausible onboarding dates in the next ten days, the
//! first three of whom leave within a week so the offboarding view has
//! something to show. Every dependent table gets at least one row per
//! employee. Randomness is injected so tests can pin it.

use chrono::{Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rusqlite::{params, Connection};
use crate::model::{EmployeeType, EmploymentStatus};
use crate::Result;

const HR_USER: &str = "HR_USER";

const DEPARTMENTS: &[&str] = &[
    "HR", "Engineering", "Finance", "Marketing", "Operations",
    "IT Support", "Sales", "Legal", "Customer Success", "R&D",
];

const ROLES: &[&str] = &[
    "HR Manager", "Team Lead", "Software Engineer", "DevOps", "Finance Analyst",
    "Marketing Manager", "Operations Lead", "Support Engineer", "Legal Advisor",
    "Product Manager",
];

const FIRST_NAMES: &[&str] = &[
    "Rahul", "Priya", "Amit", "Sneha", "Vikram", "Neha", "Arjun", "Pooja", "Karan", "Anjali",
];

const LAST_NAMES: &[&str] = &[
    "Sharma", "Mehta", "Verma", "Reddy", "Singh", "Kapoor", "Nair", "Iyer", "Malhotra", "Desai",
];

/// Reporting lines by employee index: 3-4 report to 1, 5-6 to 2, and so on
const MANAGERS: &[Option<usize>] = &[
    None, None, Some(0), Some(0), Some(1), Some(1), Some(2), Some(2), Some(3), Some(3),
];

/// How many of the seeded employees are leaving soon
const LEAVERS: usize = 3;

const ASSET_TYPES: &[&str] = &["Laptop", "Mobile", "Access Card", "Headset"];
const ACCESS_TYPES: &[&str] = &["Admin Panel", "Payroll", "Project Repo", "Email System"];
const TRAININGS: &[&str] = &["Safety", "Orientation", "Technical", "Compliance", "Leadership"];
const PROJECTS: &[&str] = &[
    "Website Revamp", "Mobile App", "CRM Integration", "Marketing Campaign", "Data Analytics",
];
const DOCUMENT_TYPES: &[&str] = &["ID Proof", "Address Proof", "Resume", "Offer Letter"];
const TASK_TYPES: &[&str] = &["Onboarding", "Offboarding", "Training", "Project"];
const PENDING_OR_DONE: &[&str] = &["Pending", "Completed"];

/// What a seed run wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SeedSummary {
    pub employees: usize,
    pub leavers: usize,
    pub rows: usize,
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn ids(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{}{}", prefix, i)).collect()
}

/// Insert the full demo data set. The caller owns the transaction and the marker.
pub fn insert_demo_data<R: Rng + ?Sized>(
    conn: &Connection,
    today: NaiveDate,
    rng: &mut R,
) -> Result<SeedSummary> {
    let now = Utc::now().to_rfc3339();
    let mut summary = SeedSummary::default();
    let day = |n: i64| today + Duration::days(n);

    // Reference tables
    let dept_ids = ids("dep_id_", DEPARTMENTS.len());
    for (id, name) in dept_ids.iter().zip(DEPARTMENTS) {
        conn.execute("INSERT INTO departments VALUES (?1, ?2)", params![id, name])?;
        summary.rows += 1;
    }

    let role_ids = ids("role_id_", ROLES.len());
    for (id, name) in role_ids.iter().zip(ROLES) {
        conn.execute(
            "INSERT INTO roles VALUES (?1, ?2, ?3)",
            params![id, name, format!("{} role", name)],
        )?;
        summary.rows += 1;
    }

    // Employees, managers first
    let employee_ids = ids("emp_id_", FIRST_NAMES.len());
    let mut leaving_dates = Vec::with_capacity(LEAVERS);
    for (i, emp_id) in employee_ids.iter().enumerate() {
        let joining = day(rng.gen_range(0..=10));
        let actual_joining = joining + Duration::days(1);
        let last_working = (i < LEAVERS).then(|| day(rng.gen_range(1..=7)));
        if let Some(date) = last_working {
            leaving_dates.push(date);
        }
        let status = EmploymentStatus::derive(today, joining, last_working);
        let employee_type = *EmployeeType::ALL.choose(rng).unwrap_or(&EmployeeType::Fresher);
        let first = FIRST_NAMES[i];
        let last = LAST_NAMES[i];

        conn.execute(
            "INSERT INTO employees (
                employee_id, first_name, last_name, email, phone, employee_type,
                employment_status, department_id, manager_id, hr_id,
                joining_date, actual_joining_date, last_working_date,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                emp_id,
                first,
                last,
                format!("{}.{}@company.com", first.to_lowercase(), last.to_lowercase()),
                format!("98765432{}", i + 10),
                employee_type.as_str(),
                status.as_str(),
                pick(rng, &dept_ids.iter().map(String::as_str).collect::<Vec<_>>()),
                MANAGERS[i].map(|m| employee_ids[m].as_str()),
                HR_USER,
                joining.to_string(),
                actual_joining.to_string(),
                last_working.map(|d| d.to_string()),
                now,
                now,
            ],
        )?;
        summary.employees += 1;
        summary.rows += 1;
    }
    summary.leavers = leaving_dates.len();

    for emp_id in &employee_ids {
        conn.execute(
            "INSERT INTO offers VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                format!("offer_{}", emp_id),
                emp_id,
                pick(rng, &["PENDING", "ACCEPTED", "REJECTED"]),
                day(rng.gen_range(0..=5)).to_string(),
                pick(rng, &["Office", "Home"]),
                pick(rng, &["CONFIRMED", "NOT_CONFIRMED"]),
                rng.gen_range(0..=1),
                "Remarks",
            ],
        )?;
        summary.rows += 1;
    }

    // Assets: ten devices cycling through the asset types, one per employee
    let asset_ids = ids("asset_", employee_ids.len());
    for (id, asset_type) in asset_ids.iter().zip(ASSET_TYPES.iter().cycle()) {
        conn.execute(
            "INSERT INTO assets VALUES (?1, ?2, ?3, ?4)",
            params![
                id,
                asset_type,
                format!("{}-{}", &asset_type[..3], rng.gen_range(1000..=9999)),
                "Assigned",
            ],
        )?;
        summary.rows += 1;
    }
    for (emp_id, asset_id) in employee_ids.iter().zip(&asset_ids) {
        conn.execute(
            "INSERT INTO employee_assets VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
            params![format!("emp_asset_{}", emp_id), emp_id, asset_id, today.to_string(), "Assigned"],
        )?;
        summary.rows += 1;
    }

    let access_ids = ids("access_", ACCESS_TYPES.len());
    for (id, name) in access_ids.iter().zip(ACCESS_TYPES) {
        conn.execute(
            "INSERT INTO access_types VALUES (?1, ?2, ?3)",
            params![id, name, rng.gen_range(0..=1)],
        )?;
        summary.rows += 1;
    }
    for (emp_id, access_id) in employee_ids.iter().zip(access_ids.iter().cycle()) {
        conn.execute(
            "INSERT INTO employee_access VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
            params![
                format!("emp_access_{}_{}", emp_id, access_id),
                emp_id,
                access_id,
                today.to_string(),
                "Active",
            ],
        )?;
        summary.rows += 1;
    }

    let training_ids = ids("train_", TRAININGS.len());
    for (id, name) in training_ids.iter().zip(TRAININGS) {
        conn.execute(
            "INSERT INTO trainings VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                name,
                "Mandatory",
                HR_USER,
                format!("http://link.com/{}", name.to_lowercase()),
                format!("{} training description", name),
            ],
        )?;
        summary.rows += 1;
    }
    let training_refs: Vec<&str> = training_ids.iter().map(String::as_str).collect();
    for emp_id in &employee_ids {
        conn.execute(
            "INSERT INTO employee_trainings VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                format!("emp_train_{}", emp_id),
                emp_id,
                pick(rng, &training_refs),
                HR_USER,
                pick(rng, PENDING_OR_DONE),
                day(rng.gen_range(1..=10)).to_string(),
            ],
        )?;
        summary.rows += 1;
    }

    let project_ids = ids("proj_", PROJECTS.len());
    for (id, name) in project_ids.iter().zip(PROJECTS) {
        conn.execute(
            "INSERT INTO projects VALUES (?1, ?2, ?3, ?4)",
            params![
                id,
                name,
                format!("Objective of {}", name),
                day(-rng.gen_range(10..=30)).to_string(),
            ],
        )?;
        summary.rows += 1;
    }
    let project_refs: Vec<&str> = project_ids.iter().map(String::as_str).collect();
    for emp_id in &employee_ids {
        let project_id = pick(rng, &project_refs);
        conn.execute(
            "INSERT INTO employee_projects VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                format!("emp_proj_{}", emp_id),
                emp_id,
                project_id,
                today.to_string(),
                format!("http://kt.com/{}", project_id),
                pick(rng, PENDING_OR_DONE),
            ],
        )?;
        summary.rows += 1;
    }

    let doc_ids = ids("doc_type_", DOCUMENT_TYPES.len());
    for (id, name) in doc_ids.iter().zip(DOCUMENT_TYPES) {
        conn.execute(
            "INSERT INTO document_types VALUES (?1, ?2, ?3, ?4)",
            params![id, name, "ALL", "Onboarding"],
        )?;
        summary.rows += 1;
    }
    let doc_refs: Vec<&str> = doc_ids.iter().map(String::as_str).collect();
    for emp_id in &employee_ids {
        let doc_id = pick(rng, &doc_refs);
        conn.execute(
            "INSERT INTO employee_documents VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                format!("emp_doc_{}", emp_id),
                emp_id,
                doc_id,
                format!("/files/{}_{}.pdf", emp_id, doc_id),
                pick(rng, &["Verified", "Pending"]),
                today.to_string(),
                HR_USER,
            ],
        )?;
        summary.rows += 1;
    }

    for (emp_id, role_id) in employee_ids.iter().zip(role_ids.iter().cycle()) {
        conn.execute(
            "INSERT INTO employee_roles VALUES (?1, ?2, ?3, ?4)",
            params![format!("emp_role_{}", emp_id), emp_id, role_id, today.to_string()],
        )?;
        summary.rows += 1;
    }

    // Offboarding paperwork for the leavers, dated to match their employee row
    for (emp_id, last_working) in employee_ids.iter().zip(&leaving_dates) {
        conn.execute(
            "INSERT INTO resignations VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                format!("res_{}", emp_id),
                emp_id,
                day(-rng.gen_range(1..=3)).to_string(),
                "Personal",
                "Manager approved",
                "HR approved",
                last_working.to_string(),
                "Approved",
            ],
        )?;
        conn.execute(
            "INSERT INTO exit_interviews VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                format!("exit_{}", emp_id),
                emp_id,
                today.to_string(),
                "Good experience",
                (*last_working + Duration::days(1)).to_string(),
                1,
            ],
        )?;
        conn.execute(
            "INSERT INTO clearance_checklist VALUES (?1, ?2, 1, 1, 1, 1, 1, 1, 1, ?3)",
            params![format!("clear_{}", emp_id), emp_id, today.to_string()],
        )?;
        summary.rows += 3;
    }

    for emp_id in &employee_ids {
        conn.execute(
            "INSERT INTO workflow_tasks VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                format!("task_{}", emp_id),
                emp_id,
                pick(rng, TASK_TYPES),
                HR_USER,
                day(rng.gen_range(1..=7)).to_string(),
                pick(rng, PENDING_OR_DONE),
                "{}",
                now,
            ],
        )?;
        summary.rows += 1;
    }

    tracing::debug!("demo data: {} rows", summary.rows);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::HrStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn seeded(seed: u64) -> (HrStore, SeedSummary) {
        let store = HrStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let summary = store.seed_demo_data(today(), &mut rng).unwrap().unwrap();
        (store, summary)
    }

    #[test]
    fn test_every_table_populated() {
        let (store, summary) = seeded(1);
        assert_eq!(summary.employees, 10);
        assert_eq!(summary.leavers, LEAVERS);
        let counts = store.table_counts().unwrap();
        assert!(counts.iter().all(|(_, n)| *n > 0), "{:?}", counts);
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, summary.rows);
    }

    #[test]
    fn test_dates_are_plausible() {
        for seed in 0..20 {
            let (store, _) = seeded(seed);
            for i in 1..=10 {
                let emp = store.get_employee(&format!("emp_id_{}", i)).unwrap().unwrap();
                let joining = emp.joining_date.unwrap();
                assert!(joining >= today() && joining <= today() + Duration::days(10));
                assert_eq!(emp.actual_joining_date, Some(joining + Duration::days(1)));
                match emp.last_working_date {
                    Some(lwd) => {
                        assert!(i <= LEAVERS);
                        assert!(lwd > today() && lwd <= today() + Duration::days(7));
                        assert_eq!(emp.employment_status, EmploymentStatus::Resigned);
                    }
                    None => assert!(i > LEAVERS),
                }
            }
        }
    }

    #[test]
    fn test_managers_resolve() {
        let (store, _) = seeded(3);
        let emp = store.get_employee("emp_id_10").unwrap().unwrap();
        assert_eq!(emp.manager_id.as_deref(), Some("emp_id_4"));
        assert!(store.get_employee("emp_id_1").unwrap().unwrap().manager_id.is_none());
    }

    #[test]
    fn test_resignation_matches_employee() {
        let (store, _) = seeded(5);
        let data = store.table_rows("resignations", 10).unwrap();
        let emp_col = data.columns.iter().position(|c| c == "employee_id").unwrap();
        let lwd_col = data.columns.iter().position(|c| c == "last_working_date").unwrap();
        assert_eq!(data.len(), LEAVERS);
        for row in &data.rows {
            let emp = store.get_employee(row[emp_col].as_str().unwrap()).unwrap().unwrap();
            assert_eq!(
                row[lwd_col].as_str().unwrap(),
                emp.last_working_date.unwrap().to_string()
            );
        }
    }
}
