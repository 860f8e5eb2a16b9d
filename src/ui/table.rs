use tabled::{builder::Builder, settings::Style, Table, Tabled};
use crate::model::{Employee, WorkflowTask};
use crate::storage::TableData;
use crate::upload::RowSet;

const MAX_CELL_WIDTH: usize = 40;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Two-column metric/value table
#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

/// Render rows read from any user table
pub fn data_table(data: &TableData) -> String {
    let mut builder = Builder::default();
    builder.push_record(data.columns.iter().cloned());
    for row in &data.rows {
        builder.push_record(row.iter().map(cell));
    }
    builder.build().with(Style::rounded()).to_string()
}

/// First `n` parsed upload rows, shown before they are written
pub fn preview_table(table: &str, rows: &RowSet, n: usize) -> String {
    data_table(&TableData {
        table: table.to_string(),
        columns: rows.columns.clone(),
        rows: rows.preview(n),
    })
}

pub fn employee_table(employees: &[Employee]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Type", "Status", "Department", "Joining", "Last day"]);
    for e in employees {
        builder.push_record([
            e.employee_id.clone(),
            e.full_name(),
            e.employee_type.to_string(),
            e.employment_status.to_string(),
            e.department_id.clone().unwrap_or_default(),
            date_cell(e.joining_date),
            date_cell(e.last_working_date),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn workflow_table(tasks: &[WorkflowTask]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Task", "Employee", "Type", "Assigned to", "Due", "Status"]);
    for t in tasks {
        builder.push_record([
            t.task_id.clone(),
            t.employee_id.clone(),
            t.task_type.clone().unwrap_or_default(),
            t.assigned_to.clone().unwrap_or_default(),
            date_cell(t.due_date),
            t.status.clone().unwrap_or_default(),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}

fn date_cell(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

fn cell(value: &serde_json::Value) -> String {
    let text = match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.chars().count() > MAX_CELL_WIDTH {
        let mut short: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        short.push('…');
        short
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_table() {
        assert!(stats_table(&[]).is_empty());
        let out = stats_table(&[("Tables", "19")]);
        assert!(out.contains("Metric"));
        assert!(out.contains("19"));
    }

    #[test]
    fn test_data_table_cells() {
        let data = TableData {
            table: "projects".into(),
            columns: vec!["project_id".into(), "objective".into()],
            rows: vec![vec![
                serde_json::json!("proj_1"),
                serde_json::Value::Null,
            ]],
        };
        let out = data_table(&data);
        assert!(out.contains("project_id"));
        assert!(out.contains("proj_1"));
        assert!(!out.contains("null"));

        let long = "x".repeat(100);
        assert_eq!(cell(&serde_json::json!(long)).chars().count(), MAX_CELL_WIDTH);
        assert_eq!(cell(&serde_json::json!(3)), "3");
    }

    #[test]
    fn test_preview_table_limits_rows() {
        let rows = crate::upload::parse_csv("project_id,project_name\nproj_a,Intranet\nproj_b,Payroll\n".as_bytes()).unwrap();
        let out = preview_table("projects", &rows, 1);
        assert!(out.contains("proj_a"));
        assert!(!out.contains("proj_b"));
    }
}
