//! Record types for the employee lifecycle
//!
//! An employee moves through three employment states:
//! - `Prejoin`: offer accepted, joining date in the future
//! - `Active`: joined
//! - `Resigned`: resignation accepted, last working date set
//!
//! Everything else (offers, assets, trainings, clearance) hangs off the
//! employee row by foreign key and is stored as plain table rows.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hiring track of an employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeType {
    Fresher,
    Experienced,
}

impl EmployeeType {
    pub const ALL: [EmployeeType; 2] = [EmployeeType::Fresher, EmployeeType::Experienced];

    /// Get the stored representation of the employee type
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeType::Fresher => "FRESHER",
            EmployeeType::Experienced => "EXPERIENCED",
        }
    }
}

impl FromStr for EmployeeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FRESHER" => Ok(EmployeeType::Fresher),
            "EXPERIENCED" => Ok(EmployeeType::Experienced),
            _ => Err(Error::InvalidValue(format!("unknown employee type: {}", s))),
        }
    }
}

impl std::fmt::Display for EmployeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position of an employee in the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentStatus {
    Prejoin,
    Active,
    Resigned,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Prejoin => "PREJOIN",
            EmploymentStatus::Active => "ACTIVE",
            EmploymentStatus::Resigned => "RESIGNED",
        }
    }

    /// Status implied by the lifecycle dates as of `today`
    pub fn derive(today: NaiveDate, joining_date: NaiveDate, last_working_date: Option<NaiveDate>) -> Self {
        if last_working_date.is_some() {
            EmploymentStatus::Resigned
        } else if joining_date > today {
            EmploymentStatus::Prejoin
        } else {
            EmploymentStatus::Active
        }
    }
}

impl FromStr for EmploymentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PREJOIN" => Ok(EmploymentStatus::Prejoin),
            "ACTIVE" => Ok(EmploymentStatus::Active),
            "RESIGNED" => Ok(EmploymentStatus::Resigned),
            _ => Err(Error::InvalidValue(format!("unknown employment status: {}", s))),
        }
    }
}

impl std::fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An employee row as read back from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub employee_type: EmployeeType,
    pub employment_status: EmploymentStatus,
    pub department_id: Option<String>,
    pub manager_id: Option<String>,
    pub hr_id: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub actual_joining_date: Option<NaiveDate>,
    pub last_working_date: Option<NaiveDate>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields required to insert an employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub employee_type: EmployeeType,
    pub employment_status: EmploymentStatus,
    pub department_id: String,
    pub manager_id: Option<String>,
    pub hr_id: Option<String>,
    pub joining_date: NaiveDate,
    pub actual_joining_date: Option<NaiveDate>,
    pub last_working_date: Option<NaiveDate>,
}

impl NewEmployee {
    /// A pre-joining employee with only the mandatory fields set
    pub fn new(
        employee_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        department_id: impl Into<String>,
        joining_date: NaiveDate,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            employee_type: EmployeeType::Fresher,
            employment_status: EmploymentStatus::Prejoin,
            department_id: department_id.into(),
            manager_id: None,
            hr_id: None,
            joining_date,
            actual_joining_date: None,
            last_working_date: None,
        }
    }

    pub fn with_type(mut self, employee_type: EmployeeType) -> Self {
        self.employee_type = employee_type;
        self
    }

    pub fn with_status(mut self, status: EmploymentStatus) -> Self {
        self.employment_status = status;
        self
    }

    pub fn with_manager(mut self, manager_id: impl Into<String>) -> Self {
        self.manager_id = Some(manager_id.into());
        self
    }

    /// Set the last working date. Callers must also mark the employee resigned.
    pub fn leaving_on(mut self, date: NaiveDate) -> Self {
        self.last_working_date = Some(date);
        self
    }
}

/// A generic workflow task attached to an employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTask {
    pub task_id: String,
    pub employee_id: String,
    pub task_type: Option<String>,
    pub assigned_to: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub metadata: Option<String>,
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_employee_type_parse() {
        assert_eq!("FRESHER".parse::<EmployeeType>().unwrap(), EmployeeType::Fresher);
        assert_eq!(" experienced ".parse::<EmployeeType>().unwrap(), EmployeeType::Experienced);
        assert!("intern".parse::<EmployeeType>().is_err());
    }

    #[test]
    fn test_status_round_trip_names() {
        for status in [EmploymentStatus::Prejoin, EmploymentStatus::Active, EmploymentStatus::Resigned] {
            assert_eq!(status.as_str().parse::<EmploymentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_derive() {
        let today = date("2026-10-19");
        assert_eq!(EmploymentStatus::derive(today, date("2026-10-25"), None), EmploymentStatus::Prejoin);
        assert_eq!(EmploymentStatus::derive(today, today, None), EmploymentStatus::Active);
        assert_eq!(
            EmploymentStatus::derive(today, date("2026-10-25"), Some(date("2026-10-22"))),
            EmploymentStatus::Resigned
        );
    }

    #[test]
    fn test_serde_uses_stored_names() {
        let json = serde_json::to_string(&EmployeeType::Experienced).unwrap();
        assert_eq!(json, "\"EXPERIENCED\"");
    }
}
