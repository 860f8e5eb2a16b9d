//! Dashboard aggregates

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use crate::model::{Employee, EmployeeType};
use crate::{Error, Result};

/// An inclusive date range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidValue(format!(
                "window start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// `start` plus the following `days` days
    pub fn starting(start: NaiveDate, days: u32) -> Result<Self> {
        let end = start
            .checked_add_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| {
                Error::InvalidValue(format!("{} days after {} is out of range", days, start))
            })?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Head count split by hiring track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    pub total: usize,
    pub freshers: usize,
    pub experienced: usize,
}

impl TypeBreakdown {
    /// Fold `(employee_type, count)` pairs as returned by the store
    pub fn from_counts(counts: &[(String, usize)]) -> Self {
        let mut breakdown = Self::default();
        for (kind, n) in counts {
            breakdown.total += n;
            match kind.parse::<EmployeeType>() {
                Ok(EmployeeType::Fresher) => breakdown.freshers += n,
                Ok(EmployeeType::Experienced) => breakdown.experienced += n,
                Err(_) => tracing::warn!("unrecognised employee type in counts: {}", kind),
            }
        }
        breakdown
    }
}

/// Everything the home page shows for a window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardCounts {
    pub window: DateWindow,
    pub onboarding: TypeBreakdown,
    pub offboarding: TypeBreakdown,
    pub table_counts: Vec<TableCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCount {
    pub table: String,
    pub rows: usize,
}

impl DashboardCounts {
    pub fn rows_in(&self, table: &str) -> Option<usize> {
        self.table_counts
            .iter()
            .find(|c| c.table == table)
            .map(|c| c.rows)
    }
}

/// Dashboard counts plus the people behind them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub counts: DashboardCounts,
    pub joiners: Vec<Employee>,
    pub leavers: Vec<Employee>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_window_bounds() {
        let w = DateWindow::new(date("2026-10-19"), date("2026-10-26")).unwrap();
        assert!(w.contains(date("2026-10-19")));
        assert!(w.contains(date("2026-10-26")));
        assert!(!w.contains(date("2026-10-27")));
        assert!(DateWindow::new(date("2026-10-26"), date("2026-10-19")).is_err());
        assert_eq!(DateWindow::starting(date("2026-10-19"), 7).unwrap(), w);
    }

    #[test]
    fn test_window_past_calendar_end() {
        let err = DateWindow::starting(date("2026-10-19"), u32::MAX).unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
        assert!(DateWindow::starting(NaiveDate::MAX, 1).is_err());
        assert_eq!(DateWindow::starting(NaiveDate::MAX, 0).unwrap().end, NaiveDate::MAX);
    }

    #[test]
    fn test_breakdown_from_counts() {
        let b = TypeBreakdown::from_counts(&[
            ("FRESHER".to_string(), 2),
            ("EXPERIENCED".to_string(), 3),
        ]);
        assert_eq!(b, TypeBreakdown { total: 5, freshers: 2, experienced: 3 });
        assert_eq!(TypeBreakdown::from_counts(&[]), TypeBreakdown::default());
    }
}
