use crate::error::CoreError;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// The (year, month) pair that scopes the month-bound statistics of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthSelector {
    year: i32,
    month: u32,
}

impl MonthSelector {
    /// Builds a selector, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidInput(
                "month".to_string(),
                format!("{month} is not between 1 and 12"),
            ));
        }
        Ok(Self { year, month })
    }

    /// The selector for the calendar month `at` falls in.
    pub fn containing(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// True when `ts` falls in this calendar month (UTC).
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts.year() == self.year && ts.month() == self.month
    }
}
