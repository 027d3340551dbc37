//! Calendar helpers for delinquency ageing
//!
//! Delinquency is measured in whole calendar days between a due date and the
//! valuation date. Regulatory thresholds expressed in months use the
//! convention of 30-day months.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Days in a regulatory month
pub const DAYS_PER_MONTH: u32 = 30;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },
}

/// Signed number of days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Days elapsed since `since`, clamped at zero for future dates
pub fn elapsed_days(since: NaiveDate, today: NaiveDate) -> u32 {
    u32::try_from(days_between(since, today).max(0)).unwrap_or(u32::MAX)
}

/// Days a payment is overdue: `max(0, today - due_date)`
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use core_kernel::temporal::days_overdue;
///
/// let due = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let today = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
/// assert_eq!(days_overdue(today, due), 95);
/// assert_eq!(days_overdue(due, today), 0);
/// ```
pub fn days_overdue(today: NaiveDate, due_date: NaiveDate) -> u32 {
    elapsed_days(due_date, today)
}

/// Whole regulatory months contained in a number of days
pub fn whole_months(days: u32) -> u32 {
    days / DAYS_PER_MONTH
}

/// An inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Range covering `start` and the `days` days that follow it
    pub fn starting_at(start: NaiveDate, days: u32) -> Self {
        let end = start
            .checked_add_days(chrono::Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        days_between(self.start, self.end)
    }

    /// Days left until the end of the range, zero once it has passed
    pub fn days_remaining(&self, today: NaiveDate) -> u32 {
        elapsed_days(today, self.end)
    }
}
