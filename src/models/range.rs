//! Closed date interval used by the report aggregator
//!
//! Both boundaries are inclusive: a transaction dated exactly on
//! `start` or `end` belongs to the range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive calendar date range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportRange {
    /// Create a range, rejecting an end before the start
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// The whole calendar year containing `date`
    pub fn calendar_year(year: i32) -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1).expect("January 1st always exists"),
            end: NaiveDate::from_ymd_opt(year, 12, 31).expect("December 31st always exists"),
        }
    }

    /// Inclusive containment check on both boundaries
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for ReportRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Error constructing a date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
        }
    }
}

impl std::error::Error for RangeError {}
