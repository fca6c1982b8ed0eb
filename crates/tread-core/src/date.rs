//! # Business Dates
//!
//! The store runs on **local calendar days**. Invoices are stamped with
//! local wall-clock time (`YYYY-MM-DD HH:MM:SS`, no timezone suffix) and
//! every report buckets on the local-date portion of that timestamp. This
//! is a documented contract, not an accident: day boundaries for a
//! single-site retailer are the shop's days, never UTC days.
//!
//! [`BusinessDate`] is the explicit local-date value used for report
//! parameters and date-range queries, replacing ad hoc string slicing.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Local Timestamps
// =============================================================================

/// Returns the current local wall-clock time, truncated to whole seconds.
///
/// Truncation keeps the stored text form at exactly
/// `YYYY-MM-DD HH:MM:SS`, which the date-bucketing queries rely on.
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

// =============================================================================
// BusinessDate
// =============================================================================

/// A local calendar date (`YYYY-MM-DD`).
///
/// Used for report parameters and invoice date-range queries. Comparisons
/// against stored timestamps happen on the date portion only, inclusive
/// on both ends.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
#[ts(export)]
pub struct BusinessDate(#[ts(as = "String")] NaiveDate);

impl BusinessDate {
    /// Wraps a calendar date.
    #[inline]
    pub const fn new(date: NaiveDate) -> Self {
        BusinessDate(date)
    }

    /// Today, by the local clock.
    pub fn today() -> Self {
        BusinessDate(Local::now().date_naive())
    }

    /// The date this timestamp falls on.
    #[inline]
    pub fn of(ts: NaiveDateTime) -> Self {
        BusinessDate(ts.date())
    }

    /// Returns the underlying calendar date.
    #[inline]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// This date shifted backwards by `days`.
    pub fn days_ago(&self, days: i64) -> Self {
        BusinessDate(self.0 - Duration::days(days))
    }

    /// (year, month, day) tuple.
    #[inline]
    pub fn ymd(&self) -> (i32, u32, u32) {
        (self.0.year(), self.0.month(), self.0.day())
    }
}

impl fmt::Display for BusinessDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for BusinessDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(BusinessDate)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "date".to_string(),
                reason: "expected YYYY-MM-DD".to_string(),
            })
    }
}

impl From<NaiveDate> for BusinessDate {
    fn from(date: NaiveDate) -> Self {
        BusinessDate(date)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
