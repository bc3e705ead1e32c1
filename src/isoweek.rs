use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use std::fmt;

use crate::error::{Error, ErrorKind, Result};

/// A week in the ISO 8601 week numbering.
///
/// Week 1 is the week containing January 4th, so the Monday of week 1 can
/// lie in the last days of December of the preceding year, and the last
/// days of December can belong to week 1 of the following year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoWeek {
    year: i32,
    week: u32,
}

impl IsoWeek {
    pub fn new(year: i32, week: u32) -> Result<Self> {
        let iso_week = IsoWeek { year, week };
        iso_week.monday()?;
        Ok(iso_week)
    }

    pub fn of(date: &NaiveDate) -> Self {
        let week = date.iso_week();
        IsoWeek {
            year: week.year(),
            week: week.week(),
        }
    }

    pub fn current() -> Self {
        IsoWeek::of(&Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// The Monday starting this week.
    pub fn monday(&self) -> Result<NaiveDate> {
        monday_of(self.year, self.week)
    }

    /// The week `weeks` calendar weeks after this one.
    pub fn advanced(&self, weeks: u64) -> Result<Self> {
        let monday = self.monday()?;
        weeks
            .checked_mul(7)
            .and_then(|days| monday.checked_add_days(Days::new(days)))
            .map(|date| IsoWeek::of(&date))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::DateResolution,
                    &format!("{} advanced by {} weeks is out of range", self, weeks),
                )
            })
    }

    /// Name of the file rendered for a page starting with this week.
    pub fn file_stem(&self) -> String {
        format!("{:04}-W{:02}", self.year, self.week)
    }
}

impl fmt::Display for IsoWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

/// Resolves an ISO (year, week) pair to the Monday starting that week.
pub fn monday_of(year: i32, week: u32) -> Result<NaiveDate> {
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).ok_or_else(|| {
        Error::new(
            ErrorKind::DateResolution,
            &format!("year {} has no week {}", year, week),
        )
    })
}
