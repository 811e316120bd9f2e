//! Time indices for series values.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Position of a value on a series' time axis.
///
/// Yearly tables label their value columns with plain years; some agencies
/// publish exact dates instead. Years serialize as integers and dates as
/// ISO-8601 strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeIndex {
    Year(i32),
    Date(NaiveDate),
}

impl TimeIndex {
    /// Parses a column label as a time index.
    ///
    /// Accepts integer years (`1980`), integral numeric strings (`1980.0`)
    /// and ISO dates (`1980-06-30`).
    pub fn parse_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(year) = trimmed.parse::<i32>() {
            return Some(Self::Year(year));
        }
        if let Ok(number) = trimmed.parse::<f64>() {
            if number.is_finite() && number.fract() == 0.0 && number.abs() <= f64::from(i32::MAX) {
                return Some(Self::Year(number as i32));
            }
            return None;
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .map(Self::Date)
    }

    pub fn year(&self) -> i32 {
        match self {
            Self::Year(year) => *year,
            Self::Date(date) => date.year(),
        }
    }

    /// Converts the index to a calendar date, anchoring years on `start_day`.
    pub fn to_date(&self, start_day: StartDay) -> NaiveDate {
        match self {
            Self::Year(year) => start_day.in_year(*year),
            Self::Date(date) => *date,
        }
    }

    /// Label used for this index in wide tables.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TimeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for TimeIndex {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_label(s).ok_or_else(|| ModelError::InvalidTimeIndex(s.to_string()))
    }
}

/// Month and day used to turn a plain year into a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartDay {
    month: u32,
    day: u32,
}

impl StartDay {
    pub fn new(month: u32, day: u32) -> Result<Self> {
        // 2000 is a leap year, so 02-29 is accepted here.
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(ModelError::InvalidStartDay(format!("{month:02}-{day:02}")));
        }
        Ok(Self { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    fn in_year(self, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
            .or_else(|| NaiveDate::from_ymd_opt(year, self.month, 28))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl Default for StartDay {
    fn default() -> Self {
        Self { month: 1, day: 1 }
    }
}

impl FromStr for StartDay {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ModelError::InvalidStartDay(s.to_string());
        let (month, day) = s.trim().split_once('-').ok_or_else(invalid)?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        let day = day.parse::<u32>().map_err(|_| invalid())?;
        Self::new(month, day).map_err(|_| invalid())
    }
}

impl fmt::Display for StartDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}
