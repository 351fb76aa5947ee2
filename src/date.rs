use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::limits::{MAX_YEAR, MIN_YEAR};

/// Canonical date key: `year * 10_000 + month * 100 + day`.
///
/// Printed as 8 zero-padded digits (`YYYYMMDD`), so numeric order and
/// lexicographic order of the printed form agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("year {0} out of range ({min}..={max})", min = MIN_YEAR, max = MAX_YEAR)]
    YearOutOfRange(i32),
    #[error("month {0} out of range (1..=12)")]
    MonthOutOfRange(i32),
    #[error("day {0} out of range (1..=31)")]
    DayOutOfRange(i32),
    #[error("checkout {checkout} is not after checkin {checkin}")]
    NonPositiveLength { checkin: DateKey, checkout: DateKey },
}

impl DateKey {
    /// Validate a raw (day, month, year) triple. Per-month day counts and
    /// leap years are not checked: `31 2 2024` is accepted.
    pub fn parse(day: i32, month: i32, year: i32) -> Result<Self, DateError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(DateError::MonthOutOfRange(month));
        }
        if !(1..=31).contains(&day) {
            return Err(DateError::DayOutOfRange(day));
        }
        Ok(Self(year as u32 * 10_000 + month as u32 * 100 + day as u32))
    }

    pub fn year(self) -> u32 {
        self.0 / 10_000
    }

    pub fn month(self) -> u32 {
        self.0 / 100 % 100
    }

    pub fn day(self) -> u32 {
        self.0 % 100
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08}", self.0)
    }
}

pub fn compare(a: DateKey, b: DateKey) -> Ordering {
    a.cmp(&b)
}

/// Flat day count: 365 days per year, 30 per month. Not calendar-accurate.
pub fn length_in_days(checkin: DateKey, checkout: DateKey) -> Result<u32, DateError> {
    let years = checkout.year() as i64 - checkin.year() as i64;
    let months = checkout.month() as i64 - checkin.month() as i64;
    let days = checkout.day() as i64 - checkin.day() as i64;
    let total = years * 365 + months * 30 + days;
    if total <= 0 {
        return Err(DateError::NonPositiveLength { checkin, checkout });
    }
    Ok(total as u32)
}

/// Half-open overlap of `[a_start, a_end)` and `[b_start, b_end)`.
pub fn overlaps(a_start: DateKey, a_end: DateKey, b_start: DateKey, b_end: DateKey) -> bool {
    !(a_end <= b_start || b_end <= a_start)
}

/// A validated stay period with its billed-day count cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub checkin: DateKey,
    pub checkout: DateKey,
    pub billed_days: u32,
}

impl Period {
    pub fn new(checkin: DateKey, checkout: DateKey) -> Result<Self, DateError> {
        let billed_days = length_in_days(checkin, checkout)?;
        Ok(Self {
            checkin,
            checkout,
            billed_days,
        })
    }

    pub fn overlaps(&self, checkin: DateKey, checkout: DateKey) -> bool {
        overlaps(self.checkin, self.checkout, checkin, checkout)
    }
}
