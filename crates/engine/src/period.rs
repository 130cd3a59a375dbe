//! Budget periods.
//!
//! A period is one calendar month. Its boundary dates are always derived
//! from `(month, year)`, never stored, so a stored row can never drift away
//! from the period it claims to cover.

use chrono::{Datelike, Months, NaiveDate};

use crate::{EngineError, ResultEngine};

/// A calendar month identified by `(month, year)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Period {
    start: NaiveDate,
}

impl Period {
    pub fn new(month: u32, year: i32) -> ResultEngine<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            EngineError::InvalidInput(format!("invalid budget period: {month}/{year}"))
        })?;
        Ok(Self { start })
    }

    /// The period containing `date`.
    pub fn of_date(date: NaiveDate) -> Self {
        Self {
            start: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// First day of the month.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the month (`start + 1 month - 1 day`).
    pub fn end(&self) -> NaiveDate {
        self.start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(self.start)
    }

    /// True when `date` falls inside `[start, end]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start() && date <= self.end()
    }
}
