//! Recurrence projection for repeating transactions.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How often a recurring transaction repeats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Parses a stored frequency.
    ///
    /// Unknown values yield `None`, which callers treat exactly like a
    /// non-recurring row: no projected due date.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Projects the next due date after `from`.
    ///
    /// Month and year steps clamp to the last valid day of the target month,
    /// so `2024-01-31 + 1 month = 2024-02-29`. Returns `None` only when the
    /// projected date would fall outside the representable calendar range.
    pub fn next_date(self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Daily => from.checked_add_days(Days::new(1)),
            Self::Weekly => from.checked_add_days(Days::new(7)),
            Self::Monthly => from.checked_add_months(Months::new(1)),
            Self::Yearly => from.checked_add_months(Months::new(12)),
        }
    }
}

/// Due-date projection applied on every transaction write.
///
/// A recurring transaction always gets its due date re-derived from
/// `date + frequency`; a client-supplied `next_due_date` only survives on
/// non-recurring rows.
pub(crate) fn project_next_due(
    date: NaiveDate,
    is_recurring: bool,
    frequency: Option<Frequency>,
    supplied: Option<NaiveDate>,
) -> Option<NaiveDate> {
    if is_recurring {
        frequency.and_then(|frequency| frequency.next_date(date))
    } else {
        supplied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_and_weekly_steps() {
        assert_eq!(
            Frequency::Daily.next_date(date(2024, 3, 31)),
            Some(date(2024, 4, 1))
        );
        assert_eq!(
            Frequency::Weekly.next_date(date(2024, 2, 26)),
            Some(date(2024, 3, 4))
        );
    }

    #[test]
    fn monthly_clamps_to_last_valid_day() {
        assert_eq!(
            Frequency::Monthly.next_date(date(2024, 1, 31)),
            Some(date(2024, 2, 29))
        );
        assert_eq!(
            Frequency::Monthly.next_date(date(2023, 1, 31)),
            Some(date(2023, 2, 28))
        );
        assert_eq!(
            Frequency::Monthly.next_date(date(2024, 3, 31)),
            Some(date(2024, 4, 30))
        );
    }

    #[test]
    fn yearly_adds_a_calendar_year() {
        assert_eq!(
            Frequency::Yearly.next_date(date(2023, 6, 15)),
            Some(date(2024, 6, 15))
        );
        // Feb 29 clamps to Feb 28 in a non-leap target year.
        assert_eq!(
            Frequency::Yearly.next_date(date(2024, 2, 29)),
            Some(date(2025, 2, 28))
        );
    }

    #[test]
    fn unknown_frequency_parses_to_none() {
        assert_eq!(Frequency::parse("fortnightly"), None);
        assert_eq!(Frequency::parse("MONTHLY"), None);
        assert_eq!(Frequency::parse("monthly"), Some(Frequency::Monthly));
    }

    #[test]
    fn projection_ignores_supplied_date_for_recurring_rows() {
        let supplied = Some(date(2030, 1, 1));
        assert_eq!(
            project_next_due(date(2024, 1, 31), true, Some(Frequency::Monthly), supplied),
            Some(date(2024, 2, 29))
        );
        assert_eq!(
            project_next_due(date(2024, 1, 31), false, None, supplied),
            supplied
        );
        // Recurring without a recognized frequency projects nothing.
        assert_eq!(project_next_due(date(2024, 1, 31), true, None, supplied), None);
    }
}
