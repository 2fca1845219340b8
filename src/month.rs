//! Calendar-month windows and date arithmetic.
//!
//! The budget evaluator, the transaction query engine, and the monthly
//! report all restrict dates to the same inclusive calendar-month range, so
//! the window computation lives in one place.

use std::{fmt::Display, str::FromStr};

use time::{Date, Month, util::days_in_month};

use crate::Error;

/// A calendar month, parsed from the `YYYY-MM` form used in query strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: Month,
}

impl YearMonth {
    /// The inclusive date range covered by this month.
    pub fn range(self) -> MonthRange {
        let start = Date::from_calendar_date(self.year, self.month, 1)
            .expect("the first of the month is always a valid date");
        let end = Date::from_calendar_date(
            self.year,
            self.month,
            days_in_month(self.month, self.year),
        )
        .expect("the last day of the month is always a valid date");

        MonthRange { start, end }
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(text.to_owned());

        let (year_text, month_text) = text.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year_text.parse().map_err(|_| invalid())?;
        let month_number: u8 = month_text.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month_number).map_err(|_| invalid())?;

        Ok(Self { year, month })
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

/// An inclusive [first day, last day] date range for a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: Date,
    pub end: Date,
}

impl MonthRange {
    /// The month window containing `date`.
    pub fn containing(date: Date) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
        .range()
    }
}

/// Add whole calendar months to a date, clamping the day to the last day of
/// the target month. `Jan 31 + 1 month` is `Feb 28` (`Feb 29` in leap years).
pub fn add_months(date: Date, months: i32) -> Date {
    let zero_based = date.year() * 12 + (date.month() as i32 - 1) + months;
    let year = zero_based.div_euclid(12);
    let month = Month::try_from((zero_based.rem_euclid(12) + 1) as u8)
        .expect("months modulo twelve are in range");
    let day = date.day().min(days_in_month(month, year));

    Date::from_calendar_date(year, month, day)
        .expect("the clamped day is always a valid day of the month")
}

/// Add whole calendar years to a date, clamping `Feb 29` to `Feb 28` in
/// non-leap target years.
pub fn add_years(date: Date, years: i32) -> Date {
    add_months(date, years * 12)
}
