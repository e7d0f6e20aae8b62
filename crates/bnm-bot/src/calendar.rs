//! Business date arithmetic
//!
//! BNM publishes no rates on weekends, so a request made on Saturday or Sunday
//! is answered with Friday's rates.

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};

/// Date text format used by the upstream query string and in messages
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Roll a weekend date back to the preceding Friday
pub fn resolve(date: NaiveDate) -> NaiveDate {
    let back = match date.weekday() {
        Weekday::Sat => 1,
        Weekday::Sun => 2,
        _ => 0,
    };
    date - Days::new(back)
}

/// Business day immediately preceding the resolved business day of `today`
pub fn previous(today: NaiveDate) -> NaiveDate {
    resolve(resolve(today) - Days::new(1))
}

/// Format a date as `dd.mm.yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Source of the current calendar date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date of the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
