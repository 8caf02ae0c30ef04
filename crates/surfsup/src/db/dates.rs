use time::{macros::format_description, Date, Duration};

use super::Error;

/// Days between the latest observation and the start of the "last year" window
pub const CUTOFF_DAYS: i64 = 365;

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
}

/// Format a date the way the dataset stores it (`YYYY-MM-DD`)
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Start of the rolling one-year window ending at `latest`
pub fn cutoff_date(latest: Date) -> Result<Date, Error> {
    latest
        .checked_sub(Duration::days(CUTOFF_DAYS))
        .ok_or(Error::DateRange(latest))
}
