//! Helpers for the calendar dates stored on transactions.

use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const MONTH_LABEL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [year]");
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day padding:none] [month repr:short] [year]");

/// Parse a `YYYY-MM-DD` date string.
///
/// Returns `None` for empty or malformed strings.
pub fn parse_date(text: &str) -> Option<Date> {
    Date::parse(text.trim(), DATE_FORMAT).ok()
}

/// The short month and year label used on charts, e.g. "Jan 2024".
pub fn format_month_label(date: Date) -> String {
    date.format(MONTH_LABEL_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Format a stored date string for display, e.g. "5 Jan 2024".
///
/// Missing and unparsable dates are shown as "-".
pub fn format_display_date(text: Option<&str>) -> String {
    match text.and_then(parse_date) {
        Some(date) => date
            .format(DISPLAY_DATE_FORMAT)
            .unwrap_or_else(|_| date.to_string()),
        None => "-".to_owned(),
    }
}

/// The current time as milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
