//! Display-date stamping.
//!
//! Dates on records are opaque `dd/mm/yyyy` strings. Nothing parses them
//! for logic; they are stamped here and echoed back to clients.

use chrono::{Local, NaiveDate};

/// `strftime` pattern for stamped dates (the en-GB short date form).
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Render a calendar date in display form.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Today's date in the server's local calendar, in display form.
pub fn today() -> String {
    format_display_date(Local::now().date_naive())
}
