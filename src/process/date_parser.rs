use chrono::NaiveDate;

use super::utils::strip_annotations;

/// Month-day shapes seen in listing tables, with the year already appended.
const FORMATS: &[&str] = &["%B %d %Y", "%d %B %Y"];

/// Parse a month-day cell such as `"January 6[1]"` in the given `year`.
///
/// Annotations are stripped and the year is appended before parsing; any text
/// that still does not read as a calendar date yields `None`.
pub fn parse_chart_date(raw: &str, year: i32) -> Option<NaiveDate> {
    let cleaned = strip_annotations(raw);
    if cleaned.is_empty() {
        return None;
    }
    let candidate = format!("{cleaned} {year}");
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&candidate, fmt).ok())
}

/// Parse a serialized date: `YYYY-MM-DD`, optionally followed by a time of day.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    let day = s.split(|c: char| c == ' ' || c == 'T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
