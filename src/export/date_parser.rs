use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// `"12 Jan 2024"`
static DAY_MON_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}\s+\w{3}\s+\d{4}$").expect("valid day-month-year regex"));
/// `"2024-01-12"`, optionally followed by a time and ` UTC`
static ISO_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("valid ISO prefix regex"));

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parse the two date grammars LinkedIn exports use:
///  - `DD Mon YYYY` → midnight on that day
///  - `YYYY-MM-DD[ HH:MM:SS][ UTC]`
///
/// Returns `None` for blank input, and `None` with a warning for anything else
/// it does not recognise. Never panics.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let parsed = if DAY_MON_YEAR.is_match(s) {
        parse_day_month_year(s)
    } else if ISO_PREFIX.is_match(s) {
        parse_iso(s)
    } else {
        None
    };

    if parsed.is_none() {
        warn!(raw = %s, "unrecognised date format");
    }
    parsed
}

/// Same as [`parse_date`] for optional cells.
pub fn parse_opt_date(raw: Option<&str>) -> Option<NaiveDateTime> {
    raw.and_then(parse_date)
}

fn parse_day_month_year(s: &str) -> Option<NaiveDateTime> {
    let mut parts = s.split_whitespace();
    let day: u32 = parts.next()?.parse().ok()?;
    let mon = parts.next()?.to_ascii_lowercase();
    let year: i32 = parts.next()?.parse().ok()?;

    let month = MONTHS.iter().position(|m| *m == mon)? as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    let cleaned = s.replace(" UTC", "");
    let cleaned = cleaned.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(cleaned, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
