//! Date formatting helpers for the comment sidebar.
//!
//! PDF dates have the form `D:YYYYMMDDHHmmSSOHH'mm'` where every field after the year is
//! optional and `O` is `+`, `-` or `Z`. The sidebar shows dates as `YYYY-MM-DD HH:mm:ss` in
//! the wall-clock time recorded in the document.

use crate::{RecordedDate, Timestamp};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use std::fmt;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Short display form of a date, in the date's own offset.
pub fn display_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    date.format(DISPLAY_FORMAT).to_string()
}

/// Raw PDF date string for a timestamp, always in UTC.
pub fn to_pdf_date(timestamp: Timestamp) -> String {
    timestamp.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// Convert a raw PDF date string to its display form.
///
/// Strings that are not PDF dates are returned unchanged.
pub fn format_pdf_date(raw: &str) -> String {
    match parse_wall_clock(raw) {
        Some(parsed) => parsed.format(DISPLAY_FORMAT).to_string(),
        None => raw.to_owned(),
    }
}

/// Parse a raw PDF date, keeping the UTC offset it was recorded with.
///
/// A missing offset is read as UTC.
pub fn parse_pdf_date(raw: &str) -> Option<RecordedDate> {
    let wall_clock = parse_wall_clock(raw)?;
    let offset = parse_offset(raw).unwrap_or_else(|| Utc.fix());
    offset.from_local_datetime(&wall_clock).single()
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let digits = raw.trim().strip_prefix("D:").unwrap_or(raw.trim());
    let start = digits.find(|c: char| !c.is_ascii_digit())?;
    let rest = &digits[start..];

    let sign = match rest.chars().next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };

    let numbers: String = rest[1..].chars().filter(char::is_ascii_digit).collect();
    let hours: i32 = numbers.get(0..2)?.parse().ok()?;
    let minutes: i32 = numbers.get(2..4).and_then(|m| m.parse().ok()).unwrap_or(0);

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    let digits = raw.trim().strip_prefix("D:").unwrap_or(raw.trim());
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    let (fields, _offset) = digits.split_at(end);

    if fields.len() < 4 {
        return None;
    }

    let field = |start: usize, len: usize, default: u32| -> Option<u32> {
        match fields.get(start..start + len) {
            Some(text) => text.parse().ok(),
            None => Some(default),
        }
    };

    let year = fields.get(0..4)?.parse::<i32>().ok()?;
    let month = field(4, 2, 1)?;
    let day = field(6, 2, 1)?;
    let hour = field(8, 2, 0)?;
    let minute = field(10, 2, 0)?;
    let second = field(12, 2, 0)?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}
