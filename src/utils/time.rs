//! Time utilities: parsing HH:MM, clock formatting, interval checks.

use crate::errors::{AppError, AppResult};
use chrono::{Duration, NaiveTime};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Parse a stored or user supplied time: `HH:MM`, `HH:MM:SS`, `03:00 PM`, `3:00PM`.
pub fn parse_flexible_time(t: &str) -> Option<NaiveTime> {
    let s = t.trim().to_uppercase();
    ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p", "%I %p"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&s, fmt).ok())
}

pub fn parse_required_time(s: &str) -> AppResult<NaiveTime> {
    parse_flexible_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))
}

/// "9:05 AM" style, without the leading zero.
pub fn format_clock(t: NaiveTime) -> String {
    t.format("%-I:%M %p").to_string()
}

pub fn hhmm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// End of an interval starting at `start`, or None when it runs past midnight.
pub fn add_minutes(start: NaiveTime, minutes: i64) -> Option<NaiveTime> {
    let (end, wrapped) = start.overflowing_add_signed(Duration::minutes(minutes));
    if wrapped != 0 { None } else { Some(end) }
}

/// Half-open interval overlap: [a_start, a_end) vs [b_start, b_end).
pub fn overlaps(a_start: NaiveTime, a_end: NaiveTime, b_start: NaiveTime, b_end: NaiveTime) -> bool {
    a_start < b_end && b_start < a_end
}
