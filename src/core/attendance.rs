//! Attendance book: one arrival per person per day.

use crate::db::attendance as store;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::models::attendance::AttendanceEntry;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rusqlite::Connection;
use std::collections::BTreeMap;

/// Record an arrival. Returns `false` when the person was already logged that day.
pub fn log_arrival(conn: &Connection, name: &str, now: NaiveDateTime) -> AppResult<bool> {
    let date = now.date();
    if !store::arrivals_for(conn, name, &date)?.is_empty() {
        tracing::debug!(%name, %date, "arrival already recorded");
        return Ok(false);
    }

    let arrival_time = NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now.time());
    let entry = AttendanceEntry {
        date,
        name: name.trim().to_string(),
        arrival_time,
    };
    store::insert_arrival(conn, &entry)?;

    ttlog_quiet(
        conn,
        "attendance",
        &entry.name,
        &format!("Arrived at {}", entry.time_str()),
    );
    tracing::info!(name = %entry.name, time = %entry.time_str(), "arrival logged");
    Ok(true)
}

/// Earliest arrival of `name` on `date`.
pub fn lookup(conn: &Connection, name: &str, date: NaiveDate) -> AppResult<Option<NaiveTime>> {
    Ok(store::arrivals_for(conn, name, &date)?
        .into_iter()
        .map(|e| e.arrival_time)
        .min())
}

/// Everyone present on `date`, earliest arrival per name, sorted by name.
pub fn present_on(conn: &Connection, date: NaiveDate) -> AppResult<Vec<AttendanceEntry>> {
    let mut first: BTreeMap<String, AttendanceEntry> = BTreeMap::new();
    for e in store::arrivals_on(conn, &date)? {
        let key = e.name.to_lowercase();
        match first.get(&key) {
            Some(existing) if existing.arrival_time <= e.arrival_time => {}
            _ => {
                first.insert(key, e);
            }
        }
    }
    Ok(first.into_values().collect())
}

/// Remove a wrongly logged arrival (identity correction).
pub fn remove_arrival(conn: &Connection, name: &str, date: NaiveDate) -> AppResult<usize> {
    let n = store::delete_arrivals(conn, name, &date)?;
    if n > 0 {
        ttlog_quiet(conn, "attendance_fix", name, &format!("Removed arrival on {date}"));
    }
    Ok(n)
}
