use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceEntry;
use chrono::{Local, NaiveDate, NaiveTime};
use rusqlite::{Connection, Result, Row, params};

pub fn map_row(row: &Row) -> Result<AttendanceEntry> {
    let date_str: String = row.get("date")?;
    let time_str: String = row.get("arrival_time")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let arrival_time = NaiveTime::parse_from_str(&time_str, "%H:%M").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTime(time_str.clone())),
        )
    })?;

    Ok(AttendanceEntry {
        date,
        name: row.get("name")?,
        arrival_time,
    })
}

pub fn insert_arrival(conn: &Connection, entry: &AttendanceEntry) -> AppResult<()> {
    conn.execute(
        "INSERT INTO attendance (date, name, arrival_time, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            entry.date_str(),
            entry.name,
            entry.time_str(),
            Local::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// All rows for a date, ordered by arrival.
pub fn arrivals_on(conn: &Connection, date: &NaiveDate) -> Result<Vec<AttendanceEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT date, name, arrival_time FROM attendance
         WHERE date = ?1
         ORDER BY arrival_time ASC, id ASC",
    )?;
    let rows = stmt.query_map([date.format("%Y-%m-%d").to_string()], map_row)?;
    rows.collect::<Result<Vec<_>>>()
}

/// Rows for one person on a date (case-insensitive), ordered by arrival.
pub fn arrivals_for(conn: &Connection, name: &str, date: &NaiveDate) -> Result<Vec<AttendanceEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT date, name, arrival_time FROM attendance
         WHERE date = ?1 AND LOWER(name) = LOWER(?2)
         ORDER BY arrival_time ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![date.format("%Y-%m-%d").to_string(), name.trim()],
        map_row,
    )?;
    rows.collect::<Result<Vec<_>>>()
}

/// Rows between two dates, inclusive.
pub fn arrivals_between(
    conn: &Connection,
    from: &NaiveDate,
    to: &NaiveDate,
) -> Result<Vec<AttendanceEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT date, name, arrival_time FROM attendance
         WHERE date >= ?1 AND date <= ?2
         ORDER BY date ASC, arrival_time ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![
            from.format("%Y-%m-%d").to_string(),
            to.format("%Y-%m-%d").to_string()
        ],
        map_row,
    )?;
    rows.collect::<Result<Vec<_>>>()
}

pub fn delete_arrivals(conn: &Connection, name: &str, date: &NaiveDate) -> Result<usize> {
    conn.execute(
        "DELETE FROM attendance WHERE date = ?1 AND LOWER(name) = LOWER(?2)",
        params![date.format("%Y-%m-%d").to_string(), name.trim()],
    )
}
