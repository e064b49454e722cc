use crate::errors::{AppError, AppResult};
use crate::models::appointment::{Appointment, AppointmentStatus};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const COLUMNS: &str =
    "id, organizer, participant, date, start_time, duration_minutes, status, created_at";

fn conversion_error(e: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

pub fn map_row(row: &Row) -> Result<Appointment> {
    let date_str: String = row.get("date")?;
    let time_str: String = row.get("start_time")?;
    let status_str: String = row.get("status")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(AppError::InvalidDate(date_str.clone())))?;
    let start = NaiveTime::parse_from_str(&time_str, "%H:%M")
        .map_err(|_| conversion_error(AppError::InvalidTime(time_str.clone())))?;
    let status = AppointmentStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(AppError::InvalidStatus(status_str.clone())))?;

    Ok(Appointment {
        id: row.get("id")?,
        organizer: row.get("organizer")?,
        participant: row.get("participant")?,
        date,
        start,
        duration_minutes: row.get("duration_minutes")?,
        status,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_appointment(conn: &Connection, a: &Appointment) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO appointments (organizer, participant, date, start_time, duration_minutes, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            a.organizer,
            a.participant,
            a.date_str(),
            a.time_str(),
            a.duration_minutes,
            a.status.to_db_str(),
            a.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_appointment(conn: &Connection, id: i64) -> Result<Option<Appointment>> {
    let sql = format!("SELECT {COLUMNS} FROM appointments WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.query_row([id], map_row).optional()
}

pub fn set_status(conn: &Connection, id: i64, status: AppointmentStatus) -> Result<usize> {
    conn.execute(
        "UPDATE appointments SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )
}

/// Scheduled appointments of a participant on one day, by start time.
pub fn scheduled_for_participant(
    conn: &Connection,
    participant: &str,
    date: &NaiveDate,
) -> Result<Vec<Appointment>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM appointments
         WHERE LOWER(participant) = LOWER(?1) AND date = ?2 AND status = 'scheduled'
         ORDER BY start_time ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(
        params![participant.trim(), date.format("%Y-%m-%d").to_string()],
        map_row,
    )?;
    rows.collect::<Result<Vec<_>>>()
}

/// Scheduled appointments involving `person` (as organizer or participant)
/// on or after `from`, in chronological order.
pub fn scheduled_involving(
    conn: &Connection,
    person: &str,
    from: &NaiveDate,
) -> Result<Vec<Appointment>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM appointments
         WHERE (LOWER(organizer) = LOWER(?1) OR LOWER(participant) = LOWER(?1))
           AND date >= ?2 AND status = 'scheduled'
         ORDER BY date ASC, start_time ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(
        params![person.trim(), from.format("%Y-%m-%d").to_string()],
        map_row,
    )?;
    rows.collect::<Result<Vec<_>>>()
}

/// All appointments, optionally filtered by person and/or date.
pub fn list_appointments(
    conn: &Connection,
    person: Option<&str>,
    date: Option<&NaiveDate>,
) -> Result<Vec<Appointment>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM appointments
         WHERE (?1 IS NULL OR LOWER(organizer) = LOWER(?1) OR LOWER(participant) = LOWER(?1))
           AND (?2 IS NULL OR date = ?2)
         ORDER BY date ASC, start_time ASC, id ASC"
    );
    let date_str = date.map(|d| d.format("%Y-%m-%d").to_string());
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![person, date_str], map_row)?;
    rows.collect::<Result<Vec<_>>>()
}
