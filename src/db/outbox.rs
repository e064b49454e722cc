use crate::errors::AppResult;
use crate::models::sms::{Delivery, SmsMessage};
use chrono::Local;
use rusqlite::{Connection, Result, Row, params};

fn map_row(row: &Row) -> Result<SmsMessage> {
    let status: String = row.get("status")?;
    Ok(SmsMessage {
        id: row.get("id")?,
        created_at: row.get("created_at")?,
        recipient: row.get("recipient")?,
        body: row.get("body")?,
        status: Delivery::from_db_str(&status).unwrap_or(Delivery::Failed),
        error: row.get("error")?,
    })
}

pub fn record_sms(
    conn: &Connection,
    recipient: &str,
    body: &str,
    status: Delivery,
    error: &str,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO sms_outbox (created_at, recipient, body, status, error)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            Local::now().to_rfc3339(),
            recipient,
            body,
            status.to_db_str(),
            error
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent messages first.
pub fn list_sms(conn: &Connection, limit: usize) -> Result<Vec<SmsMessage>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, created_at, recipient, body, status, error FROM sms_outbox
         ORDER BY id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map([limit as i64], map_row)?;
    rows.collect::<Result<Vec<_>>>()
}
