use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use crate::utils::date::parse_date;
use crate::utils::time::{hhmm, parse_flexible_time};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, params};

const MIGRATION_EMPLOYEE_COLUMNS: &str = "20250301_0001_employee_profile_columns";
const MIGRATION_LEGACY_MEETINGS: &str = "20250301_0002_merge_legacy_meetings";

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        params![Local::now().to_rfc3339(), version, message],
    )?;
    Ok(())
}

/// Create the tables of the modern schema.
fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            department  TEXT NOT NULL DEFAULT '',
            phone       TEXT NOT NULL DEFAULT '',
            email       TEXT NOT NULL DEFAULT '',
            position    TEXT NOT NULL DEFAULT '',
            join_date   TEXT NOT NULL DEFAULT '',
            salary      TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS attendance (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            date          TEXT NOT NULL,          -- YYYY-MM-DD
            name          TEXT NOT NULL,
            arrival_time  TEXT NOT NULL,          -- HH:MM
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS appointments (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            organizer         TEXT NOT NULL,
            participant       TEXT NOT NULL,
            date              TEXT NOT NULL,      -- YYYY-MM-DD
            start_time        TEXT NOT NULL,      -- HH:MM
            duration_minutes  INTEGER NOT NULL DEFAULT 30,
            status            TEXT NOT NULL DEFAULT 'scheduled'
                              CHECK (status IN ('scheduled','cancelled')),
            created_at        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sms_outbox (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at  TEXT NOT NULL,
            recipient   TEXT NOT NULL,
            body        TEXT NOT NULL,
            status      TEXT NOT NULL CHECK (status IN ('queued','sent','failed')),
            error       TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_date_name ON attendance(date, name);
        CREATE INDEX IF NOT EXISTS idx_appointments_participant_date ON appointments(participant, date);
        CREATE INDEX IF NOT EXISTS idx_appointments_organizer_date ON appointments(organizer, date);
        "#,
    )?;
    Ok(())
}

/// Directory dumps imported from the old MySQL store only carry
/// `name, department, phone_number, email`. Add the profile columns and
/// copy `phone_number` into `phone`.
fn migrate_employee_columns(conn: &Connection) -> Result<()> {
    if migration_applied(conn, MIGRATION_EMPLOYEE_COLUMNS)? {
        return Ok(());
    }

    let mut added = Vec::new();
    for column in ["department", "phone", "email", "position", "join_date", "salary"] {
        if !column_exists(conn, "employees", column)? {
            conn.execute(
                &format!("ALTER TABLE employees ADD COLUMN {column} TEXT NOT NULL DEFAULT ''"),
                [],
            )?;
            added.push(column);
        }
    }

    if column_exists(conn, "employees", "phone_number")? {
        conn.execute(
            "UPDATE employees SET phone = IFNULL(phone_number, '') WHERE phone = ''",
            [],
        )?;
    }

    if !added.is_empty() {
        success(format!(
            "Migration applied: {} → added {} to employees",
            MIGRATION_EMPLOYEE_COLUMNS,
            added.join(", ")
        ));
    }

    mark_applied(
        conn,
        MIGRATION_EMPLOYEE_COLUMNS,
        "Employee profile columns aligned",
    )
}

/// Row of the legacy `meetings` table.
struct LegacyMeeting {
    person_name: Option<String>,
    visitor_name: Option<String>,
    meeting_date: Option<String>,
    meeting_time: Option<String>,
    status: Option<String>,
}

fn parse_legacy_date(s: &str) -> Option<NaiveDate> {
    parse_date(s.trim())
        .or_else(|| NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok())
        .or_else(|| NaiveDate::parse_from_str(s.trim(), "%B %d, %Y").ok())
}

/// Import the legacy `meetings` table into `appointments` and drop it.
fn migrate_legacy_meetings(conn: &Connection) -> AppResult<()> {
    if !table_exists(conn, "meetings")? || migration_applied(conn, MIGRATION_LEGACY_MEETINGS)? {
        return Ok(());
    }

    warning("Legacy meetings table detected, creating safety backup before migration...");

    let db_path: String = conn
        .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
        .unwrap_or_default();

    if !db_path.is_empty() {
        backup_before_migration(&db_path)?;
    } else {
        warning("Could not determine DB path, backup skipped.");
    }

    let legacy: Vec<LegacyMeeting> = {
        let mut stmt = conn.prepare(
            "SELECT person_name, visitor_name, meeting_date, meeting_time, status FROM meetings ORDER BY id ASC",
        )?;
        stmt.query_map([], |row| {
            Ok(LegacyMeeting {
                person_name: row.get(0)?,
                visitor_name: row.get(1)?,
                meeting_date: row.get(2)?,
                meeting_time: row.get(3)?,
                status: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?
    };

    let tx = conn.unchecked_transaction()?;
    let mut imported = 0usize;
    let mut skipped = 0usize;

    for m in legacy {
        let participant = m.person_name.unwrap_or_default();
        let date = m.meeting_date.as_deref().and_then(parse_legacy_date);
        let time = m.meeting_time.as_deref().and_then(parse_flexible_time);

        let (Some(date), Some(time)) = (date, time) else {
            skipped += 1;
            continue;
        };
        if participant.trim().is_empty() {
            skipped += 1;
            continue;
        }

        let status = match m.status.as_deref().map(str::to_lowercase) {
            Some(s) if s.contains("cancel") => "cancelled",
            _ => "scheduled",
        };

        tx.execute(
            "INSERT INTO appointments (organizer, participant, date, start_time, duration_minutes, status, created_at)
             VALUES (?1, ?2, ?3, ?4, 30, ?5, ?6)",
            params![
                m.visitor_name.unwrap_or_else(|| "Visitor".to_string()),
                participant.trim(),
                date.format("%Y-%m-%d").to_string(),
                hhmm(time),
                status,
                Local::now().to_rfc3339(),
            ],
        )?;
        imported += 1;
    }

    tx.execute_batch("DROP TABLE meetings;")?;
    mark_applied(
        &tx,
        MIGRATION_LEGACY_MEETINGS,
        &format!("Imported {imported} legacy meetings, skipped {skipped}"),
    )?;
    tx.commit()?;

    success(format!(
        "Migration applied: {} → imported {} meetings ({} skipped)",
        MIGRATION_LEGACY_MEETINGS, imported, skipped
    ));

    Ok(())
}

fn backup_before_migration(db_path: &str) -> AppResult<()> {
    use std::fs::{self, File};
    use std::io::Write;
    use zip::CompressionMethod;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    let backup_name = format!(
        "{}-backup_db_pre_meetings_merge.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    );

    let parent = std::path::Path::new(db_path)
        .parent()
        .ok_or_else(|| AppError::Migration(format!("no parent directory for {db_path}")))?;
    let backup_path = parent.join(&backup_name);

    let file = File::create(&backup_path)
        .map_err(|e| AppError::Migration(format!("Backup failed (create): {e}")))?;

    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("database.sqlite", options)
        .map_err(|e| AppError::Migration(format!("Backup failed (start_file): {e}")))?;

    let db_content = fs::read(db_path)
        .map_err(|e| AppError::Migration(format!("Backup failed (read): {e}")))?;

    zip.write_all(&db_content)
        .map_err(|e| AppError::Migration(format!("Backup failed (write_all): {e}")))?;

    zip.finish()
        .map_err(|e| AppError::Migration(format!("Backup failed (finish): {e}")))?;

    success(format!("📦 Backup created: {}", backup_path.display()));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked whenever a command opens the database.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;
    create_tables(conn)?;
    migrate_employee_columns(conn)?;
    migrate_legacy_meetings(conn)?;
    Ok(())
}
