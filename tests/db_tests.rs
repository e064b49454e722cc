mod common;
use common::setup_test_db;
use rreception::db::appointments::list_appointments;
use rreception::db::employees::find_by_name;
use rreception::db::log::load_log;
use rreception::db::pool::DbPool;
use rreception::models::appointment::AppointmentStatus;
use rusqlite::{Connection, params};

/// A database as left by the old deployment: a bare employee dump and a
/// separate `meetings` table.
fn legacy_db(name: &str) -> String {
    let db_path = setup_test_db(name);
    let conn = Connection::open(&db_path).expect("open legacy db");
    conn.execute_batch(
        r#"
        CREATE TABLE employees (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL,
            department    TEXT NOT NULL DEFAULT '',
            phone_number  TEXT,
            email         TEXT NOT NULL DEFAULT ''
        );
        CREATE TABLE meetings (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            person_name   TEXT,
            visitor_name  TEXT,
            meeting_date  TEXT,
            meeting_time  TEXT,
            status        TEXT
        );
        "#,
    )
    .expect("legacy schema");

    conn.execute(
        "INSERT INTO employees (name, department, phone_number, email) VALUES (?1, ?2, ?3, ?4)",
        params!["Ramu Kumar", "Engineering", "9876543210", "ramu@example.com"],
    )
    .expect("legacy employee");

    for (person, visitor, date, time, status) in [
        (Some("Ramu Kumar"), Some("John"), "2025-10-20", "14:30", "scheduled"),
        (Some("Priya Sharma"), None, "20/10/2025", "3:00 PM", "Cancelled"),
        (Some(""), Some("X"), "2025-10-20", "10:00", "scheduled"),
        (Some("Alex"), Some("Y"), "someday", "10:00", "scheduled"),
    ] {
        conn.execute(
            "INSERT INTO meetings (person_name, visitor_name, meeting_date, meeting_time, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![person, visitor, date, time, status],
        )
        .expect("legacy meeting");
    }
    db_path
}

#[test]
fn test_legacy_meetings_are_merged_into_appointments() {
    let db_path = legacy_db("db_legacy_meetings");
    let pool = DbPool::open_initialized(&db_path).expect("migrate");

    let rows = list_appointments(&pool.conn, None, None).expect("list");
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].participant, "Ramu Kumar");
    assert_eq!(rows[0].organizer, "John");
    assert_eq!(rows[0].time_str(), "14:30");
    assert_eq!(rows[0].duration_minutes, 30);
    assert_eq!(rows[0].status, AppointmentStatus::Scheduled);

    assert_eq!(rows[1].participant, "Priya Sharma");
    assert_eq!(rows[1].organizer, "Visitor");
    assert_eq!(rows[1].date_str(), "2025-10-20");
    assert_eq!(rows[1].time_str(), "15:00");
    assert_eq!(rows[1].status, AppointmentStatus::Cancelled);

    let meetings_left: i64 = pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='meetings'",
            [],
            |row| row.get(0),
        )
        .expect("count");
    assert_eq!(meetings_left, 0);
}

#[test]
fn test_legacy_employee_columns_are_filled() {
    let db_path = legacy_db("db_legacy_employees");
    let pool = DbPool::open_initialized(&db_path).expect("migrate");

    let ramu = find_by_name(&pool.conn, "ramu kumar")
        .expect("query")
        .expect("employee kept");
    assert_eq!(ramu.phone, "9876543210");
    assert_eq!(ramu.position, "");
}

#[test]
fn test_migrations_run_once() {
    let db_path = legacy_db("db_migrations_once");
    drop(DbPool::open_initialized(&db_path).expect("first open"));
    let pool = DbPool::open_initialized(&db_path).expect("second open");

    assert_eq!(list_appointments(&pool.conn, None, None).expect("list").len(), 2);

    let applied = load_log(&pool.conn, Some("migration_applied")).expect("log");
    assert_eq!(applied.len(), 2);
}
