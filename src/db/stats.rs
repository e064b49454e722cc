use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

fn count(pool: &DbPool, table: &str) -> rusqlite::Result<i64> {
    pool.conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    //
    // 2) ROW COUNTS
    //
    for (label, table) in [
        ("Employees", "employees"),
        ("Attendance rows", "attendance"),
        ("Appointments", "appointments"),
        ("SMS messages", "sms_outbox"),
    ] {
        let n = count(pool, table)?;
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, n, RESET);
    }

    //
    // 3) ATTENDANCE RANGE
    //
    let first_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM attendance ORDER BY date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let last_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM attendance ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    match (first_date, last_date) {
        (Some(f), Some(l)) => println!("{}• Attendance range:{} {} → {}", CYAN, RESET, f, l),
        _ => println!("{}• Attendance range:{} {}none{}", CYAN, RESET, GREY, RESET),
    }

    println!();
    Ok(())
}
