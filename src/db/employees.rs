use crate::errors::AppResult;
use crate::models::employee::Employee;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const COLUMNS: &str = "id, name, department, phone, email, position, join_date, salary";

pub fn map_row(row: &Row) -> Result<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        department: row.get("department")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        position: row.get("position")?,
        join_date: row.get("join_date")?,
        salary: row.get("salary")?,
    })
}

pub fn insert_employee(conn: &Connection, e: &Employee) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO employees (name, department, phone, email, position, join_date, salary)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            e.name,
            e.department,
            e.phone,
            e.email,
            e.position,
            e.join_date,
            e.salary
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Case-insensitive exact match, first row wins.
pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Employee>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM employees WHERE LOWER(name) = LOWER(?1) ORDER BY id ASC LIMIT 1"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.query_row([name.trim()], map_row).optional()
}

/// Match on the first word of the stored name ("Ramu" → "Ramu Kumar").
pub fn find_by_first_name(conn: &Connection, first: &str) -> Result<Option<Employee>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM employees
         WHERE LOWER(name) LIKE LOWER(?1) || ' %' ESCAPE '\\'
         ORDER BY id ASC LIMIT 1"
    );
    let escaped = first
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.query_row([escaped], map_row).optional()
}

pub fn list_employees(conn: &Connection, department: Option<&str>) -> Result<Vec<Employee>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM employees
         WHERE (?1 IS NULL OR LOWER(department) = LOWER(?1))
         ORDER BY name ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![department], map_row)?;
    rows.collect::<Result<Vec<_>>>()
}

pub fn delete_employee(conn: &Connection, name: &str) -> Result<usize> {
    conn.execute(
        "DELETE FROM employees WHERE LOWER(name) = LOWER(?1)",
        [name.trim()],
    )
}
