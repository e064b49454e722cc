//! Employee directory: SQLite first, CSV file as fallback.

use crate::db::employees;
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::models::employee::Employee;
use crate::utils::normalize_e164;
use csv::{ReaderBuilder, StringRecord, Trim};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub struct Directory {
    csv_path: Option<PathBuf>,
}

impl Directory {
    pub fn new(csv_path: Option<PathBuf>) -> Self {
        Self { csv_path }
    }

    /// Find an employee by name.
    ///
    /// Order: SQL exact → SQL first name → CSV exact → CSV first name.
    /// Lookup failures are logged and treated as "not found".
    pub fn search(&self, conn: &Connection, name: &str) -> Option<Employee> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        match employees::find_by_name(conn, name) {
            Ok(Some(e)) => return Some(e),
            Ok(None) => {}
            Err(e) => tracing::warn!(%name, error = %e, "directory lookup failed, trying CSV"),
        }

        if !name.contains(char::is_whitespace) {
            match employees::find_by_first_name(conn, name) {
                Ok(Some(e)) => return Some(e),
                Ok(None) => {}
                Err(e) => tracing::warn!(%name, error = %e, "first-name lookup failed"),
            }
        }

        self.search_csv(name)
    }

    fn search_csv(&self, name: &str) -> Option<Employee> {
        let path = self.csv_path.as_ref()?;
        let rows = match load_csv(path) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "CSV directory unreadable");
                return None;
            }
        };

        let wanted = name.to_lowercase();
        if let Some(e) = rows.iter().find(|e| e.name.to_lowercase() == wanted) {
            return Some(e.clone());
        }
        if name.contains(char::is_whitespace) {
            return None;
        }
        rows.into_iter()
            .find(|e| e.first_name().to_lowercase() == wanted && e.name.contains(' '))
    }

    /// Employees of a department, from SQL, or from the CSV when SQL has none.
    pub fn by_department(&self, conn: &Connection, department: &str) -> Vec<Employee> {
        match employees::list_employees(conn, Some(department.trim())) {
            Ok(rows) if !rows.is_empty() => return rows,
            Ok(_) => {}
            Err(e) => tracing::warn!(%department, error = %e, "department lookup failed"),
        }

        let Some(path) = self.csv_path.as_ref() else {
            return Vec::new();
        };
        load_csv(path)
            .map(|rows| {
                rows.into_iter()
                    .filter(|e| e.department.eq_ignore_ascii_case(department.trim()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// SMS-ready mobile number of an employee.
pub fn mobile_of(employee: &Employee, default_cc: &str) -> Option<String> {
    if employee.phone.trim().is_empty() {
        return None;
    }
    normalize_e164(&employee.phone, default_cc)
}

/// Read a directory CSV. Header names are matched case-insensitively.
pub fn load_csv(path: &Path) -> AppResult<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_path(path)?;

    let headers: StringRecord = rdr
        .headers()?
        .iter()
        .map(|h| h.to_lowercase().replace(' ', "_"))
        .collect();
    rdr.set_headers(headers);

    let mut out = Vec::new();
    for row in rdr.deserialize::<Employee>() {
        let e = row?;
        if !e.name.trim().is_empty() {
            out.push(e);
        }
    }
    Ok(out)
}

/// Copy every CSV row into the `employees` table; names already present are skipped.
pub fn import_csv(conn: &Connection, path: &Path) -> AppResult<(usize, usize)> {
    let rows = load_csv(path)?;
    let mut imported = 0;
    let mut skipped = 0;

    for e in rows {
        if employees::find_by_name(conn, &e.name)?.is_some() {
            skipped += 1;
            continue;
        }
        employees::insert_employee(conn, &e)?;
        imported += 1;
    }

    ttlog(
        conn,
        "employee_import",
        &path.display().to_string(),
        &format!("Imported {imported} employees, skipped {skipped}"),
    )?;

    Ok((imported, skipped))
}
