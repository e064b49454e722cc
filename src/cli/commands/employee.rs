use crate::cli::parser::{Commands, EmployeeAction};
use crate::config::Config;
use crate::core::directory::{Directory, import_csv, mobile_of};
use crate::db::employees;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::table::Table;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Employee { action } = cmd else {
        return Ok(());
    };
    let pool = DbPool::open_initialized(&cfg.database)?;

    match action {
        EmployeeAction::Add {
            name,
            department,
            phone,
            email,
            position,
            join_date,
        } => {
            if name.trim().is_empty() {
                return Err(AppError::Other("employee name cannot be empty".into()));
            }
            let mut e = Employee::new(name, department, phone, email);
            e.position = position.trim().to_string();
            e.join_date = join_date.trim().to_string();

            if employees::find_by_name(&pool.conn, &e.name)?.is_some() {
                warning(format!(
                    "An employee named '{}' already exists; lookups return the first one.",
                    e.name
                ));
            }
            let id = employees::insert_employee(&pool.conn, &e)?;
            ttlog(&pool.conn, "employee_add", &e.name, &format!("Added employee #{id}"))?;
            success(format!("Employee '{}' added (id {id}).", e.name));
        }

        EmployeeAction::List { department } => {
            let rows = employees::list_employees(&pool.conn, department.as_deref())?;
            if rows.is_empty() {
                info("No employees found.");
                return Ok(());
            }
            let mut table = Table::new(&["ID", "NAME", "DEPARTMENT", "PHONE", "EMAIL", "POSITION"]);
            for e in rows {
                table.add_row(vec![
                    e.id.to_string(),
                    e.name,
                    e.department,
                    e.phone,
                    e.email,
                    e.position,
                ]);
            }
            print!("{}", table.render());
        }

        EmployeeAction::Show { name } => {
            let directory = Directory::new(cfg.employees_csv_path());
            let e = directory
                .search(&pool.conn, name)
                .ok_or_else(|| AppError::EmployeeNotFound(name.clone()))?;
            header(&e.name);
            println!("Department : {}", e.department);
            println!("Phone      : {}", e.phone);
            println!("Email      : {}", e.email);
            println!("Position   : {}", e.position);
            println!("Joined     : {}", e.join_date);
            match mobile_of(&e, &cfg.default_country_code) {
                Some(m) => println!("SMS to     : {m}"),
                None => println!("SMS to     : (no usable mobile number)"),
            }
        }

        EmployeeAction::Import { file } => {
            let (imported, skipped) = import_csv(&pool.conn, Path::new(file))?;
            success(format!("Imported {imported} employees ({skipped} skipped)."));
        }

        EmployeeAction::Del { name } => {
            let removed = employees::delete_employee(&pool.conn, name)?;
            if removed == 0 {
                return Err(AppError::EmployeeNotFound(name.clone()));
            }
            ttlog(&pool.conn, "employee_del", name, &format!("Deleted {removed} row(s)"))?;
            success(format!("Employee '{name}' deleted."));
        }
    }

    Ok(())
}
