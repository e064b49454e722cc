use crate::cli::parser::{AttendanceAction, Commands};
use crate::config::Config;
use crate::core::attendance;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::messages::{info, success};
use crate::utils::date::date_arg_or_today;
use crate::utils::table::Table;
use crate::utils::time::{format_clock, parse_required_time};
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Attendance { action } = cmd else {
        return Ok(());
    };
    let mut pool = DbPool::open_initialized(&cfg.database)?;

    match action {
        AttendanceAction::Log { name, date, time } => {
            let now = Local::now().naive_local();
            let date = date_arg_or_today(date.as_deref())?;
            let time = match time {
                Some(t) => parse_required_time(t)?,
                None => now.time(),
            };

            if attendance::log_arrival(&pool.conn, name, date.and_time(time))? {
                success(format!("Arrival of {name} recorded at {}.", format_clock(time)));
            } else {
                info(format!("{name} was already recorded on {date}."));
            }
        }

        AttendanceAction::List { date } => {
            let date = date_arg_or_today(date.as_deref())?;
            let present = attendance::present_on(&pool.conn, date)?;
            if present.is_empty() {
                info(format!("No arrivals recorded on {date}."));
                return Ok(());
            }
            let mut table = Table::new(&["NAME", "ARRIVED"]);
            for e in present {
                table.add_row(vec![e.name.clone(), e.time_str()]);
            }
            println!("Arrivals on {date}:");
            print!("{}", table.render());
        }

        AttendanceAction::Export {
            format,
            file,
            range,
            force,
        } => {
            ExportLogic::export(&mut pool, *format, file, range.as_deref(), *force)?;
        }
    }

    Ok(())
}
