use crate::cli::parser::{AppointmentAction, Commands};
use crate::config::Config;
use crate::core::calendar::Calendar;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_status};
use crate::utils::date::{date_arg_or_today, parse_date};
use crate::utils::table::Table;
use crate::utils::time::{format_clock, parse_required_time};
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Appointment { action } = cmd else {
        return Ok(());
    };
    let pool = DbPool::open_initialized(&cfg.database)?;
    let calendar = Calendar::from_config(&cfg.calendar)?;
    let now = Local::now().naive_local();

    match action {
        AppointmentAction::Add {
            organizer,
            participant,
            date,
            time,
            duration,
        } => {
            let date = parse_date(date).ok_or_else(|| AppError::InvalidDate(date.clone()))?;
            let start = parse_required_time(time)?;
            let duration = duration.unwrap_or(calendar.default_duration);
            let a = calendar.schedule(&pool.conn, organizer, participant, date, start, duration, now)?;
            success(format!(
                "Appointment #{} booked: {} with {} on {} at {} ({} min).",
                a.id,
                a.organizer,
                a.participant,
                a.date_str(),
                format_clock(a.start),
                a.duration_minutes
            ));
        }

        AppointmentAction::List { person, date } => {
            let date = match date {
                Some(d) => Some(parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?),
                None => None,
            };
            let rows = calendar.list(&pool.conn, person.as_deref(), date)?;
            if rows.is_empty() {
                info("No appointments found.");
                return Ok(());
            }
            let mut table = Table::new(&["ID", "DATE", "TIME", "MIN", "ORGANIZER", "PARTICIPANT", "STATUS"]);
            for a in rows {
                let status = a.status.to_db_str();
                table.add_row(vec![
                    a.id.to_string(),
                    a.date_str(),
                    a.time_str(),
                    a.duration_minutes.to_string(),
                    a.organizer,
                    a.participant,
                    format!("{}{status}{RESET}", color_for_status(status)),
                ]);
            }
            print!("{}", table.render());
        }

        AppointmentAction::Cancel { id } => {
            let a = calendar.cancel(&pool.conn, *id)?;
            success(format!(
                "Appointment #{} ({} with {} on {}) is cancelled.",
                a.id,
                a.organizer,
                a.participant,
                a.date_str()
            ));
        }

        AppointmentAction::Slots {
            name,
            date,
            duration,
        } => {
            let date = date_arg_or_today(date.as_deref())?;
            let duration = duration.unwrap_or(calendar.default_duration);
            let slots = calendar.available_slots(&pool.conn, name, date, duration, now)?;
            if slots.is_empty() {
                info(format!("{name} has no free {duration}-minute slots on {date}."));
                return Ok(());
            }
            let list: Vec<String> = slots.iter().map(|t| format_clock(*t)).collect();
            println!("Free slots for {name} on {date} ({duration} min):");
            println!("{}", list.join(", "));
        }
    }

    Ok(())
}
