use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;

const OP_WIDTH_MAX: usize = 60;

/// ANSI colour for an operation of the internal log
fn color_for_operation(op: &str) -> Colour {
    match op {
        "init" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        "attendance" => Colour::Green,
        "attendance_fix" | "identity" => Colour::Yellow,
        "sms" => Colour::Cyan,
        "sms_failed" => Colour::Red,
        other if other.ends_with("_add") || other.ends_with("_import") => Colour::Green,
        other if other.ends_with("_del") || other.ends_with("_cancel") => Colour::Red,
        _ => Colour::White,
    }
}

fn truncate_visible(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let mut out: String = s.chars().take(max - 3).collect();
        out.push_str("...");
        out
    } else {
        s.to_string()
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool, operation: Option<&str>) -> AppResult<()> {
        let rows = load_log(&pool.conn, operation)?;

        if rows.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let entries: Vec<(i64, String, String, String, String)> = rows
            .into_iter()
            .map(|r| {
                let date = chrono::DateTime::parse_from_rfc3339(&r.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(r.date);

                let op_target = if r.target.is_empty() {
                    r.operation.clone()
                } else {
                    format!("{} ({})", r.operation, r.target)
                };

                (r.id, date, r.operation, truncate_visible(&op_target, OP_WIDTH_MAX), r.message)
            })
            .collect();

        let op_w = entries
            .iter()
            .map(|(_, _, _, op_target, _)| op_target.chars().count())
            .max()
            .unwrap_or(10);
        let id_w = entries
            .iter()
            .map(|(id, _, _, _, _)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|(_, date, _, _, _)| date.len())
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, operation, op_target, message) in entries {
            let color = color_for_operation(&operation);

            // only the operation word is coloured
            let colored = match op_target.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(op_target.as_str()).to_string(),
            };

            let padding = " ".repeat(op_w.saturating_sub(op_target.chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                colored,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
