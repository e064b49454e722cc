use crate::cli::parser::{Commands, SmsAction};
use crate::config::Config;
use crate::db::outbox::list_sms;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::{RESET, color_for_delivery};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Sms {
        action: SmsAction::List { limit },
    } = cmd
    else {
        return Ok(());
    };

    let pool = DbPool::open_initialized(&cfg.database)?;
    let rows = list_sms(&pool.conn, *limit)?;
    if rows.is_empty() {
        info("SMS outbox is empty.");
        return Ok(());
    }

    let mut table = Table::new(&["ID", "WHEN", "TO", "STATUS", "MESSAGE"]);
    for m in rows {
        let status = m.status.to_db_str();
        let when = chrono::DateTime::parse_from_rfc3339(&m.created_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or(m.created_at);
        let body = if m.error.is_empty() {
            m.body
        } else {
            format!("{} [{}]", m.body, m.error)
        };
        table.add_row(vec![
            m.id.to_string(),
            when,
            m.recipient,
            format!("{}{status}{RESET}", color_for_delivery(status)),
            body,
        ]);
    }
    print!("{}", table.render());
    Ok(())
}
