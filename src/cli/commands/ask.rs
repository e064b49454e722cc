use crate::cli::parser::Commands;
use crate::config::Config;
use crate::dialogue::{DialogueEngine, Speaker};
use crate::errors::AppResult;
use crate::ui::messages::bot;
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Ask {
        text,
        as_employee,
        ..
    } = cmd
    else {
        return Ok(());
    };

    let mut engine = DialogueEngine::from_config(cfg)?;
    let speaker = match as_employee {
        Some(name) => {
            let name = engine
                .directory()
                .search(engine.conn(), name)
                .map(|e| e.name)
                .unwrap_or_else(|| name.trim().to_string());
            Speaker::Employee(name)
        }
        None => Speaker::visitor(),
    };
    engine.begin_session(speaker);

    let reply = engine.process_query(text, Local::now().naive_local());
    bot(&reply.text);
    Ok(())
}
