use crate::agents::sms::TwilioCredentials;
use crate::cli::parser::Commands;
use crate::config::{Config, LlmBackend, SmsBackend};
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success, warning};
use std::path::Path;
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        check,
        edit_config,
        editor,
    } = cmd
    else {
        return Ok(());
    };
    let path = Config::config_file();

    if *print_config {
        println!("📄 Current configuration:\n");
        println!("{}", serde_yaml::to_string(cfg)?);
    }

    if *check {
        check_config(cfg, &path)?;
    }

    if *edit_config {
        edit(&path, editor.as_deref());
    }

    Ok(())
}

/// Missing fields, office hours and the external collaborators the kiosk relies on.
fn check_config(cfg: &Config, path: &Path) -> AppResult<()> {
    if !path.exists() {
        warning(format!(
            "No configuration file at {}; defaults are in use. Run `rreception init`.",
            path.display()
        ));
    } else {
        let missing = Config::missing_fields(path)?;
        if missing.is_empty() {
            success("Configuration file is complete.");
        } else {
            warning(format!(
                "Missing fields (defaults will be used): {}",
                missing.join(", ")
            ));
        }
    }

    let (open, close) = cfg.calendar.office_hours()?;
    info(format!("Office hours: {} to {}", open.format("%H:%M"), close.format("%H:%M")));

    if !cfg.face_db_path().exists() {
        warning("Face database not found: everyone will be greeted as a visitor until faces are enrolled.");
    }

    match cfg.llm.backend {
        LlmBackend::Offline => info("Language model: offline (canned replies)."),
        LlmBackend::Command if cfg.llm.command.is_none() => {
            warning("Language model backend is `command` but no command is set.")
        }
        LlmBackend::Command => info("Language model: local command."),
        LlmBackend::Http => {
            info(format!("Language model: {} at {}", cfg.llm.model, cfg.llm.endpoint));
            if std::env::var(&cfg.llm.api_key_env).is_err() {
                warning(format!("{} is not set; requests go out without a token.", cfg.llm.api_key_env));
            }
        }
    }

    match cfg.sms.backend {
        SmsBackend::Outbox => info("SMS: kept in the local outbox only."),
        SmsBackend::Twilio => match TwilioCredentials::from_env() {
            Ok(_) => success("Twilio credentials found."),
            Err(e) => warning(format!("Twilio is selected but unusable: {e}")),
        },
    }
    Ok(())
}

fn edit(path: &Path, requested: Option<&str>) {
    let default_editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    let first = requested.unwrap_or(&default_editor);
    if launch(first, path) {
        success(format!("Configuration file edited with '{first}'."));
        return;
    }
    if first == default_editor {
        error(format!("Failed to edit configuration file with '{first}'."));
        return;
    }

    warning(format!("Editor '{first}' not available, falling back to '{default_editor}'."));
    if launch(&default_editor, path) {
        success(format!("Configuration file edited with '{default_editor}'."));
    } else {
        error(format!("Failed to edit configuration file with '{default_editor}'."));
    }
}

fn launch(editor: &str, path: &Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}
