//! rReception library root.
//! Exposes the CLI parser, the high-level run() function and the receptionist internals.

pub mod agents;
pub mod bot;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod dialogue;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Run { .. } => cli::commands::run::handle(&cli.command, cfg),
        Commands::Ask { .. } => cli::commands::ask::handle(&cli.command, cfg),
        Commands::Employee { .. } => cli::commands::employee::handle(&cli.command, cfg),
        Commands::Attendance { .. } => cli::commands::attendance::handle(&cli.command, cfg),
        Commands::Appointment { .. } => cli::commands::appointment::handle(&cli.command, cfg),
        Commands::Faces { .. } => cli::commands::faces::handle(&cli.command, cfg),
        Commands::Sms { .. } => cli::commands::sms::handle(&cli.command, cfg),
    }
}

/// Diagnostics go to stderr; `RRECEPTION_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("RRECEPTION_LOG")
        .unwrap_or_else(|_| EnvFilter::new("rreception=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    init_tracing();

    let cli = Cli::parse();

    // config is loaded once, then the --db override is applied
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
