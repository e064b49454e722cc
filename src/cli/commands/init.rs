use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::employees::{find_by_name, list_employees};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success, warning};

/// Create the config directory and file (the file is skipped with `--test`),
/// then the database with every migration applied.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing rReception…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {db_path}");

    let pool = DbPool::open_initialized(&db_path)?;
    success(format!("Database initialized at {db_path}"));

    if let Err(e) = ttlog(&pool.conn, "init", &db_path, "Database initialized") {
        error(format!("Failed to write internal log: {e}"));
    }

    let staff = list_employees(&pool.conn, None)?.len();
    if staff == 0 {
        info("The employee directory is empty. Add people with `rreception employee add` or `employee import`.");
    } else {
        info(format!("{staff} employees in the directory."));
    }

    let cfg = if cli.test {
        Config::default()
    } else {
        Config::load()?
    };
    if staff > 0 && find_by_name(&pool.conn, &cfg.receptionist)?.is_none() {
        warning(format!(
            "Receptionist '{}' is not in the directory: department requests cannot be forwarded by SMS.",
            cfg.receptionist
        ));
    }

    println!("🎉 rReception initialization completed!");
    Ok(())
}
