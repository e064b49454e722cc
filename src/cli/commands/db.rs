use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success};

/// Maintenance of the kiosk database. Flags run in a fixed order:
/// migrate, info, check, vacuum.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    if !(*migrate || *check || *vacuum || *show_info) {
        info("Nothing to do. Use --migrate, --info, --check or --vacuum.");
        return Ok(());
    }

    let mut pool = DbPool::new(&cfg.database)?;

    if *migrate {
        info("Running migrations…");
        run_pending_migrations(&pool.conn)?;
        success("Schema is up to date.");
    }

    if *show_info {
        stats::print_db_info(&mut pool, &cfg.database)?;
    }

    if *check {
        integrity_check(&pool)?;
    }

    if *vacuum {
        info("Compacting database…");
        pool.conn.execute_batch("VACUUM;")?;
        ttlog_quiet(&pool.conn, "db_vacuum", &cfg.database, "VACUUM completed");
        success("Vacuum completed.");
    }

    Ok(())
}

fn integrity_check(pool: &DbPool) -> AppResult<()> {
    info("Running integrity check…");
    let mut stmt = pool.conn.prepare("PRAGMA integrity_check;")?;
    let problems: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<_>>()?;

    match problems.as_slice() {
        [only] if only == "ok" => success("Integrity check passed."),
        _ => {
            error("Integrity check failed:");
            for p in &problems {
                println!("  - {p}");
            }
        }
    }
    Ok(())
}
