//! SQLite connection pool wrapper (lightweight for a single foreground kiosk).

use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::{Connection, Result};
use std::path::Path;
use std::time::Duration;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(Self { conn })
    }

    /// Open the database and bring its schema up to date.
    pub fn open_initialized(path: &str) -> AppResult<Self> {
        let pool = Self::new(path)?;
        run_pending_migrations(&pool.conn)?;
        Ok(pool)
    }
}
