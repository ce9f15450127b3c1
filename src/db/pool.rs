use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

use super::migrations::run_migrations;
use crate::error::AppResult;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Opens (creating if needed) the SQLite file and brings its schema up to date.
pub fn create_pool(database_path: &Path) -> AppResult<DbPool> {
    if let Some(parent) = database_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
        )
    });

    let pool = Pool::builder().max_size(10).build(manager)?;
    run_migrations(&*pool.get()?)?;
    Ok(pool)
}

/// Single-connection pool over a private in-memory database.
pub fn create_in_memory_pool() -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::memory();
    let pool = Pool::builder().max_size(1).build(manager)?;
    run_migrations(&*pool.get()?)?;
    Ok(pool)
}
