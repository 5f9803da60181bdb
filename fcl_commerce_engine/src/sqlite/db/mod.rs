//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are maintained by simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool,
//! or create an atomic transaction as the need arises and call through to the functions without any other changes.
use std::{env, path::Path, str::FromStr};

use log::info;
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod contact;
pub mod initiatives;
pub mod orders;
pub mod products;
pub mod settings;
pub mod users;

const SQLITE_DB_URL: &str = "sqlite://data/fcl_site.db";

pub static MIGRATOR: Migrator = sqlx::migrate!("./src/sqlite/migrations");

pub fn db_url() -> String {
    let result = env::var("FCL_DATABASE_URL").unwrap_or_else(|_| {
        info!("FCL_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

/// Opens a connection pool, creating the database file if it does not exist yet, and brings the schema up to date.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    create_parent_dir(url)?;
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    MIGRATOR.run(&pool).await?;
    info!("Database schema is up to date");
    Ok(pool)
}

// The default url keeps the database under `data/`, which won't exist on a fresh deployment. SQLite only creates
// the file itself, not missing directories.
fn create_parent_dir(url: &str) -> Result<(), SqlxError> {
    let Some(path) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    if path.starts_with(':') {
        return Ok(());
    }
    if let Some(dir) = Path::new(path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}
