//! SQLite database module for the FCL commerce engine.

mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
