//! Helpers for integration tests: fresh throwaway database paths. Migrations run when the pool is opened.
pub mod prepare_env;

pub use prepare_env::{drop_stale_database, prepare_test_env, random_db_path};
