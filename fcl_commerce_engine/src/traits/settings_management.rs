use thiserror::Error;

use crate::db_types::SiteSetting;

#[derive(Debug, Clone, Error)]
pub enum SettingsApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Setting not found")]
    SettingNotFound,
}

impl From<sqlx::Error> for SettingsApiError {
    fn from(e: sqlx::Error) -> Self {
        SettingsApiError::DatabaseError(e.to_string())
    }
}

/// A key-value store for site content settings (homepage copy, company info, contact details).
#[allow(async_fn_in_trait)]
pub trait SettingsManagement {
    async fn fetch_settings(&self) -> Result<Vec<SiteSetting>, SettingsApiError>;

    async fn fetch_setting(&self, key: &str) -> Result<Option<SiteSetting>, SettingsApiError>;

    /// Creates the setting, or replaces its value if the key already exists.
    async fn upsert_setting(&self, key: &str, value: &str) -> Result<SiteSetting, SettingsApiError>;
}
