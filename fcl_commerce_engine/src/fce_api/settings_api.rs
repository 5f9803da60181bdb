use std::fmt::Debug;

use crate::{
    db_types::SiteSetting,
    traits::{SettingsApiError, SettingsManagement},
};

/// `SettingsApi` reads and writes the site content settings (homepage copy, company info, contact details).
pub struct SettingsApi<B> {
    db: B,
}

impl<B: Debug> Debug for SettingsApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SettingsApi ({:?})", self.db)
    }
}

impl<B> SettingsApi<B>
where B: SettingsManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn fetch_settings(&self) -> Result<Vec<SiteSetting>, SettingsApiError> {
        self.db.fetch_settings().await
    }

    pub async fn fetch_setting(&self, key: &str) -> Result<Option<SiteSetting>, SettingsApiError> {
        self.db.fetch_setting(key).await
    }

    /// Creates the setting, or replaces its value if the key already exists.
    pub async fn upsert_setting(&self, key: &str, value: &str) -> Result<SiteSetting, SettingsApiError> {
        self.db.upsert_setting(key, value).await
    }
}
