use serde::{Deserialize, Serialize};

use crate::db_types::{ContactPriority, ContactStatus};

/// Filter for the admin contact message listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactQueryFilter {
    pub page: i64,
    pub limit: i64,
    pub status: Option<ContactStatus>,
    pub priority: Option<ContactPriority>,
}

impl Default for ContactQueryFilter {
    fn default() -> Self {
        Self { page: 1, limit: 20, status: None, priority: None }
    }
}

impl ContactQueryFilter {
    pub fn with_pagination(mut self, page: i64, limit: i64) -> Self {
        self.page = page.max(1);
        self.limit = limit;
        self
    }

    pub fn with_status(mut self, status: ContactStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: ContactPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none()
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0) * self.limit
    }
}
