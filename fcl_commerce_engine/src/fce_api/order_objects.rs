use serde::{Deserialize, Serialize};

use crate::db_types::OrderStatusType;

/// Filter for the admin order listing. `search` is a case-insensitive substring match on the order number or the
/// serialized billing info.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderQueryFilter {
    pub page: i64,
    pub limit: i64,
    pub status: Option<OrderStatusType>,
    pub search: Option<String>,
}

impl Default for OrderQueryFilter {
    fn default() -> Self {
        Self { page: 1, limit: 20, status: None, search: None }
    }
}

impl OrderQueryFilter {
    pub fn with_pagination(mut self, page: i64, limit: i64) -> Self {
        self.page = page.max(1);
        self.limit = limit;
        self
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: String) -> Self {
        self.search = Some(search);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.search.is_none()
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0) * self.limit
    }
}
