use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Sort direction for catalog listings. Unknown values fall back to ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desc" => Ok(Self::Desc),
            _ => Ok(Self::Asc),
        }
    }
}

/// Filter for product listings. `category` matches the initiative slug a product is attached to; `search` is a
/// case-insensitive substring match on title or description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductQueryFilter {
    pub page: i64,
    pub limit: i64,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

impl Default for ProductQueryFilter {
    fn default() -> Self {
        Self { page: 1, limit: 12, category: None, search: None, sort_by: None, sort_order: SortOrder::Asc }
    }
}

impl ProductQueryFilter {
    pub fn with_pagination(mut self, page: i64, limit: i64) -> Self {
        self.page = page.max(1);
        self.limit = limit;
        self
    }

    pub fn with_category(mut self, category: String) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_search(mut self, search: String) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_sorting(mut self, sort_by: Option<String>, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0) * self.limit
    }
}

/// Filter for initiative listings. `search` is a case-insensitive substring match on title or summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiativeQueryFilter {
    pub page: i64,
    pub limit: i64,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

impl Default for InitiativeQueryFilter {
    fn default() -> Self {
        Self { page: 1, limit: 12, featured: None, search: None, sort_by: None, sort_order: SortOrder::Asc }
    }
}

impl InitiativeQueryFilter {
    pub fn with_pagination(mut self, page: i64, limit: i64) -> Self {
        self.page = page.max(1);
        self.limit = limit;
        self
    }

    pub fn with_featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn with_search(mut self, search: String) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_sorting(mut self, sort_by: Option<String>, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0) * self.limit
    }
}
