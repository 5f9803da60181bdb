use thiserror::Error;

use crate::{
    catalog_objects::{InitiativeQueryFilter, ProductQueryFilter},
    db_types::{Initiative, InitiativeUpdate, NewInitiative, NewProduct, Product, ProductUpdate},
};

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Product not found")]
    ProductNotFound,
    #[error("Initiative not found")]
    InitiativeNotFound,
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        CatalogApiError::DatabaseError(e.to_string())
    }
}

/// The `CatalogManagement` trait defines behaviour for the storefront catalog: products and the initiatives they are
/// attached to.
///
/// Search methods return the matching page of records plus the total number of matches, so callers can build
/// pagination metadata without a second round trip.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Fetches a page of active products matching the filter, along with the total match count.
    async fn search_products(&self, query: ProductQueryFilter) -> Result<(Vec<Product>, i64), CatalogApiError>;

    /// Fetches the product with the given SKU, active or not.
    async fn fetch_product_by_sku(&self, sku: &str) -> Result<Option<Product>, CatalogApiError>;

    /// Fetches up to `limit` featured active products, newest first.
    async fn fetch_featured_products(&self, limit: i64) -> Result<Vec<Product>, CatalogApiError>;

    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;

    /// Applies the partial update to the product with the given SKU. Returns `None` if the product does not exist.
    async fn update_product(&self, sku: &str, update: ProductUpdate) -> Result<Option<Product>, CatalogApiError>;

    /// Soft-deletes a product by clearing its active flag. Returns `None` if the product does not exist.
    async fn deactivate_product(&self, sku: &str) -> Result<Option<Product>, CatalogApiError>;

    /// Fetches a page of active initiatives matching the filter, along with the total match count.
    async fn search_initiatives(
        &self,
        query: InitiativeQueryFilter,
    ) -> Result<(Vec<Initiative>, i64), CatalogApiError>;

    /// Fetches the initiative with the given slug, regardless of status.
    async fn fetch_initiative_by_slug(&self, slug: &str) -> Result<Option<Initiative>, CatalogApiError>;

    /// Fetches up to `limit` featured active initiatives in display order.
    async fn fetch_featured_initiatives(&self, limit: i64) -> Result<Vec<Initiative>, CatalogApiError>;

    async fn insert_initiative(&self, initiative: NewInitiative) -> Result<Initiative, CatalogApiError>;

    /// Applies the partial update to the initiative with the given slug. Returns `None` if it does not exist.
    async fn update_initiative(
        &self,
        slug: &str,
        update: InitiativeUpdate,
    ) -> Result<Option<Initiative>, CatalogApiError>;

    /// Soft-deletes an initiative by setting its status to inactive. Returns `None` if it does not exist.
    async fn deactivate_initiative(&self, slug: &str) -> Result<Option<Initiative>, CatalogApiError>;
}
