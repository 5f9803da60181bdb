//! Unifies API for accessing the storefront catalog.

use std::fmt::Debug;

use crate::{
    catalog_objects::{InitiativeQueryFilter, ProductQueryFilter},
    db_types::{Initiative, InitiativeUpdate, NewInitiative, NewProduct, Product, ProductUpdate},
    traits::{CatalogApiError, CatalogManagement},
};

/// The `CatalogApi` provides a unified API for products and initiatives.
pub struct CatalogApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches a page of active products matching the filter, along with the total match count.
    pub async fn search_products(&self, query: ProductQueryFilter) -> Result<(Vec<Product>, i64), CatalogApiError> {
        self.db.search_products(query).await
    }

    /// Fetches the product with the given SKU, whether active or not. If no product exists, `None` is returned.
    pub async fn product_by_sku(&self, sku: &str) -> Result<Option<Product>, CatalogApiError> {
        self.db.fetch_product_by_sku(sku).await
    }

    /// Fetches up to `limit` featured active products, newest first.
    pub async fn featured_products(&self, limit: i64) -> Result<Vec<Product>, CatalogApiError> {
        self.db.fetch_featured_products(limit).await
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        self.db.insert_product(product).await
    }

    /// Applies a partial update to the product with the given SKU. Returns `None` if the product does not exist.
    pub async fn update_product(&self, sku: &str, update: ProductUpdate) -> Result<Option<Product>, CatalogApiError> {
        self.db.update_product(sku, update).await
    }

    /// Soft-deletes the product by clearing its active flag. Returns `None` if the product does not exist.
    pub async fn deactivate_product(&self, sku: &str) -> Result<Option<Product>, CatalogApiError> {
        self.db.deactivate_product(sku).await
    }

    /// Fetches a page of active initiatives matching the filter, along with the total match count.
    pub async fn search_initiatives(
        &self,
        query: InitiativeQueryFilter,
    ) -> Result<(Vec<Initiative>, i64), CatalogApiError> {
        self.db.search_initiatives(query).await
    }

    /// Fetches the initiative with the given slug, regardless of status. If none exists, `None` is returned.
    pub async fn initiative_by_slug(&self, slug: &str) -> Result<Option<Initiative>, CatalogApiError> {
        self.db.fetch_initiative_by_slug(slug).await
    }

    /// Fetches up to `limit` featured active initiatives in display order.
    pub async fn featured_initiatives(&self, limit: i64) -> Result<Vec<Initiative>, CatalogApiError> {
        self.db.fetch_featured_initiatives(limit).await
    }

    pub async fn create_initiative(&self, initiative: NewInitiative) -> Result<Initiative, CatalogApiError> {
        self.db.insert_initiative(initiative).await
    }

    /// Applies a partial update to the initiative with the given slug. Returns `None` if it does not exist.
    pub async fn update_initiative(
        &self,
        slug: &str,
        update: InitiativeUpdate,
    ) -> Result<Option<Initiative>, CatalogApiError> {
        self.db.update_initiative(slug, update).await
    }

    /// Soft-deletes the initiative by setting its status to inactive. Returns `None` if it does not exist.
    pub async fn deactivate_initiative(&self, slug: &str) -> Result<Option<Initiative>, CatalogApiError> {
        self.db.deactivate_initiative(slug).await
    }
}
