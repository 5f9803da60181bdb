use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    catalog_objects::ProductQueryFilter,
    db_types::{NewProduct, Product, ProductUpdate},
    traits::CatalogApiError,
};

/// Appends the WHERE clause for a product search. Only active products are ever listed.
fn push_product_filters<'a>(query: &ProductQueryFilter, builder: &mut QueryBuilder<'a, Sqlite>) {
    builder.push(" WHERE ");
    let mut where_clause = builder.separated(" AND ");
    where_clause.push("is_active = 1");
    if let Some(category) = &query.category {
        where_clause.push("initiative_id = ");
        where_clause.push_bind_unseparated(category.clone());
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{search}%");
        where_clause.push("(title LIKE ");
        where_clause.push_bind_unseparated(pattern.clone());
        where_clause.push_unseparated(" OR description LIKE ");
        where_clause.push_bind_unseparated(pattern);
        where_clause.push_unseparated(")");
    }
}

/// Sort keys arrive in wire form. Anything outside the whitelist falls back to the title column.
fn product_sort_column(sort_by: Option<&str>) -> &'static str {
    match sort_by {
        Some("price") => "price",
        Some("createdAt") => "created_at",
        _ => "title",
    }
}

/// Fetches a page of active products matching the filter, along with the total match count.
pub async fn search_products(
    query: ProductQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<(Vec<Product>, i64), sqlx::Error> {
    let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM products");
    push_product_filters(&query, &mut count_builder);
    let total: i64 = count_builder.build_query_scalar().fetch_one(&mut *conn).await?;

    let mut builder = QueryBuilder::new("SELECT * FROM products");
    push_product_filters(&query, &mut builder);
    let column = product_sort_column(query.sort_by.as_deref());
    builder.push(format!(" ORDER BY {column} {}", query.sort_order));
    builder.push(" LIMIT ");
    builder.push_bind(query.limit);
    builder.push(" OFFSET ");
    builder.push_bind(query.offset());
    trace!("📝️ Executing query: {}", builder.sql());
    let products = builder.build_query_as::<Product>().fetch_all(conn).await?;
    Ok((products, total))
}

/// Fetches the product with the given SKU, whether active or not.
pub async fn fetch_product_by_sku(sku: &str, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product = sqlx::query_as("SELECT * FROM products WHERE sku = $1").bind(sku).fetch_optional(conn).await?;
    Ok(product)
}

pub async fn fetch_featured_products(limit: i64, conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    let products = sqlx::query_as(
        "SELECT * FROM products WHERE featured = 1 AND is_active = 1 ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(conn)
    .await?;
    Ok(products)
}

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, CatalogApiError> {
    let images = serde_json::to_string(&product.images).unwrap_or_else(|_| "[]".to_string());
    let metadata = product.metadata.map(|m| m.to_string());
    let product: Product = sqlx::query_as(
        r#"
            INSERT INTO products (
                sku,
                title,
                description,
                price,
                currency,
                images,
                inventory_count,
                initiative_id,
                metadata,
                stripe_price_id,
                crypto_enabled,
                featured,
                is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *;
        "#,
    )
    .bind(product.sku)
    .bind(product.title)
    .bind(product.description)
    .bind(product.price)
    .bind(product.currency)
    .bind(images)
    .bind(product.inventory_count)
    .bind(product.initiative_id)
    .bind(metadata)
    .bind(product.stripe_price_id)
    .bind(product.crypto_enabled)
    .bind(product.featured)
    .bind(product.is_active)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Product [{}] inserted with id {}", product.sku, product.id);
    Ok(product)
}

/// Applies a partial update to the product with the given SKU. Fields that are `None` are left untouched.
/// Returns `None` if the product does not exist.
pub async fn update_product(
    sku: &str,
    update: ProductUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, sqlx::Error> {
    if update.is_empty() {
        let product =
            sqlx::query_as("UPDATE products SET updated_at = CURRENT_TIMESTAMP WHERE sku = $1 RETURNING *")
                .bind(sku)
                .fetch_optional(conn)
                .await?;
        return Ok(product);
    }
    let mut builder = QueryBuilder::new("UPDATE products SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(title) = update.title {
        set_clause.push("title = ");
        set_clause.push_bind_unseparated(title);
    }
    if let Some(description) = update.description {
        set_clause.push("description = ");
        set_clause.push_bind_unseparated(description);
    }
    if let Some(price) = update.price {
        set_clause.push("price = ");
        set_clause.push_bind_unseparated(price);
    }
    if let Some(images) = update.images {
        let images = serde_json::to_string(&images).unwrap_or_else(|_| "[]".to_string());
        set_clause.push("images = ");
        set_clause.push_bind_unseparated(images);
    }
    if let Some(count) = update.inventory_count {
        set_clause.push("inventory_count = ");
        set_clause.push_bind_unseparated(count);
    }
    if let Some(initiative_id) = update.initiative_id {
        set_clause.push("initiative_id = ");
        set_clause.push_bind_unseparated(initiative_id);
    }
    if let Some(metadata) = update.metadata {
        set_clause.push("metadata = ");
        set_clause.push_bind_unseparated(metadata.to_string());
    }
    if let Some(price_id) = update.stripe_price_id {
        set_clause.push("stripe_price_id = ");
        set_clause.push_bind_unseparated(price_id);
    }
    if let Some(crypto) = update.crypto_enabled {
        set_clause.push("crypto_enabled = ");
        set_clause.push_bind_unseparated(crypto);
    }
    if let Some(featured) = update.featured {
        set_clause.push("featured = ");
        set_clause.push_bind_unseparated(featured);
    }
    if let Some(active) = update.is_active {
        set_clause.push("is_active = ");
        set_clause.push_bind_unseparated(active);
    }
    builder.push(", updated_at = CURRENT_TIMESTAMP WHERE sku = ");
    builder.push_bind(sku.to_string());
    builder.push(" RETURNING *");
    trace!("📝️ Executing query: {}", builder.sql());
    let product = builder.build_query_as::<Product>().fetch_optional(conn).await?;
    Ok(product)
}

/// Soft-deletes the product by clearing its active flag. Returns `None` if the product does not exist.
pub async fn deactivate_product(sku: &str, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product = sqlx::query_as(
        "UPDATE products SET is_active = 0, updated_at = CURRENT_TIMESTAMP WHERE sku = $1 RETURNING *",
    )
    .bind(sku)
    .fetch_optional(conn)
    .await?;
    Ok(product)
}
