use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    catalog_objects::InitiativeQueryFilter,
    db_types::{Initiative, InitiativeUpdate, NewInitiative},
    traits::CatalogApiError,
};

/// Appends the WHERE clause for an initiative search. Only active initiatives are ever listed.
fn push_initiative_filters<'a>(query: &InitiativeQueryFilter, builder: &mut QueryBuilder<'a, Sqlite>) {
    builder.push(" WHERE ");
    let mut where_clause = builder.separated(" AND ");
    where_clause.push("status = 'active'");
    if let Some(featured) = query.featured {
        where_clause.push("featured = ");
        where_clause.push_bind_unseparated(featured);
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{search}%");
        where_clause.push("(title LIKE ");
        where_clause.push_bind_unseparated(pattern.clone());
        where_clause.push_unseparated(" OR summary LIKE ");
        where_clause.push_bind_unseparated(pattern);
        where_clause.push_unseparated(")");
    }
}

/// Sort keys arrive in wire form (`order` is the display position). Anything outside the whitelist falls back to
/// the display order column.
fn initiative_sort_column(sort_by: Option<&str>) -> &'static str {
    match sort_by {
        Some("title") => "title",
        Some("createdAt") => "created_at",
        _ => "display_order",
    }
}

/// Fetches a page of active initiatives matching the filter, along with the total match count.
pub async fn search_initiatives(
    query: InitiativeQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<(Vec<Initiative>, i64), sqlx::Error> {
    let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM initiatives");
    push_initiative_filters(&query, &mut count_builder);
    let total: i64 = count_builder.build_query_scalar().fetch_one(&mut *conn).await?;

    let mut builder = QueryBuilder::new("SELECT * FROM initiatives");
    push_initiative_filters(&query, &mut builder);
    let column = initiative_sort_column(query.sort_by.as_deref());
    builder.push(format!(" ORDER BY {column} {}", query.sort_order));
    builder.push(" LIMIT ");
    builder.push_bind(query.limit);
    builder.push(" OFFSET ");
    builder.push_bind(query.offset());
    trace!("📝️ Executing query: {}", builder.sql());
    let initiatives = builder.build_query_as::<Initiative>().fetch_all(conn).await?;
    Ok((initiatives, total))
}

/// Fetches the initiative with the given slug, regardless of status.
pub async fn fetch_initiative_by_slug(
    slug: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Initiative>, sqlx::Error> {
    let initiative =
        sqlx::query_as("SELECT * FROM initiatives WHERE slug = $1").bind(slug).fetch_optional(conn).await?;
    Ok(initiative)
}

pub async fn fetch_featured_initiatives(
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Initiative>, sqlx::Error> {
    let initiatives = sqlx::query_as(
        "SELECT * FROM initiatives WHERE featured = 1 AND status = 'active' ORDER BY display_order ASC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(conn)
    .await?;
    Ok(initiatives)
}

pub async fn insert_initiative(
    initiative: NewInitiative,
    conn: &mut SqliteConnection,
) -> Result<Initiative, CatalogApiError> {
    let gallery = serde_json::to_string(&initiative.gallery).unwrap_or_else(|_| "[]".to_string());
    let initiative: Initiative = sqlx::query_as(
        r#"
            INSERT INTO initiatives (
                slug,
                title,
                summary,
                long_description,
                hero_image,
                gallery,
                featured,
                display_order,
                status,
                external_docs_link
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *;
        "#,
    )
    .bind(initiative.slug)
    .bind(initiative.title)
    .bind(initiative.summary)
    .bind(initiative.long_description)
    .bind(initiative.hero_image)
    .bind(gallery)
    .bind(initiative.featured)
    .bind(initiative.display_order)
    .bind(initiative.status)
    .bind(initiative.external_docs_link)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Initiative [{}] inserted with id {}", initiative.slug, initiative.id);
    Ok(initiative)
}

/// Applies a partial update to the initiative with the given slug. Fields that are `None` are left untouched.
/// Returns `None` if the initiative does not exist.
pub async fn update_initiative(
    slug: &str,
    update: InitiativeUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Initiative>, sqlx::Error> {
    if update.is_empty() {
        let initiative =
            sqlx::query_as("UPDATE initiatives SET updated_at = CURRENT_TIMESTAMP WHERE slug = $1 RETURNING *")
                .bind(slug)
                .fetch_optional(conn)
                .await?;
        return Ok(initiative);
    }
    let mut builder = QueryBuilder::new("UPDATE initiatives SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(title) = update.title {
        set_clause.push("title = ");
        set_clause.push_bind_unseparated(title);
    }
    if let Some(summary) = update.summary {
        set_clause.push("summary = ");
        set_clause.push_bind_unseparated(summary);
    }
    if let Some(description) = update.long_description {
        set_clause.push("long_description = ");
        set_clause.push_bind_unseparated(description);
    }
    if let Some(hero) = update.hero_image {
        set_clause.push("hero_image = ");
        set_clause.push_bind_unseparated(hero);
    }
    if let Some(gallery) = update.gallery {
        let gallery = serde_json::to_string(&gallery).unwrap_or_else(|_| "[]".to_string());
        set_clause.push("gallery = ");
        set_clause.push_bind_unseparated(gallery);
    }
    if let Some(featured) = update.featured {
        set_clause.push("featured = ");
        set_clause.push_bind_unseparated(featured);
    }
    if let Some(order) = update.display_order {
        set_clause.push("display_order = ");
        set_clause.push_bind_unseparated(order);
    }
    if let Some(status) = update.status {
        set_clause.push("status = ");
        set_clause.push_bind_unseparated(status);
    }
    if let Some(link) = update.external_docs_link {
        set_clause.push("external_docs_link = ");
        set_clause.push_bind_unseparated(link);
    }
    builder.push(", updated_at = CURRENT_TIMESTAMP WHERE slug = ");
    builder.push_bind(slug.to_string());
    builder.push(" RETURNING *");
    trace!("📝️ Executing query: {}", builder.sql());
    let initiative = builder.build_query_as::<Initiative>().fetch_optional(conn).await?;
    Ok(initiative)
}

/// Soft-deletes the initiative by setting its status to inactive. Returns `None` if it does not exist.
pub async fn deactivate_initiative(
    slug: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Initiative>, sqlx::Error> {
    let initiative = sqlx::query_as(
        "UPDATE initiatives SET status = 'inactive', updated_at = CURRENT_TIMESTAMP WHERE slug = $1 RETURNING *",
    )
    .bind(slug)
    .fetch_optional(conn)
    .await?;
    Ok(initiative)
}
