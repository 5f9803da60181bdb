use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderStatusType, OrderWithUser},
    order_objects::OrderQueryFilter,
};

pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_number,
                user_id,
                items,
                total,
                currency,
                payment_method,
                billing_info,
                shipping_info
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *;
        "#,
    )
    .bind(order.order_number)
    .bind(order.user_id)
    .bind(order.items)
    .bind(order.total)
    .bind(order.currency)
    .bind(order.payment_method)
    .bind(order.billing_info)
    .bind(order.shipping_info)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order [{}] inserted with id {}", order.order_number, order.id);
    Ok(order)
}

pub async fn fetch_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_for_user(
    id: i64,
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Fetches a page of the user's orders, newest first, along with the user's total order count.
pub async fn fetch_orders_for_user(
    user_id: i64,
    page: i64,
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<(Vec<Order>, i64), sqlx::Error> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
    let offset = (page - 1).max(0) * limit;
    let orders = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3")
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(conn)
        .await?;
    Ok((orders, total))
}

fn push_order_filters<'a>(query: &OrderQueryFilter, builder: &mut QueryBuilder<'a, Sqlite>) {
    if query.is_empty() {
        return;
    }
    builder.push(" WHERE ");
    let mut where_clause = builder.separated(" AND ");
    if let Some(status) = query.status {
        where_clause.push("status = ");
        where_clause.push_bind_unseparated(status);
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{search}%");
        where_clause.push("(order_number LIKE ");
        where_clause.push_bind_unseparated(pattern.clone());
        where_clause.push_unseparated(" OR billing_info LIKE ");
        where_clause.push_bind_unseparated(pattern);
        where_clause.push_unseparated(")");
    }
}

/// Fetches a page of all orders matching the filter, newest first, with the customer record joined in.
/// The second return value is the total match count.
pub async fn search_orders(
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<(Vec<OrderWithUser>, i64), sqlx::Error> {
    let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM orders");
    push_order_filters(&query, &mut count_builder);
    let total: i64 = count_builder.build_query_scalar().fetch_one(&mut *conn).await?;

    let mut builder = QueryBuilder::new(
        r#"
    SELECT orders.*,
        users.id AS u_id,
        users.email AS u_email,
        users.display_name AS u_display_name
    FROM orders INNER JOIN users ON orders.user_id = users.id
    "#,
    );
    push_order_filters(&query, &mut builder);
    builder.push(" ORDER BY orders.created_at DESC");
    builder.push(" LIMIT ");
    builder.push_bind(query.limit);
    builder.push(" OFFSET ");
    builder.push_bind(query.offset());
    trace!("📝️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<OrderWithUser>().fetch_all(conn).await?;
    Ok((orders, total))
}

/// Sets the order status without any side effects. The paid-transition bookkeeping (unique code issuance) is
/// orchestrated by the caller inside a transaction.
pub async fn update_order_status(
    id: i64,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_optional(conn)
            .await?;
    Ok(order)
}

pub async fn set_unique_code(id: i64, code: &str, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("UPDATE orders SET unique_code = $1 WHERE id = $2 RETURNING *")
        .bind(code)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

pub async fn set_stripe_payment_intent(
    id: i64,
    intent_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        "UPDATE orders SET stripe_payment_intent_id = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(intent_id)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

pub async fn set_coinbase_invoice(
    id: i64,
    invoice_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        "UPDATE orders SET coinbase_invoice_id = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(invoice_id)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}
