use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    contact_objects::ContactQueryFilter,
    db_types::{ContactMessage, ContactStatus, NewContactMessage, NewsletterSubscription},
    traits::ContactApiError,
};

pub async fn insert_contact_message(
    message: NewContactMessage,
    conn: &mut SqliteConnection,
) -> Result<ContactMessage, sqlx::Error> {
    let message: ContactMessage = sqlx::query_as(
        r#"
            INSERT INTO contact_messages (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(message.name)
    .bind(message.email)
    .bind(message.subject)
    .bind(message.message)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Contact message from [{}] inserted with id {}", message.email, message.id);
    Ok(message)
}

fn push_message_filters<'a>(query: &ContactQueryFilter, builder: &mut QueryBuilder<'a, Sqlite>) {
    if query.is_empty() {
        return;
    }
    builder.push(" WHERE ");
    let mut where_clause = builder.separated(" AND ");
    if let Some(status) = query.status {
        where_clause.push("status = ");
        where_clause.push_bind_unseparated(status);
    }
    if let Some(priority) = query.priority {
        where_clause.push("priority = ");
        where_clause.push_bind_unseparated(priority);
    }
}

/// Fetches a page of contact messages matching the filter, newest first, with the total match count.
pub async fn search_contact_messages(
    query: ContactQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<(Vec<ContactMessage>, i64), sqlx::Error> {
    let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM contact_messages");
    push_message_filters(&query, &mut count_builder);
    let total: i64 = count_builder.build_query_scalar().fetch_one(&mut *conn).await?;

    let mut builder = QueryBuilder::new("SELECT * FROM contact_messages");
    push_message_filters(&query, &mut builder);
    builder.push(" ORDER BY created_at DESC");
    builder.push(" LIMIT ");
    builder.push_bind(query.limit);
    builder.push(" OFFSET ");
    builder.push_bind(query.offset());
    trace!("📝️ Executing query: {}", builder.sql());
    let messages = builder.build_query_as::<ContactMessage>().fetch_all(conn).await?;
    Ok((messages, total))
}

/// Sets the triage status of a contact message. Returns `None` if the message does not exist.
pub async fn update_contact_message_status(
    id: i64,
    status: ContactStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<ContactMessage>, sqlx::Error> {
    let message = sqlx::query_as(
        "UPDATE contact_messages SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(message)
}

pub async fn fetch_subscription(
    email: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<NewsletterSubscription>, sqlx::Error> {
    let subscription = sqlx::query_as("SELECT * FROM newsletter_subscriptions WHERE email = $1")
        .bind(email)
        .fetch_optional(conn)
        .await?;
    Ok(subscription)
}

/// Subscribes the email to the newsletter. A lapsed subscription is reactivated with a fresh `created_at`, so it
/// sorts as a new signup. An active subscription is an error.
pub async fn subscribe_to_newsletter(
    email: &str,
    conn: &mut SqliteConnection,
) -> Result<NewsletterSubscription, ContactApiError> {
    let subscription = match fetch_subscription(email, &mut *conn).await? {
        Some(sub) if sub.is_active => return Err(ContactApiError::AlreadySubscribed),
        Some(_) => {
            sqlx::query_as::<_, NewsletterSubscription>(
                r#"
                    UPDATE newsletter_subscriptions
                    SET is_active = 1, created_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP
                    WHERE email = $1
                    RETURNING *;
                "#,
            )
            .bind(email)
            .fetch_one(conn)
            .await?
        },
        None => {
            sqlx::query_as::<_, NewsletterSubscription>(
                "INSERT INTO newsletter_subscriptions (email) VALUES ($1) RETURNING *",
            )
            .bind(email)
            .fetch_one(conn)
            .await?
        },
    };
    debug!("📝️ Newsletter subscription for [{}] is active", subscription.email);
    Ok(subscription)
}

/// Deactivates the subscription for the email. An unknown email is an error.
pub async fn unsubscribe_from_newsletter(
    email: &str,
    conn: &mut SqliteConnection,
) -> Result<NewsletterSubscription, ContactApiError> {
    let subscription = sqlx::query_as::<_, NewsletterSubscription>(
        "UPDATE newsletter_subscriptions SET is_active = 0, updated_at = CURRENT_TIMESTAMP WHERE email = $1 \
         RETURNING *",
    )
    .bind(email)
    .fetch_optional(conn)
    .await?
    .ok_or(ContactApiError::NotSubscribed)?;
    debug!("📝️ Newsletter subscription for [{}] is inactive", subscription.email);
    Ok(subscription)
}
