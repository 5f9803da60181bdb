use thiserror::Error;

use crate::{
    contact_objects::ContactQueryFilter,
    db_types::{ContactMessage, ContactStatus, NewContactMessage, NewsletterSubscription},
};

#[derive(Debug, Clone, Error)]
pub enum ContactApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Message not found")]
    MessageNotFound,
    #[error("Email is already subscribed")]
    AlreadySubscribed,
    #[error("Email not found in newsletter subscriptions")]
    NotSubscribed,
}

impl From<sqlx::Error> for ContactApiError {
    fn from(e: sqlx::Error) -> Self {
        ContactApiError::DatabaseError(e.to_string())
    }
}

/// The `ContactManagement` trait stores contact form submissions and newsletter subscriptions.
#[allow(async_fn_in_trait)]
pub trait ContactManagement {
    async fn insert_contact_message(&self, message: NewContactMessage) -> Result<ContactMessage, ContactApiError>;

    /// Fetches a page of contact messages matching the filter, newest first, with the total match count.
    async fn search_contact_messages(
        &self,
        query: ContactQueryFilter,
    ) -> Result<(Vec<ContactMessage>, i64), ContactApiError>;

    /// Sets the triage status of a contact message. Returns `None` if the message does not exist.
    async fn update_contact_message_status(
        &self,
        id: i64,
        status: ContactStatus,
    ) -> Result<Option<ContactMessage>, ContactApiError>;

    /// Subscribes the email to the newsletter, reactivating a lapsed subscription if one exists. An active
    /// subscription returns [`ContactApiError::AlreadySubscribed`].
    async fn subscribe_to_newsletter(&self, email: &str) -> Result<NewsletterSubscription, ContactApiError>;

    /// Deactivates the subscription for the email. An unknown email returns [`ContactApiError::NotSubscribed`].
    async fn unsubscribe_from_newsletter(&self, email: &str) -> Result<NewsletterSubscription, ContactApiError>;
}
