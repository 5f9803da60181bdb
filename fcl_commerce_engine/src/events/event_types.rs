use crate::db_types::{ContactMessage, Order};

/// Emitted whenever an order transitions to `paid`, via webhook or via the admin status endpoint.
///
/// The order carried here already has its unique code issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPaidEvent {
    pub order: Order,
}

impl OrderPaidEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Emitted after a contact form submission has been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageReceivedEvent {
    pub message: ContactMessage,
}

impl ContactMessageReceivedEvent {
    pub fn new(message: ContactMessage) -> Self {
        Self { message }
    }
}

/// Emitted when a newsletter subscription is created or reactivated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterSubscribedEvent {
    pub email: String,
}

impl NewsletterSubscribedEvent {
    pub fn new<S: Into<String>>(email: S) -> Self {
        Self { email: email.into() }
    }
}
