use std::fmt::Debug;

use log::*;

use crate::{
    contact_objects::ContactQueryFilter,
    db_types::{ContactMessage, ContactStatus, NewContactMessage, NewsletterSubscription},
    events::{ContactMessageReceivedEvent, EventProducers, NewsletterSubscribedEvent},
    traits::{ContactApiError, ContactManagement},
};

/// `ContactApi` handles contact form submissions and newsletter subscriptions.
pub struct ContactApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for ContactApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContactApi")
    }
}

impl<B> ContactApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> ContactApi<B>
where B: ContactManagement
{
    /// Stores a contact form submission and notifies the contact-message hook subscribers.
    ///
    /// The message is stored with status `new` and priority `normal`. Hook failures (e.g. the admin notification
    /// email) never fail the submission.
    pub async fn submit_message(&self, message: NewContactMessage) -> Result<ContactMessage, ContactApiError> {
        let message = self.db.insert_contact_message(message).await?;
        debug!("📮️ Contact message #{} received from {}", message.id, message.email);
        for emitter in &self.producers.contact_message_producer {
            let event = ContactMessageReceivedEvent::new(message.clone());
            emitter.publish_event(event).await;
        }
        Ok(message)
    }

    /// Fetches a page of contact messages matching the filter, newest first, with the total match count.
    pub async fn messages(&self, query: ContactQueryFilter) -> Result<(Vec<ContactMessage>, i64), ContactApiError> {
        self.db.search_contact_messages(query).await
    }

    /// Sets the triage status of a contact message. Returns `None` if the message does not exist.
    pub async fn update_message_status(
        &self,
        id: i64,
        status: ContactStatus,
    ) -> Result<Option<ContactMessage>, ContactApiError> {
        self.db.update_contact_message_status(id, status).await
    }

    /// Subscribes the email to the newsletter and notifies the newsletter hook subscribers.
    ///
    /// A lapsed subscription is reactivated; an active one returns [`ContactApiError::AlreadySubscribed`].
    pub async fn subscribe(&self, email: &str) -> Result<NewsletterSubscription, ContactApiError> {
        let subscription = self.db.subscribe_to_newsletter(email).await?;
        debug!("📮️ {} subscribed to the newsletter", subscription.email);
        for emitter in &self.producers.newsletter_subscribed_producer {
            let event = NewsletterSubscribedEvent::new(subscription.email.clone());
            emitter.publish_event(event).await;
        }
        Ok(subscription)
    }

    /// Deactivates the subscription for the email. An unknown email returns [`ContactApiError::NotSubscribed`].
    pub async fn unsubscribe(&self, email: &str) -> Result<NewsletterSubscription, ContactApiError> {
        let subscription = self.db.unsubscribe_from_newsletter(email).await?;
        debug!("📮️ {} unsubscribed from the newsletter", subscription.email);
        Ok(subscription)
    }
}
