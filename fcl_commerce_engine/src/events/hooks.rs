use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    ContactMessageReceivedEvent,
    EventHandler,
    EventProducer,
    Handler,
    NewsletterSubscribedEvent,
    OrderPaidEvent,
};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_paid_producer: Vec<EventProducer<OrderPaidEvent>>,
    pub contact_message_producer: Vec<EventProducer<ContactMessageReceivedEvent>>,
    pub newsletter_subscribed_producer: Vec<EventProducer<NewsletterSubscribedEvent>>,
}

pub struct EventHandlers {
    pub on_order_paid: Option<EventHandler<OrderPaidEvent>>,
    pub on_contact_message: Option<EventHandler<ContactMessageReceivedEvent>>,
    pub on_newsletter_subscribed: Option<EventHandler<NewsletterSubscribedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_paid = hooks.on_order_paid.map(|f| EventHandler::new(buffer_size, f));
        let on_contact_message = hooks.on_contact_message.map(|f| EventHandler::new(buffer_size, f));
        let on_newsletter_subscribed = hooks.on_newsletter_subscribed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_order_paid, on_contact_message, on_newsletter_subscribed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_order_paid {
            result.order_paid_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_contact_message {
            result.contact_message_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_newsletter_subscribed {
            result.newsletter_subscribed_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_order_paid {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_contact_message {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_newsletter_subscribed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_paid: Option<Handler<OrderPaidEvent>>,
    pub on_contact_message: Option<Handler<ContactMessageReceivedEvent>>,
    pub on_newsletter_subscribed: Option<Handler<NewsletterSubscribedEvent>>,
}

impl EventHooks {
    pub fn on_order_paid<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderPaidEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_paid = Some(Arc::new(f));
        self
    }

    pub fn on_contact_message<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(ContactMessageReceivedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_contact_message = Some(Arc::new(f));
        self
    }

    pub fn on_newsletter_subscribed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(NewsletterSubscribedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_newsletter_subscribed = Some(Arc::new(f));
        self
    }
}
