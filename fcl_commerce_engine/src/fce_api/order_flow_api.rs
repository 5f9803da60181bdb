use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderStatusType, OrderWithUser},
    events::{EventProducers, OrderPaidEvent},
    helpers::register_on_blockchain,
    order_objects::OrderQueryFilter,
    traits::{OrderApiError, OrderManagement, StatusUpdateResult},
};

/// `OrderFlowApi` is the primary API for handling the order lifecycle: creation, listing, and the status
/// transitions driven by admins and payment webhooks.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    /// Submit a new order.
    ///
    /// The order is persisted with status `pending`. Payment is arranged separately through the payment routes,
    /// and the status only moves off `pending` via [`Self::update_status`].
    pub async fn process_new_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        let order = self.db.insert_order(order).await?;
        debug!(
            "🔄️📦️ Order [{}] created for user #{} with total {}",
            order.order_number, order.user_id, order.total
        );
        Ok(order)
    }

    /// Fetches the order with the given id regardless of owner. Used by webhook processing.
    pub async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderApiError> {
        self.db.fetch_order(id).await
    }

    /// Fetches the order with the given id, but only if it belongs to `user_id`.
    pub async fn order_for_user(&self, id: i64, user_id: i64) -> Result<Option<Order>, OrderApiError> {
        self.db.fetch_order_for_user(id, user_id).await
    }

    /// Fetches a page of the user's orders, newest first, along with the user's total order count.
    pub async fn orders_for_user(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Order>, i64), OrderApiError> {
        self.db.fetch_orders_for_user(user_id, page, limit).await
    }

    /// Fetches a page of all orders matching the filter, with customer details attached.
    pub async fn search_orders(&self, query: OrderQueryFilter) -> Result<(Vec<OrderWithUser>, i64), OrderApiError> {
        self.db.search_orders(query).await
    }

    /// Changes the status of an order.
    ///
    /// On a transition to [`OrderStatusType::Paid`], a unique code is issued in the same transaction if the order
    /// does not have one yet, and the new code is registered on the blockchain. Every transition to `paid` notifies
    /// the order-paid hook subscribers, so a replayed webhook re-sends the confirmation email. There is no
    /// idempotency guard; last write wins.
    pub async fn update_status(&self, id: i64, status: OrderStatusType) -> Result<Order, OrderApiError> {
        trace!("🔄️✅️ Order #{id} is being marked as {status}");
        let StatusUpdateResult { order, code_issued } = self.db.update_order_status(id, status).await?;
        if code_issued {
            if let Some(code) = &order.unique_code {
                let registration = register_on_blockchain(code, &order.order_number);
                debug!(
                    "🔄️✅️ Unique code {code} for order [{}] registered in tx {}",
                    order.order_number, registration.transaction_id
                );
            }
        }
        if order.status == OrderStatusType::Paid {
            self.call_order_paid_hook(&order).await;
        }
        debug!("🔄️✅️ Order [{}] status change to {status} complete", order.order_number);
        Ok(order)
    }

    async fn call_order_paid_hook(&self, order: &Order) {
        for emitter in &self.producers.order_paid_producer {
            debug!("🔄️✅️ Notifying order paid hook subscribers");
            let event = OrderPaidEvent::new(order.clone());
            emitter.publish_event(event).await;
        }
    }

    /// Records the Stripe payment intent id against the order.
    pub async fn set_stripe_payment_intent(&self, id: i64, intent_id: &str) -> Result<Order, OrderApiError> {
        self.db.set_stripe_payment_intent(id, intent_id).await
    }

    /// Records the Coinbase Commerce charge id against the order.
    pub async fn set_coinbase_invoice(&self, id: i64, invoice_id: &str) -> Result<Order, OrderApiError> {
        self.db.set_coinbase_invoice(id, invoice_id).await
    }
}
