use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderStatusType, OrderWithUser},
    order_objects::OrderQueryFilter,
    traits::StatusUpdateResult,
};

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order not found")]
    OrderNotFound,
}

impl From<sqlx::Error> for OrderApiError {
    fn from(e: sqlx::Error) -> Self {
        OrderApiError::DatabaseError(e.to_string())
    }
}

/// The `OrderManagement` trait defines behaviour for order persistence and status transitions.
///
/// Status updates are last-write-wins. There is no locking between the admin status endpoint and payment webhooks,
/// and no idempotency guard against duplicate webhook delivery; a replayed transition simply reapplies the same
/// update.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;

    /// Fetches the order with the given id regardless of owner. Used by webhook processing.
    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderApiError>;

    /// Fetches the order with the given id, but only if it belongs to `user_id`.
    async fn fetch_order_for_user(&self, id: i64, user_id: i64) -> Result<Option<Order>, OrderApiError>;

    /// Fetches a page of the user's orders, newest first, along with the user's total order count.
    async fn fetch_orders_for_user(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Order>, i64), OrderApiError>;

    /// Fetches a page of all orders matching the filter, with customer details attached, newest first.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<(Vec<OrderWithUser>, i64), OrderApiError>;

    /// Sets the order status. On a transition to [`OrderStatusType::Paid`], a unique code is issued in the same
    /// transaction if the order does not have one yet; `code_issued` in the result reports whether that happened.
    async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatusType,
    ) -> Result<StatusUpdateResult, OrderApiError>;

    /// Records the Stripe payment intent id against the order.
    async fn set_stripe_payment_intent(&self, id: i64, intent_id: &str) -> Result<Order, OrderApiError>;

    /// Records the Coinbase Commerce charge id against the order.
    async fn set_coinbase_invoice(&self, id: i64, invoice_id: &str) -> Result<Order, OrderApiError>;
}
