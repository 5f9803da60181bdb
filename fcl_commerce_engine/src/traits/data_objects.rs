use crate::db_types::Order;

/// The result of an order status update.
#[derive(Debug, Clone)]
pub struct StatusUpdateResult {
    pub order: Order,
    /// `true` when this update issued the order's unique code (first transition to paid).
    pub code_issued: bool,
}
