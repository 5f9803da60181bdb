use chrono::{DateTime, Utc};
use fcl_common::UsdCents;
use serde::{Deserialize, Serialize};

pub const STRIPE_PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";
pub const STRIPE_PAYMENT_FAILED: &str = "payment_intent.payment_failed";
pub const COINBASE_CHARGE_CONFIRMED: &str = "charge:confirmed";
pub const COINBASE_CHARGE_FAILED: &str = "charge:failed";

/// The inputs for a new Stripe payment intent. The order and user ids are carried in the intent metadata and come
/// back to us in webhook events, which is how a gateway event is matched to an order.
#[derive(Debug, Clone)]
pub struct PaymentIntentRequest {
    pub order_id: i64,
    pub user_id: i64,
    pub amount: UsdCents,
}

impl PaymentIntentRequest {
    pub fn new(order_id: i64, user_id: i64, amount: UsdCents) -> Self {
        Self { order_id, user_id, amount }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
}

/// The inputs for a new Coinbase Commerce charge.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub order_id: i64,
    pub user_id: i64,
    pub order_number: String,
    pub amount: UsdCents,
}

impl ChargeRequest {
    pub fn new(order_id: i64, user_id: i64, order_number: &str, amount: UsdCents) -> Self {
        Self { order_id, user_id, order_number: order_number.to_string(), amount }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinbaseCharge {
    pub id: String,
    pub hosted_url: String,
    pub expires_at: DateTime<Utc>,
}

//--------------------------------------   Webhook payloads   --------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StripeEventData {
    pub object: StripeEventObject,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StripeEventObject {
    pub id: String,
    #[serde(default)]
    pub metadata: EventMetadata,
}

/// Coinbase posts the event at the top level of the webhook body rather than wrapping it in an envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoinbaseEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: CoinbaseEventData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoinbaseEventData {
    pub id: String,
    #[serde(default)]
    pub metadata: EventMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventMetadata {
    #[serde(rename = "orderId", default, skip_serializing_if = "Option::is_none")]
    order_id: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

impl EventMetadata {
    pub fn new(order_id: i64, user_id: i64) -> Self {
        Self { order_id: Some(order_id.to_string()), user_id: Some(user_id.to_string()) }
    }

    /// The order id the gateway echoed back, if one was attached and is numeric. Gateways store metadata as opaque
    /// strings, so events raised against charges we did not create may carry anything, or nothing, here.
    pub fn order_id(&self) -> Option<i64> {
        self.order_id.as_deref().and_then(|id| id.parse().ok())
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id.as_deref().and_then(|id| id.parse().ok())
    }
}
