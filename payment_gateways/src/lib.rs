//! Clients for the two payment gateways the site accepts payments through: Stripe for cards and Coinbase Commerce
//! for crypto. Each client wraps the handful of REST calls the storefront needs and verifies the signatures on the
//! webhook deliveries the gateway sends back.

mod coinbase;
mod config;
mod error;
mod signatures;
mod stripe;

mod data_objects;

pub use coinbase::CoinbaseApi;
pub use config::{CoinbaseConfig, StripeConfig};
pub use data_objects::{
    ChargeRequest,
    CoinbaseCharge,
    CoinbaseEvent,
    CoinbaseEventData,
    EventMetadata,
    PaymentIntent,
    PaymentIntentRequest,
    StripeEvent,
    StripeEventData,
    StripeEventObject,
    COINBASE_CHARGE_CONFIRMED,
    COINBASE_CHARGE_FAILED,
    STRIPE_PAYMENT_FAILED,
    STRIPE_PAYMENT_SUCCEEDED,
};
pub use error::PaymentGatewayError;
pub use signatures::{verify_coinbase_signature, verify_stripe_signature, STRIPE_SIGNATURE_TOLERANCE_SECS};
pub use stripe::StripeApi;
