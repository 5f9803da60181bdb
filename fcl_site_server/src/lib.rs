//! # FCL site server
//!
//! This crate hosts the HTTP layer of the FCL marketing site. It is responsible for:
//! * Serving the storefront REST API (products, initiatives, orders, contact, settings).
//! * Authenticating users with JWTs and enforcing role-based access control.
//! * Creating Stripe payment intents and Coinbase Commerce charges for pending orders.
//! * Receiving signed payment webhooks and driving the order status flow in the commerce engine.
//! * Dispatching transactional email from engine events (order paid, contact message, newsletter signup).
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! All business logic lives in `fcl_commerce_engine`; handlers here validate input, call the engine APIs and
//! translate the results into the `{success, data, message}` JSON envelope the storefront expects.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod email;
pub mod errors;
pub mod helpers;
pub mod middleware;
pub mod payment_routes;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
