//! # Commerce engine public API
//!
//! The `fce_api` module exposes the programmatic API for the commerce engine. The API is modular, so that clients
//! can pick and choose the functionality they need, and each piece can be backed by a different database instance if
//! that ever becomes useful.
//!
//! * [`auth_api`] stores user accounts and their credentials.
//! * [`catalog_api`] covers products and initiatives.
//! * [`order_flow_api`] is the primary API for order creation and the payment-driven status flow. It emits
//!   [`crate::events::OrderPaidEvent`]s when orders transition to paid.
//! * [`contact_api`] handles contact form submissions and newsletter subscriptions, emitting events for both.
//! * [`settings_api`] reads and writes site content settings.
//!
//! The pattern for using all the APIs is the same: an API instance is created by supplying a database backend that
//! implements the trait the API requires, e.g.
//!
//! ```rust,ignore
//! use fcl_commerce_engine::{CatalogApi, SqliteDatabase};
//! let db = SqliteDatabase::new(25).await?;
//! // SqliteDatabase implements CatalogManagement
//! let api = CatalogApi::new(db);
//! let product = api.product_by_sku("QCS-001").await?;
//! ```

pub mod auth_api;
pub mod catalog_api;
pub mod catalog_objects;
pub mod contact_api;
pub mod contact_objects;
pub mod order_flow_api;
pub mod order_objects;
pub mod settings_api;
