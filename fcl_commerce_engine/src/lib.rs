//! FCL Commerce Engine
//!
//! The commerce engine contains the storage layer and order/payment flow logic for the FCL marketing site. It is
//! server-framework agnostic: the HTTP layer talks to the engine exclusively through the APIs exposed here.
//!
//! The library is divided into two main sections:
//! 1. Database management and control. SQLite is the supported backend. You should never need to access the database
//!    directly; use the public API instead. The exception is the record types stored in the database, which are
//!    defined in the [`db_types`] module and are public.
//! 2. The engine public API ([`CatalogApi`], [`OrderFlowApi`], [`ContactApi`], [`AuthApi`], [`SettingsApi`]). Each
//!    API is generic over a backend that implements the corresponding trait in the [`traits`] module.
//!
//! The engine also emits events when certain actions occur (an order is paid, a contact message arrives, a newsletter
//! subscription is created). A simple actor scheme in [`events`] lets callers hook into these events and perform
//! custom actions, such as sending email.

pub mod db_types;
pub mod events;
mod fce_api;
pub mod helpers;
pub mod traits;

#[cfg(feature = "test_utils")]
pub mod test_utils;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use fce_api::{
    auth_api::AuthApi,
    catalog_api::CatalogApi,
    catalog_objects,
    contact_api::ContactApi,
    contact_objects,
    order_flow_api::OrderFlowApi,
    order_objects,
    settings_api::SettingsApi,
};
