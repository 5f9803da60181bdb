//! # Database backend contracts
//!
//! This module defines the interface contracts that the commerce engine database *backends* need to expose. The HTTP
//! layer never talks to a backend directly; it goes through the API structs in the crate root, which in turn call the
//! traits defined here.
//!
//! * [`AuthManagement`] stores and retrieves user accounts and their credentials.
//! * [`CatalogManagement`] covers the storefront catalog: products and the initiatives they belong to.
//! * [`OrderManagement`] handles order persistence and status transitions, including the paid transition that issues
//!   the order's unique code.
//! * [`ContactManagement`] stores contact form submissions and newsletter subscriptions.
//! * [`SettingsManagement`] is a simple key-value store for site content settings.
mod auth_management;
mod catalog_management;
mod contact_management;
mod data_objects;
mod order_management;
mod settings_management;

pub use auth_management::{AuthApiError, AuthManagement};
pub use catalog_management::{CatalogApiError, CatalogManagement};
pub use contact_management::{ContactApiError, ContactManagement};
pub use data_objects::StatusUpdateResult;
pub use order_management::{OrderApiError, OrderManagement};
pub use settings_management::{SettingsApiError, SettingsManagement};
