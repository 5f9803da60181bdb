//! Record types stored by the commerce engine.
//!
//! These structs map one-to-one onto database rows. Wire representations use camelCase field names to match the
//! storefront client; status enums are stored as TEXT columns.
use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use fcl_common::{UsdCents, USD_CURRENCY_CODE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

use crate::helpers::generate_order_number;

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConversionError(String);

//--------------------------------------        Role         ---------------------------------------------------------

/// User roles. Stored (and serialized) as `ADMIN` / `USER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::User => write!(f, "USER"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------        User         ---------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub role: Role,
}

impl NewUser {
    pub fn new<S: Into<String>>(email: S, password_hash: S) -> Self {
        Self { email: email.into(), password_hash: password_hash.into(), display_name: None, role: Role::User }
    }

    pub fn with_display_name(mut self, name: Option<String>) -> Self {
        self.display_name = name;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusType {
    /// The order has been created and no payment has been confirmed.
    Pending,
    /// Payment has been received in full.
    Paid,
    /// A payment attempt was made and rejected by the gateway.
    PaymentFailed,
    /// The order has been dispatched.
    Shipped,
    /// The order has been received by the customer.
    Delivered,
    /// The order has been cancelled by the user or an admin.
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Paid => write!(f, "paid"),
            OrderStatusType::PaymentFailed => write!(f, "payment_failed"),
            OrderStatusType::Shipped => write!(f, "shipped"),
            OrderStatusType::Delivered => write!(f, "delivered"),
            OrderStatusType::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "payment_failed" => Ok(Self::PaymentFailed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------        Order        ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub user_id: i64,
    /// The cart contents, stored as an opaque serialized JSON blob.
    pub items: String,
    pub total: UsdCents,
    pub currency: String,
    pub status: OrderStatusType,
    pub payment_method: Option<String>,
    pub billing_info: String,
    pub shipping_info: String,
    /// Issued once, on the first transition to `paid`. There is no collision check against existing codes.
    pub unique_code: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
    pub coinbase_invoice_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Generated server-side, `FCL-<unix millis>-<6 random alphanumerics>`.
    pub order_number: String,
    pub user_id: i64,
    /// The cart contents as a serialized JSON blob.
    pub items: String,
    pub total: UsdCents,
    pub currency: String,
    pub payment_method: Option<String>,
    pub billing_info: String,
    pub shipping_info: String,
}

impl NewOrder {
    pub fn new(user_id: i64, items: String, total: UsdCents, billing_info: String, shipping_info: String) -> Self {
        Self {
            order_number: generate_order_number(),
            user_id,
            items,
            total,
            currency: USD_CURRENCY_CODE.to_string(),
            payment_method: None,
            billing_info,
            shipping_info,
        }
    }

    pub fn with_payment_method(mut self, method: Option<String>) -> Self {
        self.payment_method = method;
        self
    }
}

/// A customer summary attached to orders in admin listings. Decoded from aliased join columns.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    #[sqlx(rename = "u_id")]
    pub id: i64,
    #[sqlx(rename = "u_email")]
    pub email: String,
    #[sqlx(rename = "u_display_name")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: Order,
    #[sqlx(flatten)]
    #[serde(rename = "user")]
    pub user: OrderCustomer,
}

//--------------------------------------       Product       ---------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub title: String,
    pub description: String,
    pub price: UsdCents,
    pub currency: String,
    pub images: Json<Vec<String>>,
    pub inventory_count: i64,
    /// Slug of the initiative this product belongs to, if any.
    pub initiative_id: Option<String>,
    pub metadata: Option<Json<Value>>,
    pub stripe_price_id: Option<String>,
    pub crypto_enabled: bool,
    pub featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub sku: String,
    pub title: String,
    pub description: String,
    pub price: UsdCents,
    pub currency: String,
    pub images: Vec<String>,
    pub inventory_count: i64,
    pub initiative_id: Option<String>,
    pub metadata: Option<Value>,
    pub stripe_price_id: Option<String>,
    pub crypto_enabled: bool,
    pub featured: bool,
    pub is_active: bool,
}

impl NewProduct {
    pub fn new<S: Into<String>>(sku: S, title: S, description: S, price: UsdCents) -> Self {
        Self {
            sku: sku.into(),
            title: title.into(),
            description: description.into(),
            price,
            currency: USD_CURRENCY_CODE.to_string(),
            images: vec![],
            inventory_count: 0,
            initiative_id: None,
            metadata: None,
            stripe_price_id: None,
            crypto_enabled: false,
            featured: false,
            is_active: true,
        }
    }
}

/// A partial product update. Only the fields that are `Some` are written.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<UsdCents>,
    pub images: Option<Vec<String>>,
    pub inventory_count: Option<i64>,
    pub initiative_id: Option<String>,
    pub metadata: Option<Value>,
    pub stripe_price_id: Option<String>,
    pub crypto_enabled: Option<bool>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() &&
            self.description.is_none() &&
            self.price.is_none() &&
            self.images.is_none() &&
            self.inventory_count.is_none() &&
            self.initiative_id.is_none() &&
            self.metadata.is_none() &&
            self.stripe_price_id.is_none() &&
            self.crypto_enabled.is_none() &&
            self.featured.is_none() &&
            self.is_active.is_none()
    }
}

//--------------------------------------  InitiativeStatus   ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InitiativeStatus {
    Active,
    Inactive,
}

impl Display for InitiativeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitiativeStatus::Active => write!(f, "active"),
            InitiativeStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for InitiativeStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            s => Err(ConversionError(format!("Invalid initiative status: {s}"))),
        }
    }
}

//--------------------------------------     Initiative      ---------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Initiative {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub long_description: Option<String>,
    pub hero_image: Option<String>,
    pub gallery: Json<Vec<String>>,
    pub featured: bool,
    /// Position in storefront listings. `order` on the wire; the column avoids the SQL keyword.
    #[sqlx(rename = "display_order")]
    #[serde(rename = "order")]
    pub display_order: i64,
    pub status: InitiativeStatus,
    pub external_docs_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInitiative {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub long_description: Option<String>,
    pub hero_image: Option<String>,
    pub gallery: Vec<String>,
    pub featured: bool,
    pub display_order: i64,
    pub status: InitiativeStatus,
    pub external_docs_link: Option<String>,
}

impl NewInitiative {
    pub fn new<S: Into<String>>(slug: S, title: S, summary: S) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            summary: summary.into(),
            long_description: None,
            hero_image: None,
            gallery: vec![],
            featured: false,
            display_order: 0,
            status: InitiativeStatus::Active,
            external_docs_link: None,
        }
    }
}

/// A partial initiative update. Only the fields that are `Some` are written.
#[derive(Debug, Clone, Default)]
pub struct InitiativeUpdate {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub long_description: Option<String>,
    pub hero_image: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub display_order: Option<i64>,
    pub status: Option<InitiativeStatus>,
    pub external_docs_link: Option<String>,
}

impl InitiativeUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() &&
            self.summary.is_none() &&
            self.long_description.is_none() &&
            self.hero_image.is_none() &&
            self.gallery.is_none() &&
            self.featured.is_none() &&
            self.display_order.is_none() &&
            self.status.is_none() &&
            self.external_docs_link.is_none()
    }
}

//--------------------------------------    ContactStatus    ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    New,
    Read,
    Replied,
    Closed,
}

impl Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactStatus::New => write!(f, "new"),
            ContactStatus::Read => write!(f, "read"),
            ContactStatus::Replied => write!(f, "replied"),
            ContactStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for ContactStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "read" => Ok(Self::Read),
            "replied" => Ok(Self::Replied),
            "closed" => Ok(Self::Closed),
            s => Err(ConversionError(format!("Invalid message status: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactPriority {
    Low,
    Normal,
    High,
}

impl Display for ContactPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactPriority::Low => write!(f, "low"),
            ContactPriority::Normal => write!(f, "normal"),
            ContactPriority::High => write!(f, "high"),
        }
    }
}

impl FromStr for ContactPriority {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            s => Err(ConversionError(format!("Invalid message priority: {s}"))),
        }
    }
}

//--------------------------------------   ContactMessage    ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub priority: ContactPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl NewContactMessage {
    pub fn new<S: Into<String>>(name: S, email: S, subject: S, message: S) -> Self {
        Self { name: name.into(), email: email.into(), subject: subject.into(), message: message.into() }
    }
}

//---------------------------------- NewsletterSubscription  ---------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSubscription {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------    SiteSetting      ---------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSetting {
    pub id: i64,
    pub key: String,
    /// Typically a JSON document, stored and returned verbatim.
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
