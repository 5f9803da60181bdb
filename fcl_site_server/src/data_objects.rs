//! Request and response shapes for the REST API.
//!
//! Request bodies are camelCase on the wire, matching the storefront client. Fields that are mandatory are still
//! modelled as `Option`s so that handlers can report *every* missing field in a single validation response rather
//! than failing at deserialization with an opaque 400.

use serde::{Deserialize, Serialize};
use serde_json::Value;

//---------------------------------------------  Response envelope  ---------------------------------------------------

/// The standard response envelope. Every non-paginated endpoint responds with
/// `{"success": bool, "data": ..?, "message": ..?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JsonResponse {
    /// A successful response carrying a payload.
    pub fn data<T: Serialize>(data: T) -> Self {
        Self { success: true, data: serde_json::to_value(data).ok(), message: None }
    }

    /// A successful response carrying a payload and a human-readable message.
    pub fn data_with_message<T: Serialize>(data: T, message: &str) -> Self {
        Self { success: true, data: serde_json::to_value(data).ok(), message: Some(message.to_string()) }
    }

    /// A successful response with a message only.
    pub fn success(message: &str) -> Self {
        Self { success: true, data: None, message: Some(message.to_string()) }
    }

    pub fn failure(message: &str) -> Self {
        Self { success: false, data: None, message: Some(message.to_string()) }
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self { page, limit, total, pages }
    }
}

/// A successful list response. The pagination block sits alongside `data`, not inside it.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, limit: i64, total: i64) -> Self {
        Self { success: true, data, pagination: Pagination::new(page, limit, total) }
    }
}

//------------------------------------------------  Auth bodies  ------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

//-----------------------------------------------  Catalog bodies  ----------------------------------------------------

/// Prices arrive in dollars and are converted to cents on the way in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreateRequest {
    pub sku: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub initiative_id: Option<String>,
    pub images: Option<Vec<String>>,
    pub inventory_count: Option<i64>,
    pub stripe_price_id: Option<String>,
    pub crypto_enabled: Option<bool>,
    pub featured: Option<bool>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub initiative_id: Option<String>,
    pub images: Option<Vec<String>>,
    pub inventory_count: Option<i64>,
    pub stripe_price_id: Option<String>,
    pub crypto_enabled: Option<bool>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeCreateRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub long_description: Option<String>,
    pub hero_image: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub order: Option<i64>,
    pub external_docs_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeUpdateRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub long_description: Option<String>,
    pub hero_image: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub order: Option<i64>,
    pub external_docs_link: Option<String>,
}

//------------------------------------------------  Order bodies  -----------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    pub items: Option<Vec<Value>>,
    pub total: Option<f64>,
    pub billing_info: Option<Value>,
    pub shipping_info: Option<Value>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusRequest {
    pub status: Option<String>,
}

//-----------------------------------------  Contact & newsletter bodies  ---------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterRequest {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageStatusRequest {
    pub status: Option<String>,
    pub priority: Option<String>,
}

//----------------------------------------------  Settings bodies  ----------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SettingUpdateRequest {
    pub value: Option<String>,
}

//----------------------------------------------  Payment bodies  -----------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub order_id: Option<i64>,
    pub amount: Option<f64>,
}

//------------------------------------------------  Query params  -----------------------------------------------------

fn default_page() -> i64 {
    1
}

fn default_product_limit() -> i64 {
    12
}

fn default_initiative_limit() -> i64 {
    12
}

fn default_my_orders_limit() -> i64 {
    10
}

fn default_admin_limit() -> i64 {
    20
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQueryParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_product_limit")]
    pub limit: i64,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeQueryParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_initiative_limit")]
    pub limit: i64,
    // `featured=true` in the query string arrives as a string
    pub featured: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MyOrdersParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_my_orders_limit")]
    pub limit: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminOrderParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_admin_limit")]
    pub limit: i64,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactListParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_admin_limit")]
    pub limit: i64,
    pub status: Option<String>,
    pub priority: Option<String>,
}
