//! `SqliteDatabase` is a concrete implementation of the FCL commerce engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{contact, db_url, initiatives, new_pool, orders, products, settings, users};
use crate::{
    catalog_objects::{InitiativeQueryFilter, ProductQueryFilter},
    contact_objects::ContactQueryFilter,
    db_types::{
        ContactMessage,
        ContactStatus,
        Initiative,
        InitiativeUpdate,
        NewContactMessage,
        NewInitiative,
        NewOrder,
        NewProduct,
        NewsletterSubscription,
        NewUser,
        Order,
        OrderStatusType,
        OrderWithUser,
        Product,
        ProductUpdate,
        SiteSetting,
        User,
    },
    helpers::generate_unique_code,
    order_objects::OrderQueryFilter,
    traits::{
        AuthApiError,
        AuthManagement,
        CatalogApiError,
        CatalogManagement,
        ContactApiError,
        ContactManagement,
        OrderApiError,
        OrderManagement,
        SettingsApiError,
        SettingsManagement,
        StatusUpdateResult,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

impl AuthManagement for SqliteDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_email(email, &mut conn).await
    }

    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_id(id, &mut conn).await
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn search_products(&self, query: ProductQueryFilter) -> Result<(Vec<Product>, i64), CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = products::search_products(query, &mut conn).await?;
        Ok(result)
    }

    async fn fetch_product_by_sku(&self, sku: &str) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product_by_sku(sku, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_featured_products(&self, limit: i64) -> Result<Vec<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let products = products::fetch_featured_products(limit, &mut conn).await?;
        Ok(products)
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::insert_product(product, &mut conn).await
    }

    async fn update_product(&self, sku: &str, update: ProductUpdate) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::update_product(sku, update, &mut conn).await?;
        Ok(product)
    }

    async fn deactivate_product(&self, sku: &str) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::deactivate_product(sku, &mut conn).await?;
        Ok(product)
    }

    async fn search_initiatives(
        &self,
        query: InitiativeQueryFilter,
    ) -> Result<(Vec<Initiative>, i64), CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = initiatives::search_initiatives(query, &mut conn).await?;
        Ok(result)
    }

    async fn fetch_initiative_by_slug(&self, slug: &str) -> Result<Option<Initiative>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let initiative = initiatives::fetch_initiative_by_slug(slug, &mut conn).await?;
        Ok(initiative)
    }

    async fn fetch_featured_initiatives(&self, limit: i64) -> Result<Vec<Initiative>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let initiatives = initiatives::fetch_featured_initiatives(limit, &mut conn).await?;
        Ok(initiatives)
    }

    async fn insert_initiative(&self, initiative: NewInitiative) -> Result<Initiative, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        initiatives::insert_initiative(initiative, &mut conn).await
    }

    async fn update_initiative(
        &self,
        slug: &str,
        update: InitiativeUpdate,
    ) -> Result<Option<Initiative>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let initiative = initiatives::update_initiative(slug, update, &mut conn).await?;
        Ok(initiative)
    }

    async fn deactivate_initiative(&self, slug: &str) -> Result<Option<Initiative>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let initiative = initiatives::deactivate_initiative(slug, &mut conn).await?;
        Ok(initiative)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::insert_order(order, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_for_user(&self, id: i64, user_id: i64) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_for_user(id, user_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_orders_for_user(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Order>, i64), OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = orders::fetch_orders_for_user(user_id, page, limit, &mut conn).await?;
        Ok(result)
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<(Vec<OrderWithUser>, i64), OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = orders::search_orders(query, &mut conn).await?;
        Ok(result)
    }

    /// Sets the order status and, in the same transaction, issues a unique code on the first transition to `paid`.
    async fn update_order_status(&self, id: i64, status: OrderStatusType) -> Result<StatusUpdateResult, OrderApiError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::update_order_status(id, status, &mut tx).await?.ok_or(OrderApiError::OrderNotFound)?;
        let (order, code_issued) = if order.status == OrderStatusType::Paid && order.unique_code.is_none() {
            let code = generate_unique_code();
            debug!("🗃️ Issuing unique code {code} to order [{}]", order.order_number);
            let order = orders::set_unique_code(id, &code, &mut tx).await?.ok_or(OrderApiError::OrderNotFound)?;
            (order, true)
        } else {
            (order, false)
        };
        tx.commit().await?;
        Ok(StatusUpdateResult { order, code_issued })
    }

    async fn set_stripe_payment_intent(&self, id: i64, intent_id: &str) -> Result<Order, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::set_stripe_payment_intent(id, intent_id, &mut conn).await?.ok_or(OrderApiError::OrderNotFound)
    }

    async fn set_coinbase_invoice(&self, id: i64, invoice_id: &str) -> Result<Order, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::set_coinbase_invoice(id, invoice_id, &mut conn).await?.ok_or(OrderApiError::OrderNotFound)
    }
}

impl ContactManagement for SqliteDatabase {
    async fn insert_contact_message(&self, message: NewContactMessage) -> Result<ContactMessage, ContactApiError> {
        let mut conn = self.pool.acquire().await?;
        let message = contact::insert_contact_message(message, &mut conn).await?;
        Ok(message)
    }

    async fn search_contact_messages(
        &self,
        query: ContactQueryFilter,
    ) -> Result<(Vec<ContactMessage>, i64), ContactApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = contact::search_contact_messages(query, &mut conn).await?;
        Ok(result)
    }

    async fn update_contact_message_status(
        &self,
        id: i64,
        status: ContactStatus,
    ) -> Result<Option<ContactMessage>, ContactApiError> {
        let mut conn = self.pool.acquire().await?;
        let message = contact::update_contact_message_status(id, status, &mut conn).await?;
        Ok(message)
    }

    async fn subscribe_to_newsletter(&self, email: &str) -> Result<NewsletterSubscription, ContactApiError> {
        let mut conn = self.pool.acquire().await?;
        contact::subscribe_to_newsletter(email, &mut conn).await
    }

    async fn unsubscribe_from_newsletter(&self, email: &str) -> Result<NewsletterSubscription, ContactApiError> {
        let mut conn = self.pool.acquire().await?;
        contact::unsubscribe_from_newsletter(email, &mut conn).await
    }
}

impl SettingsManagement for SqliteDatabase {
    async fn fetch_settings(&self) -> Result<Vec<SiteSetting>, SettingsApiError> {
        let mut conn = self.pool.acquire().await?;
        let settings = settings::fetch_settings(&mut conn).await?;
        Ok(settings)
    }

    async fn fetch_setting(&self, key: &str) -> Result<Option<SiteSetting>, SettingsApiError> {
        let mut conn = self.pool.acquire().await?;
        let setting = settings::fetch_setting(key, &mut conn).await?;
        Ok(setting)
    }

    async fn upsert_setting(&self, key: &str, value: &str) -> Result<SiteSetting, SettingsApiError> {
        let mut conn = self.pool.acquire().await?;
        let setting = settings::upsert_setting(key, value, &mut conn).await?;
        Ok(setting)
    }
}
