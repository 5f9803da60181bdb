//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (I/O, database access, gateway
//! calls) must be awaited so that worker threads can interleave other requests.

use std::str::FromStr;

use actix_web::{get, web, HttpResponse, Responder};
use fcl_commerce_engine::{
    catalog_objects::{InitiativeQueryFilter, ProductQueryFilter, SortOrder},
    contact_objects::ContactQueryFilter,
    db_types::{
        ContactPriority,
        ContactStatus,
        InitiativeStatus,
        InitiativeUpdate,
        NewContactMessage,
        NewInitiative,
        NewOrder,
        NewProduct,
        NewUser,
        OrderStatusType,
        ProductUpdate,
        Role,
    },
    order_objects::OrderQueryFilter,
    traits::{
        AuthApiError,
        AuthManagement,
        CatalogManagement,
        ContactApiError,
        ContactManagement,
        OrderApiError,
        OrderManagement,
        SettingsManagement,
    },
    AuthApi,
    CatalogApi,
    ContactApi,
    OrderFlowApi,
    SettingsApi,
};
use fcl_common::UsdCents;
use log::*;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::{
    auth::{hash_password, verify_password, JwtClaims, TokenIssuer},
    data_objects::{
        AdminOrderParams,
        ContactForm,
        ContactListParams,
        InitiativeCreateRequest,
        InitiativeQueryParams,
        InitiativeUpdateRequest,
        JsonResponse,
        LoginRequest,
        MessageStatusRequest,
        MyOrdersParams,
        NewsletterRequest,
        OrderCreateRequest,
        OrderStatusRequest,
        PaginatedResponse,
        ProductCreateRequest,
        ProductQueryParams,
        ProductUpdateRequest,
        RegisterRequest,
        SettingUpdateRequest,
    },
    errors::{AuthError, ServerError, ValidationErrors},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal requires [$($roles:ty),*]) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name)
                        .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$($roles:ty),*])  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

fn is_valid_email(email: &str) -> bool {
    let Ok(re) = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$") else {
        return false;
    };
    re.is_match(email)
}

fn sort_order(param: Option<&str>) -> SortOrder {
    param.and_then(|s| SortOrder::from_str(s).ok()).unwrap_or_default()
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------

route!(register => Post "/auth/register" impl AuthManagement);
/// Creates a new `USER`-role account and signs the caller in.
///
/// The password is hashed with Argon2id before it goes anywhere near the database. A successful registration
/// returns the new user record and a fresh access token, so the storefront can log the user in immediately.
pub async fn register<B: AuthManagement>(
    body: web::Json<RegisterRequest>,
    api: web::Data<AuthApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let body = body.into_inner();
    let mut errors = ValidationErrors::new();
    match body.email.as_deref() {
        Some(email) if is_valid_email(email) => {},
        _ => errors.add("email", "Valid email is required"),
    }
    match body.password.as_deref() {
        Some(p) if p.len() >= 8 => {},
        _ => errors.add("password", "Password must be at least 8 characters long"),
    }
    errors.into_result()?;
    let (email, password) = match (body.email, body.password) {
        (Some(e), Some(p)) => (e, p),
        _ => return Err(ServerError::Unspecified("Validation let an empty credential through".into())),
    };
    debug!("💻️ Registration request for {email}");
    let hash = hash_password(&password)?;
    let user = NewUser::new(email, hash).with_display_name(body.display_name);
    let user = api.register(user).await.map_err(|e| match e {
        AuthApiError::EmailAlreadyRegistered => ServerError::BadRequest("Email is already registered".into()),
        e => {
            error!("💻️ Could not register user. {e}");
            ServerError::BackendError("Failed to register user".into())
        },
    })?;
    let token = signer.issue_token(&user)?;
    info!("💻️ New user registered: {}", user.email);
    Ok(HttpResponse::Created()
        .json(JsonResponse::data_with_message(json!({ "user": user, "token": token }), "User registered successfully")))
}

route!(login => Post "/auth/login" impl AuthManagement);
/// Verifies the caller's credentials and issues an access token.
///
/// Unknown emails, deactivated accounts and wrong passwords are indistinguishable from the outside; all of them
/// return a 401 with the same message.
pub async fn login<B: AuthManagement>(
    body: web::Json<LoginRequest>,
    api: web::Data<AuthApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let body = body.into_inner();
    let (email, password) = match (body.email, body.password) {
        (Some(e), Some(p)) => (e, p),
        _ => return Err(AuthError::InvalidCredentials.into()),
    };
    trace!("💻️ Login request for {email}");
    let user = api.user_by_email(&email).await.map_err(|e| {
        error!("💻️ Could not look up user during login. {e}");
        ServerError::BackendError("Failed to log in".into())
    })?;
    let user = match user {
        Some(u) if u.is_active && verify_password(&password, &u.password_hash) => u,
        _ => {
            debug!("💻️ Failed login attempt for {email}");
            return Err(AuthError::InvalidCredentials.into());
        },
    };
    let token = signer.issue_token(&user)?;
    debug!("💻️ {} logged in", user.email);
    Ok(HttpResponse::Ok().json(JsonResponse::data(json!({ "user": user, "token": token }))))
}

route!(me => Get "/auth/me" impl AuthManagement where requires [Role::User]);
pub async fn me<A: AuthManagement>(
    claims: JwtClaims,
    api: web::Data<AuthApi<A>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET current user for #{}", claims.sub);
    let user = api.user_by_id(claims.sub).await.map_err(|e| {
        error!("💻️ Could not fetch user #{}. {e}", claims.sub);
        ServerError::BackendError("Failed to fetch user".into())
    })?;
    let user = user.ok_or_else(|| ServerError::NoRecordFound("User not found".into()))?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(user)))
}

//----------------------------------------------   Products  ----------------------------------------------------

route!(products => Get "/products" impl CatalogManagement);
pub async fn products<B: CatalogManagement>(
    params: web::Query<ProductQueryParams>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let params = params.into_inner();
    trace!("💻️ GET products, page {} limit {}", params.page, params.limit);
    let mut filter = ProductQueryFilter::default()
        .with_pagination(params.page, params.limit)
        .with_sorting(params.sort_by, sort_order(params.sort_order.as_deref()));
    if let Some(category) = params.category {
        filter = filter.with_category(category);
    }
    if let Some(search) = params.search {
        filter = filter.with_search(search);
    }
    let (page, limit) = (filter.page, filter.limit);
    let (products, total) = api.search_products(filter).await.map_err(|e| {
        error!("💻️ Could not fetch products. {e}");
        ServerError::BackendError("Failed to fetch products".into())
    })?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(products, page, limit, total)))
}

route!(featured_products => Get "/products/featured/list" impl CatalogManagement);
pub async fn featured_products<B: CatalogManagement>(
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET featured products");
    let products = api.featured_products(6).await.map_err(|e| {
        error!("💻️ Could not fetch featured products. {e}");
        ServerError::BackendError("Failed to fetch featured products".into())
    })?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(products)))
}

route!(product => Get "/products/{sku}" impl CatalogManagement);
pub async fn product<B: CatalogManagement>(
    path: web::Path<String>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let sku = path.into_inner();
    trace!("💻️ GET product {sku}");
    let product = api.product_by_sku(&sku).await.map_err(|e| {
        error!("💻️ Could not fetch product {sku}. {e}");
        ServerError::BackendError("Failed to fetch product".into())
    })?;
    let product = product.ok_or_else(|| ServerError::NoRecordFound("Product not found".into()))?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(product)))
}

route!(create_product => Post "/products" impl CatalogManagement where requires [Role::Admin]);
pub async fn create_product<A: CatalogManagement>(
    body: web::Json<ProductCreateRequest>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let body = body.into_inner();
    let mut errors = ValidationErrors::new();
    if body.title.as_deref().map_or(true, str::is_empty) {
        errors.add("title", "Title is required");
    }
    if body.sku.as_deref().map_or(true, str::is_empty) {
        errors.add("sku", "SKU is required");
    }
    let price = match body.price.map(UsdCents::round_from_dollars) {
        Some(Ok(price)) => Some(price),
        _ => {
            errors.add("price", "Price must be a number");
            None
        },
    };
    if body.description.as_deref().map_or(true, str::is_empty) {
        errors.add("description", "Description is required");
    }
    if body.initiative_id.as_deref().map_or(true, str::is_empty) {
        errors.add("initiativeId", "Initiative ID is required");
    }
    errors.into_result()?;
    let (Some(sku), Some(title), Some(description), Some(price)) = (body.sku, body.title, body.description, price)
    else {
        return Err(ServerError::Unspecified("Validation let an empty product field through".into()));
    };
    debug!("💻️ Creating product {sku}");
    let mut product = NewProduct::new(sku, title, description, price);
    product.initiative_id = body.initiative_id;
    product.images = body.images.unwrap_or_default();
    product.inventory_count = body.inventory_count.unwrap_or_default();
    product.stripe_price_id = body.stripe_price_id;
    product.crypto_enabled = body.crypto_enabled.unwrap_or_default();
    product.featured = body.featured.unwrap_or_default();
    product.metadata = body.metadata;
    let product = api.create_product(product).await.map_err(|e| {
        error!("💻️ Could not create product. {e}");
        ServerError::BackendError("Failed to create product".into())
    })?;
    info!("💻️ Product {} created", product.sku);
    Ok(HttpResponse::Created().json(JsonResponse::data_with_message(product, "Product created successfully")))
}

route!(update_product => Put "/products/{sku}" impl CatalogManagement where requires [Role::Admin]);
pub async fn update_product<A: CatalogManagement>(
    path: web::Path<String>,
    body: web::Json<ProductUpdateRequest>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let sku = path.into_inner();
    let body = body.into_inner();
    let mut errors = ValidationErrors::new();
    if matches!(body.title.as_deref(), Some("")) {
        errors.add("title", "Title cannot be empty");
    }
    if matches!(body.description.as_deref(), Some("")) {
        errors.add("description", "Description cannot be empty");
    }
    let price = match body.price.map(UsdCents::round_from_dollars) {
        Some(Ok(price)) => Some(price),
        Some(Err(_)) => {
            errors.add("price", "Price must be a number");
            None
        },
        None => None,
    };
    errors.into_result()?;
    debug!("💻️ Updating product {sku}");
    let update = ProductUpdate {
        title: body.title,
        description: body.description,
        price,
        images: body.images,
        inventory_count: body.inventory_count,
        initiative_id: body.initiative_id,
        metadata: body.metadata,
        stripe_price_id: body.stripe_price_id,
        crypto_enabled: body.crypto_enabled,
        featured: body.featured,
        is_active: body.is_active,
    };
    let product = api.update_product(&sku, update).await.map_err(|e| {
        error!("💻️ Could not update product {sku}. {e}");
        ServerError::BackendError("Failed to update product".into())
    })?;
    let product = product.ok_or_else(|| ServerError::NoRecordFound("Product not found".into()))?;
    Ok(HttpResponse::Ok().json(JsonResponse::data_with_message(product, "Product updated successfully")))
}

route!(delete_product => Delete "/products/{sku}" impl CatalogManagement where requires [Role::Admin]);
/// Soft delete. The product stays in the database (and remains fetchable by SKU) but disappears from listings.
pub async fn delete_product<A: CatalogManagement>(
    path: web::Path<String>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let sku = path.into_inner();
    debug!("💻️ Deleting product {sku}");
    let product = api.deactivate_product(&sku).await.map_err(|e| {
        error!("💻️ Could not delete product {sku}. {e}");
        ServerError::BackendError("Failed to delete product".into())
    })?;
    product.ok_or_else(|| ServerError::NoRecordFound("Product not found".into()))?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Product deleted successfully")))
}

//----------------------------------------------   Initiatives  ----------------------------------------------------

route!(initiatives => Get "/initiatives" impl CatalogManagement);
pub async fn initiatives<B: CatalogManagement>(
    params: web::Query<InitiativeQueryParams>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let params = params.into_inner();
    trace!("💻️ GET initiatives, page {} limit {}", params.page, params.limit);
    let mut filter = InitiativeQueryFilter::default()
        .with_pagination(params.page, params.limit)
        .with_sorting(params.sort_by, sort_order(params.sort_order.as_deref()));
    if fcl_common::parse_boolean_flag(params.featured, false) {
        filter = filter.with_featured(true);
    }
    if let Some(search) = params.search {
        filter = filter.with_search(search);
    }
    let (page, limit) = (filter.page, filter.limit);
    let (initiatives, total) = api.search_initiatives(filter).await.map_err(|e| {
        error!("💻️ Could not fetch initiatives. {e}");
        ServerError::BackendError("Failed to fetch initiatives".into())
    })?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(initiatives, page, limit, total)))
}

route!(featured_initiatives => Get "/initiatives/featured/list" impl CatalogManagement);
pub async fn featured_initiatives<B: CatalogManagement>(
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET featured initiatives");
    let initiatives = api.featured_initiatives(6).await.map_err(|e| {
        error!("💻️ Could not fetch featured initiatives. {e}");
        ServerError::BackendError("Failed to fetch featured initiatives".into())
    })?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(initiatives)))
}

route!(initiative => Get "/initiatives/{slug}" impl CatalogManagement);
pub async fn initiative<B: CatalogManagement>(
    path: web::Path<String>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let slug = path.into_inner();
    trace!("💻️ GET initiative {slug}");
    let initiative = api.initiative_by_slug(&slug).await.map_err(|e| {
        error!("💻️ Could not fetch initiative {slug}. {e}");
        ServerError::BackendError("Failed to fetch initiative".into())
    })?;
    let initiative = initiative.ok_or_else(|| ServerError::NoRecordFound("Initiative not found".into()))?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(initiative)))
}

route!(create_initiative => Post "/initiatives" impl CatalogManagement where requires [Role::Admin]);
pub async fn create_initiative<A: CatalogManagement>(
    body: web::Json<InitiativeCreateRequest>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let body = body.into_inner();
    let mut errors = ValidationErrors::new();
    if body.title.as_deref().map_or(true, str::is_empty) {
        errors.add("title", "Title is required");
    }
    if body.slug.as_deref().map_or(true, str::is_empty) {
        errors.add("slug", "Slug is required");
    }
    if body.summary.as_deref().map_or(true, str::is_empty) {
        errors.add("summary", "Summary is required");
    }
    let status = match body.status.as_deref().map(InitiativeStatus::from_str) {
        Some(Ok(status)) => Some(status),
        Some(Err(_)) => {
            errors.add("status", "Invalid status");
            None
        },
        None => None,
    };
    errors.into_result()?;
    let (Some(slug), Some(title), Some(summary)) = (body.slug, body.title, body.summary) else {
        return Err(ServerError::Unspecified("Validation let an empty initiative field through".into()));
    };
    debug!("💻️ Creating initiative {slug}");
    let mut initiative = NewInitiative::new(slug, title, summary);
    initiative.long_description = body.long_description;
    initiative.hero_image = body.hero_image;
    initiative.gallery = body.gallery.unwrap_or_default();
    initiative.featured = body.featured.unwrap_or_default();
    initiative.display_order = body.order.unwrap_or_default();
    initiative.external_docs_link = body.external_docs_link;
    if let Some(status) = status {
        initiative.status = status;
    }
    let initiative = api.create_initiative(initiative).await.map_err(|e| {
        error!("💻️ Could not create initiative. {e}");
        ServerError::BackendError("Failed to create initiative".into())
    })?;
    info!("💻️ Initiative {} created", initiative.slug);
    Ok(HttpResponse::Created().json(JsonResponse::data_with_message(initiative, "Initiative created successfully")))
}

route!(update_initiative => Put "/initiatives/{slug}" impl CatalogManagement where requires [Role::Admin]);
pub async fn update_initiative<A: CatalogManagement>(
    path: web::Path<String>,
    body: web::Json<InitiativeUpdateRequest>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let slug = path.into_inner();
    let body = body.into_inner();
    let mut errors = ValidationErrors::new();
    if matches!(body.title.as_deref(), Some("")) {
        errors.add("title", "Title cannot be empty");
    }
    if matches!(body.summary.as_deref(), Some("")) {
        errors.add("summary", "Summary cannot be empty");
    }
    let status = match body.status.as_deref().map(InitiativeStatus::from_str) {
        Some(Ok(status)) => Some(status),
        Some(Err(_)) => {
            errors.add("status", "Invalid status");
            None
        },
        None => None,
    };
    errors.into_result()?;
    debug!("💻️ Updating initiative {slug}");
    let update = InitiativeUpdate {
        title: body.title,
        summary: body.summary,
        long_description: body.long_description,
        hero_image: body.hero_image,
        gallery: body.gallery,
        featured: body.featured,
        display_order: body.order,
        status,
        external_docs_link: body.external_docs_link,
    };
    let initiative = api.update_initiative(&slug, update).await.map_err(|e| {
        error!("💻️ Could not update initiative {slug}. {e}");
        ServerError::BackendError("Failed to update initiative".into())
    })?;
    let initiative = initiative.ok_or_else(|| ServerError::NoRecordFound("Initiative not found".into()))?;
    Ok(HttpResponse::Ok().json(JsonResponse::data_with_message(initiative, "Initiative updated successfully")))
}

route!(delete_initiative => Delete "/initiatives/{slug}" impl CatalogManagement where requires [Role::Admin]);
pub async fn delete_initiative<A: CatalogManagement>(
    path: web::Path<String>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let slug = path.into_inner();
    debug!("💻️ Deleting initiative {slug}");
    let initiative = api.deactivate_initiative(&slug).await.map_err(|e| {
        error!("💻️ Could not delete initiative {slug}. {e}");
        ServerError::BackendError("Failed to delete initiative".into())
    })?;
    initiative.ok_or_else(|| ServerError::NoRecordFound("Initiative not found".into()))?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Initiative deleted successfully")))
}

//----------------------------------------------   Orders  ----------------------------------------------------

route!(create_order => Post "/orders" impl OrderManagement where requires [Role::User]);
/// Creates a new order for the caller.
///
/// The cart contents, billing and shipping details are stored as opaque JSON blobs; the engine does not inspect
/// them. The total arrives in dollars and is stored in cents. New orders always start out `pending`.
pub async fn create_order<A: OrderManagement>(
    claims: JwtClaims,
    body: web::Json<OrderCreateRequest>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let body = body.into_inner();
    let mut errors = ValidationErrors::new();
    if body.items.as_deref().map_or(true, <[Value]>::is_empty) {
        errors.add("items", "Items array is required");
    }
    let total = match body.total.map(UsdCents::round_from_dollars) {
        Some(Ok(total)) => Some(total),
        _ => {
            errors.add("total", "Total must be a number");
            None
        },
    };
    if !body.billing_info.as_ref().map_or(false, Value::is_object) {
        errors.add("billingInfo", "Billing info is required");
    }
    if !body.shipping_info.as_ref().map_or(false, Value::is_object) {
        errors.add("shippingInfo", "Shipping info is required");
    }
    errors.into_result()?;
    let (Some(items), Some(total), Some(billing), Some(shipping)) =
        (body.items, total, body.billing_info, body.shipping_info)
    else {
        return Err(ServerError::Unspecified("Validation let an empty order field through".into()));
    };
    let items = serde_json::to_string(&items).map_err(|e| ServerError::Unspecified(e.to_string()))?;
    let billing = serde_json::to_string(&billing).map_err(|e| ServerError::Unspecified(e.to_string()))?;
    let shipping = serde_json::to_string(&shipping).map_err(|e| ServerError::Unspecified(e.to_string()))?;
    let order =
        NewOrder::new(claims.sub, items, total, billing, shipping).with_payment_method(body.payment_method);
    debug!("🔄️ Creating order {} for user #{}", order.order_number, claims.sub);
    let order = api.process_new_order(order).await.map_err(|e| {
        error!("🔄️ Could not create order. {e}");
        ServerError::BackendError("Failed to create order".into())
    })?;
    info!("🔄️ Order {} created", order.order_number);
    Ok(HttpResponse::Created().json(JsonResponse::data_with_message(order, "Order created successfully")))
}

route!(my_orders => Get "/orders/my-orders" impl OrderManagement where requires [Role::User]);
pub async fn my_orders<A: OrderManagement>(
    claims: JwtClaims,
    params: web::Query<MyOrdersParams>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let params = params.into_inner();
    trace!("💻️ GET orders for user #{}", claims.sub);
    let (orders, total) = api.orders_for_user(claims.sub, params.page, params.limit).await.map_err(|e| {
        error!("💻️ Could not fetch orders for user #{}. {e}", claims.sub);
        ServerError::BackendError("Failed to fetch orders".into())
    })?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(orders, params.page, params.limit, total)))
}

route!(order => Get "/orders/{id}" impl OrderManagement where requires [Role::User]);
/// Fetches one of the caller's own orders. Another user's order id yields the same 404 as a nonexistent one.
pub async fn order<A: OrderManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET order #{id} for user #{}", claims.sub);
    let order = api.order_for_user(id, claims.sub).await.map_err(|e| {
        error!("💻️ Could not fetch order #{id}. {e}");
        ServerError::BackendError("Failed to fetch order".into())
    })?;
    let order = order.ok_or_else(|| ServerError::NoRecordFound("Order not found".into()))?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(order)))
}

/// The statuses an admin may set by hand. `payment_failed` is reserved for webhook processing.
const MANUAL_ORDER_STATUSES: [OrderStatusType; 5] = [
    OrderStatusType::Pending,
    OrderStatusType::Paid,
    OrderStatusType::Shipped,
    OrderStatusType::Delivered,
    OrderStatusType::Cancelled,
];

route!(update_order_status => Put "/orders/{id}/status" impl OrderManagement where requires [Role::Admin]);
/// Manually moves an order to a new status. A transition to `paid` runs the full paid flow, unique code and
/// confirmation email included, exactly as if a payment webhook had landed.
pub async fn update_order_status<A: OrderManagement>(
    path: web::Path<i64>,
    body: web::Json<OrderStatusRequest>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let status = body
        .into_inner()
        .status
        .as_deref()
        .and_then(|s| OrderStatusType::from_str(s).ok())
        .filter(|s| MANUAL_ORDER_STATUSES.contains(s));
    let Some(status) = status else {
        let mut errors = ValidationErrors::new();
        errors.add("status", "Invalid status");
        return Err(ServerError::ValidationError(errors));
    };
    debug!("🔄️ Setting order #{id} to {status}");
    let order = api.update_status(id, status).await.map_err(|e| match e {
        OrderApiError::OrderNotFound => ServerError::NoRecordFound("Order not found".into()),
        e => {
            error!("🔄️ Could not update status for order #{id}. {e}");
            ServerError::BackendError("Failed to update order status".into())
        },
    })?;
    Ok(HttpResponse::Ok().json(JsonResponse::data_with_message(order, "Order status updated successfully")))
}

route!(admin_orders => Get "/orders/admin/all" impl OrderManagement where requires [Role::Admin]);
pub async fn admin_orders<A: OrderManagement>(
    params: web::Query<AdminOrderParams>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let params = params.into_inner();
    trace!("💻️ GET all orders, page {} limit {}", params.page, params.limit);
    let mut filter = OrderQueryFilter::default().with_pagination(params.page, params.limit);
    if let Some(status) = params.status.as_deref() {
        let status = OrderStatusType::from_str(status).map_err(|_| {
            let mut errors = ValidationErrors::new();
            errors.add("status", "Invalid status");
            ServerError::ValidationError(errors)
        })?;
        filter = filter.with_status(status);
    }
    if let Some(search) = params.search {
        filter = filter.with_search(search);
    }
    let (orders, total) = api.search_orders(filter).await.map_err(|e| {
        error!("💻️ Could not fetch orders. {e}");
        ServerError::BackendError("Failed to fetch orders".into())
    })?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(orders, params.page, params.limit, total)))
}

//----------------------------------------------   Contact  ----------------------------------------------------

route!(submit_contact => Post "/contact" impl ContactManagement);
/// Stores a contact-form submission. The admin notification email is dispatched via the engine's
/// contact-message event, so a broken SMTP relay never loses the message itself.
pub async fn submit_contact<B: ContactManagement>(
    body: web::Json<ContactForm>,
    api: web::Data<ContactApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let body = body.into_inner();
    let mut errors = ValidationErrors::new();
    if body.name.as_deref().map_or(true, str::is_empty) {
        errors.add("name", "Name is required");
    }
    match body.email.as_deref() {
        Some(email) if is_valid_email(email) => {},
        _ => errors.add("email", "Valid email is required"),
    }
    if body.subject.as_deref().map_or(true, str::is_empty) {
        errors.add("subject", "Subject is required");
    }
    if body.message.as_deref().map_or(true, str::is_empty) {
        errors.add("message", "Message is required");
    }
    errors.into_result()?;
    let (Some(name), Some(email), Some(subject), Some(message)) =
        (body.name, body.email, body.subject, body.message)
    else {
        return Err(ServerError::Unspecified("Validation let an empty contact field through".into()));
    };
    debug!("📮️ Contact form submission from {email}");
    let message = api.submit_message(NewContactMessage::new(name, email, subject, message)).await.map_err(|e| {
        error!("📮️ Could not store contact message. {e}");
        ServerError::BackendError("Failed to submit contact form".into())
    })?;
    Ok(HttpResponse::Created().json(JsonResponse::data_with_message(message, "Contact message submitted successfully")))
}

route!(contact_messages => Get "/contact/messages" impl ContactManagement where requires [Role::Admin]);
pub async fn contact_messages<A: ContactManagement>(
    params: web::Query<ContactListParams>,
    api: web::Data<ContactApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let params = params.into_inner();
    trace!("💻️ GET contact messages, page {} limit {}", params.page, params.limit);
    let mut filter = ContactQueryFilter::default().with_pagination(params.page, params.limit);
    if let Some(status) = params.status.as_deref().and_then(|s| ContactStatus::from_str(s).ok()) {
        filter = filter.with_status(status);
    }
    if let Some(priority) = params.priority.as_deref().and_then(|s| ContactPriority::from_str(s).ok()) {
        filter = filter.with_priority(priority);
    }
    let (messages, total) = api.messages(filter).await.map_err(|e| {
        error!("💻️ Could not fetch contact messages. {e}");
        ServerError::BackendError("Failed to fetch contact messages".into())
    })?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(messages, params.page, params.limit, total)))
}

route!(update_message_status => Put "/contact/messages/{id}/status" impl ContactManagement where requires [Role::Admin]);
pub async fn update_message_status<A: ContactManagement>(
    path: web::Path<i64>,
    body: web::Json<MessageStatusRequest>,
    api: web::Data<ContactApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let status = body.into_inner().status.as_deref().and_then(|s| ContactStatus::from_str(s).ok());
    let Some(status) = status else {
        let mut errors = ValidationErrors::new();
        errors.add("status", "Invalid status");
        return Err(ServerError::ValidationError(errors));
    };
    debug!("📮️ Setting contact message #{id} to {status}");
    let message = api.update_message_status(id, status).await.map_err(|e| {
        error!("📮️ Could not update message #{id}. {e}");
        ServerError::BackendError("Failed to update message status".into())
    })?;
    let message = message.ok_or_else(|| ServerError::NoRecordFound("Message not found".into()))?;
    Ok(HttpResponse::Ok().json(JsonResponse::data_with_message(message, "Message status updated successfully")))
}

route!(newsletter_subscribe => Post "/contact/newsletter" impl ContactManagement);
pub async fn newsletter_subscribe<B: ContactManagement>(
    body: web::Json<NewsletterRequest>,
    api: web::Data<ContactApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let email = body.into_inner().email;
    let email = match email.as_deref() {
        Some(e) if is_valid_email(e) => e.to_string(),
        _ => {
            let mut errors = ValidationErrors::new();
            errors.add("email", "Valid email is required");
            return Err(ServerError::ValidationError(errors));
        },
    };
    debug!("📮️ Newsletter subscription for {email}");
    api.subscribe(&email).await.map_err(|e| match e {
        ContactApiError::AlreadySubscribed => ServerError::BadRequest("Email is already subscribed".into()),
        e => {
            error!("📮️ Could not subscribe {email}. {e}");
            ServerError::BackendError("Failed to subscribe to newsletter".into())
        },
    })?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Successfully subscribed to newsletter")))
}

route!(newsletter_unsubscribe => Post "/contact/newsletter/unsubscribe" impl ContactManagement);
pub async fn newsletter_unsubscribe<B: ContactManagement>(
    body: web::Json<NewsletterRequest>,
    api: web::Data<ContactApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let email = body.into_inner().email;
    let email = match email.as_deref() {
        Some(e) if is_valid_email(e) => e.to_string(),
        _ => {
            let mut errors = ValidationErrors::new();
            errors.add("email", "Valid email is required");
            return Err(ServerError::ValidationError(errors));
        },
    };
    debug!("📮️ Newsletter unsubscribe for {email}");
    api.unsubscribe(&email).await.map_err(|e| match e {
        ContactApiError::NotSubscribed => {
            ServerError::NoRecordFound("Email not found in newsletter subscriptions".into())
        },
        e => {
            error!("📮️ Could not unsubscribe {email}. {e}");
            ServerError::BackendError("Failed to unsubscribe from newsletter".into())
        },
    })?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Successfully unsubscribed from newsletter")))
}

//----------------------------------------------   Settings  ----------------------------------------------------

route!(settings => Get "/settings" impl SettingsManagement);
/// Returns every site setting as a single `{key: value}` object. Values are stored as JSON documents and are
/// returned parsed; a value that is not valid JSON comes back as a plain string.
pub async fn settings<B: SettingsManagement>(api: web::Data<SettingsApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET settings");
    let settings = api.fetch_settings().await.map_err(|e| {
        error!("💻️ Could not fetch settings. {e}");
        ServerError::BackendError("Failed to fetch settings".into())
    })?;
    let mut data = Map::new();
    for setting in settings {
        let value = serde_json::from_str::<Value>(&setting.value).unwrap_or(Value::String(setting.value));
        data.insert(setting.key, value);
    }
    Ok(HttpResponse::Ok().json(JsonResponse::data(Value::Object(data))))
}

route!(setting => Get "/settings/{key}" impl SettingsManagement);
pub async fn setting<B: SettingsManagement>(
    path: web::Path<String>,
    api: web::Data<SettingsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let key = path.into_inner();
    trace!("💻️ GET setting {key}");
    let setting = api.fetch_setting(&key).await.map_err(|e| {
        error!("💻️ Could not fetch setting {key}. {e}");
        ServerError::BackendError("Failed to fetch setting".into())
    })?;
    let setting = setting.ok_or_else(|| ServerError::NoRecordFound("Setting not found".into()))?;
    let value = serde_json::from_str::<Value>(&setting.value).unwrap_or(Value::String(setting.value));
    Ok(HttpResponse::Ok().json(JsonResponse::data(json!({ "key": setting.key, "value": value }))))
}

route!(update_setting => Put "/settings/{key}" impl SettingsManagement where requires [Role::Admin]);
pub async fn update_setting<A: SettingsManagement>(
    path: web::Path<String>,
    body: web::Json<SettingUpdateRequest>,
    api: web::Data<SettingsApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let key = path.into_inner();
    let Some(value) = body.into_inner().value else {
        let mut errors = ValidationErrors::new();
        errors.add("value", "Value is required");
        return Err(ServerError::ValidationError(errors));
    };
    debug!("💻️ Upserting setting {key}");
    let setting = api.upsert_setting(&key, &value).await.map_err(|e| {
        error!("💻️ Could not update setting {key}. {e}");
        ServerError::BackendError("Failed to update setting".into())
    })?;
    Ok(HttpResponse::Ok().json(JsonResponse::data_with_message(setting, "Setting updated successfully")))
}
