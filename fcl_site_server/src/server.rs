use std::{pin::Pin, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use fcl_commerce_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    AuthApi,
    CatalogApi,
    ContactApi,
    OrderFlowApi,
    SettingsApi,
    SqliteDatabase,
};
use futures::Future;
use log::{info, warn};
use payment_gateways::{CoinbaseApi, StripeApi};

use crate::{
    auth::TokenIssuer,
    config::{ServerConfig, ServerOptions},
    email::EmailService,
    errors::ServerError,
    middleware::{SignatureMiddlewareFactory, SignatureScheme},
    payment_routes::{
        coinbase_webhook,
        stripe_webhook,
        CoinbaseInvoiceRoute,
        StripePaymentIntentRoute,
    },
    routes::{
        health,
        AdminOrdersRoute,
        ContactMessagesRoute,
        CreateInitiativeRoute,
        CreateOrderRoute,
        CreateProductRoute,
        DeleteInitiativeRoute,
        DeleteProductRoute,
        FeaturedInitiativesRoute,
        FeaturedProductsRoute,
        InitiativeRoute,
        InitiativesRoute,
        LoginRoute,
        MeRoute,
        MyOrdersRoute,
        NewsletterSubscribeRoute,
        NewsletterUnsubscribeRoute,
        OrderRoute,
        ProductRoute,
        ProductsRoute,
        RegisterRoute,
        SettingRoute,
        SettingsRoute,
        SubmitContactRoute,
        UpdateInitiativeRoute,
        UpdateMessageStatusRoute,
        UpdateOrderStatusRoute,
        UpdateProductRoute,
        UpdateSettingRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let email = EmailService::new(&config.email).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let hooks = build_event_hooks(db.clone(), email);
    let handlers = EventHandlers::new(10, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Wires the engine's events to the email service. Every hook swallows its own failures; event delivery must
/// never break the order flow that produced the event.
pub fn build_event_hooks(db: SqliteDatabase, email: EmailService) -> EventHooks {
    let mut hooks = EventHooks::default();
    let mail = email.clone();
    hooks.on_order_paid(move |event| {
        let api = AuthApi::new(db.clone());
        let mail = mail.clone();
        let fut = async move {
            let order = event.order;
            info!("📬️ Order {} was paid. Sending confirmation.", order.order_number);
            let user = match api.user_by_id(order.user_id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    warn!("📬️ Order {} belongs to unknown user #{}. No confirmation sent.", order.order_number, order.user_id);
                    return;
                },
                Err(e) => {
                    warn!("📬️ Could not look up the buyer for order {}. {e}", order.order_number);
                    return;
                },
            };
            if let Err(e) = mail.send_order_confirmation(&order, &user.email).await {
                warn!("📬️ Could not send order confirmation for {}. {e}", order.order_number);
            }
        };
        Box::pin(fut) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let mail = email.clone();
    hooks.on_contact_message(move |event| {
        let mail = mail.clone();
        let fut = async move {
            if let Err(e) = mail.send_contact_notification(&event.message).await {
                warn!("📬️ Could not send contact notification for message #{}. {e}", event.message.id);
            }
        };
        Box::pin(fut) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    hooks.on_newsletter_subscribed(move |event| {
        let mail = email.clone();
        let fut = async move {
            if let Err(e) = mail.send_newsletter_welcome(&event.email).await {
                warn!("📬️ Could not send newsletter welcome to {}. {e}", event.email);
            }
        };
        Box::pin(fut) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    // The gateway clients hold a shared reqwest client, so build them once and clone into each worker
    let stripe = StripeApi::new(config.stripe.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let coinbase = CoinbaseApi::new(config.coinbase.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let stripe_webhook_secret = config.stripe.webhook_secret.clone();
    let coinbase_webhook_secret = config.coinbase.webhook_secret.clone();
    let (host, port) = (config.host.clone(), config.port);
    let srv = HttpServer::new(move || {
        let auth_api = AuthApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let orders_api = OrderFlowApi::new(db.clone(), producers.clone());
        let contact_api = ContactApi::new(db.clone(), producers.clone());
        let settings_api = SettingsApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let options = ServerOptions::from_config(&config);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("fcl::access_log"))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(contact_api))
            .app_data(web::Data::new(settings_api))
            .app_data(web::Data::new(jwt_signer))
            .app_data(web::Data::new(options))
            .app_data(web::Data::new(stripe.clone()))
            .app_data(web::Data::new(coinbase.clone()));
        // Literal paths must be registered ahead of their sibling path parameters
        let api_scope = web::scope("/api")
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(MeRoute::<SqliteDatabase>::new())
            .service(FeaturedProductsRoute::<SqliteDatabase>::new())
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(CreateProductRoute::<SqliteDatabase>::new())
            .service(UpdateProductRoute::<SqliteDatabase>::new())
            .service(DeleteProductRoute::<SqliteDatabase>::new())
            .service(ProductRoute::<SqliteDatabase>::new())
            .service(FeaturedInitiativesRoute::<SqliteDatabase>::new())
            .service(InitiativesRoute::<SqliteDatabase>::new())
            .service(CreateInitiativeRoute::<SqliteDatabase>::new())
            .service(UpdateInitiativeRoute::<SqliteDatabase>::new())
            .service(DeleteInitiativeRoute::<SqliteDatabase>::new())
            .service(InitiativeRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(AdminOrdersRoute::<SqliteDatabase>::new())
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new())
            .service(OrderRoute::<SqliteDatabase>::new())
            .service(ContactMessagesRoute::<SqliteDatabase>::new())
            .service(UpdateMessageStatusRoute::<SqliteDatabase>::new())
            .service(NewsletterUnsubscribeRoute::<SqliteDatabase>::new())
            .service(NewsletterSubscribeRoute::<SqliteDatabase>::new())
            .service(SubmitContactRoute::<SqliteDatabase>::new())
            .service(StripePaymentIntentRoute::<SqliteDatabase>::new())
            .service(CoinbaseInvoiceRoute::<SqliteDatabase>::new())
            .service(
                web::resource("/payments/stripe/webhook")
                    .wrap(SignatureMiddlewareFactory::new(SignatureScheme::Stripe, stripe_webhook_secret.clone()))
                    .route(web::post().to(stripe_webhook::<SqliteDatabase>)),
            )
            .service(
                web::resource("/payments/coinbase/webhook")
                    .wrap(SignatureMiddlewareFactory::new(SignatureScheme::Coinbase, coinbase_webhook_secret.clone()))
                    .route(web::post().to(coinbase_webhook::<SqliteDatabase>)),
            )
            .service(UpdateSettingRoute::<SqliteDatabase>::new())
            .service(SettingsRoute::<SqliteDatabase>::new())
            .service(SettingRoute::<SqliteDatabase>::new());
        app.service(health).service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
