//! Payment endpoints: intent/charge creation and the gateway webhooks.
//!
//! The create endpoints are authenticated storefront calls; an order id that does not belong to the caller is a
//! 404, same as one that does not exist. The webhook endpoints are registered behind
//! [`crate::middleware::SignatureMiddlewareFactory`], so by the time a handler runs the delivery has already been
//! authenticated against the gateway's webhook secret.
//!
//! Webhook processing is deliberately forgiving: events for charges we did not create, events without an order id
//! in their metadata, and events for orders that have since vanished are all logged and acknowledged with
//! `{received: true}`. Returning an error would only make the gateway retry a delivery that can never succeed.

use actix_web::{web, HttpRequest, HttpResponse};
use fcl_commerce_engine::{
    db_types::{Order, OrderStatusType, Role},
    traits::{OrderApiError, OrderManagement},
    OrderFlowApi,
};
use log::*;
use payment_gateways::{
    ChargeRequest,
    CoinbaseApi,
    CoinbaseEvent,
    PaymentIntentRequest,
    StripeApi,
    StripeEvent,
    COINBASE_CHARGE_CONFIRMED,
    COINBASE_CHARGE_FAILED,
    STRIPE_PAYMENT_FAILED,
    STRIPE_PAYMENT_SUCCEEDED,
};
use serde_json::json;

use crate::{
    auth::JwtClaims,
    config::ServerOptions,
    data_objects::{JsonResponse, PaymentRequest},
    errors::{ServerError, ValidationErrors},
    helpers::get_remote_ip,
    route,
};

/// Pulls the validated order out of a payment request, or reports which fields are missing.
async fn order_for_payment<A: OrderManagement>(
    claims: &JwtClaims,
    body: PaymentRequest,
    api: &OrderFlowApi<A>,
    failure_message: &str,
) -> Result<(i64, Order), ServerError> {
    let mut errors = ValidationErrors::new();
    if body.order_id.is_none() {
        errors.add("orderId", "Order ID is required");
    }
    if body.amount.is_none() {
        errors.add("amount", "Amount is required");
    }
    errors.into_result()?;
    let Some(order_id) = body.order_id else {
        return Err(ServerError::Unspecified("Validation let an empty order id through".into()));
    };
    let order = api.order_for_user(order_id, claims.sub).await.map_err(|e| {
        error!("💳️ Could not fetch order #{order_id}. {e}");
        ServerError::BackendError(failure_message.to_string())
    })?;
    let order = order.ok_or_else(|| ServerError::NoRecordFound("Order not found".into()))?;
    Ok((order_id, order))
}

route!(stripe_payment_intent => Post "/payments/stripe/create-payment-intent" impl OrderManagement where requires [Role::User]);
pub async fn stripe_payment_intent<A: OrderManagement>(
    claims: JwtClaims,
    body: web::Json<PaymentRequest>,
    api: web::Data<OrderFlowApi<A>>,
    stripe: web::Data<StripeApi>,
) -> Result<HttpResponse, ServerError> {
    const FAILURE: &str = "Failed to create payment intent";
    let (order_id, order) = order_for_payment(&claims, body.into_inner(), api.as_ref(), FAILURE).await?;
    debug!("💳️ Creating Stripe payment intent for order {}", order.order_number);
    let request = PaymentIntentRequest::new(order_id, claims.sub, order.total);
    let intent = stripe.create_payment_intent(&request).await.map_err(|e| {
        error!("💳️ Stripe rejected the payment intent for order #{order_id}. {e}");
        ServerError::BackendError(FAILURE.into())
    })?;
    api.set_stripe_payment_intent(order_id, &intent.id).await.map_err(|e| {
        error!("💳️ Could not store payment intent id on order #{order_id}. {e}");
        ServerError::BackendError(FAILURE.into())
    })?;
    info!("💳️ Stripe payment intent {} created for order {}", intent.id, order.order_number);
    Ok(HttpResponse::Ok().json(JsonResponse::data(json!({
        "clientSecret": intent.client_secret,
        "paymentIntentId": intent.id,
    }))))
}

route!(coinbase_invoice => Post "/payments/coinbase/create-invoice" impl OrderManagement where requires [Role::User]);
pub async fn coinbase_invoice<A: OrderManagement>(
    claims: JwtClaims,
    body: web::Json<PaymentRequest>,
    api: web::Data<OrderFlowApi<A>>,
    coinbase: web::Data<CoinbaseApi>,
) -> Result<HttpResponse, ServerError> {
    const FAILURE: &str = "Failed to create invoice";
    let (order_id, order) = order_for_payment(&claims, body.into_inner(), api.as_ref(), FAILURE).await?;
    debug!("💳️ Creating Coinbase charge for order {}", order.order_number);
    let request = ChargeRequest::new(order_id, claims.sub, &order.order_number, order.total);
    let charge = coinbase.create_charge(&request).await.map_err(|e| {
        error!("💳️ Coinbase rejected the charge for order #{order_id}. {e}");
        ServerError::BackendError(FAILURE.into())
    })?;
    api.set_coinbase_invoice(order_id, &charge.id).await.map_err(|e| {
        error!("💳️ Could not store charge id on order #{order_id}. {e}");
        ServerError::BackendError(FAILURE.into())
    })?;
    info!("💳️ Coinbase charge {} created for order {}", charge.id, order.order_number);
    Ok(HttpResponse::Ok().json(JsonResponse::data(json!({
        "invoiceId": charge.id,
        "checkoutUrl": charge.hosted_url,
        "expiresAt": charge.expires_at,
    }))))
}

//----------------------------------------------   Webhooks  ----------------------------------------------------

/// Applies a webhook-driven status change to an order. `Ok(false)` means the event was skipped (no such order);
/// `Err` means the database itself failed and the gateway should retry.
async fn apply_webhook_status<A: OrderManagement>(
    api: &OrderFlowApi<A>,
    order_id: i64,
    status: OrderStatusType,
) -> Result<bool, OrderApiError> {
    match api.update_status(order_id, status).await {
        Ok(order) => {
            info!("💳️ Order {} moved to {status} by webhook", order.order_number);
            Ok(true)
        },
        Err(OrderApiError::OrderNotFound) => {
            warn!("💳️ Webhook referenced order #{order_id}, which does not exist. Skipping.");
            Ok(false)
        },
        Err(e) => Err(e),
    }
}

fn webhook_dispatch_failed(e: &OrderApiError) -> HttpResponse {
    error!("💳️ Webhook processing failed. {e}");
    HttpResponse::InternalServerError().json(json!({"error": "Webhook processing failed"}))
}

/// Stripe webhook handler. The signature has already been verified by the middleware.
pub async fn stripe_webhook<A: OrderManagement>(
    req: HttpRequest,
    event: web::Json<StripeEvent>,
    api: web::Data<OrderFlowApi<A>>,
    options: web::Data<ServerOptions>,
) -> HttpResponse {
    let event = event.into_inner();
    let peer = get_remote_ip(&req, options.use_x_forwarded_for, options.use_forwarded);
    debug!("💳️ Stripe webhook {} ({}) from {peer:?}", event.id, event.event_type);
    let status = match event.event_type.as_str() {
        STRIPE_PAYMENT_SUCCEEDED => OrderStatusType::Paid,
        STRIPE_PAYMENT_FAILED => OrderStatusType::PaymentFailed,
        other => {
            debug!("💳️ Ignoring Stripe event type {other}");
            return HttpResponse::Ok().json(json!({"received": true}));
        },
    };
    let object = &event.data.object;
    let Some(order_id) = object.metadata.order_id() else {
        warn!("💳️ Stripe event {} carries no order id in its metadata. Skipping.", event.id);
        return HttpResponse::Ok().json(json!({"received": true}));
    };
    if status == OrderStatusType::Paid {
        if let Err(e) = api.set_stripe_payment_intent(order_id, &object.id).await {
            // Not fatal for the paid flow, but worth noticing
            warn!("💳️ Could not store payment intent id on order #{order_id}. {e}");
        }
    }
    match apply_webhook_status(api.as_ref(), order_id, status).await {
        Ok(_) => HttpResponse::Ok().json(json!({"received": true})),
        Err(e) => webhook_dispatch_failed(&e),
    }
}

/// Coinbase webhook handler. The signature has already been verified by the middleware.
pub async fn coinbase_webhook<A: OrderManagement>(
    req: HttpRequest,
    event: web::Json<CoinbaseEvent>,
    api: web::Data<OrderFlowApi<A>>,
    options: web::Data<ServerOptions>,
) -> HttpResponse {
    let event = event.into_inner();
    let peer = get_remote_ip(&req, options.use_x_forwarded_for, options.use_forwarded);
    debug!("💳️ Coinbase webhook {} ({}) from {peer:?}", event.data.id, event.event_type);
    let status = match event.event_type.as_str() {
        COINBASE_CHARGE_CONFIRMED => OrderStatusType::Paid,
        COINBASE_CHARGE_FAILED => OrderStatusType::PaymentFailed,
        other => {
            debug!("💳️ Ignoring Coinbase event type {other}");
            return HttpResponse::Ok().json(json!({"received": true}));
        },
    };
    let Some(order_id) = event.data.metadata.order_id() else {
        warn!("💳️ Coinbase event {} carries no order id in its metadata. Skipping.", event.data.id);
        return HttpResponse::Ok().json(json!({"received": true}));
    };
    if status == OrderStatusType::Paid {
        if let Err(e) = api.set_coinbase_invoice(order_id, &event.data.id).await {
            warn!("💳️ Could not store charge id on order #{order_id}. {e}");
        }
    }
    match apply_webhook_status(api.as_ref(), order_id, status).await {
        Ok(_) => HttpResponse::Ok().json(json!({"received": true})),
        Err(e) => webhook_dispatch_failed(&e),
    }
}
