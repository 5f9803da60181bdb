//! Webhook signature middleware.
//!
//! Payment gateways sign their webhook deliveries over the raw request body, so verification has to happen before
//! the body is deserialized. This middleware buffers the body, verifies the signature for the configured scheme,
//! and then puts the bytes back on the request so the handler can extract the payload as usual.
//!
//! The two gateways report verification failures differently: Stripe-style endpoints respond with a plain-text
//! `Webhook Error: ...` body, Coinbase-style endpoints with a small JSON error object. Both are 400s.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    web,
    Error,
    HttpResponse,
};
use fcl_common::Secret;
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use payment_gateways::{verify_coinbase_signature, verify_stripe_signature};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// `Stripe-Signature: t=<ts>,v1=<hex>`, HMAC-SHA256 over `"<ts>.<body>"`.
    Stripe,
    /// `X-CC-Webhook-Signature: <hex>`, HMAC-SHA256 over the raw body.
    Coinbase,
}

impl SignatureScheme {
    pub fn header(&self) -> &'static str {
        match self {
            Self::Stripe => "Stripe-Signature",
            Self::Coinbase => "X-CC-Webhook-Signature",
        }
    }
}

#[derive(Debug, Error)]
enum SignatureError {
    #[error("Webhook Error: {0}")]
    Stripe(String),
    #[error("Invalid signature")]
    Coinbase,
}

impl ResponseError for SignatureError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Stripe(_) => {
                HttpResponse::build(self.status_code()).insert_header(ContentType::plaintext()).body(self.to_string())
            },
            Self::Coinbase => HttpResponse::build(self.status_code())
                .insert_header(ContentType::json())
                .body(json!({"error": "Invalid signature"}).to_string()),
        }
    }
}

pub struct SignatureMiddlewareFactory {
    scheme: SignatureScheme,
    secret: Secret<String>,
}

impl SignatureMiddlewareFactory {
    pub fn new(scheme: SignatureScheme, secret: Secret<String>) -> Self {
        Self { scheme, secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SignatureMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = SignatureMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SignatureMiddlewareService {
            scheme: self.scheme,
            secret: self.secret.clone(),
            service: Rc::new(service),
        }))
    }
}

pub struct SignatureMiddlewareService<S> {
    scheme: SignatureScheme,
    secret: Secret<String>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SignatureMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let secret = self.secret.reveal().clone();
        let scheme = self.scheme;
        Box::pin(async move {
            trace!("🔐️ Checking webhook signature for request");
            let data = req.extract::<web::Bytes>().await.map_err(|e| {
                warn!("🔐️ Failed to extract request data: {:?}", e);
                signature_failure(scheme, "Could not read request body")
            })?;
            let signature = req
                .headers()
                .get(scheme.header())
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    warn!("🔐️ No {} header found in request. Denying access.", scheme.header());
                    signature_failure(scheme, "Missing signature header")
                })?
                .to_string();
            let verified = match scheme {
                SignatureScheme::Stripe => verify_stripe_signature(data.as_ref(), &signature, &secret),
                SignatureScheme::Coinbase => verify_coinbase_signature(data.as_ref(), &signature, &secret),
            };
            match verified {
                Ok(()) => {
                    trace!("🔐️ Webhook signature check ✅️");
                    req.set_payload(bytes_to_payload(data));
                    service.call(req).await
                },
                Err(e) => {
                    warn!("🔐️ Invalid webhook signature. Denying access. {e}");
                    Err(signature_failure(scheme, "Signature verification failed"))
                },
            }
        })
    }
}

fn signature_failure(scheme: SignatureScheme, reason: &str) -> Error {
    match scheme {
        SignatureScheme::Stripe => SignatureError::Stripe(reason.to_string()).into(),
        SignatureScheme::Coinbase => SignatureError::Coinbase.into(),
    }
}

fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
