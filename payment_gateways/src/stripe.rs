use std::sync::Arc;

use fcl_common::USD_CURRENCY_CODE_LOWER;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
};
use serde::de::DeserializeOwned;

use crate::{
    config::StripeConfig,
    data_objects::{PaymentIntent, PaymentIntentRequest},
    PaymentGatewayError,
};

/// A thin client for the slice of the Stripe REST API this site uses. Stripe takes form-encoded requests and
/// authenticates with a bearer key.
#[derive(Clone)]
pub struct StripeApi {
    config: StripeConfig,
    client: Arc<Client>,
}

impl StripeApi {
    pub fn new(config: StripeConfig) -> Result<Self, PaymentGatewayError> {
        let mut headers = HeaderMap::with_capacity(1);
        let bearer = format!("Bearer {}", config.secret_key.reveal());
        let val = HeaderValue::from_str(&bearer).map_err(|e| PaymentGatewayError::Initialization(e.to_string()))?;
        headers.insert(AUTHORIZATION, val);
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PaymentGatewayError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, PaymentGatewayError> {
        let url = self.url(path);
        trace!("Sending Stripe request: {url}");
        let response = self
            .client
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(|e| PaymentGatewayError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("Stripe request successful. {}", response.status());
            response.json::<T>().await.map_err(|e| PaymentGatewayError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| PaymentGatewayError::RestResponseError(e.to_string()))?;
            Err(PaymentGatewayError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    pub async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentGatewayError> {
        debug!("Creating payment intent of {} for order #{}", request.amount, request.order_id);
        let params = [
            ("amount", request.amount.value().to_string()),
            ("currency", USD_CURRENCY_CODE_LOWER.to_string()),
            ("metadata[orderId]", request.order_id.to_string()),
            ("metadata[userId]", request.user_id.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];
        let intent = self.post_form::<PaymentIntent>("/payment_intents", &params).await?;
        info!("Created payment intent {} for order #{}", intent.id, request.order_id);
        Ok(intent)
    }
}
