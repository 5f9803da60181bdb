use std::sync::Arc;

use fcl_common::USD_CURRENCY_CODE;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::CoinbaseConfig,
    data_objects::{ChargeRequest, CoinbaseCharge},
    PaymentGatewayError,
};

const COINBASE_API_VERSION: &str = "2018-03-22";

/// A thin client for the Coinbase Commerce charges API.
#[derive(Clone)]
pub struct CoinbaseApi {
    config: CoinbaseConfig,
    client: Arc<Client>,
}

impl CoinbaseApi {
    pub fn new(config: CoinbaseConfig) -> Result<Self, PaymentGatewayError> {
        let mut headers = HeaderMap::with_capacity(3);
        let key = HeaderValue::from_str(config.api_key.reveal().as_str())
            .map_err(|e| PaymentGatewayError::Initialization(e.to_string()))?;
        headers.insert("X-CC-Api-Key", key);
        headers.insert("X-CC-Version", HeaderValue::from_static(COINBASE_API_VERSION));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PaymentGatewayError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, PaymentGatewayError> {
        let url = self.url(path);
        trace!("Sending Coinbase request: {url}");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| PaymentGatewayError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("Coinbase request successful. {}", response.status());
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

    pub async fn create_charge(&self, request: &ChargeRequest) -> Result<CoinbaseCharge, PaymentGatewayError> {
        #[derive(Deserialize)]
        struct ChargeResponse {
            data: CoinbaseCharge,
        }
        debug!("Creating charge of {} for order [{}]", request.amount, request.order_number);
        let body = serde_json::json!({
            "name": format!("Order {}", request.order_number),
            "description": format!("Payment for order {}", request.order_number),
            "local_price": {
                "amount": request.amount.to_dollars_string(),
                "currency": USD_CURRENCY_CODE,
            },
            "pricing_type": "fixed_price",
            "metadata": {
                "orderId": request.order_id.to_string(),
                "userId": request.user_id.to_string(),
            },
        });
        let result = self.post_json::<ChargeResponse, Value>("/charges", &body).await?;
        info!("Created charge {} for order [{}]", result.data.id, request.order_number);
        Ok(result.data)
    }
}
