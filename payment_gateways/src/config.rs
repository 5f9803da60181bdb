use fcl_common::Secret;
use log::*;

#[derive(Debug, Clone, Default)]
pub struct StripeConfig {
    pub api_url: String,
    pub secret_key: Secret<String>,
    pub webhook_secret: Secret<String>,
}

impl StripeConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("FCL_STRIPE_API_URL").unwrap_or_else(|_| "https://api.stripe.com/v1".to_string());
        let secret_key = Secret::new(std::env::var("FCL_STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("FCL_STRIPE_SECRET_KEY not set, using a dummy value that the live API will reject");
            "sk_test_00000000000000".to_string()
        }));
        let webhook_secret = Secret::new(std::env::var("FCL_STRIPE_WEBHOOK_SECRET").unwrap_or_else(|_| {
            warn!("FCL_STRIPE_WEBHOOK_SECRET not set, using a dummy value that the live API will reject");
            "whsec_00000000000000".to_string()
        }));
        Self { api_url, secret_key, webhook_secret }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CoinbaseConfig {
    pub api_url: String,
    pub api_key: Secret<String>,
    pub webhook_secret: Secret<String>,
}

impl CoinbaseConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url =
            std::env::var("FCL_COINBASE_API_URL").unwrap_or_else(|_| "https://api.commerce.coinbase.com".to_string());
        let api_key = Secret::new(std::env::var("FCL_COINBASE_API_KEY").unwrap_or_else(|_| {
            warn!("FCL_COINBASE_API_KEY not set, using a dummy value that the live API will reject");
            "00000000-0000-0000-0000-000000000000".to_string()
        }));
        let webhook_secret = Secret::new(std::env::var("FCL_COINBASE_WEBHOOK_SECRET").unwrap_or_else(|_| {
            warn!("FCL_COINBASE_WEBHOOK_SECRET not set, using a dummy value that the live API will reject");
            "00000000000000".to_string()
        }));
        Self { api_url, api_key, webhook_secret }
    }
}
