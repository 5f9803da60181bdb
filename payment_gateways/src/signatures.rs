//! Webhook signature verification.
//!
//! Both gateways sign webhook deliveries with an HMAC-SHA256 digest of the raw request body, sent as a hex string.
//! Stripe signs `<timestamp>.<body>` and wraps the digest in a `Stripe-Signature` header of the form
//! `t=<unix>,v1=<hex>[,v1=<hex>...]`, where extra `v1` entries appear while a webhook secret is being rotated.
//! Coinbase sends the bare digest of the body in `X-CC-Webhook-Signature`.

use hmac::{Hmac, Mac};
use log::*;
use sha2::Sha256;

use crate::PaymentGatewayError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of the timestamp in a Stripe signature. Older deliveries are rejected to limit replays.
pub const STRIPE_SIGNATURE_TOLERANCE_SECS: i64 = 300;

pub fn verify_stripe_signature(payload: &[u8], header: &str, secret: &str) -> Result<(), PaymentGatewayError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for element in header.split(',') {
        match element.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signatures.push(value),
            _ => {},
        }
    }
    let timestamp =
        timestamp.ok_or_else(|| PaymentGatewayError::InvalidSignature("No timestamp in header".to_string()))?;
    if signatures.is_empty() {
        return Err(PaymentGatewayError::InvalidSignature("No v1 signatures in header".to_string()));
    }
    let ts = timestamp
        .parse::<i64>()
        .map_err(|_| PaymentGatewayError::InvalidSignature(format!("Invalid timestamp: {timestamp}")))?;
    let age = chrono::Utc::now().timestamp() - ts;
    if age.abs() > STRIPE_SIGNATURE_TOLERANCE_SECS {
        warn!("🔐️ Rejecting webhook delivery signed {age}s ago");
        return Err(PaymentGatewayError::InvalidSignature("Timestamp outside of tolerance".to_string()));
    }
    let mut mac = hmac_for(secret)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = hex::encode(mac.finalize().into_bytes());
    if signatures.iter().any(|sig| sig.eq_ignore_ascii_case(&expected)) {
        trace!("🔐️ Stripe signature check ✅️");
        Ok(())
    } else {
        Err(PaymentGatewayError::InvalidSignature("No matching v1 signature".to_string()))
    }
}

pub fn verify_coinbase_signature(payload: &[u8], signature: &str, secret: &str) -> Result<(), PaymentGatewayError> {
    let mut mac = hmac_for(secret)?;
    mac.update(payload);
    let expected = hex::encode(mac.finalize().into_bytes());
    if signature.eq_ignore_ascii_case(&expected) {
        trace!("🔐️ Coinbase signature check ✅️");
        Ok(())
    } else {
        Err(PaymentGatewayError::InvalidSignature("Signature does not match payload".to_string()))
    }
}

fn hmac_for(secret: &str) -> Result<HmacSha256, PaymentGatewayError> {
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| PaymentGatewayError::InvalidSignature(e.to_string()))
}
