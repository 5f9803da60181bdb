//! Generators for the human-facing identifiers attached to orders, and the blockchain registration stub.
use chrono::Utc;
use log::*;
use rand::{distributions::Alphanumeric, Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Generates an order number of the form `FCL-<unix millis>-<6 random alphanumerics>`, uppercased.
pub fn generate_order_number() -> String {
    let suffix: String = rand::thread_rng().sample_iter(&Alphanumeric).take(6).map(char::from).collect();
    format!("FCL-{}-{}", Utc::now().timestamp_millis(), suffix.to_uppercase())
}

/// Generates a unique code of the form `FCL-<YYYYMMDD>-<8 random hex chars>`.
///
/// There is no collision check against previously issued codes.
pub fn generate_unique_code() -> String {
    let date = Utc::now().format("%Y%m%d");
    let random: [u8; 4] = rand::random();
    let suffix = random.iter().map(|b| format!("{b:02X}")).collect::<String>();
    format!("FCL-{date}-{suffix}")
}

/// The result of registering a unique code on the blockchain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainRegistration {
    pub success: bool,
    pub transaction_id: String,
    pub blockchain_network: String,
}

/// Registers a unique code on the blockchain.
///
/// This is a stub. It logs the registration and fabricates a transaction id; no chain is contacted.
pub fn register_on_blockchain(unique_code: &str, order_number: &str) -> BlockchainRegistration {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let tx_id = format!("0x{}", bytes.iter().map(|b| format!("{b:02x}")).collect::<String>());
    info!("🔗️ Registering unique code {unique_code} for order {order_number} on blockchain");
    info!("🔗️ Mock transaction id: {tx_id}");
    BlockchainRegistration { success: true, transaction_id: tx_id, blockchain_network: "ethereum".to_string() }
}
