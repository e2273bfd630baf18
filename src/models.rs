//! Data models for the payment protocol and API responses

use serde::{Deserialize, Serialize};

/// Price quote returned on unpaid access (402 body `payment` object)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub recipient_wallet: String,
    pub token_symbol: String,
    pub amount: u64, // lamports
    pub cluster: String,
}

/// Full 402 Payment Required response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub payment: Quote,
    pub message: String,
    pub instructions: Vec<String>,
}

/// Decoded `X-Payment` header document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub x402_version: u32,
    pub scheme: String,
    pub network: String,
    pub payload: PaymentDetails,
}

/// Inner payload of a payment proof
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub note_hash: String,
    pub commitment: String,
    /// Creation time in Unix milliseconds
    pub timestamp: u64,
    /// Base64 JSON `BalanceProof`
    pub balance_proof: String,
}

/// Self-reported claim of available private balance.
///
/// Not a cryptographic proof: the client asserts these values and the server
/// only checks freshness and amount. ZK balance proofs are planned to replace
/// this blob without changing the envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceProof {
    pub balance: u64,
    /// Unix milliseconds
    pub timestamp: u64,
    pub wallet: String,
}

/// A verified payment awaiting batched settlement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingPayment {
    pub commitment: String,
    pub amount: u64,
    pub payer: String,
    pub timestamp: u64,
    pub verified: bool,
}

/// Read-only projection over ledger state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerStats {
    pub redeemed_commitments: usize,
    pub pending_payments: usize,
    pub pending_lamports: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub network: String,
    pub version: String,
}
