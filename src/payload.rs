//! Transport codec for payment proofs
//!
//! The `X-Payment` header carries a base64-encoded JSON document; the balance
//! proof inside it is itself base64 JSON. Decoding is a checked failure mode
//! consumed by the verifier, never a panic.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::{BalanceProof, PaymentPayload};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a payment payload into its header representation.
///
/// Client-side half of the codec; the server only decodes.
#[cfg_attr(not(test), allow(dead_code))]
pub fn encode_payment(payload: &PaymentPayload) -> String {
    // Serialization of these derive-only types cannot fail
    let json = serde_json::to_vec(payload).unwrap_or_default();
    BASE64.encode(json)
}

/// Decode an `X-Payment` header value
pub fn decode_payment(raw: &str) -> Result<PaymentPayload, DecodeError> {
    let bytes = BASE64.decode(raw.trim())?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Encode a balance proof blob for embedding in a payload
#[cfg_attr(not(test), allow(dead_code))]
pub fn encode_balance_proof(proof: &BalanceProof) -> String {
    let json = serde_json::to_vec(proof).unwrap_or_default();
    BASE64.encode(json)
}

/// Decode the balance-proof blob carried inside a payload
pub fn decode_balance_proof(raw: &str) -> Result<BalanceProof, DecodeError> {
    let bytes = BASE64.decode(raw.trim())?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Binding hash of a commitment: lowercase hex of sha256(commitment)
pub fn note_hash(commitment: &str) -> String {
    hex::encode(Sha256::digest(commitment.as_bytes()))
}
