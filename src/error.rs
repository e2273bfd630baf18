//! Error types for the payment gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Verification rejection reasons and operational failures.
///
/// Each variant maps to a stable string `code` in the JSON body so API
/// consumers can branch programmatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Invalid payment: {0}")]
    InvalidPayment(String),

    #[error("Network mismatch: expected {expected}, received {received}")]
    NetworkMismatch { expected: String, received: String },

    #[error("Commitment already spent: {commitment}")]
    DoubleSpend { commitment: String },

    #[error("Insufficient balance: {required} lamports required")]
    InsufficientBalance { required: u64 },
}

impl PaymentError {
    /// Stable machine-readable code for the JSON error body
    pub fn code(&self) -> &'static str {
        match self {
            PaymentError::InvalidPayment(_) => "INVALID_PAYMENT",
            PaymentError::NetworkMismatch { .. } => "NETWORK_MISMATCH",
            PaymentError::DoubleSpend { .. } => "DOUBLE_SPEND",
            PaymentError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PaymentError::InvalidPayment(_) | PaymentError::NetworkMismatch { .. } => {
                StatusCode::BAD_REQUEST
            }
            PaymentError::DoubleSpend { .. } | PaymentError::InsufficientBalance { .. } => {
                StatusCode::PAYMENT_REQUIRED
            }
        }
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            PaymentError::NetworkMismatch { expected, received } => Json(json!({
                "error": self.to_string(),
                "code": self.code(),
                "expected": expected,
                "received": received,
            })),
            PaymentError::DoubleSpend { commitment } => {
                // Truncate for display; commitments can be long client blobs
                let display: String = commitment.chars().take(16).collect();
                Json(json!({
                    "error": self.to_string(),
                    "code": self.code(),
                    "commitment": display,
                }))
            }
            PaymentError::InsufficientBalance { required } => Json(json!({
                "error": self.to_string(),
                "code": self.code(),
                "required": required,
            })),
            _ => Json(json!({
                "error": self.to_string(),
                "code": self.code(),
            })),
        };

        (status, body).into_response()
    }
}
