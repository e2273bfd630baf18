//! Quote issuance for unpaid requests

use crate::config::Config;
use crate::models::{Quote, QuoteResponse};

/// Builds the machine-readable price document returned with a 402.
///
/// Pure function of static server configuration; recomputed per request and
/// never persisted.
#[derive(Debug, Clone)]
pub struct QuoteIssuer {
    recipient_wallet: String,
    token_symbol: String,
    cluster: String,
}

impl QuoteIssuer {
    pub fn new(config: &Config) -> Self {
        Self {
            recipient_wallet: config.recipient_wallet.clone(),
            token_symbol: config.token_symbol.clone(),
            cluster: config.network.clone(),
        }
    }

    pub fn issue(&self, amount: u64) -> Quote {
        Quote {
            recipient_wallet: self.recipient_wallet.clone(),
            token_symbol: self.token_symbol.clone(),
            amount,
            cluster: self.cluster.clone(),
        }
    }

    /// Full 402 body including human-readable payment instructions
    pub fn payment_required(&self, amount: u64) -> QuoteResponse {
        QuoteResponse {
            payment: self.issue(amount),
            message: "Payment required to access this resource".to_string(),
            instructions: vec![
                format!(
                    "Deposit at least {} lamports into the privacy pool on {}",
                    amount, self.cluster
                ),
                "Generate a one-time commitment and a fresh balance proof".to_string(),
                "Resubmit with X-Payment, X-Privacy-Commitment and X-Wallet-Address headers"
                    .to_string(),
            ],
        }
    }
}
