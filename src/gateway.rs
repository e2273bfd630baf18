//! Payment gateway composition
//!
//! The single entry point the hosting HTTP layer talks to: given the payment
//! headers of one request and the price for its path, decide whether to quote,
//! grant, or reject. Carries no transport types so any server framework can
//! adapt it.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::error::PaymentError;
use crate::ledger::CommitmentLedger;
use crate::models::QuoteResponse;
use crate::quote::QuoteIssuer;
use crate::verifier::PaymentVerifier;

/// Outcome of intercepting one request
#[derive(Debug)]
pub enum GatewayDecision {
    /// No proof presented: respond 402 with this quote
    Quote(QuoteResponse),
    /// Payment accepted: proceed to the downstream handler
    Granted,
    /// Payment rejected: respond with the mapped error
    Rejected(PaymentError),
}

pub struct PaymentGateway {
    ledger: Arc<CommitmentLedger>,
    verifier: PaymentVerifier,
    quotes: QuoteIssuer,
}

impl PaymentGateway {
    pub fn new(config: &Config, ledger: Arc<CommitmentLedger>) -> Self {
        Self {
            verifier: PaymentVerifier::new(
                Arc::clone(&ledger),
                config.network.clone(),
                config.balance_proof_validity_ms,
            ),
            quotes: QuoteIssuer::new(config),
            ledger,
        }
    }

    /// Inspect one request's payment headers against a required amount
    pub fn intercept(
        &self,
        payment_header: Option<&str>,
        commitment_header: Option<&str>,
        wallet_header: Option<&str>,
        required: u64,
    ) -> GatewayDecision {
        let raw = match payment_header {
            Some(raw) if !raw.is_empty() => raw,
            _ => return GatewayDecision::Quote(self.quotes.payment_required(required)),
        };

        match self.verifier.verify(
            raw,
            commitment_header,
            wallet_header,
            required,
            now_millis(),
        ) {
            Ok(()) => GatewayDecision::Granted,
            Err(reason) => GatewayDecision::Rejected(reason),
        }
    }

    pub fn ledger(&self) -> &Arc<CommitmentLedger> {
        &self.ledger
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
