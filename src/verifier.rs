//! Payment proof verification
//!
//! Orchestrates decode, scheme/network checks, hash binding, the double-spend
//! guard and the balance-proof check for one incoming request. Every failure
//! is a typed rejection; nothing here panics on client input.

use std::sync::Arc;

use crate::config::SCHEME;
use crate::error::PaymentError;
use crate::ledger::CommitmentLedger;
use crate::models::PendingPayment;
use crate::payload;

/// Checks a self-reported balance proof for freshness and amount.
///
/// Returns false on any decode failure, a stale timestamp, or a balance below
/// the required amount. This is a trust check, not proof verification: the
/// client asserts the balance and nothing binds it to pool state.
pub fn verify_balance_proof(blob: &str, required: u64, now_ms: u64, validity_ms: u64) -> bool {
    let proof = match payload::decode_balance_proof(blob) {
        Ok(proof) => proof,
        Err(e) => {
            tracing::debug!("balance proof decode failed: {}", e);
            return false;
        }
    };

    if now_ms.saturating_sub(proof.timestamp) > validity_ms {
        tracing::debug!(
            proof_ts = proof.timestamp,
            now = now_ms,
            "balance proof expired"
        );
        return false;
    }

    proof.balance >= required
}

/// Single-request verification pipeline
#[derive(Debug, Clone)]
pub struct PaymentVerifier {
    ledger: Arc<CommitmentLedger>,
    network: String,
    validity_ms: u64,
}

impl PaymentVerifier {
    pub fn new(ledger: Arc<CommitmentLedger>, network: String, validity_ms: u64) -> Self {
        Self {
            ledger,
            network,
            validity_ms,
        }
    }

    /// Verify one payment attempt, short-circuiting on the first failure.
    ///
    /// On success the commitment is atomically marked redeemed and the payment
    /// queued for settlement. Two concurrent calls with the same commitment
    /// yield exactly one `Ok`; the loser gets `DoubleSpend`.
    pub fn verify(
        &self,
        raw_header: &str,
        commitment: Option<&str>,
        payer: Option<&str>,
        required: u64,
        now_ms: u64,
    ) -> Result<(), PaymentError> {
        let decoded = payload::decode_payment(raw_header)
            .map_err(|e| PaymentError::InvalidPayment(format!("malformed payload: {}", e)))?;

        if decoded.scheme != SCHEME {
            return Err(PaymentError::InvalidPayment(format!(
                "unsupported scheme: {}",
                decoded.scheme
            )));
        }

        if decoded.network != self.network {
            return Err(PaymentError::NetworkMismatch {
                expected: self.network.clone(),
                received: decoded.network,
            });
        }

        let commitment = commitment
            .filter(|c| !c.is_empty())
            .ok_or_else(|| PaymentError::InvalidPayment("missing commitment header".into()))?;
        let payer = payer
            .filter(|w| !w.is_empty())
            .ok_or_else(|| PaymentError::InvalidPayment("missing wallet address header".into()))?;

        // The payload must be bound to the commitment it claims to spend
        if payload::note_hash(commitment) != decoded.payload.note_hash {
            return Err(PaymentError::InvalidPayment(
                "note hash does not match commitment".into(),
            ));
        }

        if self.ledger.is_used(commitment) {
            return Err(PaymentError::DoubleSpend {
                commitment: commitment.to_string(),
            });
        }

        if !verify_balance_proof(
            &decoded.payload.balance_proof,
            required,
            now_ms,
            self.validity_ms,
        ) {
            return Err(PaymentError::InsufficientBalance { required });
        }

        // Atomic check-and-set: a concurrent request racing the same
        // commitment past the probe above loses here.
        let accepted = self.ledger.redeem(PendingPayment {
            commitment: commitment.to_string(),
            amount: required,
            payer: payer.to_string(),
            timestamp: now_ms,
            verified: true,
        });
        if !accepted {
            return Err(PaymentError::DoubleSpend {
                commitment: commitment.to_string(),
            });
        }

        tracing::info!(
            payer = %payer,
            amount = required,
            "payment verified and queued for settlement"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BalanceProof, PaymentDetails, PaymentPayload};
    use crate::payload::{encode_balance_proof, encode_payment, note_hash};

    const NOW: u64 = 1_700_000_000_000;
    const PRICE: u64 = 10_000_000;
    const VALIDITY: u64 = 300_000;

    fn verifier() -> PaymentVerifier {
        PaymentVerifier::new(
            Arc::new(CommitmentLedger::new()),
            "solana-devnet".to_string(),
            VALIDITY,
        )
    }

    fn header(commitment: &str, network: &str, balance: u64, proof_ts: u64) -> String {
        encode_payment(&PaymentPayload {
            x402_version: 1,
            scheme: SCHEME.to_string(),
            network: network.to_string(),
            payload: PaymentDetails {
                note_hash: note_hash(commitment),
                commitment: commitment.to_string(),
                timestamp: NOW,
                balance_proof: encode_balance_proof(&BalanceProof {
                    balance,
                    timestamp: proof_ts,
                    wallet: "payer1".to_string(),
                }),
            },
        })
    }

    #[test]
    fn test_accept_then_double_spend() {
        let verifier = verifier();
        let raw = header("abc", "solana-devnet", PRICE, NOW);

        assert!(verifier
            .verify(&raw, Some("abc"), Some("payer1"), PRICE, NOW)
            .is_ok());

        let second = verifier.verify(&raw, Some("abc"), Some("payer1"), PRICE, NOW);
        assert_eq!(
            second,
            Err(PaymentError::DoubleSpend {
                commitment: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_insufficient_balance() {
        let verifier = verifier();
        let raw = header("abc", "solana-devnet", 5_000_000, NOW);
        assert_eq!(
            verifier.verify(&raw, Some("abc"), Some("payer1"), PRICE, NOW),
            Err(PaymentError::InsufficientBalance { required: PRICE })
        );
    }

    #[test]
    fn test_network_mismatch_carries_both_values() {
        let verifier = verifier();
        let raw = header("abc", "solana-mainnet-beta", PRICE, NOW);
        assert_eq!(
            verifier.verify(&raw, Some("abc"), Some("payer1"), PRICE, NOW),
            Err(PaymentError::NetworkMismatch {
                expected: "solana-devnet".to_string(),
                received: "solana-mainnet-beta".to_string()
            })
        );
    }

    #[test]
    fn test_hash_binding() {
        let verifier = verifier();
        // Payload built for commitment "abc", presented with commitment "xyz"
        let raw = header("abc", "solana-devnet", PRICE, NOW);
        let result = verifier.verify(&raw, Some("xyz"), Some("payer1"), PRICE, NOW);
        assert!(matches!(result, Err(PaymentError::InvalidPayment(_))));
    }

    #[test]
    fn test_missing_headers() {
        let verifier = verifier();
        let raw = header("abc", "solana-devnet", PRICE, NOW);
        assert!(matches!(
            verifier.verify(&raw, None, Some("payer1"), PRICE, NOW),
            Err(PaymentError::InvalidPayment(_))
        ));
        assert!(matches!(
            verifier.verify(&raw, Some("abc"), None, PRICE, NOW),
            Err(PaymentError::InvalidPayment(_))
        ));
    }

    #[test]
    fn test_malformed_header() {
        let verifier = verifier();
        assert!(matches!(
            verifier.verify("!!!", Some("abc"), Some("payer1"), PRICE, NOW),
            Err(PaymentError::InvalidPayment(_))
        ));
    }

    #[test]
    fn test_wrong_scheme() {
        let verifier = verifier();
        let raw = encode_payment(&PaymentPayload {
            x402_version: 1,
            scheme: "exact".to_string(),
            network: "solana-devnet".to_string(),
            payload: PaymentDetails {
                note_hash: note_hash("abc"),
                commitment: "abc".to_string(),
                timestamp: NOW,
                balance_proof: encode_balance_proof(&BalanceProof {
                    balance: PRICE,
                    timestamp: NOW,
                    wallet: "payer1".to_string(),
                }),
            },
        });
        assert!(matches!(
            verifier.verify(&raw, Some("abc"), Some("payer1"), PRICE, NOW),
            Err(PaymentError::InvalidPayment(_))
        ));
    }

    #[test]
    fn test_freshness_window_boundaries() {
        // One past the window: stale
        assert!(!verify_balance_proof(
            &encode_balance_proof(&BalanceProof {
                balance: PRICE,
                timestamp: NOW - VALIDITY - 1,
                wallet: "payer1".to_string(),
            }),
            PRICE,
            NOW,
            VALIDITY,
        ));

        // One inside the window: fresh
        assert!(verify_balance_proof(
            &encode_balance_proof(&BalanceProof {
                balance: PRICE,
                timestamp: NOW - VALIDITY + 1,
                wallet: "payer1".to_string(),
            }),
            PRICE,
            NOW,
            VALIDITY,
        ));
    }

    #[test]
    fn test_balance_proof_decode_failure_is_false() {
        assert!(!verify_balance_proof("%%%", PRICE, NOW, VALIDITY));
    }

    #[test]
    fn test_concurrent_same_commitment_single_winner() {
        let verifier = Arc::new(verifier());
        let raw = Arc::new(header("raced", "solana-devnet", PRICE, NOW));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let verifier = Arc::clone(&verifier);
                let raw = Arc::clone(&raw);
                std::thread::spawn(move || {
                    verifier.verify(&raw, Some("raced"), Some("payer1"), PRICE, NOW)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let oks = results.iter().filter(|r| r.is_ok()).count();
        let double_spends = results
            .iter()
            .filter(|r| matches!(r, Err(PaymentError::DoubleSpend { .. })))
            .count();
        assert_eq!(oks, 1);
        assert_eq!(double_spends, results.len() - 1);
    }
}
