//! In-memory commitment ledger
//!
//! Tracks which one-time commitments have been redeemed (double-spend guard)
//! and which verified payments are awaiting settlement. State is process-local
//! and lost on restart; redeemed commitments are never forgotten while the
//! process lives.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::models::{PendingPayment, ServerStats};

/// Double-spend guard and pending-settlement queue.
///
/// Both structures sit behind one lock so a pending entry can only exist for
/// a commitment that is also in the redeemed set. The lock is never held
/// across an await point.
#[derive(Debug, Default)]
pub struct CommitmentLedger {
    inner: Mutex<LedgerInner>,
}

#[derive(Debug, Default)]
struct LedgerInner {
    redeemed: HashSet<String>,
    pending: HashMap<String, PendingPayment>,
}

impl CommitmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-mutating probe for an already-redeemed commitment
    pub fn is_used(&self, commitment: &str) -> bool {
        self.inner.lock().unwrap().redeemed.contains(commitment)
    }

    /// Atomic check-and-set: marks the commitment redeemed and enqueues the
    /// payment for settlement in one critical section.
    ///
    /// Returns `false` without touching state if the commitment was already
    /// redeemed. Of N concurrent calls with the same commitment, exactly one
    /// returns `true`.
    pub fn redeem(&self, payment: PendingPayment) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if !inner.redeemed.insert(payment.commitment.clone()) {
            return false;
        }
        inner.pending.insert(payment.commitment.clone(), payment);
        true
    }

    /// Snapshot of all verified payments awaiting settlement.
    ///
    /// Entries are not removed; the settlement scheduler removes them with
    /// [`remove`](Self::remove) once a withdrawal covering them succeeds.
    pub fn drain_pending(&self) -> Vec<PendingPayment> {
        let inner = self.inner.lock().unwrap();
        inner
            .pending
            .values()
            .filter(|p| p.verified)
            .cloned()
            .collect()
    }

    /// Delete one pending entry after confirmed settlement.
    ///
    /// The commitment stays in the redeemed set; settlement never unspends.
    pub fn remove(&self, commitment: &str) {
        self.inner.lock().unwrap().pending.remove(commitment);
    }

    pub fn stats(&self) -> ServerStats {
        let inner = self.inner.lock().unwrap();
        ServerStats {
            redeemed_commitments: inner.redeemed.len(),
            pending_payments: inner.pending.len(),
            pending_lamports: inner.pending.values().map(|p| p.amount).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn payment(commitment: &str, amount: u64) -> PendingPayment {
        PendingPayment {
            commitment: commitment.to_string(),
            amount,
            payer: "payer1".to_string(),
            timestamp: 1_700_000_000_000,
            verified: true,
        }
    }

    #[test]
    fn test_redeem_once() {
        let ledger = CommitmentLedger::new();
        assert!(!ledger.is_used("c1"));
        assert!(ledger.redeem(payment("c1", 100)));
        assert!(ledger.is_used("c1"));
        assert!(!ledger.redeem(payment("c1", 100)));
        assert_eq!(ledger.drain_pending().len(), 1);
    }

    #[test]
    fn test_concurrent_redeem_exactly_one_winner() {
        let ledger = Arc::new(CommitmentLedger::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || ledger.redeem(payment("raced", 10)))
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(ledger.drain_pending().len(), 1);
    }

    #[test]
    fn test_remove_keeps_redeemed() {
        let ledger = CommitmentLedger::new();
        ledger.redeem(payment("c1", 100));
        ledger.remove("c1");
        assert!(ledger.is_used("c1"));
        assert!(ledger.drain_pending().is_empty());
    }

    #[test]
    fn test_stats() {
        let ledger = CommitmentLedger::new();
        ledger.redeem(payment("a", 1));
        ledger.redeem(payment("b", 2));
        ledger.remove("a");
        let stats = ledger.stats();
        assert_eq!(stats.redeemed_commitments, 2);
        assert_eq!(stats.pending_payments, 1);
        assert_eq!(stats.pending_lamports, 2);
    }
}
