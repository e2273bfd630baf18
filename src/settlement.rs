//! Batched settlement scheduler
//!
//! A background task that periodically drains the ledger's pending payments
//! and issues one withdrawal per tick through the privacy pool, regardless of
//! request volume. Funds reach the merchant at most one interval late in
//! exchange for fee amortization.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::ledger::CommitmentLedger;
use crate::services::privacy_pool::PrivacyPool;

pub struct SettlementScheduler<P> {
    ledger: Arc<CommitmentLedger>,
    provider: Arc<P>,
    /// Settlement destination; absence selects simulated settlement
    merchant_wallet: Option<String>,
    tick_interval: Duration,
    /// Upper bound on one provider call so a hung withdrawal cannot stall
    /// subsequent ticks
    call_timeout: Duration,
    consecutive_failures: AtomicU32,
}

/// Handle for stopping a running scheduler.
///
/// Cancelling halts future ticks; an in-flight withdrawal is awaited, not
/// aborted.
pub struct SchedulerHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(e) = self.task.await {
            tracing::error!("settlement task join failed: {}", e);
        }
    }
}

impl<P: PrivacyPool + 'static> SettlementScheduler<P> {
    pub fn new(
        ledger: Arc<CommitmentLedger>,
        provider: Arc<P>,
        merchant_wallet: Option<String>,
        tick_interval: Duration,
        call_timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            provider,
            merchant_wallet,
            tick_interval,
            call_timeout,
            consecutive_failures: AtomicU32::new(0),
        }
    }

    /// Spawn the recurring settlement task
    pub fn start(self) -> SchedulerHandle {
        let token = CancellationToken::new();
        let child = token.clone();

        tracing::info!(
            interval_secs = self.tick_interval.as_secs(),
            simulated = self.merchant_wallet.is_none(),
            "starting settlement scheduler"
        );

        let task = tokio::spawn(async move {
            let mut ticker = interval(self.tick_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick completes immediately; consume it so the first real
            // settlement happens one interval after startup
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = child.cancelled() => {
                        tracing::info!("settlement scheduler stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.settle_once().await;
                    }
                }
            }
        });

        SchedulerHandle { token, task }
    }

    /// Run one settlement round; returns how many payments were settled.
    ///
    /// A failed or timed-out withdrawal leaves the whole batch in the ledger
    /// for retry on the next tick.
    pub async fn settle_once(&self) -> usize {
        let batch = self.ledger.drain_pending();
        if batch.is_empty() {
            tracing::debug!("no pending payments to settle");
            return 0;
        }

        let merchant = match &self.merchant_wallet {
            Some(wallet) => wallet.clone(),
            None => {
                // No settlement credential configured: count the batch as
                // settled without contacting the pool
                for payment in &batch {
                    self.ledger.remove(&payment.commitment);
                }
                tracing::info!(count = batch.len(), "simulated settlement (no merchant wallet)");
                return batch.len();
            }
        };

        let total: u64 = batch.iter().map(|p| p.amount).sum();
        tracing::info!(
            count = batch.len(),
            total_lamports = total,
            "settling batch"
        );

        match timeout(self.call_timeout, self.provider.withdraw(total, &merchant)).await {
            Ok(Ok(receipt)) => {
                for payment in &batch {
                    self.ledger.remove(&payment.commitment);
                }
                self.consecutive_failures.store(0, Ordering::Relaxed);
                tracing::info!(
                    count = batch.len(),
                    total_lamports = total,
                    tx_id = %receipt.tx_id,
                    "batch settled"
                );
                batch.len()
            }
            Ok(Err(e)) => {
                let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::error!(
                    count = batch.len(),
                    consecutive_failures = failures,
                    "settlement withdrawal failed, batch retained: {}",
                    e
                );
                0
            }
            Err(_) => {
                let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::error!(
                    count = batch.len(),
                    consecutive_failures = failures,
                    timeout_secs = self.call_timeout.as_secs(),
                    "settlement withdrawal timed out, batch retained"
                );
                0
            }
        }
    }
}
