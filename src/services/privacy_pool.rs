//! Privacy pool provider interface
//!
//! The pool performing unlinkable deposits, balance accounting and withdrawals
//! is an external collaborator. This module defines the seam the settlement
//! scheduler talks through, plus a stub provider that logs mock transaction
//! ids until the real RPC-backed client is wired in.

// deposit/get_balance complete the provider contract but only withdraw is
// exercised server-side today.
#![allow(dead_code)]

use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider rejected the operation: {0}")]
    Rejected(String),

    #[error("provider unreachable: {0}")]
    Unreachable(String),
}

/// Receipt for a completed pool operation
#[derive(Debug, Clone)]
pub struct PoolReceipt {
    pub tx_id: String,
}

/// Private balance reported by the pool
#[derive(Debug, Clone, Copy)]
pub struct PoolBalance {
    pub amount_lamports: u64,
}

/// Contract with the external privacy pool.
///
/// Any failure is non-fatal to the gateway: callers treat it as "not completed
/// this round" and retry later.
pub trait PrivacyPool: Send + Sync {
    fn deposit(
        &self,
        amount_lamports: u64,
    ) -> impl Future<Output = Result<PoolReceipt, ProviderError>> + Send;

    fn get_balance(
        &self,
        owner: &str,
    ) -> impl Future<Output = Result<PoolBalance, ProviderError>> + Send;

    fn withdraw(
        &self,
        amount_lamports: u64,
        recipient: &str,
    ) -> impl Future<Output = Result<PoolReceipt, ProviderError>> + Send;
}

/// Stand-in provider for environments without pool RPC access.
///
/// Mirrors the shape of the real client: operations succeed and return a
/// timestamp-derived mock transaction id.
#[derive(Debug, Default, Clone)]
pub struct StubPrivacyPool;

impl StubPrivacyPool {
    fn mock_tx_id() -> String {
        format!(
            "{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        )
    }
}

impl PrivacyPool for StubPrivacyPool {
    async fn deposit(&self, amount_lamports: u64) -> Result<PoolReceipt, ProviderError> {
        let tx_id = Self::mock_tx_id();
        tracing::info!(amount_lamports, %tx_id, "stub pool deposit");
        Ok(PoolReceipt { tx_id })
    }

    async fn get_balance(&self, owner: &str) -> Result<PoolBalance, ProviderError> {
        tracing::debug!(%owner, "stub pool balance query");
        Ok(PoolBalance { amount_lamports: 0 })
    }

    async fn withdraw(
        &self,
        amount_lamports: u64,
        recipient: &str,
    ) -> Result<PoolReceipt, ProviderError> {
        let tx_id = Self::mock_tx_id();
        tracing::info!(amount_lamports, %recipient, %tx_id, "stub pool withdrawal");
        Ok(PoolReceipt { tx_id })
    }
}
