//! Configuration management

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// The single payment scheme this gateway accepts
pub const SCHEME: &str = "privacycash";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Network tag clients must match, e.g. "solana-devnet"
    pub network: String,
    /// Wallet that quotes direct payment deposits to
    pub recipient_wallet: String,
    pub token_symbol: String,
    /// Price in lamports for routes without a per-path override
    pub default_price_lamports: u64,
    /// Settlement destination; `None` selects simulated settlement
    pub merchant_wallet: Option<String>,
    pub settle_interval: Duration,
    /// Freshness window for balance proofs, milliseconds
    pub balance_proof_validity_ms: u64,
    /// Upper bound on a single privacy-pool provider call
    pub provider_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT")?,

            network: env::var("NETWORK").unwrap_or_else(|_| "solana-devnet".to_string()),

            recipient_wallet: env::var("RECIPIENT_WALLET")
                .unwrap_or_else(|_| "GWkQ4PCE7tceDeYhJFqzyu7UPknKRdG8RsBXnUxoVPfS".to_string()),

            token_symbol: env::var("TOKEN_SYMBOL").unwrap_or_else(|_| "SOL".to_string()),

            default_price_lamports: env::var("DEFAULT_PRICE_LAMPORTS")
                .unwrap_or_else(|_| "10000000".to_string()) // 0.01 SOL
                .parse()
                .context("Invalid DEFAULT_PRICE_LAMPORTS")?,

            merchant_wallet: env::var("MERCHANT_WALLET").ok(),

            settle_interval: Duration::from_secs(
                env::var("SETTLE_INTERVAL_SECS")
                    .unwrap_or_else(|_| "300".to_string()) // 5 minutes
                    .parse()
                    .context("Invalid SETTLE_INTERVAL_SECS")?,
            ),

            balance_proof_validity_ms: env::var("BALANCE_PROOF_VALIDITY_MS")
                .unwrap_or_else(|_| "300000".to_string()) // 5 minutes
                .parse()
                .context("Invalid BALANCE_PROOF_VALIDITY_MS")?,

            provider_timeout: Duration::from_secs(
                env::var("PROVIDER_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("Invalid PROVIDER_TIMEOUT_SECS")?,
            ),
        })
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        port: 0,
        network: "solana-devnet".to_string(),
        recipient_wallet: "RecipientWallet111".to_string(),
        token_symbol: "SOL".to_string(),
        default_price_lamports: 10_000_000,
        merchant_wallet: None,
        settle_interval: Duration::from_secs(300),
        balance_proof_validity_ms: 300_000,
        provider_timeout: Duration::from_secs(30),
    }
}
