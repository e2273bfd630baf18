//! Privacy-cash payment gateway server
//!
//! An x402-compliant API server that requires payment through a privacy pool
//! before releasing protected responses. Verified payments are settled to the
//! merchant in periodic batches.

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod gateway;
mod handlers;
mod ledger;
mod models;
mod payload;
mod quote;
mod services;
mod settlement;
mod verifier;

use config::Config;
use gateway::PaymentGateway;
use ledger::CommitmentLedger;
use services::privacy_pool::StubPrivacyPool;
use settlement::SettlementScheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "privacycash_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting privacy-cash payment gateway");
    tracing::info!("Network: {}", config.network);
    tracing::info!("Recipient: {}", config.recipient_wallet);
    if config.merchant_wallet.is_none() {
        tracing::info!("No merchant wallet configured; settlement runs in simulated mode");
    }

    // Shared ledger and gateway
    let ledger = Arc::new(CommitmentLedger::new());
    let gateway = Arc::new(PaymentGateway::new(&config, Arc::clone(&ledger)));
    let state = handlers::AppState::new(config.clone(), Arc::clone(&gateway));

    // Background settlement against the privacy pool
    let provider = Arc::new(StubPrivacyPool);
    let scheduler = SettlementScheduler::new(
        Arc::clone(&ledger),
        provider,
        config.merchant_wallet.clone(),
        config.settle_interval,
        config.provider_timeout,
    );
    let scheduler_handle = scheduler.start();

    // Build router
    let app = Router::new()
        .merge(handlers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // Halt future settlement ticks; an in-flight withdrawal completes first
    scheduler_handle.shutdown().await;

    Ok(())
}
