//! HTTP handlers adapting the payment gateway to axum

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::config::Config;
use crate::gateway::{GatewayDecision, PaymentGateway};
use crate::models::{HealthResponse, ServerStats};

/// Payment proof header (base64 JSON document)
pub const PAYMENT_HEADER: &str = "X-Payment";
/// Raw one-time commitment header
pub const COMMITMENT_HEADER: &str = "X-Privacy-Commitment";
/// Payer identity header
pub const WALLET_HEADER: &str = "X-Wallet-Address";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<PaymentGateway>,
}

impl AppState {
    pub fn new(config: Config, gateway: Arc<PaymentGateway>) -> Self {
        Self { config, gateway }
    }
}

/// All HTTP routes exposed by the gateway server
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/stats", get(stats))
        .route("/api/v1/premium/content", get(premium_content))
        .route("/api/v1/premium/data", get(premium_data))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Run one request through the gateway; `Ok(())` means the caller's handler
/// may produce its response.
fn intercept(state: &AppState, headers: &HeaderMap, required: u64) -> Result<(), Response> {
    let decision = state.gateway.intercept(
        header_str(headers, PAYMENT_HEADER),
        header_str(headers, COMMITMENT_HEADER),
        header_str(headers, WALLET_HEADER),
        required,
    );

    match decision {
        GatewayDecision::Granted => Ok(()),
        GatewayDecision::Quote(body) => {
            Err((StatusCode::PAYMENT_REQUIRED, Json(body)).into_response())
        }
        GatewayDecision::Rejected(reason) => {
            tracing::debug!(code = reason.code(), "payment rejected");
            Err(reason.into_response())
        }
    }
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        network: state.config.network.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Ledger statistics projection
pub async fn stats(State(state): State<AppState>) -> Json<ServerStats> {
    Json(state.gateway.ledger().stats())
}

/// Paid demo resource at the default price
pub async fn premium_content(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let price = state.config.default_price_lamports;
    if let Err(response) = intercept(&state, &headers, price) {
        return response;
    }

    Json(serde_json::json!({
        "content": "This is premium content unlocked by a private payment",
        "priceLamports": price,
    }))
    .into_response()
}

/// Paid demo resource at double the default price
pub async fn premium_data(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let price = state.config.default_price_lamports * 2;
    if let Err(response) = intercept(&state, &headers, price) {
        return response;
    }

    Json(serde_json::json!({
        "data": { "series": [1, 1, 2, 3, 5, 8, 13] },
        "priceLamports": price,
    }))
    .into_response()
}
