//! API Server Module
//!
//! This module implements the HTTP server the marketplace client talks to.
//! It accepts trade submissions, hands them to intake, and reports the
//! pending queue size.

use crate::{config::Config, intake::TradeIntake, pool::TradeQueue, TradeStatus};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared application state that is accessible across all request handlers
///
/// - `intake`: screens and enqueues submitted trades
/// - `queue`: read directly for advisory status reporting
#[derive(Clone)]
pub struct AppState {
    intake: Arc<TradeIntake>,
    queue: Arc<TradeQueue>,
}

/// The main API server struct
///
/// Encapsulates the server configuration and application state.
pub struct Server {
    config: Config,
    state: AppState,
}

impl Server {
    /// Creates a new API server instance
    pub fn new(config: Config, intake: Arc<TradeIntake>, queue: Arc<TradeQueue>) -> Self {
        let state = AppState { intake, queue };
        Self { config, state }
    }

    /// Starts the API server and begins listening for incoming requests
    ///
    /// Routes:
    /// - `POST /submit_trade` - screen and enqueue one trade
    /// - `GET /status` - advisory queue size
    ///
    /// CORS is permissive: the marketplace front end is served from a
    /// different origin.
    pub async fn start(self) -> anyhow::Result<()> {
        let app = Router::new()
            .route("/submit_trade", post(handle_submit_trade))
            .route("/status", get(handle_status))
            .layer(CorsLayer::permissive())
            .with_state(self.state);

        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);
        info!("API server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// One trade as submitted by the marketplace client.
#[derive(Debug, Deserialize)]
struct TradeRequest {
    seller: String,
    amount: u64,
    /// Raw category string; intake decides whether it is recognized.
    #[serde(rename = "type")]
    kind: String,
}

/// Response to a trade submission.
///
/// `queue_position` is present on acceptance, `reason` on rejection; the
/// forecast label is always echoed.
#[derive(Debug, Serialize)]
struct TradeResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    queue_position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    weather: String,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    queue_size: usize,
}

/// Handles `POST /submit_trade`
async fn handle_submit_trade(
    State(state): State<AppState>,
    Json(request): Json<TradeRequest>,
) -> Json<TradeResponse> {
    info!(
        "Received trade: seller={} amount={} type={}",
        request.seller, request.amount, request.kind
    );

    let receipt = state
        .intake
        .submit(request.seller, request.amount, &request.kind)
        .await;

    let response = match receipt.status {
        TradeStatus::Queued { position } => TradeResponse {
            status: "Queued",
            queue_position: Some(position),
            reason: None,
            weather: receipt.weather,
        },
        TradeStatus::Rejected { reason } => TradeResponse {
            status: "Rejected",
            queue_position: None,
            reason: Some(reason.to_string()),
            weather: receipt.weather,
        },
    };

    Json(response)
}

/// Handles `GET /status`
///
/// The reported size is advisory: it is read outside any intake or flush
/// critical section and may be stale by the time the client sees it.
async fn handle_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        queue_size: state.queue.len().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // The wire shape is what the marketplace front end parses; absent
    // fields must be omitted, not null.

    #[test]
    fn queued_response_omits_reason() {
        let response = TradeResponse {
            status: "Queued",
            queue_position: Some(3),
            reason: None,
            weather: "Cloudy".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "Queued", "queue_position": 3, "weather": "Cloudy"})
        );
    }

    #[test]
    fn rejected_response_omits_position() {
        let response = TradeResponse {
            status: "Rejected",
            queue_position: None,
            reason: Some("Fraud detected: amount 47 exceeds limit 46".to_string()),
            weather: "Sunny".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "Rejected",
                "reason": "Fraud detected: amount 47 exceeds limit 46",
                "weather": "Sunny"
            })
        );
    }

    #[test]
    fn trade_request_reads_the_type_field() {
        let request: TradeRequest =
            serde_json::from_value(json!({"seller": "alice", "amount": 10, "type": "OG (Solar)"}))
                .unwrap();
        assert_eq!(request.seller, "alice");
        assert_eq!(request.amount, 10);
        assert_eq!(request.kind, "OG (Solar)");
    }
}
