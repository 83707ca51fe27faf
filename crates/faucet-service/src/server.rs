//! HTTP server for the faucet API.
//!
//! Thin request/response marshalling over the engine: three routes, JSON
//! bodies, permissive CORS. Client errors echo their message; upstream
//! failures are logged in detail server-side and answered with a generic
//! message.

use axum::{
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::{get, post},
	Router,
};
use faucet_config::ApiConfig;
use faucet_core::{FaucetEngine, FaucetError};
use faucet_types::{BalanceRequest, BalanceResponse, ErrorResponse, FaucetRequest, FundResponse};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the engine for processing requests.
	pub engine: Arc<FaucetEngine>,
}

/// Error type returned by the HTTP handlers.
#[derive(Debug)]
enum ApiError {
	/// Client error: message is safe to echo back (400).
	BadRequest(String),
	/// Upstream failure: callers get a generic message (500).
	Internal,
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let (status, message) = match self {
			ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
			ApiError::Internal => (
				StatusCode::INTERNAL_SERVER_ERROR,
				"Internal Server Error".to_string(),
			),
		};
		(status, Json(ErrorResponse { message })).into_response()
	}
}

impl From<FaucetError> for ApiError {
	fn from(err: FaucetError) -> Self {
		match err {
			FaucetError::InvalidInput(_) => {
				tracing::warn!(error = %err, "Rejected request input");
				ApiError::BadRequest(err.to_string())
			},
			FaucetError::Upstream(_) => {
				tracing::error!(error = %err, "Upstream call failed");
				ApiError::Internal
			},
		}
	}
}

/// Builds the router with all faucet routes.
pub fn router(engine: Arc<FaucetEngine>) -> Router {
	Router::new()
		.route("/health", get(handle_health))
		.route("/faucet", post(handle_faucet))
		.route("/balance", post(handle_balance))
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(AppState { engine })
}

/// Starts the HTTP server for the faucet API.
pub async fn start_server(
	api_config: &ApiConfig,
	engine: Arc<FaucetEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(engine);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Faucet API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Handles `GET /health`.
async fn handle_health() -> &'static str {
	"ok"
}

/// Handles `POST /faucet`.
///
/// Requires a `to` identifier in the body; its absence is a client error
/// answered before any chain interaction.
async fn handle_faucet(
	State(state): State<AppState>,
	Json(request): Json<FaucetRequest>,
) -> Result<Json<FundResponse>, ApiError> {
	let to = request.to.ok_or_else(|| {
		ApiError::BadRequest("Missing \"to\" address in request body.".to_string())
	})?;

	let receipt = state.engine.fund(&to).await?;
	let hash = receipt.hash_hex();

	Ok(Json(FundResponse {
		message: format!("Transfer successful. Transaction hash: {}", hash),
		hash,
	}))
}

/// Handles `POST /balance`.
async fn handle_balance(
	State(state): State<AppState>,
	Json(request): Json<BalanceRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
	let of = request.of.ok_or_else(|| {
		ApiError::BadRequest("Missing \"of\" address in request body.".to_string())
	})?;

	let balance = state.engine.balance(&of).await?;

	Ok(Json(BalanceResponse {
		message: "Query successful.".to_string(),
		balance,
	}))
}
