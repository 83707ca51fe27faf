//! Request and response payloads for the faucet HTTP API.
//!
//! The identifier fields are optional so that a missing field deserializes
//! cleanly and can be rejected as a client error by the handler, instead of
//! failing body extraction with an opaque message.

use serde::{Deserialize, Serialize};

/// Body of `POST /faucet`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaucetRequest {
	/// Source-chain identifier of the account to fund.
	pub to: Option<String>,
}

/// Body of `POST /balance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRequest {
	/// Source-chain identifier of the account to query.
	pub of: Option<String>,
}

/// Successful response of `POST /faucet`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundResponse {
	/// Human-readable outcome description.
	pub message: String,
	/// Hash of the submitted transfer transaction.
	pub hash: String,
}

/// Successful response of `POST /balance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
	/// Human-readable outcome description.
	pub message: String,
	/// Token balance of the derived address as a decimal string.
	pub balance: String,
}

/// Error body shared by all endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Human-readable error description.
	pub message: String,
}
