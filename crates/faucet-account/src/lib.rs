//! Signing account management for the faucet service.
//!
//! This module provides the abstraction over the process-wide signing
//! account: the single destination-chain account that signs and submits
//! every faucet transaction. It defines the interface for signed execution
//! and a service wrapper that the rest of the system holds as one
//! long-lived, injected handle.

use async_trait::async_trait;
use starknet::core::types::{Call, Felt};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when the network rejects or fails a submission.
	#[error("Execution failed: {0}")]
	ExecutionFailed(String),
	/// Error that occurs when connecting the account to its provider.
	#[error("Connection failed: {0}")]
	ConnectionFailed(String),
}

/// Trait defining the interface for signing-account implementations.
///
/// An implementation owns the private key and a provider connection, and
/// turns a list of calls plus explicit nonce and fee parameters into a
/// signed invoke transaction submitted to the network. The nonce is always
/// supplied by the caller; implementations never cache or guess it.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Returns the destination-chain address of this account.
	fn address(&self) -> Felt;

	/// Signs and submits a version-1 invoke transaction carrying the given
	/// calls, returning the transaction hash assigned by the network.
	async fn execute(
		&self,
		calls: Vec<Call>,
		nonce: Felt,
		max_fee: Felt,
	) -> Result<Felt, AccountError>;
}

/// Service that manages the signing account.
///
/// Constructed once at startup from configuration and shared read-only by
/// every submission for the lifetime of the process.
pub struct AccountService {
	/// The underlying account implementation.
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	/// Creates a new AccountService with the specified implementation.
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Returns the address of the managed account.
	pub fn address(&self) -> Felt {
		self.implementation.address()
	}

	/// Signs and submits an invoke transaction through the managed account.
	pub async fn execute(
		&self,
		calls: Vec<Call>,
		nonce: Felt,
		max_fee: Felt,
	) -> Result<Felt, AccountError> {
		self.implementation.execute(calls, nonce, max_fee).await
	}
}
