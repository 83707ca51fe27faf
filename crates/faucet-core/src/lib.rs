//! Distribution orchestrator for the faucet service.
//!
//! The engine sequences the chain operations into the user-facing
//! operations: funding a source-chain account's derived address and
//! querying its token balance. Each operation is a short sequential
//! pipeline with no parallelism; every upstream failure is terminal for
//! that request and is never retried here.

use faucet_chain::{ChainError, ChainService};
use faucet_config::TransferConfig;
use faucet_types::{
	AccountIdentifier, DeploymentStatus, DerivedAddress, IdentifierError, TransactionReceipt,
};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the orchestrator.
///
/// Exactly two classes exist at the request level: the caller sent bad
/// input, or an upstream chain interaction failed. The HTTP layer maps
/// them to 400 and 500 respectively; nothing in between is needed.
#[derive(Debug, Error)]
pub enum FaucetError {
	/// Missing or malformed identifier. Safe to echo back to the caller
	/// and never logged as a server fault.
	#[error("invalid identifier: {0}")]
	InvalidInput(String),
	/// Any failure from the chain layer: read-only calls, nonce fetch,
	/// submission or balance query. Detail is logged server-side; callers
	/// get a generic message.
	#[error("upstream call failed: {0}")]
	Upstream(String),
}

impl From<IdentifierError> for FaucetError {
	fn from(err: IdentifierError) -> Self {
		FaucetError::InvalidInput(err.to_string())
	}
}

impl From<ChainError> for FaucetError {
	fn from(err: ChainError) -> Self {
		FaucetError::Upstream(err.to_string())
	}
}

/// Outcome of an explicit deployment check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentOutcome {
	/// The derived address already had code; nothing was submitted.
	AlreadyDeployed,
	/// A deployment transaction was submitted.
	DeploymentSubmitted(TransactionReceipt),
}

/// Orchestrates the faucet's two user-facing operations.
///
/// Holds one shared [`ChainService`] handle; the engine itself is
/// stateless per request.
pub struct FaucetEngine {
	/// Chain operations: derivation, submission, balance reads.
	chain: Arc<ChainService>,
	/// Run the deployment pipeline before each transfer.
	deploy_on_fund: bool,
	/// Fail the request when a deployment lookup is indeterminate instead
	/// of treating the address as undeployed.
	strict_deployment_check: bool,
}

impl FaucetEngine {
	/// Creates a new engine over the given chain service.
	pub fn new(chain: Arc<ChainService>, transfer: &TransferConfig) -> Self {
		Self {
			chain,
			deploy_on_fund: transfer.deploy_on_fund,
			strict_deployment_check: transfer.strict_deployment_check,
		}
	}

	/// Funds the derived address of a source-chain identifier with the
	/// fixed faucet amount.
	///
	/// Validates the identifier, derives the destination address and
	/// submits the transfer. Deployment orchestration is a client-side
	/// concern unless `deploy_on_fund` opts the service into it.
	pub async fn fund(&self, identifier: &str) -> Result<TransactionReceipt, FaucetError> {
		let identifier = AccountIdentifier::parse(identifier)?;
		let recipient = self.chain.derive_address(&identifier).await?;

		if self.deploy_on_fund {
			self.ensure_deployed_at(&identifier, &recipient).await?;
		}

		let receipt = self.chain.transfer(recipient).await?;
		tracing::info!(identifier = %identifier, hash = %receipt.hash_hex(), "Fund request completed");
		Ok(receipt)
	}

	/// Returns the token balance of the identifier's derived address as a
	/// decimal string. Recomputed on every query, never cached.
	pub async fn balance(&self, identifier: &str) -> Result<String, FaucetError> {
		let identifier = AccountIdentifier::parse(identifier)?;
		let address = self.chain.derive_address(&identifier).await?;
		let balance = self.chain.balance_of(&address).await?;
		Ok(balance)
	}

	/// Checks the identifier's derived address and deploys it if absent.
	///
	/// Exposed for client-side pipelines that want the fuller
	/// derive-check-deploy sequence; not routed over HTTP.
	pub async fn ensure_deployed(
		&self,
		identifier: &str,
	) -> Result<DeploymentOutcome, FaucetError> {
		let identifier = AccountIdentifier::parse(identifier)?;
		let address = self.chain.derive_address(&identifier).await?;
		self.ensure_deployed_at(&identifier, &address).await
	}

	/// Deployment check and conditional deployment for an already-derived
	/// address.
	///
	/// An indeterminate lookup is treated as "not deployed" unless the
	/// strict flag is set: that reproduces the historical collapse of all
	/// lookup failures into one answer, at the cost of an occasional
	/// redundant (benign) deployment attempt after a transient RPC
	/// failure.
	async fn ensure_deployed_at(
		&self,
		identifier: &AccountIdentifier,
		address: &DerivedAddress,
	) -> Result<DeploymentOutcome, FaucetError> {
		match self.chain.deployment_status(address).await {
			DeploymentStatus::Deployed => Ok(DeploymentOutcome::AlreadyDeployed),
			DeploymentStatus::NotDeployed => {
				let receipt = self.chain.deploy_account(identifier).await?;
				Ok(DeploymentOutcome::DeploymentSubmitted(receipt))
			},
			DeploymentStatus::Unknown if self.strict_deployment_check => Err(
				FaucetError::Upstream("deployment status could not be determined".into()),
			),
			DeploymentStatus::Unknown => {
				tracing::warn!(identifier = %identifier, "Treating indeterminate deployment status as undeployed");
				let receipt = self.chain.deploy_account(identifier).await?;
				Ok(DeploymentOutcome::DeploymentSubmitted(receipt))
			},
		}
	}
}
