//! On-chain operations for the faucet service.
//!
//! This module holds the faucet's five chain-facing operations: deriving a
//! counterfactual destination address from a source-chain identifier,
//! checking whether that address is deployed, triggering its deployment,
//! submitting the fixed-amount token transfer, and reading a normalized
//! token balance. Read paths go through a provider abstraction; write
//! paths additionally go through the signing account, serialized so that
//! concurrent requests cannot race on the account's nonce.

use async_trait::async_trait;
use faucet_account::{AccountError, AccountService};
use faucet_types::{
	AccountIdentifier, DeploymentStatus, DerivedAddress, SubmissionStatus, TransactionReceipt,
	TransferRequest, Uint256Limbs,
};
use starknet::core::types::{Call, Felt};
use starknet::macros::selector;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Re-export implementations
pub mod implementations {
	pub mod jsonrpc;
}

/// Fee cap attached to every submission, as mandated by the protocol
/// integration: a generous fixed upper bound, never estimated. If real
/// network fees exceed it, submission fails and surfaces as an error.
pub const SUBMISSION_MAX_FEE: u64 = 0x11111111111;

/// Entrypoint computing the counterfactual destination address.
const COMPUTE_STARKNET_ADDRESS: Felt = selector!("compute_starknet_address");
/// Entrypoint instantiating a counterfactual account on-chain.
const DEPLOY_EXTERNALLY_OWNED_ACCOUNT: Felt = selector!("deploy_externally_owned_account");
/// ERC-20 transfer entrypoint.
const TRANSFER: Felt = selector!("transfer");
/// ERC-20 balance query entrypoint.
const BALANCE_OF: Felt = selector!("balanceOf");

/// Errors that can occur during chain operations.
///
/// Every variant is an upstream failure from the request's point of view:
/// the input was already validated before it reached this layer.
#[derive(Debug, Error)]
pub enum ChainError {
	/// Error that occurs during a provider round trip.
	#[error("Provider call failed: {0}")]
	Provider(String),
	/// Error that occurs while signing or submitting a transaction.
	#[error("Submission failed: {0}")]
	Submission(#[from] AccountError),
	/// Error that occurs when a contract returns an unexpected shape.
	#[error("Malformed response: {0}")]
	MalformedResponse(String),
}

/// Trait defining the faucet's view of the destination-chain RPC surface.
///
/// The underlying transport and call encoding are a capability the core
/// calls through; this trait is the seam that keeps them swappable and
/// lets tests substitute a scripted chain.
#[async_trait]
pub trait ProviderInterface: Send + Sync {
	/// Issues a read-only contract call against the latest chain state and
	/// returns the raw result elements.
	async fn call_contract(
		&self,
		contract: Felt,
		entrypoint: Felt,
		calldata: Vec<Felt>,
	) -> Result<Vec<Felt>, ChainError>;

	/// Fetches the class hash installed at an address in the latest chain
	/// state. `Ok(None)` means the chain reports no contract there; any
	/// other failure is an error.
	async fn class_hash_at(&self, address: Felt) -> Result<Option<Felt>, ChainError>;

	/// Fetches the current nonce of an address from the pending state.
	async fn nonce_of(&self, address: Felt) -> Result<Felt, ChainError>;
}

/// Service bundling the faucet's chain operations.
///
/// Holds the provider, the signing account and the two well-known contract
/// addresses. All state-changing submissions share one lock held across
/// the nonce-fetch and submit window, so two concurrent requests always
/// observe distinct, sequential nonces.
pub struct ChainService {
	/// Read-only provider for calls, class-hash and nonce queries.
	provider: Box<dyn ProviderInterface>,
	/// The process-wide signing account.
	account: Arc<AccountService>,
	/// ERC-20 token contract distributing the faucet funds.
	token: Felt,
	/// Bridging contract exposing address computation and deployment.
	bridge: Felt,
	/// Fixed amount distributed per fund request.
	amount: Uint256Limbs,
	/// Serializes every nonce-fetch-then-submit window.
	submit_lock: Mutex<()>,
}

impl ChainService {
	/// Creates a new ChainService.
	pub fn new(
		provider: Box<dyn ProviderInterface>,
		account: Arc<AccountService>,
		token: Felt,
		bridge: Felt,
		amount: Uint256Limbs,
	) -> Self {
		Self {
			provider,
			account,
			token,
			bridge,
			amount,
			submit_lock: Mutex::new(()),
		}
	}

	/// Derives the counterfactual destination address for an identifier.
	///
	/// Re-derives on every call: derivation is deterministic and cheap
	/// relative to the round trip, and not caching sidesteps invalidation
	/// if the bridging contract address changes across restarts.
	pub async fn derive_address(
		&self,
		identifier: &AccountIdentifier,
	) -> Result<DerivedAddress, ChainError> {
		let result = self
			.provider
			.call_contract(self.bridge, COMPUTE_STARKNET_ADDRESS, vec![identifier.felt()])
			.await?;

		let address = result.first().ok_or_else(|| {
			ChainError::MalformedResponse("address computation returned no elements".into())
		})?;

		tracing::debug!(identifier = %identifier, address = %format!("{:#x}", address), "Derived destination address");

		Ok(DerivedAddress(*address))
	}

	/// Reports whether a derived address has been instantiated on-chain.
	///
	/// Lookup failures other than "no contract at this address" come back
	/// as [`DeploymentStatus::Unknown`] rather than an error; the caller
	/// decides whether to collapse that into "not deployed" (the
	/// historical behavior) or to fail the request.
	pub async fn deployment_status(&self, address: &DerivedAddress) -> DeploymentStatus {
		match self.provider.class_hash_at(address.0).await {
			Ok(Some(_)) => DeploymentStatus::Deployed,
			Ok(None) => DeploymentStatus::NotDeployed,
			Err(e) => {
				tracing::warn!(address = %address, error = %e, "Deployment lookup failed");
				DeploymentStatus::Unknown
			},
		}
	}

	/// Triggers on-chain instantiation of a counterfactual account.
	///
	/// Only called after a negative deployment check; repeating it against
	/// an already-deployed account is benign.
	pub async fn deploy_account(
		&self,
		identifier: &AccountIdentifier,
	) -> Result<TransactionReceipt, ChainError> {
		let call = Call {
			to: self.bridge,
			selector: DEPLOY_EXTERNALLY_OWNED_ACCOUNT,
			calldata: vec![identifier.felt()],
		};
		let receipt = self.submit(call).await?;
		tracing::info!(identifier = %identifier, hash = %receipt.hash_hex(), "Submitted account deployment");
		Ok(receipt)
	}

	/// Submits the fixed-amount token transfer to a derived address.
	pub async fn transfer(
		&self,
		recipient: DerivedAddress,
	) -> Result<TransactionReceipt, ChainError> {
		let request = TransferRequest {
			recipient,
			amount: self.amount,
		};
		let call = Call {
			to: self.token,
			selector: TRANSFER,
			calldata: vec![
				request.recipient.0,
				request.amount.low_felt(),
				request.amount.high_felt(),
			],
		};
		let receipt = self.submit(call).await?;
		tracing::info!(recipient = %request.recipient, hash = %receipt.hash_hex(), "Submitted transfer");
		Ok(receipt)
	}

	/// Reads the token balance of a derived address as a decimal string.
	pub async fn balance_of(&self, address: &DerivedAddress) -> Result<String, ChainError> {
		let result = self
			.provider
			.call_contract(self.token, BALANCE_OF, vec![address.0])
			.await?;

		if result.len() < 2 {
			return Err(ChainError::MalformedResponse(format!(
				"balance query returned {} elements, expected 2",
				result.len()
			)));
		}

		let balance = Uint256Limbs::from_felts(&result[0], &result[1])
			.map_err(|e| ChainError::MalformedResponse(e.to_string()))?;

		Ok(balance.to_decimal())
	}

	/// Signs and submits a single call from the signing account.
	///
	/// The nonce is fetched fresh immediately before submission and the
	/// whole window runs under the submission lock, so concurrent
	/// submissions serialize instead of racing to reuse a nonce.
	async fn submit(&self, call: Call) -> Result<TransactionReceipt, ChainError> {
		let _guard = self.submit_lock.lock().await;

		let nonce = self.provider.nonce_of(self.account.address()).await?;
		let hash = self
			.account
			.execute(vec![call], nonce, Felt::from(SUBMISSION_MAX_FEE))
			.await?;

		tracing::debug!(nonce = %nonce, hash = %format!("{:#x}", hash), "Accepted into pending pool");

		Ok(TransactionReceipt {
			hash,
			status: SubmissionStatus::Submitted,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use faucet_account::AccountInterface;
	use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
	use std::sync::Mutex as StdMutex;

	/// How a scripted provider answers class-hash lookups.
	#[derive(Clone, Copy)]
	enum ClassHashBehavior {
		Deployed,
		Absent,
		Failing,
	}

	/// Scripted chain state for tests.
	struct ScriptedProvider {
		derived: Felt,
		balance: (Felt, Felt),
		short_balance: bool,
		class_hash: ClassHashBehavior,
		fail_calls: bool,
		nonce: Arc<AtomicU64>,
		call_count: Arc<AtomicUsize>,
	}

	impl Default for ScriptedProvider {
		fn default() -> Self {
			Self {
				derived: Felt::from(0x1234u64),
				balance: (Felt::from(7u64), Felt::ZERO),
				short_balance: false,
				class_hash: ClassHashBehavior::Deployed,
				fail_calls: false,
				nonce: Arc::new(AtomicU64::new(0)),
				call_count: Arc::new(AtomicUsize::new(0)),
			}
		}
	}

	#[async_trait]
	impl ProviderInterface for ScriptedProvider {
		async fn call_contract(
			&self,
			_contract: Felt,
			entrypoint: Felt,
			_calldata: Vec<Felt>,
		) -> Result<Vec<Felt>, ChainError> {
			self.call_count.fetch_add(1, Ordering::SeqCst);
			if self.fail_calls {
				return Err(ChainError::Provider("connection refused".into()));
			}
			if entrypoint == COMPUTE_STARKNET_ADDRESS {
				Ok(vec![self.derived])
			} else if entrypoint == BALANCE_OF {
				if self.short_balance {
					Ok(vec![self.balance.0])
				} else {
					Ok(vec![self.balance.0, self.balance.1])
				}
			} else {
				Ok(vec![])
			}
		}

		async fn class_hash_at(&self, _address: Felt) -> Result<Option<Felt>, ChainError> {
			match self.class_hash {
				ClassHashBehavior::Deployed => Ok(Some(Felt::from(0xc1a55u64))),
				ClassHashBehavior::Absent => Ok(None),
				ClassHashBehavior::Failing => {
					Err(ChainError::Provider("rpc unreachable".into()))
				},
			}
		}

		async fn nonce_of(&self, _address: Felt) -> Result<Felt, ChainError> {
			Ok(Felt::from(self.nonce.load(Ordering::SeqCst)))
		}
	}

	/// Account double that records submitted nonces and advances the
	/// scripted chain nonce only once a submission lands, mimicking the
	/// network's view.
	struct RecordingAccount {
		chain_nonce: Arc<AtomicU64>,
		submitted: Arc<StdMutex<Vec<Felt>>>,
	}

	#[async_trait]
	impl AccountInterface for RecordingAccount {
		fn address(&self) -> Felt {
			Felt::from(0xfacadeu64)
		}

		async fn execute(
			&self,
			_calls: Vec<Call>,
			nonce: Felt,
			_max_fee: Felt,
		) -> Result<Felt, AccountError> {
			// Widen the race window: without the submission lock both
			// tasks would read the same nonce here.
			tokio::time::sleep(std::time::Duration::from_millis(10)).await;
			self.submitted.lock().unwrap().push(nonce);
			self.chain_nonce.fetch_add(1, Ordering::SeqCst);
			Ok(Felt::from(0xbeefu64))
		}
	}

	fn service_with(provider: ScriptedProvider) -> (Arc<ChainService>, Arc<StdMutex<Vec<Felt>>>) {
		let submitted = Arc::new(StdMutex::new(Vec::new()));
		let account = RecordingAccount {
			chain_nonce: provider.nonce.clone(),
			submitted: submitted.clone(),
		};
		let service = ChainService::new(
			Box::new(provider),
			Arc::new(AccountService::new(Box::new(account))),
			Felt::from(0x70ce0u64),
			Felt::from(0xb41d6eu64),
			Uint256Limbs::new(1_000, 0),
		);
		(Arc::new(service), submitted)
	}

	fn identifier() -> AccountIdentifier {
		AccountIdentifier::parse("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap()
	}

	#[tokio::test]
	async fn derivation_is_deterministic() {
		let (service, _) = service_with(ScriptedProvider::default());
		let first = service.derive_address(&identifier()).await.unwrap();
		let second = service.derive_address(&identifier()).await.unwrap();
		assert_eq!(first, second);
		assert_eq!(first.0, Felt::from(0x1234u64));
	}

	#[tokio::test]
	async fn derivation_propagates_provider_failure() {
		let provider = ScriptedProvider {
			fail_calls: true,
			..ScriptedProvider::default()
		};
		let (service, _) = service_with(provider);
		let err = service.derive_address(&identifier()).await.unwrap_err();
		assert!(matches!(err, ChainError::Provider(_)));
	}

	#[tokio::test]
	async fn deployment_status_tri_state() {
		for (behavior, expected) in [
			(ClassHashBehavior::Deployed, DeploymentStatus::Deployed),
			(ClassHashBehavior::Absent, DeploymentStatus::NotDeployed),
			(ClassHashBehavior::Failing, DeploymentStatus::Unknown),
		] {
			let provider = ScriptedProvider {
				class_hash: behavior,
				..ScriptedProvider::default()
			};
			let (service, _) = service_with(provider);
			let status = service
				.deployment_status(&DerivedAddress(Felt::from(0x1234u64)))
				.await;
			assert_eq!(status, expected);
		}
	}

	#[tokio::test]
	async fn transfer_uses_fresh_nonce_and_reports_submitted() {
		let (service, submitted) = service_with(ScriptedProvider::default());
		let receipt = service
			.transfer(DerivedAddress(Felt::from(0x1234u64)))
			.await
			.unwrap();
		assert_eq!(receipt.status, SubmissionStatus::Submitted);
		assert_eq!(receipt.hash, Felt::from(0xbeefu64));
		assert_eq!(*submitted.lock().unwrap(), vec![Felt::ZERO]);
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn concurrent_submissions_get_distinct_sequential_nonces() {
		let (service, submitted) = service_with(ScriptedProvider::default());

		let a = tokio::spawn({
			let service = service.clone();
			async move { service.transfer(DerivedAddress(Felt::from(0xaaaau64))).await }
		});
		let b = tokio::spawn({
			let service = service.clone();
			async move { service.transfer(DerivedAddress(Felt::from(0xbbbbu64))).await }
		});

		a.await.unwrap().unwrap();
		b.await.unwrap().unwrap();

		let nonces = submitted.lock().unwrap().clone();
		assert_eq!(nonces.len(), 2);
		assert_ne!(nonces[0], nonces[1]);
		assert_eq!(nonces, vec![Felt::ZERO, Felt::ONE]);
	}

	#[tokio::test]
	async fn balance_reconstructs_two_limbs() {
		let provider = ScriptedProvider {
			balance: (Felt::ZERO, Felt::ONE),
			..ScriptedProvider::default()
		};
		let (service, _) = service_with(provider);
		let balance = service
			.balance_of(&DerivedAddress(Felt::from(0x1234u64)))
			.await
			.unwrap();
		assert_eq!(balance, "340282366920938463463374607431768211456");
	}

	#[tokio::test]
	async fn short_balance_response_is_malformed() {
		let provider = ScriptedProvider {
			short_balance: true,
			..ScriptedProvider::default()
		};
		let (service, _) = service_with(provider);
		let err = service
			.balance_of(&DerivedAddress(Felt::from(0x1234u64)))
			.await
			.unwrap_err();
		assert!(matches!(err, ChainError::MalformedResponse(_)));
	}

	#[tokio::test]
	async fn deploy_account_goes_through_the_submission_path() {
		let (service, submitted) = service_with(ScriptedProvider::default());
		let receipt = service.deploy_account(&identifier()).await.unwrap();
		assert_eq!(receipt.status, SubmissionStatus::Submitted);
		assert_eq!(submitted.lock().unwrap().len(), 1);
	}
}
