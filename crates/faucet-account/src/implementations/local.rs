//! Local private-key signing account.
//!
//! Wraps a `starknet` single-owner account over a JSON-RPC provider. The
//! key never leaves this module; callers only see the address and the
//! signed-execution entry point.

use crate::{AccountError, AccountInterface};
use async_trait::async_trait;
use faucet_types::SecretString;
use starknet::accounts::{Account, ExecutionEncoding, SingleOwnerAccount};
use starknet::core::types::{Call, Felt};
use starknet::providers::jsonrpc::{HttpTransport, JsonRpcClient};
use starknet::providers::{Provider, Url};
use starknet::signers::{LocalWallet, SigningKey};

/// Signing account backed by a locally held private key.
pub struct LocalAccount {
	/// The connected account used for signing and submission.
	inner: SingleOwnerAccount<JsonRpcClient<HttpTransport>, LocalWallet>,
	/// The account's address, kept for cheap synchronous access.
	address: Felt,
}

impl LocalAccount {
	/// Connects a local signing account to the given RPC endpoint.
	///
	/// Fetches the chain identifier from the endpoint so that signatures
	/// bind to the right network. Fails fast on an unreachable endpoint,
	/// a malformed address or a malformed key.
	pub async fn connect(
		rpc_url: &str,
		address: &str,
		private_key: &SecretString,
	) -> Result<Self, AccountError> {
		let url = Url::parse(rpc_url)
			.map_err(|e| AccountError::ConnectionFailed(format!("invalid RPC URL: {}", e)))?;
		let provider = JsonRpcClient::new(HttpTransport::new(url));

		let chain_id = provider.chain_id().await.map_err(|e| {
			AccountError::ConnectionFailed(format!("failed to fetch chain id: {}", e))
		})?;

		let address = Felt::from_hex(address)
			.map_err(|e| AccountError::InvalidKey(format!("invalid account address: {}", e)))?;

		let secret_scalar = private_key.with_exposed(|key| {
			Felt::from_hex(key)
				.map_err(|e| AccountError::InvalidKey(format!("invalid private key: {}", e)))
		})?;
		let signer = LocalWallet::from(SigningKey::from_secret_scalar(secret_scalar));

		let inner =
			SingleOwnerAccount::new(provider, signer, address, chain_id, ExecutionEncoding::New);

		tracing::info!(address = %format!("{:#x}", address), "Connected signing account");

		Ok(Self { inner, address })
	}
}

#[async_trait]
impl AccountInterface for LocalAccount {
	fn address(&self) -> Felt {
		self.address
	}

	async fn execute(
		&self,
		calls: Vec<Call>,
		nonce: Felt,
		max_fee: Felt,
	) -> Result<Felt, AccountError> {
		let result = self
			.inner
			.execute_v1(calls)
			.nonce(nonce)
			.max_fee(max_fee)
			.send()
			.await
			.map_err(|e| AccountError::ExecutionFailed(e.to_string()))?;

		Ok(result.transaction_hash)
	}
}
