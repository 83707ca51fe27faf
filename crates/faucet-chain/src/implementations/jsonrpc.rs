//! JSON-RPC provider implementation.
//!
//! Concrete [`ProviderInterface`] over the destination chain's JSON-RPC
//! API. Read-only calls and class-hash lookups query the latest state;
//! nonces come from the pending state so back-to-back submissions see
//! their own in-flight transactions.

use crate::{ChainError, ProviderInterface};
use async_trait::async_trait;
use starknet::core::types::{BlockId, BlockTag, Felt, FunctionCall, StarknetError};
use starknet::providers::jsonrpc::{HttpTransport, JsonRpcClient};
use starknet::providers::{Provider, ProviderError, Url};

/// Provider backed by an HTTP JSON-RPC endpoint.
pub struct JsonRpcProvider {
	client: JsonRpcClient<HttpTransport>,
}

impl JsonRpcProvider {
	/// Creates a provider for the given endpoint URL.
	pub fn new(rpc_url: &str) -> Result<Self, ChainError> {
		let url = Url::parse(rpc_url)
			.map_err(|e| ChainError::Provider(format!("invalid RPC URL: {}", e)))?;
		Ok(Self {
			client: JsonRpcClient::new(HttpTransport::new(url)),
		})
	}
}

#[async_trait]
impl ProviderInterface for JsonRpcProvider {
	async fn call_contract(
		&self,
		contract: Felt,
		entrypoint: Felt,
		calldata: Vec<Felt>,
	) -> Result<Vec<Felt>, ChainError> {
		self.client
			.call(
				FunctionCall {
					contract_address: contract,
					entry_point_selector: entrypoint,
					calldata,
				},
				BlockId::Tag(BlockTag::Latest),
			)
			.await
			.map_err(|e| ChainError::Provider(format!("contract call failed: {}", e)))
	}

	async fn class_hash_at(&self, address: Felt) -> Result<Option<Felt>, ChainError> {
		match self
			.client
			.get_class_hash_at(BlockId::Tag(BlockTag::Latest), address)
			.await
		{
			Ok(class_hash) => Ok(Some(class_hash)),
			Err(ProviderError::StarknetError(StarknetError::ContractNotFound)) => Ok(None),
			Err(e) => Err(ChainError::Provider(format!(
				"class hash lookup failed: {}",
				e
			))),
		}
	}

	async fn nonce_of(&self, address: Felt) -> Result<Felt, ChainError> {
		self.client
			.get_nonce(BlockId::Tag(BlockTag::Pending), address)
			.await
			.map_err(|e| ChainError::Provider(format!("nonce fetch failed: {}", e)))
	}
}
