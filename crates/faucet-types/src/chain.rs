//! Chain-facing types for address derivation and transaction submission.

use crate::Uint256Limbs;
use starknet::core::types::Felt;
use std::fmt;

/// A destination-chain address derived from a source-chain identifier.
///
/// Always produced by the counterfactual-address computation, never
/// supplied by a caller; it lives for the length of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedAddress(pub Felt);

impl fmt::Display for DerivedAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:#x}", self.0)
	}
}

/// A request to move the fixed faucet amount to a derived address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
	/// The recipient of the transfer.
	pub recipient: DerivedAddress,
	/// The amount, in the destination chain's two-limb encoding.
	pub amount: Uint256Limbs,
}

/// What the service actually knows about a submitted transaction.
///
/// Submission is fire-and-forget: acceptance into the node's pending pool
/// is the last thing this service observes, so there is deliberately no
/// confirmed or failed state here. Finality is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
	/// The node accepted the transaction into its pending pool.
	Submitted,
	/// The transaction was handed to the network but its acceptance could
	/// not be read back.
	Unknown,
}

/// Receipt for a submitted transaction.
///
/// Immutable once returned; no further lifecycle is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionReceipt {
	/// The transaction hash assigned by the network.
	pub hash: Felt,
	/// What is known about the submission.
	pub status: SubmissionStatus,
}

impl TransactionReceipt {
	/// Returns the transaction hash as a `0x`-prefixed hex string.
	pub fn hash_hex(&self) -> String {
		format!("{:#x}", self.hash)
	}
}

/// Whether a derived address has been instantiated on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentStatus {
	/// The address has a class hash installed.
	Deployed,
	/// The chain reports no contract at the address.
	NotDeployed,
	/// The lookup failed for a reason other than absence, so the real
	/// status could not be determined.
	Unknown,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn derived_address_displays_as_prefixed_hex() {
		let address = DerivedAddress(Felt::from(0xabcdefu64));
		assert_eq!(address.to_string(), "0xabcdef");
	}

	#[test]
	fn receipt_hash_renders_as_prefixed_hex() {
		let receipt = TransactionReceipt {
			hash: Felt::from(0x1234u64),
			status: SubmissionStatus::Submitted,
		};
		assert_eq!(receipt.hash_hex(), "0x1234");
	}
}
