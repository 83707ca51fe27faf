//! Two-limb unsigned 256-bit value handling.
//!
//! The destination chain's native field is narrower than 256 bits, so token
//! amounts and balances cross the wire as a (low, high) pair of 128-bit
//! limbs. This module reconstructs such pairs into full-width values and
//! splits configured decimal amounts back into limbs.

use alloy_primitives::U256;
use starknet::core::types::Felt;
use thiserror::Error;

/// Errors produced when handling two-limb values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimbError {
	/// A limb returned by the chain does not fit in 128 bits.
	#[error("limb does not fit in 128 bits")]
	LimbOverflow,
	/// A configured amount is not a valid unsigned 256-bit decimal.
	#[error("invalid decimal amount: {0}")]
	InvalidDecimal(String),
}

/// An unsigned 256-bit value as (low, high) 128-bit limbs.
///
/// The represented value is `low + high * 2^128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uint256Limbs {
	/// The low 128 bits.
	pub low: u128,
	/// The high 128 bits.
	pub high: u128,
}

impl Uint256Limbs {
	/// Creates a value from its two limbs.
	pub fn new(low: u128, high: u128) -> Self {
		Self { low, high }
	}

	/// Reconstructs a value from the two field elements returned by a
	/// contract call.
	///
	/// Each element must fit in 128 bits; the chain guarantees this for
	/// well-formed `u256` return values, so a wider element is a
	/// malformed response.
	pub fn from_felts(low: &Felt, high: &Felt) -> Result<Self, LimbError> {
		Ok(Self {
			low: felt_to_u128(low)?,
			high: felt_to_u128(high)?,
		})
	}

	/// Parses a decimal string into limbs.
	///
	/// Used for the fixed transfer amount, which is configured once at
	/// startup as a plain decimal.
	pub fn from_decimal(value: &str) -> Result<Self, LimbError> {
		let value = U256::from_str_radix(value, 10)
			.map_err(|e| LimbError::InvalidDecimal(e.to_string()))?;
		let low = (value & U256::from(u128::MAX)).to::<u128>();
		let high = (value >> 128usize).to::<u128>();
		Ok(Self { low, high })
	}

	/// Renders the full value as a decimal string.
	pub fn to_decimal(&self) -> String {
		let value = U256::from(self.low) | (U256::from(self.high) << 128usize);
		value.to_string()
	}

	/// Returns the low limb as a field element.
	pub fn low_felt(&self) -> Felt {
		Felt::from(self.low)
	}

	/// Returns the high limb as a field element.
	pub fn high_felt(&self) -> Felt {
		Felt::from(self.high)
	}
}

/// Converts a field element into a 128-bit limb, rejecting wider values.
fn felt_to_u128(felt: &Felt) -> Result<u128, LimbError> {
	let bytes = felt.to_bytes_be();
	if bytes[..16].iter().any(|b| *b != 0) {
		return Err(LimbError::LimbOverflow);
	}
	let mut limb = [0u8; 16];
	limb.copy_from_slice(&bytes[16..]);
	Ok(u128::from_be_bytes(limb))
}
