//! Validated source-chain account identifiers.
//!
//! An identifier arrives as a `0x`-prefixed hexadecimal string naming an
//! externally-owned account on the source chain. It is validated once at the
//! request boundary and carried as a typed value from then on, so the chain
//! layer never sees raw user input.

use serde::{Deserialize, Serialize};
use starknet::core::types::Felt;
use std::fmt;
use thiserror::Error;

/// Maximum total length of an identifier, including the `0x` prefix.
pub const MAX_IDENTIFIER_LEN: usize = 66;

/// Errors produced when parsing an account identifier.
///
/// All of these are client errors: the input never reached the network.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierError {
	/// The identifier does not start with `0x`.
	#[error("identifier must start with 0x")]
	MissingPrefix,
	/// The identifier has no digits after the prefix.
	#[error("identifier has no hex digits")]
	Empty,
	/// The identifier exceeds the maximum length.
	#[error("identifier exceeds {MAX_IDENTIFIER_LEN} characters")]
	TooLong,
	/// The identifier contains a character outside `[0-9A-Fa-f]`.
	#[error("identifier contains a non-hexadecimal character")]
	InvalidCharacter,
	/// The identifier does not fit in a destination-chain field element.
	#[error("identifier does not fit in a field element")]
	Overflow,
}

/// A validated source-chain account identifier.
///
/// Holds both the original string form (for echoing back to clients and
/// logging) and its field-element form (the sole calldata of the
/// counterfactual-address computation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentifier {
	raw: String,
	felt: Felt,
}

impl AccountIdentifier {
	/// Parses and validates a raw identifier string.
	///
	/// The input must match `^0x[0-9A-Fa-f]+$`, be at most
	/// [`MAX_IDENTIFIER_LEN`] characters long in total, and fit in a
	/// field element.
	pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
		let digits = raw
			.strip_prefix("0x")
			.ok_or(IdentifierError::MissingPrefix)?;
		if digits.is_empty() {
			return Err(IdentifierError::Empty);
		}
		if raw.len() > MAX_IDENTIFIER_LEN {
			return Err(IdentifierError::TooLong);
		}
		if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
			return Err(IdentifierError::InvalidCharacter);
		}
		let felt = Felt::from_hex(raw).map_err(|_| IdentifierError::Overflow)?;
		Ok(Self {
			raw: raw.to_string(),
			felt,
		})
	}

	/// Returns the identifier in its original string form.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Returns the identifier as a field element.
	pub fn felt(&self) -> Felt {
		self.felt
	}
}

impl fmt::Display for AccountIdentifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_typical_eoa_address() {
		let id = AccountIdentifier::parse("0x5FbDB2315678afecb367f032d93F642f64180aa3")
			.expect("valid identifier");
		assert_eq!(id.as_str(), "0x5FbDB2315678afecb367f032d93F642f64180aa3");
		assert_eq!(
			id.felt(),
			Felt::from_hex("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap()
		);
	}

	#[test]
	fn accepts_mixed_case_and_short_values() {
		assert!(AccountIdentifier::parse("0x0").is_ok());
		assert!(AccountIdentifier::parse("0xAbCdEf").is_ok());
	}

	#[test]
	fn rejects_missing_prefix() {
		assert_eq!(
			AccountIdentifier::parse("5FbDB2315678afecb367f032d93F642f64180aa3"),
			Err(IdentifierError::MissingPrefix)
		);
	}

	#[test]
	fn rejects_empty_digits() {
		assert_eq!(AccountIdentifier::parse("0x"), Err(IdentifierError::Empty));
		assert_eq!(AccountIdentifier::parse(""), Err(IdentifierError::MissingPrefix));
	}

	#[test]
	fn rejects_non_hex_characters() {
		assert_eq!(
			AccountIdentifier::parse("0xdeadbeefg"),
			Err(IdentifierError::InvalidCharacter)
		);
		assert_eq!(
			AccountIdentifier::parse("0x 123"),
			Err(IdentifierError::InvalidCharacter)
		);
	}

	#[test]
	fn rejects_over_length_input() {
		let long = format!("0x{}", "a".repeat(65));
		assert_eq!(
			AccountIdentifier::parse(&long),
			Err(IdentifierError::TooLong)
		);
	}

	#[test]
	fn rejects_values_outside_the_field() {
		// 64 f digits is within the length bound but above the field prime.
		let max = format!("0x{}", "f".repeat(64));
		assert_eq!(
			AccountIdentifier::parse(&max),
			Err(IdentifierError::Overflow)
		);
	}

	#[test]
	fn parsing_is_deterministic() {
		let a = AccountIdentifier::parse("0xabc123").unwrap();
		let b = AccountIdentifier::parse("0xabc123").unwrap();
		assert_eq!(a, b);
		assert_eq!(a.felt(), b.felt());
	}
}
