//! Common types module for the faucet service.
//!
//! This module defines the core data types shared by all faucet components:
//! validated account identifiers, derived destination addresses, two-limb
//! unsigned 256-bit values, submission receipts and the HTTP API payloads.

/// API request and response payloads for the HTTP endpoints.
pub mod api;
/// Chain-facing types: derived addresses, transfer requests and receipts.
pub mod chain;
/// Validated source-chain account identifiers.
pub mod identifier;
/// Secure string type for sensitive configuration values.
pub mod secret_string;
/// Two-limb unsigned 256-bit value handling.
pub mod uint256;

// Re-export all types for convenient access
pub use api::*;
pub use chain::*;
pub use identifier::*;
pub use secret_string::SecretString;
pub use uint256::*;
