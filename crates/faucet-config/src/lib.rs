//! Configuration module for the faucet service.
//!
//! Configuration is loaded from a TOML file at startup. `${ENV_VAR}`
//! references (with optional `${ENV_VAR:-default}` fallbacks) are resolved
//! before parsing so secrets can stay out of the file itself. Every field
//! is validated at load time; a missing or malformed value is a fatal
//! startup error, never a per-request one.

use faucet_types::{SecretString, Uint256Limbs};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep just the message, not the full input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the faucet service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	/// Destination-chain RPC endpoint configuration.
	pub chain: ChainConfig,
	/// Addresses of the contracts the faucet talks to.
	pub contracts: ContractsConfig,
	/// The signing account used for all submissions.
	pub account: AccountConfig,
	/// Transfer amount and orchestration switches.
	pub transfer: TransferConfig,
	/// HTTP API server settings.
	#[serde(default)]
	pub api: ApiConfig,
}

/// Destination-chain RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
	/// JSON-RPC endpoint URL.
	pub rpc_url: String,
}

/// Addresses of the contracts the faucet talks to.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractsConfig {
	/// ERC-20 token contract distributing the faucet funds.
	pub token: String,
	/// Bridging contract exposing the counterfactual-address computation
	/// and the account deployment trigger.
	pub bridge: String,
}

/// The signing account used for all submissions.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
	/// Destination-chain address of the signing account.
	pub address: String,
	/// Private key of the signing account. Redacted everywhere.
	pub private_key: SecretString,
}

/// Transfer amount and orchestration switches.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferConfig {
	/// Fixed amount distributed per request, as a decimal string.
	pub amount: String,
	/// Run the deployment check (and deploy if needed) before each
	/// transfer. Off by default: the service exposes derive+transfer and
	/// leaves deployment orchestration to clients.
	#[serde(default)]
	pub deploy_on_fund: bool,
	/// Surface an indeterminate deployment lookup as an error instead of
	/// treating it as "not deployed". Off by default to preserve the
	/// historical collapse of all lookup failures into one answer.
	#[serde(default)]
	pub strict_deployment_check: bool,
}

/// HTTP API server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
	/// Bind host.
	#[serde(default = "default_host")]
	pub host: String,
	/// Bind port.
	#[serde(default = "default_port")]
	pub port: u16,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			host: default_host(),
			port: default_port(),
		}
	}
}

fn default_host() -> String {
	"127.0.0.1".to_string()
}

fn default_port() -> u16 {
	4000
}

/// Resolves `${VAR}` and `${VAR:-default}` references against the process
/// environment. A reference without a default to an unset variable is a
/// validation error.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	// Bound the input so a pathological file cannot stall the regex
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).expect("capture 0 always present");
		let var_name = cap.get(1).expect("capture 1 always present").as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)))
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply in reverse so earlier offsets stay valid
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

/// Returns true if the string is a `0x`-prefixed hex value that fits the
/// destination chain's field-element width.
fn is_felt_hex(value: &str) -> bool {
	match value.strip_prefix("0x") {
		Some(digits) => {
			!digits.is_empty()
				&& digits.len() <= 64
				&& digits.chars().all(|c| c.is_ascii_hexdigit())
		},
		None => false,
	}
}

impl Config {
	/// Validates the configuration beyond what serde enforces.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.chain.rpc_url.is_empty() {
			return Err(ConfigError::Validation("chain.rpc_url is empty".into()));
		}
		if !self.chain.rpc_url.starts_with("http://") && !self.chain.rpc_url.starts_with("https://")
		{
			return Err(ConfigError::Validation(format!(
				"chain.rpc_url must be an http(s) URL, got '{}'",
				self.chain.rpc_url
			)));
		}
		for (name, value) in [
			("contracts.token", &self.contracts.token),
			("contracts.bridge", &self.contracts.bridge),
			("account.address", &self.account.address),
		] {
			if !is_felt_hex(value) {
				return Err(ConfigError::Validation(format!(
					"{} must be a 0x-prefixed hex address, got '{}'",
					name, value
				)));
			}
		}
		if self.account.private_key.is_empty() {
			return Err(ConfigError::Validation("account.private_key is empty".into()));
		}
		Uint256Limbs::from_decimal(&self.transfer.amount).map_err(|e| {
			ConfigError::Validation(format!("transfer.amount is invalid: {}", e))
		})?;
		if self.api.host.is_empty() {
			return Err(ConfigError::Validation("api.host is empty".into()));
		}
		Ok(())
	}

	/// Loads and validates configuration from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path)?;
		content.parse()
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
