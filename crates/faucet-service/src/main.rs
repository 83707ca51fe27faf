//! Main entry point for the faucet service.
//!
//! This binary wires the concrete implementations together: a JSON-RPC
//! provider and a local-key signing account feed the chain service, the
//! engine sequences the user-facing operations, and an HTTP server
//! exposes them. Configuration is loaded once at startup and any missing
//! or malformed value aborts the process.

use clap::Parser;
use faucet_account::implementations::local::LocalAccount;
use faucet_account::AccountService;
use faucet_chain::implementations::jsonrpc::JsonRpcProvider;
use faucet_chain::ChainService;
use faucet_config::Config;
use faucet_core::FaucetEngine;
use faucet_types::Uint256Limbs;
use starknet::core::types::Felt;
use std::path::PathBuf;
use std::sync::Arc;

mod server;

/// Command-line arguments for the faucet service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the faucet service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads and validates configuration
/// 4. Connects the signing account and provider
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started faucet");

	let config = Config::from_file(&args.config)?;
	tracing::info!(
		token = %config.contracts.token,
		bridge = %config.contracts.bridge,
		"Loaded configuration"
	);

	let engine = build_engine(&config).await?;

	server::start_server(&config.api, engine).await?;

	tracing::info!("Stopped faucet");
	Ok(())
}

/// Builds the engine with the concrete provider and account implementations.
async fn build_engine(config: &Config) -> Result<Arc<FaucetEngine>, Box<dyn std::error::Error>> {
	let token = Felt::from_hex(&config.contracts.token)
		.map_err(|e| format!("invalid token address: {}", e))?;
	let bridge = Felt::from_hex(&config.contracts.bridge)
		.map_err(|e| format!("invalid bridge address: {}", e))?;
	let amount = Uint256Limbs::from_decimal(&config.transfer.amount)?;

	let account = LocalAccount::connect(
		&config.chain.rpc_url,
		&config.account.address,
		&config.account.private_key,
	)
	.await?;
	let account = Arc::new(AccountService::new(Box::new(account)));

	let provider = JsonRpcProvider::new(&config.chain.rpc_url)?;

	let chain = Arc::new(ChainService::new(
		Box::new(provider),
		account,
		token,
		bridge,
		amount,
	));

	Ok(Arc::new(FaucetEngine::new(chain, &config.transfer)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn args_default_values() {
		let args = Args::parse_from(["faucet"]);
		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn args_custom_values() {
		let args =
			Args::parse_from(["faucet", "--config", "custom.toml", "--log-level", "debug"]);
		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
	}
}
