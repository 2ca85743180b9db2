//! OLO Wallet Gateway
//!
//! A thin HTTP gateway exposing wallet and transaction-building operations
//! for the OLO chain: key generation, balance lookup, transfer/issue/redeem
//! transaction construction and signing, broadcast, and confirmation check.
//! Consensus and execution live in the downstream node.

use anyhow::Result;
use tracing::info;

use olo_gateway::api::ApiServer;
use olo_gateway::config::Config;
use olo_gateway::crypto::KeyPair;
use olo_gateway::node::NodeClient;

/// Main application entry point.
///
/// This function:
/// 1. Initializes logging and tracing
/// 2. Loads configuration from TOML file
/// 3. Constructs the node client and the ephemeral query keypair
/// 4. Runs the API server until shutdown
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting OLO Wallet Gateway");

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("OLO Wallet Gateway");
        println!();
        println!("Usage: olo-gateway [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --config <path>   Use custom config file path");
        println!("  --help, -h        Show this help message");
        println!();
        println!("Environment variables:");
        println!("  OLO_GATEWAY_CONFIG_PATH    Path to config file (overrides --config)");
        return Ok(());
    }

    let mut i = 1; // Skip program name
    while i < args.len() {
        if args[i] == "--config" && i + 1 < args.len() {
            std::env::set_var("OLO_GATEWAY_CONFIG_PATH", &args[i + 1]);
            info!("Using custom config: {}", args[i + 1]);
            i += 1;
        }
        i += 1;
    }

    let config = Config::load()?;
    info!("Configuration loaded successfully");

    let node = NodeClient::new(&config.node)?;

    // Ephemeral identity for read-only token-balance queries; never signs a
    // transfer and is regenerated on every restart.
    let query_keys = KeyPair::generate();
    info!("Query keypair address: {}", query_keys.address());

    let server = ApiServer::new(config, node, query_keys);
    server.run().await
}
