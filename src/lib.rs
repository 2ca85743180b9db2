//! OLO Wallet Gateway Library
//!
//! This crate provides a thin HTTP gateway over the OLO chain node:
//! request validation, transaction assembly and signing, token contract
//! ABI encoding, and wire-format translation of the transaction envelope.

pub mod abi;
pub mod api;
pub mod config;
pub mod crypto;
pub mod error;
pub mod node;
pub mod tx;

// Re-export commonly used types
pub use api::{ApiServer, GatewayState, RespBody};
pub use config::{ApiConfig, Config, LimiterConfig, NodeConfig};
pub use crypto::KeyPair;
pub use error::GatewayError;
pub use node::NodeClient;
pub use tx::{SignedEvmTx, SignedEvmTxBody, TxBody, TxEnvelope};
