//! Node API Client
//!
//! HTTP client for the downstream chain node. The node owns consensus,
//! nonce accounting, and transaction execution; this client covers the
//! narrow surface the gateway needs: account lookup, signed read-only
//! contract queries, transaction assembly and signing, broadcast, and
//! transaction status lookup.
//!
//! Every node response arrives in the node's `{code, message, result}`
//! envelope; a non-zero node code is surfaced as an error with the node's
//! message attached.

use anyhow::{anyhow, Context, Result};
use ethereum_types::{Address, U256};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use crate::abi;
use crate::config::NodeConfig;
use crate::crypto::KeyPair;
use crate::tx::{parse_dec, SignedEvmTx, TxBody, TxEnvelope, TOKEN_CALL_GAS_LIMIT};

/// Node response envelope.
#[derive(Debug, Deserialize)]
struct NodeResponse<T> {
    code: i64,
    #[serde(default)]
    message: String,
    result: Option<T>,
}

impl<T> NodeResponse<T> {
    /// Unwraps the envelope, mapping a non-zero node code to an error.
    fn into_result(self, what: &str) -> Result<Option<T>> {
        if self.code != 0 {
            return Err(anyhow!("node error on {}: {} ({})", what, self.message, self.code));
        }
        Ok(self.result)
    }
}

/// Account state as reported by the node.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    /// Account address, 0x-prefixed hex
    pub address: String,
    /// Native balance, decimal string
    pub balance: String,
    /// Last used transaction nonce
    pub nonce: u64,
}

/// Broadcast request body.
#[derive(Debug, Serialize)]
struct BroadcastRequest<'a> {
    mode: u32,
    tx: &'a SignedEvmTx,
}

/// Read-only contract query request body.
#[derive(Debug, Serialize)]
struct ContractQueryRequest<'a> {
    tx: &'a SignedEvmTx,
}

/// Read-only contract query result.
#[derive(Debug, Deserialize)]
struct ContractQueryResult {
    /// ABI-encoded return data, hex
    ret: String,
}

/// Committed transaction status as reported by the node.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionStatus {
    pub hash: String,
    /// Execution result code; 0 means success
    pub code: i64,
    #[serde(default)]
    pub height: u64,
}

/// Client for the downstream node HTTP API.
pub struct NodeClient {
    client: Client,
    base_url: String,
}

impl NodeClient {
    /// Creates a new node client from configuration.
    pub fn new(config: &NodeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches account state for an address.
    ///
    /// An account unknown to the chain yields a zero balance and zero nonce
    /// rather than an error.
    pub async fn get_account(&self, address: &str) -> Result<AccountInfo> {
        let url = format!("{}/v1/account", self.base_url);

        let response: NodeResponse<AccountInfo> = self
            .client
            .get(&url)
            .query(&[("address", address)])
            .send()
            .await
            .context("Failed to send account request")?
            .json()
            .await
            .context("Failed to parse account response")?;

        Ok(response.into_result("account query")?.unwrap_or(AccountInfo {
            address: address.to_string(),
            balance: "0".to_string(),
            nonce: 0,
        }))
    }

    /// Fetches the native OLO balance of an address.
    pub async fn get_balance(&self, address: &str) -> Result<U256> {
        let account = self.get_account(address).await?;
        parse_dec("balance", &account.balance)
            .map_err(|_| anyhow!("node returned malformed balance: {}", account.balance))
    }

    /// Assembles and signs a transaction envelope.
    ///
    /// Fetches the sender's last used nonce from the node and signs with the
    /// next one; the gas price hint is a decimal string, usually "1". The
    /// returned envelope is fully signed and ready to broadcast.
    #[allow(clippy::too_many_arguments)]
    pub async fn build_evm_tx(
        &self,
        keys: &KeyPair,
        mode: u32,
        to: Address,
        value: U256,
        load: Vec<u8>,
        gas_limit: u64,
        gas_price_hint: &str,
        memo: &str,
    ) -> Result<TxEnvelope> {
        let gas_price =
            parse_dec("gasPrice", gas_price_hint).map_err(|e| anyhow!(e.to_string()))?;
        let account = self.get_account(&keys.address()).await?;

        let mut tx = TxEnvelope {
            mode,
            created_at: chrono::Utc::now()
                .timestamp_nanos_opt()
                .unwrap_or_default() as u64,
            gas_limit,
            gas_price,
            nonce: account.nonce + 1,
            sender: keys.public_key(),
            body: TxBody {
                to,
                value,
                load,
                memo: memo.as_bytes().to_vec(),
            },
            signature: Vec::new(),
        };
        tx.signature = keys.sign_prehash(&tx.sighash())?;

        Ok(tx)
    }

    /// Executes a signed read-only contract call and returns the raw
    /// ABI-encoded return data (hex).
    async fn read_contract(&self, tx: &TxEnvelope) -> Result<String> {
        let url = format!("{}/v1/contract/query", self.base_url);
        let wire = tx.to_wire();

        let response: NodeResponse<ContractQueryResult> = self
            .client
            .post(&url)
            .json(&ContractQueryRequest { tx: &wire })
            .send()
            .await
            .context("Failed to send contract query request")?
            .json()
            .await
            .context("Failed to parse contract query response")?;

        Ok(response
            .into_result("contract query")?
            .map(|r| r.ret)
            .unwrap_or_default())
    }

    /// Queries a token balance through the contract's `balanceOf`.
    ///
    /// The query runs as a signed read-only call; `keys` is the caller
    /// identity, normally the gateway's ephemeral query keypair.
    pub async fn token_balance(
        &self,
        keys: &KeyPair,
        token: Address,
        owner: Address,
    ) -> Result<U256> {
        let load = abi::balance_of(owner);
        let tx = self
            .build_evm_tx(keys, 0, token, U256::zero(), load, TOKEN_CALL_GAS_LIMIT, "1", "")
            .await?;

        let ret = self.read_contract(&tx).await?;
        abi::decode_uint(&ret)
    }

    /// Broadcasts a signed transaction.
    pub async fn send_tx(&self, tx: &TxEnvelope) -> Result<()> {
        let url = format!("{}/v1/transaction", self.base_url);
        let wire = tx.to_wire();

        let response: NodeResponse<serde_json::Value> = self
            .client
            .post(&url)
            .json(&BroadcastRequest {
                mode: tx.mode,
                tx: &wire,
            })
            .send()
            .await
            .context("Failed to send broadcast request")?
            .json()
            .await
            .context("Failed to parse broadcast response")?;

        response.into_result("broadcast")?;
        info!("Broadcast transaction {}", tx.hash());
        Ok(())
    }

    /// Looks up a committed transaction by hash.
    ///
    /// Returns `None` when the node has no record of the hash.
    pub async fn get_transaction(&self, hash: &str) -> Result<Option<TransactionStatus>> {
        let url = format!("{}/v1/transaction", self.base_url);

        let response: NodeResponse<TransactionStatus> = self
            .client
            .get(&url)
            .query(&[("hash", hash)])
            .send()
            .await
            .context("Failed to send transaction lookup request")?
            .json()
            .await
            .context("Failed to parse transaction lookup response")?;

        response.into_result("transaction lookup")
    }
}
