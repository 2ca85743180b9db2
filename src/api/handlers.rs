//! API endpoint handlers
//!
//! Each handler validates its request, prepares the transaction parameters,
//! delegates to the node client, and wraps the outcome in the uniform
//! response envelope. Parameter errors are produced before any downstream
//! call; node failures come back as system errors.

use std::sync::Arc;

use ethereum_types::U256;
use warp::{Rejection, Reply};

use crate::abi;
use crate::api::{respond, GatewayState};
use crate::crypto::{is_valid_address, KeyPair};
use crate::error::GatewayError;
use crate::tx::{
    parse_address, SignedEvmTx, TxEnvelope, BATCH_GAS_PER_RECIPIENT, DEFAULT_GAS_PRICE,
    MODE_COMMIT, NATIVE_TRANSFER_GAS_LIMIT, TOKEN_CALL_GAS_LIMIT,
};

use super::requests::*;

/// Reconstructs the sender keypair from a request private key.
///
/// Bad key material is caller input, so it maps to a parameter error.
fn sender_keys(pri_key: &str) -> Result<KeyPair, GatewayError> {
    KeyPair::from_private_hex(pri_key)
        .map_err(|e| GatewayError::param(format!("invalid private key: {}", e)))
}

fn build_result(tx: TxEnvelope) -> BuildTxResult {
    BuildTxResult {
        hash: tx.hash(),
        signed_evm_tx: tx.to_wire(),
    }
}

// ============================================================================
// KEY AND QUERY ENDPOINTS
// ============================================================================

/// Handler for GET /v1/genkey: a fresh account keypair.
pub async fn gen_key() -> Result<impl Reply, Rejection> {
    let key = KeyPair::generate().export();
    Ok(respond(Ok(GenKeyResult {
        pub_key: key.pub_key,
        address: key.address,
        pri_key: key.pri_key,
    })))
}

/// Handler for GET /v1/validaddress.
///
/// An empty address answers `false` with a success code instead of a
/// parameter error; wallets probe this endpoint with blank input.
pub async fn valid_address(query: AddressQuery) -> Result<impl Reply, Rejection> {
    if query.address.is_empty() {
        return Ok(respond(Ok(false)));
    }
    Ok(respond(Ok(is_valid_address(&query.address))))
}

/// Handler for GET /v1/olobalance.
pub async fn olo_balance(
    query: AddressQuery,
    state: Arc<GatewayState>,
) -> Result<impl Reply, Rejection> {
    let result = async {
        if query.address.is_empty() {
            return Err(GatewayError::param("address is nil"));
        }
        let balance = state.node.get_balance(&query.address).await?;
        Ok(BalanceResult {
            balance: balance.to_string(),
        })
    }
    .await;
    Ok(respond(result))
}

/// Handler for GET /v1/tokenbalance.
///
/// Runs `balanceOf` as a signed read-only contract call using the gateway's
/// ephemeral query keypair.
pub async fn token_balance(
    query: TokenBalanceQuery,
    state: Arc<GatewayState>,
) -> Result<impl Reply, Rejection> {
    let result = async {
        if query.address.is_empty() || query.token.is_empty() {
            return Err(GatewayError::param("address or token is nil"));
        }
        let token = parse_address(&query.token)?;
        let owner = parse_address(&query.address)?;
        let balance = state
            .node
            .token_balance(&state.query_keys, token, owner)
            .await?;
        Ok(BalanceResult {
            balance: balance.to_string(),
        })
    }
    .await;
    Ok(respond(result))
}

// ============================================================================
// TRANSACTION BUILD ENDPOINTS
// ============================================================================

/// Handler for POST /v1/buildolotx: native OLO transfer.
pub async fn build_olo_tx(
    req: BuildOloTxRequest,
    state: Arc<GatewayState>,
) -> Result<impl Reply, Rejection> {
    let result = async {
        req.validate()?;
        let keys = sender_keys(&req.pri_key)?;
        let to = parse_address(&req.to)?;
        let value = check_amount(&req.value)?;

        let tx = state
            .node
            .build_evm_tx(
                &keys,
                MODE_COMMIT,
                to,
                value,
                Vec::new(),
                NATIVE_TRANSFER_GAS_LIMIT,
                DEFAULT_GAS_PRICE,
                "",
            )
            .await?;
        Ok(build_result(tx))
    }
    .await;
    Ok(respond(result))
}

/// Builds a token contract call transaction: recipient is the token
/// contract, native value is zero, the call data is the payload.
async fn build_token_call(
    state: &GatewayState,
    keys: &KeyPair,
    token: &str,
    load: Vec<u8>,
    gas_limit: u64,
) -> Result<BuildTxResult, GatewayError> {
    let token = parse_address(token)?;
    let tx = state
        .node
        .build_evm_tx(
            keys,
            MODE_COMMIT,
            token,
            U256::zero(),
            load,
            gas_limit,
            DEFAULT_GAS_PRICE,
            "",
        )
        .await?;
    Ok(build_result(tx))
}

/// Handler for POST /v1/buildtokentx: token transfer.
pub async fn build_token_tx(
    req: BuildTokenTxRequest,
    state: Arc<GatewayState>,
) -> Result<impl Reply, Rejection> {
    let result = async {
        req.validate()?;
        let keys = sender_keys(&req.pri_key)?;
        let to = parse_address(&req.to)?;
        let value = check_amount(&req.value)?;
        let load = abi::transfer(to, value);
        build_token_call(&state, &keys, &req.token, load, TOKEN_CALL_GAS_LIMIT).await
    }
    .await;
    Ok(respond(result))
}

/// Handler for POST /v1/buildtokenissuetx: token supply issuance.
pub async fn build_token_issue_tx(
    req: BuildTokenIssueTxRequest,
    state: Arc<GatewayState>,
) -> Result<impl Reply, Rejection> {
    let result = async {
        req.validate()?;
        let keys = sender_keys(&req.pri_key)?;
        let value = check_amount(&req.value)?;
        let load = abi::issue(value);
        build_token_call(&state, &keys, &req.token, load, TOKEN_CALL_GAS_LIMIT).await
    }
    .await;
    Ok(respond(result))
}

/// Handler for POST /v1/buildtokenredeemtx: token supply redemption.
pub async fn build_token_redeem_tx(
    req: BuildTokenIssueTxRequest,
    state: Arc<GatewayState>,
) -> Result<impl Reply, Rejection> {
    let result = async {
        req.validate()?;
        let keys = sender_keys(&req.pri_key)?;
        let value = check_amount(&req.value)?;
        let load = abi::redeem(value);
        build_token_call(&state, &keys, &req.token, load, TOKEN_CALL_GAS_LIMIT).await
    }
    .await;
    Ok(respond(result))
}

/// Handler for POST /v1/buildtokenbatchtx: uniform-amount batch transfer.
///
/// The single amount is applied to every recipient; the gas limit scales
/// with the recipient count.
pub async fn build_token_batch_tx(
    req: BuildTokenBatchTxRequest,
    state: Arc<GatewayState>,
) -> Result<impl Reply, Rejection> {
    let result = async {
        req.validate()?;
        let keys = sender_keys(&req.pri_key)?;
        let value = check_amount(&req.value)?;
        let tos = req
            .tos
            .iter()
            .map(|to| parse_address(to))
            .collect::<Result<Vec<_>, _>>()?;

        let gas_limit = BATCH_GAS_PER_RECIPIENT * req.tos.len() as u64;
        let load = abi::batch_transfer(&tos, value);
        build_token_call(&state, &keys, &req.token, load, gas_limit).await
    }
    .await;
    Ok(respond(result))
}

/// Handler for POST /v1/buildtokenbatchtxs: variable-amount batch transfer.
pub async fn build_token_batch_txs(
    req: BuildTokenBatchTxsRequest,
    state: Arc<GatewayState>,
) -> Result<impl Reply, Rejection> {
    let result = async {
        req.validate()?;
        let keys = sender_keys(&req.pri_key)?;

        let mut tos = Vec::with_capacity(req.tos.len());
        let mut values = Vec::with_capacity(req.tos.len());
        for pair in &req.tos {
            tos.push(parse_address(&pair.to)?);
            values.push(check_amount(&pair.value)?);
        }

        let gas_limit = BATCH_GAS_PER_RECIPIENT * req.tos.len() as u64;
        let load = abi::batch_transfers(&tos, &values);
        build_token_call(&state, &keys, &req.token, load, gas_limit).await
    }
    .await;
    Ok(respond(result))
}

// ============================================================================
// BROADCAST AND STATUS ENDPOINTS
// ============================================================================

/// Handler for POST /v1/sendtx: broadcast a signed transaction.
///
/// The wire envelope is decoded strictly before broadcast; malformed
/// caller fields are parameter errors.
pub async fn send_tx(
    wire: SignedEvmTx,
    state: Arc<GatewayState>,
) -> Result<impl Reply, Rejection> {
    let result = async {
        let tx = TxEnvelope::from_wire(&wire)?;
        state.node.send_tx(&tx).await?;
        Ok("ok")
    }
    .await;
    Ok(respond(result))
}

/// Handler for GET /v1/checktx: has the transaction been committed
/// successfully?
pub async fn check_tx(
    query: HashQuery,
    state: Arc<GatewayState>,
) -> Result<impl Reply, Rejection> {
    let result = async {
        if query.hash.is_empty() {
            return Err(GatewayError::param("hash is nil"));
        }
        let status = state.node.get_transaction(&query.hash).await?;
        Ok(matches!(status, Some(tx) if tx.code == 0))
    }
    .await;
    Ok(respond(result))
}
