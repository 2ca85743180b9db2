//! Request and response payloads for the gateway API
//!
//! Every build request validates itself before any key material is touched
//! or any downstream call is made. Two failure messages are distinguished:
//! a missing identifier field ("got nil param" / "got nil to") and an
//! amount that does not parse as a base-10 unsigned integer ("value
//! error"). Amounts are bounded to the uint256 domain the contract ABI can
//! express.

use ethereum_types::U256;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::tx::SignedEvmTx;

/// Checks an amount field: base-10, non-negative, within uint256.
pub fn check_amount(value: &str) -> Result<U256, GatewayError> {
    U256::from_dec_str(value).map_err(|_| GatewayError::param("value error"))
}

fn nil_param() -> GatewayError {
    GatewayError::param("got nil param")
}

// ============================================================================
// QUERY PARAMETERS
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddressQuery {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenBalanceQuery {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct HashQuery {
    #[serde(default)]
    pub hash: String,
}

// ============================================================================
// BUILD REQUESTS
// ============================================================================

/// Native OLO transfer request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOloTxRequest {
    #[serde(rename = "priKey")]
    pub pri_key: String,
    pub to: String,
    pub value: String,
}

impl BuildOloTxRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.pri_key.is_empty() || self.to.is_empty() {
            return Err(nil_param());
        }
        check_amount(&self.value)?;
        Ok(())
    }
}

/// Token transfer request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildTokenTxRequest {
    #[serde(rename = "priKey")]
    pub pri_key: String,
    pub token: String,
    pub to: String,
    pub value: String,
}

impl BuildTokenTxRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.pri_key.is_empty() || self.token.is_empty() || self.to.is_empty() {
            return Err(nil_param());
        }
        check_amount(&self.value)?;
        Ok(())
    }
}

/// Token issue/redeem request; both operations take the same fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildTokenIssueTxRequest {
    #[serde(rename = "priKey")]
    pub pri_key: String,
    pub token: String,
    pub value: String,
}

impl BuildTokenIssueTxRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.pri_key.is_empty() || self.token.is_empty() {
            return Err(nil_param());
        }
        check_amount(&self.value)?;
        Ok(())
    }
}

/// Batch transfer with one uniform amount for every recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildTokenBatchTxRequest {
    #[serde(rename = "priKey")]
    pub pri_key: String,
    pub token: String,
    pub tos: Vec<String>,
    pub value: String,
}

impl BuildTokenBatchTxRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.pri_key.is_empty() || self.token.is_empty() {
            return Err(nil_param());
        }
        for to in &self.tos {
            if to.is_empty() {
                return Err(GatewayError::param("got nil to"));
            }
        }
        check_amount(&self.value)?;
        Ok(())
    }
}

/// One recipient/amount pair of a variable-amount batch transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecipient {
    pub to: String,
    pub value: String,
}

/// Batch transfer with a per-recipient amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildTokenBatchTxsRequest {
    #[serde(rename = "priKey")]
    pub pri_key: String,
    pub token: String,
    pub tos: Vec<BatchRecipient>,
}

impl BuildTokenBatchTxsRequest {
    /// Validates each recipient pair independently; the first failing pair
    /// aborts with its error.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.pri_key.is_empty() || self.token.is_empty() {
            return Err(nil_param());
        }
        for pair in &self.tos {
            if pair.to.is_empty() {
                return Err(GatewayError::param("got nil to"));
            }
            check_amount(&pair.value)?;
        }
        Ok(())
    }
}

// ============================================================================
// RESULTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenKeyResult {
    #[serde(rename = "pubKey")]
    pub pub_key: String,
    pub address: String,
    #[serde(rename = "priKey")]
    pub pri_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResult {
    pub balance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildTxResult {
    pub hash: String,
    #[serde(rename = "signedEvmTx")]
    pub signed_evm_tx: SignedEvmTx,
}
