//! Transaction Envelope Module
//!
//! Defines the transaction envelope in its two representations: the native
//! in-memory form used for assembly, signing, and hashing, and the
//! JSON-friendly wire form exposed over HTTP and accepted by the node API.
//! Translation between the two is bidirectional and lossless.
//!
//! Wire conventions follow the node's canonical encoding: large integers are
//! decimal strings, byte strings are hex (an optional `0x` prefix is
//! accepted and stripped on decode), addresses are `0x`-prefixed hex, and
//! the memo travels as a plain string.

use ethereum_types::{Address, U256};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::crypto::COMPRESSED_PUBKEY_LEN;
use crate::error::GatewayError;

/// Gas limit for a native OLO transfer.
pub const NATIVE_TRANSFER_GAS_LIMIT: u64 = 210_000;
/// Gas limit for a single token contract call (transfer, issue, redeem).
pub const TOKEN_CALL_GAS_LIMIT: u64 = 100_000_000;
/// Per-recipient gas cost for batch token transfers.
pub const BATCH_GAS_PER_RECIPIENT: u64 = 70_000;
/// Default gas price hint passed to the transaction builder.
pub const DEFAULT_GAS_PRICE: &str = "1";

/// Broadcast mode: wait for commit.
pub const MODE_COMMIT: u32 = 0;

/// Transaction payload: recipient, native value, contract call data, memo.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxBody {
    pub to: Address,
    pub value: U256,
    pub load: Vec<u8>,
    pub memo: Vec<u8>,
}

/// Native transaction envelope.
///
/// `sender` is the compressed secp256k1 public key (33 bytes); `signature`
/// is the 65-byte `r || s || v` signature over the signing digest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxEnvelope {
    /// Broadcast mode: 0 commit (default), 1 async, 2 sync
    pub mode: u32,
    /// Creation timestamp, unix nanoseconds
    pub created_at: u64,
    pub gas_limit: u64,
    pub gas_price: U256,
    pub nonce: u64,
    pub sender: Vec<u8>,
    pub body: TxBody,
    pub signature: Vec<u8>,
}

/// Wire form of a signed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SignedEvmTx {
    #[serde(default)]
    pub mode: u32,
    #[serde(rename = "createdAt")]
    pub created_at: u64,
    #[serde(rename = "gasLimit")]
    pub gas_limit: u64,
    #[serde(rename = "gasPrice")]
    pub gas_price: String,
    pub nonce: u64,
    pub sender: String,
    pub body: SignedEvmTxBody,
    pub signature: String,
}

/// Wire form of the transaction payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SignedEvmTxBody {
    pub to: String,
    pub value: String,
    pub load: String,
    pub memo: String,
}

/// Decodes a hex field, accepting and stripping an optional `0x` prefix.
pub fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, GatewayError> {
    let value = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(value).map_err(|e| GatewayError::param(format!("invalid {} hex: {}", field, e)))
}

/// Parses a base-10 unsigned integer wire field into a U256.
pub fn parse_dec(field: &str, value: &str) -> Result<U256, GatewayError> {
    U256::from_dec_str(value)
        .map_err(|_| GatewayError::param(format!("invalid {} integer: {}", field, value)))
}

/// Parses a `0x`-optional 40-hex-digit address.
pub fn parse_address(value: &str) -> Result<Address, GatewayError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    let bytes = hex::decode(stripped)
        .map_err(|_| GatewayError::param(format!("invalid address: {}", value)))?;
    if bytes.len() != 20 {
        return Err(GatewayError::param(format!("invalid address: {}", value)));
    }
    Ok(Address::from_slice(&bytes))
}

fn push_u256(buf: &mut Vec<u8>, value: U256) {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    buf.extend_from_slice(&word);
}

fn push_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u64).to_be_bytes());
    buf.extend_from_slice(bytes);
}

impl TxEnvelope {
    /// Canonical signing preimage: fixed big-endian scalars followed by
    /// length-prefixed variable fields. The mode is a transport hint and is
    /// not covered by the signature.
    pub fn signing_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128 + self.body.load.len() + self.body.memo.len());
        buf.extend_from_slice(&self.created_at.to_be_bytes());
        buf.extend_from_slice(&self.gas_limit.to_be_bytes());
        push_u256(&mut buf, self.gas_price);
        buf.extend_from_slice(&self.nonce.to_be_bytes());
        push_bytes(&mut buf, &self.sender);
        buf.extend_from_slice(self.body.to.as_bytes());
        push_u256(&mut buf, self.body.value);
        push_bytes(&mut buf, &self.body.load);
        push_bytes(&mut buf, &self.body.memo);
        buf
    }

    /// Keccak-256 digest the sender signs.
    pub fn sighash(&self) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update(self.signing_bytes());
        hasher.finalize().into()
    }

    /// Content-addressed transaction hash: Keccak-256 over the signing
    /// preimage and the signature, `0x`-prefixed hex.
    pub fn hash(&self) -> String {
        let mut hasher = Keccak256::new();
        hasher.update(self.signing_bytes());
        hasher.update(&self.signature);
        format!("0x{}", hex::encode(hasher.finalize()))
    }

    /// Translates the envelope into its wire form.
    pub fn to_wire(&self) -> SignedEvmTx {
        SignedEvmTx {
            mode: self.mode,
            created_at: self.created_at,
            gas_limit: self.gas_limit,
            gas_price: self.gas_price.to_string(),
            nonce: self.nonce,
            sender: hex::encode(&self.sender),
            body: SignedEvmTxBody {
                to: format!("0x{}", hex::encode(self.body.to.as_bytes())),
                value: self.body.value.to_string(),
                load: hex::encode(&self.body.load),
                memo: String::from_utf8_lossy(&self.body.memo).into_owned(),
            },
            signature: hex::encode(&self.signature),
        }
    }

    /// Reconstructs a native envelope from its wire form.
    ///
    /// Every field is decoded strictly; malformed hex, decimal, or length
    /// is a parameter error, never silently corrected.
    pub fn from_wire(wire: &SignedEvmTx) -> Result<Self, GatewayError> {
        let sender = decode_hex("sender", &wire.sender)?;
        if sender.len() != COMPRESSED_PUBKEY_LEN {
            return Err(GatewayError::param(format!(
                "invalid sender public key length: expected {} bytes, got {}",
                COMPRESSED_PUBKEY_LEN,
                sender.len()
            )));
        }

        Ok(Self {
            mode: wire.mode,
            created_at: wire.created_at,
            gas_limit: wire.gas_limit,
            gas_price: parse_dec("gasPrice", &wire.gas_price)?,
            nonce: wire.nonce,
            sender,
            body: TxBody {
                to: parse_address(&wire.body.to)?,
                value: parse_dec("value", &wire.body.value)?,
                load: decode_hex("load", &wire.body.load)?,
                memo: wire.body.memo.as_bytes().to_vec(),
            },
            signature: decode_hex("signature", &wire.signature)?,
        })
    }
}
