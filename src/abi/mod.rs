//! Token Contract ABI Encoding Module
//!
//! Encodes calls against the fixed token contract interface into the
//! Ethereum contract-call convention: a 4-byte selector (Keccak-256 of the
//! canonical function signature) followed by 32-byte argument words, with
//! dynamic arrays encoded as offset + length + elements.
//!
//! The interface is versioned with the contract deployment; the function
//! set here must match the deployed token contract exactly.

use anyhow::{anyhow, Result};
use ethereum_types::{Address, U256};
use sha3::{Digest, Keccak256};

/// Size of one ABI argument word in bytes.
const WORD: usize = 32;

/// Computes the 4-byte function selector for a canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let mut hasher = Keccak256::new();
    hasher.update(signature.as_bytes());
    let hash = hasher.finalize();
    [hash[0], hash[1], hash[2], hash[3]]
}

fn push_uint(out: &mut Vec<u8>, value: U256) {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    out.extend_from_slice(&word);
}

fn push_address(out: &mut Vec<u8>, address: Address) {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    out.extend_from_slice(&word);
}

fn push_address_array(out: &mut Vec<u8>, addresses: &[Address]) {
    push_uint(out, U256::from(addresses.len()));
    for address in addresses {
        push_address(out, *address);
    }
}

/// Encodes `transfer(address,uint256)`.
pub fn transfer(to: Address, amount: U256) -> Vec<u8> {
    let mut out = selector("transfer(address,uint256)").to_vec();
    push_address(&mut out, to);
    push_uint(&mut out, amount);
    out
}

/// Encodes `issue(uint256)`.
pub fn issue(amount: U256) -> Vec<u8> {
    let mut out = selector("issue(uint256)").to_vec();
    push_uint(&mut out, amount);
    out
}

/// Encodes `redeem(uint256)`.
pub fn redeem(amount: U256) -> Vec<u8> {
    let mut out = selector("redeem(uint256)").to_vec();
    push_uint(&mut out, amount);
    out
}

/// Encodes `balanceOf(address)` for read-only balance queries.
pub fn balance_of(owner: Address) -> Vec<u8> {
    let mut out = selector("balanceOf(address)").to_vec();
    push_address(&mut out, owner);
    out
}

/// Encodes `batchTransfer(address[],uint256)`: one amount applied to every
/// recipient.
///
/// Head layout: offset to the recipient array (0x40), then the amount word.
/// Tail: array length followed by the recipient words.
pub fn batch_transfer(tos: &[Address], amount: U256) -> Vec<u8> {
    let mut out = selector("batchTransfer(address[],uint256)").to_vec();
    push_uint(&mut out, U256::from(2 * WORD));
    push_uint(&mut out, amount);
    push_address_array(&mut out, tos);
    out
}

/// Encodes `batchTransfers(address[],uint256[])` with per-recipient amounts.
///
/// Head layout: offsets to both dynamic arrays; the second offset skips the
/// first array's length word and elements.
pub fn batch_transfers(tos: &[Address], amounts: &[U256]) -> Vec<u8> {
    let mut out = selector("batchTransfers(address[],uint256[])").to_vec();
    push_uint(&mut out, U256::from(2 * WORD));
    push_uint(&mut out, U256::from(2 * WORD + (1 + tos.len()) * WORD));
    push_address_array(&mut out, tos);
    push_uint(&mut out, U256::from(amounts.len()));
    for amount in amounts {
        push_uint(&mut out, *amount);
    }
    out
}

/// Decodes a single uint256 return word from a hex-encoded contract call
/// result. An optional `0x` prefix is accepted; an empty result decodes to
/// zero.
pub fn decode_uint(ret: &str) -> Result<U256> {
    let ret = ret.strip_prefix("0x").unwrap_or(ret);
    if ret.is_empty() {
        return Ok(U256::zero());
    }

    let bytes = hex::decode(ret).map_err(|e| anyhow!("invalid contract return hex: {}", e))?;
    if bytes.len() > WORD {
        return Ok(U256::from_big_endian(&bytes[..WORD]));
    }
    Ok(U256::from_big_endian(&bytes))
}
