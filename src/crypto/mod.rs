//! Key Management and Signing Module
//!
//! This module handles the cryptographic operations the gateway performs
//! locally: secp256k1 keypair generation, compressed public key derivation
//! from a caller-supplied private key, address derivation, and ECDSA
//! signing of transaction digests with a recovery id.
//!
//! ## Security Requirements
//!
//! Private keys arrive in request payloads and live only for the duration of
//! a single request. They must never be logged.

use anyhow::{anyhow, Result};
use k256::ecdsa::{
    Signature as EcdsaSignature, SigningKey as EcdsaSigningKey, VerifyingKey as EcdsaVerifyingKey,
};
use rand::rngs::OsRng;
use sha3::{Digest, Keccak256};

/// Length of a compressed secp256k1 public key in bytes.
pub const COMPRESSED_PUBKEY_LEN: usize = 33;

/// A freshly generated account, as exposed by the genkey endpoint.
#[derive(Debug, Clone)]
pub struct GeneratedKey {
    /// Compressed public key, hex encoded
    pub pub_key: String,
    /// Account address, 0x-prefixed hex
    pub address: String,
    /// Private key, hex encoded
    pub pri_key: String,
}

/// A secp256k1 keypair used to assemble and sign transactions.
pub struct KeyPair {
    signing_key: EcdsaSigningKey,
}

impl KeyPair {
    /// Generates a fresh keypair from the OS entropy source.
    pub fn generate() -> Self {
        Self {
            signing_key: EcdsaSigningKey::random(&mut OsRng),
        }
    }

    /// Reconstructs a keypair from a hex-encoded 32-byte private key.
    ///
    /// An optional `0x` prefix is accepted and stripped. Invalid hex or an
    /// out-of-range scalar is an error; the caller decides the error class.
    pub fn from_private_hex(pri_key: &str) -> Result<Self> {
        let pri_key = pri_key.strip_prefix("0x").unwrap_or(pri_key);
        let bytes = hex::decode(pri_key).map_err(|e| anyhow!("invalid private key hex: {}", e))?;

        let secret: [u8; 32] = bytes
            .try_into()
            .map_err(|_| anyhow!("private key must be 32 bytes"))?;

        let signing_key = EcdsaSigningKey::from_bytes(&secret.into())
            .map_err(|e| anyhow!("invalid private key scalar: {}", e))?;

        Ok(Self { signing_key })
    }

    /// The private key as bare hex.
    pub fn private_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// The compressed public key bytes (33 bytes, SEC1).
    pub fn public_key(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    /// The compressed public key as bare hex.
    pub fn public_hex(&self) -> String {
        hex::encode(self.public_key())
    }

    /// Derives the account address from the public key.
    ///
    /// The address is the last 20 bytes of the Keccak-256 hash of the
    /// uncompressed public key coordinates (the 0x04 tag byte is skipped).
    pub fn address(&self) -> String {
        let point = self.signing_key.verifying_key().to_encoded_point(false);
        let bytes = point.as_bytes();

        let mut hasher = Keccak256::new();
        hasher.update(&bytes[1..]);
        let hash = hasher.finalize();

        format!("0x{}", hex::encode(&hash[12..32]))
    }

    /// Exports the keypair as a genkey result.
    pub fn export(&self) -> GeneratedKey {
        GeneratedKey {
            pub_key: self.public_hex(),
            address: self.address(),
            pri_key: self.private_hex(),
        }
    }

    /// Signs a precomputed 32-byte digest.
    ///
    /// Returns the 65-byte `r || s || v` signature, with the recovery id in
    /// Ethereum form (27 or 28). The recovery id is found by probing which
    /// of the two candidates recovers this keypair's public key.
    pub fn sign_prehash(&self, digest: &[u8; 32]) -> Result<Vec<u8>> {
        use k256::ecdsa::signature::hazmat::PrehashSigner;

        let signature: EcdsaSignature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| anyhow!("failed to sign digest: {}", e))?;

        let sig_bytes = signature.to_bytes();
        if sig_bytes.len() != 64 {
            return Err(anyhow!(
                "invalid signature length: expected 64 bytes, got {}",
                sig_bytes.len()
            ));
        }

        let expected_point = self.signing_key.verifying_key().to_encoded_point(false);
        let recovery_id_0 = k256::ecdsa::RecoveryId::try_from(0u8).expect("recovery id 0 is valid");
        let recovery_id = match EcdsaVerifyingKey::recover_from_prehash(digest, &signature, recovery_id_0) {
            Ok(recovered) if recovered.to_encoded_point(false) == expected_point => 0u8,
            _ => 1u8,
        };

        let mut out = Vec::with_capacity(65);
        out.extend_from_slice(&sig_bytes);
        out.push(recovery_id + 27);
        Ok(out)
    }
}

/// Syntactic address validity: an optional `0x` prefix followed by exactly
/// 40 hex digits.
pub fn is_valid_address(address: &str) -> bool {
    let address = address.strip_prefix("0x").unwrap_or(address);
    address.len() == 40 && address.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Private key 0x...01 corresponds to the secp256k1 generator point.
    const ONE_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000001";
    const ONE_PUBKEY: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const ONE_ADDRESS: &str = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf";

    #[test]
    fn derives_generator_point_for_key_one() {
        let keys = KeyPair::from_private_hex(ONE_KEY).unwrap();
        assert_eq!(keys.public_hex(), ONE_PUBKEY);
        assert_eq!(keys.address(), ONE_ADDRESS);
    }

    #[test]
    fn accepts_0x_prefixed_private_key() {
        let keys = KeyPair::from_private_hex(&format!("0x{}", ONE_KEY)).unwrap();
        assert_eq!(keys.address(), ONE_ADDRESS);
    }

    #[test]
    fn rejects_malformed_private_keys() {
        assert!(KeyPair::from_private_hex("").is_err());
        assert!(KeyPair::from_private_hex("zz").is_err());
        assert!(KeyPair::from_private_hex("abcd").is_err());
        // All-zero scalar is outside the valid range.
        assert!(KeyPair::from_private_hex(&"00".repeat(32)).is_err());
    }

    #[test]
    fn generated_keys_round_trip() {
        let keys = KeyPair::generate();
        let restored = KeyPair::from_private_hex(&keys.private_hex()).unwrap();
        assert_eq!(keys.public_hex(), restored.public_hex());
        assert_eq!(keys.address(), restored.address());
    }

    #[test]
    fn signature_is_65_bytes_with_ethereum_recovery_id() {
        let keys = KeyPair::from_private_hex(ONE_KEY).unwrap();
        let digest = [7u8; 32];
        let sig = keys.sign_prehash(&digest).unwrap();
        assert_eq!(sig.len(), 65);
        assert!(sig[64] == 27 || sig[64] == 28);
    }

    #[test]
    fn address_validity_checks() {
        assert!(is_valid_address(ONE_ADDRESS));
        assert!(is_valid_address(ONE_ADDRESS.strip_prefix("0x").unwrap()));
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("0x1234"));
        assert!(!is_valid_address(&format!("{}00", ONE_ADDRESS)));
        assert!(!is_valid_address("0xzz5f4552091a69125d5dfcb7b8c2659029395bdf"));
    }
}
