//! EIP-712 typed-data digests for meta-transaction registration.
//!
//! A registrant signs this digest off-chain; a relayer then submits
//! `setStealthKeysOnBehalf` carrying the signature. Signature verification
//! is the contract's job — this module's responsibility is constructing the
//! digest bit-for-bit as the contract does.

use cloak_core::abi::{keccak256, word_from_address, word_from_u64, Word};
use cloak_core::constants::{REGISTRY_EIP712_NAME, REGISTRY_EIP712_VERSION};
use cloak_core::error::{CloakError, Result};
use cloak_core::types::EthAddress;

use crate::encoding::RegisteredKeys;

/// Canonical EIP-712 domain type string.
pub const EIP712_DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// The registry's struct type string.
pub const STEALTH_KEYS_TYPE: &str = "StealthKeys(uint256 spendingPubKeyPrefix,\
uint256 spendingPubKey,uint256 viewingPubKeyPrefix,uint256 viewingPubKey)";

/// An EIP-712 signing domain.
#[derive(Clone, Debug)]
pub struct Eip712Domain {
    /// Domain name.
    pub name: String,
    /// Domain version.
    pub version: String,
    /// Chain id.
    pub chain_id: u64,
    /// The verifying contract address.
    pub verifying_contract: EthAddress,
}

impl Eip712Domain {
    /// The stealth key registry's domain on the given chain.
    pub fn registry(chain_id: u64, verifying_contract: EthAddress) -> Self {
        Self {
            name: REGISTRY_EIP712_NAME.into(),
            version: REGISTRY_EIP712_VERSION.into(),
            chain_id,
            verifying_contract,
        }
    }

    /// Computes the domain separator.
    pub fn separator(&self) -> Word {
        let mut encoded = Vec::with_capacity(5 * 32);
        encoded.extend_from_slice(&keccak256(EIP712_DOMAIN_TYPE.as_bytes()));
        encoded.extend_from_slice(&keccak256(self.name.as_bytes()));
        encoded.extend_from_slice(&keccak256(self.version.as_bytes()));
        encoded.extend_from_slice(&word_from_u64(self.chain_id));
        encoded.extend_from_slice(&word_from_address(&self.verifying_contract));
        keccak256(&encoded)
    }
}

/// Computes the digest a registrant signs to authorize a third-party
/// registration: `keccak256(0x19 0x01 || domainSeparator || structHash)`.
pub fn registration_digest(domain: &Eip712Domain, keys: &RegisteredKeys) -> Word {
    let mut struct_encoded = Vec::with_capacity(5 * 32);
    struct_encoded.extend_from_slice(&keccak256(STEALTH_KEYS_TYPE.as_bytes()));
    for word in keys.to_words() {
        struct_encoded.extend_from_slice(&word);
    }
    let struct_hash = keccak256(&struct_encoded);

    let mut preimage = Vec::with_capacity(2 + 2 * 32);
    preimage.extend_from_slice(&[0x19, 0x01]);
    preimage.extend_from_slice(&domain.separator());
    preimage.extend_from_slice(&struct_hash);
    keccak256(&preimage)
}

/// A secp256k1 signature in the (v, r, s) form the contract consumes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Eip712Signature {
    /// Recovery value (27 or 28).
    pub v: u8,
    /// Signature r.
    pub r: [u8; 32],
    /// Signature s.
    pub s: [u8; 32],
}

impl Eip712Signature {
    /// Parses a 65-byte `r || s || v` signature from `0x`-prefixed hex.
    pub fn from_hex(signature: &str) -> Result<Self> {
        if !signature.starts_with("0x") || signature.len() != 132 {
            return Err(CloakError::InvalidKeyFormat(
                "signature must be 0x plus 130 hex digits".into(),
            ));
        }
        let bytes = hex::decode(&signature[2..])
            .map_err(|e| CloakError::InvalidKeyFormat(format!("signature is not hex: {e}")))?;
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { v: bytes[64], r, s })
    }
}
