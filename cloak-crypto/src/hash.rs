//! Hashing utilities.
//!
//! keccak256 lives in `cloak-core` next to the ABI layer that depends on it;
//! this module re-exports it and adds the SHA-256 and personal-message
//! digests the key protocol needs.

use sha2::{Digest, Sha256};

pub use cloak_core::abi::keccak256;

/// Computes SHA-256.
///
/// Used to hash ECDH shared-secret X coordinates and to derive deterministic
/// key pairs from wallet signatures.
pub fn sha256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// Computes the digest of an Ethereum personal message
/// (`"\x19Ethereum Signed Message:\n" || len || message`).
pub fn personal_message_digest(message: &[u8]) -> [u8; 32] {
    let mut preimage = Vec::with_capacity(32 + message.len());
    preimage.extend_from_slice(b"\x19Ethereum Signed Message:\n");
    preimage.extend_from_slice(message.len().to_string().as_bytes());
    preimage.extend_from_slice(message);
    keccak256(&preimage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_personal_message_digest_known_vector() {
        // keccak256("\x19Ethereum Signed Message:\n5hello") — the digest
        // eth_sign produces for the message "hello"
        assert_eq!(
            hex::encode(personal_message_digest(b"hello")),
            "50b2c43fd39106bafbba0da34fc430e1f91e3c96ea2acee2bc34119f92b37750"
        );
    }

    #[test]
    fn test_personal_message_digest_length_prefix() {
        // Distinct lengths must never collide through the prefix
        assert_ne!(
            personal_message_digest(b"aa"),
            personal_message_digest(b"a")
        );
    }
}
