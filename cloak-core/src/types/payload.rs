//! The encrypted payload a sender publishes on-chain.

use serde::{Deserialize, Serialize};

use crate::constants::{CIPHERTEXT_SIZE, COORDINATE_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE};
use crate::error::{CloakError, Result};

/// What a sender publishes alongside a payment: the ephemeral public key and
/// the encrypted random secret.
///
/// On-chain only the ephemeral key's X coordinate ([`Self::pkx`]) is stored;
/// the full 65-byte key is carried here because senders hold it before
/// truncation and tests need the exact point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// Uncompressed ephemeral public key (65 bytes, 0x04 prefix). One fresh
    /// key per payload, never reused.
    #[serde(with = "hex")]
    ephemeral_public_key: Vec<u8>,
    /// The random secret XORed with the shared secret (32 bytes).
    #[serde(with = "hex")]
    ciphertext: Vec<u8>,
}

impl EncryptedPayload {
    /// Creates a payload, validating both field sizes.
    pub fn new(ephemeral_public_key: &[u8], ciphertext: &[u8]) -> Result<Self> {
        if ephemeral_public_key.len() != UNCOMPRESSED_PUBLIC_KEY_SIZE {
            return Err(CloakError::InvalidPayload(format!(
                "ephemeral public key must be {UNCOMPRESSED_PUBLIC_KEY_SIZE} bytes, got {}",
                ephemeral_public_key.len()
            )));
        }
        if ephemeral_public_key[0] != 0x04 {
            return Err(CloakError::InvalidPayload(
                "ephemeral public key must start with the 0x04 uncompressed prefix".into(),
            ));
        }
        if ciphertext.len() != CIPHERTEXT_SIZE {
            return Err(CloakError::InvalidPayload(format!(
                "ciphertext must be {CIPHERTEXT_SIZE} bytes, got {}",
                ciphertext.len()
            )));
        }
        Ok(Self {
            ephemeral_public_key: ephemeral_public_key.to_vec(),
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Returns the uncompressed ephemeral public key bytes.
    pub fn ephemeral_public_key(&self) -> &[u8] {
        &self.ephemeral_public_key
    }

    /// Returns the ephemeral public key as hex with a `0x` prefix.
    pub fn ephemeral_public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.ephemeral_public_key))
    }

    /// Returns the ciphertext bytes.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Returns the ciphertext as hex with a `0x` prefix.
    pub fn ciphertext_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.ciphertext))
    }

    /// Returns the ephemeral key's X coordinate — the 32 bytes the contract
    /// stores as `pkx`.
    pub fn pkx(&self) -> [u8; COORDINATE_SIZE] {
        let mut x = [0u8; COORDINATE_SIZE];
        x.copy_from_slice(&self.ephemeral_public_key[1..1 + COORDINATE_SIZE]);
        x
    }

    /// Returns the ciphertext as a fixed array.
    pub fn ciphertext_array(&self) -> [u8; CIPHERTEXT_SIZE] {
        let mut bytes = [0u8; CIPHERTEXT_SIZE];
        bytes.copy_from_slice(&self.ciphertext);
        bytes
    }
}
