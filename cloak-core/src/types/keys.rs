//! Published key types.
//!
//! - [`CompressedPublicKey`]: the registry wire form of a public key
//!   (parity prefix + X coordinate)
//! - [`PublishedKeys`]: a recipient's published spending + viewing keys

use serde::{Deserialize, Serialize};

use crate::constants::{
    COORDINATE_SIZE, PARITY_EVEN, PARITY_ODD, UNCOMPRESSED_PUBLIC_KEY_SIZE,
};
use crate::error::{CloakError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// COMPRESSED PUBLIC KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// A compressed secp256k1 public key: a Y-parity prefix (2 or 3) plus the
/// X coordinate.
///
/// This is the form the on-chain registry stores (as two uint256 words) and
/// the form announcements truncate to just the X coordinate.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CompressedPublicKey {
    prefix: u8,
    x: [u8; COORDINATE_SIZE],
}

impl CompressedPublicKey {
    /// Creates a compressed key, validating the parity prefix.
    pub fn new(prefix: u8, x: [u8; COORDINATE_SIZE]) -> Result<Self> {
        if prefix != PARITY_EVEN && prefix != PARITY_ODD {
            return Err(CloakError::InvalidKeyFormat(format!(
                "compressed key prefix must be {PARITY_EVEN} or {PARITY_ODD}, got {prefix}"
            )));
        }
        Ok(Self { prefix, x })
    }

    /// Returns the parity prefix (2 = even Y, 3 = odd Y).
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Returns the X coordinate.
    pub fn x(&self) -> &[u8; COORDINATE_SIZE] {
        &self.x
    }

    /// Returns the X coordinate as fixed-width hex with a `0x` prefix.
    pub fn x_hex(&self) -> String {
        format!("0x{}", hex::encode(self.x))
    }

    /// Returns the 33-byte SEC1 serialization.
    pub fn to_sec1_bytes(&self) -> [u8; 1 + COORDINATE_SIZE] {
        let mut bytes = [0u8; 1 + COORDINATE_SIZE];
        bytes[0] = self.prefix;
        bytes[1..].copy_from_slice(&self.x);
        bytes
    }
}

impl std::fmt::Debug for CompressedPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompressedPublicKey({}, {})", self.prefix, self.x_hex())
    }
}

impl Serialize for CompressedPublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(self.to_sec1_bytes())))
    }
}

impl<'de> Deserialize<'de> for CompressedPublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(&s))
            .map_err(serde::de::Error::custom)?;
        if bytes.len() != 1 + COORDINATE_SIZE {
            return Err(serde::de::Error::custom("compressed key must be 33 bytes"));
        }
        let mut x = [0u8; COORDINATE_SIZE];
        x.copy_from_slice(&bytes[1..]);
        Self::new(bytes[0], x).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLISHED KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// A recipient's published uncompressed public keys.
///
/// The spending key derives one-time addresses; the viewing key encrypts the
/// per-send secret. Resolvers and the registry hand these to senders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedKeys {
    /// Uncompressed spending public key (65 bytes, 0x04 prefix).
    #[serde(with = "hex")]
    pub spending_public_key: Vec<u8>,
    /// Uncompressed viewing public key (65 bytes, 0x04 prefix).
    #[serde(with = "hex")]
    pub viewing_public_key: Vec<u8>,
}

impl PublishedKeys {
    /// Creates a published key bundle, validating the wire shape of both keys.
    pub fn new(spending_public_key: Vec<u8>, viewing_public_key: Vec<u8>) -> Result<Self> {
        Self::validate_key(&spending_public_key, "spending")?;
        Self::validate_key(&viewing_public_key, "viewing")?;
        Ok(Self {
            spending_public_key,
            viewing_public_key,
        })
    }

    fn validate_key(key: &[u8], label: &str) -> Result<()> {
        if key.len() != UNCOMPRESSED_PUBLIC_KEY_SIZE {
            return Err(CloakError::InvalidKeyFormat(format!(
                "{label} public key must be {UNCOMPRESSED_PUBLIC_KEY_SIZE} bytes, got {}",
                key.len()
            )));
        }
        if key[0] != 0x04 {
            return Err(CloakError::InvalidKeyFormat(format!(
                "{label} public key must start with the 0x04 uncompressed prefix"
            )));
        }
        Ok(())
    }

    /// Returns the spending key as hex with a `0x` prefix.
    pub fn spending_public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.spending_public_key))
    }

    /// Returns the viewing key as hex with a `0x` prefix.
    pub fn viewing_public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.viewing_public_key))
    }
}
