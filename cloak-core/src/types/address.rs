//! Ethereum address type.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::constants::ETH_ADDRESS_SIZE;
use crate::error::{CloakError, Result};

/// A 20-byte Ethereum address.
///
/// Equality is byte-equality, so comparing addresses parsed from differently
/// cased hex strings is inherently case-insensitive. Display uses the EIP-55
/// mixed-case checksum.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EthAddress {
    bytes: [u8; ETH_ADDRESS_SIZE],
}

impl EthAddress {
    /// Creates an address from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ETH_ADDRESS_SIZE {
            return Err(CloakError::InvalidKeyFormat(format!(
                "address must be {} bytes, got {}",
                ETH_ADDRESS_SIZE,
                bytes.len()
            )));
        }
        let mut arr = [0u8; ETH_ADDRESS_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates from a fixed-size array.
    pub fn from_array(bytes: [u8; ETH_ADDRESS_SIZE]) -> Self {
        Self { bytes }
    }

    /// Parses from a hex string (with or without `0x` prefix, any case).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 2 * ETH_ADDRESS_SIZE {
            return Err(CloakError::InvalidKeyFormat(format!(
                "address must be {} hex digits, got {}",
                2 * ETH_ADDRESS_SIZE,
                s.len()
            )));
        }
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the EIP-55 mixed-case checksummed string.
    ///
    /// A hex digit is uppercased when the corresponding nibble of
    /// keccak256(lowercase hex address) is >= 8.
    pub fn to_checksum_string(&self) -> String {
        let lower = hex::encode(self.bytes);
        let digest = {
            let mut hasher = Keccak256::new();
            Digest::update(&mut hasher, lower.as_bytes());
            hasher.finalize()
        };

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                digest[i / 2] >> 4
            } else {
                digest[i / 2] & 0x0F
            };
            if nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Returns the zero address.
    pub fn zero() -> Self {
        Self {
            bytes: [0u8; ETH_ADDRESS_SIZE],
        }
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

impl std::fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EthAddress({})", self.to_checksum_string())
    }
}

impl std::fmt::Display for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_checksum_string())
    }
}

impl Serialize for EthAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_checksum_string())
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
