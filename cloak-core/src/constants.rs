//! Protocol constants for Cloak.
//!
//! Key and payload sizes follow the secp256k1/Ethereum conventions the
//! on-chain contracts encode against. These values are fixed by the external
//! protocol and must not drift.

// ═══════════════════════════════════════════════════════════════════════════════
// SECP256K1 KEY SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a secp256k1 private key scalar in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of an uncompressed secp256k1 public key in bytes (0x04 prefix + X + Y).
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;

/// Size of a compressed secp256k1 public key in bytes (parity prefix + X).
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;

/// Size of a curve coordinate (X or Y) in bytes.
pub const COORDINATE_SIZE: usize = 32;

/// Hex-string length of a private key including the `0x` prefix.
pub const PRIVATE_KEY_HEX_LENGTH: usize = 66;

/// Hex-string length of an uncompressed public key including the `0x` prefix.
pub const PUBLIC_KEY_HEX_LENGTH: usize = 132;

/// SEC1 prefix byte for a compressed point with an even Y coordinate.
pub const PARITY_EVEN: u8 = 2;

/// SEC1 prefix byte for a compressed point with an odd Y coordinate.
pub const PARITY_ODD: u8 = 3;

/// The secp256k1 group order n, as fixed-width hex.
///
/// Private keys and multiplication scalars must be nonzero and strictly
/// below this value.
pub const CURVE_ORDER_HEX: &str =
    "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";

// ═══════════════════════════════════════════════════════════════════════════════
// SECRET / PAYLOAD SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of the random secret used to derive one-time addresses.
pub const RANDOM_SECRET_SIZE: usize = 32;

/// Size of the caller-supplied payload extension embedded in a secret's
/// high bytes.
pub const PAYLOAD_EXTENSION_SIZE: usize = 16;

/// Hex-string length of a payload extension including the `0x` prefix.
pub const PAYLOAD_EXTENSION_HEX_LENGTH: usize = 34;

/// Size of the encrypted ciphertext published on-chain.
pub const CIPHERTEXT_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of an Ethereum address in bytes.
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Size of a keccak256 hash output.
pub const KECCAK256_SIZE: usize = 32;

/// Size of one ABI word.
pub const ABI_WORD_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// BLOCKED KEYS
// ═══════════════════════════════════════════════════════════════════════════════
// Process-wide immutable tables of degenerate keys that must never be
// accepted. The zero scalar has no public key, and the all-zero point
// produces an address no one can spend from.

/// Private keys that are rejected at construction time.
pub const BLOCKED_PRIVATE_KEYS: &[&str] =
    &["0x0000000000000000000000000000000000000000000000000000000000000000"];

/// Public keys that are rejected at construction time.
pub const BLOCKED_PUBLIC_KEYS: &[&str] = &[
    "0x040000000000000000000000000000000000000000000000000000000000000000\
     0000000000000000000000000000000000000000000000000000000000000000",
];

// ═══════════════════════════════════════════════════════════════════════════════
// EXTERNAL CONTRACT INTERFACES
// ═══════════════════════════════════════════════════════════════════════════════

/// Canonical signature of the payment contract's announcement event.
///
/// `receiver` and `token` are indexed; `amount`, `pkx`, and `ciphertext`
/// travel in the log data.
pub const ANNOUNCEMENT_EVENT_SIGNATURE: &str =
    "Announcement(address,uint256,address,bytes32,bytes32)";

/// Canonical signature of the key registry's change event.
pub const STEALTH_KEY_CHANGED_EVENT_SIGNATURE: &str =
    "StealthKeyChanged(address,uint256,uint256,uint256,uint256)";

/// EIP-712 domain name of the stealth key registry contract.
pub const REGISTRY_EIP712_NAME: &str = "Umbra Stealth Key Registry";

/// EIP-712 domain version of the stealth key registry contract.
pub const REGISTRY_EIP712_VERSION: &str = "1";

// ═══════════════════════════════════════════════════════════════════════════════
// KEY GENERATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Message a recipient signs to derive their long-term key pairs
/// deterministically from a wallet signature.
pub const KEY_GENERATION_MESSAGE: &str = "Sign this message to access your Cloak account.\n\n\
Only sign this message for a trusted client!";

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Minimum number of shards a parallel scan partitions into.
pub const MIN_SCAN_SHARDS: usize = 2;

/// How many records a scan worker processes between progress messages.
pub const SCAN_PROGRESS_STRIDE: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_sizes() {
        assert_eq!(UNCOMPRESSED_PUBLIC_KEY_SIZE, 1 + 2 * COORDINATE_SIZE);
        assert_eq!(COMPRESSED_PUBLIC_KEY_SIZE, 1 + COORDINATE_SIZE);
        assert_eq!(PRIVATE_KEY_HEX_LENGTH, 2 + 2 * PRIVATE_KEY_SIZE);
        assert_eq!(PUBLIC_KEY_HEX_LENGTH, 2 + 2 * UNCOMPRESSED_PUBLIC_KEY_SIZE);
    }

    #[test]
    fn test_secret_layout() {
        // The secret is a payload extension on top of a random half
        assert_eq!(RANDOM_SECRET_SIZE, 2 * PAYLOAD_EXTENSION_SIZE);
        assert_eq!(PAYLOAD_EXTENSION_HEX_LENGTH, 2 + 2 * PAYLOAD_EXTENSION_SIZE);
    }

    #[test]
    fn test_blocked_keys_well_formed() {
        for key in BLOCKED_PRIVATE_KEYS {
            assert_eq!(key.len(), PRIVATE_KEY_HEX_LENGTH);
            assert!(key.starts_with("0x"));
        }
        for key in BLOCKED_PUBLIC_KEYS {
            assert_eq!(key.len(), PUBLIC_KEY_HEX_LENGTH);
            assert!(key.starts_with("0x04"));
        }
    }

    #[test]
    fn test_curve_order_hex_width() {
        assert_eq!(CURVE_ORDER_HEX.len(), 64);
        assert!(hex::decode(CURVE_ORDER_HEX).is_ok());
    }
}
