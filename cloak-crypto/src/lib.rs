//! # Cloak Cryptography
//!
//! secp256k1 operations for the Cloak stealth payment protocol.
//!
//! This crate provides:
//!
//! - **KeyPair**: public/private secp256k1 keys with address derivation,
//!   compression, scalar multiplication, and payload encryption
//! - **RandomSecret**: the per-send 32-byte secret with its payload-extension
//!   layout
//! - **Hash**: keccak256, SHA-256, and Ethereum personal-message digests
//!
//! ## Security Properties
//!
//! - Point and scalar arithmetic comes from the `k256` crate; nothing here
//!   hand-rolls field math
//! - Private material is zeroized on drop and redacted from `Debug` output
//! - Degenerate keys (the zero scalar, the all-zero point) are rejected at
//!   construction against a process-wide immutable blocklist
//!
//! ## Example
//!
//! ```rust
//! use cloak_crypto::{KeyPair, RandomSecret};
//!
//! let recipient = KeyPair::generate();
//! let secret = RandomSecret::generate();
//!
//! // Sender encrypts under the recipient's public key
//! let payload = recipient.public_only().encrypt(&secret)?;
//!
//! // Recipient decrypts with the private key
//! let recovered = recipient.decrypt(&payload)?;
//! assert_eq!(recovered, secret.as_hex());
//! # Ok::<(), cloak_core::CloakError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod hash;
pub mod keypair;
pub mod secret;

// Re-export main items at crate root
pub use hash::{keccak256, personal_message_digest, sha256};
pub use keypair::KeyPair;
pub use secret::RandomSecret;
