//! # Cloak Registry
//!
//! Client for the on-chain stealth key registry contract.
//!
//! The registry stores each account's spending and viewing public keys in
//! compressed form as four uint256 words:
//!
//! ```text
//! stealthKeys(account) -> (spendingPubKeyPrefix, spendingPubKey,
//!                          viewingPubKeyPrefix, viewingPubKey)
//! ```
//!
//! This crate provides:
//!
//! - **Encoding**: pack/unpack public keys into the contract's word layout
//! - **Client**: read and write registrations through a
//!   [`cloak_core::traits::RegistryTransport`]
//! - **EIP-712**: the typed-data digest a registrant signs so a relayer can
//!   submit `setStealthKeysOnBehalf` for them
//! - **Memory registry**: an in-process fake of the contract for tests

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod client;
pub mod eip712;
pub mod encoding;
pub mod memory;

pub use client::RegistryClient;
pub use eip712::{registration_digest, Eip712Domain, Eip712Signature};
pub use encoding::RegisteredKeys;
pub use memory::MemoryRegistry;
