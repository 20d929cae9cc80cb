//! # Cloak Core
//!
//! Core types, errors, and traits for the Cloak stealth payment protocol.
//!
//! This crate provides the foundational building blocks used by all other Cloak crates:
//!
//! - **Types**: Domain models for addresses, announcements, payloads, and published keys
//! - **Errors**: Comprehensive error types with context
//! - **Constants**: Protocol constants, sizes, and blocked-key tables
//! - **ABI**: Minimal Solidity ABI encoding for the fixed external contract interfaces
//! - **Traits**: Interfaces for the external collaborators (chain, registry, name services)
//!
//! ## Example
//!
//! ```rust
//! use cloak_core::EthAddress;
//!
//! let receiver = EthAddress::from_hex("0x90F8bf6A479f320ead074411a4B0e7944Ea8c9C1").unwrap();
//! assert!(!receiver.is_zero());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod abi;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{CloakError, Result};
pub use traits::*;
pub use types::*;
