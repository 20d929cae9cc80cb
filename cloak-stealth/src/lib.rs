//! # Cloak Stealth Address Protocol
//!
//! High-level API for sending to and claiming from one-time addresses.
//!
//! This crate provides:
//!
//! - **Wallet**: a recipient's long-term spending + viewing key bundle
//! - **Send**: derive a one-time address and the payload to publish
//! - **Receive**: recover the spendable private key from a payload
//! - **Withdraw**: the meta-withdrawal signing digest
//! - **History**: the send-history collaborator interface
//!
//! ## Quick Start
//!
//! ```rust
//! use cloak_stealth::{prepare_send, derive_stealth_private_key, StealthWallet};
//!
//! // Recipient: generate keys once, publish the public halves
//! let wallet = StealthWallet::generate();
//! let published = wallet.published_keys()?;
//!
//! // Sender: derive a one-time address and payload
//! let send = prepare_send(
//!     &wallet.spending().public_only(),
//!     &wallet.viewing().public_only(),
//!     None,
//! )?;
//!
//! // Recipient: recover the spendable key from the published payload
//! let stealth_key = derive_stealth_private_key(
//!     wallet.spending(),
//!     wallet.viewing(),
//!     &send.payload,
//! )?;
//! assert_eq!(stealth_key.address(), send.stealth_address);
//! # Ok::<(), cloak_core::CloakError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod history;
pub mod receive;
pub mod send;
pub mod wallet;
pub mod withdraw;

pub use history::MemorySendHistory;
pub use receive::derive_stealth_private_key;
pub use send::{prepare_send, prepare_send_to, PreparedSend};
pub use wallet::StealthWallet;
pub use withdraw::{withdrawal_digest, WithdrawalRequest};
