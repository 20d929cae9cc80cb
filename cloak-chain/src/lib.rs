//! # Cloak Chain
//!
//! Chain access for the Cloak protocol:
//!
//! - **RPC**: a thin JSON-RPC client (`eth_call`, `eth_chainId`,
//!   `eth_getTransactionByHash`, `eth_getLogs`) implementing the
//!   [`cloak_core::traits::RegistryTransport`] read path and
//!   [`cloak_core::traits::ChainReader`]
//! - **RLP**: the recursive-length-prefix encoding of transaction signing
//!   payloads (legacy, EIP-2930, EIP-1559)
//! - **Recovery**: ECDSA public-key recovery of a transaction's sender —
//!   how a sender's public key is learned from any transaction they signed
//! - **Logs**: fetching and decoding announcement events

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod logs;
pub mod recover;
pub mod rlp;
pub mod rpc;

pub use logs::{announcement_topic, decode_announcement, fetch_announcements, LogEntry};
pub use recover::{keypair_from_transaction, recover_sender, signing_digest};
pub use rpc::{RpcClient, RpcConfig};
