//! Interfaces for Cloak's external collaborators.
//!
//! Everything network- or storage-shaped is behind one of these traits so the
//! protocol crates stay pure and testable. Each call returns a single
//! definitive result or a definitive failure; there are no partial or
//! streaming results, and the core never retries.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{EthAddress, SentPayment, TransactionData};

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY TRANSPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Transport for interacting with the stealth key registry contract.
///
/// The registry client composes calldata; this trait moves it. Read paths are
/// plain `eth_call`s; write paths need a signer and belong to the external
/// transaction pipeline (a transport without one fails with `MissingSigner`).
#[async_trait]
pub trait RegistryTransport: Send + Sync {
    /// Executes a read-only contract call and returns the raw return data.
    async fn call(&self, to: &EthAddress, data: Vec<u8>) -> Result<Vec<u8>>;

    /// Submits a state-changing call, returning the transaction hash.
    async fn submit(&self, to: &EthAddress, data: Vec<u8>) -> Result<String>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHAIN READER
// ═══════════════════════════════════════════════════════════════════════════════

/// Read access to chain state needed by key recovery.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Fetches a transaction by hash; `None` when the node does not know it.
    async fn transaction_by_hash(&self, hash: &str) -> Result<Option<TransactionData>>;

    /// Returns the chain id.
    async fn chain_id(&self) -> Result<u64>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAME SERVICES
// ═══════════════════════════════════════════════════════════════════════════════

/// One naming system (ENS, CNS, ...) resolving human-readable names to
/// addresses. Cloak treats these as external key-value lookups.
#[async_trait]
pub trait NameService: Send + Sync {
    /// Returns true if this service is responsible for the given name
    /// (typically by TLD suffix).
    fn supports(&self, name: &str) -> bool;

    /// Resolves a name to an address.
    ///
    /// `Ok(None)` means the name definitively has no registration; transport
    /// failures must surface as errors, never as `None`.
    async fn resolve_address(&self, name: &str) -> Result<Option<EthAddress>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// SEND HISTORY
// ═══════════════════════════════════════════════════════════════════════════════

/// The external encrypted store a sender's history is written through.
///
/// Implementations must make `record_send` a read-modify-write atomic per
/// (sender, chain id) key — concurrent sends must not lose entries.
#[async_trait]
pub trait SendHistory: Send + Sync {
    /// Appends an entry to the sender's history on the given chain.
    async fn record_send(
        &self,
        sender: &EthAddress,
        chain_id: u64,
        entry: SentPayment,
    ) -> Result<()>;

    /// Returns the sender's history on the given chain, oldest first.
    async fn sent_payments(&self, sender: &EthAddress, chain_id: u64)
        -> Result<Vec<SentPayment>>;
}
