//! In-memory send history.
//!
//! Production deployments persist history through an external encrypted
//! key-value store behind the [`SendHistory`] trait; this implementation
//! backs tests and single-process use. Appends are read-modify-write atomic
//! per (sender, chain id) key.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use cloak_core::error::Result;
use cloak_core::traits::SendHistory;
use cloak_core::types::{EthAddress, SentPayment};

/// Thread-safe in-memory send history.
#[derive(Debug, Default)]
pub struct MemorySendHistory {
    entries: Mutex<HashMap<(EthAddress, u64), Vec<SentPayment>>>,
}

impl MemorySendHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries across all senders and chains.
    pub fn len(&self) -> usize {
        self.entries.lock().values().map(Vec::len).sum()
    }

    /// Returns true if no entries are recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl SendHistory for MemorySendHistory {
    async fn record_send(
        &self,
        sender: &EthAddress,
        chain_id: u64,
        entry: SentPayment,
    ) -> Result<()> {
        self.entries
            .lock()
            .entry((*sender, chain_id))
            .or_default()
            .push(entry);
        Ok(())
    }

    async fn sent_payments(
        &self,
        sender: &EthAddress,
        chain_id: u64,
    ) -> Result<Vec<SentPayment>> {
        Ok(self
            .entries
            .lock()
            .get(&(*sender, chain_id))
            .cloned()
            .unwrap_or_default())
    }
}
