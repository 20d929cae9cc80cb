//! In-memory fake of the registry contract.
//!
//! Implements [`RegistryTransport`] by actually decoding the calldata the
//! client produces, so tests exercise the real wire encoding end to end
//! rather than short-circuiting around it. Signature verification on
//! `setStealthKeysOnBehalf` is intentionally absent — that is the real
//! contract's job.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use cloak_core::abi::{self, Word};
use cloak_core::error::{CloakError, Result};
use cloak_core::traits::RegistryTransport;
use cloak_core::types::EthAddress;

/// Thread-safe in-memory registry contract.
#[derive(Debug)]
pub struct MemoryRegistry {
    /// The simulated `msg.sender` for direct `setStealthKeys` calls.
    caller: EthAddress,
    /// Stored registrations: account → four words.
    entries: RwLock<HashMap<EthAddress, [Word; 4]>>,
}

impl MemoryRegistry {
    /// Creates an empty registry with the given caller identity.
    pub fn new(caller: EthAddress) -> Self {
        Self {
            caller,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the number of registered accounts.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn args(data: &[u8]) -> Result<(
        [u8; 4],
        Vec<Word>,
    )> {
        if data.len() < 4 {
            return Err(CloakError::RegistryError("calldata below selector size".into()));
        }
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&data[..4]);
        Ok((selector, abi::split_words(&data[4..])?))
    }
}

#[async_trait]
impl RegistryTransport for MemoryRegistry {
    async fn call(&self, _to: &EthAddress, data: Vec<u8>) -> Result<Vec<u8>> {
        let (selector, words) = Self::args(&data)?;
        if selector != abi::selector("stealthKeys(address)") {
            return Err(CloakError::RegistryError(format!(
                "unknown read selector 0x{}",
                hex::encode(selector)
            )));
        }
        if words.len() != 1 {
            return Err(CloakError::RegistryError(
                "stealthKeys takes one argument".into(),
            ));
        }

        let account = abi::word_to_address(&words[0]);
        let stored = self
            .entries
            .read()
            .get(&account)
            .copied()
            .unwrap_or([[0u8; 32]; 4]);

        let mut returned = Vec::with_capacity(4 * 32);
        for word in stored {
            returned.extend_from_slice(&word);
        }
        Ok(returned)
    }

    async fn submit(&self, _to: &EthAddress, data: Vec<u8>) -> Result<String> {
        let (selector, words) = Self::args(&data)?;

        if selector == abi::selector("setStealthKeys(uint256,uint256,uint256,uint256)") {
            if words.len() != 4 {
                return Err(CloakError::RegistryError(
                    "setStealthKeys takes four arguments".into(),
                ));
            }
            let stored = [words[0], words[1], words[2], words[3]];
            self.entries.write().insert(self.caller, stored);
            debug!(account = %self.caller, "registered keys");
        } else if selector
            == abi::selector(
                "setStealthKeysOnBehalf(address,uint256,uint256,uint256,uint256,uint8,bytes32,bytes32)",
            )
        {
            if words.len() != 8 {
                return Err(CloakError::RegistryError(
                    "setStealthKeysOnBehalf takes eight arguments".into(),
                ));
            }
            let registrant = abi::word_to_address(&words[0]);
            let stored = [words[1], words[2], words[3], words[4]];
            self.entries.write().insert(registrant, stored);
            debug!(account = %registrant, "registered keys on behalf");
        } else {
            return Err(CloakError::RegistryError(format!(
                "unknown write selector 0x{}",
                hex::encode(selector)
            )));
        }

        Ok(format!("0x{}", hex::encode(abi::keccak256(&data))))
    }
}
