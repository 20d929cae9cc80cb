//! Compressed-key packing for the registry's word layout.

use serde::{Deserialize, Serialize};

use cloak_core::abi::{word_from_u64, word_to_u64, Word};
use cloak_core::error::{CloakError, Result};
use cloak_core::types::{CompressedPublicKey, PublishedKeys};
use cloak_crypto::KeyPair;

/// A registration as the contract stores it: both keys compressed, each as a
/// parity-prefix word plus an X-coordinate word.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredKeys {
    /// Compressed spending public key.
    pub spending: CompressedPublicKey,
    /// Compressed viewing public key.
    pub viewing: CompressedPublicKey,
}

impl RegisteredKeys {
    /// Compresses two key pairs into registration form.
    pub fn from_key_pairs(spending: &KeyPair, viewing: &KeyPair) -> Self {
        Self {
            spending: spending.compress(),
            viewing: viewing.compress(),
        }
    }

    /// Compresses a published key bundle into registration form.
    pub fn from_published(published: &PublishedKeys) -> Result<Self> {
        let spending = KeyPair::from_public_hex(&published.spending_public_key_hex())?;
        let viewing = KeyPair::from_public_hex(&published.viewing_public_key_hex())?;
        Ok(Self::from_key_pairs(&spending, &viewing))
    }

    /// Decompresses back to the full uncompressed key bundle.
    ///
    /// The stored parity makes decompression exact: the result is
    /// bit-for-bit the originally registered keys.
    pub fn to_published_keys(&self) -> Result<PublishedKeys> {
        let spending = KeyPair::from_compressed(&self.spending)?;
        let viewing = KeyPair::from_compressed(&self.viewing)?;
        PublishedKeys::new(
            spending.to_uncompressed_bytes().to_vec(),
            viewing.to_uncompressed_bytes().to_vec(),
        )
    }

    /// Packs into the contract's four uint256 words.
    pub fn to_words(&self) -> [Word; 4] {
        let mut spending_x = [0u8; 32];
        spending_x.copy_from_slice(self.spending.x());
        let mut viewing_x = [0u8; 32];
        viewing_x.copy_from_slice(self.viewing.x());
        [
            word_from_u64(u64::from(self.spending.prefix())),
            spending_x,
            word_from_u64(u64::from(self.viewing.prefix())),
            viewing_x,
        ]
    }

    /// Unpacks from the contract's four uint256 words.
    pub fn from_words(words: &[Word; 4]) -> Result<Self> {
        let spending_prefix = word_to_u64(&words[0])?;
        let viewing_prefix = word_to_u64(&words[2])?;
        let prefix_u8 = |value: u64| -> Result<u8> {
            u8::try_from(value).map_err(|_| {
                CloakError::InvalidResponse(format!("prefix word {value} exceeds u8"))
            })
        };
        Ok(Self {
            spending: CompressedPublicKey::new(prefix_u8(spending_prefix)?, words[1])?,
            viewing: CompressedPublicKey::new(prefix_u8(viewing_prefix)?, words[3])?,
        })
    }

    /// True when all four words are zero — the contract's "nothing
    /// registered" state.
    pub fn words_are_empty(words: &[Word; 4]) -> bool {
        words
            .iter()
            .all(|word| word.iter().all(|&byte| byte == 0))
    }
}
