//! The recipient's long-term key bundle.

use rand::{CryptoRng, RngCore};

use cloak_core::constants::KEY_GENERATION_MESSAGE;
use cloak_core::error::{CloakError, Result};
use cloak_core::types::PublishedKeys;
use cloak_crypto::{sha256, KeyPair};

/// A recipient's stealth identity: independent spending and viewing key pairs.
///
/// The spending key derives the final stealth private keys and should rarely
/// leave the recipient's custody. The viewing key only decrypts payloads
/// during scanning and may be handed to a delegated scanning service without
/// exposing spending authority.
#[derive(Clone, Debug)]
pub struct StealthWallet {
    spending: KeyPair,
    viewing: KeyPair,
}

impl StealthWallet {
    /// Generates a wallet from fresh OS entropy.
    pub fn generate() -> Self {
        Self {
            spending: KeyPair::generate(),
            viewing: KeyPair::generate(),
        }
    }

    /// Generates a wallet from the given RNG (seeded RNGs for tests).
    pub fn generate_with_rng(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        Self {
            spending: KeyPair::generate_with_rng(rng),
            viewing: KeyPair::generate_with_rng(rng),
        }
    }

    /// Derives the wallet deterministically from an Ethereum signature over
    /// [`KEY_GENERATION_MESSAGE`].
    ///
    /// The signature's r half hashes (SHA-256) to the spending private key
    /// and the s half to the viewing private key, so the same wallet
    /// signature always reproduces the same stealth identity.
    pub fn from_signature(signature: &str) -> Result<Self> {
        // 65-byte signature: r (32) || s (32) || v (1)
        if !signature.starts_with("0x") || signature.len() != 132 {
            return Err(CloakError::InvalidKeyFormat(
                "signature must be 0x plus 130 hex digits".into(),
            ));
        }
        let r = &signature[2..66];
        let s = &signature[66..130];
        let r_bytes = hex::decode(r)
            .map_err(|e| CloakError::InvalidKeyFormat(format!("signature is not hex: {e}")))?;
        let s_bytes = hex::decode(s)
            .map_err(|e| CloakError::InvalidKeyFormat(format!("signature is not hex: {e}")))?;

        let spending_private = format!("0x{}", hex::encode(sha256(&r_bytes)));
        let viewing_private = format!("0x{}", hex::encode(sha256(&s_bytes)));
        Self::from_private_keys(&spending_private, &viewing_private)
    }

    /// Builds a wallet from existing private keys.
    pub fn from_private_keys(spending_private: &str, viewing_private: &str) -> Result<Self> {
        Ok(Self {
            spending: KeyPair::from_private_hex(spending_private)?,
            viewing: KeyPair::from_private_hex(viewing_private)?,
        })
    }

    /// Returns the message a wallet signs to derive its keys.
    pub fn key_generation_message() -> &'static str {
        KEY_GENERATION_MESSAGE
    }

    /// Returns the spending key pair.
    pub fn spending(&self) -> &KeyPair {
        &self.spending
    }

    /// Returns the viewing key pair.
    pub fn viewing(&self) -> &KeyPair {
        &self.viewing
    }

    /// Exports the public halves for publication via a registry or name
    /// record.
    pub fn published_keys(&self) -> Result<PublishedKeys> {
        PublishedKeys::new(
            self.spending.to_uncompressed_bytes().to_vec(),
            self.viewing.to_uncompressed_bytes().to_vec(),
        )
    }
}
