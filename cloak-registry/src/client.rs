//! Registry contract client.

use tracing::{debug, instrument};

use cloak_core::abi::{self, AbiValue, Word};
use cloak_core::error::{CloakError, Result};
use cloak_core::traits::RegistryTransport;
use cloak_core::types::{EthAddress, PublishedKeys};
use cloak_crypto::KeyPair;

use crate::eip712::{self, Eip712Domain, Eip712Signature};
use crate::encoding::RegisteredKeys;

const STEALTH_KEYS_SIG: &str = "stealthKeys(address)";
const SET_STEALTH_KEYS_SIG: &str = "setStealthKeys(uint256,uint256,uint256,uint256)";
const SET_ON_BEHALF_SIG: &str =
    "setStealthKeysOnBehalf(address,uint256,uint256,uint256,uint256,uint8,bytes32,bytes32)";

/// Client for one StealthKeyRegistry deployment.
///
/// Composes calldata and digests; moving bytes is the transport's job, so the
/// same client drives a JSON-RPC node, a signing pipeline, or the in-memory
/// fake in tests.
pub struct RegistryClient<T: RegistryTransport> {
    transport: T,
    address: EthAddress,
    chain_id: u64,
}

impl<T: RegistryTransport> RegistryClient<T> {
    /// Creates a client for the registry at `address` on `chain_id`.
    pub fn new(transport: T, address: EthAddress, chain_id: u64) -> Self {
        Self {
            transport,
            address,
            chain_id,
        }
    }

    /// Returns the registry contract address.
    pub fn address(&self) -> &EthAddress {
        &self.address
    }

    /// Reads an account's registered keys, decompressed to the full bundle.
    ///
    /// # Errors
    /// `NoKeysRegistered` when all four stored words are zero — distinct from
    /// transport failures, which propagate as their own kinds.
    #[instrument(skip(self))]
    pub async fn get_stealth_keys(&self, account: &EthAddress) -> Result<PublishedKeys> {
        let data = abi::encode_call(STEALTH_KEYS_SIG, &[AbiValue::Address(*account)]);
        let returned = self.transport.call(&self.address, data).await?;

        let words = abi::split_words(&returned)?;
        let words: [Word; 4] = words.try_into().map_err(|_| {
            CloakError::InvalidResponse("stealthKeys must return exactly 4 words".into())
        })?;

        if RegisteredKeys::words_are_empty(&words) {
            return Err(CloakError::NoKeysRegistered(account.to_checksum_string()));
        }

        let published = RegisteredKeys::from_words(&words)?.to_published_keys()?;
        debug!(%account, "fetched registered stealth keys");
        Ok(published)
    }

    /// Registers the caller's keys (`setStealthKeys`). Returns the
    /// transaction hash reported by the transport.
    #[instrument(skip(self, spending, viewing))]
    pub async fn set_stealth_keys(&self, spending: &KeyPair, viewing: &KeyPair) -> Result<String> {
        let keys = RegisteredKeys::from_key_pairs(spending, viewing);
        let data = Self::set_keys_calldata(&keys);
        self.transport.submit(&self.address, data).await
    }

    /// The digest a registrant signs so a relayer can register on their
    /// behalf.
    pub fn registration_digest(&self, keys: &RegisteredKeys) -> Word {
        eip712::registration_digest(&Eip712Domain::registry(self.chain_id, self.address), keys)
    }

    /// Submits a third-party registration (`setStealthKeysOnBehalf`) carrying
    /// the registrant's EIP-712 signature. The contract verifies the
    /// signature; this client only assembles the call.
    #[instrument(skip(self, keys, signature))]
    pub async fn set_stealth_keys_on_behalf(
        &self,
        registrant: &EthAddress,
        keys: &RegisteredKeys,
        signature: &Eip712Signature,
    ) -> Result<String> {
        let words = keys.to_words();
        let data = abi::encode_call(
            SET_ON_BEHALF_SIG,
            &[
                AbiValue::Address(*registrant),
                AbiValue::Uint(words[0]),
                AbiValue::Uint(words[1]),
                AbiValue::Uint(words[2]),
                AbiValue::Uint(words[3]),
                AbiValue::Uint(abi::word_from_u64(u64::from(signature.v))),
                AbiValue::FixedBytes(signature.r),
                AbiValue::FixedBytes(signature.s),
            ],
        );
        self.transport.submit(&self.address, data).await
    }

    fn set_keys_calldata(keys: &RegisteredKeys) -> Vec<u8> {
        let words = keys.to_words();
        abi::encode_call(
            SET_STEALTH_KEYS_SIG,
            &[
                AbiValue::Uint(words[0]),
                AbiValue::Uint(words[1]),
                AbiValue::Uint(words[2]),
                AbiValue::Uint(words[3]),
            ],
        )
    }
}
