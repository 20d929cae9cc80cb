//! Sender-side derivation of one-time addresses.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cloak_core::error::{CloakError, Result};
use cloak_core::types::{EncryptedPayload, EthAddress, PublishedKeys};
use cloak_crypto::{KeyPair, RandomSecret};

/// Everything a sender needs to make a stealth payment: the one-time address
/// to fund and the payload to publish alongside it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreparedSend {
    /// The one-time address derived for this payment.
    pub stealth_address: EthAddress,
    /// The encrypted payload the payment contract announces.
    pub payload: EncryptedPayload,
}

/// Derives a one-time address for the recipient and encrypts the secret that
/// unlocks it.
///
/// 1. Generate a fresh [`RandomSecret`] (optionally embedding a payload
///    extension in its high bytes)
/// 2. Encrypt it under the recipient's viewing public key
/// 3. Multiply the recipient's spending public key by the secret; the
///    product's address is the stealth address
///
/// Each call uses fresh randomness, so repeated sends to the same recipient
/// produce unlinkable addresses.
pub fn prepare_send(
    spending_public: &KeyPair,
    viewing_public: &KeyPair,
    payload_extension: Option<&str>,
) -> Result<PreparedSend> {
    let secret = match payload_extension {
        Some(extension) => RandomSecret::generate_with_extension(extension)?,
        None => RandomSecret::generate(),
    };

    let payload = viewing_public.encrypt(&secret)?;
    let stealth = spending_public.mul_public_key(&secret.as_hex())?;
    let stealth_address = stealth.address();

    debug!(%stealth_address, "prepared stealth send");
    Ok(PreparedSend {
        stealth_address,
        payload,
    })
}

/// [`prepare_send`] against a published key bundle (as returned by the
/// registry or a resolver).
pub fn prepare_send_to(
    published: &PublishedKeys,
    payload_extension: Option<&str>,
) -> Result<PreparedSend> {
    let spending = KeyPair::from_public_hex(&published.spending_public_key_hex())?;
    let viewing = KeyPair::from_public_hex(&published.viewing_public_key_hex())?;
    prepare_send(&spending, &viewing, payload_extension)
}

/// Checks that a prepared send is internally consistent before submission.
pub fn verify_prepared_send(send: &PreparedSend) -> Result<()> {
    if send.stealth_address.is_zero() {
        return Err(CloakError::InvalidPayload(
            "stealth address is the zero address".into(),
        ));
    }
    // Size/shape invariants are enforced by the payload constructor; reparse
    // the ephemeral key to confirm it still names a curve point
    KeyPair::from_public_bytes(send.payload.ephemeral_public_key())?;
    Ok(())
}
