//! Send-history entries for the external encrypted store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::EthAddress;

/// One entry in a sender's private send history.
///
/// Persistence itself is an external collaborator (an encrypted key-value
/// store); the core only defines the entry shape and the
/// [`crate::traits::SendHistory`] interface it is written through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentPayment {
    /// The one-time address the payment went to.
    pub stealth_address: EthAddress,
    /// Token contract the payment was made in.
    pub token: EthAddress,
    /// Payment amount as a big-endian uint256 word.
    #[serde(with = "hex")]
    pub amount: Vec<u8>,
    /// Hash of the funding transaction.
    pub tx_hash: String,
    /// When the send was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl SentPayment {
    /// Creates an entry stamped with the current time.
    pub fn new(
        stealth_address: EthAddress,
        token: EthAddress,
        amount: Vec<u8>,
        tx_hash: impl Into<String>,
    ) -> Self {
        Self {
            stealth_address,
            token,
            amount,
            tx_hash: tx_hash.into(),
            recorded_at: Utc::now(),
        }
    }
}
