//! Announcement records read from the payment contract's event log.

use serde::{Deserialize, Serialize};

use crate::abi::{self, Word};
use crate::constants::{ANNOUNCEMENT_EVENT_SIGNATURE, CIPHERTEXT_SIZE, COORDINATE_SIZE};
use crate::error::{CloakError, Result};
use crate::types::EthAddress;

/// One on-chain announcement log entry.
///
/// The event layout is fixed by the external payment contract:
/// `Announcement(address indexed receiver, uint256 amount,
/// address indexed token, bytes32 pkx, bytes32 ciphertext)` —
/// receiver and token travel as topics, the rest as data words.
///
/// Records are consumed read-only by the scanner; chain metadata is carried
/// along for callers that need to locate the funding transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementRecord {
    /// The stealth address that received the payment.
    pub receiver: EthAddress,
    /// Payment amount as a big-endian uint256 word.
    #[serde(with = "hex")]
    pub amount: Vec<u8>,
    /// Token contract address (or the ETH sentinel the contract uses).
    pub token: EthAddress,
    /// X coordinate of the sender's ephemeral public key.
    #[serde(with = "hex")]
    pub pkx: Vec<u8>,
    /// The encrypted random secret.
    #[serde(with = "hex")]
    pub ciphertext: Vec<u8>,
    /// Sender address, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<EthAddress>,
    /// Transaction hash of the announcement, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Block number of the announcement, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Block timestamp (Unix seconds), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

impl AnnouncementRecord {
    /// Creates a record from its event fields.
    pub fn new(
        receiver: EthAddress,
        token: EthAddress,
        amount: Word,
        pkx: [u8; COORDINATE_SIZE],
        ciphertext: [u8; CIPHERTEXT_SIZE],
    ) -> Self {
        Self {
            receiver,
            amount: amount.to_vec(),
            token,
            pkx: pkx.to_vec(),
            ciphertext: ciphertext.to_vec(),
            from: None,
            tx_hash: None,
            block_number: None,
            timestamp: None,
        }
    }

    /// Attaches the sender address.
    pub fn with_from(mut self, from: EthAddress) -> Self {
        self.from = Some(from);
        self
    }

    /// Attaches the transaction hash.
    pub fn with_tx_hash(mut self, tx_hash: impl Into<String>) -> Self {
        self.tx_hash = Some(tx_hash.into());
        self
    }

    /// Attaches the block number.
    pub fn with_block_number(mut self, block_number: u64) -> Self {
        self.block_number = Some(block_number);
        self
    }

    /// Attaches the block timestamp.
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Validates the record's field sizes.
    pub fn validate(&self) -> Result<()> {
        if self.pkx.len() != COORDINATE_SIZE {
            return Err(CloakError::InvalidAnnouncement(format!(
                "pkx must be {COORDINATE_SIZE} bytes, got {}",
                self.pkx.len()
            )));
        }
        if self.pkx.iter().all(|&b| b == 0) {
            return Err(CloakError::InvalidAnnouncement("pkx is all zeros".into()));
        }
        if self.ciphertext.len() != CIPHERTEXT_SIZE {
            return Err(CloakError::InvalidAnnouncement(format!(
                "ciphertext must be {CIPHERTEXT_SIZE} bytes, got {}",
                self.ciphertext.len()
            )));
        }
        if self.amount.len() != 32 {
            return Err(CloakError::InvalidAnnouncement(format!(
                "amount must be a 32-byte word, got {} bytes",
                self.amount.len()
            )));
        }
        Ok(())
    }

    /// Decodes a record from an event log's topics and data.
    pub fn from_log(topics: &[Word], data: &[u8]) -> Result<Self> {
        if topics.len() != 3 {
            return Err(CloakError::InvalidAnnouncement(format!(
                "announcement logs carry 3 topics, got {}",
                topics.len()
            )));
        }
        if topics[0] != abi::event_topic(ANNOUNCEMENT_EVENT_SIGNATURE) {
            return Err(CloakError::InvalidAnnouncement(
                "topic0 does not match the announcement event".into(),
            ));
        }

        let words = abi::split_words(data)
            .map_err(|_| CloakError::InvalidAnnouncement("ragged log data".into()))?;
        if words.len() != 3 {
            return Err(CloakError::InvalidAnnouncement(format!(
                "announcement data carries 3 words, got {}",
                words.len()
            )));
        }

        let record = Self::new(
            abi::word_to_address(&topics[1]),
            abi::word_to_address(&topics[2]),
            words[0],
            words[1],
            words[2],
        );
        record.validate()?;
        Ok(record)
    }

    /// Encodes the record back into event topics and data (inverse of
    /// [`Self::from_log`]; used by the in-memory test doubles).
    pub fn to_log(&self) -> (Vec<Word>, Vec<u8>) {
        let topics = vec![
            abi::event_topic(ANNOUNCEMENT_EVENT_SIGNATURE),
            abi::word_from_address(&self.receiver),
            abi::word_from_address(&self.token),
        ];
        let mut data = Vec::with_capacity(96);
        data.extend_from_slice(&self.amount);
        data.extend_from_slice(&self.pkx);
        data.extend_from_slice(&self.ciphertext);
        (topics, data)
    }

    /// Returns pkx as a fixed array.
    pub fn pkx_array(&self) -> Result<[u8; COORDINATE_SIZE]> {
        self.pkx
            .as_slice()
            .try_into()
            .map_err(|_| CloakError::InvalidAnnouncement("pkx has the wrong length".into()))
    }

    /// Returns the ciphertext as a fixed array.
    pub fn ciphertext_array(&self) -> Result<[u8; CIPHERTEXT_SIZE]> {
        self.ciphertext
            .as_slice()
            .try_into()
            .map_err(|_| CloakError::InvalidAnnouncement("ciphertext has the wrong length".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::word_from_u64;

    fn make_record() -> AnnouncementRecord {
        AnnouncementRecord::new(
            EthAddress::from_array([0x11; 20]),
            EthAddress::from_array([0x22; 20]),
            word_from_u64(1_000_000),
            [0x33; 32],
            [0x44; 32],
        )
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert!(make_record().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_pkx() {
        let mut record = make_record();
        record.pkx = vec![0u8; 32];
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        let mut record = make_record();
        record.ciphertext = vec![0x44; 31];
        assert!(record.validate().is_err());

        let mut record = make_record();
        record.amount = vec![0x01; 16];
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_log_roundtrip() {
        let record = make_record();
        let (topics, data) = record.to_log();
        let decoded = AnnouncementRecord::from_log(&topics, &data).unwrap();
        assert_eq!(record, decoded);
    }

    #[test]
    fn test_from_log_rejects_wrong_topic() {
        let record = make_record();
        let (mut topics, data) = record.to_log();
        topics[0] = [0u8; 32];
        assert!(AnnouncementRecord::from_log(&topics, &data).is_err());
    }

    #[test]
    fn test_from_log_rejects_short_data() {
        let record = make_record();
        let (topics, data) = record.to_log();
        assert!(AnnouncementRecord::from_log(&topics, &data[..64]).is_err());
    }

    #[test]
    fn test_metadata_builders() {
        let record = make_record()
            .with_from(EthAddress::from_array([0x55; 20]))
            .with_tx_hash("0xdead")
            .with_block_number(42)
            .with_timestamp(1_700_000_000);
        assert!(record.from.is_some());
        assert_eq!(record.block_number, Some(42));
        assert_eq!(record.timestamp, Some(1_700_000_000));
    }

    #[test]
    fn test_serde_roundtrip() {
        let record = make_record().with_block_number(7);
        let json = serde_json::to_string(&record).unwrap();
        let back: AnnouncementRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
