//! Announcement log fetching and decoding.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use cloak_core::abi::{self, Word};
use cloak_core::constants::ANNOUNCEMENT_EVENT_SIGNATURE;
use cloak_core::error::{CloakError, Result};
use cloak_core::types::{quantity_to_u64, AnnouncementRecord, EthAddress};

use crate::rpc::RpcClient;

/// Topic-0 of the payment contract's announcement event.
pub fn announcement_topic() -> Word {
    abi::event_topic(ANNOUNCEMENT_EVENT_SIGNATURE)
}

/// One raw log entry as returned by `eth_getLogs`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogEntry {
    /// Emitting contract address.
    pub address: String,
    /// Indexed topics.
    pub topics: Vec<String>,
    /// Unindexed data.
    pub data: String,
    /// Block number (hex quantity).
    pub block_number: Option<String>,
    /// Transaction hash.
    pub transaction_hash: Option<String>,
}

/// Decodes a raw log into an announcement record with chain metadata.
pub fn decode_announcement(log: &LogEntry) -> Result<AnnouncementRecord> {
    let mut topics = Vec::with_capacity(log.topics.len());
    for topic in &log.topics {
        let digits = topic.strip_prefix("0x").unwrap_or(topic);
        let bytes = hex::decode(digits)?;
        let word: Word = bytes.try_into().map_err(|_| {
            CloakError::InvalidAnnouncement("log topic is not a 32-byte word".into())
        })?;
        topics.push(word);
    }
    let data = hex::decode(log.data.strip_prefix("0x").unwrap_or(&log.data))?;

    let mut record = AnnouncementRecord::from_log(&topics, &data)?;
    if let Some(hash) = &log.transaction_hash {
        record = record.with_tx_hash(hash.clone());
    }
    if let Some(block) = &log.block_number {
        record = record.with_block_number(quantity_to_u64(block)?);
    }
    Ok(record)
}

/// Fetches and decodes all announcements from the payment contract in the
/// given block range.
///
/// Undecodable logs are skipped with a warning rather than aborting the
/// fetch — scanning tolerates malformed entries by design.
#[instrument(skip(client))]
pub async fn fetch_announcements(
    client: &RpcClient,
    contract: &EthAddress,
    from_block: u64,
    to_block: Option<u64>,
) -> Result<Vec<AnnouncementRecord>> {
    let filter = serde_json::json!({
        "address": contract.to_checksum_string(),
        "topics": [format!("0x{}", hex::encode(announcement_topic()))],
        "fromBlock": format!("0x{from_block:x}"),
        "toBlock": to_block.map_or("latest".to_string(), |block| format!("0x{block:x}")),
    });

    let logs = client.get_logs(filter).await?;
    let mut records = Vec::with_capacity(logs.len());
    for log in &logs {
        match decode_announcement(log) {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(%error, tx = ?log.transaction_hash, "skipping undecodable announcement log")
            }
        }
    }
    info!(count = records.len(), "fetched announcements");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloak_core::abi::word_from_u64;

    #[test]
    fn test_topic_matches_event_signature_hash() {
        assert_eq!(
            hex::encode(announcement_topic()),
            "29877766fa2bfe3b90008d6d92f965eca91cbc5757ed775740e460799fb92219"
        );
    }

    fn sample_log() -> LogEntry {
        let record = AnnouncementRecord::new(
            EthAddress::from_array([0x11; 20]),
            EthAddress::from_array([0x22; 20]),
            word_from_u64(5),
            [0x33; 32],
            [0x44; 32],
        );
        let (topics, data) = record.to_log();
        LogEntry {
            address: "0xcccccccccccccccccccccccccccccccccccccccc".into(),
            topics: topics
                .iter()
                .map(|topic| format!("0x{}", hex::encode(topic)))
                .collect(),
            data: format!("0x{}", hex::encode(&data)),
            block_number: Some("0x10".into()),
            transaction_hash: Some("0xfeed".into()),
        }
    }

    #[test]
    fn test_decode_announcement() {
        let record = decode_announcement(&sample_log()).unwrap();
        assert_eq!(record.receiver, EthAddress::from_array([0x11; 20]));
        assert_eq!(record.token, EthAddress::from_array([0x22; 20]));
        assert_eq!(record.pkx, vec![0x33; 32]);
        assert_eq!(record.block_number, Some(16));
        assert_eq!(record.tx_hash.as_deref(), Some("0xfeed"));
    }

    #[test]
    fn test_decode_rejects_ragged_topics() {
        let mut log = sample_log();
        log.topics[1] = "0x1234".into();
        assert!(decode_announcement(&log).is_err());

        let mut log = sample_log();
        log.topics.pop();
        assert!(decode_announcement(&log).is_err());
    }

    #[test]
    fn test_decode_rejects_foreign_event() {
        let mut log = sample_log();
        log.topics[0] = format!("0x{}", "ee".repeat(32));
        assert!(decode_announcement(&log).is_err());
    }

    #[tokio::test]
    async fn test_fetch_announcements_over_mock_rpc() {
        use wiremock::matchers::{body_partial_json, method};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let log = sample_log();
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"method": "eth_getLogs"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": [log],
            })))
            .mount(&server)
            .await;

        let client = RpcClient::new(server.uri());
        let contract = EthAddress::from_array([0xCC; 20]);
        let records = fetch_announcements(&client, &contract, 0, None).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].receiver, EthAddress::from_array([0x11; 20]));
    }
}
