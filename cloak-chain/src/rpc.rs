//! JSON-RPC client.
//!
//! A thin wrapper over `reqwest` speaking raw JSON-RPC 2.0 — enough chain
//! access for registry reads, transaction fetches, and log queries, without
//! pulling a full web3 stack.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use cloak_core::error::{CloakError, Result};
use cloak_core::traits::{ChainReader, RegistryTransport};
use cloak_core::types::{quantity_to_u64, EthAddress, TransactionData};

use crate::logs::LogEntry;

/// RPC client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Node endpoint URL.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl RpcConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_seconds: 30,
        }
    }
}

/// JSON-RPC client for an EVM node.
pub struct RpcClient {
    config: RpcConfig,
    http: reqwest::Client,
}

impl RpcClient {
    /// Creates a client for the given endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_config(RpcConfig::new(url))
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: RpcConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("reqwest client construction is infallible with static options");
        Self { config, http }
    }

    /// Issues one JSON-RPC request and returns its `result`.
    #[instrument(skip(self, params))]
    pub async fn request(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CloakError::HttpError(e.to_string()))?;

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CloakError::InvalidResponse(format!("non-JSON response: {e}")))?;

        if let Some(error) = payload.get("error") {
            if !error.is_null() {
                return Err(CloakError::RpcError(error.to_string()));
            }
        }
        payload
            .get("result")
            .cloned()
            .ok_or_else(|| CloakError::InvalidResponse("response carries no result".into()))
    }

    /// Returns the node's chain id.
    pub async fn chain_id(&self) -> Result<u64> {
        let result = self.request("eth_chainId", serde_json::json!([])).await?;
        let quantity = result
            .as_str()
            .ok_or_else(|| CloakError::InvalidResponse("eth_chainId is not a string".into()))?;
        quantity_to_u64(quantity)
    }

    /// Executes a read-only contract call.
    pub async fn eth_call(&self, to: &EthAddress, data: &[u8]) -> Result<Vec<u8>> {
        let params = serde_json::json!([
            {
                "to": to.to_checksum_string(),
                "data": format!("0x{}", hex::encode(data)),
            },
            "latest",
        ]);
        let result = self.request("eth_call", params).await?;
        let returned = result
            .as_str()
            .ok_or_else(|| CloakError::InvalidResponse("eth_call result is not a string".into()))?;
        Ok(hex::decode(returned.strip_prefix("0x").unwrap_or(returned))?)
    }

    /// Fetches a transaction; `None` when the node does not know the hash.
    pub async fn transaction_by_hash(&self, hash: &str) -> Result<Option<TransactionData>> {
        let result = self
            .request("eth_getTransactionByHash", serde_json::json!([hash]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        let tx: TransactionData = serde_json::from_value(result)?;
        debug!(hash, "fetched transaction");
        Ok(Some(tx))
    }

    /// Fetches logs for the given filter object.
    pub async fn get_logs(&self, filter: serde_json::Value) -> Result<Vec<LogEntry>> {
        let result = self.request("eth_getLogs", serde_json::json!([filter])).await?;
        Ok(serde_json::from_value(result)?)
    }
}

#[async_trait]
impl RegistryTransport for RpcClient {
    async fn call(&self, to: &EthAddress, data: Vec<u8>) -> Result<Vec<u8>> {
        self.eth_call(to, &data).await
    }

    async fn submit(&self, _to: &EthAddress, _data: Vec<u8>) -> Result<String> {
        // A bare RPC endpoint holds no key material; submission belongs to
        // the external signing pipeline
        Err(CloakError::MissingSigner)
    }
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn transaction_by_hash(&self, hash: &str) -> Result<Option<TransactionData>> {
        RpcClient::transaction_by_hash(self, hash).await
    }

    async fn chain_id(&self) -> Result<u64> {
        RpcClient::chain_id(self).await
    }
}
