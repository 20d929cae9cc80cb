//! Transaction data as returned by `eth_getTransactionByHash`.

use serde::{Deserialize, Serialize};

use crate::error::{CloakError, Result};

/// A transaction fetched over JSON-RPC.
///
/// Fields keep the wire's hex-quantity encoding; [`quantity_to_be_bytes`] and
/// [`quantity_to_u64`] interpret them where arithmetic or RLP encoding needs
/// raw values. Optional fields cover the differences between legacy,
/// EIP-2930, and EIP-1559 transactions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionData {
    /// Transaction hash.
    pub hash: String,
    /// Sender address.
    pub from: String,
    /// Recipient address; absent for contract creation.
    pub to: Option<String>,
    /// Sender nonce (hex quantity).
    pub nonce: String,
    /// Gas limit (hex quantity).
    pub gas: String,
    /// Legacy/2930 gas price (hex quantity).
    pub gas_price: Option<String>,
    /// EIP-1559 max fee per gas (hex quantity).
    pub max_fee_per_gas: Option<String>,
    /// EIP-1559 max priority fee per gas (hex quantity).
    pub max_priority_fee_per_gas: Option<String>,
    /// Transferred value in wei (hex quantity).
    pub value: String,
    /// Calldata.
    pub input: String,
    /// Signature v (legacy recovery value, possibly EIP-155 encoded).
    pub v: Option<String>,
    /// Typed-transaction Y parity (0 or 1).
    pub y_parity: Option<String>,
    /// Signature r (hex quantity).
    pub r: String,
    /// Signature s (hex quantity).
    pub s: String,
    /// Transaction type (0x0 legacy, 0x1 EIP-2930, 0x2 EIP-1559).
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    /// Chain id (hex quantity); absent on pre-EIP-155 legacy transactions.
    pub chain_id: Option<String>,
    /// EIP-2930/1559 access list.
    pub access_list: Option<Vec<AccessListEntry>>,
}

/// One access-list entry of a typed transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessListEntry {
    /// Accessed contract address.
    pub address: String,
    /// Accessed storage slots.
    pub storage_keys: Vec<String>,
}

/// Decodes a hex quantity into minimal big-endian bytes (empty for zero).
///
/// JSON-RPC quantities drop leading zeros and may have odd digit counts;
/// RLP integer encoding requires exactly this minimal form.
pub fn quantity_to_be_bytes(quantity: &str) -> Result<Vec<u8>> {
    let digits = quantity.strip_prefix("0x").unwrap_or(quantity);
    if digits.is_empty() {
        return Ok(Vec::new());
    }
    let padded = if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    let bytes = hex::decode(&padded)?;
    let first_nonzero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    Ok(bytes[first_nonzero..].to_vec())
}

/// Parses a hex quantity into a u64.
pub fn quantity_to_u64(quantity: &str) -> Result<u64> {
    let digits = quantity.strip_prefix("0x").unwrap_or(quantity);
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16)
        .map_err(|_| CloakError::InvalidTransaction(format!("bad hex quantity: {quantity}")))
}
