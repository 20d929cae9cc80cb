//! Recursive-length-prefix encoding.
//!
//! Only the encoding direction is needed — signing payloads are built
//! locally, never parsed. Integers encode as their minimal big-endian bytes
//! (the empty string for zero), per the consensus rules.

/// One RLP item: a byte string or a list of items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RlpItem {
    /// A byte string.
    Bytes(Vec<u8>),
    /// A list of items.
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// A byte-string item.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// An unsigned-integer item from minimal big-endian bytes.
    ///
    /// The caller strips leading zeros (see
    /// `cloak_core::types::quantity_to_be_bytes`); zero is the empty string.
    pub fn uint(minimal_be: Vec<u8>) -> Self {
        Self::Bytes(minimal_be)
    }

    /// A u64 item.
    pub fn uint64(value: u64) -> Self {
        let bytes = value.to_be_bytes();
        let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        Self::Bytes(bytes[first..].to_vec())
    }

    /// A list item.
    pub fn list(items: Vec<RlpItem>) -> Self {
        Self::List(items)
    }

    /// Encodes the item.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            RlpItem::Bytes(bytes) => {
                if bytes.len() == 1 && bytes[0] < 0x80 {
                    bytes.clone()
                } else {
                    let mut out = encode_length(bytes.len(), 0x80);
                    out.extend_from_slice(bytes);
                    out
                }
            }
            RlpItem::List(items) => {
                let mut payload = Vec::new();
                for item in items {
                    payload.extend_from_slice(&item.encode());
                }
                let mut out = encode_length(payload.len(), 0xC0);
                out.extend_from_slice(&payload);
                out
            }
        }
    }
}

fn encode_length(length: usize, offset: u8) -> Vec<u8> {
    if length < 56 {
        vec![offset + length as u8]
    } else {
        let length_bytes = length.to_be_bytes();
        let first = length_bytes
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(length_bytes.len());
        let minimal = &length_bytes[first..];
        let mut out = vec![offset + 55 + minimal.len() as u8];
        out.extend_from_slice(minimal);
        out
    }
}
