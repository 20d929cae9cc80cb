//! Minimal Solidity ABI encoding.
//!
//! The on-chain collaborators (payment contract, stealth key registry) fix
//! their calldata, event, and digest layouts. This module implements exactly
//! the subset of the ABI those interfaces use: `uint256`, `address`,
//! `bytes32`, and dynamic `bytes`, plus selectors and event topics.
//!
//! Encoding is head/tail: every argument owns one 32-byte head word; dynamic
//! arguments store an offset there and append `len || data || padding` to the
//! tail.

use sha3::{Digest, Keccak256};

use crate::constants::{ABI_WORD_SIZE, ETH_ADDRESS_SIZE};
use crate::error::{CloakError, Result};
use crate::types::EthAddress;

/// One 32-byte ABI word.
pub type Word = [u8; ABI_WORD_SIZE];

/// Computes keccak256 (the Ethereum hash, not SHA3-256 — different padding).
pub fn keccak256(input: &[u8]) -> Word {
    let mut hasher = Keccak256::new();
    Digest::update(&mut hasher, input);
    hasher.finalize().into()
}

/// Returns the 4-byte function selector for a canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Returns the topic-0 word for a canonical event signature.
pub fn event_topic(signature: &str) -> Word {
    keccak256(signature.as_bytes())
}

// ═══════════════════════════════════════════════════════════════════════════════
// WORD CONSTRUCTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Encodes a u64 as a right-aligned word.
pub fn word_from_u64(value: u64) -> Word {
    let mut word = [0u8; ABI_WORD_SIZE];
    word[ABI_WORD_SIZE - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Encodes a u128 as a right-aligned word.
pub fn word_from_u128(value: u128) -> Word {
    let mut word = [0u8; ABI_WORD_SIZE];
    word[ABI_WORD_SIZE - 16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Encodes an address as a right-aligned word.
pub fn word_from_address(address: &EthAddress) -> Word {
    let mut word = [0u8; ABI_WORD_SIZE];
    word[ABI_WORD_SIZE - ETH_ADDRESS_SIZE..].copy_from_slice(address.as_bytes());
    word
}

/// Right-aligns up to 32 big-endian bytes into a word (uint semantics).
pub fn word_from_be_bytes(bytes: &[u8]) -> Result<Word> {
    if bytes.len() > ABI_WORD_SIZE {
        return Err(CloakError::InternalError(format!(
            "value of {} bytes does not fit an ABI word",
            bytes.len()
        )));
    }
    let mut word = [0u8; ABI_WORD_SIZE];
    word[ABI_WORD_SIZE - bytes.len()..].copy_from_slice(bytes);
    Ok(word)
}

/// Extracts the low 20 bytes of a word as an address.
pub fn word_to_address(word: &Word) -> EthAddress {
    let mut bytes = [0u8; ETH_ADDRESS_SIZE];
    bytes.copy_from_slice(&word[ABI_WORD_SIZE - ETH_ADDRESS_SIZE..]);
    EthAddress::from_array(bytes)
}

/// Interprets a word as a u64, failing if high bytes are set.
pub fn word_to_u64(word: &Word) -> Result<u64> {
    if word[..ABI_WORD_SIZE - 8].iter().any(|&b| b != 0) {
        return Err(CloakError::InvalidResponse(
            "word value exceeds u64 range".into(),
        ));
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&word[ABI_WORD_SIZE - 8..]);
    Ok(u64::from_be_bytes(bytes))
}

/// Splits return data into words, failing on ragged lengths.
pub fn split_words(data: &[u8]) -> Result<Vec<Word>> {
    if data.len() % ABI_WORD_SIZE != 0 {
        return Err(CloakError::InvalidResponse(format!(
            "ABI data length {} is not a multiple of {}",
            data.len(),
            ABI_WORD_SIZE
        )));
    }
    Ok(data
        .chunks_exact(ABI_WORD_SIZE)
        .map(|chunk| {
            let mut word = [0u8; ABI_WORD_SIZE];
            word.copy_from_slice(chunk);
            word
        })
        .collect())
}

// ═══════════════════════════════════════════════════════════════════════════════
// ARGUMENT ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// One ABI argument value.
#[derive(Debug, Clone)]
pub enum AbiValue<'a> {
    /// A `uint256` (or any right-aligned numeric word).
    Uint(Word),
    /// An `address`.
    Address(EthAddress),
    /// A `bytes32` (left-aligned fixed bytes).
    FixedBytes(Word),
    /// Dynamic `bytes`.
    Bytes(&'a [u8]),
}

/// ABI-encodes an argument list (the layout of `abi.encode`).
pub fn encode(values: &[AbiValue<'_>]) -> Vec<u8> {
    let head_size = values.len() * ABI_WORD_SIZE;
    let mut head = Vec::with_capacity(head_size);
    let mut tail: Vec<u8> = Vec::new();

    for value in values {
        match value {
            AbiValue::Uint(word) | AbiValue::FixedBytes(word) => head.extend_from_slice(word),
            AbiValue::Address(address) => head.extend_from_slice(&word_from_address(address)),
            AbiValue::Bytes(bytes) => {
                let offset = head_size + tail.len();
                head.extend_from_slice(&word_from_u64(offset as u64));
                tail.extend_from_slice(&word_from_u64(bytes.len() as u64));
                tail.extend_from_slice(bytes);
                let padding = (ABI_WORD_SIZE - bytes.len() % ABI_WORD_SIZE) % ABI_WORD_SIZE;
                tail.extend(std::iter::repeat(0u8).take(padding));
            }
        }
    }

    head.extend(tail);
    head
}

/// Builds calldata: selector followed by encoded arguments.
pub fn encode_call(signature: &str, values: &[AbiValue<'_>]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + values.len() * ABI_WORD_SIZE);
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(&encode(values));
    data
}
