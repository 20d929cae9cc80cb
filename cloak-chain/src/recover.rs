//! Sender public-key recovery.
//!
//! A recipient can learn any account's public key from a transaction that
//! account signed: rebuild the exact payload that was signed, then run ECDSA
//! public-key recovery against the transaction's signature. The recovered
//! key is verified by re-deriving the sender address before it is returned.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use tracing::{debug, instrument};

use cloak_core::error::{CloakError, Result};
use cloak_core::traits::ChainReader;
use cloak_core::types::{
    quantity_to_be_bytes, quantity_to_u64, AccessListEntry, EthAddress, TransactionData,
};
use cloak_crypto::{keccak256, KeyPair};

use crate::rlp::RlpItem;

/// Computes the digest the sender signed for this transaction.
///
/// Legacy payloads follow EIP-155 when a chain id is known (from the
/// transaction or recoverable from v); typed payloads (EIP-2930/1559) are
/// the type byte over the RLP of their field list.
pub fn signing_digest(tx: &TransactionData) -> Result<[u8; 32]> {
    let tx_type = tx
        .tx_type
        .as_deref()
        .map(quantity_to_u64)
        .transpose()?
        .unwrap_or(0);

    let nonce = RlpItem::uint(quantity_to_be_bytes(&tx.nonce)?);
    let gas = RlpItem::uint(quantity_to_be_bytes(&tx.gas)?);
    let value = RlpItem::uint(quantity_to_be_bytes(&tx.value)?);
    let data = RlpItem::bytes(decode_hex_blob(&tx.input)?);
    let to = match tx.to.as_deref() {
        // Contract creation signs an empty byte string in the `to` slot
        Some(to) => RlpItem::bytes(EthAddress::from_hex(to)?.as_bytes().to_vec()),
        None => RlpItem::bytes(Vec::new()),
    };

    match tx_type {
        0 => {
            let gas_price = RlpItem::uint(quantity_to_be_bytes(required(
                tx.gas_price.as_deref(),
                "gasPrice",
            )?)?);
            let mut fields = vec![nonce, gas_price, gas, to, value, data];
            if let Some(chain_id) = legacy_chain_id(tx)? {
                fields.push(RlpItem::uint64(chain_id));
                fields.push(RlpItem::bytes(Vec::new()));
                fields.push(RlpItem::bytes(Vec::new()));
            }
            Ok(keccak256(&RlpItem::list(fields).encode()))
        }
        1 => {
            let chain_id = quantity_to_u64(required(tx.chain_id.as_deref(), "chainId")?)?;
            let gas_price = RlpItem::uint(quantity_to_be_bytes(required(
                tx.gas_price.as_deref(),
                "gasPrice",
            )?)?);
            let fields = vec![
                RlpItem::uint64(chain_id),
                nonce,
                gas_price,
                gas,
                to,
                value,
                data,
                access_list_item(tx.access_list.as_deref())?,
            ];
            Ok(keccak256(&typed_payload(0x01, &RlpItem::list(fields))))
        }
        2 => {
            let chain_id = quantity_to_u64(required(tx.chain_id.as_deref(), "chainId")?)?;
            let priority_fee = RlpItem::uint(quantity_to_be_bytes(required(
                tx.max_priority_fee_per_gas.as_deref(),
                "maxPriorityFeePerGas",
            )?)?);
            let max_fee = RlpItem::uint(quantity_to_be_bytes(required(
                tx.max_fee_per_gas.as_deref(),
                "maxFeePerGas",
            )?)?);
            let fields = vec![
                RlpItem::uint64(chain_id),
                nonce,
                priority_fee,
                max_fee,
                gas,
                to,
                value,
                data,
                access_list_item(tx.access_list.as_deref())?,
            ];
            Ok(keccak256(&typed_payload(0x02, &RlpItem::list(fields))))
        }
        other => Err(CloakError::InvalidTransaction(format!(
            "unsupported transaction type {other}"
        ))),
    }
}

/// Recovers the sender's key pair from a fetched transaction.
///
/// # Errors
/// `RecoveryFailed` when the signature does not recover, or when the
/// recovered key does not re-derive the transaction's `from` address.
#[instrument(skip(tx), fields(hash = %tx.hash))]
pub fn recover_sender(tx: &TransactionData) -> Result<KeyPair> {
    let digest = signing_digest(tx)?;

    let r = pad_scalar(&quantity_to_be_bytes(&tx.r)?)?;
    let s = pad_scalar(&quantity_to_be_bytes(&tx.s)?)?;
    let signature = Signature::from_scalars(r, s)
        .map_err(|_| CloakError::RecoveryFailed("signature scalars out of range".into()))?;

    let recovery = RecoveryId::from_byte(recovery_byte(tx)?)
        .ok_or_else(|| CloakError::RecoveryFailed("invalid recovery id".into()))?;

    let verifying_key = VerifyingKey::recover_from_prehash(&digest, &signature, recovery)
        .map_err(|_| CloakError::RecoveryFailed("signature does not recover a key".into()))?;

    let pair = KeyPair::from_public_bytes(verifying_key.to_encoded_point(false).as_bytes())?;
    let from = EthAddress::from_hex(&tx.from)?;
    if pair.address() != from {
        return Err(CloakError::RecoveryFailed(
            "recovered key does not derive the sender address".into(),
        ));
    }
    debug!(sender = %from, "recovered sender public key");
    Ok(pair)
}

/// Fetches a transaction and recovers its sender's key pair.
///
/// # Errors
/// `RecoveryFailed` if the hash is malformed or the transaction cannot be
/// fetched.
pub async fn keypair_from_transaction<C>(chain: &C, tx_hash: &str) -> Result<KeyPair>
where
    C: ChainReader + ?Sized,
{
    let digits = tx_hash.strip_prefix("0x").unwrap_or("");
    if digits.len() != 64 || hex::decode(digits).is_err() {
        return Err(CloakError::RecoveryFailed(
            "malformed transaction hash".into(),
        ));
    }

    let tx = chain
        .transaction_by_hash(tx_hash)
        .await
        .map_err(|e| CloakError::RecoveryFailed(format!("transaction fetch failed: {e}")))?
        .ok_or_else(|| CloakError::RecoveryFailed("transaction not found".into()))?;
    recover_sender(&tx)
}

fn typed_payload(type_byte: u8, fields: &RlpItem) -> Vec<u8> {
    let mut payload = vec![type_byte];
    payload.extend_from_slice(&fields.encode());
    payload
}

fn access_list_item(entries: Option<&[AccessListEntry]>) -> Result<RlpItem> {
    let mut items = Vec::new();
    for entry in entries.unwrap_or(&[]) {
        let address = EthAddress::from_hex(&entry.address)?.as_bytes().to_vec();
        let mut keys = Vec::with_capacity(entry.storage_keys.len());
        for key in &entry.storage_keys {
            let bytes = decode_hex_blob(key)?;
            if bytes.len() != 32 {
                return Err(CloakError::InvalidTransaction(
                    "storage keys must be 32 bytes".into(),
                ));
            }
            keys.push(RlpItem::bytes(bytes));
        }
        items.push(RlpItem::list(vec![
            RlpItem::bytes(address),
            RlpItem::list(keys),
        ]));
    }
    Ok(RlpItem::list(items))
}

/// The chain id a legacy transaction was signed for, from the explicit field
/// or reversed out of an EIP-155 v. Pre-155 signatures have none.
fn legacy_chain_id(tx: &TransactionData) -> Result<Option<u64>> {
    if let Some(chain_id) = tx.chain_id.as_deref() {
        return Ok(Some(quantity_to_u64(chain_id)?));
    }
    let v = quantity_to_u64(required(tx.v.as_deref(), "v")?)?;
    if v >= 35 {
        Ok(Some((v - 35) / 2))
    } else {
        Ok(None)
    }
}

fn recovery_byte(tx: &TransactionData) -> Result<u8> {
    let tx_type = tx
        .tx_type
        .as_deref()
        .map(quantity_to_u64)
        .transpose()?
        .unwrap_or(0);

    let raw = if tx_type > 0 {
        let parity = tx.y_parity.as_deref().or(tx.v.as_deref());
        quantity_to_u64(required(parity, "yParity")?)?
    } else {
        let v = quantity_to_u64(required(tx.v.as_deref(), "v")?)?;
        match v {
            0 | 1 => v,
            27 | 28 => v - 27,
            v if v >= 35 => (v - 35) % 2,
            _ => {
                return Err(CloakError::InvalidTransaction(format!(
                    "unexpected legacy v value {v}"
                )))
            }
        }
    };
    u8::try_from(raw)
        .map_err(|_| CloakError::InvalidTransaction(format!("recovery value {raw} exceeds u8")))
}

fn pad_scalar(minimal: &[u8]) -> Result<[u8; 32]> {
    if minimal.len() > 32 {
        return Err(CloakError::RecoveryFailed(
            "signature scalar exceeds 32 bytes".into(),
        ));
    }
    let mut padded = [0u8; 32];
    padded[32 - minimal.len()..].copy_from_slice(minimal);
    Ok(padded)
}

fn decode_hex_blob(blob: &str) -> Result<Vec<u8>> {
    let digits = blob.strip_prefix("0x").unwrap_or(blob);
    Ok(hex::decode(digits)?)
}

fn required<'a>(field: Option<&'a str>, name: &str) -> Result<&'a str> {
    field.ok_or_else(|| CloakError::InvalidTransaction(format!("missing field {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    /// The worked example from the EIP-155 specification.
    #[test]
    fn test_eip155_signing_digest_vector() {
        let tx = TransactionData {
            hash: "0x0".into(),
            from: "0x0000000000000000000000000000000000000000".into(),
            to: Some("0x3535353535353535353535353535353535353535".into()),
            nonce: "0x9".into(),
            gas: "0x5208".into(),
            gas_price: Some("0x4a817c800".into()),
            value: "0xde0b6b3a7640000".into(),
            input: "0x".into(),
            chain_id: Some("0x1".into()),
            ..Default::default()
        };
        assert_eq!(
            hex::encode(signing_digest(&tx).unwrap()),
            "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn test_legacy_chain_id_from_v() {
        let tx = TransactionData {
            v: Some("0x25".into()), // 37 = 1 * 2 + 35
            ..Default::default()
        };
        assert_eq!(legacy_chain_id(&tx).unwrap(), Some(1));

        let pre155 = TransactionData {
            v: Some("0x1b".into()), // 27
            ..Default::default()
        };
        assert_eq!(legacy_chain_id(&pre155).unwrap(), None);
    }

    fn signer(seed: u64) -> (SigningKey, KeyPair, String) {
        let pair = KeyPair::generate_with_rng(&mut ChaCha20Rng::seed_from_u64(seed));
        let private = pair.private_key_hex().unwrap();
        let bytes = hex::decode(&private[2..]).unwrap();
        let signing = SigningKey::from_slice(&bytes).unwrap();
        let from = pair.address().to_checksum_string();
        (signing, pair, from)
    }

    fn unsigned_eip1559(from: &str) -> TransactionData {
        TransactionData {
            hash: "0xaaaa".into(),
            from: from.into(),
            to: Some("0x3535353535353535353535353535353535353535".into()),
            nonce: "0x2".into(),
            gas: "0x5208".into(),
            max_fee_per_gas: Some("0x4a817c800".into()),
            max_priority_fee_per_gas: Some("0x3b9aca00".into()),
            value: "0xde0b6b3a7640000".into(),
            input: "0x".into(),
            tx_type: Some("0x2".into()),
            chain_id: Some("0x1".into()),
            access_list: Some(Vec::new()),
            ..Default::default()
        }
    }

    fn sign(tx: &mut TransactionData, signing: &SigningKey) {
        let digest = signing_digest(tx).unwrap();
        let (signature, recovery) = signing.sign_prehash_recoverable(&digest).unwrap();
        let bytes = signature.to_bytes();
        tx.r = format!("0x{}", hex::encode(&bytes[..32]));
        tx.s = format!("0x{}", hex::encode(&bytes[32..]));
        tx.y_parity = Some(format!("0x{:x}", recovery.to_byte()));
    }

    #[test]
    fn test_recover_sender_roundtrip() {
        let (signing, pair, from) = signer(1);
        let mut tx = unsigned_eip1559(&from);
        sign(&mut tx, &signing);

        let recovered = recover_sender(&tx).unwrap();
        assert_eq!(recovered.public_key_hex(), pair.public_key_hex());
        assert_eq!(
            recovered.address().to_checksum_string(),
            pair.address().to_checksum_string()
        );
    }

    #[test]
    fn test_recover_sender_with_access_list() {
        let (signing, pair, from) = signer(2);
        let mut tx = unsigned_eip1559(&from);
        tx.access_list = Some(vec![AccessListEntry {
            address: "0x1111111111111111111111111111111111111111".into(),
            storage_keys: vec![format!("0x{}", "22".repeat(32))],
        }]);
        sign(&mut tx, &signing);

        let recovered = recover_sender(&tx).unwrap();
        assert_eq!(recovered.public_key_hex(), pair.public_key_hex());
    }

    #[test]
    fn test_recover_sender_legacy_eip155() {
        let (signing, pair, from) = signer(3);
        let mut tx = TransactionData {
            hash: "0xbbbb".into(),
            from,
            to: Some("0x3535353535353535353535353535353535353535".into()),
            nonce: "0x0".into(),
            gas: "0x5208".into(),
            gas_price: Some("0x4a817c800".into()),
            value: "0x0".into(),
            input: "0x".into(),
            chain_id: Some("0x1".into()),
            ..Default::default()
        };
        let digest = signing_digest(&tx).unwrap();
        let (signature, recovery) = signing.sign_prehash_recoverable(&digest).unwrap();
        let bytes = signature.to_bytes();
        tx.r = format!("0x{}", hex::encode(&bytes[..32]));
        tx.s = format!("0x{}", hex::encode(&bytes[32..]));
        tx.v = Some(format!("0x{:x}", 35 + 2 * 1 + u64::from(recovery.to_byte())));

        let recovered = recover_sender(&tx).unwrap();
        assert_eq!(recovered.public_key_hex(), pair.public_key_hex());
    }

    #[test]
    fn test_recover_sender_rejects_wrong_from() {
        let (signing, _, from) = signer(4);
        let mut tx = unsigned_eip1559(&from);
        sign(&mut tx, &signing);
        tx.from = "0x1111111111111111111111111111111111111111".into();

        assert!(matches!(
            recover_sender(&tx),
            Err(CloakError::RecoveryFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_hash_fails_recovery() {
        struct NoChain;
        #[async_trait::async_trait]
        impl ChainReader for NoChain {
            async fn transaction_by_hash(&self, _: &str) -> Result<Option<TransactionData>> {
                Ok(None)
            }
            async fn chain_id(&self) -> Result<u64> {
                Ok(1)
            }
        }

        let result = keypair_from_transaction(&NoChain, "0x1234").await;
        assert!(matches!(result, Err(CloakError::RecoveryFailed(_))));

        let missing = format!("0x{}", "ab".repeat(32));
        let result = keypair_from_transaction(&NoChain, &missing).await;
        assert!(matches!(result, Err(CloakError::RecoveryFailed(_))));
    }
}
