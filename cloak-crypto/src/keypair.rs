//! secp256k1 key pairs.
//!
//! [`KeyPair`] wraps a public key with an optional private half and carries
//! every curve operation the stealth protocol needs: address derivation,
//! compression, scalar multiplication, and the ECDH payload encryption that
//! moves the per-send secret through public logs.
//!
//! ## Shared-secret construction
//!
//! ```text
//! shared_point = scalar · point            (ephemeral_sk · recipient_pk,
//!                                           or recipient_sk · ephemeral_pk)
//! shared_secret = SHA-256(X coordinate of shared_point)
//! ```
//!
//! Only the X coordinate is hashed — the compressed serialization minus its
//! parity byte. Negating a point keeps its X coordinate, so a scanner that
//! reconstructs an ephemeral key from a bare X coordinate with an assumed
//! parity still derives the identical secret. Announcements can therefore
//! store 32 bytes instead of 33; see `cloak-scanner`.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{NonZeroScalar, PublicKey, Scalar, SecretKey};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use cloak_core::constants::{
    BLOCKED_PRIVATE_KEYS, BLOCKED_PUBLIC_KEYS, COORDINATE_SIZE, ETH_ADDRESS_SIZE, PARITY_EVEN,
    PARITY_ODD, PRIVATE_KEY_HEX_LENGTH, PUBLIC_KEY_HEX_LENGTH, UNCOMPRESSED_PUBLIC_KEY_SIZE,
};
use cloak_core::error::{CloakError, Result};
use cloak_core::types::{CompressedPublicKey, EncryptedPayload, EthAddress};

use crate::hash::{keccak256, sha256};
use crate::secret::RandomSecret;

/// A secp256k1 key, either public-only or public + private.
///
/// Immutable value object: every operation returns a new pair. The private
/// half zeroizes itself on drop and never appears in `Debug` output.
/// Operations that need the private half fail with `MissingPrivateKey` on
/// public-only instances.
#[derive(Clone)]
pub struct KeyPair {
    public: PublicKey,
    private: Option<SecretKey>,
}

impl KeyPair {
    // ═══════════════════════════════════════════════════════════════════════════
    // CONSTRUCTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Generates a fresh key pair from the OS RNG.
    pub fn generate() -> Self {
        Self::generate_with_rng(&mut OsRng)
    }

    /// Generates a key pair from the given RNG (seeded RNGs for tests).
    pub fn generate_with_rng(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        let private = SecretKey::random(rng);
        Self {
            public: private.public_key(),
            private: Some(private),
        }
    }

    /// Constructs from a private key as `0x`-prefixed fixed-width hex.
    ///
    /// # Errors
    /// - `InvalidKeyFormat` unless the input is 66 characters of valid hex,
    ///   or if the scalar is not below the curve order
    /// - `BlockedKey` for the zero scalar
    pub fn from_private_hex(private_key: &str) -> Result<Self> {
        if !private_key.starts_with("0x") || private_key.len() != PRIVATE_KEY_HEX_LENGTH {
            return Err(CloakError::InvalidKeyFormat(format!(
                "private key must be 0x plus {} hex digits",
                PRIVATE_KEY_HEX_LENGTH - 2
            )));
        }
        if is_blocked(private_key, BLOCKED_PRIVATE_KEYS) {
            return Err(CloakError::BlockedKey(
                "the zero private key is disallowed".into(),
            ));
        }
        let bytes = hex::decode(&private_key[2..])
            .map_err(|e| CloakError::InvalidKeyFormat(format!("private key is not hex: {e}")))?;
        let private = SecretKey::from_slice(&bytes).map_err(|_| {
            CloakError::InvalidKeyFormat(
                "private key must be a nonzero scalar below the curve order".into(),
            )
        })?;
        Ok(Self {
            public: private.public_key(),
            private: Some(private),
        })
    }

    /// Constructs a public-only pair from an uncompressed public key as
    /// `0x04`-prefixed fixed-width hex.
    ///
    /// # Errors
    /// - `InvalidKeyFormat` unless the input is 132 characters of valid hex
    ///   with the uncompressed prefix
    /// - `BlockedKey` for the all-zero public key
    /// - `InvalidPoint` if the coordinates are not on secp256k1
    pub fn from_public_hex(public_key: &str) -> Result<Self> {
        if !public_key.starts_with("0x") || public_key.len() != PUBLIC_KEY_HEX_LENGTH {
            return Err(CloakError::InvalidKeyFormat(format!(
                "public key must be 0x plus {} hex digits",
                PUBLIC_KEY_HEX_LENGTH - 2
            )));
        }
        if is_blocked(public_key, BLOCKED_PUBLIC_KEYS) {
            return Err(CloakError::BlockedKey(
                "the all-zero public key is disallowed".into(),
            ));
        }
        let bytes = hex::decode(&public_key[2..])
            .map_err(|e| CloakError::InvalidKeyFormat(format!("public key is not hex: {e}")))?;
        if bytes[0] != 0x04 {
            return Err(CloakError::InvalidKeyFormat(
                "public key must start with the 0x04 uncompressed prefix".into(),
            ));
        }
        let public = PublicKey::from_sec1_bytes(&bytes).map_err(|_| {
            CloakError::InvalidPoint("public key is not a point on secp256k1".into())
        })?;
        Ok(Self {
            public,
            private: None,
        })
    }

    /// Constructs a public-only pair from raw uncompressed SEC1 bytes.
    pub fn from_public_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != UNCOMPRESSED_PUBLIC_KEY_SIZE {
            return Err(CloakError::InvalidKeyFormat(format!(
                "public key must be {UNCOMPRESSED_PUBLIC_KEY_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        Self::from_public_hex(&format!("0x{}", hex::encode(bytes)))
    }

    /// Reconstructs a public-only pair from a compressed key.
    pub fn from_compressed(compressed: &CompressedPublicKey) -> Result<Self> {
        Self::decompress_with_parity(compressed.x(), compressed.prefix())
    }

    /// Reconstructs a public-only pair from an X coordinate and an explicit
    /// Y-parity prefix (2 = even, 3 = odd).
    ///
    /// Use this wherever the parity is load-bearing (anything feeding an
    /// address computation).
    pub fn decompress_with_parity(x: &[u8; COORDINATE_SIZE], parity: u8) -> Result<Self> {
        if parity != PARITY_EVEN && parity != PARITY_ODD {
            return Err(CloakError::InvalidKeyFormat(format!(
                "parity prefix must be {PARITY_EVEN} or {PARITY_ODD}, got {parity}"
            )));
        }
        if x.iter().all(|&b| b == 0) {
            return Err(CloakError::BlockedKey(
                "the all-zero X coordinate is disallowed".into(),
            ));
        }
        let mut sec1 = [0u8; 1 + COORDINATE_SIZE];
        sec1[0] = parity;
        sec1[1..].copy_from_slice(x);
        let public = PublicKey::from_sec1_bytes(&sec1).map_err(|_| {
            CloakError::InvalidPoint("no secp256k1 point has this X coordinate".into())
        })?;
        Ok(Self {
            public,
            private: None,
        })
    }

    /// Reconstructs a public-only pair from a bare X coordinate, assuming an
    /// even Y.
    ///
    /// Only valid where the parity provably does not matter — shared-secret
    /// computation hashes the X coordinate alone, so a scanner decrypting
    /// under the wrong parity recovers the identical plaintext. Never feed
    /// the result into an address computation.
    pub fn decompress_assuming_even(x: &[u8; COORDINATE_SIZE]) -> Result<Self> {
        Self::decompress_with_parity(x, PARITY_EVEN)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns true if this pair carries a private key.
    pub fn has_private_key(&self) -> bool {
        self.private.is_some()
    }

    /// Returns a public-only copy of this pair.
    pub fn public_only(&self) -> Self {
        Self {
            public: self.public,
            private: None,
        }
    }

    /// Returns the uncompressed public key as `0x`-prefixed hex (132 chars).
    pub fn public_key_hex(&self) -> String {
        format!(
            "0x{}",
            hex::encode(self.public.to_encoded_point(false).as_bytes())
        )
    }

    /// Returns the uncompressed public key bytes (65 bytes).
    pub fn to_uncompressed_bytes(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] {
        let mut bytes = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(self.public.to_encoded_point(false).as_bytes());
        bytes
    }

    /// Returns the private key as `0x`-prefixed fixed-width hex (66 chars).
    ///
    /// The encoding is always 64 digits: scalars whose big-endian form has
    /// leading zero bytes stay left-padded.
    pub fn private_key_hex(&self) -> Result<String> {
        let private = self.private.as_ref().ok_or(CloakError::MissingPrivateKey)?;
        Ok(format!("0x{}", hex::encode(private.to_bytes())))
    }

    /// Returns the Ethereum address: the low 20 bytes of keccak256(X ‖ Y).
    pub fn address(&self) -> EthAddress {
        let encoded = self.public.to_encoded_point(false);
        let digest = keccak256(&encoded.as_bytes()[1..]);
        let mut bytes = [0u8; ETH_ADDRESS_SIZE];
        bytes.copy_from_slice(&digest[32 - ETH_ADDRESS_SIZE..]);
        EthAddress::from_array(bytes)
    }

    /// Returns the compressed form: Y-parity prefix plus X coordinate.
    pub fn compress(&self) -> CompressedPublicKey {
        let encoded = self.public.to_encoded_point(true);
        let bytes = encoded.as_bytes();
        let mut x = [0u8; COORDINATE_SIZE];
        x.copy_from_slice(&bytes[1..]);
        CompressedPublicKey::new(bytes[0], x).expect("SEC1 compressed tag is always 2 or 3")
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SCALAR MULTIPLICATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns a public-only pair holding `scalar · public_key`.
    ///
    /// # Errors
    /// `InvalidKeyFormat` for malformed or out-of-range scalars,
    /// `BlockedKey` for the zero scalar.
    pub fn mul_public_key(&self, scalar_hex: &str) -> Result<Self> {
        let scalar = parse_scalar(scalar_hex)?;
        let product = self.public.to_projective() * scalar.as_ref();
        let public = PublicKey::from_affine(product.to_affine()).map_err(|_| {
            CloakError::InvalidPoint("scalar multiplication produced the identity".into())
        })?;
        Ok(Self {
            public,
            private: None,
        })
    }

    /// Returns a new pair holding `(private_key · scalar) mod n` and its
    /// public key.
    ///
    /// The reduction mod n is mandatory — the raw product leaves the scalar
    /// domain — and the scalar type performs it on every multiply. The result
    /// re-encodes fixed-width (see [`Self::private_key_hex`]).
    pub fn mul_private_key(&self, scalar_hex: &str) -> Result<Self> {
        let private = self.private.as_ref().ok_or(CloakError::MissingPrivateKey)?;
        let scalar = parse_scalar(scalar_hex)?;
        let product: Scalar = private.to_nonzero_scalar().as_ref() * scalar.as_ref();
        let product = Option::<NonZeroScalar>::from(NonZeroScalar::new(product))
            .ok_or_else(|| CloakError::BlockedKey("derived private key is zero".into()))?;
        let private = SecretKey::from(product);
        Ok(Self {
            public: private.public_key(),
            private: Some(private),
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PAYLOAD ENCRYPTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Encrypts a random secret under this public key.
    ///
    /// Generates a fresh ephemeral key pair (one per payload, never reused),
    /// derives the X-only shared secret, and XORs it over the secret.
    pub fn encrypt(&self, secret: &RandomSecret) -> Result<EncryptedPayload> {
        self.encrypt_with_rng(secret, &mut OsRng)
    }

    /// Encrypts with an ephemeral key drawn from the given RNG.
    pub fn encrypt_with_rng(
        &self,
        secret: &RandomSecret,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<EncryptedPayload> {
        let ephemeral = SecretKey::random(rng);
        let shared = shared_secret(&ephemeral.to_nonzero_scalar(), &self.public)?;

        let mut ciphertext = secret.to_bytes();
        for (byte, mask) in ciphertext.iter_mut().zip(shared.iter()) {
            *byte ^= mask;
        }

        let ephemeral_public = ephemeral.public_key().to_encoded_point(false);
        EncryptedPayload::new(ephemeral_public.as_bytes(), &ciphertext)
    }

    /// Decrypts a payload with this pair's private key, returning the secret
    /// as `0x`-prefixed fixed-width hex.
    ///
    /// # Errors
    /// `MissingPrivateKey` on public-only pairs; `InvalidPoint` if the
    /// payload's ephemeral key is not on the curve.
    pub fn decrypt(&self, payload: &EncryptedPayload) -> Result<String> {
        let private = self.private.as_ref().ok_or(CloakError::MissingPrivateKey)?;
        let ephemeral =
            PublicKey::from_sec1_bytes(payload.ephemeral_public_key()).map_err(|_| {
                CloakError::InvalidPoint("ephemeral public key is not on the curve".into())
            })?;
        let shared = shared_secret(&private.to_nonzero_scalar(), &ephemeral)?;

        let mut plaintext = payload.ciphertext_array();
        for (byte, mask) in plaintext.iter_mut().zip(shared.iter()) {
            *byte ^= mask;
        }
        Ok(format!("0x{}", hex::encode(plaintext)))
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let public = self.public_key_hex();
        write!(
            f,
            "KeyPair(public: {}…{}, private: {})",
            &public[..10],
            &public[public.len() - 8..],
            if self.private.is_some() {
                "[REDACTED]"
            } else {
                "None"
            }
        )
    }
}

/// Computes the X-only ECDH shared secret: SHA-256 of the shared point's
/// X coordinate.
fn shared_secret(scalar: &NonZeroScalar, point: &PublicKey) -> Result<[u8; 32]> {
    let product = point.to_projective() * scalar.as_ref();
    let shared = PublicKey::from_affine(product.to_affine()).map_err(|_| {
        CloakError::InvalidPoint("shared secret is the point at infinity".into())
    })?;
    let encoded = shared.to_encoded_point(true);
    let x = encoded
        .x()
        .ok_or_else(|| CloakError::InternalError("compressed point without X".into()))?;
    Ok(sha256(x))
}

/// Parses a 32-byte multiplication scalar from `0x`-prefixed hex.
fn parse_scalar(scalar_hex: &str) -> Result<NonZeroScalar> {
    if !scalar_hex.starts_with("0x") || scalar_hex.len() != PRIVATE_KEY_HEX_LENGTH {
        return Err(CloakError::InvalidKeyFormat(format!(
            "scalar must be 0x plus {} hex digits",
            PRIVATE_KEY_HEX_LENGTH - 2
        )));
    }
    let bytes = hex::decode(&scalar_hex[2..])
        .map_err(|e| CloakError::InvalidKeyFormat(format!("scalar is not hex: {e}")))?;
    let mut repr = [0u8; 32];
    repr.copy_from_slice(&bytes);
    let scalar = Option::<Scalar>::from(Scalar::from_repr(repr.into())).ok_or_else(|| {
        CloakError::InvalidKeyFormat("scalar must be below the curve order".into())
    })?;
    Option::<NonZeroScalar>::from(NonZeroScalar::new(scalar))
        .ok_or_else(|| CloakError::BlockedKey("the zero scalar is disallowed".into()))
}

fn is_blocked(key: &str, blocklist: &[&str]) -> bool {
    blocklist.iter().any(|blocked| blocked.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const GANACHE_PRIVATE_KEY: &str =
        "0x4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d";

    fn seeded_pair(seed: u64) -> KeyPair {
        KeyPair::generate_with_rng(&mut ChaCha20Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_known_address_vector() {
        let pair = KeyPair::from_private_hex(GANACHE_PRIVATE_KEY).unwrap();
        assert_eq!(
            pair.address().to_checksum_string(),
            "0x90F8bf6A479f320ead074411a4B0e7944Ea8c9C1"
        );
    }

    #[test]
    fn test_public_hex_roundtrip() {
        let pair = seeded_pair(1);
        let public = KeyPair::from_public_hex(&pair.public_key_hex()).unwrap();
        assert_eq!(public.public_key_hex(), pair.public_key_hex());
        assert_eq!(public.address(), pair.address());
        assert!(!public.has_private_key());
    }

    #[test]
    fn test_private_key_hex_fixed_width() {
        let pair = seeded_pair(2);
        let hex = pair.private_key_hex().unwrap();
        assert_eq!(hex.len(), PRIVATE_KEY_HEX_LENGTH);
        assert!(hex.starts_with("0x"));
    }

    #[test]
    fn test_zero_private_key_blocked() {
        let zero = format!("0x{}", "00".repeat(32));
        assert!(matches!(
            KeyPair::from_private_hex(&zero),
            Err(CloakError::BlockedKey(_))
        ));
    }

    #[test]
    fn test_zero_public_key_blocked() {
        let zero = format!("0x04{}", "00".repeat(64));
        assert!(matches!(
            KeyPair::from_public_hex(&zero),
            Err(CloakError::BlockedKey(_))
        ));
    }

    #[test]
    fn test_off_curve_point_rejected() {
        // Perturbing the last Y byte leaves the curve: the only valid Y values
        // for an X are y and p - y, which differ in far more than one byte
        let mut public = seeded_pair(3).public_key_hex();
        let last = public.pop().unwrap();
        public.push(if last == '0' { '1' } else { '0' });
        assert!(matches!(
            KeyPair::from_public_hex(&public),
            Err(CloakError::InvalidPoint(_))
        ));
    }

    #[test]
    fn test_malformed_key_lengths() {
        assert!(matches!(
            KeyPair::from_private_hex("0x1234"),
            Err(CloakError::InvalidKeyFormat(_))
        ));
        assert!(matches!(
            KeyPair::from_public_hex("0x041234"),
            Err(CloakError::InvalidKeyFormat(_))
        ));
        let no_prefix = "11".repeat(33);
        assert!(KeyPair::from_private_hex(&no_prefix).is_err());
    }

    #[test]
    fn test_scalar_above_order_rejected() {
        let pair = seeded_pair(4);
        // n itself is not a valid scalar
        let order = format!("0x{}", cloak_core::constants::CURVE_ORDER_HEX);
        assert!(matches!(
            pair.mul_public_key(&order),
            Err(CloakError::InvalidKeyFormat(_))
        ));
    }

    #[test]
    fn test_zero_scalar_rejected() {
        let pair = seeded_pair(5);
        let zero = format!("0x{}", "00".repeat(32));
        assert!(matches!(
            pair.mul_public_key(&zero),
            Err(CloakError::BlockedKey(_))
        ));
    }

    #[test]
    fn test_compress_decompress_roundtrip() {
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let mut saw_leading_zero_x = false;
        for _ in 0..4096 {
            let pair = KeyPair::generate_with_rng(&mut rng);
            let compressed = pair.compress();
            saw_leading_zero_x |= compressed.x()[0] == 0;
            let restored = KeyPair::from_compressed(&compressed).unwrap();
            assert_eq!(restored.public_key_hex(), pair.public_key_hex());
        }
        // X coordinates with leading zero bytes must survive the roundtrip;
        // 4096 draws miss one with probability (255/256)^4096 ≈ 1e-7
        assert!(saw_leading_zero_x);
    }

    #[test]
    fn test_decompress_parity_must_match_for_addresses() {
        let pair = seeded_pair(7);
        let compressed = pair.compress();
        let right = KeyPair::decompress_with_parity(compressed.x(), compressed.prefix()).unwrap();
        assert_eq!(right.address(), pair.address());

        let wrong_parity = if compressed.prefix() == PARITY_EVEN {
            PARITY_ODD
        } else {
            PARITY_EVEN
        };
        let wrong = KeyPair::decompress_with_parity(compressed.x(), wrong_parity).unwrap();
        assert_ne!(wrong.address(), pair.address());
    }

    #[test]
    fn test_decompress_rejects_bad_inputs() {
        assert!(matches!(
            KeyPair::decompress_with_parity(&[1u8; 32], 4),
            Err(CloakError::InvalidKeyFormat(_))
        ));
        assert!(matches!(
            KeyPair::decompress_with_parity(&[0u8; 32], 2),
            Err(CloakError::BlockedKey(_))
        ));
        // An X beyond the field prime is not a field element
        let mut x = [0xFF_u8; 32];
        x[31] = 0x2F;
        assert!(KeyPair::decompress_with_parity(&x, 2).is_err());
    }

    #[test]
    fn test_encrypt_decrypt_inverse() {
        let recipient = seeded_pair(8);
        let secret = RandomSecret::generate();
        let payload = recipient.public_only().encrypt(&secret).unwrap();
        assert_eq!(recipient.decrypt(&payload).unwrap(), secret.as_hex());
    }

    #[test]
    fn test_encrypt_decrypt_with_extension() {
        let recipient = seeded_pair(9);
        let secret =
            RandomSecret::generate_with_extension("0xdeadbeefdeadbeefdeadbeefdeadbeef").unwrap();
        let payload = recipient.encrypt(&secret).unwrap();
        let recovered = recipient.decrypt(&payload).unwrap();
        assert_eq!(recovered, secret.as_hex());
        assert!(recovered.starts_with("0xdeadbeefdeadbeefdeadbeefdeadbeef"));
    }

    #[test]
    fn test_ephemeral_key_never_reused() {
        let recipient = seeded_pair(10);
        let secret = RandomSecret::generate();
        let a = recipient.encrypt(&secret).unwrap();
        let b = recipient.encrypt(&secret).unwrap();
        assert_ne!(a.ephemeral_public_key(), b.ephemeral_public_key());
        assert_ne!(a.ciphertext(), b.ciphertext());
    }

    #[test]
    fn test_decrypt_requires_private_key() {
        let recipient = seeded_pair(11);
        let payload = recipient.encrypt(&RandomSecret::generate()).unwrap();
        assert!(matches!(
            recipient.public_only().decrypt(&payload),
            Err(CloakError::MissingPrivateKey)
        ));
    }

    #[test]
    fn test_decrypt_rejects_off_curve_ephemeral() {
        let recipient = seeded_pair(12);
        let payload = recipient.encrypt(&RandomSecret::generate()).unwrap();
        let mut ephemeral = payload.ephemeral_public_key().to_vec();
        ephemeral[64] ^= 0x01;
        let corrupted = EncryptedPayload::new(&ephemeral, payload.ciphertext()).unwrap();
        assert!(matches!(
            recipient.decrypt(&corrupted),
            Err(CloakError::InvalidPoint(_))
        ));
    }

    #[test]
    fn test_decryption_is_parity_independent() {
        // The shared secret hashes only the X coordinate, so reconstructing
        // the ephemeral key under either parity decrypts identically
        let recipient = seeded_pair(13);
        let secret = RandomSecret::generate();
        let payload = recipient.encrypt(&secret).unwrap();
        let x = payload.pkx();

        let even = KeyPair::decompress_assuming_even(&x).unwrap();
        let odd = KeyPair::decompress_with_parity(&x, PARITY_ODD).unwrap();
        let payload_even =
            EncryptedPayload::new(&even.to_uncompressed_bytes(), payload.ciphertext()).unwrap();
        let payload_odd =
            EncryptedPayload::new(&odd.to_uncompressed_bytes(), payload.ciphertext()).unwrap();

        let plain_even = recipient.decrypt(&payload_even).unwrap();
        let plain_odd = recipient.decrypt(&payload_odd).unwrap();
        assert_eq!(plain_even, plain_odd);
        assert_eq!(plain_even, secret.as_hex());
    }

    #[test]
    fn test_mul_private_matches_mul_public() {
        let mut rng = ChaCha20Rng::seed_from_u64(14);
        for _ in 0..50 {
            let pair = KeyPair::generate_with_rng(&mut rng);
            let scalar = RandomSecret::generate_with_rng(&mut rng, None).unwrap();

            let from_private = pair.mul_private_key(&scalar.as_hex()).unwrap();
            let from_public = pair.public_only().mul_public_key(&scalar.as_hex()).unwrap();

            assert_eq!(from_private.public_key_hex(), from_public.public_key_hex());
            assert_eq!(from_private.address(), from_public.address());

            // The product re-parses as a valid scalar below n, fixed-width
            let derived_hex = from_private.private_key_hex().unwrap();
            assert_eq!(derived_hex.len(), PRIVATE_KEY_HEX_LENGTH);
            assert!(KeyPair::from_private_hex(&derived_hex).is_ok());
        }
    }

    #[test]
    fn test_mul_private_requires_private_key() {
        let pair = seeded_pair(15).public_only();
        let scalar = RandomSecret::generate().as_hex();
        assert!(matches!(
            pair.mul_private_key(&scalar),
            Err(CloakError::MissingPrivateKey)
        ));
        assert!(matches!(
            pair.private_key_hex(),
            Err(CloakError::MissingPrivateKey)
        ));
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let pair = seeded_pair(16);
        let debug = format!("{:?}", pair);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(&pair.private_key_hex().unwrap()[2..]));
    }
}
