//! The per-send random secret.
//!
//! Every send generates a fresh 32-byte secret: the high 16 bytes carry an
//! optional caller-supplied payload extension (all zero by default), the low
//! 16 bytes are cryptographically random. The secret is the scalar that
//! derives the one-time address, so it is handled like key material: zeroized
//! on drop and redacted from `Debug`.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use cloak_core::constants::{
    PAYLOAD_EXTENSION_HEX_LENGTH, PAYLOAD_EXTENSION_SIZE, RANDOM_SECRET_SIZE,
};
use cloak_core::error::{CloakError, Result};

/// A 32-byte secret: `payload_extension (16) || random (16)`.
///
/// Storage is a fixed-width array, so hex encodings are always 64 digits —
/// a value whose big-endian form would naturally drop leading zero bytes
/// stays left-padded by construction. Downstream XOR and address derivation
/// depend on that width.
#[derive(Clone, PartialEq, Eq)]
pub struct RandomSecret {
    bytes: [u8; RANDOM_SECRET_SIZE],
}

impl RandomSecret {
    /// Generates a fresh secret with an all-zero payload extension.
    pub fn generate() -> Self {
        let mut bytes = [0u8; RANDOM_SECRET_SIZE];
        OsRng.fill_bytes(&mut bytes[PAYLOAD_EXTENSION_SIZE..]);
        Self { bytes }
    }

    /// Generates a fresh secret embedding the given payload extension in its
    /// high 16 bytes.
    ///
    /// # Errors
    /// `InvalidPayloadExtension` unless the extension is exactly `0x` plus
    /// 32 hex digits.
    pub fn generate_with_extension(extension: &str) -> Result<Self> {
        Self::generate_with_rng(&mut OsRng, Some(extension))
    }

    /// Generates a secret from the given RNG, optionally with a payload
    /// extension. Used with a seeded RNG for reproducible tests.
    pub fn generate_with_rng(
        rng: &mut (impl RngCore + CryptoRng),
        extension: Option<&str>,
    ) -> Result<Self> {
        let mut bytes = [0u8; RANDOM_SECRET_SIZE];
        if let Some(extension) = extension {
            bytes[..PAYLOAD_EXTENSION_SIZE].copy_from_slice(&parse_extension(extension)?);
        }
        rng.fill_bytes(&mut bytes[PAYLOAD_EXTENSION_SIZE..]);
        Ok(Self { bytes })
    }

    /// Reconstructs a secret from its raw bytes (e.g. after decryption).
    pub fn from_bytes(bytes: [u8; RANDOM_SECRET_SIZE]) -> Self {
        Self { bytes }
    }

    /// Reconstructs a secret from fixed-width hex with a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").ok_or_else(|| {
            CloakError::InvalidKeyFormat("secret must carry a 0x prefix".into())
        })?;
        if digits.len() != 2 * RANDOM_SECRET_SIZE {
            return Err(CloakError::InvalidKeyFormat(format!(
                "secret must be {} hex digits, got {}",
                2 * RANDOM_SECRET_SIZE,
                digits.len()
            )));
        }
        let decoded = hex::decode(digits)?;
        let mut bytes = [0u8; RANDOM_SECRET_SIZE];
        bytes.copy_from_slice(&decoded);
        Ok(Self { bytes })
    }

    /// Returns the secret as fixed-width hex with a `0x` prefix.
    pub fn as_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }

    /// Returns the secret as fixed-width hex without the prefix.
    pub fn as_hex_without_prefix(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Returns the raw bytes.
    pub fn to_bytes(&self) -> [u8; RANDOM_SECRET_SIZE] {
        self.bytes
    }

    /// Returns the payload extension (the high 16 bytes).
    pub fn payload_extension(&self) -> [u8; PAYLOAD_EXTENSION_SIZE] {
        let mut extension = [0u8; PAYLOAD_EXTENSION_SIZE];
        extension.copy_from_slice(&self.bytes[..PAYLOAD_EXTENSION_SIZE]);
        extension
    }
}

fn parse_extension(extension: &str) -> Result<[u8; PAYLOAD_EXTENSION_SIZE]> {
    let digits = extension.strip_prefix("0x").ok_or_else(|| {
        CloakError::InvalidPayloadExtension("extension must carry a 0x prefix".into())
    })?;
    if extension.len() != PAYLOAD_EXTENSION_HEX_LENGTH {
        return Err(CloakError::InvalidPayloadExtension(format!(
            "extension must be {} characters, got {}",
            PAYLOAD_EXTENSION_HEX_LENGTH,
            extension.len()
        )));
    }
    let decoded = hex::decode(digits)
        .map_err(|e| CloakError::InvalidPayloadExtension(format!("not valid hex: {e}")))?;
    let mut bytes = [0u8; PAYLOAD_EXTENSION_SIZE];
    bytes.copy_from_slice(&decoded);
    Ok(bytes)
}

impl Drop for RandomSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for RandomSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RandomSecret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_generate_zero_extension_by_default() {
        let secret = RandomSecret::generate();
        assert_eq!(secret.payload_extension(), [0u8; 16]);
    }

    #[test]
    fn test_generate_is_random_per_instance() {
        assert_ne!(
            RandomSecret::generate().to_bytes(),
            RandomSecret::generate().to_bytes()
        );
    }

    #[test]
    fn test_extension_occupies_high_bytes() {
        let extension = "0x00112233445566778899aabbccddeeff";
        let secret = RandomSecret::generate_with_extension(extension).unwrap();
        assert_eq!(
            hex::encode(secret.payload_extension()),
            "00112233445566778899aabbccddeeff"
        );
        assert_eq!(&secret.as_hex()[2..34], "00112233445566778899aabbccddeeff");
    }

    #[test]
    fn test_extension_validation() {
        // Missing prefix
        assert!(matches!(
            RandomSecret::generate_with_extension("00112233445566778899aabbccddeeff"),
            Err(CloakError::InvalidPayloadExtension(_))
        ));
        // Too short
        assert!(matches!(
            RandomSecret::generate_with_extension("0x0011"),
            Err(CloakError::InvalidPayloadExtension(_))
        ));
        // Not hex
        assert!(matches!(
            RandomSecret::generate_with_extension("0x0011223344556677zz99aabbccddeeff"),
            Err(CloakError::InvalidPayloadExtension(_))
        ));
    }

    #[test]
    fn test_hex_is_fixed_width() {
        // Force a secret whose numeric value has leading zero bytes
        let mut bytes = [0u8; 32];
        bytes[31] = 0x01;
        let secret = RandomSecret::from_bytes(bytes);
        assert_eq!(secret.as_hex().len(), 66);
        assert_eq!(secret.as_hex_without_prefix().len(), 64);
        assert!(secret.as_hex().starts_with("0x00000000"));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = RandomSecret::generate_with_rng(&mut ChaCha20Rng::seed_from_u64(7), None).unwrap();
        let b = RandomSecret::generate_with_rng(&mut ChaCha20Rng::seed_from_u64(7), None).unwrap();
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_debug_redacted() {
        let secret = RandomSecret::generate();
        assert_eq!(format!("{:?}", secret), "RandomSecret([REDACTED])");
    }

    #[test]
    fn test_from_hex_validation() {
        assert!(RandomSecret::from_hex("1234").is_err());
        assert!(RandomSecret::from_hex("0x1234").is_err());
        let ok = format!("0x{}", "ab".repeat(32));
        assert!(RandomSecret::from_hex(&ok).is_ok());
    }

    proptest! {
        #[test]
        fn prop_hex_roundtrip(bytes in proptest::array::uniform32(any::<u8>())) {
            let secret = RandomSecret::from_bytes(bytes);
            let back = RandomSecret::from_hex(&secret.as_hex()).unwrap();
            prop_assert_eq!(secret.to_bytes(), back.to_bytes());
        }
    }
}
