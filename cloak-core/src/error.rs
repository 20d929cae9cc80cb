//! Error types for Cloak.
//!
//! This module provides a comprehensive error hierarchy using `thiserror`.
//! Every failure class from the protocol is a distinct variant so callers can
//! branch on the kind programmatically rather than parsing messages.

use thiserror::Error;

/// Result type alias using `CloakError`.
pub type Result<T> = std::result::Result<T, CloakError>;

/// Main error type for all Cloak operations.
#[derive(Debug, Error)]
pub enum CloakError {
    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT FORMAT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Invalid hex encoding in caller input.
    #[error("Invalid hex string: {0}")]
    InvalidHexString(#[from] hex::FromHexError),

    /// A key was not valid hex of the expected length, or a scalar was out of range.
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// A payload extension was not exactly 16 bytes of valid hex.
    #[error("Invalid payload extension: {0}")]
    InvalidPayloadExtension(String),

    /// An encrypted payload had a malformed ephemeral key or ciphertext.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// An announcement record failed structural validation.
    #[error("Invalid announcement: {0}")]
    InvalidAnnouncement(String),

    /// A fetched transaction was missing fields needed for recovery.
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CRYPTOGRAPHIC VALIDITY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// A public key or coordinate does not describe a point on secp256k1.
    #[error("Invalid curve point: {0}")]
    InvalidPoint(String),

    /// A key matched the blocklist of degenerate keys.
    #[error("Blocked key: {0}")]
    BlockedKey(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CAPABILITY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// An operation requiring a private key was invoked on a public-only key pair.
    #[error("Operation requires a private key")]
    MissingPrivateKey,

    /// An operation requiring transaction submission was invoked without a signer.
    #[error("Operation requires a signer")]
    MissingSigner,

    // ═══════════════════════════════════════════════════════════════════════════
    // PROTOCOL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// ECDSA public key recovery from a transaction failed.
    #[error("Public key recovery failed: {0}")]
    RecoveryFailed(String),

    /// An account has no stealth keys in the registry (all stored words zero).
    #[error("No stealth keys registered for {0}")]
    NoKeysRegistered(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // EXTERNAL DEPENDENCY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// A name definitively has no registration in any configured name service.
    #[error("Name not registered: {0}")]
    NameNotRegistered(String),

    /// Name resolution failed for transport or service reasons.
    #[error("Resolution failed for '{name}': {reason}")]
    ResolutionFailed {
        /// The name being resolved.
        name: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A registry contract interaction failed.
    #[error("Registry error: {0}")]
    RegistryError(String),

    /// A JSON-RPC call returned an error object.
    #[error("RPC call failed: {0}")]
    RpcError(String),

    /// An HTTP request failed before producing an RPC response.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// A remote response could not be interpreted.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CloakError {
    /// Returns true if this error is network-origin and may reasonably be
    /// retried by the caller. The core itself never retries.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CloakError::HttpError(_)
                | CloakError::RpcError(_)
                | CloakError::InvalidResponse(_)
                | CloakError::ResolutionFailed { .. }
        )
    }

    /// Returns true if this is a malformed-input error (a contract violation
    /// by the caller, never retried).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CloakError::InvalidHexString(_)
                | CloakError::InvalidKeyFormat(_)
                | CloakError::InvalidPayloadExtension(_)
                | CloakError::InvalidPayload(_)
                | CloakError::InvalidAnnouncement(_)
                | CloakError::InvalidTransaction(_)
                | CloakError::JsonError(_)
        )
    }

    /// Returns true if a mathematical precondition did not hold.
    pub fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            CloakError::InvalidPoint(_) | CloakError::BlockedKey(_) | CloakError::RecoveryFailed(_)
        )
    }

    /// Returns true if secret material was required but absent.
    pub fn is_capability_error(&self) -> bool {
        matches!(self, CloakError::MissingPrivateKey | CloakError::MissingSigner)
    }
}
