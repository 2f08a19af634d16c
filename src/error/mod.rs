//! Error types for kms-mac.
//!
//! This module provides one error type per concern:
//!
//! - [`ImportError`] - importing external key material
//! - [`MacError`] - MAC generation and verification
//! - [`RotationError`] - scheduling rotation
//! - [`FixtureError`] - building keys from seed records
//! - [`ApiError`] - request-layer failures, carrying the AWS error type name
//!
//! Core errors never leave a key partially mutated: the backing key versions
//! and key state are published atomically after every check has passed.
//!
//! `VerifyMac` returning `MacValid: false` is not an error. Callers must keep
//! a failed verification distinct from a failed request.
//!
//! ```rust
//! use kms_mac::{ApiError, MacError, MacAlgorithm};
//!
//! let err = MacError::UnsupportedAlgorithm {
//!     requested: MacAlgorithm::HmacSha512,
//!     supported: MacAlgorithm::HmacSha256,
//! };
//! let api = ApiError::from(err);
//! assert_eq!(api.error_type(), "InvalidKeyUsageException");
//! ```

use serde::Serialize;

use crate::key_spec::{KeySpec, MacAlgorithm};

/// Key material of the wrong length for its key spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{spec} keys must be {expected} bytes in length, got {found}")]
pub struct InvalidLength {
    pub spec: KeySpec,
    pub expected: usize,
    pub found: usize,
}

/// Failure importing key material into an `EXTERNAL` key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ImportError {
    /// Material length differs from the key spec's required length.
    #[error("invalid key material: {0}")]
    InvalidMaterialLength(InvalidLength),

    /// Key already holds different material.
    #[error("key material does not match existing key material")]
    KeyMaterialMismatch,

    /// Key material is generated by the service for this key.
    #[error("key material can only be imported into keys with origin EXTERNAL")]
    UnsupportedOrigin,
}

impl From<InvalidLength> for ImportError {
    fn from(err: InvalidLength) -> Self {
        Self::InvalidMaterialLength(err)
    }
}

/// Failure generating or verifying a MAC.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum MacError {
    /// Requested algorithm is not the one the key advertises.
    #[error("MAC algorithm {requested} is not supported by this key (supported: {supported})")]
    UnsupportedAlgorithm {
        requested: MacAlgorithm,
        supported: MacAlgorithm,
    },

    /// Key has no backing key version yet.
    #[error("key has no key material")]
    NoKeyMaterial,
}

/// Failure changing a key's rotation schedule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RotationError {
    /// Imported key material is owned by the caller and never rotated.
    #[error("automatic rotation is not supported for keys with origin EXTERNAL")]
    ExternalOrigin,
}

/// Failure building a key from a seed record.
///
/// A fixture error rejects the one record it was raised for; other records
/// in the same seed document still load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum FixtureError {
    /// A field value could not be decoded.
    #[error("malformed fixture value '{value}': {reason}")]
    Malformed { value: String, reason: String },

    /// The record (or document) is not structurally valid.
    #[error("malformed fixture record: {0}")]
    MalformedRecord(String),

    /// `EXTERNAL` keys hold at most one backing key.
    #[error("keys with origin EXTERNAL accept at most one backing key, got {found}")]
    TooManyVersionsForExternalKey { found: usize },

    /// `AWS_KMS` keys need at least one backing key.
    #[error("keys with origin AWS_KMS require at least one backing key")]
    MissingKeyMaterial,

    /// A backing key has the wrong length for the key spec.
    #[error("invalid backing key: {0}")]
    InvalidMaterialLength(InvalidLength),
}

impl From<InvalidLength> for FixtureError {
    fn from(err: InvalidLength) -> Self {
        Self::InvalidMaterialLength(err)
    }
}

/// Request-layer error, mapped onto the AWS KMS error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// A required parameter is absent.
    #[error("{0}")]
    MissingParameter(String),

    /// A parameter violates a length constraint.
    #[error("{0}")]
    Validation(String),

    /// The key cannot be used for the requested operation.
    #[error("{0}")]
    InvalidKeyUsage(String),

    /// No key matches the identifier.
    #[error("{0}")]
    NotFound(String),

    /// The key is disabled.
    #[error("{0}")]
    Disabled(String),

    /// The key is in a state that does not permit the operation.
    #[error("{0}")]
    InvalidState(String),
}

/// JSON error body returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "__type")]
    pub error_type: &'static str,
    pub message: String,
}

impl ApiError {
    /// AWS error type name.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "MissingParameterException",
            Self::Validation(_) => "ValidationException",
            Self::InvalidKeyUsage(_) => "InvalidKeyUsageException",
            Self::NotFound(_) => "NotFoundException",
            Self::Disabled(_) => "DisabledException",
            Self::InvalidState(_) => "KMSInvalidStateException",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::MissingParameter(m)
            | Self::Validation(m)
            | Self::InvalidKeyUsage(m)
            | Self::NotFound(m)
            | Self::Disabled(m)
            | Self::InvalidState(m) => m,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error_type: self.error_type(),
            message: self.message().to_string(),
        }
    }
}

impl From<MacError> for ApiError {
    fn from(err: MacError) -> Self {
        match err {
            MacError::NoKeyMaterial => Self::InvalidState(err.to_string()),
            MacError::UnsupportedAlgorithm { .. } => Self::InvalidKeyUsage(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let err = ApiError::MissingParameter("KeyId is a required parameter".into());
        let json = serde_json::to_value(err.to_body()).unwrap();
        assert_eq!(json["__type"], "MissingParameterException");
        assert_eq!(json["message"], "KeyId is a required parameter");
    }

    #[test]
    fn test_invalid_length_display() {
        let err = ImportError::from(InvalidLength {
            spec: KeySpec::Hmac256,
            expected: 32,
            found: 30,
        });
        assert_eq!(
            err.to_string(),
            "invalid key material: HMAC_256 keys must be 32 bytes in length, got 30"
        );
    }

    #[test]
    fn test_mac_error_mapping() {
        assert_eq!(
            ApiError::from(MacError::NoKeyMaterial).error_type(),
            "KMSInvalidStateException"
        );
    }
}
