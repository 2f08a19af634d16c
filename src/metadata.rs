//! Key metadata as reported by `DescribeKey`, plus the origin, state and
//! usage enums shared by every key kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::key_spec::{KeySpec, MacAlgorithm};

/// Where a key's material comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeyOrigin {
    /// Generated by the service.
    #[default]
    #[serde(rename = "AWS_KMS")]
    Internal,
    /// Supplied by the key owner through `ImportKeyMaterial`.
    #[serde(rename = "EXTERNAL")]
    External,
}

impl std::fmt::Display for KeyOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal => write!(f, "AWS_KMS"),
            Self::External => write!(f, "EXTERNAL"),
        }
    }
}

/// Lifecycle state of a key.
///
/// This crate only drives `PendingImport -> Enabled`. The remaining
/// transitions belong to the key registry's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    Enabled,
    Disabled,
    PendingDeletion,
    PendingImport,
    Unavailable,
}

impl std::fmt::Display for KeyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
            Self::PendingDeletion => "PendingDeletion",
            Self::PendingImport => "PendingImport",
            Self::Unavailable => "Unavailable",
        };
        f.write_str(s)
    }
}

/// Cryptographic operations a key may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyUsage {
    EncryptDecrypt,
    SignVerify,
    GenerateVerifyMac,
    KeyAgreement,
}

impl std::fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::EncryptDecrypt => "ENCRYPT_DECRYPT",
            Self::SignVerify => "SIGN_VERIFY",
            Self::GenerateVerifyMac => "GENERATE_VERIFY_MAC",
            Self::KeyAgreement => "KEY_AGREEMENT",
        };
        f.write_str(s)
    }
}

/// Metadata of a MAC key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyMetadata {
    pub key_id: String,
    pub arn: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub creation_date: DateTime<Utc>,
    pub enabled: bool,
    pub key_state: KeyState,
    pub origin: KeyOrigin,
    pub key_spec: KeySpec,
    pub customer_master_key_spec: KeySpec,
    pub key_usage: KeyUsage,
    pub mac_algorithms: Vec<MacAlgorithm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_rotation_date: Option<DateTime<Utc>>,
}
