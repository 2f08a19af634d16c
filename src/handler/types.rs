//! Request and response shapes for `GenerateMac` and `VerifyMac`.
//!
//! Field names follow the AWS KMS JSON protocol. Binary fields travel as
//! standard base64 strings.

use serde::{Deserialize, Serialize};

/// `GenerateMac` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenerateMacRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(default, with = "blob::option", skip_serializing_if = "Option::is_none")]
    pub message: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_algorithm: Option<String>,
}

impl GenerateMacRequest {
    pub fn new(
        key_id: impl Into<String>,
        message: impl Into<Vec<u8>>,
        mac_algorithm: impl Into<String>,
    ) -> Self {
        Self {
            key_id: Some(key_id.into()),
            message: Some(message.into()),
            mac_algorithm: Some(mac_algorithm.into()),
        }
    }
}

/// `GenerateMac` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenerateMacResponse {
    /// ARN of the key that produced the MAC.
    pub key_id: String,
    #[serde(with = "blob")]
    pub mac: Vec<u8>,
    pub mac_algorithm: String,
}

/// `VerifyMac` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VerifyMacRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(default, with = "blob::option", skip_serializing_if = "Option::is_none")]
    pub message: Option<Vec<u8>>,
    #[serde(default, with = "blob::option", skip_serializing_if = "Option::is_none")]
    pub mac: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_algorithm: Option<String>,
}

impl VerifyMacRequest {
    pub fn new(
        key_id: impl Into<String>,
        message: impl Into<Vec<u8>>,
        mac: impl Into<Vec<u8>>,
        mac_algorithm: impl Into<String>,
    ) -> Self {
        Self {
            key_id: Some(key_id.into()),
            message: Some(message.into()),
            mac: Some(mac.into()),
            mac_algorithm: Some(mac_algorithm.into()),
        }
    }
}

/// `VerifyMac` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VerifyMacResponse {
    /// Key identifier exactly as supplied in the request.
    pub key_id: String,
    pub mac_algorithm: String,
    pub mac_valid: bool,
}

/// Base64 (standard alphabet, padded) blob fields.
mod blob {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }

    pub mod option {
        use base64::Engine;
        use base64::engine::general_purpose::STANDARD;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            bytes: &Option<Vec<u8>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match bytes {
                Some(bytes) => super::serialize(bytes, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Vec<u8>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|encoded| {
                    STANDARD
                        .decode(encoded.as_bytes())
                        .map_err(serde::de::Error::custom)
                })
                .transpose()
        }
    }
}
