//! Building MAC keys from seed records.
//!
//! A seed record describes one key: a metadata block, zero or more
//! hex-encoded backing keys (oldest first) and an optional next rotation
//! date. [`MacKey::from_record`] validates the record and builds the key;
//! [`load_document`] reads a JSON seed document and builds every record it
//! can, reporting the rest.
//!
//! ```json
//! {
//!   "Keys": [
//!     {
//!       "Metadata": { "KeyId": "mac-key-1", "KeySpec": "HMAC_256" },
//!       "BackingKeys": ["000102...1f"],
//!       "NextKeyRotation": "2030-01-01T00:00:00Z"
//!     }
//!   ]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::config::ServiceConfig;
use crate::error::FixtureError;
use crate::format::hex;
use crate::key_spec::KeySpec;
use crate::mac::{BackingKey, KeyIdentity, KeyMaterial, MacKey};
use crate::metadata::{KeyOrigin, KeyState, KeyUsage};

/// Metadata block of a seed record.
///
/// Only `KeyId` and `KeySpec` are required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FixtureMetadata {
    pub key_id: String,
    pub arn: Option<String>,
    pub description: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub enabled: Option<bool>,
    pub key_state: Option<KeyState>,
    pub origin: Option<KeyOrigin>,
    #[serde(alias = "CustomerMasterKeySpec")]
    pub key_spec: KeySpec,
    pub key_usage: Option<KeyUsage>,
}

/// One seed record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FixtureRecord {
    pub metadata: FixtureMetadata,
    #[serde(default)]
    pub backing_keys: Vec<String>,
    /// Single-key form used by older seed files.
    pub backing_key: Option<String>,
    pub next_key_rotation: Option<DateTime<Utc>>,
}

impl MacKey {
    /// Build a key from a seed record.
    ///
    /// Nothing is registered or partially built on failure.
    pub fn from_record(record: FixtureRecord, config: &ServiceConfig) -> Result<Self, FixtureError> {
        let FixtureRecord {
            metadata,
            backing_keys,
            backing_key,
            next_key_rotation,
        } = record;

        if metadata.key_id.is_empty() {
            return Err(FixtureError::MalformedRecord(
                "Metadata.KeyId must not be empty".into(),
            ));
        }
        if let Some(usage) = metadata.key_usage
            && usage != KeyUsage::GenerateVerifyMac
        {
            return Err(FixtureError::Malformed {
                value: format!("{:?}", usage),
                reason: "MAC keys must have key usage GENERATE_VERIFY_MAC".into(),
            });
        }

        // Older seed files write an empty BackingKey for keys without material.
        let backing_key = backing_key.filter(|k| !k.is_empty());
        let encoded = match (backing_key, backing_keys.is_empty()) {
            (Some(_), false) => {
                return Err(FixtureError::MalformedRecord(
                    "BackingKey and BackingKeys cannot both be set".into(),
                ));
            }
            (Some(single), true) => vec![single],
            (None, _) => backing_keys,
        };

        let decoded = encoded
            .iter()
            .map(|s| {
                hex::decode(s).map(Zeroizing::new).map_err(|e| FixtureError::Malformed {
                    value: s.clone(),
                    reason: format!("unable to decode hex key: {}", e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let spec = metadata.key_spec;
        let origin = metadata.origin.unwrap_or_default();
        match origin {
            KeyOrigin::External if decoded.len() > 1 => {
                return Err(FixtureError::TooManyVersionsForExternalKey {
                    found: decoded.len(),
                });
            }
            KeyOrigin::Internal if decoded.is_empty() => {
                return Err(FixtureError::MissingKeyMaterial);
            }
            _ => {}
        }

        let versions = decoded
            .iter()
            .map(|bytes| BackingKey::new(spec, bytes.to_vec()))
            .collect::<Result<Vec<_>, _>>()?;

        let (key_state, enabled) = if origin == KeyOrigin::External && versions.is_empty() {
            (KeyState::PendingImport, false)
        } else {
            let mut state = match metadata.key_state {
                None | Some(KeyState::PendingImport) => KeyState::Enabled,
                Some(state) => state,
            };
            if state == KeyState::Enabled && metadata.enabled == Some(false) {
                state = KeyState::Disabled;
            }
            (state, state == KeyState::Enabled)
        };

        let next_rotation = match (origin, next_key_rotation) {
            (KeyOrigin::External, Some(_)) => {
                tracing::warn!(target: "kms_mac::seed", { key_id = %metadata.key_id }, "ignoring NextKeyRotation on EXTERNAL key");
                None
            }
            (_, next) => next,
        };

        let identity = KeyIdentity {
            arn: metadata
                .arn
                .unwrap_or_else(|| config.key_arn(&metadata.key_id)),
            key_id: metadata.key_id,
            description: metadata.description.unwrap_or_default(),
            creation_date: metadata.creation_date.unwrap_or_else(Utc::now),
        };

        tracing::debug!(target: "kms_mac::seed", { key_id = %identity.key_id, key_spec = %spec, origin = %origin, versions = versions.len(), key_state = %key_state }, "seeded MAC key");

        Ok(Self::from_parts(
            identity,
            spec,
            origin,
            KeyMaterial::new(versions, next_rotation, key_state, enabled),
        ))
    }
}

/// A seed record that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Position of the record in the document.
    pub index: usize,
    /// `Metadata.KeyId`, when the record had one.
    pub key_id: Option<String>,
    pub error: FixtureError,
}

/// Result of loading a seed document.
#[derive(Debug, Default)]
pub struct SeedReport {
    pub keys: Vec<MacKey>,
    pub rejected: Vec<RejectedRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SeedDocument {
    #[serde(default)]
    keys: Vec<serde_json::Value>,
}

/// Load every record of a JSON seed document.
///
/// Fails only if the document itself is not valid. Invalid records are
/// reported in [`SeedReport::rejected`] and do not affect the others.
pub fn load_document(json: &str, config: &ServiceConfig) -> Result<SeedReport, FixtureError> {
    let document: SeedDocument = serde_json::from_str(json)
        .map_err(|e| FixtureError::MalformedRecord(format!("invalid seed document: {}", e)))?;

    let mut report = SeedReport::default();
    for (index, raw) in document.keys.into_iter().enumerate() {
        let key_id = raw
            .get("Metadata")
            .and_then(|m| m.get("KeyId"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);

        let built = serde_json::from_value::<FixtureRecord>(raw)
            .map_err(|e| FixtureError::MalformedRecord(e.to_string()))
            .and_then(|record| MacKey::from_record(record, config));

        match built {
            Ok(key) => report.keys.push(key),
            Err(error) => {
                tracing::warn!(target: "kms_mac::seed", { index, key_id = ?key_id, error = %error }, "rejected seed record");
                report.rejected.push(RejectedRecord {
                    index,
                    key_id,
                    error,
                });
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidLength;
    use crate::format::hex::encode;

    fn record(origin: KeyOrigin, keys: Vec<String>) -> FixtureRecord {
        FixtureRecord {
            metadata: FixtureMetadata {
                key_id: "k1".into(),
                arn: None,
                description: None,
                creation_date: None,
                enabled: None,
                key_state: None,
                origin: Some(origin),
                key_spec: KeySpec::Hmac256,
                key_usage: None,
            },
            backing_keys: keys,
            backing_key: None,
            next_key_rotation: None,
        }
    }

    #[test]
    fn test_internal_record_keeps_order() {
        let keys = vec![encode(&[1u8; 32]), encode(&[2u8; 32])];
        let key = MacKey::from_record(record(KeyOrigin::Internal, keys), &ServiceConfig::default())
            .unwrap();
        let snapshot = key.store().snapshot();
        assert_eq!(snapshot.version_count(), 2);
        assert!(snapshot.current().unwrap().matches(&[2u8; 32]));
        assert_eq!(key.key_state(), KeyState::Enabled);
        assert_eq!(key.arn(), "arn:aws:kms:eu-west-2:111122223333:key/k1");
    }

    #[test]
    fn test_external_without_keys_is_pending_import() {
        let key = MacKey::from_record(record(KeyOrigin::External, vec![]), &ServiceConfig::default())
            .unwrap();
        assert_eq!(key.key_state(), KeyState::PendingImport);
        assert!(!key.enabled());
        assert_eq!(key.version_count(), 0);
    }

    #[test]
    fn test_external_with_two_keys_rejected() {
        let keys = vec![encode(&[1u8; 32]), encode(&[2u8; 32])];
        assert_eq!(
            MacKey::from_record(record(KeyOrigin::External, keys), &ServiceConfig::default())
                .unwrap_err(),
            FixtureError::TooManyVersionsForExternalKey { found: 2 }
        );
    }

    #[test]
    fn test_internal_without_keys_rejected() {
        assert_eq!(
            MacKey::from_record(record(KeyOrigin::Internal, vec![]), &ServiceConfig::default())
                .unwrap_err(),
            FixtureError::MissingKeyMaterial
        );
    }

    #[test]
    fn test_non_hex_names_value() {
        let err = MacKey::from_record(
            record(KeyOrigin::Internal, vec!["zz".into()]),
            &ServiceConfig::default(),
        )
        .unwrap_err();
        match err {
            FixtureError::Malformed { value, reason } => {
                assert_eq!(value, "zz");
                assert!(reason.contains("hex"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = MacKey::from_record(
            record(KeyOrigin::Internal, vec![encode(&[0u8; 31])]),
            &ServiceConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            FixtureError::InvalidMaterialLength(InvalidLength {
                spec: KeySpec::Hmac256,
                expected: 32,
                found: 31,
            })
        );
    }

    #[test]
    fn test_legacy_and_list_conflict() {
        let mut rec = record(KeyOrigin::Internal, vec![encode(&[1u8; 32])]);
        rec.backing_key = Some(encode(&[1u8; 32]));
        assert!(matches!(
            MacKey::from_record(rec, &ServiceConfig::default()),
            Err(FixtureError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_empty_legacy_key_means_no_material() {
        let mut rec = record(KeyOrigin::External, vec![]);
        rec.backing_key = Some(String::new());
        let key = MacKey::from_record(rec, &ServiceConfig::default()).unwrap();
        assert_eq!(key.key_state(), KeyState::PendingImport);
        assert!(!key.enabled());
        assert_eq!(key.version_count(), 0);

        let mut rec = record(KeyOrigin::Internal, vec![]);
        rec.backing_key = Some(String::new());
        assert_eq!(
            MacKey::from_record(rec, &ServiceConfig::default()).unwrap_err(),
            FixtureError::MissingKeyMaterial
        );
    }

    #[test]
    fn test_disabled_metadata_respected() {
        let mut rec = record(KeyOrigin::Internal, vec![encode(&[1u8; 32])]);
        rec.metadata.enabled = Some(false);
        let key = MacKey::from_record(rec, &ServiceConfig::default()).unwrap();
        assert_eq!(key.key_state(), KeyState::Disabled);
        assert!(!key.enabled());
    }
}
