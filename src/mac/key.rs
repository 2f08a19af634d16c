//! MAC key aggregate and lifecycle.
//!
//! A [`MacKey`] pairs immutable identity (id, ARN, key spec, origin) with a
//! [`BackingKeyStore`] holding the mutable part: backing key versions, the
//! rotation schedule and the key state.
//!
//! # Lifecycle
//!
//! - `AWS_KMS` keys are created with one generated version and are enabled.
//!   [`MacKey::rotate_if_due`] appends a new version once the scheduled
//!   rotation time has passed.
//! - `EXTERNAL` keys are created without material in `PendingImport`.
//!   [`MacKey::import_key_material`] sets the single version once; later
//!   imports must supply identical bytes. They are never rotated.

use chrono::{DateTime, Months, Utc};

use super::backing::{BackingKey, BackingKeyStore, Change, KeyMaterial};
use super::engine;
use crate::config::ServiceConfig;
use crate::error::{ImportError, MacError, RotationError};
use crate::key_spec::{KeySpec, MacAlgorithm};
use crate::metadata::{KeyMetadata, KeyOrigin, KeyState, KeyUsage};
use crate::random::RandomSource;

/// Interval between automatic rotations.
pub const ROTATION_PERIOD: Months = Months::new(12);

/// An HMAC key.
#[derive(Debug)]
pub struct MacKey {
    key_id: String,
    arn: String,
    description: String,
    creation_date: DateTime<Utc>,
    spec: KeySpec,
    origin: KeyOrigin,
    store: BackingKeyStore,
}

/// Identity of a key being constructed.
#[derive(Debug, Clone)]
pub(crate) struct KeyIdentity {
    pub key_id: String,
    pub arn: String,
    pub description: String,
    pub creation_date: DateTime<Utc>,
}

impl MacKey {
    /// Create a key with a fresh key id.
    ///
    /// `AWS_KMS` keys get one generated backing key and start `Enabled`;
    /// `EXTERNAL` keys start empty in `PendingImport`.
    pub fn create(
        config: &ServiceConfig,
        spec: KeySpec,
        origin: KeyOrigin,
        rng: &dyn RandomSource,
    ) -> Self {
        let key_id = uuid::Uuid::new_v4().to_string();
        let identity = KeyIdentity {
            arn: config.key_arn(&key_id),
            key_id,
            description: String::new(),
            creation_date: Utc::now(),
        };

        let material = match origin {
            KeyOrigin::Internal => KeyMaterial::new(
                vec![BackingKey::generate(spec, rng)],
                None,
                KeyState::Enabled,
                true,
            ),
            KeyOrigin::External => {
                KeyMaterial::new(Vec::new(), None, KeyState::PendingImport, false)
            }
        };

        tracing::debug!(target: "kms_mac::lifecycle", { key_id = %identity.key_id, key_spec = %spec, origin = %origin }, "created MAC key");
        Self::from_parts(identity, spec, origin, material)
    }

    pub(crate) fn from_parts(
        identity: KeyIdentity,
        spec: KeySpec,
        origin: KeyOrigin,
        material: KeyMaterial,
    ) -> Self {
        Self {
            key_id: identity.key_id,
            arn: identity.arn,
            description: identity.description,
            creation_date: identity.creation_date,
            spec,
            origin,
            store: BackingKeyStore::new(material),
        }
    }

    /// Set the description (builder style, at creation time).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn arn(&self) -> &str {
        &self.arn
    }

    pub fn spec(&self) -> KeySpec {
        self.spec
    }

    pub fn origin(&self) -> KeyOrigin {
        self.origin
    }

    pub fn key_state(&self) -> KeyState {
        self.store.snapshot().key_state()
    }

    pub fn enabled(&self) -> bool {
        self.store.snapshot().enabled()
    }

    pub fn next_rotation(&self) -> Option<DateTime<Utc>> {
        self.store.snapshot().next_rotation()
    }

    /// Number of stored backing key versions.
    pub fn version_count(&self) -> usize {
        self.store.snapshot().version_count()
    }

    /// The backing key store.
    pub fn store(&self) -> &BackingKeyStore {
        &self.store
    }

    /// Metadata view of the current snapshot.
    pub fn metadata(&self) -> KeyMetadata {
        let snapshot = self.store.snapshot();
        KeyMetadata {
            key_id: self.key_id.clone(),
            arn: self.arn.clone(),
            description: self.description.clone(),
            creation_date: self.creation_date,
            enabled: snapshot.enabled(),
            key_state: snapshot.key_state(),
            origin: self.origin,
            key_spec: self.spec,
            customer_master_key_spec: self.spec,
            key_usage: KeyUsage::GenerateVerifyMac,
            mac_algorithms: vec![self.spec.mac_algorithm()],
            next_rotation_date: snapshot.next_rotation(),
        }
    }

    /// Import external key material.
    ///
    /// The first successful import stores the material and enables the key.
    /// Repeating it with the same bytes is a no-op; different bytes fail with
    /// [`ImportError::KeyMaterialMismatch`]. No state changes on failure.
    pub fn import_key_material(&self, material: &[u8]) -> Result<(), ImportError> {
        if self.origin != KeyOrigin::External {
            return Err(ImportError::UnsupportedOrigin);
        }
        let version = BackingKey::new(self.spec, material.to_vec())?;

        self.store.update(|current| match current.versions() {
            [] => {
                tracing::debug!(target: "kms_mac::lifecycle", { key_id = %self.key_id }, "imported key material");
                Ok(Change::Publish(
                    current
                        .with_version(version)
                        .with_state(KeyState::Enabled, true),
                    (),
                ))
            }
            [existing] if existing.matches(version.as_bytes()) => {
                tracing::debug!(target: "kms_mac::lifecycle", { key_id = %self.key_id }, "re-imported identical key material");
                Ok(Change::Keep(()))
            }
            _ => {
                tracing::debug!(target: "kms_mac::lifecycle", { key_id = %self.key_id }, "rejected key material that differs from the existing material");
                Err(ImportError::KeyMaterialMismatch)
            }
        })
    }

    /// Set or clear the next scheduled rotation.
    pub fn schedule_rotation(&self, at: Option<DateTime<Utc>>) -> Result<(), RotationError> {
        if self.origin == KeyOrigin::External {
            return Err(RotationError::ExternalOrigin);
        }
        self.store.update::<(), RotationError>(|current| {
            Ok(Change::Publish(current.with_next_rotation(at), ()))
        })
    }

    /// Enable rotation, one rotation period from `now`.
    pub fn enable_rotation(&self, now: DateTime<Utc>) -> Result<(), RotationError> {
        self.schedule_rotation(now.checked_add_months(ROTATION_PERIOD))
    }

    /// Rotate if the scheduled rotation time has been reached.
    ///
    /// Appends a newly generated version and moves the schedule to one
    /// rotation period after `now`. Returns `false` without changes when
    /// rotation is disabled, not yet due, or the key is `EXTERNAL`.
    pub fn rotate_if_due(&self, now: DateTime<Utc>, rng: &dyn RandomSource) -> bool {
        if self.origin == KeyOrigin::External {
            tracing::debug!(target: "kms_mac::lifecycle", { key_id = %self.key_id }, "skipping rotation of EXTERNAL key");
            return false;
        }

        let result = self.store.update::<bool, std::convert::Infallible>(|current| {
            let Some(due) = current.next_rotation() else {
                return Ok(Change::Keep(false));
            };
            if now < due {
                return Ok(Change::Keep(false));
            }
            let Some(next) = now.checked_add_months(ROTATION_PERIOD) else {
                tracing::warn!(target: "kms_mac::lifecycle", { key_id = %self.key_id, now = %now }, "next rotation date out of range; not rotating");
                return Ok(Change::Keep(false));
            };

            let rotated = current
                .with_version(BackingKey::generate(self.spec, rng))
                .with_next_rotation(Some(next));
            tracing::info!(target: "kms_mac::lifecycle", { key_id = %self.key_id, versions = rotated.version_count(), next_rotation = %next }, "rotated MAC key");
            Ok(Change::Publish(rotated, true))
        });

        match result {
            Ok(rotated) => rotated,
            Err(never) => match never {},
        }
    }

    /// Generate a MAC with the current backing key.
    pub fn generate_mac(
        &self,
        message: &[u8],
        algorithm: MacAlgorithm,
    ) -> Result<Vec<u8>, MacError> {
        let snapshot = self.store.snapshot();
        engine::generate(self.spec, snapshot.versions(), message, algorithm)
    }

    /// Verify a MAC against every backing key version.
    pub fn verify_mac(
        &self,
        message: &[u8],
        mac: &[u8],
        algorithm: MacAlgorithm,
    ) -> Result<bool, MacError> {
        let snapshot = self.store.snapshot();
        engine::verify(self.spec, snapshot.versions(), message, mac, algorithm)
    }
}
