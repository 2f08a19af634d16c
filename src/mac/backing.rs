//! Versioned backing keys.
//!
//! A MAC key owns an ordered, append-only list of backing key versions. The
//! last version is current and is the only one used to generate MACs; every
//! version remains available for verification.
//!
//! # Publication
//!
//! The version list, rotation schedule and key state live together in one
//! immutable [`KeyMaterial`] snapshot held behind an `Arc`. Readers clone the
//! `Arc` and never observe a partially built list. Mutators hold the store's
//! upgradable lock (exclusive among mutators, shared with readers), build
//! the next snapshot from the current one, and only then swap it in under a
//! brief write lock. A mutator that fails returns before the swap, leaving
//! the published snapshot untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::InvalidLength;
use crate::key_spec::KeySpec;
use crate::metadata::KeyState;
use crate::random::RandomSource;

/// One version of a key's secret material.
///
/// The length always equals the owning key spec's required length. Bytes are
/// zeroed when the version is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BackingKey {
    bytes: Vec<u8>,
}

impl BackingKey {
    /// Wrap raw material, checking its length against `spec`.
    pub fn new(spec: KeySpec, bytes: Vec<u8>) -> Result<Self, InvalidLength> {
        let expected = spec.key_len();
        if bytes.len() != expected {
            let found = bytes.len();
            let mut bytes = bytes;
            bytes.zeroize();
            return Err(InvalidLength {
                spec,
                expected,
                found,
            });
        }
        Ok(Self { bytes })
    }

    /// Generate fresh material of the length `spec` requires.
    pub fn generate(spec: KeySpec, rng: &dyn RandomSource) -> Self {
        let mut bytes = vec![0u8; spec.key_len()];
        rng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Constant-time equality against raw material.
    pub(crate) fn matches(&self, other: &[u8]) -> bool {
        bool::from(self.bytes.as_slice().ct_eq(other))
    }
}

impl std::fmt::Debug for BackingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackingKey")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Immutable snapshot of a key's mutable state.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    versions: Vec<BackingKey>,
    next_rotation: Option<DateTime<Utc>>,
    key_state: KeyState,
    enabled: bool,
}

impl KeyMaterial {
    pub(crate) fn new(
        versions: Vec<BackingKey>,
        next_rotation: Option<DateTime<Utc>>,
        key_state: KeyState,
        enabled: bool,
    ) -> Self {
        Self {
            versions,
            next_rotation,
            key_state,
            enabled,
        }
    }

    /// All versions, oldest first.
    pub fn versions(&self) -> &[BackingKey] {
        &self.versions
    }

    /// The newest version, if any.
    pub fn current(&self) -> Option<&BackingKey> {
        self.versions.last()
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    pub fn next_rotation(&self) -> Option<DateTime<Utc>> {
        self.next_rotation
    }

    pub fn key_state(&self) -> KeyState {
        self.key_state
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Next snapshot with `version` appended as the current version.
    pub(crate) fn with_version(&self, version: BackingKey) -> Self {
        let mut next = self.clone();
        next.versions.push(version);
        next
    }

    pub(crate) fn with_next_rotation(&self, next_rotation: Option<DateTime<Utc>>) -> Self {
        Self {
            next_rotation,
            ..self.clone()
        }
    }

    pub(crate) fn with_state(&self, key_state: KeyState, enabled: bool) -> Self {
        Self {
            key_state,
            enabled,
            ..self.clone()
        }
    }
}

/// Outcome of a mutation closure passed to [`BackingKeyStore::update`].
pub(crate) enum Change<T> {
    /// Publish the new snapshot and return the value.
    Publish(KeyMaterial, T),
    /// Leave the current snapshot in place.
    Keep(T),
}

/// Atomically published [`KeyMaterial`] of one key.
pub struct BackingKeyStore {
    current: RwLock<Arc<KeyMaterial>>,
}

impl BackingKeyStore {
    pub(crate) fn new(material: KeyMaterial) -> Self {
        Self {
            current: RwLock::new(Arc::new(material)),
        }
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<KeyMaterial> {
        Arc::clone(&self.current.read())
    }

    /// Run a mutation against the current snapshot.
    ///
    /// Mutations are serialized with each other; readers proceed in parallel
    /// and see the old snapshot until the new one is swapped in.
    pub(crate) fn update<T, E>(
        &self,
        mutate: impl FnOnce(&KeyMaterial) -> Result<Change<T>, E>,
    ) -> Result<T, E> {
        let guard = self.current.upgradable_read();
        match mutate(&guard)? {
            Change::Publish(next, value) => {
                let mut write = RwLockUpgradableReadGuard::upgrade(guard);
                *write = Arc::new(next);
                Ok(value)
            }
            Change::Keep(value) => Ok(value),
        }
    }
}

impl std::fmt::Debug for BackingKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("BackingKeyStore")
            .field("versions", &snapshot.version_count())
            .field("next_rotation", &snapshot.next_rotation)
            .field("key_state", &snapshot.key_state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    fn empty() -> KeyMaterial {
        KeyMaterial::new(Vec::new(), None, KeyState::PendingImport, false)
    }

    #[test]
    fn test_backing_key_rejects_wrong_length() {
        let err = BackingKey::new(KeySpec::Hmac256, vec![0u8; 30]).unwrap_err();
        assert_eq!(err.expected, 32);
        assert_eq!(err.found, 30);
        assert!(BackingKey::new(KeySpec::Hmac256, vec![0u8; 32]).is_ok());
    }

    #[test]
    fn test_generate_uses_spec_length() {
        let rng = SeededRandom::new(1);
        assert_eq!(BackingKey::generate(KeySpec::Hmac224, &rng).len(), 28);
        assert_eq!(BackingKey::generate(KeySpec::Hmac512, &rng).len(), 64);
    }

    #[test]
    fn test_debug_redacts_material() {
        let key = BackingKey::new(KeySpec::Hmac224, vec![0xAB; 28]).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("171"));
    }

    #[test]
    fn test_with_version_appends_without_touching_original() {
        let rng = SeededRandom::new(2);
        let first = empty().with_version(BackingKey::generate(KeySpec::Hmac256, &rng));
        let second = first.with_version(BackingKey::generate(KeySpec::Hmac256, &rng));
        assert_eq!(first.version_count(), 1);
        assert_eq!(second.version_count(), 2);
        assert!(second.versions()[0].matches(first.versions()[0].as_bytes()));
    }

    #[test]
    fn test_update_keep_and_error_leave_snapshot() {
        let store = BackingKeyStore::new(empty());
        let before = store.snapshot();

        let kept: Result<u8, ()> = store.update(|_| Ok(Change::Keep(1)));
        assert_eq!(kept, Ok(1));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));

        let failed: Result<(), &str> = store.update(|_| Err("nope"));
        assert_eq!(failed, Err("nope"));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_update_publish_swaps_snapshot() {
        let store = BackingKeyStore::new(empty());
        let before = store.snapshot();
        let rng = SeededRandom::new(3);

        store
            .update::<(), ()>(|m| {
                Ok(Change::Publish(
                    m.with_version(BackingKey::generate(KeySpec::Hmac384, &rng))
                        .with_state(KeyState::Enabled, true),
                    (),
                ))
            })
            .unwrap();

        let after = store.snapshot();
        assert_eq!(before.version_count(), 0);
        assert_eq!(after.version_count(), 1);
        assert_eq!(after.key_state(), KeyState::Enabled);
        assert!(after.enabled());
    }
}
