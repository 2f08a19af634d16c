//! Key registry.
//!
//! [`Key`] is the sum of the key kinds the service knows about. Only MAC
//! keys are implemented here; symmetric and asymmetric keys are carried as
//! [`OpaqueKey`] so the request layer can tell them apart and reject them
//! for MAC operations.
//!
//! [`KeyRegistry`] maps key ids to keys behind a `parking_lot::RwLock`.
//! Lookups clone the entry (an `Arc` for MAC keys) and release the lock
//! before any cryptographic work starts.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::config::ServiceConfig;
use crate::error::FixtureError;
use crate::key_spec::KeySpec;
use crate::mac::MacKey;
use crate::metadata::{KeyOrigin, KeyState, KeyUsage};
use crate::random::RandomSource;
use crate::seed::{self, RejectedRecord};

/// A key whose material is managed outside this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueKey {
    pub key_id: String,
    pub arn: String,
    pub key_usage: KeyUsage,
    pub key_state: KeyState,
}

/// Any key held by the registry.
#[derive(Debug, Clone)]
pub enum Key {
    Mac(Arc<MacKey>),
    Symmetric(OpaqueKey),
    Asymmetric(OpaqueKey),
}

impl Key {
    pub fn key_id(&self) -> &str {
        match self {
            Self::Mac(key) => key.key_id(),
            Self::Symmetric(key) | Self::Asymmetric(key) => &key.key_id,
        }
    }

    pub fn arn(&self) -> &str {
        match self {
            Self::Mac(key) => key.arn(),
            Self::Symmetric(key) | Self::Asymmetric(key) => &key.arn,
        }
    }

    pub fn key_state(&self) -> KeyState {
        match self {
            Self::Mac(key) => key.key_state(),
            Self::Symmetric(key) | Self::Asymmetric(key) => key.key_state,
        }
    }

    pub fn key_usage(&self) -> KeyUsage {
        match self {
            Self::Mac(_) => KeyUsage::GenerateVerifyMac,
            Self::Symmetric(key) | Self::Asymmetric(key) => key.key_usage,
        }
    }

    /// The MAC capability of this key, if it has one.
    pub fn as_mac(&self) -> Option<&Arc<MacKey>> {
        match self {
            Self::Mac(key) => Some(key),
            Self::Symmetric(_) | Self::Asymmetric(_) => None,
        }
    }
}

impl From<MacKey> for Key {
    fn from(key: MacKey) -> Self {
        Self::Mac(Arc::new(key))
    }
}

/// Outcome of [`KeyRegistry::load_seed`].
#[derive(Debug, Default)]
pub struct SeedSummary {
    /// Ids of keys added to the registry.
    pub loaded: Vec<String>,
    /// Records that failed validation.
    pub rejected: Vec<RejectedRecord>,
    /// Ids already present in the registry; the existing key was kept.
    pub duplicates: Vec<String>,
}

/// Registry of keys by key id.
#[derive(Debug)]
pub struct KeyRegistry {
    config: ServiceConfig,
    keys: RwLock<HashMap<String, Key>>,
}

impl KeyRegistry {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            keys: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    /// Add a key. Returns `false` and keeps the existing entry if the id is
    /// already registered.
    pub fn insert(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        let mut keys = self.keys.write();
        if keys.contains_key(key.key_id()) {
            tracing::debug!(target: "kms_mac::registry", { key_id = %key.key_id() }, "key id already registered");
            return false;
        }
        keys.insert(key.key_id().to_string(), key);
        true
    }

    /// Create and register a new MAC key.
    pub fn create_mac_key(
        &self,
        spec: KeySpec,
        origin: KeyOrigin,
        rng: &dyn RandomSource,
    ) -> Arc<MacKey> {
        let key = Arc::new(MacKey::create(&self.config, spec, origin, rng));
        self.keys
            .write()
            .insert(key.key_id().to_string(), Key::Mac(Arc::clone(&key)));
        key
    }

    /// Look a key up by key id or key ARN.
    pub fn get(&self, id: &str) -> Option<Key> {
        if id.starts_with("arn:") {
            let (_, key_id) = id.rsplit_once(":key/")?;
            let keys = self.keys.read();
            return keys.get(key_id).filter(|k| k.arn() == id).cloned();
        }
        self.keys.read().get(id).cloned()
    }

    /// Load a JSON seed document into the registry.
    pub fn load_seed(&self, json: &str) -> Result<SeedSummary, FixtureError> {
        let report = seed::load_document(json, &self.config)?;
        let mut summary = SeedSummary {
            rejected: report.rejected,
            ..SeedSummary::default()
        };

        for key in report.keys {
            let key_id = key.key_id().to_string();
            if self.insert(key) {
                summary.loaded.push(key_id);
            } else {
                tracing::warn!(target: "kms_mac::registry", { key_id = %key_id }, "seed record duplicates a registered key; keeping the existing key");
                summary.duplicates.push(key_id);
            }
        }

        tracing::info!(target: "kms_mac::registry", { loaded = summary.loaded.len(), rejected = summary.rejected.len(), duplicates = summary.duplicates.len() }, "loaded seed document");
        Ok(summary)
    }

    /// Rotate every MAC key whose rotation is due. Returns the number of
    /// keys rotated.
    pub fn rotate_due(&self, now: DateTime<Utc>, rng: &dyn RandomSource) -> usize {
        let mac_keys: Vec<Arc<MacKey>> = self
            .keys
            .read()
            .values()
            .filter_map(|k| k.as_mac().cloned())
            .collect();

        mac_keys
            .iter()
            .filter(|key| key.rotate_if_due(now, rng))
            .count()
    }
}
