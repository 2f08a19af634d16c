//! # kms-mac
//!
//! HMAC keys for a local AWS KMS emulator.
//!
//! ## Features
//!
//! - `HMAC_224`, `HMAC_256`, `HMAC_384` and `HMAC_512` key specs
//! - Versioned backing keys with yearly rotation; MACs from retired
//!   versions keep verifying
//! - Constant-time verification across every version
//! - `EXTERNAL` keys with idempotent `ImportKeyMaterial`
//! - Keys seeded from JSON documents
//! - `GenerateMac` / `VerifyMac` request handling with AWS error types
//!
//! ## Quick Start
//!
//! ```rust
//! use kms_mac::{KeyOrigin, KeyRegistry, KeySpec, MacAlgorithm, OsRandom, ServiceConfig};
//!
//! let registry = KeyRegistry::new(ServiceConfig::default());
//! let key = registry.create_mac_key(KeySpec::Hmac384, KeyOrigin::Internal, &OsRandom);
//!
//! let mac = key.generate_mac(b"hello", MacAlgorithm::HmacSha384).unwrap();
//! assert_eq!(mac.len(), 48);
//! assert!(key.verify_mac(b"hello", &mac, MacAlgorithm::HmacSha384).unwrap());
//! ```
//!
//! ## Importing key material
//!
//! ```rust
//! use kms_mac::{KeyOrigin, KeySpec, KeyState, MacKey, OsRandom, ServiceConfig};
//!
//! let key = MacKey::create(&ServiceConfig::default(), KeySpec::Hmac256, KeyOrigin::External, &OsRandom);
//! assert_eq!(key.key_state(), KeyState::PendingImport);
//!
//! key.import_key_material(&[7u8; 32]).unwrap();
//! assert_eq!(key.key_state(), KeyState::Enabled);
//!
//! // Re-importing the same bytes is a no-op.
//! key.import_key_material(&[7u8; 32]).unwrap();
//! assert_eq!(key.version_count(), 1);
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod handler;
pub mod key_spec;
pub mod mac;
pub mod metadata;
pub mod random;
pub mod registry;
pub mod seed;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use error::{
    ApiError, ErrorBody, FixtureError, ImportError, InvalidLength, MacError, RotationError,
};
pub use handler::{
    GenerateMacRequest, GenerateMacResponse, MacService, VerifyMacRequest, VerifyMacResponse,
};
pub use key_spec::{
    ALL_KEY_SPECS, DigestAlgorithm, KeySpec, KeySpecInfo, MacAlgorithm, ParseNameError,
};
pub use mac::{BackingKey, BackingKeyStore, KeyMaterial, MacKey, ROTATION_PERIOD, compute_hmac};
pub use metadata::{KeyMetadata, KeyOrigin, KeyState, KeyUsage};
pub use random::{OsRandom, RandomSource};
pub use registry::{Key, KeyRegistry, OpaqueKey, SeedSummary};
pub use seed::{FixtureMetadata, FixtureRecord, RejectedRecord, SeedReport};

/// Testing utilities exposed via the `testing` feature.
#[cfg(feature = "testing")]
pub mod testing {
    pub use crate::format::hex::{
        DecodeError as HexDecodeError, decode as decode_hex, encode as encode_hex,
    };
    pub use crate::random::SeededRandom;
}
