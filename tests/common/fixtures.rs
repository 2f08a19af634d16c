//! Test fixtures: seed documents and key builders.

use chrono::{DateTime, TimeZone, Utc};
use kms_mac::testing::SeededRandom;
use kms_mac::{KeyOrigin, KeyRegistry, KeySpec, MacKey, ServiceConfig};

/// Seed document mixing loadable and invalid records.
///
/// Loadable: `mac-256` (two versions, 0x00..0x1f then 0x0b repeated),
/// `mac-512-ext` (imported 0x00..0x3f), `mac-ext-pending` (no material),
/// `mac-224-disabled`.
///
/// Rejected: `bad-length`, `bad-hex`, `sign-key`.
pub const SEED_DOCUMENT: &str = r#"{
  "Keys": [
    {
      "Metadata": {
        "KeyId": "mac-256",
        "KeySpec": "HMAC_256",
        "KeyUsage": "GENERATE_VERIFY_MAC",
        "Description": "two versions"
      },
      "BackingKeys": [
        "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        "0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b"
      ],
      "NextKeyRotation": "2030-01-01T00:00:00Z"
    },
    {
      "Metadata": { "KeyId": "mac-512-ext", "KeySpec": "HMAC_512", "Origin": "EXTERNAL" },
      "BackingKeys": [
        "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f202122232425262728292a2b2c2d2e2f303132333435363738393a3b3c3d3e3f"
      ]
    },
    {
      "Metadata": { "KeyId": "mac-ext-pending", "KeySpec": "HMAC_384", "Origin": "EXTERNAL" }
    },
    {
      "Metadata": { "KeyId": "mac-224-disabled", "CustomerMasterKeySpec": "HMAC_224", "Enabled": false },
      "BackingKey": "000102030405060708090a0b0c0d0e0f101112131415161718191a1b"
    },
    {
      "Metadata": { "KeyId": "bad-length", "KeySpec": "HMAC_384" },
      "BackingKeys": [
        "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f202122232425262728292a2b2c2d2e"
      ]
    },
    {
      "Metadata": { "KeyId": "bad-hex", "KeySpec": "HMAC_256" },
      "BackingKeys": ["xyz"]
    },
    {
      "Metadata": { "KeyId": "sign-key", "KeySpec": "HMAC_256", "KeyUsage": "SIGN_VERIFY" },
      "BackingKeys": ["000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"]
    }
  ]
}"#;

/// `len` bytes counting up from zero.
pub fn key_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

/// Midnight UTC on the given date.
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn registry() -> KeyRegistry {
    KeyRegistry::new(ServiceConfig::default())
}

/// Registry loaded from [`SEED_DOCUMENT`].
pub fn seeded_registry() -> KeyRegistry {
    let registry = registry();
    registry.load_seed(SEED_DOCUMENT).unwrap();
    registry
}

pub fn internal_key(spec: KeySpec, seed: u64) -> MacKey {
    MacKey::create(
        &ServiceConfig::default(),
        spec,
        KeyOrigin::Internal,
        &SeededRandom::new(seed),
    )
}

pub fn external_key(spec: KeySpec) -> MacKey {
    MacKey::create(
        &ServiceConfig::default(),
        spec,
        KeyOrigin::External,
        &SeededRandom::new(0),
    )
}
