//! HMAC keys.
//!
//! This module implements the MAC key subsystem:
//!
//! - Versioned backing keys with atomic snapshot publication
//! - Key lifecycle: creation, key material import, scheduled rotation
//! - HMAC-SHA-224/256/384/512 generation and verification (RFC 2104)

mod backing;
pub mod engine;
mod key;

pub use backing::{BackingKey, BackingKeyStore, KeyMaterial};
pub use engine::compute_hmac;
pub use key::{MacKey, ROTATION_PERIOD};

pub(crate) use key::KeyIdentity;
