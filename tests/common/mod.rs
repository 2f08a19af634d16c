//! Shared test infrastructure for kms-mac.
//!
//! Provides seed documents, key builders and fixed dates.

// Allow dead code and unused imports since not all test files use all utilities
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;

pub use fixtures::{
    SEED_DOCUMENT, at, external_key, internal_key, key_bytes, registry, seeded_registry,
};
