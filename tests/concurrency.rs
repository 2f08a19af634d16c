//! Readers racing rotation and import.
//!
//! Readers must always observe a complete set of versions: a MAC that
//! verified once keeps verifying, and a freshly generated MAC verifies
//! immediately.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use common::{at, external_key, internal_key, key_bytes};
use kms_mac::testing::SeededRandom;
use kms_mac::{KeySpec, MacAlgorithm};

const READERS: usize = 4;
const ROTATIONS: i32 = 20;

#[test]
fn test_verify_during_rotation() {
    let key = Arc::new(internal_key(KeySpec::Hmac256, 1));
    key.enable_rotation(at(2000, 1, 1)).unwrap();
    let original = key.generate_mac(b"steady", MacAlgorithm::HmacSha256).unwrap();
    let done = AtomicBool::new(false);

    std::thread::scope(|s| {
        for reader in 0..READERS {
            let key = &key;
            let original = &original;
            let done = &done;
            s.spawn(move || {
                let message = format!("reader-{reader}");
                while !done.load(Ordering::Acquire) {
                    assert!(key.verify_mac(b"steady", original, MacAlgorithm::HmacSha256).unwrap());

                    let fresh = key.generate_mac(message.as_bytes(), MacAlgorithm::HmacSha256).unwrap();
                    assert!(key.verify_mac(message.as_bytes(), &fresh, MacAlgorithm::HmacSha256).unwrap());

                    let snapshot = key.store().snapshot();
                    assert_eq!(snapshot.key_state(), kms_mac::KeyState::Enabled);
                    assert!(snapshot.version_count() >= 1);
                }
            });
        }

        s.spawn(|| {
            let rng = SeededRandom::new(99);
            for year in 1..=ROTATIONS {
                assert!(key.rotate_if_due(at(2000 + year, 1, 1), &rng));
                std::thread::yield_now();
            }
            done.store(true, Ordering::Release);
        });
    });

    assert_eq!(key.version_count(), ROTATIONS as usize + 1);
    assert!(key.verify_mac(b"steady", &original, MacAlgorithm::HmacSha256).unwrap());
}

#[test]
fn test_concurrent_identical_imports() {
    let key = external_key(KeySpec::Hmac512);
    let material = key_bytes(64);

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| key.import_key_material(&material).unwrap());
        }
    });

    assert_eq!(key.version_count(), 1);
    assert!(key.enabled());
}

#[test]
fn test_racing_different_imports_one_wins() {
    let key = external_key(KeySpec::Hmac256);

    let results: Vec<bool> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8u8)
            .map(|fill| {
                let key = &key;
                s.spawn(move || key.import_key_material(&[fill; 32]).is_ok())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|ok| **ok).count(), 1);
    assert_eq!(key.version_count(), 1);
}
