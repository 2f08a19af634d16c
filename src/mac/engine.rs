//! HMAC generation and verification over a key's backing versions.
//!
//! Generation uses the current (newest) version only. Verification computes
//! the expected MAC under every stored version, oldest to newest, and folds
//! the constant-time comparisons together without exiting early, so a MAC
//! produced before a rotation still verifies and the result does not reveal
//! which version (if any) matched.

use digest::{KeyInit, Mac};
use hmac::Hmac;
use subtle::{Choice, ConstantTimeEq};

use super::backing::BackingKey;
use crate::error::MacError;
use crate::key_spec::{DigestAlgorithm, KeySpec, MacAlgorithm};

/// Compute a raw HMAC with the given digest.
pub fn compute_hmac(digest: DigestAlgorithm, key: &[u8], message: &[u8]) -> Vec<u8> {
    match digest {
        DigestAlgorithm::Sha224 => compute::<Hmac<sha2::Sha224>>(key, message),
        DigestAlgorithm::Sha256 => compute::<Hmac<sha2::Sha256>>(key, message),
        DigestAlgorithm::Sha384 => compute::<Hmac<sha2::Sha384>>(key, message),
        DigestAlgorithm::Sha512 => compute::<Hmac<sha2::Sha512>>(key, message),
    }
}

fn compute<M>(key: &[u8], message: &[u8]) -> Vec<u8>
where
    M: Mac + KeyInit,
{
    let mut mac = <M as KeyInit>::new_from_slice(key).expect("HMAC can take key of any size");
    Mac::update(&mut mac, message);
    mac.finalize().into_bytes().to_vec()
}

/// Resolve `algorithm` against the single algorithm `spec` advertises.
fn resolve(spec: KeySpec, algorithm: MacAlgorithm) -> Result<DigestAlgorithm, MacError> {
    let info = spec.describe();
    if algorithm != info.algorithm {
        return Err(MacError::UnsupportedAlgorithm {
            requested: algorithm,
            supported: info.algorithm,
        });
    }
    Ok(info.digest)
}

/// Generate a MAC over `message` with the current version.
pub fn generate(
    spec: KeySpec,
    versions: &[BackingKey],
    message: &[u8],
    algorithm: MacAlgorithm,
) -> Result<Vec<u8>, MacError> {
    let digest = resolve(spec, algorithm)?;
    let current = versions.last().ok_or(MacError::NoKeyMaterial)?;
    Ok(compute_hmac(digest, current.as_bytes(), message))
}

/// Verify `mac` over `message` against every version.
///
/// Returns `Ok(false)` for a mismatch, including a `mac` of the wrong
/// length; every version is still processed in that case.
pub fn verify(
    spec: KeySpec,
    versions: &[BackingKey],
    message: &[u8],
    mac: &[u8],
    algorithm: MacAlgorithm,
) -> Result<bool, MacError> {
    let digest = resolve(spec, algorithm)?;
    if versions.is_empty() {
        return Err(MacError::NoKeyMaterial);
    }

    let mut matched = Choice::from(0u8);
    for version in versions {
        let expected = compute_hmac(digest, version.as_bytes(), message);
        // ct_eq is 0 for differing lengths
        matched |= expected.as_slice().ct_eq(mac);
    }
    Ok(bool::from(matched))
}
