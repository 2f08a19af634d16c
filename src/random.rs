//! Secure random byte source used to generate backing keys.

/// Source of key material.
///
/// Implementations must be cryptographically secure outside of tests.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);
}

/// Operating system CSPRNG via `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        getrandom::fill(dest).expect("getrandom failed");
    }
}

/// Deterministic source for tests.
///
/// Each call yields a distinct stream: block `i` of call `n` is
/// `SHA-256(seed || n || i)`.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default)]
pub struct SeededRandom {
    seed: u64,
    calls: std::sync::atomic::AtomicU64,
}

#[cfg(any(test, feature = "testing"))]
impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            calls: std::sync::atomic::AtomicU64::new(0),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl RandomSource for SeededRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        use sha2::{Digest, Sha256};

        let call = self
            .calls
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        for (i, chunk) in dest.chunks_mut(32).enumerate() {
            let mut hasher = Sha256::new();
            hasher.update(self.seed.to_be_bytes());
            hasher.update(call.to_be_bytes());
            hasher.update((i as u64).to_be_bytes());
            let block = hasher.finalize();
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
    }
}
