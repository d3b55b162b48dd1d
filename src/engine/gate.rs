//! Exclusive access to the digest primitive.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use super::hashing::Signer;

static PROCESS_GATE: OnceLock<Arc<DigestGate>> = OnceLock::new();

/// Serializes digest calls. Share one gate (via `Arc`) between every stage that digests;
/// at most one [`Signer::digest`] runs through a gate at any instant.
///
/// The lock covers the digest call only. Callers must do any follow-up work (e.g. the
/// checksum of the digest) after [`DigestGate::digest`] returns.
#[derive(Debug, Default)]
pub struct DigestGate {
    lock: Mutex<()>,
    calls: AtomicU64,
}

impl DigestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh gate to share between the stages of one pipeline.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// The gate used by [`fingerprint`](crate::fingerprint): one per process, so concurrent
    /// runs in the same process never overlap their digests either.
    pub fn process() -> Arc<Self> {
        Arc::clone(PROCESS_GATE.get_or_init(Self::shared))
    }

    /// Call `signer.digest(data)` while holding the gate.
    pub fn digest<S: Signer + ?Sized>(&self, signer: &S, data: &str) -> String {
        // Poisoning only means a previous digest panicked; the lock guards no data.
        let _held = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.calls.fetch_add(1, Ordering::Relaxed);
        signer.digest(data)
    }

    /// Digest calls made through this gate so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}
