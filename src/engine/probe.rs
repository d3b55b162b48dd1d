//! Call counters around a [`Signer`].

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use super::hashing::Signer;

/// Snapshot of a [`SignerProbe`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProbeStats {
    pub checksum_calls: u64,
    pub digest_calls: u64,
    /// Highest number of checksum calls seen running at the same time.
    pub max_concurrent_checksums: usize,
    /// Highest number of digest calls seen running at the same time. 1 when the gate works.
    pub max_concurrent_digests: usize,
}

#[derive(Debug, Default)]
struct CallCounter {
    calls: AtomicU64,
    in_progress: AtomicUsize,
    peak: AtomicUsize,
}

struct CallGuard<'a>(&'a CallCounter);

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.0.in_progress.fetch_sub(1, Ordering::AcqRel);
    }
}

impl CallCounter {
    fn enter(&self) -> CallGuard<'_> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let now = self.in_progress.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(now, Ordering::AcqRel);
        CallGuard(self)
    }
}

/// Wraps a signer and records call counts and peak concurrency of each primitive.
#[derive(Debug, Default)]
pub struct SignerProbe<S> {
    inner: S,
    checksum: CallCounter,
    digest: CallCounter,
}

impl<S: Signer> SignerProbe<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            checksum: CallCounter::default(),
            digest: CallCounter::default(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn stats(&self) -> ProbeStats {
        ProbeStats {
            checksum_calls: self.checksum.calls.load(Ordering::Relaxed),
            digest_calls: self.digest.calls.load(Ordering::Relaxed),
            max_concurrent_checksums: self.checksum.peak.load(Ordering::Acquire),
            max_concurrent_digests: self.digest.peak.load(Ordering::Acquire),
        }
    }
}

impl<S: Signer> Signer for SignerProbe<S> {
    fn checksum(&self, data: &str) -> String {
        let _call = self.checksum.enter();
        self.inner.checksum(data)
    }

    fn digest(&self, data: &str) -> String {
        let _call = self.digest.enter();
        self.inner.digest(data)
    }
}
