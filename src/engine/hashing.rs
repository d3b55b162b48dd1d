//! Hash primitives consumed by the stages.

use log::warn;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use crate::PipelineOpts;
use crate::utils::config::DigestConsts;

/// The two primitives a signing pipeline needs.
///
/// `checksum` may be called from any number of threads at once. `digest` must not overlap
/// with another `digest` call; implementations are not required to enforce that, the
/// pipeline does (see [`DigestGate`](crate::engine::DigestGate)).
pub trait Signer: Send + Sync {
    fn checksum(&self, data: &str) -> String;
    fn digest(&self, data: &str) -> String;
}

/// Default signer: CRC-32 checksum (decimal) and BLAKE3 digest (hex) over `data + salt`.
///
/// Optional delays make the primitives slow on purpose, which is what makes the pipeline's
/// concurrency observable. Overlapping `digest` calls are detected: the late caller logs,
/// counts an overheat and backs off until the primitive is free again.
#[derive(Debug)]
pub struct DataSigner {
    salt: String,
    checksum_delay: Duration,
    digest_delay: Duration,
    overheat_penalty: Duration,
    hot: AtomicBool,
    overheats: AtomicU64,
}

impl Default for DataSigner {
    fn default() -> Self {
        Self {
            salt: String::new(),
            checksum_delay: Duration::ZERO,
            digest_delay: Duration::ZERO,
            overheat_penalty: DigestConsts::OVERHEAT_PENALTY,
            hot: AtomicBool::new(false),
            overheats: AtomicU64::new(0),
        }
    }
}

/// Clears the overheat flag when the digest call ends, including on unwind.
struct HotGuard<'a>(&'a AtomicBool);

impl Drop for HotGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl DataSigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_opts(opts: &PipelineOpts) -> Self {
        Self::new()
            .with_salt(&opts.salt)
            .with_delays(opts.checksum_delay, opts.digest_delay)
    }

    pub fn with_salt(mut self, salt: &str) -> Self {
        self.salt = salt.to_string();
        self
    }

    pub fn with_delays(mut self, checksum: Duration, digest: Duration) -> Self {
        self.checksum_delay = checksum;
        self.digest_delay = digest;
        self
    }

    pub fn with_overheat_penalty(mut self, penalty: Duration) -> Self {
        self.overheat_penalty = penalty;
        self
    }

    /// Number of digest calls that found another digest call already running.
    pub fn overheats(&self) -> u64 {
        self.overheats.load(Ordering::Relaxed)
    }

    fn salted(&self, data: &str) -> String {
        format!("{data}{}", self.salt)
    }

    fn overheat_lock(&self) -> HotGuard<'_> {
        while self
            .hot
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.overheats.fetch_add(1, Ordering::Relaxed);
            warn!(
                "Digest overheat: concurrent call detected, backing off {:?}",
                self.overheat_penalty
            );
            thread::sleep(self.overheat_penalty);
        }
        HotGuard(&self.hot)
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}

impl Signer for DataSigner {
    fn checksum(&self, data: &str) -> String {
        let crc = crc32fast::hash(self.salted(data).as_bytes());
        pause(self.checksum_delay);
        crc.to_string()
    }

    fn digest(&self, data: &str) -> String {
        let _hot = self.overheat_lock();
        let hash = blake3::hash(self.salted(data).as_bytes());
        pause(self.digest_delay);
        hash.to_hex().to_string()
    }
}
