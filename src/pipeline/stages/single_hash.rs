use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::sync::Arc;

use crate::engine::parallel::dispatch_each;
use crate::engine::{DigestGate, Signer};
use crate::pipeline::{Stage, StageContext};
use crate::utils::config::SINGLE_HASH_SEPARATOR;

/// `checksum(x) ~ checksum(digest(x))` per item, both branches in parallel.
///
/// Only the digest call goes through the gate; the checksum of the digest runs after the gate
/// is released, so other items' digests can proceed meanwhile.
pub struct SingleHash {
    signer: Arc<dyn Signer>,
    gate: Arc<DigestGate>,
}

impl SingleHash {
    pub fn new(signer: Arc<dyn Signer>, gate: Arc<DigestGate>) -> Self {
        Self { signer, gate }
    }

    pub fn hash(&self, data: &str) -> String {
        let (plain, digested) = rayon::join(
            || self.signer.checksum(data),
            || {
                let digest = self.gate.digest(self.signer.as_ref(), data);
                self.signer.checksum(&digest)
            },
        );
        format!("{plain}{SINGLE_HASH_SEPARATOR}{digested}")
    }
}

impl Stage for SingleHash {
    fn name(&self) -> &str {
        "single_hash"
    }

    fn run(&self, ctx: &StageContext, input: Receiver<String>, output: Sender<String>) {
        let n = dispatch_each(ctx, &input, &output, |item| self.hash(&item));
        debug!("single_hash: {} items, {} digests so far", n, self.gate.calls());
    }
}
