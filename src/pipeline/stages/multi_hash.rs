use crossbeam_channel::{Receiver, Sender};
use log::debug;
use rayon::prelude::*;
use std::sync::Arc;

use crate::engine::Signer;
use crate::engine::parallel::dispatch_each;
use crate::pipeline::{Stage, StageContext};
use crate::utils::config::MULTI_HASH_FANOUT;

/// Per item: `checksum("0" + x) + checksum("1" + x) + ... + checksum("5" + x)`.
/// Branches run in parallel; the concatenation is positional, whatever order they finish in.
pub struct MultiHash {
    signer: Arc<dyn Signer>,
    fanout: usize,
}

impl MultiHash {
    pub fn new(signer: Arc<dyn Signer>) -> Self {
        Self::with_fanout(signer, MULTI_HASH_FANOUT)
    }

    pub fn with_fanout(signer: Arc<dyn Signer>, fanout: usize) -> Self {
        Self { signer, fanout }
    }

    pub fn fanout(&self) -> usize {
        self.fanout
    }

    pub fn hash(&self, data: &str) -> String {
        // Indexed collect keeps slot k for branch k.
        let parts: Vec<String> = (0..self.fanout)
            .into_par_iter()
            .map(|th| self.signer.checksum(&format!("{th}{data}")))
            .collect();
        parts.concat()
    }
}

impl Stage for MultiHash {
    fn name(&self) -> &str {
        "multi_hash"
    }

    fn run(&self, ctx: &StageContext, input: Receiver<String>, output: Sender<String>) {
        let n = dispatch_each(ctx, &input, &output, |item| self.hash(&item));
        debug!("multi_hash: {} items x {} branches", n, self.fanout);
    }
}
