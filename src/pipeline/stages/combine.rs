use crossbeam_channel::{Receiver, Sender};
use log::debug;

use crate::pipeline::{Stage, StageContext};
use crate::utils::config::COMBINE_SEPARATOR;

/// Sort ascending (byte-wise) and join with `_`. Empty input gives `""`.
pub fn combine(mut hashes: Vec<String>) -> String {
    // unstable is fine: equal strings are indistinguishable
    hashes.sort_unstable();
    hashes.join(COMBINE_SEPARATOR)
}

/// Barrier stage: waits for its whole input, emits exactly one item.
#[derive(Clone, Copy, Debug, Default)]
pub struct Combine;

impl Stage for Combine {
    fn name(&self) -> &str {
        "combine"
    }

    fn run(&self, _ctx: &StageContext, input: Receiver<String>, output: Sender<String>) {
        let hashes: Vec<String> = input.iter().collect();
        debug!("combine: input closed after {} items", hashes.len());
        let _ = output.send(combine(hashes));
    }
}
