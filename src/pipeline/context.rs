//! Queues and handles of a running pipeline.

use crossbeam_channel::{Receiver, unbounded};
use std::thread::JoinHandle;

/// One spawned stage thread.
pub struct StageHandle {
    pub name: String,
    pub handle: JoinHandle<()>,
}

/// Handles returned by [`Pipeline::spawn`](super::Pipeline::spawn) for streaming: receive from
/// `output_rx` and pass `stage_handles` to
/// [`shutdown_pipeline_handles`](super::shutdown_pipeline_handles) when done.
pub struct PipelineHandles {
    pub output_rx: Receiver<String>,
    pub stage_handles: Vec<StageHandle>,
    /// Number of items seeded into the first queue.
    pub item_count: usize,
}

/// Build the first queue: every item converted to its string form, then closed.
/// Returns (receiver, item count).
pub fn seed_source_queue<I, T>(items: I) -> (Receiver<String>, usize)
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    let (tx, rx) = unbounded::<String>();
    let mut count = 0_usize;
    for item in items {
        // rx is alive for the whole loop, send cannot fail on an unbounded channel
        let _ = tx.send(item.to_string());
        count += 1;
    }
    // Dropping the only sender closes the source queue.
    drop(tx);
    (rx, count)
}
