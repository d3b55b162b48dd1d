//! The stage abstraction: one input queue in, one output queue out.

use crossbeam_channel::{Receiver, Sender};
use rayon::ThreadPool;
use std::fmt;
use std::sync::Arc;

/// Shared by every stage of one pipeline: the per-item task pool and dispatch tuning.
pub struct StageContext {
    pub pool: Arc<ThreadPool>,
    /// Cap on items in flight per stage; None = dispatch everything as it arrives.
    pub max_in_flight: Option<usize>,
}

impl fmt::Debug for StageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageContext")
            .field("pool_threads", &self.pool.current_num_threads())
            .field("max_in_flight", &self.max_in_flight)
            .finish()
    }
}

/// A pipeline step. `run` drains `input` until it closes and returns when all of its output
/// has been sent; the runner drops `output` right after, which closes the next queue.
///
/// Implementations must not return while work they started is still running.
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;
    fn run(&self, ctx: &StageContext, input: Receiver<String>, output: Sender<String>);
}

/// Stage backed by a plain function of (input, output).
pub struct FnStage<F> {
    name: String,
    f: F,
}

impl<F> Stage for FnStage<F>
where
    F: Fn(Receiver<String>, Sender<String>) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, _ctx: &StageContext, input: Receiver<String>, output: Sender<String>) {
        (self.f)(input, output)
    }
}

/// Wrap `f` as a stage, e.g. a filter or a custom source.
pub fn stage_fn<F>(name: &str, f: F) -> Arc<dyn Stage>
where
    F: Fn(Receiver<String>, Sender<String>) + Send + Sync + 'static,
{
    Arc::new(FnStage {
        name: name.to_string(),
        f,
    })
}
