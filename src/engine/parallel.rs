//! Shared helpers for parallel processing: the task pool, in-flight limits, per-item dispatch.

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender, bounded};
use log::debug;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::pipeline::StageContext;
use crate::utils::config::{PackagePaths, WorkerThreadLimits};

/// Build the pool that runs per-item tasks. Stage loops do not run on it.
pub fn build_task_pool(requested: Option<usize>) -> Result<ThreadPool> {
    let num_threads = WorkerThreadLimits::current().resolve(requested);
    debug!("Task pool: {} threads", num_threads);
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("{}-task-{i}", PackagePaths::get().pkg_name()))
        .build()
        .context("build task pool")
}

/// Caps how many items a stage has in flight. A bounded channel of tokens: acquiring sends
/// (blocks when full), dropping the [`Permit`] takes one token back out.
#[derive(Clone, Debug)]
pub struct InFlightLimit {
    tokens: Option<(Sender<()>, Receiver<()>)>,
}

/// Held by a running task; frees its slot on drop.
pub struct Permit(Option<Receiver<()>>);

impl Drop for Permit {
    fn drop(&mut self) {
        if let Some(rx) = &self.0 {
            let _ = rx.try_recv();
        }
    }
}

impl InFlightLimit {
    /// `None` → no limit. `Some(0)` is treated as 1.
    pub fn new(max: Option<usize>) -> Self {
        Self {
            tokens: max.map(|n| bounded(n.max(1))),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.tokens.is_some()
    }

    /// Block until a slot is free (never blocks when unbounded).
    pub fn acquire(&self) -> Permit {
        match &self.tokens {
            Some((tx, rx)) => {
                let _ = tx.send(());
                Permit(Some(rx.clone()))
            }
            None => Permit(None),
        }
    }
}

/// Run `work` for every item of `input` as its own task on the stage pool and send each result
/// to `output`. Items are dispatched as they arrive, without waiting for earlier ones.
///
/// Returns the number of items dispatched, only after `input` closed **and** every dispatched
/// task finished; the caller may then drop its `output` sender. A panic in any task is
/// re-raised here once the remaining tasks are done.
pub fn dispatch_each<F>(
    ctx: &StageContext,
    input: &Receiver<String>,
    output: &Sender<String>,
    work: F,
) -> usize
where
    F: Fn(String) -> String + Sync,
{
    let limit = InFlightLimit::new(ctx.max_in_flight);
    let work = &work;
    let mut dispatched = 0_usize;
    ctx.pool.in_place_scope(|scope| {
        for item in input.iter() {
            let permit = limit.acquire();
            let output = output.clone();
            scope.spawn(move |_| {
                let _permit = permit;
                // Downstream gone means the run is failing already; nothing to deliver to.
                let _ = output.send(work(item));
            });
            dispatched += 1;
        }
    });
    dispatched
}
