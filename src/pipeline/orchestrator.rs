use anyhow::{Context, Result};
use crossbeam_channel::unbounded;
use log::debug;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::PipelineOpts;
use crate::engine::parallel::build_task_pool;
use crate::engine::{DigestGate, Signer};
use crate::pipeline::{
    Combine, MultiHash, PipelineHandles, SingleHash, Stage, StageContext, StageHandle,
    check_for_failed_stages, panic_message, seed_source_queue,
};
use crate::utils::config::PackagePaths;

/// An ordered list of stages plus the task pool they share. Owns queue wiring and stage
/// threads; callers only hand in items.
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
    ctx: Arc<StageContext>,
}

impl Pipeline {
    /// Pipeline with default tuning (pool sized from available threads, unbounded dispatch).
    pub fn new(stages: Vec<Arc<dyn Stage>>) -> Result<Self> {
        Self::with_opts(stages, &PipelineOpts::default())
    }

    pub fn with_opts(stages: Vec<Arc<dyn Stage>>, opts: &PipelineOpts) -> Result<Self> {
        let pool = build_task_pool(opts.num_threads)?;
        let ctx = StageContext {
            pool: Arc::new(pool),
            max_in_flight: opts.max_in_flight,
        };
        debug!("Pipeline: {} stages, {:?}", stages.len(), ctx);
        Ok(Self {
            stages,
            ctx: Arc::new(ctx),
        })
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Start every stage on its own thread. Stage n reads queue n and writes queue n+1; queue 0
    /// holds `items` and is already closed. Caller receives from `output_rx` and must pass
    /// `stage_handles` to [`shutdown_pipeline_handles`].
    pub fn spawn<I, T>(&self, items: I) -> Result<PipelineHandles>
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let (mut input, item_count) = seed_source_queue(items);
        debug!("Source queue: {} items", item_count);

        let mut stage_handles = Vec::with_capacity(self.stages.len());
        for (idx, stage) in self.stages.iter().enumerate() {
            let (output_tx, output_rx) = unbounded::<String>();
            let stage = Arc::clone(stage);
            let ctx = Arc::clone(&self.ctx);
            let name = stage.name().to_string();
            let spawned = thread::Builder::new()
                .name(format!("{}-stage-{idx}", PackagePaths::get().pkg_name()))
                .spawn(move || {
                    let started = Instant::now();
                    debug!("Stage '{}' started", stage.name());
                    // run consumes output_tx; returning drops it and closes the next queue
                    stage.run(&ctx, input, output_tx);
                    debug!("Stage '{}' done in {:?}", stage.name(), started.elapsed());
                });
            match spawned {
                Ok(handle) => stage_handles.push(StageHandle { name, handle }),
                Err(e) => {
                    // Stages already running see their downstream vanish and finish; wait for them.
                    let _ = shutdown_pipeline_handles(stage_handles);
                    return Err(e).with_context(|| format!("spawn stage '{}'", name));
                }
            }
            input = output_rx;
        }

        Ok(PipelineHandles {
            output_rx: input,
            stage_handles,
            item_count,
        })
    }

    /// Run all stages over `items` and return everything the last stage emitted.
    /// Blocks until every stage finished, even when one of them failed.
    pub fn run<I, T>(&self, items: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let PipelineHandles {
            output_rx,
            stage_handles,
            item_count,
        } = self.spawn(items)?;

        // Queues are unbounded, so joining before draining cannot block a producer.
        shutdown_pipeline_handles(stage_handles)?;

        let outputs: Vec<String> = output_rx.iter().collect();
        debug!(
            "Pipeline done: {} items in, {} items out",
            item_count,
            outputs.len()
        );
        Ok(outputs)
    }
}

/// Join every stage thread (after or while the output is drained). Never returns early:
/// all stages are joined, then the first panicked stage, if any, becomes the error.
pub fn shutdown_pipeline_handles(stage_handles: Vec<StageHandle>) -> Result<()> {
    let mut failures = Vec::new();
    for StageHandle { name, handle } in stage_handles {
        if let Err(payload) = handle.join() {
            failures.push((name, panic_message(payload.as_ref())));
        }
    }
    check_for_failed_stages(failures)
}

/// The signing stages in order: single hash → multi hash → combine.
/// Every single-hash stage built from the same `gate` shares one digest slot.
pub fn signer_stages(signer: Arc<dyn Signer>, gate: Arc<DigestGate>) -> Vec<Arc<dyn Stage>> {
    vec![
        Arc::new(SingleHash::new(Arc::clone(&signer), gate)),
        Arc::new(MultiHash::new(signer)),
        Arc::new(Combine),
    ]
}
