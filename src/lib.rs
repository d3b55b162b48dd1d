//! Fingerpipe: concurrent multi-stage hashing pipeline with a deterministic fingerprint

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::{DataSigner, DigestGate, ProbeStats, Signer, SignerProbe};
pub use pipeline::{Pipeline, Stage, StageContext, signer_stages, stage_fn};

use log::debug;
use std::sync::Arc;

/// Result alias used by public fingerpipe API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: fingerprint `items` with the default [`DataSigner`] built from `opts`.
///
/// Items are taken in order and converted with `ToString` once, at entry. The result only
/// depends on the set of items (and salt), not on scheduling.
///
/// ```ignore
/// let fp = fingerpipe::fingerprint([0, 1, 1, 2, 3, 5, 8], &PipelineOpts::default())?;
/// ```
pub fn fingerprint<I, T>(items: I, opts: &PipelineOpts) -> Result<String>
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    fingerprint_with(items, opts, Arc::new(DataSigner::from_opts(opts)))
}

/// Like [`fingerprint`] with a caller-supplied signer (e.g. a [`SignerProbe`] or test doubles).
///
/// Digests go through the process-wide [`DigestGate::process`] gate.
pub fn fingerprint_with<I, T>(items: I, opts: &PipelineOpts, signer: Arc<dyn Signer>) -> Result<String>
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    let stages = signer_stages(signer, DigestGate::process());
    let pipeline = Pipeline::with_opts(stages, opts)?;
    debug!("Stages: {}", pipeline.stage_names().join(" -> "));

    let outputs = pipeline.run(items)?;
    // Combine emits exactly one item, even for empty input.
    outputs
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("combine stage emitted no fingerprint"))
}
