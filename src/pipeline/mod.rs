//! Pipeline components: stage trait, queue wiring, runner, error handling, signing stages.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod stage;
pub mod stages;

pub use context::{PipelineHandles, StageHandle, seed_source_queue};
pub use error_handler::{check_for_failed_stages, panic_message};
pub use orchestrator::{Pipeline, shutdown_pipeline_handles, signer_stages};
pub use stage::{FnStage, Stage, StageContext, stage_fn};
pub use stages::{Combine, MultiHash, SingleHash, combine};
