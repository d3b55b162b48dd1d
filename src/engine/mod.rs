//! Engine module: hash primitives, digest gate, instrumentation, task pool, CLI.

pub mod arg_parser;
pub mod cli;
pub mod gate;
pub mod hashing;
pub mod parallel;
pub mod probe;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use cli::{build_opts, collect_items, handle_run, run_report};
pub use gate::DigestGate;
pub use hashing::{DataSigner, Signer};
pub use parallel::{InFlightLimit, Permit, build_task_pool, dispatch_each};
pub use probe::{ProbeStats, SignerProbe};
