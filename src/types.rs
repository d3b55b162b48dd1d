//! Public and internal types for the fingerpipe API and pipeline.

use serde::Serialize;
use std::time::Duration;

use crate::engine::probe::ProbeStats;

/// Lib-only options for [`fingerprint`](crate::fingerprint). Only the fields that shape a run.
#[derive(Clone, Debug, Default)]
pub struct PipelineOpts {
    /// Size of the per-item task pool. When None, all rayon threads (at least 2).
    pub num_threads: Option<usize>,
    /// Cap on items in flight per stage. None dispatches every item as soon as it arrives.
    pub max_in_flight: Option<usize>,
    /// Artificial latency added to every checksum call.
    pub checksum_delay: Duration,
    /// Artificial latency added to every digest call.
    pub digest_delay: Duration,
    /// Appended to the data before each primitive call.
    pub salt: String,
}

impl From<&PipelineOpts> for Opts {
    fn from(o: &PipelineOpts) -> Self {
        Opts {
            num_threads: o.num_threads,
            max_in_flight: o.max_in_flight,
            checksum_delay: o.checksum_delay,
            digest_delay: o.digest_delay,
            salt: o.salt.clone(),
            verbose: false,
            json: false,
            stats: false,
            read_stdin: false,
        }
    }
}

impl From<&Opts> for PipelineOpts {
    fn from(o: &Opts) -> Self {
        PipelineOpts {
            num_threads: o.num_threads,
            max_in_flight: o.max_in_flight,
            checksum_delay: o.checksum_delay,
            digest_delay: o.digest_delay,
            salt: o.salt.clone(),
        }
    }
}

/// Full options (CLI). Use [`PipelineOpts`] for lib.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Size of the per-item task pool.
    pub num_threads: Option<usize>,
    /// Cap on items in flight per stage.
    pub max_in_flight: Option<usize>,
    /// Artificial checksum latency.
    pub checksum_delay: Duration,
    /// Artificial digest latency.
    pub digest_delay: Duration,
    /// Signer salt.
    pub salt: String,
    /// Debug logging.
    pub verbose: bool,
    /// Print a JSON [`RunReport`] instead of the bare fingerprint.
    pub json: bool,
    /// Include primitive call counters in the output.
    pub stats: bool,
    /// Read one item per non-empty stdin line in addition to positional items.
    pub read_stdin: bool,
}

/// Outcome of one CLI run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub fingerprint: String,
    pub items: usize,
    pub elapsed_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ProbeStats>,
}
