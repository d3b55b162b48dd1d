use clap::Parser;
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const CONFIG_DIR: &'static str = ".";
}

/// Concurrent hashing pipeline: single hash → multi hash → combine.
#[derive(Clone, Parser)]
#[command(name = "fingerpipe")]
#[command(about = "Fingerprint a list of items through the concurrent signing pipeline.")]
pub struct Cli {
    /// Items to fingerprint, in input order.
    #[arg(value_name = "ITEM")]
    pub items: Vec<String>,

    /// Also read items from stdin, one per non-empty line. Bool flags take `--flag=false`.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub stdin: Option<bool>,

    /// Per-item task pool size (min 2, max 1024). Default: available threads.
    #[arg(long, short = 't', value_parser = clap::value_parser!(usize))]
    pub threads: Option<usize>,

    /// Max items in flight per stage. Default: unlimited.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub max_in_flight: Option<usize>,

    /// Artificial latency per checksum call, in milliseconds.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub checksum_delay_ms: Option<u64>,

    /// Artificial latency per digest call, in milliseconds.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub digest_delay_ms: Option<u64>,

    /// Salt appended before hashing. Overrides FINGERPIPE_SALT / .env.
    #[arg(long, short = 's')]
    pub salt: Option<String>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Print a JSON report instead of the bare fingerprint.
    #[arg(long, short = 'j', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub json: Option<bool>,

    /// Report primitive call counts and peak concurrency.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub stats: Option<bool>,

    /// Directory holding `.fingerpipe.toml` and `.env`. Default: current directory.
    #[arg(long, value_name = "DIR", default_value = DefaultArgs::CONFIG_DIR)]
    pub config_dir: PathBuf,
}
