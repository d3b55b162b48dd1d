//! CLI command handler: build options (file → env → flags), run the pipeline, print the result.

use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, warn};
use std::io::BufRead;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::engine::arg_parser::Cli;
use crate::engine::{DataSigner, SignerProbe};
use crate::utils::config::PackagePaths;
use crate::utils::{apply_file_to_opts, load_fingerpipe_toml, salt_from_env, setup_logging};
use crate::{Opts, PipelineOpts, RunReport, fingerprint_with};

/// Overwrite opts field from a CLI flag when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $cli_field:ident => $opts_field:ident) => {
        if let Some(v) = $cli.$cli_field {
            $opts.$opts_field = v;
        }
    };
}

/// Defaults, then `.fingerpipe.toml`, then salt from env/.env, then CLI flags.
pub fn build_opts(cli: &Cli) -> Result<Opts> {
    let mut opts = Opts::default();
    if let Some(file) = load_fingerpipe_toml(&cli.config_dir)? {
        apply_file_to_opts(&file, &mut opts);
    }
    if let Some(salt) = salt_from_env(&cli.config_dir) {
        opts.salt = salt;
    }
    if cli.threads.is_some() {
        opts.num_threads = cli.threads;
    }
    if cli.max_in_flight.is_some() {
        opts.max_in_flight = cli.max_in_flight;
    }
    if let Some(ms) = cli.checksum_delay_ms {
        opts.checksum_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = cli.digest_delay_ms {
        opts.digest_delay = Duration::from_millis(ms);
    }
    if let Some(ref s) = cli.salt {
        opts.salt = s.clone();
    }
    apply_cli_opt!(cli, opts, verbose => verbose);
    apply_cli_opt!(cli, opts, json => json);
    apply_cli_opt!(cli, opts, stats => stats);
    apply_cli_opt!(cli, opts, stdin => read_stdin);
    Ok(opts)
}

/// Positional items, then stdin lines (trimmed, empty skipped) when `read_stdin`.
pub fn collect_items<R: BufRead>(cli: &Cli, opts: &Opts, stdin: R) -> Result<Vec<String>> {
    let mut items = cli.items.clone();
    if opts.read_stdin {
        for line in stdin.lines() {
            let line = line.context("read item from stdin")?;
            let line = line.trim();
            if !line.is_empty() {
                items.push(line.to_string());
            }
        }
    }
    Ok(items)
}

/// Fingerprint `items` with a probed [`DataSigner`] built from `opts`.
pub fn run_report(items: &[String], opts: &Opts) -> Result<RunReport> {
    let lib_opts = PipelineOpts::from(opts);
    let probe = Arc::new(SignerProbe::new(DataSigner::from_opts(&lib_opts)));

    let start = Instant::now();
    let fingerprint = fingerprint_with(items, &lib_opts, probe.clone())?;
    let elapsed = start.elapsed();

    let overheats = probe.inner().overheats();
    if overheats > 0 {
        warn!("Digest overheated {} times", overheats);
    }
    let stats = probe.stats();
    debug!("{:?}", stats);

    Ok(RunReport {
        fingerprint,
        items: items.len(),
        elapsed_ms: elapsed.as_millis(),
        stats: opts.stats.then_some(stats),
    })
}

fn print_report(report: &RunReport, opts: &Opts) -> Result<()> {
    if opts.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!("{}", report.fingerprint);
    if let Some(stats) = &report.stats {
        let label = format!("[{}]", PackagePaths::get().pkg_name()).cyan().bold();
        println!(
            "{} {} items in {} ms",
            label, report.items, report.elapsed_ms
        );
        println!(
            "{} checksum: {} calls, peak {} concurrent",
            label, stats.checksum_calls, stats.max_concurrent_checksums
        );
        println!(
            "{} digest:   {} calls, peak {} concurrent",
            label, stats.digest_calls, stats.max_concurrent_digests
        );
    }
    Ok(())
}

/// Run the pipeline over the CLI items and print the fingerprint (or JSON report).
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = build_opts(cli)?;
    setup_logging(opts.verbose);
    debug!(
        "{} CONFIG:{:#?}",
        PackagePaths::get().pkg_name().to_uppercase(),
        opts
    );

    let items = collect_items(cli, &opts, std::io::stdin().lock())?;
    if items.is_empty() {
        warn!("No items given; fingerprint of nothing is the empty string");
    }
    let report = run_report(&items, &opts)?;
    print_report(&report, &opts)
}
