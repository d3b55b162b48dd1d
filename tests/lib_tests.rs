use fingerpipe::engine::{
    Cli, DataSigner, DigestGate, InFlightLimit, Signer, SignerProbe, build_opts, collect_items,
};
use fingerpipe::pipeline::{MultiHash, SingleHash, combine};
use fingerpipe::utils::{PackagePaths, WorkerThreadLimits, load_fingerpipe_toml};
use fingerpipe::{Opts, PipelineOpts};

use clap::Parser;
use std::io::Cursor;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// checksum(x) = x, digest(x) = x
struct Identity;

impl Signer for Identity {
    fn checksum(&self, data: &str) -> String {
        data.to_string()
    }
    fn digest(&self, data: &str) -> String {
        data.to_string()
    }
}

/// Identity, but branch 0 sleeps longest so branches finish in reverse index order.
struct SlowLowIndex;

impl Signer for SlowLowIndex {
    fn checksum(&self, data: &str) -> String {
        let idx = data.chars().next().and_then(|c| c.to_digit(10)).unwrap_or(0);
        thread::sleep(Duration::from_millis(u64::from(5 - idx.min(5)) * 5));
        data.to_string()
    }
    fn digest(&self, data: &str) -> String {
        data.to_string()
    }
}

// --- single hash ---

#[test]
fn test_single_hash_identity() {
    let stage = SingleHash::new(Arc::new(Identity), DigestGate::shared());
    assert_eq!(stage.hash("abc"), "abc~abc");
}

#[test]
fn test_single_hash_is_checksum_tilde_checksum_of_digest() {
    let signer = DataSigner::new();
    let expected = format!(
        "{}~{}",
        signer.checksum("7"),
        signer.checksum(&signer.digest("7"))
    );
    let stage = SingleHash::new(Arc::new(DataSigner::new()), DigestGate::shared());
    assert_eq!(stage.hash("7"), expected);
}

#[test]
fn test_single_hash_digests_through_gate() {
    let gate = DigestGate::shared();
    let stage = SingleHash::new(Arc::new(Identity), Arc::clone(&gate));
    stage.hash("a");
    stage.hash("b");
    assert_eq!(gate.calls(), 2);
}

// --- multi hash ---

#[test]
fn test_multi_hash_identity_positional() {
    let stage = MultiHash::new(Arc::new(Identity));
    assert_eq!(
        stage.hash("abc~abc"),
        "0abc~abc1abc~abc2abc~abc3abc~abc4abc~abc5abc~abc"
    );
}

#[test]
fn test_multi_hash_order_independent_of_completion() {
    let stage = MultiHash::new(Arc::new(SlowLowIndex));
    assert_eq!(stage.hash("x"), "0x1x2x3x4x5x");
}

#[test]
fn test_multi_hash_data_signer_concatenation() {
    let signer = DataSigner::new();
    let expected: String = (0..6).map(|k| signer.checksum(&format!("{k}x"))).collect();
    let stage = MultiHash::new(Arc::new(DataSigner::new()));
    assert_eq!(stage.fanout(), 6);
    assert_eq!(stage.hash("x"), expected);
}

#[test]
fn test_multi_hash_custom_fanout() {
    let stage = MultiHash::with_fanout(Arc::new(Identity), 3);
    assert_eq!(stage.hash("q"), "0q1q2q");
}

// --- combine ---

#[test]
fn test_combine_sorts_and_joins() {
    let hashes = vec!["b".to_string(), "a".to_string(), "c".to_string()];
    assert_eq!(combine(hashes), "a_b_c");
}

#[test]
fn test_combine_empty() {
    assert_eq!(combine(Vec::new()), "");
}

#[test]
fn test_combine_single_unchanged() {
    assert_eq!(combine(vec!["only".to_string()]), "only");
}

#[test]
fn test_combine_bytewise_order() {
    // 'B' (0x42) < '_' (0x5f) < 'a' (0x61)
    let hashes = vec!["a".to_string(), "_".to_string(), "B".to_string()];
    assert_eq!(combine(hashes), "B___a");
}

#[test]
fn test_combine_keeps_duplicates() {
    let hashes = vec!["z".to_string(), "z".to_string(), "y".to_string()];
    assert_eq!(combine(hashes), "y_z_z");
}

// --- DataSigner ---

#[test]
fn test_data_signer_checksum_is_decimal_crc32() {
    let signer = DataSigner::new();
    assert_eq!(signer.checksum("abc"), crc32fast::hash(b"abc").to_string());
    assert_eq!(signer.checksum("abc"), "891568578");
}

#[test]
fn test_data_signer_digest_is_blake3_hex() {
    let signer = DataSigner::new();
    let digest = signer.digest("abc");
    assert_eq!(digest, blake3::hash(b"abc").to_hex().to_string());
    assert_eq!(digest.len(), 64);
}

#[test]
fn test_data_signer_salt_is_appended() {
    let salted = DataSigner::new().with_salt("pepper");
    let plain = DataSigner::new();
    assert_eq!(salted.checksum("abc"), plain.checksum("abcpepper"));
    assert_eq!(salted.digest("abc"), plain.digest("abcpepper"));
}

#[test]
fn test_data_signer_from_opts() {
    let opts = PipelineOpts {
        salt: "s".to_string(),
        ..Default::default()
    };
    let signer = DataSigner::from_opts(&opts);
    assert_eq!(signer.checksum("a"), DataSigner::new().checksum("as"));
}

#[test]
fn test_data_signer_detects_overlapping_digests() {
    let signer = DataSigner::new()
        .with_delays(Duration::ZERO, Duration::from_millis(60))
        .with_overheat_penalty(Duration::from_millis(5));
    let barrier = Barrier::new(2);
    thread::scope(|s| {
        s.spawn(|| {
            barrier.wait();
            signer.digest("first");
        });
        s.spawn(|| {
            barrier.wait();
            thread::sleep(Duration::from_millis(15));
            signer.digest("second");
        });
    });
    assert!(signer.overheats() >= 1);
}

#[test]
fn test_data_signer_sequential_digests_never_overheat() {
    let signer = DataSigner::new();
    for i in 0..10 {
        signer.digest(&i.to_string());
    }
    assert_eq!(signer.overheats(), 0);
}

// --- DigestGate / SignerProbe ---

#[test]
fn test_gate_serializes_concurrent_digests() {
    let probe = SignerProbe::new(
        DataSigner::new().with_delays(Duration::ZERO, Duration::from_millis(3)),
    );
    let gate = DigestGate::new();
    thread::scope(|s| {
        for i in 0..8 {
            let (probe, gate) = (&probe, &gate);
            s.spawn(move || gate.digest(probe, &i.to_string()));
        }
    });
    let stats = probe.stats();
    assert_eq!(stats.digest_calls, 8);
    assert_eq!(stats.max_concurrent_digests, 1);
    assert_eq!(gate.calls(), 8);
    assert_eq!(probe.inner().overheats(), 0);
}

#[test]
fn test_process_gate_is_shared() {
    assert!(Arc::ptr_eq(&DigestGate::process(), &DigestGate::process()));
}

#[test]
fn test_probe_counts_calls() {
    let probe = SignerProbe::new(Identity);
    probe.checksum("a");
    probe.checksum("b");
    probe.digest("c");
    let stats = probe.stats();
    assert_eq!(stats.checksum_calls, 2);
    assert_eq!(stats.digest_calls, 1);
    assert_eq!(stats.max_concurrent_checksums, 1);
    assert_eq!(stats.max_concurrent_digests, 1);
}

#[test]
fn test_probe_sees_parallel_checksums() {
    let probe = SignerProbe::new(
        DataSigner::new().with_delays(Duration::from_millis(40), Duration::ZERO),
    );
    let barrier = Barrier::new(4);
    thread::scope(|s| {
        for i in 0..4 {
            let (probe, barrier) = (&probe, &barrier);
            s.spawn(move || {
                barrier.wait();
                probe.checksum(&i.to_string())
            });
        }
    });
    assert!(probe.stats().max_concurrent_checksums >= 2);
}

// --- InFlightLimit ---

#[test]
fn test_in_flight_limit_releases_on_drop() {
    let limit = InFlightLimit::new(Some(1));
    assert!(limit.is_bounded());
    let first = limit.acquire();
    drop(first);
    // Would block forever if the first permit had not been returned.
    let _second = limit.acquire();
}

#[test]
fn test_in_flight_limit_zero_means_one() {
    let limit = InFlightLimit::new(Some(0));
    let p = limit.acquire();
    drop(p);
    let _p = limit.acquire();
}

#[test]
fn test_in_flight_unbounded() {
    let limit = InFlightLimit::new(None);
    assert!(!limit.is_bounded());
    let _permits: Vec<_> = (0..1000).map(|_| limit.acquire()).collect();
}

// --- config ---

#[test]
fn test_thread_limits_resolve() {
    let limits = WorkerThreadLimits {
        all_threads: 8,
        ..Default::default()
    };
    assert_eq!(limits.resolve(None), 8);
    assert_eq!(limits.resolve(Some(1)), WorkerThreadLimits::FLOOR_THREADS);
    assert_eq!(limits.resolve(Some(0)), WorkerThreadLimits::FLOOR_THREADS);
    assert_eq!(limits.resolve(Some(2)), 2);
    assert_eq!(limits.resolve(Some(16)), 16);
    assert_eq!(limits.resolve(Some(1 << 20)), WorkerThreadLimits::MAX_THREADS);
}

#[test]
fn test_package_paths_derive_from_crate_name() {
    let paths = PackagePaths::get();
    assert_eq!(paths.pkg_name(), "fingerpipe");
    assert_eq!(paths.config_filename(), ".fingerpipe.toml");
    assert_eq!(paths.salt_env_key(), "FINGERPIPE_SALT");
}

#[test]
fn test_toml_missing_is_none() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    assert!(load_fingerpipe_toml(dir.path())?.is_none());
    Ok(())
}

#[test]
fn test_toml_malformed_is_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join(".fingerpipe.toml"), "[settings\nthreads = ")?;
    assert!(load_fingerpipe_toml(dir.path()).is_err());
    Ok(())
}

#[test]
fn test_build_opts_file_then_cli() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join(".fingerpipe.toml"),
        "[settings]\nthreads = 3\nmax_in_flight = 4\nchecksum_delay_ms = 5\nsalt = \"pepper\"\njson = true\n",
    )?;
    let dir_arg = dir.path().to_string_lossy().to_string();

    let cli = Cli::parse_from(["fingerpipe", "--config-dir", dir_arg.as_str(), "a"]);
    let opts = build_opts(&cli)?;
    assert_eq!(opts.num_threads, Some(3));
    assert_eq!(opts.max_in_flight, Some(4));
    assert_eq!(opts.checksum_delay, Duration::from_millis(5));
    assert_eq!(opts.digest_delay, Duration::ZERO);
    assert_eq!(opts.salt, "pepper");
    assert!(opts.json);
    assert!(!opts.stats);

    let cli = Cli::parse_from([
        "fingerpipe",
        "--config-dir",
        dir_arg.as_str(),
        "-t",
        "7",
        "--salt",
        "cli",
        "--json=false",
        "--stats",
        "a",
    ]);
    let opts = build_opts(&cli)?;
    assert_eq!(opts.num_threads, Some(7));
    assert_eq!(opts.salt, "cli");
    assert!(!opts.json);
    assert!(opts.stats);
    assert_eq!(cli.items, vec!["a"]);
    Ok(())
}

#[test]
fn test_bool_flags_do_not_swallow_items() -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(["fingerpipe", "-v", "abc"])?;
    assert_eq!(cli.verbose, Some(true));
    assert_eq!(cli.items, vec!["abc"]);

    let cli = Cli::try_parse_from(["fingerpipe", "--stdin", "abc", "--json", "def", "--stats", "ghi"])?;
    assert_eq!(cli.stdin, Some(true));
    assert_eq!(cli.json, Some(true));
    assert_eq!(cli.stats, Some(true));
    assert_eq!(cli.items, vec!["abc", "def", "ghi"]);

    let cli = Cli::try_parse_from(["fingerpipe", "--verbose=false", "true"])?;
    assert_eq!(cli.verbose, Some(false));
    assert_eq!(cli.items, vec!["true"]);
    Ok(())
}

#[test]
fn test_collect_items_args_and_stdin() -> anyhow::Result<()> {
    let cli = Cli::parse_from(["fingerpipe", "one", "two"]);
    let opts = Opts {
        read_stdin: true,
        ..Default::default()
    };
    let items = collect_items(&cli, &opts, Cursor::new("three\n\n  four  \n"))?;
    assert_eq!(items, vec!["one", "two", "three", "four"]);

    let opts = Opts::default();
    let items = collect_items(&cli, &opts, Cursor::new("ignored\n"))?;
    assert_eq!(items, vec!["one", "two"]);
    Ok(())
}

#[test]
fn test_opts_round_trip_keeps_pipeline_fields() {
    let lib = PipelineOpts {
        num_threads: Some(4),
        max_in_flight: Some(2),
        checksum_delay: Duration::from_millis(1),
        digest_delay: Duration::from_millis(2),
        salt: "s".to_string(),
    };
    let full = Opts::from(&lib);
    assert!(!full.verbose);
    let back = PipelineOpts::from(&full);
    assert_eq!(back.num_threads, Some(4));
    assert_eq!(back.max_in_flight, Some(2));
    assert_eq!(back.digest_delay, Duration::from_millis(2));
    assert_eq!(back.salt, "s");
}
