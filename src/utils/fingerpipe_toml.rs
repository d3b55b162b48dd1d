//! Load `.fingerpipe.toml` from a directory (CLI only). Lib does not use this; the consuming program passes PipelineOpts.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct FingerpipeToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    threads: Option<usize>,
    max_in_flight: Option<usize>,
    checksum_delay_ms: Option<u64>,
    digest_delay_ms: Option<u64>,
    salt: Option<String>,
    verbose: Option<bool>,
    json: Option<bool>,
    stats: Option<bool>,
}

/// Load the package config file from `dir`. `Ok(None)` when the file does not exist;
/// an unreadable or malformed file is an error (runs before logging is set up).
pub fn load_fingerpipe_toml(dir: &Path) -> Result<Option<FingerpipeToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    if !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let file = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(file))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before env and CLI.
pub fn apply_file_to_opts(file: &FingerpipeToml, opts: &mut Opts) {
    let sec = &file.settings;
    if let Some(n) = sec.threads {
        opts.num_threads = Some(n);
    }
    if let Some(n) = sec.max_in_flight {
        opts.max_in_flight = Some(n);
    }
    if let Some(ms) = sec.checksum_delay_ms {
        opts.checksum_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = sec.digest_delay_ms {
        opts.digest_delay = Duration::from_millis(ms);
    }
    if let Some(ref s) = sec.salt {
        opts.salt = s.clone();
    }
    apply_file_opt!(sec, opts, verbose => verbose);
    apply_file_opt!(sec, opts, json => json);
    apply_file_opt!(sec, opts, stats => stats);
}
