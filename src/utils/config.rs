//! Application configuration constants.
//! Separators, fan-out width and primitive tuning in one place.

use log::warn;
use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    salt_env_key: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
                salt_env_key: format!("{}_SALT", pkg.to_uppercase()),
            }
        })
    }

    /// Crate name; prefixes thread names and log lines.
    pub fn pkg_name(&self) -> &'static str {
        self.pkg_name
    }

    /// Per-directory config file, e.g. `.fingerpipe.toml`.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable holding the signer salt, e.g. `FINGERPIPE_SALT`.
    pub fn salt_env_key(&self) -> &str {
        &self.salt_env_key
    }
}

// ---- Stage output shape ----

/// Joins the two branches of the single-hash stage: `checksum(x) ~ checksum(digest(x))`.
pub const SINGLE_HASH_SEPARATOR: &str = "~";

/// Joins the sorted multi-hash outputs in the combine stage.
pub const COMBINE_SEPARATOR: &str = "_";

/// Number of indexed checksum branches per item in the multi-hash stage.
pub const MULTI_HASH_FANOUT: usize = 6;

// ---- Worker threads ----

/// Thread limits for the per-item task pool.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Minimum pool size. Two keeps both single-hash branches runnable at once.
    pub floor: usize,
    /// Upper bound for a user override (primitives may sleep, so oversubscription is allowed).
    pub max: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
            max: Self::MAX_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 2;
    pub const MAX_THREADS: usize = 1024;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Resolve the pool size: override when given, else all available threads; clamped to `[floor, max]`.
    /// Warns when an explicit override is out of range.
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        let wanted = requested.unwrap_or(self.all_threads);
        let resolved = wanted.clamp(self.floor, self.max);
        if requested.is_some() && resolved != wanted {
            warn!(
                "Requested {} task threads; using {} (allowed range {}..={})",
                wanted, resolved, self.floor, self.max
            );
        }
        resolved
    }
}

// ---- Primitives ----

/// Digest primitive tuning.
pub struct DigestConsts;

impl DigestConsts {
    /// Sleep imposed on a digest caller that found another call already running.
    pub const OVERHEAT_PENALTY: Duration = Duration::from_secs(1);
}
