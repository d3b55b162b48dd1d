//! Signer salt loading: env var → .env in dir.

use log::debug;
use std::path::Path;

use crate::utils::config::PackagePaths;

fn non_empty_env(key: &str) -> Option<String> {
    let s = std::env::var(key).ok()?;
    let s = s.trim().to_string();
    (!s.is_empty()).then_some(s)
}

/// Read the salt: env (`FINGERPIPE_SALT`) → `.env` in `dir`. None when neither sets it.
pub fn salt_from_env(dir: &Path) -> Option<String> {
    let key = PackagePaths::get().salt_env_key();
    if let Some(s) = non_empty_env(key) {
        debug!("Salt found in environment");
        return Some(s);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        if let Some(s) = non_empty_env(key) {
            debug!("Salt loaded from {}", env_path.display());
            return Some(s);
        }
    }
    None
}
