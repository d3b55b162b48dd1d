pub mod config;
pub mod fingerpipe_toml;
pub mod logger;
pub mod salt;

pub use config::*;
pub use fingerpipe_toml::{FingerpipeToml, apply_file_to_opts, load_fingerpipe_toml};
pub use logger::setup_logging;
pub use salt::salt_from_env;
