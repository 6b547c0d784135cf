//! Logging setup for the application.

use crate::config::AppConfig;
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the logger for the run.
///
/// `--log-level` sets the default; `RUST_LOG`, when present, is applied on top
/// of it so individual modules can still be turned up. Everything goes to
/// stderr, keeping stdout for the converted shader.
pub fn init_logger(config: &AppConfig) {
    let level: LevelFilter = config.log_level.into();

    let mut builder = Builder::new();
    builder.filter_level(level);
    builder.parse_env(Env::default());
    builder.format_timestamp(None);

    // Tests may initialize more than once; the first logger wins.
    if builder.try_init().is_err() {
        return;
    }

    log::debug!("Logger initialized with level {level}");
}
