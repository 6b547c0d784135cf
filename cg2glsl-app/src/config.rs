use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

/// Verbosity of the log written to stderr.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

/// Command line of the converter.
#[derive(Parser, Debug)]
#[command(
    name = "cg2glsl",
    author,
    version,
    about = "Converts an o3d Cg shader into a GLSL vertex/fragment pair",
    long_about = None
)]
pub struct AppConfig {
    /// Input shader; standard input if omitted.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Path to cgc. Auto-detected when not given here or in the settings.
    #[arg(long, value_name = "PATH", env = "CG2GLSL_CGC")]
    pub cgc: Option<PathBuf>,

    /// Write the converted shader here instead of standard output.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Give up on a cgc run after this long (e.g., "30s", "500ms").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// TOML settings file. Defaults to ./cg2glsl.toml when present.
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level for messages on stderr; RUST_LOG takes precedence.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
}
