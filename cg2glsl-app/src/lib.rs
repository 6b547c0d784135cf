//! cg2glsl Application Library
//!
//! Command line, settings, logging and output handling around the
//! conversion pipeline in `cg2glsl-core`.

pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod output;
pub mod settings;

pub use config::AppConfig;
pub use error::AppError;
pub use settings::Settings;

use clap::Parser;

/// Parses the command line and runs the converter.
///
/// Called from the root binary, which maps an error to exit status 1.
pub fn main() -> Result<(), AppError> {
    let config = AppConfig::parse();
    logging::init_logger(&config);

    log::info!("cg2glsl starting");
    log::debug!("Loaded Config: {:?}", config);

    execution::run(&config)
}
