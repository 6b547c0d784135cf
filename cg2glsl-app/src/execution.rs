//! Drives one conversion: settings, compiler lookup, input, pipeline, output.

use crate::{config::AppConfig, error::AppError, output, settings::Settings};
use cg2glsl_cgc::{check_cgc, default_cgc, CgcCompiler};
use cg2glsl_core::{translate, ShaderSource};
use clap::CommandFactory;
use log::{error, info};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Name reported when no cgc could be found anywhere.
const FALLBACK_CGC: &str = "cgc";

/// Picks the compiler binary and makes sure it exists.
pub fn resolve_cgc(settings: &Settings) -> Result<PathBuf, AppError> {
    let path = settings
        .cgc_path
        .clone()
        .or_else(default_cgc)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_CGC));
    check_cgc(&path)?;
    info!("Using cgc at {}", path.display());
    Ok(path)
}

/// Reads the shader from `path` or from stdin. Returns `None` for empty input.
///
/// Bytes that are not UTF-8 (e.g. Latin-1 comments) are replaced, not rejected.
pub fn read_input(path: Option<&Path>) -> Result<Option<String>, AppError> {
    let bytes = match path {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes)?;
            bytes
        }
    };
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Runs the converter for the parsed command line.
pub fn run(config: &AppConfig) -> Result<(), AppError> {
    let settings = Settings::load(config)?;
    let timeout = settings.timeout()?;
    let cgc_path = resolve_cgc(&settings)?;

    let Some(text) = read_input(config.input.as_deref())? else {
        AppConfig::command().print_help()?;
        return Ok(());
    };

    let compiler = CgcCompiler::new(cgc_path).with_timeout(timeout);
    let source = ShaderSource::new(text);

    // One stage at a time; a current-thread runtime is all the pipeline needs.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match runtime.block_on(translate(&compiler, &source)) {
        Ok(result) => {
            output::write_result(&result, config.output.as_deref())?;
            info!("Conversion finished");
            Ok(())
        }
        Err(failure) => {
            error!("Conversion failed: {failure}");
            // Keep what cgc said; it usually explains the failure.
            if !failure.diagnostic_log.is_empty() {
                eprintln!("{}", failure.diagnostic_log);
            }
            Err(failure.into())
        }
    }
}
