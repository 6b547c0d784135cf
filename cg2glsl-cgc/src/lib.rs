//! Adapter running NVIDIA's `cgc` as the [`ShaderCompiler`] of the conversion
//! pipeline, plus the lookup of the binary on disk.
//!
//! [`ShaderCompiler`]: cg2glsl_core::ShaderCompiler

use cg2glsl_core::TranslateError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub mod cgc;
pub mod locate;

pub use cgc::CgcCompiler;
pub use locate::{check_cgc, default_cgc};

/// Errors raised while locating or running `cgc`.
#[derive(Error, Debug)]
pub enum CgcError {
    #[error("{} is not found, use --cgc option to specify its location. You may need to install nvidia cg toolkit.", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to start {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error talking to cgc: {0}")]
    Io(#[from] std::io::Error),
    #[error("cgc did not finish within {}", format_timeout(.0))]
    Timeout(Duration),
}

fn format_timeout(duration: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*duration)
}

impl From<CgcError> for TranslateError {
    fn from(err: CgcError) -> Self {
        Self::ExternalTool(err.to_string())
    }
}
