use cg2glsl_cgc::CgcError;
use cg2glsl_core::TranslationFailure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Translation Error: {0}")]
    Translate(#[from] TranslationFailure),

    // Carries the instructional not-found message as is.
    #[error(transparent)]
    Compiler(#[from] CgcError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
