use crate::directives::ShaderSource;
use crate::TranslateError;
use async_trait::async_trait;
use std::fmt;

/// A shader stage handled by one compiler run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    /// cgc profile producing GLSL for this stage.
    pub const fn profile(self) -> &'static str {
        match self {
            Self::Vertex => "glslv",
            Self::Fragment => "glslf",
        }
    }

    /// `#o3d` directive naming this stage's entry point.
    pub const fn entry_directive(self) -> &'static str {
        match self {
            Self::Vertex => "VertexShaderEntryPoint",
            Self::Fragment => "PixelShaderEntryPoint",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// What one compiler run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOutput {
    /// Standard output: header comment block, blank line, GLSL code.
    pub translated_code: String,
    /// Standard error, forwarded into the diagnostic log.
    pub diagnostics: String,
}

/// Trait defining the interface to the external Cg compiler.
///
/// The production implementation spawns `cgc -profile <profile> -entry <entry>`
/// and feeds `source` on stdin; tests plug in deterministic stubs.
#[async_trait]
pub trait ShaderCompiler: Send + Sync {
    /// Compiles `source` for `profile` starting at `entry_point`.
    ///
    /// A compiler that ran but reported errors still returns `Ok`; only a
    /// failure to run it at all is an error.
    async fn compile(
        &self,
        profile: &str,
        entry_point: &str,
        source: &str,
    ) -> Result<CompilerOutput, TranslateError>;
}

/// Runs the compiler for one stage.
///
/// The entry point is read from the original source; the renamed source is
/// what the compiler sees.
pub async fn invoke_stage<C: ShaderCompiler + ?Sized>(
    compiler: &C,
    stage: Stage,
    original: &ShaderSource,
    renamed_source: &str,
) -> Result<CompilerOutput, TranslateError> {
    let entry_point = original.entry_point(stage)?;
    log::debug!(
        "Compiling {stage} stage: profile {}, entry '{entry_point}'",
        stage.profile()
    );
    let output = compiler
        .compile(stage.profile(), entry_point, renamed_source)
        .await?;
    log::debug!(
        "{stage} stage produced {} bytes of code, {} bytes of diagnostics",
        output.translated_code.len(),
        output.diagnostics.len()
    );
    Ok(output)
}
