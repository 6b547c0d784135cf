use crate::compiler::{invoke_stage, CompilerOutput, ShaderCompiler, Stage};
use crate::directives::ShaderSource;
use crate::rewriter::fix_stage;
use crate::semantics::rename_semantics;
use crate::TranslateError;
use std::fmt;

/// Marker line separating the vertex and fragment shaders in the output.
pub const SPLIT_MARKER: &str = "// #o3d SplitMarker";

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub diagnostic_log: String,
    /// The `#o3d MatrixLoadOrder` line of the source, trimmed.
    pub matrix_load_order: String,
}

impl TranslationResult {
    /// Log, vertex shader, split marker, load order, fragment shader.
    pub fn assemble(&self) -> String {
        format!(
            "{}\n{}\n\n{SPLIT_MARKER}\n{}\n\n{}\n",
            self.diagnostic_log, self.vertex_shader, self.matrix_load_order, self.fragment_shader
        )
    }
}

impl fmt::Display for TranslationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.assemble())
    }
}

/// A failed conversion.
///
/// Carries whatever compiler diagnostics were captured before the failure so
/// the caller can still show them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFailure {
    /// Stage being processed, if the failure belongs to one.
    pub stage: Option<Stage>,
    pub error: TranslateError,
    pub diagnostic_log: String,
}

impl TranslationFailure {
    fn new(stage: Option<Stage>, error: TranslateError, diagnostic_log: &str) -> Self {
        Self {
            stage,
            error,
            diagnostic_log: diagnostic_log.to_owned(),
        }
    }
}

impl fmt::Display for TranslationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stage {
            Some(stage) => write!(f, "{stage} stage: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for TranslationFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Formats one stage's stderr as a comment block.
pub fn format_diagnostics(stage: Stage, diagnostics: &str) -> String {
    let lines: Vec<String> = diagnostics.lines().map(|l| format!("// {l}")).collect();
    format!("// {} profile log:\n{}", stage.profile(), lines.join("\n"))
}

/// Converts a Cg shader into the vertex/fragment GLSL pair.
///
/// Runs strictly in order: rename semantics, compile the vertex stage, compile
/// the fragment stage, rewrite both. Any error aborts the whole run.
pub async fn translate<C: ShaderCompiler + ?Sized>(
    compiler: &C,
    source: &ShaderSource,
) -> Result<TranslationResult, TranslationFailure> {
    let matrix_load_order = source
        .matrix_load_order()
        .map_err(|e| TranslationFailure::new(None, e, ""))?
        .to_owned();

    let renamed = rename_semantics(source.text());

    let vertex: CompilerOutput = invoke_stage(compiler, Stage::Vertex, source, &renamed)
        .await
        .map_err(|e| TranslationFailure::new(Some(Stage::Vertex), e, ""))?;
    let vertex_log = format_diagnostics(Stage::Vertex, &vertex.diagnostics);

    let fragment = invoke_stage(compiler, Stage::Fragment, source, &renamed)
        .await
        .map_err(|e| {
            TranslationFailure::new(Some(Stage::Fragment), e, &format!("{vertex_log}\n"))
        })?;
    let fragment_log = format_diagnostics(Stage::Fragment, &fragment.diagnostics);

    let diagnostic_log = format!("{vertex_log}\n\n{fragment_log}\n");

    let vertex_shader = fix_stage(&vertex.translated_code)
        .map_err(|e| TranslationFailure::new(Some(Stage::Vertex), e, &diagnostic_log))?;
    let fragment_shader = fix_stage(&fragment.translated_code)
        .map_err(|e| TranslationFailure::new(Some(Stage::Fragment), e, &diagnostic_log))?;

    log::info!("Translated vertex and fragment stages");
    Ok(TranslationResult {
        vertex_shader,
        fragment_shader,
        diagnostic_log,
        matrix_load_order,
    })
}
