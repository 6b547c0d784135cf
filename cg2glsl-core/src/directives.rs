use crate::compiler::Stage;
use crate::TranslateError;
use once_cell::sync::Lazy;
use regex::Regex;

static VERTEX_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#o3d\s+VertexShaderEntryPoint\s+(\w+)").expect("valid vertex entry pattern")
});

static FRAGMENT_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#o3d\s+PixelShaderEntryPoint\s+(\w+)").expect("valid fragment entry pattern")
});

static MATRIX_LOAD_ORDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^.*#o3d\s+MatrixLoadOrder\b.*$").expect("valid matrix load order pattern")
});

/// Directive naming the matrix load order.
pub const MATRIX_LOAD_ORDER_DIRECTIVE: &str = "MatrixLoadOrder";

/// The original Cg shader text. Never modified after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    text: String,
}

impl ShaderSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Entry point function named by the stage's `#o3d ...EntryPoint` directive.
    pub fn entry_point(&self, stage: Stage) -> Result<&str, TranslateError> {
        let pattern = match stage {
            Stage::Vertex => &VERTEX_ENTRY,
            Stage::Fragment => &FRAGMENT_ENTRY,
        };
        pattern
            .captures(&self.text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or(TranslateError::MissingDirective(stage.entry_directive()))
    }

    /// The whole `#o3d MatrixLoadOrder` line, trimmed.
    pub fn matrix_load_order(&self) -> Result<&str, TranslateError> {
        MATRIX_LOAD_ORDER
            .find(&self.text)
            .map(|m| m.as_str().trim())
            .ok_or(TranslateError::MissingDirective(MATRIX_LOAD_ORDER_DIRECTIVE))
    }
}
