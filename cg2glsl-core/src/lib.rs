//! Core library for converting o3d Cg shaders into GLSL vertex/fragment pairs.
//! Holds the text rewriting pipeline; the external compiler is injected through
//! the [`ShaderCompiler`] trait so nothing here touches processes or files.

use thiserror::Error;

// Module declarations (keep public if they contain public items)
/// Seam to the external Cg compiler and per-stage invocation.
pub mod compiler;
/// `#o3d` directive extraction from the original Cg source.
pub mod directives;
/// Token-level representation of GLSL and Cg text.
pub mod glsl;
/// Compiler header parsing into a symbol mapping.
pub mod mapping;
/// The end-to-end translation run and output assembly.
pub mod pipeline;
/// Rewriting of one translated stage body.
pub mod rewriter;
/// Fixed semantic and matrix-uniform tables.
pub mod semantics;

// Re-export core public items

/// Trait implemented by anything that can run the Cg compiler.
pub use crate::compiler::ShaderCompiler;
/// Captured stdout/stderr of one compiler run.
pub use crate::compiler::CompilerOutput;
/// Shader stage (vertex or fragment).
pub use crate::compiler::Stage;
/// Immutable original shader text with directive accessors.
pub use crate::directives::ShaderSource;
/// Generated identifier to original name mapping for one stage.
pub use crate::mapping::SymbolMapping;
/// Runs the whole conversion.
pub use crate::pipeline::translate;
/// Failure of a conversion run, with the diagnostics captured so far.
pub use crate::pipeline::TranslationFailure;
/// Successful conversion result.
pub use crate::pipeline::TranslationResult;
/// Rewritten stage body with its synthesized declarations.
pub use crate::rewriter::RewrittenShader;

/// Errors that can occur while converting a shader.
///
/// Every variant is fatal for the run; there is no partial output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// The compiler output header is missing, not a comment block, or has a
    /// `//var` line without exactly five fields.
    #[error("Malformed compiler header: {0}")]
    MalformedHeader(String),
    /// The Cg source lacks a required `#o3d` directive.
    #[error("Malformed shader source: missing '#o3d {0}' directive")]
    MissingDirective(&'static str),
    /// A uniform or attribute in the translated body has no header entry.
    #[error("Unmapped identifier: '{0}' has no entry in the compiler header")]
    UnmappedIdentifier(String),
    /// An attribute maps to something other than a renamed vertex input semantic.
    #[error("Unexpected namespace: attribute '{name}' maps to '{mapped}', expected one of $vin.attr8..$vin.attr12")]
    UnexpectedNamespace {
        /// Generated attribute name in the translated body.
        name: String,
        /// Header value it resolved to.
        mapped: String,
    },
    /// `gl_Position` is referenced more than once, so the rewrite is ambiguous.
    #[error("Multiple clip assignments: gl_Position appears {0} times, exactly one assignment is supported")]
    MultipleClipAssignment(usize),
    /// The single `gl_Position` reference is not followed by a `;`.
    #[error("Malformed clip assignment: gl_Position statement is not terminated by ';'")]
    UnterminatedClipAssignment,
    /// The translated code still uses an input the semantic renamer should have removed.
    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),
    /// The external compiler could not be started or did not complete.
    #[error("External tool error: {0}")]
    ExternalTool(String),
}
