use crate::glsl::lexer::{self, TokenKind};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Placeholder attribute names and the vertex input semantics they stand in for.
///
/// cgc rejects `TANGENT1` and `BINORMAL1`, so all five semantics are swapped for
/// `ATTR8`..`ATTR12` before compiling and swapped back afterwards.
pub const SEMANTIC_PLACEHOLDERS: [(&str, &str); 5] = [
    ("attr8", "normal"),
    ("attr9", "tangent"),
    ("attr10", "binormal"),
    ("attr11", "tangent1"),
    ("attr12", "binormal1"),
];

/// Matrix uniforms whose mixed-case spelling is restored from the lower-cased semantic.
pub const MATRIX_UNIFORM_NAMES: [&str; 23] = [
    "world",
    "view",
    "projection",
    "worldView",
    "worldViewProjection",
    "worldInverse",
    "viewInverse",
    "projectionInverse",
    "worldViewInverse",
    "viewProjectionInverse",
    "worldViewProjectionInverse",
    "worldTranspose",
    "viewTranspose",
    "projectionTranspose",
    "worldViewTranspose",
    "viewProjectionTranspose",
    "worldViewProjectionTranspose",
    "worldInverseTranspose",
    "viewInverseTranspose",
    "projectionInverseTranspose",
    "worldViewInverseTranspose",
    "viewProjectionInverseTranspose",
    "worldViewProjectionInverseTranspose",
];

static MATRIX_UNIFORM_CASE: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    MATRIX_UNIFORM_NAMES
        .iter()
        .map(|name| (name.to_ascii_lowercase(), *name))
        .collect()
});

// Upper-case semantic as written in Cg source -> upper-case placeholder.
static SOURCE_RENAMES: Lazy<HashMap<String, String>> = Lazy::new(|| {
    SEMANTIC_PLACEHOLDERS
        .iter()
        .map(|(placeholder, semantic)| {
            (
                semantic.to_ascii_uppercase(),
                placeholder.to_ascii_uppercase(),
            )
        })
        .collect()
});

/// Returns the original semantic for a placeholder attribute name (`attr8` -> `normal`).
pub fn semantic_for_placeholder(placeholder: &str) -> Option<&'static str> {
    SEMANTIC_PLACEHOLDERS
        .iter()
        .find(|(p, _)| p.eq_ignore_ascii_case(placeholder))
        .map(|(_, semantic)| *semantic)
}

/// Lower-cases a semantic, restoring the canonical spelling of known matrix uniforms.
pub fn correct_semantic_case(semantic: &str) -> String {
    let lower = semantic.to_ascii_lowercase();
    match MATRIX_UNIFORM_CASE.get(&lower) {
        Some(canonical) => (*canonical).to_owned(),
        None => lower,
    }
}

/// Replaces the reserved semantics in Cg source with their placeholders.
///
/// Only whole upper-case words are touched (`NORMAL`, `TANGENT1`, ...), so a
/// variable called `normal` or an identifier like `NORMAL_MAP` passes through.
pub fn rename_semantics(source: &str) -> String {
    let mut tokens = lexer::tokenize(source);
    let mut renamed = 0usize;
    for token in tokens.iter_mut().filter(|t| t.kind == TokenKind::Ident) {
        if let Some(placeholder) = SOURCE_RENAMES.get(&token.text) {
            token.text.clone_from(placeholder);
            renamed += 1;
        }
    }
    log::debug!("Renamed {renamed} reserved semantic occurrence(s) in the Cg source");
    lexer::render(&tokens)
}
