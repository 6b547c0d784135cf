//! Turns the GLSL cgc emits into GLSL the o3d GL renderer accepts.
//!
//! Transforms run in a fixed order, each on the output of the previous one:
//! restore uniform and attribute names, collapse `vecN x[N]` uniforms into
//! `matN`, replace `gl_Vertex` / `gl_MultiTexCoordN` with declared attributes,
//! check `gl_Normal` is gone, and patch the `gl_Position` assignment for the
//! renderer's clip-space conventions.

use crate::glsl::ShaderBody;
use crate::mapping::{self, SymbolMapping};
use crate::semantics::semantic_for_placeholder;
use crate::TranslateError;
use std::collections::HashMap;
use std::fmt;

/// Prefix cgc gives vertex input semantics in the header.
pub const VERTEX_INPUT_PREFIX: &str = "$vin.";

const GL_VERTEX: &str = "gl_Vertex";
const GL_NORMAL: &str = "gl_Normal";
const GL_POSITION: &str = "gl_Position";
const TEXCOORD_UNITS: usize = 8;

const POSITION_TEMP: &str = "_glPositionTemp";
const POSITION_TEMP_DECL: &str = "vec4 _glPositionTemp;";
const CLIPPING_UNIFORM_DECL: &str = "uniform vec4 dx_clipping;";

// Appended after the temporary store. Same math as the GL effect loader:
// x' = x + w*dx.x, y' = dx.w*(y + w*dx.y), z' = 2z - w, w' = w.
const CLIP_RECOMBINE: &str = " gl_Position = vec4(\
_glPositionTemp.x + _glPositionTemp.w * dx_clipping.x, \
dx_clipping.w * (_glPositionTemp.y + _glPositionTemp.w * dx_clipping.y), \
_glPositionTemp.z * 2.0 - _glPositionTemp.w, \
_glPositionTemp.w);";

/// A rewritten stage body and the declarations synthesized for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenShader {
    declarations: Vec<String>,
    body: String,
}

impl RewrittenShader {
    /// Synthesized declaration lines, in the order they were added.
    pub fn declarations(&self) -> &[String] {
        &self.declarations
    }

    /// The transformed body.
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl fmt::Display for RewrittenShader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{}", self.declarations.join("\n"), self.body)
    }
}

/// Computes the renames that restore uniform and attribute names.
///
/// Built from the untouched body and applied in one pass, so a restored name
/// is never itself renamed again.
fn restoration_renames(
    body: &ShaderBody,
    mapping: &SymbolMapping,
) -> Result<HashMap<String, String>, TranslateError> {
    let mut renames = HashMap::new();

    for decl in body.declarations("uniform") {
        let symbol = mapping.resolve(&decl.name)?;
        log::trace!("uniform {} -> {}", decl.name, symbol.original_name);
        renames.insert(decl.name, symbol.original_name.clone());
    }

    for decl in body.declarations("attribute") {
        let symbol = mapping.resolve(&decl.name)?;
        let original = symbol
            .original_name
            .strip_prefix(VERTEX_INPUT_PREFIX)
            .and_then(semantic_for_placeholder)
            .ok_or_else(|| TranslateError::UnexpectedNamespace {
                name: decl.name.clone(),
                mapped: symbol.original_name.clone(),
            })?;
        log::trace!("attribute {} -> {original}", decl.name);
        renames.insert(decl.name, original.to_owned());
    }

    Ok(renames)
}

/// Replaces `gl_Position = EXPR;` with a store into a temporary followed by
/// the recombined clip-space position.
fn patch_clip_position(body: &mut ShaderBody) -> Result<(), TranslateError> {
    let at = match body.find_idents(GL_POSITION)[..] {
        [at] => at,
        ref all => return Err(TranslateError::MultipleClipAssignment(all.len())),
    };
    let end = body
        .find_punct(at + 1, ';')
        .ok_or(TranslateError::UnterminatedClipAssignment)?;

    body.replace_with_ident(at, POSITION_TEMP);
    body.insert_after(end, CLIP_RECOMBINE);
    Ok(())
}

/// Applies every rewrite to one stage body.
pub fn rewrite_body(body: &str, mapping: &SymbolMapping) -> Result<RewrittenShader, TranslateError> {
    let mut shader = ShaderBody::parse(body);
    let mut declarations = Vec::new();

    let renames = restoration_renames(&shader, mapping)?;
    let renamed = shader.rename(&renames);
    log::debug!(
        "Restored {} declared name(s) across {renamed} occurrence(s)",
        renames.len()
    );

    for name in shader.collapse_matrix_uniforms() {
        log::debug!("Collapsed uniform array '{name}' into a matrix");
    }

    if shader.contains_ident(GL_VERTEX) {
        shader.rename_ident(GL_VERTEX, "position");
        declarations.push("attribute vec4 position;".to_owned());
    }

    for unit in 0..TEXCOORD_UNITS {
        let builtin = format!("gl_MultiTexCoord{unit}");
        if shader.contains_ident(&builtin) {
            let attribute = format!("texCoord{unit}");
            shader.rename_ident(&builtin, &attribute);
            declarations.push(format!("attribute vec4 {attribute};"));
        }
    }

    if shader.contains_ident(GL_NORMAL) {
        return Err(TranslateError::InternalConsistency(format!(
            "{GL_NORMAL} survived semantic renaming"
        )));
    }

    if shader.contains_ident(GL_POSITION) {
        patch_clip_position(&mut shader)?;
        declarations.push(POSITION_TEMP_DECL.to_owned());
        declarations.push(CLIPPING_UNIFORM_DECL.to_owned());
    }

    Ok(RewrittenShader {
        declarations,
        body: shader.to_string(),
    })
}

/// Fixes a whole stage: keeps the header, rewrites the body after it.
pub fn fix_stage(translated: &str) -> Result<String, TranslateError> {
    let (header, body) = mapping::split_header(translated)?;
    let symbols = mapping::extract_mapping(header)?;
    let rewritten = rewrite_body(body, &symbols)?;
    Ok(format!("{header}\n\n{rewritten}"))
}
