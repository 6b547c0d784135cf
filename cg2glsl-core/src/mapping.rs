//! Parses the comment header cgc writes in front of each translated stage.
//!
//! Every input and output of the program gets a `//var` line of the form
//! `//var TYPE NAME : SEMANTIC : GENERATED : INDEX : USED`. The header ends at
//! the first blank line; everything after it is the translated body.

use crate::semantics::correct_semantic_case;
use crate::TranslateError;
use std::collections::HashMap;

const COMMENT_MARKER: &str = "//";
const VAR_MARKER: &str = "//var";
const VAR_FIELDS: usize = 5;

/// How the original name of a symbol was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// Taken from the SEMANTIC field (lower-cased, matrix names re-cased).
    Semantic,
    /// Taken from the declared variable name because there was no semantic.
    PlainName,
}

/// Original identity of a generated identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub original_name: String,
    pub kind: SymbolKind,
}

/// Generated identifier -> original name, for one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolMapping {
    symbols: HashMap<String, Symbol>,
}

impl SymbolMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry; a repeated key replaces the earlier one.
    pub fn insert(&mut self, generated: impl Into<String>, symbol: Symbol) -> Option<Symbol> {
        self.symbols.insert(generated.into(), symbol)
    }

    /// Looks up a generated identifier.
    pub fn get(&self, generated: &str) -> Option<&Symbol> {
        self.symbols.get(generated)
    }

    /// Looks up a generated identifier, failing if the header never declared it.
    pub fn resolve(&self, generated: &str) -> Result<&Symbol, TranslateError> {
        self.get(generated)
            .ok_or_else(|| TranslateError::UnmappedIdentifier(generated.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Splits translated output into header and body at the first blank line.
///
/// Output containing `\r\n` is split on `\r\n\r\n`, anything else on `\n\n`.
pub fn split_header(translated: &str) -> Result<(&str, &str), TranslateError> {
    let separator = if translated.contains("\r\n") {
        "\r\n\r\n"
    } else {
        "\n\n"
    };
    translated.split_once(separator).ok_or_else(|| {
        TranslateError::MalformedHeader(
            "no blank line separating the header from the translated code".to_owned(),
        )
    })
}

/// Strips an array subscript, a leading `$`, and any `.`-qualified prefix
/// from the GENERATED field (`$vin.attr8` -> `attr8`, `_wvp[0], 4` -> `_wvp`).
pub fn normalize_generated_name(raw: &str) -> &str {
    let name = raw.split_once('[').map_or(raw, |(head, _)| head).trim();
    let name = name.strip_prefix('$').unwrap_or(name);
    name.rsplit_once('.').map_or(name, |(_, last)| last)
}

fn parse_var_line(line_no: usize, line: &str) -> Result<(String, Symbol), TranslateError> {
    let fields: Vec<&str> = line.split(':').map(str::trim).collect();
    let [decl, semantic, generated, _, _] = fields[..] else {
        return Err(TranslateError::MalformedHeader(format!(
            "line {line_no} has {} fields, expected {VAR_FIELDS}: {line}",
            fields.len()
        )));
    };

    let generated = normalize_generated_name(generated);
    if generated.is_empty() {
        return Err(TranslateError::MalformedHeader(format!(
            "line {line_no} has an empty generated name: {line}"
        )));
    }

    let symbol = if semantic.is_empty() {
        let declared = decl.split_whitespace().nth(2).ok_or_else(|| {
            TranslateError::MalformedHeader(format!(
                "line {line_no} does not declare a variable name: {line}"
            ))
        })?;
        Symbol {
            original_name: declared.to_owned(),
            kind: SymbolKind::PlainName,
        }
    } else {
        Symbol {
            original_name: correct_semantic_case(semantic),
            kind: SymbolKind::Semantic,
        }
    };

    Ok((generated.to_owned(), symbol))
}

/// Builds the symbol mapping from a header block.
///
/// Every line must be a `//` comment. Only `//var` lines produce entries and
/// each of those must have exactly five `:`-separated fields.
pub fn extract_mapping(header: &str) -> Result<SymbolMapping, TranslateError> {
    let mut mapping = SymbolMapping::new();

    for (index, line) in header.lines().enumerate() {
        let line_no = index + 1;
        if !line.starts_with(COMMENT_MARKER) {
            return Err(TranslateError::MalformedHeader(format!(
                "line {line_no} is not a comment: {line}"
            )));
        }
        if !line.starts_with(VAR_MARKER) {
            continue;
        }
        let (generated, symbol) = parse_var_line(line_no, line)?;
        log::trace!("Header maps '{generated}' -> '{}'", symbol.original_name);
        mapping.insert(generated, symbol);
    }

    log::debug!("Extracted {} symbol(s) from compiler header", mapping.len());
    Ok(mapping)
}
