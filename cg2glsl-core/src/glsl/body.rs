use super::lexer::{self, Token, TokenKind};
use std::collections::HashMap;
use std::fmt;

/// A global declaration found at the start of a line, e.g. `uniform vec4 _wvp[4];`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub ty: String,
    pub name: String,
}

/// Tokenized body of one translated shader stage.
#[derive(Debug, Clone)]
pub struct ShaderBody {
    tokens: Vec<Token>,
}

impl ShaderBody {
    /// Tokenizes body text.
    pub fn parse(text: &str) -> Self {
        Self {
            tokens: lexer::tokenize(text),
        }
    }

    /// Indices of the first token of every line.
    fn line_starts(&self) -> Vec<usize> {
        let mut starts = Vec::new();
        if !self.tokens.is_empty() {
            starts.push(0);
        }
        starts.extend(
            self.tokens
                .iter()
                .enumerate()
                .filter(|(i, t)| t.kind == TokenKind::Newline && i + 1 < self.tokens.len())
                .map(|(i, _)| i + 1),
        );
        starts
    }

    /// Matches `QUALIFIER TYPE NAME` starting at token `at`.
    fn declaration_at(&self, at: usize, qualifier: &str) -> Option<Declaration> {
        match self.tokens.get(at..at + 5)? {
            [q, s1, ty, s2, name]
                if q.is_ident(qualifier)
                    && s1.kind == TokenKind::Space
                    && ty.kind == TokenKind::Ident
                    && s2.kind == TokenKind::Space
                    && name.kind == TokenKind::Ident =>
            {
                Some(Declaration {
                    ty: ty.text.clone(),
                    name: name.text.clone(),
                })
            }
            _ => None,
        }
    }

    /// All line-leading declarations with the given qualifier, in source order.
    pub fn declarations(&self, qualifier: &str) -> Vec<Declaration> {
        self.line_starts()
            .into_iter()
            .filter_map(|at| self.declaration_at(at, qualifier))
            .collect()
    }

    /// Returns true if the identifier occurs anywhere in the body.
    pub fn contains_ident(&self, name: &str) -> bool {
        self.tokens.iter().any(|t| t.is_ident(name))
    }

    /// Indices of every occurrence of the identifier.
    pub fn find_idents(&self, name: &str) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_ident(name))
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the first `c` punctuation token at or after `from`.
    pub fn find_punct(&self, from: usize, c: char) -> Option<usize> {
        self.tokens
            .iter()
            .skip(from)
            .position(|t| t.is_punct(c))
            .map(|offset| from + offset)
    }

    /// Renames identifiers in one pass. Returns the number of tokens changed.
    pub fn rename(&mut self, renames: &HashMap<String, String>) -> usize {
        lexer::rename_idents(&mut self.tokens, renames)
    }

    /// Renames every occurrence of a single identifier.
    pub fn rename_ident(&mut self, from: &str, to: &str) -> usize {
        let renames = HashMap::from([(from.to_owned(), to.to_owned())]);
        self.rename(&renames)
    }

    /// Replaces the token at `at` with an identifier.
    pub fn replace_with_ident(&mut self, at: usize, name: &str) {
        if let Some(token) = self.tokens.get_mut(at) {
            *token = Token::new(TokenKind::Ident, name);
        }
    }

    /// Inserts the tokens of `text` right after token `at`.
    pub fn insert_after(&mut self, at: usize, text: &str) {
        let insert_at = (at + 1).min(self.tokens.len());
        self.tokens
            .splice(insert_at..insert_at, lexer::tokenize(text));
    }

    /// Rewrites `uniform vecN NAME[N];` lines into `uniform matN NAME;`.
    ///
    /// Only square shapes with N in 2..=4 are collapsed; anything else on the
    /// line after the `;` is kept. Returns the names that were collapsed.
    pub fn collapse_matrix_uniforms(&mut self) -> Vec<String> {
        let mut matches = Vec::new();
        for at in self.line_starts() {
            let Some(decl) = self.declaration_at(at, "uniform") else {
                continue;
            };
            let Some(width) = decl
                .ty
                .strip_prefix("vec")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| (2..=4).contains(n))
            else {
                continue;
            };
            let is_square_array = match self.tokens.get(at + 5..at + 9) {
                Some([open, len, close, semi]) => {
                    open.is_punct('[')
                        && len.kind == TokenKind::Number
                        && len.text.parse::<usize>().ok() == Some(width)
                        && close.is_punct(']')
                        && semi.is_punct(';')
                }
                _ => false,
            };
            if is_square_array {
                matches.push((at, width, decl.name));
            }
        }

        // Splice back to front so earlier indices stay valid.
        for (at, width, _) in matches.iter().rev() {
            self.tokens[at + 2] = Token::new(TokenKind::Ident, format!("mat{width}"));
            self.tokens.drain(at + 5..at + 8);
        }
        matches.into_iter().map(|(_, _, name)| name).collect()
    }
}

impl fmt::Display for ShaderBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tokens.iter().try_for_each(|t| f.write_str(&t.text))
    }
}
