//! A lossless tokenizer for shader text.
//!
//! Concatenating the tokens of any input reproduces it byte for byte, so the
//! rewriter can edit identifiers without ever matching inside a longer word.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::CharIndices;

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `[A-Za-z_][A-Za-z0-9_]*`
    Ident,
    /// A literal starting with a digit, including suffixes such as `2.0f`.
    Number,
    /// A run of whitespace other than `\n`.
    Space,
    /// A single `\n`.
    Newline,
    /// Any other single character.
    Punct,
}

/// A token and its exact source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    /// Creates a token of the given kind.
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Returns true if this is the identifier `name`.
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == name
    }

    /// Returns true if this is the punctuation character `c`.
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct && self.text.len() == c.len_utf8() && self.text.starts_with(c)
    }
}

const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn eat_while(chars: &mut Peekable<CharIndices<'_>>, pred: impl Fn(char) -> bool) {
    while chars.next_if(|&(_, c)| pred(c)).is_some() {}
}

/// Splits `source` into tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        chars.next();
        let kind = if c == '\n' {
            TokenKind::Newline
        } else if is_ident_start(c) {
            eat_while(&mut chars, is_ident_continue);
            TokenKind::Ident
        } else if c.is_ascii_digit() {
            eat_while(&mut chars, |c| is_ident_continue(c) || c == '.');
            TokenKind::Number
        } else if c.is_whitespace() {
            eat_while(&mut chars, |c| c.is_whitespace() && c != '\n');
            TokenKind::Space
        } else {
            TokenKind::Punct
        };
        let end = chars.peek().map_or(source.len(), |&(i, _)| i);
        tokens.push(Token::new(kind, &source[start..end]));
    }

    tokens
}

/// Concatenates tokens back into text.
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

/// Replaces every identifier found in `renames` in a single pass.
///
/// Returns the number of tokens rewritten.
pub fn rename_idents(tokens: &mut [Token], renames: &HashMap<String, String>) -> usize {
    let mut count = 0;
    for token in tokens.iter_mut().filter(|t| t.kind == TokenKind::Ident) {
        if let Some(to) = renames.get(&token.text) {
            token.text.clone_from(to);
            count += 1;
        }
    }
    count
}
