// Structured view of shader text used by the rewriter:
// 1. A lossless tokenizer so renames only ever hit whole identifiers
// 2. A tokenized stage body with its line-leading declarations

pub mod body;
pub mod lexer;

pub use body::{Declaration, ShaderBody};
pub use lexer::{Token, TokenKind};
