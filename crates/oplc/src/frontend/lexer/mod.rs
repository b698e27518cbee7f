//! Lexer module for tokenizing OPLang source code

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Token, TokenKind};
