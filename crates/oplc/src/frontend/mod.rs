//! OPLang frontend
//!
//! This frontend handles:
//! - Lexing OPLang source into tokens
//! - Parsing tokens into the class-based AST consumed by `sema`

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::Program;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
