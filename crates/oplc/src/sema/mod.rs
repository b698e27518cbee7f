//! Static semantic checking
//!
//! Pass 1 builds the class table. Pass 2 walks every member body, computing
//! expression types and recording violations; only the most significant one
//! is kept. A program with no violation must also declare `static void main()`.

mod analyzer;
mod class_table;
mod constant;
mod diagnostic;
mod expr;
mod member;
mod scope;
mod types;

#[cfg(test)]
mod tests;

pub use analyzer::SemanticAnalyzer;
pub use class_table::{AttributeInfo, ClassEntry, ClassTable, MethodInfo, IO_BINDING, IO_CLASS};
pub use constant::{first_non_constant, is_constant};
pub use diagnostic::{DeclKind, Priority, StaticError, ViolationTracker};
pub use scope::{Scope, Symbol, SymbolKind};
pub use types::{ExprType, PrimitiveType, Type, TypeChecker};

use crate::frontend::ast::Program;

/// Check a parsed program
pub fn check(program: &Program) -> Result<(), StaticError> {
    SemanticAnalyzer::new().analyze(program)
}
