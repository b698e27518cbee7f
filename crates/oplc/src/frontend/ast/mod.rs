//! Abstract Syntax Tree definitions
//!
//! Every node carries its source span. `Display` renders nodes back to a
//! compact source form, which is the payload text of static diagnostics.

mod decl;
mod expr;
mod stmt;
mod types;

pub use decl::*;
pub use expr::*;
pub use stmt::*;
pub use types::*;

use crate::common::Span;
use std::fmt;

/// A complete OPLang program: an ordered list of classes
#[derive(Debug, Clone)]
pub struct Program {
    pub classes: Vec<ClassDecl>,
    pub span: Span,
}

impl Program {
    pub fn new(classes: Vec<ClassDecl>, span: Span) -> Self {
        Self { classes, span }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, class) in self.classes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", class)?;
        }
        Ok(())
    }
}

/// Write `items` separated by `sep`
pub(crate) fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    sep: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
