//! Common infrastructure shared by the frontend, the checker and the driver

mod error;
mod span;

pub use error::{CompileError, CompileResult, DiagnosticReporter};
pub use span::Span;
