//! OPLang static checker
//!
//! This library checks programs written in OPLang, a small statically-typed
//! class-based language, and reports the single most significant semantic
//! violation in a program.
//!
//! ## Architecture
//!
//! The checker is organized into:
//! - **Frontend** (`frontend/`): Lexing and parsing OPLang source into an AST
//! - **Sema** (`sema/`): Class table, scopes, type rules and the priority engine
//! - **Driver** (`driver/`): The source-to-verdict pipeline
//! - **Common** (`common/`): Shared infrastructure (errors, spans)

pub mod common;
pub mod driver;
pub mod frontend;
pub mod sema;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticReporter, Span};
pub use driver::{check_source, verdict, CheckConfig};
pub use sema::{check, StaticError};
