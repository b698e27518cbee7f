//! Static diagnostics and the priority order that selects the reported one

use crate::common::Span;
use log::trace;
use std::fmt;
use thiserror::Error;

/// Declaration category named in a `Redeclared` diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Variable,
    Constant,
    Attribute,
    Method,
    Class,
    Parameter,
    Constructor,
    Destructor,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeclKind::Variable => "Variable",
            DeclKind::Constant => "Constant",
            DeclKind::Attribute => "Attribute",
            DeclKind::Method => "Method",
            DeclKind::Class => "Class",
            DeclKind::Parameter => "Parameter",
            DeclKind::Constructor => "Constructor",
            DeclKind::Destructor => "Destructor",
        };
        f.write_str(label)
    }
}

/// A static semantic violation; `Display` is the canonical `Kind(payload)` form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StaticError {
    #[error("Redeclared({kind}, {name})")]
    Redeclared {
        kind: DeclKind,
        name: String,
        span: Span,
    },

    #[error("UndeclaredIdentifier({name})")]
    UndeclaredIdentifier { name: String, span: Span },

    #[error("UndeclaredClass({name})")]
    UndeclaredClass { name: String, span: Span },

    #[error("UndeclaredAttribute({name})")]
    UndeclaredAttribute { name: String, span: Span },

    #[error("UndeclaredMethod({name})")]
    UndeclaredMethod { name: String, span: Span },

    #[error("TypeMismatchInStatement({node})")]
    TypeMismatchInStatement { node: String, span: Span },

    #[error("TypeMismatchInExpression({node})")]
    TypeMismatchInExpression { node: String, span: Span },

    #[error("TypeMismatchInConstant({node})")]
    TypeMismatchInConstant { node: String, span: Span },

    #[error("IllegalMemberAccess({node})")]
    IllegalMemberAccess { node: String, span: Span },

    #[error("MustInLoop({node})")]
    MustInLoop { node: String, span: Span },

    #[error("CannotAssignToConstant({node})")]
    CannotAssignToConstant { node: String, span: Span },

    #[error("IllegalArrayLiteral({node})")]
    IllegalArrayLiteral { node: String, span: Span },

    #[error("IllegalConstantExpression({node})")]
    IllegalConstantExpression { node: String, span: Span },

    #[error("No Entry Point")]
    NoEntryPoint,
}

impl StaticError {
    pub fn redeclared(kind: DeclKind, name: impl Into<String>, span: Span) -> Self {
        Self::Redeclared {
            kind,
            name: name.into(),
            span,
        }
    }

    pub fn undeclared_identifier(name: impl Into<String>, span: Span) -> Self {
        Self::UndeclaredIdentifier {
            name: name.into(),
            span,
        }
    }

    pub fn undeclared_class(name: impl Into<String>, span: Span) -> Self {
        Self::UndeclaredClass {
            name: name.into(),
            span,
        }
    }

    pub fn undeclared_attribute(name: impl Into<String>, span: Span) -> Self {
        Self::UndeclaredAttribute {
            name: name.into(),
            span,
        }
    }

    pub fn undeclared_method(name: impl Into<String>, span: Span) -> Self {
        Self::UndeclaredMethod {
            name: name.into(),
            span,
        }
    }

    pub fn mismatch_in_statement(node: &impl fmt::Display, span: Span) -> Self {
        Self::TypeMismatchInStatement {
            node: node.to_string(),
            span,
        }
    }

    pub fn mismatch_in_expression(node: &impl fmt::Display, span: Span) -> Self {
        Self::TypeMismatchInExpression {
            node: node.to_string(),
            span,
        }
    }

    pub fn mismatch_in_constant(node: &impl fmt::Display, span: Span) -> Self {
        Self::TypeMismatchInConstant {
            node: node.to_string(),
            span,
        }
    }

    pub fn illegal_member_access(node: &impl fmt::Display, span: Span) -> Self {
        Self::IllegalMemberAccess {
            node: node.to_string(),
            span,
        }
    }

    pub fn must_in_loop(node: &impl fmt::Display, span: Span) -> Self {
        Self::MustInLoop {
            node: node.to_string(),
            span,
        }
    }

    pub fn cannot_assign_to_constant(node: &impl fmt::Display, span: Span) -> Self {
        Self::CannotAssignToConstant {
            node: node.to_string(),
            span,
        }
    }

    pub fn illegal_array_literal(node: &impl fmt::Display, span: Span) -> Self {
        Self::IllegalArrayLiteral {
            node: node.to_string(),
            span,
        }
    }

    pub fn illegal_constant_expression(node: &impl fmt::Display, span: Span) -> Self {
        Self::IllegalConstantExpression {
            node: node.to_string(),
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            StaticError::Redeclared { span, .. }
            | StaticError::UndeclaredIdentifier { span, .. }
            | StaticError::UndeclaredClass { span, .. }
            | StaticError::UndeclaredAttribute { span, .. }
            | StaticError::UndeclaredMethod { span, .. }
            | StaticError::TypeMismatchInStatement { span, .. }
            | StaticError::TypeMismatchInExpression { span, .. }
            | StaticError::TypeMismatchInConstant { span, .. }
            | StaticError::IllegalMemberAccess { span, .. }
            | StaticError::MustInLoop { span, .. }
            | StaticError::CannotAssignToConstant { span, .. }
            | StaticError::IllegalArrayLiteral { span, .. }
            | StaticError::IllegalConstantExpression { span, .. } => Some(*span),
            StaticError::NoEntryPoint => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            StaticError::Redeclared { .. } => "Redeclared",
            StaticError::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            StaticError::UndeclaredClass { .. } => "UndeclaredClass",
            StaticError::UndeclaredAttribute { .. } => "UndeclaredAttribute",
            StaticError::UndeclaredMethod { .. } => "UndeclaredMethod",
            StaticError::TypeMismatchInStatement { .. } => "TypeMismatchInStatement",
            StaticError::TypeMismatchInExpression { .. } => "TypeMismatchInExpression",
            StaticError::TypeMismatchInConstant { .. } => "TypeMismatchInConstant",
            StaticError::IllegalMemberAccess { .. } => "IllegalMemberAccess",
            StaticError::MustInLoop { .. } => "MustInLoop",
            StaticError::CannotAssignToConstant { .. } => "CannotAssignToConstant",
            StaticError::IllegalArrayLiteral { .. } => "IllegalArrayLiteral",
            StaticError::IllegalConstantExpression { .. } => "IllegalConstantExpression",
            StaticError::NoEntryPoint => "NoEntryPoint",
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            StaticError::Redeclared { .. }
            | StaticError::UndeclaredIdentifier { .. }
            | StaticError::UndeclaredClass { .. }
            | StaticError::UndeclaredAttribute { .. }
            | StaticError::UndeclaredMethod { .. } => Priority::Declaration,
            StaticError::TypeMismatchInStatement { .. }
            | StaticError::TypeMismatchInExpression { .. }
            | StaticError::TypeMismatchInConstant { .. } => Priority::TypeMismatch,
            StaticError::IllegalMemberAccess { .. } => Priority::MemberAccess,
            StaticError::MustInLoop { .. } => Priority::LoopControl,
            StaticError::CannotAssignToConstant { .. } => Priority::ConstantAssignment,
            StaticError::IllegalArrayLiteral { .. }
            | StaticError::IllegalConstantExpression { .. } => Priority::IllegalLiteral,
            StaticError::NoEntryPoint => Priority::EntryPoint,
        }
    }
}

/// Violation categories, most significant first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Declaration = 1,
    TypeMismatch = 2,
    MemberAccess = 3,
    LoopControl = 4,
    ConstantAssignment = 5,
    IllegalLiteral = 6,
    EntryPoint = 7,
}

impl Priority {
    /// Strictly more significant than `other`
    pub fn outranks(self, other: Priority) -> bool {
        self < other
    }
}

/// Keeps the single most significant violation seen during a traversal.
///
/// Among violations of equal priority the first one recorded is kept, so a
/// traversal in source order yields the earliest one.
#[derive(Debug, Default)]
pub struct ViolationTracker {
    best: Option<StaticError>,
}

impl ViolationTracker {
    pub fn new() -> Self {
        Self { best: None }
    }

    /// Record `error` if it outranks everything recorded so far
    pub fn record(&mut self, error: StaticError) {
        let replace = match &self.best {
            Some(best) => error.priority().outranks(best.priority()),
            None => true,
        };
        if replace {
            trace!("recording {} (priority {:?})", error, error.priority());
            self.best = Some(error);
        } else {
            trace!("ignoring {}: outranked", error);
        }
    }

    /// Nothing recorded later can displace the current violation
    pub fn is_settled(&self) -> bool {
        self.best
            .as_ref()
            .is_some_and(|e| e.priority() == Priority::Declaration)
    }

    pub fn best(&self) -> Option<&StaticError> {
        self.best.as_ref()
    }

    pub fn into_result(self) -> Result<(), StaticError> {
        match self.best {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
