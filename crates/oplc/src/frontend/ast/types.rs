//! Type annotations as written in the source

use crate::common::Span;
use std::fmt;

/// A type annotation
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn int(span: Span) -> Self {
        Self::new(TypeExprKind::Int, span)
    }

    pub fn class(name: impl Into<String>, span: Span) -> Self {
        Self::new(TypeExprKind::Class(name.into()), span)
    }

    pub fn array_of(element: TypeExpr, size: usize, span: Span) -> Self {
        Self::new(
            TypeExprKind::Array {
                element: Box::new(element),
                size,
            },
            span,
        )
    }

    pub fn reference_to(inner: TypeExpr, span: Span) -> Self {
        Self::new(TypeExprKind::Reference(Box::new(inner)), span)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, TypeExprKind::Reference(_))
    }

    /// The class named inside this annotation, looking through arrays and references
    pub fn class_name(&self) -> Option<(&str, Span)> {
        match &self.kind {
            TypeExprKind::Class(name) => Some((name.as_str(), self.span)),
            TypeExprKind::Array { element, .. } => element.class_name(),
            TypeExprKind::Reference(inner) => inner.class_name(),
            _ => None,
        }
    }
}

/// Type annotation kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    Int,
    Float,
    Boolean,
    String,
    /// Named class type
    Class(String),
    /// Fixed-size array: `int[3]`
    Array { element: Box<TypeExpr>, size: usize },
    /// Reference: `int&`
    Reference(Box<TypeExpr>),
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeExprKind::Int => write!(f, "int"),
            TypeExprKind::Float => write!(f, "float"),
            TypeExprKind::Boolean => write!(f, "boolean"),
            TypeExprKind::String => write!(f, "string"),
            TypeExprKind::Class(name) => write!(f, "{}", name),
            TypeExprKind::Array { element, size } => write!(f, "{}[{}]", element, size),
            TypeExprKind::Reference(inner) => write!(f, "{}&", inner),
        }
    }
}
