//! Class and member declarations

use super::{write_joined, Block, Declarator, TypeExpr};
use crate::common::Span;
use std::fmt;

/// Class declaration: `class N [extends P] { members }`
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub parent: Option<String>,
    pub members: Vec<Member>,
    pub name_span: Span,
    pub parent_span: Option<Span>,
    pub span: Span,
}

/// A class member with its location
#[derive(Debug, Clone)]
pub struct Member {
    pub kind: MemberKind,
    pub span: Span,
}

impl Member {
    pub fn new(kind: MemberKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone)]
pub enum MemberKind {
    Attribute(AttributeDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Destructor(DestructorDecl),
}

/// Attribute declaration: `static final int a := 1, b;`
#[derive(Debug, Clone)]
pub struct AttributeDecl {
    pub is_static: bool,
    pub is_final: bool,
    pub ty: TypeExpr,
    pub declarators: Vec<Declarator>,
}

/// Method declaration; `return_type` is `None` for `void`
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub is_static: bool,
    pub return_type: Option<TypeExpr>,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct ConstructorDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct DestructorDecl {
    pub name: String,
    pub body: Block,
}

/// Formal parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: TypeExpr,
    pub span: Span,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}

impl fmt::Display for AttributeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "static ")?;
        }
        if self.is_final {
            write!(f, "final ")?;
        }
        write!(f, "{} ", self.ty)?;
        write_joined(f, &self.declarators, ", ")
    }
}

impl fmt::Display for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "static ")?;
        }
        match &self.return_type {
            Some(ty) => write!(f, "{} ", ty)?,
            None => write!(f, "void ")?,
        }
        write!(f, "{}(", self.name)?;
        write_joined(f, &self.params, ", ")?;
        write!(f, ") {}", self.body)
    }
}

impl fmt::Display for ConstructorDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_joined(f, &self.params, ", ")?;
        write!(f, ") {}", self.body)
    }
}

impl fmt::Display for DestructorDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}() {}", self.name, self.body)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MemberKind::Attribute(attr) => write!(f, "{}", attr),
            MemberKind::Method(method) => write!(f, "{}", method),
            MemberKind::Constructor(ctor) => write!(f, "{}", ctor),
            MemberKind::Destructor(dtor) => write!(f, "{}", dtor),
        }
    }
}

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name)?;
        if let Some(parent) = &self.parent {
            write!(f, " extends {}", parent)?;
        }
        if self.members.is_empty() {
            return write!(f, " {{}}");
        }
        writeln!(f, " {{")?;
        for member in &self.members {
            writeln!(f, "    {}", member)?;
        }
        write!(f, "}}")
    }
}
