//! Statement AST nodes

use super::{write_joined, Expr, TypeExpr};
use crate::common::Span;
use std::fmt;

/// Statement node
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Local declaration: `final int x := 1, y;`
    VarDecl(VarDecl),

    /// Assignment: `lhs := value;`
    Assign { target: Expr, value: Expr },

    /// Conditional: `if c then s [else s]`
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// Counting loop: `for i := a to b do s`
    For {
        var: String,
        var_span: Span,
        start: Expr,
        end: Expr,
        direction: ForDirection,
        body: Box<Stmt>,
    },

    Break,

    Continue,

    Return(Option<Expr>),

    /// Method call evaluated for its effect: `io.writeInt(1);`
    Call(Expr),

    Block(Block),
}

/// Counting direction of a `for` loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForDirection {
    To,
    Downto,
}

/// Brace-delimited statement list
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self { stmts, span }
    }
}

/// A local variable or constant declaration
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub is_final: bool,
    pub ty: TypeExpr,
    pub declarators: Vec<Declarator>,
}

/// One declared name with its optional initializer
#[derive(Debug, Clone)]
pub struct Declarator {
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

impl fmt::Display for Declarator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.init {
            Some(init) => write!(f, "{}:={}", self.name, init),
            None => write!(f, "{}", self.name),
        }
    }
}

impl fmt::Display for VarDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_final {
            write!(f, "final ")?;
        }
        write!(f, "{} ", self.ty)?;
        write_joined(f, &self.declarators, ", ")
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stmts.is_empty() {
            return write!(f, "{{}}");
        }
        write!(f, "{{ ")?;
        for stmt in &self.stmts {
            write!(f, "{}; ", stmt)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::VarDecl(decl) => write!(f, "{}", decl),
            StmtKind::Assign { target, value } => write!(f, "{}:={}", target, value),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                write!(f, "if {} then {}", condition, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else {}", else_branch)?;
                }
                Ok(())
            }
            StmtKind::For {
                var,
                start,
                end,
                direction,
                body,
                ..
            } => {
                let dir = match direction {
                    ForDirection::To => "to",
                    ForDirection::Downto => "downto",
                };
                write!(f, "for {}:={} {} {} do {}", var, start, dir, end, body)
            }
            StmtKind::Break => write!(f, "break"),
            StmtKind::Continue => write!(f, "continue"),
            StmtKind::Return(Some(value)) => write!(f, "return {}", value),
            StmtKind::Return(None) => write!(f, "return"),
            StmtKind::Call(call) => write!(f, "{}", call),
            StmtKind::Block(block) => write!(f, "{}", block),
        }
    }
}
