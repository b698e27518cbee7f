//! Expression AST nodes

use super::write_joined;
use crate::common::Span;
use std::fmt;

/// Expression node
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Strip any number of surrounding parentheses
    pub fn unparenthesized(&self) -> &Expr {
        match &self.kind {
            ExprKind::Paren(inner) => inner.unparenthesized(),
            _ => self,
        }
    }
}

/// Expression kinds
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Integer literal: 42
    IntLiteral(i64),

    /// Float literal: 3.14, 1e3
    FloatLiteral(f64),

    /// Boolean literal: true, false
    BoolLiteral(bool),

    /// String literal with escapes resolved
    StringLiteral(String),

    /// The `nil` reference
    Nil,

    /// The current object: `this`
    This,

    /// Identifier: foo, io, Shape
    Identifier(String),

    /// Binary operation: a + b
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary operation: -x, !flag
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Attribute access: obj.field
    Field { object: Box<Expr>, field: String },

    /// Method invocation: obj.m(a, b)
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },

    /// Array element access: arr[i]
    Index { object: Box<Expr>, index: Box<Expr> },

    /// Object creation: new C(a, b)
    New { class: String, args: Vec<Expr> },

    /// Array literal: {1, 2, 3}
    ArrayLiteral(Vec<Expr>),

    /// Parenthesized expression: (e)
    Paren(Box<Expr>),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Integer division: `\`
    IntDiv,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    /// String concatenation: `^`
    Concat,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::IntDiv => "\\",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Concat => "^",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::IntDiv
                | BinaryOp::Mod
        )
    }

    pub fn is_relational(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge)
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Ne)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::IntLiteral(v) => write!(f, "{}", v),
            ExprKind::FloatLiteral(v) => write!(f, "{:?}", v),
            ExprKind::BoolLiteral(v) => write!(f, "{}", v),
            ExprKind::StringLiteral(s) => write!(f, "{:?}", s),
            ExprKind::Nil => write!(f, "nil"),
            ExprKind::This => write!(f, "this"),
            ExprKind::Identifier(name) => write!(f, "{}", name),
            ExprKind::Binary { op, left, right } => {
                write!(f, "{} {} {}", left, op.symbol(), right)
            }
            ExprKind::Unary { op, operand } => write!(f, "{}{}", op.symbol(), operand),
            ExprKind::Field { object, field } => write!(f, "{}.{}", object, field),
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                write!(f, "{}.{}(", receiver, method)?;
                write_joined(f, args, ", ")?;
                write!(f, ")")
            }
            ExprKind::Index { object, index } => write!(f, "{}[{}]", object, index),
            ExprKind::New { class, args } => {
                write!(f, "new {}(", class)?;
                write_joined(f, args, ", ")?;
                write!(f, ")")
            }
            ExprKind::ArrayLiteral(elements) => {
                write!(f, "{{")?;
                write_joined(f, elements, ", ")?;
                write!(f, "}}")
            }
            ExprKind::Paren(inner) => write!(f, "({})", inner),
        }
    }
}
