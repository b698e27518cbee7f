//! Constant-expression validation for `final` initializers

use crate::frontend::ast::{Expr, ExprKind};

/// The first subexpression, in evaluation order, that keeps `expr` from being constant.
///
/// Constants are literals other than `nil`, combined with operators,
/// parentheses and array literals.
pub fn first_non_constant(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::IntLiteral(_)
        | ExprKind::FloatLiteral(_)
        | ExprKind::BoolLiteral(_)
        | ExprKind::StringLiteral(_) => None,
        ExprKind::Binary { left, right, .. } => {
            first_non_constant(left).or_else(|| first_non_constant(right))
        }
        ExprKind::Unary { operand, .. } => first_non_constant(operand),
        ExprKind::Paren(inner) => first_non_constant(inner),
        ExprKind::ArrayLiteral(elements) => elements.iter().find_map(first_non_constant),
        ExprKind::Nil
        | ExprKind::This
        | ExprKind::Identifier(_)
        | ExprKind::Field { .. }
        | ExprKind::MethodCall { .. }
        | ExprKind::Index { .. }
        | ExprKind::New { .. } => Some(expr),
    }
}

pub fn is_constant(expr: &Expr) -> bool {
    first_non_constant(expr).is_none()
}
