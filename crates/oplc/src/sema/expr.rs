//! Expression checking

use super::analyzer::SemanticAnalyzer;
use super::class_table::IO_CLASS;
use super::diagnostic::StaticError;
use super::scope::SymbolKind;
use super::types::{ExprType, Type};
use crate::frontend::ast::{Expr, ExprKind};
use log::trace;

impl SemanticAnalyzer {
    /// Check an expression whose value is used; a void call is a mismatch here
    pub(super) fn check_value(&mut self, expr: &Expr) -> ExprType {
        match self.check_expr(expr) {
            ExprType::Void => self.fail(StaticError::mismatch_in_expression(expr, expr.span)),
            ty => ty,
        }
    }

    pub(super) fn check_expr(&mut self, expr: &Expr) -> ExprType {
        match &expr.kind {
            ExprKind::IntLiteral(_) => ExprType::Known(Type::int()),
            ExprKind::FloatLiteral(_) => ExprType::Known(Type::float()),
            ExprKind::BoolLiteral(_) => ExprType::Known(Type::boolean()),
            ExprKind::StringLiteral(_) => ExprType::Known(Type::string()),
            ExprKind::Nil => ExprType::Nil,
            ExprKind::This => self.check_this(expr),
            ExprKind::Identifier(name) => self.resolve_identifier(name, expr),
            ExprKind::Paren(inner) => self.check_expr(inner),

            ExprKind::Binary { op, left, right } => {
                let l = self.check_value(left);
                let r = self.check_value(right);
                match self.types().binary_result_type(*op, &l, &r) {
                    Some(ty) => ty,
                    None => self.fail(StaticError::mismatch_in_expression(expr, expr.span)),
                }
            }

            ExprKind::Unary { op, operand } => {
                let operand = self.check_value(operand);
                match self.types().unary_result_type(*op, &operand) {
                    Some(ty) => ty,
                    None => self.fail(StaticError::mismatch_in_expression(expr, expr.span)),
                }
            }

            ExprKind::Index { object, index } => {
                let base = self.check_value(object);
                let index_ty = self.check_value(index);

                let element = match &base {
                    ExprType::Known(Type::Array { element, .. }) => {
                        Some(ExprType::value(element))
                    }
                    ExprType::Unknown => Some(ExprType::Unknown),
                    _ => None,
                };
                match element {
                    Some(element) if index_ty.admits_int() => element,
                    _ => self.fail(StaticError::mismatch_in_expression(expr, expr.span)),
                }
            }

            ExprKind::Field { object, field } => match self.resolve_attribute(expr, object, field) {
                Some(access) => ExprType::value(&access.ty),
                None => ExprType::Unknown,
            },

            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => self.check_call(expr, receiver, method, args),

            ExprKind::New { class, args } => self.check_new(expr, class, args),

            ExprKind::ArrayLiteral(elements) => self.check_array_literal(expr, elements),
        }
    }

    /// Locals, then attributes of the current class chain, then class names
    fn resolve_identifier(&mut self, name: &str, expr: &Expr) -> ExprType {
        if let Some(symbol) = self.scope.lookup(name) {
            if !symbol.initialized {
                trace!("'{}' read before any assignment", name);
            }
            return match symbol.kind {
                SymbolKind::Facility => ExprType::ClassRef(IO_CLASS.to_string()),
                _ => ExprType::value(&symbol.ty),
            };
        }

        if let Some((_, attr)) = self.classes.find_attribute(&self.current_class, name) {
            return ExprType::value(&attr.ty);
        }

        if self.classes.contains(name) {
            return ExprType::ClassRef(name.to_string());
        }

        self.fail(StaticError::undeclared_identifier(name, expr.span))
    }

    fn check_new(&mut self, expr: &Expr, class: &str, args: &[Expr]) -> ExprType {
        let known_class = self.classes.contains(class);
        if !known_class {
            self.report(StaticError::undeclared_class(class, expr.span));
        }

        let arg_types = self.check_args(args);
        if !known_class {
            return ExprType::Unknown;
        }

        let params = self
            .classes
            .constructor(class)
            .map(|ctor| ctor.params.clone())
            .unwrap_or_default();
        if !self.arguments_match(&params, &arg_types) {
            return self.fail(StaticError::mismatch_in_expression(expr, expr.span));
        }

        ExprType::Known(Type::class(class))
    }

    pub(super) fn check_args(&mut self, args: &[Expr]) -> Vec<ExprType> {
        args.iter().map(|arg| self.check_value(arg)).collect()
    }

    /// Exact arity, and each argument compatible with its parameter
    pub(super) fn arguments_match(&self, params: &[(String, Type)], args: &[ExprType]) -> bool {
        let types = self.types();
        params.len() == args.len()
            && params
                .iter()
                .zip(args)
                .all(|((_, param), arg)| types.compatible(param, arg))
    }

    /// Every element must share one type; `nil` joins class and array elements
    fn check_array_literal(&mut self, expr: &Expr, elements: &[Expr]) -> ExprType {
        let element_types: Vec<ExprType> = elements.iter().map(|e| self.check_value(e)).collect();

        if element_types.iter().any(ExprType::is_unknown) {
            return ExprType::Unknown;
        }

        let mut element: Option<Type> = None;
        let mut has_nil = false;
        for ty in &element_types {
            match ty {
                ExprType::Nil => has_nil = true,
                ExprType::Known(ty) => {
                    if let Some(first) = &element {
                        if !self.types().same_type(first, ty) {
                            return self.fail(StaticError::illegal_array_literal(expr, expr.span));
                        }
                    } else {
                        element = Some(ty.clone());
                    }
                }
                _ => return self.fail(StaticError::illegal_array_literal(expr, expr.span)),
            }
        }

        match element {
            Some(element) if !has_nil || element.is_nullable() => {
                ExprType::Known(Type::array_of(element, elements.len()))
            }
            _ => self.fail(StaticError::illegal_array_literal(expr, expr.span)),
        }
    }
}
