//! Member access: `this`, attribute access and method calls

use super::analyzer::SemanticAnalyzer;
use super::diagnostic::StaticError;
use super::types::{ExprType, Type};
use crate::frontend::ast::{Expr, ExprKind};

/// A resolved attribute access
#[derive(Debug, Clone)]
pub(super) struct AttributeAccess {
    /// Class declaring the attribute
    pub owner: String,
    pub ty: Type,
    pub is_final: bool,
    pub has_initializer: bool,
}

impl SemanticAnalyzer {
    /// `this` only exists inside instance members
    pub(super) fn check_this(&mut self, expr: &Expr) -> ExprType {
        if self.in_static {
            return self.fail(StaticError::illegal_member_access(expr, expr.span));
        }
        ExprType::Known(Type::class(self.current_class.clone()))
    }

    /// The class a member is looked up in, and whether access is through the class name
    fn receiver_class(&mut self, access: &Expr, receiver: ExprType) -> Option<(String, bool)> {
        match receiver {
            ExprType::ClassRef(class) => Some((class, true)),
            // An unknown class was already reported at its declaration
            ExprType::Known(Type::Class(class)) => {
                self.classes.contains(&class).then_some((class, false))
            }
            ExprType::Unknown => None,
            _ => {
                self.report(StaticError::mismatch_in_expression(access, access.span));
                None
            }
        }
    }

    /// Resolve `object.field`; `None` once a violation has been reported
    pub(super) fn resolve_attribute(
        &mut self,
        access: &Expr,
        object: &Expr,
        field: &str,
    ) -> Option<AttributeAccess> {
        let receiver = self.check_value(object);
        let (class, via_class) = self.receiver_class(access, receiver)?;

        let found = self
            .classes
            .find_attribute(&class, field)
            .map(|(owner, attr)| (owner.to_string(), attr.clone()));
        let Some((owner, attr)) = found else {
            self.report(StaticError::undeclared_attribute(field, access.span));
            return None;
        };

        if attr.is_static != via_class {
            self.report(StaticError::illegal_member_access(access, access.span));
            return None;
        }

        Some(AttributeAccess {
            owner,
            ty: attr.ty,
            is_final: attr.is_final,
            has_initializer: attr.has_initializer,
        })
    }

    /// Receiver, then method lookup, then arguments
    pub(super) fn check_call(
        &mut self,
        expr: &Expr,
        receiver: &Expr,
        method: &str,
        args: &[Expr],
    ) -> ExprType {
        let receiver = self.check_value(receiver);

        let signature = match self.receiver_class(expr, receiver) {
            Some((class, via_class)) => {
                let found = self
                    .classes
                    .find_method(&class, method)
                    .map(|(_, info)| info.clone());
                match found {
                    None => {
                        self.report(StaticError::undeclared_method(method, expr.span));
                        None
                    }
                    Some(info) if info.is_static != via_class => {
                        self.report(StaticError::illegal_member_access(expr, expr.span));
                        None
                    }
                    Some(info) => Some(info),
                }
            }
            None => None,
        };

        let arg_types = self.check_args(args);
        let Some(signature) = signature else {
            return ExprType::Unknown;
        };

        if !self.arguments_match(&signature.params, &arg_types) {
            return self.fail(StaticError::mismatch_in_expression(expr, expr.span));
        }

        match &signature.return_type {
            Some(ty) => ExprType::value(ty),
            None => ExprType::Void,
        }
    }

    /// A final attribute may be written once, through `this`, by a constructor
    /// of its own class, when it has no initializer
    pub(super) fn may_initialize_final(
        &mut self,
        object: &Expr,
        field: &str,
        access: &AttributeAccess,
    ) -> bool {
        self.in_constructor
            && !access.has_initializer
            && access.owner == self.current_class
            && matches!(object.unparenthesized().kind, ExprKind::This)
            && self.assigned_finals.insert(field.to_string())
    }
}
