//! Semantic analyzer: pass orchestration and statement checking

use super::class_table::ClassTable;
use super::constant;
use super::diagnostic::{DeclKind, StaticError, ViolationTracker};
use super::scope::{Scope, Symbol, SymbolKind};
use super::types::{ExprType, Type, TypeChecker};
use crate::common::Span;
use crate::frontend::ast::*;
use log::{debug, trace};
use std::collections::HashSet;
use std::fmt;

/// Static semantic checker for one OPLang program
pub struct SemanticAnalyzer {
    pub(super) classes: ClassTable,
    pub(super) scope: Scope,
    tracker: ViolationTracker,
    pub(super) current_class: String,
    pub(super) current_fn_return_type: Option<Type>,
    pub(super) in_static: bool,
    pub(super) in_constructor: bool,
    /// Final attributes already written by the constructor being checked
    pub(super) assigned_finals: HashSet<String>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            classes: ClassTable::new(),
            scope: Scope::global(),
            tracker: ViolationTracker::new(),
            current_class: String::new(),
            current_fn_return_type: None,
            in_static: false,
            in_constructor: false,
            assigned_finals: HashSet::new(),
        }
    }

    /// Check `program`, yielding its single most significant violation
    pub fn analyze(mut self, program: &Program) -> Result<(), StaticError> {
        // Pass 1: class table
        self.classes = ClassTable::build(program)?;

        // Pass 2: member bodies
        for class in &program.classes {
            if self.tracker.is_settled() {
                break;
            }
            self.check_class(class);
        }

        let has_entry_point = self.classes.has_entry_point();
        self.tracker.into_result()?;
        if !has_entry_point {
            return Err(StaticError::NoEntryPoint);
        }
        debug!("static checking passed");
        Ok(())
    }

    pub(super) fn types(&self) -> TypeChecker<'_> {
        TypeChecker::new(&self.classes)
    }

    pub(super) fn report(&mut self, error: StaticError) {
        self.tracker.record(error);
    }

    /// Report `error` and poison the expression it belongs to
    pub(super) fn fail(&mut self, error: StaticError) -> ExprType {
        self.report(error);
        ExprType::Unknown
    }

    pub(super) fn settled(&self) -> bool {
        self.tracker.is_settled()
    }

    // =========================================================================
    // Classes and members
    // =========================================================================

    fn check_class(&mut self, class: &ClassDecl) {
        debug!("checking class {}", class.name);
        self.current_class = class.name.clone();

        for member in &class.members {
            if self.settled() {
                return;
            }
            match &member.kind {
                MemberKind::Attribute(attr) => self.check_attribute(attr),
                MemberKind::Method(method) => self.check_method(method),
                MemberKind::Constructor(ctor) => {
                    if ctor.name != class.name {
                        self.report(StaticError::mismatch_in_statement(member, member.span));
                    }
                    self.enter_member(false, true, None);
                    self.check_body(&ctor.params, &ctor.body);
                }
                MemberKind::Destructor(dtor) => {
                    if dtor.name != class.name {
                        self.report(StaticError::mismatch_in_statement(member, member.span));
                    }
                    self.enter_member(false, false, None);
                    self.check_body(&[], &dtor.body);
                }
            }
        }
    }

    fn enter_member(&mut self, is_static: bool, is_constructor: bool, return_type: Option<Type>) {
        self.in_static = is_static;
        self.in_constructor = is_constructor;
        self.current_fn_return_type = return_type;
        self.assigned_finals.clear();
    }

    /// Report an unknown class named by a type annotation
    pub(super) fn check_declared_type(&mut self, ty: &TypeExpr) {
        if let Some((name, span)) = ty.class_name() {
            if !self.classes.contains(name) {
                self.report(StaticError::undeclared_class(name, span));
            }
        }
    }

    fn check_attribute(&mut self, attr: &AttributeDecl) {
        self.enter_member(attr.is_static, false, None);
        self.check_declared_type(&attr.ty);
        let declared = Type::from(&attr.ty);

        for declarator in &attr.declarators {
            if let Some(init) = &declarator.init {
                self.check_initializer(attr.is_final, &declared, init, attr, declarator.span);
            }
        }
    }

    fn check_method(&mut self, method: &MethodDecl) {
        let return_type = method.return_type.as_ref().map(|ty| {
            self.check_declared_type(ty);
            Type::from(ty)
        });
        self.enter_member(method.is_static, false, return_type);
        self.check_body(&method.params, &method.body);
    }

    /// Parameters and body share one scope
    fn check_body(&mut self, params: &[Param], body: &Block) {
        self.scope.push_child();

        for param in params {
            self.check_declared_type(&param.ty);
            let symbol = Symbol::new(&param.name, SymbolKind::Parameter, Type::from(&param.ty))
                .with_initialized(true);
            if self.scope.define(symbol).is_err() {
                self.report(StaticError::redeclared(DeclKind::Parameter, &param.name, param.span));
            }
        }

        for stmt in &body.stmts {
            self.check_stmt(stmt);
        }

        self.scope.pop_to_parent();
    }

    /// Type and constant-expression rules for one initializer
    fn check_initializer(
        &mut self,
        is_final: bool,
        declared: &Type,
        init: &Expr,
        decl: &dyn fmt::Display,
        span: Span,
    ) {
        let actual = self.check_value(init);

        if !self.types().compatible(declared, &actual) {
            let error = if is_final {
                StaticError::mismatch_in_constant(&decl, span)
            } else {
                StaticError::mismatch_in_statement(&decl, span)
            };
            self.report(error);
        }

        if is_final {
            if let Some(offender) = constant::first_non_constant(init) {
                trace!("non-constant '{}' in final initializer", offender);
                self.report(StaticError::illegal_constant_expression(init, init.span));
            }
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn check_stmt(&mut self, stmt: &Stmt) {
        if self.settled() {
            return;
        }

        match &stmt.kind {
            StmtKind::VarDecl(decl) => self.check_var_decl(decl, stmt),
            StmtKind::Assign { target, value } => self.check_assign(target, value, stmt),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond = self.check_value(condition);
                if !cond.admits_boolean() {
                    self.report(StaticError::mismatch_in_statement(stmt, stmt.span));
                }
                self.check_nested(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_nested(else_branch);
                }
            }
            StmtKind::For {
                var,
                var_span,
                start,
                end,
                body,
                ..
            } => self.check_for(var, *var_span, start, end, body, stmt),
            StmtKind::Break | StmtKind::Continue => {
                if !self.scope.in_loop() {
                    self.report(StaticError::must_in_loop(stmt, stmt.span));
                }
            }
            StmtKind::Return(value) => self.check_return(value.as_ref(), stmt),
            StmtKind::Call(call) => {
                self.check_expr(call);
            }
            StmtKind::Block(block) => {
                self.scope.push_child();
                for inner in &block.stmts {
                    self.check_stmt(inner);
                }
                self.scope.pop_to_parent();
            }
        }
    }

    /// A statement in its own scope
    fn check_nested(&mut self, stmt: &Stmt) {
        self.scope.push_child();
        self.check_stmt(stmt);
        self.scope.pop_to_parent();
    }

    fn check_var_decl(&mut self, decl: &VarDecl, stmt: &Stmt) {
        self.check_declared_type(&decl.ty);
        let declared = Type::from(&decl.ty);
        let kind = if decl.is_final {
            SymbolKind::Constant
        } else {
            SymbolKind::Variable
        };

        for declarator in &decl.declarators {
            if self.scope.lookup_local(&declarator.name).is_some() {
                let label = if decl.is_final {
                    DeclKind::Constant
                } else {
                    DeclKind::Variable
                };
                self.report(StaticError::redeclared(label, &declarator.name, declarator.span));
                return;
            }

            if let Some(init) = &declarator.init {
                self.check_initializer(decl.is_final, &declared, init, stmt, stmt.span);
            }

            let symbol = Symbol::new(&declarator.name, kind, declared.clone())
                .with_initialized(declarator.init.is_some());
            if let Err(message) = self.scope.define(symbol) {
                trace!("{}", message);
            }
        }
    }

    fn check_assign(&mut self, target: &Expr, value: &Expr, stmt: &Stmt) {
        let actual = self.check_value(value);
        let expected = self.check_assign_target(target, stmt);

        if let ExprType::Known(expected) = &expected {
            if !self.types().compatible(expected, &actual) {
                self.report(StaticError::mismatch_in_statement(stmt, stmt.span));
            }
        }
    }

    /// Resolve the left-hand side of an assignment and check it is writable
    fn check_assign_target(&mut self, target: &Expr, stmt: &Stmt) -> ExprType {
        match &target.kind {
            ExprKind::Identifier(name) => {
                if let Some(symbol) = self.scope.lookup(name) {
                    let writable = symbol.is_assignable();
                    let ty = symbol.ty.clone();
                    if !writable {
                        self.report(StaticError::cannot_assign_to_constant(stmt, stmt.span));
                    } else if let Some(symbol) = self.scope.lookup_mut(name) {
                        symbol.initialized = true;
                    }
                    return ExprType::value(&ty);
                }
                if let Some((_, attr)) = self.classes.find_attribute(&self.current_class, name) {
                    let (is_final, ty) = (attr.is_final, attr.ty.clone());
                    if is_final {
                        self.report(StaticError::cannot_assign_to_constant(stmt, stmt.span));
                    }
                    return ExprType::value(&ty);
                }
                if self.classes.contains(name) {
                    self.report(StaticError::mismatch_in_statement(stmt, stmt.span));
                    return ExprType::Unknown;
                }
                self.fail(StaticError::undeclared_identifier(name, target.span))
            }
            ExprKind::Field { object, field } => {
                let Some(access) = self.resolve_attribute(target, object, field) else {
                    return ExprType::Unknown;
                };
                if access.is_final && !self.may_initialize_final(object, field, &access) {
                    self.report(StaticError::cannot_assign_to_constant(stmt, stmt.span));
                }
                ExprType::value(&access.ty)
            }
            // Element writes are allowed even through a final array
            _ => self.check_value(target),
        }
    }

    fn check_for(
        &mut self,
        var: &str,
        var_span: Span,
        start: &Expr,
        end: &Expr,
        body: &Stmt,
        stmt: &Stmt,
    ) {
        self.scope.push_child();

        let counter = if let Some(symbol) = self.scope.lookup(var) {
            Some((symbol.is_assignable(), symbol.ty.clone()))
        } else {
            self.classes
                .find_attribute(&self.current_class, var)
                .map(|(_, attr)| (!attr.is_final, attr.ty.clone()))
        };

        match counter {
            Some((writable, ty)) => {
                if !writable {
                    self.report(StaticError::cannot_assign_to_constant(stmt, stmt.span));
                }
                if !ty.is_int() {
                    self.report(StaticError::mismatch_in_statement(stmt, stmt.span));
                }
            }
            None => {
                let symbol = Symbol::new(var, SymbolKind::Variable, Type::int()).with_initialized(true);
                if let Err(message) = self.scope.define(symbol) {
                    trace!("{} at {}", message, var_span);
                }
            }
        }

        let from = self.check_value(start);
        let to = self.check_value(end);
        if !from.admits_int() || !to.admits_int() {
            self.report(StaticError::mismatch_in_statement(stmt, stmt.span));
        }

        self.scope.enter_loop();
        self.check_nested(body);
        self.scope.exit_loop();
        self.scope.pop_to_parent();
    }

    fn check_return(&mut self, value: Option<&Expr>, stmt: &Stmt) {
        let expected = self.current_fn_return_type.clone();
        match (value, expected) {
            (None, None) => {}
            (None, Some(_)) => {
                self.report(StaticError::mismatch_in_statement(stmt, stmt.span));
            }
            (Some(value), expected) => {
                let actual = self.check_value(value);
                let ok = match &expected {
                    Some(expected) => self.types().compatible(expected, &actual),
                    None => false,
                };
                if !ok {
                    self.report(StaticError::mismatch_in_statement(stmt, stmt.span));
                }
            }
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
