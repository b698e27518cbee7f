//! Type model and compatibility rules

use super::class_table::ClassTable;
use crate::frontend::ast::{BinaryOp, TypeExpr, TypeExprKind, UnaryOp};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Float,
    Boolean,
    String,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Float => "float",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::String => "string",
        };
        f.write_str(name)
    }
}

/// A resolved OPLang type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveType),
    Array { element: Box<Type>, size: usize },
    Class(String),
    Reference(Box<Type>),
}

impl Type {
    pub fn int() -> Self {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn float() -> Self {
        Type::Primitive(PrimitiveType::Float)
    }

    pub fn boolean() -> Self {
        Type::Primitive(PrimitiveType::Boolean)
    }

    pub fn string() -> Self {
        Type::Primitive(PrimitiveType::String)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Type::Class(name.into())
    }

    pub fn array_of(element: Type, size: usize) -> Self {
        Type::Array {
            element: Box::new(element),
            size,
        }
    }

    pub fn reference_to(inner: Type) -> Self {
        Type::Reference(Box::new(inner))
    }

    /// The referenced type for `T&`, otherwise the type itself
    pub fn decayed(&self) -> &Type {
        match self {
            Type::Reference(inner) => inner.decayed(),
            other => other,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Reference(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self.decayed(), Type::Primitive(PrimitiveType::Int))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self.decayed(),
            Type::Primitive(PrimitiveType::Int | PrimitiveType::Float)
        )
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.decayed(), Type::Primitive(PrimitiveType::Boolean))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.decayed(), Type::Primitive(PrimitiveType::String))
    }

    /// Class and array types are the ones that admit `nil`
    pub fn is_nullable(&self) -> bool {
        matches!(self.decayed(), Type::Class(_) | Type::Array { .. })
    }
}

impl From<&TypeExpr> for Type {
    fn from(ty: &TypeExpr) -> Self {
        match &ty.kind {
            TypeExprKind::Int => Type::int(),
            TypeExprKind::Float => Type::float(),
            TypeExprKind::Boolean => Type::boolean(),
            TypeExprKind::String => Type::string(),
            TypeExprKind::Class(name) => Type::class(name.clone()),
            TypeExprKind::Array { element, size } => Type::array_of(Type::from(&**element), *size),
            TypeExprKind::Reference(inner) => Type::reference_to(Type::from(&**inner)),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{}", p),
            Type::Array { element, size } => write!(f, "{}[{}]", element, size),
            Type::Class(name) => write!(f, "{}", name),
            Type::Reference(inner) => write!(f, "{}&", inner),
        }
    }
}

/// What an expression evaluates to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprType {
    /// An ordinary value; never a reference type
    Known(Type),
    /// The `nil` literal
    Nil,
    /// Result of a void method
    Void,
    /// A class name used as a static access prefix
    ClassRef(String),
    /// The expression already produced a violation
    Unknown,
}

impl ExprType {
    /// Value of type `ty`, with references decayed
    pub fn value(ty: &Type) -> Self {
        ExprType::Known(ty.decayed().clone())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ExprType::Unknown)
    }

    pub fn known(&self) -> Option<&Type> {
        match self {
            ExprType::Known(ty) => Some(ty),
            _ => None,
        }
    }

    /// Known int, or unknown
    pub fn admits_int(&self) -> bool {
        match self {
            ExprType::Known(ty) => ty.is_int(),
            ExprType::Unknown => true,
            _ => false,
        }
    }

    /// Known boolean, or unknown
    pub fn admits_boolean(&self) -> bool {
        match self {
            ExprType::Known(ty) => ty.is_boolean(),
            ExprType::Unknown => true,
            _ => false,
        }
    }
}

/// Type checker over the class hierarchy
pub struct TypeChecker<'a> {
    classes: &'a ClassTable,
}

impl<'a> TypeChecker<'a> {
    pub fn new(classes: &'a ClassTable) -> Self {
        Self { classes }
    }

    /// Structural equality; references are transparent
    pub fn same_type(&self, a: &Type, b: &Type) -> bool {
        a.decayed() == b.decayed()
    }

    /// True iff walking `sub`'s ancestor chain reaches `sup`
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(sub);

        while let Some(name) = current {
            if name == sup {
                return true;
            }
            if !visited.insert(name) {
                return false;
            }
            current = self.classes.get(name).and_then(|c| c.parent.as_deref());
        }

        false
    }

    /// Whether a value of type `actual` may be stored where `expected` is declared
    ///
    /// A `T&` binding aliases storage of exactly `T`, so it takes no numeric
    /// widening; class references still accept subclasses.
    pub fn compatible(&self, expected: &Type, actual: &ExprType) -> bool {
        match actual {
            ExprType::Unknown => true,
            ExprType::Nil => expected.is_nullable(),
            ExprType::Void | ExprType::ClassRef(_) => false,
            ExprType::Known(actual) => match expected {
                Type::Reference(inner) => self.binds_reference(inner.decayed(), actual.decayed()),
                _ => self.is_assignable(expected, actual.decayed()),
            },
        }
    }

    fn binds_reference(&self, target: &Type, actual: &Type) -> bool {
        match (target, actual) {
            (Type::Class(sup), Type::Class(sub)) => self.is_subtype(sub, sup),
            _ => self.same_type(target, actual),
        }
    }

    fn is_assignable(&self, expected: &Type, actual: &Type) -> bool {
        match (expected, actual) {
            (Type::Primitive(PrimitiveType::Float), Type::Primitive(PrimitiveType::Int)) => true,
            (Type::Class(sup), Type::Class(sub)) => self.is_subtype(sub, sup),
            _ => self.same_type(expected, actual),
        }
    }

    /// Result type of a binary operation, `None` if the operands are not admissible
    pub fn binary_result_type(
        &self,
        op: BinaryOp,
        left: &ExprType,
        right: &ExprType,
    ) -> Option<ExprType> {
        if left.is_unknown() || right.is_unknown() {
            return Some(ExprType::Unknown);
        }

        if op.is_equality() {
            return self.equality_operands(left, right).then(|| ExprType::Known(Type::boolean()));
        }

        let (l, r) = (left.known()?, right.known()?);

        if op.is_arithmetic() {
            if !l.is_numeric() || !r.is_numeric() {
                return None;
            }
            let result = if l.is_int() && r.is_int() {
                Type::int()
            } else {
                Type::float()
            };
            return Some(ExprType::Known(result));
        }

        let admissible = if op.is_relational() {
            l.is_numeric() && r.is_numeric()
        } else if op.is_logical() {
            l.is_boolean() && r.is_boolean()
        } else {
            l.is_string() && r.is_string()
        };

        if !admissible {
            return None;
        }
        let result = if op == BinaryOp::Concat {
            Type::string()
        } else {
            Type::boolean()
        };
        Some(ExprType::Known(result))
    }

    fn equality_operands(&self, left: &ExprType, right: &ExprType) -> bool {
        match (left, right) {
            (ExprType::Nil, ExprType::Nil) => true,
            (ExprType::Nil, ExprType::Known(ty)) | (ExprType::Known(ty), ExprType::Nil) => {
                ty.is_nullable()
            }
            (ExprType::Known(l), ExprType::Known(r)) => {
                self.same_type(l, r) || (l.is_numeric() && r.is_numeric())
            }
            _ => false,
        }
    }

    /// Result type of a unary operation, `None` if the operand is not admissible
    pub fn unary_result_type(&self, op: UnaryOp, operand: &ExprType) -> Option<ExprType> {
        if operand.is_unknown() {
            return Some(ExprType::Unknown);
        }
        let ty = operand.known()?;
        let admissible = match op {
            UnaryOp::Neg | UnaryOp::Plus => ty.is_numeric(),
            UnaryOp::Not => ty.is_boolean(),
        };
        admissible.then(|| ExprType::value(ty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Parser;

    fn table(source: &str) -> ClassTable {
        let program = Parser::new(source).unwrap().parse().unwrap();
        ClassTable::build(&program).unwrap()
    }

    fn known(ty: Type) -> ExprType {
        ExprType::Known(ty)
    }

    #[test]
    fn test_widening_is_one_directional() {
        let classes = table("");
        let tc = TypeChecker::new(&classes);

        assert!(tc.compatible(&Type::float(), &known(Type::int())));
        assert!(!tc.compatible(&Type::int(), &known(Type::float())));
        assert!(!tc.compatible(&Type::string(), &known(Type::int())));
        assert!(!tc.compatible(&Type::int(), &known(Type::boolean())));
    }

    #[test]
    fn test_subtyping_reflexive_and_transitive() {
        let classes = table("class A {} class B extends A {} class C extends B {}");
        let tc = TypeChecker::new(&classes);

        for name in ["A", "B", "C"] {
            assert!(tc.is_subtype(name, name));
        }
        assert!(tc.is_subtype("C", "B"));
        assert!(tc.is_subtype("B", "A"));
        assert!(tc.is_subtype("C", "A"));
        assert!(!tc.is_subtype("A", "C"));
        assert!(tc.compatible(&Type::class("A"), &known(Type::class("C"))));
        assert!(!tc.compatible(&Type::class("C"), &known(Type::class("A"))));
    }

    #[test]
    fn test_arrays_are_invariant() {
        let classes = table("class A {} class B extends A {}");
        let tc = TypeChecker::new(&classes);

        let ints3 = Type::array_of(Type::int(), 3);
        assert!(tc.compatible(&ints3, &known(Type::array_of(Type::int(), 3))));
        assert!(!tc.compatible(&ints3, &known(Type::array_of(Type::int(), 2))));
        assert!(!tc.compatible(
            &Type::array_of(Type::float(), 3),
            &known(Type::array_of(Type::int(), 3))
        ));
        assert!(!tc.compatible(
            &Type::array_of(Type::class("A"), 2),
            &known(Type::array_of(Type::class("B"), 2))
        ));
    }

    #[test]
    fn test_nil_and_references() {
        let classes = table("class A {}");
        let tc = TypeChecker::new(&classes);

        assert!(tc.compatible(&Type::class("A"), &ExprType::Nil));
        assert!(tc.compatible(&Type::array_of(Type::int(), 2), &ExprType::Nil));
        assert!(!tc.compatible(&Type::string(), &ExprType::Nil));
        assert!(tc.compatible(&Type::reference_to(Type::int()), &known(Type::int())));
        assert!(!tc.compatible(&Type::reference_to(Type::float()), &known(Type::int())));
        assert!(tc.compatible(&Type::reference_to(Type::class("A")), &ExprType::Nil));
        assert!(!tc.compatible(&Type::int(), &ExprType::Void));
        assert!(tc.compatible(&Type::int(), &ExprType::Unknown));
    }

    #[test]
    fn test_binary_result_types() {
        let classes = table("class A {}");
        let tc = TypeChecker::new(&classes);
        let int = known(Type::int());
        let float = known(Type::float());
        let string = known(Type::string());
        let boolean = known(Type::boolean());

        assert_eq!(tc.binary_result_type(BinaryOp::Add, &int, &int), Some(int.clone()));
        assert_eq!(tc.binary_result_type(BinaryOp::Mul, &int, &float), Some(float.clone()));
        assert_eq!(tc.binary_result_type(BinaryOp::Lt, &int, &float), Some(boolean.clone()));
        assert_eq!(tc.binary_result_type(BinaryOp::Eq, &int, &float), Some(boolean.clone()));
        assert_eq!(tc.binary_result_type(BinaryOp::Concat, &string, &string), Some(string.clone()));
        assert_eq!(tc.binary_result_type(BinaryOp::Add, &int, &string), None);
        assert_eq!(tc.binary_result_type(BinaryOp::And, &int, &boolean), None);
        assert_eq!(tc.binary_result_type(BinaryOp::Eq, &string, &int), None);
        assert_eq!(
            tc.binary_result_type(BinaryOp::Ne, &known(Type::class("A")), &ExprType::Nil),
            Some(boolean.clone())
        );
        assert_eq!(tc.binary_result_type(BinaryOp::Eq, &int, &ExprType::Nil), None);
        assert_eq!(
            tc.binary_result_type(BinaryOp::Sub, &ExprType::Unknown, &string),
            Some(ExprType::Unknown)
        );
    }

    #[test]
    fn test_unary_result_types() {
        let classes = table("");
        let tc = TypeChecker::new(&classes);

        assert_eq!(
            tc.unary_result_type(UnaryOp::Neg, &known(Type::float())),
            Some(known(Type::float()))
        );
        assert_eq!(tc.unary_result_type(UnaryOp::Neg, &known(Type::boolean())), None);
        assert_eq!(
            tc.unary_result_type(UnaryOp::Not, &known(Type::boolean())),
            Some(known(Type::boolean()))
        );
        assert_eq!(tc.unary_result_type(UnaryOp::Not, &known(Type::int())), None);
    }
}
