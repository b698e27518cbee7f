//! Class table: every class, its parent and its member namespace

use super::diagnostic::{DeclKind, StaticError};
use super::types::Type;
use crate::frontend::ast::{ClassDecl, MemberKind, Param, Program};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Name of the built-in I/O class
pub const IO_CLASS: &str = "IO";

/// Name the I/O facility is bound to in the global scope
pub const IO_BINDING: &str = "io";

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInfo {
    pub ty: Type,
    pub is_final: bool,
    pub is_static: bool,
    pub has_initializer: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    /// `None` for void
    pub return_type: Option<Type>,
    pub params: Vec<(String, Type)>,
    pub is_static: bool,
}

impl MethodInfo {
    fn from_params(return_type: Option<Type>, params: &[Param], is_static: bool) -> Self {
        Self {
            return_type,
            params: params
                .iter()
                .map(|p| (p.name.clone(), Type::from(&p.ty)))
                .collect(),
            is_static,
        }
    }

    fn builtin(return_type: Option<Type>, params: Vec<Type>) -> Self {
        Self {
            return_type,
            params: params
                .into_iter()
                .enumerate()
                .map(|(i, ty)| (format!("arg{}", i), ty))
                .collect(),
            is_static: true,
        }
    }
}

/// Attribute or ordinary method
#[derive(Debug, Clone, PartialEq)]
pub enum ValueMember {
    Attribute(AttributeInfo),
    Method(MethodInfo),
}

/// Everything a class declares under one name.
///
/// A constructor and a destructor may share a name; any other pair collides.
#[derive(Debug, Clone, Default)]
pub struct NameSlot {
    pub value: Option<ValueMember>,
    pub constructor: Option<MethodInfo>,
    pub destructor: bool,
}

impl NameSlot {
    fn is_occupied(&self) -> bool {
        self.value.is_some() || self.constructor.is_some() || self.destructor
    }
}

#[derive(Debug, Clone)]
pub struct ClassEntry {
    pub name: String,
    pub parent: Option<String>,
    slots: HashMap<String, NameSlot>,
}

impl ClassEntry {
    pub fn new(name: impl Into<String>, parent: Option<String>) -> Self {
        Self {
            name: name.into(),
            parent,
            slots: HashMap::new(),
        }
    }

    pub fn slot(&self, name: &str) -> Option<&NameSlot> {
        self.slots.get(name)
    }

    /// Register an attribute; on collision returns the label to report
    pub fn add_attribute(&mut self, name: &str, info: AttributeInfo) -> Result<(), DeclKind> {
        let label = |is_final: bool| {
            if is_final {
                DeclKind::Constant
            } else {
                DeclKind::Attribute
            }
        };
        let slot = self.slots.entry(name.to_string()).or_default();
        if let Some(ValueMember::Attribute(existing)) = &slot.value {
            return Err(label(existing.is_final));
        }
        if slot.is_occupied() {
            return Err(label(info.is_final));
        }
        slot.value = Some(ValueMember::Attribute(info));
        Ok(())
    }

    pub fn add_method(&mut self, name: &str, info: MethodInfo) -> Result<(), DeclKind> {
        let slot = self.slots.entry(name.to_string()).or_default();
        if slot.is_occupied() {
            return Err(DeclKind::Method);
        }
        slot.value = Some(ValueMember::Method(info));
        Ok(())
    }

    pub fn add_constructor(&mut self, name: &str, info: MethodInfo) -> Result<(), DeclKind> {
        let slot = self.slots.entry(name.to_string()).or_default();
        if slot.value.is_some() || slot.constructor.is_some() {
            return Err(DeclKind::Constructor);
        }
        slot.constructor = Some(info);
        Ok(())
    }

    pub fn add_destructor(&mut self, name: &str) -> Result<(), DeclKind> {
        let slot = self.slots.entry(name.to_string()).or_default();
        if slot.value.is_some() || slot.destructor {
            return Err(DeclKind::Destructor);
        }
        slot.destructor = true;
        Ok(())
    }

    fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        match self.slots.get(name)?.value.as_ref()? {
            ValueMember::Attribute(info) => Some(info),
            ValueMember::Method(_) => None,
        }
    }

    fn method(&self, name: &str) -> Option<&MethodInfo> {
        match self.slots.get(name)?.value.as_ref()? {
            ValueMember::Method(info) => Some(info),
            ValueMember::Attribute(_) => None,
        }
    }
}

/// Registry of all classes of one program, built once and read-only afterwards
#[derive(Debug, Clone)]
pub struct ClassTable {
    classes: HashMap<String, ClassEntry>,
    has_entry_point: bool,
}

impl ClassTable {
    /// A table holding only the built-in I/O class
    pub fn new() -> Self {
        let mut classes = HashMap::new();
        classes.insert(IO_CLASS.to_string(), io_class());
        Self {
            classes,
            has_entry_point: false,
        }
    }

    /// Build the table for `program`; the first violation ends the build
    pub fn build(program: &Program) -> Result<Self, StaticError> {
        let mut table = Self::new();

        for class in &program.classes {
            if table.classes.contains_key(&class.name) {
                return Err(StaticError::redeclared(
                    DeclKind::Class,
                    &class.name,
                    class.name_span,
                ));
            }
            table
                .classes
                .insert(class.name.clone(), ClassEntry::new(&class.name, None));
        }

        for class in &program.classes {
            table.register_class(class)?;
        }

        debug!(
            "class table built: {} classes, entry point {}",
            program.classes.len(),
            if table.has_entry_point { "found" } else { "missing" }
        );
        Ok(table)
    }

    fn register_class(&mut self, class: &ClassDecl) -> Result<(), StaticError> {
        let mut entry = ClassEntry::new(&class.name, class.parent.clone());

        if let Some(parent) = &class.parent {
            if !self.classes.contains_key(parent) {
                let span = class.parent_span.unwrap_or(class.span);
                return Err(StaticError::undeclared_class(parent, span));
            }
        }

        for member in &class.members {
            match &member.kind {
                MemberKind::Attribute(attr) => {
                    for declarator in &attr.declarators {
                        let info = AttributeInfo {
                            ty: Type::from(&attr.ty),
                            is_final: attr.is_final,
                            is_static: attr.is_static,
                            has_initializer: declarator.init.is_some(),
                        };
                        entry
                            .add_attribute(&declarator.name, info)
                            .map_err(|kind| {
                                StaticError::redeclared(kind, &declarator.name, declarator.span)
                            })?;
                    }
                }
                MemberKind::Method(method) => {
                    let return_type = method.return_type.as_ref().map(Type::from);
                    let info = MethodInfo::from_params(return_type, &method.params, method.is_static);
                    let is_entry_point = is_entry_point(&method.name, &info);
                    entry
                        .add_method(&method.name, info)
                        .map_err(|kind| StaticError::redeclared(kind, &method.name, member.span))?;
                    self.has_entry_point |= is_entry_point;
                }
                MemberKind::Constructor(ctor) => {
                    let info = MethodInfo::from_params(
                        Some(Type::class(&class.name)),
                        &ctor.params,
                        false,
                    );
                    entry
                        .add_constructor(&ctor.name, info)
                        .map_err(|kind| StaticError::redeclared(kind, &ctor.name, member.span))?;
                }
                MemberKind::Destructor(dtor) => {
                    entry
                        .add_destructor(&dtor.name)
                        .map_err(|kind| StaticError::redeclared(kind, &dtor.name, member.span))?;
                }
            }
        }

        self.classes.insert(class.name.clone(), entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn has_entry_point(&self) -> bool {
        self.has_entry_point
    }

    /// `class` followed by its ancestors; stops at a repeated class
    pub fn ancestry<'a>(&'a self, class: &str) -> Vec<&'a ClassEntry> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.classes.get(class);

        while let Some(entry) = current {
            if !seen.insert(entry.name.as_str()) {
                break;
            }
            chain.push(entry);
            current = entry.parent.as_deref().and_then(|p| self.classes.get(p));
        }

        chain
    }

    /// Attribute visible in `class`, with the name of the class declaring it
    pub fn find_attribute<'a>(&'a self, class: &str, name: &str) -> Option<(&'a str, &'a AttributeInfo)> {
        self.ancestry(class)
            .into_iter()
            .find_map(|entry| entry.attribute(name).map(|info| (entry.name.as_str(), info)))
    }

    /// Method visible in `class`, with the name of the class declaring it
    pub fn find_method<'a>(&'a self, class: &str, name: &str) -> Option<(&'a str, &'a MethodInfo)> {
        self.ancestry(class)
            .into_iter()
            .find_map(|entry| entry.method(name).map(|info| (entry.name.as_str(), info)))
    }

    /// The constructor `class` declares for itself; constructors are not inherited
    pub fn constructor(&self, class: &str) -> Option<&MethodInfo> {
        self.classes.get(class)?.slot(class)?.constructor.as_ref()
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}

/// `static void main()` with no parameters
fn is_entry_point(name: &str, info: &MethodInfo) -> bool {
    name == "main" && info.is_static && info.params.is_empty() && info.return_type.is_none()
}

fn io_class() -> ClassEntry {
    let mut entry = ClassEntry::new(IO_CLASS, None);
    let methods = [
        ("readInt", Some(Type::int()), vec![]),
        ("readFloat", Some(Type::float()), vec![]),
        ("readString", Some(Type::string()), vec![]),
        ("writeInt", None, vec![Type::int()]),
        ("writeFloat", None, vec![Type::float()]),
        ("writeString", None, vec![Type::string()]),
        ("writeIntLn", None, vec![Type::int()]),
        ("writeFloatLn", None, vec![Type::float()]),
        ("writeStrLn", None, vec![Type::string()]),
    ];
    for (name, return_type, params) in methods {
        entry.slots.insert(
            name.to_string(),
            NameSlot {
                value: Some(ValueMember::Method(MethodInfo::builtin(return_type, params))),
                ..NameSlot::default()
            },
        );
    }
    entry
}
