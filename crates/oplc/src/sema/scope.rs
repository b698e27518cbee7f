//! Symbol table and scope management

use super::class_table::{IO_BINDING, IO_CLASS};
use super::types::Type;
use std::collections::HashMap;

/// A local name: variable, constant, parameter or the I/O facility
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: Type,
    /// Set once a value is stored. Reading an unset symbol is not a
    /// violation; it only shows up in trace output.
    pub initialized: bool,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, ty: Type) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            initialized: false,
        }
    }

    pub fn with_initialized(mut self, initialized: bool) -> Self {
        self.initialized = initialized;
        self
    }

    /// Whether an assignment may target this symbol.
    ///
    /// Parameters are read-only unless passed by reference.
    pub fn is_assignable(&self) -> bool {
        match self.kind {
            SymbolKind::Variable => true,
            SymbolKind::Parameter => self.ty.is_reference(),
            SymbolKind::Constant | SymbolKind::Facility => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    /// `final` local
    Constant,
    Parameter,
    /// The global binding of the built-in I/O class
    Facility,
}

/// A lexical scope
#[derive(Debug)]
pub struct Scope {
    symbols: HashMap<String, Symbol>,
    parent: Option<Box<Scope>>,
    loop_depth: usize,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            symbols: HashMap::new(),
            parent: None,
            loop_depth: 0,
        }
    }

    /// The outermost scope, holding the I/O facility binding
    pub fn global() -> Self {
        let mut scope = Self::new();
        scope.symbols.insert(
            IO_BINDING.to_string(),
            Symbol::new(IO_BINDING, SymbolKind::Facility, Type::class(IO_CLASS))
                .with_initialized(true),
        );
        scope
    }

    pub fn define(&mut self, symbol: Symbol) -> Result<(), String> {
        if self.symbols.contains_key(&symbol.name) {
            return Err(format!("symbol '{}' already defined in this scope", symbol.name));
        }
        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        if let Some(sym) = self.symbols.get(name) {
            Some(sym)
        } else if let Some(parent) = &self.parent {
            parent.lookup(name)
        } else {
            None
        }
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        if self.symbols.contains_key(name) {
            self.symbols.get_mut(name)
        } else if let Some(parent) = &mut self.parent {
            parent.lookup_mut(name)
        } else {
            None
        }
    }

    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Push a new child scope
    pub fn push_child(&mut self) {
        let old_scope = std::mem::replace(self, Scope::new());
        self.loop_depth = old_scope.loop_depth;
        self.parent = Some(Box::new(old_scope));
    }

    /// Take the parent scope, replacing self with the parent
    pub fn pop_to_parent(&mut self) -> bool {
        if let Some(parent) = self.parent.take() {
            *self = *parent;
            true
        } else {
            false
        }
    }

    pub fn enter_loop(&mut self) {
        self.loop_depth += 1;
    }

    pub fn exit_loop(&mut self) {
        if self.loop_depth > 0 {
            self.loop_depth -= 1;
        }
    }

    pub fn in_loop(&self) -> bool {
        self.loop_depth > 0
    }

    /// Number of scopes from here to the outermost one
    pub fn depth(&self) -> usize {
        1 + self.parent.as_ref().map_or(0, |p| p.depth())
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
