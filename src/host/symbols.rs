use std::collections::HashMap;

use crate::parser::ast::{DeclarationKind, TextRange};
use crate::types::TypeInfo;

/// unique id for each scope encountered during checking, id = 0 is always the file scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// a unique scope identified by it's `ScopeId`
#[derive(Debug, Clone)]
struct Scope {
    parent: Option<ScopeId>,
    symbols: HashMap<String, Symbol>,
}

#[derive(Debug, Clone)]
pub enum Symbol {
    Variable(VariableSymbol),
    Function(FunctionSymbol),
}

impl Symbol {
    pub fn range(&self) -> TextRange {
        match self {
            Symbol::Variable(var) => var.range,
            Symbol::Function(func) => func.range,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VariableSymbol {
    pub ty: TypeInfo,
    pub kind: Option<DeclarationKind>, // None for parameters
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct FunctionSymbol {
    pub return_type: TypeInfo,
    pub arity: Option<usize>, // None accepts any argument count
    pub range: TextRange,
}

/// Lexically scoped symbols for one file
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: HashMap<ScopeId, Scope>,
    next_scope_id: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = Self {
            scopes: HashMap::new(),
            next_scope_id: 0,
        };

        table.create_scope(None); // file scope
        table
    }

    pub fn file_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn create_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.next_scope_id);
        self.next_scope_id += 1;

        self.scopes.insert(
            id,
            Scope {
                parent,
                symbols: HashMap::new(),
            },
        );
        id
    }

    pub fn get_parent_scope(&self, scope_id: ScopeId) -> Option<ScopeId> {
        self.scopes.get(&scope_id).and_then(|scope| scope.parent)
    }

    /// Adds `symbol` to `scope_id`, failing with the existing symbol if the
    /// name is already declared there
    pub fn add_symbol(&mut self, scope_id: ScopeId, name: &str, symbol: Symbol) -> Result<(), Symbol> {
        let Some(scope) = self.scopes.get_mut(&scope_id) else {
            return Ok(());
        };
        if let Some(existing) = scope.symbols.get(name) {
            return Err(existing.clone());
        }
        scope.symbols.insert(name.to_string(), symbol);
        Ok(())
    }

    /// Overwrites a symbol already declared in `scope_id`
    pub fn replace_symbol(&mut self, scope_id: ScopeId, name: &str, symbol: Symbol) {
        if let Some(scope) = self.scopes.get_mut(&scope_id) {
            scope.symbols.insert(name.to_string(), symbol);
        }
    }

    pub fn lookup_symbol(&self, scope_id: ScopeId, name: &str) -> Option<&Symbol> {
        let mut current = Some(scope_id);

        while let Some(id) = current {
            let scope = self.scopes.get(&id)?;
            if let Some(symbol) = scope.symbols.get(name) {
                return Some(symbol);
            }
            current = scope.parent;
        }

        None
    }
}
