//! Scope and symbol table.
//!
//! Scopes live in an arena owned by the compilation unit and are addressed
//! by [`ScopeId`]. A scope's parent link and a macro's captured scope are
//! plain ids: lookup-only references that never own anything. Leaving a
//! scope pops it off the active stack but keeps its data, so a closure or
//! hygienic macro that captured it still resolves names there for the rest
//! of the unit.

use indexmap::IndexMap;
use kiln_ir::{Name, Span, Type};
use rustc_hash::FxBuildHasher;

use crate::Value;

/// Index of a scope in the unit's arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScopeId(usize);

impl ScopeId {
    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

/// Index of a symbol in the unit's arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SymbolId(usize);

impl SymbolId {
    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

bitflags::bitflags! {
    /// Binding attributes.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SymbolFlags: u8 {
        /// Declared with `var`; may be reassigned.
        const MUTABLE = 1 << 0;
        /// Declared with `const`.
        const CONST = 1 << 1;
        /// Carries a compile-time value.
        const COMPTIME = 1 << 2;
        const PARAM = 1 << 3;
        const FUNCTION = 1 << 4;
        /// Declared by host code, visible to the analysis passes.
        const HOST = 1 << 5;
    }
}

/// A named binding.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: Name,
    /// `Type::Unresolved` until inference reaches the declaration.
    pub ty: Type,
    /// Present iff the binding is known at compile time.
    pub value: Option<Value>,
    pub flags: SymbolFlags,
    pub span: Span,
    /// The one scope that owns this symbol.
    pub scope: ScopeId,
}

impl Symbol {
    pub fn new(name: Name, flags: SymbolFlags, span: Span) -> Self {
        Symbol {
            name,
            ty: Type::Unresolved,
            value: None,
            flags,
            span,
            scope: ScopeId(0),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self.flags |= SymbolFlags::COMPTIME;
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: Type) -> Self {
        self.ty = ty;
        self
    }

    pub fn is_mutable(&self) -> bool {
        self.flags.contains(SymbolFlags::MUTABLE)
    }

    pub fn is_comptime(&self) -> bool {
        self.flags.contains(SymbolFlags::COMPTIME)
    }
}

/// Why an assignment was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// Binding exists but is not `var`.
    Immutable,
    /// No binding in any enclosing scope.
    Undefined,
}

#[derive(Debug)]
struct ScopeData {
    parent: Option<ScopeId>,
    names: IndexMap<Name, SymbolId, FxBuildHasher>,
}

/// Arena of scopes and symbols plus the stack of active scopes.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<ScopeData>,
    symbols: Vec<Symbol>,
    /// Active scopes, innermost last. Never empty.
    stack: Vec<ScopeId>,
}

impl SymbolTable {
    /// Create a table with the unit's root scope active.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![ScopeData {
                parent: None,
                names: IndexMap::default(),
            }],
            symbols: Vec::new(),
            stack: vec![ScopeId(0)],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId(0))
    }

    /// Enter a child of the current scope.
    pub fn enter_scope(&mut self) -> ScopeId {
        self.enter_detached(self.current())
    }

    /// Enter a scope whose parent is `parent` rather than the current scope.
    ///
    /// Function and macro calls use this to resolve free names against the
    /// closure's or the definition's scope.
    pub fn enter_detached(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(ScopeData {
            parent: Some(parent),
            names: IndexMap::default(),
        });
        self.stack.push(id);
        tracing::trace!(scope = id.0, parent = parent.0, "enter scope");
        id
    }

    /// Leave the innermost scope. The root scope is never left.
    pub fn leave_scope(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Declare in the current scope. A same-scope redeclaration replaces
    /// the earlier binding.
    pub fn declare(&mut self, symbol: Symbol) -> SymbolId {
        self.declare_in(self.current(), symbol)
    }

    pub fn declare_in(&mut self, scope: ScopeId, mut symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        symbol.scope = scope;
        let name = symbol.name;
        self.symbols.push(symbol);
        let names = &mut self.scopes[scope.index()].names;
        // Iteration follows declaration order, so a redeclared name moves
        // to the end.
        names.shift_remove(&name);
        names.insert(name, id);
        id
    }

    /// Resolve from the current scope outwards.
    pub fn lookup(&self, name: Name) -> Option<SymbolId> {
        self.lookup_from(self.current(), name)
    }

    /// Resolve from `scope` outwards, nearest binding first.
    pub fn lookup_from(&self, scope: ScopeId, name: Name) -> Option<SymbolId> {
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            let data = &self.scopes[id.index()];
            if let Some(&symbol) = data.names.get(&name) {
                return Some(symbol);
            }
            cursor = data.parent;
        }
        None
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.index()].parent
    }

    /// Symbols declared directly in `scope`, in declaration order.
    pub fn scope_symbols(&self, scope: ScopeId) -> impl Iterator<Item = SymbolId> + '_ {
        self.scopes[scope.index()].names.values().copied()
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    /// Assign to the nearest binding of `name`.
    pub fn assign(&mut self, name: Name, value: Value) -> Result<SymbolId, AssignError> {
        let id = self.lookup(name).ok_or(AssignError::Undefined)?;
        let symbol = &mut self.symbols[id.index()];
        if !symbol.is_mutable() {
            return Err(AssignError::Immutable);
        }
        symbol.value = Some(value);
        Ok(id)
    }

    pub fn set_type(&mut self, id: SymbolId, ty: Type) {
        self.symbols[id.index()].ty = ty;
    }

    /// Every symbol ever declared, with its id.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate().map(|(i, symbol)| (SymbolId(i), symbol))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
