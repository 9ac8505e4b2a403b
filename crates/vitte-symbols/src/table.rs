use std::collections::HashMap;

use vitte_arena::InternedStr;
use vitte_ast::NodeId;
use vitte_diagnostics::{Code, DiagnosticBag, Severity};
use vitte_span::Span;

use crate::kind::SymbolKind;

/// 1-based handle into a [`SymbolTable`]; `0` is null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    pub const NULL: SymbolId = SymbolId(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone)]
pub struct SymbolInfo {
    pub kind: SymbolKind,
    pub name: InternedStr,
    pub decl_node: NodeId,
    pub span: Span,
}

/// Stack-of-scopes symbol table. Popping a scope only drops that scope's
/// `HashMap`; the dense `symbols` vector is append-only, so existing
/// [`SymbolId`]s stay valid for the life of the table.
#[derive(Default)]
pub struct SymbolTable {
    symbols: Vec<SymbolInfo>,
    scopes: Vec<HashMap<InternedStr, SymbolId>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable { symbols: Vec::new(), scopes: Vec::new() }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the current scope. Returns the bindings it held, in insertion
    /// order — the phrase linter uses this to check `read` on the way out.
    pub fn pop_scope(&mut self) -> Vec<(InternedStr, SymbolId)> {
        let Some(scope) = self.scopes.pop() else { return Vec::new() };
        let mut entries: Vec<_> = scope.into_iter().collect();
        entries.sort_by_key(|(_, id)| *id);
        entries
    }

    /// Defines `name` in the current scope. If the current scope already
    /// binds `name`, pushes a "duplicate definition" error at `span` and
    /// returns the *existing* id rather than creating a new one.
    pub fn define(
        &mut self,
        diags: &mut DiagnosticBag,
        kind: SymbolKind,
        name: InternedStr,
        decl_node: NodeId,
        span: Span,
    ) -> SymbolId {
        if let Some(existing) = self.lookup_current(name) {
            diags.push(Severity::Error, Code::new("E0201"), span, "duplicate definition in current scope");
            return existing;
        }
        self.symbols.push(SymbolInfo { kind, name, decl_node, span });
        let id = SymbolId(self.symbols.len() as u32);
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, id);
        }
        id
    }

    /// Walks scopes innermost-to-outermost. Interned names make this a
    /// plain integer-key lookup: equal names always share one `InternedStr`.
    pub fn lookup(&self, name: InternedStr) -> Option<SymbolId> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&name).copied())
    }

    pub fn lookup_current(&self, name: InternedStr) -> Option<SymbolId> {
        self.scopes.last().and_then(|scope| scope.get(&name).copied())
    }

    pub fn symbol_info(&self, id: SymbolId) -> Option<&SymbolInfo> {
        if id.is_null() {
            return None;
        }
        self.symbols.get(id.0 as usize - 1)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitte_span::FileId;

    fn span() -> Span {
        Span::new(FileId(1), 0, 1)
    }

    #[test]
    fn scope_discipline_restores_previous_binding() {
        let mut interner = vitte_arena::Interner::new();
        let x = interner.intern("x");
        let mut table = SymbolTable::new();
        let mut diags = DiagnosticBag::new();

        table.push_scope();
        let outer = table.define(&mut diags, SymbolKind::Local, x, NodeId::NULL, span());
        table.push_scope();
        let _inner = table.define(&mut diags, SymbolKind::Local, x, NodeId::NULL, span());
        assert_eq!(table.lookup_current(x), Some(_inner));
        table.pop_scope();
        assert_eq!(table.lookup_current(x), Some(outer));
        table.pop_scope();
        assert_eq!(table.lookup_current(x), None);
    }

    #[test]
    fn duplicate_definition_in_current_scope_reports_and_keeps_first_id() {
        let mut interner = vitte_arena::Interner::new();
        let f = interner.intern("f");
        let mut table = SymbolTable::new();
        let mut diags = DiagnosticBag::new();

        table.push_scope();
        let first = table.define(&mut diags, SymbolKind::Function, f, NodeId::NULL, span());
        let second = table.define(&mut diags, SymbolKind::Function, f, NodeId::NULL, span());
        assert_eq!(first, second);
        assert!(diags.has_errors());
    }

    #[test]
    fn lookup_walks_outer_scopes() {
        let mut interner = vitte_arena::Interner::new();
        let g = interner.intern("g");
        let mut table = SymbolTable::new();
        let mut diags = DiagnosticBag::new();

        table.push_scope();
        let outer = table.define(&mut diags, SymbolKind::Function, g, NodeId::NULL, span());
        table.push_scope();
        assert_eq!(table.lookup(g), Some(outer));
        assert_eq!(table.lookup_current(g), None);
    }

    #[test]
    fn ids_are_dense_and_start_at_one() {
        let mut interner = vitte_arena::Interner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let mut table = SymbolTable::new();
        let mut diags = DiagnosticBag::new();
        table.push_scope();
        let id_a = table.define(&mut diags, SymbolKind::Local, a, NodeId::NULL, span());
        let id_b = table.define(&mut diags, SymbolKind::Local, b, NodeId::NULL, span());
        assert_eq!(id_a, SymbolId(1));
        assert_eq!(id_b, SymbolId(2));
    }

    proptest::proptest! {
        /// Nesting `depth` scopes, each redefining the same name, then
        /// popping them one at a time, always exposes exactly the binding
        /// from the innermost scope still on the stack — never an older or
        /// a newer one.
        #[test]
        fn nested_shadowing_unwinds_in_stack_order(depth in 1usize..12) {
            let mut interner = vitte_arena::Interner::new();
            let x = interner.intern("x");
            let mut table = SymbolTable::new();
            let mut diags = DiagnosticBag::new();

            let mut ids = Vec::with_capacity(depth);
            for _ in 0..depth {
                table.push_scope();
                ids.push(table.define(&mut diags, SymbolKind::Local, x, NodeId::NULL, span()));
            }
            for expected in ids.into_iter().rev() {
                proptest::prop_assert_eq!(table.lookup_current(x), Some(expected));
                table.pop_scope();
            }
            proptest::prop_assert_eq!(table.lookup(x), None);
        }
    }
}
