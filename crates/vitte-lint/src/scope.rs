use std::collections::HashMap;

use vitte_arena::InternedStr;
use vitte_span::Span;

/// What introduced a tracked binding — mirrors the phrase surface's three
/// binding flavors (spec's `kind ∈ {param, local, loop}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindingKind {
    Param,
    Local,
    LoopVar,
}

#[derive(Debug, Clone)]
pub(crate) struct Binding {
    pub(crate) kind: BindingKind,
    pub(crate) decl_span: Span,
    pub(crate) read: bool,
}

/// One level of the linter's nested scope stack. A function body, a phrase
/// `loop`, and a `when` arm each push one of these; `if`/`while`/`match`
/// bodies share the enclosing scope (the spec only calls out those three
/// as scope-opening).
#[derive(Default)]
pub(crate) struct ScopeStack {
    frames: Vec<HashMap<InternedStr, Binding>>,
}

impl ScopeStack {
    pub(crate) fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pops the innermost frame and returns its bindings for unused-binding
    /// reporting at the call site (which has the interner needed to check
    /// the `_`-prefix exemption). Callers only ever pop a frame they pushed,
    /// so an empty stack here would be a caller bug; returning an empty map
    /// rather than panicking just means that bug reports zero diagnostics
    /// instead of crashing the compiler.
    pub(crate) fn pop(&mut self) -> HashMap<InternedStr, Binding> {
        self.frames.pop().unwrap_or_default()
    }

    /// Innermost scope containing `name`, searching outward; `None` if it
    /// isn't bound anywhere (a reference to a global, function, or unknown
    /// name, which this linter doesn't track).
    pub(crate) fn find(&self, name: InternedStr) -> Option<usize> {
        self.frames.iter().rposition(|frame| frame.contains_key(&name))
    }

    pub(crate) fn current_index(&self) -> usize {
        self.frames.len() - 1
    }

    pub(crate) fn binding_at(&self, index: usize, name: InternedStr) -> &Binding {
        &self.frames[index][&name]
    }

    pub(crate) fn define_current(&mut self, name: InternedStr, kind: BindingKind, decl_span: Span) {
        let top = self.frames.len() - 1;
        self.frames[top].insert(name, Binding { kind, decl_span, read: false });
    }

    pub(crate) fn mark_read(&mut self, name: InternedStr) {
        for frame in self.frames.iter_mut().rev() {
            if let Some(binding) = frame.get_mut(&name) {
                binding.read = true;
                return;
            }
        }
    }
}
