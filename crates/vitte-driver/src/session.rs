use vitte_arena::Interner;
use vitte_diagnostics::DiagnosticBag;
use vitte_span::{FileId, SourceMap};
use vitte_types::TypeInterner;

/// Everything one compile job owns: the interner, the structural type
/// table, the diagnostic bag, and the registered source files. Confined to
/// the thread that creates it (§5 — no cross-session sharing is defined).
#[derive(Default)]
pub struct Session {
    pub interner: Interner,
    pub types: TypeInterner,
    pub diags: DiagnosticBag,
    pub sources: SourceMap,
}

impl Session {
    pub fn new() -> Self {
        Session { interner: Interner::new(), types: TypeInterner::new(), diags: DiagnosticBag::new(), sources: SourceMap::new() }
    }

    /// Registers a file's bytes in the session and returns its `FileId`
    /// (§4.9 step 2).
    pub fn add_file(&mut self, path: impl Into<String>, text: impl Into<String>) -> FileId {
        self.sources.add_file(path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_ids_are_assigned_on_registration() {
        let mut session = Session::new();
        let a = session.add_file("a.vitte", "module a\n");
        let b = session.add_file("b.vitte", "module b\n");
        assert_ne!(a, b);
    }
}
