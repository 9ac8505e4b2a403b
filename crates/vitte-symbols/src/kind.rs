/// What a [`crate::SymbolTable::define`] call is introducing.
///
/// A closed enum rather than an open string tag, matching how the source
/// language's own declaration keywords partition into a fixed set of
/// categories (module, entry point, function, and the three binding
/// flavors the phrase linter tracks separately).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// `module <ident>`
    Module,
    /// `fn <ident>(...)`
    Function,
    /// `scn`/`prog`/`service`/`kernel`/`driver`/`tool`/`pipeline` entry point
    EntryPoint,
    /// Function parameter
    Param,
    /// `let`/`set`-introduced local binding
    Local,
    /// `for`/`loop` induction variable
    LoopVar,
}

impl SymbolKind {
    pub fn is_binding(self) -> bool {
        matches!(self, SymbolKind::Param | SymbolKind::Local | SymbolKind::LoopVar)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Module => "module",
            SymbolKind::Function => "function",
            SymbolKind::EntryPoint => "entry point",
            SymbolKind::Param => "parameter",
            SymbolKind::Local => "local",
            SymbolKind::LoopVar => "loop variable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_binding_kinds_report_is_binding() {
        assert!(SymbolKind::Param.is_binding());
        assert!(SymbolKind::Local.is_binding());
        assert!(SymbolKind::LoopVar.is_binding());
        assert!(!SymbolKind::Module.is_binding());
        assert!(!SymbolKind::Function.is_binding());
        assert!(!SymbolKind::EntryPoint.is_binding());
    }
}
