use vitte_ast::{Ast, NodeId, NodeKind};
use vitte_span::Span;
use vitte_token::TokenKind;

use crate::cursor::Parser;

/// Phrase-surface entry point: `mod <ident>` followed by the same item
/// grammar as [`Parser::parse_core`] (`use`/`export`/`fn`/entrypoint
/// keywords), just spelled with the phrase opener. Bodies accept both
/// core and phrase statement forms either way — see
/// [`Parser::parse_core_statement`].
impl<'a> Parser<'a> {
    pub fn parse_phrase(mut self) -> (Ast, NodeId) {
        let mod_tok = self.expect(TokenKind::Mod, "`mod`");
        let name_tok = self.expect(TokenKind::Identifier, "a module name");
        let name = name_tok.as_ref().map(|t| self.intern(&t.text)).unwrap_or_else(|| self.intern(""));
        let mut span = match (&mod_tok, &name_tok) {
            (Some(m), Some(n)) => self.join(m.span, n.span),
            (Some(m), None) => m.span,
            (None, _) => Span::unknown(),
        };

        let mut items = Vec::new();
        self.skip_separators();
        while !self.at_eof() {
            let pos_before = self.pos;
            if self.tracker.top_items_exhausted(&self.budget) {
                self.bump();
                self.skip_separators();
                continue;
            }
            match self.parse_core_item() {
                Some(item) => {
                    span = self.join(span, self.span_of(item));
                    items.push(item);
                    self.tracker.record_top_item();
                }
                None => self.recover_to_sync_point(),
            }
            self.ensure_progress(pos_before);
            self.skip_separators();
        }

        let root = self.alloc(NodeKind::Module { name, items }, span);
        (self.ast, root)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vitte_arena::Interner;
    use vitte_ast::NodeKind;
    use vitte_diagnostics::DiagnosticBag;
    use vitte_lexer::Lexer;
    use vitte_span::FileId;

    use crate::budget::ParseBudget;
    use crate::cursor::Parser;

    fn parse(src: &str) -> (vitte_ast::Ast, vitte_ast::NodeId, DiagnosticBag) {
        let tokens = Lexer::tokenize(src, FileId(1));
        let mut interner = Interner::new();
        let mut diags = DiagnosticBag::new();
        let (ast, root) = {
            let p = Parser::new(tokens, &mut interner, &mut diags, ParseBudget::unlimited());
            p.parse_phrase()
        };
        (ast, root, diags)
    }

    #[test]
    fn phrase_module_with_a_prog_entry_matches_scenario_three() {
        let src = "mod demo\nprog g\n  set y = 2\n  ret y\n.end\n";
        let (ast, root, diags) = parse(src);
        assert!(diags.is_empty());
        match ast.kind(root) {
            NodeKind::Module { name: _, items } => {
                assert_eq!(items.len(), 1);
                match ast.kind(items[0]) {
                    NodeKind::Entry { kind: vitte_ast::EntryKind::Program, body, .. } => {
                        match ast.kind(*body) {
                            NodeKind::Block { stmts } => {
                                assert_eq!(stmts.len(), 2);
                                assert!(matches!(ast.kind(stmts[0]), NodeKind::Set { .. }));
                                assert!(matches!(ast.kind(stmts[1]), NodeKind::Ret { .. }));
                            }
                            other => panic!("expected Block, got {other:?}"),
                        }
                    }
                    other => panic!("expected Entry, got {other:?}"),
                }
            }
            other => panic!("expected Module, got {other:?}"),
        }
    }

    #[test]
    fn phrase_loop_with_step() {
        let src = "mod demo\nprog p\n  loop i from 0 to 10 step 2\n    say i\n  .end\n.end\n";
        let (_ast, _root, diags) = parse(src);
        assert!(diags.is_empty());
    }

    #[test]
    fn use_item_is_shared_with_the_core_surface() {
        let src = "mod demo\nuse a::b\nprog p\n  ret 0\n.end\n";
        let (ast, root, diags) = parse(src);
        assert!(diags.is_empty());
        match ast.kind(root) {
            NodeKind::Module { items, .. } => assert_eq!(items.len(), 2),
            other => panic!("expected Module, got {other:?}"),
        }
    }
}
