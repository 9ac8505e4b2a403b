use vitte_ast::{Ast, EntryKind, NodeId, NodeKind};
use vitte_diagnostics::{Code, Severity};
use vitte_span::Span;
use vitte_token::TokenKind;

use crate::cursor::Parser;

/// Core-surface entry point: `module <ident>` followed by a sequence of
/// `use`/`export`/`fn`/entrypoint items, separated by `;` and/or line
/// breaks (both consumed transparently). Returns the finished arena and
/// the id of the root `Module` node.
impl<'a> Parser<'a> {
    pub fn parse_core(mut self) -> (Ast, NodeId) {
        let module_tok = self.expect(TokenKind::Module, "`module`");
        let name_tok = self.expect(TokenKind::Identifier, "a module name");
        let name = name_tok.as_ref().map(|t| self.intern(&t.text)).unwrap_or_else(|| self.intern(""));
        let mut span = match (&module_tok, &name_tok) {
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

    pub(crate) fn parse_core_item(&mut self) -> Option<NodeId> {
        match self.peek_kind() {
            TokenKind::Use => Some(self.parse_use()),
            TokenKind::Export => Some(self.parse_export()),
            TokenKind::Fn => Some(self.parse_fn()),
            TokenKind::Scn => Some(self.parse_entry(EntryKind::Scenario)),
            TokenKind::Prog => Some(self.parse_entry(EntryKind::Program)),
            TokenKind::Service => Some(self.parse_entry(EntryKind::Service)),
            TokenKind::Kernel => Some(self.parse_entry(EntryKind::Kernel)),
            TokenKind::DriverKw => Some(self.parse_entry(EntryKind::Driver)),
            TokenKind::Tool => Some(self.parse_entry(EntryKind::Tool)),
            TokenKind::Pipeline => Some(self.parse_entry(EntryKind::Pipeline)),
            _ => {
                let tok = self.peek().clone();
                self.diags.push(
                    Severity::Error,
                    Code::new("E0103"),
                    tok.span,
                    format!("expected a top-level item, found {:?}", tok.kind),
                );
                None
            }
        }
    }

    pub(crate) fn parse_use(&mut self) -> NodeId {
        let use_tok = self.bump();
        let mut text = String::new();
        let mut end_span = use_tok.span;
        if let Some(first) = self.expect(TokenKind::Identifier, "a path") {
            text.push_str(&first.text);
            end_span = first.span;
            while self.at(TokenKind::ColonColon) {
                self.bump();
                text.push_str("::");
                match self.expect(TokenKind::Identifier, "a path segment") {
                    Some(seg) => {
                        text.push_str(&seg.text);
                        end_span = seg.span;
                    }
                    None => break,
                }
            }
        }
        let path = self.intern(&text);
        let span = self.join(use_tok.span, end_span);
        self.alloc(NodeKind::Use { path }, span)
    }

    pub(crate) fn parse_export(&mut self) -> NodeId {
        let export_tok = self.bump();
        let name_tok = self.expect(TokenKind::Identifier, "a symbol name");
        let (name, span) = match name_tok {
            Some(t) => (self.intern(&t.text), self.join(export_tok.span, t.span)),
            None => (self.intern(""), export_tok.span),
        };
        self.alloc(NodeKind::Export { name }, span)
    }

    fn parse_fn(&mut self) -> NodeId {
        let fn_tok = self.bump();
        let name_tok = self.expect(TokenKind::Identifier, "a function name");
        let name = name_tok.map(|t| self.intern(&t.text)).unwrap_or_else(|| self.intern(""));
        let params = self.parse_params();
        let ret_type = if self.at(TokenKind::Arrow) {
            self.bump();
            self.expect(TokenKind::Identifier, "a return type").map(|t| self.intern(&t.text))
        } else {
            None
        };
        let stmts = self.parse_stmts_until(&[TokenKind::End]);
        let body_span = self.block_span(fn_tok.span, &stmts);
        let body = self.alloc(NodeKind::Block { stmts }, body_span);
        let end_tok = self.expect(TokenKind::End, "`.end`");
        let span = self.join(fn_tok.span, end_tok.map(|t| t.span).unwrap_or(body_span));
        self.alloc(NodeKind::Fn { name, params, ret_type, body }, span)
    }

    fn parse_params(&mut self) -> Vec<NodeId> {
        self.expect(TokenKind::LParen, "`(`");
        let mut params = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                let name_tok = self.expect(TokenKind::Identifier, "a parameter name");
                let ty = if self.at(TokenKind::Colon) {
                    self.bump();
                    self.expect(TokenKind::Identifier, "a parameter type").map(|t| self.intern(&t.text))
                } else {
                    None
                };
                let (name, span) = match name_tok {
                    Some(t) => (self.intern(&t.text), t.span),
                    None => (self.intern(""), self.peek().span),
                };
                params.push(self.alloc(NodeKind::Param { name, ty }, span));
                if self.at(TokenKind::Comma) {
                    self.bump();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)`");
        params
    }

    pub(crate) fn parse_entry(&mut self, kind: EntryKind) -> NodeId {
        let kw_tok = self.bump();
        let name = if self.at(TokenKind::Identifier) {
            let t = self.bump();
            Some(self.intern(&t.text))
        } else {
            None
        };
        let stmts = self.parse_stmts_until(&[TokenKind::End]);
        let body_span = self.block_span(kw_tok.span, &stmts);
        let body = self.alloc(NodeKind::Block { stmts }, body_span);
        let end_tok = self.expect(TokenKind::End, "`.end`");
        let span = self.join(kw_tok.span, end_tok.map(|t| t.span).unwrap_or(body_span));
        self.alloc(NodeKind::Entry { kind, name, body }, span)
    }

    /// Statement grammar shared by both surfaces: the phrase forms (`set`,
    /// `say`, `do`, `ret`, `when`, `loop`) desugar into the same AST a core
    /// `fn`/entry body would produce, so any block accepts either style —
    /// a `fn` declared with core syntax can still contain `set`/`when`, and
    /// a phrase `prog` can still contain `let`/`if`.
    pub(crate) fn parse_core_statement(&mut self) -> NodeId {
        match self.peek_kind() {
            TokenKind::Let => self.parse_let(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Match => self.parse_match(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Set => self.parse_set(),
            TokenKind::Say => self.parse_say(),
            TokenKind::Do => self.parse_do(),
            TokenKind::Ret => self.parse_ret(),
            TokenKind::When => self.parse_when(),
            TokenKind::Loop => self.parse_loop(),
            _ => {
                let expr = self.parse_expr();
                let span = self.span_of(expr);
                self.alloc(NodeKind::ExprStatement { expr }, span)
            }
        }
    }

    fn parse_set(&mut self) -> NodeId {
        let set_tok = self.bump();
        let name_tok = self.expect(TokenKind::Identifier, "a binding name");
        self.expect(TokenKind::Assign, "`=`");
        let value = self.parse_expr();
        let name = name_tok.map(|t| self.intern(&t.text)).unwrap_or_else(|| self.intern(""));
        let span = self.join(set_tok.span, self.span_of(value));
        self.alloc(NodeKind::Set { name, value }, span)
    }

    fn parse_say(&mut self) -> NodeId {
        let say_tok = self.bump();
        let value = self.parse_expr();
        let span = self.join(say_tok.span, self.span_of(value));
        self.alloc(NodeKind::Say { value }, span)
    }

    fn parse_do(&mut self) -> NodeId {
        let do_tok = self.bump();
        let name_tok = self.expect(TokenKind::Identifier, "a callee name");
        let (name, span) = match name_tok {
            Some(t) => (self.intern(&t.text), self.join(do_tok.span, t.span)),
            None => (self.intern(""), do_tok.span),
        };
        self.alloc(NodeKind::DoCall { name }, span)
    }

    fn parse_ret(&mut self) -> NodeId {
        let ret_tok = self.bump();
        let has_value = !matches!(
            self.peek_kind(),
            TokenKind::Semicolon
                | TokenKind::End
                | TokenKind::Eof
                | TokenKind::When
                | TokenKind::Else
        );
        let value = if has_value { Some(self.parse_expr()) } else { None };
        let span = match value {
            Some(v) => self.join(ret_tok.span, self.span_of(v)),
            None => ret_tok.span,
        };
        self.alloc(NodeKind::Ret { value }, span)
    }

    /// `when cond stmts [when cond stmts]* [else stmts] .end`. The opening
    /// `when` is always the first arm's condition; later arms are
    /// introduced by a fresh `when` (another condition) or `else` (the
    /// default, `cond: None, is_else: true`).
    fn parse_when(&mut self) -> NodeId {
        let when_tok = self.bump();
        let first = self.parse_when_cond_arm(when_tok.span);
        let mut last_span = self.span_of(first);
        let mut arms = vec![first];
        loop {
            if self.at(TokenKind::When) {
                let tok = self.bump();
                let arm = self.parse_when_cond_arm(tok.span);
                last_span = self.span_of(arm);
                arms.push(arm);
            } else if self.at(TokenKind::Else) {
                let tok = self.bump();
                let arm = self.parse_when_else_arm(tok.span);
                last_span = self.span_of(arm);
                arms.push(arm);
            } else {
                break;
            }
        }
        let end_tok = self.expect(TokenKind::End, "`.end`");
        let span = self.join(when_tok.span, end_tok.map(|t| t.span).unwrap_or(last_span));
        self.alloc(NodeKind::When { arms }, span)
    }

    fn parse_when_cond_arm(&mut self, start: Span) -> NodeId {
        let cond = self.parse_expr();
        let stmts = self.parse_stmts_until(&[TokenKind::When, TokenKind::Else, TokenKind::End]);
        let body_span = self.block_span(self.span_of(cond), &stmts);
        let body = self.alloc(NodeKind::Block { stmts }, body_span);
        let span = self.join(start, body_span);
        self.alloc(NodeKind::WhenArm { cond: Some(cond), is_else: false, body }, span)
    }

    fn parse_when_else_arm(&mut self, start: Span) -> NodeId {
        let stmts = self.parse_stmts_until(&[TokenKind::When, TokenKind::Else, TokenKind::End]);
        let body_span = self.block_span(start, &stmts);
        let body = self.alloc(NodeKind::Block { stmts }, body_span);
        self.alloc(NodeKind::WhenArm { cond: None, is_else: true, body }, body_span)
    }

    fn parse_loop(&mut self) -> NodeId {
        let loop_tok = self.bump();
        let var_tok = self.expect(TokenKind::Identifier, "a loop variable");
        self.expect(TokenKind::From, "`from`");
        let from = self.parse_expr();
        self.expect(TokenKind::To, "`to`");
        let to = self.parse_expr();
        let step = if self.at(TokenKind::Step) {
            self.bump();
            Some(self.parse_expr())
        } else {
            None
        };
        let stmts = self.parse_stmts_until(&[TokenKind::End]);
        let body_span = self.block_span(self.span_of(to), &stmts);
        let body = self.alloc(NodeKind::Block { stmts }, body_span);
        let end_tok = self.expect(TokenKind::End, "`.end`");
        let var = var_tok.map(|t| self.intern(&t.text)).unwrap_or_else(|| self.intern(""));
        let span = self.join(loop_tok.span, end_tok.map(|t| t.span).unwrap_or(body_span));
        self.alloc(NodeKind::PhraseLoop { var, from, to, step, body }, span)
    }

    fn parse_let(&mut self) -> NodeId {
        let let_tok = self.bump();
        let name_tok = self.expect(TokenKind::Identifier, "a binding name");
        self.expect(TokenKind::Assign, "`=`");
        let init = self.parse_expr();
        let name = name_tok.map(|t| self.intern(&t.text)).unwrap_or_else(|| self.intern(""));
        let span = self.join(let_tok.span, self.span_of(init));
        self.alloc(NodeKind::Let { name, init }, span)
    }

    fn parse_if(&mut self) -> NodeId {
        let start = self.bump().span;
        self.parse_if_tail(start)
    }

    fn parse_elif_tail(&mut self) -> NodeId {
        let start = self.bump().span;
        self.parse_if_tail(start)
    }

    /// Shared by `if` and `elif`: parses `cond`, the branch body up to the
    /// next `elif`/`else`/`.end`, then recurses for `elif` (so only the
    /// innermost tail ever consumes the chain's single closing `.end`).
    fn parse_if_tail(&mut self, start_span: Span) -> NodeId {
        let cond = self.parse_expr();
        let then_stmts = self.parse_stmts_until(&[TokenKind::Elif, TokenKind::Else, TokenKind::End]);
        let then_span = self.block_span(self.span_of(cond), &then_stmts);
        let then_branch = self.alloc(NodeKind::Block { stmts: then_stmts }, then_span);

        let (else_branch, end_span) = if self.at(TokenKind::Elif) {
            let nested = self.parse_elif_tail();
            let sp = self.span_of(nested);
            (Some(nested), sp)
        } else if self.at(TokenKind::Else) {
            let else_tok = self.bump();
            let stmts = self.parse_stmts_until(&[TokenKind::End]);
            let block_span = self.block_span(else_tok.span, &stmts);
            let block = self.alloc(NodeKind::Block { stmts }, block_span);
            let end_tok = self.expect(TokenKind::End, "`.end`");
            (Some(block), end_tok.map(|t| t.span).unwrap_or(block_span))
        } else {
            let end_tok = self.expect(TokenKind::End, "`.end`");
            (None, end_tok.map(|t| t.span).unwrap_or(then_span))
        };

        let span = self.join(start_span, end_span);
        self.alloc(NodeKind::If { cond, then_branch, else_branch }, span)
    }

    fn parse_while(&mut self) -> NodeId {
        let while_tok = self.bump();
        let cond = self.parse_expr();
        let stmts = self.parse_stmts_until(&[TokenKind::End]);
        let body_span = self.block_span(self.span_of(cond), &stmts);
        let body = self.alloc(NodeKind::Block { stmts }, body_span);
        let end_tok = self.expect(TokenKind::End, "`.end`");
        let span = self.join(while_tok.span, end_tok.map(|t| t.span).unwrap_or(body_span));
        self.alloc(NodeKind::While { cond, body }, span)
    }

    fn parse_for(&mut self) -> NodeId {
        let for_tok = self.bump();
        let var_tok = self.expect(TokenKind::Identifier, "a loop variable");
        self.expect(TokenKind::In, "`in`");
        let iter = self.parse_expr();
        let stmts = self.parse_stmts_until(&[TokenKind::End]);
        let body_span = self.block_span(self.span_of(iter), &stmts);
        let body = self.alloc(NodeKind::Block { stmts }, body_span);
        let end_tok = self.expect(TokenKind::End, "`.end`");
        let var = var_tok.map(|t| self.intern(&t.text)).unwrap_or_else(|| self.intern(""));
        let span = self.join(for_tok.span, end_tok.map(|t| t.span).unwrap_or(body_span));
        self.alloc(NodeKind::For { var, iter, body }, span)
    }

    fn parse_match(&mut self) -> NodeId {
        let match_tok = self.bump();
        let scrutinee = self.parse_expr();
        let mut arms = Vec::new();
        self.skip_separators();
        while !self.at_eof() && !self.at(TokenKind::End) {
            let pos_before = self.pos;
            let pattern = self.parse_expr();
            self.expect(TokenKind::FatArrow, "`=>`");
            let body = self.parse_core_statement();
            let span = self.join(self.span_of(pattern), self.span_of(body));
            arms.push(self.alloc(NodeKind::MatchArm { pattern, body }, span));
            self.ensure_progress(pos_before);
            self.skip_separators();
        }
        let end_tok = self.expect(TokenKind::End, "`.end`");
        let span = self.join(match_tok.span, end_tok.map(|t| t.span).unwrap_or(self.span_of(scrutinee)));
        self.alloc(NodeKind::Match { scrutinee, arms }, span)
    }

    fn parse_return(&mut self) -> NodeId {
        let ret_tok = self.bump();
        let has_value = !matches!(
            self.peek_kind(),
            TokenKind::Semicolon
                | TokenKind::End
                | TokenKind::Eof
                | TokenKind::Elif
                | TokenKind::Else
                | TokenKind::When
        );
        let value = if has_value { Some(self.parse_expr()) } else { None };
        let span = match value {
            Some(v) => self.join(ret_tok.span, self.span_of(v)),
            None => ret_tok.span,
        };
        self.alloc(NodeKind::Return { value }, span)
    }

    /// Parses statements until a token in `stops` (or EOF) is reached,
    /// without consuming the stopping token.
    pub(crate) fn parse_stmts_until(&mut self, stops: &[TokenKind]) -> Vec<NodeId> {
        let mut stmts = Vec::new();
        self.skip_separators();
        while !self.at_eof() && !stops.contains(&self.peek_kind()) {
            let pos_before = self.pos;
            stmts.push(self.parse_core_statement());
            self.ensure_progress(pos_before);
            self.skip_separators();
        }
        stmts
    }

    pub(crate) fn block_span(&self, start: Span, stmts: &[NodeId]) -> Span {
        match stmts.last() {
            Some(last) => self.join(start, self.span_of(*last)),
            None => start,
        }
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

    fn parse(src: &str) -> (vitte_ast::Ast, NodeId, DiagnosticBag) {
        let tokens = Lexer::tokenize(src, FileId(1));
        let mut interner = Interner::new();
        let mut diags = DiagnosticBag::new();
        let (ast, root) = {
            let p = Parser::new(tokens, &mut interner, &mut diags, ParseBudget::unlimited());
            p.parse_core()
        };
        (ast, root, diags)
    }

    use vitte_ast::NodeId;

    #[test]
    fn minimal_program_matches_scenario_one() {
        let src = "module demo\nfn main() -> i32\n  return 0\n.end\n";
        let (ast, root, diags) = parse(src);
        assert!(diags.is_empty());
        match ast.kind(root) {
            NodeKind::Module { items, .. } => {
                assert_eq!(items.len(), 1);
                match ast.kind(items[0]) {
                    NodeKind::Fn { body, .. } => match ast.kind(*body) {
                        NodeKind::Block { stmts } => {
                            assert_eq!(stmts.len(), 1);
                            assert!(matches!(ast.kind(stmts[0]), NodeKind::Return { value: Some(_) }));
                        }
                        other => panic!("expected Block, got {other:?}"),
                    },
                    other => panic!("expected Fn, got {other:?}"),
                }
            }
            other => panic!("expected Module, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_fn_names_both_parse_without_a_parse_error() {
        let src = "module demo\nfn f() -> i32 return 0 .end\nfn f() -> i32 return 1 .end\n";
        let (ast, root, diags) = parse(src);
        assert!(diags.is_empty());
        match ast.kind(root) {
            NodeKind::Module { items, .. } => assert_eq!(items.len(), 2),
            other => panic!("expected Module, got {other:?}"),
        }
    }

    #[test]
    fn if_elif_else_chain_shares_one_terminator() {
        let src = "module demo\nfn h() -> i32\n  if 1 == 1\n    return 1\n  elif 2 == 2\n    return 2\n  else\n    return 3\n  .end\n.end\n";
        let (_ast, _root, diags) = parse(src);
        assert!(diags.is_empty());
    }

    #[test]
    fn phrase_statements_parse_inside_a_core_fn_body() {
        let src = "module demo\nfn h()\n  set x = 1\n  when x == 1\n    set x = 2\n  .end\n  say x\n  ret x\n.end\n";
        let (ast, root, diags) = parse(src);
        assert!(diags.is_empty());
        match ast.kind(root) {
            NodeKind::Module { items, .. } => match ast.kind(items[0]) {
                NodeKind::Fn { body, .. } => match ast.kind(*body) {
                    NodeKind::Block { stmts } => {
                        assert_eq!(stmts.len(), 4);
                        assert!(matches!(ast.kind(stmts[0]), NodeKind::Set { .. }));
                        assert!(matches!(ast.kind(stmts[1]), NodeKind::When { .. }));
                        assert!(matches!(ast.kind(stmts[2]), NodeKind::Say { .. }));
                        assert!(matches!(ast.kind(stmts[3]), NodeKind::Ret { .. }));
                    }
                    other => panic!("expected Block, got {other:?}"),
                },
                other => panic!("expected Fn, got {other:?}"),
            },
            other => panic!("expected Module, got {other:?}"),
        }
    }

    #[test]
    fn top_item_budget_drains_without_producing_more_items() {
        let src = "module demo\nuse a\nuse b\nuse c\n";
        let tokens = Lexer::tokenize(src, FileId(1));
        let mut interner = Interner::new();
        let mut diags = DiagnosticBag::new();
        let p = Parser::new(tokens, &mut interner, &mut diags, ParseBudget::capped(1));
        let (ast, root) = p.parse_core();
        match ast.kind(root) {
            NodeKind::Module { items, .. } => assert_eq!(items.len(), 1),
            other => panic!("expected Module, got {other:?}"),
        }
    }

    /// Every node's span must cover the union of its children's spans, per
    /// `Ast::children`. Walks the whole arena rather than just the root, so
    /// a single misjoined `span` anywhere in the tree fails the check.
    fn assert_span_covers_children(ast: &vitte_ast::Ast, id: NodeId) {
        let span = ast.span(id);
        for child in ast.children(id) {
            let child_span = ast.span(child);
            assert!(span.lo <= child_span.lo, "{id:?} span {span:?} does not start before child {child:?} span {child_span:?}");
            assert!(span.hi >= child_span.hi, "{id:?} span {span:?} does not end after child {child:?} span {child_span:?}");
            assert_span_covers_children(ast, child);
        }
    }

    proptest::proptest! {
        /// A `fn` body built from a random sequence of `set`/`say`/`ret`
        /// statements over small integer literals always parses clean, and
        /// every node in the resulting tree covers its children's spans.
        #[test]
        fn span_coverage_holds_across_a_generated_program(
            stmt_kinds in proptest::collection::vec(0u8..3, 1..12),
            values in proptest::collection::vec(0u32..1000, 1..12),
        ) {
            let mut body = String::from("module demo\nfn f()\n");
            for (kind, value) in stmt_kinds.iter().zip(values.iter().cycle()) {
                match kind {
                    0 => body.push_str(&format!("  set x = {value}\n")),
                    1 => body.push_str(&format!("  say {value}\n")),
                    _ => body.push_str(&format!("  ret {value}\n")),
                }
            }
            body.push_str(".end\n");

            let (ast, root, diags) = parse(&body);
            proptest::prop_assert!(diags.is_empty(), "unexpected diagnostics for {:?}: {:?}", body, diags.iter().map(|d| d.message.clone()).collect::<Vec<_>>());
            assert_span_covers_children(&ast, root);
        }
    }
}
