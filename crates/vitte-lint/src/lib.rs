//! Phrase-layer linter: walks a parsed [`Ast`] tracking nested scopes of
//! bindings and reports unused bindings (`V1001`), shadowing (`V1002`), and
//! unreachable code after a `ret`/`return` (`V1003`).
//!
//! Run after parsing, before the symbol pass (§4.9 step 3) — this only
//! needs the AST and the interner, not resolved symbol ids.

mod scope;

use vitte_arena::{InternedStr, Interner};
use vitte_ast::{Ast, NodeId, NodeKind};
use vitte_diagnostics::{Code, DiagnosticBag, LabelStyle, Severity};
use vitte_span::Span;

use scope::{BindingKind, ScopeStack};

const V1001_UNUSED_BINDING: Code = Code::new("V1001");
const V1002_SHADOWING: Code = Code::new("V1002");
const V1003_UNREACHABLE: Code = Code::new("V1003");

pub fn lint_module(ast: &Ast, interner: &Interner, diags: &mut DiagnosticBag, module: NodeId) {
    let mut linter = Linter { ast, interner, diags, scopes: ScopeStack::default() };
    linter.lint_module(module);
}

struct Linter<'a> {
    ast: &'a Ast,
    interner: &'a Interner,
    diags: &'a mut DiagnosticBag,
    scopes: ScopeStack,
}

impl<'a> Linter<'a> {
    fn lint_module(&mut self, module: NodeId) {
        let NodeKind::Module { items, .. } = self.ast.kind(module) else { return };
        for &item in items {
            match self.ast.kind(item) {
                NodeKind::Fn { params, body, .. } => self.lint_entry_like(params.clone(), *body),
                NodeKind::Entry { body, .. } => self.lint_entry_like(Vec::new(), *body),
                _ => {}
            }
        }
    }

    /// Shared by `fn` and entry-point items: a fresh scope populated with
    /// parameters (entries have none), then the body block walked in that
    /// same scope.
    fn lint_entry_like(&mut self, params: Vec<NodeId>, body: NodeId) {
        self.scopes.push();
        for param in params {
            if let NodeKind::Param { name, .. } = self.ast.kind(param) {
                self.scopes.define_current(*name, BindingKind::Param, self.ast.span(param));
            }
        }
        self.lint_stmt(body);
        self.pop_and_report_unused();
    }

    /// Statements/blocks/expressions are all walked through one dispatcher
    /// since the phrase and core statement forms interleave freely in one
    /// AST (see `vitte-parser`'s unified `parse_core_statement`).
    fn lint_stmt(&mut self, id: NodeId) {
        match self.ast.kind(id).clone() {
            NodeKind::Block { stmts } => self.lint_block(&stmts),
            NodeKind::ExprStatement { expr } => self.mark_reads(expr),
            NodeKind::Let { init, name } => {
                self.mark_reads(init);
                let span = self.ast.span(id);
                self.scopes.define_current(name, BindingKind::Local, span);
            }
            NodeKind::Set { name, value } => {
                self.mark_reads(value);
                self.lint_set(name, self.ast.span(id));
            }
            NodeKind::Say { value } => self.mark_reads(value),
            NodeKind::DoCall { name } => self.scopes.mark_read(name),
            NodeKind::Return { value } | NodeKind::Ret { value } => {
                if let Some(v) = value {
                    self.mark_reads(v);
                }
            }
            NodeKind::If { cond, then_branch, else_branch } => {
                self.mark_reads(cond);
                self.lint_stmt(then_branch);
                if let Some(e) = else_branch {
                    self.lint_stmt(e);
                }
            }
            NodeKind::While { cond, body } => {
                self.mark_reads(cond);
                self.lint_stmt(body);
            }
            NodeKind::For { var, iter, body } => {
                self.mark_reads(iter);
                self.scopes.push();
                self.scopes.define_current(var, BindingKind::LoopVar, self.ast.span(id));
                self.lint_stmt(body);
                self.pop_and_report_unused();
            }
            NodeKind::PhraseLoop { var, from, to, step, body } => {
                self.mark_reads(from);
                self.mark_reads(to);
                if let Some(s) = step {
                    self.mark_reads(s);
                }
                self.scopes.push();
                self.scopes.define_current(var, BindingKind::LoopVar, self.ast.span(id));
                self.lint_stmt(body);
                self.pop_and_report_unused();
            }
            NodeKind::Match { scrutinee, arms } => {
                self.mark_reads(scrutinee);
                for arm in arms {
                    if let NodeKind::MatchArm { pattern, body } = self.ast.kind(arm).clone() {
                        self.mark_reads(pattern);
                        self.lint_stmt(body);
                    }
                }
            }
            NodeKind::When { arms } => {
                for arm in arms {
                    let NodeKind::WhenArm { cond, body, .. } = self.ast.kind(arm).clone() else { continue };
                    if let Some(c) = cond {
                        self.mark_reads(c);
                    }
                    self.scopes.push();
                    self.lint_stmt(body);
                    self.pop_and_report_unused();
                }
            }
            _ => {}
        }
    }

    /// Walks a statement sequence, recursing into each, and reports V1003
    /// for anything following the block's first `return`/`ret`.
    fn lint_block(&mut self, stmts: &[NodeId]) {
        let mut terminator: Option<Span> = None;
        for &stmt in stmts {
            if let Some(term_span) = terminator {
                let handle = self.diags.push(
                    Severity::Warning,
                    V1003_UNREACHABLE,
                    self.ast.span(stmt),
                    "unreachable statement after return",
                );
                self.diags.add_label(handle, LabelStyle::Secondary, term_span, Some("return happens here".into()));
            }
            self.lint_stmt(stmt);
            if terminator.is_none() && matches!(self.ast.kind(stmt), NodeKind::Return { .. } | NodeKind::Ret { .. }) {
                terminator = Some(self.ast.span(stmt));
            }
        }
    }

    fn lint_set(&mut self, name: InternedStr, set_span: Span) {
        match self.scopes.find(name) {
            Some(idx) if idx == self.scopes.current_index() => {
                // Reassignment of an existing binding in the current scope: not a new binding.
            }
            Some(idx) => {
                let outer_span = self.scopes.binding_at(idx, name).decl_span;
                let handle = self.diags.push(
                    Severity::Warning,
                    V1002_SHADOWING,
                    set_span,
                    format!("`{}` shadows a binding from an outer scope", self.interner.resolve(name)),
                );
                self.diags.add_label(handle, LabelStyle::Secondary, outer_span, Some("outer binding declared here".into()));
                self.scopes.define_current(name, BindingKind::Local, set_span);
            }
            None => self.scopes.define_current(name, BindingKind::Local, set_span),
        }
    }

    /// Pops the innermost scope and reports `V1001` for every binding that
    /// was never read and whose name doesn't start with `_`.
    fn pop_and_report_unused(&mut self) {
        let popped = self.scopes.pop();
        let mut entries: Vec<_> = popped.into_iter().collect();
        entries.sort_by_key(|(_, binding)| (binding.decl_span.lo, binding.decl_span.hi));
        for (name, binding) in entries {
            if binding.read {
                continue;
            }
            let text = self.interner.resolve(name);
            if text.starts_with('_') {
                continue;
            }
            let kind_word = match binding.kind {
                BindingKind::Param => "parameter",
                BindingKind::Local => "binding",
                BindingKind::LoopVar => "loop variable",
            };
            let handle = self.diags.push(
                Severity::Warning,
                V1001_UNUSED_BINDING,
                binding.decl_span,
                format!("unused {kind_word} `{text}`"),
            );
            self.diags.set_help(handle, "prefix the name with `_` to silence this warning");
        }
    }

    fn mark_reads(&mut self, id: NodeId) {
        match self.ast.kind(id).clone() {
            NodeKind::Identifier { name } => self.scopes.mark_read(name),
            NodeKind::Field { base, .. } => self.mark_reads(base),
            NodeKind::Binary { lhs, rhs, .. } => {
                self.mark_reads(lhs);
                self.mark_reads(rhs);
            }
            NodeKind::Unary { operand, .. } => self.mark_reads(operand),
            NodeKind::Call { callee, args } => {
                self.mark_reads(callee);
                for a in args {
                    self.mark_reads(a);
                }
            }
            NodeKind::Index { base, index } => {
                self.mark_reads(base);
                self.mark_reads(index);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vitte_arena::Interner;
    use vitte_diagnostics::DiagnosticBag;
    use vitte_lexer::Lexer;
    use vitte_parser::{ParseBudget, Parser};
    use vitte_span::FileId;

    use super::lint_module;

    fn lint(src: &str) -> DiagnosticBag {
        let tokens = Lexer::tokenize(src, FileId(1));
        let mut interner = Interner::new();
        let mut diags = DiagnosticBag::new();
        let (ast, root) = {
            let p = Parser::new(tokens, &mut interner, &mut diags, ParseBudget::unlimited());
            p.parse_phrase()
        };
        assert!(diags.is_empty(), "unexpected parse diagnostics: {:?}", diags.iter().map(|d| &d.message).collect::<Vec<_>>());
        lint_module(&ast, &interner, &mut diags, root);
        diags
    }

    fn codes(diags: &DiagnosticBag) -> Vec<&str> {
        diags.iter().map(|d| d.code.as_str()).collect()
    }

    #[test]
    fn unused_binding_is_reported() {
        let diags = lint("mod demo\nprog p\n  set x = 1\n  ret 0\n.end\n.end\n");
        assert_eq!(codes(&diags), vec!["V1001"]);
    }

    #[test]
    fn underscore_prefixed_binding_silences_unused() {
        let diags = lint("mod demo\nprog p\n  set _x = 1\n  ret 0\n.end\n.end\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn read_binding_is_not_flagged_unused() {
        let diags = lint("mod demo\nprog p\n  set x = 1\n  say x\n  ret x\n.end\n.end\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn reassignment_in_the_same_scope_is_not_shadowing() {
        let diags = lint("mod demo\nprog p\n  set x = 1\n  set x = 2\n  say x\n  ret x\n.end\n.end\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn shadowing_in_a_nested_loop_scope_is_reported() {
        let src = "mod demo\nprog p\n  set x = 1\n  loop i from 0 to 1\n    set x = i\n    say x\n  .end\n  say x\n  ret 0\n.end\n.end\n";
        let diags = lint(src);
        assert_eq!(codes(&diags), vec!["V1002"]);
    }

    #[test]
    fn unreachable_statement_after_return_is_reported() {
        let diags = lint("mod demo\nprog p\n  ret 0\n  say \"x\"\n.end\n.end\n");
        assert_eq!(codes(&diags), vec!["V1003"]);
        let diag = diags.iter().next().expect("one diagnostic");
        assert_eq!(diag.labels.len(), 2);
    }
}
