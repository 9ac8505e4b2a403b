use vitte_arena::Interner;
use vitte_ast::{Ast, NodeId, NodeKind};
use vitte_diagnostics::{Code, DiagnosticBag, Severity};
use vitte_span::Span;
use vitte_token::{Token, TokenKind};

use crate::budget::{BudgetTracker, ParseBudget};

/// Shared state for both the core and phrase parsers: a token cursor, the
/// arena being built, and handles to the session's interner and diagnostic
/// bag. `items.rs`/`phrase.rs`/`expr.rs` all extend this with `impl<'a>
/// Parser<'a>` blocks rather than splitting it into separate types, since
/// both surfaces parse into the same [`Ast`] and share the same expression
/// grammar.
pub struct Parser<'a> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    pub(crate) ast: Ast,
    pub(crate) interner: &'a mut Interner,
    pub(crate) diags: &'a mut DiagnosticBag,
    pub(crate) budget: ParseBudget,
    pub(crate) tracker: BudgetTracker,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: Vec<Token>,
        interner: &'a mut Interner,
        diags: &'a mut DiagnosticBag,
        budget: ParseBudget,
    ) -> Self {
        Parser { tokens, pos: 0, ast: Ast::new(), interner, diags, budget, tracker: BudgetTracker::new() }
    }

    pub fn budget_tracker(&self) -> &BudgetTracker {
        &self.tracker
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    pub(crate) fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Consumes a token of `kind` if present; otherwise emits an "unexpected
    /// token" diagnostic at the current position and returns `None`.
    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Option<Token> {
        if self.at(kind) {
            Some(self.bump())
        } else {
            let found = self.peek().clone();
            self.diags.push(
                Severity::Error,
                Code::new("E0101"),
                found.span,
                format!("expected {what}, found {:?}", found.kind),
            );
            None
        }
    }

    /// Consumes any number of newline-equivalent item separators. The
    /// lexer doesn't emit a literal newline token (line/col tracking does
    /// that work instead), so in this representation item separation is
    /// carried entirely by `;` — `skip_separators` exists so call sites
    /// read the same way the spec describes them ("separated by newlines
    /// and/or semicolons, both consumed transparently").
    pub(crate) fn skip_separators(&mut self) {
        while self.at(TokenKind::Semicolon) {
            self.bump();
        }
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.ast.alloc(kind, span)
    }

    /// Joins two spans per §4.4 "span joining": earliest lo, latest hi,
    /// pinned to the opener's file if the two spans disagree.
    pub(crate) fn join(&self, a: Span, b: Span) -> Span {
        a.join(b)
    }

    pub(crate) fn span_of(&self, id: NodeId) -> Span {
        self.ast.span(id)
    }

    pub(crate) fn intern(&mut self, text: &str) -> vitte_arena::InternedStr {
        self.interner.intern(text)
    }
}
