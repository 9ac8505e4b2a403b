//! Token definitions shared by the Vitte lexer and parser.

mod flags;
mod kind;

pub use flags::TokenFlags;
pub use kind::TokenKind;
use vitte_span::Span;

/// A single lexical token: its kind, source span, and any payload the
/// lexer already computed (interned text, numeric value, semantic flags).
///
/// `text` is left as a plain owned string rather than an interned handle
/// so this crate has no dependency on the interner; the parser re-interns
/// identifier/literal text into the session's `vitte_arena::Interner` when
/// it builds AST nodes (§3 "name capture").
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
    pub int_val: Option<i64>,
    pub flags: TokenFlags,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Token { kind, span, text: text.into(), int_val: None, flags: TokenFlags::empty() }
    }

    pub fn with_int_val(mut self, value: i64) -> Self {
        self.int_val = Some(value);
        self
    }

    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags = flags;
        self
    }

    /// True for the synthetic `END` token produced by lexing `.end`, as
    /// opposed to a bare `end` identifier (§9 Design Notes, `FROM_DOT_END`).
    pub fn is_dot_end(&self) -> bool {
        self.kind == TokenKind::End && self.flags.contains(TokenFlags::FROM_DOT_END)
    }
}
