//! Byte-stream lexer for Vitte source text.
//!
//! A [`Lexer`] borrows an immutable byte slice and a `file_id` and emits
//! tokens on demand via [`Lexer::next_token`]. It never allocates a
//! diagnostic bag itself — invalid input becomes an `Error` or
//! `UnterminatedLiteral` token the parser can react to and report through
//! its own diagnostics, keeping the lexer a pure function of its input.

mod number;
mod scan;

use vitte_span::{FileId, Span};
use vitte_token::{Token, TokenFlags, TokenKind};

/// Byte-stream lexer. `line`/`col` are tracked incrementally by newline
/// scanning rather than via a precomputed index, matching §4.3.
pub struct Lexer<'a> {
    pub(crate) bytes: &'a [u8],
    pub(crate) file_id: FileId,
    pub(crate) pos: usize,
    pub(crate) line: u32,
    pub(crate) col: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file_id: FileId) -> Self {
        Lexer { bytes: source.as_bytes(), file_id, pos: 0, line: 1, col: 1 }
    }

    /// Lexes the entire input into a token vector, including a trailing `Eof`.
    pub fn tokenize(source: &'a str, file_id: FileId) -> Vec<Token> {
        let mut lexer = Lexer::new(source, file_id);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        tokens
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        let start_pos = self.pos;
        let start_line = self.line;
        let start_col = self.col;

        let Some(c) = self.peek() else {
            return self.make(TokenKind::Eof, start_pos, start_line, start_col, "");
        };

        if is_ident_start(c) {
            return self.lex_identifier(start_pos, start_line, start_col);
        }
        if c.is_ascii_digit() {
            return number::lex_number(self, start_pos, start_line, start_col);
        }
        match c {
            b'"' => self.lex_string(start_pos, start_line, start_col),
            b'\'' => self.lex_char(start_pos, start_line, start_col),
            _ => self.lex_punct(start_pos, start_line, start_col),
        }
    }

    pub(crate) fn make(&self, kind: TokenKind, start_pos: usize, line: u32, col: u32, text: impl Into<String>) -> Token {
        let span = Span { file_id: self.file_id, lo: start_pos as u32, hi: self.pos as u32, line, col };
        Token::new(kind, span, text)
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    pub(crate) fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    pub(crate) fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(b)
    }

    pub(crate) fn slice(&self, start: usize) -> &'a str {
        std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("")
    }
}

pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

pub(crate) fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::tokenize(src, FileId(1)).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(kinds("fn main"), vec![TokenKind::Fn, TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn dot_end_is_flagged_distinctly_from_bare_end() {
        let toks = Lexer::tokenize(".end end", FileId(1));
        assert_eq!(toks[0].kind, TokenKind::End);
        assert!(toks[0].flags.contains(TokenFlags::FROM_DOT_END));
        assert_eq!(toks[1].kind, TokenKind::End);
        assert!(!toks[1].flags.contains(TokenFlags::FROM_DOT_END));
    }

    #[test]
    fn line_comment_is_skipped() {
        assert_eq!(kinds("let x // comment\n= 1"), vec![TokenKind::Let, TokenKind::Identifier, TokenKind::Assign, TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn block_comment_is_skipped() {
        assert_eq!(kinds("1 /* skip\nme */ 2"), vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn line_and_column_advance_across_newlines() {
        let toks = Lexer::tokenize("a\nb", FileId(1));
        assert_eq!((toks[0].span.line, toks[0].span.col), (1, 1));
        assert_eq!((toks[1].span.line, toks[1].span.col), (2, 1));
    }

    #[test]
    fn invalid_byte_is_an_error_token_advancing_one_byte() {
        let toks = Lexer::tokenize("a`b", FileId(1));
        assert_eq!(toks[1].kind, TokenKind::Error);
        assert_eq!(toks[1].text, "`");
        assert_eq!(toks[2].kind, TokenKind::Identifier);
    }

    proptest::proptest! {
        /// Re-lexing the exact source slice a token's own span covers, in
        /// isolation, always yields that same token kind as its own first
        /// token — spans never claim bytes that would lex differently alone.
        #[test]
        fn token_lexemes_relex_to_the_same_kind(src in "[ -~\\n\\t\"']{0,80}") {
            let tokens = Lexer::tokenize(&src, FileId(1));
            for tok in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
                let lexeme = &src[tok.span.lo as usize..tok.span.hi as usize];
                let relexed = Lexer::tokenize(lexeme, FileId(1));
                let first = relexed.first().expect("at least an Eof token");
                proptest::prop_assert_eq!(first.kind, tok.kind, "lexeme {:?} relexed as {:?}, expected {:?}", lexeme, first.kind, tok.kind);
            }
        }
    }
}
