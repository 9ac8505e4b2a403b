use crate::{is_ident_continue, Lexer};
use vitte_token::{Token, TokenFlags, TokenKind};

impl<'a> Lexer<'a> {
    /// Consumes whitespace, `//` line comments, and non-nested `/* */` block
    /// comments silently.
    pub(crate) fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    self.bump();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.bump();
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.bump();
                    self.bump();
                    loop {
                        match self.peek() {
                            None => break,
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            _ => {
                                self.bump();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
    }

    pub(crate) fn lex_identifier(&mut self, start_pos: usize, line: u32, col: u32) -> Token {
        while let Some(b) = self.peek() {
            if is_ident_continue(b) {
                self.bump();
            } else {
                break;
            }
        }
        let text = self.slice(start_pos);
        let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Identifier);
        self.make(kind, start_pos, line, col, text)
    }

    pub(crate) fn lex_string(&mut self, start_pos: usize, line: u32, col: u32) -> Token {
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    let text = self.slice(start_pos);
                    return self.make(TokenKind::UnterminatedLiteral, start_pos, line, col, text);
                }
                Some(b'"') => {
                    self.bump();
                    break;
                }
                Some(b'\\') => {
                    self.bump();
                    match self.peek() {
                        Some(b'n') => {
                            value.push('\n');
                            self.bump();
                        }
                        Some(b'r') => {
                            value.push('\r');
                            self.bump();
                        }
                        Some(b't') => {
                            value.push('\t');
                            self.bump();
                        }
                        Some(b'\\') => {
                            value.push('\\');
                            self.bump();
                        }
                        Some(b'"') => {
                            value.push('"');
                            self.bump();
                        }
                        Some(b'\'') => {
                            value.push('\'');
                            self.bump();
                        }
                        Some(other) => {
                            value.push(other as char);
                            self.bump();
                        }
                        None => {
                            let text = self.slice(start_pos);
                            return self.make(TokenKind::UnterminatedLiteral, start_pos, line, col, text);
                        }
                    }
                }
                Some(b) => {
                    value.push(b as char);
                    self.bump();
                }
            }
        }
        self.make(TokenKind::String, start_pos, line, col, value)
    }

    pub(crate) fn lex_char(&mut self, start_pos: usize, line: u32, col: u32) -> Token {
        self.bump(); // opening quote
        let value = match self.peek() {
            Some(b'\\') => {
                self.bump();
                let escaped = match self.peek() {
                    Some(b'n') => '\n',
                    Some(b'r') => '\r',
                    Some(b't') => '\t',
                    Some(b'\\') => '\\',
                    Some(b'"') => '"',
                    Some(b'\'') => '\'',
                    Some(other) => other as char,
                    None => {
                        let text = self.slice(start_pos);
                        return self.make(TokenKind::UnterminatedLiteral, start_pos, line, col, text);
                    }
                };
                self.bump();
                escaped
            }
            Some(b) if b != b'\'' => {
                self.bump();
                b as char
            }
            _ => {
                let text = self.slice(start_pos);
                return self.make(TokenKind::UnterminatedLiteral, start_pos, line, col, text);
            }
        };
        if self.peek() != Some(b'\'') {
            let text = self.slice(start_pos);
            return self.make(TokenKind::UnterminatedLiteral, start_pos, line, col, text);
        }
        self.bump();
        self.make(TokenKind::Char, start_pos, line, col, value.to_string())
    }

    pub(crate) fn lex_punct(&mut self, start_pos: usize, line: u32, col: u32) -> Token {
        // Callers only reach `lex_punct` after `peek()` confirmed a byte is
        // here; the `0` fallback is unreachable in practice and falls
        // through to the catch-all `TokenKind::Error` arm below either way.
        let c = self.bump().unwrap_or(0);
        macro_rules! two_byte {
            ($second:literal, $kind:expr, $fallback:expr) => {
                if self.peek() == Some($second) {
                    self.bump();
                    $kind
                } else {
                    $fallback
                }
            };
        }
        let kind = match c {
            b'.' => {
                if self.looks_like_dot_end() {
                    self.bump(); // e
                    self.bump(); // n
                    self.bump(); // d
                    let text = self.slice(start_pos);
                    return self
                        .make(TokenKind::End, start_pos, line, col, text)
                        .with_flags(TokenFlags::FROM_DOT_END);
                }
                two_byte!(b'.', TokenKind::DotDot, TokenKind::Dot)
            }
            b'=' => {
                if self.peek() == Some(b'=') {
                    self.bump();
                    TokenKind::EqEq
                } else if self.peek() == Some(b'>') {
                    self.bump();
                    TokenKind::FatArrow
                } else {
                    TokenKind::Assign
                }
            }
            b'!' => two_byte!(b'=', TokenKind::NotEq, TokenKind::Bang),
            b'<' => two_byte!(b'=', TokenKind::LtEq, TokenKind::Lt),
            b'>' => two_byte!(b'=', TokenKind::GtEq, TokenKind::Gt),
            b'&' => two_byte!(b'&', TokenKind::AndAnd, TokenKind::Error),
            b'|' => two_byte!(b'|', TokenKind::OrOr, TokenKind::Error),
            b'-' => two_byte!(b'>', TokenKind::Arrow, TokenKind::Minus),
            b':' => two_byte!(b':', TokenKind::ColonColon, TokenKind::Colon),
            b'+' => TokenKind::Plus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b';' => TokenKind::Semicolon,
            b',' => TokenKind::Comma,
            _ => TokenKind::Error,
        };
        let text = self.slice(start_pos);
        self.make(kind, start_pos, line, col, text)
    }

    /// True when the lexer is positioned just past a `.` that is
    /// immediately followed by the bytes `end` with no trailing identifier
    /// character (so `.endpoint` is a field access on `endpoint`, not a
    /// block terminator).
    fn looks_like_dot_end(&self) -> bool {
        self.peek() == Some(b'e')
            && self.peek_at(1) == Some(b'n')
            && self.peek_at(2) == Some(b'd')
            && !self.peek_at(3).is_some_and(is_ident_continue)
    }
}
