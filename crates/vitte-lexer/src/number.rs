use crate::Lexer;
use vitte_token::{Token, TokenKind};

/// Lexes a numeric literal starting at the digit the caller already peeked.
///
/// Handles `0x`/`0b`/`0o` radix prefixes, underscore digit separators
/// (accepted only strictly between two digits — a leading, trailing, or
/// doubled underscore is a lex error), and float promotion via a `.`
/// followed by digits and/or an `[eE][+-]?digits` exponent.
pub(crate) fn lex_number(lexer: &mut Lexer<'_>, start_pos: usize, line: u32, col: u32) -> Token {
    let mut malformed = false;

    if lexer.peek() == Some(b'0') {
        let radix_digits: fn(u8) -> bool = match lexer.peek_at(1) {
            Some(b'x') | Some(b'X') => is_hex_digit,
            Some(b'b') | Some(b'B') => is_bin_digit,
            Some(b'o') | Some(b'O') => is_oct_digit,
            _ => {
                return lex_decimal(lexer, start_pos, line, col);
            }
        };
        lexer.bump(); // '0'
        lexer.bump(); // radix letter
        if !scan_digit_run(lexer, radix_digits) {
            malformed = true;
        }
        let text = lexer.slice(start_pos);
        let kind = if malformed { TokenKind::Error } else { TokenKind::Number };
        let int_val = if malformed { None } else { parse_radix_int(text) };
        let mut tok = lexer.make(kind, start_pos, line, col, text);
        if let Some(v) = int_val {
            tok = tok.with_int_val(v);
        }
        return tok;
    }

    lex_decimal(lexer, start_pos, line, col)
}

fn lex_decimal(lexer: &mut Lexer<'_>, start_pos: usize, line: u32, col: u32) -> Token {
    let mut malformed = !scan_digit_run(lexer, |b: u8| b.is_ascii_digit());
    let mut is_float = false;

    if lexer.peek() == Some(b'.') && lexer.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
        is_float = true;
        lexer.bump(); // '.'
        if !scan_digit_run(lexer, |b: u8| b.is_ascii_digit()) {
            malformed = true;
        }
    }

    if matches!(lexer.peek(), Some(b'e') | Some(b'E')) {
        let (save_pos, save_line, save_col) = (lexer.pos, lexer.line, lexer.col);
        lexer.bump();
        if matches!(lexer.peek(), Some(b'+') | Some(b'-')) {
            lexer.bump();
        }
        if lexer.peek().is_some_and(|b| b.is_ascii_digit()) {
            is_float = true;
            if !scan_digit_run(lexer, |b: u8| b.is_ascii_digit()) {
                malformed = true;
            }
        } else {
            // Not actually an exponent; rewind to just after the mantissa.
            lexer.pos = save_pos;
            lexer.line = save_line;
            lexer.col = save_col;
        }
    }

    let text = lexer.slice(start_pos);
    if malformed {
        return lexer.make(TokenKind::Error, start_pos, line, col, text);
    }
    if is_float {
        return lexer.make(TokenKind::Float, start_pos, line, col, text);
    }
    let mut tok = lexer.make(TokenKind::Number, start_pos, line, col, text);
    if let Ok(v) = text.replace('_', "").parse::<i64>() {
        tok = tok.with_int_val(v);
    }
    tok
}

/// Scans a run of digits (matched by `is_digit`) with `_` separators
/// allowed only strictly between two digits. Returns `false` if the run is
/// malformed (empty, leading `_`, trailing `_`, or doubled `_`).
fn scan_digit_run(lexer: &mut Lexer<'_>, is_digit: fn(u8) -> bool) -> bool {
    let mut saw_digit = false;
    let mut last_was_underscore = false;
    let mut well_formed = true;

    loop {
        match lexer.peek() {
            Some(b) if is_digit(b) => {
                lexer.bump();
                saw_digit = true;
                last_was_underscore = false;
            }
            Some(b'_') => {
                if !saw_digit || last_was_underscore {
                    well_formed = false;
                }
                lexer.bump();
                last_was_underscore = true;
            }
            _ => break,
        }
    }

    if last_was_underscore {
        well_formed = false;
    }
    saw_digit && well_formed
}

fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

fn is_bin_digit(b: u8) -> bool {
    b == b'0' || b == b'1'
}

fn is_oct_digit(b: u8) -> bool {
    (b'0'..=b'7').contains(&b)
}

fn parse_radix_int(text: &str) -> Option<i64> {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let (radix, digits) = if let Some(rest) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        (16, rest)
    } else if let Some(rest) = cleaned.strip_prefix("0b").or_else(|| cleaned.strip_prefix("0B")) {
        (2, rest)
    } else if let Some(rest) = cleaned.strip_prefix("0o").or_else(|| cleaned.strip_prefix("0O")) {
        (8, rest)
    } else {
        return None;
    };
    i64::from_str_radix(digits, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitte_span::FileId;

    fn lex_one(src: &str) -> Token {
        Lexer::tokenize(src, FileId(1)).into_iter().next().unwrap()
    }

    #[test]
    fn plain_decimal() {
        let tok = lex_one("1234");
        assert_eq!(tok.kind, TokenKind::Number);
        assert_eq!(tok.int_val, Some(1234));
    }

    #[test]
    fn underscore_between_digits_is_accepted() {
        let tok = lex_one("1_000_000");
        assert_eq!(tok.kind, TokenKind::Number);
        assert_eq!(tok.int_val, Some(1_000_000));
    }

    #[test]
    fn leading_underscore_is_an_error() {
        let toks = Lexer::tokenize("_1", FileId(1));
        // `_1` lexes as an identifier (leading underscore is ident-start), not a malformed number.
        assert_eq!(toks[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn trailing_underscore_is_malformed() {
        let tok = lex_one("1_");
        assert_eq!(tok.kind, TokenKind::Error);
    }

    #[test]
    fn doubled_underscore_is_malformed() {
        let tok = lex_one("1__2");
        assert_eq!(tok.kind, TokenKind::Error);
    }

    #[test]
    fn float_with_fraction_and_exponent() {
        let tok = lex_one("3.14e-2");
        assert_eq!(tok.kind, TokenKind::Float);
    }

    #[test]
    fn hex_prefix() {
        let tok = lex_one("0xFF");
        assert_eq!(tok.kind, TokenKind::Number);
        assert_eq!(tok.int_val, Some(255));
    }

    #[test]
    fn range_dots_do_not_get_absorbed_as_a_decimal_point() {
        let toks = Lexer::tokenize("1..2", FileId(1));
        assert_eq!(toks[0].kind, TokenKind::Number);
        assert_eq!(toks[1].kind, TokenKind::DotDot);
        assert_eq!(toks[2].kind, TokenKind::Number);
    }
}
