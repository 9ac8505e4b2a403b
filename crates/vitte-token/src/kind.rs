/// Token classification for the Vitte core and phrase surfaces.
///
/// The set covers keywords from both surfaces, standard operators and
/// delimiters, literal kinds, and the handful of special/error tokens the
/// lexer can emit. Roughly 80 variants, matching the spec's budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // ===== Core surface keywords =====
    /// Top-level module declaration: `module demo`
    Module,
    /// Import: `use path::to::thing`
    Use,
    /// Re-export: `export name`
    Export,
    /// Function declaration: `fn name(params) -> type ... .end`
    Fn,
    /// Lexical binding: `let x = expr`
    Let,
    /// Conditional: `if cond`
    If,
    /// Else-if arm: `elif cond`
    Elif,
    /// Else arm: `else`
    Else,
    /// Pretest loop: `while cond`
    While,
    /// Iteration loop: `for x in expr`
    For,
    /// `in` clause of a `for` loop
    In,
    /// Pattern match: `match expr`
    Match,
    /// Function return: `return expr`
    Return,

    // ===== Entry-point item keywords =====
    /// Scenario item: `scn` / `scenario`
    Scn,
    /// Program entrypoint: `prog` / `program`
    Prog,
    /// Service entrypoint
    Service,
    /// Kernel entrypoint
    Kernel,
    /// Driver entrypoint
    DriverKw,
    /// Tool entrypoint
    Tool,
    /// Pipeline entrypoint
    Pipeline,

    // ===== Phrase surface keywords =====
    /// Phrase module declaration: `mod demo`
    Mod,
    /// Phrase assignment statement: `set x = expr`
    Set,
    /// Phrase print statement: `say expr`
    Say,
    /// Phrase call statement: `do name`
    Do,
    /// Phrase return statement: `ret expr`
    Ret,
    /// Phrase multi-arm conditional: `when cond ... .end`
    When,
    /// Phrase counted loop: `loop var from a to b [step c] ... .end`
    Loop,
    /// `from` clause of a phrase `loop`
    From,
    /// `to` clause of a phrase `loop`
    To,
    /// `step` clause of a phrase `loop`
    Step,
    /// Block terminator; set from either bare `end` or `.end` (see [`crate::TokenFlags::FROM_DOT_END`])
    End,

    // ===== Operators =====
    /// `=`
    Assign,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!`
    Bang,
    /// `->`
    Arrow,
    /// `=>`
    FatArrow,
    /// `.`
    Dot,
    /// `..`
    DotDot,
    /// `::`
    ColonColon,

    // ===== Delimiters =====
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `:`
    Colon,

    // ===== Literals =====
    /// Numeric literal: `42`, `3.14`, `0xFF`, `1_000`
    Number,
    /// Float-flavored numeric literal (has `.` or exponent)
    Float,
    /// Double-quoted string literal
    String,
    /// Single-quoted char literal
    Char,
    /// Bareword identifier, or keyword-shaped text that didn't match the keyword table
    Identifier,

    // ===== Special =====
    /// End of input
    Eof,
    /// Unrecognized byte; lexer advances one byte and continues
    Error,
    /// Unterminated string or char literal
    UnterminatedLiteral,
}

impl TokenKind {
    /// Looks up `text` against the fixed keyword table; returns `None` for
    /// anything that isn't a reserved word (the caller should then classify
    /// it as `Identifier`).
    pub fn keyword(text: &str) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match text {
            "module" => Module,
            "use" => Use,
            "export" => Export,
            "fn" => Fn,
            "let" => Let,
            "if" => If,
            "elif" => Elif,
            "else" => Else,
            "while" => While,
            "for" => For,
            "in" => In,
            "match" => Match,
            "return" => Return,
            "scn" | "scenario" => Scn,
            "prog" | "program" => Prog,
            "service" => Service,
            "kernel" => Kernel,
            "driver" => DriverKw,
            "tool" => Tool,
            "pipeline" => Pipeline,
            "mod" => Mod,
            "set" => Set,
            "say" => Say,
            "do" => Do,
            "ret" => Ret,
            "when" => When,
            "loop" => Loop,
            "from" => From,
            "to" => To,
            "step" => Step,
            "end" => End,
            _ => return None,
        })
    }
}
