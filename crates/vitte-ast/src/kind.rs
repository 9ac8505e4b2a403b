use crate::ops::{BinOp, EntryKind, UnOp};
use crate::NodeId;
use vitte_arena::InternedStr;

/// Per-variant node payload. Every recursive reference is a [`NodeId`] into
/// the owning [`crate::Ast`], never a `Box` — the spec's "arena + index
/// instead of raw pointers" guidance applied to a tagged union instead of
/// the source's generic `a`/`b`/`c` slots (§9 Design Notes: "a cleaner
/// implementation uses a discriminated union with shared header").
///
/// Roughly 30 variants cover both the core and phrase surfaces plus
/// error-recovery placeholders, well under the spec's ~100-variant budget
/// (that budget covers the source language's generic-slot encoding, which
/// this representation doesn't need).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    // ===== Top level =====
    /// `module demo` / phrase `mod demo`
    Module { name: InternedStr, items: Vec<NodeId> },
    /// `use path::to::thing`
    Use { path: InternedStr },
    /// `export name`
    Export { name: InternedStr },
    /// `fn name(params) -> ret body .end`
    Fn { name: InternedStr, params: Vec<NodeId>, ret_type: Option<InternedStr>, body: NodeId },
    /// One parameter in a `Fn`'s parameter list.
    Param { name: InternedStr, ty: Option<InternedStr> },
    /// An entrypoint item: `prog`/`service`/`kernel`/`driver`/`tool`/`pipeline`/`scn`.
    Entry { kind: EntryKind, name: Option<InternedStr>, body: NodeId },

    // ===== Statements =====
    /// `let x = expr`
    Let { name: InternedStr, init: NodeId },
    /// `if cond then_branch [elif/else]`
    If { cond: NodeId, then_branch: NodeId, else_branch: Option<NodeId> },
    /// `while cond body`
    While { cond: NodeId, body: NodeId },
    /// `for var in iter body`
    For { var: InternedStr, iter: NodeId, body: NodeId },
    /// `match scrutinee { arms }`
    Match { scrutinee: NodeId, arms: Vec<NodeId> },
    /// One arm of a `Match`.
    MatchArm { pattern: NodeId, body: NodeId },
    /// `return [expr]`
    Return { value: Option<NodeId> },
    /// A brace- or indentation-delimited sequence of statements.
    Block { stmts: Vec<NodeId> },
    /// An expression used in statement position.
    ExprStatement { expr: NodeId },

    // ===== Phrase surface statements =====
    /// `set name = expr`
    Set { name: InternedStr, value: NodeId },
    /// `say expr`
    Say { value: NodeId },
    /// `do name`
    DoCall { name: InternedStr },
    /// `ret [expr]`
    Ret { value: Option<NodeId> },
    /// `when cond ... [when cond ...] ... .end`
    When { arms: Vec<NodeId> },
    /// One arm of a `When`. `is_else` is a flag rather than a dedicated
    /// node kind, preserving the source's flag semantics (§9 Open Questions).
    WhenArm { cond: Option<NodeId>, is_else: bool, body: NodeId },
    /// `loop var from a to b [step c] body .end`
    PhraseLoop { var: InternedStr, from: NodeId, to: NodeId, step: Option<NodeId>, body: NodeId },

    // ===== Expressions =====
    Binary { op: BinOp, lhs: NodeId, rhs: NodeId },
    Unary { op: UnOp, operand: NodeId },
    Call { callee: NodeId, args: Vec<NodeId> },
    /// Dotted field access `a.b`; only `base` is a read per the linter's
    /// read-tracking rule ("dotted paths only read `a`").
    Field { base: NodeId, name: InternedStr },
    Index { base: NodeId, index: NodeId },
    Number { text: InternedStr, int_val: Option<i64>, float_val: Option<f64> },
    StringLit { text: InternedStr },
    Identifier { name: InternedStr },

    // ===== Error recovery =====
    /// A malformed construct the parser could not make sense of.
    Error { message: InternedStr },
    MissingExpr,
    MissingStatement,
    MissingIdentifier,
    MissingBlock,
}
