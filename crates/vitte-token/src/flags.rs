/// Semantic bits attached to a token beyond its kind, span, and text.
///
/// A small hand-rolled bitset rather than a `bitflags!`-generated one:
/// there is exactly one flag bit in scope today (`FROM_DOT_END`), and the
/// type stays `Copy`/`PartialEq` without pulling in a macro crate for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenFlags(u32);

impl TokenFlags {
    /// Set on the synthetic `END` token produced when `.` is immediately
    /// followed by `end`, distinguishing the phrase block terminator from
    /// a hypothetical bare `end` identifier (§9 Design Notes).
    pub const FROM_DOT_END: TokenFlags = TokenFlags(1 << 0);

    pub const fn empty() -> Self {
        TokenFlags(0)
    }

    pub const fn contains(self, other: TokenFlags) -> bool {
        (self.0 & other.0) == other.0
    }

    pub const fn union(self, other: TokenFlags) -> Self {
        TokenFlags(self.0 | other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_contains_nothing() {
        assert!(!TokenFlags::empty().contains(TokenFlags::FROM_DOT_END));
    }

    #[test]
    fn union_contains_both() {
        let f = TokenFlags::empty().union(TokenFlags::FROM_DOT_END);
        assert!(f.contains(TokenFlags::FROM_DOT_END));
    }
}
