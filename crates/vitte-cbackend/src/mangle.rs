//! Deterministic C identifier mangling.
//!
//! Every mangled name starts with the fixed `vitte_` prefix, so the
//! first-character and keyword-collision guarantees below are dead code for
//! anything produced by [`mangle`] itself — they exist because [`sanitize_ident`]
//! is also used directly by the emitter's `ident` operation on names that
//! don't carry that prefix (e.g. emitted local variable names).

const MAX_IDENT_LEN: usize = 200;

/// C11 reserved words (plus the `_`-prefixed alternate spellings), checked
/// against the whole candidate identifier after prefixing.
const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic", "_Bool",
    "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert", "_Thread_local",
];

/// What kind of symbol a mangled name refers to; spelled out in the mangled
/// form as its short tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Fn,
    Global,
    Type,
    Event,
}

impl Kind {
    fn tag(self) -> &'static str {
        match self {
            Kind::Fn => "fn",
            Kind::Global => "g",
            Kind::Type => "ty",
            Kind::Event => "ev",
        }
    }
}

/// FNV-1a, 32-bit variant, used for both the optional signature suffix and
/// the overflow truncation suffix.
pub fn fnv1a32(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for &b in bytes {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Sanitizes one path/name segment byte-wise: `[A-Za-z0-9_]` passes through,
/// everything else becomes `_xHH` (two lowercase hex digits).
fn sanitize_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if b.is_ascii_alphanumeric() || b == b'_' {
            out.push(b as char);
        } else {
            out.push_str(&format!("_x{b:02x}"));
        }
    }
    out
}

/// Builds a valid, collision-guarded, length-capped C identifier from an
/// already-assembled candidate string. Shared by [`mangle`] and
/// [`sanitize_ident`].
fn harden(mut candidate: String) -> String {
    if !candidate.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        candidate.insert(0, '_');
    }
    if C_KEYWORDS.contains(&candidate.as_str()) {
        candidate.insert(0, '_');
    }
    if candidate.len() > MAX_IDENT_LEN {
        let hash = fnv1a32(candidate.as_bytes());
        let suffix = format!("__h{hash:08x}");
        let budget = MAX_IDENT_LEN - suffix.len();
        let mut cut = budget.min(candidate.len());
        while !candidate.is_char_boundary(cut) {
            cut -= 1;
        }
        candidate.truncate(cut);
        candidate.push_str(&suffix);
    }
    candidate
}

/// Sanitizes an arbitrary name into a valid, non-keyword, length-capped C
/// identifier without the `vitte_<kind>__` scaffolding `mangle` adds.
pub fn sanitize_ident(name: &str) -> String {
    harden(sanitize_segment(name))
}

/// Mangles `(module_path, kind, name, signature)` into a C identifier:
/// `vitte_<kind>__<module__segments>__<name>[__s<hex8>]`, sanitized
/// segment-by-segment and then hardened as a whole.
pub fn mangle(module_path: &[&str], kind: Kind, name: &str, signature: Option<&str>) -> String {
    let mut candidate = String::from("vitte_");
    candidate.push_str(kind.tag());
    for segment in module_path {
        candidate.push_str("__");
        candidate.push_str(&sanitize_segment(segment));
    }
    candidate.push_str("__");
    candidate.push_str(&sanitize_segment(name));
    if let Some(sig) = signature {
        candidate.push_str(&format!("__s{:08x}", fnv1a32(sig.as_bytes())));
    }
    harden(candidate)
}

/// A compiler-generated temporary name, `t_<hex8>`, keyed on a caller-owned
/// counter rather than content so two distinct temporaries never collide.
pub fn temp_name(index: u32) -> String {
    format!("t_{index:08x}")
}
