//! Permissive parsing for `--target` (§6, §10.4): a dash-separated
//! `arch-vendor-os-abi` triple where any trailing segment may be absent.
//! Missing segments default to `"unknown"` rather than erroring, since the
//! flag is opaque to this front-end beyond being threaded through to a
//! downstream toolchain.

/// A target triple split into its four conventional segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTriple {
    pub arch: String,
    pub vendor: String,
    pub os: String,
    pub abi: String,
}

const UNKNOWN: &str = "unknown";

impl TargetTriple {
    /// Parses `s` permissively: 1 to 4 dash-separated segments, trailing
    /// segments defaulting to `"unknown"` when absent. An empty string still
    /// produces a fully-`"unknown"` triple rather than failing, since the
    /// caller only reaches this after `--target` was given a value at all.
    pub fn parse(s: &str) -> TargetTriple {
        let mut parts = s.split('-').filter(|p| !p.is_empty());
        TargetTriple {
            arch: parts.next().unwrap_or(UNKNOWN).to_string(),
            vendor: parts.next().unwrap_or(UNKNOWN).to_string(),
            os: parts.next().unwrap_or(UNKNOWN).to_string(),
            abi: parts.next().unwrap_or(UNKNOWN).to_string(),
        }
    }
}

impl std::fmt::Display for TargetTriple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}-{}", self.arch, self.vendor, self.os, self.abi)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::TargetTriple;

    #[test]
    fn full_triple_parses_segment_by_segment() {
        let t = TargetTriple::parse("x86_64-unknown-linux-gnu");
        assert_eq!(t.arch, "x86_64");
        assert_eq!(t.vendor, "unknown");
        assert_eq!(t.os, "linux");
        assert_eq!(t.abi, "gnu");
    }

    #[test]
    fn missing_trailing_segments_default_to_unknown() {
        let t = TargetTriple::parse("wasm32");
        assert_eq!(t.arch, "wasm32");
        assert_eq!(t.vendor, "unknown");
        assert_eq!(t.os, "unknown");
        assert_eq!(t.abi, "unknown");
    }

    #[test]
    fn three_segments_leaves_only_abi_unknown() {
        let t = TargetTriple::parse("arm-linux-gnueabihf");
        assert_eq!(t.abi, "unknown");
    }

    #[test]
    fn empty_input_is_fully_unknown() {
        let t = TargetTriple::parse("");
        assert_eq!(t, TargetTriple::parse("unknown-unknown-unknown-unknown"));
    }

    #[test]
    fn display_round_trips_a_full_triple() {
        let t = TargetTriple::parse("x86_64-pc-windows-msvc");
        assert_eq!(t.to_string(), "x86_64-pc-windows-msvc");
    }
}
