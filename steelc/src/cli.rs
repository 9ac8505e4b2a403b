//! Argument parsing for `steelc [global-flags] [compile] <input>
//! [compile-flags]` (§6), including `@file` response-file expansion.

use std::path::PathBuf;

use thiserror::Error;
use vitte_driver::{CompileOptions, EmitTarget, TargetTriple};

const MAX_RESPONSE_FILE_DEPTH: u8 = 8;

#[derive(Debug, Error)]
pub enum UsageError {
    #[error("missing value for flag `{0}`")]
    MissingValue(String),
    #[error("unrecognized flag `{0}`")]
    UnrecognizedFlag(String),
    #[error("invalid value `{value}` for `{flag}`")]
    InvalidValue { flag: String, value: String },
    #[error("no input file given")]
    MissingInput,
    #[error("more than one input file given: `{0}` and `{1}`")]
    MultipleInputs(String, String),
    #[error("failed to read response file `{path}`: {source}")]
    ResponseFile { path: String, source: std::io::Error },
    #[error("response files nested more than {MAX_RESPONSE_FILE_DEPTH} levels deep")]
    ResponseFileTooDeep,
}

pub struct Invocation {
    pub input: PathBuf,
    pub opts: CompileOptions,
}

/// Expands every `@file` argument into that file's whitespace-separated
/// contents, recursively, before flag parsing ever sees them.
pub fn expand_response_files(args: Vec<String>) -> Result<Vec<String>, UsageError> {
    expand_at_depth(args, 0)
}

fn expand_at_depth(args: Vec<String>, depth: u8) -> Result<Vec<String>, UsageError> {
    if depth > MAX_RESPONSE_FILE_DEPTH {
        return Err(UsageError::ResponseFileTooDeep);
    }
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        match arg.strip_prefix('@') {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|source| UsageError::ResponseFile { path: path.to_string(), source })?;
                let inner: Vec<String> = contents.split_whitespace().map(str::to_string).collect();
                out.extend(expand_at_depth(inner, depth + 1)?);
            }
            None => out.push(arg),
        }
    }
    Ok(out)
}

/// Parses an already response-file-expanded argument list. The optional
/// bare `compile` keyword is accepted and discarded; the first remaining
/// positional argument is the input file.
pub fn parse_args(args: &[String]) -> Result<Invocation, UsageError> {
    let mut opts = CompileOptions::default();
    let mut input: Option<String> = None;
    let mut iter = args.iter().peekable();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "compile" if input.is_none() => {}
            "-o" => {
                let value = iter.next().ok_or_else(|| UsageError::MissingValue("-o".into()))?;
                opts.output = Some(PathBuf::from(value));
            }
            "--emit" => {
                let value = iter.next().ok_or_else(|| UsageError::MissingValue("--emit".into()))?;
                opts.emit = EmitTarget::parse(value)
                    .ok_or_else(|| UsageError::InvalidValue { flag: "--emit".into(), value: value.clone() })?;
            }
            "-g" | "--debug" => opts.debug = true,
            "--target" => {
                let value = iter.next().ok_or_else(|| UsageError::MissingValue("--target".into()))?;
                opts.target = Some(TargetTriple::parse(value));
            }
            "--toolchain" => {
                let value = iter.next().ok_or_else(|| UsageError::MissingValue("--toolchain".into()))?;
                opts.toolchain = Some(value.clone());
            }
            "--werror" => opts.werror = true,
            "--json" => opts.json = true,
            "-v" => opts.verbosity = opts.verbosity.saturating_add(1),
            other if other.starts_with("-O") && other.len() > 2 => {
                let level = parse_opt_level(other, &other[2..])?;
                opts.set_opt_level(level);
            }
            "-O" => {
                let value = iter.next().ok_or_else(|| UsageError::MissingValue("-O".into()))?;
                let level = parse_opt_level("-O", value)?;
                opts.set_opt_level(level);
            }
            other if other.starts_with('-') => return Err(UsageError::UnrecognizedFlag(other.to_string())),
            positional => match input {
                None => input = Some(positional.to_string()),
                Some(existing) => return Err(UsageError::MultipleInputs(existing, positional.to_string())),
            },
        }
    }

    let input = input.ok_or(UsageError::MissingInput)?;
    Ok(Invocation { input: PathBuf::from(input), opts })
}

fn parse_opt_level(flag: &str, value: &str) -> Result<u8, UsageError> {
    value.parse::<u8>().map_err(|_| UsageError::InvalidValue { flag: flag.to_string(), value: value.to_string() })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_input_is_the_only_required_argument() {
        let inv = parse_args(&args(&["main.vitte"])).expect("valid");
        assert_eq!(inv.input, PathBuf::from("main.vitte"));
        assert_eq!(inv.opts.emit, EmitTarget::C);
    }

    #[test]
    fn the_optional_compile_keyword_is_accepted() {
        let inv = parse_args(&args(&["compile", "main.vitte"])).expect("valid");
        assert_eq!(inv.input, PathBuf::from("main.vitte"));
    }

    #[test]
    fn missing_input_is_a_usage_error() {
        assert!(matches!(parse_args(&args(&["--werror"])), Err(UsageError::MissingInput)));
    }

    #[test]
    fn opt_level_accepts_attached_and_separate_forms() {
        let attached = parse_args(&args(&["-O2", "main.vitte"])).expect("valid");
        assert_eq!(attached.opts.opt_level, 2);
        let separate = parse_args(&args(&["-O", "3", "main.vitte"])).expect("valid");
        assert_eq!(separate.opts.opt_level, 3);
    }

    #[test]
    fn unrecognized_flag_is_rejected() {
        assert!(matches!(parse_args(&args(&["--bogus", "main.vitte"])), Err(UsageError::UnrecognizedFlag(_))));
    }

    #[test]
    fn emit_flag_rejects_unknown_spellings() {
        let result = parse_args(&args(&["--emit", "wasm", "main.vitte"]));
        assert!(matches!(result, Err(UsageError::InvalidValue { .. })));
    }

    #[test]
    fn two_positionals_is_an_error() {
        let result = parse_args(&args(&["a.vitte", "b.vitte"]));
        assert!(matches!(result, Err(UsageError::MultipleInputs(_, _))));
    }

    #[test]
    fn response_file_expands_whitespace_separated_arguments() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("steelc-test-response-{}.rsp", std::process::id()));
        std::fs::write(&path, "--werror --json main.vitte").expect("write temp response file");
        let at_arg = format!("@{}", path.display());
        let expanded = expand_response_files(vec![at_arg]).expect("expand");
        assert_eq!(expanded, vec!["--werror", "--json", "main.vitte"]);
        let _ = std::fs::remove_file(&path);
    }
}
