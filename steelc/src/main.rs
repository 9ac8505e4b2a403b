//! `steelc`: command-line front-end for the Vitte bootstrap compiler (§6).
//!
//! Exit codes: 0 success, 1 compile/IO failure, 2 invalid usage.

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().skip(1).collect();

    let expanded = match cli::expand_response_files(raw_args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("steelc: {e}");
            return ExitCode::from(2);
        }
    };

    let invocation = match cli::parse_args(&expanded) {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("steelc: {e}");
            return ExitCode::from(2);
        }
    };

    init_tracing(invocation.opts.verbosity);

    let text = match std::fs::read_to_string(&invocation.input) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("steelc: failed to read {}: {e}", invocation.input.display());
            return ExitCode::from(1);
        }
    };

    let mut session = vitte_driver::Session::new();
    let path_display = invocation.input.display().to_string();
    let file_id = session.add_file(path_display, text);

    let result = match vitte_driver::compile(&mut session, file_id, &invocation.opts) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("steelc: {e}");
            return ExitCode::from(1);
        }
    };

    if !result.diagnostics.is_empty() {
        eprint!("{}", result.diagnostics);
    }

    if let Some(c_source) = &result.emitted {
        if let Err(e) = write_output(invocation.opts.output.as_ref(), c_source) {
            eprintln!("steelc: failed to write output: {e}");
            return ExitCode::from(1);
        }
    }

    exit_code_from(result.exit_code)
}

fn write_output(path: Option<&PathBuf>, text: &str) -> std::io::Result<()> {
    match path {
        Some(p) => std::fs::write(p, text),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn exit_code_from(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// Verbosity is repeated `-v` (§6): 0 warnings only, 1 info, 2 debug, 3+ trace.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).try_init();
}
