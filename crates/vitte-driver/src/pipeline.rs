//! Orchestrates one compile job end to end (§4.9): lex, parse, lint (phrase
//! surface only), resolve, gate on errors, then emit.

use vitte_ast::{Ast, NodeId};
use vitte_diagnostics::{render_human, render_json_array};
use vitte_lexer::Lexer;
use vitte_parser::{ParseBudget, Parser};
use vitte_span::FileId;

use crate::options::{CompileOptions, EmitTarget, Surface};
use crate::resolve::resolve_module;
use crate::session::Session;
use crate::{codegen, DriverError};

/// What a finished compile job produced for the caller.
pub struct CompileResult {
    /// `None` when compilation failed or the requested target is out of
    /// scope; `Some` holds the rendered C source on success.
    pub emitted: Option<String>,
    /// Rendered diagnostics, human or JSON per [`CompileOptions::json`].
    pub diagnostics: String,
    pub exit_code: i32,
}

/// Runs the full pipeline against a registered file and returns the result
/// plus the process exit code the spec assigns: 0 success, 1 compile/IO
/// failure, 2 invalid usage (checked by the caller before this is reached).
#[tracing::instrument(skip(session, opts), fields(file = file_id.0))]
pub fn compile(session: &mut Session, file_id: FileId, opts: &CompileOptions) -> Result<CompileResult, DriverError> {
    let path = session.sources.get(file_id).ok_or(DriverError::UnknownFile)?.path.clone();
    let text = session.sources.get(file_id).ok_or(DriverError::UnknownFile)?.text.clone();

    let tokens = {
        let _span = tracing::info_span!("lex", file = %path, bytes = text.len()).entered();
        Lexer::tokenize(&text, file_id)
    };

    let (ast, root) = {
        let _span = tracing::info_span!("parse", file = %path, tokens = tokens.len(), surface = ?opts.surface).entered();
        let parser = Parser::new(tokens, &mut session.interner, &mut session.diags, ParseBudget::unlimited());
        match opts.surface {
            Surface::Core => parser.parse_core(),
            Surface::Phrase => parser.parse_phrase(),
        }
    };

    {
        let _span = tracing::info_span!("resolve", file = %path).entered();
        if opts.surface == Surface::Phrase {
            tracing::debug!("linting phrase surface");
            vitte_lint::lint_module(&ast, &session.interner, &mut session.diags, root);
        }
        resolve_module(&ast, &mut session.interner, &mut session.diags, root);
    }

    if opts.werror {
        session.diags.promote_warnings_to_errors();
    }

    session.diags.sort_by_location();

    let diagnostics = if opts.json {
        render_json_array(&session.diags, &session.sources)
    } else {
        render_human(&session.diags, &session.sources)
    };

    if session.diags.has_errors() {
        tracing::debug!(errors = session.diags.error_count(), "compile failed, not emitting");
        return Ok(CompileResult { emitted: None, diagnostics, exit_code: 1 });
    }

    let emitted = match opts.emit {
        EmitTarget::C if opts.emit.in_scope() => {
            let _span = tracing::info_span!("emit", file = %path).entered();
            Some(emit_c(&ast, session, root, opts))
        }
        EmitTarget::Ir if opts.emit.in_scope() => None,
        _ => return Err(DriverError::UnsupportedEmitTarget),
    };

    Ok(CompileResult { emitted, diagnostics, exit_code: 0 })
}

fn emit_c(ast: &Ast, session: &Session, root: NodeId, opts: &CompileOptions) -> String {
    let mut emitter = vitte_cbackend::Emitter::new(Vec::new()).with_line_markers(opts.debug);
    codegen::emit_module(ast, &session.interner, root, &mut emitter);
    String::from_utf8(emitter.into_inner()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::compile;
    use crate::options::{CompileOptions, EmitTarget, Surface};
    use crate::session::Session;

    fn run(src: &str, surface: Surface) -> super::CompileResult {
        let mut session = Session::new();
        let file_id = session.add_file("demo.vitte", src);
        let opts = CompileOptions { surface, ..CompileOptions::default() };
        compile(&mut session, file_id, &opts).expect("pipeline does not error on a known file")
    }

    #[test]
    fn scenario_one_minimal_program_compiles_to_c() {
        let result = run("module demo\nfn main() -> i32 return 0 .end\n", Surface::Core);
        assert_eq!(result.exit_code, 0);
        let c = result.emitted.expect("C was emitted");
        assert!(c.contains("vitte_fn__demo__main"), "{c}");
    }

    #[test]
    fn a_duplicate_definition_fails_the_build() {
        let src = "module demo\nfn f() -> i32 return 0 .end\nfn f() -> i32 return 1 .end\n";
        let result = run(src, Surface::Core);
        assert_eq!(result.exit_code, 1);
        assert!(result.emitted.is_none());
        assert!(result.diagnostics.contains("E0201"));
    }

    #[test]
    fn ir_target_succeeds_with_no_emitted_text() {
        let mut session = Session::new();
        let file_id = session.add_file("demo.vitte", "module demo\nfn main() -> i32 return 0 .end\n");
        let opts = CompileOptions { emit: EmitTarget::Ir, ..CompileOptions::default() };
        let result = compile(&mut session, file_id, &opts).expect("ir is in scope");
        assert_eq!(result.exit_code, 0);
        assert!(result.emitted.is_none());
    }

    #[test]
    fn asm_target_is_rejected_as_out_of_scope() {
        let mut session = Session::new();
        let file_id = session.add_file("demo.vitte", "module demo\nfn main() -> i32 return 0 .end\n");
        let opts = CompileOptions { emit: EmitTarget::Asm, ..CompileOptions::default() };
        assert!(compile(&mut session, file_id, &opts).is_err());
    }
}
