//! Symbol pass (§4.9 step 4): defines every top-level declaration in the
//! global scope, then walks each function/entry body opening and closing
//! scopes and resolving identifier references.
//!
//! Scope-opening follows the same rule `vitte-lint` uses for the phrase
//! surface (only `fn`/entry bodies, loop bodies, and `when` arms open a new
//! scope; `if`/`while`/`match` share the enclosing one) so both passes
//! agree on what "the current scope" means for a given statement.

use vitte_arena::Interner;
use vitte_ast::{Ast, NodeId, NodeKind};
use vitte_diagnostics::DiagnosticBag;
use vitte_symbols::{SymbolKind, SymbolTable};

pub fn resolve_module(ast: &Ast, interner: &mut Interner, diags: &mut DiagnosticBag, module: NodeId) -> SymbolTable {
    let mut table = SymbolTable::new();
    table.push_scope();
    if let NodeKind::Module { items, .. } = ast.kind(module).clone() {
        for item in items {
            resolve_item(ast, interner, diags, &mut table, item);
        }
    }
    table.pop_scope();
    table
}

fn resolve_item(ast: &Ast, interner: &mut Interner, diags: &mut DiagnosticBag, table: &mut SymbolTable, item: NodeId) {
    match ast.kind(item).clone() {
        NodeKind::Fn { name, params, body, .. } => {
            table.define(diags, SymbolKind::Function, name, item, ast.span(item));
            resolve_body(ast, interner, diags, table, &params, body);
        }
        NodeKind::Entry { name, body, .. } => {
            let name = name.unwrap_or_else(|| interner.intern("<entry>"));
            table.define(diags, SymbolKind::EntryPoint, name, item, ast.span(item));
            resolve_body(ast, interner, diags, table, &[], body);
        }
        _ => {}
    }
}

fn resolve_body(
    ast: &Ast,
    interner: &mut Interner,
    diags: &mut DiagnosticBag,
    table: &mut SymbolTable,
    params: &[NodeId],
    body: NodeId,
) {
    table.push_scope();
    for &param in params {
        if let NodeKind::Param { name, .. } = ast.kind(param) {
            table.define(diags, SymbolKind::Param, *name, param, ast.span(param));
        }
    }
    resolve_stmt(ast, interner, diags, table, body);
    table.pop_scope();
}

fn resolve_stmt(ast: &Ast, interner: &mut Interner, diags: &mut DiagnosticBag, table: &mut SymbolTable, id: NodeId) {
    match ast.kind(id).clone() {
        NodeKind::Block { stmts } => {
            for s in stmts {
                resolve_stmt(ast, interner, diags, table, s);
            }
        }
        NodeKind::ExprStatement { expr } => resolve_expr(ast, table, expr),
        NodeKind::Let { name, init } => {
            resolve_expr(ast, table, init);
            table.define(diags, SymbolKind::Local, name, id, ast.span(id));
        }
        NodeKind::Set { name, value } => {
            resolve_expr(ast, table, value);
            // A `set` that reassigns a name already bound in this scope is not
            // a new definition (mirrors vitte-lint's reassignment handling).
            if table.lookup_current(name).is_none() {
                table.define(diags, SymbolKind::Local, name, id, ast.span(id));
            }
        }
        NodeKind::Say { value } => resolve_expr(ast, table, value),
        NodeKind::DoCall { name } => {
            table.lookup(name);
        }
        NodeKind::Return { value } | NodeKind::Ret { value } => {
            if let Some(v) = value {
                resolve_expr(ast, table, v);
            }
        }
        NodeKind::If { cond, then_branch, else_branch } => {
            resolve_expr(ast, table, cond);
            resolve_stmt(ast, interner, diags, table, then_branch);
            if let Some(e) = else_branch {
                resolve_stmt(ast, interner, diags, table, e);
            }
        }
        NodeKind::While { cond, body } => {
            resolve_expr(ast, table, cond);
            resolve_stmt(ast, interner, diags, table, body);
        }
        NodeKind::For { var, iter, body } => {
            resolve_expr(ast, table, iter);
            table.push_scope();
            table.define(diags, SymbolKind::LoopVar, var, id, ast.span(id));
            resolve_stmt(ast, interner, diags, table, body);
            table.pop_scope();
        }
        NodeKind::PhraseLoop { var, from, to, step, body } => {
            resolve_expr(ast, table, from);
            resolve_expr(ast, table, to);
            if let Some(s) = step {
                resolve_expr(ast, table, s);
            }
            table.push_scope();
            table.define(diags, SymbolKind::LoopVar, var, id, ast.span(id));
            resolve_stmt(ast, interner, diags, table, body);
            table.pop_scope();
        }
        NodeKind::Match { scrutinee, arms } => {
            resolve_expr(ast, table, scrutinee);
            for arm in arms {
                if let NodeKind::MatchArm { pattern, body } = ast.kind(arm).clone() {
                    resolve_expr(ast, table, pattern);
                    resolve_stmt(ast, interner, diags, table, body);
                }
            }
        }
        NodeKind::When { arms } => {
            for arm in arms {
                let NodeKind::WhenArm { cond, body, .. } = ast.kind(arm).clone() else { continue };
                if let Some(c) = cond {
                    resolve_expr(ast, table, c);
                }
                table.push_scope();
                resolve_stmt(ast, interner, diags, table, body);
                table.pop_scope();
            }
        }
        _ => {}
    }
}

/// Walks an expression performing lookups on every identifier read. Misses
/// are not reported: the spec lists "unresolved identifier" as an optional
/// resolve error, and this table only tracks module-level declarations and
/// local bindings, not builtins or cross-module names — flagging a miss
/// here would mostly flag legitimate calls to things this pass never
/// defines symbols for.
fn resolve_expr(ast: &Ast, table: &mut SymbolTable, id: NodeId) {
    match ast.kind(id).clone() {
        NodeKind::Identifier { name } => {
            table.lookup(name);
        }
        NodeKind::Field { base, .. } => resolve_expr(ast, table, base),
        NodeKind::Binary { lhs, rhs, .. } => {
            resolve_expr(ast, table, lhs);
            resolve_expr(ast, table, rhs);
        }
        NodeKind::Unary { operand, .. } => resolve_expr(ast, table, operand),
        NodeKind::Call { callee, args } => {
            resolve_expr(ast, table, callee);
            for a in args {
                resolve_expr(ast, table, a);
            }
        }
        NodeKind::Index { base, index } => {
            resolve_expr(ast, table, base);
            resolve_expr(ast, table, index);
        }
        _ => {}
    }
}
