//! Serializes the syntax-node model to Go source text.
//!
//! Output is gofmt-flavored (tab indentation, one blank line between
//! declarations, sorted parenthesized import block) and byte-deterministic
//! for identical input.

use crate::ast::{GoDecl, GoExpr, GoField, GoFile, GoStmt};
use std::fmt::Write;

/// Renders a complete source file.
pub fn render(file: &GoFile) -> String {
    let mut out = String::new();

    for line in &file.header {
        out.push_str(line);
        out.push('\n');
    }
    if !file.header.is_empty() {
        out.push('\n');
    }

    let _ = writeln!(out, "package {}", file.package);

    let imports: Vec<(&str, &str)> = file.imports().collect();
    if !imports.is_empty() {
        out.push_str("\nimport (\n");
        for (path, alias) in imports {
            if alias.is_empty() {
                let _ = writeln!(out, "\t\"{path}\"");
            } else {
                let _ = writeln!(out, "\t{alias} \"{path}\"");
            }
        }
        out.push_str(")\n");
    }

    for decl in &file.decls {
        out.push('\n');
        render_decl(&mut out, decl);
    }

    out
}

fn render_decl(out: &mut String, decl: &GoDecl) {
    match decl {
        GoDecl::Struct { name, fields } => {
            if fields.is_empty() {
                let _ = writeln!(out, "type {name} struct{{}}");
                return;
            }
            let _ = writeln!(out, "type {name} struct {{");
            for field in fields {
                let _ = writeln!(out, "\t{} {}", field.name, field.ty);
            }
            out.push_str("}\n");
        }
        GoDecl::Var { name, ty } => {
            let _ = writeln!(out, "var {name} {ty}");
        }
        GoDecl::Func {
            name,
            receiver,
            params,
            results,
            body,
        } => {
            out.push_str("func ");
            if let Some(recv) = receiver {
                let _ = write!(out, "({} {}) ", recv.name, recv.ty);
            }
            let _ = write!(out, "{name}({})", render_params(params));
            match results.len() {
                0 => {}
                1 => {
                    let _ = write!(out, " {}", results[0]);
                }
                _ => {
                    let _ = write!(out, " ({})", results.join(", "));
                }
            }
            out.push_str(" {\n");
            render_block(out, body, 1);
            out.push_str("}\n");
        }
    }
}

fn render_params(params: &[GoField]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", p.name, p.ty))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_block(out: &mut String, stmts: &[GoStmt], depth: usize) {
    for stmt in stmts {
        render_stmt(out, stmt, depth);
    }
}

fn render_stmt(out: &mut String, stmt: &GoStmt, depth: usize) {
    let indent = "\t".repeat(depth);
    match stmt {
        GoStmt::Define { lhs, rhs } => {
            let _ = write!(out, "{indent}{lhs} := ");
            render_expr(out, rhs, depth);
            out.push('\n');
        }
        GoStmt::Assign { lhs, rhs } => {
            let _ = write!(out, "{indent}{lhs} = ");
            render_expr(out, rhs, depth);
            out.push('\n');
        }
        GoStmt::If { cond, body } => {
            let _ = writeln!(out, "{indent}if {cond} {{");
            render_block(out, body, depth + 1);
            let _ = writeln!(out, "{indent}}}");
        }
        GoStmt::Return(expr) => {
            let _ = write!(out, "{indent}return ");
            render_expr(out, expr, depth);
            out.push('\n');
        }
        GoStmt::Raw(text) => {
            let _ = writeln!(out, "{indent}{text}");
        }
    }
}

fn render_expr(out: &mut String, expr: &GoExpr, depth: usize) {
    match expr {
        GoExpr::Raw(text) => out.push_str(text),
        GoExpr::FuncLit {
            params,
            result,
            body,
        } => {
            let _ = write!(out, "func({})", render_params(params));
            if !result.is_empty() {
                let _ = write!(out, " {result}");
            }
            out.push_str(" {\n");
            render_block(out, body, depth + 1);
            let _ = write!(out, "{}}}", "\t".repeat(depth));
        }
    }
}
