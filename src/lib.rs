//! Structural refactoring operations over Rust syntax trees.
//!
//! The engine locates nodes by structural equality (formatting and doc
//! comments ignored) inside named enclosing constructs, then checks, deletes,
//! or inserts entries in the node lists it finds: fn bodies, signature
//! parameter lists, call argument lists, and closure parameter lists.
//!
//! ```no_run
//! use ast_refactor::{Node, Scope, Target, source};
//!
//! let mut file = source::parse_source("fn main() { let a = 1; }")?;
//! let target = Target::Function("main".to_string());
//! let stmt = Node::stmt("let a = 1;")?;
//! assert!(ast_refactor::exists(&file, &target, &stmt));
//! assert!(ast_refactor::delete(&mut file, &target, &stmt));
//! # Ok::<(), ast_refactor::Error>(())
//! ```
//!
//! Per-kind modules ([`stmts`], [`params`], [`args`]) expose the same
//! operations with concrete `syn` node types for callers that already hold
//! parsed nodes.

pub mod args;
pub mod config;
mod cursor;
pub mod matcher;
pub mod node;
pub mod params;
mod position;
pub mod scope;
pub mod source;
pub mod stmts;

mod error;

pub use error::{Error, Result};
pub use node::{CallPattern, Direction, InsertPolicy, Node, Target};
pub use scope::Scope;

/// Does `target` contain an entry structurally equal to `node`?
///
/// A target/node kind mismatch (say a statement aimed at a call's argument
/// list) matches nothing and reports `false`.
pub fn exists(file: &syn::File, target: &Target, node: &Node) -> bool {
    match (target, node) {
        (Target::Function(name), Node::Stmt(stmt)) => stmts::has_stmt(file, name, stmt),
        (Target::Function(name), Node::Param(param)) => params::has_param(file, name, param),
        (Target::Call { scope, callee }, Node::Arg(arg)) => args::has_arg(file, scope, callee, arg),
        (Target::Closures(scope), Node::ClosureParam(pat)) => {
            params::has_closure_param(file, scope, pat)
        }
        (Target::Closures(scope), Node::Stmt(stmt)) => stmts::has_closure_stmt(file, scope, stmt),
        _ => false,
    }
}

/// Delete every entry of `target` structurally equal to `node`. Returns true
/// iff at least one entry was removed.
pub fn delete(file: &mut syn::File, target: &Target, node: &Node) -> bool {
    match (target, node) {
        (Target::Function(name), Node::Stmt(stmt)) => stmts::delete_stmt(file, name, stmt),
        (Target::Function(name), Node::Param(param)) => params::delete_param(file, name, param),
        (Target::Call { scope, callee }, Node::Arg(arg)) => {
            args::delete_arg(file, scope, callee, arg)
        }
        (Target::Closures(scope), Node::ClosureParam(pat)) => {
            params::delete_closure_param(file, scope, pat)
        }
        (Target::Closures(scope), Node::Stmt(stmt)) => {
            stmts::delete_closure_stmt(file, scope, stmt)
        }
        _ => false,
    }
}

/// Insert a clone of `node` into `target`'s list at the normalized position:
/// negative appends, past-the-end clamps to append. Returns true iff at least
/// one target list was found.
pub fn insert_at(file: &mut syn::File, target: &Target, node: &Node, pos: isize) -> bool {
    match (target, node) {
        (Target::Function(name), Node::Stmt(stmt)) => stmts::insert_stmt_at(file, name, stmt, pos),
        (Target::Function(name), Node::Param(param)) => {
            params::insert_param_at(file, name, param, pos)
        }
        (Target::Call { scope, callee }, Node::Arg(arg)) => {
            args::insert_arg_at(file, scope, callee, arg, pos)
        }
        (Target::Closures(scope), Node::ClosureParam(pat)) => {
            params::insert_closure_param_at(file, scope, pat, pos)
        }
        (Target::Closures(scope), Node::Stmt(stmt)) => {
            stmts::insert_closure_stmt_at(file, scope, stmt, pos)
        }
        _ => false,
    }
}

/// Insert a clone of `node` next to entries structurally equal to
/// `reference`, on the side `direction` names. `policy` picks whether every
/// match or only the first one receives an insertion. Returns true iff at
/// least one reference entry matched; node kinds that differ from the
/// reference's kind match nothing.
pub fn insert_relative(
    file: &mut syn::File,
    target: &Target,
    node: &Node,
    reference: &Node,
    direction: Direction,
    policy: InsertPolicy,
) -> bool {
    match (target, node, reference) {
        (Target::Function(name), Node::Stmt(stmt), Node::Stmt(reference)) => {
            stmts::insert_stmt_relative(file, name, stmt, reference, direction, policy)
        }
        (Target::Function(name), Node::Param(param), Node::Param(reference)) => {
            params::insert_param_relative(file, name, param, reference, direction, policy)
        }
        (Target::Call { scope, callee }, Node::Arg(arg), Node::Arg(reference)) => {
            args::insert_arg_relative(file, scope, callee, arg, reference, direction, policy)
        }
        (Target::Closures(scope), Node::ClosureParam(pat), Node::ClosureParam(reference)) => {
            params::insert_closure_param_relative(file, scope, pat, reference, direction, policy)
        }
        (Target::Closures(scope), Node::Stmt(stmt), Node::Stmt(reference)) => {
            stmts::insert_closure_stmt_relative(file, scope, stmt, reference, direction, policy)
        }
        _ => false,
    }
}

/// Delete every statement inside `scope` whose own expression tree invokes
/// `pattern`, the whole statement included. Statements inside closures are
/// deleted too. Under a named scope, nested named fns are separate scopes
/// and stay untouched; an unrestricted scope reaches every body.
pub fn delete_call_statements(file: &mut syn::File, scope: &Scope, pattern: &CallPattern) -> bool {
    stmts::delete_call_statements(file, scope, pattern)
}

/// Rename the callee of every call matching `pattern` inside `scope`.
pub fn set_method_call(
    file: &mut syn::File,
    scope: &Scope,
    pattern: &CallPattern,
    new_name: &str,
) -> bool {
    args::set_method_call(file, scope, pattern, new_name)
}
