//! Operations on call expressions: their direct argument lists and their
//! callee names.
//!
//! For argument edits, a call matches when its callee name equals `callee`:
//! the last path segment of a plain call (`f(..)`, `module::f(..)`) or the
//! method name of a method call (`client.f(..)`). Matching is limited to the
//! direct argument list of the matched call; arguments of calls nested inside
//! those arguments are never touched. Every matching call inside `scope` is
//! edited. Callee renaming matches by qualified [`CallPattern`] instead.

use syn::Expr;

use crate::cursor;
use crate::matcher;
use crate::node::{CallPattern, Direction, InsertPolicy};
use crate::scope::Scope;

/// Does a call to `callee` inside `scope` carry an argument structurally
/// equal to `arg`?
pub fn has_arg(file: &syn::File, scope: &Scope, callee: &str, arg: &Expr) -> bool {
    let mut found = false;
    cursor::scan_calls(file, scope, callee, |args| {
        found |= args.iter().any(|a| matcher::exprs_match(a, arg));
    });
    found
}

/// Delete every argument structurally equal to `arg` from every call to
/// `callee` inside `scope`. Returns true iff at least one argument was
/// removed.
pub fn delete_arg(file: &mut syn::File, scope: &Scope, callee: &str, arg: &Expr) -> bool {
    let mut modified = false;
    cursor::edit_calls(file, scope, callee, |args| {
        modified |= cursor::remove_matching(args, |a| matcher::exprs_match(a, arg));
    });
    modified
}

/// Insert a clone of `arg` into the argument list of every call to `callee`
/// inside `scope`, at the normalized position. Returns true iff at least one
/// call was found.
pub fn insert_arg_at(
    file: &mut syn::File,
    scope: &Scope,
    callee: &str,
    arg: &Expr,
    pos: isize,
) -> bool {
    cursor::edit_calls(file, scope, callee, |args| {
        cursor::insert_at(args, arg, pos);
    })
}

/// Insert a clone of `arg` next to every argument structurally equal to
/// `reference` in calls to `callee` inside `scope`. Returns true iff at
/// least one reference argument matched.
pub fn insert_arg_relative(
    file: &mut syn::File,
    scope: &Scope,
    callee: &str,
    arg: &Expr,
    reference: &Expr,
    direction: Direction,
    policy: InsertPolicy,
) -> bool {
    let mut modified = false;
    cursor::edit_calls(file, scope, callee, |args| {
        modified |= cursor::insert_relative(
            args,
            arg,
            |a| matcher::exprs_match(a, reference),
            direction,
            policy,
        );
    });
    modified
}

/// Rename the callee of every call matching `pattern` inside `scope`:
/// `qualifier.member(..)` becomes `qualifier.new_name(..)` and
/// `qualifier::member(..)` becomes `qualifier::new_name(..)`. Returns true
/// iff at least one call was renamed.
pub fn set_method_call(
    file: &mut syn::File,
    scope: &Scope,
    pattern: &CallPattern,
    new_name: &str,
) -> bool {
    cursor::rename_calls(file, scope, pattern, new_name)
}
