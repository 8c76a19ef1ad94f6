//! Operations on parameter lists: named fn signatures and closure literals.
//!
//! Named fns are located by name, like statement edits. Closures have no
//! name, so closure-parameter edits are selected by [`Scope`] alone and apply
//! to every literal inside it, nested ones included.

use syn::{FnArg, Pat};

use crate::cursor;
use crate::matcher;
use crate::node::{Direction, InsertPolicy};
use crate::scope::Scope;

/// Does the signature of `function` contain a parameter structurally equal
/// to `param`?
pub fn has_param(file: &syn::File, function: &str, param: &FnArg) -> bool {
    let mut found = false;
    cursor::scan_fn_decls(file, function, |sig, _| {
        found |= sig.inputs.iter().any(|p| matcher::params_match(p, param));
    });
    found
}

/// Delete every parameter structurally equal to `param` from the signature
/// of `function`. Returns true iff at least one parameter was removed.
pub fn delete_param(file: &mut syn::File, function: &str, param: &FnArg) -> bool {
    let mut modified = false;
    cursor::edit_fn_decls(file, function, |sig, _| {
        modified |= cursor::remove_matching(&mut sig.inputs, |p| matcher::params_match(p, param));
    });
    modified
}

/// Insert a clone of `param` into the signature of `function` at the
/// normalized position. Returns true iff the function was found.
pub fn insert_param_at(file: &mut syn::File, function: &str, param: &FnArg, pos: isize) -> bool {
    cursor::edit_fn_decls(file, function, |sig, _| {
        cursor::insert_at(&mut sig.inputs, param, pos);
    })
}

/// Insert a clone of `param` next to every parameter structurally equal to
/// `reference`. Returns true iff at least one reference parameter matched.
pub fn insert_param_relative(
    file: &mut syn::File,
    function: &str,
    param: &FnArg,
    reference: &FnArg,
    direction: Direction,
    policy: InsertPolicy,
) -> bool {
    let mut modified = false;
    cursor::edit_fn_decls(file, function, |sig, _| {
        modified |= cursor::insert_relative(
            &mut sig.inputs,
            param,
            |p| matcher::params_match(p, reference),
            direction,
            policy,
        );
    });
    modified
}

/// Does any closure literal inside `scope` carry a parameter structurally
/// equal to `param`?
pub fn has_closure_param(file: &syn::File, scope: &Scope, param: &Pat) -> bool {
    let mut found = false;
    cursor::scan_closures(file, scope, |inputs| {
        found |= inputs.iter().any(|p| matcher::pats_match(p, param));
    });
    found
}

/// Delete every closure parameter structurally equal to `param` from every
/// closure literal inside `scope`. Returns true iff at least one was removed.
pub fn delete_closure_param(file: &mut syn::File, scope: &Scope, param: &Pat) -> bool {
    let mut modified = false;
    cursor::edit_closures(file, scope, |inputs| {
        modified |= cursor::remove_matching(inputs, |p| matcher::pats_match(p, param));
    });
    modified
}

/// Insert a clone of `param` into the parameter list of every closure
/// literal inside `scope`, at the normalized position. Returns true iff at
/// least one closure was found.
pub fn insert_closure_param_at(
    file: &mut syn::File,
    scope: &Scope,
    param: &Pat,
    pos: isize,
) -> bool {
    cursor::edit_closures(file, scope, |inputs| {
        cursor::insert_at(inputs, param, pos);
    })
}

/// Insert a clone of `param` next to every closure parameter structurally
/// equal to `reference`, across every closure literal inside `scope`.
/// Returns true iff at least one reference parameter matched.
pub fn insert_closure_param_relative(
    file: &mut syn::File,
    scope: &Scope,
    param: &Pat,
    reference: &Pat,
    direction: Direction,
    policy: InsertPolicy,
) -> bool {
    let mut modified = false;
    cursor::edit_closures(file, scope, |inputs| {
        modified |= cursor::insert_relative(
            inputs,
            param,
            |p| matcher::pats_match(p, reference),
            direction,
            policy,
        );
    });
    modified
}
