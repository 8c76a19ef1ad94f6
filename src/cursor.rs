//! Tree walkers and the list-splice primitives they edit through.
//!
//! All list mutation goes through a snapshot: take the entries out, rebuild
//! the list, swap it back. Nothing is spliced while an iteration is live, so
//! an edit can never skip or duplicate a sibling visit.

use log::debug;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::visit::Visit;
use syn::visit_mut::VisitMut;
use syn::{Block, Expr, ExprCall, ExprClosure, ExprMethodCall, Ident, Signature, Stmt};

use crate::node::{CallPattern, Direction, InsertPolicy};
use crate::position::normalize_pos;
use crate::scope::{Scope, ScopeTracker};

// ── List splicing ────────────────────────────────────────────────────────

/// An editable list of sibling nodes: fn-body statements, fn parameters, or
/// call arguments.
pub(crate) trait NodeList {
    type Node: Clone;

    fn node_count(&self) -> usize;
    fn snapshot(&self) -> Vec<Self::Node>;
    fn replace(&mut self, nodes: Vec<Self::Node>);
}

impl NodeList for Vec<Stmt> {
    type Node = Stmt;

    fn node_count(&self) -> usize {
        self.len()
    }

    fn snapshot(&self) -> Vec<Stmt> {
        self.clone()
    }

    fn replace(&mut self, nodes: Vec<Stmt>) {
        *self = nodes;
    }
}

impl<T: Clone> NodeList for Punctuated<T, Comma> {
    type Node = T;

    fn node_count(&self) -> usize {
        self.len()
    }

    fn snapshot(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    fn replace(&mut self, nodes: Vec<T>) {
        *self = nodes.into_iter().collect();
    }
}

/// Splice a clone of `node` into the list at a normalized position.
pub(crate) fn insert_at<L: NodeList>(list: &mut L, node: &L::Node, pos: isize) {
    let mut nodes = list.snapshot();
    let index = normalize_pos(pos, nodes.len());
    nodes.insert(index, node.clone());
    list.replace(nodes);
}

/// Remove every entry the predicate matches. Non-matching entries keep their
/// relative order. Returns true iff at least one entry was removed.
pub(crate) fn remove_matching<L, F>(list: &mut L, is_match: F) -> bool
where
    L: NodeList,
    F: Fn(&L::Node) -> bool,
{
    let before = list.node_count();
    let kept: Vec<_> = list
        .snapshot()
        .into_iter()
        .filter(|node| !is_match(node))
        .collect();
    let removed = kept.len() != before;
    if removed {
        debug!("removed {} matching list entries", before - kept.len());
        list.replace(kept);
    }
    removed
}

/// Insert a clone of `node` next to entries the reference predicate matches.
/// Returns true iff at least one reference entry matched.
pub(crate) fn insert_relative<L, F>(
    list: &mut L,
    node: &L::Node,
    is_ref: F,
    direction: Direction,
    policy: InsertPolicy,
) -> bool
where
    L: NodeList,
    F: Fn(&L::Node) -> bool,
{
    let mut rebuilt = Vec::with_capacity(list.node_count() + 1);
    let mut matched = false;
    for entry in list.snapshot() {
        let fire = is_ref(&entry) && (policy == InsertPolicy::AllMatches || !matched);
        if fire {
            matched = true;
            match direction {
                Direction::Before => {
                    rebuilt.push(node.clone());
                    rebuilt.push(entry);
                }
                Direction::After => {
                    rebuilt.push(entry);
                    rebuilt.push(node.clone());
                }
            }
        } else {
            rebuilt.push(entry);
        }
    }
    if matched {
        list.replace(rebuilt);
    }
    matched
}

// ── Named fn declarations ────────────────────────────────────────────────

/// Mutating walk over every fn or impl method named `name`. The callback gets
/// the signature and body; descent into a matched declaration is suppressed,
/// while unmatched declarations are entered to reach nested fns.
struct FnDeclCursor<'a, F> {
    name: &'a str,
    apply: F,
    matched: bool,
}

impl<F> VisitMut for FnDeclCursor<'_, F>
where
    F: FnMut(&mut Signature, &mut Block),
{
    fn visit_item_fn_mut(&mut self, node: &mut syn::ItemFn) {
        if node.sig.ident == self.name {
            self.matched = true;
            (self.apply)(&mut node.sig, &mut node.block);
            return;
        }
        syn::visit_mut::visit_item_fn_mut(self, node);
    }

    fn visit_impl_item_fn_mut(&mut self, node: &mut syn::ImplItemFn) {
        if node.sig.ident == self.name {
            self.matched = true;
            (self.apply)(&mut node.sig, &mut node.block);
            return;
        }
        syn::visit_mut::visit_impl_item_fn_mut(self, node);
    }
}

pub(crate) fn edit_fn_decls<F>(file: &mut syn::File, name: &str, apply: F) -> bool
where
    F: FnMut(&mut Signature, &mut Block),
{
    let mut cursor = FnDeclCursor {
        name,
        apply,
        matched: false,
    };
    cursor.visit_file_mut(file);
    cursor.matched
}

/// Read-only twin of [`edit_fn_decls`].
struct FnDeclFinder<'a, F> {
    name: &'a str,
    inspect: F,
    matched: bool,
}

impl<'ast, F> Visit<'ast> for FnDeclFinder<'_, F>
where
    F: FnMut(&'ast Signature, &'ast Block),
{
    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        if node.sig.ident == self.name {
            self.matched = true;
            (self.inspect)(&node.sig, &node.block);
            return;
        }
        syn::visit::visit_item_fn(self, node);
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        if node.sig.ident == self.name {
            self.matched = true;
            (self.inspect)(&node.sig, &node.block);
            return;
        }
        syn::visit::visit_impl_item_fn(self, node);
    }
}

pub(crate) fn scan_fn_decls<'ast, F>(file: &'ast syn::File, name: &str, inspect: F) -> bool
where
    F: FnMut(&'ast Signature, &'ast Block),
{
    let mut finder = FnDeclFinder {
        name,
        inspect,
        matched: false,
    };
    finder.visit_file(file);
    finder.matched
}

// ── Call expressions ─────────────────────────────────────────────────────

fn call_callee_matches(func: &Expr, callee: &str) -> bool {
    match func {
        Expr::Path(p) => p
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == callee),
        _ => false,
    }
}

/// Mutating walk over the direct argument lists of calls to `callee` inside
/// `scope`. Descent into a matched call is suppressed: a call appearing as an
/// argument to another matching call is never edited.
struct CallCursor<'a, F> {
    callee: &'a str,
    tracker: ScopeTracker<'a>,
    apply: F,
    matched: bool,
}

impl<F> CallCursor<'_, F>
where
    F: FnMut(&mut Punctuated<Expr, Comma>),
{
    fn try_call(&mut self, node: &mut ExprCall) -> bool {
        if self.tracker.is_inside() && call_callee_matches(&node.func, self.callee) {
            self.matched = true;
            (self.apply)(&mut node.args);
            return true;
        }
        false
    }

    fn try_method_call(&mut self, node: &mut ExprMethodCall) -> bool {
        if self.tracker.is_inside() && node.method == self.callee {
            self.matched = true;
            (self.apply)(&mut node.args);
            return true;
        }
        false
    }
}

impl<F> VisitMut for CallCursor<'_, F>
where
    F: FnMut(&mut Punctuated<Expr, Comma>),
{
    fn visit_item_fn_mut(&mut self, node: &mut syn::ItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit_mut::visit_item_fn_mut(self, node);
        self.tracker.exit_function();
    }

    fn visit_impl_item_fn_mut(&mut self, node: &mut syn::ImplItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit_mut::visit_impl_item_fn_mut(self, node);
        self.tracker.exit_function();
    }

    fn visit_expr_call_mut(&mut self, node: &mut ExprCall) {
        if !self.try_call(node) {
            syn::visit_mut::visit_expr_call_mut(self, node);
        }
    }

    fn visit_expr_method_call_mut(&mut self, node: &mut ExprMethodCall) {
        if !self.try_method_call(node) {
            syn::visit_mut::visit_expr_method_call_mut(self, node);
        }
    }
}

pub(crate) fn edit_calls<F>(file: &mut syn::File, scope: &Scope, callee: &str, apply: F) -> bool
where
    F: FnMut(&mut Punctuated<Expr, Comma>),
{
    let mut cursor = CallCursor {
        callee,
        tracker: ScopeTracker::new(scope),
        apply,
        matched: false,
    };
    cursor.visit_file_mut(file);
    cursor.matched
}

/// Read-only twin of [`edit_calls`].
struct CallFinder<'a, F> {
    callee: &'a str,
    tracker: ScopeTracker<'a>,
    inspect: F,
    matched: bool,
}

impl<'ast, F> Visit<'ast> for CallFinder<'_, F>
where
    F: FnMut(&'ast Punctuated<Expr, Comma>),
{
    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit::visit_item_fn(self, node);
        self.tracker.exit_function();
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit::visit_impl_item_fn(self, node);
        self.tracker.exit_function();
    }

    fn visit_expr_call(&mut self, node: &'ast ExprCall) {
        if self.tracker.is_inside() && call_callee_matches(&node.func, self.callee) {
            self.matched = true;
            (self.inspect)(&node.args);
            return;
        }
        syn::visit::visit_expr_call(self, node);
    }

    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        if self.tracker.is_inside() && node.method == self.callee {
            self.matched = true;
            (self.inspect)(&node.args);
            return;
        }
        syn::visit::visit_expr_method_call(self, node);
    }
}

pub(crate) fn scan_calls<'ast, F>(
    file: &'ast syn::File,
    scope: &Scope,
    callee: &str,
    inspect: F,
) -> bool
where
    F: FnMut(&'ast Punctuated<Expr, Comma>),
{
    let mut finder = CallFinder {
        callee,
        tracker: ScopeTracker::new(scope),
        inspect,
        matched: false,
    };
    finder.visit_file(file);
    finder.matched
}

// ── Closure literals ─────────────────────────────────────────────────────

/// Mutating walk over every closure literal inside `scope`, nested closures
/// included. Closures are anonymous, so the scope does all the selecting.
struct ClosureCursor<'a, F> {
    tracker: ScopeTracker<'a>,
    apply: F,
    matched: bool,
}

impl<F> VisitMut for ClosureCursor<'_, F>
where
    F: FnMut(&mut Punctuated<syn::Pat, Comma>),
{
    fn visit_item_fn_mut(&mut self, node: &mut syn::ItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit_mut::visit_item_fn_mut(self, node);
        self.tracker.exit_function();
    }

    fn visit_impl_item_fn_mut(&mut self, node: &mut syn::ImplItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit_mut::visit_impl_item_fn_mut(self, node);
        self.tracker.exit_function();
    }

    fn visit_expr_closure_mut(&mut self, node: &mut ExprClosure) {
        if self.tracker.is_inside() {
            self.matched = true;
            (self.apply)(&mut node.inputs);
        }
        syn::visit_mut::visit_expr_closure_mut(self, node);
    }
}

pub(crate) fn edit_closures<F>(file: &mut syn::File, scope: &Scope, apply: F) -> bool
where
    F: FnMut(&mut Punctuated<syn::Pat, Comma>),
{
    let mut cursor = ClosureCursor {
        tracker: ScopeTracker::new(scope),
        apply,
        matched: false,
    };
    cursor.visit_file_mut(file);
    cursor.matched
}

/// Read-only twin of [`edit_closures`].
struct ClosureFinder<'a, F> {
    tracker: ScopeTracker<'a>,
    inspect: F,
    matched: bool,
}

impl<'ast, F> Visit<'ast> for ClosureFinder<'_, F>
where
    F: FnMut(&'ast Punctuated<syn::Pat, Comma>),
{
    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit::visit_item_fn(self, node);
        self.tracker.exit_function();
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit::visit_impl_item_fn(self, node);
        self.tracker.exit_function();
    }

    fn visit_expr_closure(&mut self, node: &'ast ExprClosure) {
        if self.tracker.is_inside() {
            self.matched = true;
            (self.inspect)(&node.inputs);
        }
        syn::visit::visit_expr_closure(self, node);
    }
}

pub(crate) fn scan_closures<'ast, F>(file: &'ast syn::File, scope: &Scope, inspect: F) -> bool
where
    F: FnMut(&'ast Punctuated<syn::Pat, Comma>),
{
    let mut finder = ClosureFinder {
        tracker: ScopeTracker::new(scope),
        inspect,
        matched: false,
    };
    finder.visit_file(file);
    finder.matched
}

/// Mutating walk over the body blocks of closure literals inside `scope`,
/// nested closures included. Expression-bodied closures carry no statement
/// list and are skipped.
struct ClosureBlockCursor<'a, F> {
    tracker: ScopeTracker<'a>,
    apply: F,
    matched: bool,
}

impl<F> VisitMut for ClosureBlockCursor<'_, F>
where
    F: FnMut(&mut Block),
{
    fn visit_item_fn_mut(&mut self, node: &mut syn::ItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit_mut::visit_item_fn_mut(self, node);
        self.tracker.exit_function();
    }

    fn visit_impl_item_fn_mut(&mut self, node: &mut syn::ImplItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit_mut::visit_impl_item_fn_mut(self, node);
        self.tracker.exit_function();
    }

    fn visit_expr_closure_mut(&mut self, node: &mut ExprClosure) {
        if self.tracker.is_inside()
            && let Expr::Block(body) = node.body.as_mut()
        {
            self.matched = true;
            (self.apply)(&mut body.block);
        }
        syn::visit_mut::visit_expr_closure_mut(self, node);
    }
}

pub(crate) fn edit_closure_blocks<F>(file: &mut syn::File, scope: &Scope, apply: F) -> bool
where
    F: FnMut(&mut Block),
{
    let mut cursor = ClosureBlockCursor {
        tracker: ScopeTracker::new(scope),
        apply,
        matched: false,
    };
    cursor.visit_file_mut(file);
    cursor.matched
}

/// Read-only twin of [`edit_closure_blocks`].
struct ClosureBlockFinder<'a, F> {
    tracker: ScopeTracker<'a>,
    inspect: F,
    matched: bool,
}

impl<'ast, F> Visit<'ast> for ClosureBlockFinder<'_, F>
where
    F: FnMut(&'ast Block),
{
    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit::visit_item_fn(self, node);
        self.tracker.exit_function();
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit::visit_impl_item_fn(self, node);
        self.tracker.exit_function();
    }

    fn visit_expr_closure(&mut self, node: &'ast ExprClosure) {
        if self.tracker.is_inside()
            && let Expr::Block(body) = node.body.as_ref()
        {
            self.matched = true;
            (self.inspect)(&body.block);
        }
        syn::visit::visit_expr_closure(self, node);
    }
}

pub(crate) fn scan_closure_blocks<'ast, F>(file: &'ast syn::File, scope: &Scope, inspect: F) -> bool
where
    F: FnMut(&'ast Block),
{
    let mut finder = ClosureBlockFinder {
        tracker: ScopeTracker::new(scope),
        inspect,
        matched: false,
    };
    finder.visit_file(file);
    finder.matched
}

// ── Callee renaming ──────────────────────────────────────────────────────

/// Renames the callee of every call matching `pattern` inside `scope`:
/// the method name of `qualifier.member(..)` or the final path segment of
/// `qualifier::member(..)`. Descent continues after a match so nested
/// occurrences are renamed too. Macro invocations are left alone.
struct CallRenameCursor<'a> {
    pattern: &'a CallPattern,
    new_name: &'a str,
    tracker: ScopeTracker<'a>,
    modified: bool,
}

impl VisitMut for CallRenameCursor<'_> {
    fn visit_item_fn_mut(&mut self, node: &mut syn::ItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit_mut::visit_item_fn_mut(self, node);
        self.tracker.exit_function();
    }

    fn visit_impl_item_fn_mut(&mut self, node: &mut syn::ImplItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        syn::visit_mut::visit_impl_item_fn_mut(self, node);
        self.tracker.exit_function();
    }

    fn visit_expr_method_call_mut(&mut self, node: &mut ExprMethodCall) {
        if self.tracker.is_inside() && self.pattern.matches_method_call(node) {
            node.method = Ident::new(self.new_name, node.method.span());
            self.modified = true;
        }
        syn::visit_mut::visit_expr_method_call_mut(self, node);
    }

    fn visit_expr_call_mut(&mut self, node: &mut ExprCall) {
        if self.tracker.is_inside()
            && self.pattern.matches_call(node)
            && let Expr::Path(p) = node.func.as_mut()
            && let Some(segment) = p.path.segments.last_mut()
        {
            segment.ident = Ident::new(self.new_name, segment.ident.span());
            self.modified = true;
        }
        syn::visit_mut::visit_expr_call_mut(self, node);
    }
}

pub(crate) fn rename_calls(
    file: &mut syn::File,
    scope: &Scope,
    pattern: &CallPattern,
    new_name: &str,
) -> bool {
    let mut cursor = CallRenameCursor {
        pattern,
        new_name,
        tracker: ScopeTracker::new(scope),
        modified: false,
    };
    cursor.visit_file_mut(file);
    if cursor.modified {
        debug!("renamed calls matching {pattern} to {new_name}");
    }
    cursor.modified
}

/// Walk every named fn body inside `scope` and hand its block to the
/// callback. Used by block-granular edits (statement purging); descent
/// continues afterwards so nested declarations get their own visit.
struct ScopedBlockCursor<'a, F> {
    tracker: ScopeTracker<'a>,
    apply: F,
}

impl<F> VisitMut for ScopedBlockCursor<'_, F>
where
    F: FnMut(&mut Block),
{
    fn visit_item_fn_mut(&mut self, node: &mut syn::ItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        if self.tracker.is_inside() {
            (self.apply)(&mut node.block);
        } else {
            syn::visit_mut::visit_item_fn_mut(self, node);
        }
        self.tracker.exit_function();
    }

    fn visit_impl_item_fn_mut(&mut self, node: &mut syn::ImplItemFn) {
        self.tracker.enter_function(&node.sig.ident);
        if self.tracker.is_inside() {
            (self.apply)(&mut node.block);
        } else {
            syn::visit_mut::visit_impl_item_fn_mut(self, node);
        }
        self.tracker.exit_function();
    }
}

pub(crate) fn edit_scoped_fn_blocks<F>(file: &mut syn::File, scope: &Scope, apply: F)
where
    F: FnMut(&mut Block),
{
    let mut cursor = ScopedBlockCursor {
        tracker: ScopeTracker::new(scope),
        apply,
    };
    cursor.visit_file_mut(file);
}
