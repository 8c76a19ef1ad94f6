//! Operations on statement lists: named fn bodies and closure bodies.
//!
//! Named-fn ops locate every fn or impl method whose name matches `function`
//! and edit its direct statement list. Closure-body ops are selected by
//! [`Scope`] alone, like closure-parameter edits. Matching is structural:
//! spans, formatting, and doc comments never count. A missing target is
//! reported as `false`, never as an error.

use log::debug;
use syn::visit::Visit;
use syn::visit_mut::VisitMut;
use syn::{Block, Stmt};

use crate::cursor;
use crate::matcher;
use crate::node::{CallPattern, Direction, InsertPolicy};
use crate::scope::Scope;

/// Does the body of `function` contain a statement structurally equal to
/// `stmt`? Only the direct statement list counts, not nested blocks.
pub fn has_stmt(file: &syn::File, function: &str, stmt: &Stmt) -> bool {
    let mut found = false;
    cursor::scan_fn_decls(file, function, |_, block| {
        found |= block.stmts.iter().any(|s| matcher::stmts_match(s, stmt));
    });
    found
}

/// Delete every statement structurally equal to `stmt` from the body of
/// `function`. Returns true iff at least one statement was removed.
pub fn delete_stmt(file: &mut syn::File, function: &str, stmt: &Stmt) -> bool {
    let mut modified = false;
    cursor::edit_fn_decls(file, function, |_, block| {
        modified |= cursor::remove_matching(&mut block.stmts, |s| matcher::stmts_match(s, stmt));
    });
    modified
}

/// Insert a clone of `stmt` into the body of `function` at the normalized
/// position. Returns true iff the function was found.
pub fn insert_stmt_at(file: &mut syn::File, function: &str, stmt: &Stmt, pos: isize) -> bool {
    cursor::edit_fn_decls(file, function, |_, block| {
        cursor::insert_at(&mut block.stmts, stmt, pos);
    })
}

/// Insert `stmt` at the start of the body of `function`.
pub fn insert_stmt_start(file: &mut syn::File, function: &str, stmt: &Stmt) -> bool {
    insert_stmt_at(file, function, stmt, 0)
}

/// Insert `stmt` at the end of the body of `function`.
pub fn insert_stmt_end(file: &mut syn::File, function: &str, stmt: &Stmt) -> bool {
    insert_stmt_at(file, function, stmt, -1)
}

/// Insert a clone of `stmt` next to every body statement structurally equal
/// to `reference` (or only the first, under [`InsertPolicy::FirstMatch`]).
/// Returns true iff at least one reference statement matched.
pub fn insert_stmt_relative(
    file: &mut syn::File,
    function: &str,
    stmt: &Stmt,
    reference: &Stmt,
    direction: Direction,
    policy: InsertPolicy,
) -> bool {
    let mut modified = false;
    cursor::edit_fn_decls(file, function, |_, block| {
        modified |= cursor::insert_relative(
            &mut block.stmts,
            stmt,
            |s| matcher::stmts_match(s, reference),
            direction,
            policy,
        );
    });
    modified
}

/// Insert `stmt` before every occurrence of `reference` in the body of
/// `function`.
pub fn insert_stmt_before(
    file: &mut syn::File,
    function: &str,
    stmt: &Stmt,
    reference: &Stmt,
) -> bool {
    insert_stmt_relative(
        file,
        function,
        stmt,
        reference,
        Direction::Before,
        InsertPolicy::AllMatches,
    )
}

/// Insert `stmt` after every occurrence of `reference` in the body of
/// `function`.
pub fn insert_stmt_after(
    file: &mut syn::File,
    function: &str,
    stmt: &Stmt,
    reference: &Stmt,
) -> bool {
    insert_stmt_relative(
        file,
        function,
        stmt,
        reference,
        Direction::After,
        InsertPolicy::AllMatches,
    )
}

/// Does any closure literal inside `scope` contain a statement structurally
/// equal to `stmt` in its direct body? Expression-bodied closures carry no
/// statement list and never match.
pub fn has_closure_stmt(file: &syn::File, scope: &Scope, stmt: &Stmt) -> bool {
    let mut found = false;
    cursor::scan_closure_blocks(file, scope, |block| {
        found |= block.stmts.iter().any(|s| matcher::stmts_match(s, stmt));
    });
    found
}

/// Delete every statement structurally equal to `stmt` from the body of
/// every closure literal inside `scope`. Returns true iff at least one
/// statement was removed.
pub fn delete_closure_stmt(file: &mut syn::File, scope: &Scope, stmt: &Stmt) -> bool {
    let mut modified = false;
    cursor::edit_closure_blocks(file, scope, |block| {
        modified |= cursor::remove_matching(&mut block.stmts, |s| matcher::stmts_match(s, stmt));
    });
    modified
}

/// Insert a clone of `stmt` into the body of every block-bodied closure
/// literal inside `scope`, at the normalized position. Returns true iff at
/// least one closure body was found.
pub fn insert_closure_stmt_at(
    file: &mut syn::File,
    scope: &Scope,
    stmt: &Stmt,
    pos: isize,
) -> bool {
    cursor::edit_closure_blocks(file, scope, |block| {
        cursor::insert_at(&mut block.stmts, stmt, pos);
    })
}

/// Insert a clone of `stmt` next to every closure-body statement
/// structurally equal to `reference`. Returns true iff at least one
/// reference statement matched.
pub fn insert_closure_stmt_relative(
    file: &mut syn::File,
    scope: &Scope,
    stmt: &Stmt,
    reference: &Stmt,
    direction: Direction,
    policy: InsertPolicy,
) -> bool {
    let mut modified = false;
    cursor::edit_closure_blocks(file, scope, |block| {
        modified |= cursor::insert_relative(
            &mut block.stmts,
            stmt,
            |s| matcher::stmts_match(s, reference),
            direction,
            policy,
        );
    });
    modified
}

/// Delete every statement inside `scope` that invokes the qualified call
/// `pattern`, at any block depth, closure bodies included.
///
/// The whole enclosing statement goes, at the granularity of the block that
/// directly contains it: a `log.infof(..)` statement inside a closure is
/// removed from the closure body without touching the statement holding the
/// closure. Under a named scope, a fn nested inside the target is its own
/// scope and is left alone; an unrestricted scope reaches every body.
pub fn delete_call_statements(
    file: &mut syn::File,
    scope: &Scope,
    pattern: &CallPattern,
) -> bool {
    let mut purge = CallStmtPurge {
        pattern,
        unrestricted: scope.is_unrestricted(),
        modified: false,
    };
    cursor::edit_scoped_fn_blocks(file, scope, |block| {
        purge.visit_block_mut(block);
    });
    if purge.modified {
        debug!("deleted statements invoking {pattern}");
    }
    purge.modified
}

/// Removes, from every block it walks, the statements that invoke the
/// pattern outside any nested block.
struct CallStmtPurge<'a> {
    pattern: &'a CallPattern,
    unrestricted: bool,
    modified: bool,
}

impl VisitMut for CallStmtPurge<'_> {
    fn visit_block_mut(&mut self, block: &mut Block) {
        self.modified |=
            cursor::remove_matching(&mut block.stmts, |s| stmt_invokes(s, self.pattern));
        syn::visit_mut::visit_block_mut(self, block);
    }

    fn visit_item_fn_mut(&mut self, node: &mut syn::ItemFn) {
        // A nested named fn is its own scope; only an unrestricted purge
        // crosses into it.
        if self.unrestricted {
            syn::visit_mut::visit_item_fn_mut(self, node);
        }
    }

    fn visit_impl_item_fn_mut(&mut self, node: &mut syn::ImplItemFn) {
        if self.unrestricted {
            syn::visit_mut::visit_impl_item_fn_mut(self, node);
        }
    }
}

/// Does this statement invoke the pattern outside any nested block or
/// closure? Occurrences deeper down belong to the enclosing block at that
/// depth and are handled there.
fn stmt_invokes(stmt: &Stmt, pattern: &CallPattern) -> bool {
    let mut finder = ShallowCallFinder {
        pattern,
        found: false,
    };
    finder.visit_stmt(stmt);
    finder.found
}

struct ShallowCallFinder<'a> {
    pattern: &'a CallPattern,
    found: bool,
}

impl<'ast> Visit<'ast> for ShallowCallFinder<'_> {
    fn visit_expr_call(&mut self, node: &'ast syn::ExprCall) {
        if self.pattern.matches_call(node) {
            self.found = true;
            return;
        }
        syn::visit::visit_expr_call(self, node);
    }

    fn visit_expr_method_call(&mut self, node: &'ast syn::ExprMethodCall) {
        if self.pattern.matches_method_call(node) {
            self.found = true;
            return;
        }
        syn::visit::visit_expr_method_call(self, node);
    }

    fn visit_macro(&mut self, node: &'ast syn::Macro) {
        if self.pattern.matches_macro(node) {
            self.found = true;
        }
    }

    fn visit_block(&mut self, _node: &'ast Block) {
        // Statement granularity stops at block boundaries.
    }

    fn visit_expr_closure(&mut self, _node: &'ast syn::ExprClosure) {
        // Closure bodies are purged at their own block level.
    }

    fn visit_item_fn(&mut self, _node: &'ast syn::ItemFn) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source;

    fn file(code: &str) -> syn::File {
        syn::parse_str(code).unwrap()
    }

    fn stmt(code: &str) -> Stmt {
        syn::parse_str(code).unwrap()
    }

    fn assert_same_tree(actual: &syn::File, expected: &str) {
        assert_eq!(
            source::print_source(actual),
            source::print_source(&file(expected))
        );
    }

    const BODY: &str = r#"
        fn main() {
            let a = 1;
            let b = 1;
            println!("{}", a + b);
        }
    "#;

    #[test]
    fn has_stmt_finds_direct_body_statements() {
        let f = file(BODY);
        assert!(has_stmt(&f, "main", &stmt("let a = 1;")));
        assert!(has_stmt(&f, "main", &stmt("println!(\"{}\", a + b);")));
        assert!(!has_stmt(&f, "main", &stmt("let c = 1;")));
        assert!(!has_stmt(&f, "missing", &stmt("let a = 1;")));
    }

    #[test]
    fn has_stmt_ignores_nested_blocks() {
        let f = file("fn main() { if cond { let a = 1; } }");
        assert!(!has_stmt(&f, "main", &stmt("let a = 1;")));
        assert!(has_stmt(&f, "main", &stmt("if cond { let a = 1; }")));
    }

    #[test]
    fn delete_stmt_removes_and_is_idempotent() {
        let mut f = file(BODY);
        assert!(delete_stmt(&mut f, "main", &stmt("let b = 1;")));
        assert_same_tree(
            &f,
            r#"
            fn main() {
                let a = 1;
                println!("{}", a + b);
            }
            "#,
        );

        // Same call again: nothing left to remove, tree unchanged.
        let before = source::print_source(&f);
        assert!(!delete_stmt(&mut f, "main", &stmt("let b = 1;")));
        assert_eq!(source::print_source(&f), before);
    }

    #[test]
    fn delete_stmt_removes_every_match() {
        let mut f = file(
            r#"
            fn main() {
                let x = 9;
                let a = 1;
                let y = 8;
                let a = 1;
                let a = 1;
            }
            "#,
        );
        assert!(delete_stmt(&mut f, "main", &stmt("let a = 1;")));
        assert_same_tree(
            &f,
            r#"
            fn main() {
                let x = 9;
                let y = 8;
            }
            "#,
        );
    }

    #[test]
    fn exists_false_after_deleting_last_match() {
        let mut f = file(BODY);
        let target = stmt("let a = 1;");
        assert!(has_stmt(&f, "main", &target));
        assert!(delete_stmt(&mut f, "main", &target));
        assert!(!has_stmt(&f, "main", &target));
    }

    #[test]
    fn insert_stmt_at_start_and_end() {
        let mut f = file("fn main() { let a = 1; }");
        assert!(insert_stmt_start(&mut f, "main", &stmt("let first = 0;")));
        assert!(insert_stmt_end(&mut f, "main", &stmt("let last = 9;")));
        assert_same_tree(
            &f,
            r#"
            fn main() {
                let first = 0;
                let a = 1;
                let last = 9;
            }
            "#,
        );
    }

    #[test]
    fn insert_past_end_appends() {
        let mut f = file("fn main() { let a = 1; }");
        assert!(insert_stmt_at(&mut f, "main", &stmt("let z = 9;"), 42));
        assert_same_tree(
            &f,
            r#"
            fn main() {
                let a = 1;
                let z = 9;
            }
            "#,
        );
    }

    #[test]
    fn insert_into_missing_function_is_noop_false() {
        let mut f = file("fn main() {}");
        assert!(!insert_stmt_at(&mut f, "other", &stmt("let a = 1;"), 0));
        assert_same_tree(&f, "fn main() {}");
    }

    #[test]
    fn insert_then_delete_round_trips() {
        let mut f = file(BODY);
        let original = source::print_source(&f);
        let payload = stmt("let tmp = 7;");
        assert!(insert_stmt_at(&mut f, "main", &payload, 1));
        assert!(delete_stmt(&mut f, "main", &payload));
        assert_eq!(source::print_source(&f), original);
    }

    #[test]
    fn relative_insert_fires_on_every_match() {
        let mut f = file(
            r#"
            fn main() {
                let a = 1;
                let a = 1;
            }
            "#,
        );
        assert!(insert_stmt_before(
            &mut f,
            "main",
            &stmt("let n = 0;"),
            &stmt("let a = 1;"),
        ));
        assert_same_tree(
            &f,
            r#"
            fn main() {
                let n = 0;
                let a = 1;
                let n = 0;
                let a = 1;
            }
            "#,
        );
    }

    #[test]
    fn relative_insert_after_and_missing_reference() {
        let mut f = file("fn main() { let a = 1; let b = 2; }");
        assert!(insert_stmt_after(
            &mut f,
            "main",
            &stmt("let c = 3;"),
            &stmt("let a = 1;"),
        ));
        assert_same_tree(
            &f,
            r#"
            fn main() {
                let a = 1;
                let c = 3;
                let b = 2;
            }
            "#,
        );

        let before = source::print_source(&f);
        assert!(!insert_stmt_before(
            &mut f,
            "main",
            &stmt("let d = 4;"),
            &stmt("let missing = 0;"),
        ));
        assert_eq!(source::print_source(&f), before);
    }

    #[test]
    fn relative_insert_first_match_policy() {
        let mut f = file("fn main() { let a = 1; let a = 1; }");
        assert!(insert_stmt_relative(
            &mut f,
            "main",
            &stmt("let n = 0;"),
            &stmt("let a = 1;"),
            Direction::Before,
            InsertPolicy::FirstMatch,
        ));
        assert_same_tree(
            &f,
            r#"
            fn main() {
                let n = 0;
                let a = 1;
                let a = 1;
            }
            "#,
        );
    }

    #[test]
    fn edits_apply_to_methods() {
        let mut f = file(
            r#"
            struct Server;
            impl Server {
                fn run(&self) {
                    let a = 1;
                }
            }
            "#,
        );
        assert!(delete_stmt(&mut f, "run", &stmt("let a = 1;")));
        assert_same_tree(
            &f,
            r#"
            struct Server;
            impl Server {
                fn run(&self) {}
            }
            "#,
        );
    }

    #[test]
    fn closure_stmt_insert_at_start_of_body() {
        let mut f = file(
            r#"
            fn rpc() {
                with_client(|c| {
                    c.update();
                });
            }
            "#,
        );
        assert!(insert_closure_stmt_at(
            &mut f,
            &Scope::function("rpc"),
            &stmt("let started = now();"),
            0
        ));
        assert_same_tree(
            &f,
            r#"
            fn rpc() {
                with_client(|c| {
                    let started = now();
                    c.update();
                });
            }
            "#,
        );
    }

    #[test]
    fn closure_stmt_ops_skip_expression_bodies() {
        let mut f = file("fn main() { run(|c| c.update()); }");
        let before = source::print_source(&f);
        assert!(!insert_closure_stmt_at(
            &mut f,
            &Scope::Unrestricted,
            &stmt("let a = 1;"),
            0
        ));
        assert!(!has_closure_stmt(&f, &Scope::Unrestricted, &stmt("c.update();")));
        assert_eq!(source::print_source(&f), before);
    }

    #[test]
    fn closure_stmt_has_and_delete() {
        let mut f = file(
            r#"
            fn main() {
                run(|| {
                    audit();
                    work();
                });
            }
            "#,
        );
        let target = stmt("audit();");
        assert!(has_closure_stmt(&f, &Scope::function("main"), &target));
        assert!(!has_closure_stmt(&f, &Scope::function("other"), &target));
        assert!(delete_closure_stmt(&mut f, &Scope::function("main"), &target));
        assert_same_tree(
            &f,
            r#"
            fn main() {
                run(|| {
                    work();
                });
            }
            "#,
        );
        assert!(!has_closure_stmt(&f, &Scope::function("main"), &target));
    }

    #[test]
    fn closure_stmt_relative_insert() {
        let mut f = file(
            r#"
            fn main() {
                run(|| {
                    step();
                    step();
                });
            }
            "#,
        );
        assert!(insert_closure_stmt_relative(
            &mut f,
            &Scope::Unrestricted,
            &stmt("audit();"),
            &stmt("step();"),
            Direction::After,
            InsertPolicy::FirstMatch,
        ));
        assert_same_tree(
            &f,
            r#"
            fn main() {
                run(|| {
                    step();
                    audit();
                    step();
                });
            }
            "#,
        );
    }

    #[test]
    fn delete_call_statements_basic() {
        let mut f = file(
            r#"
            fn a() {
                fmt.printf("foo");
            }
            fn main() {
                fmt.println();
                fmt.printf("bar");
                fmt.printf("baz");
                fmt.println();
            }
            "#,
        );
        let pattern: CallPattern = "fmt.printf".parse().unwrap();
        assert!(delete_call_statements(
            &mut f,
            &Scope::function("main"),
            &pattern
        ));
        assert_same_tree(
            &f,
            r#"
            fn a() {
                fmt.printf("foo");
            }
            fn main() {
                fmt.println();
                fmt.println();
            }
            "#,
        );
    }

    #[test]
    fn delete_call_statements_reaches_closure_bodies() {
        // The logging statement sits inside a closure. Only that statement
        // goes; the statement holding the closure survives.
        let mut f = file(
            r#"
            fn hello() {
                let st = stime::new_time_stat();
                defer(|| {
                    let dur = st.duration();
                    log.infof("{} tm:{}", req, dur);
                    monitor.stat("rpc-hello", dur);
                });
            }
            "#,
        );
        let pattern: CallPattern = "log.infof".parse().unwrap();
        assert!(delete_call_statements(
            &mut f,
            &Scope::function("hello"),
            &pattern
        ));
        assert_same_tree(
            &f,
            r#"
            fn hello() {
                let st = stime::new_time_stat();
                defer(|| {
                    let dur = st.duration();
                    monitor.stat("rpc-hello", dur);
                });
            }
            "#,
        );
    }

    #[test]
    fn delete_call_statements_matches_macros() {
        let mut f = file(
            r#"
            fn main() {
                let a = 1;
                log::infof!("a = {}", a);
            }
            "#,
        );
        let pattern: CallPattern = "log::infof".parse().unwrap();
        assert!(delete_call_statements(
            &mut f,
            &Scope::Unrestricted,
            &pattern
        ));
        assert_same_tree(&f, "fn main() { let a = 1; }");
    }

    #[test]
    fn delete_call_statements_unrestricted_reaches_nested_fns() {
        let mut f = file(
            r#"
            fn outer() {
                fn inner() {
                    log.infof("nested");
                    work();
                }
                log.infof("outer");
                inner();
            }
            "#,
        );
        let pattern: CallPattern = "log.infof".parse().unwrap();
        assert!(delete_call_statements(
            &mut f,
            &Scope::Unrestricted,
            &pattern
        ));
        assert_same_tree(
            &f,
            r#"
            fn outer() {
                fn inner() {
                    work();
                }
                inner();
            }
            "#,
        );
    }

    #[test]
    fn delete_call_statements_named_scope_keeps_nested_fns() {
        let mut f = file(
            r#"
            fn outer() {
                fn inner() {
                    log.infof("nested");
                }
                log.infof("outer");
                inner();
            }
            "#,
        );
        let pattern: CallPattern = "log.infof".parse().unwrap();
        assert!(delete_call_statements(
            &mut f,
            &Scope::function("outer"),
            &pattern
        ));
        assert_same_tree(
            &f,
            r#"
            fn outer() {
                fn inner() {
                    log.infof("nested");
                }
                inner();
            }
            "#,
        );
    }

    #[test]
    fn delete_call_statements_missing_pattern_is_false() {
        let mut f = file("fn main() { let a = 1; }");
        let pattern: CallPattern = "log.infof".parse().unwrap();
        assert!(!delete_call_statements(
            &mut f,
            &Scope::Unrestricted,
            &pattern
        ));
    }
}
