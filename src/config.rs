//! TOML edit plans: a batch of refactoring operations loaded from a file.
//!
//! A plan is a list of `[[edit]]` tables, each tagged with an `op` and
//! carrying its patterns as Rust source strings:
//!
//! ```toml
//! [[edit]]
//! op = "delete-stmt"
//! function = "main"
//! stmt = "let a = 1;"
//!
//! [[edit]]
//! op = "insert-arg"
//! scope = "main"
//! call = "connect"
//! arg = "timeout"
//! position = 0
//! ```
//!
//! Absent `position` means append; absent `scope` means unrestricted.

use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::node::{CallPattern, Direction, InsertPolicy, Node};
use crate::scope::Scope;
use crate::{args, params, stmts};

#[derive(Debug, Deserialize)]
pub struct EditPlan {
    #[serde(default)]
    pub edit: Vec<EditSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case", deny_unknown_fields)]
pub enum EditSpec {
    DeleteStmt {
        function: String,
        stmt: String,
    },
    InsertStmt {
        function: String,
        stmt: String,
        #[serde(default)]
        position: Option<isize>,
        #[serde(default)]
        before: Option<String>,
        #[serde(default)]
        after: Option<String>,
    },
    DeleteParam {
        function: String,
        param: String,
    },
    InsertParam {
        function: String,
        param: String,
        #[serde(default)]
        position: Option<isize>,
    },
    DeleteArg {
        #[serde(default)]
        scope: Option<String>,
        call: String,
        arg: String,
    },
    InsertArg {
        #[serde(default)]
        scope: Option<String>,
        call: String,
        arg: String,
        #[serde(default)]
        position: Option<isize>,
    },
    InsertClosureParam {
        #[serde(default)]
        scope: Option<String>,
        param: String,
        #[serde(default)]
        position: Option<isize>,
    },
    DeleteCall {
        #[serde(default)]
        scope: Option<String>,
        call: String,
    },
    SetMethodCall {
        #[serde(default)]
        scope: Option<String>,
        call: String,
        to: String,
    },
    DeleteClosureStmt {
        #[serde(default)]
        scope: Option<String>,
        stmt: String,
    },
    InsertClosureStmt {
        #[serde(default)]
        scope: Option<String>,
        stmt: String,
        #[serde(default)]
        position: Option<isize>,
    },
}

impl EditPlan {
    /// Load a plan from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::PlanParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply every edit in order. Returns true iff any edit modified the
    /// tree; pattern parse failures abort with an error.
    pub fn apply(&self, file: &mut syn::File) -> Result<bool> {
        let mut modified = false;
        for edit in &self.edit {
            let changed = edit.apply(file)?;
            debug!("edit {edit:?} -> modified={changed}");
            modified |= changed;
        }
        Ok(modified)
    }
}

fn scope_from(name: &Option<String>) -> Scope {
    match name {
        Some(name) => Scope::function(name.clone()),
        None => Scope::Unrestricted,
    }
}

impl EditSpec {
    /// Apply a single edit, reporting whether the tree changed.
    pub fn apply(&self, file: &mut syn::File) -> Result<bool> {
        match self {
            Self::DeleteStmt { function, stmt } => {
                let Node::Stmt(stmt) = Node::stmt(stmt)? else {
                    unreachable!()
                };
                Ok(stmts::delete_stmt(file, function, &stmt))
            }
            Self::InsertStmt {
                function,
                stmt,
                position,
                before,
                after,
            } => {
                let Node::Stmt(stmt) = Node::stmt(stmt)? else {
                    unreachable!()
                };
                match (before, after) {
                    (Some(reference), None) => {
                        let Node::Stmt(reference) = Node::stmt(reference)? else {
                            unreachable!()
                        };
                        Ok(stmts::insert_stmt_relative(
                            file,
                            function,
                            &stmt,
                            &reference,
                            Direction::Before,
                            InsertPolicy::AllMatches,
                        ))
                    }
                    (None, Some(reference)) => {
                        let Node::Stmt(reference) = Node::stmt(reference)? else {
                            unreachable!()
                        };
                        Ok(stmts::insert_stmt_relative(
                            file,
                            function,
                            &stmt,
                            &reference,
                            Direction::After,
                            InsertPolicy::AllMatches,
                        ))
                    }
                    (None, None) => Ok(stmts::insert_stmt_at(
                        file,
                        function,
                        &stmt,
                        position.unwrap_or(-1),
                    )),
                    (Some(_), Some(_)) => Err(Error::pattern(
                        "insert-stmt",
                        "`before` and `after` are mutually exclusive",
                    )),
                }
            }
            Self::DeleteParam { function, param } => {
                let Node::Param(param) = Node::param(param)? else {
                    unreachable!()
                };
                Ok(params::delete_param(file, function, &param))
            }
            Self::InsertParam {
                function,
                param,
                position,
            } => {
                let Node::Param(param) = Node::param(param)? else {
                    unreachable!()
                };
                Ok(params::insert_param_at(
                    file,
                    function,
                    &param,
                    position.unwrap_or(-1),
                ))
            }
            Self::DeleteArg { scope, call, arg } => {
                let Node::Arg(arg) = Node::arg(arg)? else {
                    unreachable!()
                };
                Ok(args::delete_arg(file, &scope_from(scope), call, &arg))
            }
            Self::InsertArg {
                scope,
                call,
                arg,
                position,
            } => {
                let Node::Arg(arg) = Node::arg(arg)? else {
                    unreachable!()
                };
                Ok(args::insert_arg_at(
                    file,
                    &scope_from(scope),
                    call,
                    &arg,
                    position.unwrap_or(-1),
                ))
            }
            Self::InsertClosureParam {
                scope,
                param,
                position,
            } => {
                let Node::ClosureParam(param) = Node::closure_param(param)? else {
                    unreachable!()
                };
                Ok(params::insert_closure_param_at(
                    file,
                    &scope_from(scope),
                    &param,
                    position.unwrap_or(-1),
                ))
            }
            Self::DeleteCall { scope, call } => {
                let pattern: CallPattern = call.parse()?;
                Ok(stmts::delete_call_statements(
                    file,
                    &scope_from(scope),
                    &pattern,
                ))
            }
            Self::SetMethodCall { scope, call, to } => {
                let pattern: CallPattern = call.parse()?;
                Ok(args::set_method_call(
                    file,
                    &scope_from(scope),
                    &pattern,
                    to,
                ))
            }
            Self::DeleteClosureStmt { scope, stmt } => {
                let Node::Stmt(stmt) = Node::stmt(stmt)? else {
                    unreachable!()
                };
                Ok(stmts::delete_closure_stmt(file, &scope_from(scope), &stmt))
            }
            Self::InsertClosureStmt {
                scope,
                stmt,
                position,
            } => {
                let Node::Stmt(stmt) = Node::stmt(stmt)? else {
                    unreachable!()
                };
                Ok(stmts::insert_closure_stmt_at(
                    file,
                    &scope_from(scope),
                    &stmt,
                    position.unwrap_or(-1),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source;
    use std::fs;
    use tempfile::TempDir;

    fn plan_from(toml_text: &str) -> EditPlan {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plan.toml");
        fs::write(&path, toml_text).unwrap();
        EditPlan::load(&path).unwrap()
    }

    #[test]
    fn load_parses_tagged_edits() {
        let plan = plan_from(
            r#"
            [[edit]]
            op = "delete-stmt"
            function = "main"
            stmt = "let a = 1;"

            [[edit]]
            op = "insert-arg"
            scope = "main"
            call = "connect"
            arg = "timeout"
            position = 0
            "#,
        );
        assert_eq!(plan.edit.len(), 2);
        assert!(matches!(plan.edit[0], EditSpec::DeleteStmt { .. }));
        assert!(matches!(plan.edit[1], EditSpec::InsertArg { .. }));
    }

    #[test]
    fn empty_plan_is_valid_and_noop() {
        let plan = plan_from("");
        let mut f = syn::parse_str("fn main() {}").unwrap();
        assert!(!plan.apply(&mut f).unwrap());
    }

    #[test]
    fn unknown_op_is_a_plan_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plan.toml");
        fs::write(
            &path,
            r#"
            [[edit]]
            op = "explode"
            "#,
        )
        .unwrap();
        assert!(matches!(
            EditPlan::load(&path),
            Err(Error::PlanParse { .. })
        ));
    }

    #[test]
    fn apply_runs_edits_in_order() {
        let plan = plan_from(
            r#"
            [[edit]]
            op = "insert-stmt"
            function = "main"
            stmt = "let b = 2;"

            [[edit]]
            op = "insert-stmt"
            function = "main"
            stmt = "let c = 3;"
            after = "let b = 2;"
            "#,
        );
        let mut f = syn::parse_str("fn main() { let a = 1; }").unwrap();
        assert!(plan.apply(&mut f).unwrap());
        let expected: syn::File =
            syn::parse_str("fn main() { let a = 1; let b = 2; let c = 3; }").unwrap();
        assert_eq!(source::print_source(&f), source::print_source(&expected));
    }

    #[test]
    fn apply_reports_false_when_nothing_matches() {
        let plan = plan_from(
            r#"
            [[edit]]
            op = "delete-stmt"
            function = "missing"
            stmt = "let a = 1;"
            "#,
        );
        let mut f = syn::parse_str("fn main() { let a = 1; }").unwrap();
        assert!(!plan.apply(&mut f).unwrap());
    }

    #[test]
    fn bad_pattern_aborts_with_error() {
        let plan = plan_from(
            r#"
            [[edit]]
            op = "delete-stmt"
            function = "main"
            stmt = "let = broken"
            "#,
        );
        let mut f = syn::parse_str("fn main() {}").unwrap();
        assert!(matches!(plan.apply(&mut f), Err(Error::Pattern { .. })));
    }

    #[test]
    fn before_and_after_together_rejected() {
        let spec = EditSpec::InsertStmt {
            function: "main".into(),
            stmt: "let x = 1;".into(),
            position: None,
            before: Some("let a = 1;".into()),
            after: Some("let a = 1;".into()),
        };
        let mut f = syn::parse_str("fn main() { let a = 1; }").unwrap();
        assert!(spec.apply(&mut f).is_err());
    }

    #[test]
    fn set_method_call_and_closure_stmt_edits() {
        let plan = plan_from(
            r#"
            [[edit]]
            op = "set-method-call"
            call = "c.update_user"
            to = "update_user_v2"

            [[edit]]
            op = "insert-closure-stmt"
            scope = "rpc"
            stmt = "let started = now();"
            position = 0
            "#,
        );
        let mut f = syn::parse_str(
            r#"
            fn rpc() {
                with_client(|c| {
                    c.update_user(req);
                });
            }
            "#,
        )
        .unwrap();
        assert!(plan.apply(&mut f).unwrap());
        let expected: syn::File = syn::parse_str(
            r#"
            fn rpc() {
                with_client(|c| {
                    let started = now();
                    c.update_user_v2(req);
                });
            }
            "#,
        )
        .unwrap();
        assert_eq!(source::print_source(&f), source::print_source(&expected));
    }

    #[test]
    fn delete_call_edit_parses_pattern() {
        let plan = plan_from(
            r#"
            [[edit]]
            op = "delete-call"
            scope = "main"
            call = "log.infof"
            "#,
        );
        let mut f =
            syn::parse_str("fn main() { let a = 1; log.infof(\"{}\", a); }").unwrap();
        assert!(plan.apply(&mut f).unwrap());
        let expected: syn::File = syn::parse_str("fn main() { let a = 1; }").unwrap();
        assert_eq!(source::print_source(&f), source::print_source(&expected));
    }
}
