use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use ast_refactor::config::EditPlan;
use ast_refactor::node::{Direction, InsertPolicy, Node};
use ast_refactor::scope::Scope;
use ast_refactor::{CallPattern, Result, args, params, source, stmts};

#[derive(Parser)]
#[command(
    name = "ast-refactor",
    about = "Structural find/delete/insert edits on Rust source files"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Common {
    /// Rust source file to operate on.
    file: PathBuf,

    /// Rewrite the file in place instead of printing to stdout.
    #[arg(long)]
    write: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether a fn body contains a statement.
    HasStmt {
        #[command(flatten)]
        common: Common,
        /// Name of the enclosing fn or method.
        function: String,
        /// Statement source, e.g. "let a = 1;".
        stmt: String,
    },
    /// Delete every matching statement from a fn body.
    DeleteStmt {
        #[command(flatten)]
        common: Common,
        function: String,
        stmt: String,
    },
    /// Insert a statement into a fn body.
    InsertStmt {
        #[command(flatten)]
        common: Common,
        function: String,
        stmt: String,
        /// Insertion index; negative or absent appends.
        #[arg(long, conflicts_with_all = ["before", "after"])]
        position: Option<isize>,
        /// Insert before every statement matching this source.
        #[arg(long, conflicts_with = "after")]
        before: Option<String>,
        /// Insert after every statement matching this source.
        #[arg(long)]
        after: Option<String>,
        /// With --before/--after, stop at the first matching reference.
        #[arg(long)]
        first_match: bool,
    },
    /// Check whether a fn signature contains a parameter.
    HasParam {
        #[command(flatten)]
        common: Common,
        function: String,
        /// Parameter source, e.g. "ctx: Context".
        param: String,
    },
    /// Delete every matching parameter from a fn signature.
    DeleteParam {
        #[command(flatten)]
        common: Common,
        function: String,
        param: String,
    },
    /// Insert a parameter into a fn signature.
    InsertParam {
        #[command(flatten)]
        common: Common,
        function: String,
        param: String,
        #[arg(long)]
        position: Option<isize>,
    },
    /// Check whether a call carries an argument.
    HasArg {
        #[command(flatten)]
        common: Common,
        /// Restrict to calls inside this fn.
        #[arg(long)]
        scope: Option<String>,
        /// Callee name: last path segment or method name.
        call: String,
        /// Argument source, e.g. "42" or "&buf".
        arg: String,
    },
    /// Delete every matching argument from every matching call.
    DeleteArg {
        #[command(flatten)]
        common: Common,
        #[arg(long)]
        scope: Option<String>,
        call: String,
        arg: String,
    },
    /// Insert an argument into every matching call.
    InsertArg {
        #[command(flatten)]
        common: Common,
        #[arg(long)]
        scope: Option<String>,
        call: String,
        arg: String,
        #[arg(long)]
        position: Option<isize>,
    },
    /// Insert a parameter into every closure literal in scope.
    InsertClosureParam {
        #[command(flatten)]
        common: Common,
        #[arg(long)]
        scope: Option<String>,
        /// Closure parameter source, e.g. "ctx".
        param: String,
        #[arg(long)]
        position: Option<isize>,
    },
    /// Delete every statement invoking a qualified call, e.g. "log.infof".
    DeleteCall {
        #[command(flatten)]
        common: Common,
        #[arg(long)]
        scope: Option<String>,
        /// Call pattern: "qualifier.member" or "qualifier::member".
        call: String,
    },
    /// Rename the callee of every matching call.
    SetMethodCall {
        #[command(flatten)]
        common: Common,
        #[arg(long)]
        scope: Option<String>,
        /// Call pattern: "qualifier.member" or "qualifier::member".
        call: String,
        /// New member name.
        to: String,
    },
    /// Insert a statement into every block-bodied closure in scope.
    InsertClosureStmt {
        #[command(flatten)]
        common: Common,
        #[arg(long)]
        scope: Option<String>,
        stmt: String,
        #[arg(long)]
        position: Option<isize>,
    },
    /// Delete every matching statement from every closure body in scope.
    DeleteClosureStmt {
        #[command(flatten)]
        common: Common,
        #[arg(long)]
        scope: Option<String>,
        stmt: String,
    },
    /// Apply a TOML edit plan to the file.
    Apply {
        #[command(flatten)]
        common: Common,
        /// Path to the plan file.
        #[arg(long)]
        plan: PathBuf,
    },
}

impl Command {
    fn common(&self) -> &Common {
        match self {
            Self::HasStmt { common, .. }
            | Self::DeleteStmt { common, .. }
            | Self::InsertStmt { common, .. }
            | Self::HasParam { common, .. }
            | Self::DeleteParam { common, .. }
            | Self::InsertParam { common, .. }
            | Self::HasArg { common, .. }
            | Self::DeleteArg { common, .. }
            | Self::InsertArg { common, .. }
            | Self::InsertClosureParam { common, .. }
            | Self::DeleteCall { common, .. }
            | Self::SetMethodCall { common, .. }
            | Self::InsertClosureStmt { common, .. }
            | Self::DeleteClosureStmt { common, .. }
            | Self::Apply { common, .. } => common,
        }
    }

    fn is_query(&self) -> bool {
        matches!(
            self,
            Self::HasStmt { .. } | Self::HasParam { .. } | Self::HasArg { .. }
        )
    }
}

fn scope_of(name: &Option<String>) -> Scope {
    match name {
        Some(name) => Scope::function(name.clone()),
        None => Scope::Unrestricted,
    }
}

fn parse_stmt(src: &str) -> Result<Box<syn::Stmt>> {
    match Node::stmt(src)? {
        Node::Stmt(stmt) => Ok(stmt),
        _ => unreachable!(),
    }
}

fn parse_param(src: &str) -> Result<Box<syn::FnArg>> {
    match Node::param(src)? {
        Node::Param(param) => Ok(param),
        _ => unreachable!(),
    }
}

fn parse_arg(src: &str) -> Result<Box<syn::Expr>> {
    match Node::arg(src)? {
        Node::Arg(arg) => Ok(arg),
        _ => unreachable!(),
    }
}

fn parse_pat(src: &str) -> Result<Box<syn::Pat>> {
    match Node::closure_param(src)? {
        Node::ClosureParam(pat) => Ok(pat),
        _ => unreachable!(),
    }
}

/// Run one command against the parsed file. Returns true when the command
/// found a match or modified the tree.
fn run(command: &Command, file: &mut syn::File) -> Result<bool> {
    match command {
        Command::HasStmt { function, stmt, .. } => {
            Ok(stmts::has_stmt(file, function, &*parse_stmt(stmt)?))
        }
        Command::DeleteStmt { function, stmt, .. } => {
            Ok(stmts::delete_stmt(file, function, &*parse_stmt(stmt)?))
        }
        Command::InsertStmt {
            function,
            stmt,
            position,
            before,
            after,
            first_match,
            ..
        } => {
            let stmt = parse_stmt(stmt)?;
            let policy = if *first_match {
                InsertPolicy::FirstMatch
            } else {
                InsertPolicy::AllMatches
            };
            let (reference, direction) = match (before, after) {
                (Some(reference), None) => (reference, Direction::Before),
                (None, Some(reference)) => (reference, Direction::After),
                _ => {
                    return Ok(stmts::insert_stmt_at(
                        file,
                        function,
                        &*stmt,
                        position.unwrap_or(-1),
                    ));
                }
            };
            Ok(stmts::insert_stmt_relative(
                file,
                function,
                &*stmt,
                &*parse_stmt(reference)?,
                direction,
                policy,
            ))
        }
        Command::HasParam {
            function, param, ..
        } => Ok(params::has_param(file, function, &*parse_param(param)?)),
        Command::DeleteParam {
            function, param, ..
        } => Ok(params::delete_param(file, function, &*parse_param(param)?)),
        Command::InsertParam {
            function,
            param,
            position,
            ..
        } => Ok(params::insert_param_at(
            file,
            function,
            &*parse_param(param)?,
            position.unwrap_or(-1),
        )),
        Command::HasArg {
            scope, call, arg, ..
        } => Ok(args::has_arg(
            file,
            &scope_of(scope),
            call,
            &*parse_arg(arg)?,
        )),
        Command::DeleteArg {
            scope, call, arg, ..
        } => Ok(args::delete_arg(
            file,
            &scope_of(scope),
            call,
            &*parse_arg(arg)?,
        )),
        Command::InsertArg {
            scope,
            call,
            arg,
            position,
            ..
        } => Ok(args::insert_arg_at(
            file,
            &scope_of(scope),
            call,
            &*parse_arg(arg)?,
            position.unwrap_or(-1),
        )),
        Command::InsertClosureParam {
            scope,
            param,
            position,
            ..
        } => Ok(params::insert_closure_param_at(
            file,
            &scope_of(scope),
            &*parse_pat(param)?,
            position.unwrap_or(-1),
        )),
        Command::DeleteCall { scope, call, .. } => {
            let pattern: CallPattern = call.parse()?;
            Ok(stmts::delete_call_statements(
                file,
                &scope_of(scope),
                &pattern,
            ))
        }
        Command::SetMethodCall {
            scope, call, to, ..
        } => {
            let pattern: CallPattern = call.parse()?;
            Ok(args::set_method_call(file, &scope_of(scope), &pattern, to))
        }
        Command::InsertClosureStmt {
            scope,
            stmt,
            position,
            ..
        } => Ok(stmts::insert_closure_stmt_at(
            file,
            &scope_of(scope),
            &*parse_stmt(stmt)?,
            position.unwrap_or(-1),
        )),
        Command::DeleteClosureStmt { scope, stmt, .. } => Ok(stmts::delete_closure_stmt(
            file,
            &scope_of(scope),
            &*parse_stmt(stmt)?,
        )),
        Command::Apply { plan, .. } => EditPlan::load(plan)?.apply(file),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let common = cli.command.common();

    let mut file = match source::parse_path(&common.file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    let matched = match run(&cli.command, &mut file) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    if cli.command.is_query() {
        println!("{}", if matched { "found" } else { "not found" });
    } else if common.write {
        if let Err(e) = source::write_path(&common.file, &file) {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    } else {
        print!("{}", source::print_source(&file));
    }

    if !matched {
        process::exit(1);
    }
}
