//! Reference nodes, operation targets, and match policies.

use std::fmt;
use std::str::FromStr;

use syn::parse::Parser;
use syn::{Expr, FnArg, Macro, Pat, Stmt};

use crate::error::{Error, Result};
use crate::scope::Scope;

/// A caller-supplied tree node: a match pattern, deletion target, or insertion
/// payload. The engine clones it before inserting, so the tree exclusively
/// owns everything it contains.
#[derive(Debug, Clone)]
pub enum Node {
    /// A statement in a fn body.
    Stmt(Box<Stmt>),
    /// A parameter of a named fn or method.
    Param(Box<FnArg>),
    /// An argument in a call expression.
    Arg(Box<Expr>),
    /// A parameter of a closure literal.
    ClosureParam(Box<Pat>),
}

impl Node {
    /// Parse a statement node from source text, e.g. `"let a = 1;"`.
    pub fn stmt(source: &str) -> Result<Self> {
        let stmt = syn::parse_str(source).map_err(|e| Error::pattern(source, e))?;
        Ok(Self::Stmt(Box::new(stmt)))
    }

    /// Parse a fn parameter from source text, e.g. `"ctx: Context"`.
    pub fn param(source: &str) -> Result<Self> {
        let param = syn::parse_str(source).map_err(|e| Error::pattern(source, e))?;
        Ok(Self::Param(Box::new(param)))
    }

    /// Parse a call argument from source text, e.g. `"42"` or `"&buf"`.
    pub fn arg(source: &str) -> Result<Self> {
        let arg = syn::parse_str(source).map_err(|e| Error::pattern(source, e))?;
        Ok(Self::Arg(Box::new(arg)))
    }

    /// Parse a closure parameter from source text, e.g. `"ctx"` or `"(a, b)"`.
    pub fn closure_param(source: &str) -> Result<Self> {
        let pat = Pat::parse_single
            .parse_str(source)
            .map_err(|e| Error::pattern(source, e))?;
        Ok(Self::ClosureParam(Box::new(pat)))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Stmt(_) => "statement",
            Self::Param(_) => "parameter",
            Self::Arg(_) => "argument",
            Self::ClosureParam(_) => "closure parameter",
        }
    }
}

/// What a generic operation aims at.
///
/// The node kind picks the list within the target: `Function` + `Stmt` edits
/// the body, `Function` + `Param` the parameter list, and so on. A mismatched
/// pair (say `Call` + `Stmt`) is a no-op, reported as `false`.
#[derive(Debug, Clone)]
pub enum Target {
    /// A named fn or impl method. Every declaration with that name is edited.
    Function(String),
    /// Call expressions whose callee name matches, within a scope. The callee
    /// is compared against a plain call's last path segment or a method call's
    /// method name.
    Call { scope: Scope, callee: String },
    /// Closure literals within a scope, matched positionally (closures have
    /// no name).
    Closures(Scope),
}

/// Which side of the reference entry a relative insertion lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Before,
    After,
}

/// How many structurally-equal reference entries a relative insertion fires
/// on. Deletion always removes every match; for insertion the multiplicity is
/// the caller's call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPolicy {
    #[default]
    AllMatches,
    FirstMatch,
}

/// A qualified call pattern: a receiver or module qualifier plus a member
/// name, written `"log.infof"` or `"log::infof"`.
///
/// Matches `qualifier.member(..)` method calls, `qualifier::member(..)` path
/// calls, and `qualifier::member!(..)` macro invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPattern {
    pub qualifier: String,
    pub member: String,
}

impl CallPattern {
    pub fn new(qualifier: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            qualifier: qualifier.into(),
            member: member.into(),
        }
    }

    /// Does this expression invoke the pattern? Looks only at the expression's
    /// own callee, not at sub-expressions.
    pub(crate) fn matches_expr(&self, expr: &Expr) -> bool {
        match expr {
            Expr::MethodCall(call) => self.matches_method_call(call),
            Expr::Call(call) => self.matches_call(call),
            _ => false,
        }
    }

    pub(crate) fn matches_call(&self, call: &syn::ExprCall) -> bool {
        match call.func.as_ref() {
            Expr::Path(p) => self.matches_path(&p.path),
            _ => false,
        }
    }

    pub(crate) fn matches_method_call(&self, call: &syn::ExprMethodCall) -> bool {
        if call.method != self.member.as_str() {
            return false;
        }
        match call.receiver.as_ref() {
            Expr::Path(p) => p.path.is_ident(self.qualifier.as_str()),
            _ => false,
        }
    }

    pub(crate) fn matches_macro(&self, mac: &Macro) -> bool {
        self.matches_path(&mac.path)
    }

    fn matches_path(&self, path: &syn::Path) -> bool {
        let mut segments = path.segments.iter().rev();
        let (Some(last), Some(prev)) = (segments.next(), segments.next()) else {
            return false;
        };
        last.ident == self.member.as_str() && prev.ident == self.qualifier.as_str()
    }
}

impl FromStr for CallPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (qualifier, member) = s
            .split_once("::")
            .or_else(|| s.split_once('.'))
            .ok_or_else(|| {
                Error::pattern(s, "expected `qualifier.member` or `qualifier::member`")
            })?;
        if qualifier.is_empty() || member.is_empty() || member.contains(['.', ':']) {
            return Err(Error::pattern(
                s,
                "expected exactly one qualifier and one member name",
            ));
        }
        Ok(Self::new(qualifier, member))
    }
}

impl fmt::Display for CallPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.qualifier, self.member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(code: &str) -> Expr {
        syn::parse_str(code).unwrap()
    }

    #[test]
    fn parses_each_node_kind() {
        assert!(matches!(Node::stmt("let a = 1;").unwrap(), Node::Stmt(_)));
        assert!(matches!(Node::param("x: i32").unwrap(), Node::Param(_)));
        assert!(matches!(Node::arg("x + 1").unwrap(), Node::Arg(_)));
        assert!(matches!(
            Node::closure_param("(a, b)").unwrap(),
            Node::ClosureParam(_)
        ));
    }

    #[test]
    fn bad_pattern_source_is_an_error() {
        assert!(matches!(
            Node::stmt("let = ;"),
            Err(Error::Pattern { .. })
        ));
    }

    #[test]
    fn call_pattern_parses_both_separators() {
        let a: CallPattern = "log.infof".parse().unwrap();
        let b: CallPattern = "log::infof".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.qualifier, "log");
        assert_eq!(a.member, "infof");
    }

    #[test]
    fn call_pattern_rejects_unqualified_names() {
        assert!("infof".parse::<CallPattern>().is_err());
        assert!("a.b.c".parse::<CallPattern>().is_err());
    }

    #[test]
    fn matches_method_and_path_calls() {
        let pattern = CallPattern::new("log", "infof");
        assert!(pattern.matches_expr(&expr("log.infof(\"x\")")));
        assert!(pattern.matches_expr(&expr("log::infof(\"x\")")));
        assert!(pattern.matches_expr(&expr("util::log::infof(\"x\")")));
        assert!(!pattern.matches_expr(&expr("log.warnf(\"x\")")));
        assert!(!pattern.matches_expr(&expr("other.infof(\"x\")")));
        assert!(!pattern.matches_expr(&expr("infof(\"x\")")));
    }

    #[test]
    fn matches_macro_paths() {
        let pattern = CallPattern::new("log", "infof");
        let mac: syn::ExprMacro = syn::parse_str("log::infof!(\"x\")").unwrap();
        assert!(pattern.matches_macro(&mac.mac));
        let other: syn::ExprMacro = syn::parse_str("log::warnf!(\"x\")").unwrap();
        assert!(!pattern.matches_macro(&other.mac));
    }
}
