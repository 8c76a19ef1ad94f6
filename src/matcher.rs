//! Structural equality over syntax-tree nodes.
//!
//! Two nodes match when their tags, leaf values, and ordered children are
//! equal. Source spans never participate (syn's `PartialEq` ignores them),
//! formatting is gone after parsing, and comments are stripped before the
//! comparison: doc comments are the only comment form that survives into the
//! tree, as `#[doc]` attributes. Every other attribute is semantic and stays
//! significant.

use syn::visit_mut::VisitMut;
use syn::{Attribute, Expr, FnArg, Item, Pat, Stmt};

use crate::node::Node;

/// Structural equality between two statements.
pub fn stmts_match(a: &Stmt, b: &Stmt) -> bool {
    scrubbed_eq(a, b)
}

/// Structural equality between two expressions (including call arguments).
pub fn exprs_match(a: &Expr, b: &Expr) -> bool {
    scrubbed_eq(a, b)
}

/// Structural equality between two fn parameters.
pub fn params_match(a: &FnArg, b: &FnArg) -> bool {
    scrubbed_eq(a, b)
}

/// Structural equality between two patterns (closure parameters).
pub fn pats_match(a: &Pat, b: &Pat) -> bool {
    scrubbed_eq(a, b)
}

/// Structural equality between two reference nodes. Nodes of different kinds
/// never match.
pub fn nodes_match(a: &Node, b: &Node) -> bool {
    match (a, b) {
        (Node::Stmt(x), Node::Stmt(y)) => stmts_match(x, y),
        (Node::Param(x), Node::Param(y)) => params_match(x, y),
        (Node::Arg(x), Node::Arg(y)) => exprs_match(x, y),
        (Node::ClosureParam(x), Node::ClosureParam(y)) => pats_match(x, y),
        _ => false,
    }
}

trait Scrub: Clone + PartialEq {
    fn scrub(&mut self, scrubber: &mut CommentScrubber);
}

impl Scrub for Stmt {
    fn scrub(&mut self, scrubber: &mut CommentScrubber) {
        scrubber.visit_stmt_mut(self);
    }
}

impl Scrub for Expr {
    fn scrub(&mut self, scrubber: &mut CommentScrubber) {
        scrubber.visit_expr_mut(self);
    }
}

impl Scrub for FnArg {
    fn scrub(&mut self, scrubber: &mut CommentScrubber) {
        scrubber.visit_fn_arg_mut(self);
    }
}

impl Scrub for Pat {
    fn scrub(&mut self, scrubber: &mut CommentScrubber) {
        scrubber.visit_pat_mut(self);
    }
}

fn scrubbed_eq<T: Scrub>(a: &T, b: &T) -> bool {
    if a == b {
        return true;
    }
    let mut scrubber = CommentScrubber;
    let mut a = a.clone();
    let mut b = b.clone();
    a.scrub(&mut scrubber);
    b.scrub(&mut scrubber);
    a == b
}

fn strip_doc_attrs(attrs: &mut Vec<Attribute>) {
    attrs.retain(|attr| !attr.path().is_ident("doc"));
}

/// Removes doc-comment attributes from every attribute-bearing node it walks.
struct CommentScrubber;

impl VisitMut for CommentScrubber {
    fn visit_expr_mut(&mut self, node: &mut Expr) {
        if let Some(attrs) = expr_attrs_mut(node) {
            strip_doc_attrs(attrs);
        }
        syn::visit_mut::visit_expr_mut(self, node);
    }

    fn visit_pat_mut(&mut self, node: &mut Pat) {
        if let Some(attrs) = pat_attrs_mut(node) {
            strip_doc_attrs(attrs);
        }
        syn::visit_mut::visit_pat_mut(self, node);
    }

    fn visit_item_mut(&mut self, node: &mut Item) {
        if let Some(attrs) = item_attrs_mut(node) {
            strip_doc_attrs(attrs);
        }
        syn::visit_mut::visit_item_mut(self, node);
    }

    fn visit_local_mut(&mut self, node: &mut syn::Local) {
        strip_doc_attrs(&mut node.attrs);
        syn::visit_mut::visit_local_mut(self, node);
    }

    fn visit_stmt_macro_mut(&mut self, node: &mut syn::StmtMacro) {
        strip_doc_attrs(&mut node.attrs);
        syn::visit_mut::visit_stmt_macro_mut(self, node);
    }

    fn visit_receiver_mut(&mut self, node: &mut syn::Receiver) {
        strip_doc_attrs(&mut node.attrs);
        syn::visit_mut::visit_receiver_mut(self, node);
    }

    fn visit_pat_type_mut(&mut self, node: &mut syn::PatType) {
        strip_doc_attrs(&mut node.attrs);
        syn::visit_mut::visit_pat_type_mut(self, node);
    }

    fn visit_arm_mut(&mut self, node: &mut syn::Arm) {
        strip_doc_attrs(&mut node.attrs);
        syn::visit_mut::visit_arm_mut(self, node);
    }

    fn visit_field_value_mut(&mut self, node: &mut syn::FieldValue) {
        strip_doc_attrs(&mut node.attrs);
        syn::visit_mut::visit_field_value_mut(self, node);
    }

    fn visit_field_pat_mut(&mut self, node: &mut syn::FieldPat) {
        strip_doc_attrs(&mut node.attrs);
        syn::visit_mut::visit_field_pat_mut(self, node);
    }

    fn visit_field_mut(&mut self, node: &mut syn::Field) {
        strip_doc_attrs(&mut node.attrs);
        syn::visit_mut::visit_field_mut(self, node);
    }

    fn visit_variant_mut(&mut self, node: &mut syn::Variant) {
        strip_doc_attrs(&mut node.attrs);
        syn::visit_mut::visit_variant_mut(self, node);
    }

    fn visit_bare_fn_arg_mut(&mut self, node: &mut syn::BareFnArg) {
        strip_doc_attrs(&mut node.attrs);
        syn::visit_mut::visit_bare_fn_arg_mut(self, node);
    }

    fn visit_lifetime_param_mut(&mut self, node: &mut syn::LifetimeParam) {
        strip_doc_attrs(&mut node.attrs);
        syn::visit_mut::visit_lifetime_param_mut(self, node);
    }

    fn visit_type_param_mut(&mut self, node: &mut syn::TypeParam) {
        strip_doc_attrs(&mut node.attrs);
        syn::visit_mut::visit_type_param_mut(self, node);
    }

    fn visit_const_param_mut(&mut self, node: &mut syn::ConstParam) {
        strip_doc_attrs(&mut node.attrs);
        syn::visit_mut::visit_const_param_mut(self, node);
    }
}

fn expr_attrs_mut(expr: &mut Expr) -> Option<&mut Vec<Attribute>> {
    match expr {
        Expr::Array(e) => Some(&mut e.attrs),
        Expr::Assign(e) => Some(&mut e.attrs),
        Expr::Async(e) => Some(&mut e.attrs),
        Expr::Await(e) => Some(&mut e.attrs),
        Expr::Binary(e) => Some(&mut e.attrs),
        Expr::Block(e) => Some(&mut e.attrs),
        Expr::Break(e) => Some(&mut e.attrs),
        Expr::Call(e) => Some(&mut e.attrs),
        Expr::Cast(e) => Some(&mut e.attrs),
        Expr::Closure(e) => Some(&mut e.attrs),
        Expr::Const(e) => Some(&mut e.attrs),
        Expr::Continue(e) => Some(&mut e.attrs),
        Expr::Field(e) => Some(&mut e.attrs),
        Expr::ForLoop(e) => Some(&mut e.attrs),
        Expr::Group(e) => Some(&mut e.attrs),
        Expr::If(e) => Some(&mut e.attrs),
        Expr::Index(e) => Some(&mut e.attrs),
        Expr::Infer(e) => Some(&mut e.attrs),
        Expr::Let(e) => Some(&mut e.attrs),
        Expr::Lit(e) => Some(&mut e.attrs),
        Expr::Loop(e) => Some(&mut e.attrs),
        Expr::Macro(e) => Some(&mut e.attrs),
        Expr::Match(e) => Some(&mut e.attrs),
        Expr::MethodCall(e) => Some(&mut e.attrs),
        Expr::Paren(e) => Some(&mut e.attrs),
        Expr::Path(e) => Some(&mut e.attrs),
        Expr::Range(e) => Some(&mut e.attrs),
        Expr::Reference(e) => Some(&mut e.attrs),
        Expr::Repeat(e) => Some(&mut e.attrs),
        Expr::Return(e) => Some(&mut e.attrs),
        Expr::Struct(e) => Some(&mut e.attrs),
        Expr::Try(e) => Some(&mut e.attrs),
        Expr::TryBlock(e) => Some(&mut e.attrs),
        Expr::Tuple(e) => Some(&mut e.attrs),
        Expr::Unary(e) => Some(&mut e.attrs),
        Expr::Unsafe(e) => Some(&mut e.attrs),
        Expr::While(e) => Some(&mut e.attrs),
        Expr::Yield(e) => Some(&mut e.attrs),
        Expr::Verbatim(_) => None,
        _ => None,
    }
}

fn pat_attrs_mut(pat: &mut Pat) -> Option<&mut Vec<Attribute>> {
    match pat {
        Pat::Const(p) => Some(&mut p.attrs),
        Pat::Ident(p) => Some(&mut p.attrs),
        Pat::Lit(p) => Some(&mut p.attrs),
        Pat::Macro(p) => Some(&mut p.attrs),
        Pat::Or(p) => Some(&mut p.attrs),
        Pat::Paren(p) => Some(&mut p.attrs),
        Pat::Path(p) => Some(&mut p.attrs),
        Pat::Range(p) => Some(&mut p.attrs),
        Pat::Reference(p) => Some(&mut p.attrs),
        Pat::Rest(p) => Some(&mut p.attrs),
        Pat::Slice(p) => Some(&mut p.attrs),
        Pat::Struct(p) => Some(&mut p.attrs),
        Pat::Tuple(p) => Some(&mut p.attrs),
        Pat::TupleStruct(p) => Some(&mut p.attrs),
        Pat::Type(p) => Some(&mut p.attrs),
        Pat::Wild(p) => Some(&mut p.attrs),
        Pat::Verbatim(_) => None,
        _ => None,
    }
}

fn item_attrs_mut(item: &mut Item) -> Option<&mut Vec<Attribute>> {
    match item {
        Item::Const(i) => Some(&mut i.attrs),
        Item::Enum(i) => Some(&mut i.attrs),
        Item::ExternCrate(i) => Some(&mut i.attrs),
        Item::Fn(i) => Some(&mut i.attrs),
        Item::ForeignMod(i) => Some(&mut i.attrs),
        Item::Impl(i) => Some(&mut i.attrs),
        Item::Macro(i) => Some(&mut i.attrs),
        Item::Mod(i) => Some(&mut i.attrs),
        Item::Static(i) => Some(&mut i.attrs),
        Item::Struct(i) => Some(&mut i.attrs),
        Item::Trait(i) => Some(&mut i.attrs),
        Item::TraitAlias(i) => Some(&mut i.attrs),
        Item::Type(i) => Some(&mut i.attrs),
        Item::Union(i) => Some(&mut i.attrs),
        Item::Use(i) => Some(&mut i.attrs),
        Item::Verbatim(_) => None,
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(code: &str) -> Stmt {
        syn::parse_str(code).unwrap()
    }

    fn expr(code: &str) -> Expr {
        syn::parse_str(code).unwrap()
    }

    #[test]
    fn identical_statements_match() {
        assert!(stmts_match(&stmt("let a = 1;"), &stmt("let a = 1;")));
    }

    #[test]
    fn formatting_is_ignored() {
        assert!(stmts_match(&stmt("let a=1;"), &stmt("let  a  =  1 ;")));
    }

    #[test]
    fn doc_comments_are_ignored() {
        assert!(stmts_match(
            &stmt("/// scratch counter\nlet a = 1;"),
            &stmt("let a = 1;"),
        ));
    }

    #[test]
    fn nested_doc_comments_are_ignored() {
        // The doc comment sits on an item two levels down.
        assert!(stmts_match(
            &stmt("fn helper() { /** inner */ fn deep() {} }"),
            &stmt("fn helper() { fn deep() {} }"),
        ));
    }

    #[test]
    fn semantic_attributes_stay_significant() {
        assert!(!stmts_match(
            &stmt("#[allow(unused)] let a = 1;"),
            &stmt("let a = 1;"),
        ));
    }

    #[test]
    fn different_names_do_not_match() {
        assert!(!stmts_match(&stmt("let a = 1;"), &stmt("let b = 1;")));
    }

    #[test]
    fn different_literals_do_not_match() {
        assert!(!exprs_match(&expr("f(1)"), &expr("f(2)")));
        assert!(!exprs_match(&expr("\"hello\""), &expr("\"world\"")));
    }

    #[test]
    fn macro_invocations_compare_by_tokens() {
        assert!(stmts_match(
            &stmt("println!(\"{}\", a + b);"),
            &stmt("println!(\"{}\", a  +  b);"),
        ));
        assert!(!stmts_match(
            &stmt("println!(\"{}\", a + b);"),
            &stmt("println!(\"{}\", a - b);"),
        ));
    }

    #[test]
    fn params_compare_structurally() {
        let a: FnArg = syn::parse_str("ctx: Context").unwrap();
        let b: FnArg = syn::parse_str("ctx:  Context").unwrap();
        let c: FnArg = syn::parse_str("ctx: OtherContext").unwrap();
        assert!(params_match(&a, &b));
        assert!(!params_match(&a, &c));
    }

    #[test]
    fn node_kinds_never_cross_match() {
        let a = Node::Arg(Box::new(expr("a")));
        let b = Node::ClosureParam(Box::new(syn::Pat::Path(match expr("a") {
            Expr::Path(p) => p,
            _ => unreachable!(),
        })));
        assert!(!nodes_match(&a, &b));
    }

    #[test]
    fn comparison_has_no_side_effects() {
        let original = stmt("/// doc\nlet a = 1;");
        let copy = original.clone();
        let _ = stmts_match(&original, &stmt("let a = 1;"));
        assert_eq!(original, copy);
    }
}
