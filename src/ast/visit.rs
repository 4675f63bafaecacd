//! The Enter/Leave tree-rewriting visitor.
//!
//! Unlike a typical Rust visitor trait, each callback both receives and
//! returns a node: a visitor may replace a node with a different one of the
//! same position as it passes through. `enter` additionally signals whether
//! to skip walking into the node's children (useful for a visitor that wants
//! to replace a whole subtree rather than rewrite it piecewise), and `leave`
//! signals whether the whole walk should abort by returning `ok = false`.
//! Once a callback returns `ok = false`, [`accept`] stops descending into
//! any remaining siblings or ancestors and the `false` propagates straight
//! up to the original caller.

use super::clause::{ReadingClause, ReturnBody, ReturnItems, SetClause, SetItem, UpdatingClause};
use super::expression::{Atom, Expr, ListOperationKind, Literal};
use super::pattern::{NodePattern, Pattern, PatternElement, PatternPart, Properties, RelationshipPattern};
use super::query::{CypherStatement, QueryPart, RegularQuery, SingleQuery, UnionClause};

/// A node in the walkable tree. Leaf values with no children of interest to
/// a visitor (variables, literal scalars, schema names) are reached as
/// fields of their parent rather than wrapped here.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Statement(CypherStatement),
    RegularQuery(RegularQuery),
    SingleQuery(SingleQuery),
    UnionClause(UnionClause),
    QueryPart(QueryPart),
    ReadingClause(ReadingClause),
    UpdatingClause(UpdatingClause),
    WithClause(super::clause::WithClause),
    ReturnClause(super::clause::ReturnClause),
    Pattern(Pattern),
    PatternPart(PatternPart),
    PatternElement(PatternElement),
    NodePattern(NodePattern),
    RelationshipPattern(RelationshipPattern),
    Expr(Expr),
}

/// Implemented by anything that wants to observe or rewrite a tree during
/// [`accept`]. Both methods default to a no-op pass-through so a visitor
/// only needs to override the cases it cares about.
pub trait Visitor {
    /// Called on the way down. Returning `skip_children = true` prevents
    /// `accept` from walking into this node's children at all; `leave` is
    /// still called afterwards.
    fn enter(&mut self, node: Node) -> (Node, bool) {
        (node, false)
    }

    /// Called on the way back up, after children (unless skipped). Returning
    /// `ok = false` aborts the remainder of the walk.
    fn leave(&mut self, node: Node) -> (Node, bool) {
        (node, true)
    }
}

/// Walks `node` with `visitor`, returning the (possibly rewritten) node and
/// whether the walk completed without being aborted.
pub fn accept(node: Node, visitor: &mut dyn Visitor) -> (Node, bool) {
    let (node, skip_children) = visitor.enter(node);
    if skip_children {
        return visitor.leave(node);
    }
    let (node, ok) = walk_children(node, visitor);
    if !ok {
        return (node, false);
    }
    visitor.leave(node)
}

macro_rules! descend {
    ($visitor:expr, $child:expr, $wrap:path, $unwrap:path) => {{
        let (new_child, ok) = accept($wrap($child), $visitor);
        if !ok {
            return (new_child, false);
        }
        match new_child {
            $unwrap(inner) => inner,
            other => return (other, false),
        }
    }};
}

/// The projection body shared by `RETURN` and `WITH`: items, `ORDER BY`,
/// `SKIP`, `LIMIT`, all in source order.
macro_rules! descend_return_body {
    ($visitor:expr, $body:expr) => {{
        let mut body: ReturnBody = $body;
        body.items = match body.items {
            ReturnItems::Explicit(items) => {
                let mut walked = Vec::with_capacity(items.len());
                for mut item in items {
                    item.expr = descend!($visitor, item.expr, Node::Expr, Node::Expr);
                    walked.push(item);
                }
                ReturnItems::Explicit(walked)
            }
            all @ ReturnItems::All => all,
        };
        let mut order_by = Vec::with_capacity(body.order_by.len());
        for mut sort in body.order_by {
            sort.expr = descend!($visitor, sort.expr, Node::Expr, Node::Expr);
            order_by.push(sort);
        }
        body.order_by = order_by;
        if let Some(skip) = body.skip {
            body.skip = Some(descend!($visitor, skip, Node::Expr, Node::Expr));
        }
        if let Some(limit) = body.limit {
            body.limit = Some(descend!($visitor, limit, Node::Expr, Node::Expr));
        }
        body
    }};
}

macro_rules! descend_set_clause {
    ($visitor:expr, $set:expr) => {{
        let mut set: SetClause = $set;
        let mut items = Vec::with_capacity(set.items.len());
        for item in set.items {
            items.push(match item {
                SetItem::Property { target, value } => SetItem::Property {
                    target,
                    value: descend!($visitor, value, Node::Expr, Node::Expr),
                },
                SetItem::VariableAssignment {
                    variable,
                    value,
                    mode,
                } => SetItem::VariableAssignment {
                    variable,
                    value: descend!($visitor, value, Node::Expr, Node::Expr),
                    mode,
                },
                labels @ SetItem::VariableLabels { .. } => labels,
            });
        }
        set.items = items;
        set
    }};
}

/// The `{...}` property map on a node or relationship pattern. A parameter
/// in that position is a leaf.
macro_rules! descend_properties {
    ($visitor:expr, $props:expr) => {{
        match $props {
            Some(Properties::Map { entries, span }) => {
                let mut walked = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    walked.push((key, descend!($visitor, value, Node::Expr, Node::Expr)));
                }
                Some(Properties::Map {
                    entries: walked,
                    span,
                })
            }
            other => other,
        }
    }};
}

fn walk_children(node: Node, visitor: &mut dyn Visitor) -> (Node, bool) {
    match node {
        Node::Statement(stmt) => match stmt {
            CypherStatement::Query(q) => {
                let q = descend!(visitor, q, Node::RegularQuery, Node::RegularQuery);
                (Node::Statement(CypherStatement::Query(q)), true)
            }
            CypherStatement::StandaloneCall(_) => (Node::Statement(stmt), true),
        },
        Node::RegularQuery(mut rq) => {
            rq.query = descend!(visitor, rq.query, Node::SingleQuery, Node::SingleQuery);
            let mut unions = Vec::with_capacity(rq.unions.len());
            for union in rq.unions {
                let union = descend!(visitor, union, Node::UnionClause, Node::UnionClause);
                unions.push(union);
            }
            rq.unions = unions;
            (Node::RegularQuery(rq), true)
        }
        Node::UnionClause(mut u) => {
            u.query = descend!(visitor, u.query, Node::SingleQuery, Node::SingleQuery);
            (Node::UnionClause(u), true)
        }
        Node::SingleQuery(mut sq) => {
            let mut parts = Vec::with_capacity(sq.parts.len());
            for part in sq.parts {
                let part = descend!(visitor, part, Node::QueryPart, Node::QueryPart);
                parts.push(part);
            }
            sq.parts = parts;
            if let Some(ret) = sq.return_clause {
                sq.return_clause = Some(descend!(
                    visitor,
                    ret,
                    Node::ReturnClause,
                    Node::ReturnClause
                ));
            }
            (Node::SingleQuery(sq), true)
        }
        Node::QueryPart(mut part) => {
            let mut reading = Vec::with_capacity(part.reading_clauses.len());
            for rc in part.reading_clauses {
                let rc = descend!(visitor, rc, Node::ReadingClause, Node::ReadingClause);
                reading.push(rc);
            }
            part.reading_clauses = reading;
            let mut updating = Vec::with_capacity(part.updating_clauses.len());
            for uc in part.updating_clauses {
                let uc = descend!(visitor, uc, Node::UpdatingClause, Node::UpdatingClause);
                updating.push(uc);
            }
            part.updating_clauses = updating;
            if let Some(with) = part.with {
                part.with = Some(descend!(visitor, with, Node::WithClause, Node::WithClause));
            }
            (Node::QueryPart(part), true)
        }
        Node::ReadingClause(rc) => match rc {
            ReadingClause::Match(mut m) => {
                m.pattern = descend!(visitor, m.pattern, Node::Pattern, Node::Pattern);
                if let Some(expr) = m.where_expr {
                    m.where_expr = Some(descend!(visitor, expr, Node::Expr, Node::Expr));
                }
                (Node::ReadingClause(ReadingClause::Match(m)), true)
            }
            ReadingClause::Unwind(mut u) => {
                u.expr = descend!(visitor, u.expr, Node::Expr, Node::Expr);
                (Node::ReadingClause(ReadingClause::Unwind(u)), true)
            }
        },
        Node::UpdatingClause(uc) => match uc {
            UpdatingClause::Create(mut c) => {
                c.pattern = descend!(visitor, c.pattern, Node::Pattern, Node::Pattern);
                (Node::UpdatingClause(UpdatingClause::Create(c)), true)
            }
            UpdatingClause::Merge(mut m) => {
                m.pattern_part =
                    descend!(visitor, m.pattern_part, Node::PatternPart, Node::PatternPart);
                let mut actions = Vec::with_capacity(m.actions.len());
                for mut action in m.actions {
                    action.set = descend_set_clause!(visitor, action.set);
                    actions.push(action);
                }
                m.actions = actions;
                (Node::UpdatingClause(UpdatingClause::Merge(m)), true)
            }
            UpdatingClause::Set(set) => {
                let set = descend_set_clause!(visitor, set);
                (Node::UpdatingClause(UpdatingClause::Set(set)), true)
            }
            UpdatingClause::Delete(mut d) => {
                let mut exprs = Vec::with_capacity(d.exprs.len());
                for e in d.exprs {
                    exprs.push(descend!(visitor, e, Node::Expr, Node::Expr));
                }
                d.exprs = exprs;
                (Node::UpdatingClause(UpdatingClause::Delete(d)), true)
            }
            other => (Node::UpdatingClause(other), true),
        },
        Node::WithClause(mut w) => {
            w.body = descend_return_body!(visitor, w.body);
            if let Some(expr) = w.where_expr {
                w.where_expr = Some(descend!(visitor, expr, Node::Expr, Node::Expr));
            }
            (Node::WithClause(w), true)
        }
        Node::ReturnClause(mut rc) => {
            rc.body = descend_return_body!(visitor, rc.body);
            (Node::ReturnClause(rc), true)
        }
        Node::Pattern(mut p) => {
            let mut parts = Vec::with_capacity(p.parts.len());
            for part in p.parts {
                parts.push(descend!(visitor, part, Node::PatternPart, Node::PatternPart));
            }
            p.parts = parts;
            (Node::Pattern(p), true)
        }
        Node::PatternPart(mut pp) => {
            pp.element = descend!(visitor, pp.element, Node::PatternElement, Node::PatternElement);
            (Node::PatternPart(pp), true)
        }
        Node::PatternElement(mut pe) => {
            let mut nodes = Vec::with_capacity(pe.nodes.len());
            for n in pe.nodes {
                nodes.push(descend!(visitor, n, Node::NodePattern, Node::NodePattern));
            }
            pe.nodes = nodes;
            let mut rels = Vec::with_capacity(pe.relationships.len());
            for r in pe.relationships {
                rels.push(descend!(
                    visitor,
                    r,
                    Node::RelationshipPattern,
                    Node::RelationshipPattern
                ));
            }
            pe.relationships = rels;
            (Node::PatternElement(pe), true)
        }
        Node::NodePattern(mut n) => {
            n.properties = descend_properties!(visitor, n.properties);
            (Node::NodePattern(n), true)
        }
        Node::RelationshipPattern(mut r) => {
            r.properties = descend_properties!(visitor, r.properties);
            (Node::RelationshipPattern(r), true)
        }
        Node::Expr(expr) => walk_expr_children(expr, visitor),
    }
}

fn walk_expr_children(expr: Expr, visitor: &mut dyn Visitor) -> (Node, bool) {
    match expr {
        Expr::Binary(mut b) => {
            b.left = Box::new(descend!(visitor, *b.left, Node::Expr, Node::Expr));
            b.right = Box::new(descend!(visitor, *b.right, Node::Expr, Node::Expr));
            (Node::Expr(Expr::Binary(b)), true)
        }
        Expr::Unary(mut u) => {
            u.operand = Box::new(descend!(visitor, *u.operand, Node::Expr, Node::Expr));
            (Node::Expr(Expr::Unary(u)), true)
        }
        Expr::Predication(mut p) => {
            p.expr = Box::new(descend!(visitor, *p.expr, Node::Expr, Node::Expr));
            (Node::Expr(Expr::Predication(p)), true)
        }
        Expr::StringOp(mut s) => {
            s.lhs = Box::new(descend!(visitor, *s.lhs, Node::Expr, Node::Expr));
            s.rhs = Box::new(descend!(visitor, *s.rhs, Node::Expr, Node::Expr));
            (Node::Expr(Expr::StringOp(s)), true)
        }
        Expr::ListOp(mut l) => {
            l.expr = Box::new(descend!(visitor, *l.expr, Node::Expr, Node::Expr));
            l.kind = match l.kind {
                ListOperationKind::In(e) => {
                    ListOperationKind::In(Box::new(descend!(visitor, *e, Node::Expr, Node::Expr)))
                }
                ListOperationKind::Index(e) => ListOperationKind::Index(Box::new(descend!(
                    visitor,
                    *e,
                    Node::Expr,
                    Node::Expr
                ))),
                ListOperationKind::Range { lower, upper } => {
                    let lower = match lower {
                        Some(e) => Some(Box::new(descend!(visitor, *e, Node::Expr, Node::Expr))),
                        None => None,
                    };
                    let upper = match upper {
                        Some(e) => Some(Box::new(descend!(visitor, *e, Node::Expr, Node::Expr))),
                        None => None,
                    };
                    ListOperationKind::Range { lower, upper }
                }
            };
            (Node::Expr(Expr::ListOp(l)), true)
        }
        Expr::PropertyOrLabels(mut pl) => {
            let (atom_node, ok) = walk_atom_children(*pl.atom, visitor);
            if !ok {
                return (atom_node, false);
            }
            let atom = match atom_node {
                Node::Expr(Expr::PropertyOrLabels(inner)) => *inner.atom,
                _ => unreachable!("walk_atom_children always returns a PropertyOrLabels wrapper"),
            };
            pl.atom = Box::new(atom);
            (Node::Expr(Expr::PropertyOrLabels(pl)), true)
        }
    }
}

/// `Atom` has no direct `Node` variant of its own; it is only ever reached
/// through the `PropertyOrLabels` expression that wraps it, so walking it
/// re-wraps the result in a throwaway `PropertyOrLabels` shell to reuse the
/// `descend!` plumbing.
fn walk_atom_children(atom: Atom, visitor: &mut dyn Visitor) -> (Node, bool) {
    use super::expression::PropertyOrLabelsExpr;

    let rewrap = |atom: Atom| {
        Node::Expr(Expr::PropertyOrLabels(PropertyOrLabelsExpr {
            atom: Box::new(atom),
            property_lookups: Vec::new(),
            node_labels: Vec::new(),
            span: 0..0,
        }))
    };

    macro_rules! walk_filter {
        ($f:expr) => {{
            let mut f = $f;
            f.in_expr = Box::new(descend!(visitor, *f.in_expr, Node::Expr, Node::Expr));
            if let Some(w) = f.where_expr {
                f.where_expr = Some(Box::new(descend!(visitor, *w, Node::Expr, Node::Expr)));
            }
            f
        }};
    }

    match atom {
        Atom::Case(mut c) => {
            if let Some(test) = c.test {
                c.test = Some(Box::new(descend!(visitor, *test, Node::Expr, Node::Expr)));
            }
            let mut alts = Vec::with_capacity(c.alternatives.len());
            for alt in c.alternatives {
                let when = descend!(visitor, alt.when, Node::Expr, Node::Expr);
                let then = descend!(visitor, alt.then, Node::Expr, Node::Expr);
                alts.push(super::expression::CaseAlt { when, then });
            }
            c.alternatives = alts;
            if let Some(default) = c.default {
                c.default = Some(Box::new(descend!(visitor, *default, Node::Expr, Node::Expr)));
            }
            (rewrap(Atom::Case(c)), true)
        }
        Atom::AllFilter(f) => (rewrap(Atom::AllFilter(walk_filter!(f))), true),
        Atom::AnyFilter(f) => (rewrap(Atom::AnyFilter(walk_filter!(f))), true),
        Atom::NoneFilter(f) => (rewrap(Atom::NoneFilter(walk_filter!(f))), true),
        Atom::SingleFilter(f) => (rewrap(Atom::SingleFilter(walk_filter!(f))), true),
        Atom::ExtractComprehension(mut lc) => {
            lc.filter = walk_filter!(lc.filter);
            if let Some(proj) = lc.projection {
                lc.projection = Some(Box::new(descend!(visitor, *proj, Node::Expr, Node::Expr)));
            }
            (rewrap(Atom::ExtractComprehension(lc)), true)
        }
        Atom::PatternComprehension(mut pc) => {
            pc.pattern = descend!(visitor, pc.pattern, Node::PatternElement, Node::PatternElement);
            if let Some(w) = pc.where_expr {
                pc.where_expr = Some(Box::new(descend!(visitor, *w, Node::Expr, Node::Expr)));
            }
            pc.projection = Box::new(descend!(visitor, *pc.projection, Node::Expr, Node::Expr));
            (rewrap(Atom::PatternComprehension(pc)), true)
        }
        Atom::Pattern(pe) => {
            let pe = descend!(visitor, pe, Node::PatternElement, Node::PatternElement);
            (rewrap(Atom::Pattern(pe)), true)
        }
        Atom::Parenthesized(inner) => {
            let inner = descend!(visitor, *inner, Node::Expr, Node::Expr);
            (rewrap(Atom::Parenthesized(Box::new(inner))), true)
        }
        Atom::Literal(Literal::List(items)) => {
            let mut walked = Vec::with_capacity(items.len());
            for item in items {
                walked.push(descend!(visitor, item, Node::Expr, Node::Expr));
            }
            (rewrap(Atom::Literal(Literal::List(walked))), true)
        }
        Atom::Literal(Literal::Map(entries)) => {
            let mut walked = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                walked.push((key, descend!(visitor, value, Node::Expr, Node::Expr)));
            }
            (rewrap(Atom::Literal(Literal::Map(walked))), true)
        }
        leaf => (rewrap(leaf), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::{BinaryExpr, BinaryOp, PropertyOrLabelsExpr};
    use crate::ast::identifier::{SymbolicName, SymbolicNameForm, Variable};

    fn var_expr(name: &str) -> Expr {
        Expr::PropertyOrLabels(PropertyOrLabelsExpr {
            atom: Box::new(Atom::Variable(Variable::new(
                SymbolicName::new(name, SymbolicNameForm::Unescaped, 0..name.len()),
                0..name.len(),
            ))),
            property_lookups: Vec::new(),
            node_labels: Vec::new(),
            span: 0..name.len(),
        })
    }

    struct CountingVisitor {
        entered: usize,
    }

    impl Visitor for CountingVisitor {
        fn enter(&mut self, node: Node) -> (Node, bool) {
            self.entered += 1;
            (node, false)
        }
    }

    #[test]
    fn accept_visits_both_operands_of_a_binary_expr() {
        let expr = Expr::Binary(BinaryExpr {
            op: BinaryOp::Add,
            left: Box::new(var_expr("a")),
            right: Box::new(var_expr("b")),
            span: 0..5,
        });
        let mut visitor = CountingVisitor { entered: 0 };
        let (_node, ok) = accept(Node::Expr(expr), &mut visitor);
        assert!(ok);
        assert_eq!(visitor.entered, 3); // the binary expr plus both operands
    }

    struct AbortingVisitor;
    impl Visitor for AbortingVisitor {
        fn leave(&mut self, node: Node) -> (Node, bool) {
            (node, false)
        }
    }

    #[test]
    fn leave_returning_false_aborts_the_walk() {
        let expr = var_expr("a");
        let mut visitor = AbortingVisitor;
        let (_node, ok) = accept(Node::Expr(expr), &mut visitor);
        assert!(!ok);
    }
}
