//! Span collection visitor.

use crate::ast::expression::Expr;
use crate::ast::query::CypherStatement;
use crate::ast::span::Span;
use crate::ast::visit::{Node, Visitor, accept};

/// Collects the span of every node `accept` descends into, in traversal
/// (source) order. Used in tests to assert the Enter/Leave walk visits
/// nodes depth-first, left-to-right.
#[derive(Debug, Default)]
pub struct SpanCollector {
    spans: Vec<Span>,
}

impl SpanCollector {
    pub fn new() -> Self {
        Self { spans: Vec::new() }
    }

    pub fn collect_statement(statement: &CypherStatement) -> Vec<Span> {
        let mut collector = Self::new();
        accept(Node::Statement(statement.clone()), &mut collector);
        collector.spans
    }

    pub fn collect_expression(expr: &Expr) -> Vec<Span> {
        let mut collector = Self::new();
        accept(Node::Expr(expr.clone()), &mut collector);
        collector.spans
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn into_spans(self) -> Vec<Span> {
        self.spans
    }
}

impl Visitor for SpanCollector {
    fn enter(&mut self, node: Node) -> (Node, bool) {
        let span = match &node {
            Node::Statement(s) => s.span(),
            Node::RegularQuery(q) => q.span.clone(),
            Node::SingleQuery(q) => q.span.clone(),
            Node::UnionClause(u) => u.span.clone(),
            Node::QueryPart(p) => p.span.clone(),
            Node::ReadingClause(rc) => match rc {
                crate::ast::clause::ReadingClause::Match(m) => m.span.clone(),
                crate::ast::clause::ReadingClause::Unwind(u) => u.span.clone(),
            },
            Node::UpdatingClause(uc) => match uc {
                crate::ast::clause::UpdatingClause::Create(c) => c.span.clone(),
                crate::ast::clause::UpdatingClause::Merge(m) => m.span.clone(),
                crate::ast::clause::UpdatingClause::Set(s) => s.span.clone(),
                crate::ast::clause::UpdatingClause::Delete(d) => d.span.clone(),
                crate::ast::clause::UpdatingClause::Remove(r) => r.span.clone(),
            },
            Node::WithClause(w) => w.span.clone(),
            Node::ReturnClause(r) => r.span.clone(),
            Node::Pattern(p) => p.span.clone(),
            Node::PatternPart(p) => p.span.clone(),
            Node::PatternElement(p) => p.span.clone(),
            Node::NodePattern(n) => n.span.clone(),
            Node::RelationshipPattern(r) => r.span.clone(),
            Node::Expr(e) => e.span(),
        };
        self.spans.push(span);
        (node, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::{Atom, BinaryExpr, BinaryOp, PropertyOrLabelsExpr};
    use crate::ast::identifier::{SymbolicName, SymbolicNameForm, Variable};

    fn var_expr(name: &str, span: Span) -> Expr {
        Expr::PropertyOrLabels(PropertyOrLabelsExpr {
            atom: Box::new(Atom::Variable(Variable::new(
                SymbolicName::new(name, SymbolicNameForm::Unescaped, span.clone()),
                span.clone(),
            ))),
            property_lookups: Vec::new(),
            node_labels: Vec::new(),
            span,
        })
    }

    #[test]
    fn visits_the_binary_expr_before_its_operands_in_source_order() {
        let expr = Expr::Binary(BinaryExpr {
            op: BinaryOp::Add,
            left: Box::new(var_expr("a", 0..1)),
            right: Box::new(var_expr("b", 4..5)),
            span: 0..5,
        });
        let spans = SpanCollector::collect_expression(&expr);
        assert_eq!(spans, vec![0..5, 0..1, 4..5]);
    }
}
