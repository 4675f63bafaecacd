//! Variable collection visitor.

use std::collections::BTreeSet;

use smol_str::SmolStr;

use crate::ast::clause::{ReadingClause, UpdatingClause};
use crate::ast::expression::{Atom, Expr};
use crate::ast::pattern::{NodePattern, PatternPart, RelationshipPattern};
use crate::ast::visit::{Node, Visitor, accept};

/// Collects bound variable names from an AST subtree: path variables,
/// node/relationship pattern variables, `UNWIND ... AS` targets, and
/// variable references inside expressions.
#[derive(Debug, Clone, Default)]
pub struct VariableCollector {
    references: BTreeSet<SmolStr>,
    definitions: BTreeSet<SmolStr>,
}

impl VariableCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every variable reference found in `expr`. `accept` consumes
    /// its node, so this clones the subtree first — fine for a read-only
    /// collector.
    pub fn collect_references_from_expression(expr: &Expr) -> BTreeSet<SmolStr> {
        let mut collector = Self::new();
        accept(Node::Expr(expr.clone()), &mut collector);
        collector.references
    }

    pub fn references(&self) -> &BTreeSet<SmolStr> {
        &self.references
    }

    pub fn definitions(&self) -> &BTreeSet<SmolStr> {
        &self.definitions
    }

    pub fn into_references(self) -> BTreeSet<SmolStr> {
        self.references
    }

    fn define(&mut self, name: &str) {
        self.definitions.insert(SmolStr::new(name));
    }

    fn reference(&mut self, name: &str) {
        self.references.insert(SmolStr::new(name));
    }
}

impl Visitor for VariableCollector {
    fn enter(&mut self, node: Node) -> (Node, bool) {
        match &node {
            Node::Expr(Expr::PropertyOrLabels(pl)) => {
                if let Atom::Variable(variable) = pl.atom.as_ref() {
                    self.reference(variable.text());
                }
            }
            Node::ReadingClause(ReadingClause::Unwind(u)) => {
                self.define(u.variable.text());
            }
            Node::PatternPart(part) => {
                if let Some(variable) = &part.variable {
                    self.define(variable.text());
                }
            }
            Node::NodePattern(NodePattern {
                variable: Some(variable),
                ..
            }) => {
                self.define(variable.text());
            }
            Node::RelationshipPattern(RelationshipPattern {
                variable: Some(variable),
                ..
            }) => {
                self.define(variable.text());
            }
            Node::UpdatingClause(UpdatingClause::Merge(m)) => {
                if let Some(variable) = &m.pattern_part.variable {
                    self.define(variable.text());
                }
            }
            _ => {}
        }
        (node, false)
    }
}
