//! Traversal protocol tests: identity walks, node substitution on `enter`,
//! child skipping, abort propagation, and the bundled collector visitors.

use cypher_ast::ast::expression::{Atom, Expr};
use cypher_ast::ast::identifier::{SymbolicName, SymbolicNameForm, Variable};
use cypher_ast::ast::restore_to_string;
use cypher_ast::ast::visit::{Node, Visitor, accept};
use cypher_ast::ast::visitors::{SpanCollector, VariableCollector};
use cypher_ast::ast::CypherStatement;
use cypher_ast::parse;

fn parse_ok(source: &str) -> CypherStatement {
    let result = parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for `{source}`: {:?}",
        result.diagnostics
    );
    result.ast.expect("expected an AST")
}

struct IdentityVisitor;
impl Visitor for IdentityVisitor {}

#[test]
fn identity_visitor_returns_an_equal_tree() {
    let stmt = parse_ok("MATCH (n:Person)-[r:KNOWS*1..2 {w: 1}]->(m) WHERE n.age > 18 RETURN n, count(*) ORDER BY n.age SKIP 1 LIMIT 2");
    let (walked, ok) = accept(Node::Statement(stmt.clone()), &mut IdentityVisitor);
    assert!(ok);
    assert_eq!(walked, Node::Statement(stmt));
}

/// Renames every variable reference and pattern binding named `old` to `new`
/// by substituting replacement nodes on `enter`.
struct RenameVisitor {
    old: String,
    new: String,
}

impl RenameVisitor {
    fn rename(&self, variable: &Variable) -> Option<Variable> {
        (variable.text() == self.old).then(|| {
            Variable::new(
                SymbolicName::new(
                    self.new.as_str(),
                    SymbolicNameForm::Unescaped,
                    variable.name.span.clone(),
                ),
                variable.span.clone(),
            )
        })
    }
}

impl Visitor for RenameVisitor {
    fn enter(&mut self, node: Node) -> (Node, bool) {
        match node {
            Node::Expr(Expr::PropertyOrLabels(mut pl)) => {
                if let Atom::Variable(variable) = pl.atom.as_ref()
                    && let Some(renamed) = self.rename(variable)
                {
                    pl.atom = Box::new(Atom::Variable(renamed));
                }
                (Node::Expr(Expr::PropertyOrLabels(pl)), false)
            }
            Node::NodePattern(mut n) => {
                if let Some(variable) = &n.variable
                    && let Some(renamed) = self.rename(variable)
                {
                    n.variable = Some(renamed);
                }
                (Node::NodePattern(n), false)
            }
            other => (other, false),
        }
    }
}

#[test]
fn enter_substitution_rewrites_the_tree_in_place() {
    let stmt = parse_ok("MATCH (a)-->(b) WHERE a.x > 1 RETURN a");
    let mut visitor = RenameVisitor {
        old: "a".into(),
        new: "z".into(),
    };
    let (walked, ok) = accept(Node::Statement(stmt), &mut visitor);
    assert!(ok);
    let Node::Statement(rewritten) = walked else {
        panic!("expected a statement back");
    };
    assert_eq!(
        restore_to_string(&rewritten),
        "MATCH (`z`)-[*1..1]->(`b`) WHERE `z`.`x` > 1 RETURN `z`"
    );
}

struct SkippingCounter {
    entered: usize,
}

impl Visitor for SkippingCounter {
    fn enter(&mut self, node: Node) -> (Node, bool) {
        self.entered += 1;
        // Never descend below a pattern: its node patterns stay unvisited.
        let skip = matches!(node, Node::Pattern(_));
        (node, skip)
    }
}

#[test]
fn skip_children_prunes_the_subtree() {
    let stmt = parse_ok("MATCH (a)-->(b) RETURN 1");

    let mut pruned = SkippingCounter { entered: 0 };
    let (_, ok) = accept(Node::Statement(stmt.clone()), &mut pruned);
    assert!(ok);

    let mut unpruned = CountingVisitor { entered: 0 };
    accept(Node::Statement(stmt), &mut unpruned);
    assert!(
        unpruned.entered > pruned.entered,
        "skipping children must visit fewer nodes ({} vs {})",
        pruned.entered,
        unpruned.entered
    );
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

struct AbortOnReadingClause {
    left_after_abort: usize,
    aborted: bool,
}

impl Visitor for AbortOnReadingClause {
    fn leave(&mut self, node: Node) -> (Node, bool) {
        if self.aborted {
            self.left_after_abort += 1;
        }
        if matches!(node, Node::ReadingClause(_)) {
            self.aborted = true;
            return (node, false);
        }
        (node, true)
    }
}

#[test]
fn leave_returning_false_stops_the_walk_immediately() {
    let stmt = parse_ok("MATCH (a) RETURN a");
    let mut visitor = AbortOnReadingClause {
        left_after_abort: 0,
        aborted: false,
    };
    let (_node, ok) = accept(Node::Statement(stmt), &mut visitor);
    assert!(!ok);
    assert_eq!(
        visitor.left_after_abort, 0,
        "no further leave calls may happen after an abort"
    );
}

#[test]
fn variable_collector_separates_definitions_from_references() {
    let CypherStatement::Query(q) =
        parse_ok("MATCH p = (n)-[r:KNOWS]->(m) WHERE n.age > m.age RETURN n")
    else {
        panic!("expected a query");
    };
    let mut collector = VariableCollector::new();
    accept(Node::SingleQuery(q.query), &mut collector);
    for defined in ["p", "n", "r", "m"] {
        assert!(
            collector.definitions().contains(defined),
            "missing definition {defined}"
        );
    }
    assert!(collector.references().contains("n"));
    assert!(collector.references().contains("m"));
}

#[test]
fn span_collector_observes_source_order() {
    let stmt = parse_ok("MATCH (a)-->(b) RETURN a + b");
    let spans = SpanCollector::collect_statement(&stmt);
    assert!(!spans.is_empty());
    let starts: Vec<usize> = spans.iter().map(|s| s.start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    // Depth-first source order: parents open at or before their children,
    // and siblings appear left to right.
    assert_eq!(starts.first(), sorted.first());
}

#[test]
fn visitor_reaches_expressions_inside_projections_and_properties() {
    let stmt = parse_ok("MATCH (n {seed: 41 + 1}) SET n.x = 2 + 3 RETURN n.y * 4 ORDER BY n.z + 5 SKIP 6 LIMIT 7");
    let mut counter = LiteralCounter { integers: 0 };
    accept(Node::Statement(stmt), &mut counter);
    // 41, 1, 2, 3, 4, 5, 6, 7
    assert_eq!(counter.integers, 8);
}

struct LiteralCounter {
    integers: usize,
}

impl Visitor for LiteralCounter {
    fn enter(&mut self, node: Node) -> (Node, bool) {
        if let Node::Expr(Expr::PropertyOrLabels(pl)) = &node
            && matches!(
                pl.atom.as_ref(),
                Atom::Literal(cypher_ast::ast::expression::Literal::Integer(_))
            )
        {
            self.integers += 1;
        }
        (node, false)
    }
}
