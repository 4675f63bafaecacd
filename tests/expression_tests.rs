//! Expression lowering tests: precedence is encoded in tree shape, operators
//! fold left-associatively, and the string/list/null operator suffixes chain.

use cypher_ast::ast::CypherStatement;
use cypher_ast::ast::clause::ReturnItems;
use cypher_ast::ast::expression::{
    Atom, BinaryOp, Expr, ListOperationKind, Literal, PredicationKind, StringOperator, UnaryOp,
};
use cypher_ast::ast::pattern::HopRange;
use cypher_ast::ast::clause::ReadingClause;
use cypher_ast::parse;

fn first_return_expr(source: &str) -> Expr {
    let result = parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for `{source}`: {:?}",
        result.diagnostics
    );
    let CypherStatement::Query(q) = result.ast.expect("expected an AST") else {
        panic!("expected a query");
    };
    let ret = q.query.return_clause.expect("expected RETURN");
    let ReturnItems::Explicit(items) = ret.body.items else {
        panic!("expected explicit RETURN items");
    };
    items.into_iter().next().expect("expected an item").expr
}

fn as_binary(expr: &Expr) -> (&BinaryOp, &Expr, &Expr) {
    match expr {
        Expr::Binary(b) => (&b.op, &*b.left, &*b.right),
        other => panic!("expected a binary expr, got {other:?}"),
    }
}

fn atom_of(expr: &Expr) -> &Atom {
    match expr {
        Expr::PropertyOrLabels(pl) => &*pl.atom,
        other => panic!("expected a property-or-labels expr, got {other:?}"),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let expr = first_return_expr("RETURN a + b * c");
    let (op, _left, right) = as_binary(&expr);
    assert_eq!(*op, BinaryOp::Add);
    let (inner_op, _, _) = as_binary(right);
    assert_eq!(*inner_op, BinaryOp::Mul);

    let expr = first_return_expr("RETURN a * b + c");
    let (op, left, _right) = as_binary(&expr);
    assert_eq!(*op, BinaryOp::Add);
    let (inner_op, _, _) = as_binary(left);
    assert_eq!(*inner_op, BinaryOp::Mul);
}

#[test]
fn same_level_operators_fold_left_associatively() {
    let expr = first_return_expr("RETURN 1 - 2 - 3");
    let (op, left, _) = as_binary(&expr);
    assert_eq!(*op, BinaryOp::Sub);
    let (inner_op, _, _) = as_binary(left);
    assert_eq!(*inner_op, BinaryOp::Sub);
}

#[test]
fn not_binds_tighter_than_and() {
    let expr = first_return_expr("RETURN NOT a AND b");
    let (op, left, _) = as_binary(&expr);
    assert_eq!(*op, BinaryOp::And);
    match left {
        Expr::Unary(u) => assert_eq!(u.op, UnaryOp::Not),
        other => panic!("expected NOT on the left, got {other:?}"),
    }
}

#[test]
fn each_not_keyword_nests_one_level() {
    let expr = first_return_expr("RETURN NOT NOT a");
    let Expr::Unary(outer) = expr else {
        panic!("expected a unary expr");
    };
    assert_eq!(outer.op, UnaryOp::Not);
    let Expr::Unary(inner) = *outer.operand else {
        panic!("expected a nested unary expr");
    };
    assert_eq!(inner.op, UnaryOp::Not);
}

#[test]
fn logical_operator_precedence_or_xor_and() {
    let expr = first_return_expr("RETURN a OR b XOR c AND d");
    let (op, _, right) = as_binary(&expr);
    assert_eq!(*op, BinaryOp::Or);
    let (xor_op, _, xor_right) = as_binary(right);
    assert_eq!(*xor_op, BinaryOp::Xor);
    let (and_op, _, _) = as_binary(xor_right);
    assert_eq!(*and_op, BinaryOp::And);
}

#[test]
fn comparison_chain_extends_left_deep() {
    let expr = first_return_expr("RETURN 1 < 2 <= 3");
    let (op, left, _) = as_binary(&expr);
    assert_eq!(*op, BinaryOp::LtEq);
    let (inner_op, _, _) = as_binary(left);
    assert_eq!(*inner_op, BinaryOp::Lt);
}

#[test]
fn power_of_level_folds_below_multiplication() {
    let expr = first_return_expr("RETURN a * b ^ c");
    let (op, _, right) = as_binary(&expr);
    assert_eq!(*op, BinaryOp::Mul);
    let (pow_op, _, _) = as_binary(right);
    assert_eq!(*pow_op, BinaryOp::Pow);
}

#[test]
fn leading_signs_wrap_in_unary_exprs() {
    let expr = first_return_expr("RETURN -1");
    let Expr::Unary(u) = expr else {
        panic!("expected a unary expr");
    };
    assert_eq!(u.op, UnaryOp::Neg);

    let expr = first_return_expr("RETURN +x");
    let Expr::Unary(u) = expr else {
        panic!("expected a unary expr");
    };
    assert_eq!(u.op, UnaryOp::Plus);
}

#[test]
fn string_operators() {
    for (source, expected) in [
        ("RETURN a STARTS WITH 'x'", StringOperator::StartsWith),
        ("RETURN a ENDS WITH 'x'", StringOperator::EndsWith),
        ("RETURN a CONTAINS 'x'", StringOperator::Contains),
    ] {
        let expr = first_return_expr(source);
        match expr {
            Expr::StringOp(s) => assert_eq!(s.op, expected),
            other => panic!("expected a string operation for `{source}`, got {other:?}"),
        }
    }
}

#[test]
fn null_predication() {
    let expr = first_return_expr("RETURN a IS NULL");
    match expr {
        Expr::Predication(p) => assert_eq!(p.kind, PredicationKind::IsNull),
        other => panic!("expected IS NULL, got {other:?}"),
    }
    let expr = first_return_expr("RETURN a IS NOT NULL");
    match expr {
        Expr::Predication(p) => assert_eq!(p.kind, PredicationKind::IsNotNull),
        other => panic!("expected IS NOT NULL, got {other:?}"),
    }
}

#[test]
fn list_operator_forms() {
    let expr = first_return_expr("RETURN a IN [1, 2]");
    match expr {
        Expr::ListOp(l) => assert!(matches!(l.kind, ListOperationKind::In(_))),
        other => panic!("expected IN, got {other:?}"),
    }

    let expr = first_return_expr("RETURN a[1]");
    match expr {
        Expr::ListOp(l) => assert!(matches!(l.kind, ListOperationKind::Index(_))),
        other => panic!("expected an index, got {other:?}"),
    }

    let expr = first_return_expr("RETURN a[1..2]");
    match expr {
        Expr::ListOp(l) => assert!(matches!(
            l.kind,
            ListOperationKind::Range {
                lower: Some(_),
                upper: Some(_)
            }
        )),
        other => panic!("expected a range, got {other:?}"),
    }

    let expr = first_return_expr("RETURN a[..2]");
    match expr {
        Expr::ListOp(l) => assert!(matches!(
            l.kind,
            ListOperationKind::Range {
                lower: None,
                upper: Some(_)
            }
        )),
        other => panic!("expected an open-below range, got {other:?}"),
    }
}

#[test]
fn suffix_operators_chain_outward() {
    let expr = first_return_expr("RETURN a[0] IS NOT NULL");
    let Expr::Predication(p) = expr else {
        panic!("expected predication at the top");
    };
    assert!(matches!(*p.expr, Expr::ListOp(_)));
}

#[test]
fn property_lookups_and_labels_collect_on_one_wrapper() {
    let expr = first_return_expr("RETURN n.a.b");
    let Expr::PropertyOrLabels(pl) = expr else {
        panic!("expected property lookups");
    };
    assert_eq!(pl.property_lookups.len(), 2);
    assert_eq!(pl.property_lookups[0].key.text(), "a");
    assert_eq!(pl.property_lookups[1].key.text(), "b");

    let expr = first_return_expr("RETURN n:Person");
    let Expr::PropertyOrLabels(pl) = expr else {
        panic!("expected a label filter");
    };
    assert_eq!(pl.node_labels.len(), 1);
}

#[test]
fn parenthesized_expression_resets_precedence() {
    let expr = first_return_expr("RETURN (1 + 2) * 3");
    let (op, left, _) = as_binary(&expr);
    assert_eq!(*op, BinaryOp::Mul);
    match atom_of(left) {
        Atom::Parenthesized(inner) => {
            let (inner_op, _, _) = as_binary(inner.as_ref());
            assert_eq!(*inner_op, BinaryOp::Add);
        }
        other => panic!("expected a parenthesized atom, got {other:?}"),
    }
}

#[test]
fn literal_atoms() {
    assert!(matches!(
        atom_of(&first_return_expr("RETURN 'text'")),
        Atom::Literal(Literal::String(_))
    ));
    assert!(matches!(
        atom_of(&first_return_expr("RETURN 3.25")),
        Atom::Literal(Literal::Float(_))
    ));
    assert!(matches!(
        atom_of(&first_return_expr("RETURN TRUE")),
        Atom::Literal(Literal::Boolean(true))
    ));
    assert!(matches!(
        atom_of(&first_return_expr("RETURN NULL")),
        Atom::Literal(Literal::Null)
    ));
    assert!(matches!(
        atom_of(&first_return_expr("RETURN [1, 'a']")),
        Atom::Literal(Literal::List(_))
    ));
    assert!(matches!(
        atom_of(&first_return_expr("RETURN {a: 1}")),
        Atom::Literal(Literal::Map(_))
    ));
    assert!(matches!(
        atom_of(&first_return_expr("RETURN $param")),
        Atom::Parameter(_)
    ));
    assert!(matches!(
        atom_of(&first_return_expr("RETURN count(*)")),
        Atom::CountStar
    ));
}

#[test]
fn comprehension_and_filter_atoms() {
    assert!(matches!(
        atom_of(&first_return_expr("RETURN [x IN list WHERE x > 0 | x + 1]")),
        Atom::ExtractComprehension(_)
    ));
    assert!(matches!(
        atom_of(&first_return_expr("RETURN [p = (a)-->(b) | p]")),
        Atom::PatternComprehension(_)
    ));
    assert!(matches!(
        atom_of(&first_return_expr("RETURN all(x IN list WHERE x > 0)")),
        Atom::AllFilter(_)
    ));
    assert!(matches!(
        atom_of(&first_return_expr("RETURN none(x IN list)")),
        Atom::NoneFilter(_)
    ));
}

#[test]
fn pattern_atom_in_expression_position() {
    let expr = first_return_expr("RETURN (a)-[:KNOWS]->(b)");
    match atom_of(&expr) {
        Atom::Pattern(element) => {
            assert_eq!(element.nodes.len(), 2);
            assert_eq!(element.relationships.len(), 1);
        }
        other => panic!("expected a pattern atom, got {other:?}"),
    }
}

#[test]
fn symbolic_name_lexical_kinds() {
    use cypher_ast::ast::identifier::SymbolicNameForm;

    let kind_of = |source: &str| {
        let expr = first_return_expr(source);
        match atom_of(&expr) {
            Atom::Variable(v) => v.name.form,
            other => panic!("expected a variable for `{source}`, got {other:?}"),
        }
    };
    assert_eq!(kind_of("RETURN abc"), SymbolicNameForm::Unescaped);
    assert_eq!(kind_of("RETURN cafe"), SymbolicNameForm::HexLetter);
    assert_eq!(kind_of("RETURN `a b`"), SymbolicNameForm::Escaped);
    assert_eq!(kind_of("RETURN count"), SymbolicNameForm::Count);
    assert_eq!(kind_of("RETURN filter"), SymbolicNameForm::Filter);
    assert_eq!(kind_of("RETURN single"), SymbolicNameForm::Single);
}

#[test]
fn range_literal_decoding() {
    let cases = [
        ("MATCH (a)-[*]->(b) RETURN a", HopRange::Unbounded),
        ("MATCH (a)-[*3]->(b) RETURN a", HopRange::Exact(3)),
        ("MATCH (a)-[*3..]->(b) RETURN a", HopRange::AtLeast(3)),
        ("MATCH (a)-[*3..5]->(b) RETURN a", HopRange::Between(3, 5)),
        ("MATCH (a)-[*..5]->(b) RETURN a", HopRange::UpTo(5)),
        ("MATCH (a)-[]->(b) RETURN a", HopRange::Between(1, 1)),
        ("MATCH (a)-->(b) RETURN a", HopRange::Between(1, 1)),
    ];
    for (source, expected) in cases {
        let result = parse(source);
        assert!(
            result.diagnostics.is_empty(),
            "unexpected diagnostics for `{source}`: {:?}",
            result.diagnostics
        );
        let CypherStatement::Query(q) = result.ast.unwrap() else {
            panic!("expected a query");
        };
        let ReadingClause::Match(m) = &q.query.parts[0].reading_clauses[0] else {
            panic!("expected MATCH");
        };
        assert_eq!(
            m.pattern.parts[0].element.relationships[0].range, expected,
            "wrong range for `{source}`"
        );
    }
}
