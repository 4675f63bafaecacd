//! Canonical restoration tests: fixed expected output for known inputs, and
//! the idempotence property — restoring a restored query's parse reproduces
//! the same text.

use cypher_ast::ast::restore_to_string;
use cypher_ast::parse;

fn restore(source: &str) -> String {
    let result = parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for `{source}`: {:?}",
        result.diagnostics
    );
    restore_to_string(&result.ast.expect("expected an AST"))
}

#[test]
fn plain_match_return() {
    assert_eq!(restore("match (n) return n"), "MATCH (`n`) RETURN `n`");
}

#[test]
fn relationship_with_types_range_and_properties() {
    assert_eq!(
        restore("match (n:Label)-[r:Type *1..2 {hello:'world'}]->() return *"),
        "MATCH (`n`:Label)-[`r`:Type*1..2{hello: 'world'}]->() RETURN *"
    );
}

#[test]
fn bare_relationship_restores_its_implicit_single_hop() {
    assert_eq!(
        restore("with n as n, a as a create (n)-[]-(a)"),
        "WITH `n` AS `n`, `a` AS `a` CREATE (`n`)-[*1..1]-(`a`)"
    );
}

#[test]
fn where_expression_with_mixed_literals() {
    assert_eq!(
        restore("match (n) where n.name > 1 AND 'abc' = 2 OR 1.2 <> -2 return n"),
        "MATCH (`n`) WHERE `n`.`name` > 1 AND 'abc' = 2 OR 1.200000 <> -2 RETURN `n`"
    );
}

#[test]
fn count_star() {
    assert_eq!(
        restore("match (n) return count(*)"),
        "MATCH (`n`) RETURN COUNT(*)"
    );
}

#[test]
fn list_comprehension() {
    assert_eq!(
        restore("match (n) return [n in list | n+1]"),
        "MATCH (`n`) RETURN [`n` IN `list` | `n` + 1]"
    );
}

#[test]
fn quantified_filters() {
    assert_eq!(
        restore("match (n) return any(n in list), all(n in list), single(n in list), none(n in list where TRUE)"),
        "MATCH (`n`) RETURN ANY(`n` IN `list`), ALL(`n` IN `list`), SINGLE(`n` IN `list`), NONE(`n` IN `list` WHERE TRUE)"
    );
}

#[test]
fn hex_and_octal_integers_restore_as_decimal() {
    assert_eq!(restore("return 0x1F, 0o17, 42"), "RETURN 31, 15, 42");
}

#[test]
fn union_all_joins_with_spaces() {
    assert_eq!(
        restore("match (a) return a union all match (b) return b"),
        "MATCH (`a`) RETURN `a` UNION ALL MATCH (`b`) RETURN `b`"
    );
}

#[test]
fn case_expression() {
    assert_eq!(
        restore("return case n.x when 1 then 'a' else 'b' end"),
        "RETURN CASE `n`.`x` WHEN 1 THEN 'a' ELSE 'b' END"
    );
}

#[test]
fn order_by_skip_limit() {
    assert_eq!(
        restore("match (n) return distinct n order by n.name desc skip 1 limit 2"),
        "MATCH (`n`) RETURN DISTINCT `n` ORDER BY `n`.`name` DESC SKIP 1 LIMIT 2"
    );
}

#[test]
fn merge_actions() {
    assert_eq!(
        restore("merge (n) on create set n.x = 1 on match set n.y = 2 return n"),
        "MERGE (`n`) ON CREATE SET `n`.`x` = 1 ON MATCH SET `n`.`y` = 2 RETURN `n`"
    );
}

#[test]
fn string_with_embedded_quote_remains_parseable() {
    let restored = restore(r"return 'it\'s'");
    assert_eq!(restored, r"RETURN 'it\'s'");
    let reparsed = parse(&restored);
    assert!(reparsed.diagnostics.is_empty());
}

#[test]
fn escaped_identifiers_keep_their_backticks() {
    assert_eq!(
        restore("match (`my node`:`weird label`) return `my node`"),
        "MATCH (`my node`:`weird label`) RETURN `my node`"
    );
}

#[test]
fn restoration_is_idempotent_under_reparse() {
    let sources = [
        "match (n) return n",
        "match (n:Label)-[r:Type *1..2 {hello:'world'}]->() return *",
        "with n as n, a as a create (n)-[]-(a)",
        "match (n) where n.name > 1 AND 'abc' = 2 OR 1.2 <> -2 return n",
        "match (n) return count(*)",
        "match (n) return [n in list | n+1]",
        "match (a)-[*]->(b) return a",
        "match (a)-[*2..]->(b) return a",
        "match (a)<-[:X|Y]-(b) return b",
        "unwind [1, 2, 3] as x return x",
        "match (n) detach delete n",
        "match (n) remove n:Label, n.prop return n",
        "match (n) set n += {a: 1} return n",
        "return case when 1 > 0 then 'y' else 'n' end",
        "return {a: 1, b: [2, 3]}, $param",
        "return not not true",
        "match (n) where (n)-->() return n",
        "match (n) return n order by n.name asc skip 1 limit 2",
        "match (a) return a union match (b) return b",
        "return [p = (a)-->(b) where true | p]",
        "match (n $props)-[r:KNOWS $rel]->(m) return n",
        "match (count) return count",
        "return cafe, `a b`",
    ];
    for source in sources {
        let once = restore(source);
        let twice = restore(&once);
        assert_eq!(once, twice, "restoration not idempotent for `{source}`");
    }
}
