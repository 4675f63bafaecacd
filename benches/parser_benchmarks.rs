//! End-to-End Parser Benchmarks
//!
//! Measures the full pipeline (lex → grammar parse → lowering) across query
//! shapes, plus canonical restoration on parsed trees.
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark group
//! cargo bench simple_queries
//! cargo bench complex_queries
//! cargo bench stress_tests
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use cypher_ast::ast::restore_to_string;
use cypher_ast::parse;

// ============================================================================
// Simple Query Benchmarks
// ============================================================================

fn bench_simple_match_return(c: &mut Criterion) {
    let mut group = c.benchmark_group("simple_queries");

    let queries = vec![
        ("minimal", "MATCH (n) RETURN n"),
        ("with_label", "MATCH (n:Person) RETURN n"),
        ("with_property", "MATCH (n {name: 'Alice'}) RETURN n"),
        (
            "with_label_property",
            "MATCH (n:Person {age: 30}) RETURN n.name",
        ),
        (
            "with_relationship",
            "MATCH (a:Person)-[:KNOWS]->(b:Person) RETURN a, b",
        ),
    ];

    for (name, query) in queries {
        group.throughput(Throughput::Bytes(query.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), query, |b, q| {
            b.iter(|| parse(black_box(q)));
        });
    }

    group.finish();
}

// ============================================================================
// Complex Query Benchmarks
// ============================================================================

fn bench_complex_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("complex_queries");

    let queries = vec![
        (
            "where_order_limit",
            "MATCH (n:Person) WHERE n.age > 18 AND n.name STARTS WITH 'A' \
             RETURN n.name ORDER BY n.age DESC SKIP 10 LIMIT 20",
        ),
        (
            "multi_part_with",
            "MATCH (a:Person)-[:KNOWS]->(b) WITH a, count(*) AS degree \
             WHERE degree > 3 RETURN a.name, degree ORDER BY degree DESC",
        ),
        (
            "variable_length_path",
            "MATCH p = (a:Person)-[:KNOWS*1..4]->(b:Person) \
             WHERE a.id = $from AND b.id = $to RETURN p",
        ),
        (
            "merge_with_actions",
            "MERGE (n:Person {id: $id}) ON CREATE SET n.created = TRUE \
             ON MATCH SET n.seen = TRUE RETURN n",
        ),
        (
            "union_all",
            "MATCH (a:Admin) RETURN a.name UNION ALL MATCH (u:User) RETURN u.name",
        ),
        (
            "case_and_comprehension",
            "MATCH (n) RETURN CASE WHEN n.age > 65 THEN 'senior' ELSE 'adult' END, \
             [x IN n.scores WHERE x > 0 | x * 2]",
        ),
    ];

    for (name, query) in queries {
        group.throughput(Throughput::Bytes(query.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), query, |b, q| {
            b.iter(|| parse(black_box(q)));
        });
    }

    group.finish();
}

// ============================================================================
// Restoration Benchmarks
// ============================================================================

fn bench_restoration(c: &mut Criterion) {
    let mut group = c.benchmark_group("restoration");

    let queries = vec![
        ("simple", "MATCH (n) RETURN n"),
        (
            "complex",
            "MATCH (a:Person)-[r:KNOWS*1..3 {since: 2020}]->(b) \
             WHERE a.age > 18 OR b.name CONTAINS 'x' \
             RETURN DISTINCT a, r, b ORDER BY a.age SKIP 1 LIMIT 100",
        ),
    ];

    for (name, query) in queries {
        let ast = parse(query).ast.expect("benchmark query must parse");
        group.bench_with_input(BenchmarkId::from_parameter(name), &ast, |b, ast| {
            b.iter(|| restore_to_string(black_box(ast)));
        });
    }

    group.finish();
}

// ============================================================================
// Stress Benchmarks
// ============================================================================

fn bench_stress(c: &mut Criterion) {
    let mut group = c.benchmark_group("stress_tests");
    group.sample_size(20);

    // Deeply nested parenthesized arithmetic.
    let mut deep = String::from("RETURN ");
    for _ in 0..100 {
        deep.push('(');
    }
    deep.push('1');
    for _ in 0..100 {
        deep.push_str(" + 1)");
    }

    // A wide projection list.
    let wide_items: Vec<String> = (0..500).map(|i| format!("n.prop{i} AS p{i}")).collect();
    let wide = format!("MATCH (n) RETURN {}", wide_items.join(", "));

    // A long relationship chain.
    let mut chain = String::from("MATCH (n0)");
    for i in 1..100 {
        chain.push_str(&format!("-[:R{i}]->(n{i})"));
    }
    chain.push_str(" RETURN n0");

    let cases = vec![
        ("deep_nesting", deep),
        ("wide_projection", wide),
        ("long_chain", chain),
    ];

    for (name, query) in &cases {
        group.throughput(Throughput::Bytes(query.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(*name), query, |b, q| {
            b.iter(|| parse(black_box(q.as_str())));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simple_match_return,
    bench_complex_queries,
    bench_restoration,
    bench_stress,
);
criterion_main!(benches);
