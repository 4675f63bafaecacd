//! Canonical restoration: writes a deterministic Cypher fragment from an AST
//! that is guaranteed to re-parse into an equal tree, even when it differs
//! textually from whatever produced the tree (e.g. a relationship pattern
//! with no `*` in the source still restores its default hop range).

use std::fmt;

use super::clause::{
    AssignmentMode, MatchClause, MergeActionKind, ReadingClause, RemoveItem, ReturnBody,
    ReturnItems, SetItem, SortDirection, UnwindClause, UpdatingClause, WithClause,
};
use super::expression::{
    Atom, BinaryExpr, Expr, Literal, ListOperationKind, PredicationKind, PropertyOrLabelsExpr,
    UnaryOp,
};
use super::identifier::{SchemaName, SymbolicNameForm};
use super::pattern::{HopRange, NodePattern, Pattern, PatternElement, PatternPart, Properties, RelationshipDirection, RelationshipPattern};
use super::query::{CypherStatement, QueryPart, RegularQuery, SingleQuery};

/// A thin sink facade: raw text, backtick-quoted identifiers, upper-cased
/// keywords, single-quoted strings. Every restore implementation goes
/// through these four operations rather than writing to the sink directly,
/// so the quoting/casing rules live in exactly one place.
pub struct RestoreContext<'a> {
    sink: &'a mut dyn fmt::Write,
}

impl<'a> RestoreContext<'a> {
    pub fn new(sink: &'a mut dyn fmt::Write) -> Self {
        Self { sink }
    }

    pub fn write_raw(&mut self, s: &str) {
        let _ = self.sink.write_str(s);
    }

    /// Writes `s` backtick-delimited, doubling any embedded backtick so the
    /// result re-lexes to the same identifier.
    pub fn write_ident(&mut self, s: &str) {
        let _ = self.sink.write_char('`');
        for ch in s.chars() {
            if ch == '`' {
                let _ = self.sink.write_str("``");
            } else {
                let _ = self.sink.write_char(ch);
            }
        }
        let _ = self.sink.write_char('`');
    }

    pub fn write_keyword(&mut self, s: &str) {
        let _ = self.sink.write_str(&s.to_ascii_uppercase());
    }

    /// Writes any displayable value (numbers, decoded literals) via its
    /// `Display` impl.
    pub fn write_value(&mut self, value: impl fmt::Display) {
        let _ = write!(self.sink, "{value}");
    }

    /// Writes `s` single-quoted. The value arrives already unescaped from
    /// the lexer; only the characters that would break re-lexing (the quote
    /// delimiter itself and the escape introducer) are re-escaped.
    pub fn write_string(&mut self, s: &str) {
        let _ = self.sink.write_char('\'');
        for ch in s.chars() {
            match ch {
                '\'' => {
                    let _ = self.sink.write_str("\\'");
                }
                '\\' => {
                    let _ = self.sink.write_str("\\\\");
                }
                _ => {
                    let _ = self.sink.write_char(ch);
                }
            }
        }
        let _ = self.sink.write_char('\'');
    }
}

/// Renders `statement` to a freshly allocated string.
pub fn restore_to_string(statement: &CypherStatement) -> String {
    let mut out = String::new();
    {
        let mut ctx = RestoreContext::new(&mut out);
        restore_statement(statement, &mut ctx);
    }
    out
}

fn restore_statement(statement: &CypherStatement, ctx: &mut RestoreContext<'_>) {
    match statement {
        CypherStatement::Query(q) => restore_regular_query(q, ctx),
        CypherStatement::StandaloneCall(_) => ctx.write_keyword("call"),
    }
}

fn restore_regular_query(query: &RegularQuery, ctx: &mut RestoreContext<'_>) {
    restore_single_query(&query.query, ctx);
    for union in &query.unions {
        ctx.write_raw(" ");
        ctx.write_keyword("union");
        if union.all {
            ctx.write_raw(" ");
            ctx.write_keyword("all");
        }
        ctx.write_raw(" ");
        restore_single_query(&union.query, ctx);
    }
}

fn restore_single_query(query: &SingleQuery, ctx: &mut RestoreContext<'_>) {
    let mut first = true;
    for part in &query.parts {
        if !first {
            ctx.write_raw(" ");
        }
        first = restore_query_part(part, ctx) && first;
    }
    if let Some(ret) = &query.return_clause {
        if !first {
            ctx.write_raw(" ");
        }
        ctx.write_keyword("return");
        if ret.body.distinct {
            ctx.write_raw(" ");
            ctx.write_keyword("distinct");
        }
        ctx.write_raw(" ");
        restore_return_body(&ret.body, ctx);
    }
}

/// Writes one query part, returning whether nothing was written (so the
/// caller can decide whether the next part still needs a leading space).
fn restore_query_part(part: &QueryPart, ctx: &mut RestoreContext<'_>) -> bool {
    let mut wrote_anything = false;
    for (i, reading) in part.reading_clauses.iter().enumerate() {
        if i > 0 {
            ctx.write_raw(" ");
        }
        restore_reading_clause(reading, ctx);
        wrote_anything = true;
    }
    for updating in &part.updating_clauses {
        if wrote_anything {
            ctx.write_raw(" ");
        }
        restore_updating_clause(updating, ctx);
        wrote_anything = true;
    }
    if let Some(with) = &part.with {
        if wrote_anything {
            ctx.write_raw(" ");
        }
        restore_with_clause(with, ctx);
        wrote_anything = true;
    }
    !wrote_anything
}

fn restore_reading_clause(clause: &ReadingClause, ctx: &mut RestoreContext<'_>) {
    match clause {
        ReadingClause::Match(m) => restore_match_clause(m, ctx),
        ReadingClause::Unwind(u) => restore_unwind_clause(u, ctx),
    }
}

fn restore_match_clause(clause: &MatchClause, ctx: &mut RestoreContext<'_>) {
    if clause.optional {
        ctx.write_keyword("optional");
        ctx.write_raw(" ");
    }
    ctx.write_keyword("match");
    ctx.write_raw(" ");
    restore_pattern(&clause.pattern, ctx);
    if let Some(where_expr) = &clause.where_expr {
        ctx.write_raw(" ");
        ctx.write_keyword("where");
        ctx.write_raw(" ");
        restore_expr(where_expr, ctx);
    }
}

fn restore_unwind_clause(clause: &UnwindClause, ctx: &mut RestoreContext<'_>) {
    ctx.write_keyword("unwind");
    ctx.write_raw(" ");
    restore_expr(&clause.expr, ctx);
    ctx.write_raw(" ");
    ctx.write_keyword("as");
    ctx.write_raw(" ");
    ctx.write_ident(clause.variable.text());
}

fn restore_updating_clause(clause: &UpdatingClause, ctx: &mut RestoreContext<'_>) {
    match clause {
        UpdatingClause::Create(c) => {
            ctx.write_keyword("create");
            ctx.write_raw(" ");
            restore_pattern(&c.pattern, ctx);
        }
        UpdatingClause::Merge(m) => {
            ctx.write_keyword("merge");
            ctx.write_raw(" ");
            restore_pattern_part(&m.pattern_part, ctx);
            for action in &m.actions {
                ctx.write_raw(" ");
                ctx.write_keyword("on");
                ctx.write_raw(" ");
                match action.kind {
                    MergeActionKind::OnCreate => ctx.write_keyword("create"),
                    MergeActionKind::OnMatch => ctx.write_keyword("match"),
                }
                ctx.write_raw(" ");
                ctx.write_keyword("set");
                ctx.write_raw(" ");
                restore_set_items(&action.set.items, ctx);
            }
        }
        UpdatingClause::Set(s) => {
            ctx.write_keyword("set");
            ctx.write_raw(" ");
            restore_set_items(&s.items, ctx);
        }
        UpdatingClause::Delete(d) => {
            if d.detach {
                ctx.write_keyword("detach");
                ctx.write_raw(" ");
            }
            ctx.write_keyword("delete");
            ctx.write_raw(" ");
            for (i, expr) in d.exprs.iter().enumerate() {
                if i > 0 {
                    ctx.write_raw(", ");
                }
                restore_expr(expr, ctx);
            }
        }
        UpdatingClause::Remove(r) => {
            ctx.write_keyword("remove");
            ctx.write_raw(" ");
            for (i, item) in r.items.iter().enumerate() {
                if i > 0 {
                    ctx.write_raw(", ");
                }
                match item {
                    RemoveItem::Labels { variable, labels } => {
                        ctx.write_ident(variable.text());
                        restore_label_suffix(labels, ctx);
                    }
                    RemoveItem::Property(target) => {
                        ctx.write_ident(target.base.text());
                        for lookup in &target.lookups {
                            ctx.write_raw(".");
                            ctx.write_ident(lookup.key.text());
                        }
                    }
                }
            }
        }
    }
}

fn restore_set_items(items: &[SetItem], ctx: &mut RestoreContext<'_>) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            ctx.write_raw(", ");
        }
        match item {
            SetItem::Property { target, value } => {
                ctx.write_ident(target.base.text());
                for lookup in &target.lookups {
                    ctx.write_raw(".");
                    ctx.write_ident(lookup.key.text());
                }
                ctx.write_raw(" = ");
                restore_expr(value, ctx);
            }
            SetItem::VariableAssignment {
                variable,
                value,
                mode,
            } => {
                ctx.write_ident(variable.text());
                match mode {
                    AssignmentMode::Replace => ctx.write_raw(" = "),
                    AssignmentMode::Merge => ctx.write_raw(" += "),
                }
                restore_expr(value, ctx);
            }
            SetItem::VariableLabels { variable, labels } => {
                ctx.write_ident(variable.text());
                restore_label_suffix(labels, ctx);
            }
        }
    }
}

fn restore_with_clause(clause: &WithClause, ctx: &mut RestoreContext<'_>) {
    ctx.write_keyword("with");
    if clause.body.distinct {
        ctx.write_raw(" ");
        ctx.write_keyword("distinct");
    }
    ctx.write_raw(" ");
    restore_return_body(&clause.body, ctx);
    if let Some(where_expr) = &clause.where_expr {
        ctx.write_raw(" ");
        ctx.write_keyword("where");
        ctx.write_raw(" ");
        restore_expr(where_expr, ctx);
    }
}

fn restore_return_body(body: &ReturnBody, ctx: &mut RestoreContext<'_>) {
    match &body.items {
        ReturnItems::All => ctx.write_raw("*"),
        ReturnItems::Explicit(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    ctx.write_raw(", ");
                }
                restore_expr(&item.expr, ctx);
                if let Some(alias) = &item.alias {
                    ctx.write_raw(" ");
                    ctx.write_keyword("as");
                    ctx.write_raw(" ");
                    ctx.write_ident(alias.text());
                }
            }
        }
    }
    if !body.order_by.is_empty() {
        ctx.write_raw(" ");
        ctx.write_keyword("order by");
        ctx.write_raw(" ");
        for (i, item) in body.order_by.iter().enumerate() {
            if i > 0 {
                ctx.write_raw(", ");
            }
            restore_expr(&item.expr, ctx);
            ctx.write_raw(" ");
            match item.direction {
                SortDirection::Ascending => ctx.write_keyword("asc"),
                SortDirection::Descending => ctx.write_keyword("desc"),
            }
        }
    }
    if let Some(skip) = &body.skip {
        ctx.write_raw(" ");
        ctx.write_keyword("skip");
        ctx.write_raw(" ");
        restore_expr(skip, ctx);
    }
    if let Some(limit) = &body.limit {
        ctx.write_raw(" ");
        ctx.write_keyword("limit");
        ctx.write_raw(" ");
        restore_expr(limit, ctx);
    }
}

fn restore_label_suffix(labels: &[SchemaName], ctx: &mut RestoreContext<'_>) {
    for label in labels {
        ctx.write_raw(":");
        restore_schema_name(label, ctx);
    }
}

/// Labels, relationship types, and map keys are written bare, except that a
/// name only lexable in backtick-escaped form keeps its backticks.
fn restore_schema_name(name: &SchemaName, ctx: &mut RestoreContext<'_>) {
    match name {
        SchemaName::Symbolic(sym) if sym.form == SymbolicNameForm::Escaped => {
            ctx.write_ident(sym.text());
        }
        other => ctx.write_raw(other.text()),
    }
}

fn restore_pattern(pattern: &Pattern, ctx: &mut RestoreContext<'_>) {
    for (i, part) in pattern.parts.iter().enumerate() {
        if i > 0 {
            ctx.write_raw(", ");
        }
        restore_pattern_part(part, ctx);
    }
}

fn restore_pattern_part(part: &PatternPart, ctx: &mut RestoreContext<'_>) {
    if let Some(variable) = &part.variable {
        ctx.write_ident(variable.text());
        ctx.write_raw(" = ");
    }
    restore_pattern_element(&part.element, ctx);
}

fn restore_pattern_element(element: &PatternElement, ctx: &mut RestoreContext<'_>) {
    for (i, node) in element.nodes.iter().enumerate() {
        restore_node_pattern(node, ctx);
        if let Some(rel) = element.relationships.get(i) {
            restore_relationship_pattern(rel, ctx);
        }
    }
}

fn restore_node_pattern(node: &NodePattern, ctx: &mut RestoreContext<'_>) {
    ctx.write_raw("(");
    if let Some(variable) = &node.variable {
        ctx.write_ident(variable.text());
    }
    restore_label_suffix(&node.labels, ctx);
    if let Some(props) = &node.properties {
        restore_properties(props, ctx);
    }
    ctx.write_raw(")");
}

fn restore_relationship_pattern(rel: &RelationshipPattern, ctx: &mut RestoreContext<'_>) {
    let (left_arrow, right_arrow) = match rel.direction {
        RelationshipDirection::Left => ("<-", "-"),
        RelationshipDirection::Right => ("-", "->"),
        RelationshipDirection::Both => ("<-", "->"),
        RelationshipDirection::Undirected => ("-", "-"),
    };
    ctx.write_raw(left_arrow);
    ctx.write_raw("[");
    if let Some(variable) = &rel.variable {
        ctx.write_ident(variable.text());
    }
    for (i, ty) in rel.types.iter().enumerate() {
        ctx.write_raw(if i == 0 { ":" } else { "|" });
        restore_schema_name(ty, ctx);
    }
    restore_hop_range(rel.range, ctx);
    if let Some(props) = &rel.properties {
        restore_properties(props, ctx);
    }
    ctx.write_raw("]");
    ctx.write_raw(right_arrow);
}

fn restore_hop_range(range: HopRange, ctx: &mut RestoreContext<'_>) {
    match range {
        HopRange::Unbounded => ctx.write_raw("*"),
        HopRange::Exact(n) => {
            ctx.write_raw("*");
            ctx.write_value(n);
        }
        HopRange::AtLeast(n) => {
            ctx.write_raw("*");
            ctx.write_value(n);
            ctx.write_raw("..");
        }
        HopRange::Between(n, m) => {
            ctx.write_raw("*");
            ctx.write_value(n);
            ctx.write_raw("..");
            ctx.write_value(m);
        }
        HopRange::UpTo(m) => {
            ctx.write_raw("*..");
            ctx.write_value(m);
        }
    }
}

fn restore_properties(props: &Properties, ctx: &mut RestoreContext<'_>) {
    match props {
        Properties::Map { entries, .. } => {
            ctx.write_raw("{");
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    ctx.write_raw(", ");
                }
                restore_schema_name(key, ctx);
                ctx.write_raw(": ");
                restore_expr(value, ctx);
            }
            ctx.write_raw("}");
        }
        Properties::Parameter { name, .. } => {
            ctx.write_raw("$");
            ctx.write_raw(name.as_str());
        }
    }
}

fn restore_expr(expr: &Expr, ctx: &mut RestoreContext<'_>) {
    match expr {
        Expr::Binary(b) => restore_binary(b, ctx),
        Expr::Unary(u) => {
            match u.op {
                UnaryOp::Not => {
                    ctx.write_keyword("not");
                    ctx.write_raw(" ");
                }
                UnaryOp::Plus => ctx.write_raw("+"),
                UnaryOp::Neg => ctx.write_raw("-"),
            }
            restore_expr(&u.operand, ctx);
        }
        Expr::Predication(p) => {
            restore_expr(&p.expr, ctx);
            ctx.write_raw(" ");
            ctx.write_keyword("is");
            ctx.write_raw(" ");
            if matches!(p.kind, PredicationKind::IsNotNull) {
                ctx.write_keyword("not");
                ctx.write_raw(" ");
            }
            ctx.write_keyword("null");
        }
        Expr::StringOp(s) => {
            restore_expr(&s.lhs, ctx);
            ctx.write_raw(" ");
            ctx.write_keyword(s.op.as_str());
            ctx.write_raw(" ");
            restore_expr(&s.rhs, ctx);
        }
        Expr::ListOp(l) => {
            restore_expr(&l.expr, ctx);
            match &l.kind {
                ListOperationKind::In(rhs) => {
                    ctx.write_raw(" ");
                    ctx.write_keyword("in");
                    ctx.write_raw(" ");
                    restore_expr(rhs, ctx);
                }
                ListOperationKind::Index(index) => {
                    ctx.write_raw("[");
                    restore_expr(index, ctx);
                    ctx.write_raw("]");
                }
                ListOperationKind::Range { lower, upper } => {
                    ctx.write_raw("[");
                    if let Some(lower) = lower {
                        restore_expr(lower, ctx);
                    }
                    ctx.write_raw("..");
                    if let Some(upper) = upper {
                        restore_expr(upper, ctx);
                    }
                    ctx.write_raw("]");
                }
            }
        }
        Expr::PropertyOrLabels(pl) => restore_property_or_labels(pl, ctx),
    }
}

fn restore_binary(b: &BinaryExpr, ctx: &mut RestoreContext<'_>) {
    restore_expr(&b.left, ctx);
    ctx.write_raw(" ");
    ctx.write_raw(b.op.as_str());
    ctx.write_raw(" ");
    restore_expr(&b.right, ctx);
}

fn restore_property_or_labels(pl: &PropertyOrLabelsExpr, ctx: &mut RestoreContext<'_>) {
    restore_atom(&pl.atom, ctx);
    for lookup in &pl.property_lookups {
        ctx.write_raw(".");
        ctx.write_ident(lookup.key.text());
    }
    restore_label_suffix(&pl.node_labels, ctx);
}

fn restore_atom(atom: &Atom, ctx: &mut RestoreContext<'_>) {
    match atom {
        Atom::Literal(lit) => restore_literal(lit, ctx),
        Atom::Parameter(name) => {
            ctx.write_raw("$");
            ctx.write_raw(name.as_str());
        }
        Atom::Case(case) => {
            ctx.write_keyword("case");
            if let Some(test) = &case.test {
                ctx.write_raw(" ");
                restore_expr(test, ctx);
            }
            for alt in &case.alternatives {
                ctx.write_raw(" ");
                ctx.write_keyword("when");
                ctx.write_raw(" ");
                restore_expr(&alt.when, ctx);
                ctx.write_raw(" ");
                ctx.write_keyword("then");
                ctx.write_raw(" ");
                restore_expr(&alt.then, ctx);
            }
            if let Some(default) = &case.default {
                ctx.write_raw(" ");
                ctx.write_keyword("else");
                ctx.write_raw(" ");
                restore_expr(default, ctx);
            }
            ctx.write_raw(" ");
            ctx.write_keyword("end");
        }
        Atom::CountStar => {
            ctx.write_keyword("count");
            ctx.write_raw("(*)");
        }
        Atom::PatternComprehension(pc) => {
            ctx.write_raw("[");
            if let Some(variable) = &pc.variable {
                ctx.write_ident(variable.text());
                ctx.write_raw(" = ");
            }
            restore_pattern_element(&pc.pattern, ctx);
            if let Some(where_expr) = &pc.where_expr {
                ctx.write_raw(" ");
                ctx.write_keyword("where");
                ctx.write_raw(" ");
                restore_expr(where_expr, ctx);
            }
            ctx.write_raw(" | ");
            restore_expr(&pc.projection, ctx);
            ctx.write_raw("]");
        }
        Atom::AllFilter(f) => restore_filter(ctx, "all", f),
        Atom::AnyFilter(f) => restore_filter(ctx, "any", f),
        Atom::NoneFilter(f) => restore_filter(ctx, "none", f),
        Atom::SingleFilter(f) => restore_filter(ctx, "single", f),
        Atom::ExtractComprehension(lc) => {
            ctx.write_raw("[");
            ctx.write_ident(lc.filter.variable.text());
            ctx.write_raw(" ");
            ctx.write_keyword("in");
            ctx.write_raw(" ");
            restore_expr(&lc.filter.in_expr, ctx);
            if let Some(where_expr) = &lc.filter.where_expr {
                ctx.write_raw(" ");
                ctx.write_keyword("where");
                ctx.write_raw(" ");
                restore_expr(where_expr, ctx);
            }
            if let Some(projection) = &lc.projection {
                ctx.write_raw(" | ");
                restore_expr(projection, ctx);
            }
            ctx.write_raw("]");
        }
        Atom::Pattern(pe) => restore_pattern_element(pe, ctx),
        Atom::Parenthesized(inner) => {
            ctx.write_raw("(");
            restore_expr(inner, ctx);
            ctx.write_raw(")");
        }
        Atom::Variable(variable) => ctx.write_ident(variable.text()),
    }
}

fn restore_filter(
    ctx: &mut RestoreContext<'_>,
    keyword: &str,
    filter: &super::expression::FilterExpr,
) {
    ctx.write_keyword(keyword);
    ctx.write_raw("(");
    ctx.write_ident(filter.variable.text());
    ctx.write_raw(" ");
    ctx.write_keyword("in");
    ctx.write_raw(" ");
    restore_expr(&filter.in_expr, ctx);
    if let Some(where_expr) = &filter.where_expr {
        ctx.write_raw(" ");
        ctx.write_keyword("where");
        ctx.write_raw(" ");
        restore_expr(where_expr, ctx);
    }
    ctx.write_raw(")");
}

fn restore_literal(lit: &Literal, ctx: &mut RestoreContext<'_>) {
    match lit {
        Literal::Integer(raw) => {
            ctx.write_value(parse_integer_literal(raw.as_str()));
        }
        Literal::Float(raw) => {
            let value: f64 = raw.as_str().parse().unwrap_or(0.0);
            ctx.write_value(format_args!("{value:.6}"));
        }
        Literal::String(raw) => ctx.write_string(raw.as_str()),
        Literal::Boolean(b) => ctx.write_keyword(if *b { "true" } else { "false" }),
        Literal::Null => ctx.write_keyword("null"),
        Literal::List(items) => {
            ctx.write_raw("[");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    ctx.write_raw(", ");
                }
                restore_expr(item, ctx);
            }
            ctx.write_raw("]");
        }
        Literal::Map(entries) => {
            ctx.write_raw("{");
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    ctx.write_raw(", ");
                }
                restore_schema_name(key, ctx);
                ctx.write_raw(": ");
                restore_expr(value, ctx);
            }
            ctx.write_raw("}");
        }
    }
}

/// Re-derives a base-10 value from a decimal, hex (`0x`), or octal (`0o`)
/// integer literal's raw source text, since restoration always emits
/// base-10 regardless of how the literal was written.
fn parse_integer_literal(raw: &str) -> i128 {
    let (negative, raw) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let value = if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        i128::from_str_radix(hex, 16).unwrap_or(0)
    } else if let Some(oct) = raw.strip_prefix("0o").or_else(|| raw.strip_prefix("0O")) {
        i128::from_str_radix(oct, 8).unwrap_or(0)
    } else {
        raw.parse().unwrap_or(0)
    };
    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::clause::*;
    use crate::ast::expression::*;
    use crate::ast::identifier::{SymbolicName, SymbolicNameForm, Variable};
    use crate::ast::pattern::*;

    fn ident(name: &str) -> SymbolicName {
        SymbolicName::new(name, SymbolicNameForm::Unescaped, 0..name.len())
    }

    fn var_expr(name: &str) -> Expr {
        Expr::PropertyOrLabels(PropertyOrLabelsExpr {
            atom: Box::new(Atom::Variable(Variable::new(ident(name), 0..name.len()))),
            property_lookups: Vec::new(),
            node_labels: Vec::new(),
            span: 0..name.len(),
        })
    }

    #[test]
    fn integer_literal_restores_hex_as_decimal() {
        assert_eq!(parse_integer_literal("0x1F"), 31);
        assert_eq!(parse_integer_literal("0o17"), 15);
        assert_eq!(parse_integer_literal("42"), 42);
    }

    #[test]
    fn match_return_scenario_matches_canonical_form() {
        let node = NodePattern {
            variable: Some(Variable::new(ident("n"), 0..1)),
            labels: Vec::new(),
            properties: None,
            span: 0..1,
        };
        let pattern = Pattern {
            parts: vec![PatternPart {
                variable: None,
                element: PatternElement {
                    nodes: vec![node],
                    relationships: Vec::new(),
                    span: 0..1,
                },
                span: 0..1,
            }],
            span: 0..1,
        };
        let query = SingleQuery {
            parts: vec![QueryPart {
                reading_clauses: vec![ReadingClause::Match(MatchClause {
                    optional: false,
                    pattern,
                    where_expr: None,
                    span: 0..0,
                })],
                updating_clauses: Vec::new(),
                with: None,
                span: 0..0,
            }],
            return_clause: Some(ReturnClause {
                body: ReturnBody {
                    distinct: false,
                    items: ReturnItems::Explicit(vec![ProjectionItem {
                        expr: var_expr("n"),
                        alias: None,
                        span: 0..1,
                    }]),
                    order_by: Vec::new(),
                    skip: None,
                    limit: None,
                    span: 0..0,
                },
                span: 0..0,
            }),
            span: 0..0,
        };
        let statement = CypherStatement::Query(RegularQuery {
            query,
            unions: Vec::new(),
            span: 0..0,
        });
        assert_eq!(
            restore_to_string(&statement),
            "MATCH (`n`) RETURN `n`"
        );
    }

    #[test]
    fn relationship_pattern_with_no_explicit_range_restores_single_hop() {
        let mut out = String::new();
        let mut ctx = RestoreContext::new(&mut out);
        let rel = RelationshipPattern {
            variable: None,
            types: Vec::new(),
            range: HopRange::single_hop(),
            properties: None,
            direction: RelationshipDirection::Undirected,
            span: 0..0,
        };
        restore_relationship_pattern(&rel, &mut ctx);
        assert_eq!(out, "-[*1..1]-");
    }

    #[test]
    fn float_literal_restores_with_six_decimal_places() {
        let mut out = String::new();
        let mut ctx = RestoreContext::new(&mut out);
        restore_literal(&Literal::Float("1.2".into()), &mut ctx);
        assert_eq!(out, "1.200000");
    }
}
