//! Lowers the concrete syntax tree into the typed AST.
//!
//! Every function here takes the one [`CstNode`] a grammar rule produces and
//! returns the corresponding typed node. The precedence cascade
//! (`orExpression` down to `propertyOrLabelsExpression`) collapses along the
//! way: a level with a single operand and no operator token lowers straight
//! through to its operand's own `Expr`, and a level with operators folds
//! left-associatively into nested [`BinaryExpr`]/[`UnaryExpr`] nodes. Nothing
//! here re-parses source text; it only re-shapes what the grammar parser
//! already matched.

use smol_str::SmolStr;

use crate::ast::Span;
use crate::ast::clause::{
    AssignmentMode, CreateClause, DeleteClause, MatchClause, MergeAction, MergeActionKind,
    MergeClause, ProjectionItem, PropertyTarget, ReadingClause, RemoveClause, RemoveItem,
    ReturnBody, ReturnClause, ReturnItems, SetClause, SetItem, SortDirection, SortItem,
    UnwindClause, UpdatingClause, WithClause,
};
use crate::ast::expression::{
    Atom, BinaryExpr, BinaryOp, CaseAlt, CaseExpr, Expr, FilterExpr, ListComprehension,
    ListOperationExpr, ListOperationKind, Literal, PatternComprehension, PredicationExpr,
    PredicationKind, PropertyLookup, PropertyOrLabelsExpr, StringOperationExpr, StringOperator,
    UnaryExpr, UnaryOp,
};
use crate::ast::identifier::{SchemaName, SymbolicName, SymbolicNameForm, Variable};
use crate::ast::pattern::{
    HopRange, NodePattern, Pattern, PatternElement, PatternPart, Properties,
    RelationshipDirection, RelationshipPattern,
};
use crate::ast::query::{CypherStatement, QueryPart, RegularQuery, SingleQuery, UnionClause};
use crate::cst::{CstChild, CstNode, Rule};
use crate::error::CypherError;
use crate::lexer::token::{Token, TokenKind};

type ConvertResult<T> = Result<T, CypherError>;

fn syntax_error(span: &Span, expected_rule: &'static str, message: impl Into<String>) -> CypherError {
    CypherError::SyntaxError {
        message: message.into(),
        span: span.clone(),
        expected_rule,
    }
}

fn expect_node<'a>(
    iter: &mut std::slice::Iter<'a, CstChild>,
    span: &Span,
    expected_rule: &'static str,
) -> ConvertResult<&'a CstNode> {
    match iter.next() {
        Some(CstChild::Node(n)) => Ok(n),
        _ => Err(syntax_error(span, expected_rule, format!("expected {expected_rule}"))),
    }
}

fn expect_token<'a>(
    iter: &mut std::slice::Iter<'a, CstChild>,
    span: &Span,
    expected_rule: &'static str,
) -> ConvertResult<&'a Token> {
    match iter.next() {
        Some(CstChild::Token(t)) => Ok(t),
        _ => Err(syntax_error(span, expected_rule, format!("expected {expected_rule}"))),
    }
}

// ---------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------

/// Entry point: lowers a top-level `regularQuery`/`standaloneCall` node.
///
/// A `standaloneCall` node parses successfully (the grammar accepts it) but
/// is always rejected here: the procedure body it would introduce is out of
/// scope, so `CypherStatement::StandaloneCall` is never actually produced.
pub fn convert_statement(node: &CstNode) -> ConvertResult<CypherStatement> {
    match node.rule {
        Rule::RegularQuery => Ok(CypherStatement::Query(convert_regular_query(node)?)),
        Rule::StandaloneCall => Err(CypherError::UnsupportedFeature {
            rule: "standaloneCall",
            span: node.span.clone(),
        }),
        other => Err(syntax_error(
            &node.span,
            "regularQuery",
            format!("unexpected top-level node: {}", other.name()),
        )),
    }
}

fn convert_regular_query(node: &CstNode) -> ConvertResult<RegularQuery> {
    let mut nodes = node.nodes();
    let first = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "singleQuery", "query has no body"))?;
    let query = convert_single_query(first)?;
    let unions = nodes.map(convert_union_clause).collect::<ConvertResult<Vec<_>>>()?;
    Ok(RegularQuery {
        query,
        unions,
        span: node.span.clone(),
    })
}

fn convert_union_clause(node: &CstNode) -> ConvertResult<UnionClause> {
    let all = node.has_token(&TokenKind::All);
    let query_node = node
        .nodes()
        .next()
        .ok_or_else(|| syntax_error(&node.span, "singleQuery", "UNION with no query"))?;
    Ok(UnionClause {
        all,
        query: convert_single_query(query_node)?,
        span: node.span.clone(),
    })
}

fn convert_single_query(node: &CstNode) -> ConvertResult<SingleQuery> {
    let mut parts = Vec::new();
    let mut return_clause = None;
    for n in node.nodes() {
        match n.rule {
            Rule::QueryPart => parts.push(convert_query_part(n)?),
            Rule::ReturnClause => return_clause = Some(convert_return_clause(n)?),
            other => {
                return Err(syntax_error(
                    &node.span,
                    "singleQuery",
                    format!("unexpected child in singleQuery: {}", other.name()),
                ));
            }
        }
    }
    Ok(SingleQuery {
        parts,
        return_clause,
        span: node.span.clone(),
    })
}

fn convert_query_part(node: &CstNode) -> ConvertResult<QueryPart> {
    let mut reading_clauses = Vec::new();
    let mut updating_clauses = Vec::new();
    let mut with = None;
    for n in node.nodes() {
        match n.rule {
            Rule::ReadingClause => reading_clauses.push(convert_reading_clause(n)?),
            Rule::UpdatingClause => updating_clauses.push(convert_updating_clause(n)?),
            Rule::WithClause => with = Some(convert_with_clause(n)?),
            other => {
                return Err(syntax_error(
                    &node.span,
                    "queryPart",
                    format!("unexpected child in queryPart: {}", other.name()),
                ));
            }
        }
    }
    Ok(QueryPart {
        reading_clauses,
        updating_clauses,
        with,
        span: node.span.clone(),
    })
}

// ---------------------------------------------------------------------
// Reading / updating clauses
// ---------------------------------------------------------------------

fn convert_reading_clause(node: &CstNode) -> ConvertResult<ReadingClause> {
    let inner = node
        .nodes()
        .next()
        .ok_or_else(|| syntax_error(&node.span, "readingClause", "empty reading clause"))?;
    match inner.rule {
        Rule::MatchClause => Ok(ReadingClause::Match(convert_match_clause(inner)?)),
        Rule::UnwindClause => Ok(ReadingClause::Unwind(convert_unwind_clause(inner)?)),
        other => Err(syntax_error(
            &node.span,
            "readingClause",
            format!("unexpected reading clause: {}", other.name()),
        )),
    }
}

fn convert_match_clause(node: &CstNode) -> ConvertResult<MatchClause> {
    let optional = node.has_token(&TokenKind::Optional);
    let mut nodes = node.nodes();
    let pattern_node = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "pattern", "MATCH with no pattern"))?;
    let pattern = convert_pattern(pattern_node)?;
    let where_expr = nodes.next().map(convert_expr).transpose()?;
    Ok(MatchClause {
        optional,
        pattern,
        where_expr,
        span: node.span.clone(),
    })
}

fn convert_unwind_clause(node: &CstNode) -> ConvertResult<UnwindClause> {
    let mut nodes = node.nodes();
    let expr_node = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "expression", "UNWIND with no expression"))?;
    let expr = convert_expr(expr_node)?;
    let var_node = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "variable", "UNWIND with no AS variable"))?;
    let variable = convert_variable(var_node)?;
    Ok(UnwindClause {
        expr,
        variable,
        span: node.span.clone(),
    })
}

fn convert_updating_clause(node: &CstNode) -> ConvertResult<UpdatingClause> {
    let inner = node
        .nodes()
        .next()
        .ok_or_else(|| syntax_error(&node.span, "updatingClause", "empty updating clause"))?;
    match inner.rule {
        Rule::CreateClause => Ok(UpdatingClause::Create(convert_create_clause(inner)?)),
        Rule::MergeClause => Ok(UpdatingClause::Merge(convert_merge_clause(inner)?)),
        Rule::SetClause => Ok(UpdatingClause::Set(convert_set_clause(inner)?)),
        Rule::DeleteClause => Ok(UpdatingClause::Delete(convert_delete_clause(inner)?)),
        Rule::RemoveClause => Ok(UpdatingClause::Remove(convert_remove_clause(inner)?)),
        other => Err(syntax_error(
            &node.span,
            "updatingClause",
            format!("unexpected updating clause: {}", other.name()),
        )),
    }
}

fn convert_create_clause(node: &CstNode) -> ConvertResult<CreateClause> {
    let pattern_node = node
        .nodes()
        .next()
        .ok_or_else(|| syntax_error(&node.span, "pattern", "CREATE with no pattern"))?;
    Ok(CreateClause {
        pattern: convert_pattern(pattern_node)?,
        span: node.span.clone(),
    })
}

fn convert_merge_clause(node: &CstNode) -> ConvertResult<MergeClause> {
    let mut nodes = node.nodes();
    let part_node = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "patternPart", "MERGE with no pattern"))?;
    let pattern_part = convert_pattern_part(part_node)?;
    let actions = nodes.map(convert_merge_action).collect::<ConvertResult<Vec<_>>>()?;
    Ok(MergeClause {
        pattern_part,
        actions,
        span: node.span.clone(),
    })
}

fn convert_merge_action(node: &CstNode) -> ConvertResult<MergeAction> {
    let kind_tok = node
        .tokens()
        .find(|t| matches!(t.kind, TokenKind::Create | TokenKind::Match))
        .ok_or_else(|| syntax_error(&node.span, "mergeAction", "ON with no CREATE/MATCH"))?;
    let kind = match kind_tok.kind {
        TokenKind::Create => MergeActionKind::OnCreate,
        TokenKind::Match => MergeActionKind::OnMatch,
        _ => unreachable!(),
    };
    let set_node = node
        .nodes()
        .next()
        .ok_or_else(|| syntax_error(&node.span, "setClause", "merge action with no SET body"))?;
    Ok(MergeAction {
        kind,
        set: convert_set_clause(set_node)?,
        span: node.span.clone(),
    })
}

fn convert_set_clause(node: &CstNode) -> ConvertResult<SetClause> {
    let items = node.nodes().map(convert_set_item).collect::<ConvertResult<Vec<_>>>()?;
    Ok(SetClause {
        items,
        span: node.span.clone(),
    })
}

/// `setItem` has three shapes, disambiguated without re-scanning tokens:
/// a colon branch carries only `schemaName` children and never an `=`; the
/// dot branch always ends in exactly one expression preceded by zero or more
/// `schemaName` lookups, so "no lookups" means a whole-variable assignment
/// and "one or more" means a property write.
fn convert_set_item(node: &CstNode) -> ConvertResult<SetItem> {
    let nodes: Vec<&CstNode> = node.nodes().collect();
    let variable_node = *nodes
        .first()
        .ok_or_else(|| syntax_error(&node.span, "variable", "empty SET item"))?;
    let variable = convert_variable(variable_node)?;

    if node.has_token(&TokenKind::Eq) {
        let value_node = *nodes
            .last()
            .ok_or_else(|| syntax_error(&node.span, "expression", "SET item with no value"))?;
        let value = convert_expr(value_node)?;
        let lookup_nodes = &nodes[1..nodes.len() - 1];
        if lookup_nodes.is_empty() {
            let mode = if node.has_token(&TokenKind::Plus) {
                AssignmentMode::Merge
            } else {
                AssignmentMode::Replace
            };
            Ok(SetItem::VariableAssignment { variable, value, mode })
        } else {
            let lookups = convert_property_lookups(lookup_nodes)?;
            let target_span = variable_node.span.start..lookups.last().unwrap().span.end;
            Ok(SetItem::Property {
                target: PropertyTarget {
                    base: variable,
                    lookups,
                    span: target_span,
                },
                value,
            })
        }
    } else {
        let labels = nodes[1..]
            .iter()
            .map(|n| convert_schema_name(n))
            .collect::<ConvertResult<Vec<_>>>()?;
        Ok(SetItem::VariableLabels { variable, labels })
    }
}

fn convert_property_lookups(nodes: &[&CstNode]) -> ConvertResult<Vec<PropertyLookup>> {
    nodes
        .iter()
        .map(|n| {
            Ok(PropertyLookup {
                key: convert_schema_name(n)?,
                span: n.span.clone(),
            })
        })
        .collect()
}

fn convert_delete_clause(node: &CstNode) -> ConvertResult<DeleteClause> {
    let detach = node.has_token(&TokenKind::Detach);
    let exprs = node.nodes().map(convert_expr).collect::<ConvertResult<Vec<_>>>()?;
    Ok(DeleteClause {
        detach,
        exprs,
        span: node.span.clone(),
    })
}

fn convert_remove_clause(node: &CstNode) -> ConvertResult<RemoveClause> {
    let items = node.nodes().map(convert_remove_item).collect::<ConvertResult<Vec<_>>>()?;
    Ok(RemoveClause {
        items,
        span: node.span.clone(),
    })
}

fn convert_remove_item(node: &CstNode) -> ConvertResult<RemoveItem> {
    let mut nodes = node.nodes();
    let variable_node = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "variable", "empty REMOVE item"))?;
    let variable = convert_variable(variable_node)?;
    let rest: Vec<&CstNode> = nodes.collect();
    if node.has_token(&TokenKind::Colon) {
        let labels = rest
            .iter()
            .map(|n| convert_schema_name(n))
            .collect::<ConvertResult<Vec<_>>>()?;
        Ok(RemoveItem::Labels { variable, labels })
    } else {
        let lookups = convert_property_lookups(&rest)?;
        let span = variable_node.span.start
            ..lookups
                .last()
                .map(|l| l.span.end)
                .unwrap_or(variable_node.span.end);
        Ok(RemoveItem::Property(PropertyTarget {
            base: variable,
            lookups,
            span,
        }))
    }
}

fn convert_with_clause(node: &CstNode) -> ConvertResult<WithClause> {
    let distinct = node.has_token(&TokenKind::Distinct);
    let mut nodes = node.nodes();
    let body_node = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "returnBody", "WITH with no body"))?;
    let body = convert_return_body(body_node, distinct)?;
    let where_expr = nodes.next().map(convert_expr).transpose()?;
    Ok(WithClause {
        body,
        where_expr,
        span: node.span.clone(),
    })
}

fn convert_return_clause(node: &CstNode) -> ConvertResult<ReturnClause> {
    let distinct = node.has_token(&TokenKind::Distinct);
    let body_node = node
        .nodes()
        .next()
        .ok_or_else(|| syntax_error(&node.span, "returnBody", "RETURN with no body"))?;
    Ok(ReturnClause {
        body: convert_return_body(body_node, distinct)?,
        span: node.span.clone(),
    })
}

fn convert_return_body(node: &CstNode, distinct: bool) -> ConvertResult<ReturnBody> {
    let items = if node.has_token(&TokenKind::Star) {
        ReturnItems::All
    } else {
        let projections = node
            .nodes_of_rule(Rule::ProjectionItem)
            .map(convert_projection_item)
            .collect::<ConvertResult<Vec<_>>>()?;
        ReturnItems::Explicit(projections)
    };
    let order_by = node
        .nodes_of_rule(Rule::SortItem)
        .map(convert_sort_item)
        .collect::<ConvertResult<Vec<_>>>()?;

    let mut skip = None;
    let mut limit = None;
    let mut children = node.children.iter();
    while let Some(child) = children.next() {
        let CstChild::Token(tok) = child else { continue };
        match tok.kind {
            TokenKind::Skip => {
                if let Some(CstChild::Node(n)) = children.next() {
                    skip = Some(convert_expr(n)?);
                }
            }
            TokenKind::Limit => {
                if let Some(CstChild::Node(n)) = children.next() {
                    limit = Some(convert_expr(n)?);
                }
            }
            _ => {}
        }
    }

    Ok(ReturnBody {
        distinct,
        items,
        order_by,
        skip,
        limit,
        span: node.span.clone(),
    })
}

fn convert_projection_item(node: &CstNode) -> ConvertResult<ProjectionItem> {
    let mut nodes = node.nodes();
    let expr_node = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "expression", "empty projection item"))?;
    let expr = convert_expr(expr_node)?;
    let alias = nodes.next().map(convert_variable).transpose()?;
    Ok(ProjectionItem {
        expr,
        alias,
        span: node.span.clone(),
    })
}

fn convert_sort_item(node: &CstNode) -> ConvertResult<SortItem> {
    let expr_node = node
        .nodes()
        .next()
        .ok_or_else(|| syntax_error(&node.span, "expression", "empty sort item"))?;
    let expr = convert_expr(expr_node)?;
    let direction = match node.tokens().next().map(|t| &t.kind) {
        Some(TokenKind::Desc) | Some(TokenKind::Descending) => SortDirection::Descending,
        _ => SortDirection::Ascending,
    };
    Ok(SortItem {
        expr,
        direction,
        span: node.span.clone(),
    })
}

// ---------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------

fn convert_pattern(node: &CstNode) -> ConvertResult<Pattern> {
    let parts = node
        .nodes()
        .map(convert_pattern_part)
        .collect::<ConvertResult<Vec<_>>>()?;
    Ok(Pattern {
        parts,
        span: node.span.clone(),
    })
}

fn convert_pattern_part(node: &CstNode) -> ConvertResult<PatternPart> {
    let mut nodes = node.nodes().peekable();
    let variable = match nodes.peek() {
        Some(n) if n.rule == Rule::Variable => Some(convert_variable(nodes.next().unwrap())?),
        _ => None,
    };
    let element_node = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "patternElement", "pattern part has no element"))?;
    Ok(PatternPart {
        variable,
        element: convert_pattern_element(element_node)?,
        span: node.span.clone(),
    })
}

fn convert_pattern_element(node: &CstNode) -> ConvertResult<PatternElement> {
    let nodes: Vec<&CstNode> = node.nodes().collect();
    if nodes.len() == 1 && nodes[0].rule == Rule::PatternElement {
        return convert_pattern_element(nodes[0]);
    }
    let mut iter = nodes.into_iter();
    let first_node = iter
        .next()
        .ok_or_else(|| syntax_error(&node.span, "nodePattern", "pattern element has no nodes"))?;
    let mut node_patterns = vec![convert_node_pattern(first_node)?];
    let mut relationships = Vec::new();
    while let Some(rel_node) = iter.next() {
        relationships.push(convert_relationship_pattern(rel_node)?);
        let node_after = iter.next().ok_or_else(|| {
            syntax_error(&node.span, "nodePattern", "relationship with no trailing node")
        })?;
        node_patterns.push(convert_node_pattern(node_after)?);
    }
    Ok(PatternElement {
        nodes: node_patterns,
        relationships,
        span: node.span.clone(),
    })
}

fn convert_node_pattern(node: &CstNode) -> ConvertResult<NodePattern> {
    let mut variable = None;
    let mut labels = Vec::new();
    let mut properties = None;
    for n in node.nodes() {
        match n.rule {
            Rule::Variable => variable = Some(convert_variable(n)?),
            Rule::SchemaName => labels.push(convert_schema_name(n)?),
            Rule::Properties => properties = Some(convert_properties(n)?),
            other => {
                return Err(syntax_error(
                    &node.span,
                    "nodePattern",
                    format!("unexpected child in nodePattern: {}", other.name()),
                ));
            }
        }
    }
    Ok(NodePattern {
        variable,
        labels,
        properties,
        span: node.span.clone(),
    })
}

fn convert_relationship_pattern(node: &CstNode) -> ConvertResult<RelationshipPattern> {
    let mut variable = None;
    let mut types = Vec::new();
    let mut range = HopRange::single_hop();
    let mut properties = None;
    for n in node.nodes() {
        match n.rule {
            Rule::Variable => variable = Some(convert_variable(n)?),
            Rule::SchemaName => types.push(convert_schema_name(n)?),
            Rule::RangeLiteral => range = convert_range_literal(n)?,
            Rule::Properties => properties = Some(convert_properties(n)?),
            other => {
                return Err(syntax_error(
                    &node.span,
                    "relationshipPattern",
                    format!("unexpected child in relationshipPattern: {}", other.name()),
                ));
            }
        }
    }
    let has_left = node.has_token(&TokenKind::LeftArrow);
    let has_right = node.has_token(&TokenKind::Arrow);
    let direction = match (has_left, has_right) {
        (true, true) => RelationshipDirection::Both,
        (true, false) => RelationshipDirection::Left,
        (false, true) => RelationshipDirection::Right,
        (false, false) => RelationshipDirection::Undirected,
    };
    Ok(RelationshipPattern {
        variable,
        types,
        range,
        properties,
        direction,
        span: node.span.clone(),
    })
}

fn convert_range_literal(node: &CstNode) -> ConvertResult<HopRange> {
    let tokens: Vec<&Token> = node.tokens().collect();
    let rest = &tokens[1..]; // tokens[0] is '*'
    let dotdot_pos = rest.iter().position(|t| t.kind == TokenKind::DotDot);
    match dotdot_pos {
        None => match rest.first() {
            Some(t) => Ok(HopRange::Exact(parse_hop_integer(t)?)),
            None => Ok(HopRange::Unbounded),
        },
        Some(idx) => {
            let (before, after) = (&rest[..idx], &rest[idx + 1..]);
            match (before.first(), after.first()) {
                (Some(lo), Some(hi)) => Ok(HopRange::Between(parse_hop_integer(lo)?, parse_hop_integer(hi)?)),
                (Some(lo), None) => Ok(HopRange::AtLeast(parse_hop_integer(lo)?)),
                (None, Some(hi)) => Ok(HopRange::UpTo(parse_hop_integer(hi)?)),
                (None, None) => Ok(HopRange::Unbounded),
            }
        }
    }
}

fn parse_hop_integer(token: &Token) -> ConvertResult<u32> {
    match &token.kind {
        TokenKind::IntegerLiteral(raw) => raw.parse::<u32>().map_err(|_| CypherError::MalformedLiteral {
            message: format!("invalid hop count '{raw}'"),
            span: token.span.clone(),
        }),
        other => Err(CypherError::MalformedLiteral {
            message: format!("expected an integer hop count, found {other}"),
            span: token.span.clone(),
        }),
    }
}

fn convert_properties(node: &CstNode) -> ConvertResult<Properties> {
    if let Some(tok) = node.tokens().next() {
        return match &tok.kind {
            TokenKind::Parameter(name) => Ok(Properties::Parameter {
                name: name.clone(),
                span: node.span.clone(),
            }),
            other => Err(syntax_error(
                &node.span,
                "properties",
                format!("expected a parameter, found {other}"),
            )),
        };
    }
    let map_node = node
        .first_of_rule(Rule::MapLiteral)
        .ok_or_else(|| syntax_error(&node.span, "mapLiteral", "properties with no map literal"))?;
    Ok(Properties::Map {
        entries: convert_map_literal(map_node)?,
        span: node.span.clone(),
    })
}

fn convert_map_literal(node: &CstNode) -> ConvertResult<Vec<(SchemaName, Expr)>> {
    let mut entries = Vec::new();
    let mut nodes = node.nodes();
    while let Some(key_node) = nodes.next() {
        let key = convert_schema_name(key_node)?;
        let value_node = nodes
            .next()
            .ok_or_else(|| syntax_error(&node.span, "expression", "map literal entry with no value"))?;
        entries.push((key, convert_expr(value_node)?));
    }
    Ok(entries)
}

// ---------------------------------------------------------------------
// Expressions: the precedence cascade
// ---------------------------------------------------------------------

fn convert_expr(node: &CstNode) -> ConvertResult<Expr> {
    match node.rule {
        Rule::OrExpr
        | Rule::XorExpr
        | Rule::AndExpr
        | Rule::ComparisonExpr
        | Rule::AddOrSubtractExpr
        | Rule::MultiplyDivideModuloExpr
        | Rule::PowerOfExpr => convert_left_assoc(node),
        Rule::NotExpr => convert_not_expr(node),
        Rule::UnaryAddOrSubtractExpr => convert_unary_expr(node),
        Rule::StringListNullOperatorExpr => convert_string_list_null_operator_expr(node),
        Rule::PropertyOrLabelsExpr => convert_property_or_labels_expr(node),
        other => Err(syntax_error(
            &node.span,
            "expression",
            format!("unexpected node in expression position: {}", other.name()),
        )),
    }
}

fn binary_op_for_token(kind: &TokenKind) -> BinaryOp {
    match kind {
        TokenKind::Or => BinaryOp::Or,
        TokenKind::Xor => BinaryOp::Xor,
        TokenKind::And => BinaryOp::And,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Caret => BinaryOp::Pow,
        other => unreachable!("grammar only pushes binary operator tokens here, found {other}"),
    }
}

/// Shared shape of every `OrExpr..PowerOfExpr` level: one operand with no
/// token collapses straight to that operand's `Expr`; N operands with N-1
/// operator tokens fold left-associatively.
fn convert_left_assoc(node: &CstNode) -> ConvertResult<Expr> {
    let mut operands = node.nodes();
    let first = operands
        .next()
        .ok_or_else(|| syntax_error(&node.span, node.rule.name(), "expression with no operand"))?;
    let mut result = convert_expr(first)?;
    for (tok, operand) in node.tokens().zip(operands) {
        let right = convert_expr(operand)?;
        let span = result.span().start..right.span().end;
        result = Expr::Binary(BinaryExpr {
            op: binary_op_for_token(&tok.kind),
            left: Box::new(result),
            right: Box::new(right),
            span,
        });
    }
    Ok(result)
}

fn convert_not_expr(node: &CstNode) -> ConvertResult<Expr> {
    let inner = node
        .nodes()
        .next()
        .ok_or_else(|| syntax_error(&node.span, "notExpression", "empty NOT expression"))?;
    let inner_expr = convert_expr(inner)?;
    if node.has_token(&TokenKind::Not) {
        Ok(Expr::Unary(UnaryExpr {
            op: UnaryOp::Not,
            operand: Box::new(inner_expr),
            span: node.span.clone(),
        }))
    } else {
        Ok(inner_expr)
    }
}

fn convert_unary_expr(node: &CstNode) -> ConvertResult<Expr> {
    let inner = node
        .nodes()
        .next()
        .ok_or_else(|| syntax_error(&node.span, "unaryAddOrSubtractExpression", "empty unary expression"))?;
    let inner_expr = convert_expr(inner)?;
    match node.tokens().next() {
        Some(tok) => {
            let op = match tok.kind {
                TokenKind::Plus => UnaryOp::Plus,
                TokenKind::Minus => UnaryOp::Neg,
                _ => unreachable!("grammar only pushes +/- here"),
            };
            Ok(Expr::Unary(UnaryExpr {
                op,
                operand: Box::new(inner_expr),
                span: node.span.clone(),
            }))
        }
        None => Ok(inner_expr),
    }
}

/// `stringListNullOperatorExpression` appends a variable-shape group per
/// occurrence of `IN`, `STARTS WITH`, `ENDS WITH`, `CONTAINS`,
/// `IS [NOT] NULL`, or a bracketed index/range. Each group is scanned by its
/// leading token, consuming however many further children that shape needs.
fn convert_string_list_null_operator_expr(node: &CstNode) -> ConvertResult<Expr> {
    let mut children = node.children.iter();
    let first_node = expect_node(&mut children, &node.span, "propertyOrLabelsExpression")?;
    let mut result = convert_expr(first_node)?;

    while let Some(child) = children.next() {
        let CstChild::Token(tok) = child else {
            return Err(syntax_error(&node.span, "operator", "expected an operator token"));
        };
        match &tok.kind {
            TokenKind::In => {
                let rhs_node = expect_node(&mut children, &node.span, "expression")?;
                let rhs = convert_expr(rhs_node)?;
                let span = result.span().start..rhs.span().end;
                result = Expr::ListOp(ListOperationExpr {
                    expr: Box::new(result),
                    kind: ListOperationKind::In(Box::new(rhs)),
                    span,
                });
            }
            TokenKind::Starts | TokenKind::Ends => {
                let op = if tok.kind == TokenKind::Starts {
                    StringOperator::StartsWith
                } else {
                    StringOperator::EndsWith
                };
                expect_token(&mut children, &node.span, "WITH")?;
                let rhs_node = expect_node(&mut children, &node.span, "expression")?;
                let rhs = convert_expr(rhs_node)?;
                let span = result.span().start..rhs.span().end;
                result = Expr::StringOp(StringOperationExpr {
                    op,
                    lhs: Box::new(result),
                    rhs: Box::new(rhs),
                    span,
                });
            }
            TokenKind::Contains => {
                let rhs_node = expect_node(&mut children, &node.span, "expression")?;
                let rhs = convert_expr(rhs_node)?;
                let span = result.span().start..rhs.span().end;
                result = Expr::StringOp(StringOperationExpr {
                    op: StringOperator::Contains,
                    lhs: Box::new(result),
                    rhs: Box::new(rhs),
                    span,
                });
            }
            TokenKind::Is => {
                let next = expect_token(&mut children, &node.span, "NULL")?;
                let (kind, end) = if next.kind == TokenKind::Not {
                    let null_tok = expect_token(&mut children, &node.span, "NULL")?;
                    (PredicationKind::IsNotNull, null_tok.span.end)
                } else {
                    (PredicationKind::IsNull, next.span.end)
                };
                let span = result.span().start..end;
                result = Expr::Predication(PredicationExpr {
                    kind,
                    expr: Box::new(result),
                    span,
                });
            }
            TokenKind::LBracket => {
                let mut lower = None;
                let mut upper = None;
                let mut is_range = false;
                let mut next = children.next();
                if let Some(CstChild::Node(n)) = next {
                    lower = Some(Box::new(convert_expr(n)?));
                    next = children.next();
                }
                if let Some(CstChild::Token(t)) = next {
                    if t.kind == TokenKind::DotDot {
                        is_range = true;
                        next = children.next();
                        if let Some(CstChild::Node(n)) = next {
                            upper = Some(Box::new(convert_expr(n)?));
                            next = children.next();
                        }
                    }
                }
                let end = match next {
                    Some(CstChild::Token(t)) if t.kind == TokenKind::RBracket => t.span.end,
                    _ => return Err(syntax_error(&node.span, "]", "unterminated list operator")),
                };
                let span = result.span().start..end;
                let kind = if is_range {
                    ListOperationKind::Range { lower, upper }
                } else {
                    let index = lower.ok_or_else(|| {
                        syntax_error(&node.span, "expression", "list index with no expression")
                    })?;
                    ListOperationKind::Index(index)
                };
                result = Expr::ListOp(ListOperationExpr {
                    expr: Box::new(result),
                    kind,
                    span,
                });
            }
            other => {
                return Err(syntax_error(
                    &node.span,
                    "operator",
                    format!("unexpected operator token: {other}"),
                ));
            }
        }
    }
    Ok(result)
}

/// `propertyOrLabelsExpression` always lowers into the same wrapper, whether
/// or not it carries any lookups or labels: `Expr` has no bare "just an atom"
/// variant, so a plain variable reference is still a `PropertyOrLabelsExpr`
/// with empty lists.
fn convert_property_or_labels_expr(node: &CstNode) -> ConvertResult<Expr> {
    let mut children = node.children.iter();
    let atom_node = expect_node(&mut children, &node.span, "atom")?;
    let atom = convert_atom(atom_node)?;

    let mut property_lookups = Vec::new();
    let mut node_labels = Vec::new();
    while let Some(child) = children.next() {
        let CstChild::Token(tok) = child else {
            return Err(syntax_error(&node.span, "'.' or ':'", "expected a lookup or label marker"));
        };
        let schema_node = expect_node(&mut children, &node.span, "schemaName")?;
        let schema_name = convert_schema_name(schema_node)?;
        match &tok.kind {
            TokenKind::Dot => property_lookups.push(PropertyLookup {
                key: schema_name,
                span: tok.span.start..schema_node.span.end,
            }),
            TokenKind::Colon => node_labels.push(schema_name),
            other => {
                return Err(syntax_error(
                    &node.span,
                    "'.' or ':'",
                    format!("unexpected marker token: {other}"),
                ));
            }
        }
    }

    Ok(Expr::PropertyOrLabels(PropertyOrLabelsExpr {
        atom: Box::new(atom),
        property_lookups,
        node_labels,
        span: node.span.clone(),
    }))
}

// ---------------------------------------------------------------------
// Atoms
// ---------------------------------------------------------------------

fn convert_atom(node: &CstNode) -> ConvertResult<Atom> {
    match node.rule {
        Rule::Literal => Ok(Atom::Literal(convert_literal(node)?)),
        Rule::ListLiteral => Ok(Atom::Literal(convert_list_literal(node)?)),
        Rule::Parameter => {
            let tok = node
                .tokens()
                .next()
                .ok_or_else(|| syntax_error(&node.span, "parameter", "empty parameter"))?;
            match &tok.kind {
                TokenKind::Parameter(name) => Ok(Atom::Parameter(name.clone())),
                other => Err(syntax_error(&node.span, "parameter", format!("expected $name, found {other}"))),
            }
        }
        Rule::CaseExpr => Ok(Atom::Case(convert_case_expr(node)?)),
        Rule::CountStar => Ok(Atom::CountStar),
        Rule::PatternComprehension => Ok(Atom::PatternComprehension(convert_pattern_comprehension(node)?)),
        Rule::FilterExpr => {
            let keyword = node
                .tokens()
                .next()
                .ok_or_else(|| syntax_error(&node.span, "ALL/ANY/NONE/SINGLE", "missing filter keyword"))?;
            let filter_node = node
                .nodes()
                .next()
                .ok_or_else(|| syntax_error(&node.span, "filterExpression", "missing filter body"))?;
            let filter = convert_filter_expr(filter_node)?;
            match &keyword.kind {
                TokenKind::All => Ok(Atom::AllFilter(filter)),
                TokenKind::Any => Ok(Atom::AnyFilter(filter)),
                TokenKind::None => Ok(Atom::NoneFilter(filter)),
                TokenKind::Single => Ok(Atom::SingleFilter(filter)),
                other => Err(syntax_error(
                    &node.span,
                    "ALL/ANY/NONE/SINGLE",
                    format!("unexpected filter keyword: {other}"),
                )),
            }
        }
        Rule::ListComprehension => {
            let mut nodes = node.nodes();
            let filter_node = nodes
                .next()
                .ok_or_else(|| syntax_error(&node.span, "filterExpression", "comprehension with no filter"))?;
            let filter = convert_filter_expr(filter_node)?;
            let projection = nodes.next().map(convert_expr).transpose()?.map(Box::new);
            Ok(Atom::ExtractComprehension(ListComprehension {
                filter,
                projection,
                span: node.span.clone(),
            }))
        }
        Rule::Parenthesized => {
            let inner = node
                .nodes()
                .next()
                .ok_or_else(|| syntax_error(&node.span, "expression", "empty parenthesized expression"))?;
            Ok(Atom::Parenthesized(Box::new(convert_expr(inner)?)))
        }
        Rule::PatternAtom => {
            let element = node
                .nodes()
                .next()
                .ok_or_else(|| syntax_error(&node.span, "patternElement", "empty pattern atom"))?;
            Ok(Atom::Pattern(convert_pattern_element(element)?))
        }
        Rule::Variable => {
            let var_node = node
                .nodes()
                .next()
                .ok_or_else(|| syntax_error(&node.span, "variable", "empty variable atom"))?;
            Ok(Atom::Variable(convert_variable(var_node)?))
        }
        Rule::FunctionInvocation => Err(CypherError::UnsupportedFeature {
            rule: "functionInvocation",
            span: node.span.clone(),
        }),
        other => Err(syntax_error(
            &node.span,
            "atom",
            format!("unexpected node in atom position: {}", other.name()),
        )),
    }
}

fn convert_filter_expr(node: &CstNode) -> ConvertResult<FilterExpr> {
    let mut nodes = node.nodes();
    let var_node = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "variable", "filter expression with no variable"))?;
    let variable = convert_variable(var_node)?;
    let in_node = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "expression", "filter expression with no IN list"))?;
    let in_expr = convert_expr(in_node)?;
    let where_expr = nodes.next().map(convert_expr).transpose()?.map(Box::new);
    Ok(FilterExpr {
        variable,
        in_expr: Box::new(in_expr),
        where_expr,
        span: node.span.clone(),
    })
}

/// Distinguishes the optional leading variable from the mandatory pattern
/// element, and the optional `WHERE` from the mandatory projection, by rule
/// tag rather than position: a variable is always `Rule::Variable`, the
/// pattern is always `Rule::PatternElement`, and an expression is neither.
fn convert_pattern_comprehension(node: &CstNode) -> ConvertResult<PatternComprehension> {
    let mut nodes = node.nodes().peekable();
    let variable = match nodes.peek() {
        Some(n) if n.rule == Rule::Variable => Some(convert_variable(nodes.next().unwrap())?),
        _ => None,
    };
    let element_node = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "patternElement", "pattern comprehension with no pattern"))?;
    let pattern = convert_pattern_element(element_node)?;
    let remaining: Vec<&CstNode> = nodes.collect();
    let (where_node, projection_node) = match remaining.len() {
        2 => (Some(remaining[0]), remaining[1]),
        1 => (None, remaining[0]),
        _ => {
            return Err(syntax_error(
                &node.span,
                "expression",
                "pattern comprehension with no projection",
            ));
        }
    };
    let where_expr = where_node.map(convert_expr).transpose()?.map(Box::new);
    let projection = Box::new(convert_expr(projection_node)?);
    Ok(PatternComprehension {
        variable,
        pattern,
        where_expr,
        projection,
        span: node.span.clone(),
    })
}

fn convert_case_expr(node: &CstNode) -> ConvertResult<CaseExpr> {
    let mut nodes = node.nodes().peekable();
    let test = match nodes.peek() {
        Some(n) if n.rule != Rule::CaseAlternative => Some(Box::new(convert_expr(nodes.next().unwrap())?)),
        _ => None,
    };
    let mut alternatives = Vec::new();
    while matches!(nodes.peek(), Some(n) if n.rule == Rule::CaseAlternative) {
        alternatives.push(convert_case_alternative(nodes.next().unwrap())?);
    }
    let default = nodes.next().map(convert_expr).transpose()?.map(Box::new);
    Ok(CaseExpr {
        test,
        alternatives,
        default,
        span: node.span.clone(),
    })
}

fn convert_case_alternative(node: &CstNode) -> ConvertResult<CaseAlt> {
    let mut nodes = node.nodes();
    let when_node = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "expression", "CASE alternative with no WHEN"))?;
    let then_node = nodes
        .next()
        .ok_or_else(|| syntax_error(&node.span, "expression", "CASE alternative with no THEN"))?;
    Ok(CaseAlt {
        when: convert_expr(when_node)?,
        then: convert_expr(then_node)?,
    })
}

fn convert_literal(node: &CstNode) -> ConvertResult<Literal> {
    if let Some(tok) = node.tokens().next() {
        match &tok.kind {
            TokenKind::StringLiteral(s) => Ok(Literal::String(s.clone())),
            TokenKind::IntegerLiteral(raw) => {
                validate_integer_literal(raw, &tok.span)?;
                Ok(Literal::Integer(raw.clone()))
            }
            TokenKind::FloatLiteral(raw) => {
                raw.parse::<f64>().map_err(|_| CypherError::MalformedLiteral {
                    message: format!("invalid floating-point literal '{raw}'"),
                    span: tok.span.clone(),
                })?;
                Ok(Literal::Float(raw.clone()))
            }
            TokenKind::True => Ok(Literal::Boolean(true)),
            TokenKind::False => Ok(Literal::Boolean(false)),
            TokenKind::Null => Ok(Literal::Null),
            other => Err(CypherError::MalformedLiteral {
                message: format!("unexpected literal token: {other}"),
                span: tok.span.clone(),
            }),
        }
    } else if let Some(map_node) = node.first_of_rule(Rule::MapLiteral) {
        Ok(Literal::Map(convert_map_literal(map_node)?))
    } else {
        Err(CypherError::MalformedLiteral {
            message: "empty literal".into(),
            span: node.span.clone(),
        })
    }
}

/// Re-parses an integer literal's raw text (decimal, `0x` hex, or `0o`
/// octal) purely to reject anything the lexer let through that no integer
/// decoder would accept. The AST keeps the raw text either way.
fn validate_integer_literal(raw: &str, span: &Span) -> ConvertResult<()> {
    let parsed = if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        i128::from_str_radix(hex, 16)
    } else if let Some(oct) = raw.strip_prefix("0o").or_else(|| raw.strip_prefix("0O")) {
        i128::from_str_radix(oct, 8)
    } else {
        raw.parse::<i128>()
    };
    parsed.map(|_| ()).map_err(|_| CypherError::MalformedLiteral {
        message: format!("invalid integer literal '{raw}'"),
        span: span.clone(),
    })
}

fn convert_list_literal(node: &CstNode) -> ConvertResult<Literal> {
    let items = node.nodes().map(convert_expr).collect::<ConvertResult<Vec<_>>>()?;
    Ok(Literal::List(items))
}

// ---------------------------------------------------------------------
// Leaves: variables and schema names
// ---------------------------------------------------------------------

/// Maps a symbolic-name token to its lexical kind: plain identifiers split
/// into the unescaped and hex-letter classes by spelling, and the reserved
/// words usable in name positions each carry their own kind.
fn convert_symbolic_name(tok: &Token, expected: &'static str) -> ConvertResult<SymbolicName> {
    let (value, form): (SmolStr, _) = match &tok.kind {
        TokenKind::Identifier(s) => (s.clone(), SymbolicNameForm::classify(s)),
        TokenKind::DelimitedIdentifier(s) => (s.clone(), SymbolicNameForm::Escaped),
        TokenKind::Count => ("COUNT".into(), SymbolicNameForm::Count),
        TokenKind::Filter => ("FILTER".into(), SymbolicNameForm::Filter),
        TokenKind::Extract => ("EXTRACT".into(), SymbolicNameForm::Extract),
        TokenKind::Any => ("ANY".into(), SymbolicNameForm::Any),
        TokenKind::None => ("NONE".into(), SymbolicNameForm::None),
        TokenKind::Single => ("SINGLE".into(), SymbolicNameForm::Single),
        other => {
            return Err(syntax_error(
                &tok.span,
                expected,
                format!("expected {expected}, found {other}"),
            ));
        }
    };
    Ok(SymbolicName::new(value, form, tok.span.clone()))
}

/// `parse_atom`'s identifier branch wraps an already-built `Variable` node
/// in another `Variable` node, so this recurses once into a lone `Node`
/// child before falling back to reading a token directly.
fn convert_variable(node: &CstNode) -> ConvertResult<Variable> {
    if let Some(tok) = node.tokens().next() {
        let name = convert_symbolic_name(tok, "a variable name")?;
        Ok(Variable::new(name, node.span.clone()))
    } else if let Some(inner) = node.nodes().next() {
        convert_variable(inner)
    } else {
        Err(syntax_error(&node.span, "variable", "empty variable node"))
    }
}

fn convert_schema_name(node: &CstNode) -> ConvertResult<SchemaName> {
    let tok = node
        .tokens()
        .next()
        .ok_or_else(|| syntax_error(&node.span, "schemaName", "empty schema name"))?;
    match &tok.kind {
        TokenKind::Identifier(_)
        | TokenKind::DelimitedIdentifier(_)
        | TokenKind::Count
        | TokenKind::Filter
        | TokenKind::Extract
        | TokenKind::Any
        | TokenKind::None
        | TokenKind::Single => Ok(SchemaName::Symbolic(convert_symbolic_name(tok, "a name")?)),
        other if other.is_keyword() => Ok(SchemaName::ReservedWord(SmolStr::new(other.to_string()))),
        other => Err(syntax_error(&node.span, "schemaName", format!("expected a name, found {other}"))),
    }
}
