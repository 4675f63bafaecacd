//! Recursive-descent grammar parser: token stream in, concrete syntax tree
//! out. Every function here matches exactly one named grammar rule and
//! returns the [`CstNode`] it produced; none of them know what the result
//! means semantically — [`crate::convert`] lowers the tree this module
//! builds into the typed AST.

use crate::cst::{CstChild, CstNode, Rule};
use crate::lexer::token::{Token, TokenKind};
use crate::parser::base::{ParseResult, TokenStream};

fn node(rule: Rule, start: usize, ts: &TokenStream, children: Vec<CstChild>) -> CstNode {
    let end = ts.prev_span().end;
    CstNode::new(rule, start..end.max(start), children)
}

fn leaf_token(ts: &mut TokenStream, kind: TokenKind) -> ParseResult<Token> {
    let span = ts.expect(kind.clone())?;
    Ok(Token::new(kind, span))
}

/// `regularQuery: singleQuery (UNION ALL? singleQuery)*`
pub fn parse_regular_query(ts: &mut TokenStream) -> ParseResult<CstNode> {
    if ts.at(&TokenKind::Eof) {
        return Err(ts.unexpected("expected a query"));
    }
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Node(parse_single_query(ts)?)];
    while ts.at(&TokenKind::Union) {
        let union_start = ts.head().span.start;
        let mut union_children = vec![CstChild::Token(ts.take())];
        if ts.at(&TokenKind::All) {
            union_children.push(CstChild::Token(ts.take()));
        }
        union_children.push(CstChild::Node(parse_single_query(ts)?));
        let union_node = node(Rule::UnionClause, union_start, ts, union_children);
        children.push(CstChild::Node(union_node));
    }
    Ok(node(Rule::RegularQuery, start, ts, children))
}

fn starts_reading_or_updating_clause(ts: &TokenStream) -> bool {
    matches!(
        ts.head().kind,
        TokenKind::Optional
            | TokenKind::Match
            | TokenKind::Unwind
            | TokenKind::Create
            | TokenKind::Merge
            | TokenKind::Set
            | TokenKind::Delete
            | TokenKind::Detach
            | TokenKind::Remove
    )
}

/// `singleQuery: queryPart* (RETURN returnBody)?`, where `queryPart`
/// boundaries are inferred from `WITH` rather than matched by a named rule
/// of their own in the token stream — the grammar's `multiPartQueryPart`
/// production is exactly "clauses, then WITH, repeated".
pub fn parse_single_query(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = Vec::new();
    loop {
        let part_start = ts.head().span.start;
        let mut part_children = Vec::new();
        while starts_reading_or_updating_clause(ts) {
            if matches!(ts.head().kind, TokenKind::Optional | TokenKind::Match) {
                part_children.push(CstChild::Node(wrap_reading_clause(parse_match_clause(ts)?)));
            } else if ts.at(&TokenKind::Unwind) {
                part_children.push(CstChild::Node(wrap_reading_clause(parse_unwind_clause(ts)?)));
            } else {
                part_children.push(CstChild::Node(wrap_updating_clause(parse_updating_clause(
                    ts,
                )?)));
            }
        }
        let has_with = ts.at(&TokenKind::With);
        if has_with {
            part_children.push(CstChild::Node(parse_with_clause(ts)?));
        }
        let part_is_empty = part_children.is_empty();
        let part_node = node(Rule::QueryPart, part_start, ts, part_children);
        let reached_return = ts.at(&TokenKind::Return);
        let reached_end = ts.at(&TokenKind::Eof)
            || ts.at(&TokenKind::Union)
            || ts.at(&TokenKind::Semicolon);
        if part_is_empty && !has_with && (reached_return || reached_end) && !children.is_empty() {
            break;
        }
        children.push(CstChild::Node(part_node));
        if has_with {
            continue;
        }
        break;
    }
    if ts.at(&TokenKind::Return) {
        children.push(CstChild::Node(parse_return_clause(ts)?));
    }
    Ok(node(Rule::SingleQuery, start, ts, children))
}

fn wrap_reading_clause(inner: CstNode) -> CstNode {
    let span = inner.span.clone();
    CstNode::new(Rule::ReadingClause, span, vec![CstChild::Node(inner)])
}

fn wrap_updating_clause(inner: CstNode) -> CstNode {
    let span = inner.span.clone();
    CstNode::new(Rule::UpdatingClause, span, vec![CstChild::Node(inner)])
}

/// `matchClause: OPTIONAL? MATCH pattern (WHERE expression)?`
fn parse_match_clause(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = Vec::new();
    if ts.at(&TokenKind::Optional) {
        children.push(CstChild::Token(ts.take()));
    }
    children.push(CstChild::Token(leaf_token(ts, TokenKind::Match)?));
    children.push(CstChild::Node(parse_pattern(ts)?));
    if ts.eat(&TokenKind::Where) {
        children.push(CstChild::Node(parse_expr(ts)?));
    }
    Ok(node(Rule::MatchClause, start, ts, children))
}

/// `unwindClause: UNWIND expression AS variable`
fn parse_unwind_clause(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Token(leaf_token(ts, TokenKind::Unwind)?)];
    children.push(CstChild::Node(parse_expr(ts)?));
    ts.expect(TokenKind::As)?;
    children.push(CstChild::Node(parse_variable(ts)?));
    Ok(node(Rule::UnwindClause, start, ts, children))
}

fn parse_updating_clause(ts: &mut TokenStream) -> ParseResult<CstNode> {
    match ts.head().kind {
        TokenKind::Create => parse_create_clause(ts),
        TokenKind::Merge => parse_merge_clause(ts),
        TokenKind::Set => parse_set_clause(ts),
        TokenKind::Detach | TokenKind::Delete => parse_delete_clause(ts),
        TokenKind::Remove => parse_remove_clause(ts),
        _ => Err(ts.unexpected("expected an updating clause")),
    }
}

/// `createClause: CREATE pattern`
fn parse_create_clause(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Token(leaf_token(ts, TokenKind::Create)?)];
    children.push(CstChild::Node(parse_pattern(ts)?));
    Ok(node(Rule::CreateClause, start, ts, children))
}

/// `mergeClause: MERGE patternPart mergeAction*`
fn parse_merge_clause(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Token(leaf_token(ts, TokenKind::Merge)?)];
    children.push(CstChild::Node(parse_pattern_part(ts)?));
    while ts.at(&TokenKind::On) {
        children.push(CstChild::Node(parse_merge_action(ts)?));
    }
    Ok(node(Rule::MergeClause, start, ts, children))
}

/// `mergeAction: ON (CREATE | MATCH) SET setItem (',' setItem)*`
fn parse_merge_action(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Token(leaf_token(ts, TokenKind::On)?)];
    let kind_token = if ts.at(&TokenKind::Create) {
        ts.take()
    } else {
        leaf_token(ts, TokenKind::Match)?
    };
    children.push(CstChild::Token(kind_token));
    children.push(CstChild::Node(parse_set_clause(ts)?));
    Ok(node(Rule::MergeAction, start, ts, children))
}

/// `setClause: SET setItem (',' setItem)*`
fn parse_set_clause(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Token(leaf_token(ts, TokenKind::Set)?)];
    children.push(CstChild::Node(parse_set_item(ts)?));
    while ts.eat(&TokenKind::Comma) {
        children.push(CstChild::Node(parse_set_item(ts)?));
    }
    Ok(node(Rule::SetClause, start, ts, children))
}

/// `setItem: variable (':' nodeLabel)+ | variable '+=' expr | variable '=' expr
///  | propertyExpression '=' expr`
fn parse_set_item(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let variable = parse_variable(ts)?;
    if ts.at(&TokenKind::Colon) {
        let mut children = vec![CstChild::Node(variable)];
        while ts.eat(&TokenKind::Colon) {
            children.push(CstChild::Node(parse_schema_name(ts)?));
        }
        return Ok(node(Rule::SetItem, start, ts, children));
    }
    let mut children = vec![CstChild::Node(variable)];
    while ts.eat(&TokenKind::Dot) {
        children.push(CstChild::Node(parse_schema_name(ts)?));
    }
    if ts.at(&TokenKind::Plus) && matches!(ts.nth(1).map(|t| &t.kind), Some(TokenKind::Eq)) {
        children.push(CstChild::Token(ts.take())); // '+'
        children.push(CstChild::Token(ts.take())); // '='
    } else {
        children.push(CstChild::Token(leaf_token(ts, TokenKind::Eq)?));
    }
    children.push(CstChild::Node(parse_expr(ts)?));
    Ok(node(Rule::SetItem, start, ts, children))
}

/// `deleteClause: DETACH? DELETE expression (',' expression)*`
fn parse_delete_clause(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = Vec::new();
    if ts.at(&TokenKind::Detach) {
        children.push(CstChild::Token(ts.take()));
    }
    children.push(CstChild::Token(leaf_token(ts, TokenKind::Delete)?));
    children.push(CstChild::Node(parse_expr(ts)?));
    while ts.eat(&TokenKind::Comma) {
        children.push(CstChild::Node(parse_expr(ts)?));
    }
    Ok(node(Rule::DeleteClause, start, ts, children))
}

/// `removeClause: REMOVE removeItem (',' removeItem)*`
fn parse_remove_clause(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Token(leaf_token(ts, TokenKind::Remove)?)];
    children.push(CstChild::Node(parse_remove_item(ts)?));
    while ts.eat(&TokenKind::Comma) {
        children.push(CstChild::Node(parse_remove_item(ts)?));
    }
    Ok(node(Rule::RemoveClause, start, ts, children))
}

/// `removeItem: variable (':' nodeLabel)+ | variable ('.' schemaName)+`
fn parse_remove_item(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let variable = parse_variable(ts)?;
    let mut children = vec![CstChild::Node(variable)];
    if ts.at(&TokenKind::Colon) {
        while ts.at(&TokenKind::Colon) {
            children.push(CstChild::Token(ts.take()));
            children.push(CstChild::Node(parse_schema_name(ts)?));
        }
    } else {
        while ts.at(&TokenKind::Dot) {
            children.push(CstChild::Token(ts.take()));
            children.push(CstChild::Node(parse_schema_name(ts)?));
        }
    }
    Ok(node(Rule::RemoveItem, start, ts, children))
}

/// `withClause: WITH DISTINCT? returnBody (WHERE expression)?`
fn parse_with_clause(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Token(leaf_token(ts, TokenKind::With)?)];
    if ts.at(&TokenKind::Distinct) {
        children.push(CstChild::Token(ts.take()));
    }
    children.push(CstChild::Node(parse_return_body(ts)?));
    if ts.eat(&TokenKind::Where) {
        children.push(CstChild::Node(parse_expr(ts)?));
    }
    Ok(node(Rule::WithClause, start, ts, children))
}

/// `returnClause: RETURN DISTINCT? returnBody`
fn parse_return_clause(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Token(leaf_token(ts, TokenKind::Return)?)];
    if ts.at(&TokenKind::Distinct) {
        children.push(CstChild::Token(ts.take()));
    }
    children.push(CstChild::Node(parse_return_body(ts)?));
    Ok(node(Rule::ReturnClause, start, ts, children))
}

/// `returnBody: ('*' | projectionItem (',' projectionItem)*) orderClause?
///  ('SKIP' expr)? ('LIMIT' expr)?`
fn parse_return_body(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = Vec::new();
    if ts.at(&TokenKind::Star) {
        children.push(CstChild::Token(ts.take()));
    } else {
        children.push(CstChild::Node(parse_projection_item(ts)?));
        while ts.eat(&TokenKind::Comma) {
            children.push(CstChild::Node(parse_projection_item(ts)?));
        }
    }
    if ts.eat(&TokenKind::Order) {
        ts.expect(TokenKind::By)?;
        children.push(CstChild::Node(parse_sort_item(ts)?));
        while ts.eat(&TokenKind::Comma) {
            children.push(CstChild::Node(parse_sort_item(ts)?));
        }
    }
    if ts.at(&TokenKind::Skip) {
        children.push(CstChild::Token(ts.take()));
        children.push(CstChild::Node(parse_expr(ts)?));
    }
    if ts.at(&TokenKind::Limit) {
        children.push(CstChild::Token(ts.take()));
        children.push(CstChild::Node(parse_expr(ts)?));
    }
    Ok(node(Rule::ReturnBody, start, ts, children))
}

/// `projectionItem: expression (AS variable)?`
fn parse_projection_item(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Node(parse_expr(ts)?)];
    if ts.eat(&TokenKind::As) {
        children.push(CstChild::Node(parse_variable(ts)?));
    }
    Ok(node(Rule::ProjectionItem, start, ts, children))
}

/// `sortItem: expression (ASC | ASCENDING | DESC | DESCENDING)?`
fn parse_sort_item(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Node(parse_expr(ts)?)];
    if matches!(
        ts.head().kind,
        TokenKind::Asc | TokenKind::Ascending | TokenKind::Desc | TokenKind::Descending
    ) {
        children.push(CstChild::Token(ts.take()));
    }
    Ok(node(Rule::SortItem, start, ts, children))
}

/// `pattern: patternPart (',' patternPart)*`
pub fn parse_pattern(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Node(parse_pattern_part(ts)?)];
    while ts.eat(&TokenKind::Comma) {
        children.push(CstChild::Node(parse_pattern_part(ts)?));
    }
    Ok(node(Rule::Pattern, start, ts, children))
}

/// `patternPart: (variable '=')? patternElement`
fn parse_pattern_part(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = Vec::new();
    let checkpoint = ts.checkpoint();
    if let Ok(variable) = parse_variable(ts) {
        if ts.at(&TokenKind::Eq) {
            ts.bump();
            children.push(CstChild::Node(variable));
        } else {
            ts.rewind(checkpoint);
        }
    }
    children.push(CstChild::Node(parse_pattern_element(ts)?));
    Ok(node(Rule::PatternPart, start, ts, children))
}

/// `patternElement: nodePattern (relationshipPattern nodePattern)*
///  | '(' patternElement ')'`
fn parse_pattern_element(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    if ts.at(&TokenKind::LParen) && matches!(ts.nth(1).map(|t| &t.kind), Some(TokenKind::LParen))
    {
        ts.bump();
        let inner = parse_pattern_element(ts)?;
        ts.expect(TokenKind::RParen)?;
        return Ok(node(Rule::PatternElement, start, ts, vec![CstChild::Node(inner)]));
    }
    let mut children = vec![CstChild::Node(parse_node_pattern(ts)?)];
    while matches!(ts.head().kind, TokenKind::Minus | TokenKind::LeftArrow) {
        children.push(CstChild::Node(parse_relationship_pattern(ts)?));
        children.push(CstChild::Node(parse_node_pattern(ts)?));
    }
    Ok(node(Rule::PatternElement, start, ts, children))
}

fn starts_variable(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier(_)
            | TokenKind::DelimitedIdentifier(_)
            | TokenKind::Count
            | TokenKind::Filter
            | TokenKind::Extract
            | TokenKind::Any
            | TokenKind::None
            | TokenKind::Single
    )
}

fn starts_properties(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::LBrace | TokenKind::Parameter(_))
}

/// `nodePattern: '(' variable? nodeLabels? properties? ')'`
fn parse_node_pattern(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    ts.expect(TokenKind::LParen)?;
    let mut children = Vec::new();
    if starts_variable(&ts.head().kind) {
        children.push(CstChild::Node(parse_variable(ts)?));
    }
    while ts.eat(&TokenKind::Colon) {
        children.push(CstChild::Node(parse_schema_name(ts)?));
    }
    if starts_properties(&ts.head().kind) {
        children.push(CstChild::Node(parse_properties(ts)?));
    }
    ts.expect(TokenKind::RParen)?;
    Ok(node(Rule::NodePattern, start, ts, children))
}

/// `relationshipPattern: (LeftArrow? '-' relationshipDetail? '-' Arrow?)`
fn parse_relationship_pattern(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = Vec::new();
    if ts.at(&TokenKind::LeftArrow) {
        children.push(CstChild::Token(ts.take()));
    } else {
        ts.expect(TokenKind::Minus)?;
    }
    if ts.at(&TokenKind::LBracket) {
        ts.bump();
        if starts_variable(&ts.head().kind) {
            children.push(CstChild::Node(parse_variable(ts)?));
        }
        if ts.eat(&TokenKind::Colon) {
            children.push(CstChild::Node(parse_schema_name(ts)?));
            while ts.eat(&TokenKind::Pipe) {
                children.push(CstChild::Node(parse_schema_name(ts)?));
            }
        }
        if ts.at(&TokenKind::Star) {
            children.push(CstChild::Node(parse_range_literal(ts)?));
        }
        if starts_properties(&ts.head().kind) {
            children.push(CstChild::Node(parse_properties(ts)?));
        }
        ts.expect(TokenKind::RBracket)?;
    }
    if ts.at(&TokenKind::Arrow) {
        children.push(CstChild::Token(ts.take()));
    } else {
        ts.expect(TokenKind::Minus)?;
    }
    Ok(node(Rule::RelationshipPattern, start, ts, children))
}

/// `rangeLiteral: '*' integer? ('..' integer?)?`
fn parse_range_literal(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Token(leaf_token(ts, TokenKind::Star)?)];
    if matches!(ts.head().kind, TokenKind::IntegerLiteral(_)) {
        children.push(CstChild::Token(ts.take()));
    }
    if ts.at(&TokenKind::DotDot) {
        children.push(CstChild::Token(ts.take()));
        if matches!(ts.head().kind, TokenKind::IntegerLiteral(_)) {
            children.push(CstChild::Token(ts.take()));
        }
    }
    Ok(node(Rule::RangeLiteral, start, ts, children))
}

/// `properties: mapLiteral | parameter`
fn parse_properties(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    if matches!(ts.head().kind, TokenKind::Parameter(_)) {
        let token = ts.take();
        return Ok(node(Rule::Properties, start, ts, vec![CstChild::Token(token)]));
    }
    let map = parse_map_literal(ts)?;
    Ok(node(Rule::Properties, start, ts, vec![CstChild::Node(map)]))
}

/// `mapLiteral: '{' (schemaName ':' expression (',' schemaName ':' expression)*)? '}'`
fn parse_map_literal(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    ts.expect(TokenKind::LBrace)?;
    let mut children = Vec::new();
    if !ts.at(&TokenKind::RBrace) {
        children.push(CstChild::Node(parse_schema_name(ts)?));
        ts.expect(TokenKind::Colon)?;
        children.push(CstChild::Node(parse_expr(ts)?));
        while ts.eat(&TokenKind::Comma) {
            children.push(CstChild::Node(parse_schema_name(ts)?));
            ts.expect(TokenKind::Colon)?;
            children.push(CstChild::Node(parse_expr(ts)?));
        }
    }
    ts.expect(TokenKind::RBrace)?;
    Ok(node(Rule::MapLiteral, start, ts, children))
}

/// `variable: symbolicName`, which admits the reserved words
/// `COUNT`/`FILTER`/`EXTRACT`/`ANY`/`NONE`/`SINGLE` alongside plain and
/// backtick-escaped identifiers.
fn parse_variable(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    if starts_variable(&ts.head().kind) {
        let token = ts.take();
        Ok(node(Rule::Variable, start, ts, vec![CstChild::Token(token)]))
    } else {
        Err(ts.unexpected("expected a variable name"))
    }
}

/// `schemaName: symbolicName | reservedWord`, used for labels, relationship
/// types, and property/map keys — positions where a keyword spelling is
/// still a legal name.
fn parse_schema_name(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    match ts.head().kind.clone() {
        TokenKind::Identifier(_) | TokenKind::DelimitedIdentifier(_) => {
            let token = ts.take();
            Ok(node(Rule::SchemaName, start, ts, vec![CstChild::Token(token)]))
        }
        ref kind if kind.is_keyword() => {
            let token = ts.take();
            Ok(node(Rule::SchemaName, start, ts, vec![CstChild::Token(token)]))
        }
        _ => Err(ts.unexpected("expected a name")),
    }
}

/// `expression: orExpression`
pub fn parse_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    parse_or_expr(ts)
}

fn parse_left_assoc(
    ts: &mut TokenStream,
    rule: Rule,
    ops: &[TokenKind],
    mut operand: impl FnMut(&mut TokenStream) -> ParseResult<CstNode>,
) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Node(operand(ts)?)];
    loop {
        let matched = ops.iter().find(|k| ts.at(k)).cloned();
        match matched {
            Some(_) => {
                children.push(CstChild::Token(ts.take()));
                children.push(CstChild::Node(operand(ts)?));
            }
            None => break,
        }
    }
    Ok(node(rule, start, ts, children))
}

fn parse_or_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    parse_left_assoc(ts, Rule::OrExpr, &[TokenKind::Or], parse_xor_expr)
}

fn parse_xor_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    parse_left_assoc(ts, Rule::XorExpr, &[TokenKind::Xor], parse_and_expr)
}

fn parse_and_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    parse_left_assoc(ts, Rule::AndExpr, &[TokenKind::And], parse_not_expr)
}

/// `notExpression: NOT* comparisonExpression`, one nested `NotExpr` CST node
/// per `NOT` occurrence so each negation stays individually visible.
fn parse_not_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    if ts.at(&TokenKind::Not) {
        let not_token = ts.take();
        let inner = parse_not_expr(ts)?;
        return Ok(node(
            Rule::NotExpr,
            start,
            ts,
            vec![CstChild::Token(not_token), CstChild::Node(inner)],
        ));
    }
    let inner = parse_comparison_expr(ts)?;
    Ok(node(Rule::NotExpr, start, ts, vec![CstChild::Node(inner)]))
}

fn parse_comparison_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    parse_left_assoc(
        ts,
        Rule::ComparisonExpr,
        &[
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::LtEq,
            TokenKind::GtEq,
        ],
        parse_add_or_subtract_expr,
    )
}

fn parse_add_or_subtract_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    parse_left_assoc(
        ts,
        Rule::AddOrSubtractExpr,
        &[TokenKind::Plus, TokenKind::Minus],
        parse_multiply_divide_modulo_expr,
    )
}

fn parse_multiply_divide_modulo_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    parse_left_assoc(
        ts,
        Rule::MultiplyDivideModuloExpr,
        &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
        parse_power_of_expr,
    )
}

fn parse_power_of_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    parse_left_assoc(
        ts,
        Rule::PowerOfExpr,
        &[TokenKind::Caret],
        parse_unary_add_or_subtract_expr,
    )
}

/// `unaryAddOrSubtractExpression: ('+' | '-')* stringListNullOperatorExpression`
fn parse_unary_add_or_subtract_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    if matches!(ts.head().kind, TokenKind::Plus | TokenKind::Minus) {
        let op_token = ts.take();
        let inner = parse_unary_add_or_subtract_expr(ts)?;
        return Ok(node(
            Rule::UnaryAddOrSubtractExpr,
            start,
            ts,
            vec![CstChild::Token(op_token), CstChild::Node(inner)],
        ));
    }
    let inner = parse_string_list_null_operator_expr(ts)?;
    Ok(node(
        Rule::UnaryAddOrSubtractExpr,
        start,
        ts,
        vec![CstChild::Node(inner)],
    ))
}

/// `stringListNullOperatorExpression: propertyOrLabelsExpression
///   ( (STARTS WITH | ENDS WITH | CONTAINS) propertyOrLabelsExpression
///   | IN propertyOrLabelsExpression
///   | '[' expression? ('..' expression?)? ']'
///   | IS NOT? NULL )*`
fn parse_string_list_null_operator_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Node(parse_property_or_labels_expr(ts)?)];
    loop {
        match ts.head().kind {
            TokenKind::In => {
                children.push(CstChild::Token(ts.take()));
                children.push(CstChild::Node(parse_property_or_labels_expr(ts)?));
            }
            TokenKind::Starts => {
                children.push(CstChild::Token(ts.take()));
                children.push(CstChild::Token(leaf_token(ts, TokenKind::With)?));
                children.push(CstChild::Node(parse_property_or_labels_expr(ts)?));
            }
            TokenKind::Ends => {
                children.push(CstChild::Token(ts.take()));
                children.push(CstChild::Token(leaf_token(ts, TokenKind::With)?));
                children.push(CstChild::Node(parse_property_or_labels_expr(ts)?));
            }
            TokenKind::Contains => {
                children.push(CstChild::Token(ts.take()));
                children.push(CstChild::Node(parse_property_or_labels_expr(ts)?));
            }
            TokenKind::Is => {
                children.push(CstChild::Token(ts.take()));
                if ts.at(&TokenKind::Not) {
                    children.push(CstChild::Token(ts.take()));
                }
                children.push(CstChild::Token(leaf_token(ts, TokenKind::Null)?));
            }
            TokenKind::LBracket => {
                children.push(CstChild::Token(ts.take()));
                if !ts.at(&TokenKind::DotDot) && !ts.at(&TokenKind::RBracket) {
                    children.push(CstChild::Node(parse_expr(ts)?));
                }
                if ts.at(&TokenKind::DotDot) {
                    children.push(CstChild::Token(ts.take()));
                    if !ts.at(&TokenKind::RBracket) {
                        children.push(CstChild::Node(parse_expr(ts)?));
                    }
                }
                children.push(CstChild::Token(leaf_token(ts, TokenKind::RBracket)?));
            }
            _ => break,
        }
    }
    Ok(node(
        Rule::StringListNullOperatorExpr,
        start,
        ts,
        children,
    ))
}

/// `propertyOrLabelsExpression: atom ('.' schemaName)* (':' nodeLabel)*`
fn parse_property_or_labels_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Node(parse_atom(ts)?)];
    while ts.at(&TokenKind::Dot) {
        children.push(CstChild::Token(ts.take()));
        children.push(CstChild::Node(parse_schema_name(ts)?));
    }
    while ts.at(&TokenKind::Colon) {
        children.push(CstChild::Token(ts.take()));
        children.push(CstChild::Node(parse_schema_name(ts)?));
    }
    Ok(node(Rule::PropertyOrLabelsExpr, start, ts, children))
}

/// `filterExpression: variable IN expression (WHERE expression)?`, the
/// variable-binding shape shared by `ALL`/`ANY`/`NONE`/`SINGLE`/`EXTRACT`.
fn parse_filter_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Node(parse_variable(ts)?)];
    ts.expect(TokenKind::In)?;
    children.push(CstChild::Node(parse_expr(ts)?));
    if ts.eat(&TokenKind::Where) {
        children.push(CstChild::Node(parse_expr(ts)?));
    }
    Ok(node(Rule::FilterExpr, start, ts, children))
}

/// `atom`: the terminal alternatives at the bottom of the precedence cascade.
fn parse_atom(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    match ts.head().kind.clone() {
        TokenKind::StringLiteral(_)
        | TokenKind::IntegerLiteral(_)
        | TokenKind::FloatLiteral(_)
        | TokenKind::True
        | TokenKind::False
        | TokenKind::Null => {
            let token = ts.take();
            Ok(node(Rule::Literal, start, ts, vec![CstChild::Token(token)]))
        }
        TokenKind::Parameter(_) => {
            let token = ts.take();
            Ok(node(Rule::Parameter, start, ts, vec![CstChild::Token(token)]))
        }
        TokenKind::LBrace => {
            let map = parse_map_literal(ts)?;
            Ok(node(Rule::Literal, start, ts, vec![CstChild::Node(map)]))
        }
        TokenKind::LBracket => parse_bracketed_atom(ts, start),
        TokenKind::Case => parse_case_expr(ts),
        TokenKind::Count if followed_by_lparen(ts) => {
            if !matches!(ts.nth(2).map(|t| &t.kind), Some(TokenKind::Star)) {
                // `count(expr)` is an aggregate invocation, not COUNT(*).
                return parse_function_invocation(ts, start);
            }
            let count_token = leaf_token(ts, TokenKind::Count)?;
            ts.expect(TokenKind::LParen)?;
            let star_token = leaf_token(ts, TokenKind::Star)?;
            ts.expect(TokenKind::RParen)?;
            Ok(node(
                Rule::CountStar,
                start,
                ts,
                vec![CstChild::Token(count_token), CstChild::Token(star_token)],
            ))
        }
        TokenKind::Extract if followed_by_lparen(ts) => {
            let keyword = ts.take();
            ts.expect(TokenKind::LParen)?;
            let filter = parse_filter_expr(ts)?;
            ts.expect(TokenKind::Pipe)?;
            let projection = parse_expr(ts)?;
            ts.expect(TokenKind::RParen)?;
            Ok(node(
                Rule::ListComprehension,
                start,
                ts,
                vec![
                    CstChild::Token(keyword),
                    CstChild::Node(filter),
                    CstChild::Node(projection),
                ],
            ))
        }
        TokenKind::All | TokenKind::Any | TokenKind::None | TokenKind::Single
            if followed_by_lparen(ts) =>
        {
            let keyword = ts.take();
            ts.expect(TokenKind::LParen)?;
            let filter = parse_filter_expr(ts)?;
            ts.expect(TokenKind::RParen)?;
            Ok(node(
                Rule::FilterExpr,
                start,
                ts,
                vec![CstChild::Token(keyword), CstChild::Node(filter)],
            ))
        }
        TokenKind::LParen => parse_parenthesized_or_pattern_atom(ts, start),
        TokenKind::Identifier(_) | TokenKind::DelimitedIdentifier(_) | TokenKind::Filter
            if followed_by_lparen(ts) =>
        {
            parse_function_invocation(ts, start)
        }
        ref kind if starts_variable(kind) => {
            let variable = parse_variable(ts)?;
            Ok(node(Rule::Variable, start, ts, vec![CstChild::Node(variable)]))
        }
        _ => Err(ts.unexpected(format!("unexpected token {}", ts.head().kind))),
    }
}

fn followed_by_lparen(ts: &TokenStream) -> bool {
    matches!(ts.nth(1).map(|t| &t.kind), Some(TokenKind::LParen))
}

/// `functionInvocation: functionName '(' ... ')'`, consumed to the matching
/// close paren without interpreting the argument list — the AST does not
/// model invocations, so lowering rejects this node as an unsupported
/// feature with its name attached.
fn parse_function_invocation(ts: &mut TokenStream, start: usize) -> ParseResult<CstNode> {
    let name = ts.take();
    let children = vec![CstChild::Token(name)];
    ts.expect(TokenKind::LParen)?;
    let mut depth = 1usize;
    while depth > 0 {
        match ts.head().kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth -= 1,
            TokenKind::Eof => return Err(ts.unexpected("unterminated function invocation")),
            _ => {}
        }
        ts.bump();
    }
    Ok(node(Rule::FunctionInvocation, start, ts, children))
}

/// Disambiguates `'[' ... ']'` between a list literal, a list comprehension,
/// and a pattern comprehension by a small amount of checkpointed lookahead.
fn parse_bracketed_atom(ts: &mut TokenStream, start: usize) -> ParseResult<CstNode> {
    ts.expect(TokenKind::LBracket)?;
    if ts.at(&TokenKind::RBracket) {
        ts.bump();
        return Ok(node(Rule::ListLiteral, start, ts, Vec::new()));
    }

    let pattern_checkpoint = ts.checkpoint();
    let mut pattern_children = Vec::new();
    let mut pattern_ok = true;
    if matches!(
        ts.head().kind,
        TokenKind::Identifier(_) | TokenKind::DelimitedIdentifier(_)
    ) && matches!(ts.nth(1).map(|t| &t.kind), Some(TokenKind::Eq))
    {
        match parse_variable(ts) {
            Ok(v) => {
                ts.bump(); // '='
                pattern_children.push(CstChild::Node(v));
            }
            Err(_) => pattern_ok = false,
        }
    }
    if pattern_ok && ts.at(&TokenKind::LParen) {
        match parse_pattern_element(ts) {
            Ok(element) => {
                pattern_children.push(CstChild::Node(element));
                if ts.at(&TokenKind::Where) || ts.at(&TokenKind::Pipe) {
                    if ts.eat(&TokenKind::Where) {
                        pattern_children.push(CstChild::Node(parse_expr(ts)?));
                    }
                    ts.expect(TokenKind::Pipe)?;
                    pattern_children.push(CstChild::Node(parse_expr(ts)?));
                    ts.expect(TokenKind::RBracket)?;
                    return Ok(node(Rule::PatternComprehension, start, ts, pattern_children));
                }
            }
            Err(_) => pattern_ok = false,
        }
    } else {
        pattern_ok = false;
    }
    ts.rewind(pattern_checkpoint);

    let comprehension_checkpoint = ts.checkpoint();
    if matches!(
        ts.head().kind,
        TokenKind::Identifier(_) | TokenKind::DelimitedIdentifier(_)
    ) {
        if let Ok(filter) = parse_filter_expr(ts) {
            let mut children = vec![CstChild::Node(filter)];
            if ts.eat(&TokenKind::Pipe) {
                children.push(CstChild::Node(parse_expr(ts)?));
            }
            if ts.at(&TokenKind::RBracket) {
                ts.bump();
                return Ok(node(Rule::ListComprehension, start, ts, children));
            }
        }
    }
    ts.rewind(comprehension_checkpoint);

    let mut children = vec![CstChild::Node(parse_expr(ts)?)];
    while ts.eat(&TokenKind::Comma) {
        children.push(CstChild::Node(parse_expr(ts)?));
    }
    ts.expect(TokenKind::RBracket)?;
    Ok(node(Rule::ListLiteral, start, ts, children))
}

/// `'(' expression ')'` vs. a bare relationship chain used as a boolean
/// expression (`relationshipsPattern`, which requires at least one
/// relationship — a solitary `(n)` is always a parenthesized expression,
/// never a pattern atom). `(a) - 1` stays arithmetic: the closing paren
/// only flips to the pattern interpretation when what follows it can begin
/// a relationship (`<-`, `--`, `-[`, `-->`).
fn parse_parenthesized_or_pattern_atom(ts: &mut TokenStream, start: usize) -> ParseResult<CstNode> {
    let checkpoint = ts.checkpoint();
    ts.bump(); // '('
    if let Ok(inner) = parse_expr(ts) {
        if ts.at(&TokenKind::RParen) {
            let continues_as_pattern = match ts.nth(1).map(|t| &t.kind) {
                Some(TokenKind::LeftArrow) => true,
                Some(TokenKind::Minus) => matches!(
                    ts.nth(2).map(|t| &t.kind),
                    Some(TokenKind::Minus | TokenKind::Arrow | TokenKind::LBracket)
                ),
                _ => false,
            };
            if !continues_as_pattern {
                ts.bump();
                return Ok(node(Rule::Parenthesized, start, ts, vec![CstChild::Node(inner)]));
            }
        }
    }
    ts.rewind(checkpoint);
    let element = parse_pattern_element(ts)?;
    Ok(node(Rule::PatternAtom, start, ts, vec![CstChild::Node(element)]))
}

/// `caseExpression: CASE expression? (WHEN expression THEN expression)+
///  (ELSE expression)? END`
fn parse_case_expr(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    let mut children = vec![CstChild::Token(leaf_token(ts, TokenKind::Case)?)];
    if !ts.at(&TokenKind::When) {
        children.push(CstChild::Node(parse_expr(ts)?));
    }
    while ts.eat(&TokenKind::When) {
        let alt_start = ts.prev_span().start;
        let when_expr = parse_expr(ts)?;
        ts.expect(TokenKind::Then)?;
        let then_expr = parse_expr(ts)?;
        children.push(CstChild::Node(node(
            Rule::CaseAlternative,
            alt_start,
            ts,
            vec![CstChild::Node(when_expr), CstChild::Node(then_expr)],
        )));
    }
    if ts.eat(&TokenKind::Else) {
        children.push(CstChild::Node(parse_expr(ts)?));
    }
    ts.expect(TokenKind::End)?;
    Ok(node(Rule::CaseExpr, start, ts, children))
}

/// `standaloneCall: CALL ...`, consumed wholesale since its body is out of
/// scope — lowering rejects it as an unsupported feature.
pub fn parse_standalone_call(ts: &mut TokenStream) -> ParseResult<CstNode> {
    let start = ts.head().span.start;
    ts.expect(TokenKind::Call)?;
    while !matches!(ts.head().kind, TokenKind::Eof | TokenKind::Semicolon) {
        ts.bump();
    }
    Ok(node(Rule::StandaloneCall, start, ts, Vec::new()))
}
