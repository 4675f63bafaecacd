//! The concrete syntax tree produced by the grammar parser, ahead of lowering
//! into the typed AST.
//!
//! Every grammar rule function in [`crate::parser::grammar`] returns one
//! [`CstNode`], tagged with the [`Rule`] it matched and holding its matched
//! sub-rules and terminal tokens in source order. Nothing here interprets
//! what a node means — that is [`crate::convert`]'s job — so a `CstNode` is
//! just a generic, rule-tagged tree plus a handful of accessors for walking
//! it without re-deriving structure from raw positions.

use crate::ast::Span;
use crate::lexer::token::{Token, TokenKind};

/// The grammar rule a [`CstNode`] was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    RegularQuery,
    SingleQuery,
    QueryPart,
    UnionClause,
    ReadingClause,
    MatchClause,
    UnwindClause,
    UpdatingClause,
    CreateClause,
    MergeClause,
    MergeAction,
    SetClause,
    SetItem,
    DeleteClause,
    RemoveClause,
    RemoveItem,
    WithClause,
    ReturnClause,
    ReturnBody,
    ProjectionItem,
    SortItem,
    Pattern,
    PatternPart,
    PatternElement,
    NodePattern,
    RelationshipPattern,
    RangeLiteral,
    Properties,
    OrExpr,
    XorExpr,
    AndExpr,
    NotExpr,
    ComparisonExpr,
    AddOrSubtractExpr,
    MultiplyDivideModuloExpr,
    PowerOfExpr,
    UnaryAddOrSubtractExpr,
    StringListNullOperatorExpr,
    PropertyOrLabelsExpr,
    Literal,
    ListLiteral,
    MapLiteral,
    Parameter,
    CaseExpr,
    CaseAlternative,
    CountStar,
    FilterExpr,
    ListComprehension,
    PatternComprehension,
    PatternAtom,
    Parenthesized,
    Variable,
    SchemaName,
    FunctionInvocation,
    StandaloneCall,
}

impl Rule {
    /// The grammar rule's name, as it would appear in a diagnostic that
    /// names "the rule that failed to match" rather than a raw token.
    pub fn name(self) -> &'static str {
        match self {
            Rule::RegularQuery => "regularQuery",
            Rule::SingleQuery => "singleQuery",
            Rule::QueryPart => "queryPart",
            Rule::UnionClause => "unionClause",
            Rule::ReadingClause => "readingClause",
            Rule::MatchClause => "matchClause",
            Rule::UnwindClause => "unwindClause",
            Rule::UpdatingClause => "updatingClause",
            Rule::CreateClause => "createClause",
            Rule::MergeClause => "mergeClause",
            Rule::MergeAction => "mergeAction",
            Rule::SetClause => "setClause",
            Rule::SetItem => "setItem",
            Rule::DeleteClause => "deleteClause",
            Rule::RemoveClause => "removeClause",
            Rule::RemoveItem => "removeItem",
            Rule::WithClause => "withClause",
            Rule::ReturnClause => "returnClause",
            Rule::ReturnBody => "returnBody",
            Rule::ProjectionItem => "projectionItem",
            Rule::SortItem => "sortItem",
            Rule::Pattern => "pattern",
            Rule::PatternPart => "patternPart",
            Rule::PatternElement => "patternElement",
            Rule::NodePattern => "nodePattern",
            Rule::RelationshipPattern => "relationshipPattern",
            Rule::RangeLiteral => "rangeLiteral",
            Rule::Properties => "properties",
            Rule::OrExpr => "orExpression",
            Rule::XorExpr => "xorExpression",
            Rule::AndExpr => "andExpression",
            Rule::NotExpr => "notExpression",
            Rule::ComparisonExpr => "comparisonExpression",
            Rule::AddOrSubtractExpr => "addOrSubtractExpression",
            Rule::MultiplyDivideModuloExpr => "multiplyDivideModuloExpression",
            Rule::PowerOfExpr => "powerOfExpression",
            Rule::UnaryAddOrSubtractExpr => "unaryAddOrSubtractExpression",
            Rule::StringListNullOperatorExpr => "stringListNullOperatorExpression",
            Rule::PropertyOrLabelsExpr => "propertyOrLabelsExpression",
            Rule::Literal => "literal",
            Rule::ListLiteral => "listLiteral",
            Rule::MapLiteral => "mapLiteral",
            Rule::Parameter => "parameter",
            Rule::CaseExpr => "caseExpression",
            Rule::CaseAlternative => "caseAlternative",
            Rule::CountStar => "countStar",
            Rule::FilterExpr => "filterExpression",
            Rule::ListComprehension => "listComprehension",
            Rule::PatternComprehension => "patternComprehension",
            Rule::PatternAtom => "relationshipsPattern",
            Rule::Parenthesized => "parenthesizedExpression",
            Rule::Variable => "variable",
            Rule::SchemaName => "schemaName",
            Rule::FunctionInvocation => "functionInvocation",
            Rule::StandaloneCall => "standaloneCall",
        }
    }
}

/// A child of a [`CstNode`]: either a matched sub-rule or a consumed token.
#[derive(Debug, Clone)]
pub enum CstChild {
    Node(CstNode),
    Token(Token),
}

impl CstChild {
    pub fn as_node(&self) -> Option<&CstNode> {
        match self {
            CstChild::Node(n) => Some(n),
            CstChild::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            CstChild::Token(t) => Some(t),
            CstChild::Node(_) => None,
        }
    }
}

/// One node of the concrete syntax tree: a matched rule, its source span,
/// and its children in the order the parser consumed them.
#[derive(Debug, Clone)]
pub struct CstNode {
    pub rule: Rule,
    pub span: Span,
    pub children: Vec<CstChild>,
}

impl CstNode {
    pub fn new(rule: Rule, span: Span, children: Vec<CstChild>) -> Self {
        Self { rule, span, children }
    }

    /// Every direct child that is a sub-rule node, in source order.
    pub fn nodes(&self) -> impl Iterator<Item = &CstNode> {
        self.children.iter().filter_map(CstChild::as_node)
    }

    /// Every direct child that is a terminal token, in source order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(CstChild::as_token)
    }

    /// Direct child sub-rule nodes matching `rule`, in source order.
    pub fn nodes_of_rule(&self, rule: Rule) -> impl Iterator<Item = &CstNode> {
        self.nodes().filter(move |n| n.rule == rule)
    }

    /// The first direct child sub-rule node matching `rule`, if any.
    pub fn first_of_rule(&self, rule: Rule) -> Option<&CstNode> {
        self.nodes_of_rule(rule).next()
    }

    /// Whether any direct child token has exactly this kind.
    pub fn has_token(&self, kind: &TokenKind) -> bool {
        self.tokens().any(|t| &t.kind == kind)
    }

    /// The node's only `regularQuery` child, for a top-level statement node.
    pub fn regular_query(&self) -> Option<&CstNode> {
        self.first_of_rule(Rule::RegularQuery)
    }

    /// Every `UNION` sibling attached to a `regularQuery` node.
    pub fn all_union_clauses(&self) -> impl Iterator<Item = &CstNode> {
        self.nodes_of_rule(Rule::UnionClause)
    }

    /// The first integer-literal token among this node's direct tokens.
    pub fn integer_literal(&self) -> Option<&Token> {
        self.tokens()
            .find(|t| matches!(t.kind, TokenKind::IntegerLiteral(_)))
    }
}
