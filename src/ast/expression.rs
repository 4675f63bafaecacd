//! Expression tree produced by lowering the precedence-cascaded grammar rules
//! into flat, left-associative operator trees.

use super::identifier::{SchemaName, Variable};
use super::pattern::PatternElement;
use super::span::Span;
use smol_str::SmolStr;

/// The polymorphic expression node. Every precedence layer in the grammar
/// collapses into one of these variants during lowering; there is no
/// separate node type per grammar rule the way the concrete syntax tree has.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Predication(PredicationExpr),
    StringOp(StringOperationExpr),
    ListOp(ListOperationExpr),
    PropertyOrLabels(PropertyOrLabelsExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Binary(e) => e.span.clone(),
            Expr::Unary(e) => e.span.clone(),
            Expr::Predication(e) => e.span.clone(),
            Expr::StringOp(e) => e.span.clone(),
            Expr::ListOp(e) => e.span.clone(),
            Expr::PropertyOrLabels(e) => e.span.clone(),
        }
    }
}

/// Binary operator kinds. `BinaryExpr` trees are always left-associative and
/// flat: `a + b + c` lowers to `(a + b) + c`, never a 3-ary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    Xor,
    And,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Or => "OR",
            BinaryOp::Xor => "XOR",
            BinaryOp::And => "AND",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Unary operator kinds. `NOT` nests once per occurrence in the source
/// (`NOT NOT a` is two nested `UnaryExpr` nodes, not a cancelled-out identity)
/// so that visitors can observe each `NOT` independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Plus,
    Neg,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "NOT",
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// `IS NULL` / `IS NOT NULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicationKind {
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredicationExpr {
    pub kind: PredicationKind,
    pub expr: Box<Expr>,
    pub span: Span,
}

/// `STARTS WITH` / `ENDS WITH` / `CONTAINS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOperator {
    StartsWith,
    EndsWith,
    Contains,
}

impl StringOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            StringOperator::StartsWith => "STARTS WITH",
            StringOperator::EndsWith => "ENDS WITH",
            StringOperator::Contains => "CONTAINS",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringOperationExpr {
    pub op: StringOperator,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

/// `IN`, single-index `[i]`, and range-index `[lower..upper]` applied to an
/// expression. These three share a grammar rule (`listOperatorExpr`) and the
/// alternative actually taken is recorded explicitly here (rather than
/// re-derived from raw token positions) so lowering never needs to guess.
#[derive(Debug, Clone, PartialEq)]
pub enum ListOperationKind {
    In(Box<Expr>),
    Index(Box<Expr>),
    Range {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListOperationExpr {
    pub expr: Box<Expr>,
    pub kind: ListOperationKind,
    pub span: Span,
}

/// A property lookup: `.key`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyLookup {
    pub key: SchemaName,
    pub span: Span,
}

/// The atom plus any trailing property lookups and node-label filters
/// (`x.a.b:Label`), the bottom of the precedence cascade above `atom` itself.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyOrLabelsExpr {
    pub atom: Box<Atom>,
    pub property_lookups: Vec<PropertyLookup>,
    pub node_labels: Vec<SchemaName>,
    pub span: Span,
}

/// The terminal alternatives of the `atom` grammar rule.
///
/// Function and procedure invocations are deliberately absent; the enum is
/// non-exhaustive so an invocation variant can be added without breaking
/// downstream matches.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Atom {
    Literal(Literal),
    Parameter(SmolStr),
    Case(CaseExpr),
    CountStar,
    PatternComprehension(PatternComprehension),
    AllFilter(FilterExpr),
    AnyFilter(FilterExpr),
    NoneFilter(FilterExpr),
    SingleFilter(FilterExpr),
    ExtractComprehension(ListComprehension),
    Pattern(PatternElement),
    Parenthesized(Box<Expr>),
    Variable(Variable),
}

/// Literal values. Numbers and strings retain their raw source text because
/// restoration must reproduce numeric formatting and string escapes exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(SmolStr),
    Float(SmolStr),
    String(SmolStr),
    Boolean(bool),
    Null,
    List(Vec<Expr>),
    Map(Vec<(SchemaName, Expr)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseAlt {
    pub when: Expr,
    pub then: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    pub test: Option<Box<Expr>>,
    pub alternatives: Vec<CaseAlt>,
    pub default: Option<Box<Expr>>,
    pub span: Span,
}

/// The variable-binding shape shared by `ALL`/`ANY`/`NONE`/`SINGLE`/`FILTER`:
/// `ALL(x IN list WHERE predicate)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpr {
    pub variable: Variable,
    pub in_expr: Box<Expr>,
    pub where_expr: Option<Box<Expr>>,
    pub span: Span,
}

/// `[x IN list WHERE predicate | projection]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListComprehension {
    pub filter: FilterExpr,
    pub projection: Option<Box<Expr>>,
    pub span: Span,
}

/// `[path = (n)-->() WHERE predicate | projection]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternComprehension {
    pub variable: Option<Variable>,
    pub pattern: PatternElement,
    pub where_expr: Option<Box<Expr>>,
    pub projection: Box<Expr>,
    pub span: Span,
}
