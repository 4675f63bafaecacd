//! Reading and updating clauses, and the `RETURN`/`WITH` projection body
//! they (along with a query's tail) share.

use super::expression::{Expr, PropertyLookup};
use super::identifier::{SchemaName, Variable};
use super::pattern::{Pattern, PatternPart};
use super::span::Span;

/// `ORDER BY` direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortItem {
    pub expr: Expr,
    pub direction: SortDirection,
    pub span: Span,
}

/// A single `RETURN`/`WITH` projection, e.g. `n.name AS label`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionItem {
    pub expr: Expr,
    pub alias: Option<Variable>,
    pub span: Span,
}

/// `RETURN *` vs. an explicit projection list.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnItems {
    All,
    Explicit(Vec<ProjectionItem>),
}

/// The projection body shared by `RETURN` and `WITH`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnBody {
    pub distinct: bool,
    pub items: ReturnItems,
    pub order_by: Vec<SortItem>,
    pub skip: Option<Expr>,
    pub limit: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnClause {
    pub body: ReturnBody,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithClause {
    pub body: ReturnBody,
    pub where_expr: Option<Expr>,
    pub span: Span,
}

/// `MATCH [OPTIONAL] pattern [WHERE predicate]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchClause {
    pub optional: bool,
    pub pattern: Pattern,
    pub where_expr: Option<Expr>,
    pub span: Span,
}

/// `UNWIND expr AS variable`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnwindClause {
    pub expr: Expr,
    pub variable: Variable,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReadingClause {
    Match(MatchClause),
    Unwind(UnwindClause),
}

/// `CREATE pattern`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateClause {
    pub pattern: Pattern,
    pub span: Span,
}

/// A property, variable-label, or whole-variable write target for `SET`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyTarget {
    pub base: Variable,
    pub lookups: Vec<PropertyLookup>,
    pub span: Span,
}

/// Whether a `SET variable = expr` assignment replaces the variable's
/// properties (`=`) or merges additional ones in (`+=`). The grammar parser
/// records which operator it actually matched, rather than the lowering pass
/// re-deriving it from raw token positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentMode {
    Replace,
    Merge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetItem {
    Property {
        target: PropertyTarget,
        value: Expr,
    },
    VariableAssignment {
        variable: Variable,
        value: Expr,
        mode: AssignmentMode,
    },
    VariableLabels {
        variable: Variable,
        labels: Vec<SchemaName>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    pub items: Vec<SetItem>,
    pub span: Span,
}

/// `ON CREATE` / `ON MATCH` actions attached to a `MERGE` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeActionKind {
    OnCreate,
    OnMatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeAction {
    pub kind: MergeActionKind,
    pub set: SetClause,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeClause {
    pub pattern_part: PatternPart,
    pub actions: Vec<MergeAction>,
    pub span: Span,
}

/// `DELETE [DETACH] expr, expr, ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteClause {
    pub detach: bool,
    pub exprs: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoveItem {
    Labels {
        variable: Variable,
        labels: Vec<SchemaName>,
    },
    Property(PropertyTarget),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveClause {
    pub items: Vec<RemoveItem>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdatingClause {
    Create(CreateClause),
    Merge(MergeClause),
    Set(SetClause),
    Delete(DeleteClause),
    Remove(RemoveClause),
}
